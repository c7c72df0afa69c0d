use std::thread;

use parking_lot::{Condvar, Mutex};

/// One-shot rendezvous: every participant blocks in `wait()` until the last
/// one arrives.
///
/// A barrier is used exactly once. Share it through an `Arc` (or a scoped
/// borrow) so it outlives every participant, and drop it only once all
/// of them have arrived.
pub struct Barrier {
    count: Mutex<usize>,
    cv: Condvar,
}

impl Barrier {
    pub fn new(count: usize) -> Barrier {
        assert!(count > 0, "a barrier needs at least one participant");
        Barrier {
            count: Mutex::new(count),
            cv: Condvar::new(),
        }
    }

    pub fn wait(&self) {
        let mut count = self.count.lock();
        assert!(*count > 0, "wait() called on a barrier that was already released");
        *count -= 1;
        if *count == 0 {
            // Release all threads that are waiting
            self.cv.notify_all();
        } else {
            while *count != 0 {
                self.cv.wait(&mut count);
            }
        }
    }

    /// Participants still expected.
    pub fn remaining(&self) -> usize {
        *self.count.lock()
    }
}

impl Drop for Barrier {
    fn drop(&mut self) {
        if !thread::panicking() {
            assert_eq!(
                *self.count.get_mut(),
                0,
                "barrier dropped before every participant arrived"
            );
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn test_releases_all() {
        const N: usize = 6;
        let barrier = Arc::new(Barrier::new(N));
        let arrived = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..N)
            .map(|_| {
                let barrier = barrier.clone();
                let arrived = arrived.clone();
                thread::spawn(move || {
                    arrived.fetch_add(1, Ordering::SeqCst);
                    barrier.wait();
                    // Nobody gets past the barrier before everyone reached it
                    assert_eq!(arrived.load(Ordering::SeqCst), N);
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(barrier.remaining(), 0);
    }

    #[test]
    fn test_single_participant() {
        let barrier = Barrier::new(1);
        barrier.wait();
    }

    #[test]
    #[should_panic]
    fn test_zero_count_panics() {
        let _ = Barrier::new(0);
    }

    #[test]
    #[should_panic]
    fn test_drop_before_release_panics() {
        let barrier = Barrier::new(2);
        barrier.arrive_without_waiting();
    }

    impl Barrier {
        // Arrive without blocking, leaving one participant missing
        fn arrive_without_waiting(&self) {
            *self.count.lock() -= 1;
        }
    }

    #[test]
    #[should_panic]
    fn test_reuse_panics() {
        let barrier = Barrier::new(1);
        barrier.wait();
        barrier.wait();
    }
}
