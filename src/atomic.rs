//! Lock-free floating point accumulators.
//!
//! The value is kept as its bit pattern in an unsigned atomic of the same
//! width. `add()` is a compare-and-swap loop, so concurrent adds never lose an
//! update, but nothing orders an add against a concurrent `load()` on another
//! value.
use std::fmt;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

macro_rules! atomic_float(
    ($name:ident, $float:ty, $atomic:ty) => (
        pub struct $name {
            bits: $atomic,
        }

        impl $name {
            pub fn new(v: $float) -> $name {
                $name { bits: <$atomic>::new(v.to_bits()) }
            }

            pub fn load(&self) -> $float {
                <$float>::from_bits(self.bits.load(Ordering::Relaxed))
            }

            pub fn store(&self, v: $float) {
                self.bits.store(v.to_bits(), Ordering::Relaxed);
            }

            /// Atomically add `v`, returning the previous value.
            pub fn add(&self, v: $float) -> $float {
                let mut old_bits = self.bits.load(Ordering::Relaxed);
                loop {
                    let new_bits = (<$float>::from_bits(old_bits) + v).to_bits();
                    match self.bits.compare_exchange_weak(
                        old_bits,
                        new_bits,
                        Ordering::AcqRel,
                        Ordering::Relaxed,
                    ) {
                        Ok(_) => return <$float>::from_bits(old_bits),
                        Err(current) => old_bits = current,
                    }
                }
            }
        }

        impl Default for $name {
            fn default() -> $name {
                $name::new(0.0)
            }
        }

        impl Clone for $name {
            fn clone(&self) -> $name {
                $name::new(self.load())
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.debug_tuple(stringify!($name)).field(&self.load()).finish()
            }
        }

        impl From<$float> for $name {
            fn from(v: $float) -> $name {
                $name::new(v)
            }
        }
    );
);

atomic_float!(AtomicFloat, f32, AtomicU32);
atomic_float!(AtomicDouble, f64, AtomicU64);

#[cfg(test)]
mod test {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_load_store() {
        let f = AtomicFloat::new(1.5);
        assert_eq!(f.load(), 1.5);
        f.store(-2.25);
        assert_eq!(f.load(), -2.25);
        assert_eq!(AtomicDouble::default().load(), 0.0);
    }

    #[test]
    fn test_add_returns_previous() {
        let f = AtomicDouble::new(2.0);
        assert_eq!(f.add(0.5), 2.0);
        assert_eq!(f.load(), 2.5);
    }

    #[test]
    fn test_concurrent_adds_are_exact() {
        const THREADS: usize = 8;
        const ADDS: usize = 10_000;
        let acc = Arc::new(AtomicFloat::new(0.0));
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let acc = acc.clone();
                thread::spawn(move || {
                    for _ in 0..ADDS {
                        acc.add(1.0);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        // Every partial sum is an integer below 2^24, so f32 is exact here
        assert_eq!(acc.load(), (THREADS * ADDS) as f32);
    }

    #[test]
    fn test_clone_is_a_snapshot() {
        let a = AtomicFloat::new(1.0);
        let b = a.clone();
        a.add(1.0);
        assert_eq!(b.load(), 1.0);
        assert_eq!(a.load(), 2.0);
    }
}
