use std::num::Wrapping;

use crate::ONE_MINUS_EPSILON;

const PCG32_DEFAULT_STATE: Wrapping<u64> = Wrapping(0x853c_49e6_748f_ea9b);
const PCG32_DEFAULT_STREAM: Wrapping<u64> = Wrapping(0xda3e_39cb_94b9_5bdb);
const PCG32_MULT: Wrapping<u64> = Wrapping(0x5851_f42d_4c95_7f2d);

/// Source of uniform random numbers a sampler draws from.
///
/// Samplers never care which generator sits behind this: they only need
/// uniform values in `[0, 1)` and a way to jump to an independent stream
/// when they get cloned for another thread.
pub trait RandomStream: Clone + Send {
    fn uniform_u32(&mut self) -> u32;

    /// Uniform value in `[0, 1)`.
    fn uniform_f32(&mut self) -> f32 {
        (self.uniform_u32() as f32 * 2.328_306_4e-10).min(ONE_MINUS_EPSILON)
    }

    /// Uniform integer in `[0, b)`.
    fn uniform_u32_bounded(&mut self, b: u32) -> u32 {
        assert!(b > 0, "uniform_u32_bounded() called with an empty range");
        let threshold = (!b).wrapping_add(1) % b;
        loop {
            let r = self.uniform_u32();
            if r >= threshold {
                return r % b;
            }
        }
    }

    /// Restart the generator on the stream selected by `seed`.
    fn set_sequence(&mut self, seed: u64);
}

/// PCG32 generator.
#[derive(Copy, Clone, Debug)]
pub struct RNG {
    state: Wrapping<u64>,
    inc: Wrapping<u64>,
}

impl RNG {
    pub fn new() -> RNG {
        RNG {
            state: PCG32_DEFAULT_STATE,
            inc: PCG32_DEFAULT_STREAM,
        }
    }

    pub fn with_sequence(seed: u64) -> RNG {
        let mut rng = RNG::new();
        rng.set_sequence(seed);
        rng
    }
}

impl RandomStream for RNG {
    fn uniform_u32(&mut self) -> u32 {
        let oldstate = self.state;
        self.state = oldstate * PCG32_MULT + self.inc;
        let xorshifted = (((oldstate >> 18) ^ oldstate) >> 27).0 as u32;
        let rot = (oldstate >> 59).0 as u32;

        (xorshifted >> rot) | (xorshifted << ((!rot).wrapping_add(1) & 31))
    }

    fn set_sequence(&mut self, seed: u64) {
        self.state = Wrapping(0);
        self.inc = Wrapping((seed << 1) | 1);
        let _ = self.uniform_u32();
        self.state += PCG32_DEFAULT_STATE;
        let _ = self.uniform_u32();
    }
}

impl Default for RNG {
    fn default() -> RNG {
        RNG::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_uniform_f32_range() {
        let mut rng = RNG::with_sequence(7);
        for _ in 0..10_000 {
            let v = rng.uniform_f32();
            assert!(v >= 0.0 && v < 1.0, "{} out of [0, 1)", v);
        }
    }

    #[test]
    fn test_bounded() {
        let mut rng = RNG::new();
        let mut seen = [false; 5];
        for _ in 0..1000 {
            let v = rng.uniform_u32_bounded(5);
            assert!(v < 5);
            seen[v as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }

    #[test]
    fn test_sequences_are_independent() {
        let mut a = RNG::with_sequence(1);
        let mut b = RNG::with_sequence(2);
        let va: Vec<u32> = (0..64).map(|_| a.uniform_u32()).collect();
        let vb: Vec<u32> = (0..64).map(|_| b.uniform_u32()).collect();
        assert_ne!(va, vb);
    }

    #[test]
    fn test_same_sequence_replays() {
        let mut a = RNG::with_sequence(42);
        let mut b = RNG::with_sequence(42);
        for _ in 0..64 {
            assert_eq!(a.uniform_u32(), b.uniform_u32());
        }
    }
}
