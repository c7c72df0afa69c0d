#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate slog;

pub use crate::geometry::Point2;
pub use crate::bounds::{Bounds2, Bounds2i};

pub mod atomic;
pub mod barrier;
pub mod block_queue;
pub mod bounds;
pub mod camera;
pub mod errors;
pub mod film;
pub mod geometry;
pub mod integrator;
pub mod logging;
pub mod parallel;
pub mod paramset;
pub mod renderer;
pub mod rng;
pub mod sampler;

pub type Point2f = Point2<f32>;
pub type Point2i = Point2<i32>;

/// Largest `f32` strictly below 1.0
pub const ONE_MINUS_EPSILON: f32 = 0.99999994;

#[inline]
pub fn clamp<T>(val: T, low: T, high: T) -> T
where
    T: PartialOrd + Copy,
{
    if val < low {
        low
    } else if val > high {
        high
    } else {
        val
    }
}
