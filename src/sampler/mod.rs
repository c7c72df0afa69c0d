//! Per-pixel sample generation.
//!
//! A `Sampler` hands out sample values for one pixel at a time. Integrators
//! that need several correlated values per sample (e.g. one light sample per
//! light in the scene) request fixed-width arrays once, before rendering
//! starts, and then read them back with `get_1d_array` / `get_2d_array` in the
//! same order, once per pixel sample.
//!
//! The request/consume bookkeeping lives in `SamplerState` and is shared by
//! every sampler; the samplers themselves only decide how values are drawn.
use crate::camera::CameraSample;
use crate::{Point2f, Point2i};

mod lowdiscrepancy;
mod random;
mod registry;
mod zerotwosequence;

pub use self::lowdiscrepancy::{sobol_2d, van_der_corput};
pub use self::random::RandomSampler;
pub use self::registry::{make_sampler, SamplerFactory, SamplerRegistry, REGISTRY};
pub use self::zerotwosequence::ZeroTwoSequenceSampler;

pub trait Sampler: Send + Sync {
    fn state(&self) -> &SamplerState;
    fn state_mut(&mut self) -> &mut SamplerState;

    fn get_1d(&mut self) -> f32;
    fn get_2d(&mut self) -> Point2f;

    /// Independent copy of this sampler whose random stream has been moved to
    /// the sequence selected by `seed`.
    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler>;

    /// Array sizes this sampler can serve exactly. Requests must already be
    /// rounded.
    fn round_count(&self, n: usize) -> usize {
        n
    }

    fn start_pixel(&mut self, p: Point2i) {
        self.state_mut().start_pixel(p);
    }

    fn start_next_sample(&mut self) -> bool {
        self.state_mut().start_next_sample()
    }

    fn set_sample_number(&mut self, sample_num: usize) -> bool {
        self.state_mut().set_sample_number(sample_num)
    }

    fn request_1d_array(&mut self, n: usize) {
        assert_eq!(self.round_count(n), n, "1D array size must be pre-rounded");
        self.state_mut().request_1d_array(n);
    }

    fn request_2d_array(&mut self, n: usize) {
        assert_eq!(self.round_count(n), n, "2D array size must be pre-rounded");
        self.state_mut().request_2d_array(n);
    }

    fn get_1d_array(&mut self, n: usize) -> Option<&[f32]> {
        self.state_mut().get_1d_array(n)
    }

    fn get_2d_array(&mut self, n: usize) -> Option<&[Point2f]> {
        self.state_mut().get_2d_array(n)
    }

    fn get_camera_sample(&mut self, p_raster: Point2i) -> CameraSample {
        CameraSample {
            p_film: Point2f::from(p_raster) + self.get_2d(),
        }
    }

    fn samples_per_pixel(&self) -> usize {
        self.state().spp
    }

    fn current_pixel(&self) -> Point2i {
        self.state().current_pixel
    }

    fn current_sample_number(&self) -> usize {
        self.state().current_pixel_sample_index
    }
}

/// Bookkeeping shared by all samplers: which pixel and sample index we are
/// on, and the requested sample arrays with their read cursors.
#[derive(Clone, Debug)]
pub struct SamplerState {
    spp: usize,
    current_pixel: Point2i,
    current_pixel_sample_index: usize,
    sample_1d_array_sizes: Vec<usize>,
    sample_2d_array_sizes: Vec<usize>,
    sample_array_1d: Vec<Vec<f32>>,
    sample_array_2d: Vec<Vec<Point2f>>,
    array_1d_offset: usize,
    array_2d_offset: usize,
    started: bool,
}

impl SamplerState {
    pub fn new(spp: usize) -> SamplerState {
        assert!(spp > 0, "a sampler needs at least one sample per pixel");
        SamplerState {
            spp,
            current_pixel: Point2i::new(0, 0),
            current_pixel_sample_index: 0,
            sample_1d_array_sizes: Vec::new(),
            sample_2d_array_sizes: Vec::new(),
            sample_array_1d: Vec::new(),
            sample_array_2d: Vec::new(),
            array_1d_offset: 0,
            array_2d_offset: 0,
            started: false,
        }
    }

    pub fn spp(&self) -> usize {
        self.spp
    }

    pub fn current_sample_number(&self) -> usize {
        self.current_pixel_sample_index
    }

    pub fn start_pixel(&mut self, p: Point2i) {
        self.current_pixel = p;
        self.current_pixel_sample_index = 0;
        self.array_1d_offset = 0;
        self.array_2d_offset = 0;
        self.started = true;
    }

    pub fn start_next_sample(&mut self) -> bool {
        self.array_1d_offset = 0;
        self.array_2d_offset = 0;
        self.current_pixel_sample_index += 1;
        self.current_pixel_sample_index < self.spp
    }

    pub fn set_sample_number(&mut self, sample_num: usize) -> bool {
        self.array_1d_offset = 0;
        self.array_2d_offset = 0;
        self.current_pixel_sample_index = sample_num;
        self.current_pixel_sample_index < self.spp
    }

    pub(crate) fn request_1d_array(&mut self, n: usize) {
        self.check_not_started();
        debug!(slog_scope::logger(), "Requesting 1d array of {} samples", n);
        self.sample_1d_array_sizes.push(n);
        self.sample_array_1d.push(vec![0.0; n * self.spp]);
    }

    pub(crate) fn request_2d_array(&mut self, n: usize) {
        self.check_not_started();
        debug!(slog_scope::logger(), "Requesting 2d array of {} samples", n);
        self.sample_2d_array_sizes.push(n);
        self.sample_array_2d
            .push(vec![Point2f::new(0.0, 0.0); n * self.spp]);
    }

    pub fn get_1d_array(&mut self, n: usize) -> Option<&[f32]> {
        if self.array_1d_offset == self.sample_array_1d.len() {
            return None;
        }
        assert_eq!(
            self.sample_1d_array_sizes[self.array_1d_offset], n,
            "get_1d_array() size does not match the request"
        );
        self.check_sample_index();
        let start = self.current_pixel_sample_index * n;
        let res = &self.sample_array_1d[self.array_1d_offset][start..start + n];
        self.array_1d_offset += 1;
        Some(res)
    }

    pub fn get_2d_array(&mut self, n: usize) -> Option<&[Point2f]> {
        if self.array_2d_offset == self.sample_array_2d.len() {
            return None;
        }
        assert_eq!(
            self.sample_2d_array_sizes[self.array_2d_offset], n,
            "get_2d_array() size does not match the request"
        );
        self.check_sample_index();
        let start = self.current_pixel_sample_index * n;
        let res = &self.sample_array_2d[self.array_2d_offset][start..start + n];
        self.array_2d_offset += 1;
        Some(res)
    }

    /// Panics unless the current sample index is below the per-pixel count.
    pub fn check_sample_index(&self) {
        assert!(
            self.current_pixel_sample_index < self.spp,
            "sample index {} out of range for {} samples per pixel",
            self.current_pixel_sample_index,
            self.spp
        );
    }

    pub fn array_1d_sizes(&self) -> &[usize] {
        &self.sample_1d_array_sizes
    }

    pub fn array_2d_sizes(&self) -> &[usize] {
        &self.sample_2d_array_sizes
    }

    /// Mutable access to the array buffers so samplers can fill them in.
    pub fn arrays_mut(&mut self) -> (&mut [Vec<f32>], &mut [Vec<Point2f>]) {
        (
            self.sample_array_1d.as_mut_slice(),
            self.sample_array_2d.as_mut_slice(),
        )
    }

    fn check_not_started(&self) {
        assert!(
            !self.started,
            "sample arrays must be requested before the first start_pixel()"
        );
    }
}
