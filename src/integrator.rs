use crate::camera::CameraSample;
use crate::sampler::Sampler;

/// Estimates the radiance arriving at a film sample.
///
/// The renderer calls `preprocess()` once on the sampler prototype, before
/// any pixel is started: this is where sample arrays get requested. `li()`
/// is then called once per pixel sample on a per-thread clone, and must read
/// the arrays back in the order they were requested.
pub trait SamplerIntegrator: Sync {
    fn preprocess(&self, _sampler: &mut dyn Sampler) {}

    fn li(&self, camera_sample: &CameraSample, sampler: &mut dyn Sampler) -> [f32; 3];
}
