use crate::errors::{Error, Result};
use crate::paramset::ParamSet;
use crate::rng::{RandomStream, RNG};
use crate::sampler::{Sampler, SamplerState};
use crate::{Point2f, Point2i};

/// Independent uniform samples, no stratification at all.
///
/// Sample arrays are redrawn for the whole pixel every time `start_pixel()`
/// is called.
#[derive(Clone, Debug)]
pub struct RandomSampler<R: RandomStream = RNG> {
    state: SamplerState,
    rng: R,
}

impl RandomSampler<RNG> {
    pub fn new(spp: usize, seed: u64) -> RandomSampler<RNG> {
        RandomSampler::with_stream(spp, RNG::with_sequence(seed))
    }

    pub fn create(ps: &mut ParamSet) -> Result<Box<dyn Sampler>> {
        let nsamples = ps.find_one_int("pixelsamples", 4);
        let seed = ps.find_one_int("seed", 0);
        if nsamples <= 0 {
            return Err(Error::invalid_parameter(
                "pixelsamples",
                format!("{} is not a positive sample count", nsamples),
            ));
        }
        Ok(Box::new(RandomSampler::new(nsamples as usize, seed as u64)))
    }
}

impl<R: RandomStream> RandomSampler<R> {
    pub fn with_stream(spp: usize, rng: R) -> RandomSampler<R> {
        RandomSampler {
            state: SamplerState::new(spp),
            rng,
        }
    }
}

impl<R: RandomStream + Sync + 'static> Sampler for RandomSampler<R> {
    fn state(&self) -> &SamplerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SamplerState {
        &mut self.state
    }

    fn get_1d(&mut self) -> f32 {
        self.state.check_sample_index();
        self.rng.uniform_f32()
    }

    fn get_2d(&mut self) -> Point2f {
        self.state.check_sample_index();
        let x = self.rng.uniform_f32();
        let y = self.rng.uniform_f32();
        Point2f::new(x, y)
    }

    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler> {
        let mut rs = self.clone();
        rs.rng.set_sequence(seed);
        Box::new(rs)
    }

    fn start_pixel(&mut self, p: Point2i) {
        {
            let rng = &mut self.rng;
            let (arrays_1d, arrays_2d) = self.state.arrays_mut();
            for v in arrays_1d.iter_mut().flat_map(|a| a.iter_mut()) {
                *v = rng.uniform_f32();
            }
            for v in arrays_2d.iter_mut().flat_map(|a| a.iter_mut()) {
                let x = rng.uniform_f32();
                let y = rng.uniform_f32();
                *v = Point2f::new(x, y);
            }
        }
        self.state.start_pixel(p);
    }
}
