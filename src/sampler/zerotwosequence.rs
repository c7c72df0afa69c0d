use crate::errors::{Error, Result};
use crate::paramset::ParamSet;
use crate::rng::{RandomStream, RNG};
use crate::sampler::lowdiscrepancy::{sobol_2d, van_der_corput};
use crate::sampler::{Sampler, SamplerState};
use crate::{Point2f, Point2i};

/// Pixel sampler built on a scrambled (0, 2)-sequence.
///
/// The first `n_sampled_dimensions` calls to `get_1d()` / `get_2d()` in each
/// pixel sample come from precomputed stratified patterns; anything past that
/// falls back to uniform random values. Sample counts and array sizes must be
/// powers of two.
#[derive(Clone, Debug)]
pub struct ZeroTwoSequenceSampler {
    state: SamplerState,
    samples_1d: Vec<Vec<f32>>,
    samples_2d: Vec<Vec<Point2f>>,
    current_1d_dimension: usize,
    current_2d_dimension: usize,
    rng: RNG,
}

impl ZeroTwoSequenceSampler {
    pub fn new(spp: usize, n_sampled_dimensions: usize, seed: u64) -> ZeroTwoSequenceSampler {
        let spp = spp.next_power_of_two();
        ZeroTwoSequenceSampler {
            state: SamplerState::new(spp),
            samples_1d: vec![vec![0.0; spp]; n_sampled_dimensions],
            samples_2d: vec![vec![Point2f::new(0.0, 0.0); spp]; n_sampled_dimensions],
            current_1d_dimension: 0,
            current_2d_dimension: 0,
            rng: RNG::with_sequence(seed),
        }
    }

    pub fn create(ps: &mut ParamSet) -> Result<Box<dyn Sampler>> {
        let nsamples = ps.find_one_int("pixelsamples", 16);
        let sd = ps.find_one_int("dimensions", 4);
        let seed = ps.find_one_int("seed", 0);
        if nsamples <= 0 {
            return Err(Error::invalid_parameter(
                "pixelsamples",
                format!("{} is not a positive sample count", nsamples),
            ));
        }
        if sd < 0 {
            return Err(Error::invalid_parameter(
                "dimensions",
                format!("{} is negative", sd),
            ));
        }
        if !(nsamples as usize).is_power_of_two() {
            warn!(
                slog_scope::logger(),
                "Pixel samples being rounded up to power of 2 (from {} to {})",
                nsamples,
                (nsamples as usize).next_power_of_two()
            );
        }
        Ok(Box::new(ZeroTwoSequenceSampler::new(
            nsamples as usize,
            sd as usize,
            seed as u64,
        )))
    }
}

impl Sampler for ZeroTwoSequenceSampler {
    fn state(&self) -> &SamplerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut SamplerState {
        &mut self.state
    }

    fn start_pixel(&mut self, p: Point2i) {
        let spp = self.state.spp() as u32;
        // Generate 1D and 2D pixel sample components using (0, 2)-sequence
        for samples in &mut self.samples_1d {
            van_der_corput(1, spp, samples, &mut self.rng);
        }
        for samples in &mut self.samples_2d {
            sobol_2d(1, spp, samples, &mut self.rng);
        }

        // Generate 1D and 2D array samples
        let sizes_1d = self.state.array_1d_sizes().to_vec();
        let sizes_2d = self.state.array_2d_sizes().to_vec();
        {
            let (arrays_1d, arrays_2d) = self.state.arrays_mut();
            for (array, n) in arrays_1d.iter_mut().zip(sizes_1d) {
                van_der_corput(n as u32, spp, array, &mut self.rng);
            }
            for (array, n) in arrays_2d.iter_mut().zip(sizes_2d) {
                sobol_2d(n as u32, spp, array, &mut self.rng);
            }
        }

        self.current_1d_dimension = 0;
        self.current_2d_dimension = 0;
        self.state.start_pixel(p);
    }

    fn start_next_sample(&mut self) -> bool {
        self.current_1d_dimension = 0;
        self.current_2d_dimension = 0;
        self.state.start_next_sample()
    }

    fn set_sample_number(&mut self, sample_num: usize) -> bool {
        self.current_1d_dimension = 0;
        self.current_2d_dimension = 0;
        self.state.set_sample_number(sample_num)
    }

    fn get_1d(&mut self) -> f32 {
        self.state.check_sample_index();
        if self.current_1d_dimension < self.samples_1d.len() {
            let res = self.samples_1d[self.current_1d_dimension][self.state.current_sample_number()];
            self.current_1d_dimension += 1;
            res
        } else {
            self.rng.uniform_f32()
        }
    }

    fn get_2d(&mut self) -> Point2f {
        self.state.check_sample_index();
        if self.current_2d_dimension < self.samples_2d.len() {
            let res = self.samples_2d[self.current_2d_dimension][self.state.current_sample_number()];
            self.current_2d_dimension += 1;
            res
        } else {
            let x = self.rng.uniform_f32();
            let y = self.rng.uniform_f32();
            Point2f::new(x, y)
        }
    }

    fn round_count(&self, count: usize) -> usize {
        if count == 0 {
            0
        } else {
            count.next_power_of_two()
        }
    }

    fn clone_with_seed(&self, seed: u64) -> Box<dyn Sampler> {
        let mut s = self.clone();
        s.rng.set_sequence(seed);
        Box::new(s)
    }
}
