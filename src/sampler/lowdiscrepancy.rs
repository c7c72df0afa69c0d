use crate::rng::RandomStream;
use crate::{Point2f, ONE_MINUS_EPSILON};

/// Fill `samples` with scrambled Van der Corput points for
/// `n_pixel_samples` pixel samples of `n_samples_per_pixel_sample` values
/// each, shuffled within and across pixel samples.
pub fn van_der_corput<R: RandomStream>(
    n_samples_per_pixel_sample: u32,
    n_pixel_samples: u32,
    samples: &mut [f32],
    rng: &mut R,
) {
    let scramble = rng.uniform_u32();
    let total_samples = n_samples_per_pixel_sample * n_pixel_samples;
    gray_code_sample(&C_VAN_DER_CORPUT, total_samples, scramble, samples);
    // Randomly shuffle 1D points
    for i in 0..n_pixel_samples {
        shuffle(
            &mut samples[(i * n_samples_per_pixel_sample) as usize..],
            n_samples_per_pixel_sample,
            1,
            rng,
        );
    }
    shuffle(samples, n_pixel_samples, n_samples_per_pixel_sample, rng);
}

/// 2D counterpart of `van_der_corput()` using the first two Sobol dimensions.
pub fn sobol_2d<R: RandomStream>(
    n_samples_per_pixel_sample: u32,
    n_pixel_samples: u32,
    samples: &mut [Point2f],
    rng: &mut R,
) {
    let scramble = [rng.uniform_u32(), rng.uniform_u32()];
    let total_samples = n_samples_per_pixel_sample * n_pixel_samples;
    gray_code_sample_2d(&C_SOBOL[0], &C_SOBOL[1], total_samples, scramble, samples);
    // Randomly shuffle 2D points
    for i in 0..n_pixel_samples {
        shuffle(
            &mut samples[(i * n_samples_per_pixel_sample) as usize..],
            n_samples_per_pixel_sample,
            1,
            rng,
        );
    }
    shuffle(samples, n_pixel_samples, n_samples_per_pixel_sample, rng);
}

#[inline]
fn to_unit_float(v: u32) -> f32 {
    (v as f32 * 2.328_306_4e-10).min(ONE_MINUS_EPSILON)
}

fn gray_code_sample(c: &[u32], n: u32, scramble: u32, p: &mut [f32]) {
    let mut v = scramble;
    for i in 0..n {
        p[i as usize] = to_unit_float(v);
        v ^= c[(i + 1).trailing_zeros() as usize];
    }
}

fn gray_code_sample_2d(c0: &[u32], c1: &[u32], n: u32, scramble: [u32; 2], p: &mut [Point2f]) {
    let mut v = scramble;
    for i in 0..n {
        p[i as usize] = Point2f::new(to_unit_float(v[0]), to_unit_float(v[1]));
        v[0] ^= c0[(i + 1).trailing_zeros() as usize];
        v[1] ^= c1[(i + 1).trailing_zeros() as usize];
    }
}

fn shuffle<T, R: RandomStream>(samp: &mut [T], count: u32, n_dimensions: u32, rng: &mut R) {
    for i in 0..count {
        let other = i + rng.uniform_u32_bounded(count - i);
        for j in 0..n_dimensions {
            samp.swap(
                (n_dimensions * i + j) as usize,
                (n_dimensions * other + j) as usize,
            );
        }
    }
}

const C_VAN_DER_CORPUT: [u32; 32] = [
    0x8000_0000, 0x4000_0000, 0x2000_0000, 0x1000_0000, 0x0800_0000, 0x0400_0000, 0x0200_0000,
    0x0100_0000, 0x0080_0000, 0x0040_0000, 0x0020_0000, 0x0010_0000, 0x0008_0000, 0x0004_0000,
    0x0002_0000, 0x0001_0000, 0x0000_8000, 0x0000_4000, 0x0000_2000, 0x0000_1000, 0x0000_0800,
    0x0000_0400, 0x0000_0200, 0x0000_0100, 0x0000_0080, 0x0000_0040, 0x0000_0020, 0x0000_0010,
    0x0000_0008, 0x0000_0004, 0x0000_0002, 0x0000_0001,
];

/// Generator matrices for Sobol 2D
const C_SOBOL: [[u32; 32]; 2] = [
    C_VAN_DER_CORPUT,
    [
        0x8000_0000, 0xc000_0000, 0xa000_0000, 0xf000_0000, 0x8800_0000, 0xcc00_0000, 0xaa00_0000,
        0xff00_0000, 0x8080_0000, 0xc0c0_0000, 0xa0a0_0000, 0xf0f0_0000, 0x8888_0000, 0xcccc_0000,
        0xaaaa_0000, 0xffff_0000, 0x8000_8000, 0xc000_c000, 0xa000_a000, 0xf000_f000, 0x8800_8800,
        0xcc00_cc00, 0xaa00_aa00, 0xff00_ff00, 0x8080_8080, 0xc0c0_c0c0, 0xa0a0_a0a0, 0xf0f0_f0f0,
        0x8888_8888, 0xcccc_cccc, 0xaaaa_aaaa, 0xffff_ffff,
    ],
];

#[cfg(test)]
mod test {
    use super::*;
    use crate::rng::RNG;

    #[test]
    fn test_van_der_corput_is_stratified() {
        let mut rng = RNG::new();
        let mut samples = vec![0.0; 16];
        van_der_corput(1, 16, &mut samples, &mut rng);
        // One point per stratum of width 1/16
        let mut strata: Vec<usize> = samples.iter().map(|s| (s * 16.0) as usize).collect();
        strata.sort();
        assert_eq!(strata, (0..16).collect::<Vec<_>>());
    }

    #[test]
    fn test_sobol_2d_in_unit_square() {
        let mut rng = RNG::with_sequence(3);
        let mut samples = vec![Point2f::new(0.0, 0.0); 32];
        sobol_2d(2, 16, &mut samples, &mut rng);
        for s in &samples {
            assert!(s.x >= 0.0 && s.x < 1.0 && s.y >= 0.0 && s.y < 1.0);
        }
        // Each 1D projection is a (0, 1)-net too
        let mut strata: Vec<usize> = samples.iter().map(|s| (s.y * 32.0) as usize).collect();
        strata.sort();
        assert_eq!(strata, (0..32).collect::<Vec<_>>());
    }
}
