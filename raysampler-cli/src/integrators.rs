use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use raysampler::camera::CameraSample;
use raysampler::integrator::SamplerIntegrator;
use raysampler::sampler::Sampler;
use raysampler::{Point2f, Point2i};

/// Map a point of the unit square to the unit disk, preserving
/// stratification.
pub fn concentric_sample_disk(u: Point2f) -> Point2f {
    let ux = 2.0 * u.x - 1.0;
    let uy = 2.0 * u.y - 1.0;
    if ux == 0.0 && uy == 0.0 {
        return Point2f::new(0.0, 0.0);
    }
    let (r, theta) = if ux.abs() > uy.abs() {
        (ux, FRAC_PI_4 * (uy / ux))
    } else {
        (uy, FRAC_PI_2 - FRAC_PI_4 * (ux / uy))
    };
    Point2f::new(r * theta.cos(), r * theta.sin())
}

/// A ground plane lit by a disk shaped light, with a smaller disk halfway
/// up that casts a soft shadow. Each camera sample traces `n_light_samples`
/// shadow rays, taken from a per-pixel sample array when the sampler
/// provides one.
pub struct SoftShadow {
    resolution: Point2i,
    n_light_samples: usize,
}

const LIGHT_HEIGHT: f32 = 2.0;
const LIGHT_RADIUS: f32 = 0.6;
const OCCLUDER_CENTRE: (f32, f32) = (0.15, 0.1);
const OCCLUDER_RADIUS: f32 = 0.3;

impl SoftShadow {
    pub fn new(resolution: Point2i, n_light_samples: usize) -> SoftShadow {
        SoftShadow {
            resolution,
            n_light_samples,
        }
    }

    /// Radiance reaching ground point `(px, py)` from the light point under
    /// sample `u`.
    fn light_contribution(&self, px: f32, py: f32, u: Point2f) -> f32 {
        let d = concentric_sample_disk(u);
        let (lx, ly) = (d.x * LIGHT_RADIUS, d.y * LIGHT_RADIUS);
        // The occluder sits at half the light's height, so the shadow ray
        // crosses its plane at the midpoint.
        let (mx, my) = (0.5 * (px + lx), 0.5 * (py + ly));
        let (ox, oy) = (mx - OCCLUDER_CENTRE.0, my - OCCLUDER_CENTRE.1);
        if ox * ox + oy * oy < OCCLUDER_RADIUS * OCCLUDER_RADIUS {
            return 0.0;
        }
        let dist2 = (lx - px).powi(2) + (ly - py).powi(2) + LIGHT_HEIGHT * LIGHT_HEIGHT;
        let cos_theta = LIGHT_HEIGHT / dist2.sqrt();
        // cos at both ends, over squared distance, normalised so the point
        // straight under the light gets 1
        cos_theta * cos_theta * LIGHT_HEIGHT * LIGHT_HEIGHT / dist2
    }
}

impl SamplerIntegrator for SoftShadow {
    fn preprocess(&self, sampler: &mut dyn Sampler) {
        let n = sampler.round_count(self.n_light_samples);
        sampler.request_2d_array(n);
    }

    fn li(&self, camera_sample: &CameraSample, sampler: &mut dyn Sampler) -> [f32; 3] {
        let px = 2.0 * camera_sample.p_film.x / self.resolution.x as f32 - 1.0;
        let py = 2.0 * camera_sample.p_film.y / self.resolution.y as f32 - 1.0;
        let n = sampler.round_count(self.n_light_samples);
        let from_array = sampler.get_2d_array(n).map(|samples| {
            samples
                .iter()
                .map(|u| self.light_contribution(px, py, *u))
                .sum::<f32>()
        });
        let sum = match from_array {
            Some(sum) => sum,
            None => (0..n)
                .map(|_| {
                    let u = sampler.get_2d();
                    self.light_contribution(px, py, u)
                })
                .sum::<f32>(),
        };
        let l = sum / n as f32;
        [l, l * 0.9, l * 0.75]
    }
}

/// A black and white checkerboard. Only the camera sample is used, so this
/// shows how well a sampler antialiases edges.
pub struct Checkerboard {
    pub check_size: f32,
}

impl SamplerIntegrator for Checkerboard {
    fn li(&self, camera_sample: &CameraSample, _sampler: &mut dyn Sampler) -> [f32; 3] {
        let cx = (camera_sample.p_film.x / self.check_size).floor() as i64;
        let cy = (camera_sample.p_film.y / self.check_size).floor() as i64;
        if (cx + cy) % 2 == 0 {
            [1.0; 3]
        } else {
            [0.0; 3]
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use raysampler::sampler::RandomSampler;

    #[test]
    fn test_disk_samples_stay_in_disk() {
        for &(x, y) in &[(0.0, 0.0), (1.0, 1.0), (0.5, 0.5), (0.9, 0.1), (0.25, 0.8)] {
            let p = concentric_sample_disk(Point2f::new(x, y));
            assert!(p.x * p.x + p.y * p.y <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_soft_shadow_requests_array() {
        let integrator = SoftShadow::new(Point2i::new(8, 8), 4);
        let mut sampler = RandomSampler::new(2, 0);
        integrator.preprocess(&mut sampler);
        sampler.start_pixel(Point2i::new(0, 0));
        let cs = sampler.get_camera_sample(Point2i::new(0, 0));
        let l = integrator.li(&cs, &mut sampler);
        assert!(l[0] >= 0.0 && l[0] <= 1.0);
        // The array was consumed for this sample
        assert!(sampler.get_2d_array(4).is_none());
    }

    #[test]
    fn test_checker() {
        let checker = Checkerboard { check_size: 4.0 };
        let mut sampler = RandomSampler::new(1, 0);
        let white = CameraSample {
            p_film: Point2f::new(1.0, 1.0),
        };
        let black = CameraSample {
            p_film: Point2f::new(5.0, 1.0),
        };
        assert_eq!(checker.li(&white, &mut sampler), [1.0; 3]);
        assert_eq!(checker.li(&black, &mut sampler), [0.0; 3]);
    }
}
