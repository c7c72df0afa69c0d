use crate::atomic::AtomicFloat;
use crate::{clamp, Bounds2i, Point2f, Point2i};

#[derive(Default, Debug)]
struct Pixel {
    rgb: [AtomicFloat; 3],
    weight_sum: AtomicFloat,
}

/// Image accumulation buffer shared by all render threads.
///
/// Every channel is an `AtomicFloat`, so any thread may add a sample to any
/// pixel without locking. Samples are box filtered: each one only
/// contributes to the pixel it falls in.
pub struct Film {
    pub resolution: Point2i,
    pub bounds: Bounds2i,
    pixels: Vec<Pixel>,
}

impl Film {
    pub fn new(resolution: Point2i) -> Film {
        let bounds = Bounds2i::from_points(&Point2i::new(0, 0), &resolution);
        let mut pixels = Vec::with_capacity(bounds.area() as usize);
        pixels.resize_with(bounds.area() as usize, Pixel::default);
        info!(
            slog_scope::logger(),
            "Created film with resolution {}", resolution
        );
        Film {
            resolution,
            bounds,
            pixels,
        }
    }

    fn offset(&self, p: Point2i) -> usize {
        (p.y * self.resolution.x + p.x) as usize
    }

    /// Add a radiance sample taken at `p_film` (raster space).
    pub fn add_sample(&self, p_film: Point2f, rgb: [f32; 3]) {
        if rgb.iter().any(|c| c.is_nan()) {
            warn!(slog_scope::logger(), "colour has NaNs! Ignoring");
            return;
        }
        let p = p_film.floor();
        if !self.bounds.inside_exclusive(&p) {
            return;
        }
        let pixel = &self.pixels[self.offset(p)];
        for (channel, c) in pixel.rgb.iter().zip(rgb.iter()) {
            channel.add(*c);
        }
        pixel.weight_sum.add(1.0);
    }

    /// Number of samples that landed in pixel `p`.
    pub fn sample_count(&self, p: Point2i) -> f32 {
        self.pixels[self.offset(p)].weight_sum.load()
    }

    /// Average of the samples in pixel `p`, black if there are none.
    pub fn pixel(&self, p: Point2i) -> [f32; 3] {
        let pixel = &self.pixels[self.offset(p)];
        let weight = pixel.weight_sum.load();
        if weight == 0.0 {
            return [0.0; 3];
        }
        [
            pixel.rgb[0].load() / weight,
            pixel.rgb[1].load() / weight,
            pixel.rgb[2].load() / weight,
        ]
    }

    /// 8 bit sRGB buffer of the current image, scanline order.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.pixels.len() * 3);
        for p in &self.bounds {
            for c in self.pixel(p).iter() {
                buffer.push(to_byte(gamma_correct(*c)));
            }
        }
        buffer
    }
}

fn gamma_correct(v: f32) -> f32 {
    if v <= 0.003_130_8 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

fn to_byte(v: f32) -> u8 {
    clamp(255.0 * v + 0.5, 0.0, 255.0) as u8
}
