#[macro_use]
extern crate slog;

mod argparse;
mod integrators;

use std::path::Path;
use std::time::Instant;

use clap::{value_t, ArgMatches};
use failure::Error;

use raysampler::errors;
use raysampler::film::Film;
use raysampler::integrator::SamplerIntegrator;
use raysampler::logging;
use raysampler::parallel::{num_system_cores, ExecutionPolicy, ParallelOptions, Schedule};
use raysampler::paramset::ParamSet;
use raysampler::renderer::{RenderOptions, Renderer};
use raysampler::sampler::make_sampler;
use raysampler::Point2i;

use crate::integrators::{Checkerboard, SoftShadow};

fn main() {
    let matches = argparse::parse_args();

    if let Err(ref e) = run(&matches) {
        println!("Application error: {}", e);
        ::std::process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let level = if matches.is_present("verbose") {
        slog::Level::Debug
    } else {
        slog::Level::Info
    };
    let log_file = matches.value_of("log-file").unwrap_or("/tmp/raysampler.log");
    let _guard = logging::configure_logger(level, Path::new(log_file))?;

    let resolution = parse_resolution(matches.value_of("resolution").unwrap_or("256x256"))?;
    let sampler_name = matches.value_of("sampler").unwrap_or("random");

    let mut params = ParamSet::default();
    params.add_int("pixelsamples", vec![value_t!(matches, "spp", i32)?]);
    params.add_int("seed", vec![value_t!(matches, "seed", i32)?]);
    if sampler_name != "random" {
        params.add_int("dimensions", vec![value_t!(matches, "dimensions", i32)?]);
    }
    let mut sampler = make_sampler(sampler_name, &mut params)?;

    let threads = if matches.is_present("threads") {
        value_t!(matches, "threads", usize)?
    } else {
        num_system_cores()
    };
    if threads == 0 {
        return Err(errors::Error::invalid_parameter("threads", "must be at least 1").into());
    }
    let schedule: Schedule = matches.value_of("schedule").unwrap_or("seize").parse()?;
    let options = RenderOptions {
        tile_size: positive(value_t!(matches, "tile-size", u32)?, "tile-size")?,
        passes: positive(value_t!(matches, "passes", usize)?, "passes")?,
        policy: if matches.is_present("serial") {
            ExecutionPolicy::Serial
        } else {
            ExecutionPolicy::Parallel
        },
        parallel: ParallelOptions::new(threads, schedule),
        grain_size: positive(value_t!(matches, "grain-size", usize)?, "grain-size")?,
        show_progress: true,
    };
    info!(slog_scope::logger(), "Render options: {:?}", options);

    let integrator: Box<dyn SamplerIntegrator> = match matches.value_of("integrator") {
        Some("checker") => Box::new(Checkerboard { check_size: 8.0 }),
        _ => Box::new(SoftShadow::new(resolution, 8)),
    };

    let film = Film::new(resolution);
    let renderer = Renderer::new(options);
    let start_time = Instant::now();
    if matches.is_present("progressive") {
        renderer.render_progressive(integrator.as_ref(), sampler.as_mut(), &film);
    } else {
        renderer.render(integrator.as_ref(), sampler.as_mut(), &film);
    }
    let duration = start_time.elapsed();

    let output = matches.value_of("output").unwrap_or("image.png");
    image::save_buffer(
        output,
        &film.to_rgb8(),
        resolution.x as u32,
        resolution.y as u32,
        image::ColorType::Rgb8,
    )?;
    println!(
        "Rendered {} in {:.3}s with the \"{}\" sampler ({} spp x {} passes)",
        output,
        duration.as_secs_f64(),
        sampler_name,
        sampler.samples_per_pixel(),
        options.passes
    );

    Ok(())
}

fn parse_resolution(s: &str) -> Result<Point2i, errors::Error> {
    let dims: Vec<&str> = s.split('x').collect();
    if dims.len() != 2 {
        return Err(errors::Error::InvalidResolution(s.to_owned()));
    }
    let parse = |d: &str| {
        d.parse::<i32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| errors::Error::InvalidResolution(s.to_owned()))
    };
    Ok(Point2i::new(parse(dims[0])?, parse(dims[1])?))
}

fn positive<T: PartialOrd + Default>(value: T, name: &str) -> Result<T, errors::Error> {
    if value > T::default() {
        Ok(value)
    } else {
        Err(errors::Error::invalid_parameter(name, "must be at least 1"))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_resolution() {
        assert_eq!(parse_resolution("640x480").unwrap(), Point2i::new(640, 480));
        assert!(parse_resolution("640").is_err());
        assert!(parse_resolution("0x10").is_err());
        assert!(parse_resolution("axb").is_err());
    }
}
