use clap::{App, Arg, ArgMatches};

pub fn parse_args<'a>() -> ArgMatches<'a> {
    App::new("raysampler")
        .version("0.1")
        .author("Antoine Büsch")
        .about("Renders analytic test scenes to compare pixel samplers")
        .arg(
            Arg::with_name("output")
                .long("output")
                .short("o")
                .help("Output file name")
                .default_value("image.png"),
        )
        .arg(
            Arg::with_name("sampler")
                .long("sampler")
                .short("s")
                .help("Pixel sampler (random, 02sequence, lowdiscrepancy)")
                .default_value("random"),
        )
        .arg(
            Arg::with_name("spp")
                .long("spp")
                .help("Samples per pixel")
                .default_value("16"),
        )
        .arg(
            Arg::with_name("dimensions")
                .long("dimensions")
                .help("Number of sampled dimensions for the low discrepancy sampler")
                .default_value("4"),
        )
        .arg(
            Arg::with_name("seed")
                .long("seed")
                .help("Base seed for the sampler")
                .default_value("0"),
        )
        .arg(
            Arg::with_name("integrator")
                .long("integrator")
                .short("i")
                .help("Scene to render")
                .possible_values(&["disk", "checker"])
                .default_value("disk"),
        )
        .arg(
            Arg::with_name("resolution")
                .long("resolution")
                .short("r")
                .help("Image resolution, as WIDTHxHEIGHT")
                .default_value("256x256"),
        )
        .arg(
            Arg::with_name("threads")
                .long("threads")
                .short("t")
                .help("Number of worker threads")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("schedule")
                .long("schedule")
                .help("How loop indices are distributed between threads")
                .possible_values(&["static", "seize", "dynamic"])
                .default_value("seize"),
        )
        .arg(
            Arg::with_name("serial")
                .long("serial")
                .help("Render on the calling thread only"),
        )
        .arg(
            Arg::with_name("tile-size")
                .long("tile-size")
                .help("Edge length of the tiles handed out to threads")
                .default_value("16"),
        )
        .arg(
            Arg::with_name("grain-size")
                .long("grain-size")
                .help("Number of tiles a thread takes at once")
                .default_value("1"),
        )
        .arg(
            Arg::with_name("passes")
                .long("passes")
                .help("Number of passes over the image")
                .default_value("1"),
        )
        .arg(
            Arg::with_name("progressive")
                .long("progressive")
                .help("Keep worker threads alive across passes"),
        )
        .arg(
            Arg::with_name("log-file")
                .long("log-file")
                .help("Where to write the log")
                .default_value("/tmp/raysampler.log"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .help("log debug information"),
        )
        .get_matches()
}
