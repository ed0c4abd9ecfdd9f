// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

extern crate clap;
extern crate julia_tiles;
extern crate num_cpus;

use clap::{App, Arg, ArgMatches};
use std::str::FromStr;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use julia_tiles::config::parse_complex;
use julia_tiles::{rasterize, render_single, render_threaded, write_pnm, JuliaError, RenderConfig};

fn validate_complex(s: &str, err: &str) -> Result<(), String> {
    match parse_complex(s) {
        Some(_) => Ok(()),
        None => Err(err.to_string()),
    }
}

fn validate_range<T: FromStr + Ord>(
    s: &str,
    low: T,
    high: T,
    isnotanumber_err: &str,
    isnotinrange_err: &str,
) -> Result<(), String> {
    match T::from_str(s) {
        Ok(i) => {
            if i >= low && i <= high {
                Ok(())
            } else {
                Err(isnotinrange_err.to_string())
            }
        }
        Err(_) => Err(isnotanumber_err.to_string()),
    }
}

const OUTPUT: &str = "output";
const WIDTH: &str = "width";
const TILE: &str = "tile";
const ITERATIONS: &str = "iterations";
const CONSTANT: &str = "constant";
const WORKERS: &str = "workers";
const SERIAL: &str = "serial";
const LOG_LEVEL: &str = "log-level";

fn args<'a>() -> ArgMatches<'a> {
    App::new("julia")
        .version("0.1.0")
        .author("Elf M. Sternberg <elf.sternberg@gmail.com>")
        .about("Tiled Julia set renderer")
        .arg(
            Arg::with_name(OUTPUT)
                .required(false)
                .long(OUTPUT)
                .short("o")
                .takes_value(true)
                .default_value("image_out.ppm")
                .help("Output file"),
        )
        .arg(
            Arg::with_name(WIDTH)
                .required(false)
                .long(WIDTH)
                .short("w")
                .takes_value(true)
                .default_value("1024")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_536,
                        "Could not parse image width",
                        "Image width must be between 1 and 65536",
                    )
                })
                .help("Width and height of the output image"),
        )
        .arg(
            Arg::with_name(TILE)
                .required(false)
                .long(TILE)
                .short("t")
                .takes_value(true)
                .default_value("32")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        65_536,
                        "Could not parse tile width",
                        "Tile width must be between 1 and 65536",
                    )
                })
                .help("Width and height of one tile; must divide the image width"),
        )
        .arg(
            Arg::with_name(ITERATIONS)
                .required(false)
                .long(ITERATIONS)
                .short("i")
                .takes_value(true)
                .default_value("1000")
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        1_000_000,
                        "Could not parse iteration count",
                        "Iteration count must be between 1 and 1000000",
                    )
                })
                .help("Maximum number of iterations per point"),
        )
        .arg(
            Arg::with_name(CONSTANT)
                .required(false)
                .long(CONSTANT)
                .short("c")
                .takes_value(true)
                .allow_hyphen_values(true)
                .default_value("0.285,0.01")
                .validator(|s| validate_complex(&s, "Could not parse complex constant"))
                .help("The Julia constant, as re,im"),
        )
        .arg(
            Arg::with_name(WORKERS)
                .required(false)
                .long(WORKERS)
                .short("j")
                .takes_value(true)
                .validator(|s| {
                    validate_range(
                        &s,
                        1,
                        4096,
                        "Could not parse worker count",
                        "Worker count must be between 1 and 4096",
                    )
                })
                .help("Number of worker threads (default: one per CPU)"),
        )
        .arg(
            Arg::with_name(SERIAL)
                .long(SERIAL)
                .help("Render on a single thread without tiling"),
        )
        .arg(
            Arg::with_name(LOG_LEVEL)
                .required(false)
                .long(LOG_LEVEL)
                .takes_value(true)
                .default_value("info")
                .possible_values(&["trace", "debug", "info", "warn", "error"])
                .help("Log level"),
        )
        .get_matches()
}

fn number<T: FromStr>(matches: &ArgMatches, name: &'static str) -> Result<T, JuliaError> {
    let text = matches.value_of(name).unwrap_or_default();
    T::from_str(text).map_err(|_| JuliaError::Parse {
        what: name,
        input: text.to_string(),
    })
}

fn run(matches: &ArgMatches) -> Result<(), JuliaError> {
    let config = RenderConfig::from_text(
        number(matches, WIDTH)?,
        number(matches, TILE)?,
        number(matches, ITERATIONS)?,
        matches.value_of(CONSTANT).unwrap_or_default(),
        if matches.is_present(WORKERS) {
            number(matches, WORKERS)?
        } else {
            num_cpus::get()
        },
    )?;
    let grid = config.grid()?;
    let evaluator = config.evaluator();

    let rendering = if matches.is_present(SERIAL) {
        render_single(&grid, &evaluator)
    } else {
        render_threaded(&grid, &evaluator, config.workers())?
    };
    info!(
        pixels = grid.len(),
        width = config.width(),
        max_iterations = config.max_iterations(),
        seconds = rendering.elapsed.as_secs_f64(),
        "algorithm completed"
    );

    let output = matches.value_of(OUTPUT).unwrap_or("image_out.ppm");
    write_pnm(output, &rasterize(&rendering.grid), config.width())?;
    info!(path = output, "image written");
    Ok(())
}

fn main() {
    let matches = args();

    let level = match matches.value_of(LOG_LEVEL).unwrap_or("info") {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Could not install logger: {}", e);
    }

    if let Err(e) = run(&matches) {
        eprintln!("Render failure: {}", e);
        std::process::exit(1);
    }
}
