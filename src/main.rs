use std::fs::OpenOptions;
use std::io::{BufWriter, Write};

use clap::Parser;

use path_tracing::demo_scenes;
use path_tracing::renderer::sinks::MemorySink;
use path_tracing::renderer::{RenderParams, RenderStatus, render};

/// A path-tracing renderer
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File to render to (PPM)
    #[arg(short, long)]
    file: String,
    /// How many threads to use
    #[arg(short, long)]
    threads: Option<usize>,
    /// Select a scene to render
    #[arg(short, long, default_value_t = 1)]
    world: usize,
    /// Samples per pixel (rounded up to a perfect square)
    #[arg(short, long, default_value_t = 100)]
    samples: u32,
    /// Image width in pixels
    #[arg(long, default_value_t = 400)]
    width: u32,
    /// Suppress progress output
    #[arg(short, long)]
    quiet: bool,
    /// RNG seed for reproducible renders
    #[arg(long, default_value_t = 42)]
    seed: u64,
}

fn main() {
    let args = Args::parse();

    let threads = args.threads.unwrap_or_else(|| {
        std::thread::available_parallelism()
            .expect("Cannot get the thread count of your system. Specify one when running this program.")
            .get()
    });

    let (scene, cam, aspect) = match args.world {
        1 => {
            let (s, c) = demo_scenes::cornell_box();
            (s, c, 1.0)
        }
        2 => {
            let (s, c) = demo_scenes::three_spheres();
            (s, c, 16.0 / 9.0)
        }
        3 => {
            let (s, c) = demo_scenes::marble_and_clay();
            (s, c, 16.0 / 9.0)
        }
        4 => {
            let (s, c) = demo_scenes::motion_blur();
            (s, c, 2.0)
        }
        _ => {
            eprintln!("Invalid world number. Selecting the Cornell box");
            let (s, c) = demo_scenes::cornell_box();
            (s, c, 1.0)
        }
    };

    if !args.quiet {
        eprintln!("Rendering with {threads} threads.");
    }

    let mut params = RenderParams::new(args.width, aspect);
    params.samples_per_pixel = args.samples;
    params.max_depth = 30;
    params.quiet = args.quiet;
    params.workers = threads;
    params.seed = args.seed;

    let height = ((args.width as f64 / aspect) as u32).max(1);
    let mut sink = MemorySink::new(args.width, height);

    match render(&scene, &cam, &params, &mut sink) {
        Ok(stats) => {
            if stats.status == RenderStatus::Cancelled {
                eprintln!("Render cancelled, writing partial image.");
            }
            if stats.bad_samples > 0 && !args.quiet {
                eprintln!("Suppressed {} bad samples.", stats.bad_samples);
            }

            match write_ppm(&sink, args.file.as_str()) {
                Ok(()) => {
                    eprintln!("Successful render! Image stored at: {}", args.file.as_str());
                }
                Err(e) => {
                    eprintln!("Could not write image. {e}");
                    std::process::exit(1);
                }
            }
        }
        Err(e) => {
            eprintln!("Render failed. {e}");
            std::process::exit(1);
        }
    }
}

fn write_ppm(sink: &MemorySink, fname: &str) -> std::io::Result<()> {
    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(fname)?;
    let mut bw = BufWriter::new(f);

    let (w, h) = (sink.width(), sink.height());
    writeln!(bw, "P3\n{w} {h}\n255")?;

    for row in sink.to_rows() {
        for color in row {
            writeln!(bw, "{color}")?;
        }
    }

    bw.flush()
}
