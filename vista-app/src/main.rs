//! Vista scene loader
//!
//! Loads a COLMAP dataset, writes `input.ply` and `cameras.json` to the
//! output directory and reports the cameras built for each resolution scale.

mod app;

use clap::Parser;
use std::path::PathBuf;

/// Vista - COLMAP scene loading for Gaussian splatting
#[derive(Parser, Debug)]
#[command(name = "vista")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Dataset directory containing `sparse/0` and the image folder
    #[arg(short, long)]
    source: PathBuf,

    /// Directory for `input.ply` and `cameras.json`
    #[arg(short, long)]
    output: PathBuf,

    /// JSON file with loader options; flags below override it
    #[arg(long)]
    config: Option<PathBuf>,

    /// Image folder name inside the source directory
    #[arg(short, long)]
    images: Option<String>,

    /// Hold out every 8th camera for evaluation
    #[arg(long)]
    eval: bool,

    /// Keep cameras in name order
    #[arg(long)]
    no_shuffle: bool,

    /// Seed for the camera shuffle (random when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Resolution scale to build cameras at (repeatable)
    #[arg(long = "scale", default_values_t = vec![1.0])]
    scales: Vec<f32>,

    /// `auto`, a divisor 1|2|4|8, or a target width in pixels
    #[arg(short, long)]
    resolution: Option<String>,

    /// `cpu`, `gpu` or `gpu:N`
    #[arg(short, long)]
    device: Option<String>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    app::init_logging(&args.log_level);

    if let Err(e) = app::run(args) {
        eprintln!("Application error: {}", e);
        std::process::exit(1);
    }
}
