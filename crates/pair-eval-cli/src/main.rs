//! pair-eval CLI - paired-image metric evaluation and noise injection

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;
mod logging;

/// Score image pairs across two directories, or build noisy test sets.
#[derive(Parser)]
#[command(name = "pair-eval")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output (debug-level logs, one line per pair)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Perceptual distance (Butteraugli) between same-named images
    Perceptual {
        /// Reference image directory
        #[arg(long = "dir0", visible_alias = "d0", default_value = "./imgs/ex_dir0")]
        dir0: PathBuf,

        /// Comparison image directory
        #[arg(long = "dir1", visible_alias = "d1", default_value = "./imgs/ex_dir1")]
        dir1: PathBuf,

        /// Summary report; per-item lines go to <stem>_all.txt
        #[arg(short, long, default_value = "./imgs/example_dists.txt")]
        out: PathBuf,

        /// Display intensity target in nits
        #[arg(long, default_value_t = 80.0)]
        intensity_target: f32,

        /// Run the metric on an accelerator
        #[arg(long)]
        use_gpu: bool,

        /// Also write all records and the summary as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Structural similarity (SSIM) between same-named images
    Ssim {
        /// Reference image directory
        #[arg(long = "dir0", visible_alias = "d0")]
        dir0: PathBuf,

        /// Comparison image directory
        #[arg(long = "dir1", visible_alias = "d1")]
        dir1: PathBuf,

        /// Per-item report; the summary goes to <stem>_agg.txt
        #[arg(short, long)]
        out: PathBuf,

        /// Also write all records and the summary as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Add Gaussian noise to every image in a folder
    Noise {
        /// Input image folder
        #[arg(long)]
        input_folder: PathBuf,

        /// Output folder for the noisy images (created if missing)
        #[arg(long)]
        output_folder: PathBuf,

        /// Mean of the Gaussian noise
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        mean: f32,

        /// Standard deviation of the Gaussian noise
        #[arg(long, default_value_t = 25.0)]
        std: f32,

        /// RNG seed for reproducible noise
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match cli.command {
        Commands::Perceptual { dir0, dir1, out, intensity_target, use_gpu, json } => {
            commands::score::run_perceptual(dir0, dir1, out, intensity_target, use_gpu, json)
        }
        Commands::Ssim { dir0, dir1, out, json } => commands::score::run_ssim(dir0, dir1, out, json),
        Commands::Noise { input_folder, output_folder, mean, std, seed } => {
            commands::noise::run(input_folder, output_folder, mean, std, seed)
        }
    }
}
