//! Noise injection command.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pair_eval::NoiseConfig;
use pair_eval::noise::process_directory;

pub fn run(
    input_folder: PathBuf,
    output_folder: PathBuf,
    mean: f32,
    std: f32,
    seed: Option<u64>,
) -> Result<()> {
    let config = NoiseConfig { mean, std_dev: std, seed };

    let written = process_directory(&input_folder, &output_folder, &config).with_context(|| {
        format!("Failed to add noise to images in {}", input_folder.display())
    })?;

    println!("Wrote {} noisy images to {}", written, output_folder.display());
    Ok(())
}
