//! Synthetic Gaussian noise injection.
//!
//! Each channel value becomes `clip(v + n, 0, 255)` with `n ~ Normal(mean, std_dev)`,
//! truncated back to 8 bits. Used to produce distorted directories for the
//! pair evaluation pipeline.

use std::fs;
use std::path::{Path, PathBuf};

use image::RgbImage;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Parameters for [`process_directory`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NoiseConfig {
    /// Mean of the noise distribution.
    pub mean: f32,
    /// Standard deviation of the noise distribution.
    pub std_dev: f32,
    /// RNG seed; `None` draws from system entropy.
    pub seed: Option<u64>,
}

impl Default for NoiseConfig {
    fn default() -> Self {
        Self {
            mean: 0.0,
            std_dev: 25.0,
            seed: None,
        }
    }
}

impl NoiseConfig {
    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

/// Return a copy of `image` with Gaussian noise added to every channel.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `mean` is not finite or `std_dev`
/// is negative or not finite.
pub fn add_gaussian_noise<R: Rng + ?Sized>(
    image: &RgbImage,
    mean: f32,
    std_dev: f32,
    rng: &mut R,
) -> Result<RgbImage> {
    if !mean.is_finite() {
        return Err(Error::InvalidParameter(format!("noise mean must be finite, got {mean}")));
    }
    if !std_dev.is_finite() || std_dev < 0.0 {
        return Err(Error::InvalidParameter(format!(
            "noise std_dev must be finite and non-negative, got {std_dev}"
        )));
    }
    let normal = Normal::new(mean, std_dev).map_err(|e| {
        Error::InvalidParameter(format!("noise std_dev {std_dev}: {e}"))
    })?;

    let mut noisy = image.clone();
    for value in noisy.iter_mut() {
        let n: f32 = normal.sample(rng);
        *value = (f32::from(*value) + n).clamp(0.0, 255.0) as u8;
    }
    Ok(noisy)
}

/// Add noise to every image in `input` and save the results under the same
/// filenames in `output`.
///
/// `output` is created if needed. Files are processed in name order so a
/// seeded run is reproducible. Subdirectories are ignored.
///
/// # Returns
///
/// The number of images written.
///
/// # Errors
///
/// - [`Error::DirectoryAccess`] if `input` cannot be listed.
/// - [`Error::ImageDecode`] if a file in `input` is not a decodable image.
/// - [`Error::ImageEncode`] if a noisy image cannot be saved.
pub fn process_directory(input: &Path, output: &Path, config: &NoiseConfig) -> Result<usize> {
    let entries = fs::read_dir(input).map_err(|e| Error::directory_access(input, e))?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| Error::directory_access(input, e))?.path();
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();

    fs::create_dir_all(output)?;
    info!(
        input = %input.display(),
        output = %output.display(),
        images = files.len(),
        mean = config.mean,
        std_dev = config.std_dev,
        "adding gaussian noise"
    );

    let mut rng = config.rng();
    for path in &files {
        let image = image::open(path)
            .map_err(|e| Error::image_decode(path, e))?
            .to_rgb8();
        let noisy = add_gaussian_noise(&image, config.mean, config.std_dev, &mut rng)?;

        let Some(name) = path.file_name() else { continue };
        let target = output.join(name);
        noisy.save(&target).map_err(|e| Error::ImageEncode {
            path: target.clone(),
            reason: e.to_string(),
        })?;
        debug!(path = %target.display(), "wrote noisy image");
    }

    Ok(files.len())
}
