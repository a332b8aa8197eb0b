//! Perceptual distance metric.
//!
//! Butteraugli is a perceptual image quality model developed by Google.
//! Lower scores indicate more similar images.
//!
//! Score interpretation:
//! - < 1.0: Imperceptible difference
//! - < 2.0: Marginal difference
//! - < 3.0: Subtle difference
//! - < 5.0: Noticeable difference
//! - >= 5.0: Degraded

use butteraugli::{ButteraugliParams, butteraugli};
use imgref::{ImgRef, ImgVec};
use rgb::RGB8;

use crate::decode::{ImageData, PixelFormat};
use crate::error::{Error, Result};
use crate::metrics::MetricFunction;

/// Default display intensity target in nits.
pub const DEFAULT_INTENSITY_TARGET: f32 = 80.0;

/// Butteraugli perceptual distance on RGB8 input. Reported without a label.
///
/// Images smaller than 8x8 are rejected by Butteraugli and surface as
/// [`Error::MetricCalculation`].
#[derive(Debug, Clone, Copy)]
pub struct PerceptualDistance {
    intensity_target: f32,
}

impl Default for PerceptualDistance {
    fn default() -> Self {
        Self {
            intensity_target: DEFAULT_INTENSITY_TARGET,
        }
    }
}

impl PerceptualDistance {
    /// Create the metric with the default intensity target.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the display intensity target in nits.
    #[must_use]
    pub fn with_intensity_target(mut self, nits: f32) -> Self {
        self.intensity_target = nits;
        self
    }

    /// The configured intensity target in nits.
    #[must_use]
    pub fn intensity_target(&self) -> f32 {
        self.intensity_target
    }

    fn distance(&self, reference: ImgRef<'_, RGB8>, test: ImgRef<'_, RGB8>) -> Result<f64> {
        let params = ButteraugliParams::default().with_intensity_target(self.intensity_target);
        let result = butteraugli(reference, test, &params).map_err(|e| Error::MetricCalculation {
            metric: self.name().to_string(),
            reason: e.to_string(),
        })?;
        Ok(result.score)
    }
}

impl MetricFunction for PerceptualDistance {
    fn name(&self) -> &str {
        "Butteraugli"
    }

    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Rgb8
    }

    fn compute(&self, reference: &ImageData, test: &ImageData) -> Result<f64> {
        match (reference, test) {
            (ImageData::Rgb8(reference), ImageData::Rgb8(test)) => {
                self.distance(reference.as_ref(), test.as_ref())
            }
            _ => {
                let reference = widen_to_rgb8(reference);
                let test = widen_to_rgb8(test);
                self.distance(reference.as_ref(), test.as_ref())
            }
        }
    }
}

fn widen_to_rgb8(image: &ImageData) -> ImgVec<RGB8> {
    let pixels: Vec<RGB8> = image
        .to_rgb8_vec()
        .chunks_exact(3)
        .map(|c| RGB8::new(c[0], c[1], c[2]))
        .collect();
    ImgVec::new(pixels, image.width(), image.height())
}
