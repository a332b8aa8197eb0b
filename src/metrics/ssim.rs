//! Structural similarity (SSIM) metric.
//!
//! Wraps the `dssim-core` crate. DSSIM is defined as `1/SSIM - 1`, so the
//! structural similarity reported here is `1 / (1 + DSSIM)`: 1.0 for identical
//! images, decreasing as structure diverges.

use dssim_core::Dssim;
use imgref::ImgVec;
use rgb::RGBA;

use crate::decode::{ImageData, PixelFormat};
use crate::error::{Error, Result};
use crate::metrics::MetricFunction;

/// SSIM on the luma channel, labelled `SSIM` in reports.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuralSimilarity;

impl StructuralSimilarity {
    /// Create the metric.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl MetricFunction for StructuralSimilarity {
    fn name(&self) -> &str {
        "SSIM"
    }

    fn label(&self) -> Option<&str> {
        Some("SSIM")
    }

    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Luma8
    }

    fn compute(&self, reference: &ImageData, test: &ImageData) -> Result<f64> {
        if reference.dimensions() != test.dimensions() {
            return Err(Error::DimensionMismatch {
                file: String::new(),
                expected: reference.dimensions(),
                actual: test.dimensions(),
            });
        }

        let dssim = Dssim::new();
        let prepare = |image: &ImageData, role: &str| {
            dssim
                .create_image(&to_dssim_image(image))
                .ok_or_else(|| Error::MetricCalculation {
                    metric: self.name().to_string(),
                    reason: format!("{role} image too small for SSIM"),
                })
        };
        let reference = prepare(reference, "reference")?;
        let test = prepare(test, "comparison")?;

        let (dssim_value, _maps) = dssim.compare(&reference, test);
        Ok(ssim_from_dssim(f64::from(dssim_value)))
    }
}

/// Convert a DSSIM value to structural similarity.
#[must_use]
pub fn ssim_from_dssim(dssim: f64) -> f64 {
    1.0 / (1.0 + dssim)
}

fn to_dssim_image(image: &ImageData) -> ImgVec<RGBA<f32>> {
    match image {
        ImageData::Luma8(img) => luma8_to_dssim_image(img),
        ImageData::Rgb8(img) => {
            let pixels: Vec<RGBA<f32>> = img
                .pixels()
                .map(|p| RGBA {
                    r: f32::from(p.r) / 255.0,
                    g: f32::from(p.g) / 255.0,
                    b: f32::from(p.b) / 255.0,
                    a: 1.0,
                })
                .collect();
            ImgVec::new(pixels, img.width(), img.height())
        }
    }
}

/// Convert 8-bit luma to the format needed for DSSIM calculation.
///
/// The luma value is replicated into R, G and B; alpha is opaque.
#[must_use]
pub fn luma8_to_dssim_image(img: &ImgVec<u8>) -> ImgVec<RGBA<f32>> {
    let pixels: Vec<RGBA<f32>> = img
        .pixels()
        .map(|l| {
            let v = f32::from(l) / 255.0;
            RGBA { r: v, g: v, b: v, a: 1.0 }
        })
        .collect();

    ImgVec::new(pixels, img.width(), img.height())
}
