//! Metric functions for comparing an image pair.
//!
//! A [`MetricFunction`] turns two same-shaped images into one scalar. The
//! pipeline is written against the trait, so any metric can be plugged in.
//! Two are shipped:
//!
//! - [`PerceptualDistance`]: Butteraugli perceptual distance (lower is better,
//!   0 = identical). Reported without a label.
//! - [`StructuralSimilarity`]: SSIM on the luma channel via `dssim-core`
//!   (higher is better, 1 = identical). Reported with the `SSIM` label.
//!
//! ## Perception thresholds
//!
//! | Level | Butteraugli | SSIM |
//! |-------|-------------|------|
//! | Imperceptible | < 1.0 | > 0.9997 |
//! | Noticeable | < 3.0 | > 0.997 |
//! | Degraded | >= 3.0 | <= 0.997 |

pub mod perceptual;
pub mod ssim;

use serde::{Deserialize, Serialize};

use crate::decode::{ImageData, PixelFormat};
use crate::error::Result;

pub use perceptual::PerceptualDistance;
pub use ssim::StructuralSimilarity;

/// A configured scalar metric over an image pair.
///
/// Implementations must be deterministic for identical inputs and must not
/// keep mutable state between calls. Any expensive setup (model weights,
/// device placement) happens before the pipeline starts.
pub trait MetricFunction {
    /// Metric name used in logs and error messages.
    fn name(&self) -> &str;

    /// Label written in per-item report lines, if any.
    ///
    /// `Some("SSIM")` produces `a.png: SSIM = 0.912345`; `None` produces
    /// `a.png: 0.912345`.
    fn label(&self) -> Option<&str> {
        None
    }

    /// Pixel format both images are converted to before [`compute`](Self::compute).
    fn pixel_format(&self) -> PixelFormat {
        PixelFormat::Rgb8
    }

    /// Whether the metric can run on `device`.
    fn supports_device(&self, device: Device) -> bool {
        device == Device::Cpu
    }

    /// Score `test` against `reference`.
    ///
    /// Both images have the same dimensions and the format returned by
    /// [`pixel_format`](Self::pixel_format).
    fn compute(&self, reference: &ImageData, test: &ImageData) -> Result<f64>;
}

impl<M: MetricFunction + ?Sized> MetricFunction for Box<M> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn label(&self) -> Option<&str> {
        (**self).label()
    }

    fn pixel_format(&self) -> PixelFormat {
        (**self).pixel_format()
    }

    fn supports_device(&self, device: Device) -> bool {
        (**self).supports_device(device)
    }

    fn compute(&self, reference: &ImageData, test: &ImageData) -> Result<f64> {
        (**self).compute(reference, test)
    }
}

/// The metrics shipped with this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricKind {
    /// Perceptual distance (Butteraugli).
    PerceptualDistance,
    /// Structural similarity (SSIM).
    StructuralSimilarity,
}

impl MetricKind {
    /// Build the metric with default settings.
    #[must_use]
    pub fn default_metric(self) -> Box<dyn MetricFunction> {
        match self {
            Self::PerceptualDistance => Box::new(PerceptualDistance::new()),
            Self::StructuralSimilarity => Box::new(StructuralSimilarity::new()),
        }
    }

    /// Whether higher scores mean more similar images.
    #[must_use]
    pub fn higher_is_better(self) -> bool {
        matches!(self, Self::StructuralSimilarity)
    }
}

impl std::fmt::Display for MetricKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PerceptualDistance => write!(f, "perceptual"),
            Self::StructuralSimilarity => write!(f, "ssim"),
        }
    }
}

/// Device a metric runs on, fixed once at pipeline construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    /// Host CPU.
    #[default]
    Cpu,
    /// GPU or other accelerator.
    Accelerator,
}

impl std::fmt::Display for Device {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Accelerator => write!(f, "accelerator"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_kind_labels() {
        assert_eq!(MetricKind::PerceptualDistance.default_metric().label(), None);
        assert_eq!(
            MetricKind::StructuralSimilarity.default_metric().label(),
            Some("SSIM")
        );
    }

    #[test]
    fn test_metric_kind_direction() {
        assert!(!MetricKind::PerceptualDistance.higher_is_better());
        assert!(MetricKind::StructuralSimilarity.higher_is_better());
    }

    #[test]
    fn test_builtin_metrics_are_cpu_only() {
        for kind in [MetricKind::PerceptualDistance, MetricKind::StructuralSimilarity] {
            let metric = kind.default_metric();
            assert!(metric.supports_device(Device::Cpu));
            assert!(!metric.supports_device(Device::Accelerator));
        }
    }

    #[test]
    fn test_metric_kind_serde() {
        let json = serde_json::to_string(&MetricKind::StructuralSimilarity).unwrap();
        assert_eq!(json, "\"structural_similarity\"");
        assert_eq!(MetricKind::PerceptualDistance.to_string(), "perceptual");
    }
}
