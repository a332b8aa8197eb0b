//! Scoring a single image pair with a configured metric.

use tracing::debug;

use crate::decode::load_image;
use crate::error::{Error, Result};
use crate::metrics::MetricFunction;
use crate::pairs::ImagePair;
use crate::report::ScoreRecord;

/// Decode both images of `pair`, convert them to the metric's pixel format,
/// and compute the score.
///
/// Each call is independent; nothing is accumulated here.
///
/// # Errors
///
/// - [`Error::ImageDecode`] if either file cannot be decoded.
/// - [`Error::DimensionMismatch`] if the two images differ in size.
/// - [`Error::MetricCalculation`] if the metric fails.
/// - [`Error::NonFiniteScore`] if the metric returns NaN or an infinity.
pub fn evaluate<M: MetricFunction + ?Sized>(pair: &ImagePair, metric: &M) -> Result<ScoreRecord> {
    let format = metric.pixel_format();
    let reference = load_image(&pair.reference, format)?;
    let test = load_image(&pair.comparison, format)?;

    if reference.dimensions() != test.dimensions() {
        return Err(Error::DimensionMismatch {
            file: pair.name.clone(),
            expected: reference.dimensions(),
            actual: test.dimensions(),
        });
    }

    let score = metric.compute(&reference, &test).map_err(|e| match e {
        Error::DimensionMismatch { expected, actual, .. } => Error::DimensionMismatch {
            file: pair.name.clone(),
            expected,
            actual,
        },
        other => other,
    })?;

    if !score.is_finite() {
        return Err(Error::NonFiniteScore {
            file: pair.name.clone(),
            value: score,
        });
    }

    debug!(file = %pair.name, metric = metric.name(), score, "scored pair");

    Ok(ScoreRecord::new(pair.name.clone(), score))
}
