//! Summary statistics over a run's scores.
//!
//! - [`SummaryStatistics`]: mean, max and min of the recorded scores
//! - [`mean`]: arithmetic mean of a slice

use std::io::Write;

use serde::{Deserialize, Serialize};

/// Aggregated statistics for one run.
///
/// Always satisfies `min <= mean <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of scores.
    pub count: usize,
    /// Mean score.
    pub mean: f64,
    /// Maximum score.
    pub max: f64,
    /// Minimum score.
    pub min: f64,
}

impl SummaryStatistics {
    /// Compute summary statistics for a slice of values.
    ///
    /// Returns `None` if the slice is empty.
    #[must_use]
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        // Summation rounding can push the mean a few ulps past the extremes.
        let mean = mean(values).max(min).min(max);

        Some(Self {
            count: values.len(),
            mean,
            max,
            min,
        })
    }

    /// Write the summary report.
    ///
    /// ```text
    /// Aggregated results:
    /// Mean: 0.500000
    /// Max: 0.500000
    /// Min: 0.500000
    /// ```
    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Aggregated results:")?;
        writeln!(out, "Mean: {:.6}", self.mean)?;
        writeln!(out, "Max: {:.6}", self.max)?;
        writeln!(out, "Min: {:.6}", self.min)?;
        Ok(())
    }
}

/// Compute arithmetic mean.
///
/// # Example
///
/// ```
/// use pair_eval::stats::mean;
///
/// assert!((mean(&[1.0, 2.0, 3.0, 4.0, 5.0]) - 3.0).abs() < 0.001);
/// ```
#[must_use]
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
