//! Batch evaluation of every image pair across two directories.
//!
//! [`Pipeline`] composes the pair matcher, the metric evaluator and the report
//! aggregator. Pairs are processed one at a time in directory-listing order;
//! any error aborts the run and leaves the per-item lines written so far.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::evaluator::evaluate;
use crate::metrics::{Device, MetricFunction};
use crate::pairs::PairMatcher;
use crate::report::{ReportAggregator, ReportPaths, ScoreRecord};
use crate::stats::SummaryStatistics;

/// Configuration for one evaluation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Directory whose listing drives the run.
    pub reference_dir: PathBuf,

    /// Directory searched for same-named counterparts.
    pub comparison_dir: PathBuf,

    /// Per-item and summary report locations.
    pub report_paths: ReportPaths,

    /// Device the metric runs on.
    pub device: Device,
}

impl EvalConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::default()
    }
}

/// Builder for [`EvalConfig`].
#[derive(Debug, Default)]
pub struct EvalConfigBuilder {
    reference_dir: Option<PathBuf>,
    comparison_dir: Option<PathBuf>,
    report_paths: Option<ReportPaths>,
    device: Option<Device>,
}

impl EvalConfigBuilder {
    /// Set the reference directory.
    #[must_use]
    pub fn reference_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.reference_dir = Some(path.into());
        self
    }

    /// Set the comparison directory.
    #[must_use]
    pub fn comparison_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.comparison_dir = Some(path.into());
        self
    }

    /// Set the report locations.
    #[must_use]
    pub fn report_paths(mut self, paths: ReportPaths) -> Self {
        self.report_paths = Some(paths);
        self
    }

    /// Set the device.
    #[must_use]
    pub fn device(mut self, device: Device) -> Self {
        self.device = Some(device);
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a directory or the report paths
    /// are missing, or if both reports point at the same file.
    pub fn build(self) -> Result<EvalConfig> {
        let reference_dir = self
            .reference_dir
            .ok_or_else(|| Error::InvalidParameter("reference_dir is required".to_string()))?;
        let comparison_dir = self
            .comparison_dir
            .ok_or_else(|| Error::InvalidParameter("comparison_dir is required".to_string()))?;
        let report_paths = self
            .report_paths
            .ok_or_else(|| Error::InvalidParameter("report_paths is required".to_string()))?;

        if report_paths.per_item == report_paths.summary {
            return Err(Error::InvalidParameter(format!(
                "per-item and summary reports share one path: {}",
                report_paths.summary.display()
            )));
        }

        Ok(EvalConfig {
            reference_dir,
            comparison_dir,
            report_paths,
            device: self.device.unwrap_or_default(),
        })
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Name of the metric used.
    pub metric: String,
    /// One record per matched pair, in processing order.
    pub records: Vec<ScoreRecord>,
    /// Aggregated statistics.
    pub summary: SummaryStatistics,
}

impl RunReport {
    /// Write this report as pretty-printed JSON.
    pub fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// A configured evaluation pipeline.
///
/// # Example
///
/// ```rust,ignore
/// use pair_eval::{EvalConfig, Pipeline, ReportPaths, StructuralSimilarity};
///
/// let config = EvalConfig::builder()
///     .reference_dir("imgs/ref")
///     .comparison_dir("imgs/distorted")
///     .report_paths(ReportPaths::new("ssim.txt", "ssim_agg.txt"))
///     .build()?;
///
/// let report = Pipeline::new(config, StructuralSimilarity::new())?.run()?;
/// println!("mean SSIM {:.6}", report.summary.mean);
/// ```
pub struct Pipeline<M: MetricFunction> {
    config: EvalConfig,
    metric: M,
}

impl<M: MetricFunction> Pipeline<M> {
    /// Create a pipeline.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedDevice`] if the metric cannot run on the
    /// configured device.
    pub fn new(config: EvalConfig, metric: M) -> Result<Self> {
        if !metric.supports_device(config.device) {
            return Err(Error::UnsupportedDevice {
                metric: metric.name().to_string(),
                device: config.device.to_string(),
            });
        }
        Ok(Self { config, metric })
    }

    /// The run configuration.
    #[must_use]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// The configured metric.
    #[must_use]
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Score every matched pair and write both reports.
    ///
    /// Directory errors are raised before any report file is created.
    pub fn run(&self) -> Result<RunReport> {
        let pairs = PairMatcher::new(&self.config.reference_dir, &self.config.comparison_dir)?;

        info!(
            reference = %self.config.reference_dir.display(),
            comparison = %self.config.comparison_dir.display(),
            metric = self.metric.name(),
            device = %self.config.device,
            "starting evaluation"
        );

        let mut report = ReportAggregator::create(&self.config.report_paths, self.metric.label())?;

        for pair in pairs {
            let pair = pair?;
            let record = evaluate(&pair, &self.metric)?;
            report.record(record)?;
        }

        let summary = report.finalize()?;

        info!(
            pairs = summary.count,
            mean = summary.mean,
            max = summary.max,
            min = summary.min,
            "evaluation finished"
        );

        Ok(RunReport {
            metric: self.metric.name().to_string(),
            records: report.records().to_vec(),
            summary,
        })
    }
}
