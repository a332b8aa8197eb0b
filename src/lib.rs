//! # pair-eval
//!
//! Paired-image batch metric evaluation.
//!
//! Every file in a reference directory that has a same-named counterpart in a
//! comparison directory is scored with a pluggable metric. Each score is
//! streamed to a per-item report, and the run ends with a mean/max/min summary
//! report.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use pair_eval::{EvalConfig, MetricKind, Pipeline, ReportPaths};
//!
//! let kind = MetricKind::StructuralSimilarity;
//! let config = EvalConfig::builder()
//!     .reference_dir("imgs/ex_dir0")
//!     .comparison_dir("imgs/ex_dir1")
//!     .report_paths(ReportPaths::for_metric("ssim.txt".as_ref(), kind))
//!     .build()?;
//!
//! let report = Pipeline::new(config, kind.default_metric())?.run()?;
//! println!("Mean: {:.6}", report.summary.mean);
//! ```
//!
//! ## Modules
//!
//! - [`error`]: Error types for the library
//! - [`pairs`]: Matching files across two directories
//! - [`decode`]: Image loading and pixel-format normalization
//! - [`metrics`]: The [`MetricFunction`] trait and the shipped metrics
//! - [`evaluator`]: Scoring a single pair
//! - [`report`]: Per-item and summary reports
//! - [`stats`]: Summary statistics
//! - [`pipeline`]: Configuration and the batch run
//! - [`noise`]: Gaussian noise injection for building test sets

pub mod decode;
pub mod error;
pub mod evaluator;
pub mod metrics;
pub mod noise;
pub mod pairs;
pub mod pipeline;
pub mod report;
pub mod stats;

// Re-export commonly used types
pub use decode::{ImageData, PixelFormat};
pub use error::{Error, Result};
pub use evaluator::evaluate;
pub use metrics::{Device, MetricFunction, MetricKind, PerceptualDistance, StructuralSimilarity};
pub use noise::{NoiseConfig, add_gaussian_noise};
pub use pairs::{ImagePair, PairMatcher};
pub use pipeline::{EvalConfig, Pipeline, RunReport};
pub use report::{ReportAggregator, ReportPaths, ReportState, ScoreRecord};
pub use stats::SummaryStatistics;
