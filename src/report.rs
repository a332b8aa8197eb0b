//! Per-item and summary reports for a run.
//!
//! [`ReportAggregator`] streams one line per [`ScoreRecord`] as soon as it is
//! recorded, so an interrupted run leaves a valid prefix of results. The
//! summary report is only written by a successful [`ReportAggregator::finalize`].
//!
//! Scores are also kept in memory until finalization (O(n) in the number of
//! pairs).

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::metrics::MetricKind;
use crate::stats::SummaryStatistics;

/// Score of one evaluated pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Shared filename of the pair.
    pub filename: String,
    /// Metric score (always finite).
    pub score: f64,
}

impl ScoreRecord {
    /// Create a new score record.
    #[must_use]
    pub fn new(filename: impl Into<String>, score: f64) -> Self {
        Self {
            filename: filename.into(),
            score,
        }
    }

    /// Write the per-item report line for this record.
    ///
    /// `a.png: SSIM = 0.912345` with a label, `a.png: 0.912345` without.
    pub fn write_line<W: Write>(&self, out: &mut W, label: Option<&str>) -> std::io::Result<()> {
        match label {
            Some(label) => writeln!(out, "{}: {} = {:.6}", self.filename, label, self.score),
            None => writeln!(out, "{}: {:.6}", self.filename, self.score),
        }
    }
}

/// Output locations of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPaths {
    /// Per-item report, one line per pair.
    pub per_item: PathBuf,
    /// Summary report with the aggregated statistics.
    pub summary: PathBuf,
}

impl ReportPaths {
    /// Use explicit paths.
    #[must_use]
    pub fn new(per_item: impl Into<PathBuf>, summary: impl Into<PathBuf>) -> Self {
        Self {
            per_item: per_item.into(),
            summary: summary.into(),
        }
    }

    /// Derive both paths from one output path, following each metric's
    /// convention:
    ///
    /// - perceptual distance: `out` is the summary, per-item goes to `<stem>_all.txt`;
    /// - structural similarity: `out` is the per-item report, summary goes to `<stem>_agg.txt`.
    #[must_use]
    pub fn for_metric(out: &Path, kind: MetricKind) -> Self {
        match kind {
            MetricKind::PerceptualDistance => Self::new(with_stem_suffix(out, "_all"), out),
            MetricKind::StructuralSimilarity => Self::new(out, with_stem_suffix(out, "_agg")),
        }
    }
}

/// `dists.txt` + `_all` -> `dists_all.txt`; `report` + `_all` -> `report_all`.
fn with_stem_suffix(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}{suffix}.{}", ext.to_string_lossy()),
        None => format!("{stem}{suffix}"),
    };
    path.with_file_name(name)
}

/// Lifecycle of a [`ReportAggregator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportState {
    /// Nothing recorded yet.
    Idle,
    /// At least one record written.
    Recording,
    /// `finalize` was called; terminal.
    Finalized,
}

/// Streams score records to the per-item report and writes the summary.
///
/// Idle -> Recording -> Finalized. Recording or finalizing after
/// finalization fails with [`Error::Lifecycle`].
///
/// # Example
///
/// ```ignore
/// use pair_eval::report::{ReportAggregator, ReportPaths, ScoreRecord};
///
/// let paths = ReportPaths::new("out/scores.txt", "out/summary.txt");
/// let mut report = ReportAggregator::create(&paths, Some("SSIM"))?;
/// report.record(ScoreRecord::new("a.png", 0.93))?;
/// let summary = report.finalize()?;
/// ```
#[derive(Debug)]
pub struct ReportAggregator<W: Write = BufWriter<File>> {
    per_item: Option<W>,
    summary_path: PathBuf,
    label: Option<String>,
    records: Vec<ScoreRecord>,
    state: ReportState,
}

impl ReportAggregator<BufWriter<File>> {
    /// Create (or truncate) the per-item report file.
    ///
    /// A summary left over from an earlier run is removed; a new one is only
    /// written by [`finalize`](Self::finalize).
    pub fn create(paths: &ReportPaths, label: Option<&str>) -> Result<Self> {
        for path in [&paths.per_item, &paths.summary] {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
        }

        let file = File::create(&paths.per_item)?;
        debug!(path = %paths.per_item.display(), "opened per-item report");

        match fs::remove_file(&paths.summary) {
            Ok(()) => debug!(path = %paths.summary.display(), "removed stale summary report"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }

        Ok(Self::from_writer(BufWriter::new(file), &paths.summary, label))
    }
}

impl<W: Write> ReportAggregator<W> {
    /// Stream per-item lines to `per_item`; the summary goes to `summary_path`.
    pub fn from_writer(per_item: W, summary_path: impl Into<PathBuf>, label: Option<&str>) -> Self {
        Self {
            per_item: Some(per_item),
            summary_path: summary_path.into(),
            label: label.map(str::to_string),
            records: Vec::new(),
            state: ReportState::Idle,
        }
    }

    /// Write the record's line, flush it, and keep the score for aggregation.
    pub fn record(&mut self, record: ScoreRecord) -> Result<()> {
        if self.state == ReportState::Finalized {
            return Err(Error::Lifecycle(format!(
                "cannot record {} after finalize",
                record.filename
            )));
        }

        let out = self
            .per_item
            .as_mut()
            .ok_or_else(|| Error::Lifecycle("per-item report is closed".to_string()))?;
        record.write_line(out, self.label.as_deref())?;
        out.flush()?;

        self.records.push(record);
        self.state = ReportState::Recording;
        Ok(())
    }

    /// Close the per-item report, compute the statistics and write the
    /// summary report.
    ///
    /// Any call moves the aggregator to [`ReportState::Finalized`].
    ///
    /// # Errors
    ///
    /// - [`Error::Lifecycle`] if already finalized.
    /// - [`Error::EmptyResultSet`] if nothing was recorded; no summary is written.
    pub fn finalize(&mut self) -> Result<SummaryStatistics> {
        if self.state == ReportState::Finalized {
            return Err(Error::Lifecycle("finalize called more than once".to_string()));
        }
        self.state = ReportState::Finalized;

        if let Some(mut out) = self.per_item.take() {
            out.flush()?;
        }

        let summary = SummaryStatistics::compute(&self.scores()).ok_or(Error::EmptyResultSet)?;

        let mut rendered = Vec::new();
        summary.write_report(&mut rendered)?;
        fs::write(&self.summary_path, rendered)?;
        debug!(path = %self.summary_path.display(), "wrote summary report");

        Ok(summary)
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ReportState {
        self.state
    }

    /// Records in the order they were recorded.
    #[must_use]
    pub fn records(&self) -> &[ScoreRecord] {
        &self.records
    }

    /// Recorded scores in order.
    #[must_use]
    pub fn scores(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.score).collect()
    }

    /// Path the summary is written to.
    #[must_use]
    pub fn summary_path(&self) -> &Path {
        &self.summary_path
    }
}
