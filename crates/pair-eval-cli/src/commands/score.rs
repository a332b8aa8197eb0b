//! Scoring commands: perceptual distance and structural similarity.

use std::path::PathBuf;

use anyhow::{Context, Result};
use pair_eval::{
    Device, EvalConfig, MetricFunction, MetricKind, PerceptualDistance, Pipeline, ReportPaths,
    RunReport, StructuralSimilarity,
};

pub fn run_perceptual(
    dir0: PathBuf,
    dir1: PathBuf,
    out: PathBuf,
    intensity_target: f32,
    use_gpu: bool,
    json: Option<PathBuf>,
) -> Result<()> {
    let metric = PerceptualDistance::new().with_intensity_target(intensity_target);
    let device = if use_gpu { Device::Accelerator } else { Device::Cpu };
    let paths = ReportPaths::for_metric(&out, MetricKind::PerceptualDistance);
    run_metric(dir0, dir1, paths, device, metric, json)
}

pub fn run_ssim(dir0: PathBuf, dir1: PathBuf, out: PathBuf, json: Option<PathBuf>) -> Result<()> {
    let paths = ReportPaths::for_metric(&out, MetricKind::StructuralSimilarity);
    run_metric(dir0, dir1, paths, Device::Cpu, StructuralSimilarity::new(), json)
}

fn run_metric<M: MetricFunction>(
    dir0: PathBuf,
    dir1: PathBuf,
    paths: ReportPaths,
    device: Device,
    metric: M,
    json: Option<PathBuf>,
) -> Result<()> {
    let config = EvalConfig::builder()
        .reference_dir(dir0)
        .comparison_dir(dir1)
        .report_paths(paths)
        .device(device)
        .build()
        .context("Invalid run configuration")?;

    let pipeline = Pipeline::new(config, metric).context("Failed to set up metric")?;
    let report = pipeline.run().with_context(|| {
        format!(
            "Evaluation of {} against {} failed",
            pipeline.config().reference_dir.display(),
            pipeline.config().comparison_dir.display()
        )
    })?;

    if let Some(json) = json {
        report
            .write_json(&json)
            .with_context(|| format!("Failed to write JSON: {}", json.display()))?;
    }

    print_summary(&report, &pipeline.config().report_paths);
    Ok(())
}

fn print_summary(report: &RunReport, paths: &ReportPaths) {
    let summary = &report.summary;
    println!("Evaluated {} pairs with {}", summary.count, report.metric);
    println!("Aggregated results:");
    println!("Mean: {:.6}", summary.mean);
    println!("Max: {:.6}", summary.max);
    println!("Min: {:.6}", summary.min);
    println!();
    println!("Per-item report: {}", paths.per_item.display());
    println!("Summary report:  {}", paths.summary.display());
}
