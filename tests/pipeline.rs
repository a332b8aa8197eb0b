//! End-to-end runs of the evaluation pipeline over temporary directories.

use std::cell::Cell;
use std::fs;
use std::path::Path;

use pair_eval::{
    Error, EvalConfig, ImageData, MetricFunction, MetricKind, Pipeline, ReportPaths,
    StructuralSimilarity,
};

struct Constant(f64);

impl MetricFunction for Constant {
    fn name(&self) -> &str {
        "constant"
    }

    fn compute(&self, _reference: &ImageData, _test: &ImageData) -> pair_eval::Result<f64> {
        Ok(self.0)
    }
}

/// Fails on the second pair it sees.
struct FailSecond {
    calls: Cell<usize>,
}

impl MetricFunction for FailSecond {
    fn name(&self) -> &str {
        "fail-second"
    }

    fn compute(&self, _reference: &ImageData, _test: &ImageData) -> pair_eval::Result<f64> {
        let n = self.calls.get() + 1;
        self.calls.set(n);
        if n == 2 {
            return Err(Error::MetricCalculation {
                metric: "fail-second".to_string(),
                reason: "second call".to_string(),
            });
        }
        Ok(0.25)
    }
}

struct Fixture {
    root: tempfile::TempDir,
}

impl Fixture {
    fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir(root.path().join("d0")).unwrap();
        fs::create_dir(root.path().join("d1")).unwrap();
        Self { root }
    }

    fn d0(&self) -> std::path::PathBuf {
        self.root.path().join("d0")
    }

    fn d1(&self) -> std::path::PathBuf {
        self.root.path().join("d1")
    }

    fn paths(&self) -> ReportPaths {
        ReportPaths::new(self.root.path().join("all.txt"), self.root.path().join("agg.txt"))
    }

    fn config(&self) -> EvalConfig {
        EvalConfig::builder()
            .reference_dir(self.d0())
            .comparison_dir(self.d1())
            .report_paths(self.paths())
            .build()
            .unwrap()
    }
}

fn write_png(dir: &Path, name: &str, seed: u8) {
    image::RgbImage::from_fn(64, 64, |x, y| {
        image::Rgb([
            (x * 4) as u8 ^ seed,
            (y * 4) as u8,
            ((x + y) * 2) as u8 ^ seed,
        ])
    })
    .save(dir.join(name))
    .unwrap();
}

#[test]
fn missing_counterparts_are_skipped() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "a.png", 0);
    write_png(&fx.d0(), "b.png", 0);
    write_png(&fx.d1(), "a.png", 3);
    write_png(&fx.d1(), "c.png", 0);

    let report = Pipeline::new(fx.config(), Constant(0.75)).unwrap().run().unwrap();
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].filename, "a.png");
    assert_eq!(report.summary.mean, report.summary.max);
    assert_eq!(report.summary.min, report.summary.max);

    let per_item = fs::read_to_string(fx.paths().per_item).unwrap();
    assert_eq!(per_item.lines().count(), 1);
    assert!(per_item.starts_with("a.png:"));
}

#[test]
fn constant_metric_report_format() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "x.png", 0);
    write_png(&fx.d1(), "x.png", 0);

    Pipeline::new(fx.config(), Constant(0.5)).unwrap().run().unwrap();

    assert_eq!(fs::read_to_string(fx.paths().per_item).unwrap(), "x.png: 0.500000\n");
    assert_eq!(
        fs::read_to_string(fx.paths().summary).unwrap(),
        "Aggregated results:\nMean: 0.500000\nMax: 0.500000\nMin: 0.500000\n"
    );
}

#[test]
fn empty_reference_directory() {
    let fx = Fixture::new();
    write_png(&fx.d1(), "x.png", 0);

    let result = Pipeline::new(fx.config(), Constant(0.5)).unwrap().run();
    assert!(matches!(result, Err(Error::EmptyResultSet)));
    assert_eq!(fs::read_to_string(fx.paths().per_item).unwrap(), "");
    assert!(!fx.paths().summary.exists());
}

#[test]
fn no_matching_names() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "a.png", 0);
    write_png(&fx.d1(), "b.png", 0);

    let result = Pipeline::new(fx.config(), Constant(0.5)).unwrap().run();
    assert!(matches!(result, Err(Error::EmptyResultSet)));
    assert!(!fx.paths().summary.exists());
}

#[test]
fn record_count_matches_intersection() {
    let fx = Fixture::new();
    for (i, name) in ["1.png", "2.png", "3.png", "4.png", "5.png"].iter().enumerate() {
        write_png(&fx.d0(), name, i as u8);
    }
    for name in ["2.png", "3.png", "5.png", "6.png"] {
        write_png(&fx.d1(), name, 9);
    }

    let report = Pipeline::new(fx.config(), Constant(0.1)).unwrap().run().unwrap();
    let mut names: Vec<_> = report.records.iter().map(|r| r.filename.as_str()).collect();
    names.sort_unstable();
    assert_eq!(names, vec!["2.png", "3.png", "5.png"]);
    assert_eq!(report.summary.count, 3);
}

#[test]
fn metric_failure_keeps_partial_report() {
    let fx = Fixture::new();
    for name in ["a.png", "b.png", "c.png"] {
        write_png(&fx.d0(), name, 0);
        write_png(&fx.d1(), name, 0);
    }

    let metric = FailSecond { calls: Cell::new(0) };
    let result = Pipeline::new(fx.config(), metric).unwrap().run();
    assert!(matches!(result, Err(Error::MetricCalculation { .. })));

    let per_item = fs::read_to_string(fx.paths().per_item).unwrap();
    assert_eq!(per_item.lines().count(), 1);
    assert!(per_item.ends_with(": 0.250000\n"));
    assert!(!fx.paths().summary.exists());
}

#[test]
fn corrupt_image_is_fatal() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "x.png", 0);
    fs::write(fx.d1().join("x.png"), b"garbage").unwrap();

    let result = Pipeline::new(fx.config(), Constant(0.5)).unwrap().run();
    assert!(matches!(result, Err(Error::ImageDecode { .. })));
    assert!(!fx.paths().summary.exists());
}

#[test]
fn ssim_reports_use_label() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "same.png", 0);
    write_png(&fx.d1(), "same.png", 0);

    let report = Pipeline::new(fx.config(), StructuralSimilarity::new())
        .unwrap()
        .run()
        .unwrap();
    assert!(report.summary.mean > 0.9999);

    let per_item = fs::read_to_string(fx.paths().per_item).unwrap();
    let value = per_item
        .strip_prefix("same.png: SSIM = ")
        .and_then(|rest| rest.strip_suffix('\n'))
        .unwrap();
    assert!(value.parse::<f64>().unwrap() > 0.9999, "{per_item}");
}

#[test]
fn ssim_orders_similarity() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "close.png", 0);
    write_png(&fx.d1(), "close.png", 1);
    write_png(&fx.d0(), "far.png", 0);
    write_png(&fx.d1(), "far.png", 0xAA);

    let report = Pipeline::new(fx.config(), StructuralSimilarity::new())
        .unwrap()
        .run()
        .unwrap();
    let score = |name: &str| {
        report
            .records
            .iter()
            .find(|r| r.filename == name)
            .map(|r| r.score)
            .unwrap()
    };
    assert!(score("close.png") > score("far.png"));
    assert!(report.summary.min <= report.summary.mean);
    assert!(report.summary.mean <= report.summary.max);
}

#[test]
fn perceptual_distance_run() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "same.png", 0);
    write_png(&fx.d1(), "same.png", 0);
    write_png(&fx.d0(), "noisy.png", 0);
    write_png(&fx.d1(), "noisy.png", 0x55);

    let metric = MetricKind::PerceptualDistance.default_metric();
    let report = Pipeline::new(fx.config(), metric).unwrap().run().unwrap();
    assert_eq!(report.records.len(), 2);

    let per_item = fs::read_to_string(fx.paths().per_item).unwrap();
    for line in per_item.lines() {
        assert!(!line.contains('='), "perceptual lines carry no label: {line}");
    }
    let same = report.records.iter().find(|r| r.filename == "same.png").unwrap();
    let noisy = report.records.iter().find(|r| r.filename == "noisy.png").unwrap();
    assert!(same.score < noisy.score);
}

#[test]
fn rerun_is_byte_identical() {
    let fx = Fixture::new();
    for (i, name) in ["a.png", "b.png", "c.png"].iter().enumerate() {
        write_png(&fx.d0(), name, 0);
        write_png(&fx.d1(), name, (i * 40) as u8);
    }

    Pipeline::new(fx.config(), StructuralSimilarity::new()).unwrap().run().unwrap();
    let first = (
        fs::read(fx.paths().per_item).unwrap(),
        fs::read(fx.paths().summary).unwrap(),
    );

    Pipeline::new(fx.config(), StructuralSimilarity::new()).unwrap().run().unwrap();
    let second = (
        fs::read(fx.paths().per_item).unwrap(),
        fs::read(fx.paths().summary).unwrap(),
    );

    assert_eq!(first, second);
}

#[test]
fn failed_rerun_leaves_no_stale_summary() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "x.png", 0);
    write_png(&fx.d1(), "x.png", 0);

    Pipeline::new(fx.config(), Constant(0.5)).unwrap().run().unwrap();
    assert!(fx.paths().summary.is_file());

    fs::remove_file(fx.d1().join("x.png")).unwrap();
    let result = Pipeline::new(fx.config(), Constant(0.5)).unwrap().run();
    assert!(matches!(result, Err(Error::EmptyResultSet)));
    assert_eq!(fs::read_to_string(fx.paths().per_item).unwrap(), "");
    assert!(!fx.paths().summary.exists());
}

#[test]
fn json_export() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "x.png", 0);
    write_png(&fx.d1(), "x.png", 0);

    let report = Pipeline::new(fx.config(), Constant(0.5)).unwrap().run().unwrap();
    let json_path = fx.root.path().join("out/report.json");
    report.write_json(&json_path).unwrap();

    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
    assert_eq!(value["metric"], "constant");
    assert_eq!(value["records"][0]["filename"], "x.png");
    assert_eq!(value["summary"]["count"], 1);
    assert_eq!(value["summary"]["mean"], 0.5);
}

#[test]
fn derived_paths_follow_metric_convention() {
    let fx = Fixture::new();
    write_png(&fx.d0(), "x.png", 0);
    write_png(&fx.d1(), "x.png", 0);

    let out = fx.root.path().join("ssim.txt");
    let paths = ReportPaths::for_metric(&out, MetricKind::StructuralSimilarity);
    let config = EvalConfig::builder()
        .reference_dir(fx.d0())
        .comparison_dir(fx.d1())
        .report_paths(paths)
        .build()
        .unwrap();

    Pipeline::new(config, StructuralSimilarity::new()).unwrap().run().unwrap();
    assert!(out.is_file());
    assert!(fx.root.path().join("ssim_agg.txt").is_file());
}
