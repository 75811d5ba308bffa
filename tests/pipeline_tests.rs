//! End-to-end tests of the production line, through the library and the CLI

mod common;

use common::{hempline, write_config, DRIVER_YAML};
use hempline::core::{
    sample_beta, sample_flat, MemoryRecorder, SimConfig, SimContext, SimError, StitcherConfig,
};
use hempline::entities::{Bast, BastState, StalkState, Width};
use hempline::stages::{Farmer, Stitcher};
use predicates::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs;
use tempfile::TempDir;

// ============================================================================
// Sampler properties
// ============================================================================

#[test]
fn test_beta_samples_stay_in_bounds() {
    let mut rng = StdRng::seed_from_u64(1);
    let cases = [
        (100.0, 250.0, 150.0, 5.0),
        (2000.0, 3000.0, 2750.0, 5.0),
        (0.0, 100.0, 90.0, 1.0),
        (0.0, 12.0, 8.0, 0.7),
    ];
    for (min, max, mean, var) in cases {
        let values = sample_beta(500, min, max, mean, var, &mut rng).unwrap();
        assert_eq!(values.len(), 500);
        assert!(values.iter().all(|v| *v >= min && *v <= max));
    }
}

#[test]
fn test_empty_samples() {
    let mut rng = StdRng::seed_from_u64(1);
    assert!(sample_beta(0, 0.0, 1.0, 0.5, 0.01, &mut rng)
        .unwrap()
        .is_empty());
    assert!(sample_flat(0, 0.0, 1.0, &mut rng).unwrap().is_empty());
}

#[test]
fn test_beta_mean_on_bound_is_invalid() {
    let mut rng = StdRng::seed_from_u64(1);
    for mean in [0.0, 10.0, -1.0, 11.0] {
        let err = sample_beta(5, 0.0, 10.0, mean, 0.1, &mut rng).unwrap_err();
        assert!(matches!(err, SimError::InvalidParameters { .. }));
    }
}

// ============================================================================
// Scenario: farmer plants a 100 m² field
// ============================================================================

#[test]
fn test_farmer_hundred_square_meters() {
    let config = SimConfig::with_defaults();
    let mut rng = StdRng::seed_from_u64(2024);
    let mut rec = MemoryRecorder::new();
    let mut ctx = SimContext::new(&mut rng, &mut rec);

    let mut farmer = Farmer::new(config.farmer.clone());
    farmer.plant(vec![100.0], &mut ctx).unwrap();
    farmer.harvest(&mut ctx).unwrap();
    farmer.dry().unwrap();
    let stalks = farmer.get().unwrap();

    assert!(!stalks.is_empty());
    assert!(stalks.len() >= 100 * 100);
    for stalk in &stalks {
        assert!((2000.0..=3000.0).contains(&stalk.length()));
        assert!((4.0..=15.0).contains(&stalk.diameter()));
        assert_eq!(stalk.state(), StalkState::Dried);
    }
    assert!(farmer.get().unwrap().is_empty());
}

// ============================================================================
// Scenario: one wide bast through the stitcher
// ============================================================================

#[test]
fn test_stitcher_single_bast() {
    let mut rng = StdRng::seed_from_u64(9);
    let mut rec = MemoryRecorder::new();
    let mut ctx = SimContext::new(&mut rng, &mut rec);

    let bast = Bast::new(3000.0, Width::Scalar(20.0), &mut StdRng::seed_from_u64(3)).unwrap();
    let mut stitcher = Stitcher::new(StitcherConfig {
        resolution: 10.0,
        splice_width: 7.0,
        target_width: 12.0,
        seg_length: 1000.0,
    });

    stitcher.feed(vec![bast], &mut ctx).unwrap();
    stitcher.cut(&mut ctx).unwrap();
    assert_eq!(stitcher.cut_pieces().len(), 3);
    let total: f64 = stitcher.cut_pieces().iter().map(|b| b.length()).sum();
    assert!((total - 3000.0).abs() < 1e-9);

    stitcher.splice(&mut ctx).unwrap();
    let sheet = stitcher.sew().unwrap();

    assert!(!sheet.samples().is_empty());
    let (_, body) = sheet.samples().split_last().unwrap();
    assert!(body.iter().all(|s| s.total_width >= 12.0));

    // stats are read-only
    let mut first = MemoryRecorder::new();
    let mut second = MemoryRecorder::new();
    let a = sheet.stats(&mut first).unwrap();
    let b = sheet.stats(&mut second).unwrap();
    assert_eq!(a, b);
    assert_eq!(first.series(), second.series());
}

#[test]
fn test_splice_before_cut_is_illegal() {
    let mut bast = Bast::with_state(1000.0, (14.0, 10.0), BastState::Fresh);
    let err = bast.splice(7.0).unwrap_err();
    assert!(err.is_illegal_transition());
    assert!(err.to_string().contains("splice"));
    assert!(err.to_string().contains("(allowed: cut)"));
}

// ============================================================================
// CLI runs
// ============================================================================

#[test]
fn test_run_prints_summary() {
    hempline()
        .args(["run", "--area", "2", "--seed", "17"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Sheet of"))
        .stdout(predicate::str::contains("harvested"))
        .stdout(predicate::str::contains("nominal 90%"))
        .stdout(predicate::str::contains("Scrap"));
}

#[test]
fn test_run_json_is_reproducible() {
    let run = || {
        let output = hempline()
            .args(["run", "--area", "1", "--area", "1", "--seed", "5", "--format", "json"])
            .output()
            .unwrap();
        assert!(output.status.success());
        String::from_utf8(output.stdout).unwrap()
    };

    let first = run();
    assert_eq!(first, run());

    let report: serde_json::Value = serde_json::from_str(&first).unwrap();
    assert_eq!(report["fields"], 2);
    assert_eq!(report["peel_efficiency"], 90.0);
    assert!(report["stalks_harvested"].as_u64().unwrap() >= 200);
    assert!(report["sheet"]["samples"].as_u64().unwrap() > 0);
    assert!(report.get("product").is_none());
}

#[test]
fn test_run_writes_data_files() {
    let tmp = TempDir::new().unwrap();
    let config = write_config(&tmp, "driver.yaml", DRIVER_YAML);
    let out = tmp.path().join("data");

    hempline()
        .args(["run", "--area", "1", "--seed", "3", "--config"])
        .arg(&config)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    let mut names: Vec<String> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();

    assert_eq!(names.len(), 14);
    assert_eq!(names[0], "00_stalk_density.csv");
    assert_eq!(names[13], "13_bht_thickness.csv");

    let thickness = fs::read_to_string(out.join("13_bht_thickness.csv")).unwrap();
    assert!(thickness.starts_with("length [mm],number of layers\n"));
}

#[test]
fn test_run_with_plot() {
    hempline()
        .args(["run", "--area", "1", "--seed", "8", "--plot"])
        .assert()
        .success()
        .stdout(predicate::str::contains("layers (max"));
}

#[test]
fn test_run_without_seed_reports_seed() {
    hempline()
        .args(["run", "--area", "1"])
        .assert()
        .success()
        .stderr(predicate::str::contains("seed"));
}

#[test]
fn test_run_with_missing_config_fails() {
    hempline()
        .args(["run", "--config", "/nonexistent/hempline.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read config"));
}
