//! Shared test helpers for integration tests

#![allow(dead_code)]

use assert_cmd::cargo;
use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Helper to get a hempline command
pub fn hempline() -> Command {
    Command::new(cargo::cargo_bin!("hempline"))
}

/// Write the default configuration into a temp directory via `config init`
pub fn write_default_config(tmp: &TempDir) -> PathBuf {
    let path = tmp.path().join("hempline.yaml");
    hempline()
        .current_dir(tmp.path())
        .args(["config", "init"])
        .assert()
        .success();
    path
}

/// Write an arbitrary config file into a temp directory
pub fn write_config(tmp: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = tmp.path().join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Reference production line configuration in the driver layout, with a
/// peeler that accepts the full stalk length range
pub const DRIVER_YAML: &str = r#"
farmer:
  sprout:   { min: 100,  max: 250,  mean: 150,  var: 5 }
  length:   { min: 2000, max: 3000, mean: 2750, var: 5 }
  diameter: { min: 4,    max: 15 }
peeler:
  min_len: 300
  max_len: 3000
  min_dia: 6
  max_dia: 12
  prep_efficiency: 99
  peel_efficiency: 90
  success: { min: 0, max: 100, mean: 90, var: 1 }
stitcher:
  resolution: 10
  splice_width: 7
  seg_width: 12
  seg_length: 1000
"#;
