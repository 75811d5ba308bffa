//! Shared helper functions for CLI commands

use miette::{IntoDiagnostic, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use tracing_subscriber::EnvFilter;

use crate::core::config::SimConfig;

/// Install the log subscriber; `RUST_LOG` wins over the verbosity flags
pub fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hempline={}", level)));

    // a second init (e.g. in tests) is harmless
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Seeded generator; without a seed one is drawn from OS entropy
///
/// Returns the seed used so the run can be repeated.
pub fn make_rng(seed: Option<u64>) -> (StdRng, u64) {
    let seed = seed.unwrap_or_else(|| rand::rng().random());
    (StdRng::seed_from_u64(seed), seed)
}

/// Load a configuration file, or the built-in defaults when none is given
pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::load(path).into_diagnostic(),
        None => Ok(SimConfig::with_defaults()),
    }
}

/// Format a length in mm, switching to meters for long values
pub fn format_length(mm: f64) -> String {
    if mm.abs() >= 10_000.0 {
        format!("{:.2} m", mm / 1000.0)
    } else {
        format!("{:.1} mm", mm)
    }
}

/// Share of `part` in `whole` as a percentage string
pub fn format_percent(part: usize, whole: usize) -> String {
    if whole == 0 {
        "-".to_string()
    } else {
        format!("{:.1}%", part as f64 / whole as f64 * 100.0)
    }
}
