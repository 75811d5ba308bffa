//! Simulation configuration
//!
//! A nested mapping with one section per stage. Every key is required and
//! unknown keys are rejected; a missing key is a configuration error, never a
//! silent default.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::core::distribution::{BetaParams, FlatParams};
use crate::entities::bast::end_width_params;
use crate::entities::stalk::bast_width_of;

/// Errors loading or validating a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid YAML in '{file}': {message}")]
    Yaml { file: String, message: String },

    #[error("Invalid JSON in '{file}': {message}")]
    Json { file: String, message: String },

    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

impl ConfigError {
    fn invalid(key: &str, message: impl Into<String>) -> Self {
        ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

/// Field growth parameters used by the farmer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FarmerConfig {
    /// Stalks per square meter
    pub sprout: BetaParams,

    /// Stalk length in mm
    pub length: BetaParams,

    /// Stalk diameter in mm
    pub diameter: FlatParams,
}

/// Peeling machine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PeelerConfig {
    /// Shortest stalk accepted, in mm
    pub min_len: f64,

    /// Longest stalk accepted and nominal machine length, in mm
    pub max_len: f64,

    /// Thinnest stalk accepted, in mm
    pub min_dia: f64,

    /// Thickest stalk accepted, in mm
    pub max_dia: f64,

    /// Share of stalks surviving preparation, in percent
    pub prep_efficiency: f64,

    /// Nominal peeling efficiency, in percent (reported only)
    pub peel_efficiency: f64,

    /// Successfully peeled share of the stalk length, in percent
    pub success: BetaParams,
}

/// Stitching machine parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StitcherConfig {
    /// Longitudinal step between sheet samples, in mm
    pub resolution: f64,

    /// Maximum width of a spliced strip, in mm
    pub splice_width: f64,

    /// Minimum total sheet width the stitcher keeps up, in mm
    #[serde(alias = "seg_width", alias = "min_width")]
    pub target_width: f64,

    /// Length bast is cut to before splicing, in mm
    pub seg_length: f64,
}

/// Complete configuration for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    pub farmer: FarmerConfig,
    pub peeler: PeelerConfig,
    pub stitcher: StitcherConfig,
}

impl SimConfig {
    /// Reference configuration of the hemp line
    pub fn with_defaults() -> Self {
        Self {
            farmer: FarmerConfig {
                sprout: BetaParams::new(100.0, 250.0, 150.0, 5.0),
                length: BetaParams::new(2000.0, 3000.0, 2750.0, 5.0),
                diameter: FlatParams::new(4.0, 15.0),
            },
            peeler: PeelerConfig {
                min_len: 300.0,
                max_len: 3000.0,
                min_dia: 6.0,
                max_dia: 12.0,
                prep_efficiency: 99.0,
                peel_efficiency: 90.0,
                success: BetaParams::new(0.0, 100.0, 90.0, 1.0),
            },
            stitcher: StitcherConfig {
                resolution: 10.0,
                splice_width: 7.0,
                target_width: 12.0,
                seg_length: 1000.0,
            },
        }
    }

    /// Load a configuration file; `.json` is parsed as JSON, anything else as YAML
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let config: SimConfig = if path.extension().is_some_and(|ext| ext == "json") {
            let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
                path: path.display().to_string(),
                source,
            })?;
            serde_json::from_str(&content).map_err(|e| ConfigError::Json {
                file: path.display().to_string(),
                message: e.to_string(),
            })?
        } else {
            crate::yaml::parse_yaml_file(path)?
        };

        config.validate()?;
        Ok(config)
    }

    /// Serialize as YAML (used by `config init` / `config show`)
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        serde_yml::to_string(self).map_err(|e| ConfigError::Yaml {
            file: "<generated>".to_string(),
            message: e.to_string(),
        })
    }

    /// Check value ranges that serde cannot express
    pub fn validate(&self) -> Result<(), ConfigError> {
        let farmer = &self.farmer;
        check_beta("farmer.sprout", &farmer.sprout)?;
        check_beta("farmer.length", &farmer.length)?;
        check_flat("farmer.diameter", &farmer.diameter)?;
        if farmer.sprout.min < 0.0 {
            return Err(ConfigError::invalid(
                "farmer.sprout.min",
                "stalk density cannot be negative",
            ));
        }

        let peeler = &self.peeler;
        check_positive("peeler.min_len", peeler.min_len, true)?;
        check_positive("peeler.max_len", peeler.max_len, false)?;
        check_positive("peeler.min_dia", peeler.min_dia, true)?;
        check_positive("peeler.max_dia", peeler.max_dia, false)?;
        if peeler.min_len > peeler.max_len {
            return Err(ConfigError::invalid(
                "peeler.min_len",
                format!("{} exceeds max_len {}", peeler.min_len, peeler.max_len),
            ));
        }
        if peeler.min_dia > peeler.max_dia {
            return Err(ConfigError::invalid(
                "peeler.min_dia",
                format!("{} exceeds max_dia {}", peeler.min_dia, peeler.max_dia),
            ));
        }
        check_percent("peeler.prep_efficiency", peeler.prep_efficiency)?;
        check_percent("peeler.peel_efficiency", peeler.peel_efficiency)?;
        check_end_width(&farmer.diameter, peeler)?;
        check_beta("peeler.success", &peeler.success)?;
        if peeler.success.min < 0.0 || peeler.success.max > 100.0 {
            return Err(ConfigError::invalid(
                "peeler.success",
                "peel success bounds must lie within 0..100 percent",
            ));
        }

        let stitcher = &self.stitcher;
        check_positive("stitcher.resolution", stitcher.resolution, false)?;
        check_positive("stitcher.splice_width", stitcher.splice_width, false)?;
        check_positive("stitcher.target_width", stitcher.target_width, false)?;
        check_positive("stitcher.seg_length", stitcher.seg_length, false)?;

        Ok(())
    }
}

/// The end-width fit of peeled bast only exists above a minimum start width,
/// so the thinnest stalk that can reach the peeler has to clear it.
fn check_end_width(diameter: &FlatParams, peeler: &PeelerConfig) -> Result<(), ConfigError> {
    let thinnest = diameter.min.max(peeler.min_dia);
    if thinnest > diameter.max.min(peeler.max_dia) {
        // no stalk is ever selected
        return Ok(());
    }
    let width = bast_width_of(thinnest);
    end_width_params(width).fit().map(|_| ()).map_err(|e| {
        ConfigError::invalid(
            "peeler.min_dia",
            format!(
                "stalks of {} mm peel into {:.2} mm bast, too narrow for its end width: {}",
                thinnest, width, e
            ),
        )
    })
}

fn check_positive(key: &str, value: f64, allow_zero: bool) -> Result<(), ConfigError> {
    let ok = value.is_finite() && (value > 0.0 || (allow_zero && value == 0.0));
    if ok {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            key,
            format!("{} must be a positive number", value),
        ))
    }
}

fn check_percent(key: &str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            key,
            format!("{} is not a percentage (0..100)", value),
        ))
    }
}

fn check_flat(key: &str, params: &FlatParams) -> Result<(), ConfigError> {
    if params.min.is_finite() && params.max.is_finite() && params.min <= params.max {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            key,
            format!("min {} must not exceed max {}", params.min, params.max),
        ))
    }
}

fn check_beta(key: &str, params: &BetaParams) -> Result<(), ConfigError> {
    if !(params.min < params.mean && params.mean < params.max) {
        return Err(ConfigError::invalid(
            key,
            format!(
                "mean {} must lie strictly between min {} and max {}",
                params.mean, params.min, params.max
            ),
        ));
    }
    params
        .fit()
        .map(|_| ())
        .map_err(|e| ConfigError::invalid(key, e.to_string()))
}
