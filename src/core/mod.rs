//! Core module - sampling, lifecycles, configuration and reporting

pub mod config;
pub mod context;
pub mod distribution;
pub mod error;
pub mod lifecycle;
pub mod report;

pub use config::{ConfigError, FarmerConfig, PeelerConfig, SimConfig, StitcherConfig};
pub use context::SimContext;
pub use distribution::{sample_beta, sample_flat, BetaParams, BetaShape, FlatParams};
pub use error::SimError;
pub use lifecycle::{Lifecycle, Machine};
pub use report::{DataDirRecorder, MemoryRecorder, NullRecorder, Recorder, Series, SeriesKind};
