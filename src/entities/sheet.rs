//! Sheet entity - the stitched bast product
//!
//! A sheet is the sequence of cross sections recorded by the stitcher, one per
//! resolution step along its length. It is produced once and never changes.

use serde::Serialize;
use std::fmt;

use crate::core::error::SimError;
use crate::core::lifecycle::{Lifecycle, Machine};
use crate::core::report::{Recorder, Series};

/// Sheet lifecycle states; a sheet only ever exists sewn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetState {
    Sewn,
}

/// Operations on a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetOp {
    Stats,
}

impl fmt::Display for SheetState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetState::Sewn => write!(f, "sewn"),
        }
    }
}

impl fmt::Display for SheetOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetOp::Stats => write!(f, "stats"),
        }
    }
}

impl Lifecycle for SheetState {
    type Op = SheetOp;
    const ENTITY: &'static str = "sheet";
    const INITIAL: Self = SheetState::Sewn;
    const TRANSITIONS: &'static [(Self, SheetOp, Self)] =
        &[(SheetState::Sewn, SheetOp::Stats, SheetState::Sewn)];
}

/// One cross section of the sheet
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SheetSample {
    /// Distance from the start of the sheet, in mm
    pub position: f64,
    /// Summed width of all overlapping pieces, in mm
    pub total_width: f64,
    /// Number of pieces overlapping here (layers)
    pub pieces: usize,
}

/// Aggregate figures over all samples of a sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SheetSummary {
    pub length: f64,
    pub samples: usize,
    pub target_width: f64,
    pub min_width: f64,
    pub max_width: f64,
    pub mean_width: f64,
    pub min_layers: usize,
    pub max_layers: usize,
    pub mean_layers: f64,
    /// Samples whose total width stays below the target
    pub under_width: usize,
}

/// A stitched sheet of bast
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    resolution: f64,
    target_width: f64,
    samples: Vec<SheetSample>,
    machine: Machine<SheetState>,
}

impl Sheet {
    pub fn new(resolution: f64, target_width: f64, samples: Vec<SheetSample>) -> Self {
        Self {
            resolution,
            target_width,
            samples,
            machine: Machine::new(),
        }
    }

    pub fn state(&self) -> SheetState {
        self.machine.state()
    }

    pub fn resolution(&self) -> f64 {
        self.resolution
    }

    pub fn target_width(&self) -> f64 {
        self.target_width
    }

    pub fn samples(&self) -> &[SheetSample] {
        &self.samples
    }

    /// Length in mm: one resolution step per sample
    pub fn length(&self) -> f64 {
        self.samples.len() as f64 * self.resolution
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn summary(&self) -> SheetSummary {
        if self.samples.is_empty() {
            return SheetSummary {
                target_width: self.target_width,
                ..SheetSummary::default()
            };
        }

        let count = self.samples.len() as f64;
        let widths = self.samples.iter().map(|s| s.total_width);
        let layers = self.samples.iter().map(|s| s.pieces);

        SheetSummary {
            length: self.length(),
            samples: self.samples.len(),
            target_width: self.target_width,
            min_width: widths.clone().fold(f64::INFINITY, f64::min),
            max_width: widths.clone().fold(f64::NEG_INFINITY, f64::max),
            mean_width: widths.sum::<f64>() / count,
            min_layers: layers.clone().min().unwrap_or(0),
            max_layers: layers.clone().max().unwrap_or(0),
            mean_layers: layers.sum::<usize>() as f64 / count,
            under_width: self
                .samples
                .iter()
                .filter(|s| s.total_width < self.target_width)
                .count(),
        }
    }

    /// Report the thickness (layer count) over the length of the sheet
    ///
    /// Read-only; repeated calls record identical series.
    pub fn stats(&self, recorder: &mut dyn Recorder) -> Result<SheetSummary, SimError> {
        self.machine.check(SheetOp::Stats)?;

        let summary = self.summary();
        tracing::info!(
            length_m = summary.length / 1000.0,
            samples = summary.samples,
            mean_layers = summary.mean_layers,
            "sheet stats"
        );

        let points = self
            .samples
            .iter()
            .map(|s| (s.position, s.pieces as f64))
            .collect();
        recorder.record(Series::line(
            "bht_thickness",
            "Sheet Thickness over Length",
            "length [mm]",
            "number of layers",
            points,
        ))?;

        Ok(summary)
    }
}
