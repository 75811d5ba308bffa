//! Stitcher stage - assembles bast strips into a sheet
//!
//! Incoming bast is cut into segments, the segments are spliced into strips no
//! wider than the splice width, and the strips are sewn into a sheet.
//!
//! Sewing walks along the sheet in resolution steps. At each step the strips
//! already in the sheet advance, strips that have run out drop away, and new
//! strips are pulled in queue order until the summed width reaches the target.
//! There is no look-ahead and no reordering.

use std::fmt;

use crate::core::config::StitcherConfig;
use crate::core::context::SimContext;
use crate::core::error::SimError;
use crate::core::lifecycle::{Lifecycle, Machine};
use crate::core::report::Series;
use crate::entities::bast::Bast;
use crate::entities::sheet::{Sheet, SheetSample};

/// Stitcher lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StitcherState {
    On,
    Off,
}

/// Operations on a stitcher
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StitcherOp {
    Feed,
    Cut,
    Splice,
    Sew,
    TurnOff,
}

impl fmt::Display for StitcherState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StitcherState::On => write!(f, "on"),
            StitcherState::Off => write!(f, "off"),
        }
    }
}

impl fmt::Display for StitcherOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StitcherOp::Feed => write!(f, "feed"),
            StitcherOp::Cut => write!(f, "cut"),
            StitcherOp::Splice => write!(f, "splice"),
            StitcherOp::Sew => write!(f, "sew"),
            StitcherOp::TurnOff => write!(f, "turn_off"),
        }
    }
}

impl Lifecycle for StitcherState {
    type Op = StitcherOp;
    const ENTITY: &'static str = "stitcher";
    const INITIAL: Self = StitcherState::On;
    const TRANSITIONS: &'static [(Self, StitcherOp, Self)] = &[
        (StitcherState::On, StitcherOp::Feed, StitcherState::On),
        (StitcherState::On, StitcherOp::Cut, StitcherState::On),
        (StitcherState::On, StitcherOp::Splice, StitcherState::On),
        (StitcherState::On, StitcherOp::Sew, StitcherState::On),
        (StitcherState::On, StitcherOp::TurnOff, StitcherState::Off),
    ];
}

/// A stitching machine with its bast queues
#[derive(Debug)]
pub struct Stitcher {
    config: StitcherConfig,
    input: Vec<Bast>,
    cut: Vec<Bast>,
    spliced: Vec<Bast>,
    machine: Machine<StitcherState>,
}

impl Stitcher {
    pub fn new(config: StitcherConfig) -> Self {
        tracing::info!("initialize stitcher");
        Self {
            config,
            input: Vec::new(),
            cut: Vec::new(),
            spliced: Vec::new(),
            machine: Machine::new(),
        }
    }

    pub fn state(&self) -> StitcherState {
        self.machine.state()
    }

    pub fn input(&self) -> &[Bast] {
        &self.input
    }

    /// Segments waiting to be spliced
    pub fn cut_pieces(&self) -> &[Bast] {
        &self.cut
    }

    /// Strips waiting to be sewn
    pub fn spliced(&self) -> &[Bast] {
        &self.spliced
    }

    pub fn feed(&mut self, bast: Vec<Bast>, ctx: &mut SimContext<'_>) -> Result<(), SimError> {
        self.machine.check(StitcherOp::Feed)?;
        self.input.extend(bast);

        ctx.record(Series::histogram(
            "bast_width_peel",
            "Bast Width Histogram (after peeling)",
            "width [mm]",
            "number of basts",
            self.input.iter().map(|b| b.start_width()),
        ))?;
        ctx.record(Series::histogram(
            "bast_len_peel",
            "Bast Length Histogram (after peeling)",
            "length [mm]",
            "number of basts",
            self.input.iter().map(|b| b.length()),
        ))?;

        Ok(())
    }

    /// Cut every queued bast into segments of the configured length
    pub fn cut(&mut self, ctx: &mut SimContext<'_>) -> Result<(), SimError> {
        self.machine.check(StitcherOp::Cut)?;

        let input = std::mem::take(&mut self.input);
        tracing::info!("cut {} basts", input.len());
        for mut bast in input {
            self.cut.extend(bast.cut(self.config.seg_length)?);
        }

        ctx.record(Series::histogram(
            "bast_width_cut",
            "Bast Width Histogram (after cutting)",
            "width [mm]",
            "number of basts",
            self.cut.iter().map(|b| b.start_width()),
        ))?;
        ctx.record(Series::histogram(
            "bast_len_cut",
            "Bast Length Histogram (after cutting)",
            "length [mm]",
            "number of basts",
            self.cut.iter().map(|b| b.length()),
        ))?;

        Ok(())
    }

    /// Splice every cut segment into strips no wider than the splice width
    pub fn splice(&mut self, ctx: &mut SimContext<'_>) -> Result<(), SimError> {
        self.machine.check(StitcherOp::Splice)?;

        let cut = std::mem::take(&mut self.cut);
        tracing::info!("splice {} segments", cut.len());
        for mut bast in cut {
            self.spliced.extend(bast.splice(self.config.splice_width)?);
        }

        ctx.record(Series::histogram(
            "bast_width_spliced",
            "Bast Width Histogram (after splicing)",
            "width [mm]",
            "number of basts",
            self.spliced.iter().map(|b| b.start_width()),
        ))?;
        ctx.record(Series::histogram(
            "bast_len_spliced",
            "Bast Length Histogram (after splicing)",
            "length [mm]",
            "number of basts",
            self.spliced.iter().map(|b| b.length()),
        ))?;

        Ok(())
    }

    /// Sew the spliced strips into a sheet, consuming the queue
    ///
    /// When the queue runs dry while the sheet is still too narrow, the last
    /// (under-width) sample is kept.
    pub fn sew(&mut self) -> Result<Sheet, SimError> {
        self.machine.check(StitcherOp::Sew)?;

        let resolution = self.config.resolution;
        let target = self.config.target_width;
        if resolution.is_nan() || resolution <= 0.0 {
            return Err(SimError::invalid(format!(
                "sewing resolution must be positive (got {})",
                resolution
            )));
        }
        if target.is_nan() || target <= 0.0 {
            return Err(SimError::invalid(format!(
                "target width must be positive (got {})",
                target
            )));
        }

        let pieces = std::mem::take(&mut self.spliced);
        tracing::info!("sew {} strips", pieces.len());

        let mut current: Vec<(&Bast, f64)> = Vec::new();
        let mut samples = Vec::new();
        let mut next = 0;

        while next < pieces.len() {
            let mut total = 0.0;
            current.retain_mut(|(piece, position)| {
                *position += resolution;
                let width = piece.width_at(*position);
                total += width;
                width > 0.0
            });

            while total < target && next < pieces.len() {
                let piece = &pieces[next];
                next += 1;
                total += piece.width_at(0.0);
                current.push((piece, 0.0));
            }

            samples.push(SheetSample {
                position: (samples.len() + 1) as f64 * resolution,
                total_width: total,
                pieces: current.len(),
            });
        }

        let sheet = Sheet::new(resolution, target, samples);
        tracing::info!(
            samples = sheet.samples().len(),
            length_mm = sheet.length(),
            "sheet sewn"
        );
        Ok(sheet)
    }

    pub fn turn_off(&mut self) -> Result<(), SimError> {
        self.machine.apply(StitcherOp::TurnOff)?;
        Ok(())
    }
}
