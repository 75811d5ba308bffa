//! Peeler stage - turns dried stalks into bast
//!
//! The peeler sorts out stalks it cannot handle, cuts the rest to its working
//! length and peels them. Every stalk it received ends up in the scrapped
//! queue eventually, since the husk is always discarded after peeling.

use rand::Rng;
use std::fmt;

use crate::core::config::PeelerConfig;
use crate::core::context::SimContext;
use crate::core::distribution::sample_flat;
use crate::core::error::SimError;
use crate::core::lifecycle::{Lifecycle, Machine};
use crate::core::report::Series;
use crate::entities::bast::Bast;
use crate::entities::stalk::{Scrap, Stalk};

/// Machine variance around the nominal cutting length
const CUT_TOLERANCE: f64 = 0.01;

/// Peeler lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeelerState {
    On,
    Off,
}

/// Operations on a peeler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeelerOp {
    Feed,
    Select,
    Cut,
    Peel,
    TurnOff,
}

impl fmt::Display for PeelerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeelerState::On => write!(f, "on"),
            PeelerState::Off => write!(f, "off"),
        }
    }
}

impl fmt::Display for PeelerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeelerOp::Feed => write!(f, "feed"),
            PeelerOp::Select => write!(f, "select"),
            PeelerOp::Cut => write!(f, "cut"),
            PeelerOp::Peel => write!(f, "peel"),
            PeelerOp::TurnOff => write!(f, "turn_off"),
        }
    }
}

impl Lifecycle for PeelerState {
    type Op = PeelerOp;
    const ENTITY: &'static str = "peeler";
    const INITIAL: Self = PeelerState::On;
    const TRANSITIONS: &'static [(Self, PeelerOp, Self)] = &[
        (PeelerState::On, PeelerOp::Feed, PeelerState::On),
        (PeelerState::On, PeelerOp::Select, PeelerState::On),
        (PeelerState::On, PeelerOp::Cut, PeelerState::On),
        (PeelerState::On, PeelerOp::Peel, PeelerState::On),
        (PeelerState::On, PeelerOp::TurnOff, PeelerState::Off),
    ];
}

/// A peeling machine with its stalk queues
#[derive(Debug)]
pub struct Peeler {
    config: PeelerConfig,
    input: Vec<Stalk>,
    selected: Vec<Stalk>,
    cut: Vec<Stalk>,
    scrapped: Vec<Stalk>,
    machine: Machine<PeelerState>,
}

impl Peeler {
    pub fn new(config: PeelerConfig) -> Self {
        tracing::info!("initialize peeler");
        Self {
            config,
            input: Vec::new(),
            selected: Vec::new(),
            cut: Vec::new(),
            scrapped: Vec::new(),
            machine: Machine::new(),
        }
    }

    pub fn state(&self) -> PeelerState {
        self.machine.state()
    }

    pub fn input(&self) -> &[Stalk] {
        &self.input
    }

    pub fn selected(&self) -> &[Stalk] {
        &self.selected
    }

    /// Stalks cut to length and waiting to be peeled
    pub fn cut_stalks(&self) -> &[Stalk] {
        &self.cut
    }

    pub fn scrapped(&self) -> &[Stalk] {
        &self.scrapped
    }

    /// Scrap summed over every stalk in the scrapped queue
    pub fn scrap_totals(&self) -> Scrap {
        let mut total = Scrap::default();
        for stalk in &self.scrapped {
            total += stalk.scrap();
        }
        total
    }

    pub fn feed(&mut self, stalks: Vec<Stalk>) -> Result<(), SimError> {
        self.machine.check(PeelerOp::Feed)?;
        tracing::info!("input: {} stalks", stalks.len());
        self.input.extend(stalks);
        Ok(())
    }

    /// Sort the input into selected and scrapped stalks
    pub fn select(&mut self, ctx: &mut SimContext<'_>) -> Result<(), SimError> {
        self.machine.check(PeelerOp::Select)?;

        let input = std::mem::take(&mut self.input);
        tracing::info!("select from {} stalks", input.len());
        for mut stalk in input {
            if stalk.select(&self.config)? {
                self.selected.push(stalk);
            } else {
                self.scrapped.push(stalk);
            }
        }

        ctx.record(Series::histogram(
            "stalk_dia_selected",
            "Stalk Diameter Histogram (after selection)",
            "diameter [mm]",
            "number of stalks",
            self.selected.iter().map(|s| s.diameter()),
        ))?;
        ctx.record(Series::histogram(
            "stalk_len_selected",
            "Stalk Length Histogram (after selection)",
            "length [mm]",
            "number of stalks",
            self.selected.iter().map(|s| s.length()),
        ))?;

        Ok(())
    }

    /// Cut selected stalks to the machine length (±1%)
    pub fn cut(&mut self, ctx: &mut SimContext<'_>) -> Result<(), SimError> {
        self.machine.check(PeelerOp::Cut)?;

        let selected = std::mem::take(&mut self.selected);
        tracing::info!("cut {} stalks", selected.len());

        let max_len = self.config.max_len;
        for mut stalk in selected {
            // the machine draws two lengths and only ever uses the first
            let lengths = sample_flat(
                2,
                max_len * (1.0 - CUT_TOLERANCE),
                max_len * (1.0 + CUT_TOLERANCE),
                &mut *ctx.rng,
            )?;
            stalk.cut(lengths[0])?;
            self.cut.push(stalk);
        }

        ctx.record(Series::histogram(
            "stalk_dia_cut",
            "Stalk Diameter Histogram (after cutting)",
            "diameter [mm]",
            "number of stalks",
            self.cut.iter().map(|s| s.diameter()),
        ))?;
        ctx.record(Series::histogram(
            "stalk_len_cut",
            "Stalk Length Histogram (after cutting)",
            "length [mm]",
            "number of stalks",
            self.cut.iter().map(|s| s.length()),
        ))?;

        Ok(())
    }

    /// Peel all cut stalks and return the bast they yielded
    pub fn peel(&mut self, ctx: &mut SimContext<'_>) -> Result<Vec<Bast>, SimError> {
        self.machine.check(PeelerOp::Peel)?;

        let cut = std::mem::take(&mut self.cut);
        tracing::info!("peeling {} stalks", cut.len());

        let mut bast = Vec::new();
        let mut failed = 0usize;
        for mut stalk in cut {
            let prep = ctx.rng.random::<f64>() * 100.0;
            if prep > self.config.prep_efficiency {
                stalk.discard()?;
                failed += 1;
            } else {
                bast.extend(stalk.peel(&self.config, &mut *ctx.rng)?);
            }
            self.scrapped.push(stalk);
        }

        tracing::info!(
            bast = bast.len(),
            prep_failures = failed,
            "peeling done"
        );
        Ok(bast)
    }

    pub fn turn_off(&mut self) -> Result<(), SimError> {
        self.machine.apply(PeelerOp::TurnOff)?;
        Ok(())
    }
}
