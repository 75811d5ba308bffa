//! Field entity - an area of land growing hemp
//!
//! Growing samples a stalk density for every square meter of the field, then
//! a population of stalk lengths (beta) and diameters (flat) for each of those
//! cells. The total stalk count is therefore itself random.

use rand::Rng;
use serde::Serialize;
use std::fmt;

use crate::core::config::FarmerConfig;
use crate::core::error::SimError;
use crate::core::lifecycle::{Lifecycle, Machine};
use crate::entities::stalk::Stalk;

/// Field lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldState {
    Fresh,
    Sown,
    Grown,
    Harvested,
}

/// Operations on a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    Sow,
    Grow,
    Harvest,
}

impl fmt::Display for FieldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldState::Fresh => write!(f, "fresh"),
            FieldState::Sown => write!(f, "sown"),
            FieldState::Grown => write!(f, "grown"),
            FieldState::Harvested => write!(f, "harvested"),
        }
    }
}

impl fmt::Display for FieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldOp::Sow => write!(f, "sow"),
            FieldOp::Grow => write!(f, "grow"),
            FieldOp::Harvest => write!(f, "harvest"),
        }
    }
}

impl Lifecycle for FieldState {
    type Op = FieldOp;
    const ENTITY: &'static str = "field";
    const INITIAL: Self = FieldState::Fresh;
    const TRANSITIONS: &'static [(Self, FieldOp, Self)] = &[
        (FieldState::Fresh, FieldOp::Sow, FieldState::Sown),
        (FieldState::Sown, FieldOp::Grow, FieldState::Grown),
        (FieldState::Grown, FieldOp::Harvest, FieldState::Harvested),
    ];
}

/// What a field yielded, kept after its stalks are handed over
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct HarvestRecord {
    pub stalks: usize,
    pub total_length: f64,
}

/// A hemp field
#[derive(Debug)]
pub struct Field {
    uid: String,
    area: f64,
    density: Vec<f64>,
    stalks: Vec<Stalk>,
    harvested: Option<HarvestRecord>,
    machine: Machine<FieldState>,
}

impl Field {
    /// A fresh field of `area` square meters
    pub fn new(uid: impl Into<String>, area: f64) -> Result<Self, SimError> {
        if !area.is_finite() || area < 0.0 {
            return Err(SimError::invalid(format!(
                "field area must be a non-negative number of m² (got {})",
                area
            )));
        }

        let uid = uid.into();
        tracing::info!(field = %uid, area, "planting new field");
        Ok(Self {
            uid,
            area,
            density: Vec::new(),
            stalks: Vec::new(),
            harvested: None,
            machine: Machine::new(),
        })
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    pub fn state(&self) -> FieldState {
        self.machine.state()
    }

    /// Sampled stalks per square meter, one value per cell
    pub fn stalk_density(&self) -> &[f64] {
        &self.density
    }

    /// Stalks currently standing on the field
    pub fn stalks(&self) -> &[Stalk] {
        &self.stalks
    }

    /// Record of the harvest, once harvested
    pub fn harvest_record(&self) -> Option<HarvestRecord> {
        self.harvested
    }

    pub fn sow(&mut self) -> Result<(), SimError> {
        self.machine.apply(FieldOp::Sow)?;
        Ok(())
    }

    /// Grow stalks on every square meter of the field
    pub fn grow<R: Rng + ?Sized>(
        &mut self,
        config: &FarmerConfig,
        rng: &mut R,
    ) -> Result<(), SimError> {
        self.machine.check(FieldOp::Grow)?;

        // partial square meters are not planted
        let cells = self.area as usize;
        let density = config.sprout.sample(cells, rng)?;

        let mut stalks = Vec::new();
        for per_cell in &density {
            let count = *per_cell as usize;
            let lengths = config.length.sample(count, rng)?;
            let diameters = config.diameter.sample(count, rng)?;
            stalks.extend(
                lengths
                    .into_iter()
                    .zip(diameters)
                    .map(|(length, diameter)| Stalk::new(length, diameter)),
            );
        }

        tracing::info!(
            field = %self.uid,
            cells,
            stalks = stalks.len(),
            "field grown"
        );
        self.density = density;
        self.stalks = stalks;
        self.machine.apply(FieldOp::Grow)?;
        Ok(())
    }

    /// Hand all stalks over to the caller
    pub fn harvest(&mut self) -> Result<Vec<Stalk>, SimError> {
        self.machine.apply(FieldOp::Harvest)?;

        let stalks = std::mem::take(&mut self.stalks);
        let record = HarvestRecord {
            stalks: stalks.len(),
            total_length: stalks.iter().map(|s| s.length()).sum(),
        };
        tracing::info!(field = %self.uid, stalks = record.stalks, "field harvested");
        self.harvested = Some(record);
        Ok(stalks)
    }
}
