//! Farmer stage - plants fields and hands over the dried harvest
//!
//! The farmer owns a set of fields and a pool of harvested stalks. Stalks only
//! ever leave the pool through [`Farmer::get`], which empties it.

use std::fmt;

use crate::core::config::FarmerConfig;
use crate::core::context::SimContext;
use crate::core::error::SimError;
use crate::core::lifecycle::{Lifecycle, Machine};
use crate::core::report::Series;
use crate::entities::field::{Field, FieldState};
use crate::entities::stalk::Stalk;

/// Farmer lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmerState {
    Active,
    Retired,
}

/// Operations on a farmer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmerOp {
    Plant,
    Harvest,
    Dry,
    Get,
    Retire,
}

impl fmt::Display for FarmerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FarmerState::Active => write!(f, "active"),
            FarmerState::Retired => write!(f, "retired"),
        }
    }
}

impl fmt::Display for FarmerOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FarmerOp::Plant => write!(f, "plant"),
            FarmerOp::Harvest => write!(f, "harvest"),
            FarmerOp::Dry => write!(f, "dry"),
            FarmerOp::Get => write!(f, "get"),
            FarmerOp::Retire => write!(f, "retire"),
        }
    }
}

impl Lifecycle for FarmerState {
    type Op = FarmerOp;
    const ENTITY: &'static str = "farmer";
    const INITIAL: Self = FarmerState::Active;
    const TRANSITIONS: &'static [(Self, FarmerOp, Self)] = &[
        (FarmerState::Active, FarmerOp::Plant, FarmerState::Active),
        (FarmerState::Active, FarmerOp::Harvest, FarmerState::Active),
        (FarmerState::Active, FarmerOp::Dry, FarmerState::Active),
        (FarmerState::Active, FarmerOp::Get, FarmerState::Active),
        (FarmerState::Active, FarmerOp::Retire, FarmerState::Retired),
    ];
}

/// Field areas in square meters, one field per entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Areas(Vec<f64>);

impl Areas {
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<f64> for Areas {
    fn from(area: f64) -> Self {
        Areas(vec![area])
    }
}

impl From<Vec<f64>> for Areas {
    fn from(areas: Vec<f64>) -> Self {
        Areas(areas)
    }
}

impl From<&[f64]> for Areas {
    fn from(areas: &[f64]) -> Self {
        Areas(areas.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for Areas {
    fn from(areas: [f64; N]) -> Self {
        Areas(areas.to_vec())
    }
}

/// Manages fields and the pool of harvested stalks
#[derive(Debug)]
pub struct Farmer {
    config: FarmerConfig,
    fields: Vec<Field>,
    stalks: Vec<Stalk>,
    machine: Machine<FarmerState>,
}

impl Farmer {
    pub fn new(config: FarmerConfig) -> Self {
        tracing::info!("farmer starts working");
        Self {
            config,
            fields: Vec::new(),
            stalks: Vec::new(),
            machine: Machine::new(),
        }
    }

    pub fn state(&self) -> FarmerState {
        self.machine.state()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Stalks harvested and not yet handed over
    pub fn pool(&self) -> &[Stalk] {
        &self.stalks
    }

    /// Create one field per area, then sow and grow each of them
    pub fn plant(&mut self, areas: impl Into<Areas>, ctx: &mut SimContext<'_>) -> Result<(), SimError> {
        self.machine.check(FarmerOp::Plant)?;

        // fields join the farm only once all of them are grown
        let areas: Areas = areas.into();
        let first = self.fields.len();
        let mut planted = areas
            .as_slice()
            .iter()
            .enumerate()
            .map(|(n, area)| Field::new(format!("field.{:04}", first + n), *area))
            .collect::<Result<Vec<_>, _>>()?;

        for field in &mut planted {
            field.sow()?;
            field.grow(&self.config, &mut *ctx.rng)?;
        }
        self.fields.extend(planted);

        let density: Vec<f64> = self
            .fields
            .iter()
            .flat_map(|f| f.stalk_density().iter().copied())
            .collect();
        ctx.record(Series::histogram(
            "stalk_density",
            "Number of Stalks per Area",
            "density of stalks [1/(m*m)]",
            "area [m^2]",
            density,
        ))?;

        Ok(())
    }

    /// Collect the stalks of every grown field into the pool
    pub fn harvest(&mut self, ctx: &mut SimContext<'_>) -> Result<(), SimError> {
        self.machine.check(FarmerOp::Harvest)?;

        let uids: Vec<&str> = self.fields.iter().map(|f| f.uid()).collect();
        tracing::info!("harvest {} field(s): {}", uids.len(), uids.join(" "));

        for field in &mut self.fields {
            if field.state() == FieldState::Grown {
                self.stalks.extend(field.harvest()?);
            }
        }

        ctx.record(Series::histogram(
            "stalk_len",
            "Stalk Length Histogram",
            "length [mm]",
            "number of stalks",
            self.stalks.iter().map(|s| s.length()),
        ))?;
        ctx.record(Series::histogram(
            "stalk_dia",
            "Stalk Diameter Histogram",
            "diameter [mm]",
            "number of stalks",
            self.stalks.iter().map(|s| s.diameter()),
        ))?;

        Ok(())
    }

    /// Dry every stalk in the pool
    pub fn dry(&mut self) -> Result<(), SimError> {
        self.machine.check(FarmerOp::Dry)?;

        tracing::info!("dry harvest: {} stalks", self.stalks.len());
        for stalk in &mut self.stalks {
            stalk.dry()?;
        }
        Ok(())
    }

    /// Hand over the pool, leaving it empty
    pub fn get(&mut self) -> Result<Vec<Stalk>, SimError> {
        self.machine.check(FarmerOp::Get)?;
        Ok(std::mem::take(&mut self.stalks))
    }

    pub fn retire(&mut self) -> Result<(), SimError> {
        self.machine.apply(FarmerOp::Retire)?;
        tracing::info!("farmer retired");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimConfig;
    use crate::core::report::MemoryRecorder;
    use crate::entities::stalk::StalkState;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn farmer() -> Farmer {
        Farmer::new(SimConfig::with_defaults().farmer)
    }

    #[test]
    fn test_plant_harvest_dry_get() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut rec = MemoryRecorder::new();
        let mut ctx = SimContext::new(&mut rng, &mut rec);
        let mut farmer = farmer();

        farmer.plant([2.0, 3.0], &mut ctx).unwrap();
        assert_eq!(farmer.fields().len(), 2);
        assert_eq!(farmer.fields()[1].uid(), "field.0001");

        farmer.harvest(&mut ctx).unwrap();
        farmer.dry().unwrap();
        let stalks = farmer.get().unwrap();

        assert!(!stalks.is_empty());
        assert!(stalks.iter().all(|s| s.state() == StalkState::Dried));
        assert!(farmer.pool().is_empty());
        assert!(farmer.get().unwrap().is_empty());

        assert_eq!(rec.names(), vec!["stalk_density", "stalk_len", "stalk_dia"]);
        assert_eq!(rec.get("stalk_density").unwrap().points.len(), 5);
        assert_eq!(rec.get("stalk_len").unwrap().points.len(), stalks.len());
    }

    #[test]
    fn test_plant_accepts_scalar_area() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut rec = MemoryRecorder::new();
        let mut ctx = SimContext::new(&mut rng, &mut rec);
        let mut farmer = farmer();

        farmer.plant(1.0, &mut ctx).unwrap();
        assert_eq!(farmer.fields().len(), 1);
        assert_eq!(farmer.fields()[0].state(), FieldState::Grown);
    }

    #[test]
    fn test_second_planting_only_grows_new_fields() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut rec = MemoryRecorder::new();
        let mut ctx = SimContext::new(&mut rng, &mut rec);
        let mut farmer = farmer();

        farmer.plant(1.0, &mut ctx).unwrap();
        farmer.harvest(&mut ctx).unwrap();
        farmer.plant(1.0, &mut ctx).unwrap();

        assert_eq!(farmer.fields()[0].state(), FieldState::Harvested);
        assert_eq!(farmer.fields()[1].state(), FieldState::Grown);
    }

    #[test]
    fn test_invalid_area_plants_nothing() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut rec = MemoryRecorder::new();
        let mut ctx = SimContext::new(&mut rng, &mut rec);
        let mut farmer = farmer();

        assert!(farmer.plant([2.0, -1.0], &mut ctx).is_err());
        assert!(farmer.fields().is_empty());

        farmer.plant(1.0, &mut ctx).unwrap();
        assert_eq!(farmer.fields().len(), 1);
        assert_eq!(farmer.fields()[0].uid(), "field.0000");
        assert_eq!(farmer.fields()[0].state(), FieldState::Grown);
    }

    #[test]
    fn test_retired_farmer_rejects_work() {
        let mut rng = StdRng::seed_from_u64(8);
        let mut rec = MemoryRecorder::new();
        let mut ctx = SimContext::new(&mut rng, &mut rec);
        let mut farmer = farmer();

        farmer.retire().unwrap();
        assert_eq!(farmer.state(), FarmerState::Retired);

        assert!(farmer.plant(1.0, &mut ctx).unwrap_err().is_illegal_transition());
        assert!(farmer.harvest(&mut ctx).unwrap_err().is_illegal_transition());
        assert!(farmer.dry().unwrap_err().is_illegal_transition());
        assert!(farmer.get().unwrap_err().is_illegal_transition());
        assert!(farmer.retire().unwrap_err().is_illegal_transition());
    }
}
