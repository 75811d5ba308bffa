//! Stalk entity - a harvested hemp stalk
//!
//! Stalks move through FRESH → DRIED → SELECTED → CUT → PEELED. Stalks that
//! fail selection or preparation end up SCRAPPED with their remaining length
//! booked as scrap.

use rand::Rng;
use serde::Serialize;
use std::f64::consts::PI;
use std::fmt;

use crate::core::config::PeelerConfig;
use crate::core::error::SimError;
use crate::core::lifecycle::{Lifecycle, Machine};
use crate::entities::bast::{Bast, Width};

/// Chance that peeling yields no bast at all
const PEEL_FAILURE: f64 = 0.1;

/// Chance that peeling yields exactly one bast strip
const PEEL_PARTIAL: f64 = 0.4;

/// Scrap accumulated from a stalk, by category (lengths in mm)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Scrap {
    /// Stalk length removed before peeling
    pub stalk: f64,
    /// Woody core left after peeling
    pub wood: f64,
    /// Bast fiber length lost while peeling
    pub fibres: f64,
}

impl Scrap {
    pub fn total(&self) -> f64 {
        self.stalk + self.wood + self.fibres
    }
}

impl std::ops::AddAssign for Scrap {
    fn add_assign(&mut self, other: Self) {
        self.stalk += other.stalk;
        self.wood += other.wood;
        self.fibres += other.fibres;
    }
}

/// Stalk lifecycle states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StalkState {
    Fresh,
    Dried,
    Selected,
    Cut,
    Peeled,
    Scrapped,
}

/// Operations on a stalk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StalkOp {
    Dry,
    Select,
    Reject,
    Cut,
    Peel,
    Scrap,
}

impl fmt::Display for StalkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StalkState::Fresh => write!(f, "fresh"),
            StalkState::Dried => write!(f, "dried"),
            StalkState::Selected => write!(f, "selected"),
            StalkState::Cut => write!(f, "cut"),
            StalkState::Peeled => write!(f, "peeled"),
            StalkState::Scrapped => write!(f, "scrapped"),
        }
    }
}

impl fmt::Display for StalkOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StalkOp::Dry => write!(f, "dry"),
            StalkOp::Select => write!(f, "select"),
            StalkOp::Reject => write!(f, "reject"),
            StalkOp::Cut => write!(f, "cut"),
            StalkOp::Peel => write!(f, "peel"),
            StalkOp::Scrap => write!(f, "scrap"),
        }
    }
}

impl Lifecycle for StalkState {
    type Op = StalkOp;
    const ENTITY: &'static str = "stalk";
    const INITIAL: Self = StalkState::Fresh;
    const TRANSITIONS: &'static [(Self, StalkOp, Self)] = &[
        (StalkState::Fresh, StalkOp::Dry, StalkState::Dried),
        (StalkState::Dried, StalkOp::Select, StalkState::Selected),
        (StalkState::Dried, StalkOp::Reject, StalkState::Scrapped),
        (StalkState::Selected, StalkOp::Cut, StalkState::Cut),
        (StalkState::Cut, StalkOp::Peel, StalkState::Peeled),
        (StalkState::Cut, StalkOp::Scrap, StalkState::Scrapped),
    ];
}

/// Nominal bast width peeled from a stalk of `diameter` (half the circumference)
pub fn bast_width_of(diameter: f64) -> f64 {
    diameter * PI / 2.0
}

/// Why a stalk was not selected for peeling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    TooThin,
    TooThick,
    TooShort,
    TooLong,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::TooThin => write!(f, "too thin"),
            Rejection::TooThick => write!(f, "too thick"),
            Rejection::TooShort => write!(f, "too short"),
            Rejection::TooLong => write!(f, "too long"),
        }
    }
}

/// A single hemp stalk (dimensions in mm)
#[derive(Debug, Clone, PartialEq)]
pub struct Stalk {
    length: f64,
    diameter: f64,
    scrap: Scrap,
    machine: Machine<StalkState>,
}

impl Stalk {
    /// A fresh stalk, assumed to have constant diameter over its length
    pub fn new(length: f64, diameter: f64) -> Self {
        Self {
            length,
            diameter,
            scrap: Scrap::default(),
            machine: Machine::new(),
        }
    }

    pub fn length(&self) -> f64 {
        self.length
    }

    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    pub fn scrap(&self) -> Scrap {
        self.scrap
    }

    pub fn state(&self) -> StalkState {
        self.machine.state()
    }

    /// Nominal width of bast peeled from this stalk
    pub fn bast_width(&self) -> f64 {
        bast_width_of(self.diameter)
    }

    pub fn dry(&mut self) -> Result<(), SimError> {
        self.machine.apply(StalkOp::Dry)?;
        Ok(())
    }

    /// Check the stalk against the peeler's geometry limits
    ///
    /// Ineligible stalks are scrapped on the spot: their whole length goes to
    /// the stalk scrap bucket and `false` is returned.
    pub fn select(&mut self, config: &PeelerConfig) -> Result<bool, SimError> {
        self.machine.check(StalkOp::Select)?;

        match self.rejection(config) {
            None => {
                self.machine.apply(StalkOp::Select)?;
                Ok(true)
            }
            Some(reason) => {
                tracing::debug!(
                    length = self.length,
                    diameter = self.diameter,
                    %reason,
                    "stalk rejected"
                );
                self.scrap.stalk += self.length;
                self.length = 0.0;
                self.machine.apply(StalkOp::Reject)?;
                Ok(false)
            }
        }
    }

    fn rejection(&self, config: &PeelerConfig) -> Option<Rejection> {
        if self.diameter < config.min_dia {
            Some(Rejection::TooThin)
        } else if self.diameter > config.max_dia {
            Some(Rejection::TooThick)
        } else if self.length < config.min_len {
            Some(Rejection::TooShort)
        } else if self.length > config.max_len {
            Some(Rejection::TooLong)
        } else {
            None
        }
    }

    /// Shorten to `length`; a stalk already short enough is left as is
    pub fn cut(&mut self, length: f64) -> Result<(), SimError> {
        self.machine.check(StalkOp::Cut)?;

        if length < self.length {
            self.scrap.stalk += self.length - length;
            self.length = length;
        }

        self.machine.apply(StalkOp::Cut)?;
        Ok(())
    }

    /// Discard a cut stalk that failed preparation
    pub fn discard(&mut self) -> Result<(), SimError> {
        self.machine.check(StalkOp::Scrap)?;
        self.scrap.stalk += self.length;
        self.length = 0.0;
        self.machine.apply(StalkOp::Scrap)?;
        Ok(())
    }

    /// Peel into zero, one or two strips of fresh bast
    ///
    /// Each strip gets an independently sampled share of the stalk length and
    /// the stalk's nominal bast width. The woody core and the unpeeled fiber
    /// are booked as scrap.
    pub fn peel<R: Rng + ?Sized>(
        &mut self,
        config: &PeelerConfig,
        rng: &mut R,
    ) -> Result<Vec<Bast>, SimError> {
        self.machine.check(StalkOp::Peel)?;

        let chance: f64 = rng.random();
        let count = if chance < PEEL_FAILURE {
            0
        } else if chance < PEEL_FAILURE + PEEL_PARTIAL {
            1
        } else {
            2
        };

        let success = config.success.sample(count, rng)?;
        let mut basts = Vec::with_capacity(count);
        for percent in success {
            let length = self.length * percent / 100.0;
            self.scrap.fibres += self.length - length;
            basts.push(Bast::new(length, Width::Scalar(self.bast_width()), rng)?);
        }
        self.scrap.wood += self.length;

        self.machine.apply(StalkOp::Peel)?;
        Ok(basts)
    }
}
