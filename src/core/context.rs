//! Per-run collaborators threaded through every stage operation

use rand::RngCore;

use crate::core::error::SimError;
use crate::core::report::{Recorder, Series};

/// Random source and reporting sink for one simulation run
pub struct SimContext<'a> {
    pub rng: &'a mut dyn RngCore,
    pub recorder: &'a mut dyn Recorder,
}

impl<'a> SimContext<'a> {
    pub fn new(rng: &'a mut dyn RngCore, recorder: &'a mut dyn Recorder) -> Self {
        Self { rng, recorder }
    }

    /// Hand a series to the recorder
    pub fn record(&mut self, series: Series) -> Result<(), SimError> {
        self.recorder.record(series)
    }
}
