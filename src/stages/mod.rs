//! Production stages of the hemp line

pub mod farmer;
pub mod peeler;
pub mod pipeline;
pub mod stitcher;

pub use farmer::{Areas, Farmer, FarmerOp, FarmerState};
pub use peeler::{Peeler, PeelerOp, PeelerState};
pub use pipeline::{run_pipeline, RunReport};
pub use stitcher::{Stitcher, StitcherOp, StitcherState};
