//! hempline: stochastic simulation of a hemp-to-sheet production line
//!
//! Fields are planted and harvested, the stalks are selected, cut and peeled
//! into bast, and the bast is cut, spliced and stitched into a layered sheet.
//! Every random draw goes through an injected, seedable generator, so a run is
//! reproducible from its seed.

pub mod cli;
pub mod core;
pub mod entities;
pub mod stages;
pub mod yaml;
