//! Material flowing through the hemp line

pub mod bast;
pub mod field;
pub mod sheet;
pub mod stalk;

pub use bast::{Bast, BastOp, BastState, Width};
pub use field::{Field, FieldOp, FieldState, HarvestRecord};
pub use sheet::{Sheet, SheetOp, SheetSample, SheetState, SheetSummary};
pub use stalk::{Rejection, Scrap, Stalk, StalkOp, StalkState};
