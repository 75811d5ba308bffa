//! Pipeline runner - drives the stages through the one legal sequence
//!
//! plant → harvest → dry → get, feed → select → cut → peel,
//! feed → cut → splice → sew, then the sheet statistics.

use serde::Serialize;

use crate::core::config::SimConfig;
use crate::core::context::SimContext;
use crate::core::error::SimError;
use crate::entities::sheet::{Sheet, SheetSummary};
use crate::entities::stalk::Scrap;
use crate::stages::farmer::Farmer;
use crate::stages::peeler::Peeler;
use crate::stages::stitcher::Stitcher;

/// Counts collected while running the line
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub fields: usize,
    pub area: f64,
    pub stalks_harvested: usize,
    pub stalks_selected: usize,
    pub stalks_scrapped: usize,
    pub scrap: Scrap,
    pub basts_peeled: usize,
    /// Nominal peeling efficiency of the machine, in percent
    pub peel_efficiency: f64,
    pub segments_cut: usize,
    pub strips_spliced: usize,
    pub sheet: SheetSummary,

    /// The sewn sheet itself
    #[serde(skip)]
    pub product: Sheet,
}

/// Run the whole hemp line on fields of the given areas
pub fn run_pipeline(
    config: &SimConfig,
    areas: &[f64],
    ctx: &mut SimContext<'_>,
) -> Result<RunReport, SimError> {
    let mut farmer = Farmer::new(config.farmer.clone());
    farmer.plant(areas, ctx)?;
    farmer.harvest(ctx)?;
    farmer.dry()?;
    let stalks = farmer.get()?;
    let stalks_harvested = stalks.len();
    farmer.retire()?;

    let mut peeler = Peeler::new(config.peeler.clone());
    peeler.feed(stalks)?;
    peeler.select(ctx)?;
    let stalks_selected = peeler.selected().len();
    peeler.cut(ctx)?;
    let bast = peeler.peel(ctx)?;
    peeler.turn_off()?;
    let basts_peeled = bast.len();

    let mut stitcher = Stitcher::new(config.stitcher.clone());
    stitcher.feed(bast, ctx)?;
    stitcher.cut(ctx)?;
    let segments_cut = stitcher.cut_pieces().len();
    stitcher.splice(ctx)?;
    let strips_spliced = stitcher.spliced().len();
    let sheet = stitcher.sew()?;
    stitcher.turn_off()?;

    let summary = sheet.stats(&mut *ctx.recorder)?;

    let report = RunReport {
        fields: farmer.fields().len(),
        area: areas.iter().sum(),
        stalks_harvested,
        stalks_selected,
        stalks_scrapped: peeler.scrapped().len(),
        scrap: peeler.scrap_totals(),
        basts_peeled,
        peel_efficiency: config.peeler.peel_efficiency,
        segments_cut,
        strips_spliced,
        sheet: summary,
        product: sheet,
    };
    tracing::info!(
        stalks = report.stalks_harvested,
        basts = report.basts_peeled,
        sheet_mm = report.sheet.length,
        "pipeline finished"
    );
    Ok(report)
}
