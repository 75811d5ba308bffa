//! Output formatting utilities

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::cli::helpers::{format_length, format_percent};
use crate::stages::RunReport;

/// One row of the stage overview table
#[derive(Tabled)]
struct StageRow {
    #[tabled(rename = "STAGE")]
    stage: &'static str,
    #[tabled(rename = "ITEMS")]
    items: String,
    #[tabled(rename = "DETAIL")]
    detail: String,
}

/// Print any serializable value as pretty JSON
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}

/// Stage overview of a pipeline run
pub fn report_table(report: &RunReport) -> String {
    let sheet = &report.sheet;
    let rows = vec![
        StageRow {
            stage: "fields",
            items: report.fields.to_string(),
            detail: format!("{} m²", report.area),
        },
        StageRow {
            stage: "harvested",
            items: report.stalks_harvested.to_string(),
            detail: "stalks".to_string(),
        },
        StageRow {
            stage: "selected",
            items: report.stalks_selected.to_string(),
            detail: format!(
                "{} of harvest",
                format_percent(report.stalks_selected, report.stalks_harvested)
            ),
        },
        StageRow {
            stage: "peeled",
            items: report.basts_peeled.to_string(),
            detail: format!("bast strips, nominal {}%", report.peel_efficiency),
        },
        StageRow {
            stage: "cut",
            items: report.segments_cut.to_string(),
            detail: "segments".to_string(),
        },
        StageRow {
            stage: "spliced",
            items: report.strips_spliced.to_string(),
            detail: "strips".to_string(),
        },
        StageRow {
            stage: "sewn",
            items: sheet.samples.to_string(),
            detail: format!("sections, {}", format_length(sheet.length)),
        },
    ];

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Scrap breakdown by category
pub fn scrap_table(report: &RunReport) -> String {
    let scrap = &report.scrap;
    let rows = vec![
        StageRow {
            stage: "stalk",
            items: format_length(scrap.stalk),
            detail: "cut off or rejected".to_string(),
        },
        StageRow {
            stage: "wood",
            items: format_length(scrap.wood),
            detail: "peeled husk".to_string(),
        },
        StageRow {
            stage: "fibres",
            items: format_length(scrap.fibres),
            detail: "lost while peeling".to_string(),
        },
    ];

    Table::new(rows).with(Style::rounded()).to_string()
}
