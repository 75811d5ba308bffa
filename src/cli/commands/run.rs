//! `hempline run` command - run the whole production line

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::cli::helpers::{format_length, load_config, make_rng};
use crate::cli::output::{print_json, report_table, scrap_table};
use crate::cli::viz;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::context::SimContext;
use crate::core::report::{DataDirRecorder, NullRecorder, Recorder};
use crate::stages::run_pipeline;

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Configuration file (YAML, or JSON by extension); built-in defaults otherwise
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Field area in m²; repeat for several fields
    #[arg(long = "area", short = 'a', default_value = "10")]
    pub areas: Vec<f64>,

    /// Seed for the random generator (drawn from OS entropy when absent)
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Write every recorded data series as CSV into this directory
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Plot the sheet thickness in the terminal
    #[arg(long)]
    pub plot: bool,
}

pub fn run(args: RunArgs, global: &GlobalOpts) -> Result<()> {
    let config = load_config(args.config.as_deref())?;
    let (mut rng, seed) = make_rng(args.seed);
    if args.seed.is_none() && !global.quiet {
        eprintln!("{} seed {}", style("→").blue(), seed);
    }

    let mut data_dir = match &args.out {
        Some(dir) => Some(DataDirRecorder::create(dir).into_diagnostic()?),
        None => None,
    };
    let mut null = NullRecorder;
    let recorder: &mut dyn Recorder = match data_dir.as_mut() {
        Some(rec) => rec,
        None => &mut null,
    };

    let report = {
        let mut ctx = SimContext::new(&mut rng, recorder);
        run_pipeline(&config, &args.areas, &mut ctx).into_diagnostic()?
    };

    match global.format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            println!(
                "{} Sheet of {} from {} m² (seed {})\n",
                style("✓").green(),
                style(format_length(report.sheet.length)).cyan(),
                report.area,
                seed
            );
            println!("{}", report_table(&report));
            println!();
            println!("{}", style("Scrap").bold());
            println!("{}", scrap_table(&report));

            let sheet = &report.sheet;
            if sheet.samples > 0 {
                println!();
                println!(
                    "   width  min {:.2}  mean {:.2}  max {:.2} mm (target {:.2})",
                    sheet.min_width, sheet.mean_width, sheet.max_width, sheet.target_width
                );
                println!(
                    "   layers min {}  mean {:.2}  max {}",
                    sheet.min_layers, sheet.mean_layers, sheet.max_layers
                );
                if sheet.under_width > 0 {
                    println!(
                        "   {} {} section(s) below target width",
                        style("!").yellow(),
                        sheet.under_width
                    );
                }
            }
        }
    }

    if args.plot {
        println!();
        println!(
            "{}",
            viz::render_thickness(&report.product, viz::PLOT_WIDTH, viz::PLOT_HEIGHT)
        );
    }

    if let Some(rec) = &data_dir {
        if !global.quiet {
            eprintln!(
                "{} wrote {} data file(s) to {}",
                style("→").blue(),
                rec.written().len(),
                args.out.as_deref().map(|p| p.display().to_string()).unwrap_or_default()
            );
        }
    }

    Ok(())
}
