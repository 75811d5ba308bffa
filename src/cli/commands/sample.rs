//! `hempline sample` command - draw values from the line's distributions

use clap::ValueEnum;
use console::style;
use miette::{miette, IntoDiagnostic, Result};
use serde::Serialize;

use crate::cli::helpers::make_rng;
use crate::cli::output::print_json;
use crate::cli::viz;
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::distribution::{BetaParams, BetaShape, FlatParams};

/// Distribution to sample from
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum Dist {
    /// Bounded beta distribution fitted to mean and variance
    #[default]
    Beta,
    /// Uniform distribution
    Flat,
}

#[derive(clap::Args, Debug)]
pub struct SampleArgs {
    /// Distribution kind
    #[arg(value_enum, default_value_t = Dist::Beta)]
    pub dist: Dist,

    /// Number of samples
    #[arg(long, short = 'n', default_value_t = 1000)]
    pub count: usize,

    /// Lower bound
    #[arg(long, allow_negative_numbers = true)]
    pub min: f64,

    /// Upper bound
    #[arg(long, allow_negative_numbers = true)]
    pub max: f64,

    /// Mean (beta only)
    #[arg(long, allow_negative_numbers = true)]
    pub mean: Option<f64>,

    /// Variance (beta only)
    #[arg(long = "var")]
    pub variance: Option<f64>,

    /// Seed for the random generator
    #[arg(long, short = 's')]
    pub seed: Option<u64>,

    /// Print a histogram and summary instead of the raw values
    #[arg(long)]
    pub histogram: bool,

    /// Number of histogram bins
    #[arg(long, default_value_t = 20)]
    pub bins: usize,
}

/// Observed statistics of a sample
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SampleStats {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl SampleStats {
    pub fn of(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(Self {
            count: values.len(),
            min: values.iter().cloned().fold(f64::INFINITY, f64::min),
            max: values.iter().cloned().fold(f64::NEG_INFINITY, f64::max),
            mean,
            std_dev: var.sqrt(),
        })
    }
}

#[derive(Serialize)]
struct SampleOutput {
    values: Vec<f64>,
    shape: Option<BetaShape>,
    stats: Option<SampleStats>,
}

pub fn run(args: SampleArgs, global: &GlobalOpts) -> Result<()> {
    let (mut rng, _) = make_rng(args.seed);

    let (values, shape) = match args.dist {
        Dist::Beta => {
            let mean = args
                .mean
                .ok_or_else(|| miette!("--mean is required for a beta distribution"))?;
            let variance = args
                .variance
                .ok_or_else(|| miette!("--var is required for a beta distribution"))?;
            let params = BetaParams::new(args.min, args.max, mean, variance);
            let shape = params.fit().into_diagnostic()?;
            (shape.sample(args.count, &mut rng).into_diagnostic()?, Some(shape))
        }
        Dist::Flat => {
            let params = FlatParams::new(args.min, args.max);
            (params.sample(args.count, &mut rng).into_diagnostic()?, None)
        }
    };

    let stats = SampleStats::of(&values);

    if global.format == OutputFormat::Json {
        return print_json(&SampleOutput {
            values,
            shape,
            stats,
        });
    }

    if !args.histogram {
        for value in &values {
            println!("{}", value);
        }
        return Ok(());
    }

    if let Some(shape) = &shape {
        println!(
            "   {} alpha {:.3}  beta {:.3}",
            style("Beta").bold(),
            shape.alpha,
            shape.beta
        );
        println!(
            "   mode {:.2}  mean {:.2}  median {:.2}  variance {:.2}",
            shape.mode(),
            shape.mean(),
            shape.median(),
            shape.variance()
        );
        println!();
    }

    print!("{}", viz::render_histogram(&values, args.bins));

    if let Some(stats) = stats {
        println!();
        println!("   min : {:>10.2}", stats.min);
        println!("   max : {:>10.2}", stats.max);
        println!("   mean: {:>10.2}", stats.mean);
        println!("   std : {:>10.2}", stats.std_dev);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_stats() {
        let stats = SampleStats::of(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(stats.count, 4);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 4.0);
        assert_eq!(stats.mean, 2.5);
        assert!((stats.std_dev - 1.118034).abs() < 1e-6);
    }

    #[test]
    fn test_sample_stats_empty() {
        assert!(SampleStats::of(&[]).is_none());
    }
}
