//! `hempline config` command - configuration file management

use clap::Subcommand;
use console::style;
use miette::{miette, IntoDiagnostic, Result};
use std::fs;
use std::path::PathBuf;

use crate::cli::helpers::load_config;
use crate::core::config::SimConfig;

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write the default configuration to a file
    Init(InitArgs),

    /// Print the effective configuration as YAML
    Show(ShowArgs),

    /// Load and validate a configuration file
    Check(CheckArgs),
}

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Target file
    #[arg(default_value = "hempline.yaml")]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Configuration file (built-in defaults when omitted)
    pub path: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct CheckArgs {
    /// Configuration file to check
    pub path: PathBuf,
}

pub fn run(cmd: ConfigCommands) -> Result<()> {
    match cmd {
        ConfigCommands::Init(args) => run_init(args),
        ConfigCommands::Show(args) => run_show(args),
        ConfigCommands::Check(args) => run_check(args),
    }
}

fn run_init(args: InitArgs) -> Result<()> {
    if args.path.exists() && !args.force {
        return Err(miette!(
            "{} already exists (use --force to overwrite)",
            args.path.display()
        ));
    }

    let yaml = SimConfig::with_defaults().to_yaml().into_diagnostic()?;
    fs::write(&args.path, yaml).into_diagnostic()?;

    println!(
        "{} Wrote default configuration to {}",
        style("✓").green(),
        style(args.path.display()).cyan()
    );
    Ok(())
}

fn run_show(args: ShowArgs) -> Result<()> {
    let config = load_config(args.path.as_deref())?;
    print!("{}", config.to_yaml().into_diagnostic()?);
    Ok(())
}

fn run_check(args: CheckArgs) -> Result<()> {
    SimConfig::load(&args.path).into_diagnostic()?;
    println!(
        "{} {} is valid",
        style("✓").green(),
        args.path.display()
    );
    Ok(())
}
