use clap::Parser;
use hempline::cli::{helpers, Cli, Commands};
use miette::Result;

fn main() -> Result<()> {
    // Fancy miette reports for every error leaving main
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .tab_width(4)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    helpers::init_tracing(cli.global.verbose, cli.global.quiet);

    match cli.command {
        Commands::Run(args) => hempline::cli::commands::run::run(args, &cli.global),
        Commands::Sample(args) => hempline::cli::commands::sample::run(args, &cli.global),
        Commands::Config(cmd) => hempline::cli::commands::config::run(cmd),
        Commands::Completions(args) => hempline::cli::commands::completions::run(args),
    }
}
