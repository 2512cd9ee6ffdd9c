use anyhow::Result;
use clap::Parser as ClapParser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use benchcmp::cli::{self, Cli, Commands};

fn main() {
    let cli_args = Cli::parse();
    init_tracing(cli_args.verbose);

    match run(cli_args) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            std::process::exit(cli::EXIT_FAILURE);
        }
    }
}

fn run(cli_args: Cli) -> Result<i32> {
    match cli_args.command {
        Commands::Compare {
            results_dir,
            latest,
            baseline,
            format,
            threshold,
            output,
        } => {
            let config = cli::load_config();
            let options = cli::compare_options(
                &config,
                results_dir,
                latest,
                baseline,
                format,
                threshold,
                output,
            );
            cli::compare(options)
        }
        Commands::Status { results_dir } => {
            let config = cli::load_config();
            cli::status(results_dir, &config)?;
            Ok(0)
        }
        Commands::Completions { shell } => {
            cli::completions(shell);
            Ok(0)
        }
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
