//! Choco - compiler driver
//!
//! Reads type-checked program trees (JSON, as produced by the front end),
//! runs closure conversion, and optionally evaluates the result.

mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Choco compiler driver
#[derive(Parser, Debug)]
#[command(name = "choco")]
#[command(author, version, about = "Lower type-checked Choco programs")]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Output format
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// Configuration file [default: ./choco.toml when present]
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Convert closures into classes and write the lowered tree
    Lower(commands::lower::LowerArgs),

    /// Lower a program, then evaluate it
    Run(commands::run::RunArgs),

    /// Explain an error code
    Explain(commands::explain::ExplainArgs),
}

fn init_logging(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    // Determine if colors should be used
    let use_color = !cli.no_color && !cli.quiet && atty::is(atty::Stream::Stdout);

    let Some(command) = cli.command else {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        cmd.print_help()?;
        println!();
        return Ok(());
    };

    match command {
        Commands::Lower(args) => {
            let config = config::load(cli.config.as_deref())?;
            commands::lower::run(args, &config, cli.format, use_color, cli.quiet)
        }
        Commands::Run(args) => {
            let config = config::load(cli.config.as_deref())?;
            commands::run::run(args, &config, cli.format, use_color)
        }
        Commands::Explain(args) => commands::explain::run(args, cli.format, use_color),
    }
}
