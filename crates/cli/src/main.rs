use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
use commands::{analyze, RunArgs};

#[derive(Parser)]
#[command(name = "kensa")]
#[command(about = "Invariant discovery, vulnerability detection and Foundry test generation for Solidity")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report invariants, vulnerabilities, gas advice and the security score
    Analyze(RunArgs),

    /// Write Foundry invariant and exploit suites
    Generate(RunArgs),

    /// Analyze and generate in one pass
    Full(RunArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Analyze(args) | Self::Generate(args) | Self::Full(args) => args.verbose,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.command.verbose());

    match cli.command {
        Commands::Analyze(args) => analyze::execute(&args, analyze::Mode::Analyze),
        Commands::Generate(args) => analyze::execute(&args, analyze::Mode::Generate),
        Commands::Full(args) => analyze::execute(&args, analyze::Mode::Full),
    }
}
