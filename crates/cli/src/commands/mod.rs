//! Command implementations for the kensa CLI
//!
//! All three subcommands share one argument set and one runner: `analyze`
//! prints findings, `generate` writes test suites, `full` does both.

pub mod analyze;
pub mod output;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum OutputFormat {
    Terminal,
    Md,
    Json,
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    #[arg(short, long, default_value = "kensa-out")]
    pub output_dir: PathBuf,

    #[arg(short, long, value_enum, default_value_t = OutputFormat::Terminal)]
    pub format: OutputFormat,

    /// YAML or JSON analysis config
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    #[arg(short, long)]
    pub verbose: bool,
}
