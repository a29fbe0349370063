//! CLI argument definitions using clap derive

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    ask::AskArgs,
    completions::CompletionsArgs,
    insights::InsightsArgs,
    resolve::ResolveArgs,
    stats::StatsArgs,
    vendor::VendorCommands,
};

#[derive(Parser)]
#[command(name = "capstat")]
#[command(author, version, about = "Capital project portfolio analysis")]
#[command(
    long_about = "Answers natural-language questions about a capital project \
                  portfolio snapshot: schedule risk, budget position, vendor \
                  performance, and derived insights."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Snapshot file or directory (default: from config or CAPSTAT_SNAPSHOT)
    #[arg(long, short = 's', global = true)]
    pub snapshot: Option<PathBuf>,

    /// Evaluation date for schedule math (default: today)
    #[arg(long, global = true, value_name = "YYYY-MM-DD")]
    pub as_of: Option<NaiveDate>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question about the portfolio
    Ask(AskArgs),

    /// Portfolio summary statistics
    Stats(StatsArgs),

    /// Derived insights (budget trends, delay patterns, vendor alerts)
    Insights(InsightsArgs),

    /// Vendor performance and fitness scoring
    #[command(subcommand)]
    Vendor(VendorCommands),

    /// Propose facility names for records missing one
    Resolve(ResolveArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output for the terminal
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
}
