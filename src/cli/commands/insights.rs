//! `capstat insights` command - derived findings over the snapshot

use console::style;
use miette::Result;

use crate::cli::helpers::{as_of, effective_format, load_snapshot, print_serialized};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::{Engine, Severity};

#[derive(clap::Args, Debug)]
pub struct InsightsArgs {
    /// Only show findings at or above this severity
    #[arg(long, value_enum)]
    pub min_severity: Option<SeverityFilter>,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
pub enum SeverityFilter {
    Info,
    Warning,
    Critical,
}

impl From<SeverityFilter> for Severity {
    fn from(filter: SeverityFilter) -> Self {
        match filter {
            SeverityFilter::Info => Severity::Info,
            SeverityFilter::Warning => Severity::Warning,
            SeverityFilter::Critical => Severity::Critical,
        }
    }
}

pub fn run(args: InsightsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let snapshot = load_snapshot(global, &config)?;
    let engine = Engine::new(config.engine.clone());

    let floor = args.min_severity.map(Severity::from).unwrap_or(Severity::Info);
    let insights: Vec<_> = engine
        .insights(&snapshot, as_of(global))
        .into_iter()
        .filter(|i| i.severity >= floor)
        .collect();

    match effective_format(global, &config) {
        OutputFormat::Auto => {
            if insights.is_empty() {
                println!("No findings at this severity.");
                return Ok(());
            }
            for insight in &insights {
                let badge = match insight.severity {
                    Severity::Critical => style("CRITICAL").red().bold(),
                    Severity::Warning => style("WARNING").yellow().bold(),
                    Severity::Info => style("INFO").cyan(),
                };
                println!("{badge} {}", style(&insight.title).bold());
                println!("  {}", insight.description);
                if global.verbose {
                    println!("  {}", style(format!("rule: {}", insight.kind)).dim());
                }
                println!();
            }
            if !global.quiet {
                println!("{} finding(s)", insights.len());
            }
        }
        format => print_serialized(&insights, format)?,
    }

    Ok(())
}
