//! `capstat resolve` command - propose facility names for unmapped records

use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{effective_format, load_snapshot, print_serialized, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::{Engine, Resolution};

#[derive(clap::Args, Debug)]
pub struct ResolveArgs {
    /// Resolve a single title instead of scanning the snapshot
    #[arg(long, short = 't')]
    pub title: Option<String>,

    /// Only show records that could not be resolved
    #[arg(long)]
    pub unresolved: bool,
}

pub fn run(args: ResolveArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let engine = Engine::new(config.engine.clone());

    if let Some(title) = &args.title {
        let resolver = crate::engine::FacilityResolver::default();
        let resolution = resolver.resolve(title);
        match effective_format(global, &config) {
            OutputFormat::Auto => match &resolution {
                Resolution::Unresolved => println!("No match."),
                other => println!(
                    "{} ({} confidence)",
                    style(other.name().unwrap_or_default()).bold(),
                    other.confidence(),
                ),
            },
            format => print_serialized(&resolution, format)?,
        }
        return Ok(());
    }

    let snapshot = load_snapshot(global, &config)?;
    let report = engine.resolve_missing(&snapshot);

    match effective_format(global, &config) {
        OutputFormat::Auto => {
            if report.total_missing == 0 {
                println!("Every record already carries a facility reference.");
                return Ok(());
            }
            println!(
                "{} record(s) missing a facility: {} matched, {} inferred, {} unresolved",
                report.total_missing,
                style(report.high).green(),
                style(report.medium).yellow(),
                style(report.unresolved).red(),
            );
            println!();

            let mut table = Builder::default();
            table.push_record(["ID", "Title", "Proposed Facility", "Confidence"]);
            for entry in &report.entries {
                let unresolved = entry.resolution == Resolution::Unresolved;
                if args.unresolved && !unresolved {
                    continue;
                }
                table.push_record([
                    entry.id.clone(),
                    truncate_str(&entry.title, 40),
                    entry.resolution.name().unwrap_or("-").to_string(),
                    entry.resolution.confidence().to_string(),
                ]);
            }
            println!("{}", table.build().with(Style::sharp()));
        }
        format => print_serialized(&report, format)?,
    }

    Ok(())
}
