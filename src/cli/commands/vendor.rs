//! `capstat vendor` commands - performance listing and fitness scoring

use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{as_of, effective_format, load_snapshot, print_serialized, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::answer::money;
use crate::engine::{Engine, FitRating};

#[derive(clap::Subcommand, Debug)]
pub enum VendorCommands {
    /// List vendors ranked by total contract value
    List(ListArgs),

    /// Score a vendor's fitness for a prospective project
    Score(ScoreArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Only vendors with delayed or over-budget work
    #[arg(long)]
    pub issues: bool,
}

#[derive(clap::Args, Debug)]
pub struct ScoreArgs {
    /// Vendor name as it appears on project records
    pub name: String,

    /// Category of the prospective project
    #[arg(long, short = 'c')]
    pub category: String,

    /// Budget of the prospective project in dollars
    #[arg(long, short = 'b')]
    pub budget: f64,
}

pub fn run(cmd: VendorCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        VendorCommands::List(args) => list(args, global),
        VendorCommands::Score(args) => score(args, global),
    }
}

fn list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let snapshot = load_snapshot(global, &config)?;
    let engine = Engine::new(config.engine.clone());
    let book = engine.vendors(&snapshot, as_of(global));

    let vendors: Vec<_> = book
        .by_total_value()
        .into_iter()
        .filter(|v| !args.issues || v.has_issues())
        .cloned()
        .collect();

    match effective_format(global, &config) {
        OutputFormat::Auto => {
            if vendors.is_empty() {
                println!("No vendors found.");
                return Ok(());
            }
            let mut table = Builder::default();
            table.push_record(["Vendor", "Projects", "Total Value", "On Time", "On Budget"]);
            for vendor in &vendors {
                let rate = |r: Option<f64>| {
                    r.map(|r| format!("{r:.0}%")).unwrap_or_else(|| "-".to_string())
                };
                table.push_record([
                    truncate_str(&vendor.name, 30),
                    vendor.projects.to_string(),
                    money(vendor.total_value),
                    rate(vendor.on_time_rate()),
                    rate(vendor.on_budget_rate()),
                ]);
            }
            println!("{}", table.build().with(Style::sharp()));
            if !global.quiet {
                println!("{} vendor(s)", vendors.len());
            }
        }
        format => print_serialized(&vendors, format)?,
    }

    Ok(())
}

fn score(args: ScoreArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let snapshot = load_snapshot(global, &config)?;
    let engine = Engine::new(config.engine.clone());

    let fit = engine.score_vendor(
        &snapshot,
        &args.name,
        &args.category,
        args.budget,
        as_of(global),
    );

    match effective_format(global, &config) {
        OutputFormat::Auto => {
            let rating = match fit.rating {
                FitRating::Excellent => style(fit.rating.to_string()).green().bold(),
                FitRating::Good => style(fit.rating.to_string()).green(),
                FitRating::Fair => style(fit.rating.to_string()).yellow(),
                FitRating::Poor => style(fit.rating.to_string()).red(),
            };
            println!(
                "{} for a {} {} project: {} / 100 ({rating})",
                style(&args.name).bold(),
                money(args.budget),
                args.category,
                style(fit.score).bold(),
            );
            println!();
            let signed = |v: i32| format!("{v:+}");
            println!("  Category experience  {}", signed(fit.breakdown.category_experience));
            println!("  On-time delivery     {}", signed(fit.breakdown.on_time));
            println!("  On-budget delivery   {}", signed(fit.breakdown.on_budget));
            println!("  Capacity fit         {}", signed(fit.breakdown.capacity));
        }
        format => print_serialized(&fit, format)?,
    }

    Ok(())
}
