//! `capstat stats` command - portfolio summary dashboard

use console::style;
use miette::Result;
use tabled::{builder::Builder, settings::Style};

use crate::cli::helpers::{as_of, effective_format, load_snapshot, print_serialized, truncate_str};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::answer::money;
use crate::engine::Engine;

#[derive(clap::Args, Debug)]
pub struct StatsArgs {
    /// Break the numbers down by facility instead of category
    #[arg(long)]
    pub by_facility: bool,
}

pub fn run(args: StatsArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let snapshot = load_snapshot(global, &config)?;
    let engine = Engine::new(config.engine.clone());
    let metrics = engine.metrics(&snapshot, as_of(global));

    match effective_format(global, &config) {
        OutputFormat::Auto => {
            println!("{}", style("Portfolio Status").bold().underlined());
            println!();
            println!("Projects:        {}", metrics.total_projects);
            println!(
                "Current budget:  {}",
                style(money(metrics.total_current_budget)).bold()
            );
            println!("Paid to date:    {}", money(metrics.total_paid));
            println!("Remaining:       {}", money(metrics.remaining()));
            if let Some(rate) = metrics.spend_rate() {
                println!("Spend rate:      {rate:.0}%");
            }
            if let Some(pct) = metrics.avg_completion {
                println!("Avg completion:  {pct:.0}%");
            }
            println!();
            println!(
                "Active {}  Completed {}  Delayed {}  Over budget {}",
                metrics.active,
                metrics.completed,
                style(metrics.delayed).yellow(),
                style(metrics.over_budget).red(),
            );

            let groups = if args.by_facility {
                &metrics.by_facility
            } else {
                &metrics.by_category
            };
            if !groups.is_empty() {
                println!();
                let mut table = Builder::default();
                table.push_record(["Group", "Projects", "Budget", "Paid", "Delayed"]);
                for group in groups {
                    table.push_record([
                        truncate_str(&group.name, 30),
                        group.project_count.to_string(),
                        money(group.total_budget),
                        money(group.total_paid),
                        group.delayed.to_string(),
                    ]);
                }
                println!("{}", table.build().with(Style::sharp()));
            }
        }
        format => print_serialized(&metrics, format)?,
    }

    Ok(())
}
