//! `capstat ask` command - answer a question about the portfolio

use console::style;
use miette::Result;

use crate::cli::helpers::{as_of, effective_format, load_snapshot, print_serialized};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::engine::answer::{money, AnswerRow};
use crate::engine::Engine;

#[derive(clap::Args, Debug)]
pub struct AskArgs {
    /// The question, in plain English
    #[arg(required = true, num_args = 1.., value_name = "QUESTION")]
    pub question: Vec<String>,
}

pub fn run(args: AskArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let snapshot = load_snapshot(global, &config)?;
    let engine = Engine::new(config.engine.clone());

    let question = args.question.join(" ");
    let answer = engine.answer(&question, &snapshot, as_of(global));

    match effective_format(global, &config) {
        OutputFormat::Auto => {
            println!("{}", style(&answer.answer).bold());

            if !answer.data.is_empty() {
                println!();
                for row in &answer.data {
                    match row {
                        AnswerRow::Project(p) => {
                            let mut line = format!("  {} {} ({})", p.id, p.title, money(p.current_budget));
                            if let Some(days) = p.delay_days.filter(|d| *d > 0) {
                                line.push_str(&format!(" [{days}d behind]"));
                            }
                            if let Some(variance) = p.variance_pct.filter(|v| *v > 0.0) {
                                line.push_str(&format!(" [+{variance:.1}%]"));
                            }
                            println!("{line}");
                        }
                        AnswerRow::Vendor(v) => {
                            println!(
                                "  {} - {} projects, {} ({} delayed, {} over budget)",
                                v.name,
                                v.projects,
                                money(v.total_value),
                                v.delayed,
                                v.over_budget,
                            );
                        }
                        AnswerRow::Group(g) => {
                            let share = g
                                .share_pct
                                .map(|p| format!(" ({p:.0}%)"))
                                .unwrap_or_default();
                            println!(
                                "  {} - {} projects, {}{}",
                                g.name,
                                g.project_count,
                                money(g.total_budget),
                                share,
                            );
                        }
                    }
                }
            }

            if let Some(note) = &answer.data_note {
                println!();
                println!("{} {}", style("Note:").yellow(), note);
            }
            if let Some(step) = &answer.next_step {
                println!("{} {}", style("Next step:").cyan(), step);
            }
            if answer.ask_staff && !global.quiet {
                println!("{}", style("Worth raising with program staff.").dim());
            }
            if !global.quiet && !answer.suggestions.is_empty() {
                println!();
                println!("{}", style("You could also ask:").dim());
                for suggestion in &answer.suggestions {
                    println!("{}", style(format!("  - {suggestion}")).dim());
                }
            }
        }
        format => print_serialized(&answer, format)?,
    }

    Ok(())
}
