//! Intent handlers - one focused aggregation per question type
//!
//! Every handler is a pure function of the snapshot, the thresholds, and
//! the evaluation date. Headlines state the full count or total; the rows
//! are a representative slice capped at `max_rows`. An empty portfolio or
//! an empty result set produces a calm answer, never an error.

use chrono::NaiveDate;

use crate::core::{EngineConfig, Snapshot};
use crate::records::{ProjectRecord, VendorBook};

use super::answer::{money, Answer, AnswerRow, GroupRow, ProjectRow, VendorRow};
use super::metrics::{self, GroupMetrics};
use super::resolver::FacilityResolver;
use super::risk::RiskTier;
use super::router::Intent;

fn suggest(answer: Answer, intent: Intent) -> Answer {
    answer.with_suggestions(intent.suggestions())
}

fn project_rows(projects: &[&ProjectRecord], max_rows: usize, as_of: NaiveDate) -> Vec<AnswerRow> {
    projects
        .iter()
        .take(max_rows)
        .map(|p| AnswerRow::Project(ProjectRow::from_record(p, as_of)))
        .collect()
}

fn group_rows(groups: &[GroupMetrics], max_rows: usize, total_budget: f64) -> Vec<AnswerRow> {
    groups
        .iter()
        .take(max_rows)
        .map(|g| {
            AnswerRow::Group(GroupRow {
                name: g.name.clone(),
                project_count: g.project_count,
                total_budget: g.total_budget,
                total_paid: g.total_paid,
                share_pct: metrics::ratio(g.total_budget, total_budget).map(|r| r * 100.0),
            })
        })
        .collect()
}

/// Sort descending by an optional quantity, unknowns last
fn sort_desc_by_opt<T, F>(items: &mut [&T], key: F)
where
    F: Fn(&T) -> Option<f64>,
{
    items.sort_by(|a, b| {
        let ka = key(a).unwrap_or(f64::NEG_INFINITY);
        let kb = key(b).unwrap_or(f64::NEG_INFINITY);
        kb.partial_cmp(&ka).unwrap_or(std::cmp::Ordering::Equal)
    });
}

pub fn schedule_risks(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let mut delayed: Vec<&ProjectRecord> =
        snapshot.projects().filter(|p| p.is_delayed(as_of)).collect();

    if delayed.is_empty() {
        return suggest(
            Answer::new("No projects are currently behind their original schedules."),
            Intent::ScheduleRisk,
        );
    }

    sort_desc_by_opt(&mut delayed, |p| p.get_delay_days(as_of).map(|d| d as f64));
    let at_risk_value: f64 = delayed.iter().map(|p| p.budget()).sum();
    let worst = delayed[0].get_delay_days(as_of);
    let severe = delayed
        .iter()
        .filter(|p| p.get_delay_days(as_of).is_some_and(|d| d > config.delay_alert_days))
        .count();

    let mut text = format!(
        "{} project{} behind schedule, {} under contract.",
        delayed.len(),
        if delayed.len() == 1 { " is" } else { "s are" },
        money(at_risk_value),
    );
    if let Some(days) = worst {
        text.push_str(&format!(" The worst slip is {days} days."));
    }
    if severe > 0 {
        text.push_str(&format!(
            " {severe} exceed the {}-day alert threshold.",
            config.delay_alert_days
        ));
    }

    let unverifiable = delayed.iter().filter(|p| p.delay_unverifiable(as_of)).count();
    let mut answer = Answer::new(text);
    answer.data = project_rows(&delayed, config.max_rows, as_of);
    answer.ask_staff = true;
    answer.next_step =
        Some("Request updated completion dates from the contractors on the delayed work.".to_string());
    if unverifiable > 0 {
        answer.data_note = Some(format!(
            "{unverifiable} of these carry a delay flag without schedule dates to verify it."
        ));
    }
    suggest(answer, Intent::ScheduleRisk)
}

pub fn over_budget_alerts(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let mut over: Vec<&ProjectRecord> = snapshot
        .projects()
        .filter(|p| p.is_over_budget(config.budget_tolerance_pct))
        .collect();

    if over.is_empty() {
        return suggest(
            Answer::new("No projects have exceeded their original budgets."),
            Intent::OverBudget,
        );
    }

    sort_desc_by_opt(&mut over, |p| p.get_variance_pct());
    let total_overage: f64 = over.iter().filter_map(|p| p.overage()).sum();

    let mut answer = Answer::new(format!(
        "{} project{} over budget, {} in combined overruns above the original contracts.",
        over.len(),
        if over.len() == 1 { " is" } else { "s are" },
        money(total_overage),
    ));
    answer.data = project_rows(&over, config.max_rows, as_of);
    answer.ask_staff = true;
    answer.next_step =
        Some("Review the change orders behind the largest variances.".to_string());
    suggest(answer, Intent::OverBudget)
}

pub fn vendor_red_flags(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let book = VendorBook::from_snapshot(snapshot, config.budget_tolerance_pct, as_of);
    let mut flagged: Vec<&crate::records::VendorRecord> =
        book.iter().filter(|v| v.has_issues()).collect();

    if flagged.is_empty() {
        return suggest(
            Answer::new("No vendors are showing delivery problems right now."),
            Intent::VendorRedFlags,
        );
    }

    flagged.sort_by(|a, b| (b.delayed + b.over_budget).cmp(&(a.delayed + a.over_budget)));
    let mut answer = Answer::new(format!(
        "{} vendor{} with delayed or over-budget work.",
        flagged.len(),
        if flagged.len() == 1 { "" } else { "s" },
    ));
    answer.data = flagged
        .iter()
        .take(config.max_rows)
        .map(|v| AnswerRow::Vendor(VendorRow::from_record(v)))
        .collect();
    answer.ask_staff = true;
    suggest(answer, Intent::VendorRedFlags)
}

pub fn concerns(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let delayed: Vec<&ProjectRecord> =
        snapshot.projects().filter(|p| p.is_delayed(as_of)).collect();
    let over: Vec<&ProjectRecord> = snapshot
        .projects()
        .filter(|p| p.is_over_budget(config.budget_tolerance_pct))
        .collect();
    let high_concerns = snapshot
        .open_concerns()
        .filter(|c| c.severity == crate::records::ConcernSeverity::High)
        .count();

    if delayed.is_empty() && over.is_empty() && high_concerns == 0 {
        return suggest(
            Answer::new("Nothing stands out: schedules and budgets both look on track."),
            Intent::Concerns,
        );
    }

    let delayed_value: f64 = delayed.iter().map(|p| p.budget()).sum();
    let total_overage: f64 = over.iter().filter_map(|p| p.overage()).sum();

    let mut parts = Vec::new();
    if !delayed.is_empty() {
        parts.push(format!(
            "{} delayed project{} ({} under contract)",
            delayed.len(),
            if delayed.len() == 1 { "" } else { "s" },
            money(delayed_value),
        ));
    }
    if !over.is_empty() {
        parts.push(format!(
            "{} over budget ({} in overruns)",
            over.len(),
            money(total_overage),
        ));
    }
    if high_concerns > 0 {
        parts.push(format!("{high_concerns} open high-severity concerns on file"));
    }

    // Worst projects first: both flags, then one, then by money at stake
    let mut risky: Vec<&ProjectRecord> = snapshot
        .projects()
        .filter(|p| RiskTier::classify_project(p, config, as_of) > RiskTier::Low)
        .collect();
    risky.sort_by(|a, b| {
        RiskTier::classify_project(b, config, as_of)
            .cmp(&RiskTier::classify_project(a, config, as_of))
            .then_with(|| {
                b.budget()
                    .partial_cmp(&a.budget())
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
    });

    let mut answer = Answer::new(format!(
        "{} thing{} to watch: {}.",
        parts.len(),
        if parts.len() == 1 { "" } else { "s" },
        parts.join("; ")
    ));
    answer.data = project_rows(&risky, config.max_rows, as_of);
    answer.ask_staff = true;
    suggest(answer, Intent::Concerns)
}

pub fn remaining_budget(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let metrics = metrics::aggregate(snapshot, config, as_of);
    if metrics.total_projects == 0 {
        return suggest(Answer::new("No project records to report on."), Intent::RemainingBudget);
    }

    let remaining = metrics.remaining();
    let pct = metrics
        .spend_rate()
        .map(|spent| 100.0 - spent)
        .map(|p| format!(" ({p:.0}% of the current budget)"))
        .unwrap_or_default();

    let mut answer = Answer::new(format!(
        "{} remains unspent{} across {} projects.",
        money(remaining),
        pct,
        metrics.total_projects,
    ));
    answer.data = group_rows(&metrics.by_category, config.max_rows, metrics.total_current_budget);
    suggest(answer, Intent::RemainingBudget)
}

pub fn largest_projects(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let mut projects: Vec<&ProjectRecord> = snapshot.projects().collect();
    if projects.is_empty() {
        return suggest(Answer::new("No project records to report on."), Intent::LargestProjects);
    }

    sort_desc_by_opt(&mut projects, |p| Some(p.budget()));
    let top: Vec<&ProjectRecord> = projects.into_iter().take(config.max_rows).collect();
    let combined: f64 = top.iter().map(|p| p.budget()).sum();

    let mut answer = Answer::new(format!(
        "The {} largest projects total {}.",
        top.len(),
        money(combined),
    ));
    answer.data = project_rows(&top, config.max_rows, as_of);
    suggest(answer, Intent::LargestProjects)
}

pub fn budget_summary(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let metrics = metrics::aggregate(snapshot, config, as_of);
    if metrics.total_projects == 0 {
        return suggest(Answer::new("No project records to report on."), Intent::BudgetSummary);
    }

    let spend = metrics
        .spend_rate()
        .map(|r| format!(" ({r:.0}% of budget)"))
        .unwrap_or_default();

    let mut answer = Answer::new(format!(
        "{} projects with a current budget of {}; {} paid out so far{}. \
         {} active, {} completed, {} delayed, {} over budget.",
        metrics.total_projects,
        money(metrics.total_current_budget),
        money(metrics.total_paid),
        spend,
        metrics.active,
        metrics.completed,
        metrics.delayed,
        metrics.over_budget,
    ));
    answer.data = group_rows(&metrics.by_category, config.max_rows, metrics.total_current_budget);
    suggest(answer, Intent::BudgetSummary)
}

pub fn top_vendor(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let book = VendorBook::from_snapshot(snapshot, config.budget_tolerance_pct, as_of);
    let ranked = book.by_total_value();
    let Some(top) = ranked.first() else {
        return suggest(
            Answer::new("No vendors are assigned to any project in the records."),
            Intent::TopVendor,
        );
    };

    let progress = top
        .avg_completion
        .map(|pct| format!(" averaging {pct:.0}% complete"))
        .unwrap_or_default();
    let caveat = if top.delayed > 0 {
        format!(", though {} of them {} behind schedule", top.delayed,
            if top.delayed == 1 { "is" } else { "are" })
    } else {
        String::new()
    };

    let mut answer = Answer::new(format!(
        "{} holds the most work: {} project{} worth {}{}{}.",
        top.name,
        top.projects,
        if top.projects == 1 { "" } else { "s" },
        money(top.total_value),
        progress,
        caveat,
    ));
    answer.data = vec![AnswerRow::Vendor(VendorRow::from_record(top))];
    suggest(answer, Intent::TopVendor)
}

pub fn facility_activity(
    config: &EngineConfig,
    snapshot: &Snapshot,
    resolver: &FacilityResolver,
    as_of: NaiveDate,
) -> Answer {
    let metrics = metrics::aggregate(snapshot, config, as_of);
    if metrics.by_facility.is_empty() {
        return suggest(
            Answer::new("No project records carry a facility reference."),
            Intent::FacilityActivity,
        );
    }

    let mut by_count = metrics.by_facility.clone();
    by_count.sort_by(|a, b| b.project_count.cmp(&a.project_count));
    let busiest = &by_count[0];

    let mut answer = Answer::new(format!(
        "{} has the most activity: {} project{} worth {}.",
        busiest.name,
        busiest.project_count,
        if busiest.project_count == 1 { "" } else { "s" },
        money(busiest.total_budget),
    ));
    answer.data = group_rows(&by_count, config.max_rows, metrics.total_current_budget);

    let report = resolver.resolve_all(snapshot);
    if report.total_missing > 0 {
        answer.data_note = Some(format!(
            "{} projects have no facility reference; {} could not be matched to a school from their titles.",
            report.total_missing, report.unresolved,
        ));
    }
    suggest(answer, Intent::FacilityActivity)
}

pub fn category_split(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let metrics = metrics::aggregate(snapshot, config, as_of);
    if metrics.by_category.is_empty() {
        return suggest(
            Answer::new("No project records carry a category."),
            Intent::CategorySplit,
        );
    }

    let leader = &metrics.by_category[0];
    let share = metrics::ratio(leader.total_budget, metrics.total_current_budget)
        .map(|r| format!(" ({:.0}% of the portfolio)", r * 100.0))
        .unwrap_or_default();

    let mut answer = Answer::new(format!(
        "Spending splits across {} categories; {} leads at {}{}.",
        metrics.by_category.len(),
        leader.name,
        money(leader.total_budget),
        share,
    ));
    answer.data = group_rows(&metrics.by_category, config.max_rows, metrics.total_current_budget);
    suggest(answer, Intent::CategorySplit)
}

pub fn upcoming_completions(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let horizon = as_of + chrono::Duration::days(config.upcoming_window_days);
    let mut upcoming: Vec<&ProjectRecord> = snapshot
        .projects()
        .filter(|p| p.status == crate::records::ProjectStatus::Active)
        .filter(|p| {
            p.current_end
                .or(p.original_end)
                .is_some_and(|end| end >= as_of && end <= horizon)
        })
        .collect();

    if upcoming.is_empty() {
        return suggest(
            Answer::new(format!(
                "No active projects are scheduled to finish in the next {} days.",
                config.upcoming_window_days
            )),
            Intent::UpcomingCompletions,
        );
    }

    upcoming.sort_by_key(|p| p.current_end.or(p.original_end));
    let mut answer = Answer::new(format!(
        "{} project{} scheduled to finish within {} days.",
        upcoming.len(),
        if upcoming.len() == 1 { " is" } else { "s are" },
        config.upcoming_window_days,
    ));
    answer.data = project_rows(&upcoming, config.max_rows, as_of);
    answer.next_step = Some("Schedule final inspections and closeout paperwork.".to_string());
    suggest(answer, Intent::UpcomingCompletions)
}

pub fn vendor_overview(config: &EngineConfig, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
    let book = VendorBook::from_snapshot(snapshot, config.budget_tolerance_pct, as_of);
    if book.is_empty() {
        return suggest(
            Answer::new("No vendors are assigned to any project in the records."),
            Intent::VendorOverview,
        );
    }

    let ranked = book.by_total_value();
    let total: f64 = ranked.iter().map(|v| v.total_value).sum();

    let mut answer = Answer::new(format!(
        "{} vendor{} under contract for {} combined.",
        book.len(),
        if book.len() == 1 { " is" } else { "s are" },
        money(total),
    ));
    answer.data = ranked
        .iter()
        .take(config.max_rows)
        .map(|v| AnswerRow::Vendor(VendorRow::from_record(v)))
        .collect();
    suggest(answer, Intent::VendorOverview)
}

pub fn project_lookup(
    config: &EngineConfig,
    snapshot: &Snapshot,
    resolver: &FacilityResolver,
    question: &str,
    as_of: NaiveDate,
) -> Answer {
    let resolution = resolver.resolve(question);
    let needle = resolution.name().map(str::to_lowercase);

    let mut matched: Vec<&ProjectRecord> = snapshot
        .projects()
        .filter(|p| match &needle {
            Some(needle) => {
                p.facility
                    .as_deref()
                    .is_some_and(|f| f.to_lowercase().contains(needle.as_str()))
                    || p.title.to_lowercase().contains(needle.as_str())
            }
            None => false,
        })
        .collect();

    if matched.is_empty() {
        let mut answer = Answer::new(
            "I couldn't match that to a specific project. Try naming the school or the contract title.",
        );
        answer.ask_staff = true;
        return suggest(answer, Intent::ProjectLookup);
    }

    sort_desc_by_opt(&mut matched, |p| Some(p.budget()));
    let project = matched[0];

    let pct = project
        .completion()
        .map(|p| format!(", {p:.0}% complete"))
        .unwrap_or_default();
    let delay = project
        .get_delay_days(as_of)
        .filter(|d| *d > 0)
        .map(|d| format!(" and running {d} days behind"))
        .unwrap_or_default();

    let mut answer = Answer::new(format!(
        "{}: {} contract, {} status{}{}. {} paid out so far.",
        project.title,
        money(project.budget()),
        project.status,
        pct,
        delay,
        money(project.paid()),
    ));
    answer.data = project_rows(&matched, config.max_rows, as_of);
    suggest(answer, Intent::ProjectLookup)
}

pub fn general() -> Answer {
    suggest(
        Answer::new(
            "I can report on budgets, schedules, vendors, schools, and categories \
             across the capital program. Ask about delays, overruns, remaining \
             budget, the largest projects, or a specific school.",
        ),
        Intent::General,
    )
}
