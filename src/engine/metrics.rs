//! Portfolio metric aggregation and earned-value computation
//!
//! Every division guards its denominator and reports `None` instead of
//! raising; missing amounts count as zero in sums but never enter a ratio.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::{EngineConfig, Snapshot};
use crate::records::{ProjectRecord, ProjectStatus};

/// Summary statistics over one snapshot
#[derive(Debug, Clone, Default, Serialize)]
pub struct PortfolioMetrics {
    pub total_projects: usize,
    pub total_original_budget: f64,
    pub total_current_budget: f64,
    pub total_paid: f64,
    pub active: usize,
    pub completed: usize,
    pub delayed: usize,
    pub over_budget: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_completion: Option<f64>,
    /// Per-category spending, largest budget first
    pub by_category: Vec<GroupMetrics>,
    /// Per-facility spending, largest budget first
    pub by_facility: Vec<GroupMetrics>,
}

impl PortfolioMetrics {
    /// Unspent portion of the current budget
    pub fn remaining(&self) -> f64 {
        self.total_current_budget - self.total_paid
    }

    /// Paid as a share of the current budget, in percent
    pub fn spend_rate(&self) -> Option<f64> {
        ratio(self.total_paid, self.total_current_budget).map(|r| r * 100.0)
    }
}

/// Spending rollup for one category or facility
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupMetrics {
    pub name: String,
    pub project_count: usize,
    pub total_budget: f64,
    pub total_paid: f64,
    pub delayed: usize,
    pub over_budget: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_completion: Option<f64>,
    /// Mean budget variance across projects that can report one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_variance_pct: Option<f64>,
    /// Mean delay days across delayed projects with a known delay
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mean_delay_days: Option<f64>,
}

impl GroupMetrics {
    /// Delayed projects as a share of the group, in percent
    pub fn delay_ratio_pct(&self) -> Option<f64> {
        ratio(self.delayed as f64, self.project_count as f64).map(|r| r * 100.0)
    }
}

/// Aggregate the whole snapshot into portfolio metrics
pub fn aggregate(snapshot: &Snapshot, config: &EngineConfig, as_of: NaiveDate) -> PortfolioMetrics {
    let mut metrics = PortfolioMetrics::default();
    let mut completion_sum = 0.0;
    let mut completion_count = 0usize;
    let mut categories: BTreeMap<String, GroupAccumulator> = BTreeMap::new();
    let mut facilities: BTreeMap<String, GroupAccumulator> = BTreeMap::new();

    for project in snapshot.projects() {
        metrics.total_projects += 1;
        metrics.total_original_budget += project.original_budget.unwrap_or(0.0);
        metrics.total_current_budget += project.budget();
        metrics.total_paid += project.paid();

        match project.status {
            ProjectStatus::Active => metrics.active += 1,
            ProjectStatus::Completed => metrics.completed += 1,
            _ => {}
        }

        let delayed = project.is_delayed(as_of);
        let over_budget = project.is_over_budget(config.budget_tolerance_pct);
        if delayed {
            metrics.delayed += 1;
        }
        if over_budget {
            metrics.over_budget += 1;
        }
        if let Some(pct) = project.completion() {
            completion_sum += pct;
            completion_count += 1;
        }

        if let Some(category) = project.category.as_deref() {
            categories
                .entry(category.to_string())
                .or_default()
                .add(project, delayed, over_budget, as_of);
        }
        if let Some(facility) = project.facility.as_deref() {
            facilities
                .entry(facility.to_string())
                .or_default()
                .add(project, delayed, over_budget, as_of);
        }
    }

    if completion_count > 0 {
        metrics.avg_completion = Some(completion_sum / completion_count as f64);
    }
    metrics.by_category = finish_groups(categories);
    metrics.by_facility = finish_groups(facilities);
    metrics
}

#[derive(Default)]
struct GroupAccumulator {
    project_count: usize,
    total_budget: f64,
    total_paid: f64,
    delayed: usize,
    over_budget: usize,
    completion_sum: f64,
    completion_count: usize,
    variance_sum: f64,
    variance_count: usize,
    delay_sum: i64,
    delay_count: usize,
}

impl GroupAccumulator {
    fn add(&mut self, project: &ProjectRecord, delayed: bool, over_budget: bool, as_of: NaiveDate) {
        self.project_count += 1;
        self.total_budget += project.budget();
        self.total_paid += project.paid();
        if delayed {
            self.delayed += 1;
            if let Some(days) = project.get_delay_days(as_of) {
                self.delay_sum += days;
                self.delay_count += 1;
            }
        }
        if over_budget {
            self.over_budget += 1;
        }
        if let Some(pct) = project.completion() {
            self.completion_sum += pct;
            self.completion_count += 1;
        }
        if let Some(variance) = project.get_variance_pct() {
            self.variance_sum += variance;
            self.variance_count += 1;
        }
    }

    fn finish(self, name: String) -> GroupMetrics {
        GroupMetrics {
            name,
            project_count: self.project_count,
            total_budget: self.total_budget,
            total_paid: self.total_paid,
            delayed: self.delayed,
            over_budget: self.over_budget,
            avg_completion: mean(self.completion_sum, self.completion_count),
            mean_variance_pct: mean(self.variance_sum, self.variance_count),
            mean_delay_days: mean(self.delay_sum as f64, self.delay_count),
        }
    }
}

fn finish_groups(groups: BTreeMap<String, GroupAccumulator>) -> Vec<GroupMetrics> {
    let mut finished: Vec<GroupMetrics> = groups
        .into_iter()
        .map(|(name, acc)| acc.finish(name))
        .collect();
    finished.sort_by(|a, b| {
        b.total_budget
            .partial_cmp(&a.total_budget)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    finished
}

/// Earned-value metrics for one project
#[derive(Debug, Clone, Serialize)]
pub struct EarnedValue {
    /// EV = original budget x completion
    pub earned_value: f64,
    /// Budget earned by the schedule at the evaluation date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub planned_value: Option<f64>,
    /// Cost Performance Index, EV / actual cost
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpi: Option<f64>,
    /// Schedule Performance Index, EV / planned value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spi: Option<f64>,
    /// EV - actual cost
    pub cost_variance: f64,
    /// EV - planned value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schedule_variance: Option<f64>,
}

/// Compute earned-value metrics where the baselines exist.
///
/// Returns `None` when the project has no original budget or no reported
/// completion. CPI is `None` when nothing has been paid; SPI is `None`
/// when the original schedule dates are absent or degenerate.
pub fn earned_value(
    project: &ProjectRecord,
    as_of: NaiveDate,
) -> Option<EarnedValue> {
    let budget = project.original_budget.filter(|b| *b > 0.0)?;
    let completion = project.completion()?;
    let ev = budget * completion / 100.0;

    let planned_value = planned_value(project, budget, as_of);
    let paid = project.paid();

    Some(EarnedValue {
        earned_value: ev,
        planned_value,
        cpi: if paid > 0.0 { Some(ev / paid) } else { None },
        spi: planned_value.filter(|pv| *pv > 0.0).map(|pv| ev / pv),
        cost_variance: ev - paid,
        schedule_variance: planned_value.map(|pv| ev - pv),
    })
}

/// Linear interpolation of the original budget over the original schedule,
/// clamped to [0, budget]
fn planned_value(project: &ProjectRecord, budget: f64, as_of: NaiveDate) -> Option<f64> {
    let start = project.original_start?;
    let end = project.original_end?;
    let duration = (end - start).num_days();
    if duration <= 0 {
        return None;
    }
    let elapsed = (as_of - start).num_days() as f64;
    let fraction = (elapsed / duration as f64).clamp(0.0, 1.0);
    Some(budget * fraction)
}

/// sum / count as Some, or None when the group is empty
fn mean(sum: f64, count: usize) -> Option<f64> {
    if count > 0 {
        Some(sum / count as f64)
    } else {
        None
    }
}

/// n / d as Some, or None when the denominator is not positive
pub fn ratio(n: f64, d: f64) -> Option<f64> {
    if d > 0.0 {
        Some(n / d)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(id: &str, category: &str, budget: f64, paid: f64, pct: f64) -> ProjectRecord {
        ProjectRecord {
            id: id.to_string(),
            title: format!("Project {id}"),
            facility: None,
            vendor: None,
            category: Some(category.to_string()),
            original_budget: Some(budget),
            current_budget: Some(budget),
            amount_paid: Some(paid),
            original_start: Some(date(2025, 1, 1)),
            original_end: Some(date(2025, 12, 31)),
            current_end: None,
            percent_complete: Some(pct),
            status: ProjectStatus::Active,
            delayed: false,
            delay_days: None,
            over_budget: false,
            variance_pct: None,
            deleted: false,
        }
    }

    #[test]
    fn test_totals_exclude_deleted_records() {
        let mut gone = project("3", "HVAC", 500_000.0, 0.0, 0.0);
        gone.deleted = true;
        let snapshot = Snapshot {
            projects: vec![
                project("1", "Roofing", 1_000_000.0, 400_000.0, 40.0),
                project("2", "Roofing", 2_000_000.0, 100_000.0, 10.0),
                gone,
            ],
            concerns: Vec::new(),
        };

        let metrics = aggregate(&snapshot, &EngineConfig::default(), date(2025, 6, 1));
        assert_eq!(metrics.total_projects, 2);
        assert_eq!(metrics.total_current_budget, 3_000_000.0);
        assert_eq!(metrics.total_paid, 500_000.0);
        assert_eq!(metrics.active, 2);
        assert_eq!(metrics.avg_completion, Some(25.0));
    }

    #[test]
    fn test_category_groups_sorted_by_budget() {
        let snapshot = Snapshot {
            projects: vec![
                project("1", "HVAC", 100_000.0, 0.0, 0.0),
                project("2", "New Construction", 9_000_000.0, 0.0, 0.0),
            ],
            concerns: Vec::new(),
        };
        let metrics = aggregate(&snapshot, &EngineConfig::default(), date(2025, 6, 1));
        assert_eq!(metrics.by_category[0].name, "New Construction");
        assert_eq!(metrics.by_category[1].name, "HVAC");
    }

    #[test]
    fn test_missing_amounts_count_as_zero() {
        let mut p = project("1", "HVAC", 0.0, 0.0, 0.0);
        p.original_budget = None;
        p.current_budget = None;
        p.amount_paid = None;
        let snapshot = Snapshot { projects: vec![p], concerns: Vec::new() };

        let metrics = aggregate(&snapshot, &EngineConfig::default(), date(2025, 6, 1));
        assert_eq!(metrics.total_current_budget, 0.0);
        assert_eq!(metrics.spend_rate(), None);
    }

    #[test]
    fn test_earned_value_midpoint() {
        // Halfway through a 364-day schedule, 50% complete, half the money out
        let p = project("1", "Roofing", 1_000_000.0, 500_000.0, 50.0);
        let ev = earned_value(&p, date(2025, 7, 2)).unwrap();

        assert_eq!(ev.earned_value, 500_000.0);
        assert_eq!(ev.cpi, Some(1.0));
        let spi = ev.spi.unwrap();
        assert!((spi - 1.0).abs() < 0.02, "spi was {spi}");
        assert_eq!(ev.cost_variance, 0.0);
    }

    #[test]
    fn test_cpi_none_when_nothing_paid() {
        let p = project("1", "Roofing", 1_000_000.0, 0.0, 30.0);
        let ev = earned_value(&p, date(2025, 6, 1)).unwrap();
        assert_eq!(ev.cpi, None);
        assert_eq!(ev.earned_value, 300_000.0);
    }

    #[test]
    fn test_spi_none_without_schedule() {
        let mut p = project("1", "Roofing", 1_000_000.0, 100_000.0, 30.0);
        p.original_start = None;
        let ev = earned_value(&p, date(2025, 6, 1)).unwrap();
        assert_eq!(ev.spi, None);
        assert_eq!(ev.planned_value, None);
        assert_eq!(ev.schedule_variance, None);
    }

    #[test]
    fn test_planned_value_clamped_after_schedule_end() {
        let p = project("1", "Roofing", 1_000_000.0, 100_000.0, 30.0);
        let ev = earned_value(&p, date(2026, 6, 1)).unwrap();
        assert_eq!(ev.planned_value, Some(1_000_000.0));
    }

    #[test]
    fn test_earned_value_none_without_baseline() {
        let mut p = project("1", "Roofing", 0.0, 0.0, 30.0);
        p.original_budget = None;
        assert!(earned_value(&p, date(2025, 6, 1)).is_none());
    }

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(1.0, 0.0), None);
        assert_eq!(ratio(1.0, 2.0), Some(0.5));
    }
}
