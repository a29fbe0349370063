//! Proactive insight derivation from portfolio metrics
//!
//! Each rule re-derives its inputs from the aggregates, compares against a
//! configured threshold, and emits a titled finding. Rules run in a fixed
//! order; the final list is sorted by severity with declaration order
//! preserved on ties, so identical snapshots always produce identical
//! output.

use serde::Serialize;

use crate::core::EngineConfig;
use crate::records::VendorBook;

use super::answer::money;
use super::metrics::PortfolioMetrics;

/// Insight severity, ordered least to most urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Which rule produced the insight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    BudgetTrend,
    DelayPattern,
    VendorAlert,
    Efficiency,
}

impl std::fmt::Display for InsightKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InsightKind::BudgetTrend => write!(f, "budget trend"),
            InsightKind::DelayPattern => write!(f, "delay pattern"),
            InsightKind::VendorAlert => write!(f, "vendor alert"),
            InsightKind::Efficiency => write!(f, "efficiency"),
        }
    }
}

/// One derived finding
#[derive(Debug, Clone, Serialize)]
pub struct InsightRecord {
    pub kind: InsightKind,
    pub severity: Severity,
    pub title: String,
    pub description: String,
}

/// Run every insight rule over the aggregates.
///
/// Emits nothing for an empty portfolio. The result is sorted most severe
/// first; ties keep the rule order budget trend, delay pattern, vendor
/// alert, efficiency.
pub fn generate(
    metrics: &PortfolioMetrics,
    vendors: &VendorBook,
    config: &EngineConfig,
) -> Vec<InsightRecord> {
    let mut insights = Vec::new();
    if metrics.total_projects == 0 {
        return insights;
    }

    budget_trends(metrics, config, &mut insights);
    delay_patterns(metrics, config, &mut insights);
    vendor_alerts(vendors, config, &mut insights);
    efficiency(metrics, config, &mut insights);

    insights.sort_by(|a, b| b.severity.cmp(&a.severity));
    insights
}

/// Categories whose mean budget variance exceeds the trend threshold
fn budget_trends(metrics: &PortfolioMetrics, config: &EngineConfig, out: &mut Vec<InsightRecord>) {
    let threshold = config.budget_trend_threshold_pct;
    for group in &metrics.by_category {
        let Some(variance) = group.mean_variance_pct else {
            continue;
        };
        if variance <= threshold {
            continue;
        }
        let severity = if variance > threshold * 2.0 {
            Severity::Critical
        } else {
            Severity::Warning
        };
        out.push(InsightRecord {
            kind: InsightKind::BudgetTrend,
            severity,
            title: format!("{} projects trending over budget", group.name),
            description: format!(
                "{} projects in {} average {:.1}% over their original budgets ({} committed).",
                group.project_count,
                group.name,
                variance,
                money(group.total_budget),
            ),
        });
    }
}

/// Categories where the share of delayed projects exceeds the ratio threshold
fn delay_patterns(metrics: &PortfolioMetrics, config: &EngineConfig, out: &mut Vec<InsightRecord>) {
    let threshold = config.delay_ratio_threshold_pct;
    for group in &metrics.by_category {
        let Some(ratio) = group.delay_ratio_pct() else {
            continue;
        };
        if ratio <= threshold {
            continue;
        }
        let severity = if ratio > threshold * 2.0 {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let mean_delay = group
            .mean_delay_days
            .map(|days| format!(", averaging {days:.0} days behind"))
            .unwrap_or_default();
        out.push(InsightRecord {
            kind: InsightKind::DelayPattern,
            severity,
            title: format!("Delays concentrated in {}", group.name),
            description: format!(
                "{} of {} {} projects are behind schedule ({:.0}%){}.",
                group.delayed, group.project_count, group.name, ratio, mean_delay,
            ),
        });
    }
}

/// Vendors with enough history whose delivery rates fall below the floor
fn vendor_alerts(vendors: &VendorBook, config: &EngineConfig, out: &mut Vec<InsightRecord>) {
    let floor = config.vendor_rate_floor_pct;
    for vendor in vendors.iter() {
        if vendor.projects < 2 {
            continue;
        }
        let late = vendor.on_time_rate().is_some_and(|r| r < floor);
        let over = vendor.on_budget_rate().is_some_and(|r| r < floor);
        if !late && !over {
            continue;
        }
        let severity = if late && over {
            Severity::Critical
        } else {
            Severity::Warning
        };
        let mut problems = Vec::new();
        if late {
            problems.push(format!(
                "{} of {} projects delayed",
                vendor.delayed, vendor.projects
            ));
        }
        if over {
            problems.push(format!(
                "{} of {} projects over budget",
                vendor.over_budget, vendor.projects
            ));
        }
        out.push(InsightRecord {
            kind: InsightKind::VendorAlert,
            severity,
            title: format!("{} underperforming", vendor.name),
            description: format!(
                "{} ({} under contract).",
                problems.join(" and "),
                money(vendor.total_value),
            ),
        });
    }
}

/// Spend rate vs average completion across the whole portfolio
fn efficiency(metrics: &PortfolioMetrics, config: &EngineConfig, out: &mut Vec<InsightRecord>) {
    let (Some(spend), Some(completion)) = (metrics.spend_rate(), metrics.avg_completion) else {
        return;
    };

    if spend > completion + config.efficiency_margin_pct {
        out.push(InsightRecord {
            kind: InsightKind::Efficiency,
            severity: Severity::Warning,
            title: "Spending is outpacing progress".to_string(),
            description: format!(
                "{:.0}% of budget paid out against {:.0}% average completion. \
                 Worth checking whether payments are running ahead of delivered work.",
                spend, completion,
            ),
        });
    } else if completion > spend + 10.0 {
        out.push(InsightRecord {
            kind: InsightKind::Efficiency,
            severity: Severity::Info,
            title: "Progress is ahead of spending".to_string(),
            description: format!(
                "{:.0}% average completion against {:.0}% of budget paid out. \
                 Good cost control so far.",
                completion, spend,
            ),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Snapshot;
    use crate::engine::metrics::GroupMetrics;
    use chrono::NaiveDate;

    fn empty_book() -> VendorBook {
        VendorBook::from_snapshot(
            &Snapshot::default(),
            0.0,
            NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
        )
    }

    fn group(name: &str, count: usize, delayed: usize, variance: Option<f64>) -> GroupMetrics {
        GroupMetrics {
            name: name.to_string(),
            project_count: count,
            total_budget: 1_000_000.0,
            delayed,
            mean_variance_pct: variance,
            ..GroupMetrics::default()
        }
    }

    #[test]
    fn test_empty_portfolio_no_insights() {
        let metrics = PortfolioMetrics::default();
        assert!(generate(&metrics, &empty_book(), &EngineConfig::default()).is_empty());
    }

    #[test]
    fn test_budget_trend_warning_and_critical() {
        let metrics = PortfolioMetrics {
            total_projects: 6,
            by_category: vec![
                group("Roofing", 3, 0, Some(15.0)),
                group("HVAC", 3, 0, Some(25.0)),
                group("Paving", 3, 0, Some(5.0)),
            ],
            ..PortfolioMetrics::default()
        };
        let insights = generate(&metrics, &empty_book(), &EngineConfig::default());
        let trends: Vec<_> = insights
            .iter()
            .filter(|i| i.kind == InsightKind::BudgetTrend)
            .collect();
        assert_eq!(trends.len(), 2);
        // Sorted most severe first
        assert_eq!(trends[0].severity, Severity::Critical);
        assert!(trends[0].title.contains("HVAC"));
        assert_eq!(trends[1].severity, Severity::Warning);
    }

    #[test]
    fn test_delay_pattern_thresholds() {
        let metrics = PortfolioMetrics {
            total_projects: 10,
            by_category: vec![
                group("Roofing", 10, 4, None), // 40%
                group("HVAC", 10, 7, None),    // 70%
                group("Paving", 10, 2, None),  // under threshold
            ],
            ..PortfolioMetrics::default()
        };
        let insights = generate(&metrics, &empty_book(), &EngineConfig::default());
        let delays: Vec<_> = insights
            .iter()
            .filter(|i| i.kind == InsightKind::DelayPattern)
            .collect();
        assert_eq!(delays.len(), 2);
        assert_eq!(delays[0].severity, Severity::Critical);
        assert!(delays[0].title.contains("HVAC"));
    }

    #[test]
    fn test_vendor_alert_requires_history() {
        use crate::records::{ProjectRecord, ProjectStatus};

        let project = |id: &str, vendor: &str, delayed: bool, over: bool| ProjectRecord {
            id: id.to_string(),
            title: format!("Project {id}"),
            facility: None,
            vendor: Some(vendor.to_string()),
            category: None,
            original_budget: Some(1_000_000.0),
            current_budget: Some(1_000_000.0),
            amount_paid: None,
            original_start: None,
            original_end: None,
            current_end: None,
            percent_complete: None,
            status: ProjectStatus::Active,
            delayed,
            delay_days: None,
            over_budget: over,
            variance_pct: None,
            deleted: false,
        };
        let snapshot = Snapshot {
            projects: vec![
                // One-project vendor never alerts regardless of outcome
                project("1", "Tiny Co", true, true),
                // Both rates below the floor
                project("2", "Bad Co", true, true),
                project("3", "Bad Co", true, false),
                // Only schedule below the floor
                project("4", "Late Co", true, false),
                project("5", "Late Co", true, false),
            ],
            concerns: Vec::new(),
        };
        let as_of = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let book = VendorBook::from_snapshot(&snapshot, 0.0, as_of);
        let metrics = PortfolioMetrics {
            total_projects: 5,
            ..PortfolioMetrics::default()
        };

        let insights = generate(&metrics, &book, &EngineConfig::default());
        let alerts: Vec<_> = insights
            .iter()
            .filter(|i| i.kind == InsightKind::VendorAlert)
            .collect();
        assert_eq!(alerts.len(), 2);
        assert_eq!(alerts[0].severity, Severity::Critical);
        assert!(alerts[0].title.contains("Bad Co"));
        assert_eq!(alerts[1].severity, Severity::Warning);
        assert!(alerts[1].title.contains("Late Co"));
    }

    #[test]
    fn test_efficiency_both_directions() {
        let spending_ahead = PortfolioMetrics {
            total_projects: 3,
            total_current_budget: 1_000_000.0,
            total_paid: 800_000.0, // 80% spent
            avg_completion: Some(40.0),
            ..PortfolioMetrics::default()
        };
        let insights = generate(&spending_ahead, &empty_book(), &EngineConfig::default());
        assert!(insights
            .iter()
            .any(|i| i.kind == InsightKind::Efficiency && i.severity == Severity::Warning));

        let progress_ahead = PortfolioMetrics {
            total_projects: 3,
            total_current_budget: 1_000_000.0,
            total_paid: 300_000.0, // 30% spent
            avg_completion: Some(60.0),
            ..PortfolioMetrics::default()
        };
        let insights = generate(&progress_ahead, &empty_book(), &EngineConfig::default());
        assert!(insights
            .iter()
            .any(|i| i.kind == InsightKind::Efficiency && i.severity == Severity::Info));
    }

    #[test]
    fn test_sorted_by_severity_stable() {
        let metrics = PortfolioMetrics {
            total_projects: 10,
            total_current_budget: 1_000_000.0,
            total_paid: 300_000.0,
            avg_completion: Some(60.0),
            by_category: vec![group("Roofing", 10, 4, Some(15.0))],
            ..PortfolioMetrics::default()
        };
        let insights = generate(&metrics, &empty_book(), &EngineConfig::default());
        for pair in insights.windows(2) {
            assert!(pair[0].severity >= pair[1].severity);
        }
        // Warnings keep rule order: budget trend before delay pattern
        let warnings: Vec<_> = insights
            .iter()
            .filter(|i| i.severity == Severity::Warning)
            .collect();
        assert_eq!(warnings[0].kind, InsightKind::BudgetTrend);
        assert_eq!(warnings[1].kind, InsightKind::DelayPattern);
    }
}
