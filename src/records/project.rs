//! Project record type - one capital project contract in the snapshot

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Project lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ProjectStatus {
    /// Approved but not yet started
    #[serde(alias = "Planned")]
    Planned,
    /// Under contract and in progress
    #[default]
    #[serde(alias = "Active")]
    Active,
    /// All work finished and accepted
    #[serde(alias = "Completed", alias = "Complete", alias = "complete")]
    Completed,
    /// Terminated before completion
    #[serde(alias = "Cancelled", alias = "Canceled", alias = "canceled")]
    Cancelled,
}

impl std::fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProjectStatus::Planned => write!(f, "planned"),
            ProjectStatus::Active => write!(f, "active"),
            ProjectStatus::Completed => write!(f, "completed"),
            ProjectStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// A single capital project record.
///
/// Budget, payment, and schedule fields are optional because source exports
/// are frequently incomplete. The delayed/over-budget flags may arrive
/// precomputed from the record store; the accessors below prefer values
/// derived from the raw dates and amounts and fall back to the stored flags
/// only when the inputs needed to derive them are absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Unique identifier (contract number or similar)
    pub id: String,

    /// Contract title as it appears in the source system
    pub title: String,

    /// Canonical facility name, if resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,

    /// Awarded vendor name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,

    /// Program category (New Construction, HVAC, Roofing, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Original contract amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_budget: Option<f64>,

    /// Current contract amount including change orders
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_budget: Option<f64>,

    /// Total paid to date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount_paid: Option<f64>,

    /// Original schedule start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_start: Option<NaiveDate>,

    /// Original contractual completion date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_end: Option<NaiveDate>,

    /// Current forecast completion date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_end: Option<NaiveDate>,

    /// Reported completion percentage (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f64>,

    #[serde(default)]
    pub status: ProjectStatus,

    /// Stored delay flag from the record store
    #[serde(default, rename = "is_delayed")]
    pub delayed: bool,

    /// Stored delay in days from the record store
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay_days: Option<i64>,

    /// Stored over-budget flag from the record store
    #[serde(default, rename = "is_over_budget")]
    pub over_budget: bool,

    /// Stored budget variance percentage from the record store
    #[serde(default, rename = "budget_variance_pct", skip_serializing_if = "Option::is_none")]
    pub variance_pct: Option<f64>,

    /// Soft-delete marker; deleted records are excluded from every aggregate
    #[serde(default, rename = "is_deleted")]
    pub deleted: bool,
}

impl ProjectRecord {
    /// Current budget, treating a missing amount as zero for aggregation
    pub fn budget(&self) -> f64 {
        self.current_budget.unwrap_or(0.0).max(0.0)
    }

    /// Amount paid, treating a missing amount as zero for aggregation
    pub fn paid(&self) -> f64 {
        self.amount_paid.unwrap_or(0.0).max(0.0)
    }

    /// Unspent portion of the current budget
    pub fn remaining(&self) -> f64 {
        self.budget() - self.paid()
    }

    /// Completion percentage clamped to [0, 100]
    pub fn completion(&self) -> Option<f64> {
        self.percent_complete.map(|p| p.clamp(0.0, 100.0))
    }

    /// Delay in days derived from schedule dates.
    ///
    /// `current_end - original_end` when both are known; for an unfinished
    /// project with no forecast date, days elapsed past the original end as
    /// of the evaluation date. `None` when the dates needed are absent.
    pub fn computed_delay_days(&self, as_of: NaiveDate) -> Option<i64> {
        let original_end = self.original_end?;
        match self.current_end {
            Some(current_end) => Some((current_end - original_end).num_days()),
            None if self.status == ProjectStatus::Active && as_of > original_end => {
                Some((as_of - original_end).num_days())
            }
            None => None,
        }
    }

    /// Delay days for display - prefers the derived value over the stored one
    pub fn get_delay_days(&self, as_of: NaiveDate) -> Option<i64> {
        self.computed_delay_days(as_of).or(self.delay_days)
    }

    /// Whether the project is behind its original schedule.
    ///
    /// Derived from dates when possible, otherwise the stored flag.
    pub fn is_delayed(&self, as_of: NaiveDate) -> bool {
        match self.computed_delay_days(as_of) {
            Some(days) => days > 0,
            None => self.delayed,
        }
    }

    /// Stored delay flag with no schedule dates to back it up.
    ///
    /// Answers drawing on such records attach a data-quality caveat.
    pub fn delay_unverifiable(&self, as_of: NaiveDate) -> bool {
        self.delayed && self.computed_delay_days(as_of).is_none()
    }

    /// Budget variance percentage derived from the contract amounts
    pub fn computed_variance_pct(&self) -> Option<f64> {
        match (self.original_budget, self.current_budget) {
            (Some(original), Some(current)) if original > 0.0 => {
                Some((current - original) / original * 100.0)
            }
            _ => None,
        }
    }

    /// Variance for display - prefers the derived value over the stored one
    pub fn get_variance_pct(&self) -> Option<f64> {
        self.computed_variance_pct().or(self.variance_pct)
    }

    /// Dollar amount over the original contract, when both amounts are known
    pub fn overage(&self) -> Option<f64> {
        match (self.original_budget, self.current_budget) {
            (Some(original), Some(current)) if current > original => Some(current - original),
            _ => None,
        }
    }

    /// Whether the current budget exceeds the original by more than the
    /// configured tolerance (in percent). Falls back to the stored flag when
    /// either amount is missing.
    pub fn is_over_budget(&self, tolerance_pct: f64) -> bool {
        match (self.original_budget, self.current_budget) {
            (Some(original), Some(current)) if original > 0.0 => {
                current > original * (1.0 + tolerance_pct / 100.0)
            }
            _ => self.over_budget,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn base_project() -> ProjectRecord {
        ProjectRecord {
            id: "C-1001".to_string(),
            title: "Roof Replacement".to_string(),
            facility: None,
            vendor: None,
            category: Some("Roofing".to_string()),
            original_budget: Some(1_000_000.0),
            current_budget: Some(1_000_000.0),
            amount_paid: Some(250_000.0),
            original_start: Some(date(2025, 1, 1)),
            original_end: Some(date(2025, 12, 31)),
            current_end: None,
            percent_complete: Some(25.0),
            status: ProjectStatus::Active,
            delayed: false,
            delay_days: None,
            over_budget: false,
            variance_pct: None,
            deleted: false,
        }
    }

    #[test]
    fn test_delay_derived_from_forecast_date() {
        let mut p = base_project();
        p.current_end = Some(date(2026, 2, 14));

        assert_eq!(p.computed_delay_days(date(2025, 6, 1)), Some(45));
        assert!(p.is_delayed(date(2025, 6, 1)));
    }

    #[test]
    fn test_delay_derived_from_elapsed_time() {
        let p = base_project();
        // Past the original end with no forecast date
        assert_eq!(p.computed_delay_days(date(2026, 1, 31)), Some(31));
        assert!(p.is_delayed(date(2026, 1, 31)));
        // Before the original end: on schedule
        assert_eq!(p.computed_delay_days(date(2025, 6, 1)), None);
        assert!(!p.is_delayed(date(2025, 6, 1)));
    }

    #[test]
    fn test_stored_flag_used_when_dates_absent() {
        let mut p = base_project();
        p.original_end = None;
        p.delayed = true;
        p.delay_days = Some(20);

        assert!(p.is_delayed(date(2025, 6, 1)));
        assert_eq!(p.get_delay_days(date(2025, 6, 1)), Some(20));
        assert!(p.delay_unverifiable(date(2025, 6, 1)));
    }

    #[test]
    fn test_derived_delay_overrides_stale_flag() {
        let mut p = base_project();
        p.current_end = Some(date(2025, 12, 31)); // matches original end
        p.delayed = true; // stale

        assert!(!p.is_delayed(date(2025, 6, 1)));
    }

    #[test]
    fn test_over_budget_respects_tolerance() {
        let mut p = base_project();
        p.current_budget = Some(1_040_000.0);

        assert!(p.is_over_budget(0.0));
        assert!(!p.is_over_budget(5.0));
        assert_eq!(p.overage(), Some(40_000.0));
        let variance = p.computed_variance_pct().unwrap();
        assert!((variance - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_over_budget_falls_back_to_stored_flag() {
        let mut p = base_project();
        p.original_budget = None;
        p.over_budget = true;

        assert!(p.is_over_budget(0.0));
        assert_eq!(p.computed_variance_pct(), None);
    }

    #[test]
    fn test_missing_amounts_treated_as_zero() {
        let mut p = base_project();
        p.current_budget = None;
        p.amount_paid = None;

        assert_eq!(p.budget(), 0.0);
        assert_eq!(p.paid(), 0.0);
        assert_eq!(p.remaining(), 0.0);
    }

    #[test]
    fn test_completion_clamped() {
        let mut p = base_project();
        p.percent_complete = Some(130.0);
        assert_eq!(p.completion(), Some(100.0));
        p.percent_complete = Some(-5.0);
        assert_eq!(p.completion(), Some(0.0));
    }

    #[test]
    fn test_status_aliases_deserialize() {
        let p: ProjectRecord =
            serde_yml::from_str("id: X\ntitle: T\nstatus: Complete\n").unwrap();
        assert_eq!(p.status, ProjectStatus::Completed);

        let p: ProjectRecord = serde_yml::from_str("id: X\ntitle: T\nstatus: active\n").unwrap();
        assert_eq!(p.status, ProjectStatus::Active);
    }

    #[test]
    fn test_record_roundtrip() {
        let p = base_project();
        let yaml = serde_yml::to_string(&p).unwrap();
        let parsed: ProjectRecord = serde_yml::from_str(&yaml).unwrap();
        assert_eq!(parsed.id, p.id);
        assert_eq!(parsed.original_budget, p.original_budget);
        assert_eq!(parsed.status, p.status);
    }
}
