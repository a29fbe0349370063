//! Vendor record type - performance history derived from project records
//!
//! Vendors are never snapshot input. `VendorBook::from_snapshot` derives one
//! `VendorRecord` per distinct vendor name in a single pass over the
//! non-deleted projects; the result is immutable for the evaluation.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::core::snapshot::Snapshot;

/// Aggregated performance history for one vendor
#[derive(Debug, Clone, Default, Serialize)]
pub struct VendorRecord {
    pub name: String,

    /// Total projects awarded
    pub projects: usize,

    /// Project counts per category (category history)
    pub category_counts: BTreeMap<String, usize>,

    /// Sum of current budgets across all projects
    pub total_value: f64,

    /// Projects behind their original schedule
    pub delayed: usize,

    /// Projects over their original budget
    pub over_budget: usize,

    /// Largest single project by current budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub largest_project: Option<f64>,

    /// Mean project size by current budget
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_project_size: Option<f64>,

    /// Mean reported completion across projects that report one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avg_completion: Option<f64>,
}

impl VendorRecord {
    /// Share of projects delivered on schedule, as a percentage
    pub fn on_time_rate(&self) -> Option<f64> {
        if self.projects == 0 {
            return None;
        }
        Some((self.projects - self.delayed) as f64 / self.projects as f64 * 100.0)
    }

    /// Share of projects delivered within budget, as a percentage
    pub fn on_budget_rate(&self) -> Option<f64> {
        if self.projects == 0 {
            return None;
        }
        Some((self.projects - self.over_budget) as f64 / self.projects as f64 * 100.0)
    }

    /// Prior projects in the given category (case-insensitive)
    pub fn category_experience(&self, category: &str) -> usize {
        self.category_counts
            .iter()
            .filter(|(name, _)| name.eq_ignore_ascii_case(category))
            .map(|(_, count)| count)
            .sum()
    }

    pub fn has_issues(&self) -> bool {
        self.delayed > 0 || self.over_budget > 0
    }
}

/// All vendors derived from one snapshot, keyed by name
#[derive(Debug, Clone, Default)]
pub struct VendorBook {
    vendors: Vec<VendorRecord>,
}

impl VendorBook {
    /// Build the book by aggregating every non-deleted project with a vendor.
    ///
    /// `tolerance_pct` is the over-budget tolerance; `as_of` anchors the
    /// delay derivation for projects without a forecast completion date.
    pub fn from_snapshot(snapshot: &Snapshot, tolerance_pct: f64, as_of: NaiveDate) -> Self {
        let mut by_name: BTreeMap<String, VendorRecord> = BTreeMap::new();

        for project in snapshot.projects() {
            let Some(name) = project.vendor.as_deref().map(str::trim) else {
                continue;
            };
            if name.is_empty() {
                continue;
            }

            let record = by_name.entry(name.to_string()).or_insert_with(|| VendorRecord {
                name: name.to_string(),
                ..VendorRecord::default()
            });

            record.projects += 1;
            record.total_value += project.budget();
            if project.is_delayed(as_of) {
                record.delayed += 1;
            }
            if project.is_over_budget(tolerance_pct) {
                record.over_budget += 1;
            }
            if let Some(category) = project.category.as_deref() {
                *record.category_counts.entry(category.to_string()).or_insert(0) += 1;
            }
            if let Some(budget) = project.current_budget {
                record.largest_project =
                    Some(record.largest_project.map_or(budget, |prev| prev.max(budget)));
            }
        }

        // Second pass for the means, once the counts are final
        let mut book = Self {
            vendors: by_name.into_values().collect(),
        };
        for record in &mut book.vendors {
            let sized: Vec<f64> = snapshot
                .projects()
                .filter(|p| p.vendor.as_deref().map(str::trim) == Some(record.name.as_str()))
                .filter_map(|p| p.current_budget)
                .collect();
            if !sized.is_empty() {
                record.avg_project_size = Some(sized.iter().sum::<f64>() / sized.len() as f64);
            }
            let completions: Vec<f64> = snapshot
                .projects()
                .filter(|p| p.vendor.as_deref().map(str::trim) == Some(record.name.as_str()))
                .filter_map(|p| p.completion())
                .collect();
            if !completions.is_empty() {
                record.avg_completion =
                    Some(completions.iter().sum::<f64>() / completions.len() as f64);
            }
        }
        book
    }

    /// Look up a vendor by name, case-insensitively
    pub fn get(&self, name: &str) -> Option<&VendorRecord> {
        self.vendors
            .iter()
            .find(|v| v.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &VendorRecord> {
        self.vendors.iter()
    }

    /// Vendors ranked by total contract value, highest first
    pub fn by_total_value(&self) -> Vec<&VendorRecord> {
        let mut ranked: Vec<&VendorRecord> = self.vendors.iter().collect();
        ranked.sort_by(|a, b| {
            b.total_value
                .partial_cmp(&a.total_value)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        ranked
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::project::{ProjectRecord, ProjectStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project(id: &str, vendor: &str, category: &str, budget: f64, delayed: bool) -> ProjectRecord {
        ProjectRecord {
            id: id.to_string(),
            title: format!("Project {id}"),
            facility: None,
            vendor: Some(vendor.to_string()),
            category: Some(category.to_string()),
            original_budget: Some(budget),
            current_budget: Some(budget),
            amount_paid: None,
            original_start: None,
            original_end: None,
            current_end: None,
            percent_complete: Some(50.0),
            status: ProjectStatus::Active,
            delayed,
            delay_days: None,
            over_budget: false,
            variance_pct: None,
            deleted: false,
        }
    }

    fn snapshot(projects: Vec<ProjectRecord>) -> Snapshot {
        Snapshot {
            projects,
            concerns: Vec::new(),
        }
    }

    #[test]
    fn test_book_aggregates_per_vendor() {
        let snap = snapshot(vec![
            project("1", "Acme Builders", "Roofing", 1_000_000.0, false),
            project("2", "Acme Builders", "Roofing", 3_000_000.0, true),
            project("3", "Beta Corp", "HVAC", 500_000.0, false),
        ]);
        let book = VendorBook::from_snapshot(&snap, 0.0, date(2025, 6, 1));

        assert_eq!(book.len(), 2);
        let acme = book.get("acme builders").unwrap();
        assert_eq!(acme.projects, 2);
        assert_eq!(acme.delayed, 1);
        assert_eq!(acme.total_value, 4_000_000.0);
        assert_eq!(acme.largest_project, Some(3_000_000.0));
        assert_eq!(acme.avg_project_size, Some(2_000_000.0));
        assert_eq!(acme.on_time_rate(), Some(50.0));
        assert_eq!(acme.category_experience("roofing"), 2);
        assert_eq!(acme.category_experience("HVAC"), 0);
    }

    #[test]
    fn test_deleted_and_unassigned_projects_skipped() {
        let mut deleted = project("1", "Acme Builders", "Roofing", 1_000_000.0, false);
        deleted.deleted = true;
        let mut unassigned = project("2", "x", "Roofing", 1_000_000.0, false);
        unassigned.vendor = None;

        let book =
            VendorBook::from_snapshot(&snapshot(vec![deleted, unassigned]), 0.0, date(2025, 6, 1));
        assert!(book.is_empty());
    }

    #[test]
    fn test_ranking_by_total_value() {
        let snap = snapshot(vec![
            project("1", "Small Co", "HVAC", 100_000.0, false),
            project("2", "Big Co", "HVAC", 9_000_000.0, false),
        ]);
        let book = VendorBook::from_snapshot(&snap, 0.0, date(2025, 6, 1));
        let ranked = book.by_total_value();
        assert_eq!(ranked[0].name, "Big Co");
    }

    #[test]
    fn test_rates_none_without_projects() {
        let v = VendorRecord::default();
        assert_eq!(v.on_time_rate(), None);
        assert_eq!(v.on_budget_rate(), None);
    }
}
