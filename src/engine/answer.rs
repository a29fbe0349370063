//! Answer types - the structured result of one question

use chrono::NaiveDate;
use serde::Serialize;

use crate::records::{ProjectRecord, ProjectStatus, VendorRecord};

/// A decision-ready answer: headline text, supporting rows, follow-ups.
///
/// Created per request and discarded; never persisted.
#[derive(Debug, Clone, Serialize)]
pub struct Answer {
    /// Headline-first natural language text
    pub answer: String,

    /// Representative rows backing the headline (at most `max_rows`)
    pub data: Vec<AnswerRow>,

    /// 2-4 follow-up question prompts
    pub suggestions: Vec<String>,

    /// True when the result implies staff follow-up
    pub ask_staff: bool,

    /// Suggested next action, when one exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,

    /// Data-quality caveat, when the computation leaned on inferred values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_note: Option<String>,
}

impl Answer {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
            data: Vec::new(),
            suggestions: Vec::new(),
            ask_staff: false,
            next_step: None,
            data_note: None,
        }
    }

    pub fn with_suggestions(mut self, suggestions: &[&str]) -> Self {
        self.suggestions = suggestions.iter().map(|s| s.to_string()).collect();
        self
    }
}

/// One supporting row; the shape depends on what the handler aggregated
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnswerRow {
    Project(ProjectRow),
    Vendor(VendorRow),
    Group(GroupRow),
}

/// A project reduced to the fields worth showing in an answer
#[derive(Debug, Clone, Serialize)]
pub struct ProjectRow {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facility: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor: Option<String>,
    pub current_budget: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_complete: Option<f64>,
    pub status: ProjectStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay_days: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance_pct: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl ProjectRow {
    pub fn from_record(project: &ProjectRecord, as_of: NaiveDate) -> Self {
        Self {
            id: project.id.clone(),
            title: project.title.clone(),
            facility: project.facility.clone(),
            vendor: project.vendor.clone(),
            current_budget: project.budget(),
            percent_complete: project.completion(),
            status: project.status,
            delay_days: project.get_delay_days(as_of),
            variance_pct: project.get_variance_pct(),
            end_date: project.current_end.or(project.original_end),
        }
    }
}

/// A vendor's aggregate performance
#[derive(Debug, Clone, Serialize)]
pub struct VendorRow {
    pub name: String,
    pub projects: usize,
    pub total_value: f64,
    pub delayed: usize,
    pub over_budget: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_time_rate: Option<f64>,
}

impl VendorRow {
    pub fn from_record(vendor: &VendorRecord) -> Self {
        Self {
            name: vendor.name.clone(),
            projects: vendor.projects,
            total_value: vendor.total_value,
            delayed: vendor.delayed,
            over_budget: vendor.over_budget,
            on_time_rate: vendor.on_time_rate(),
        }
    }
}

/// A category or facility grouping
#[derive(Debug, Clone, Serialize)]
pub struct GroupRow {
    pub name: String,
    pub project_count: usize,
    pub total_budget: f64,
    pub total_paid: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_pct: Option<f64>,
}

/// Format a dollar amount with thousands separators, rounded to whole dollars
pub fn money(amount: f64) -> String {
    let negative = amount < -0.5;
    let whole = amount.abs().round() as u64;
    let digits = whole.to_string();

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    if negative {
        format!("-${grouped}")
    } else {
        format!("${grouped}")
    }
}
