//! Concern record type - staff-raised issues linked to projects
//!
//! Concerns are aggregation input only: the engine counts them when
//! summarizing portfolio health but never creates or mutates them.

use serde::{Deserialize, Serialize};

/// Concern severity tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ConcernSeverity {
    Low,
    #[default]
    Medium,
    High,
}

impl std::fmt::Display for ConcernSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConcernSeverity::Low => write!(f, "low"),
            ConcernSeverity::Medium => write!(f, "medium"),
            ConcernSeverity::High => write!(f, "high"),
        }
    }
}

/// Concern workflow status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum ConcernStatus {
    #[default]
    Open,
    Resolved,
}

/// A staff concern attached to a project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcernRecord {
    pub id: String,

    /// Project the concern is about
    pub project_id: String,

    /// Free-form category (schedule, budget, quality, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default)]
    pub severity: ConcernSeverity,

    #[serde(default)]
    pub status: ConcernStatus,
}

impl ConcernRecord {
    pub fn is_open(&self) -> bool {
        self.status == ConcernStatus::Open
    }
}
