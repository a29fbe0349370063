//! Risk tier classification from schedule and budget flags

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::EngineConfig;
use crate::records::ProjectRecord;

/// Project risk tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskTier::Low => write!(f, "low"),
            RiskTier::Medium => write!(f, "medium"),
            RiskTier::High => write!(f, "high"),
        }
    }
}

impl RiskTier {
    /// Total mapping from the two flags: both -> High, exactly one -> Medium,
    /// neither -> Low.
    pub fn classify(delayed: bool, over_budget: bool) -> Self {
        match (delayed, over_budget) {
            (true, true) => RiskTier::High,
            (true, false) | (false, true) => RiskTier::Medium,
            (false, false) => RiskTier::Low,
        }
    }

    /// Classify a project using its derived flags
    pub fn classify_project(
        project: &ProjectRecord,
        config: &EngineConfig,
        as_of: NaiveDate,
    ) -> Self {
        Self::classify(
            project.is_delayed(as_of),
            project.is_over_budget(config.budget_tolerance_pct),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_is_total() {
        assert_eq!(RiskTier::classify(false, false), RiskTier::Low);
        assert_eq!(RiskTier::classify(true, false), RiskTier::Medium);
        assert_eq!(RiskTier::classify(false, true), RiskTier::Medium);
        assert_eq!(RiskTier::classify(true, true), RiskTier::High);
    }

    #[test]
    fn test_tier_ordering() {
        assert!(RiskTier::High > RiskTier::Medium);
        assert!(RiskTier::Medium > RiskTier::Low);
    }

    #[test]
    fn test_serializes_lowercase() {
        assert_eq!(serde_yml::to_string(&RiskTier::High).unwrap().trim(), "high");
    }
}
