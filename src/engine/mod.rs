//! The question-answering and insight engine
//!
//! Stateless between calls: every entry point takes the snapshot and the
//! evaluation date, computes, and returns an owned result. The engine holds
//! only its thresholds and the facility resolver tables, both fixed at
//! construction, so it is safe to share across threads.

pub mod answer;
pub mod handlers;
pub mod insight;
pub mod metrics;
pub mod resolver;
pub mod risk;
pub mod router;
pub mod vendor;

pub use answer::{Answer, AnswerRow};
pub use insight::{InsightKind, InsightRecord, Severity};
pub use metrics::{earned_value, EarnedValue, PortfolioMetrics};
pub use resolver::{Confidence, FacilityResolver, Resolution, ResolutionReport, ResolverTables};
pub use risk::RiskTier;
pub use router::Intent;
pub use vendor::{FitRating, FitScore};

use chrono::NaiveDate;

use crate::core::{EngineConfig, Snapshot};
use crate::records::VendorBook;

/// Entry point for questions, stats, insights, and vendor evaluation
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    resolver: FacilityResolver,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            resolver: FacilityResolver::default(),
        }
    }

    pub fn with_resolver(config: EngineConfig, resolver: FacilityResolver) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Answer a natural-language question about the snapshot.
    ///
    /// Classification and handling are deterministic; the same question
    /// against the same snapshot and date always yields the same answer.
    pub fn answer(&self, question: &str, snapshot: &Snapshot, as_of: NaiveDate) -> Answer {
        match Intent::classify(question) {
            Intent::ScheduleRisk => handlers::schedule_risks(&self.config, snapshot, as_of),
            Intent::OverBudget => handlers::over_budget_alerts(&self.config, snapshot, as_of),
            Intent::VendorRedFlags => handlers::vendor_red_flags(&self.config, snapshot, as_of),
            Intent::Concerns => handlers::concerns(&self.config, snapshot, as_of),
            Intent::RemainingBudget => handlers::remaining_budget(&self.config, snapshot, as_of),
            Intent::LargestProjects => handlers::largest_projects(&self.config, snapshot, as_of),
            Intent::BudgetSummary => handlers::budget_summary(&self.config, snapshot, as_of),
            Intent::TopVendor => handlers::top_vendor(&self.config, snapshot, as_of),
            Intent::FacilityActivity => {
                handlers::facility_activity(&self.config, snapshot, &self.resolver, as_of)
            }
            Intent::CategorySplit => handlers::category_split(&self.config, snapshot, as_of),
            Intent::UpcomingCompletions => {
                handlers::upcoming_completions(&self.config, snapshot, as_of)
            }
            Intent::VendorOverview => handlers::vendor_overview(&self.config, snapshot, as_of),
            Intent::ProjectLookup => {
                handlers::project_lookup(&self.config, snapshot, &self.resolver, question, as_of)
            }
            Intent::General => handlers::general(),
        }
    }

    /// Portfolio aggregates for the stats view
    pub fn metrics(&self, snapshot: &Snapshot, as_of: NaiveDate) -> PortfolioMetrics {
        metrics::aggregate(snapshot, &self.config, as_of)
    }

    /// Run every insight rule over the snapshot
    pub fn insights(&self, snapshot: &Snapshot, as_of: NaiveDate) -> Vec<InsightRecord> {
        let metrics = self.metrics(snapshot, as_of);
        let book = VendorBook::from_snapshot(snapshot, self.config.budget_tolerance_pct, as_of);
        insight::generate(&metrics, &book, &self.config)
    }

    /// Derive the vendor book from the snapshot
    pub fn vendors(&self, snapshot: &Snapshot, as_of: NaiveDate) -> VendorBook {
        VendorBook::from_snapshot(snapshot, self.config.budget_tolerance_pct, as_of)
    }

    /// Score one vendor against a prospective project
    pub fn score_vendor(
        &self,
        snapshot: &Snapshot,
        name: &str,
        category: &str,
        budget: f64,
        as_of: NaiveDate,
    ) -> FitScore {
        let book = self.vendors(snapshot, as_of);
        vendor::evaluate(book.get(name), category, budget)
    }

    /// Propose facility names for records missing one
    pub fn resolve_missing(&self, snapshot: &Snapshot) -> ResolutionReport {
        self.resolver.resolve_all(snapshot)
    }
}
