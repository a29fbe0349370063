//! Vendor fitness scoring against a target project
//!
//! Scores start at a neutral 50 and apply bounded, monotonic adjustments;
//! the running total is clamped to [0, 100] after every term so the final
//! score always lands in range. Reference points are documented per term so
//! scores are reproducible and comparable across vendors.

use serde::Serialize;

use crate::records::VendorRecord;

/// Qualitative rating derived from the numeric score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FitRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl FitRating {
    pub fn from_score(score: u8) -> Self {
        match score {
            80..=100 => FitRating::Excellent,
            60..=79 => FitRating::Good,
            40..=59 => FitRating::Fair,
            _ => FitRating::Poor,
        }
    }
}

impl std::fmt::Display for FitRating {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitRating::Excellent => write!(f, "excellent"),
            FitRating::Good => write!(f, "good"),
            FitRating::Fair => write!(f, "fair"),
            FitRating::Poor => write!(f, "poor"),
        }
    }
}

/// Signed contribution of each scoring term
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ScoreBreakdown {
    pub category_experience: i32,
    pub on_time: i32,
    pub on_budget: i32,
    pub capacity: i32,
}

/// The result of evaluating one vendor against one project
#[derive(Debug, Clone, Serialize)]
pub struct FitScore {
    /// Fitness score in [0, 100]
    pub score: u8,
    pub rating: FitRating,
    pub breakdown: ScoreBreakdown,
}

const BASE_SCORE: i32 = 50;

/// Evaluate how well a vendor fits a project of the given category and
/// budget.
///
/// A vendor with no history (or `None`) gets all-neutral terms and scores
/// exactly the base 50 - never an error.
pub fn evaluate(vendor: Option<&VendorRecord>, category: &str, budget: f64) -> FitScore {
    let Some(vendor) = vendor.filter(|v| v.projects > 0) else {
        return FitScore {
            score: BASE_SCORE as u8,
            rating: FitRating::from_score(BASE_SCORE as u8),
            breakdown: ScoreBreakdown::default(),
        };
    };

    let breakdown = ScoreBreakdown {
        category_experience: category_experience_term(vendor.category_experience(category)),
        on_time: rate_term(vendor.on_time_rate()),
        on_budget: rate_term(vendor.on_budget_rate()),
        capacity: capacity_term(vendor, budget),
    };

    let mut score = BASE_SCORE;
    for adjustment in [
        breakdown.category_experience,
        breakdown.on_time,
        breakdown.on_budget,
        breakdown.capacity,
    ] {
        score = (score + adjustment).clamp(0, 100);
    }

    FitScore {
        score: score as u8,
        rating: FitRating::from_score(score as u8),
        breakdown,
    }
}

/// Prior same-category projects: none is a liability, a track record of
/// three or more earns the full +20. Monotonic in the count.
fn category_experience_term(prior: usize) -> i32 {
    match prior {
        0 => -10,
        1 | 2 => 10,
        _ => 20,
    }
}

/// Linear in the historical rate around a 50% reference point: 50% is
/// neutral, 100% is +15, 0% is -15. No history is neutral.
fn rate_term(rate: Option<f64>) -> i32 {
    match rate {
        Some(rate) => (((rate - 50.0) / 50.0 * 15.0).round() as i32).clamp(-15, 15),
        None => 0,
    }
}

/// Capacity fit against the target budget: a completed project at least this
/// size is full marks, an average size of at least half is partial credit,
/// a history of only smaller work is a liability.
fn capacity_term(vendor: &VendorRecord, budget: f64) -> i32 {
    if budget <= 0.0 {
        return 0;
    }
    match (vendor.largest_project, vendor.avg_project_size) {
        (Some(largest), _) if largest >= budget => 10,
        (_, Some(avg)) if avg >= budget * 0.5 => 5,
        (None, None) => 0,
        _ => -10,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn vendor(projects: usize, delayed: usize, over_budget: usize) -> VendorRecord {
        VendorRecord {
            name: "Acme Builders".to_string(),
            projects,
            category_counts: BTreeMap::new(),
            total_value: 0.0,
            delayed,
            over_budget,
            largest_project: None,
            avg_project_size: None,
            avg_completion: None,
        }
    }

    #[test]
    fn test_no_history_scores_base_50() {
        let fit = evaluate(None, "Roofing", 1_000_000.0);
        assert_eq!(fit.score, 50);
        assert_eq!(fit.breakdown.on_time, 0);
        assert_eq!(fit.rating, FitRating::Fair);
    }

    #[test]
    fn test_strong_history_scores_high() {
        // 10 prior category projects, 90% on time, 80% on budget, adequate capacity
        let mut v = vendor(10, 1, 2);
        v.category_counts.insert("Roofing".to_string(), 10);
        v.largest_project = Some(5_000_000.0);
        v.avg_project_size = Some(2_000_000.0);

        let fit = evaluate(Some(&v), "Roofing", 1_000_000.0);
        assert!(fit.score > 80, "score was {}", fit.score);
        assert_eq!(fit.rating, FitRating::Excellent);
        assert_eq!(fit.breakdown.category_experience, 20);
        assert_eq!(fit.breakdown.on_time, 12); // (90-50)/50*15
        assert_eq!(fit.breakdown.capacity, 10);
    }

    #[test]
    fn test_poor_history_scores_low_but_in_range() {
        let mut v = vendor(4, 4, 4); // 0% on time, 0% on budget
        v.largest_project = Some(100_000.0);
        v.avg_project_size = Some(80_000.0);

        let fit = evaluate(Some(&v), "HVAC", 10_000_000.0);
        assert!(fit.score <= 10, "score was {}", fit.score);
        assert_eq!(fit.breakdown.on_time, -15);
        assert_eq!(fit.breakdown.capacity, -10);
    }

    #[test]
    fn test_score_always_in_bounds() {
        for projects in [1usize, 3, 10] {
            for delayed in 0..=projects {
                for over in 0..=projects {
                    let v = vendor(projects, delayed, over);
                    let fit = evaluate(Some(&v), "Roofing", 1_000_000.0);
                    assert!(fit.score <= 100);
                }
            }
        }
    }

    #[test]
    fn test_monotonic_in_on_time_rate() {
        // Holding everything else fixed, fewer delays never lowers the score
        let mut previous = 0u8;
        for on_time in [0usize, 2, 5, 8, 10] {
            let v = vendor(10, 10 - on_time, 5);
            let fit = evaluate(Some(&v), "Roofing", 1_000_000.0);
            assert!(fit.score >= previous, "score dropped at {on_time}/10 on time");
            previous = fit.score;
        }
    }

    #[test]
    fn test_category_term_monotonic() {
        assert_eq!(category_experience_term(0), -10);
        assert_eq!(category_experience_term(1), 10);
        assert_eq!(category_experience_term(2), 10);
        assert_eq!(category_experience_term(3), 20);
        assert_eq!(category_experience_term(12), 20);
    }

    #[test]
    fn test_rate_term_reference_points() {
        assert_eq!(rate_term(Some(50.0)), 0);
        assert_eq!(rate_term(Some(100.0)), 15);
        assert_eq!(rate_term(Some(0.0)), -15);
        assert_eq!(rate_term(None), 0);
    }

    #[test]
    fn test_capacity_partial_credit() {
        let mut v = vendor(3, 0, 0);
        v.largest_project = Some(600_000.0);
        v.avg_project_size = Some(550_000.0);
        assert_eq!(capacity_term(&v, 1_000_000.0), 5);
    }
}
