//! Question intent classification
//!
//! A deterministic keyword router: the question is lower-cased once, then
//! scanned against an ordered list of intents, each with its own phrase
//! list. First match wins, so more specific intents are declared before
//! broader ones (a question containing "vendor red flag" must land on the
//! red-flag intent even though it also contains "vendor"). Unknown
//! questions fall through to `General`.

use serde::Serialize;

/// What the question is asking for, in match-priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    ScheduleRisk,
    OverBudget,
    VendorRedFlags,
    Concerns,
    RemainingBudget,
    LargestProjects,
    BudgetSummary,
    TopVendor,
    FacilityActivity,
    CategorySplit,
    UpcomingCompletions,
    VendorOverview,
    ProjectLookup,
    General,
}

/// Phrase lists per intent, scanned top to bottom
const INTENT_KEYWORDS: &[(Intent, &[&str])] = &[
    (
        Intent::ScheduleRisk,
        &["schedule risk", "behind schedule", "delayed", "delay", "late", "30 days"],
    ),
    (
        Intent::OverBudget,
        &["over budget", "budget alert", "cost overrun", "overrun", "exceeded"],
    ),
    (
        Intent::VendorRedFlags,
        &["red flag", "change order", "vendor problem", "struggling", "underperform"],
    ),
    (
        Intent::Concerns,
        &["worried", "concern", "risk", "problem", "issue", "watch"],
    ),
    (
        Intent::RemainingBudget,
        &["remaining", "left to spend", "unspent", "how much is left"],
    ),
    (
        Intent::LargestProjects,
        &["largest", "biggest project", "top 5", "top five", "most expensive"],
    ),
    (
        Intent::BudgetSummary,
        &["total", "summary", "where we stand", "spent vs budget", "overall", "how much have we"],
    ),
    (
        Intent::TopVendor,
        &["top vendor", "highest contract", "biggest vendor", "most work"],
    ),
    (
        Intent::FacilityActivity,
        &["which school", "school", "facility", "most project", "campus"],
    ),
    (
        Intent::CategorySplit,
        &["category", "split", "breakdown", "by type", "construction vs", "renovation vs"],
    ),
    (
        Intent::UpcomingCompletions,
        &["completing", "finishing", "next 90", "upcoming", "wrap up", "done soon"],
    ),
    (
        Intent::VendorOverview,
        &["vendor", "contractor", "company", "firm"],
    ),
    (
        Intent::ProjectLookup,
        &["status of", "tell me about", "what is happening with", "update on"],
    ),
];

impl Intent {
    /// Classify a question by first-match substring scan.
    ///
    /// Matching is case-insensitive; the intent declaration order is the
    /// tie-break, so classification is a pure function of the text.
    pub fn classify(question: &str) -> Self {
        let lower = question.to_lowercase();
        for (intent, phrases) in INTENT_KEYWORDS {
            if phrases.iter().any(|phrase| lower.contains(phrase)) {
                return *intent;
            }
        }
        Intent::General
    }

    /// Canned follow-up prompts for each intent
    pub fn suggestions(self) -> &'static [&'static str] {
        match self {
            Intent::ScheduleRisk => &[
                "Which projects are over budget?",
                "Show me the largest projects",
                "Any vendor red flags?",
            ],
            Intent::OverBudget => &[
                "Which projects are behind schedule?",
                "How much budget is remaining?",
                "Give me a budget summary",
            ],
            Intent::VendorRedFlags => &[
                "Who is our top vendor?",
                "Which projects are behind schedule?",
                "What should I be worried about?",
            ],
            Intent::Concerns => &[
                "Which projects are behind schedule?",
                "Which projects are over budget?",
                "Any vendor red flags?",
            ],
            Intent::RemainingBudget => &[
                "Give me a budget summary",
                "Show spending by category",
                "What are the largest projects?",
            ],
            Intent::LargestProjects => &[
                "Which of these are behind schedule?",
                "Show spending by category",
                "Give me a budget summary",
            ],
            Intent::BudgetSummary => &[
                "How much budget is remaining?",
                "Show spending by category",
                "What should I be worried about?",
                "What are the largest projects?",
            ],
            Intent::TopVendor => &[
                "Any vendor red flags?",
                "Show me all vendors",
                "Which projects are behind schedule?",
            ],
            Intent::FacilityActivity => &[
                "What are the largest projects?",
                "Show spending by category",
                "What is completing soon?",
            ],
            Intent::CategorySplit => &[
                "Give me a budget summary",
                "Which schools have the most projects?",
                "What are the largest projects?",
            ],
            Intent::UpcomingCompletions => &[
                "Which projects are behind schedule?",
                "Give me a budget summary",
                "Which schools have the most projects?",
            ],
            Intent::VendorOverview => &[
                "Who is our top vendor?",
                "Any vendor red flags?",
                "Give me a budget summary",
            ],
            Intent::ProjectLookup => &[
                "Which projects are behind schedule?",
                "What are the largest projects?",
                "Which schools have the most projects?",
            ],
            Intent::General => &[
                "Give me a budget summary",
                "Which projects are behind schedule?",
                "What should I be worried about?",
                "Who is our top vendor?",
            ],
        }
    }
}
