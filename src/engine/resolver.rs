//! Facility name resolution from free-text project titles
//!
//! Maps titles like "HVAC Upgrades - West Port High" to the canonical
//! facility name. The lookup tables are an immutable configuration object
//! built once at engine construction; resolution itself never fails, it
//! just reports lower confidence.

use serde::Serialize;

use crate::core::Snapshot;

/// Sentinel facility for projects that span the whole district
pub const DISTRICT_WIDE: &str = "District-Wide";

/// How sure the resolver is about a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    None,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Confidence::High => write!(f, "high"),
            Confidence::Medium => write!(f, "medium"),
            Confidence::None => write!(f, "none"),
        }
    }
}

/// The outcome of resolving one title
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Matched a canonical facility name
    Facility { name: String },
    /// Matched a planned, not-yet-built facility pattern
    Planned { name: String },
    /// The project spans the whole district
    DistrictWide,
    /// No match
    Unresolved,
}

impl Resolution {
    pub fn confidence(&self) -> Confidence {
        match self {
            Resolution::Facility { .. } => Confidence::High,
            Resolution::Planned { .. } | Resolution::DistrictWide => Confidence::Medium,
            Resolution::Unresolved => Confidence::None,
        }
    }

    /// The resolved name, if any
    pub fn name(&self) -> Option<&str> {
        match self {
            Resolution::Facility { name } | Resolution::Planned { name } => Some(name),
            Resolution::DistrictWide => Some(DISTRICT_WIDE),
            Resolution::Unresolved => None,
        }
    }
}

/// Immutable lookup tables for the resolver.
///
/// `canonical` is ordered most specific first so that containment scans
/// prefer e.g. "West Port Middle" over a looser match. `aliases` maps
/// lower-case historical or informal names to canonical ones; an alias may
/// also target [`DISTRICT_WIDE`].
#[derive(Debug, Clone)]
pub struct ResolverTables {
    canonical: Vec<(String, String)>, // (name, lower-cased name)
    aliases: Vec<(String, String)>,   // (lower-cased alias, canonical)
    district_keywords: Vec<String>,
}

impl ResolverTables {
    pub fn new(
        canonical: impl IntoIterator<Item = String>,
        aliases: impl IntoIterator<Item = (String, String)>,
        district_keywords: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            canonical: canonical
                .into_iter()
                .map(|name| {
                    let lower = name.to_lowercase();
                    (name, lower)
                })
                .collect(),
            aliases: aliases
                .into_iter()
                .map(|(alias, canonical)| (alias.to_lowercase(), canonical))
                .collect(),
            district_keywords: district_keywords
                .into_iter()
                .map(|kw| kw.to_lowercase())
                .collect(),
        }
    }

    /// The facility directory for the district this tool was built around,
    /// high schools before middle schools before elementary so the most
    /// specific names win containment scans.
    pub fn builtin() -> Self {
        let canonical = [
            // High schools
            "Belleview High",
            "Dunnellon High",
            "Forest High",
            "Lake Weir High",
            "North Marion High",
            "Vanguard High",
            "West Port High",
            // Middle schools
            "Belleview Middle",
            "Dunnellon Middle",
            "Fort King Middle",
            "Horizon Academy at Marion Oaks",
            "Howard Middle",
            "Lake Weir Middle",
            "Liberty Middle",
            "North Marion Middle",
            "Osceola Middle",
            "West Port Middle",
            // Elementary schools
            "Anthony Elementary",
            "Belleview Elementary",
            "Belleview-Santos Elementary",
            "College Park Elementary",
            "Dr. N.H. Jones Elementary",
            "Dunnellon Elementary",
            "East Marion Elementary",
            "Emerald Shores Elementary",
            "Evergreen Elementary",
            "Fessenden Elementary",
            "Fort McCoy School",
            "Greenway Elementary",
            "Hammett Bowen Jr. Elementary",
            "Harbour View Elementary",
            "Hillcrest School",
            "Maplewood Elementary",
            "Marion Oaks Elementary",
            "Oakcrest Elementary",
            "Ocala Springs Elementary",
            "Reddick-Collier Elementary",
            "Romeo Elementary",
            "Shady Hill Elementary",
            "Sparr Elementary",
            "Stanton-Weirsdale Elementary",
            "Sunrise Elementary",
            "Ward-Highlands Elementary",
            "Wyomina Park Elementary",
            // Other facilities
            "Marion Technical College",
            "Marion County School District",
        ];

        let aliases = [
            ("belleview senior high", "Belleview High"),
            ("dunnellon senior high", "Dunnellon High"),
            ("forest senior high", "Forest High"),
            ("lake weir senior high", "Lake Weir High"),
            ("lake weir sr high", "Lake Weir High"),
            ("north marion senior high", "North Marion High"),
            ("north marion sr high", "North Marion High"),
            ("vanguard senior high", "Vanguard High"),
            ("west port senior high", "West Port High"),
            ("hammett bowen", "Hammett Bowen Jr. Elementary"),
            ("public safety", DISTRICT_WIDE),
            ("cop debt service", DISTRICT_WIDE),
        ];

        let district_keywords = [
            "district-wide",
            "district wide",
            "all schools",
            "county-wide",
            "countywide",
            "multiple schools",
            "multiple sites",
            "various schools",
            "school bus",
            "transportation",
            "fleet",
            "central office",
        ];

        Self::new(
            canonical.into_iter().map(String::from),
            aliases
                .into_iter()
                .map(|(a, c)| (a.to_string(), c.to_string())),
            district_keywords.into_iter().map(String::from),
        )
    }
}

/// Resolves free-text titles to canonical facility names
#[derive(Debug, Clone)]
pub struct FacilityResolver {
    tables: ResolverTables,
}

impl FacilityResolver {
    pub fn new(tables: ResolverTables) -> Self {
        Self { tables }
    }

    /// Resolve a title. Priority order, first match wins:
    /// exact canonical equality, alias containment, canonical containment
    /// (all high confidence), then the planned-facility pattern and
    /// district-wide keywords (medium). Never errors.
    pub fn resolve(&self, title: &str) -> Resolution {
        let trimmed = title.trim();
        if trimmed.is_empty() {
            return Resolution::Unresolved;
        }
        let lower = trimmed.to_lowercase();

        for (name, name_lower) in &self.tables.canonical {
            if *name_lower == lower {
                return Resolution::Facility { name: name.clone() };
            }
        }

        for (alias, canonical) in &self.tables.aliases {
            if lower.contains(alias.as_str()) {
                if canonical == DISTRICT_WIDE {
                    return Resolution::DistrictWide;
                }
                return Resolution::Facility { name: canonical.clone() };
            }
        }

        for (name, name_lower) in &self.tables.canonical {
            if lower.contains(name_lower.as_str()) {
                return Resolution::Facility { name: name.clone() };
            }
        }

        if let Some(name) = planned_facility(trimmed) {
            return Resolution::Planned { name };
        }

        for keyword in &self.tables.district_keywords {
            if lower.contains(keyword.as_str()) {
                return Resolution::DistrictWide;
            }
        }

        Resolution::Unresolved
    }

    /// Resolve every non-deleted record that has no facility reference and
    /// tally the outcomes per confidence tier. The counts back the
    /// data-quality caveats surfaced in answers.
    pub fn resolve_all(&self, snapshot: &Snapshot) -> ResolutionReport {
        let mut report = ResolutionReport::default();

        for project in snapshot.projects() {
            if project
                .facility
                .as_deref()
                .is_some_and(|f| !f.trim().is_empty())
            {
                continue;
            }
            report.total_missing += 1;
            let resolution = self.resolve(&project.title);
            match resolution.confidence() {
                Confidence::High => report.high += 1,
                Confidence::Medium => report.medium += 1,
                Confidence::None => report.unresolved += 1,
            }
            report.entries.push(ResolutionEntry {
                id: project.id.clone(),
                title: project.title.clone(),
                resolution,
            });
        }

        report
    }
}

impl Default for FacilityResolver {
    fn default() -> Self {
        Self::new(ResolverTables::builtin())
    }
}

/// One record's proposed resolution
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionEntry {
    pub id: String,
    pub title: String,
    pub resolution: Resolution,
}

/// Batch resolution outcome counts
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolutionReport {
    pub entries: Vec<ResolutionEntry>,
    pub total_missing: usize,
    pub high: usize,
    pub medium: usize,
    pub unresolved: usize,
}

/// Detect the "New <TYPE> [School] <LETTERS>" pattern for facilities that
/// exist only on paper, e.g. "New High School CCC" or "New Elementary W".
/// The designator must be 1-3 capital letters in the source text.
fn planned_facility(title: &str) -> Option<String> {
    let tokens: Vec<&str> = title
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|t| !t.is_empty())
        .collect();

    let new_at = tokens.iter().position(|t| t.eq_ignore_ascii_case("new"))?;

    // Allow one descriptor between "new" and the school type ("New SW Elementary W")
    let mut type_at = None;
    for offset in 1..=2 {
        let Some(token) = tokens.get(new_at + offset) else { break };
        if school_type(token).is_some() {
            type_at = Some(new_at + offset);
            break;
        }
    }
    let type_at = type_at?;
    let type_name = school_type(tokens[type_at])?;

    let mut letters_at = type_at + 1;
    if tokens
        .get(letters_at)
        .is_some_and(|t| t.eq_ignore_ascii_case("school"))
    {
        letters_at += 1;
    }

    let designator = tokens.get(letters_at)?;
    if designator.len() > 3 || !designator.chars().all(|c| c.is_ascii_uppercase()) {
        return None;
    }

    Some(format!("New {type_name} \"{designator}\" (Planned)"))
}

fn school_type(token: &str) -> Option<&'static str> {
    if token.eq_ignore_ascii_case("elementary") {
        Some("Elementary")
    } else if token.eq_ignore_ascii_case("middle") {
        Some("Middle School")
    } else if token.eq_ignore_ascii_case("high") {
        Some("High School")
    } else {
        None
    }
}
