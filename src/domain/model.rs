use serde::Serialize;
use std::fmt;

/// Professional / Director seniority grades eligible for import.
///
/// The canonical form has no separator ("P4", "D1"); `parse_code` accepts the
/// raw variants seen in feed text ("P-4", "p 4") and normalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Grade {
    P1,
    P2,
    P3,
    P4,
    P5,
    P6,
    D1,
    D2,
}

impl Grade {
    pub fn parse_code(raw: &str) -> Option<Self> {
        let canon = raw.trim().to_uppercase().replace([' ', '-'], "");
        match canon.as_str() {
            "P1" => Some(Grade::P1),
            "P2" => Some(Grade::P2),
            "P3" => Some(Grade::P3),
            "P4" => Some(Grade::P4),
            "P5" => Some(Grade::P5),
            "P6" => Some(Grade::P6),
            "D1" => Some(Grade::D1),
            "D2" => Some(Grade::D2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::P1 => "P1",
            Grade::P2 => "P2",
            Grade::P3 => "P3",
            Grade::P4 => "P4",
            Grade::P5 => "P5",
            Grade::P6 => "P6",
            Grade::D1 => "D1",
            Grade::D2 => "D2",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One job posting as it moves through the filter.
///
/// `title`/`link`/`description`/`published_at` are fixed at parse time; the
/// remaining fields accumulate evidence during enrichment and classification.
/// `enriched_text` is `None` when no detail page was fetched (not attempted,
/// or the fetch failed) and `Some`, possibly empty, after a successful fetch.
/// The classifier's bare-pattern tiers key off that distinction.
#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub title: String,
    pub link: String,
    pub description: String,
    pub published_at: String,
    #[serde(skip)]
    pub enriched_text: Option<String>,
    pub grade_found: Option<Grade>,
    pub location_confirmed: bool,
    pub decision_reason: String,
}

impl Listing {
    pub fn new(title: String, link: String, description: String, published_at: String) -> Self {
        Self {
            title,
            link,
            description,
            published_at,
            enriched_text: None,
            grade_found: None,
            location_confirmed: false,
            decision_reason: String::new(),
        }
    }

    /// All available text, non-empty fields joined so that pattern matches
    /// cannot span two unrelated fields. Order: title, description, detail.
    pub fn full_text(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);
        if !self.title.is_empty() {
            parts.push(&self.title);
        }
        if !self.description.is_empty() {
            parts.push(&self.description);
        }
        if let Some(detail) = self.enriched_text.as_deref() {
            if !detail.is_empty() {
                parts.push(detail);
            }
        }
        parts.join(" | ")
    }
}

/// Result of one transform stage: the original feed document plus the
/// partitioned listings, both halves in source order.
#[derive(Debug, Clone)]
pub struct FilterOutcome {
    pub source: String,
    pub accepted: Vec<Listing>,
    pub rejected: Vec<Listing>,
}

impl FilterOutcome {
    pub fn total(&self) -> usize {
        self.accepted.len() + self.rejected.len()
    }
}

#[derive(Debug, Serialize)]
pub struct AcceptedEntry {
    pub grade: String,
    pub title: String,
    pub link: String,
}

#[derive(Debug, Serialize)]
pub struct RejectedEntry {
    pub title: String,
    pub reason: String,
}

/// Machine-readable run summary, printed with `--json`.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub accepted: Vec<AcceptedEntry>,
    pub rejected: Vec<RejectedEntry>,
}

impl RunSummary {
    pub fn from_outcome(outcome: &FilterOutcome) -> Self {
        Self {
            total: outcome.total(),
            accepted: outcome
                .accepted
                .iter()
                .map(|l| AcceptedEntry {
                    grade: l
                        .grade_found
                        .map(|g| g.to_string())
                        .unwrap_or_default(),
                    title: l.title.clone(),
                    link: l.link.clone(),
                })
                .collect(),
            rejected: outcome
                .rejected
                .iter()
                .map(|l| RejectedEntry {
                    title: l.title.clone(),
                    reason: l.decision_reason.clone(),
                })
                .collect(),
        }
    }
}
