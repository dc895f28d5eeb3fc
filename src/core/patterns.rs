use regex::Regex;
use std::sync::LazyLock;

// Matches P1-P6 / D1-D2 with an optional single separator (space or hyphen).
// Word-boundary anchored so "P3O", "D12" or the "P3" inside "TYPE3" don't match.
const GRADE_CORE: &str = r"(?:P[- ]?[1-6]|D[- ]?[1-2])";

// Geneva variants: Geneva, Genève, Genéva, Genf (German), the WHO HQ postal
// prefix CH-1211, CH-Geneva, "Geneva, Switzerland", "Switzerland (Geneva)".
const GENEVA_VARIANTS: &str = r"Gen(?:e|è|é)va?|Genf|CH-1211|CH\s*[-–]\s*Geneva|Geneva\s*,?\s*Switzerland|Switzerland\s*\(Geneva\)";

// Duty-station label words that precede the location value in job ads.
const DUTY_LABEL: &str = r"(?:duty\s*station|location|based\s+in|headquarters?|posted?\s+(?:in|at)|place\s+of\s+(?:work|assignment)|office\s+location|country\s+of\s+assignment)";

/// The compiled pattern families the classifier queries. Built once at
/// process start; no per-listing state.
pub struct PatternLibrary {
    pub grade_bare: Regex,
    pub grade_labelled: Regex,
    pub location_bare: Regex,
    pub location_labelled: Regex,
    pub location_title: Regex,
    pub excluded_role: Regex,
}

impl PatternLibrary {
    fn compile() -> Self {
        let grade_bare = Regex::new(&format!(r"(?i)\b{GRADE_CORE}\b"))
            .expect("grade-bare pattern");

        // Labelled grade, a stronger signal: "Grade: P4", "P-4 level",
        // "(P3,", "- P4".
        let grade_labelled = Regex::new(&format!(
            r"(?i)(?:grade[:\s]+\b{g}\b|\b{g}\b(?:\s*,|\s*\)|\s*[-–]|\s+level)|[-–(,]\s*\b{g}\b)",
            g = GRADE_CORE
        ))
        .expect("grade-labelled pattern");

        let location_bare = Regex::new(&format!(r"(?i)\b(?:{GENEVA_VARIANTS})\b"))
            .expect("location-bare pattern");

        let location_labelled = Regex::new(&format!(
            r"(?i)(?:{DUTY_LABEL})\s*[:\-–]?\s*(?:{GENEVA_VARIANTS})"
        ))
        .expect("location-labelled pattern");

        // Many WHO titles end with ", Geneva" or "(Geneva)".
        let location_title = Regex::new(&format!(
            r"(?i)[,(]\s*(?:{GENEVA_VARIANTS})\s*[),]?$"
        ))
        .expect("location-title pattern");

        // Role types that must never be imported regardless of grade or
        // location signals.
        let excluded_role = Regex::new(
            r"(?i)\b(SSA|Consultant|Consultancy|Intern(?:ship)?|JPO|NO[A-Da-d]|National\s+Officer|National\s+Professional|GS-\d|G-\d)\b",
        )
        .expect("excluded-role pattern");

        Self {
            grade_bare,
            grade_labelled,
            location_bare,
            location_labelled,
            location_title,
            excluded_role,
        }
    }
}

pub static PATTERNS: LazyLock<PatternLibrary> = LazyLock::new(PatternLibrary::compile);
