use crate::core::patterns::{PatternLibrary, PATTERNS};
use crate::domain::model::{Grade, Listing};

/// Applies the pattern library to a listing in a fixed rule order.
///
/// The tier order is a behavior contract, not an implementation detail:
/// exclusion on the title, then labelled grade > enriched bare grade > title
/// bare grade, then labelled location > title suffix > enriched bare
/// location. The first applicable rule wins; there is no scoring.
pub struct Classifier {
    patterns: &'static PatternLibrary,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new()
    }
}

impl Classifier {
    pub fn new() -> Self {
        Self {
            patterns: &PATTERNS,
        }
    }

    /// Title-only exclusion check. Cheap, no I/O; the pipeline runs this
    /// before any detail-page fetch.
    pub fn check_excluded(&self, listing: &mut Listing) -> bool {
        if let Some(m) = self.patterns.excluded_role.find(&listing.title) {
            listing.decision_reason =
                format!("excluded role type: '{}' in title", m.as_str());
            return true;
        }
        false
    }

    /// Grade tiers: labelled match anywhere, then bare match over the full
    /// text (only once a detail page was fetched), then bare match in the
    /// title. An un-enriched bare match in body text is prose, not a grade
    /// label, and is never trusted.
    fn check_grade(&self, listing: &mut Listing) -> bool {
        let text = listing.full_text();

        if let Some(m) = self.patterns.grade_labelled.find(&text) {
            if let Some(code) = self.patterns.grade_bare.find(m.as_str()) {
                if let Some(grade) = Grade::parse_code(code.as_str()) {
                    listing.grade_found = Some(grade);
                    return true;
                }
            }
        }

        if listing.enriched_text.is_some() {
            if let Some(m) = self.patterns.grade_bare.find(&text) {
                if let Some(grade) = Grade::parse_code(m.as_str()) {
                    listing.grade_found = Some(grade);
                    return true;
                }
            }
        }

        // Last resort: the title itself encodes the grade, e.g.
        // "Health Officer, P4, Geneva".
        if let Some(m) = self.patterns.grade_bare.find(&listing.title) {
            if let Some(grade) = Grade::parse_code(m.as_str()) {
                listing.grade_found = Some(grade);
                return true;
            }
        }

        listing.decision_reason = "no valid grade found".to_string();
        false
    }

    /// Location tiers: labelled duty station anywhere, then a Geneva suffix
    /// in the title, then a bare mention in the fetched detail page only.
    fn check_location(&self, listing: &mut Listing) -> bool {
        let text = listing.full_text();

        if self.patterns.location_labelled.is_match(&text) {
            listing.location_confirmed = true;
            return true;
        }

        if self.patterns.location_title.is_match(&listing.title) {
            listing.location_confirmed = true;
            return true;
        }

        if let Some(detail) = listing.enriched_text.as_deref() {
            if self.patterns.location_bare.is_match(detail) {
                listing.location_confirmed = true;
                return true;
            }
        }

        listing.decision_reason = "duty station is not Geneva".to_string();
        false
    }

    /// Full verdict. Pure over the listing's text fields and idempotent;
    /// always leaves a non-empty `decision_reason`.
    pub fn classify(&self, listing: &mut Listing) -> bool {
        if self.check_excluded(listing) {
            return false;
        }

        let grade_ok = self.check_grade(listing);
        let location_ok = self.check_location(listing);

        if grade_ok && location_ok {
            if let Some(grade) = listing.grade_found {
                listing.decision_reason =
                    format!("import — grade={}, location=Geneva", grade);
            }
            return true;
        }

        if !grade_ok && !location_ok {
            listing.decision_reason =
                "no valid grade and duty station not Geneva".to_string();
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn listing(title: &str, detail: Option<&str>) -> Listing {
        let mut l = Listing::new(
            title.to_string(),
            "https://careers.who.int/job/1".to_string(),
            String::new(),
            String::new(),
        );
        l.enriched_text = detail.map(str::to_string);
        l
    }

    #[test]
    fn test_accepts_classic_geneva_titles() {
        let cases = [
            (
                "Health Officer (Tuberculosis), P4, Geneva",
                "Duty Station: Geneva, Switzerland. Grade: P4. Under the direction of ...",
                Grade::P4,
            ),
            (
                "Technical Officer (Digital Health), P-3, Geneva, Switzerland",
                "Location: Genève. This is a fixed-term appointment at the P-3 level.",
                Grade::P3,
            ),
            (
                "Communications Officer (P 2), WHO Headquarters, Geneva",
                "Place of assignment: Geneva. Grade P 2 (space variant).",
                Grade::P2,
            ),
            (
                "Director, Department of Health Systems (D-1), Geneva",
                "Duty station: CH-Geneva. Director level D-1 position.",
                Grade::D1,
            ),
            (
                "Health Information Systems Officer, P5, Geneva",
                "Location: Geneva (Switzerland). Programme: Health Emergencies. Grade: P-5.",
                Grade::P5,
            ),
        ];

        let classifier = Classifier::new();
        for (title, detail, grade) in cases {
            let mut l = listing(title, Some(detail));
            assert!(classifier.classify(&mut l), "expected import: {title}");
            assert_eq!(l.grade_found, Some(grade), "grade for {title}");
            assert!(l.location_confirmed);
            assert!(l.decision_reason.starts_with("import"));
        }
    }

    #[test]
    fn test_rejects_wrong_grade_or_location() {
        let cases = [
            (
                "Human Resources Associate, (GS-6), Fixed-Term, Damascus, Syria",
                "Duty Station: Damascus. General Service grade GS-6.",
            ),
            (
                "Technical Officer (Behavioural Insights), P3",
                "The position is based in Copenhagen, Denmark. Grade P3.",
            ),
        ];

        let classifier = Classifier::new();
        for (title, detail) in cases {
            let mut l = listing(title, Some(detail));
            assert!(!classifier.classify(&mut l), "expected reject: {title}");
            assert!(!l.decision_reason.is_empty());
        }
    }

    #[test]
    fn test_exclusion_beats_grade_and_location() {
        let classifier = Classifier::new();

        let mut l = listing(
            "Consultancy - Leadership Learning Design & Digital Content Specialist",
            Some("Location: Geneva. Grade: P4. Consultancy contract."),
        );
        assert!(!classifier.classify(&mut l));
        assert!(
            l.decision_reason.contains("Consultancy"),
            "reason should name the excluded token: {}",
            l.decision_reason
        );

        let mut l = listing(
            "Intern – Global Health Policy, Geneva",
            Some("Internship programme. Duty station: Geneva."),
        );
        assert!(!classifier.classify(&mut l));
        assert!(l.decision_reason.contains("excluded role type"));

        let mut l = listing(
            "SSA - Project Officer – Solar Electrification, NOA",
            Some("Duty Station: Brazzaville. NOA grade."),
        );
        assert!(!classifier.classify(&mut l));
        assert!(l.decision_reason.contains("SSA"));
    }

    #[test]
    fn test_unenriched_body_text_is_not_trusted() {
        // Bare grade and bare location in the description only qualify once
        // a detail page was fetched.
        let classifier = Classifier::new();
        let mut l = listing("Officer, no grade marker", None);
        l.description = "P3 competencies required, duties in Geneva".to_string();

        assert!(!classifier.classify(&mut l));
        assert_eq!(
            l.decision_reason,
            "no valid grade and duty station not Geneva"
        );
        assert_eq!(l.grade_found, None);
        assert!(!l.location_confirmed);
    }

    #[test]
    fn test_enrichment_enables_bare_matches() {
        let classifier = Classifier::new();
        // Same text as a fetched detail page: the bare location tier applies,
        // and "Grade P3." carries no labelled context but the enriched bare
        // tier picks it up.
        let mut l = listing("Officer", Some("Grade P3 Geneva"));
        assert!(classifier.classify(&mut l));
        assert_eq!(l.grade_found, Some(Grade::P3));
    }

    #[test]
    fn test_grade_detection_and_normalization() {
        let cases = [
            ("Officer, P4, Geneva", "Grade: P4.", Grade::P4),
            ("Officer, P-3, Geneva", "Grade: P-3.", Grade::P3),
            ("Officer (P 2)", "Grade P 2.", Grade::P2),
            ("Director (D-1)", "Grade: D-1.", Grade::D1),
            ("Officer, D2, Geneva", "Grade: D-2.", Grade::D2),
        ];
        let classifier = Classifier::new();
        for (title, detail, grade) in cases {
            let mut l = listing(title, Some(detail));
            classifier.classify(&mut l);
            assert_eq!(l.grade_found, Some(grade), "grade for {title}");
        }
    }

    #[test]
    fn test_no_grade_reason() {
        let classifier = Classifier::new();
        let mut l = listing("Admin Support, Geneva", Some("No grade info here."));
        assert!(!classifier.classify(&mut l));
        assert_eq!(l.decision_reason, "no valid grade found");
    }

    #[test]
    fn test_location_geneva_variants() {
        let details = [
            "Duty Station: Geneva, Switzerland.",
            "Location: Genève.",
            "Duty station: CH-Geneva.",
            "Location: Geneva (Switzerland).",
            "Based in: CH-1211 Geneva.",
            "Place of assignment: Geneva.",
        ];
        let classifier = Classifier::new();
        for detail in details {
            let mut l = listing("Officer, P4", Some(detail));
            assert!(classifier.classify(&mut l), "should accept for {detail}");
            assert!(l.location_confirmed);
        }
    }

    #[test]
    fn test_location_not_geneva() {
        let classifier = Classifier::new();
        let mut l = listing(
            "Officer, P4, Copenhagen",
            Some("Duty Station: Copenhagen, Denmark."),
        );
        assert!(!classifier.classify(&mut l));
        assert_eq!(l.decision_reason, "duty station is not Geneva");
    }

    #[test]
    fn test_classify_is_idempotent() {
        let classifier = Classifier::new();
        let mut l = listing(
            "Health Officer (Tuberculosis), P4, Geneva",
            Some("Duty Station: Geneva, Switzerland. Grade: P4."),
        );

        let first = classifier.classify(&mut l);
        let first_reason = l.decision_reason.clone();
        let second = classifier.classify(&mut l);

        assert_eq!(first, second);
        assert_eq!(l.decision_reason, first_reason);
        assert_eq!(l.grade_found, Some(Grade::P4));
    }

    #[test]
    fn test_reason_always_set() {
        let classifier = Classifier::new();
        for (title, detail) in [
            ("Health Officer, P4, Geneva", Some("Duty Station: Geneva.")),
            ("Consultant, Anything", None),
            ("Officer", None),
            ("", None),
        ] {
            let mut l = listing(title, detail);
            classifier.classify(&mut l);
            assert!(
                !l.decision_reason.is_empty(),
                "reason must be set for title {title:?}"
            );
        }
    }
}
