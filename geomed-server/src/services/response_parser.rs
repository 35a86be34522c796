//! Fixed-label response parsing
//!
//! The model is instructed to answer with seven `LABEL: value` lines, but
//! real responses drift. Parsing is therefore total: lines are reduced in
//! order, a line contributes only if it carries a recognized label prefix,
//! duplicate labels resolve last-wins, and every field has a defined
//! fallback. Callers always receive a fully populated attribute set.

use crate::models::PredictedAttributes;

const DEFAULT_COUNTRY: &str = "Unknown";
const DEFAULT_REASONING: &str = "Unable to determine with high confidence";
const DEFAULT_CONFIDENCE: f64 = 50.0;

/// Values the model uses to mark a field as absent.
const ABSENT_CITY: &[&str] = &["not specified", "unknown", "n/a", ""];
const ABSENT_SPECIALTY: &[&str] = &["none", "unknown", "n/a", ""];
const ABSENT_PROFILE_URL: &[&str] = &["not found", "none", "unknown", "n/a", ""];

/// Parse the model's response text into typed attributes. Total: never
/// fails, regardless of input shape.
pub fn parse_attributes(raw: &str) -> PredictedAttributes {
    let mut attributes = PredictedAttributes {
        country: DEFAULT_COUNTRY.to_string(),
        city: None,
        confidence: DEFAULT_CONFIDENCE,
        reasoning: DEFAULT_REASONING.to_string(),
        is_doctor: true,
        specialty: None,
        profile_url: None,
    };

    for line in raw.lines() {
        if let Some(value) = line.strip_prefix("COUNTRY:") {
            attributes.country = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("CITY:") {
            attributes.city = present_or_none(value, ABSENT_CITY);
        } else if let Some(value) = line.strip_prefix("CONFIDENCE:") {
            attributes.confidence = value
                .trim()
                .parse::<f64>()
                .map(|v| v.clamp(0.0, 100.0))
                .unwrap_or(DEFAULT_CONFIDENCE);
        } else if let Some(value) = line.strip_prefix("REASONING:") {
            attributes.reasoning = value.trim().to_string();
        } else if let Some(value) = line.strip_prefix("IS_DOCTOR:") {
            let answer = value.trim().to_lowercase();
            attributes.is_doctor = matches!(answer.as_str(), "yes" | "true" | "y");
        } else if let Some(value) = line.strip_prefix("SPECIALTY:") {
            attributes.specialty = present_or_none(value, ABSENT_SPECIALTY);
        } else if let Some(value) = line.strip_prefix("PROFILE_URL:") {
            attributes.profile_url = present_or_none(value, ABSENT_PROFILE_URL);
        }
    }

    attributes
}

/// Fallback attributes for a failed inference call. Every caller shares this
/// constructor, so the degraded shape cannot drift between call sites.
pub fn degraded_attributes(cause: &str) -> PredictedAttributes {
    PredictedAttributes {
        country: DEFAULT_COUNTRY.to_string(),
        city: None,
        confidence: 0.0,
        reasoning: format!("Error during prediction: {cause}"),
        is_doctor: true,
        specialty: None,
        profile_url: None,
    }
}

fn present_or_none(value: &str, absent_markers: &[&str]) -> Option<String> {
    let trimmed = value.trim();
    if absent_markers.contains(&trimmed.to_lowercase().as_str()) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_response_parses() {
        let attributes = parse_attributes(
            "COUNTRY: Scotland\n\
             CITY: Edinburgh\n\
             CONFIDENCE: 85\n\
             REASONING: Hospital and email domain both point to Edinburgh.\n\
             IS_DOCTOR: yes\n\
             SPECIALTY: Cardiology\n\
             PROFILE_URL: https://www.researchgate.net/profile/Jane-Smith",
        );

        assert_eq!(attributes.country, "Scotland");
        assert_eq!(attributes.city.as_deref(), Some("Edinburgh"));
        assert_eq!(attributes.confidence, 85.0);
        assert_eq!(
            attributes.reasoning,
            "Hospital and email domain both point to Edinburgh."
        );
        assert!(attributes.is_doctor);
        assert_eq!(attributes.specialty.as_deref(), Some("Cardiology"));
        assert_eq!(
            attributes.profile_url.as_deref(),
            Some("https://www.researchgate.net/profile/Jane-Smith")
        );
    }

    #[test]
    fn test_empty_input_yields_all_defaults() {
        let attributes = parse_attributes("");

        assert_eq!(attributes.country, "Unknown");
        assert_eq!(attributes.city, None);
        assert_eq!(attributes.confidence, 50.0);
        assert_eq!(attributes.reasoning, "Unable to determine with high confidence");
        assert!(attributes.is_doctor);
        assert_eq!(attributes.specialty, None);
        assert_eq!(attributes.profile_url, None);
    }

    #[test]
    fn test_unrecognized_lines_are_ignored() {
        let attributes = parse_attributes(
            "Here is my analysis:\nCOUNTRY: Japan\nSome trailing commentary.",
        );
        assert_eq!(attributes.country, "Japan");
        assert_eq!(attributes.confidence, 50.0);
    }

    #[test]
    fn test_duplicate_labels_last_wins() {
        let attributes = parse_attributes("COUNTRY: A\nCOUNTRY: B");
        assert_eq!(attributes.country, "B");
    }

    #[test]
    fn test_labels_in_any_order() {
        let attributes = parse_attributes("SPECIALTY: Oncology\nCOUNTRY: Canada");
        assert_eq!(attributes.country, "Canada");
        assert_eq!(attributes.specialty.as_deref(), Some("Oncology"));
    }

    #[test]
    fn test_confidence_defaults_on_malformed_number() {
        let attributes = parse_attributes("CONFIDENCE: not-a-number");
        assert_eq!(attributes.confidence, 50.0);
    }

    #[test]
    fn test_confidence_clamped_to_range() {
        assert_eq!(parse_attributes("CONFIDENCE: 250").confidence, 100.0);
        assert_eq!(parse_attributes("CONFIDENCE: -10").confidence, 0.0);
    }

    #[test]
    fn test_city_absence_markers() {
        for marker in ["Not specified", "not specified", "Unknown", "N/A", ""] {
            let attributes = parse_attributes(&format!("CITY: {marker}"));
            assert_eq!(attributes.city, None, "marker {marker:?} should map to absent");
        }
        assert_eq!(
            parse_attributes("CITY: Manchester").city.as_deref(),
            Some("Manchester")
        );
    }

    #[test]
    fn test_specialty_absence_markers() {
        for marker in ["None", "none", "unknown", "N/A", ""] {
            let attributes = parse_attributes(&format!("SPECIALTY: {marker}"));
            assert_eq!(attributes.specialty, None, "marker {marker:?} should map to absent");
        }
    }

    #[test]
    fn test_profile_url_absence_markers() {
        for marker in ["Not found", "not found", "None", "unknown", "n/a", ""] {
            let attributes = parse_attributes(&format!("PROFILE_URL: {marker}"));
            assert_eq!(
                attributes.profile_url, None,
                "marker {marker:?} should map to absent"
            );
        }
    }

    #[test]
    fn test_is_doctor_accepted_answers() {
        assert!(parse_attributes("IS_DOCTOR: yes").is_doctor);
        assert!(parse_attributes("IS_DOCTOR: Yes").is_doctor);
        assert!(parse_attributes("IS_DOCTOR: TRUE").is_doctor);
        assert!(parse_attributes("IS_DOCTOR: y").is_doctor);
        assert!(!parse_attributes("IS_DOCTOR: no").is_doctor);
        assert!(!parse_attributes("IS_DOCTOR: maybe").is_doctor);
        // Label entirely absent: defaults to doctor.
        assert!(parse_attributes("COUNTRY: France").is_doctor);
    }

    #[test]
    fn test_degraded_attributes_shape() {
        let attributes = degraded_attributes("connection timed out");

        assert_eq!(attributes.country, "Unknown");
        assert_eq!(attributes.confidence, 0.0);
        assert_eq!(attributes.reasoning, "Error during prediction: connection timed out");
        assert!(attributes.is_doctor);
        assert_eq!(attributes.city, None);
        assert_eq!(attributes.specialty, None);
        assert_eq!(attributes.profile_url, None);
    }
}
