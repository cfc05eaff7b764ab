//! Field extraction over one recognized observation set.

use std::time::Instant;

use tracing::debug;

use super::fields::{FieldSpec, FieldType};
use super::result::{ExtractionResult, ValidatedObservation};
use super::rules::{find_anchors, neighbors, validate_candidates};
use crate::models::config::ExtractionConfig;
use crate::ocr::TextObservation;

/// Extract every field type from the observations.
///
/// Each field is an independent pass over the full observation set.
pub fn extract_fields(
    observations: &[TextObservation],
    config: &ExtractionConfig,
) -> ExtractionResult {
    let start = Instant::now();
    let mut result = ExtractionResult::new();

    for field in FieldType::ALL {
        result.extend(field, extract_field(field.spec(), observations, config));
    }

    debug!(
        "Extracted {} values from {} observations in {}us",
        result.len(),
        observations.len(),
        start.elapsed().as_micros()
    );

    result
}

/// Run keyword anchoring, neighbor search and validation for one field.
pub fn extract_field(
    spec: &FieldSpec,
    observations: &[TextObservation],
    config: &ExtractionConfig,
) -> Vec<ValidatedObservation> {
    let anchors = find_anchors(spec.keywords, observations, config.keyword_match);
    let mut validated = Vec::new();

    for anchor in &anchors {
        let found = neighbors(*anchor, observations, config.alignment_tolerance);
        validated.extend(validate_candidates(
            &found.candidates(),
            observations,
            spec.pattern,
            spec.field_type,
            spec.policy,
        ));
    }

    debug!(
        "{}: {} anchors, {} values",
        spec.field_type,
        anchors.len(),
        validated.len()
    );

    validated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ocr::BoundingBox;
    use pretty_assertions::assert_eq;

    fn obs(text: &str, x: f32, y: f32, width: f32) -> TextObservation {
        TextObservation::with_text(text, BoundingBox::from_rect(x, y, width, 0.02))
    }

    #[test]
    fn test_empty_observations() {
        let result = extract_fields(&[], &ExtractionConfig::default());
        assert_eq!(result, ExtractionResult::new());
    }

    #[test]
    fn test_right_then_below_per_anchor() {
        let observations = vec![
            obs("OCR", 0.10, 0.50, 0.05),
            obs("11112222", 0.20, 0.50, 0.20),
            obs("33334444", 0.10, 0.46, 0.20),
        ];

        let result = extract_fields(&observations, &ExtractionConfig::default());
        assert_eq!(result.texts(FieldType::Ocr), vec!["11112222", "33334444"]);
    }

    #[test]
    fn test_multiple_anchors_per_field() {
        // "Belopp att betala" and "Totalt" both anchor the payment field.
        let observations = vec![
            obs("Belopp att betala", 0.10, 0.30, 0.20),
            obs("499,00", 0.35, 0.30, 0.10),
            obs("Totalt", 0.10, 0.20, 0.10),
            obs("499,00 SEK", 0.25, 0.20, 0.15),
        ];

        let result = extract_fields(&observations, &ExtractionConfig::default());
        assert_eq!(result.texts(FieldType::Payment), vec!["499,00", "499,00"]);
        assert!(result.get(FieldType::Receiver).is_empty());
    }

    #[test]
    fn test_exact_keyword_mode() {
        let observations = vec![
            obs("OCR-nummer", 0.10, 0.50, 0.10),
            obs("12345678", 0.25, 0.50, 0.20),
        ];

        let contains = extract_fields(&observations, &ExtractionConfig::default());
        assert_eq!(contains.texts(FieldType::Ocr), vec!["12345678"]);

        let exact = extract_fields(
            &observations,
            &ExtractionConfig::default().with_keyword_match(crate::KeywordMatch::Exact),
        );
        assert!(exact.get(FieldType::Ocr).is_empty());
    }

    #[test]
    fn test_nan_tolerance_extracts_nothing() {
        let observations = vec![
            obs("Bankgiro:", 0.10, 0.50, 0.10),
            obs("5402-2501", 0.40, 0.10, 0.12),
        ];

        let config = ExtractionConfig::default().with_alignment_tolerance(f32::NAN);
        let result = extract_fields(&observations, &config);
        assert!(result.get(FieldType::Receiver).is_empty());
    }

    #[test]
    fn test_decomposed_due_date_keyword() {
        let observations = vec![
            obs("Fo\u{308}rfallodag", 0.10, 0.50, 0.15),
            obs("2024-03-31", 0.30, 0.50, 0.15),
        ];

        let result = extract_fields(&observations, &ExtractionConfig::default());
        assert_eq!(result.texts(FieldType::DueDate), vec!["2024-03-31"]);
    }
}
