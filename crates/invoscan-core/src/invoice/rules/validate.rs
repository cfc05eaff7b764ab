//! Value validation of neighbor candidates.

use regex::Regex;
use tracing::trace;

use crate::invoice::fields::{ExtractionPolicy, FieldType};
use crate::invoice::result::ValidatedObservation;
use crate::ocr::TextObservation;

/// Apply `pattern` to `text` and return what the policy keeps, or `None`
/// when the pattern does not match.
pub fn extract_value<'t>(text: &'t str, pattern: &Regex, policy: ExtractionPolicy) -> Option<&'t str> {
    let found = pattern.find(text)?;
    match policy {
        ExtractionPolicy::WholeText => Some(text),
        ExtractionPolicy::MatchedSubstring => Some(found.as_str()),
    }
}

/// Validate neighbor candidates (right neighbor first, then below) of one anchor.
///
/// Absent candidates, candidates without text and candidates the pattern
/// rejects contribute nothing.
pub fn validate_candidates(
    candidates: &[Option<usize>],
    observations: &[TextObservation],
    pattern: &Regex,
    field_type: FieldType,
    policy: ExtractionPolicy,
) -> Vec<ValidatedObservation> {
    let mut validated = Vec::new();

    for index in candidates.iter().flatten().copied() {
        let Some(observation) = observations.get(index) else {
            continue;
        };
        let Some(text) = observation.top_text() else {
            continue;
        };

        match extract_value(text, pattern, policy) {
            Some(value) => validated.push(ValidatedObservation {
                source_index: index,
                source: observation.clone(),
                text: value.to_string(),
                field_type,
            }),
            None => trace!("{} candidate {:?} rejected", field_type, text),
        }
    }

    validated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::rules::patterns::{AMOUNT_PATTERN, OCR_REFERENCE_PATTERN};
    use crate::ocr::BoundingBox;

    fn obs(text: &str) -> TextObservation {
        TextObservation::with_text(text, BoundingBox::default())
    }

    #[test]
    fn test_extract_value_whole_text() {
        assert_eq!(
            extract_value("12345678 ", &OCR_REFERENCE_PATTERN, ExtractionPolicy::WholeText),
            Some("12345678 ")
        );
        assert_eq!(
            extract_value("ref 12345678", &OCR_REFERENCE_PATTERN, ExtractionPolicy::WholeText),
            None
        );
    }

    #[test]
    fn test_extract_value_substring() {
        assert_eq!(
            extract_value(
                "Belopp att betala 1 250,00 kr",
                &AMOUNT_PATTERN,
                ExtractionPolicy::MatchedSubstring
            ),
            Some("1 250,00")
        );
    }

    #[test]
    fn test_validate_keeps_candidate_order() {
        let observations = vec![obs("OCR"), obs("87654321"), obs("12345678")];

        let validated = validate_candidates(
            &[Some(2), Some(1)],
            &observations,
            &OCR_REFERENCE_PATTERN,
            FieldType::Ocr,
            ExtractionPolicy::WholeText,
        );

        let texts: Vec<&str> = validated.iter().map(|v| v.text.as_str()).collect();
        assert_eq!(texts, vec!["12345678", "87654321"]);
        assert_eq!(validated[0].source_index, 2);
        assert!(validated.iter().all(|v| v.field_type == FieldType::Ocr));
    }

    #[test]
    fn test_validate_skips_missing_and_empty() {
        let observations = vec![
            obs("OCR"),
            TextObservation::new(Vec::new(), BoundingBox::default()),
        ];

        let validated = validate_candidates(
            &[None, Some(1), Some(7)],
            &observations,
            &OCR_REFERENCE_PATTERN,
            FieldType::Ocr,
            ExtractionPolicy::WholeText,
        );

        assert!(validated.is_empty());
    }
}
