//! Keyword anchoring.

use tracing::trace;
use unicode_normalization::UnicodeNormalization;

use crate::models::config::KeywordMatch;
use crate::ocr::TextObservation;

/// NFC-normalize and lower-case text for keyword comparison.
///
/// Composing first makes a decomposed "o\u{308}" equal to "ö". Diacritic-less
/// OCR readings are covered by listing both keyword spellings.
pub fn fold_case(text: &str) -> String {
    text.nfc().collect::<String>().to_lowercase()
}

/// Indices of observations whose top candidate matches any keyword.
///
/// Observations without candidates are never anchors. Input order is kept
/// and nothing is deduplicated.
pub fn find_anchors(
    keywords: &[&str],
    observations: &[TextObservation],
    mode: KeywordMatch,
) -> Vec<usize> {
    observations
        .iter()
        .enumerate()
        .filter_map(|(index, observation)| {
            let text = fold_case(observation.top_text()?);
            let matched = keywords.iter().any(|keyword| match mode {
                KeywordMatch::Contains => text.contains(keyword),
                KeywordMatch::Exact => text == *keyword,
            });

            if matched {
                trace!("Observation {} is an anchor: {:?}", index, text);
                Some(index)
            } else {
                None
            }
        })
        .collect()
}
