//! Extraction result model.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::fields::FieldType;
use crate::ocr::TextObservation;

/// A field value found next to a keyword anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidatedObservation {
    /// Position of the source observation in the recognized sequence.
    pub source_index: usize,
    /// The observation the value was read from.
    pub source: TextObservation,
    /// Extracted text (whole candidate or matched substring).
    pub text: String,
    /// Field the value belongs to.
    pub field_type: FieldType,
}

impl fmt::Display for ValidatedObservation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// Validated observations grouped by field type.
///
/// Every field type is present; a field with no matches has an empty list.
/// Within a field, values are ordered by anchor position, right neighbor
/// before the one below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub fields: BTreeMap<FieldType, Vec<ValidatedObservation>>,
}

impl ExtractionResult {
    /// Create a result with an empty list for every field.
    pub fn new() -> Self {
        Self {
            fields: FieldType::ALL.iter().map(|f| (*f, Vec::new())).collect(),
        }
    }

    /// Validated observations for a field.
    pub fn get(&self, field: FieldType) -> &[ValidatedObservation] {
        self.fields.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Extracted texts for a field, in order.
    pub fn texts(&self, field: FieldType) -> Vec<&str> {
        self.get(field).iter().map(|v| v.text.as_str()).collect()
    }

    /// Append observations to their field's list.
    pub fn extend(&mut self, field: FieldType, observations: Vec<ValidatedObservation>) {
        self.fields.entry(field).or_default().extend(observations);
    }

    /// Total number of validated observations.
    pub fn len(&self) -> usize {
        self.fields.values().map(Vec::len).sum()
    }

    /// True when no field has a value.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All validated observations, field by field.
    pub fn iter(&self) -> impl Iterator<Item = &ValidatedObservation> {
        self.fields.values().flatten()
    }
}

impl Default for ExtractionResult {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ExtractionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, field) in FieldType::ALL.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}: {}", field, self.texts(*field).join(", "))?;
        }
        Ok(())
    }
}
