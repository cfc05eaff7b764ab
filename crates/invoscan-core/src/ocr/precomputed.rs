//! Recognizer replaying a recorded observation set.

use std::path::Path;

use image::DynamicImage;
use tracing::debug;

use crate::error::{RecognizerError, Result};

use super::{RecognitionRequest, TextObservation, TextRecognizer};

/// Recognizer that returns the same observation set for every image.
///
/// Used to re-run field extraction over OCR output recorded as JSON
/// (an array of [`TextObservation`]).
#[derive(Debug, Clone, Default)]
pub struct PrecomputedRecognizer {
    observations: Vec<TextObservation>,
}

impl PrecomputedRecognizer {
    pub fn new(observations: Vec<TextObservation>) -> Self {
        Self { observations }
    }

    /// Parse a JSON array of observations.
    pub fn from_json(json: &str) -> Result<Self> {
        let observations: Vec<TextObservation> = serde_json::from_str(json)?;
        Ok(Self::new(observations))
    }

    /// Load a JSON array of observations from a file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let recognizer = Self::from_json(&content)?;
        debug!(
            "Loaded {} recorded observations from {}",
            recognizer.observations.len(),
            path.display()
        );
        Ok(recognizer)
    }

    pub fn observations(&self) -> &[TextObservation] {
        &self.observations
    }

    pub fn into_observations(self) -> Vec<TextObservation> {
        self.observations
    }
}

impl TextRecognizer for PrecomputedRecognizer {
    fn recognize(
        &self,
        _image: &DynamicImage,
        _request: &RecognitionRequest,
    ) -> std::result::Result<Option<Vec<TextObservation>>, RecognizerError> {
        Ok(Some(self.observations.clone()))
    }
}
