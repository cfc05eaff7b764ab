//! Configuration structures for the scanning pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{InvoscanError, Result};

/// Main configuration for the invoscan pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvoscanConfig {
    /// OCR configuration.
    pub ocr: OcrConfig,

    /// Field extraction configuration.
    pub extraction: ExtractionConfig,

    /// Model configuration.
    pub models: ModelConfig,
}

/// OCR engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Maximum image dimension (longer side) for accurate recognition.
    pub max_image_size: u32,

    /// Maximum image dimension (longer side) for fast recognition.
    pub fast_max_image_size: u32,

    /// Keep `[UNK]` tokens emitted by the recognizer instead of blanking them.
    pub keep_unk: bool,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            max_image_size: 2048,
            fast_max_image_size: 1024,
            keep_unk: false,
        }
    }
}

/// How an observation's text is compared with a field keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordMatch {
    /// Folded text contains the keyword anywhere.
    #[default]
    Contains,
    /// Folded text equals the keyword.
    Exact,
}

/// Field extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Maximum coordinate difference (normalized page units) for two
    /// observations to count as on the same line or in the same column.
    pub alignment_tolerance: f32,

    /// Keyword comparison mode.
    pub keyword_match: KeywordMatch,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            alignment_tolerance: 0.01,
            keyword_match: KeywordMatch::Contains,
        }
    }
}

impl ExtractionConfig {
    /// Set the alignment tolerance.
    pub fn with_alignment_tolerance(mut self, tolerance: f32) -> Self {
        self.alignment_tolerance = tolerance;
        self
    }

    /// Set the keyword comparison mode.
    pub fn with_keyword_match(mut self, mode: KeywordMatch) -> Self {
        self.keyword_match = mode;
        self
    }

    /// Check that the values are usable.
    pub fn validate(&self) -> Result<()> {
        if !self.alignment_tolerance.is_finite() || self.alignment_tolerance < 0.0 {
            return Err(InvoscanError::Config(format!(
                "alignment_tolerance must be a finite non-negative number, got {}",
                self.alignment_tolerance
            )));
        }
        Ok(())
    }
}

/// Model file locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory containing model files.
    pub model_dir: PathBuf,

    /// Text detection model file name.
    pub detection_model: String,

    /// Text recognition model file name.
    pub recognition_model: String,

    /// Character dictionary file name.
    pub dictionary: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from("models"),
            detection_model: "det.onnx".to_string(),
            recognition_model: "latin_rec.onnx".to_string(),
            dictionary: "latin_dict.txt".to_string(),
        }
    }
}

impl InvoscanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.extraction.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get full path to a model file.
    pub fn model_path(&self, model_name: &str) -> PathBuf {
        self.models.model_dir.join(model_name)
    }
}
