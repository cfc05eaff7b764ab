//! Error types for the invoscan-core library.

use thiserror::Error;

/// Main error type for the invoscan library.
#[derive(Error, Debug)]
pub enum InvoscanError {
    /// Field extraction run failed.
    #[error("scan error: {0}")]
    Scan(#[from] ScanError),

    /// OCR collaborator error outside of a scan (e.g. loading models).
    #[error("recognizer error: {0}")]
    Recognizer(#[from] RecognizerError),

    /// Malformed JSON (configuration or recorded observations).
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Terminal failures of a single extraction call.
///
/// None of these are retried internally; an empty result is not a failure.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The input could not be decoded into a usable pixel buffer.
    #[error("invalid input image: {0}")]
    InvalidInput(String),

    /// The OCR collaborator reported an error.
    #[error("text recognition failed: {0}")]
    RecognitionFailed(#[from] RecognizerError),

    /// The OCR collaborator finished without observations and without an error.
    #[error("text recognition produced no result")]
    Unknown,
}

/// Errors reported by an OCR collaborator.
#[derive(Error, Debug)]
pub enum RecognizerError {
    /// Failed to load OCR models.
    #[error("failed to load model: {0}")]
    ModelLoad(String),

    /// Image preprocessing failed.
    #[error("preprocessing failed: {0}")]
    Preprocessing(String),

    /// Text recognition failed.
    #[error("recognition failed: {0}")]
    Recognition(String),
}

/// Result type for the invoscan library.
pub type Result<T> = std::result::Result<T, InvoscanError>;
