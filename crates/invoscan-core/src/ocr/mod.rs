//! OCR observation model and recognizer adapters.

mod precomputed;
#[cfg(feature = "native")]
mod pure_engine;

pub use precomputed::PrecomputedRecognizer;
#[cfg(feature = "native")]
pub use pure_engine::PureOcrRecognizer;

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::error::RecognizerError;

/// A point in normalized page coordinates.
///
/// The origin is the bottom-left corner of the page and `y` grows upward;
/// both axes span `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Quadrilateral bounding box of a text region.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub top_left: Point,
    pub top_right: Point,
    pub bottom_left: Point,
    pub bottom_right: Point,
}

impl BoundingBox {
    /// Axis-aligned box from its bottom-left corner and size.
    pub fn from_rect(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            top_left: Point::new(x, y + height),
            top_right: Point::new(x + width, y + height),
            bottom_left: Point::new(x, y),
            bottom_right: Point::new(x + width, y),
        }
    }
}

/// One ranked reading of a text region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Recognized text.
    pub text: String,
    /// Recognition confidence (0.0 - 1.0).
    pub confidence: f32,
}

impl Candidate {
    pub fn new(text: impl Into<String>, confidence: f32) -> Self {
        Self {
            text: text.into(),
            confidence,
        }
    }
}

/// One OCR-detected text region.
///
/// Observations are identified by their position in the recognized sequence,
/// never by content: two regions with the same text and geometry stay distinct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextObservation {
    /// Candidate readings, highest confidence first. May be empty.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Region geometry in normalized page coordinates.
    pub bounding_box: BoundingBox,
}

impl TextObservation {
    pub fn new(candidates: Vec<Candidate>, bounding_box: BoundingBox) -> Self {
        Self {
            candidates,
            bounding_box,
        }
    }

    /// Single-candidate observation with full confidence.
    pub fn with_text(text: impl Into<String>, bounding_box: BoundingBox) -> Self {
        Self::new(vec![Candidate::new(text, 1.0)], bounding_box)
    }

    /// Highest ranked candidate, if any.
    pub fn top_candidate(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    /// Text of the highest ranked candidate, if any.
    pub fn top_text(&self) -> Option<&str> {
        self.top_candidate().map(|c| c.text.as_str())
    }

    pub fn bottom_left(&self) -> Point {
        self.bounding_box.bottom_left
    }

    pub fn bottom_right(&self) -> Point {
        self.bounding_box.bottom_right
    }
}

/// How hard the recognizer should try.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionLevel {
    /// Prioritize correctness over latency.
    #[default]
    Accurate,
    /// Prioritize latency.
    Fast,
}

/// Options passed to the OCR collaborator for one recognition call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionRequest {
    pub level: RecognitionLevel,
    /// Dictionary-based correction; it rewrites account numbers into words.
    pub uses_language_correction: bool,
}

impl RecognitionRequest {
    /// Accurate recognition with language correction disabled.
    pub fn accurate() -> Self {
        Self {
            level: RecognitionLevel::Accurate,
            uses_language_correction: false,
        }
    }
}

impl Default for RecognitionRequest {
    fn default() -> Self {
        Self::accurate()
    }
}

/// An OCR collaborator producing text observations for a still image.
///
/// Implementations are not required to be `Send` or `Sync`.
pub trait TextRecognizer {
    /// Recognize text in the image.
    ///
    /// `Ok(None)` means the recognizer finished without a result and without
    /// a descriptive error. `Ok(Some(vec![]))` is a valid empty page.
    fn recognize(
        &self,
        image: &DynamicImage,
        request: &RecognitionRequest,
    ) -> Result<Option<Vec<TextObservation>>, RecognizerError>;
}

impl<R: TextRecognizer + ?Sized> TextRecognizer for Box<R> {
    fn recognize(
        &self,
        image: &DynamicImage,
        request: &RecognitionRequest,
    ) -> Result<Option<Vec<TextObservation>>, RecognizerError> {
        (**self).recognize(image, request)
    }
}
