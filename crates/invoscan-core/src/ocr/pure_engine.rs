//! OCR collaborator backed by `pure-onnx-ocr` (pure Rust, no external ONNX Runtime).

use std::borrow::Cow;
use std::path::Path;
use std::time::Instant;

use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use tracing::{debug, info};

use crate::error::RecognizerError;
use crate::models::config::{ModelConfig, OcrConfig};

use super::{
    BoundingBox, Candidate, RecognitionLevel, RecognitionRequest, TextObservation, TextRecognizer,
};

/// Text recognizer running PaddleOCR models through `pure-onnx-ocr`.
pub struct PureOcrRecognizer {
    engine: pure_onnx_ocr::engine::OcrEngine,
    config: OcrConfig,
}

impl PureOcrRecognizer {
    /// Create a recognizer from model files in a directory.
    pub fn from_dir(
        model_dir: &Path,
        models: &ModelConfig,
        config: OcrConfig,
    ) -> Result<Self, RecognizerError> {
        let det_path = model_dir.join(&models.detection_model);
        let rec_path = model_dir.join(&models.recognition_model);
        let dict_path = model_dir.join(&models.dictionary);

        for path in [&det_path, &rec_path, &dict_path] {
            if !path.exists() {
                return Err(RecognizerError::ModelLoad(format!(
                    "missing model file {}",
                    path.display()
                )));
            }
        }

        let engine = pure_onnx_ocr::engine::OcrEngineBuilder::new()
            .det_model_path(&det_path)
            .rec_model_path(&rec_path)
            .dictionary_path(&dict_path)
            .build()
            .map_err(|e| RecognizerError::ModelLoad(format!("pure-onnx-ocr: {}", e)))?;

        info!("Loaded pure-onnx-ocr engine from {}", model_dir.display());

        Ok(Self { engine, config })
    }

    fn max_size(&self, level: RecognitionLevel) -> u32 {
        match level {
            RecognitionLevel::Accurate => self.config.max_image_size,
            RecognitionLevel::Fast => self.config.fast_max_image_size,
        }
    }
}

impl TextRecognizer for PureOcrRecognizer {
    fn recognize(
        &self,
        image: &DynamicImage,
        request: &RecognitionRequest,
    ) -> Result<Option<Vec<TextObservation>>, RecognizerError> {
        let start = Instant::now();

        if request.uses_language_correction {
            debug!("Language correction requested but not supported by pure-onnx-ocr, ignoring");
        }

        let image = fit_to_max_size(image, self.max_size(request.level));
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(RecognizerError::Preprocessing(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        info!("Recognizing text in {}x{} image ({:?})", width, height, request.level);

        let results = self
            .engine
            .run_from_image(&*image)
            .map_err(|e| RecognizerError::Recognition(format!("pure-onnx-ocr: {}", e)))?;

        debug!("pure-onnx-ocr returned {} text regions", results.len());

        let observations: Vec<TextObservation> = results
            .iter()
            .map(|r| {
                let text = if self.config.keep_unk {
                    r.text.clone()
                } else {
                    r.text.replace("[UNK]", " ")
                };
                let candidates = if text.trim().is_empty() {
                    Vec::new()
                } else {
                    vec![Candidate::new(text, r.confidence)]
                };
                TextObservation::new(
                    candidates,
                    normalize_rect(polygon_rect(&r.bounding_box), width, height),
                )
            })
            .collect();

        info!(
            "OCR complete: {} observations in {}ms",
            observations.len(),
            start.elapsed().as_millis()
        );

        Ok(Some(observations))
    }
}

/// Downscale so the longer side is at most `max_size`, keeping the aspect ratio.
fn fit_to_max_size(image: &DynamicImage, max_size: u32) -> Cow<'_, DynamicImage> {
    let (width, height) = image.dimensions();
    if max_size == 0 || width.max(height) <= max_size {
        return Cow::Borrowed(image);
    }

    debug!("Resizing {}x{} image to fit {}", width, height, max_size);
    Cow::Owned(image.resize(max_size, max_size, FilterType::Triangle))
}

/// Pixel-space rectangle `(min_x, min_y, max_x, max_y)` of a detection polygon.
fn polygon_rect(polygon: &pure_onnx_ocr::Polygon<f64>) -> (f32, f32, f32, f32) {
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for coord in polygon.exterior().coords().take(4) {
        min_x = min_x.min(coord.x as f32);
        min_y = min_y.min(coord.y as f32);
        max_x = max_x.max(coord.x as f32);
        max_y = max_y.max(coord.y as f32);
    }

    (min_x, min_y, max_x, max_y)
}

/// Convert a top-left-origin pixel rectangle into a normalized,
/// bottom-left-origin bounding box.
fn normalize_rect(rect: (f32, f32, f32, f32), width: u32, height: u32) -> BoundingBox {
    let (min_x, min_y, max_x, max_y) = rect;
    let (w, h) = (width as f32, height as f32);

    let left = (min_x / w).clamp(0.0, 1.0);
    let right = (max_x / w).clamp(0.0, 1.0);
    let bottom = (1.0 - max_y / h).clamp(0.0, 1.0);
    let top = (1.0 - min_y / h).clamp(0.0, 1.0);

    BoundingBox::from_rect(left, bottom, right - left, top - bottom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_rect_flips_y() {
        // 100x200 image, region spanning x 10..50, y 20..40 from the top
        let bbox = normalize_rect((10.0, 20.0, 50.0, 40.0), 100, 200);

        assert!((bbox.bottom_left.x - 0.1).abs() < 1e-6);
        assert!((bbox.bottom_left.y - 0.8).abs() < 1e-6);
        assert!((bbox.bottom_right.x - 0.5).abs() < 1e-6);
        assert!((bbox.top_left.y - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_rect_clamps() {
        let bbox = normalize_rect((-5.0, -5.0, 120.0, 230.0), 100, 200);
        assert_eq!(bbox, BoundingBox::from_rect(0.0, 0.0, 1.0, 1.0));
    }

    fn assert_recognizer<R: TextRecognizer>() {}

    #[test]
    fn test_is_text_recognizer() {
        assert_recognizer::<PureOcrRecognizer>();
        assert_recognizer::<Box<PureOcrRecognizer>>();
    }

    #[test]
    fn test_from_dir_missing_models() {
        let dir = tempfile::tempdir().unwrap();

        let Err(err) = PureOcrRecognizer::from_dir(
            dir.path(),
            &ModelConfig::default(),
            OcrConfig::default(),
        ) else {
            panic!("expected missing model error");
        };
        assert!(matches!(err, RecognizerError::ModelLoad(_)));
        assert!(err.to_string().contains("det.onnx"));
    }

    #[test]
    fn test_fit_to_max_size() {
        let image = DynamicImage::new_rgb8(400, 200);

        let same = fit_to_max_size(&image, 1000);
        assert!(matches!(same, Cow::Borrowed(_)));

        let resized = fit_to_max_size(&image, 100);
        assert_eq!(resized.dimensions(), (100, 50));
    }
}
