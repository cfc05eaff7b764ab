//! Invoice scanner driving an OCR collaborator through field extraction.

use std::path::Path;
use std::time::Instant;

use image::{DynamicImage, GenericImageView};
use tracing::{debug, info, warn};

use super::extract::extract_fields;
use super::result::ExtractionResult;
use crate::error::ScanError;
use crate::models::config::ExtractionConfig;
use crate::ocr::{RecognitionRequest, TextRecognizer};

/// Progress notification of one scan.
///
/// `Began` is delivered before the recognizer runs; exactly one of
/// `Completed` or `Failed` follows it. Inputs that cannot be decoded fail
/// without any notification.
#[derive(Debug)]
pub enum ScanEvent<'a> {
    Began,
    Completed(&'a ExtractionResult),
    Failed(&'a ScanError),
}

/// Extracts payment fields from invoice images.
///
/// Every scan invokes the recognizer once, with accurate recognition and
/// language correction disabled. Scans share no state.
pub struct InvoiceScanner<R: TextRecognizer> {
    recognizer: R,
    config: ExtractionConfig,
}

impl<R: TextRecognizer> InvoiceScanner<R> {
    /// Create a scanner with default extraction settings.
    pub fn new(recognizer: R) -> Self {
        Self {
            recognizer,
            config: ExtractionConfig::default(),
        }
    }

    /// Set extraction configuration.
    pub fn with_config(mut self, config: ExtractionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    /// Scan a decoded image without progress notifications.
    pub fn extract(&self, image: &DynamicImage) -> Result<ExtractionResult, ScanError> {
        self.scan_image(image, |_| {})
    }

    /// Decode an encoded image (PNG, JPEG, ...) and scan it.
    pub fn scan_bytes(
        &self,
        bytes: &[u8],
        notify: impl FnMut(ScanEvent<'_>),
    ) -> Result<ExtractionResult, ScanError> {
        let image = image::load_from_memory(bytes)
            .map_err(|e| ScanError::InvalidInput(e.to_string()))?;
        self.scan_image(&image, notify)
    }

    /// Open and decode an image file and scan it.
    pub fn scan_path(
        &self,
        path: &Path,
        notify: impl FnMut(ScanEvent<'_>),
    ) -> Result<ExtractionResult, ScanError> {
        let image = image::open(path)
            .map_err(|e| ScanError::InvalidInput(format!("{}: {}", path.display(), e)))?;
        self.scan_image(&image, notify)
    }

    /// Scan a decoded image, reporting progress through `notify`.
    pub fn scan_image(
        &self,
        image: &DynamicImage,
        mut notify: impl FnMut(ScanEvent<'_>),
    ) -> Result<ExtractionResult, ScanError> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(ScanError::InvalidInput(format!(
                "image has no pixels ({}x{})",
                width, height
            )));
        }

        let start = Instant::now();
        info!("Scanning {}x{} image", width, height);
        notify(ScanEvent::Began);

        let outcome = match self
            .recognizer
            .recognize(image, &RecognitionRequest::accurate())
        {
            Ok(Some(observations)) => {
                debug!("Recognizer returned {} observations", observations.len());
                Ok(extract_fields(&observations, &self.config))
            }
            Ok(None) => Err(ScanError::Unknown),
            Err(e) => Err(ScanError::RecognitionFailed(e)),
        };

        match &outcome {
            Ok(result) => {
                info!(
                    "Scan complete: {} values in {}ms",
                    result.len(),
                    start.elapsed().as_millis()
                );
                notify(ScanEvent::Completed(result));
            }
            Err(e) => {
                warn!("Scan failed: {}", e);
                notify(ScanEvent::Failed(e));
            }
        }

        outcome
    }
}
