//! Scan command - extract payment fields from a single invoice image.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::mpsc;
use tracing::{debug, info};

use invoscan_core::{ExtractionResult, InvoiceScanner, ScanEvent, TextRecognizer};

use super::output::{emit, format_result, OutputFormat};
use super::{load_config, load_recognizer};

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// Input image (PNG, JPEG, TIFF, ...)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Line/column alignment tolerance in normalized page units
    #[arg(long)]
    tolerance: Option<f32>,
}

/// Scan progress forwarded from the blocking worker.
enum Progress {
    Began,
    Completed(usize),
    Failed(String),
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut extraction = config.extraction.clone();
    if let Some(tolerance) = args.tolerance {
        extraction.alignment_tolerance = tolerance;
    }
    extraction.validate()?;

    info!("Scanning file: {}", args.input.display());

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap(),
    );

    let model_dir = args.model_dir.clone();
    let result = scan_with_progress(args.input.clone(), &pb, move || {
        let recognizer = load_recognizer(&config, model_dir.as_ref())?;
        Ok(InvoiceScanner::new(recognizer).with_config(extraction))
    })
    .await?;

    emit(&format_result(&result, args.format)?, args.output.as_deref())?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Build a scanner on a blocking worker and scan `input` with it, driving
/// `pb` from the scan events.
///
/// The recognizer never leaves the worker thread.
async fn scan_with_progress<R, F>(
    input: PathBuf,
    pb: &ProgressBar,
    build: F,
) -> anyhow::Result<ExtractionResult>
where
    R: TextRecognizer + 'static,
    F: FnOnce() -> anyhow::Result<InvoiceScanner<R>> + Send + 'static,
{
    let (tx, mut rx) = mpsc::unbounded_channel();
    let worker = tokio::task::spawn_blocking(move || -> anyhow::Result<ExtractionResult> {
        let scanner = build()?;
        let result = scanner.scan_path(&input, |event: ScanEvent<'_>| {
            let progress = match event {
                ScanEvent::Began => Progress::Began,
                ScanEvent::Completed(result) => Progress::Completed(result.len()),
                ScanEvent::Failed(e) => Progress::Failed(e.to_string()),
            };
            let _ = tx.send(progress);
        })?;
        Ok(result)
    });

    while let Some(progress) = rx.recv().await {
        match progress {
            Progress::Began => {
                pb.set_message("Recognizing text...");
                pb.enable_steady_tick(Duration::from_millis(100));
            }
            Progress::Completed(count) => {
                pb.finish_with_message(format!("Extracted {} values", count));
            }
            Progress::Failed(message) => {
                pb.abandon_with_message(format!("Failed: {}", message));
            }
        }
    }

    worker.await?
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use invoscan_core::{
        BoundingBox, FieldType, PrecomputedRecognizer, RecognitionRequest, RecognizerError,
        TextObservation,
    };

    /// Recognizer that finishes without a result.
    struct SilentRecognizer;

    impl TextRecognizer for SilentRecognizer {
        fn recognize(
            &self,
            _image: &DynamicImage,
            _request: &RecognitionRequest,
        ) -> Result<Option<Vec<TextObservation>>, RecognizerError> {
            Ok(None)
        }
    }

    fn write_png(dir: &tempfile::TempDir) -> PathBuf {
        let path = dir.path().join("invoice.png");
        DynamicImage::new_rgb8(16, 16).save(&path).unwrap();
        path
    }

    fn bankgiro_observations() -> Vec<TextObservation> {
        vec![
            TextObservation::with_text("Bankgiro:", BoundingBox::from_rect(0.1, 0.5, 0.1, 0.02)),
            TextObservation::with_text("5402-2501", BoundingBox::from_rect(0.25, 0.5, 0.15, 0.02)),
        ]
    }

    #[tokio::test]
    async fn test_scan_with_progress_completes() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(&dir);
        let pb = ProgressBar::hidden();

        let result = scan_with_progress(input, &pb, || {
            Ok(InvoiceScanner::new(PrecomputedRecognizer::new(
                bankgiro_observations(),
            )))
        })
        .await
        .unwrap();

        assert_eq!(result.texts(FieldType::Receiver), vec!["5402-2501"]);
        assert!(pb.is_finished());
        assert_eq!(pb.message(), "Extracted 1 values");
    }

    #[tokio::test]
    async fn test_scan_with_progress_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(&dir);
        let pb = ProgressBar::hidden();

        let err = scan_with_progress(input, &pb, || Ok(InvoiceScanner::new(SilentRecognizer)))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("no result"));
        assert!(pb.is_finished());
        assert!(pb.message().starts_with("Failed:"));
    }

    #[tokio::test]
    async fn test_scan_with_progress_build_error() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_png(&dir);
        let pb = ProgressBar::hidden();

        let build = || -> anyhow::Result<InvoiceScanner<SilentRecognizer>> {
            anyhow::bail!("OCR models not found")
        };
        let err = scan_with_progress(input, &pb, build).await.unwrap_err();

        assert!(err.to_string().contains("OCR models not found"));
        assert!(!pb.is_finished());
    }
}
