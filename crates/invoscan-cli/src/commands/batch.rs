//! Batch command - scan multiple invoice images.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use invoscan_core::{ExtractionResult, InvoiceScanner, TextRecognizer};

use super::output::{format_result, OutputFormat};
use super::{load_config, load_recognizer};

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tif", "tiff", "bmp", "webp"];

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern of input images
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,
}

/// Result of scanning a single file.
struct FileResult {
    path: PathBuf,
    result: Option<ExtractionResult>,
    error: Option<String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files = matching_images(&args.input)?;
    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to scan",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let recognizer = load_recognizer(&config, args.model_dir.as_ref())?;
    let scanner = InvoiceScanner::new(recognizer).with_config(config.extraction.clone());

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")
            .unwrap()
            .progress_chars("=>-"),
    );

    let results = scan_files(&scanner, files, args.continue_on_error, &overall_pb)?;

    overall_pb.finish_with_message("Complete");

    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let failed: Vec<_> = results.iter().filter(|r| r.error.is_some()).collect();

    if let Some(ref output_dir) = args.output_dir {
        write_outputs(output_dir, &results, args.format)?;
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Scanned {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(successful.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for file in &failed {
            println!(
                "  - {}: {}",
                file.path.display(),
                file.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

/// Expand a glob pattern to image files.
fn matching_images(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let files = glob(pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .collect();
    Ok(files)
}

/// Scan each file in order, advancing `pb` once per file.
///
/// Without `continue_on_error` the first failure aborts the batch.
fn scan_files<R: TextRecognizer>(
    scanner: &InvoiceScanner<R>,
    files: Vec<PathBuf>,
    continue_on_error: bool,
    pb: &ProgressBar,
) -> anyhow::Result<Vec<FileResult>> {
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let file_start = Instant::now();
        let outcome = scanner.scan_path(&path, |_| {});
        let processing_time_ms = file_start.elapsed().as_millis() as u64;

        match outcome {
            Ok(result) => results.push(FileResult {
                path,
                result: Some(result),
                error: None,
                processing_time_ms,
            }),
            Err(e) => {
                let error_msg = e.to_string();
                if continue_on_error {
                    warn!("Failed to scan {}: {}", path.display(), error_msg);
                    results.push(FileResult {
                        path,
                        result: None,
                        error: Some(error_msg),
                        processing_time_ms,
                    });
                } else {
                    error!("Failed to scan {}: {}", path.display(), error_msg);
                    anyhow::bail!("Scanning failed: {}", error_msg);
                }
            }
        }

        pb.inc(1);
    }

    Ok(results)
}

/// Write one output file per successful scan into `output_dir`.
fn write_outputs(
    output_dir: &Path,
    results: &[FileResult],
    format: OutputFormat,
) -> anyhow::Result<()> {
    let successful: Vec<_> = results.iter().filter(|r| r.result.is_some()).collect();
    let paths: Vec<&Path> = successful.iter().map(|r| r.path.as_path()).collect();
    let names = output_names(&paths, format.extension());

    for (file, name) in successful.iter().zip(names) {
        if let Some(ref result) = file.result {
            let output_path = output_dir.join(name);
            fs::write(&output_path, format_result(result, format)?)?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    Ok(())
}

/// Output file names keyed on the input file stem.
///
/// A repeated stem gets a `_2`, `_3`, ... suffix so no output overwrites another.
fn output_names(paths: &[&Path], extension: &str) -> Vec<String> {
    let mut used = HashSet::new();

    paths
        .iter()
        .map(|path| {
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("invoice");

            let mut name = format!("{}.{}", stem, extension);
            let mut suffix = 2;
            while !used.insert(name.clone()) {
                name = format!("{}_{}.{}", stem, suffix, extension);
                suffix += 1;
            }

            if suffix > 2 {
                warn!("Output for {} renamed to {} to avoid a name clash", path.display(), name);
            }
            name
        })
        .collect()
}

/// One CSV row per extracted value, one row per failed file.
fn write_summary(path: &Path, results: &[FileResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record(["file", "field", "text", "error", "processing_time_ms"])?;

    for file in results {
        let file_name = file.path.display().to_string();
        let time = file.processing_time_ms.to_string();

        if let Some(ref result) = file.result {
            for value in result.iter() {
                wtr.write_record([
                    file_name.as_str(),
                    value.field_type.display_name(),
                    value.text.as_str(),
                    "",
                    time.as_str(),
                ])?;
            }
        }

        if let Some(ref error) = file.error {
            wtr.write_record([file_name.as_str(), "", "", error.as_str(), time.as_str()])?;
        }
    }

    wtr.flush()?;
    Ok(())
}
