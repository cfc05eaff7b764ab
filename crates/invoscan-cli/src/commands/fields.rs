//! Fields command - extract fields from recorded OCR observations.

use std::path::PathBuf;

use clap::Args;
use tracing::info;

use invoscan_core::{extract_fields, KeywordMatch, PrecomputedRecognizer};

use super::load_config;
use super::output::{emit, format_result, OutputFormat};

/// Arguments for the fields command.
#[derive(Args)]
pub struct FieldsArgs {
    /// JSON file with an array of text observations
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Line/column alignment tolerance in normalized page units
    #[arg(long)]
    tolerance: Option<f32>,

    /// Require keywords to equal the observation text instead of being contained in it
    #[arg(long)]
    exact_keywords: bool,
}

pub async fn run(args: FieldsArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    let mut extraction = config.extraction.clone();
    if let Some(tolerance) = args.tolerance {
        extraction.alignment_tolerance = tolerance;
    }
    if args.exact_keywords {
        extraction.keyword_match = KeywordMatch::Exact;
    }
    extraction.validate()?;

    let observations = PrecomputedRecognizer::from_file(&args.input)?.into_observations();
    info!("Extracting fields from {} observations", observations.len());

    let result = extract_fields(&observations, &extraction);

    emit(&format_result(&result, args.format)?, args.output.as_deref())
}
