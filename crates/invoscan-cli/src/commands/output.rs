//! Output formatting shared by the scan, fields and batch commands.

use std::fs;
use std::path::Path;

use console::style;

use invoscan_core::ExtractionResult;

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per extracted value
    Csv,
    /// Plain text summary, one line per field
    Text,
}

impl OutputFormat {
    /// File extension for written outputs.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub fn format_result(result: &ExtractionResult, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format!("{}\n", result)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "text", "source_index", "confidence"])?;

    for value in result.iter() {
        let confidence = value
            .source
            .top_candidate()
            .map(|c| format!("{:.3}", c.confidence))
            .unwrap_or_default();

        wtr.write_record([
            value.field_type.display_name(),
            value.text.as_str(),
            value.source_index.to_string().as_str(),
            confidence.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

/// Write to `output` if given, otherwise print to stdout.
pub fn emit(content: &str, output: Option<&Path>) -> anyhow::Result<()> {
    if let Some(output_path) = output {
        fs::write(output_path, content)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
    }

    Ok(())
}
