//! CLI subcommands.

pub mod batch;
pub mod config;
pub mod fields;
pub mod output;
pub mod scan;

use std::path::{Path, PathBuf};

use tracing::debug;

use invoscan_core::models::config::InvoscanConfig;
use invoscan_core::PureOcrRecognizer;

/// Load configuration from an explicit path, the default location, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<InvoscanConfig> {
    if let Some(path) = config_path {
        return Ok(InvoscanConfig::from_file(Path::new(path))?);
    }

    let default_path = config::default_config_path();
    if default_path.exists() {
        debug!("Using configuration from {}", default_path.display());
        Ok(InvoscanConfig::from_file(&default_path)?)
    } else {
        Ok(InvoscanConfig::default())
    }
}

/// Load the OCR models, preferring `model_dir` over the configured directory.
pub fn load_recognizer(
    config: &InvoscanConfig,
    model_dir: Option<&PathBuf>,
) -> anyhow::Result<PureOcrRecognizer> {
    let mut config = config.clone();
    if let Some(dir) = model_dir {
        config.models.model_dir = dir.clone();
    }

    let det_model = config.model_path(&config.models.detection_model);
    let rec_model = config.model_path(&config.models.recognition_model);

    if !det_model.exists() || !rec_model.exists() {
        anyhow::bail!(
            "OCR models not found at {}.\n\n\
             Place {} and {} (plus {}) there, or pass --model-dir.",
            config.models.model_dir.display(),
            config.models.detection_model,
            config.models.recognition_model,
            config.models.dictionary
        );
    }

    debug!("Using models from {}", config.models.model_dir.display());

    PureOcrRecognizer::from_dir(&config.models.model_dir, &config.models, config.ocr.clone())
        .map_err(|e| anyhow::anyhow!("Failed to load OCR models: {}", e))
}
