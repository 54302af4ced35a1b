// =============================================================================
// Runtime Configuration — engine settings with atomic save
// =============================================================================
//
// Every tunable knob of the analysis service lives here.  All fields carry
// `#[serde(default)]` so that adding new fields never breaks loading an older
// config file.  Persistence uses an atomic tmp + rename pattern.
//
// The scoring windows held here are only *defaults*: each request copies them
// into an explicit `AnalysisOptions` value, optionally overridden per call.
// =============================================================================

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::AnalysisOptions;
use crate::levels::DEFAULT_LEVEL_WINDOW;
use crate::signals::sentiment::DEFAULT_HEADLINE_LIMIT;
use crate::signals::ScoringParams;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_bind_addr() -> String {
    "0.0.0.0:3001".to_string()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

fn default_headline_limit() -> usize {
    DEFAULT_HEADLINE_LIMIT
}

fn default_level_window() -> usize {
    DEFAULT_LEVEL_WINDOW
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the analysis service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Address the REST API listens on.
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Directory holding `<SYMBOL>.json` market datasets.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Default moving-average windows for the technical scorer.
    #[serde(default)]
    pub scoring: ScoringParams,

    /// Number of most recent headlines fed to the sentiment aggregator.
    #[serde(default = "default_headline_limit")]
    pub headline_limit: usize,

    /// Look-back (bars) for support / resistance.
    #[serde(default = "default_level_window")]
    pub level_window: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            data_dir: default_data_dir(),
            scoring: ScoringParams::default(),
            headline_limit: default_headline_limit(),
            level_window: default_level_window(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config
            .scoring
            .validate()
            .with_context(|| format!("invalid scoring windows in {}", path.display()))?;

        info!(
            path = %path.display(),
            short_window = config.scoring.short_window,
            long_window = config.scoring.long_window,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }

    /// Per-request options seeded from this config.
    pub fn analysis_options(&self) -> AnalysisOptions {
        AnalysisOptions {
            params: self.scoring,
            headline_limit: self.headline_limit,
            level_window: self.level_window,
        }
    }
}
