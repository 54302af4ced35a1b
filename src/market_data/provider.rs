// =============================================================================
// Dataset Provider — injected boundary for bars, indicators and headlines
// =============================================================================
//
// The engine never fetches anything itself.  A provider hands it a complete
// `MarketDataset` for one symbol; how that dataset was produced (vendor API,
// indicator library, sentiment model) is outside the engine.
// =============================================================================

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::error::SnapshotError;
use crate::market_data::snapshot::{IndicatorSeries, IndicatorSnapshot};
use crate::signals::sentiment::Headline;
use crate::types::Bar;

/// Everything the engine needs to analyse one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataset {
    pub symbol: String,
    pub bars: Vec<Bar>,
    #[serde(default)]
    pub indicators: IndicatorSeries,
    /// Newest first.
    #[serde(default)]
    pub headlines: Vec<Headline>,
}

impl MarketDataset {
    /// Split into a validated snapshot plus the headline list.
    pub fn into_parts(self) -> Result<(String, IndicatorSnapshot, Vec<Headline>), SnapshotError> {
        let snapshot = IndicatorSnapshot::new(self.bars, self.indicators)?;
        Ok((self.symbol, snapshot, self.headlines))
    }
}

/// Upstream failures. The engine reports them and never retries.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("invalid symbol '{0}'")]
    InvalidSymbol(String),

    #[error("no dataset available for '{0}'")]
    NotFound(String),

    #[error("dataset for '{requested}' is labelled '{found}'")]
    SymbolMismatch { requested: String, found: String },

    #[error("failed to read dataset {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Source of market datasets, injected into the analysis service.
pub trait DatasetProvider: Send + Sync {
    fn load(&self, symbol: &str) -> Result<MarketDataset, ProviderError>;
}

/// Upper-case a ticker and reject anything that could escape a directory.
pub fn normalise_symbol(symbol: &str) -> Result<String, ProviderError> {
    let upper = symbol.trim().to_uppercase();
    let valid = !upper.is_empty()
        && upper.len() <= 16
        && upper
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
        && !upper.starts_with('.');
    if valid {
        Ok(upper)
    } else {
        Err(ProviderError::InvalidSymbol(symbol.to_string()))
    }
}

// =============================================================================
// File-backed provider
// =============================================================================

/// Reads `<root>/<SYMBOL>.json` files written by an upstream export job.
#[derive(Debug, Clone)]
pub struct FileDatasetProvider {
    root: PathBuf,
}

impl FileDatasetProvider {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl DatasetProvider for FileDatasetProvider {
    fn load(&self, symbol: &str) -> Result<MarketDataset, ProviderError> {
        let symbol = normalise_symbol(symbol)?;
        let path = self.root.join(format!("{symbol}.json"));

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ProviderError::NotFound(symbol));
            }
            Err(source) => return Err(ProviderError::Io { path, source }),
        };

        let mut dataset: MarketDataset =
            serde_json::from_str(&content).map_err(|source| ProviderError::Parse {
                path: path.clone(),
                source,
            })?;
        if !dataset.symbol.is_empty() && !dataset.symbol.eq_ignore_ascii_case(&symbol) {
            return Err(ProviderError::SymbolMismatch {
                requested: symbol,
                found: dataset.symbol,
            });
        }
        dataset.symbol = symbol;

        debug!(
            path = %path.display(),
            bars = dataset.bars.len(),
            headlines = dataset.headlines.len(),
            "dataset loaded"
        );
        Ok(dataset)
    }
}

// =============================================================================
// In-memory provider
// =============================================================================

/// Fixed set of datasets keyed by symbol; used for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProvider {
    datasets: HashMap<String, MarketDataset>,
}

impl InMemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, dataset: MarketDataset) {
        self.datasets.insert(dataset.symbol.to_uppercase(), dataset);
    }
}

impl DatasetProvider for InMemoryProvider {
    fn load(&self, symbol: &str) -> Result<MarketDataset, ProviderError> {
        let symbol = normalise_symbol(symbol)?;
        self.datasets
            .get(&symbol)
            .cloned()
            .ok_or(ProviderError::NotFound(symbol))
    }
}
