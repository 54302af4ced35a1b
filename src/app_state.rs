// =============================================================================
// Application State — shared by every API handler
// =============================================================================
//
// Holds the runtime config (defaults that may be changed through the API)
// and the injected dataset provider.  Handlers copy what they need out of the
// lock before scoring, so the scorers never see shared mutable state.
// =============================================================================

use std::sync::Arc;

use parking_lot::RwLock;

use crate::analysis::AnalysisOptions;
use crate::market_data::DatasetProvider;
use crate::runtime_config::RuntimeConfig;

pub struct AppState {
    pub runtime_config: Arc<RwLock<RuntimeConfig>>,
    pub provider: Arc<dyn DatasetProvider>,
    /// Instant when the service was started. Used for uptime reporting.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, provider: Arc<dyn DatasetProvider>) -> Self {
        Self {
            runtime_config: Arc::new(RwLock::new(config)),
            provider,
            start_time: std::time::Instant::now(),
        }
    }

    /// Snapshot of the current default options.
    pub fn analysis_options(&self) -> AnalysisOptions {
        self.runtime_config.read().analysis_options()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
