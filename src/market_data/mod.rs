pub mod provider;
pub mod snapshot;

pub use provider::{DatasetProvider, FileDatasetProvider, InMemoryProvider, MarketDataset, ProviderError};
pub use snapshot::{Indicator, IndicatorSeries, IndicatorSnapshot, Series};
