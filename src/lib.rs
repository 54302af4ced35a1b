// =============================================================================
// signal-scope — composite signal scoring engine
// =============================================================================
//
// Turns a security's recent bars, pre-computed indicator series and scored
// headlines into a bounded technical score, a smart-money score, a sentiment
// score, and a fixed-weight composite recommendation with rationale and
// support / resistance / entry levels.
// =============================================================================

pub mod analysis;
pub mod api;
pub mod app_state;
pub mod error;
pub mod levels;
pub mod market_data;
pub mod runtime_config;
pub mod signals;
pub mod types;

pub use analysis::{analyze, AnalysisOptions, AnalysisReport, ScoreBreakdown};
pub use error::{ScoreError, SnapshotError};
pub use levels::{compute_levels, SupportResistance};
pub use market_data::{IndicatorSeries, IndicatorSnapshot, MarketDataset};
pub use signals::{
    aggregate_sentiment, compute_recommendation, compute_smart_money_score,
    compute_technical_score, ScoringParams,
};
pub use types::{Bar, Polarity, RecommendationTier, Signal};
