// =============================================================================
// Signals Module
// =============================================================================
//
// Scoring pipeline of the engine:
// - Declarative rule tables with clamped accumulation
// - Technical strategy score (trend, RSI, MACD, Bollinger)
// - Smart-money score (relative volume, OBV, MFI)
// - Headline sentiment aggregation
// - Fixed-weight composite recommendation

pub mod composite;
pub mod rules;
pub mod sentiment;
pub mod smart_money;
pub mod technical;

#[cfg(test)]
pub(crate) mod testkit;

pub use composite::{compute_recommendation, CompositeRecommendation, PriceLevels};
pub use rules::RuleOutcome;
pub use sentiment::{aggregate_sentiment, Headline, HeadlineSentiment, SentimentSummary};
pub use smart_money::compute_smart_money_score;
pub use technical::{compute_technical_score, ScoringParams};
