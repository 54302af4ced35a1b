// =============================================================================
// Shared types used across the signal-scope engine
// =============================================================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One trading-period OHLCV record as delivered by the market-data provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

/// Direction a triggered rule points in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    Bullish,
    Bearish,
    Neutral,
}

impl std::fmt::Display for Polarity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bullish => write!(f, "bullish"),
            Self::Bearish => write!(f, "bearish"),
            Self::Neutral => write!(f, "neutral"),
        }
    }
}

/// A triggered scoring rule. The rationale is reused verbatim in reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signal {
    pub label: String,
    pub polarity: Polarity,
    pub rationale: String,
}

/// Discrete recommendation derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecommendationTier {
    StrongBuy,
    Neutral,
    Avoid,
}

impl RecommendationTier {
    /// Short human summary shown next to the tier.
    pub fn summary(&self) -> &'static str {
        match self {
            Self::StrongBuy => "technicals are strong and smart money is flowing in",
            Self::Neutral => "mixed signals; wait for a clearer pullback or breakout",
            Self::Avoid => "technicals are weakening or distribution is under way",
        }
    }
}

impl std::fmt::Display for RecommendationTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StrongBuy => write!(f, "StrongBuy"),
            Self::Neutral => write!(f, "Neutral"),
            Self::Avoid => write!(f, "Avoid"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_without_volume_is_rejected() {
        let json = r#"{"timestamp":"2024-01-02T21:00:00Z","open":1.0,"high":2.0,"low":0.5,"close":1.5}"#;
        let err = serde_json::from_str::<Bar>(json).unwrap_err();
        assert!(err.to_string().contains("volume"));

        let json = r#"{"timestamp":"2024-01-02T21:00:00Z","open":1.0,"high":2.0,"low":0.5,"close":1.5,"volume":0}"#;
        let bar: Bar = serde_json::from_str(json).unwrap();
        assert_eq!(bar.volume, 0);
        assert!((bar.close - 1.5).abs() < 1e-10);
    }

    #[test]
    fn polarity_serialises_snake_case() {
        assert_eq!(serde_json::to_string(&Polarity::Bullish).unwrap(), "\"bullish\"");
        assert_eq!(Polarity::Bearish.to_string(), "bearish");
    }

    #[test]
    fn tier_display_matches_variant() {
        assert_eq!(RecommendationTier::StrongBuy.to_string(), "StrongBuy");
        assert!(RecommendationTier::Avoid.summary().contains("distribution"));
    }
}
