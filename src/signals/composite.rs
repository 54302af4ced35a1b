// =============================================================================
// Composite Recommendation Engine — fixed-weight blend of the three scores
// =============================================================================
//
//   composite = technical × 0.5 + smart_money × 0.3 + (sentiment + 50) × 0.2
//
// The sentiment term is shifted, not rescaled, so it spans [-10, 30] while the
// other two span [0, 50] and [0, 30].  The weighted sum is left unclamped and
// can therefore range over [-10, 110].
//
// Tiers:  >= 70 StrongBuy,  [50, 70) Neutral,  < 50 Avoid.
// An entry zone (2 % below the current price) is suggested from 60 upwards.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::levels::SupportResistance;
use crate::signals::rules::RuleOutcome;
use crate::types::RecommendationTier;

pub const TECHNICAL_WEIGHT: f64 = 0.5;
pub const SMART_MONEY_WEIGHT: f64 = 0.3;
pub const SENTIMENT_WEIGHT: f64 = 0.2;
/// Shift applied to the sentiment score before weighting.
pub const SENTIMENT_OFFSET: f64 = 50.0;

pub const STRONG_BUY_THRESHOLD: f64 = 70.0;
pub const NEUTRAL_THRESHOLD: f64 = 50.0;
pub const ENTRY_ZONE_THRESHOLD: f64 = 60.0;
/// Suggested entry as a fraction of the current price.
pub const ENTRY_PULLBACK_FACTOR: f64 = 0.98;

/// The contribution of one sub-score to the composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub name: String,
    pub input: f64,
    pub weight: f64,
    pub contribution: f64,
}

/// Actionable price levels for the report.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceLevels {
    pub resistance: f64,
    pub support: f64,
    pub current_price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_entry: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeRecommendation {
    pub composite_score: f64,
    pub tier: RecommendationTier,
    /// Technical rationale followed by smart-money rationale.
    pub rationale: Vec<String>,
    pub contributions: Vec<ScoreContribution>,
    pub levels: PriceLevels,
}

/// Weighted sum of the three sub-scores. Not reclamped.
pub fn composite_score(technical: u8, smart_money: u8, sentiment: f64) -> f64 {
    contributions(technical, smart_money, sentiment)
        .iter()
        .map(|c| c.contribution)
        .sum()
}

fn contributions(technical: u8, smart_money: u8, sentiment: f64) -> Vec<ScoreContribution> {
    [
        ("technical", f64::from(technical), TECHNICAL_WEIGHT),
        ("smart_money", f64::from(smart_money), SMART_MONEY_WEIGHT),
        ("sentiment", sentiment + SENTIMENT_OFFSET, SENTIMENT_WEIGHT),
    ]
    .into_iter()
    .map(|(name, input, weight)| ScoreContribution {
        name: name.to_string(),
        input,
        weight,
        contribution: input * weight,
    })
    .collect()
}

/// Map a composite score onto a recommendation tier.
pub fn tier_for(score: f64) -> RecommendationTier {
    if score >= STRONG_BUY_THRESHOLD {
        RecommendationTier::StrongBuy
    } else if score >= NEUTRAL_THRESHOLD {
        RecommendationTier::Neutral
    } else {
        RecommendationTier::Avoid
    }
}

/// Suggested entry price, produced only for sufficiently strong composites.
pub fn suggested_entry(score: f64, current_price: f64) -> Option<f64> {
    (score >= ENTRY_ZONE_THRESHOLD).then(|| current_price * ENTRY_PULLBACK_FACTOR)
}

/// Blend the scorer outputs with the sentiment score into a recommendation.
pub fn compute_recommendation(
    technical: &RuleOutcome,
    smart_money: &RuleOutcome,
    sentiment_score: f64,
    current_price: f64,
    levels: SupportResistance,
) -> CompositeRecommendation {
    let contributions = contributions(technical.score, smart_money.score, sentiment_score);
    let composite_score: f64 = contributions.iter().map(|c| c.contribution).sum();

    let rationale = technical
        .rationale()
        .chain(smart_money.rationale())
        .map(str::to_string)
        .collect();

    CompositeRecommendation {
        composite_score,
        tier: tier_for(composite_score),
        rationale,
        contributions,
        levels: PriceLevels {
            resistance: levels.resistance,
            support: levels.support,
            current_price,
            suggested_entry: suggested_entry(composite_score, current_price),
        },
    }
}
