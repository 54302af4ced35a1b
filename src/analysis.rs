// =============================================================================
// Analysis Pipeline — one request, one report
// =============================================================================
//
// Runs the engine components in fixed order over a single immutable snapshot:
//
//   1. Validate the caller's window parameters
//   2. Technical strategy score     (fails => no report)
//   3. Smart-money score            (fails => no report)
//   4. Headline sentiment           (empty news => 0)
//   5. Support / resistance over the level window
//   6. Composite score, tier, rationale, entry zone
//   7. Price change vs previous close, audit id + timestamp
//
// Nothing here logs or performs I/O; callers decide how to present failures.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::levels::{compute_levels, DEFAULT_LEVEL_WINDOW};
use crate::market_data::{Indicator, IndicatorSnapshot};
use crate::signals::composite::{compute_recommendation, PriceLevels, ScoreContribution};
use crate::signals::sentiment::{aggregate_sentiment, Headline, HeadlineSentiment, DEFAULT_HEADLINE_LIMIT};
use crate::signals::smart_money::{compute_smart_money_score, relative_volume};
use crate::signals::technical::{compute_technical_score, ScoringParams};
use crate::types::{RecommendationTier, Signal};

/// Per-request knobs; copied out of the runtime config for each call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnalysisOptions {
    pub params: ScoringParams,
    pub headline_limit: usize,
    pub level_window: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            params: ScoringParams::default(),
            headline_limit: DEFAULT_HEADLINE_LIMIT,
            level_window: DEFAULT_LEVEL_WINDOW,
        }
    }
}

/// The three sub-scores and every rule that fired, technical first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub technical_score: u8,
    pub smart_money_score: u8,
    pub sentiment_score: f64,
    pub signals: Vec<Signal>,
}

/// Latest indicator values, for display next to the scores.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorReadout {
    pub sma_short: Option<f64>,
    pub sma_long: Option<f64>,
    pub rsi: Option<f64>,
    pub macd_line: Option<f64>,
    pub macd_signal: Option<f64>,
    pub macd_histogram: Option<f64>,
    pub bollinger_upper: Option<f64>,
    pub bollinger_lower: Option<f64>,
    pub obv: Option<f64>,
    pub obv_ema: Option<f64>,
    pub mfi: Option<f64>,
    pub relative_volume: Option<f64>,
}

impl IndicatorReadout {
    fn from_snapshot(snapshot: &IndicatorSnapshot, params: &ScoringParams) -> Self {
        Self {
            sma_short: snapshot.latest(Indicator::Sma(params.short_window)),
            sma_long: snapshot.latest(Indicator::Sma(params.long_window)),
            rsi: snapshot.latest(Indicator::Rsi),
            macd_line: snapshot.latest(Indicator::MacdLine),
            macd_signal: snapshot.latest(Indicator::MacdSignal),
            macd_histogram: snapshot.latest(Indicator::MacdHistogram),
            bollinger_upper: snapshot.latest(Indicator::BollingerUpper),
            bollinger_lower: snapshot.latest(Indicator::BollingerLower),
            obv: snapshot.latest(Indicator::Obv),
            obv_ema: snapshot.latest(Indicator::ObvEma),
            mfi: snapshot.latest(Indicator::Mfi),
            relative_volume: relative_volume(snapshot),
        }
    }
}

/// Complete, auditable result of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Unique identifier for this report (UUID v4).
    pub id: String,
    pub symbol: String,
    /// ISO 8601 timestamp of when the report was produced.
    pub created_at: String,
    pub params: ScoringParams,

    pub current_price: f64,
    pub previous_close: f64,
    pub price_change: f64,
    pub pct_change: f64,

    pub scores: ScoreBreakdown,
    pub composite_score: f64,
    pub tier: RecommendationTier,
    pub tier_summary: String,
    pub rationale: Vec<String>,
    pub contributions: Vec<ScoreContribution>,
    pub levels: PriceLevels,
    pub headlines: Vec<HeadlineSentiment>,
    pub indicators: IndicatorReadout,
}

/// Analyse one symbol. Either scorer failing aborts the whole report; no
/// partial composite is ever produced.
pub fn analyze(
    symbol: &str,
    snapshot: &IndicatorSnapshot,
    headlines: &[Headline],
    options: &AnalysisOptions,
) -> Result<AnalysisReport, ScoreError> {
    let params = options.params;
    params.validate()?;

    let technical = compute_technical_score(snapshot, &params)?;
    let smart_money = compute_smart_money_score(snapshot)?;
    let sentiment = aggregate_sentiment(headlines, options.headline_limit);
    let levels = compute_levels(snapshot.bars(), options.level_window)?;

    let (current_price, previous_close) = match (snapshot.latest_bar(), snapshot.previous_bar()) {
        (Some(latest), Some(previous)) => (latest.close, previous.close),
        _ => {
            return Err(ScoreError::insufficient(
                "analysis",
                "need at least 2 bars for price change",
            ))
        }
    };
    let price_change = current_price - previous_close;
    let pct_change = price_change / previous_close * 100.0;

    let recommendation =
        compute_recommendation(&technical, &smart_money, sentiment.score, current_price, levels);

    let signals = technical
        .signals
        .iter()
        .chain(&smart_money.signals)
        .cloned()
        .collect();

    Ok(AnalysisReport {
        id: uuid::Uuid::new_v4().to_string(),
        symbol: symbol.to_string(),
        created_at: chrono::Utc::now().to_rfc3339(),
        params,
        current_price,
        previous_close,
        price_change,
        pct_change,
        scores: ScoreBreakdown {
            technical_score: technical.score,
            smart_money_score: smart_money.score,
            sentiment_score: sentiment.score,
            signals,
        },
        composite_score: recommendation.composite_score,
        tier: recommendation.tier,
        tier_summary: recommendation.tier.summary().to_string(),
        rationale: recommendation.rationale,
        contributions: recommendation.contributions,
        levels: recommendation.levels,
        headlines: sentiment.headlines,
        indicators: IndicatorReadout::from_snapshot(snapshot, &params),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::IndicatorSeries;
    use crate::signals::testkit::{bars_with_closes, bullish_dataset};

    fn bullish_snapshot() -> IndicatorSnapshot {
        let (_, snapshot, _) = bullish_dataset("NVDA").into_parts().unwrap();
        snapshot
    }

    fn headline(polarity: f64) -> Headline {
        Headline {
            title: "Guidance raised".into(),
            publisher: Some("Wire".into()),
            link: None,
            polarity,
        }
    }

    #[test]
    fn bullish_snapshot_is_strong_buy() {
        let report = analyze(
            "NVDA",
            &bullish_snapshot(),
            &[headline(0.5)],
            &AnalysisOptions::default(),
        )
        .unwrap();

        // technical: 50 + 10 (trend) + 15 (MACD) = 75
        // smart money: 50 + 15 (accumulation) + 10 (OBV) = 75
        // composite: 37.5 + 22.5 + (50 + 50) * 0.2 = 80
        assert_eq!(report.scores.technical_score, 75);
        assert_eq!(report.scores.smart_money_score, 75);
        assert!((report.scores.sentiment_score - 50.0).abs() < 1e-9);
        assert!((report.composite_score - 80.0).abs() < 1e-9);
        assert_eq!(report.tier, RecommendationTier::StrongBuy);
        assert!((report.levels.suggested_entry.unwrap() - 120.0 * 0.98).abs() < 1e-9);
        assert_eq!(
            report.rationale,
            vec![
                "price above long-term average (bullish trend)",
                "MACD bullish crossover",
                "volume spike on up-close (accumulation)",
                "OBV above its average (sustained inflow)",
            ]
        );
        assert_eq!(report.scores.signals.len(), 4);
    }

    #[test]
    fn report_carries_price_change_and_levels() {
        let report = analyze("NVDA", &bullish_snapshot(), &[], &AnalysisOptions::default()).unwrap();
        assert_eq!(report.current_price, 120.0);
        assert_eq!(report.previous_close, 119.0);
        assert!((report.price_change - 1.0).abs() < 1e-10);
        assert!((report.pct_change - 100.0 / 119.0).abs() < 1e-10);
        // last 20 bars: closes 101..=120, range ±1
        assert_eq!(report.levels.resistance, 121.0);
        assert_eq!(report.levels.support, 100.0);
        assert_eq!(report.scores.sentiment_score, 0.0);
        assert!(report.headlines.is_empty());
    }

    #[test]
    fn readout_uses_requested_windows() {
        let report = analyze("NVDA", &bullish_snapshot(), &[], &AnalysisOptions::default()).unwrap();
        assert_eq!(report.indicators.sma_short, Some(110.0));
        assert_eq!(report.indicators.sma_long, Some(95.0));
        assert!((report.indicators.relative_volume.unwrap() - 2.0).abs() < 1e-10);
    }

    #[test]
    fn scorer_failure_produces_no_report() {
        let bars = bars_with_closes(&vec![100.0; 10]);
        let snapshot = IndicatorSnapshot::new(bars, IndicatorSeries::default()).unwrap();
        let err = analyze("NVDA", &snapshot, &[], &AnalysisOptions::default()).unwrap_err();
        assert!(matches!(err, ScoreError::DataInsufficient { scorer: "technical", .. }));
    }

    #[test]
    fn invalid_params_are_rejected_first() {
        let options = AnalysisOptions {
            params: ScoringParams {
                short_window: 0,
                long_window: 50,
            },
            ..Default::default()
        };
        let err = analyze("NVDA", &bullish_snapshot(), &[], &options).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidParams(_)));
    }

    #[test]
    fn repeated_analysis_scores_identically() {
        let snapshot = bullish_snapshot();
        let a = analyze("NVDA", &snapshot, &[headline(-0.3)], &AnalysisOptions::default()).unwrap();
        let b = analyze("NVDA", &snapshot, &[headline(-0.3)], &AnalysisOptions::default()).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(a.scores, b.scores);
        assert_eq!(a.composite_score, b.composite_score);
        assert_eq!(a.levels, b.levels);
    }
}
