// =============================================================================
// Technical Strategy Scorer
// =============================================================================
//
// Rule-based score from trend position, RSI extremes, MACD crossover and a
// Bollinger lower-band breach.
//
//   base 50
//   close > SMA(long)                      +10
//   RSI < 30                               +20
//   RSI > 70                               -20
//   MACD crosses above signal (prev <=)    +15
//   close < lower Bollinger band           +15
//
// Only the bullish MACD cross is scored; there is no death-cross penalty.
// The total is clamped into [0, 100].
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::market_data::{Indicator, IndicatorSnapshot};
use crate::signals::rules::{evaluate, Rule, RuleOutcome};
use crate::types::Polarity;

const SCORER: &str = "technical";

pub const RSI_OVERSOLD: f64 = 30.0;
pub const RSI_OVERBOUGHT: f64 = 70.0;

fn default_short_window() -> usize {
    20
}

fn default_long_window() -> usize {
    50
}

/// Moving-average windows chosen by the caller for one scoring run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoringParams {
    #[serde(default = "default_short_window")]
    pub short_window: usize,
    #[serde(default = "default_long_window")]
    pub long_window: usize,
}

impl Default for ScoringParams {
    fn default() -> Self {
        Self {
            short_window: default_short_window(),
            long_window: default_long_window(),
        }
    }
}

impl ScoringParams {
    pub fn validate(&self) -> Result<(), ScoreError> {
        if self.short_window == 0 {
            return Err(ScoreError::InvalidParams(
                "short_window must be at least 1".to_string(),
            ));
        }
        if self.short_window >= self.long_window {
            return Err(ScoreError::InvalidParams(format!(
                "short_window ({}) must be less than long_window ({})",
                self.short_window, self.long_window
            )));
        }
        Ok(())
    }

    /// Bars needed before the technical scorer may run.
    pub fn required_bars(&self) -> usize {
        self.long_window.max(self.short_window).max(2)
    }
}

/// Latest/previous values the technical rules read.
#[derive(Debug, Clone, Copy)]
struct TechnicalInputs {
    close: f64,
    sma_long: f64,
    rsi: f64,
    macd_line: f64,
    macd_signal: f64,
    prev_macd_line: f64,
    prev_macd_signal: f64,
    lower_band: f64,
}

const TECHNICAL_RULES: &[Rule<TechnicalInputs>] = &[
    Rule {
        label: "trend",
        polarity: Polarity::Bullish,
        delta: 10,
        rationale: "price above long-term average (bullish trend)",
        predicate: |i| i.close > i.sma_long,
    },
    Rule {
        label: "rsi_oversold",
        polarity: Polarity::Bullish,
        delta: 20,
        rationale: "RSI oversold — high-probability rebound zone",
        predicate: |i| i.rsi < RSI_OVERSOLD,
    },
    Rule {
        label: "rsi_overbought",
        polarity: Polarity::Bearish,
        delta: -20,
        rationale: "RSI overbought — elevated pullback risk",
        predicate: |i| i.rsi > RSI_OVERBOUGHT,
    },
    Rule {
        label: "macd_golden_cross",
        polarity: Polarity::Bullish,
        delta: 15,
        rationale: "MACD bullish crossover",
        predicate: |i| i.macd_line > i.macd_signal && i.prev_macd_line <= i.prev_macd_signal,
    },
    Rule {
        label: "bollinger_undercut",
        polarity: Polarity::Bullish,
        delta: 15,
        rationale: "price below lower Bollinger band (oversold reversion)",
        predicate: |i| i.close < i.lower_band,
    },
];

/// Score the snapshot's trend and momentum picture.
///
/// Fails with [`ScoreError::DataInsufficient`] when the snapshot is shorter
/// than [`ScoringParams::required_bars`] or any required series is absent or
/// NaN at the latest or previous bar.
pub fn compute_technical_score(
    snapshot: &IndicatorSnapshot,
    params: &ScoringParams,
) -> Result<RuleOutcome, ScoreError> {
    params.validate()?;
    let inputs = resolve_inputs(snapshot, params)?;
    Ok(evaluate(TECHNICAL_RULES, &inputs))
}

fn resolve_inputs(
    snapshot: &IndicatorSnapshot,
    params: &ScoringParams,
) -> Result<TechnicalInputs, ScoreError> {
    let required = params.required_bars();
    if snapshot.len() < required {
        return Err(ScoreError::insufficient(
            SCORER,
            format!("need {required} bars, have {}", snapshot.len()),
        ));
    }

    let close = snapshot
        .latest_bar()
        .map(|b| b.close)
        .ok_or_else(|| ScoreError::insufficient(SCORER, "no bars"))?;

    // Both bars must be usable for every required series, not only MACD.
    let (_, sma_long) = pair(snapshot, Indicator::Sma(params.long_window))?;
    let (_, rsi) = pair(snapshot, Indicator::Rsi)?;
    let (prev_macd_line, macd_line) = pair(snapshot, Indicator::MacdLine)?;
    let (prev_macd_signal, macd_signal) = pair(snapshot, Indicator::MacdSignal)?;
    let (_, lower_band) = pair(snapshot, Indicator::BollingerLower)?;

    Ok(TechnicalInputs {
        close,
        sma_long,
        rsi,
        macd_line,
        macd_signal,
        prev_macd_line,
        prev_macd_signal,
        lower_band,
    })
}

/// `(previous, latest)` finite values of a series.
fn pair(snapshot: &IndicatorSnapshot, indicator: Indicator) -> Result<(f64, f64), ScoreError> {
    match (snapshot.previous(indicator), snapshot.latest(indicator)) {
        (Some(prev), Some(latest)) => Ok((prev, latest)),
        _ => Err(ScoreError::insufficient(
            SCORER,
            format!("{indicator} missing at latest or previous bar"),
        )),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::IndicatorSeries;
    use crate::signals::testkit::{bars_with_closes, flat_series};

    /// 50 bars closing at 100 with every indicator neutral.
    fn neutral_series(n: usize) -> IndicatorSeries {
        let mut ind = IndicatorSeries {
            rsi: flat_series(n, 50.0),
            macd_line: flat_series(n, 0.5),
            macd_signal: flat_series(n, 1.0),
            bollinger_lower: flat_series(n, 90.0),
            ..Default::default()
        };
        ind.sma.insert(20, flat_series(n, 100.0));
        ind.sma.insert(50, flat_series(n, 105.0));
        ind
    }

    fn snapshot(ind: IndicatorSeries) -> IndicatorSnapshot {
        let n = ind.rsi.len();
        IndicatorSnapshot::new(bars_with_closes(&vec![100.0; n]), ind).unwrap()
    }

    fn set_last(series: &mut Vec<Option<f64>>, value: f64) {
        *series.last_mut().unwrap() = Some(value);
    }

    #[test]
    fn neutral_snapshot_scores_base() {
        let outcome = compute_technical_score(&snapshot(neutral_series(50)), &ScoringParams::default())
            .unwrap();
        assert_eq!(outcome.score, 50);
        assert!(outcome.signals.is_empty());
    }

    #[test]
    fn price_above_long_average_adds_ten() {
        let mut ind = neutral_series(50);
        set_last(ind.sma.get_mut(&50).unwrap(), 95.0);
        let outcome = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap();
        assert_eq!(outcome.score, 60);
        assert_eq!(outcome.signals[0].label, "trend");
    }

    #[test]
    fn rsi_extremes_are_exclusive() {
        let mut low = neutral_series(50);
        set_last(&mut low.rsi, 25.0);
        let outcome = compute_technical_score(&snapshot(low), &ScoringParams::default()).unwrap();
        assert_eq!(outcome.score, 70);
        assert_eq!(outcome.signals.len(), 1);
        assert_eq!(outcome.signals[0].polarity, Polarity::Bullish);

        let mut high = neutral_series(50);
        set_last(&mut high.rsi, 75.0);
        let outcome = compute_technical_score(&snapshot(high), &ScoringParams::default()).unwrap();
        assert_eq!(outcome.score, 30);
        assert_eq!(outcome.signals.len(), 1);
        assert_eq!(outcome.signals[0].label, "rsi_overbought");
    }

    #[test]
    fn rsi_boundaries_emit_nothing() {
        for rsi in [30.0, 70.0] {
            let mut ind = neutral_series(50);
            set_last(&mut ind.rsi, rsi);
            let outcome = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap();
            assert!(outcome.signals.is_empty(), "RSI {rsi} should not fire");
        }
    }

    #[test]
    fn macd_golden_cross_fires_on_upward_cross() {
        let mut ind = neutral_series(50);
        // prev: line 0.5 <= signal 1.0; latest: line 1.5 > signal 1.0
        set_last(&mut ind.macd_line, 1.5);
        let outcome = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap();
        assert_eq!(outcome.score, 65);
        assert_eq!(outcome.signals[0].rationale, "MACD bullish crossover");
    }

    #[test]
    fn macd_from_equality_counts_as_cross() {
        let mut ind = neutral_series(50);
        ind.macd_line = flat_series(50, 1.0);
        set_last(&mut ind.macd_line, 1.2);
        let outcome = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap();
        assert_eq!(outcome.score, 65);
    }

    #[test]
    fn macd_frozen_at_equality_never_fires() {
        let mut ind = neutral_series(50);
        ind.macd_line = flat_series(50, 1.0);
        let outcome = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap();
        assert!(outcome.signals.is_empty());
    }

    #[test]
    fn macd_already_above_does_not_fire_again() {
        let mut ind = neutral_series(50);
        ind.macd_line = flat_series(50, 2.0);
        let outcome = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap();
        assert!(outcome.signals.is_empty());
    }

    #[test]
    fn macd_death_cross_is_not_penalised() {
        let mut ind = neutral_series(50);
        ind.macd_line = flat_series(50, 2.0);
        set_last(&mut ind.macd_line, 0.1);
        let outcome = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap();
        assert_eq!(outcome.score, 50);
    }

    #[test]
    fn bollinger_undercut_adds_fifteen() {
        let mut ind = neutral_series(50);
        set_last(&mut ind.bollinger_lower, 101.0);
        let outcome = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap();
        assert_eq!(outcome.score, 65);
        assert_eq!(outcome.signals[0].label, "bollinger_undercut");
    }

    #[test]
    fn stacked_bonuses_clamp_to_100() {
        let mut ind = neutral_series(50);
        set_last(ind.sma.get_mut(&50).unwrap(), 95.0); // +10
        set_last(&mut ind.rsi, 10.0); // +20
        set_last(&mut ind.macd_line, 1.5); // +15
        set_last(&mut ind.bollinger_lower, 101.0); // +15
        let outcome = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap();
        assert_eq!(outcome.score, 100);
        let labels: Vec<_> = outcome.signals.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(
            labels,
            vec!["trend", "rsi_oversold", "macd_golden_cross", "bollinger_undercut"]
        );
    }

    #[test]
    fn fewer_than_long_window_bars_is_insufficient() {
        let err = compute_technical_score(&snapshot(neutral_series(49)), &ScoringParams::default())
            .unwrap_err();
        assert!(matches!(err, ScoreError::DataInsufficient { scorer: "technical", .. }));
    }

    #[test]
    fn nan_at_latest_is_insufficient() {
        let mut ind = neutral_series(50);
        set_last(&mut ind.rsi, f64::NAN);
        let err = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap_err();
        assert!(matches!(err, ScoreError::DataInsufficient { .. }));
    }

    #[test]
    fn absent_previous_value_is_insufficient() {
        let mut ind = neutral_series(50);
        ind.bollinger_lower[48] = None;
        let err = compute_technical_score(&snapshot(ind), &ScoringParams::default()).unwrap_err();
        assert!(err.to_string().contains("Bollinger lower band"));
    }

    #[test]
    fn missing_sma_for_requested_window_is_insufficient() {
        let params = ScoringParams {
            short_window: 10,
            long_window: 30,
        };
        let err = compute_technical_score(&snapshot(neutral_series(50)), &params).unwrap_err();
        assert!(err.to_string().contains("SMA(30)"));
    }

    #[test]
    fn same_snapshot_scores_under_different_windows() {
        let mut ind = neutral_series(50);
        ind.sma.insert(30, flat_series(50, 90.0));
        let snap = snapshot(ind);
        let long50 = compute_technical_score(&snap, &ScoringParams::default()).unwrap();
        let long30 = compute_technical_score(
            &snap,
            &ScoringParams {
                short_window: 20,
                long_window: 30,
            },
        )
        .unwrap();
        assert_eq!(long50.score, 50);
        assert_eq!(long30.score, 60);
    }

    #[test]
    fn invalid_params_rejected() {
        let params = ScoringParams {
            short_window: 50,
            long_window: 20,
        };
        let err = compute_technical_score(&snapshot(neutral_series(50)), &params).unwrap_err();
        assert!(matches!(err, ScoreError::InvalidParams(_)));
    }

    #[test]
    fn scoring_is_idempotent() {
        let mut ind = neutral_series(50);
        set_last(&mut ind.rsi, 20.0);
        let snap = snapshot(ind);
        let a = compute_technical_score(&snap, &ScoringParams::default()).unwrap();
        let b = compute_technical_score(&snap, &ScoringParams::default()).unwrap();
        assert_eq!(a, b);
    }
}
