// =============================================================================
// Smart-Money Scorer — volume-behaviour heuristics
// =============================================================================
//
// Looks for the footprints of large participants on the latest bar:
//
//   base 50
//   RVOL > 1.5 on an up-close (accumulation)      +15
//   RVOL > 1.5 on a down-close (distribution)     -15
//   OBV above its EMA(20)                          +10
//   MFI > 80                                       -10
//   MFI < 20                                       +10
//
// RVOL = volume / rolling 50-bar mean volume.  A doji (close == open) fires
// neither volume rule.  The total is clamped into [0, 100].
// =============================================================================

use crate::error::ScoreError;
use crate::market_data::{Indicator, IndicatorSnapshot};
use crate::signals::rules::{evaluate, Rule, RuleOutcome};
use crate::types::Polarity;

const SCORER: &str = "smart-money";

/// Window of the rolling volume mean the relative-volume ratio divides by.
pub const VOLUME_MEAN_WINDOW: usize = 50;
pub const RVOL_SPIKE: f64 = 1.5;
pub const MFI_OVERHEATED: f64 = 80.0;
pub const MFI_OVERSOLD: f64 = 20.0;

#[derive(Debug, Clone, Copy)]
struct SmartMoneyInputs {
    open: f64,
    close: f64,
    relative_volume: f64,
    obv: f64,
    obv_ema: f64,
    mfi: f64,
}

const SMART_MONEY_RULES: &[Rule<SmartMoneyInputs>] = &[
    Rule {
        label: "volume_accumulation",
        polarity: Polarity::Bullish,
        delta: 15,
        rationale: "volume spike on up-close (accumulation)",
        predicate: |i| i.relative_volume > RVOL_SPIKE && i.close > i.open,
    },
    Rule {
        label: "volume_distribution",
        polarity: Polarity::Bearish,
        delta: -15,
        rationale: "volume spike on down-close (distribution)",
        predicate: |i| i.relative_volume > RVOL_SPIKE && i.close < i.open,
    },
    Rule {
        label: "obv_inflow",
        polarity: Polarity::Bullish,
        delta: 10,
        rationale: "OBV above its average (sustained inflow)",
        predicate: |i| i.obv > i.obv_ema,
    },
    Rule {
        label: "mfi_overheated",
        polarity: Polarity::Bearish,
        delta: -10,
        rationale: "MFI overheated (>80) — capital may exit short-term",
        predicate: |i| i.mfi > MFI_OVERHEATED,
    },
    Rule {
        label: "mfi_oversold",
        polarity: Polarity::Bullish,
        delta: 10,
        rationale: "MFI oversold (<20) — capital may return",
        predicate: |i| i.mfi < MFI_OVERSOLD,
    },
];

/// Relative volume of the latest bar, if the rolling mean is usable.
pub fn relative_volume(snapshot: &IndicatorSnapshot) -> Option<f64> {
    let volume = snapshot.latest_bar()?.volume as f64;
    let mean = snapshot.latest(Indicator::VolumeMean)?;
    if mean <= 0.0 {
        return None;
    }
    let ratio = volume / mean;
    ratio.is_finite().then_some(ratio)
}

/// Score volume behaviour on the latest bar.
pub fn compute_smart_money_score(snapshot: &IndicatorSnapshot) -> Result<RuleOutcome, ScoreError> {
    let inputs = resolve_inputs(snapshot)?;
    Ok(evaluate(SMART_MONEY_RULES, &inputs))
}

fn resolve_inputs(snapshot: &IndicatorSnapshot) -> Result<SmartMoneyInputs, ScoreError> {
    if snapshot.len() < VOLUME_MEAN_WINDOW {
        return Err(ScoreError::insufficient(
            SCORER,
            format!("need {VOLUME_MEAN_WINDOW} bars, have {}", snapshot.len()),
        ));
    }

    let bar = snapshot
        .latest_bar()
        .ok_or_else(|| ScoreError::insufficient(SCORER, "no bars"))?;

    let relative_volume = relative_volume(snapshot).ok_or_else(|| {
        ScoreError::insufficient(SCORER, "volume mean missing or zero at latest bar")
    })?;

    Ok(SmartMoneyInputs {
        open: bar.open,
        close: bar.close,
        relative_volume,
        obv: latest(snapshot, Indicator::Obv)?,
        obv_ema: latest(snapshot, Indicator::ObvEma)?,
        mfi: latest(snapshot, Indicator::Mfi)?,
    })
}

fn latest(snapshot: &IndicatorSnapshot, indicator: Indicator) -> Result<f64, ScoreError> {
    snapshot
        .latest(indicator)
        .ok_or_else(|| ScoreError::insufficient(SCORER, format!("{indicator} missing at latest bar")))
}
