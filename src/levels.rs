// =============================================================================
// Support / Resistance — rolling extrema over the recent window
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;
use crate::types::Bar;

/// Default look-back for support/resistance.
pub const DEFAULT_LEVEL_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SupportResistance {
    /// Lowest low in the window.
    pub support: f64,
    /// Highest high in the window.
    pub resistance: f64,
}

/// Highest high and lowest low over the last `window` bars.
///
/// A shorter history narrows the window to what is available; only an empty
/// series is an error.
pub fn compute_levels(bars: &[Bar], window: usize) -> Result<SupportResistance, ScoreError> {
    let start = bars.len().saturating_sub(window.max(1));
    let recent = &bars[start..];
    if recent.is_empty() {
        return Err(ScoreError::EmptySeries);
    }

    let (support, resistance) = recent.iter().fold(
        (f64::INFINITY, f64::NEG_INFINITY),
        |(lo, hi), bar| (lo.min(bar.low), hi.max(bar.high)),
    );

    Ok(SupportResistance {
        support,
        resistance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars(highs: &[f64], lows: &[f64]) -> Vec<Bar> {
        let start = Utc.with_ymd_and_hms(2024, 3, 1, 21, 0, 0).unwrap();
        highs
            .iter()
            .zip(lows)
            .enumerate()
            .map(|(i, (&high, &low))| Bar {
                timestamp: start + Duration::days(i as i64),
                open: low,
                high,
                low,
                close: high,
                volume: 0,
            })
            .collect()
    }

    #[test]
    fn window_longer_than_history_uses_all_bars() {
        let b = bars(&[10.0, 12.0, 9.0, 15.0, 11.0], &[8.0, 9.0, 7.0, 10.0, 9.0]);
        let levels = compute_levels(&b, DEFAULT_LEVEL_WINDOW).unwrap();
        assert_eq!(levels.resistance, 15.0);
        assert_eq!(levels.support, 7.0);
    }

    #[test]
    fn only_recent_window_counts() {
        let b = bars(&[50.0, 12.0, 11.0], &[1.0, 9.0, 10.0]);
        let levels = compute_levels(&b, 2).unwrap();
        assert_eq!(levels.resistance, 12.0);
        assert_eq!(levels.support, 9.0);
    }

    #[test]
    fn single_bar_is_enough() {
        let b = bars(&[10.0], &[9.0]);
        let levels = compute_levels(&b, DEFAULT_LEVEL_WINDOW).unwrap();
        assert_eq!((levels.support, levels.resistance), (9.0, 10.0));
    }

    #[test]
    fn empty_series_is_an_error() {
        assert_eq!(compute_levels(&[], 20), Err(ScoreError::EmptySeries));
    }
}
