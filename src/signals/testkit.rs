//! Hand-built bars and indicator series for scorer tests.

use chrono::{Duration, TimeZone, Utc};

use crate::market_data::{IndicatorSeries, MarketDataset, Series};
use crate::types::Bar;

/// Daily bars with `open == close`, a one-point range and volume 1 000.
pub fn bars_with_closes(closes: &[f64]) -> Vec<Bar> {
    let start = Utc.with_ymd_and_hms(2024, 1, 2, 21, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| Bar {
            timestamp: start + Duration::days(i as i64),
            open: close,
            high: close + 1.0,
            low: close - 1.0,
            close,
            volume: 1_000,
        })
        .collect()
}

pub fn flat_series(n: usize, value: f64) -> Series {
    vec![Some(value); n]
}

/// 60 rising daily bars closing at 120, with a fresh MACD cross, OBV inflow
/// and a 2× volume spike on an up-close.  Scores technical 75 and smart
/// money 75 under the default windows.
pub fn bullish_dataset(symbol: &str) -> MarketDataset {
    const N: usize = 60;
    let closes: Vec<f64> = (0..N).map(|i| 61.0 + i as f64).collect();
    let mut bars = bars_with_closes(&closes);
    if let Some(last) = bars.last_mut() {
        last.open = 118.0;
        last.low = 117.5;
        last.volume = 2_000;
    }

    let mut macd_line = flat_series(N, 0.5);
    macd_line[N - 1] = Some(1.5);

    let mut indicators = IndicatorSeries {
        rsi: flat_series(N, 55.0),
        macd_line,
        macd_signal: flat_series(N, 1.0),
        macd_histogram: flat_series(N, 0.5),
        bollinger_upper: flat_series(N, 125.0),
        bollinger_lower: flat_series(N, 100.0),
        obv: flat_series(N, 9_000.0),
        obv_ema: flat_series(N, 8_000.0),
        mfi: flat_series(N, 60.0),
        volume_mean: flat_series(N, 1_000.0),
        ..Default::default()
    };
    indicators.sma.insert(20, flat_series(N, 110.0));
    indicators.sma.insert(50, flat_series(N, 95.0));

    MarketDataset {
        symbol: symbol.to_string(),
        bars,
        indicators,
        headlines: Vec::new(),
    }
}
