// =============================================================================
// Indicator Snapshot — read-only view over bars plus aligned indicator series
// =============================================================================
//
// Indicator maths lives outside the engine: the provider hands over one value
// slot per bar for every series it computed (null during warm-up).  The
// snapshot only checks structure (alignment, ordering, sane OHLC) and
// offers "latest" / "previous" lookups that filter out absent and NaN slots.
// =============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SnapshotError;
use crate::types::Bar;

/// One value slot per bar; `None` marks warm-up or a value the provider could
/// not produce.
pub type Series = Vec<Option<f64>>;

/// Pre-computed indicator series, each aligned index-for-index with the bars.
///
/// A series left empty is treated as "not supplied"; the scorers that need it
/// report insufficient data instead of guessing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorSeries {
    /// Simple moving averages of close, keyed by window length.
    #[serde(default)]
    pub sma: BTreeMap<usize, Series>,
    /// RSI(14).
    #[serde(default)]
    pub rsi: Series,
    /// MACD(12, 26, 9).
    #[serde(default)]
    pub macd_line: Series,
    #[serde(default)]
    pub macd_signal: Series,
    #[serde(default)]
    pub macd_histogram: Series,
    /// Bollinger Bands(20, 2σ).
    #[serde(default)]
    pub bollinger_upper: Series,
    #[serde(default)]
    pub bollinger_lower: Series,
    /// On-balance volume and its EMA(20).
    #[serde(default)]
    pub obv: Series,
    #[serde(default)]
    pub obv_ema: Series,
    /// Money flow index(14).
    #[serde(default)]
    pub mfi: Series,
    /// Rolling 50-bar mean of volume.
    #[serde(default)]
    pub volume_mean: Series,
}

/// Names every series the scorers can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    Sma(usize),
    Rsi,
    MacdLine,
    MacdSignal,
    MacdHistogram,
    BollingerUpper,
    BollingerLower,
    Obv,
    ObvEma,
    Mfi,
    VolumeMean,
}

impl std::fmt::Display for Indicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sma(window) => write!(f, "SMA({window})"),
            Self::Rsi => write!(f, "RSI"),
            Self::MacdLine => write!(f, "MACD line"),
            Self::MacdSignal => write!(f, "MACD signal"),
            Self::MacdHistogram => write!(f, "MACD histogram"),
            Self::BollingerUpper => write!(f, "Bollinger upper band"),
            Self::BollingerLower => write!(f, "Bollinger lower band"),
            Self::Obv => write!(f, "OBV"),
            Self::ObvEma => write!(f, "OBV EMA"),
            Self::Mfi => write!(f, "MFI"),
            Self::VolumeMean => write!(f, "volume mean"),
        }
    }
}

/// Immutable, validated view the scorers read from.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSnapshot {
    bars: Vec<Bar>,
    indicators: IndicatorSeries,
}

impl IndicatorSnapshot {
    /// Build a snapshot, rejecting misaligned series, out-of-order bars,
    /// non-positive prices and a low/high that does not bracket open/close.
    pub fn new(bars: Vec<Bar>, indicators: IndicatorSeries) -> Result<Self, SnapshotError> {
        for (index, bar) in bars.iter().enumerate() {
            let prices = [bar.open, bar.high, bar.low, bar.close];
            if prices.iter().any(|p| !p.is_finite() || *p <= 0.0) {
                return Err(SnapshotError::InvalidPrice { index });
            }
            if bar.low > bar.open.min(bar.close) || bar.high < bar.open.max(bar.close) {
                return Err(SnapshotError::InvalidRange { index });
            }
            if index > 0 && bar.timestamp <= bars[index - 1].timestamp {
                return Err(SnapshotError::UnorderedTimestamps { index });
            }
        }

        let expected = bars.len();
        let check = |name: String, series: &Series| -> Result<(), SnapshotError> {
            if !series.is_empty() && series.len() != expected {
                return Err(SnapshotError::Misaligned {
                    name,
                    expected,
                    actual: series.len(),
                });
            }
            Ok(())
        };

        for (window, series) in &indicators.sma {
            if *window == 0 {
                return Err(SnapshotError::ZeroWindow);
            }
            check(format!("sma_{window}"), series)?;
        }
        check("rsi".into(), &indicators.rsi)?;
        check("macd_line".into(), &indicators.macd_line)?;
        check("macd_signal".into(), &indicators.macd_signal)?;
        check("macd_histogram".into(), &indicators.macd_histogram)?;
        check("bollinger_upper".into(), &indicators.bollinger_upper)?;
        check("bollinger_lower".into(), &indicators.bollinger_lower)?;
        check("obv".into(), &indicators.obv)?;
        check("obv_ema".into(), &indicators.obv_ema)?;
        check("mfi".into(), &indicators.mfi)?;
        check("volume_mean".into(), &indicators.volume_mean)?;

        Ok(Self { bars, indicators })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn latest_bar(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn previous_bar(&self) -> Option<&Bar> {
        self.bars.len().checked_sub(2).map(|i| &self.bars[i])
    }

    /// Raw series for an indicator, or `None` when the provider omitted it.
    pub fn series(&self, indicator: Indicator) -> Option<&[Option<f64>]> {
        let ind = &self.indicators;
        let series = match indicator {
            Indicator::Sma(window) => ind.sma.get(&window)?,
            Indicator::Rsi => &ind.rsi,
            Indicator::MacdLine => &ind.macd_line,
            Indicator::MacdSignal => &ind.macd_signal,
            Indicator::MacdHistogram => &ind.macd_histogram,
            Indicator::BollingerUpper => &ind.bollinger_upper,
            Indicator::BollingerLower => &ind.bollinger_lower,
            Indicator::Obv => &ind.obv,
            Indicator::ObvEma => &ind.obv_ema,
            Indicator::Mfi => &ind.mfi,
            Indicator::VolumeMean => &ind.volume_mean,
        };
        if series.is_empty() {
            None
        } else {
            Some(series.as_slice())
        }
    }

    /// Finite value `back` bars before the latest one (0 = latest).
    pub fn value_back(&self, indicator: Indicator, back: usize) -> Option<f64> {
        let series = self.series(indicator)?;
        let index = series.len().checked_sub(back + 1)?;
        series[index].filter(|v| v.is_finite())
    }

    pub fn latest(&self, indicator: Indicator) -> Option<f64> {
        self.value_back(indicator, 0)
    }

    pub fn previous(&self, indicator: Indicator) -> Option<f64> {
        self.value_back(indicator, 1)
    }
}
