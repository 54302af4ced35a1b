// =============================================================================
// Engine error taxonomy
// =============================================================================

use thiserror::Error;

/// Failures surfaced by the scoring engine to its caller.
///
/// An empty news list is not among them: it resolves to a neutral
/// sentiment score.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreError {
    /// Too few bars, or a required indicator value is absent/NaN at the
    /// evaluation index.
    #[error("{scorer} scorer: insufficient data: {reason}")]
    DataInsufficient { scorer: &'static str, reason: String },

    /// Support/resistance requested over zero bars.
    #[error("cannot compute price levels over an empty bar series")]
    EmptySeries,

    /// Caller supplied unusable window parameters.
    #[error("invalid scoring parameters: {0}")]
    InvalidParams(String),
}

impl ScoreError {
    pub(crate) fn insufficient(scorer: &'static str, reason: impl Into<String>) -> Self {
        Self::DataInsufficient {
            scorer,
            reason: reason.into(),
        }
    }
}

/// Structural problems found while assembling an [`IndicatorSnapshot`].
///
/// [`IndicatorSnapshot`]: crate::market_data::IndicatorSnapshot
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SnapshotError {
    #[error("series '{name}' has {actual} values but there are {expected} bars")]
    Misaligned {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("bar {index} timestamp is not after the previous bar")]
    UnorderedTimestamps { index: usize },

    #[error("bar {index} has a non-positive or non-finite price")]
    InvalidPrice { index: usize },

    #[error("bar {index} has low above the body or high below it")]
    InvalidRange { index: usize },

    #[error("moving-average window must be positive")]
    ZeroWindow,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_message_names_scorer() {
        let err = ScoreError::insufficient("technical", "need 50 bars, have 10");
        assert_eq!(
            err.to_string(),
            "technical scorer: insufficient data: need 50 bars, have 10"
        );
    }
}
