// =============================================================================
// Sentiment Aggregator
// =============================================================================
//
// Headlines arrive already scored: polarity in [-1, 1] from an external
// sentiment model.  The aggregator keeps the newest `limit` headlines, takes
// the arithmetic mean of their polarity and scales it to [-100, 100].
//
// No headlines is a valid neutral input (score 0), not an error.
// =============================================================================

use serde::{Deserialize, Serialize};

/// Default number of most recent headlines considered.
pub const DEFAULT_HEADLINE_LIMIT: usize = 5;

/// Polarity above which a headline reads as positive (and below the negated
/// value as negative).
pub const TONE_THRESHOLD: f64 = 0.1;

/// A news headline with its externally computed polarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub polarity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Positive,
    Negative,
    Neutral,
}

impl Tone {
    pub fn from_polarity(polarity: f64) -> Self {
        if polarity > TONE_THRESHOLD {
            Self::Positive
        } else if polarity < -TONE_THRESHOLD {
            Self::Negative
        } else {
            Self::Neutral
        }
    }
}

/// Per-headline line of the sentiment breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadlineSentiment {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub polarity: f64,
    pub tone: Tone,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentSummary {
    /// Mean polarity × 100, in [-100, 100].
    pub score: f64,
    pub headlines: Vec<HeadlineSentiment>,
}

/// Average the polarity of the newest `limit` headlines.
///
/// Polarity is clamped into [-1, 1]; a non-finite polarity counts as neutral.
pub fn aggregate_sentiment(headlines: &[Headline], limit: usize) -> SentimentSummary {
    let breakdown: Vec<HeadlineSentiment> = headlines
        .iter()
        .take(limit)
        .map(|h| {
            let polarity = if h.polarity.is_finite() {
                h.polarity.clamp(-1.0, 1.0)
            } else {
                0.0
            };
            HeadlineSentiment {
                title: h.title.clone(),
                publisher: h.publisher.clone(),
                link: h.link.clone(),
                polarity,
                tone: Tone::from_polarity(polarity),
            }
        })
        .collect();

    if breakdown.is_empty() {
        return SentimentSummary {
            score: 0.0,
            headlines: breakdown,
        };
    }

    let mean = breakdown.iter().map(|h| h.polarity).sum::<f64>() / breakdown.len() as f64;
    SentimentSummary {
        score: mean * 100.0,
        headlines: breakdown,
    }
}
