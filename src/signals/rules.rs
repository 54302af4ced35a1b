// =============================================================================
// Rule Table — declarative predicate → (delta, Signal) evaluation
// =============================================================================
//
// Both indicator scorers are expressed as an ordered table of pure rules over
// a resolved input struct.  Evaluation order fixes the order of the emitted
// signals; the score itself is a plain sum and does not depend on order.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::{Polarity, Signal};

/// Starting point for every indicator-derived score.
pub const BASE_SCORE: i32 = 50;

/// One scoring rule over resolved inputs `T`.
pub struct Rule<T> {
    pub label: &'static str,
    pub polarity: Polarity,
    pub delta: i32,
    pub rationale: &'static str,
    pub predicate: fn(&T) -> bool,
}

impl<T> Rule<T> {
    fn signal(&self) -> Signal {
        Signal {
            label: self.label.to_string(),
            polarity: self.polarity,
            rationale: self.rationale.to_string(),
        }
    }
}

/// Bounded score plus the rules that fired, in evaluation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub score: u8,
    pub signals: Vec<Signal>,
}

impl RuleOutcome {
    pub fn rationale(&self) -> impl Iterator<Item = &str> {
        self.signals.iter().map(|s| s.rationale.as_str())
    }
}

/// Run every rule against `inputs`, accumulate from [`BASE_SCORE`] and clamp
/// the total into [0, 100].
pub fn evaluate<T>(rules: &[Rule<T>], inputs: &T) -> RuleOutcome {
    let mut total = BASE_SCORE;
    let mut signals = Vec::new();

    for rule in rules {
        if (rule.predicate)(inputs) {
            total += rule.delta;
            signals.push(rule.signal());
        }
    }

    RuleOutcome {
        score: clamp_score(total),
        signals,
    }
}

/// Clamp a raw accumulated score into the [0, 100] band.
pub fn clamp_score(raw: i32) -> u8 {
    raw.clamp(0, 100) as u8
}
