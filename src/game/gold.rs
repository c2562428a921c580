//! Gold Time Evaluation
//!
//! The policy that decides whether a completion was fast enough to earn a
//! sabotage token. Pure arithmetic over the puzzle's timing config and the
//! clock reading at completion; the lifecycle ops apply the consequences.

use serde::{Deserialize, Serialize};

/// Verdict of the gold-time check run once per completion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GoldVerdict {
    /// Seconds the attempt took.
    pub clear_time: f64,
    /// Seconds that had to remain on the clock for gold.
    pub threshold: f64,
    /// Seconds actually remaining at completion.
    pub remaining: f64,
    /// Whether the completion earns a sabotage token.
    pub is_gold: bool,
}

/// Evaluate a completion against the gold threshold.
///
/// `threshold = time_limit * gold_fraction`; finishing with at least that
/// much time left is gold. The boundary counts: remaining exactly at the
/// threshold qualifies.
pub fn evaluate(time_limit: f64, gold_fraction: f64, remaining: f64) -> GoldVerdict {
    let threshold = time_limit * gold_fraction;
    GoldVerdict {
        clear_time: time_limit - remaining,
        threshold,
        remaining,
        is_gold: remaining >= threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fast_clear_is_gold() {
        // 60s limit, half-limit threshold, finished with 31s left.
        let verdict = evaluate(60.0, 0.5, 31.0);
        assert!(verdict.is_gold);
        assert_eq!(verdict.threshold, 30.0);
        assert_eq!(verdict.clear_time, 29.0);
    }

    #[test]
    fn test_slow_clear_is_not_gold() {
        let verdict = evaluate(60.0, 0.5, 29.0);
        assert!(!verdict.is_gold);
        assert_eq!(verdict.clear_time, 31.0);
    }

    #[test]
    fn test_threshold_boundary_counts_as_gold() {
        let verdict = evaluate(60.0, 0.5, 30.0);
        assert!(verdict.is_gold);
    }

    #[test]
    fn test_full_fraction_requires_instant_clear() {
        assert!(evaluate(20.0, 1.0, 20.0).is_gold);
        assert!(!evaluate(20.0, 1.0, 19.99).is_gold);
    }

    #[test]
    fn test_custom_fraction() {
        // Generous quarter-limit threshold.
        let verdict = evaluate(80.0, 0.25, 21.0);
        assert_eq!(verdict.threshold, 20.0);
        assert!(verdict.is_gold);
    }
}
