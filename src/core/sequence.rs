//! Constrained Symbol Sequences
//!
//! Uniform random sequences over a small symbol domain that avoid the
//! patterns players guess first: immediate repeats, two-back repeats
//! (the ABAB shape), and shared-target collisions. Every draw goes through
//! the exclusion-draw primitive, which picks the r-th value outside the
//! forbidden set instead of rejecting and retrying, so generation is
//! bounded-time and exactly uniform over the legal subset. Production
//! callers draw from the operating system's CSPRNG; tests inject seeded
//! streams through the generic entry points.

use rand::rngs::OsRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// ERRORS
// =============================================================================

/// Errors from sequence generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The symbol domain cannot support non-repeating draws.
    #[error("symbol domain must hold at least 2 values, got {0}")]
    DomainTooSmall(u16),

    /// Zero-length sequences are a caller bug.
    #[error("sequence length must be at least 1")]
    EmptyLength,

    /// The forbidden set covered the whole domain.
    #[error("exclusion set leaves no legal symbol in a domain of {domain}")]
    Exhausted {
        /// Size of the domain that was exhausted.
        domain: u16,
    },
}

// =============================================================================
// SEQUENCE SPEC
// =============================================================================

/// Shape of a generated sequence: `length` symbols over `[0, domain)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSpec {
    domain: u16,
    length: usize,
}

impl SequenceSpec {
    /// Validate a spec. The domain must hold at least two symbols and the
    /// length at least one.
    pub fn new(domain: u16, length: usize) -> Result<Self, SequenceError> {
        if domain < 2 {
            return Err(SequenceError::DomainTooSmall(domain));
        }
        if length == 0 {
            return Err(SequenceError::EmptyLength);
        }
        Ok(Self { domain, length })
    }

    /// Number of symbols in the domain.
    pub fn domain(&self) -> u16 {
        self.domain
    }

    /// Number of symbols in a generated sequence.
    pub fn length(&self) -> usize {
        self.length
    }
}

// =============================================================================
// EXCLUSION DRAW
// =============================================================================

/// Draw one symbol uniformly from `[0, domain)` minus `forbidden`.
///
/// Implemented as "pick the r-th legal value": `r` is drawn over the legal
/// count, then mapped past the forbidden values in ascending order. One
/// random draw per call no matter how large the forbidden set is.
pub fn draw_excluding<R: Rng + ?Sized>(
    rng: &mut R,
    domain: u16,
    forbidden: &[u16],
) -> Result<u16, SequenceError> {
    let mut banned: Vec<u16> = forbidden.iter().copied().filter(|&v| v < domain).collect();
    banned.sort_unstable();
    banned.dedup();

    let legal = domain as usize - banned.len();
    if legal == 0 {
        return Err(SequenceError::Exhausted { domain });
    }

    let mut pick = rng.gen_range(0..legal as u16);
    for &b in &banned {
        if pick >= b {
            pick += 1;
        }
    }
    Ok(pick)
}

// =============================================================================
// SEQUENCE GENERATION
// =============================================================================

/// Generate a full constrained sequence from the supplied random stream.
///
/// Constraints:
/// - no symbol equals its immediate predecessor;
/// - in domains of 3+, no symbol equals the symbol two back either, which
///   rules out the ABAB alternation shape;
/// - in a domain of exactly 2 the no-repeat rule already forces strict
///   alternation, so that shape is accepted as the only legal one.
pub fn generate<R: Rng + ?Sized>(
    rng: &mut R,
    spec: SequenceSpec,
) -> Result<Vec<u16>, SequenceError> {
    let domain = spec.domain;
    let mut seq = Vec::with_capacity(spec.length);
    seq.push(draw_excluding(rng, domain, &[])?);
    for i in 1..spec.length {
        let prev = seq[i - 1];
        let symbol = if i >= 2 && domain >= 3 {
            draw_excluding(rng, domain, &[prev, seq[i - 2]])?
        } else {
            draw_excluding(rng, domain, &[prev])?
        };
        seq.push(symbol);
    }
    Ok(seq)
}

/// Generate a constrained sequence from the operating system's CSPRNG.
pub fn generate_secure(spec: SequenceSpec) -> Result<Vec<u16>, SequenceError> {
    generate(&mut OsRng, spec)
}

/// Draw one target per entry of `domains`, pairwise distinct: each pick
/// excludes every earlier pick that falls inside its own domain.
pub fn distinct_targets<R: Rng + ?Sized>(
    rng: &mut R,
    domains: &[u16],
) -> Result<Vec<u16>, SequenceError> {
    let mut picks: Vec<u16> = Vec::with_capacity(domains.len());
    for &domain in domains {
        if domain < 2 {
            return Err(SequenceError::DomainTooSmall(domain));
        }
        let pick = draw_excluding(rng, domain, &picks)?;
        picks.push(pick);
    }
    Ok(picks)
}

/// Pairwise-distinct targets over one shared domain, drawn from the
/// operating system's CSPRNG.
pub fn distinct_targets_secure(domain: u16, count: usize) -> Result<Vec<u16>, SequenceError> {
    distinct_targets(&mut OsRng, &vec![domain; count])
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn assert_constraints(seq: &[u16], domain: u16) {
        for (i, &s) in seq.iter().enumerate() {
            assert!(s < domain, "symbol {s} outside domain {domain}");
            if i >= 1 {
                assert_ne!(s, seq[i - 1], "immediate repeat at {i} in {seq:?}");
            }
            if i >= 2 && domain >= 3 {
                assert_ne!(s, seq[i - 2], "two-back repeat at {i} in {seq:?}");
            }
        }
    }

    #[test]
    fn test_spec_rejects_tiny_domain() {
        assert_eq!(
            SequenceSpec::new(1, 4),
            Err(SequenceError::DomainTooSmall(1))
        );
        assert_eq!(
            SequenceSpec::new(0, 4),
            Err(SequenceError::DomainTooSmall(0))
        );
    }

    #[test]
    fn test_spec_rejects_empty_length() {
        assert_eq!(SequenceSpec::new(5, 0), Err(SequenceError::EmptyLength));
    }

    #[test]
    fn test_draw_excluding_covers_exactly_the_legal_set() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut seen = [false; 5];
        for _ in 0..500 {
            let v = draw_excluding(&mut rng, 5, &[1, 3]).unwrap();
            assert!(v == 0 || v == 2 || v == 4, "illegal draw {v}");
            seen[v as usize] = true;
        }
        assert!(seen[0] && seen[2] && seen[4]);
    }

    #[test]
    fn test_draw_excluding_tolerates_duplicates_and_out_of_range() {
        let mut rng = StdRng::seed_from_u64(9);
        // Duplicate bans and bans past the domain must not shrink the
        // legal set below its true size.
        for _ in 0..200 {
            let v = draw_excluding(&mut rng, 3, &[2, 2, 17]).unwrap();
            assert!(v < 2);
        }
    }

    #[test]
    fn test_draw_excluding_exhausted_domain() {
        let mut rng = StdRng::seed_from_u64(1);
        let err = draw_excluding(&mut rng, 3, &[0, 1, 2]).unwrap_err();
        assert_eq!(err, SequenceError::Exhausted { domain: 3 });
    }

    #[test]
    fn test_generate_standard_shape_holds_constraints() {
        let spec = SequenceSpec::new(10, 6).unwrap();
        for seed in 0..100 {
            let mut rng = StdRng::seed_from_u64(seed);
            let seq = generate(&mut rng, spec).unwrap();
            assert_eq!(seq.len(), 6);
            assert_constraints(&seq, 10);
        }
    }

    #[test]
    fn test_generate_is_deterministic_per_seed() {
        let spec = SequenceSpec::new(10, 6).unwrap();
        let mut a = StdRng::seed_from_u64(0xDA5);
        let mut b = StdRng::seed_from_u64(0xDA5);
        assert_eq!(generate(&mut a, spec).unwrap(), generate(&mut b, spec).unwrap());
    }

    #[test]
    fn test_binary_domain_forces_strict_alternation() {
        let spec = SequenceSpec::new(2, 5).unwrap();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let seq = generate(&mut rng, spec).unwrap();
            assert!(
                seq == vec![0, 1, 0, 1, 0] || seq == vec![1, 0, 1, 0, 1],
                "unexpected binary sequence {seq:?}"
            );
        }
    }

    #[test]
    fn test_ternary_domain_never_alternates() {
        // With d=3 the two-back rule leaves exactly one choice per step
        // after the first two symbols, and ABAB can never appear.
        let spec = SequenceSpec::new(3, 8).unwrap();
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let seq = generate(&mut rng, spec).unwrap();
            assert_constraints(&seq, 3);
        }
    }

    #[test]
    fn test_generate_secure_holds_constraints() {
        let spec = SequenceSpec::new(10, 6).unwrap();
        let seq = generate_secure(spec).unwrap();
        assert_eq!(seq.len(), 6);
        assert_constraints(&seq, 10);
    }

    #[test]
    fn test_distinct_targets_shared_domain() {
        for seed in 0..50 {
            let mut rng = StdRng::seed_from_u64(seed);
            let picks = distinct_targets(&mut rng, &[8, 8, 8, 8]).unwrap();
            for i in 0..picks.len() {
                for j in 0..i {
                    assert_ne!(picks[i], picks[j], "collision in {picks:?}");
                }
            }
        }
    }

    #[test]
    fn test_distinct_targets_mixed_domains() {
        let mut rng = StdRng::seed_from_u64(3);
        let picks = distinct_targets(&mut rng, &[4, 9, 9]).unwrap();
        assert!(picks[0] < 4 && picks[1] < 9 && picks[2] < 9);
        assert_ne!(picks[1], picks[2]);
    }

    #[test]
    fn test_distinct_targets_exhaustion() {
        let mut rng = StdRng::seed_from_u64(5);
        // Three pairwise-distinct picks cannot fit in a domain of two.
        let err = distinct_targets(&mut rng, &[2, 2, 2]).unwrap_err();
        assert_eq!(err, SequenceError::Exhausted { domain: 2 });
    }

    proptest! {
        #[test]
        fn prop_generated_sequences_hold_constraints(
            domain in 2u16..30,
            length in 1usize..40,
            seed in any::<u64>(),
        ) {
            let spec = SequenceSpec::new(domain, length).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let seq = generate(&mut rng, spec).unwrap();
            prop_assert_eq!(seq.len(), length);
            for (i, &s) in seq.iter().enumerate() {
                prop_assert!(s < domain);
                if i >= 1 {
                    prop_assert_ne!(s, seq[i - 1]);
                }
                if i >= 2 && domain >= 3 {
                    prop_assert_ne!(s, seq[i - 2]);
                }
            }
        }

        #[test]
        fn prop_exclusion_draw_never_hits_forbidden(
            domain in 2u16..64,
            forbidden in proptest::collection::vec(0u16..64, 0..8),
            seed in any::<u64>(),
        ) {
            let mut rng = StdRng::seed_from_u64(seed);
            match draw_excluding(&mut rng, domain, &forbidden) {
                Ok(v) => {
                    prop_assert!(v < domain);
                    prop_assert!(!forbidden.contains(&v));
                }
                Err(SequenceError::Exhausted { .. }) => {
                    let mut banned: Vec<u16> =
                        forbidden.iter().copied().filter(|&v| v < domain).collect();
                    banned.sort_unstable();
                    banned.dedup();
                    prop_assert_eq!(banned.len(), domain as usize);
                }
                Err(other) => prop_assert!(false, "unexpected error {other:?}"),
            }
        }
    }
}
