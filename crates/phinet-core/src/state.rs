//! # Global-State Encoding
//!
//! Canonical textual encoding of global states, joint-state-space
//! enumeration, and the literature-compatible row ordering.
//!
//! A global state is an ordered tuple with one component per node, ascending
//! node-id order, each component within that node's `{0, ..., num_states-1}`
//! domain. The canonical encoding spends one lowercase base-16 digit per
//! component, most-significant node first, which is why no node may declare
//! more than 16 states.
//!
//! All parsing validates before constructing: a bad length, a non-hex digit,
//! or a digit outside a node's declared cardinality is rejected outright.

use crate::primitives::MAX_NODE_STATES;
use crate::types::NetError;
use std::cmp::Ordering;

// =============================================================================
// VALIDATION
// =============================================================================

/// Validate a cardinality vector: every entry in `1..=16`.
pub fn validate_cardinalities(cards: &[u8]) -> Result<(), NetError> {
    for (i, &card) in cards.iter().enumerate() {
        if card == 0 {
            return Err(NetError::InvalidStateEncoding {
                encoded: String::new(),
                reason: format!("node at position {i} declares zero states"),
            });
        }
        if card > MAX_NODE_STATES {
            return Err(NetError::InvalidStateEncoding {
                encoded: String::new(),
                reason: format!(
                    "node at position {i} declares {card} states, max is {MAX_NODE_STATES}"
                ),
            });
        }
    }
    Ok(())
}

// =============================================================================
// ENCODE / DECODE
// =============================================================================

/// Encode a state tuple as a canonical hex string, validating each component
/// against the per-node cardinalities.
pub fn encode_state(states: &[u8], cards: &[u8]) -> Result<String, NetError> {
    if states.len() != cards.len() {
        return Err(NetError::InvalidStateEncoding {
            encoded: format!("{states:?}"),
            reason: format!(
                "state tuple has {} components, network has {} nodes",
                states.len(),
                cards.len()
            ),
        });
    }
    validate_cardinalities(cards)?;
    let mut encoded = String::with_capacity(states.len());
    for (i, (&value, &card)) in states.iter().zip(cards).enumerate() {
        if value >= card {
            return Err(NetError::InvalidStateEncoding {
                encoded: format!("{states:?}"),
                reason: format!(
                    "component {i} is {value}, node cardinality is {card}"
                ),
            });
        }
        // value < 16 is guaranteed by the cardinality check
        encoded.push(char::from_digit(u32::from(value), 16).unwrap_or('0'));
    }
    Ok(encoded)
}

/// Encode a state tuple already validated against its cardinalities.
///
/// Only for values the caller has range-checked; out-of-range digits would
/// otherwise be silently clamped to '0'.
pub(crate) fn encode_digits(states: &[u8]) -> String {
    states
        .iter()
        .map(|&v| char::from_digit(u32::from(v), 16).unwrap_or('0'))
        .collect()
}

/// Decode a canonical hex string into a state tuple, validating length and
/// per-digit range.
pub fn decode_state(encoded: &str, cards: &[u8]) -> Result<Vec<u8>, NetError> {
    let digits: Vec<char> = encoded.chars().collect();
    if digits.len() != cards.len() {
        return Err(NetError::InvalidStateEncoding {
            encoded: encoded.to_string(),
            reason: format!(
                "encoding has {} digits, network has {} nodes",
                digits.len(),
                cards.len()
            ),
        });
    }
    validate_cardinalities(cards)?;
    let mut states = Vec::with_capacity(digits.len());
    for (i, (&digit, &card)) in digits.iter().zip(cards).enumerate() {
        let value = digit.to_digit(16).ok_or_else(|| NetError::InvalidStateEncoding {
            encoded: encoded.to_string(),
            reason: format!("digit {i} ({digit:?}) is not a base-16 digit"),
        })? as u8;
        if value >= card {
            return Err(NetError::InvalidStateEncoding {
                encoded: encoded.to_string(),
                reason: format!("digit {i} is {value}, node cardinality is {card}"),
            });
        }
        states.push(value);
    }
    Ok(states)
}

// =============================================================================
// ENUMERATION
// =============================================================================

/// Enumerate the full Cartesian product of the per-node state ranges, in
/// ascending-id order with the last position varying fastest.
///
/// This is the dominant cost of table construction: the result holds
/// `prod(cards)` tuples. Callers must bound node count and cardinality
/// before invoking full enumeration.
#[must_use]
pub fn enumerate_states(cards: &[u8]) -> Vec<Vec<u8>> {
    let total: usize = cards.iter().map(|&c| c as usize).product();
    let mut out = Vec::with_capacity(total);
    let mut current = vec![0u8; cards.len()];
    for _ in 0..total {
        out.push(current.clone());
        for i in (0..cards.len()).rev() {
            current[i] += 1;
            if current[i] < cards[i] {
                break;
            }
            current[i] = 0;
        }
    }
    out
}

// =============================================================================
// LITERATURE ORDERING
// =============================================================================

/// The "reversed-suffix" state ordering used by the published literature:
/// states compare by their reversed encodings (least-significant node first).
///
/// For two binary nodes this orders `00, 10, 01, 11`. Reproduced exactly for
/// compatibility with external Phi engines.
#[must_use]
pub fn literature_cmp(a: &str, b: &str) -> Ordering {
    a.chars().rev().cmp(b.chars().rev())
}

/// Sort encoded states into literature order.
pub fn sort_literature(states: &mut [String]) {
    states.sort_by(|a, b| literature_cmp(a, b));
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_round_trip() {
        let cards = [2, 3, 16];
        let states = [1, 2, 15];
        let encoded = encode_state(&states, &cards).expect("encode");
        assert_eq!(encoded, "12f");
        assert_eq!(decode_state(&encoded, &cards).expect("decode"), states);
    }

    #[test]
    fn encode_rejects_out_of_range_component() {
        let err = encode_state(&[2], &[2]).expect_err("must reject");
        assert!(matches!(err, NetError::InvalidStateEncoding { .. }));
    }

    #[test]
    fn encode_rejects_length_mismatch() {
        assert!(encode_state(&[0, 1], &[2]).is_err());
    }

    #[test]
    fn decode_rejects_bad_digit() {
        assert!(decode_state("0z", &[2, 2]).is_err());
        assert!(decode_state("03", &[2, 2]).is_err());
        assert!(decode_state("0", &[2, 2]).is_err());
    }

    #[test]
    fn cardinality_bounds_enforced() {
        assert!(validate_cardinalities(&[1, 16]).is_ok());
        assert!(validate_cardinalities(&[0]).is_err());
        assert!(validate_cardinalities(&[17]).is_err());
    }

    #[test]
    fn enumeration_is_product_order() {
        let states = enumerate_states(&[2, 3]);
        assert_eq!(
            states,
            vec![
                vec![0, 0],
                vec![0, 1],
                vec![0, 2],
                vec![1, 0],
                vec![1, 1],
                vec![1, 2],
            ]
        );
    }

    #[test]
    fn enumeration_counts_joint_space() {
        assert_eq!(enumerate_states(&[2, 2, 2]).len(), 8);
        assert_eq!(enumerate_states(&[3, 2, 4]).len(), 24);
        // Zero nodes: exactly one (empty) global state
        assert_eq!(enumerate_states(&[]), vec![Vec::<u8>::new()]);
    }

    #[test]
    fn literature_order_reverses_significance() {
        let mut states = vec![
            "00".to_string(),
            "01".to_string(),
            "10".to_string(),
            "11".to_string(),
        ];
        sort_literature(&mut states);
        assert_eq!(states, vec!["00", "10", "01", "11"]);
    }
}
