//! # Innate Primitives
//!
//! Hardcoded constants for the phinet CORE.
//!
//! These values are compiled into the binary and are immutable at runtime.
//! Everything here exists to keep the canonical state encoding unambiguous
//! and the default network configuration in one place.

/// Maximum number of states a single node may declare.
///
/// The canonical state encoding spends exactly one base-16 digit per node,
/// so any cardinality above 16 would make encoded states ambiguous.
pub const MAX_NODE_STATES: u8 = 16;

/// Default number of states per node when none is specified.
///
/// Binary nodes are the common case; downstream Phi engines are typically
/// built for binary nodes only.
pub const DEFAULT_STATES_PER_NODE: u8 = 2;

/// Canonical label alphabet, indexed by node id.
///
/// Node 0 is "A", node 25 is "Z", node 26 is "a", and so on. Ids beyond the
/// alphabet fall back to a numeric label.
pub const LABEL_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alphabet_has_62_symbols() {
        assert_eq!(LABEL_ALPHABET.len(), 62);
    }

    #[test]
    fn max_states_matches_hex_radix() {
        // One hex digit per node state
        assert_eq!(MAX_NODE_STATES, 16);
    }
}
