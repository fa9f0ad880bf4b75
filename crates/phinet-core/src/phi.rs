//! # Phi-Engine Boundary
//!
//! The integrated-information (Phi) computation engine is an external
//! collaborator, consumed only at this interface. The core assembles its
//! inputs - dense TPM in literature row order, connectivity matrix, labels
//! in ascending-id order, one concrete global state - and never computes
//! Phi itself.

use crate::net::Net;
use crate::state::decode_state;
use crate::tpm::TransitionTable;
use crate::types::NetError;

// =============================================================================
// ENGINE INPUT
// =============================================================================

/// Everything an external Phi engine consumes for one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct PhiInput {
    /// Dense state-by-node TPM, rows in literature (reversed-suffix) order.
    pub tpm: Vec<Vec<u8>>,
    /// Connectivity adjacency matrix, both axes ascending-id.
    pub cm: Vec<Vec<u8>>,
    /// Node labels in ascending-id order.
    pub labels: Vec<String>,
    /// The concrete global state to evaluate at, decoded per node.
    pub state: Vec<u8>,
}

impl PhiInput {
    /// Assemble engine input for one encoded global state.
    ///
    /// Fails if the state is not a valid row of the table; feeding an
    /// unreachable-by-construction encoding to an external engine produces
    /// its "state cannot be reached in the given TPM" class of failure, so
    /// it is rejected here first.
    pub fn for_state(
        net: &Net,
        table: &TransitionTable,
        state: &str,
    ) -> Result<Self, NetError> {
        if !table.contains_input(state) {
            return Err(NetError::InvalidStateEncoding {
                encoded: state.to_string(),
                reason: "not a row of the transition table".to_string(),
            });
        }
        let decoded = decode_state(state, table.cardinalities())?;
        Ok(Self {
            tpm: table.dense_matrix(),
            cm: net.connectivity_matrix(),
            labels: table.labels().to_vec(),
            state: decoded,
        })
    }
}

// =============================================================================
// ENGINE TRAIT
// =============================================================================

/// The external Phi computation engine.
///
/// # Extension Point
///
/// This trait is intentionally defined without in-crate implementations.
/// The engine is an opaque black box: given one assembled [`PhiInput`], it
/// returns a single non-negative scalar or fails. Implementors should be
/// stateless and must not mutate the input.
pub trait PhiEngine: Send + Sync {
    /// Compute Phi for the network at the given state.
    fn phi(&self, input: &PhiInput) -> Result<f64, NetError>;
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::{CatalogFunc, NodeFunc};
    use crate::tpm::compute_table;

    struct ConstantEngine;

    impl PhiEngine for ConstantEngine {
        fn phi(&self, _input: &PhiInput) -> Result<f64, NetError> {
            Ok(0.0)
        }
    }

    fn ring() -> Net {
        Net::from_edges_with(
            &[(0, 1), (1, 2), (2, 0)],
            2,
            NodeFunc::Catalog(CatalogFunc::Copy),
        )
        .expect("net")
    }

    #[test]
    fn input_shapes_match_network() {
        let net = ring();
        let table = compute_table(&net).expect("table");
        let input = PhiInput::for_state(&net, &table, "010").expect("input");

        assert_eq!(input.tpm.len(), 8);
        assert_eq!(input.cm.len(), 3);
        assert_eq!(input.labels, vec!["A", "B", "C"]);
        assert_eq!(input.state, vec![0, 1, 0]);
    }

    #[test]
    fn invalid_states_rejected_before_the_engine() {
        let net = ring();
        let table = compute_table(&net).expect("table");
        assert!(PhiInput::for_state(&net, &table, "012").is_err());
        assert!(PhiInput::for_state(&net, &table, "0100").is_err());
    }

    #[test]
    fn engines_plug_in_at_the_trait() {
        let net = ring();
        let table = compute_table(&net).expect("table");
        let input = PhiInput::for_state(&net, &table, "111").expect("input");
        let engine = ConstantEngine;
        let phi = engine.phi(&input).expect("phi");
        assert!(phi >= 0.0);
    }
}
