//! # Core Type Definitions
//!
//! This module contains all core types for the phinet deterministic
//! network substrate:
//! - Node identity (`NodeId`, `Node`)
//! - Error types (`FuncError`, `NetError`)
//!
//! ## Determinism Guarantees
//!
//! All types in this module:
//! - Use integer arithmetic only (no floating-point)
//! - Implement `Ord` for deterministic ordering in `BTreeMap`/`BTreeSet`
//! - Carry no interior mutability and no shared global state

use crate::funcs::NodeFunc;
use crate::primitives::LABEL_ALPHABET;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// =============================================================================
// NODE IDENTITY
// =============================================================================

/// Unique identifier for a node within one network.
///
/// Ids are assigned during network construction, scoped to that network
/// (there is no process-wide counter). A node's id is immutable once
/// assigned and, via its rank in ascending-id order, fixes the node's
/// position in every global state tuple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

/// A node in the network: a finite-state unit updated by a deterministic
/// function of its direct predecessors' states.
///
/// `num_states` is the size of the node's state domain `{0, ..., num_states-1}`
/// and may never exceed 16 (one hex digit in the canonical state encoding).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Immutable identifier, unique within the owning network.
    pub id: NodeId,
    /// Human-readable label, unique within the owning network.
    pub label: String,
    /// State cardinality of this node.
    pub num_states: u8,
    /// Update rule: maps ordered predecessor states to this node's next state.
    pub func: NodeFunc,
}

impl Node {
    /// Create a new node.
    #[must_use]
    pub fn new(id: NodeId, label: String, num_states: u8, func: NodeFunc) -> Self {
        Self {
            id,
            label,
            num_states,
            func,
        }
    }

    /// Canonical label for an id: one symbol from the 62-character alphabet,
    /// or `N{id}` for ids beyond it.
    #[must_use]
    pub fn default_label(id: NodeId) -> String {
        LABEL_ALPHABET
            .chars()
            .nth(id.0 as usize)
            .map_or_else(|| format!("N{}", id.0), String::from)
    }

    /// The states supported by this node, in ascending order.
    pub fn states(&self) -> impl Iterator<Item = u8> {
        0..self.num_states
    }
}

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors raised inside a node function, independent of any network.
///
/// The transition-table engine wraps these in [`NetError::NodeEval`] to
/// attach the offending node id and input state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FuncError {
    /// A single-input function (NOT, COPY, generated truth tables) received
    /// an input sequence outside its documented tolerance.
    #[error("arity violation: function tolerates at most {max} inputs, got {got}")]
    Arity { max: usize, got: usize },

    /// A function requiring at least one input (MIN) was invoked with zero
    /// predecessors.
    #[error("empty domain: function requires at least one input")]
    EmptyDomain,
}

/// Errors that can occur in the phinet core.
///
/// - No silent failures, no automatic retries
/// - All failures stem from structurally invalid configuration or data
/// - The CORE never panics; all errors are surfaced to the caller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NetError {
    /// A node function failed during table construction. Carries the
    /// offending node id and the canonical encoding of the input state.
    #[error("node {node:?} failed on input state {input:?}: {source}")]
    NodeEval {
        node: NodeId,
        input: String,
        source: FuncError,
    },

    /// Deserialization referenced a catalog name with no registered
    /// implementation.
    #[error("unknown function name: {0:?}")]
    UnknownFunction(String),

    /// Serialization was attempted on a node bound to a function absent
    /// from the catalog.
    #[error("node {node:?} is bound to a non-catalog function and cannot be serialized")]
    NonSerializableFunction { node: NodeId },

    /// A state string's length mismatches the node count, a digit is not
    /// valid hex, a digit exceeds a node's declared cardinality, or a
    /// cardinality exceeds the encodable maximum of 16.
    #[error("invalid state encoding {encoded:?}: {reason}")]
    InvalidStateEncoding { encoded: String, reason: String },

    /// A network was built from an empty edge list. The vertex set is
    /// derived from edge endpoints, so an edge-free network must be built
    /// from an explicit node count instead.
    #[error("edge list is empty; build the network from an explicit node count instead")]
    EmptyEdgeList,

    /// A label lookup failed.
    #[error("no node with label {0:?}")]
    UnknownNode(String),

    /// The JSON document is malformed or inconsistent with itself.
    #[error("document error: {0}")]
    Document(String),
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::CatalogFunc;

    #[test]
    fn default_labels_follow_alphabet() {
        assert_eq!(Node::default_label(NodeId(0)), "A");
        assert_eq!(Node::default_label(NodeId(25)), "Z");
        assert_eq!(Node::default_label(NodeId(26)), "a");
        assert_eq!(Node::default_label(NodeId(61)), "9");
        assert_eq!(Node::default_label(NodeId(62)), "N62");
    }

    #[test]
    fn node_states_cover_domain() {
        let node = Node::new(
            NodeId(0),
            "A".to_string(),
            3,
            NodeFunc::Catalog(CatalogFunc::Noop),
        );
        let states: Vec<u8> = node.states().collect();
        assert_eq!(states, vec![0, 1, 2]);
    }

    #[test]
    fn node_ids_order_deterministically() {
        let mut ids = vec![NodeId(3), NodeId(1), NodeId(2)];
        ids.sort();
        assert_eq!(ids, vec![NodeId(1), NodeId(2), NodeId(3)]);
    }

    #[test]
    fn errors_render_offending_context() {
        let err = NetError::NodeEval {
            node: NodeId(2),
            input: "010".to_string(),
            source: FuncError::Arity { max: 1, got: 3 },
        };
        let msg = err.to_string();
        assert!(msg.contains("010"));
        assert!(msg.contains("arity"));
    }
}
