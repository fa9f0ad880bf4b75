//! # Transition Table Engine
//!
//! Full enumeration of the joint state space and construction of the exact
//! global state-transition table (the TPM).
//!
//! For every global input state, and for every node, the engine gathers the
//! states of that node's direct predecessors (ascending-id order, a stable
//! documented contract) and invokes the node's function; the returned value
//! becomes that node's next state in the row.
//!
//! Rows are independent of each other, so they are computed in parallel and
//! merged keyed by canonical input encoding. The merged table is identical
//! regardless of worker count; on failure, the error for the earliest input
//! in enumeration order is the one reported.

use crate::net::Net;
use crate::state::{encode_digits, enumerate_states, sort_literature};
use crate::types::{NetError, NodeId};
use rayon::prelude::*;
use std::collections::BTreeMap;
use tracing::debug;

// =============================================================================
// TRANSITION TABLE
// =============================================================================

/// The complete deterministic mapping from every global state to its
/// successor, in state-by-node form: one row per input state, one next-state
/// column per node.
///
/// Rows are keyed by canonical input encoding in a `BTreeMap`, so two tables
/// computed from identical networks compare equal and iterate identically.
/// The state-by-state form is derived on demand by re-encoding each row's
/// output vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTable {
    node_ids: Vec<NodeId>,
    labels: Vec<String>,
    cards: Vec<u8>,
    rows: BTreeMap<String, Vec<u8>>,
}

impl TransitionTable {
    pub(crate) fn from_parts(
        node_ids: Vec<NodeId>,
        labels: Vec<String>,
        cards: Vec<u8>,
        rows: BTreeMap<String, Vec<u8>>,
    ) -> Self {
        Self {
            node_ids,
            labels,
            cards,
            rows,
        }
    }

    /// Node ids in ascending (column) order.
    #[must_use]
    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    /// Node labels in column order.
    #[must_use]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Per-node state cardinalities in column order.
    #[must_use]
    pub fn cardinalities(&self) -> &[u8] {
        &self.cards
    }

    /// Number of rows (= product of all node cardinalities).
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// True if `input` is a row of this table.
    #[must_use]
    pub fn contains_input(&self, input: &str) -> bool {
        self.rows.contains_key(input)
    }

    /// All rows as (input encoding, output vector), ascending encoding order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.rows.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// The output vector (per-node next states) for an input state.
    #[must_use]
    pub fn output_vector(&self, input: &str) -> Option<&[u8]> {
        self.rows.get(input).map(Vec::as_slice)
    }

    /// The encoded output state for an input state.
    pub fn output_encoded(&self, input: &str) -> Result<String, NetError> {
        self.rows
            .get(input)
            .map(|out| encode_digits(out))
            .ok_or_else(|| NetError::InvalidStateEncoding {
                encoded: input.to_string(),
                reason: "not a row of the transition table".to_string(),
            })
    }

    /// All input encodings in ascending order.
    #[must_use]
    pub fn in_states(&self) -> Vec<String> {
        self.rows.keys().cloned().collect()
    }

    /// All input encodings in the literature-compatible reversed-suffix
    /// order used for presentation and for external Phi engines.
    #[must_use]
    pub fn in_states_literature(&self) -> Vec<String> {
        let mut states = self.in_states();
        sort_literature(&mut states);
        states
    }

    /// State-by-node rows in literature order.
    #[must_use]
    pub fn state_by_node_rows(&self) -> Vec<(String, Vec<u8>)> {
        self.in_states_literature()
            .into_iter()
            .filter_map(|s| self.rows.get(&s).map(|out| (s, out.clone())))
            .collect()
    }

    /// State-by-state edge list (input encoding -> output encoding) in
    /// literature order. Exactly one edge per input state.
    #[must_use]
    pub fn state_by_state(&self) -> Vec<(String, String)> {
        self.in_states_literature()
            .into_iter()
            .filter_map(|s| {
                self.rows
                    .get(&s)
                    .map(|out| (s.clone(), encode_digits(out)))
            })
            .collect()
    }

    /// Dense state-by-node matrix: rows in literature order, one column per
    /// node. This is the TPM form external Phi engines consume.
    #[must_use]
    pub fn dense_matrix(&self) -> Vec<Vec<u8>> {
        self.in_states_literature()
            .into_iter()
            .filter_map(|s| self.rows.get(&s).cloned())
            .collect()
    }
}

// =============================================================================
// TABLE CONSTRUCTION
// =============================================================================

/// Compute the complete transition table for a fully configured network.
///
/// Enumerates the Cartesian product of every node's state range exactly once
/// (`prod(num_states)` rows, the dominant cost) and evaluates every node per
/// row. Arity violations and out-of-range function outputs fail the whole
/// construction, identifying the offending node and input state.
pub fn compute_table(net: &Net) -> Result<TransitionTable, NetError> {
    let nodes: Vec<_> = net.nodes().collect();
    let node_ids: Vec<NodeId> = nodes.iter().map(|n| n.id).collect();
    let labels: Vec<String> = nodes.iter().map(|n| n.label.clone()).collect();
    let cards: Vec<u8> = nodes.iter().map(|n| n.num_states).collect();

    let positions = net.positions();
    // Per-node predecessor tuple positions, ascending predecessor id.
    let pred_positions: Vec<Vec<usize>> = nodes
        .iter()
        .map(|n| {
            net.predecessors(n.id)
                .iter()
                .filter_map(|id| positions.get(id).copied())
                .collect()
        })
        .collect();

    let inputs = enumerate_states(&cards);
    debug!(
        rows = inputs.len(),
        nodes = nodes.len(),
        "computing transition table"
    );

    // Row-parallel evaluation; each row depends only on the read-only net.
    let computed: Vec<Result<(String, Vec<u8>), NetError>> = inputs
        .par_iter()
        .map(|input| {
            let encoded = encode_digits(input);
            let mut output = Vec::with_capacity(nodes.len());
            for (i, node) in nodes.iter().enumerate() {
                let args: Vec<u8> = pred_positions[i].iter().map(|&p| input[p]).collect();
                let next = node.func.apply(&args).map_err(|source| NetError::NodeEval {
                    node: node.id,
                    input: encoded.clone(),
                    source,
                })?;
                if next >= node.num_states {
                    return Err(NetError::InvalidStateEncoding {
                        encoded: encoded.clone(),
                        reason: format!(
                            "node {:?} returned state {next}, its cardinality is {}",
                            node.id, node.num_states
                        ),
                    });
                }
                output.push(next);
            }
            Ok((encoded, output))
        })
        .collect();

    // Deterministic merge: enumeration order decides which error surfaces.
    let mut rows = BTreeMap::new();
    for result in computed {
        let (encoded, output) = result?;
        rows.insert(encoded, output);
    }

    debug!(rows = rows.len(), "transition table complete");
    Ok(TransitionTable::from_parts(node_ids, labels, cards, rows))
}

// =============================================================================
// TESTS
// =============================================================================
