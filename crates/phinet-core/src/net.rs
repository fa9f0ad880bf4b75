//! # Network Model
//!
//! The directed graph of finite-state nodes plus per-node metadata.
//!
//! All data structures use `BTreeMap`/`BTreeSet` for deterministic ordering.
//! The vertex set is derived from the edge list (no isolated, function-less
//! vertices can exist), except when the network is built from an explicit
//! node count with no edges.
//!
//! The most recently computed transition table is held as a cached, derived
//! artifact; any mutation of a node's function or state count invalidates it.

use crate::funcs::{self, CatalogFunc, NodeFunc};
use crate::primitives::DEFAULT_STATES_PER_NODE;
use crate::state::{encode_state, enumerate_states, validate_cardinalities};
use crate::tpm::{self, TransitionTable};
use crate::types::{NetError, Node, NodeId};
use std::collections::{BTreeMap, BTreeSet};

// =============================================================================
// NETWORK MODEL
// =============================================================================

/// A directed network of finite-state nodes.
///
/// Node ordering for all state-tuple encodings is by ascending id; a node's
/// tuple position is its rank in that order.
#[derive(Debug, Clone)]
pub struct Net {
    /// Node storage: NodeId -> Node, ascending id.
    nodes: BTreeMap<NodeId, Node>,

    /// Successor adjacency. Duplicate edges are idempotent, self-loops allowed.
    succs: BTreeMap<NodeId, BTreeSet<NodeId>>,

    /// Predecessor adjacency, the mirror of `succs`. Kept materialized because
    /// transition computation reads predecessors for every node of every row.
    preds: BTreeMap<NodeId, BTreeSet<NodeId>>,

    /// Reverse lookup: label -> NodeId.
    label_index: BTreeMap<String, NodeId>,

    /// Optional human-readable title for the whole network.
    title: Option<String>,

    /// Cached transition table, invalidated on any node mutation.
    cached_tpm: Option<TransitionTable>,
}

impl Net {
    /// Build a network from an edge list with default configuration
    /// (2 states per node, MAZ update rule).
    pub fn from_edges(edges: &[(u64, u64)]) -> Result<Self, NetError> {
        Self::from_edges_with(
            edges,
            DEFAULT_STATES_PER_NODE,
            NodeFunc::Catalog(CatalogFunc::MeanActivationGtZero),
        )
    }

    /// Build a network from an edge list.
    ///
    /// The vertex set is the deduplicated endpoint set of `edges`; an empty
    /// edge list is rejected (use [`Net::with_node_count`] for an edge-free
    /// network). Every node starts with `states_per_node` states and the
    /// given default function.
    pub fn from_edges_with(
        edges: &[(u64, u64)],
        states_per_node: u8,
        default_func: NodeFunc,
    ) -> Result<Self, NetError> {
        if edges.is_empty() {
            return Err(NetError::EmptyEdgeList);
        }
        let ids: BTreeSet<NodeId> = edges
            .iter()
            .flat_map(|&(from, to)| [NodeId(from), NodeId(to)])
            .collect();
        let mut net = Self::with_ids(&ids, states_per_node, default_func)?;
        for &(from, to) in edges {
            net.insert_edge(NodeId(from), NodeId(to));
        }
        Ok(net)
    }

    /// Build an edge-free network of `count` nodes with ids `0..count`.
    pub fn with_node_count(
        count: u64,
        states_per_node: u8,
        default_func: NodeFunc,
    ) -> Result<Self, NetError> {
        let ids: BTreeSet<NodeId> = (0..count).map(NodeId).collect();
        Self::with_ids(&ids, states_per_node, default_func)
    }

    fn with_ids(
        ids: &BTreeSet<NodeId>,
        states_per_node: u8,
        default_func: NodeFunc,
    ) -> Result<Self, NetError> {
        validate_cardinalities(&[states_per_node])?;
        let mut nodes = BTreeMap::new();
        let mut succs = BTreeMap::new();
        let mut preds = BTreeMap::new();
        let mut label_index = BTreeMap::new();
        for &id in ids {
            let label = Node::default_label(id);
            nodes.insert(
                id,
                Node::new(id, label.clone(), states_per_node, default_func.clone()),
            );
            succs.insert(id, BTreeSet::new());
            preds.insert(id, BTreeSet::new());
            label_index.insert(label, id);
        }
        Ok(Self {
            nodes,
            succs,
            preds,
            label_index,
            title: None,
            cached_tpm: None,
        })
    }

    /// Assemble a network from fully specified nodes and an edge list, as
    /// when reconstructing from a serialized document.
    ///
    /// Unlike [`Net::from_edges`], nodes arrive with explicit ids, labels,
    /// cardinalities and functions; the edge list may be empty. Every edge
    /// endpoint must name a supplied node, and ids and labels must be unique.
    pub fn assemble(nodes: Vec<Node>, edges: &[(NodeId, NodeId)]) -> Result<Self, NetError> {
        let cards: Vec<u8> = nodes.iter().map(|n| n.num_states).collect();
        validate_cardinalities(&cards)?;

        let mut net = Self {
            nodes: BTreeMap::new(),
            succs: BTreeMap::new(),
            preds: BTreeMap::new(),
            label_index: BTreeMap::new(),
            title: None,
            cached_tpm: None,
        };
        for node in nodes {
            if net.nodes.contains_key(&node.id) {
                return Err(NetError::Document(format!("duplicate node id {:?}", node.id)));
            }
            if net.label_index.contains_key(&node.label) {
                return Err(NetError::Document(format!(
                    "duplicate node label {:?}",
                    node.label
                )));
            }
            net.succs.insert(node.id, BTreeSet::new());
            net.preds.insert(node.id, BTreeSet::new());
            net.label_index.insert(node.label.clone(), node.id);
            net.nodes.insert(node.id, node);
        }
        for &(from, to) in edges {
            if !net.nodes.contains_key(&from) || !net.nodes.contains_key(&to) {
                return Err(NetError::Document(format!(
                    "edge ({}, {}) references an unknown node",
                    from.0, to.0
                )));
            }
            net.insert_edge(from, to);
        }
        Ok(net)
    }

    fn insert_edge(&mut self, from: NodeId, to: NodeId) {
        self.succs.entry(from).or_default().insert(to);
        self.preds.entry(to).or_default().insert(from);
    }

    // =========================================================================
    // STRUCTURAL QUERIES
    // =========================================================================

    /// All nodes in ascending-id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// All node ids in ascending order.
    #[must_use]
    pub fn node_ids(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    /// All node labels in ascending-id order.
    #[must_use]
    pub fn node_labels(&self) -> Vec<String> {
        self.nodes.values().map(|n| n.label.clone()).collect()
    }

    /// Per-node state cardinalities in ascending-id order.
    #[must_use]
    pub fn cardinalities(&self) -> Vec<u8> {
        self.nodes.values().map(|n| n.num_states).collect()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the network has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Optional network title.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set or clear the network title. Purely descriptive; does not
    /// invalidate the cached table.
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
    }

    /// Look up a node by label.
    pub fn node(&self, label: &str) -> Result<&Node, NetError> {
        self.label_index
            .get(label)
            .and_then(|id| self.nodes.get(id))
            .ok_or_else(|| NetError::UnknownNode(label.to_string()))
    }

    /// Look up a node by id.
    #[must_use]
    pub fn node_by_id(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Direct predecessors of a node, ascending id.
    ///
    /// This ordering is the documented argument-order contract for node
    /// functions: predecessor states are always passed sorted by id, never
    /// in insertion order.
    #[must_use]
    pub fn predecessors(&self, id: NodeId) -> Vec<NodeId> {
        self.preds
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Direct successors of a node, ascending id.
    #[must_use]
    pub fn successors(&self, id: NodeId) -> Vec<NodeId> {
        self.succs
            .get(&id)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// All edges in deterministic (ascending from, then to) order.
    #[must_use]
    pub fn edges(&self) -> Vec<(NodeId, NodeId)> {
        self.succs
            .iter()
            .flat_map(|(&from, targets)| targets.iter().map(move |&to| (from, to)))
            .collect()
    }

    /// Connectivity adjacency matrix: row = from, column = to, both axes in
    /// ascending-id order. This is the `cm` consumed by external Phi engines.
    #[must_use]
    pub fn connectivity_matrix(&self) -> Vec<Vec<u8>> {
        let ids = self.node_ids();
        ids.iter()
            .map(|from| {
                ids.iter()
                    .map(|to| {
                        u8::from(
                            self.succs
                                .get(from)
                                .is_some_and(|targets| targets.contains(to)),
                        )
                    })
                    .collect()
            })
            .collect()
    }

    /// Tuple position of each node: rank in ascending-id order.
    pub(crate) fn positions(&self) -> BTreeMap<NodeId, usize> {
        self.nodes
            .keys()
            .enumerate()
            .map(|(pos, &id)| (id, pos))
            .collect()
    }

    // =========================================================================
    // CONFIGURATION
    // =========================================================================

    /// Rebind a node's update function. Invalidates the cached table.
    pub fn set_func(&mut self, label: &str, func: NodeFunc) -> Result<(), NetError> {
        let id = self.lookup_label(label)?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.func = func;
        }
        self.cached_tpm = None;
        Ok(())
    }

    /// Rebind a node's update function by catalog name. Invalidates the
    /// cached table.
    pub fn set_func_named(&mut self, label: &str, name: &str) -> Result<(), NetError> {
        let func = funcs::lookup(name)?;
        self.set_func(label, NodeFunc::Catalog(func))
    }

    /// Change a node's state cardinality. Invalidates the cached table.
    pub fn set_num_states(&mut self, label: &str, num_states: u8) -> Result<(), NetError> {
        validate_cardinalities(&[num_states])?;
        let id = self.lookup_label(label)?;
        if let Some(node) = self.nodes.get_mut(&id) {
            node.num_states = num_states;
        }
        self.cached_tpm = None;
        Ok(())
    }

    fn lookup_label(&self, label: &str) -> Result<NodeId, NetError> {
        self.label_index
            .get(label)
            .copied()
            .ok_or_else(|| NetError::UnknownNode(label.to_string()))
    }

    // =========================================================================
    // DERIVED ARTIFACTS
    // =========================================================================

    /// The transition table, computed on first access and cached until the
    /// next mutation.
    pub fn tpm(&mut self) -> Result<&TransitionTable, NetError> {
        let table = match self.cached_tpm.take() {
            Some(table) => table,
            None => tpm::compute_table(self)?,
        };
        Ok(self.cached_tpm.insert(table))
    }

    /// Compute a fresh transition table without touching the cache.
    pub fn compute_tpm(&self) -> Result<TransitionTable, NetError> {
        tpm::compute_table(self)
    }

    /// Truth-table histogram of one node's function over every combination
    /// of its predecessors' states: output state -> occurrence count.
    ///
    /// Callers derive per-node output distributions from these integer
    /// counts (total = product of predecessor cardinalities).
    pub fn node_state_counts(&self, label: &str) -> Result<BTreeMap<u8, u64>, NetError> {
        let node = self.node(label)?.clone();
        let pred_cards: Vec<u8> = self
            .predecessors(node.id)
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .map(|n| n.num_states)
            .collect();
        let mut counts = BTreeMap::new();
        for combo in enumerate_states(&pred_cards) {
            let output = node
                .func
                .apply(&combo)
                .map_err(|source| NetError::NodeEval {
                    node: node.id,
                    input: encode_state(&combo, &pred_cards).unwrap_or_default(),
                    source,
                })?;
            *counts.entry(output).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vertex_set_is_derived_from_edges() {
        let net = Net::from_edges(&[(0, 1), (1, 2), (2, 0)]).expect("net");
        assert_eq!(net.len(), 3);
        assert_eq!(
            net.node_ids(),
            vec![NodeId(0), NodeId(1), NodeId(2)]
        );
        assert_eq!(net.node_labels(), vec!["A", "B", "C"]);
    }

    #[test]
    fn empty_edge_list_is_rejected() {
        assert!(matches!(Net::from_edges(&[]), Err(NetError::EmptyEdgeList)));
    }

    #[test]
    fn node_count_construction_has_no_edges() {
        let net = Net::with_node_count(3, 2, NodeFunc::Catalog(CatalogFunc::Noop)).expect("net");
        assert_eq!(net.len(), 3);
        assert!(net.edges().is_empty());
        assert!(net.predecessors(NodeId(1)).is_empty());
    }

    #[test]
    fn duplicate_edges_are_idempotent() {
        let net = Net::from_edges(&[(0, 1), (0, 1), (0, 1)]).expect("net");
        assert_eq!(net.edges(), vec![(NodeId(0), NodeId(1))]);
    }

    #[test]
    fn self_loops_are_permitted() {
        let net = Net::from_edges(&[(0, 0), (0, 1)]).expect("net");
        assert_eq!(net.predecessors(NodeId(0)), vec![NodeId(0)]);
        assert_eq!(net.successors(NodeId(0)), vec![NodeId(0), NodeId(1)]);
    }

    #[test]
    fn predecessors_sorted_ascending() {
        // Insertion order deliberately scrambled
        let net = Net::from_edges(&[(2, 0), (1, 0), (3, 0)]).expect("net");
        assert_eq!(
            net.predecessors(NodeId(0)),
            vec![NodeId(1), NodeId(2), NodeId(3)]
        );
    }

    #[test]
    fn sparse_ids_rank_by_ascending_order() {
        let net = Net::from_edges(&[(0, 2)]).expect("net");
        assert_eq!(net.node_ids(), vec![NodeId(0), NodeId(2)]);
        let positions = net.positions();
        assert_eq!(positions.get(&NodeId(2)), Some(&1));
    }

    #[test]
    fn connectivity_matrix_rows_are_sources() {
        let net = Net::from_edges(&[(0, 1), (1, 2), (2, 0)]).expect("net");
        assert_eq!(
            net.connectivity_matrix(),
            vec![vec![0, 1, 0], vec![0, 0, 1], vec![1, 0, 0]]
        );
    }

    #[test]
    fn unknown_label_is_an_error() {
        let mut net = Net::from_edges(&[(0, 1)]).expect("net");
        assert!(matches!(net.node("Z"), Err(NetError::UnknownNode(_))));
        assert!(net.set_func_named("Z", "XOR").is_err());
    }

    #[test]
    fn set_func_named_uses_catalog_lookup() {
        let mut net = Net::from_edges(&[(0, 1)]).expect("net");
        net.set_func_named("B", "xor_func").expect("bind");
        assert_eq!(
            net.node("B").expect("node").func,
            NodeFunc::Catalog(CatalogFunc::Xor)
        );
        assert!(matches!(
            net.set_func_named("B", "NO_SUCH"),
            Err(NetError::UnknownFunction(_))
        ));
    }

    #[test]
    fn num_states_bounds_enforced() {
        let mut net = Net::from_edges(&[(0, 1)]).expect("net");
        assert!(net.set_num_states("A", 16).is_ok());
        assert!(net.set_num_states("A", 0).is_err());
        assert!(net.set_num_states("A", 17).is_err());
    }

    #[test]
    fn mutation_invalidates_cached_table() {
        let mut net = Net::from_edges(&[(0, 1), (1, 0)]).expect("net");
        net.set_func_named("A", "COPY").expect("bind");
        net.set_func_named("B", "COPY").expect("bind");
        let before = net.tpm().expect("tpm").clone();

        net.set_func_named("B", "NOT").expect("rebind");
        let after = net.tpm().expect("tpm").clone();
        assert_ne!(before, after);
    }

    #[test]
    fn title_is_optional_and_mutable() {
        let mut net = Net::from_edges(&[(0, 1)]).expect("net");
        assert_eq!(net.title(), None);
        net.set_title(Some("two-node chain".to_string()));
        assert_eq!(net.title(), Some("two-node chain"));
        net.set_title(None);
        assert_eq!(net.title(), None);
    }

    #[test]
    fn node_state_counts_histogram() {
        // C has two binary predecessors bound to XOR: 2 of 4 inputs are odd
        let mut net = Net::from_edges(&[(0, 2), (1, 2)]).expect("net");
        net.set_func_named("C", "XOR").expect("bind");
        let counts = net.node_state_counts("C").expect("counts");
        assert_eq!(counts.get(&0), Some(&2));
        assert_eq!(counts.get(&1), Some(&2));
    }
}
