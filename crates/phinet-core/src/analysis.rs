//! # Reachability & State-Graph Analyzer
//!
//! Diagnostics derived from a computed transition table: which global states
//! can ever occur as outputs, which are unreachable, and the shape of the
//! state-to-state graph (weak components, simple cycles).
//!
//! The state graph is a functional graph - every vertex has out-degree
//! exactly one - so every vertex reaches exactly one cycle after a finite
//! tail. These diagnostics surface degenerate or unreachable regions of a
//! designed network before expensive downstream Phi computation is spent on
//! states that can never occur.

use crate::state::encode_digits;
use crate::tpm::TransitionTable;
use std::collections::{BTreeMap, BTreeSet, VecDeque};

// =============================================================================
// REACHABILITY SETS
// =============================================================================

/// The set of distinct encoded output states across all rows.
#[must_use]
pub fn out_states(table: &TransitionTable) -> BTreeSet<String> {
    table.rows().map(|(_, out)| encode_digits(out)).collect()
}

/// Input states never produced as any row's output, sorted ascending.
///
/// `out_states` and `unreachable_states` partition the full enumerated
/// domain. Unreachable states are informational, not an error.
#[must_use]
pub fn unreachable_states(table: &TransitionTable) -> Vec<String> {
    let outs = out_states(table);
    table
        .rows()
        .map(|(input, _)| input)
        .filter(|input| !outs.contains(*input))
        .map(String::from)
        .collect()
}

// =============================================================================
// STATE GRAPH
// =============================================================================

/// The state-to-state transition graph: vertices are encoded global states,
/// with exactly one outgoing edge per vertex (possibly a self-loop).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateGraph {
    succ: BTreeMap<String, String>,
}

impl StateGraph {
    /// Build the state graph from a transition table.
    #[must_use]
    pub fn from_table(table: &TransitionTable) -> Self {
        let succ = table
            .rows()
            .map(|(input, out)| (input.to_string(), encode_digits(out)))
            .collect();
        Self { succ }
    }

    /// Number of vertices.
    #[must_use]
    pub fn len(&self) -> usize {
        self.succ.len()
    }

    /// True if the graph has no vertices.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.succ.is_empty()
    }

    /// The unique successor of a state.
    #[must_use]
    pub fn successor(&self, state: &str) -> Option<&str> {
        self.succ.get(state).map(String::as_str)
    }

    /// All edges in ascending source order.
    pub fn edges(&self) -> impl Iterator<Item = (&str, &str)> {
        self.succ.iter().map(|(a, b)| (a.as_str(), b.as_str()))
    }

    /// Weakly connected components: membership grouped as if edges were
    /// undirected, each component sorted, components ordered by their
    /// smallest member.
    #[must_use]
    pub fn weakly_connected_components(&self) -> Vec<BTreeSet<String>> {
        // Undirected adjacency
        let mut adj: BTreeMap<&str, BTreeSet<&str>> = BTreeMap::new();
        for (a, b) in self.edges() {
            adj.entry(a).or_default().insert(b);
            adj.entry(b).or_default().insert(a);
        }

        let mut components = Vec::new();
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        for start in self.succ.keys() {
            if visited.contains(start.as_str()) {
                continue;
            }
            let mut component = BTreeSet::new();
            let mut queue = VecDeque::new();
            queue.push_back(start.as_str());
            visited.insert(start.as_str());
            while let Some(current) = queue.pop_front() {
                component.insert(current.to_string());
                if let Some(neighbors) = adj.get(current) {
                    for &next in neighbors {
                        if visited.insert(next) {
                            queue.push_back(next);
                        }
                    }
                }
            }
            components.push(component);
        }
        components
    }

    /// Number of weakly connected components.
    #[must_use]
    pub fn component_count(&self) -> usize {
        self.weakly_connected_components().len()
    }

    /// All simple directed cycles.
    ///
    /// Because out-degree is exactly one, the graph is a "rho" structure:
    /// following successors from any vertex reaches exactly one cycle.
    /// Each cycle is rotated so its smallest member comes first; cycles are
    /// ordered by that member. Non-empty for every non-empty table.
    #[must_use]
    pub fn simple_cycles(&self) -> Vec<Vec<String>> {
        let mut cycles = Vec::new();
        let mut done: BTreeSet<String> = BTreeSet::new();

        for start in self.succ.keys() {
            if done.contains(start) {
                continue;
            }
            // Walk the unique successor chain until we hit either a vertex
            // from a previous walk (its cycle is already recorded) or a
            // vertex from this walk (a new cycle).
            let mut path: Vec<String> = Vec::new();
            let mut path_index: BTreeMap<String, usize> = BTreeMap::new();
            let mut current = start.clone();
            loop {
                if done.contains(&current) {
                    break;
                }
                if let Some(&i) = path_index.get(&current) {
                    let mut cycle: Vec<String> = path[i..].to_vec();
                    rotate_to_min(&mut cycle);
                    cycles.push(cycle);
                    break;
                }
                path_index.insert(current.clone(), path.len());
                path.push(current.clone());
                match self.succ.get(&current) {
                    Some(next) => current = next.clone(),
                    // Unreachable for tables over the full domain; treat a
                    // missing successor as a terminal self-loop.
                    None => break,
                }
            }
            done.extend(path);
        }

        cycles.sort();
        cycles
    }
}

/// Rotate a cycle so its smallest member is first, keeping edge order.
fn rotate_to_min(cycle: &mut [String]) {
    if let Some(min_pos) = cycle
        .iter()
        .enumerate()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(i, _)| i)
    {
        cycle.rotate_left(min_pos);
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::funcs::{CatalogFunc, NodeFunc};
    use crate::net::Net;
    use crate::tpm::compute_table;

    fn copy_ring_table() -> TransitionTable {
        let net = Net::from_edges_with(
            &[(0, 1), (1, 2), (2, 0)],
            2,
            NodeFunc::Catalog(CatalogFunc::Copy),
        )
        .expect("net");
        compute_table(&net).expect("table")
    }

    fn funnel_table() -> TransitionTable {
        // A and B quiesce to 0, C ORs them: only 000 and 001 ever occur
        let mut net = Net::from_edges(&[(0, 2), (1, 2)]).expect("net");
        net.set_func_named("A", "NOOP").expect("bind");
        net.set_func_named("B", "NOOP").expect("bind");
        net.set_func_named("C", "OR").expect("bind");
        compute_table(&net).expect("table")
    }

    #[test]
    fn rotation_is_bijective_so_everything_is_reachable() {
        let table = copy_ring_table();
        assert_eq!(out_states(&table).len(), 8);
        assert!(unreachable_states(&table).is_empty());
    }

    #[test]
    fn funnel_leaves_most_states_unreachable() {
        let table = funnel_table();
        let outs = out_states(&table);
        assert_eq!(
            outs,
            ["000", "001"].iter().map(|s| s.to_string()).collect()
        );
        let unreachable = unreachable_states(&table);
        assert_eq!(unreachable.len(), 6);
        // Sorted ascending
        let mut sorted = unreachable.clone();
        sorted.sort();
        assert_eq!(unreachable, sorted);
    }

    #[test]
    fn reachability_sets_partition_the_domain() {
        for table in [copy_ring_table(), funnel_table()] {
            let ins: BTreeSet<String> = table.in_states().into_iter().collect();
            let outs = out_states(&table);
            let unreachable: BTreeSet<String> =
                unreachable_states(&table).into_iter().collect();
            assert!(outs.is_disjoint(&unreachable));
            let union: BTreeSet<String> = outs.union(&unreachable).cloned().collect();
            assert_eq!(union, ins);
        }
    }

    #[test]
    fn state_graph_has_one_edge_per_vertex() {
        let table = copy_ring_table();
        let graph = StateGraph::from_table(&table);
        assert_eq!(graph.len(), 8);
        for (input, _) in table.rows() {
            assert!(graph.successor(input).is_some());
        }
    }

    #[test]
    fn copy_ring_components_and_cycles() {
        let graph = StateGraph::from_table(&copy_ring_table());
        // Two fixed points and two 3-cycles
        assert_eq!(graph.component_count(), 4);
        let cycles = graph.simple_cycles();
        assert_eq!(cycles.len(), 4);
        assert!(cycles.contains(&vec!["000".to_string()]));
        assert!(cycles.contains(&vec!["111".to_string()]));
        assert!(cycles.contains(&vec![
            "001".to_string(),
            "100".to_string(),
            "010".to_string(),
        ]));
    }

    #[test]
    fn every_vertex_reaches_a_cycle() {
        let graph = StateGraph::from_table(&funnel_table());
        let cycles = graph.simple_cycles();
        assert!(!cycles.is_empty());
        let cycle_members: BTreeSet<&str> = cycles
            .iter()
            .flat_map(|c| c.iter().map(String::as_str))
            .collect();
        for (vertex, _) in graph.edges() {
            let mut current = vertex;
            for _ in 0..graph.len() {
                if let Some(next) = graph.successor(current) {
                    current = next;
                }
            }
            assert!(cycle_members.contains(current));
        }
    }

    #[test]
    fn funnel_collapses_to_single_component() {
        let graph = StateGraph::from_table(&funnel_table());
        // 001 -> 000 -> 000; every other state feeds one of those two
        assert_eq!(graph.component_count(), 1);
        assert_eq!(graph.simple_cycles(), vec![vec!["000".to_string()]]);
    }
}
