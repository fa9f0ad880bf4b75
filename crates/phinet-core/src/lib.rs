//! # phinet-core
//!
//! The deterministic dynamical-network engine for phinet - THE LOGIC.
//!
//! This crate models discrete dynamical networks: directed graphs of
//! finite-state nodes, each updated by a deterministic function of its
//! direct predecessors' states. From a configured network it constructs the
//! exact global state-transition table (TPM) by enumerating the entire joint
//! state space, then derives reachability and structural properties of the
//! resulting state graph.
//!
//! ## Architectural Constraints
//!
//! The CORE:
//! - Enumerates exactly: the table is total, one row per joint state
//! - Is deterministic: `BTreeMap` ordering everywhere, integer arithmetic
//!   only, identical inputs produce byte-identical tables
//! - Is pure: no I/O, no async, no network dependencies; the only persisted
//!   artifact is one JSON document
//! - Never computes Phi: the integrated-information engine is an external
//!   consumer behind the `PhiEngine` trait

// =============================================================================
// MODULES
// =============================================================================

pub mod analysis;
pub mod document;
pub mod funcs;
pub mod net;
pub mod phi;
pub mod primitives;
pub mod state;
pub mod tpm;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{FuncError, NetError, Node, NodeId};

// =============================================================================
// RE-EXPORTS: Catalog & Network Model
// =============================================================================

pub use funcs::{generate_functions, lookup, CatalogFunc, NodeFunc, TruthTable};
pub use net::Net;

// =============================================================================
// RE-EXPORTS: Transition Table & Analysis
// =============================================================================

pub use analysis::{out_states, unreachable_states, StateGraph};
pub use state::{decode_state, encode_state, enumerate_states, literature_cmp};
pub use tpm::{compute_table, TransitionTable};

// =============================================================================
// RE-EXPORTS: Serialization & Phi Boundary
// =============================================================================

pub use document::{from_document, from_json, to_document, to_json, NetDocument, NodeRecord};
pub use phi::{PhiEngine, PhiInput};
