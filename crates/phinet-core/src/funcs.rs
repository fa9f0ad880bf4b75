//! # Node-Function Catalog
//!
//! The fixed library of node update rules, the name registry used by
//! configuration and serialization, and the exhaustive function-space
//! generator for binary nodes.
//!
//! Contract for every function:
//! - Input is the ordered sequence of predecessor states (ascending
//!   predecessor id), possibly empty.
//! - Output is one integer state; the caller is responsible for pairing a
//!   function with a node whose `num_states` covers the output range.
//! - Functions must not assume a fixed input length, except where the
//!   documented arity says otherwise (NOT, COPY, generated truth tables).
//!
//! All arithmetic is integer arithmetic. "Non-zero" is the activation test,
//! so every rule is well-defined for multi-state inputs.

use crate::types::{FuncError, NetError};
use std::collections::BTreeSet;

// =============================================================================
// CATALOG
// =============================================================================

/// A named node update rule from the fixed catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CatalogFunc {
    /// 1 iff every input is non-zero (empty input: 0).
    And,
    /// 1 iff at least one input is non-zero (empty input: 0).
    Or,
    /// Logical complement of AND (empty input: 1).
    Nand,
    /// Logical complement of OR (empty input: 1).
    Nor,
    /// 1 iff the count of non-zero inputs is odd (empty input: 0).
    Xor,
    /// Complement of the single input; arity error on more than one input.
    Not,
    /// Echo the single input; arity error on more than one input.
    Copy,
    /// 1 iff more than half of the inputs are non-zero.
    Majority,
    /// 1 iff at most half of the inputs are non-zero.
    Minority,
    /// Floor of the mean input state, capped at 15 (empty input: 0).
    MeanActivation,
    /// 1 iff the mean input state is greater than zero (empty input: 0).
    MeanActivationGtZero,
    /// 0 if the input sum is 0, 1 if it is 1, 2 otherwise.
    Tri,
    /// Sum of inputs mod 2.
    Parity,
    /// Minimum input state; empty-domain error on zero inputs.
    Min,
    /// Constant 0, ignoring all inputs.
    Noop,
}

impl CatalogFunc {
    /// Evaluate the rule on an ordered predecessor-state sequence.
    pub fn apply(self, inputs: &[u8]) -> Result<u8, FuncError> {
        let len = inputs.len();
        let active = inputs.iter().filter(|&&v| v != 0).count();
        let sum: u64 = inputs.iter().map(|&v| u64::from(v)).sum();

        match self {
            Self::And => Ok(u8::from(len > 0 && active == len)),
            Self::Or => Ok(u8::from(active > 0)),
            Self::Nand => Ok(u8::from(!(len > 0 && active == len))),
            Self::Nor => Ok(u8::from(active == 0)),
            Self::Xor => Ok(u8::from(active % 2 == 1)),
            Self::Not => match inputs {
                [] => Ok(0),
                [v] => Ok(u8::from(*v == 0)),
                _ => Err(FuncError::Arity { max: 1, got: len }),
            },
            Self::Copy => match inputs {
                [] => Ok(0),
                [v] => Ok(*v),
                _ => Err(FuncError::Arity { max: 1, got: len }),
            },
            Self::Majority => Ok(u8::from(2 * active > len)),
            Self::Minority => Ok(u8::from(2 * active <= len)),
            Self::MeanActivation => {
                if len == 0 {
                    Ok(0)
                } else {
                    Ok((sum / len as u64).min(15) as u8)
                }
            }
            Self::MeanActivationGtZero => Ok(u8::from(sum > 0)),
            Self::Tri => Ok(match sum {
                0 => 0,
                1 => 1,
                _ => 2,
            }),
            Self::Parity => Ok((sum % 2) as u8),
            Self::Min => inputs.iter().min().copied().ok_or(FuncError::EmptyDomain),
            Self::Noop => Ok(0),
        }
    }

    /// Canonical short name, as emitted by the serialization layer.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Nand => "NAND",
            Self::Nor => "NOR",
            Self::Xor => "XOR",
            Self::Not => "NOT",
            Self::Copy => "COPY",
            Self::Majority => "MJ",
            Self::Minority => "MN",
            Self::MeanActivation => "MA",
            Self::MeanActivationGtZero => "MAZ",
            Self::Tri => "TRI",
            Self::Parity => "PARITY",
            Self::Min => "MIN",
            Self::Noop => "NOOP",
        }
    }
}

// =============================================================================
// NAME REGISTRY
// =============================================================================

/// Explicit name registration table: canonical short names plus long-form
/// aliases. Populated at compile time, no runtime introspection.
const CATALOG: &[(&str, CatalogFunc)] = &[
    ("AND", CatalogFunc::And),
    ("OR", CatalogFunc::Or),
    ("NAND", CatalogFunc::Nand),
    ("NOR", CatalogFunc::Nor),
    ("XOR", CatalogFunc::Xor),
    ("NOT", CatalogFunc::Not),
    ("COPY", CatalogFunc::Copy),
    ("MJ", CatalogFunc::Majority),
    ("MAJORITY", CatalogFunc::Majority),
    ("MN", CatalogFunc::Minority),
    ("MINORITY", CatalogFunc::Minority),
    ("MA", CatalogFunc::MeanActivation),
    ("MEAN-ACTIVATION", CatalogFunc::MeanActivation),
    ("MAZ", CatalogFunc::MeanActivationGtZero),
    ("MEAN-ACTIVATION-GT-ZERO", CatalogFunc::MeanActivationGtZero),
    ("TRI", CatalogFunc::Tri),
    ("PARITY", CatalogFunc::Parity),
    ("MIN", CatalogFunc::Min),
    ("NOOP", CatalogFunc::Noop),
];

/// Look up a catalog function by name.
///
/// Names are case-normalized and a trailing `_FUNC` suffix is stripped, so
/// `"xor"`, `"XOR"` and `"xor_func"` all resolve to [`CatalogFunc::Xor`].
pub fn lookup(name: &str) -> Result<CatalogFunc, NetError> {
    let normalized = name.trim().to_ascii_uppercase();
    let normalized = normalized.strip_suffix("_FUNC").unwrap_or(&normalized);
    CATALOG
        .iter()
        .find(|(n, _)| *n == normalized)
        .map(|(_, f)| *f)
        .ok_or_else(|| NetError::UnknownFunction(name.to_string()))
}

// =============================================================================
// GENERATED TRUTH TABLES
// =============================================================================

/// A binary function of fixed arity, defined by its true set: the subset of
/// input combinations in `{0,1}^arity` that map to 1.
///
/// Unlike catalog functions, a truth table demands its exact arity; any other
/// input length is an arity violation. Truth tables are plain data, so they
/// compare, clone, and cross threads freely, but they carry no catalog name
/// and therefore cannot be serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruthTable {
    arity: usize,
    true_set: BTreeSet<Vec<u8>>,
}

impl TruthTable {
    /// Build a truth table from its true set.
    ///
    /// Non-binary digits in the true set are tolerated but unreachable:
    /// membership is tested against raw predecessor states.
    #[must_use]
    pub fn new(arity: usize, true_set: BTreeSet<Vec<u8>>) -> Self {
        Self { arity, true_set }
    }

    /// The exact number of inputs this table accepts.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// The input combinations mapping to 1.
    #[must_use]
    pub fn true_set(&self) -> &BTreeSet<Vec<u8>> {
        &self.true_set
    }

    /// Evaluate: 1 iff the exact input tuple is in the true set.
    pub fn apply(&self, inputs: &[u8]) -> Result<u8, FuncError> {
        if inputs.len() != self.arity {
            return Err(FuncError::Arity {
                max: self.arity,
                got: inputs.len(),
            });
        }
        Ok(u8::from(self.true_set.contains(inputs)))
    }
}

/// All input combinations of `{0,1}^n` in lexicographic order:
/// `(0,..,0,0), (0,..,0,1), ..., (1,..,1,1)`.
fn binary_inputs(n: usize) -> Vec<Vec<u8>> {
    (0..(1_usize << n))
        .map(|i| (0..n).map(|j| ((i >> (n - 1 - j)) & 1) as u8).collect())
        .collect()
}

/// All `k`-element index combinations of `0..n`, lexicographic.
fn index_combinations(n: usize, k: usize) -> Vec<Vec<usize>> {
    let mut out = Vec::new();
    if k > n {
        return out;
    }
    let mut combo: Vec<usize> = (0..k).collect();
    loop {
        out.push(combo.clone());
        // Advance to the next combination, rightmost position first.
        let mut i = k;
        loop {
            if i == 0 {
                return out;
            }
            i -= 1;
            if combo[i] != i + n - k {
                break;
            }
        }
        combo[i] += 1;
        for j in i + 1..k {
            combo[j] = combo[j - 1] + 1;
        }
    }
}

/// Generate the complete ordered list of all `2^(2^n)` binary functions of
/// `n` binary inputs.
///
/// Ordering is the powerset of the input-combination list: subsets enumerated
/// by increasing size, combinations in lexicographic order within each size.
/// The ordering is stable and reproducible by index; for `n = 2`, the function
/// at index 8 has true set `{(0,1), (1,0)}` and is behaviorally XOR.
///
/// The result size is doubly exponential in `n`; callers must bound `n`
/// before invoking this (in practice `n <= 4`).
#[must_use]
pub fn generate_functions(n: usize) -> Vec<TruthTable> {
    let inputs = binary_inputs(n);
    let mut funcs = Vec::new();
    for size in 0..=inputs.len() {
        for combo in index_combinations(inputs.len(), size) {
            let true_set: BTreeSet<Vec<u8>> = combo.iter().map(|&i| inputs[i].clone()).collect();
            funcs.push(TruthTable::new(n, true_set));
        }
    }
    funcs
}

// =============================================================================
// NODE FUNCTION BINDING
// =============================================================================

/// The update rule bound to a node: either a catalog reference (serializable
/// by name) or a direct truth table (generated or custom, not serializable).
///
/// The binding is resolved once at configuration time; evaluation never
/// touches the name registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeFunc {
    /// A named rule from the fixed catalog.
    Catalog(CatalogFunc),
    /// A direct truth table, e.g. from [`generate_functions`].
    Table(TruthTable),
}

impl NodeFunc {
    /// Evaluate the bound rule on an ordered predecessor-state sequence.
    pub fn apply(&self, inputs: &[u8]) -> Result<u8, FuncError> {
        match self {
            Self::Catalog(f) => f.apply(inputs),
            Self::Table(t) => t.apply(inputs),
        }
    }

    /// The catalog name of this binding, if it has one.
    #[must_use]
    pub fn catalog_name(&self) -> Option<&'static str> {
        match self {
            Self::Catalog(f) => Some(f.name()),
            Self::Table(_) => None,
        }
    }
}

impl From<CatalogFunc> for NodeFunc {
    fn from(f: CatalogFunc) -> Self {
        Self::Catalog(f)
    }
}

impl From<TruthTable> for NodeFunc {
    fn from(t: TruthTable) -> Self {
        Self::Table(t)
    }
}

// =============================================================================
// TESTS
// =============================================================================
