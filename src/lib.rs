//! A minimal deterministic acyclic word graph (MDAG): a string dictionary
//! that shares both common prefixes and common suffixes among the strings
//! it stores, built incrementally with confluence-aware minimization.
//!
//! ```
//! use mdag::Mdag;
//!
//! let mut dict = Mdag::new();
//! dict.add("cats").unwrap();
//! dict.add("dogs").unwrap();
//! assert!(dict.contains("cats"));
//! assert!(!dict.contains("cat"));
//!
//! dict.freeze();
//! assert!(dict.is_frozen());
//! assert!(dict.contains("dogs"));
//! ```
//!
//! Strings are stored as sequences of UTF-16 code units internally, with
//! no Unicode normalization performed. Once [`Mdag::freeze`]
//! is called the graph is compacted into a bit-packed immutable array form
//! and can no longer be mutated; [`Mdag::is_frozen`] and the `Result`-typed
//! mutators reflect that.

mod alphabet;
mod arena;
mod builder;
mod frozen;
mod register;
mod symbol;
mod traversal;

use std::collections::BTreeSet;

use log::debug;

use builder::MutableGraph;
use frozen::FrozenGraph;
use symbol::Symbol;
use traversal::Condition;

pub use symbol::Symbol as SymbolUnit;

/// Errors returned by [`Mdag`]'s mutating operations.
///
/// Internal-consistency violations (a transition pointing at a node whose
/// bookkeeping disagrees with the graph's own invariants) are programmer
/// bugs, not recoverable conditions, and `panic!` rather than appearing
/// here -- see DESIGN.md's error handling notes.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("mutation attempted after the graph was frozen")]
    AlreadyFrozen,
}

/// Wraps a producer-side error encountered while draining a fallible
/// iterator of candidate strings, alongside this crate's own
/// [`Error::AlreadyFrozen`].
#[derive(thiserror::Error, Debug)]
pub enum TryAddError<E: std::error::Error + 'static> {
    #[error(transparent)]
    Graph(#[from] Error),
    #[error(transparent)]
    Iterator(E),
}

enum Representation {
    Mutable(MutableGraph),
    Frozen(FrozenGraph),
}

/// A minimal deterministic acyclic word graph over `&str`/`String`.
///
/// Mutating operations are only valid while the graph is in its mutable
/// representation; calling them after [`Mdag::freeze`] returns
/// [`Error::AlreadyFrozen`]. Lookup and enumeration work identically in
/// either representation.
pub struct Mdag {
    repr: Representation,
}

impl Default for Mdag {
    fn default() -> Self {
        Self::new()
    }
}

impl Mdag {
    pub fn new() -> Self {
        Self {
            repr: Representation::Mutable(MutableGraph::new()),
        }
    }

    pub fn is_frozen(&self) -> bool {
        matches!(self.repr, Representation::Frozen(_))
    }

    /// Builds a graph from a fallible iterable of strings, propagating the
    /// first producer-side error unchanged. The graph's invariants hold up
    /// to and including the last successfully drained string -- this is
    /// the "construct-from-iterable" operation; see [`Mdag::try_add_all`]
    /// for the equivalent over an already-constructed graph.
    pub fn try_from_iter<I, S, E>(iter: I) -> Result<Self, TryAddError<E>>
    where
        I: IntoIterator<Item = Result<S, E>>,
        S: AsRef<str>,
        E: std::error::Error + 'static,
    {
        let mut graph = Self::new();
        graph.try_add_all(iter)?;
        Ok(graph)
    }

    /// Number of distinct accepted strings.
    pub fn size(&self) -> usize {
        match &self.repr {
            Representation::Mutable(g) => g.size(),
            Representation::Frozen(f) => traversal::enumerate(f, Condition::Any).len(),
        }
    }

    fn mutable_mut(&mut self) -> Result<&mut MutableGraph, Error> {
        match &mut self.repr {
            Representation::Mutable(g) => Ok(g),
            Representation::Frozen(_) => Err(Error::AlreadyFrozen),
        }
    }

    pub fn add(&mut self, s: &str) -> Result<bool, Error> {
        let symbols = symbol::to_symbols(s);
        Ok(self.mutable_mut()?.add(&symbols))
    }

    pub fn remove(&mut self, s: &str) -> Result<bool, Error> {
        let symbols = symbol::to_symbols(s);
        Ok(self.mutable_mut()?.remove(&symbols))
    }

    /// Inserts every string the iterator yields. Returns `true` iff the
    /// accepted-string set changed as a result of at least one insertion.
    pub fn add_all<I, S>(&mut self, iter: I) -> Result<bool, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let graph = self.mutable_mut()?;
        let mut changed = false;
        for s in iter {
            changed |= graph.add(&symbol::to_symbols(s.as_ref()));
        }
        Ok(changed)
    }

    /// Inserts every `Ok` string the iterator yields, stopping at (and
    /// propagating) the first `Err`. The graph's invariants hold up to and
    /// including the last successfully inserted string -- this does not
    /// roll back on failure.
    pub fn try_add_all<I, S, E>(&mut self, iter: I) -> Result<bool, TryAddError<E>>
    where
        I: IntoIterator<Item = Result<S, E>>,
        S: AsRef<str>,
        E: std::error::Error + 'static,
    {
        let graph = self.mutable_mut().map_err(TryAddError::Graph)?;
        let mut changed = false;
        for item in iter {
            let s = item.map_err(TryAddError::Iterator)?;
            changed |= graph.add(&symbol::to_symbols(s.as_ref()));
        }
        Ok(changed)
    }

    pub fn contains(&self, s: &str) -> bool {
        let symbols = symbol::to_symbols(s);
        match &self.repr {
            Representation::Mutable(g) => g.contains(&symbols),
            Representation::Frozen(f) => frozen_contains(f, &symbols),
        }
    }

    pub fn get_all_strings(&self) -> BTreeSet<String> {
        self.query(Condition::Any)
    }

    pub fn strings_starting_with(&self, prefix: &str) -> BTreeSet<String> {
        let symbols = symbol::to_symbols(prefix);
        self.query(Condition::Prefix(&symbols))
    }

    pub fn strings_ending_with(&self, suffix: &str) -> BTreeSet<String> {
        let symbols = symbol::to_symbols(suffix);
        self.query(Condition::Suffix(&symbols))
    }

    pub fn strings_containing(&self, needle: &str) -> BTreeSet<String> {
        let symbols = symbol::to_symbols(needle);
        self.query(Condition::Substring(&symbols))
    }

    fn query(&self, condition: Condition<'_>) -> BTreeSet<String> {
        let symbol_results = match &self.repr {
            Representation::Mutable(g) => traversal::enumerate(g, condition),
            Representation::Frozen(f) => traversal::enumerate(f, condition),
        };
        symbol_results.iter().map(|s| symbol::to_string(s)).collect()
    }

    /// Number of transitions reachable from the source. Only meaningful
    /// over the mutable representation; `None` once frozen.
    pub fn transition_count(&self) -> Option<usize> {
        match &self.repr {
            Representation::Mutable(g) => Some(g.transition_count()),
            Representation::Frozen(_) => None,
        }
    }

    /// Number of nodes reachable from the source. Only meaningful over the
    /// mutable representation; `None` once frozen.
    pub fn node_count(&self) -> Option<usize> {
        match &self.repr {
            Representation::Mutable(g) => Some(g.node_count()),
            Representation::Frozen(_) => None,
        }
    }

    /// Number of distinct equivalence classes currently registered. Only
    /// meaningful over the mutable representation; `None` once frozen.
    pub fn equivalence_class_count(&self) -> Option<usize> {
        match &self.repr {
            Representation::Mutable(g) => Some(g.equivalence_class_count()),
            Representation::Frozen(_) => None,
        }
    }

    /// The set of symbols (raw UTF-16 code units) that label at least one
    /// transition. Only meaningful over the mutable representation; `None`
    /// once frozen.
    pub fn transition_label_set(&self) -> Option<BTreeSet<Symbol>> {
        match &self.repr {
            Representation::Mutable(g) => Some(g.transition_label_set().into_iter().collect()),
            Representation::Frozen(_) => None,
        }
    }

    /// Compacts the graph into its bit-packed immutable form. Idempotent:
    /// calling this on an already-frozen graph is a no-op.
    pub fn freeze(&mut self) {
        if let Representation::Mutable(g) = &self.repr {
            debug!("freeze: compacting {} accepted strings", g.size());
            let frozen = frozen::freeze(g);
            self.repr = Representation::Frozen(frozen);
        }
    }
}

fn frozen_contains(f: &FrozenGraph, symbols: &[Symbol]) -> bool {
    let mut cur = f.source();
    for &sym in symbols {
        match f.transition(cur, sym) {
            Some(next) => cur = next,
            None => return false,
        }
    }
    f.is_accept(cur)
}

impl FromIterator<String> for Mdag {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        let mut graph = MutableGraph::new();
        for s in iter {
            graph.add(&symbol::to_symbols(&s));
        }
        Mdag {
            repr: Representation::Mutable(graph),
        }
    }
}
