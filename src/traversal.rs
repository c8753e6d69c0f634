//! Traversal and enumeration, generic over either graph representation via
//! [`GraphView`] -- a sum-type alternative would force every query to match
//! on mutable-vs-frozen first; a trait over a shared `Node` handle lets the
//! DFS be written once.

use std::collections::BTreeSet;

use crate::arena::NodeId;
use crate::builder::MutableGraph;
use crate::frozen::FrozenGraph;
use crate::symbol::Symbol;

pub(crate) trait GraphView {
    type Node: Copy + Eq;

    fn source(&self) -> Self::Node;
    fn is_accept(&self, node: Self::Node) -> bool;
    /// Outgoing transitions in ascending symbol order.
    fn transitions(&self, node: Self::Node) -> Vec<(Symbol, Self::Node)>;
}

impl GraphView for &MutableGraph {
    type Node = NodeId;

    fn source(&self) -> NodeId {
        self.source
    }

    fn is_accept(&self, node: NodeId) -> bool {
        self.arena.is_accept(node)
    }

    fn transitions(&self, node: NodeId) -> Vec<(Symbol, NodeId)> {
        self.arena.out_edges(node).to_vec()
    }
}

impl GraphView for &FrozenGraph {
    type Node = usize;

    fn source(&self) -> usize {
        FrozenGraph::source(self)
    }

    fn is_accept(&self, node: usize) -> bool {
        FrozenGraph::is_accept(self, node)
    }

    fn transitions(&self, node: usize) -> Vec<(Symbol, usize)> {
        self.letters()
            .iter()
            .filter_map(|&sym| self.transition(node, sym).map(|next| (sym, next)))
            .collect()
    }
}

pub(crate) enum Condition<'a> {
    Any,
    Prefix(&'a [Symbol]),
    Substring(&'a [Symbol]),
    Suffix(&'a [Symbol]),
}

/// Collects every accepted string satisfying `condition`, in ascending
/// lexicographic order (by symbol value).
pub(crate) fn enumerate<G: GraphView>(graph: G, condition: Condition<'_>) -> BTreeSet<Vec<Symbol>> {
    let mut results = BTreeSet::new();
    match condition {
        Condition::Prefix(prefix) => {
            if let Some(start) = descend(&graph, prefix) {
                collect(&graph, start, prefix.to_vec(), &mut results, &|_| true);
            }
        }
        Condition::Any => {
            collect(&graph, graph.source(), Vec::new(), &mut results, &|_| true);
        }
        Condition::Substring(needle) => {
            collect(&graph, graph.source(), Vec::new(), &mut results, &|path| {
                contains_subslice(path, needle)
            });
        }
        Condition::Suffix(needle) => {
            collect(&graph, graph.source(), Vec::new(), &mut results, &|path| {
                path.ends_with(needle)
            });
        }
    }
    results
}

fn descend<G: GraphView>(graph: &G, prefix: &[Symbol]) -> Option<G::Node> {
    let mut cur = graph.source();
    for &sym in prefix {
        cur = graph
            .transitions(cur)
            .into_iter()
            .find(|&(s, _)| s == sym)
            .map(|(_, next)| next)?;
    }
    Some(cur)
}

fn collect<G: GraphView>(
    graph: &G,
    node: G::Node,
    prefix: Vec<Symbol>,
    out: &mut BTreeSet<Vec<Symbol>>,
    predicate: &dyn Fn(&[Symbol]) -> bool,
) {
    // Explicit stack: enumeration can range over graphs much deeper than
    // any single string (fan-out across many branches), so this does not
    // recurse.
    let mut stack = vec![(node, prefix)];
    while let Some((n, path)) = stack.pop() {
        if graph.is_accept(n) && predicate(&path) {
            out.insert(path.clone());
        }
        for (sym, child) in graph.transitions(n) {
            let mut next_path = path.clone();
            next_path.push(sym);
            stack.push((child, next_path));
        }
    }
}

fn contains_subslice(haystack: &[Symbol], needle: &[Symbol]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}
