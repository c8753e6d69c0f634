//! Node arena: parallel-vector storage for mutable graph nodes.
//!
//! Nodes are addressed by `NodeId` (an index into the arena), never by
//! reference, so the equivalence register and the builder can hold node
//! identities without fighting the borrow checker -- the same style the
//! teacher crate uses for its Huffman tree (`tools/adaptive_huff.rs`'s
//! `parent`/`son`/`symb_map` index arrays) and its ring buffer.

use std::cell::Cell;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use log::trace;

use crate::symbol::Symbol;

pub(crate) type NodeId = usize;

#[derive(Debug)]
struct MutableNode {
    accept: bool,
    /// Outgoing transitions, kept sorted ascending by symbol.
    out: Vec<(Symbol, NodeId)>,
    incoming: u32,
    cached_hash: Cell<Option<u64>>,
}

impl MutableNode {
    fn new(accept: bool) -> Self {
        Self {
            accept,
            out: Vec::new(),
            incoming: 0,
            cached_hash: Cell::new(None),
        }
    }
}

/// Owns every node reachable (or once reachable) from the source, plus the
/// alphabet seen while building. Bookkeeping for incoming-edge counts and
/// equivalence fingerprints lives here, next to the data it derives from.
#[derive(Debug, Default)]
pub(crate) struct Arena {
    nodes: Vec<MutableNode>,
    pub alphabet: crate::alphabet::AlphabetIndex,
}

impl Arena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn new_node(&mut self, accept: bool) -> NodeId {
        self.nodes.push(MutableNode::new(accept));
        self.nodes.len() - 1
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_accept(&self, node: NodeId) -> bool {
        self.nodes[node].accept
    }

    pub fn set_accept(&mut self, node: NodeId, accept: bool) {
        if self.nodes[node].accept != accept {
            self.nodes[node].accept = accept;
            self.clear_cached_hash(node);
        }
    }

    pub fn incoming(&self, node: NodeId) -> u32 {
        self.nodes[node].incoming
    }

    pub fn decrement_incoming(&mut self, node: NodeId) {
        debug_assert!(self.nodes[node].incoming > 0, "incoming count underflow");
        self.nodes[node].incoming = self.nodes[node].incoming.saturating_sub(1);
    }

    pub fn out_edges(&self, node: NodeId) -> &[(Symbol, NodeId)] {
        &self.nodes[node].out
    }

    pub fn transition(&self, node: NodeId, sym: Symbol) -> Option<NodeId> {
        let out = &self.nodes[node].out;
        out.binary_search_by_key(&sym, |&(s, _)| s)
            .ok()
            .map(|i| out[i].1)
    }

    /// Inserts or overwrites `node`'s transition on `sym`, targeting `to`.
    /// Bookkeeping-free with respect to whatever it overwrites; callers that
    /// need to redirect an *existing* edge (adjusting both incoming counts)
    /// should use [`Arena::reassign`] instead.
    pub fn add_transition(&mut self, node: NodeId, sym: Symbol, to: NodeId) {
        self.alphabet.record(sym);
        let out = &mut self.nodes[node].out;
        match out.binary_search_by_key(&sym, |&(s, _)| s) {
            Ok(i) => out[i].1 = to,
            Err(i) => out.insert(i, (sym, to)),
        }
        self.nodes[to].incoming += 1;
        self.clear_cached_hash(node);
        trace!("add_transition: node {node} --{sym}--> {to}");
    }

    pub fn remove_transition(&mut self, node: NodeId, sym: Symbol) {
        let out = &mut self.nodes[node].out;
        if let Ok(i) = out.binary_search_by_key(&sym, |&(s, _)| s) {
            let (_, to) = out.remove(i);
            self.decrement_incoming(to);
            self.clear_cached_hash(node);
            trace!("remove_transition: node {node} --{sym}--> {to} removed");
        }
    }

    /// Atomically swaps the target of `node`'s transition on `sym` from
    /// `old_to` to `new_to`, adjusting both incoming counts.
    pub fn reassign(&mut self, node: NodeId, sym: Symbol, old_to: NodeId, new_to: NodeId) {
        let out = &mut self.nodes[node].out;
        let i = out
            .binary_search_by_key(&sym, |&(s, _)| s)
            .expect("reassign target must already have a transition on this symbol");
        debug_assert_eq!(out[i].1, old_to, "reassign: old target mismatch");
        out[i].1 = new_to;
        self.decrement_incoming(old_to);
        self.nodes[new_to].incoming += 1;
        self.clear_cached_hash(node);
        trace!("reassign: node {node} --{sym}--> {new_to} (was {old_to})");
    }

    /// Creates a shallow clone of `node` (same accept flag, same children --
    /// each child's incoming count is incremented), then redirects
    /// `new_parent`'s transition on `sym_from_parent` from `node` to the
    /// clone.
    pub fn clone_node(&mut self, node: NodeId, new_parent: NodeId, sym_from_parent: Symbol) -> NodeId {
        let accept = self.nodes[node].accept;
        let children = self.nodes[node].out.clone();
        let clone_id = self.new_node(accept);
        for &(_, child) in &children {
            self.nodes[child].incoming += 1;
        }
        self.nodes[clone_id].out = children;
        self.reassign(new_parent, sym_from_parent, node, clone_id);
        trace!("clone_node: {node} cloned as {clone_id} under parent {new_parent}");
        clone_id
    }

    pub fn clear_cached_hash(&self, node: NodeId) {
        self.nodes[node].cached_hash.set(None);
    }

    /// Hash of `(accept, out)` -- the equivalence fingerprint. Cached on the
    /// node until a mutation invalidates it.
    pub fn fingerprint_hash(&self, node: NodeId) -> u64 {
        if let Some(h) = self.nodes[node].cached_hash.get() {
            return h;
        }
        let mut hasher = DefaultHasher::new();
        self.nodes[node].accept.hash(&mut hasher);
        self.nodes[node].out.hash(&mut hasher);
        let h = hasher.finish();
        self.nodes[node].cached_hash.set(Some(h));
        h
    }

    pub fn fingerprint_eq(&self, a: NodeId, b: NodeId) -> bool {
        a == b || (self.nodes[a].accept == self.nodes[b].accept && self.nodes[a].out == self.nodes[b].out)
    }

    /// Counts nodes reachable from `source` (inclusive), via an explicit
    /// stack -- reachability can run deeper than the longest single string
    /// once branching fans out, so this does not recurse.
    pub fn reachable_node_count(&self, source: NodeId) -> usize {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![source];
        visited[source] = true;
        let mut count = 0;
        while let Some(n) = stack.pop() {
            count += 1;
            for &(_, child) in self.out_edges(n) {
                if !visited[child] {
                    visited[child] = true;
                    stack.push(child);
                }
            }
        }
        count
    }

    /// Counts transitions reachable from `source`.
    pub fn reachable_transition_count(&self, source: NodeId) -> usize {
        let mut visited = vec![false; self.nodes.len()];
        let mut stack = vec![source];
        visited[source] = true;
        let mut count = 0;
        while let Some(n) = stack.pop() {
            count += self.out_edges(n).len();
            for &(_, child) in self.out_edges(n) {
                if !visited[child] {
                    visited[child] = true;
                    stack.push(child);
                }
            }
        }
        count
    }
}
