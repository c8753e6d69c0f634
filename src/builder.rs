//! Incremental builder: insertion with confluence-aware minimization, and
//! minimality-preserving deletion.
//!
//! Each public mutation (`add`/`remove`) leaves the graph minimal when it
//! returns -- unlike the classical Daciuk-Mihov presentation, which defers
//! the equivalent of `replace_or_register` until a whole (sorted) batch is
//! done, every insertion here finalizes its own path immediately. That
//! trades away the amortized-cost optimization sorted-batch construction
//! gets, in exchange for a real postcondition callers can rely on between
//! calls (see DESIGN.md).

use log::{debug, trace};

use crate::arena::{Arena, NodeId};
use crate::register::EquivalenceRegister;
use crate::symbol::Symbol;

#[derive(Debug)]
pub(crate) struct MutableGraph {
    pub arena: Arena,
    register: EquivalenceRegister,
    pub source: NodeId,
    size: usize,
}

impl Default for MutableGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MutableGraph {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let source = arena.new_node(false);
        Self {
            arena,
            register: EquivalenceRegister::new(),
            source,
            size: 0,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn node_count(&self) -> usize {
        self.arena.reachable_node_count(self.source)
    }

    pub fn transition_count(&self) -> usize {
        self.arena.reachable_transition_count(self.source)
    }

    pub fn equivalence_class_count(&self) -> usize {
        self.register.len()
    }

    pub fn transition_label_set(&self) -> Vec<Symbol> {
        self.arena.alphabet.symbols().collect()
    }

    pub fn contains(&self, s: &[Symbol]) -> bool {
        match self.final_node(s) {
            Some(n) => self.arena.is_accept(n),
            None => false,
        }
    }

    fn final_node(&self, s: &[Symbol]) -> Option<NodeId> {
        let mut cur = self.source;
        for &sym in s {
            cur = self.arena.transition(cur, sym)?;
        }
        Some(cur)
    }

    /// Walks as far as possible along `s` from the source, returning the
    /// full list of nodes visited (including the source). Stops early if
    /// `s` runs out of graph to follow.
    fn walk(&self, s: &[Symbol]) -> Vec<NodeId> {
        let mut nodes = vec![self.source];
        let mut cur = self.source;
        for &sym in s {
            match self.arena.transition(cur, sym) {
                Some(next) => {
                    nodes.push(next);
                    cur = next;
                }
                None => break,
            }
        }
        nodes
    }

    fn first_confluence(&self, path_nodes: &[NodeId]) -> Option<usize> {
        path_nodes
            .iter()
            .enumerate()
            .skip(1)
            .find(|&(_, &n)| self.arena.incoming(n) >= 2)
            .map(|(i, _)| i)
    }

    /// Clones the sub-path `path_nodes[idx..]`, redirecting only
    /// `path_nodes[idx - 1]`'s transition to the first clone; each
    /// subsequent clone is chained to the previous one. Returns the new
    /// clone ids, in the same order as `path_nodes[idx..]`.
    fn clone_path(&mut self, path_nodes: &[NodeId], idx: usize, s: &[Symbol]) -> Vec<NodeId> {
        let mut parent = path_nodes[idx - 1];
        let mut original = path_nodes[idx];
        let mut clones = Vec::with_capacity(path_nodes.len() - idx);
        for i in idx..path_nodes.len() {
            let sym = s[i - 1];
            let clone_id = self.arena.clone_node(original, parent, sym);
            clones.push(clone_id);
            parent = clone_id;
            if i + 1 < path_nodes.len() {
                original = path_nodes[i + 1];
            }
        }
        clones
    }

    /// Inserts `s`. Returns `true` iff the accepted-string set changed.
    pub fn add(&mut self, s: &[Symbol]) -> bool {
        if self.contains(s) {
            trace!("add: already present, no-op");
            return false;
        }
        debug!("add: inserting {} symbols", s.len());

        let lcp_nodes = self.walk(s);
        let lcp_len = lcp_nodes.len() - 1;
        let suffix = &s[lcp_len..];

        let confluence = self.first_confluence(&lcp_nodes);
        let unregister_upto = confluence.unwrap_or(lcp_nodes.len());
        for &n in &lcp_nodes[1..unregister_upto] {
            self.register.unregister(&self.arena, n);
            self.arena.clear_cached_hash(n);
        }

        let mut reached = *lcp_nodes.last().unwrap();
        if let Some(idx) = confluence {
            trace!("add: confluence at lcp position {idx}, cloning to end of shared prefix");
            let clones = self.clone_path(&lcp_nodes, idx, s);
            reached = *clones.last().unwrap();
        }

        if suffix.is_empty() {
            self.arena.set_accept(reached, true);
        } else {
            let mut cur = reached;
            for &sym in suffix {
                let next = self.arena.new_node(false);
                self.arena.add_transition(cur, sym, next);
                cur = next;
            }
            self.arena.set_accept(cur, true);
        }

        self.size += 1;
        self.replace_or_register(self.source, s);
        true
    }

    /// Post-order canonicalization: registers newly built nodes, or
    /// collapses them onto an existing equivalent node along the path of
    /// `s` from `origin`.
    fn replace_or_register(&mut self, origin: NodeId, s: &[Symbol]) {
        if s.is_empty() {
            return;
        }
        let sym = s[0];
        let child = match self.arena.transition(origin, sym) {
            Some(c) => c,
            None => return,
        };
        if s.len() > 1 && !self.arena.out_edges(child).is_empty() {
            self.replace_or_register(child, &s[1..]);
        }
        match self.register.lookup(&self.arena, child) {
            None => self.register.register(&self.arena, child),
            Some(canonical) if canonical != child => {
                let grandchildren: Vec<NodeId> =
                    self.arena.out_edges(child).iter().map(|&(_, g)| g).collect();
                for g in grandchildren {
                    self.arena.decrement_incoming(g);
                }
                self.arena.reassign(origin, sym, child, canonical);
                trace!("replace_or_register: collapsed node {child} onto {canonical}");
            }
            _ => {}
        }
    }

    /// Length of the longest leading prefix of `s` that must be kept
    /// untouched when pruning: the largest `cut` such that the edge
    /// `(path_nodes[cut], s[cut])` can be removed along with everything
    /// downstream of it without disturbing any other string.
    fn sole_suffix_cut(&self, path_nodes: &[NodeId], s: &[Symbol]) -> usize {
        let m = s.len();
        if m == 0 {
            return 0;
        }
        let mut cut = m - 1;
        while cut > 0 {
            let candidate = path_nodes[cut];
            if self.arena.out_edges(candidate).len() <= 1 && !self.arena.is_accept(candidate) {
                cut -= 1;
            } else {
                break;
            }
        }
        cut
    }

    /// Rebuilds `s`'s path from source so that every node along it is
    /// exclusively used by `s` up to its end, cloning away the first
    /// confluence node (and everything downstream of it) if one exists.
    fn split_path(&mut self, s: &[Symbol]) -> Vec<NodeId> {
        let path_nodes = self.walk(s);
        match self.first_confluence(&path_nodes) {
            Some(idx) => {
                let clones = self.clone_path(&path_nodes, idx, s);
                let mut rebuilt = path_nodes[..idx].to_vec();
                rebuilt.extend(clones);
                rebuilt
            }
            None => path_nodes,
        }
    }

    /// Removes `s`. Returns `true` iff the accepted-string set changed.
    pub fn remove(&mut self, s: &[Symbol]) -> bool {
        if !self.contains(s) {
            trace!("remove: not present, no-op");
            return false;
        }
        debug!("remove: deleting {} symbols", s.len());

        let path_nodes = self.split_path(s);
        for &n in &path_nodes[1..] {
            self.register.unregister(&self.arena, n);
            self.arena.clear_cached_hash(n);
        }

        let end = *path_nodes.last().unwrap();
        if self.arena.out_edges(end).is_empty() {
            if s.is_empty() {
                self.arena.set_accept(self.source, false);
            } else {
                let cut = self.sole_suffix_cut(&path_nodes, s);
                if cut == 0 {
                    self.arena.remove_transition(self.source, s[0]);
                } else {
                    let parent = path_nodes[cut];
                    self.arena.remove_transition(parent, s[cut]);
                    self.replace_or_register(self.source, &s[..cut]);
                }
            }
        } else {
            self.arena.set_accept(end, false);
            self.replace_or_register(self.source, s);
        }
        self.size -= 1;
        true
    }
}
