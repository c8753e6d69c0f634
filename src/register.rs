//! Equivalence register: finds a canonical representative for any node's
//! right-language, so the builder can collapse newly built nodes onto an
//! existing equivalent node instead of keeping duplicates around.
//!
//! Grounded on the dedup-by-hash structure in the FST builder
//! (`fst_builder.rs`'s `NodeHash`/`dedup_hash`): a hash bucket holding
//! candidate node ids, with a structural equality check to resolve
//! collisions, exactly mirrors that `compile_node`/`freeze_tail` pattern.

use std::collections::HashMap;

use crate::arena::{Arena, NodeId};

#[derive(Debug, Default)]
pub(crate) struct EquivalenceRegister {
    buckets: HashMap<u64, Vec<NodeId>>,
}

impl EquivalenceRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a node already in the register with the same right-language
    /// as `node`, if one exists (never `node` itself).
    pub fn lookup(&self, arena: &Arena, node: NodeId) -> Option<NodeId> {
        let hash = arena.fingerprint_hash(node);
        self.buckets
            .get(&hash)?
            .iter()
            .copied()
            .find(|&candidate| candidate != node && arena.fingerprint_eq(candidate, node))
    }

    pub fn register(&mut self, arena: &Arena, node: NodeId) {
        let hash = arena.fingerprint_hash(node);
        self.buckets.entry(hash).or_default().push(node);
    }

    pub fn unregister(&mut self, arena: &Arena, node: NodeId) {
        let hash = arena.fingerprint_hash(node);
        if let Some(bucket) = self.buckets.get_mut(&hash) {
            if let Some(pos) = bucket.iter().position(|&c| c == node) {
                bucket.swap_remove(pos);
            }
            if bucket.is_empty() {
                self.buckets.remove(&hash);
            }
        }
    }

    /// Total number of registered nodes -- the number of distinct
    /// equivalence classes currently tracked.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
