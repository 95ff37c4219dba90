/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The dynamic rank/select bit vector ("RaS tree") described in `spec.md`
//! §4.1: a balanced tree whose leaves hold 32-bit [`BitBlock`]s, supporting
//! `insert`/`get`/`rank`/`select` in `O(log n)`.
//!
//! Nodes live in a single arena (`Vec<Node>`) addressed by [`NodeId`], the
//! Rust analogue of the original's tagged `MemPtr`: instead of a tag bit
//! packed into the index, we use an enum, matching `spec.md` §9's guidance
//! ("keep as a tagged variant... bit-packing the tag into the index is an
//! optional optimization"). A leaf overflowing on insert is turned in place
//! into an [`Internal`] node pointing at two freshly allocated leaves, so
//! `NodeId`s are stable for the lifetime of the tree — nothing is ever
//! removed from the arena.

use super::block::BitBlock;
use super::cache::{CacheEntry, LookupCache};

pub(crate) type NodeId = usize;

#[derive(Debug, Clone, Copy)]
pub(crate) struct Internal {
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    /// Total logical bits under this node.
    pub(crate) p: u64,
    /// Total 1-bits under this node.
    pub(crate) r: u64,
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Node {
    Leaf(BitBlock),
    Internal(Internal),
}

/// A dynamic rank/select bit vector, backed by a balanced tree of 32-bit
/// leaves.
#[derive(Debug)]
pub struct RasTree {
    pub(crate) arena: Vec<Node>,
    pub(crate) root: NodeId,
    cache: LookupCache,
}

impl Default for RasTree {
    fn default() -> Self {
        Self::new()
    }
}

impl RasTree {
    /// An empty tree: `p = r = 0`.
    pub fn new() -> Self {
        RasTree {
            arena: vec![Node::Leaf(BitBlock::empty())],
            root: 0,
            cache: LookupCache::new(),
        }
    }

    #[inline]
    pub(crate) fn p_of(&self, id: NodeId) -> u64 {
        match &self.arena[id] {
            Node::Leaf(b) => b.size as u64,
            Node::Internal(n) => n.p,
        }
    }

    #[inline]
    pub(crate) fn r_of(&self, id: NodeId) -> u64 {
        match &self.arena[id] {
            Node::Leaf(b) => b.population as u64,
            Node::Internal(n) => n.r,
        }
    }

    /// Total number of logical bits stored.
    #[inline]
    pub fn len(&self) -> u64 {
        self.p_of(self.root)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of 1-bits stored.
    #[inline]
    pub fn ones(&self) -> u64 {
        self.r_of(self.root)
    }

    /// `s[i]`. Out-of-range inputs are a logic error in the caller —
    /// unlike rank/select, `spec.md` §4.1 only defines `Get` for
    /// `i ∈ [0, p)`, so we `debug_assert!` rather than saturate.
    pub fn get(&self, i: u64) -> bool {
        debug_assert!(i < self.len(), "Get index {i} out of range");
        let (leaf, offset) = self.locate(i);
        match &self.arena[leaf] {
            Node::Leaf(b) => b.get(offset),
            Node::Internal(_) => unreachable!("locate must return a leaf"),
        }
    }

    /// Find the leaf holding logical position `i`, and `i`'s offset within
    /// it. Uses (and populates) the single-slot lookup cache.
    fn locate(&self, i: u64) -> (NodeId, u32) {
        if let Some(CacheEntry { leaf, offset, .. }) = self.cache.get(i) {
            log::trace!("RasTree: cache hit for position {i}");
            return (leaf, offset);
        }
        let mut current = self.root;
        let mut pos = i;
        loop {
            match &self.arena[current] {
                Node::Leaf(_) => break,
                Node::Internal(n) => {
                    let lp = self.p_of(n.left);
                    if pos < lp {
                        current = n.left;
                    } else {
                        pos -= lp;
                        current = n.right;
                    }
                }
            }
        }
        self.cache.store(CacheEntry {
            pos: i,
            leaf: current,
            offset: pos as u32,
        });
        (current, pos as u32)
    }

    /// `Rank₁(i)`: number of 1-bits in `s[0..i)`. Saturates to `ones()` for
    /// `i >= len()`.
    pub fn rank1(&self, i: u64) -> u64 {
        let len = self.len();
        if i >= len {
            return self.ones();
        }
        let mut node = self.root;
        let mut pos = i;
        let mut acc = 0u64;
        loop {
            match &self.arena[node] {
                Node::Leaf(b) => {
                    acc += b.rank1_prefix(pos as u32) as u64;
                    break;
                }
                Node::Internal(n) => {
                    let lp = self.p_of(n.left);
                    if pos <= lp {
                        node = n.left;
                    } else {
                        pos -= lp;
                        acc += self.r_of(n.left);
                        node = n.right;
                    }
                }
            }
        }
        acc
    }

    /// `Rank₀(i) = i − Rank₁(i)`.
    pub fn rank0(&self, i: u64) -> u64 {
        let i = i.min(self.len());
        i - self.rank1(i)
    }

    /// `Select₁(k)`: smallest `i` with `Rank₁(i+1) = k`; `len()` if
    /// `k > ones()`.
    pub fn select1(&self, k: u64) -> u64 {
        if k == 0 || k > self.ones() {
            return self.len();
        }
        let mut node = self.root;
        let mut k = k;
        let mut base = 0u64;
        loop {
            match &self.arena[node] {
                Node::Leaf(b) => {
                    let offset = b
                        .select1(k as u32)
                        .expect("leaf must contain the k-th one bit");
                    return base + offset as u64;
                }
                Node::Internal(n) => {
                    let lr = self.r_of(n.left);
                    if k <= lr {
                        node = n.left;
                    } else {
                        k -= lr;
                        base += self.p_of(n.left);
                        node = n.right;
                    }
                }
            }
        }
    }

    /// `Select₀(k)`: smallest `i` with `Rank₀(i+1) = k`; `len()` if
    /// `k` exceeds the number of zero bits.
    pub fn select0(&self, k: u64) -> u64 {
        let zeros = self.len() - self.ones();
        if k == 0 || k > zeros {
            return self.len();
        }
        let mut node = self.root;
        let mut k = k;
        let mut base = 0u64;
        loop {
            match &self.arena[node] {
                Node::Leaf(b) => {
                    let offset = b
                        .select0(k as u32)
                        .expect("leaf must contain the k-th zero bit");
                    return base + offset as u64;
                }
                Node::Internal(n) => {
                    let left_zeros = self.p_of(n.left) - self.r_of(n.left);
                    if k <= left_zeros {
                        node = n.left;
                    } else {
                        k -= left_zeros;
                        base += self.p_of(n.left);
                        node = n.right;
                    }
                }
            }
        }
    }

    /// Insert `value` at logical position `i` (`i ∈ [0, len()]`).
    ///
    /// # Panics
    /// If `i > len()`. Out-of-range insertion is a caller bug at this
    /// layer; [`crate::graph::GraphLineStore`] validates positions before
    /// reaching here and turns an out-of-range request into a
    /// [`crate::error::GraphError::OutOfRange`] instead.
    pub fn insert(&mut self, i: u64, value: bool) {
        assert!(i <= self.len(), "Insert position {i} out of range");
        self.cache.invalidate();
        log::trace!("RasTree: insert({i}, {value})");
        self.insert_rec(self.root, i, value);
    }

    fn insert_rec(&mut self, node: NodeId, pos: u64, value: bool) {
        let is_full_leaf = matches!(&self.arena[node], Node::Leaf(b) if b.size == BitBlock::CAPACITY);
        if is_full_leaf {
            self.split_leaf(node);
        }

        // Extract only Copy data from the (immutable) match so no borrow of
        // `self.arena` survives into the recursive call below.
        let (left, right) = match &self.arena[node] {
            Node::Leaf(b) => {
                let mut updated = *b;
                updated.insert(pos as u32, value);
                self.arena[node] = Node::Leaf(updated);
                return;
            }
            Node::Internal(n) => (n.left, n.right),
        };

        let lp = self.p_of(left);
        if let Node::Internal(n) = &mut self.arena[node] {
            n.p += 1;
            if value {
                n.r += 1;
            }
        }

        if pos < lp {
            self.insert_rec(left, pos, value);
        } else {
            self.insert_rec(right, pos - lp, value);
        }
    }

    /// Overwrite `s[i]` in place, leaving `len()` unchanged. Returns the
    /// previous value. Used where the line store needs to change an
    /// existing edge's label (`Graph_Change_symbol`) without reshaping the
    /// line count — the RaS tree itself is otherwise insert-only, matching
    /// `spec.md` §4.1.
    ///
    /// # Panics
    /// If `i >= len()`.
    pub fn set(&mut self, i: u64, value: bool) -> bool {
        assert!(i < self.len(), "Set index {i} out of range");
        self.cache.invalidate();
        self.set_rec(self.root, i, value)
    }

    fn set_rec(&mut self, node: NodeId, pos: u64, value: bool) -> bool {
        let left = match &self.arena[node] {
            Node::Leaf(b) => {
                let mut updated = *b;
                let old = updated.set(pos as u32, value);
                self.arena[node] = Node::Leaf(updated);
                return old;
            }
            Node::Internal(n) => n.left,
        };

        let lp = self.p_of(left);
        let (child, child_pos) = if pos < lp {
            (left, pos)
        } else {
            let right = match &self.arena[node] {
                Node::Internal(n) => n.right,
                Node::Leaf(_) => unreachable!(),
            };
            (right, pos - lp)
        };
        let old = self.set_rec(child, child_pos, value);
        if old != value {
            if let Node::Internal(n) = &mut self.arena[node] {
                if value {
                    n.r += 1;
                } else {
                    n.r -= 1;
                }
            }
        }
        old
    }

    /// Turn a full leaf into an internal node with two 16-bit leaf
    /// children, in place (`spec.md` §4.1, "Leaf split on insert overflow").
    fn split_leaf(&mut self, node: NodeId) {
        let block = match &self.arena[node] {
            Node::Leaf(b) => *b,
            Node::Internal(_) => unreachable!(),
        };
        log::trace!("RasTree: splitting leaf {node}");
        let (left_block, right_block) = block.split();

        let left_id = self.arena.len();
        self.arena.push(Node::Leaf(left_block));
        let right_id = self.arena.len();
        self.arena.push(Node::Leaf(right_block));

        self.arena[node] = Node::Internal(Internal {
            left: left_id,
            right: right_id,
            p: block.size as u64,
            r: block.population as u64,
        });
    }

    /// Verify the aggregate invariants (`spec.md` §8, property 1)
    /// recursively. Intended for tests and fuzzing, not the hot path.
    #[cfg(any(test, feature = "fuzz"))]
    pub fn check_invariants(&self) {
        self.check_invariants_rec(self.root);
    }

    #[cfg(any(test, feature = "fuzz"))]
    fn check_invariants_rec(&self, node: NodeId) -> (u64, u64) {
        match &self.arena[node] {
            Node::Leaf(b) => (b.size as u64, b.population as u64),
            Node::Internal(n) => {
                let (lp, lr) = self.check_invariants_rec(n.left);
                let (rp, rr) = self.check_invariants_rec(n.right);
                assert_eq!(n.p, lp + rp, "p aggregate mismatch at node {node}");
                assert_eq!(n.r, lr + rr, "r aggregate mismatch at node {node}");
                (n.p, n.r)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit(seq: u128, width: u32, i: u32) -> bool {
        (seq >> (width - 1 - i)) & 1 != 0
    }

    #[test]
    fn rear_insert_roundtrip() {
        // S1: fixed 80-bit sequence, inserted at the tail in order.
        let seq: u128 = 0xC3A5_F09E_1234_7890_A1B2_C3D4_E5F6_0718_u128 >> 16;
        let width = 80u32;
        let mut tree = RasTree::new();
        for i in 0..width {
            tree.insert(i as u64, bit(seq, width, i));
        }
        tree.check_invariants();

        let mut running_rank1 = 0u64;
        for i in 0..width {
            let b = bit(seq, width, i);
            assert_eq!(tree.get(i as u64), b);
            assert_eq!(tree.rank1(i as u64), running_rank1);
            assert_eq!(tree.rank0(i as u64), i as u64 - running_rank1);
            if b {
                running_rank1 += 1;
            }
        }
        assert_eq!(tree.rank1(width as u64), running_rank1);

        let mut k = 0u64;
        for i in 0..width {
            if bit(seq, width, i) {
                k += 1;
                assert_eq!(tree.select1(k), i as u64);
            }
        }
        assert_eq!(tree.select1(k + 1), width as u64);
    }

    #[test]
    fn front_insert_roundtrip() {
        // S2: same sequence, but each bit is inserted at position 0, so the
        // final logical order is the reverse of insertion order.
        let seq: u128 = 0xC3A5_F09E_1234_7890_A1B2_C3D4_E5F6_0718_u128 >> 16;
        let width = 80u32;
        let mut tree = RasTree::new();
        for i in (0..width).rev() {
            tree.insert(0, bit(seq, width, i));
        }
        tree.check_invariants();

        for i in 0..width {
            assert_eq!(tree.get(i as u64), bit(seq, width, i));
        }
        let mut running_rank1 = 0u64;
        for i in 0..width {
            assert_eq!(tree.rank1(i as u64), running_rank1);
            if bit(seq, width, i) {
                running_rank1 += 1;
            }
        }
    }

    #[test]
    fn leaf_split_on_33rd_insert() {
        // S6: 33 alternating bits split the root leaf into two children.
        let mut tree = RasTree::new();
        for i in 0..33u64 {
            tree.insert(i, i % 2 == 0);
        }
        match &tree.arena[tree.root] {
            Node::Internal(n) => {
                let left_is_leaf = matches!(tree.arena[n.left], Node::Leaf(_));
                let right_is_leaf = matches!(tree.arena[n.right], Node::Leaf(_));
                assert!(left_is_leaf && right_is_leaf);
                assert_eq!(tree.p_of(n.left) + tree.p_of(n.right), 33);
            }
            Node::Leaf(_) => panic!("root should have split into an internal node"),
        }
        assert_eq!(tree.rank1(33), 17);
        tree.check_invariants();
    }

    #[test]
    fn out_of_range_saturates() {
        let mut tree = RasTree::new();
        for i in 0..10u64 {
            tree.insert(i, i % 2 == 0);
        }
        assert_eq!(tree.rank1(1000), tree.ones());
        assert_eq!(tree.select1(1000), tree.len());
        assert_eq!(tree.select0(1000), tree.len());
    }

    #[test]
    fn randomized_interleaved_insertions_preserve_invariants() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let mut rng = SmallRng::seed_from_u64(42);
        let mut tree = RasTree::new();
        let mut model: Vec<bool> = Vec::new();
        for _ in 0..2000 {
            let len = tree.len();
            let pos = rng.random_range(0..=len);
            let value = rng.random_bool(0.5);
            tree.insert(pos, value);
            model.insert(pos as usize, value);
        }
        tree.check_invariants();
        for (i, &b) in model.iter().enumerate() {
            assert_eq!(tree.get(i as u64), b);
        }
        let mut running_rank1 = 0u64;
        for (i, &b) in model.iter().enumerate() {
            assert_eq!(tree.rank1(i as u64), running_rank1);
            if b {
                running_rank1 += 1;
            }
        }
    }
}
