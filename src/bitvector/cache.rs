/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A tiny direct-mapped cache mapping a recent logical position to the leaf
//! that holds it, used to amortize repeated traversals of adjacent
//! positions (`spec.md` §4.2). Must be invalidated on any mutation.

use core::cell::Cell;

use super::NodeId;

#[derive(Debug, Clone, Copy)]
pub(crate) struct CacheEntry {
    /// The logical position this entry was built for.
    pub(crate) pos: u64,
    /// The leaf node holding `pos`.
    pub(crate) leaf: NodeId,
    /// `pos` translated into an offset within that leaf.
    pub(crate) offset: u32,
}

/// Single-slot lookup cache. Not thread-safe by design (a RaS tree is
/// single-owner, per `spec.md` §5).
#[derive(Debug, Default)]
pub(crate) struct LookupCache {
    slot: Cell<Option<CacheEntry>>,
}

impl LookupCache {
    pub(crate) const fn new() -> Self {
        LookupCache {
            slot: Cell::new(None),
        }
    }

    pub(crate) fn get(&self, pos: u64) -> Option<CacheEntry> {
        match self.slot.get() {
            Some(entry) if entry.pos == pos => Some(entry),
            _ => None,
        }
    }

    pub(crate) fn store(&self, entry: CacheEntry) {
        self.slot.set(Some(entry));
    }

    /// Evict unconditionally. Called on every mutating operation.
    pub(crate) fn invalidate(&self) {
        self.slot.set(None);
    }
}
