/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Error types returned by the recoverable operations of this crate.
//!
//! Invariant violations (aggregate mismatch, leaf overflow, non-monotone
//! `F`, tag confusion at traversal) are not represented here: those are
//! bugs, not recoverable conditions, and are reported with
//! `panic!`/`debug_assert!` instead. Only out-of-range positions and
//! unimplemented operations produce a [`GraphError`].

use core::fmt;

/// Recoverable error conditions produced by this crate's public API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphError {
    /// A mutating operation was given a position beyond the current size.
    ///
    /// Read operations (`get`, `rank`, `select`) never produce this: they
    /// return the saturating values defined by the RaS tree contract
    /// instead.
    OutOfRange {
        /// The offending index.
        index: u64,
        /// The current size against which `index` was checked.
        len: u64,
    },
    /// The operation is explicitly unsupported (`indegree`, `incoming`).
    NotImplemented(&'static str),
}

impl fmt::Display for GraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GraphError::OutOfRange { index, len } => {
                write!(f, "index {index} out of range (len = {len})")
            }
            GraphError::NotImplemented(what) => write!(f, "not implemented: {what}"),
        }
    }
}

impl std::error::Error for GraphError {}

/// Convenience alias used throughout the crate's public API.
pub type Result<T> = core::result::Result<T, GraphError>;

#[inline]
pub(crate) fn check_bound(index: u64, len: u64) -> Result<()> {
    if index > len {
        Err(GraphError::OutOfRange { index, len })
    } else {
        Ok(())
    }
}
