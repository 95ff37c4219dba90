/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! `cfreq`: a frequency snapshot over one node or a line range, plus the
//! escape-slot accounting modes from `spec.md` §4.5.

use super::symbol::SYMBOL_COUNT;

/// A frequency snapshot: per-symbol counts, an escape slot, and a total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CFreq {
    pub symbol: [u32; SYMBOL_COUNT],
    pub esc: u32,
    pub total: u32,
}

/// How the escape slot of a [`CFreq`] is computed over a range
/// (`spec.md` §4.5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EscapeMode {
    /// `ESC = number of lines scanned` (the default).
    #[default]
    CountLines,
    /// `ESC = number of distinct symbols with nonzero count`
    /// (`FREQ_COUNT_ONCE` in the original).
    CountDistinct,
}
