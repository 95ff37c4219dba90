/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The multi-vector graph line store (`spec.md` §4.2): bundles the `L`
//! RaS tree, one `W` RaS tree per symbol class, and the parallel `P` /
//! flavor / CSL side arrays, all kept in lockstep under insertion.

use crate::bitvector::RasTree;
use crate::error::{check_bound, GraphError, Result};

use super::freq::{CFreq, EscapeMode};
use super::line::GraphLine;
use super::symbol::{Edge, Flavor, Symbol, SYMBOL_COUNT};
use super::tracker::VariableTracker;

/// Which vector a [`Target`] addresses, mirroring `spec.md`'s
/// `Graph_vector` enum (`VECTOR_L` / `VECTOR_W`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    L(bool),
    W(Symbol),
}

/// How a line's common-suffix-length is stored (`spec.md` §4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CslMode {
    /// No storage: the de Bruijn layer recomputes CSL on demand by walking
    /// `Backward` in lockstep.
    LabelRecompute,
    /// `CSL[i]` stored explicitly as an integer, O(1) query (default).
    #[default]
    Integer,
    /// `CSL[i]` stored as a fixed-width field inside a RaS tree.
    Bitvector,
}

#[derive(Debug)]
enum CslStorage {
    Integer(Vec<u32>),
    Bitvector { tree: RasTree, width: u32 },
}

impl CslStorage {
    fn new(mode: CslMode, context_length: u32) -> Option<Self> {
        match mode {
            CslMode::LabelRecompute => None,
            CslMode::Integer => Some(CslStorage::Integer(Vec::new())),
            CslMode::Bitvector => {
                let width = bits_needed(context_length as u64);
                Some(CslStorage::Bitvector {
                    tree: RasTree::new(),
                    width,
                })
            }
        }
    }

    fn len(&self) -> u64 {
        match self {
            CslStorage::Integer(v) => v.len() as u64,
            CslStorage::Bitvector { tree, width } => tree.len() / (*width as u64),
        }
    }

    fn insert(&mut self, i: u64, value: u32) {
        match self {
            CslStorage::Integer(v) => v.insert(i as usize, value),
            CslStorage::Bitvector { tree, width } => {
                let base = i * (*width as u64);
                for b in 0..*width {
                    let bit = (value >> (*width - 1 - b)) & 1 != 0;
                    tree.insert(base + b as u64, bit);
                }
            }
        }
    }

    fn get(&self, i: u64) -> u32 {
        match self {
            CslStorage::Integer(v) => v[i as usize],
            CslStorage::Bitvector { tree, width } => {
                let base = i * (*width as u64);
                let mut value = 0u32;
                for b in 0..*width {
                    value = (value << 1) | (tree.get(base + b as u64) as u32);
                }
                value
            }
        }
    }

    fn set(&mut self, i: u64, value: u32) {
        match self {
            CslStorage::Integer(v) => v[i as usize] = value,
            CslStorage::Bitvector { tree, width } => {
                let base = i * (*width as u64);
                for b in 0..*width {
                    let bit = (value >> (*width - 1 - b)) & 1 != 0;
                    tree.set(base + b as u64, bit);
                }
            }
        }
    }
}

fn bits_needed(max_value: u64) -> u32 {
    (u64::BITS - max_value.leading_zeros()).max(1)
}

/// The bundle of RaS trees and side arrays implementing `spec.md`'s
/// `Graph_Line` store.
#[derive(Debug)]
pub struct GraphLineStore {
    l: RasTree,
    w: [RasTree; SYMBOL_COUNT + 1],
    flavor: Vec<Flavor>,
    freq: Vec<u32>,
    csl: Option<CslStorage>,
    escape_mode: EscapeMode,
    tracker: VariableTracker,
}

impl GraphLineStore {
    pub fn new(escape_mode: EscapeMode, csl_mode: CslMode, context_length: u32) -> Self {
        GraphLineStore {
            l: RasTree::new(),
            w: core::array::from_fn(|_| RasTree::new()),
            flavor: Vec::new(),
            freq: Vec::new(),
            csl: CslStorage::new(csl_mode, context_length),
            escape_mode,
            tracker: VariableTracker::new(),
        }
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.l.len()
    }

    pub fn tracker_mut(&mut self) -> &mut VariableTracker {
        &mut self.tracker
    }

    /// `GLine_Insert`: insert `line` at index `i`, shifting later lines up
    /// by one.
    pub fn insert_line(&mut self, i: u64, line: GraphLine) -> Result<()> {
        check_bound(i, self.size())?;
        log::debug!(
            "GraphLineStore: insert_line({i}, last={}, symbol={:?})",
            line.last,
            line.edge.symbol
        );
        self.l.insert(i, line.last);
        for s in Symbol::ALL {
            self.w[s.class()].insert(i, s == line.edge.symbol);
        }
        self.flavor.insert(i as usize, line.edge.flavor);
        self.freq.insert(i as usize, line.freq);
        if let Some(csl) = &mut self.csl {
            csl.insert(i, 0);
        }
        self.tracker.on_insert(i);
        Ok(())
    }

    /// `GLine_Get`: a value copy of line `i`.
    pub fn get_line(&self, i: u64) -> Result<GraphLine> {
        if i >= self.size() {
            return Err(GraphError::OutOfRange {
                index: i,
                len: self.size(),
            });
        }
        let symbol = Symbol::ALL
            .into_iter()
            .find(|s| self.w[s.class()].get(i))
            .expect("every line has exactly one W class set");
        Ok(GraphLine {
            last: self.l.get(i),
            edge: Edge::new(symbol, self.flavor[i as usize]),
            freq: self.freq[i as usize],
        })
    }

    pub fn rank(&self, i: u64, target: Target) -> u64 {
        match target {
            Target::L(bit) => {
                if bit {
                    self.l.rank1(i)
                } else {
                    self.l.rank0(i)
                }
            }
            Target::W(symbol) => self.w[symbol.class()].rank1(i),
        }
    }

    /// `Graph_Select`: a count-based boundary, one past the bare
    /// [`RasTree`] select position — `select(0) = 0`, `select(k) =
    /// tree.select1(k) + 1` for `k >= 1`. The de Bruijn layer's
    /// `Outdegree` / `Forward` / `Backward` / node-range formulas
    /// (`spec.md` §4.3) are written against this "one past" convention
    /// (each subtracts the `+1` back out itself where it needs a 0-indexed
    /// line), not against the raw bit-vector's `k`-th-one-position
    /// contract.
    pub fn select(&self, k: u64, target: Target) -> u64 {
        if k == 0 {
            return 0;
        }
        let raw = match target {
            Target::L(bit) => {
                if bit {
                    self.l.select1(k)
                } else {
                    self.l.select0(k)
                }
            }
            Target::W(symbol) => self.w[symbol.class()].select1(k),
        };
        raw + 1
    }

    pub fn change_symbol(&mut self, i: u64, edge: Edge) -> Result<()> {
        if i >= self.size() {
            return Err(GraphError::OutOfRange {
                index: i,
                len: self.size(),
            });
        }
        for s in Symbol::ALL {
            let bit = s == edge.symbol;
            self.w[s.class()].set(i, bit);
        }
        self.flavor[i as usize] = edge.flavor;
        Ok(())
    }

    pub fn increase_frequency(&mut self, i: u64, amount: u32) -> Result<()> {
        if i >= self.size() {
            return Err(GraphError::OutOfRange {
                index: i,
                len: self.size(),
            });
        }
        self.freq[i as usize] = self.freq[i as usize].saturating_add(amount);
        Ok(())
    }

    /// `Graph_Find_Edge`: within the node containing line `i`, the index of
    /// the edge labeled `g`, or `-1`.
    pub fn find_edge(&self, i: u64, g: Symbol) -> i64 {
        let (lo, hi) = self.node_range(i);
        for j in lo..hi {
            if self.w[g.class()].get(j) {
                return j as i64;
            }
        }
        -1
    }

    /// The half-open line range `[lo, hi)` of the node containing line `i`.
    pub(crate) fn node_range(&self, i: u64) -> (u64, u64) {
        let nid = self.l.rank1(i);
        let lo = self.select(nid, Target::L(true));
        let hi = self.select(nid + 1, Target::L(true));
        (lo, hi)
    }

    pub fn get_symbol_frequency(&self, i: u64) -> CFreq {
        let (lo, hi) = self.node_range(i);
        self.get_symbol_frequency_range(lo, hi.saturating_sub(1))
    }

    /// `Get_symbol_frequency_range` (`spec.md` §4.5).
    pub fn get_symbol_frequency_range(&self, lo: u64, up: u64) -> CFreq {
        let mut freq = CFreq::default();
        if up < lo {
            return freq;
        }
        let mut scanned = 0u32;
        for idx in lo..=up {
            scanned += 1;
            let line = self
                .get_line(idx)
                .expect("range bounds must be within the store");
            if line.edge.symbol == Symbol::Dollar {
                continue;
            }
            freq.symbol[line.edge.symbol.class()] = line.freq;
            freq.total += line.freq;
        }
        let esc = match self.escape_mode {
            EscapeMode::CountLines => scanned,
            EscapeMode::CountDistinct => freq.symbol.iter().filter(|&&c| c > 0).count() as u32,
        };
        freq.esc = esc;
        freq.total += esc;
        freq
    }

    pub fn set_csl(&mut self, i: u64, k: u32) -> Result<()> {
        if i >= self.size() {
            return Err(GraphError::OutOfRange {
                index: i,
                len: self.size(),
            });
        }
        match &mut self.csl {
            Some(storage) => {
                storage.set(i, k);
                Ok(())
            }
            None => Err(GraphError::NotImplemented(
                "set_csl is unavailable in label-recompute CSL mode",
            )),
        }
    }

    pub fn get_csl(&self, i: u64) -> Result<u32> {
        if i >= self.size() {
            return Err(GraphError::OutOfRange {
                index: i,
                len: self.size(),
            });
        }
        match &self.csl {
            Some(storage) => Ok(storage.get(i)),
            None => Err(GraphError::NotImplemented(
                "get_csl is unavailable in label-recompute CSL mode",
            )),
        }
    }

    #[cfg(any(test, feature = "fuzz"))]
    pub fn check_invariants(&self) {
        self.l.check_invariants();
        for tree in &self.w {
            tree.check_invariants();
        }
        if let Some(storage) = &self.csl {
            assert_eq!(storage.len(), self.size());
        }
    }
}
