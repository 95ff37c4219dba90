/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The de Bruijn graph operations layered on top of the graph line store
//! (`spec.md` §4.3): `Forward`, `Backward`, `Outdegree`, `Find_Edge`,
//! `Outgoing`, `Label`, plus the context-shortening layer in
//! [`shorten`](self).
//!
//! Lines are sorted lexicographically by reversed node label. `L[i] = 1`
//! marks the last outgoing edge of its node; `W[i]` labels the outgoing
//! edge at line `i`; `F[s]` is the first line index whose node's last
//! symbol is strictly greater than `s` (cumulative counts over
//! `{A, C, G, T}`).

mod shorten;

use core::fmt::{self, Write as _};

use crate::error::{GraphError, Result};
use crate::graph::{CslMode, EscapeMode, GraphLine, GraphLineStore, Symbol, Target, SYMBOL_COUNT};

/// A dynamic succinct de Bruijn graph of fixed context length `k`.
#[derive(Debug)]
pub struct DeBruijnGraph {
    store: GraphLineStore,
    f: [u64; SYMBOL_COUNT],
    context_length: u32,
}

impl DeBruijnGraph {
    /// `deBruijn_Init`: a fresh graph with the root node's five edges
    /// (`spec.md` §6, "Initial graph state").
    pub fn init(context_length: u32, escape_mode: EscapeMode, csl_mode: CslMode) -> Self {
        let mut store = GraphLineStore::new(escape_mode, csl_mode, context_length);
        store
            .insert_line(0, GraphLine::simple(true, Symbol::A, 1))
            .expect("fresh store accepts line 0");
        store
            .insert_line(1, GraphLine::simple(true, Symbol::C, 1))
            .expect("fresh store accepts line 1");
        store
            .insert_line(2, GraphLine::simple(true, Symbol::G, 1))
            .expect("fresh store accepts line 2");
        store
            .insert_line(3, GraphLine::simple(true, Symbol::T, 1))
            .expect("fresh store accepts line 3");
        store
            .insert_line(4, GraphLine::simple(true, Symbol::Dollar, 0))
            .expect("fresh store accepts line 4");

        let mut graph = DeBruijnGraph {
            store,
            f: [1, 2, 3, 4],
            context_length,
        };
        graph.update_csl(0);
        graph.update_csl(2);
        graph.update_csl(4);
        graph
    }

    #[inline]
    pub fn size(&self) -> u64 {
        self.store.size()
    }

    #[inline]
    pub fn f(&self) -> &[u64; SYMBOL_COUNT] {
        &self.f
    }

    #[inline]
    pub fn context_length(&self) -> u32 {
        self.context_length
    }

    #[inline]
    pub(crate) fn store(&self) -> &GraphLineStore {
        &self.store
    }

    #[inline]
    pub(crate) fn store_mut(&mut self) -> &mut GraphLineStore {
        &mut self.store
    }

    pub fn line_get(&self, i: u64) -> Result<GraphLine> {
        self.store.get_line(i)
    }

    /// Inserts `line` at index `i` and shifts every `F` boundary at or
    /// past `i` up by one, generalizing the boundary-maintenance loop
    /// `decompressor.c`'s edge-insertion path runs after `GLine_Insert`
    /// (`if (F_[s] > idx__) F_[s]++`). A single generic insert (unlike the
    /// decompressor's two-phase edge-then-target-node insert) can itself
    /// land exactly on a boundary, so the comparison here is inclusive.
    pub fn line_insert(&mut self, i: u64, line: GraphLine) -> Result<()> {
        self.store.insert_line(i, line)?;
        for boundary in self.f.iter_mut() {
            if i <= *boundary {
                *boundary += 1;
            }
        }
        self.update_csl(i as i64);
        if i + 1 < self.size() {
            self.update_csl(i as i64 + 1);
        }
        Ok(())
    }

    pub fn rank(&self, i: u64, target: Target) -> u64 {
        self.store.rank(i, target)
    }

    /// `Graph_Select`: see [`GraphLineStore::select`] for the "one past
    /// the bare select position" convention this returns.
    pub fn select(&self, k: u64, target: Target) -> u64 {
        self.store.select(k, target)
    }

    /// `Forward(i)`: follow the outgoing edge at line `i`, or `-1` if
    /// `W[i] = $`.
    pub fn forward(&self, idx: i64) -> i64 {
        let i = idx as u64;
        let line = match self.store.get_line(i) {
            Ok(line) => line,
            Err(_) => return -1,
        };
        if line.edge.symbol == Symbol::Dollar {
            return -1;
        }
        let rank = self.store.rank(i + 1, Target::W(line.edge.symbol));
        let spos = self.f[line.edge.symbol.class()];
        let temp = self.store.rank(spos, Target::L(true));
        self.store.select(temp + rank, Target::L(true)) as i64 - 1
    }

    /// `Backward(i)`: move to any edge pointing into the node containing
    /// line `i`, or `-1` if that node's last symbol is `$`.
    pub fn backward(&self, idx: i64) -> i64 {
        debug_assert!(idx >= 0 && (idx as u64) < self.size());
        let i = idx as u64;
        let symbol = Symbol::from_line_index(i, &self.f);
        if symbol == Symbol::Dollar {
            return -1;
        }
        let base = self.store.rank(self.f[symbol.class()], Target::L(true)) as i64;
        let mut temp = self.store.rank(i + 1, Target::L(true)) as i64;
        let line = self
            .store
            .get_line(i)
            .expect("idx validated by caller contract");
        if !line.last {
            temp += 1;
        }
        debug_assert!(temp >= base, "Backward rank underflow at line {idx}");
        self.store.select((temp - base) as u64, Target::W(symbol)) as i64 - 1
    }

    /// `Outdegree(i)`: number of outgoing edges of the node containing
    /// line `i`.
    pub fn outdegree(&self, idx: i64) -> i64 {
        debug_assert!(idx >= 0 && (idx as u64) < self.size());
        let node_id = self.store.rank(idx as u64, Target::L(true));
        let hi = self.store.select(node_id + 1, Target::L(true));
        let lo = self.store.select(node_id, Target::L(true));
        (hi - lo) as i64
    }

    /// `Find_Edge(i, g)`: index of the edge labeled `g` in the node
    /// containing line `i`, or `-1`.
    pub fn find_edge(&self, idx: i64, g: Symbol) -> i64 {
        self.store.find_edge(idx as u64, g)
    }

    /// `Outgoing(i, g) = Forward(Find_Edge(i, g))`.
    pub fn outgoing(&self, idx: i64, g: Symbol) -> i64 {
        let edge_idx = self.find_edge(idx, g);
        if edge_idx == -1 {
            return -1;
        }
        self.forward(edge_idx)
    }

    /// `Label(i, out buf[k+1])`: the up-to-`k`-symbol label of the node
    /// containing line `i`, in a `k+1`-wide buffer matching `spec.md`
    /// §4.3/§6 and `deBruijn_Label`'s `memset(buffer, '$', CONTEXT_LENGTH
    /// + 1)`. Slot 0 is always `$` (the unused leading pad); slots
    /// `1..=k` hold the label, oldest symbol first, with unused slots
    /// padded `$`.
    pub fn label(&self, idx: i64) -> Vec<Symbol> {
        let mut buffer = vec![Symbol::Dollar; self.context_length as usize + 1];
        let mut cursor = idx;
        for slot in buffer[1..].iter_mut().rev() {
            let symbol = Symbol::from_line_index(cursor as u64, &self.f);
            *slot = symbol;
            cursor = self.backward(cursor);
            if cursor == -1 {
                break;
            }
        }
        buffer
    }

    /// Explicitly unsupported, matching `deBruijn_Indegree`'s
    /// `FATAL("Not Implemented")` — returned as an error here rather than
    /// a panic, per `spec.md` §7's "unsupported" classification.
    pub fn indegree(&self, _idx: i64) -> Result<i64> {
        Err(GraphError::NotImplemented("indegree"))
    }

    /// Explicitly unsupported, matching `deBruijn_Incomming`.
    pub fn incoming(&self, _idx: i64, _g: Symbol) -> Result<i64> {
        Err(GraphError::NotImplemented("incoming"))
    }

    pub fn get_symbol_frequency(&self, idx: u64) -> crate::graph::CFreq {
        self.store.get_symbol_frequency(idx)
    }

    pub fn get_symbol_frequency_range(&self, lo: u64, up: u64) -> crate::graph::CFreq {
        self.store.get_symbol_frequency_range(lo, up)
    }

    /// `deBruijn_Insert_test_data`: fills `L`/`W`/`P`/`F` directly, then
    /// recomputes CSL by walking odd indices and the final index.
    pub fn from_test_data(
        l: &[bool],
        w: &[Symbol],
        p: &[u32],
        f: [u64; SYMBOL_COUNT],
        context_length: u32,
        escape_mode: EscapeMode,
        csl_mode: CslMode,
    ) -> Self {
        assert_eq!(l.len(), w.len());
        assert_eq!(l.len(), p.len());
        let mut store = GraphLineStore::new(escape_mode, csl_mode, context_length);
        for i in 0..l.len() {
            let line = GraphLine::simple(l[i], w[i], p[i]);
            store
                .insert_line(i as u64, line)
                .expect("sequential insert at the tail always succeeds");
        }
        let mut graph = DeBruijnGraph {
            store,
            f,
            context_length,
        };
        let size = graph.size() as i64;
        let mut i = 1i64;
        while i < size {
            graph.update_csl(i);
            i += 2;
        }
        if size > 0 {
            graph.update_csl(size - 1);
        }
        graph
    }

    /// Human-readable dump of the whole structure (`deBruijn_Print`),
    /// returned rather than printed.
    pub fn fmt_table(&self, with_labels: bool) -> String {
        let mut out = String::new();
        if with_labels {
            let _ = writeln!(out, "      F  L  Label{}W   P", " ".repeat(self.context_length.saturating_sub(5) as usize + 3));
        } else {
            let _ = writeln!(out, "     F  L  W   P");
        }
        for i in 0..self.size() {
            let line = self.store.get_line(i).expect("i < size()");
            let boundary = self.boundary_marker(i);
            let _ = write!(out, "{i:4}: {boundary}  ");
            if with_labels {
                let label: String = self.label(i as i64).iter().map(|s| s.as_char()).collect();
                let _ = write!(out, "{label}  ");
            }
            let flavor_mark = match line.edge.flavor {
                crate::graph::Flavor::Repeat => 'x',
                crate::graph::Flavor::First => ' ',
            };
            let _ = writeln!(
                out,
                "{}{}  {}",
                line.edge.symbol.as_char(),
                flavor_mark,
                line.freq
            );
        }
        out
    }

    fn boundary_marker(&self, i: u64) -> char {
        if i == self.f[3] {
            'T'
        } else if i == self.f[2] {
            'G'
        } else if i == self.f[1] {
            'C'
        } else if i == self.f[0] {
            'A'
        } else if i == 0 {
            '$'
        } else {
            ' '
        }
    }
}

impl fmt::Display for DeBruijnGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.fmt_table(false))
    }
}
