/*
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Black-box scenarios from `spec.md` §8: a static graph built from fixed
//! `L`/`W`/`F` arrays (S3), rank on a freshly-initialized graph (S4), and
//! an insert that shifts node boundaries (S5).

use debruijn_graph::prelude::*;

fn s3_graph() -> DeBruijnGraph {
    let l = [
        false, false, true, false, true, true, true, true, true, true, false, true, true, true,
        true,
    ];
    let w = [
        Symbol::A,
        Symbol::C,
        Symbol::G,
        Symbol::C,
        Symbol::G,
        Symbol::C,
        Symbol::Dollar,
        Symbol::Dollar,
        Symbol::Dollar,
        Symbol::Dollar,
        Symbol::A,
        Symbol::G,
        Symbol::G,
        Symbol::A,
        Symbol::Dollar,
    ];
    let p = [1u32; 15];
    let f = [3u64, 7, 10, 15];
    DeBruijnGraph::from_test_data(&l, &w, &p, f, 4, EscapeMode::CountLines, CslMode::Integer)
}

#[test]
fn s3_outdegree_matches_expected_table() {
    let g = s3_graph();
    let expected = [3, 3, 3, 2, 2, 1, 1, 1, 1, 1, 2, 2, 1, 1, 1];
    for (i, want) in expected.into_iter().enumerate() {
        assert_eq!(g.outdegree(i as i64), want, "outdegree mismatch at line {i}");
    }
}

#[test]
fn s3_outgoing_a_matches_expected_table() {
    let g = s3_graph();
    let expected = [4, 4, 4, -1, -1, -1, -1, -1, -1, -1, 5, 5, -1, 6, -1];
    for (i, want) in expected.into_iter().enumerate() {
        assert_eq!(
            g.outgoing(i as i64, Symbol::A),
            want,
            "outgoing(.,A) mismatch at line {i}"
        );
    }
}

#[test]
fn s3_outgoing_c_matches_expected_table() {
    let g = s3_graph();
    let expected = [7, 7, 7, 8, 8, 9, -1, -1, -1, -1, -1, -1, -1, -1, -1];
    for (i, want) in expected.into_iter().enumerate() {
        assert_eq!(
            g.outgoing(i as i64, Symbol::C),
            want,
            "outgoing(.,C) mismatch at line {i}"
        );
    }
}

#[test]
fn s3_outgoing_g_matches_expected_table() {
    let g = s3_graph();
    let expected = [11, 11, 11, 12, 12, -1, -1, -1, -1, -1, 13, 13, 14, -1, -1];
    for (i, want) in expected.into_iter().enumerate() {
        assert_eq!(
            g.outgoing(i as i64, Symbol::G),
            want,
            "outgoing(.,G) mismatch at line {i}"
        );
    }
}

#[test]
fn s3_outgoing_t_and_dollar_are_always_absent() {
    let g = s3_graph();
    for i in 0..g.size() as i64 {
        assert_eq!(g.outgoing(i, Symbol::T), -1, "outgoing(.,T) at line {i}");
        assert_eq!(
            g.outgoing(i, Symbol::Dollar),
            -1,
            "outgoing(.,$) at line {i}"
        );
    }
}

#[test]
fn s3_shorten_lower_ctx_1_matches_expected_table() {
    let g = s3_graph();
    let expected = [-1, -1, -1, -1, 3, 3, 3, -1, 7, 7, -1, 10, 10, 10, 10];
    for (i, want) in expected.into_iter().enumerate() {
        assert_eq!(
            g.shorten_lower(i as i64, 1),
            want,
            "shorten_lower(.,1) mismatch at line {i}"
        );
    }
}

#[test]
fn s3_shorten_lower_ctx_2_matches_expected_table() {
    let g = s3_graph();
    let expected = [-1, -1, -1, -1, -1, -1, 5, -1, -1, 8, -1, -1, -1, -1, 13];
    for (i, want) in expected.into_iter().enumerate() {
        assert_eq!(
            g.shorten_lower(i as i64, 2),
            want,
            "shorten_lower(.,2) mismatch at line {i}"
        );
    }
}

#[test]
fn s4_rank_on_fresh_init_graph() {
    let g = DeBruijnGraph::init(4, EscapeMode::CountLines, CslMode::Integer);
    assert_eq!(g.rank(5, Target::L(true)), 5);
    assert_eq!(g.rank(5, Target::W(Symbol::A)), 1);
}

#[test]
fn s5_insert_then_forward() {
    let mut g = DeBruijnGraph::init(4, EscapeMode::CountLines, CslMode::Integer);
    let line = GraphLine::simple(false, Symbol::A, 1);
    g.line_insert(1, line).expect("insert within bounds");

    assert_eq!(g.size(), 6);
    assert_eq!(g.f()[0], 2);
    assert!(g.forward(1) >= 0, "Forward(1) should be a valid index");
}
