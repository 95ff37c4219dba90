#![no_main]

use arbitrary::Arbitrary;
use debruijn_graph::graph::{EscapeMode, GraphLine, GraphLineStore, CslMode, Symbol};
use debruijn_graph::graph::Target;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum RandomCommand {
    Insert { pos: u16, last: bool, symbol: Symbol, freq: u8 },
    IncreaseFrequency { pos: u16, amount: u8 },
    RankL { pos: u16, bit: bool },
    RankW { pos: u16, symbol: Symbol },
}

#[derive(Arbitrary, Debug)]
struct FuzzCase {
    commands: Vec<RandomCommand>,
}

fuzz_target!(|data: FuzzCase| {
    let mut store = GraphLineStore::new(EscapeMode::CountLines, CslMode::Integer, 12);

    for command in data.commands {
        match command {
            RandomCommand::Insert { pos, last, symbol, freq } => {
                let size = store.size();
                let pos = if size == 0 { 0 } else { pos as u64 % (size + 1) };
                let line = GraphLine::simple(last, symbol, freq as u32);
                store.insert_line(pos, line).expect("pos is within bounds by construction");
            }
            RandomCommand::IncreaseFrequency { pos, amount } => {
                let size = store.size();
                if size > 0 {
                    let pos = pos as u64 % size;
                    store.increase_frequency(pos, amount as u32).unwrap();
                }
            }
            RandomCommand::RankL { pos, bit } => {
                let size = store.size();
                let pos = pos as u64 % (size + 1);
                let _ = store.rank(pos, Target::L(bit));
            }
            RandomCommand::RankW { pos, symbol } => {
                let size = store.size();
                let pos = pos as u64 % (size + 1);
                let _ = store.rank(pos, Target::W(symbol));
            }
        }
    }

    store.check_invariants();
});
