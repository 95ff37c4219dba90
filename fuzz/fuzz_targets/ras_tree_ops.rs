#![no_main]

use arbitrary::Arbitrary;
use debruijn_graph::bitvector::RasTree;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
enum RandomCommand {
    Insert { pos: u16, value: bool },
    Get { pos: u16 },
    Rank1 { pos: u16 },
    Select1 { k: u16 },
    Select0 { k: u16 },
}

#[derive(Arbitrary, Debug)]
struct FuzzCase {
    commands: Vec<RandomCommand>,
}

fuzz_target!(|data: FuzzCase| {
    let mut tree = RasTree::new();
    let mut model: Vec<bool> = Vec::new();

    for command in data.commands {
        match command {
            RandomCommand::Insert { pos, value } => {
                let len = tree.len();
                let pos = if len == 0 { 0 } else { pos as u64 % (len + 1) };
                tree.insert(pos, value);
                model.insert(pos as usize, value);
            }
            RandomCommand::Get { pos } => {
                if !model.is_empty() {
                    let pos = pos as usize % model.len();
                    assert_eq!(tree.get(pos as u64), model[pos]);
                }
            }
            RandomCommand::Rank1 { pos } => {
                let pos = pos as u64 % (tree.len() + 1);
                let expected = model[..pos as usize].iter().filter(|&&b| b).count() as u64;
                assert_eq!(tree.rank1(pos), expected);
            }
            RandomCommand::Select1 { k } => {
                let ones = tree.ones();
                if ones > 0 {
                    let k = (k as u64 % ones) + 1;
                    let pos = tree.select1(k);
                    assert_eq!(tree.get(pos), true);
                    assert_eq!(tree.rank1(pos + 1), k);
                }
            }
            RandomCommand::Select0 { k } => {
                let zeros = tree.len() - tree.ones();
                if zeros > 0 {
                    let k = (k as u64 % zeros) + 1;
                    let pos = tree.select0(k);
                    assert_eq!(tree.get(pos), false);
                }
            }
        }
    }

    tree.check_invariants();
});
