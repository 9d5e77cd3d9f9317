use super::*;
use crate::lang::{tokenize, ErrorCode, VarHash, VarType};

mod control_test;
mod eval_test;
mod heap_test;
mod stream_test;

fn memory() -> Memory {
    let config = Config {
        ram_top: 0x3FFF,
        ..Config::default()
    };
    Memory::new(Box::new(RamStore::new(config.ram_top)), &config)
}

fn store(mem: &mut Memory, s: &str) {
    match tokenize(s) {
        Ok(line) => {
            if let Err(e) = mem.store_line(&line) {
                panic!("{} => {}", s, e)
            }
        }
        Err(e) => panic!("{} => {}", s, e),
    }
}

fn numbers(mem: &Memory) -> Vec<u16> {
    mem.lines()
        .into_iter()
        .map(|addr| mem.line_number_at(addr))
        .collect()
}

fn float_var(name: &str) -> VarHash {
    VarHash::new(VarType::Float, name.as_bytes())
}

fn string_var(name: &str) -> VarHash {
    VarHash::new(VarType::String, name.as_bytes())
}
