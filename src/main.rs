//! # BASIC
//!
//! `basic [FILE]` starts the interactive interpreter, loading and
//! running FILE first when one is given.

mod term;

fn main() {
    term::main()
}
