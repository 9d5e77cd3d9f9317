/*!
## Rust Machine Module

This Rust module is the virtual machine that runs tokenized BASIC
directly out of a flat 64K memory store.

*/

/// Byte address in the memory store. Zero is never a valid address.
pub type Address = u16;

mod arena;
mod builtin;
mod command;
mod config;
mod control;
mod device;
mod eval;
mod files;
mod flow;
mod format;
mod function;
mod heap;
mod io;
mod memory;
mod operation;
mod program;
mod renum;
mod runtime;
mod stack;
mod stream;
mod val;
mod var;

pub use arena::{Layout, Memory, Region, CMD_LINE_LEN, HEADER, SIZE_CLASSES};
pub use config::Config;
pub use control::{ControlStack, ForLoop, Frame, Resume, FOR_LEN, GOSUB_LEN};
pub use device::{Display, KeyQueue, Keyboard, Screen, GRAPHICS};
pub use files::{program_name, DiskFiles, FileSystem, MemoryFiles};
pub use format::{parse_using, Digits, Field, NumericFormatter, StdFormatter, Using};
pub use function::{Function, Param};
pub use memory::{MemoryStore, RamStore};
pub use operation::Operation;
pub use runtime::{Event, Runtime};
pub use stack::Stack;
pub use stream::{StreamCache, WINDOW};
pub use val::{StrRef, Val};
pub use var::SLOT_LEN;

#[cfg(test)]
mod tests;
