/*!
# Rust Language Module

This Rust module converts BASIC source text to and from the binary
token stream the machine executes.

*/

/// Program line number. `None` is a direct mode statement.
pub type LineNumber = Option<u16>;

/// Range of 1-based character offsets into a source line.
pub type Column = std::ops::Range<usize>;

/// Highest line number a program may use.
pub const MAX_LINE_NUMBER: u16 = 65534;

/// Line number stored in the header of a direct mode statement.
pub const DIRECT_LINE: u16 = 0xFFFF;

#[macro_use]
mod error;
mod detokenize;
mod hash;
mod line;
mod tokenize;

pub mod number;
pub mod token;

pub use detokenize::detokenize;
pub use error::Error;
pub use error::ErrorCode;
pub use hash::{VarHash, VarType};
pub use line::Line;
pub use tokenize::{tokenize, MAX_BODY, MAX_NAME};

#[cfg(test)]
mod tests;
