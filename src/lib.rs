//! # BASIC engine
//!
//! A BASIC interpreter that keeps everything it runs in a flat 64K byte
//! store reached only through block reads and writes. Programs are
//! tokenized into line records and executed in place; variables, arrays,
//! the FOR/GOSUB stack and strings share the same store.
//!
//! ```
//! use basic::mach::{Event, Runtime};
//! let mut runtime = Runtime::default();
//! runtime.enter("PRINT 2+3*4");
//! assert_eq!(runtime.execute(100), Event::Print("14\n".to_string()));
//! assert_eq!(runtime.execute(100), Event::Stopped);
//! ```
//!
//! The host drives the machine: `enter` feeds it a line, `execute` runs
//! statements until there is output to show, an `INPUT` to answer, an
//! error to report, or nothing left to do.

pub mod lang;
pub mod mach;
