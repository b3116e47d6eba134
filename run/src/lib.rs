//! An Intcode computer.
//!
//! A [`Computer`] is constructed from a program and driven by calling
//! [`Computer::run`] with input. Each call executes until the program halts or
//! until it needs input that has not been supplied yet, and returns the output
//! produced along the way.
//!
//! ```
//! use intcode_run::{Computer, State};
//!
//! let mut c = Computer::new(&[3, 0, 4, 0, 99]);
//! assert_eq!(c.run([]).unwrap(), Vec::<i64>::new());
//! assert_eq!(c.state(), State::AwaitingInput);
//! assert_eq!(c.run([7]).unwrap(), [7]);
//! assert_eq!(c.state(), State::Halted);
//! ```

mod computer;
pub mod decode;
mod error;
mod fmt;
pub mod io;
mod mem;
pub mod network;
pub mod parse;
pub mod screen;

pub use crate::computer::{Computer, State};
pub use crate::error::{Error, Result};
pub use crate::fmt::Region;
pub use crate::mem::Memory;
