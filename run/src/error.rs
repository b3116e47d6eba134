use std::num::ParseIntError;
use std::result;

use thiserror::Error;

use crate::fmt::Region;

pub type Result<T> = result::Result<T, Error>;

/// An error that stops a computer.
///
/// Running out of input is *not* an error, see
/// [`State::AwaitingInput`][crate::State::AwaitingInput].
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown opcode `{opcode}` in instruction `{word}` at address {ptr}\n{region}")]
    UnknownOpcode {
        opcode: i64,
        word: i64,
        ptr: usize,
        region: Region,
    },

    #[error("unknown mode `{mode}` in instruction `{word}` at address {ptr}")]
    UnknownMode { mode: i64, word: i64, ptr: usize },

    #[error("instruction `{word}` at address {ptr} writes to an immediate parameter")]
    ImmediateWrite { word: i64, ptr: usize },

    #[error("negative address `{addr}` accessed by the instruction at address {ptr}")]
    NegativeAddress { addr: i64, ptr: usize },

    #[error("instruction `{word}` at address {ptr} overflowed")]
    Overflow { word: i64, ptr: usize },

    #[error("computer has already halted")]
    Halted,

    #[error("machine {index} produced no signal")]
    NoSignal { index: usize },

    #[error("failed to parse `{value}` as an integer")]
    Parse {
        value: String,
        #[source]
        source: ParseIntError,
    },
}
