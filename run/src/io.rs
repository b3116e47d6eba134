//! Encodings used to talk to a computer from a terminal.

use std::io;
use std::io::prelude::*;

use crate::error::Result;
use crate::parse;

pub trait Io {
    /// Convert a line read from the terminal into input values.
    fn input(&self, line: &str) -> Result<Vec<i64>>;

    /// Write a single output value to the terminal.
    fn output(&self, w: impl Write, value: i64) -> io::Result<()>;
}

/// Values are written as decimal numbers, one per line. Input lines are comma
/// separated numbers, blank lines carry no input.
#[derive(Debug, Clone, Copy)]
pub struct Basic;

/// Values are bytes. Each byte of an input line, including the newline, is a
/// value.
///
/// Values that don't fit in a byte are written as decimal numbers on their
/// own line since programs use them to report a final answer.
#[derive(Debug, Clone, Copy)]
pub struct Utf8;

impl Io for Basic {
    fn input(&self, line: &str) -> Result<Vec<i64>> {
        if line.trim().is_empty() {
            return Ok(Vec::new());
        }
        parse::program(line)
    }

    fn output(&self, mut w: impl Write, value: i64) -> io::Result<()> {
        writeln!(w, "{}", value)
    }
}

impl Io for Utf8 {
    fn input(&self, line: &str) -> Result<Vec<i64>> {
        Ok(line.bytes().map(i64::from).collect())
    }

    fn output(&self, mut w: impl Write, value: i64) -> io::Result<()> {
        match u8::try_from(value) {
            Ok(byte) => w.write_all(&[byte]),
            Err(_) => writeln!(w, "{}", value),
        }
    }
}
