use std::io;
use std::io::prelude::*;
use std::io::{BufReader, BufWriter};
use std::mem;

use anyhow::{bail, Result};
use run::io::Io;
use run::{Computer, State};

/// Drive the computer from the terminal until it halts.
///
/// Output is written to stdout as it arrives. Whenever the computer needs
/// input a line is read from stdin and converted using the given encoding.
pub fn interactive(c: &mut Computer, encoding: impl Io, feed: Vec<i64>) -> Result<()> {
    let mut r = BufReader::new(io::stdin());
    let mut w = BufWriter::new(io::stdout());
    let mut input = feed;
    loop {
        for value in c.run(mem::take(&mut input))? {
            encoding.output(&mut w, value)?;
        }
        w.flush()?;
        match c.state() {
            State::AwaitingInput => input = read_input(&mut r, &encoding)?,
            _ => break Ok(()),
        }
    }
}

/// Read lines until one of them carries at least one value.
fn read_input(mut r: impl BufRead, encoding: &impl Io) -> Result<Vec<i64>> {
    loop {
        let mut line = String::new();
        if r.read_line(&mut line)? == 0 {
            bail!("reached the end of stdin but the program wants more input");
        }
        let values = encoding.input(&line)?;
        if !values.is_empty() {
            break Ok(values);
        }
    }
}
