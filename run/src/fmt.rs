//! Diagnostic memory dumps.

use std::fmt;
use std::fmt::Display;

use crate::computer::Computer;
use crate::mem::Memory;

const ROW: usize = 10;

/// Rows of memory either side of the row being reported on.
const CONTEXT: usize = 2;

/// An owned excerpt of memory around an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    ptr: usize,
    start: usize,
    values: Vec<i64>,
}

impl Region {
    pub(crate) fn around(mem: &Memory, ptr: usize) -> Self {
        let row = ptr / ROW;
        let start = row.saturating_sub(CONTEXT) * ROW;
        let end = (row + CONTEXT + 1) * ROW;
        Self {
            ptr,
            start,
            values: mem.range(start, end - start),
        }
    }

    /// The address of the first value in the excerpt.
    pub fn start(&self) -> usize {
        self.start
    }

    pub fn values(&self) -> &[i64] {
        &self.values
    }
}

fn header(f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:>8}", "")?;
    for col in 0..ROW {
        write!(f, " {:>8}", col)?;
    }
    writeln!(f)?;
    writeln!(f, "{}", "-".repeat(8 + 9 * ROW))
}

fn rows(f: &mut fmt::Formatter<'_>, start: usize, values: &[i64], ptr: usize) -> fmt::Result {
    for (i, chunk) in values.chunks(ROW).enumerate() {
        let base = start + i * ROW;
        write!(f, "{:>7}:", base)?;
        for (j, value) in chunk.iter().enumerate() {
            if base + j == ptr {
                write!(f, ">{:>8}", value)?;
            } else {
                write!(f, " {:>8}", value)?;
            }
        }
        writeln!(f)?;
    }
    Ok(())
}

impl Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        header(f)?;
        rows(f, self.start, &self.values, self.ptr)
    }
}

impl Display for Computer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ptr: {}", self.ptr())?;
        writeln!(f, "relative base: {}", self.relative_base())?;
        writeln!(f, "state: {:?}", self.state())?;
        header(f)?;
        let mem = self.mem();
        let dense = mem.as_slice();
        rows(f, 0, dense, self.ptr())?;
        for (addr, value) in mem.iter().skip(dense.len()) {
            writeln!(f, "{:>7}: {:>8}", addr, value)?;
        }
        Ok(())
    }
}
