use crate::error::{Error, Result};

/// Parse a program from comma separated integers.
///
/// Whitespace around the program and around each value is ignored.
pub fn program(input: &str) -> Result<Vec<i64>> {
    input
        .trim()
        .split(',')
        .map(str::trim)
        .map(|value| {
            value.parse().map_err(|source| Error::Parse {
                value: value.to_owned(),
                source,
            })
        })
        .collect()
}
