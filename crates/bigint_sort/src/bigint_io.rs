//! Loading and writing lists of arbitrary-precision integers as text.

use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::str::FromStr;

use log::info;
use num_bigint::BigInt;

use crate::LoadError;

/// Parses whitespace-separated signed decimal integers.
pub fn read_bigints<R: BufRead>(reader: R) -> Result<Vec<BigInt>, LoadError> {
    let mut values = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        for token in line.split_whitespace() {
            let value = BigInt::from_str(token).map_err(|_| LoadError::Parse {
                line: index + 1,
                token: token.to_owned(),
            })?;
            values.push(value);
        }
    }
    Ok(values)
}

/// Reads every integer from the file at `path`. An empty source is an error.
pub fn load_bigints(path: impl AsRef<Path>) -> Result<Vec<BigInt>, LoadError> {
    let path = path.as_ref();
    let values = read_bigints(BufReader::new(File::open(path)?))?;
    if values.is_empty() {
        return Err(LoadError::Empty);
    }
    info!("loaded {} integers from {}", values.len(), path.display());
    Ok(values)
}

/// Writes each value as lowercase hex followed by a comma.
pub fn write_bigints<W: Write>(mut writer: W, values: &[BigInt]) -> std::io::Result<()> {
    for value in values {
        write!(writer, "{value:x},")?;
    }
    writer.flush()
}
