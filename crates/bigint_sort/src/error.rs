use thiserror::Error;

/// Failures surfaced by the sort entry points.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SortError {
    /// A scratch buffer could not be allocated.
    #[error("out of memory allocating {buffer} of {len} entries")]
    OutOfMemory { buffer: &'static str, len: usize },

    #[error("invalid sort configuration: {0}")]
    InvalidConfig(&'static str),
}

/// Failures while loading integers from a text source.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read integer source")]
    Io(#[from] std::io::Error),

    #[error("line {line}: `{token}` is not a decimal integer")]
    Parse { line: usize, token: String },

    #[error("no integers read from source")]
    Empty,
}
