use core_text::TextError;
use std::fmt;
use thiserror::Error;

/// Which half of a delimiter pair a scan was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Open,
    Close,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Open => f.write_str("opening"),
            Side::Close => f.write_str("closing"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurroundError {
    /// A typed key is outside the delimiter set; aborts the in-flight command.
    #[error("`{0}` is not a supported surround delimiter")]
    InvalidDelimiter(char),
    /// Pair lookup failed for a key that should have been validated upstream.
    #[error("no delimiter pair registered for `{0}`")]
    UnknownDelimiter(char),
    /// Only surfaced under `NotFoundPolicy::Abort`.
    #[error("{side} delimiter `{delimiter}` not found on the cursor line")]
    NotFound { side: Side, delimiter: char },
    #[error("command cancelled")]
    Cancelled,
    #[error("command executed before its input was complete")]
    Incomplete,
    #[error("no command registered as <Plug>{0}")]
    UnknownCommand(String),
    #[error(transparent)]
    Text(#[from] TextError),
}
