use thiserror::Error;

/// Failure to run a dot-prefixed meta-command.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum MetaCommandError {
    #[error("Unrecognized command '{0}'.")]
    Unrecognized(String),
}

/// Failure to compile a line into a [`Statement`](crate::Statement).
#[derive(Error, Debug, PartialEq, Eq)]
pub enum PrepareError {
    #[error("Syntax error. Could not parse statement. ")]
    SyntaxError,

    #[error("Unrecognized keyword at start of '{0}'. ")]
    UnrecognizedStatement(String),

    #[error("String is too long.")]
    StringTooLong,

    #[error("ID must be positive.")]
    NegativeId,
}

/// Failure to apply a compiled statement to the table.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ExecuteError {
    #[error("Error: Table full. ")]
    TableFull,
}

/// Unrecoverable interpreter errors. Everything else is reported and the loop continues.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to read input: {0}")]
    ReadInput(#[source] std::io::Error),

    #[error("input closed before .exit")]
    InputClosed,
}

impl Error {
    /// True when the input side failed, as opposed to writing the responses.
    pub fn is_input_failure(&self) -> bool {
        matches!(self, Error::ReadInput(_) | Error::InputClosed)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
