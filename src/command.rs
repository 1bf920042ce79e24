use crate::error::{MetaCommandError, PrepareError};
use crate::statement::{Statement, prepare};

// Non-SQL statements like .exit are called "meta-commands".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaCommand {
    Exit,
}

impl MetaCommand {
    pub fn parse(input: &str) -> Result<MetaCommand, MetaCommandError> {
        match input {
            ".exit" => Ok(MetaCommand::Exit),
            _ => Err(MetaCommandError::Unrecognized(input.to_string())),
        }
    }
}

/// What one input line turned out to be.
#[derive(Debug, PartialEq, Eq)]
pub enum InputType {
    Meta(Result<MetaCommand, MetaCommandError>),
    Statement(Result<Statement, PrepareError>),
}

impl InputType {
    pub fn parse(input: &str) -> InputType {
        if input.starts_with('.') {
            InputType::Meta(MetaCommand::parse(input))
        } else {
            InputType::Statement(prepare(input))
        }
    }
}
