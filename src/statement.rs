use crate::error::PrepareError;
use crate::row::Row;
use crate::{EMAIL_SIZE, USERNAME_SIZE};

/// A compiled, executable command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Insert(Row),
    Select,
}

/// Compiles one input line into a [`Statement`].
///
/// `insert` takes exactly three whitespace-separated fields: an integer id, a
/// username and an email. `select` takes none.
pub fn prepare(input: &str) -> Result<Statement, PrepareError> {
    if let Some(args) = input.strip_prefix("insert") {
        if args.is_empty() || args.starts_with(char::is_whitespace) {
            return prepare_insert(args);
        }
    }

    if input == "select" {
        return Ok(Statement::Select);
    }

    Err(PrepareError::UnrecognizedStatement(input.to_string()))
}

fn prepare_insert(args: &str) -> Result<Statement, PrepareError> {
    let mut fields = args.split_whitespace();
    let (Some(id), Some(username), Some(email), None) =
        (fields.next(), fields.next(), fields.next(), fields.next())
    else {
        return Err(PrepareError::SyntaxError);
    };

    let id: i64 = id.parse().map_err(|_| PrepareError::SyntaxError)?;
    if id < 0 {
        return Err(PrepareError::NegativeId);
    }
    let id = u32::try_from(id).map_err(|_| PrepareError::SyntaxError)?;

    // NUL pads the stored columns, so it cannot appear inside a value.
    if username.contains('\0') || email.contains('\0') {
        return Err(PrepareError::SyntaxError);
    }

    if username.len() > USERNAME_SIZE || email.len() > EMAIL_SIZE {
        return Err(PrepareError::StringTooLong);
    }

    Ok(Statement::Insert(Row::new(id, username, email)))
}
