//! An in-memory, single-table row store driven by a line-oriented interpreter.
//!
//! Rows have a fixed layout (`id`, `username`, `email`) and are packed into
//! fixed-size pages that the [`Table`] allocates on first use.

pub mod command;
pub mod error;
pub mod executor;
pub mod repl;
pub mod row;
pub mod statement;
pub mod table;

pub use command::{InputType, MetaCommand};
pub use error::{Error, ExecuteError, MetaCommandError, PrepareError, Result};
pub use executor::{Outcome, Rows, execute};
pub use repl::{Control, InputBuffer, Session};
pub use row::Row;
pub use statement::{Statement, prepare};
pub use table::{Table, TableConfig};

pub const COLUMN_USERNAME_SIZE: usize = 32;
pub const COLUMN_EMAIL_SIZE: usize = 255;
pub const ID_SIZE: usize = size_of::<u32>();
pub const USERNAME_SIZE: usize = COLUMN_USERNAME_SIZE;
pub const EMAIL_SIZE: usize = COLUMN_EMAIL_SIZE;

pub const ID_OFFSET: usize = 0;
pub const USERNAME_OFFSET: usize = ID_OFFSET + ID_SIZE;
pub const EMAIL_OFFSET: usize = USERNAME_OFFSET + USERNAME_SIZE;
pub const ROW_SIZE: usize = ID_SIZE + USERNAME_SIZE + EMAIL_SIZE;

pub const PAGE_SIZE: usize = 4096;
pub const TABLE_MAX_PAGES: usize = 100;
pub const ROWS_PER_PAGE: usize = PAGE_SIZE / ROW_SIZE;
pub const TABLE_MAX_ROWS: usize = ROWS_PER_PAGE * TABLE_MAX_PAGES;
