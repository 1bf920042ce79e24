use tracing::debug;

use crate::error::ExecuteError;
use crate::row::Row;
use crate::statement::Statement;
use crate::table::Table;

/// Result of a successfully executed statement.
#[derive(Debug)]
pub enum Outcome<'a> {
    Inserted,
    Selected(Rows<'a>),
}

/// Applies `statement` to `table`.
pub fn execute(statement: Statement, table: &mut Table) -> Result<Outcome<'_>, ExecuteError> {
    match statement {
        Statement::Insert(row) => {
            execute_insert(&row, table)?;
            Ok(Outcome::Inserted)
        }
        Statement::Select => Ok(Outcome::Selected(execute_select(table))),
    }
}

pub fn execute_insert(row: &Row, table: &mut Table) -> Result<(), ExecuteError> {
    if !table.has_capacity() {
        debug!(id = row.id, rows = table.row_count(), "table full, insert rejected");
        return Err(ExecuteError::TableFull);
    }

    let index = table.row_count();
    row.encode_into(table.slot_for(index));
    table.commit_append();
    debug!(id = row.id, index, "row inserted");

    Ok(())
}

pub fn execute_select(table: &Table) -> Rows<'_> {
    Rows::new(table)
}

/// Cursor over the stored rows in insertion order.
///
/// Rows are decoded from the pages as the cursor advances; a new cursor
/// starts again from the first row.
#[derive(Debug, Clone)]
pub struct Rows<'a> {
    table: &'a Table,
    next: usize,
    end: usize,
}

impl<'a> Rows<'a> {
    fn new(table: &'a Table) -> Self {
        Self {
            table,
            next: 0,
            end: table.row_count(),
        }
    }
}

impl Iterator for Rows<'_> {
    type Item = Row;

    fn next(&mut self) -> Option<Row> {
        if self.next >= self.end {
            return None;
        }
        let slot = self.table.slot(self.next)?;
        self.next += 1;
        Some(Row::decode(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.end - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows<'_> {}
