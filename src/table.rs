use std::num::NonZeroUsize;

use tracing::debug;

use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_PAGES};

/// A fixed-size block holding `ROWS_PER_PAGE` packed rows.
pub type Page = Box<[u8; PAGE_SIZE]>;

/// Capacity settings for a [`Table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableConfig {
    max_pages: NonZeroUsize,
}

impl TableConfig {
    pub fn new(max_pages: NonZeroUsize) -> Self {
        Self { max_pages }
    }

    pub fn max_pages(&self) -> usize {
        self.max_pages.get()
    }

    pub fn max_rows(&self) -> usize {
        ROWS_PER_PAGE * self.max_pages()
    }
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_pages: NonZeroUsize::new(TABLE_MAX_PAGES).unwrap_or(NonZeroUsize::MIN),
        }
    }
}

/// The whole database: an append-only sequence of rows spread over lazily
/// allocated pages.
///
/// Row `i` lives in page `i / ROWS_PER_PAGE` at byte offset
/// `(i % ROWS_PER_PAGE) * ROW_SIZE`. Pages are never freed before the table
/// is dropped.
#[derive(Debug)]
pub struct Table {
    pages: Vec<Option<Page>>,
    num_rows: usize,
    config: TableConfig,
}

impl Table {
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    pub fn with_config(config: TableConfig) -> Self {
        Self {
            pages: Vec::new(),
            num_rows: 0,
            config,
        }
    }

    pub fn config(&self) -> TableConfig {
        self.config
    }

    pub fn row_count(&self) -> usize {
        self.num_rows
    }

    pub fn max_rows(&self) -> usize {
        self.config.max_rows()
    }

    pub fn has_capacity(&self) -> bool {
        self.num_rows < self.max_rows()
    }

    /// Number of pages that have been allocated so far.
    pub fn allocated_pages(&self) -> usize {
        self.pages.iter().filter(|page| page.is_some()).count()
    }

    /// Page index and in-page byte offset of a row.
    pub fn locate(row_index: usize) -> (usize, usize) {
        (
            row_index / ROWS_PER_PAGE,
            (row_index % ROWS_PER_PAGE) * ROW_SIZE,
        )
    }

    /// Returns the writable slot of `row_index`, allocating its page on first touch.
    ///
    /// # Panics
    ///
    /// If `row_index` is at or beyond the table's row capacity. Callers check
    /// [`Table::has_capacity`] first.
    pub fn slot_for(&mut self, row_index: usize) -> &mut [u8] {
        let max_rows = self.max_rows();
        assert!(
            row_index < max_rows,
            "row {row_index} is out of bounds for a table of {max_rows} rows"
        );

        let (page_num, byte_offset) = Self::locate(row_index);
        if self.pages.len() <= page_num {
            self.pages.resize_with(page_num + 1, || None);
        }

        let page = self.pages[page_num].get_or_insert_with(|| {
            debug!(page_num, "allocating page");
            Box::new([0u8; PAGE_SIZE])
        });

        &mut page[byte_offset..byte_offset + ROW_SIZE]
    }

    /// Returns the slot of `row_index` if its page has been allocated.
    pub fn slot(&self, row_index: usize) -> Option<&[u8]> {
        let (page_num, byte_offset) = Self::locate(row_index);
        let page = self.pages.get(page_num)?.as_ref()?;
        page.get(byte_offset..byte_offset + ROW_SIZE)
    }

    /// Marks the slot at `row_count()` as holding a row.
    pub(crate) fn commit_append(&mut self) {
        debug_assert!(self.has_capacity());
        self.num_rows += 1;
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Table {
    fn drop(&mut self) {
        debug!(
            pages = self.allocated_pages(),
            rows = self.num_rows,
            "releasing table"
        );
    }
}
