//! Paged search list state machine.
//!
//! # Responsibility
//! - Keep the full row snapshot, the live search text, the page size and the
//!   page index consistent with each other.
//! - Tag the visible window through an injected classifier.
//!
//! # Invariants
//! - `0 <= page <= max_page` after every operation.
//! - `max_page == max(0, ceil(total_filtered / page_size) - 1)`.
//! - The classifier only ever sees rows of the current window, and only
//!   when that window changed.

use crate::list::highlight::RowHighlight;
use crate::list::{ListError, TableRow};
use log::debug;
use serde::Serialize;
use std::fmt::{Display, Formatter};

/// Page size used when the requested size is invalid.
pub const DEFAULT_PAGE_SIZE: usize = 50;
/// Page sizes offered to users.
pub const PAGE_SIZE_CHOICES: [usize; 5] = [10, 20, 50, 100, 200];

/// Row classifier invoked for visible rows.
pub type Classifier<T> = Box<dyn Fn(&[String]) -> Option<T>>;

/// Pagination metadata for the current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Zero-based page index.
    pub page: usize,
    pub max_page: usize,
    pub page_size: usize,
    pub total_filtered: usize,
    pub has_prev: bool,
    pub has_next: bool,
}

impl Display for PageInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Page {}/{} • total: {}",
            self.page + 1,
            self.max_page + 1,
            self.total_filtered
        )
    }
}

/// In-memory paged, searchable, taggable view over string rows.
pub struct PagedSearchList<T = RowHighlight> {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
    search_text: String,
    needle: String,
    /// Indexes into `rows` matching the search, in snapshot order.
    filtered: Vec<usize>,
    page_size: usize,
    page: usize,
    classifier: Option<Classifier<T>>,
    page_tags: Vec<Option<T>>,
    tags_stale: bool,
}

impl<T> PagedSearchList<T> {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
            search_text: String::new(),
            needle: String::new(),
            filtered: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            page: 0,
            classifier: None,
            page_tags: Vec::new(),
            tags_stale: true,
        }
    }

    /// Creates a list with the columns of a [`TableRow`] type.
    pub fn for_records<R: TableRow>() -> Self {
        Self::new(R::columns().iter().copied())
    }

    /// Installs the classifier and tags the current window with it.
    pub fn with_classifier<F>(mut self, classifier: F) -> Self
    where
        F: Fn(&[String]) -> Option<T> + 'static,
    {
        self.classifier = Some(Box::new(classifier));
        self.tags_stale = true;
        self.retag();
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Replaces the snapshot, reapplies the search and returns to page 0.
    ///
    /// # Errors
    /// - Returns [`ListError::RowWidth`] when a row does not have one cell
    ///   per column; the previous state is kept.
    pub fn load(&mut self, rows: Vec<Vec<String>>) -> Result<(), ListError> {
        if let Some((row_index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != self.columns.len())
        {
            return Err(ListError::RowWidth {
                row_index,
                expected: self.columns.len(),
                actual: row.len(),
            });
        }

        self.rows = rows;
        self.apply_search();
        self.show_page(0);
        debug!(
            "event=list_load module=list status=ok rows={} filtered={}",
            self.rows.len(),
            self.filtered.len()
        );
        Ok(())
    }

    /// Loads typed records through their [`TableRow`] cells.
    pub fn load_records<R: TableRow>(&mut self, records: &[R]) -> Result<(), ListError> {
        self.load(records.iter().map(TableRow::cells).collect())
    }

    /// Sets the live search text and returns to page 0.
    ///
    /// Matching is a case-insensitive substring test against every cell;
    /// blank text matches every row.
    pub fn set_search(&mut self, text: &str) {
        self.search_text = text.trim().to_string();
        self.needle = self.search_text.to_lowercase();
        self.apply_search();
        self.show_page(0);
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    /// Sets the page size; non-positive values fall back to the default.
    pub fn set_page_size(&mut self, size: i64) {
        self.page_size = usize::try_from(size)
            .ok()
            .filter(|size| *size > 0)
            .unwrap_or(DEFAULT_PAGE_SIZE);
        self.tags_stale = true;
        self.show_page(0);
    }

    /// Sets the page size from user text; unparsable text falls back to the
    /// default.
    pub fn set_page_size_text(&mut self, raw: &str) {
        let size = raw.trim().parse::<i64>().unwrap_or(0);
        self.set_page_size(size);
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn next_page(&mut self) {
        self.show_page(self.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.show_page(self.page.saturating_sub(1));
    }

    /// Moves to `page`, clamped to the valid range.
    pub fn go_to_page(&mut self, page: usize) {
        self.show_page(page);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn max_page(&self) -> usize {
        self.filtered.len().saturating_sub(1) / self.page_size
    }

    pub fn total_filtered(&self) -> usize {
        self.filtered.len()
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Rows of the current window, in snapshot order.
    pub fn visible_rows(&self) -> Vec<&[String]> {
        self.window()
            .iter()
            .map(|&index| self.rows[index].as_slice())
            .collect()
    }

    /// Tags of the current window, aligned with [`Self::visible_rows`].
    ///
    /// Empty when no classifier is installed.
    pub fn visible_tags(&self) -> &[Option<T>] {
        &self.page_tags
    }

    /// Visible rows paired with their tag.
    pub fn visible(&self) -> impl Iterator<Item = (&[String], Option<&T>)> + '_ {
        self.window().iter().enumerate().map(move |(offset, &index)| {
            let tag = self.page_tags.get(offset).and_then(Option::as_ref);
            (self.rows[index].as_slice(), tag)
        })
    }

    pub fn page_info(&self) -> PageInfo {
        let max_page = self.max_page();
        PageInfo {
            page: self.page,
            max_page,
            page_size: self.page_size,
            total_filtered: self.filtered.len(),
            has_prev: self.page > 0,
            has_next: self.page < max_page,
        }
    }

    fn apply_search(&mut self) {
        self.filtered = if self.needle.is_empty() {
            (0..self.rows.len()).collect()
        } else {
            let needle = self.needle.as_str();
            self.rows
                .iter()
                .enumerate()
                .filter(|(_, row)| row.iter().any(|cell| cell.to_lowercase().contains(needle)))
                .map(|(index, _)| index)
                .collect()
        };
        self.tags_stale = true;
    }

    fn show_page(&mut self, page: usize) {
        let clamped = page.min(self.max_page());
        if clamped != self.page {
            self.page = clamped;
            self.tags_stale = true;
        }
        self.retag();
    }

    fn window(&self) -> &[usize] {
        let start = (self.page * self.page_size).min(self.filtered.len());
        let end = start.saturating_add(self.page_size).min(self.filtered.len());
        &self.filtered[start..end]
    }

    fn retag(&mut self) {
        if !self.tags_stale {
            return;
        }
        self.page_tags = match &self.classifier {
            Some(classify) => self
                .window()
                .iter()
                .map(|&index| classify(&self.rows[index]))
                .collect(),
            None => Vec::new(),
        };
        self.tags_stale = false;
    }
}
