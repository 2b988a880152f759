//! Paged, searchable, taggable list view-state.
//!
//! # Responsibility
//! - Hold a row snapshot and derive the filtered, paged window from it.
//! - Tag only the rows of the current window.
//!
//! # Invariants
//! - The component is storage- and toolkit-agnostic: string cells in,
//!   string cells plus tags out.

pub mod highlight;
pub mod paged;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Record that can be shown as one table row.
pub trait TableRow {
    /// Column headers, one per cell.
    fn columns() -> &'static [&'static str];
    /// Cell values in column order.
    fn cells(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListError {
    /// A loaded row does not have one cell per column.
    RowWidth {
        row_index: usize,
        expected: usize,
        actual: usize,
    },
}

impl Display for ListError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RowWidth {
                row_index,
                expected,
                actual,
            } => write!(
                f,
                "row {row_index} has {actual} cells, expected {expected}"
            ),
        }
    }
}

impl Error for ListError {}
