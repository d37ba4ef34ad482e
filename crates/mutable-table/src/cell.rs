//! The cell record: a value at a (column, row) intersection.

use serde::{Deserialize, Serialize};

/// A single table cell.
///
/// Identity is the `(column_head, row_stub)` pair; the table maintains at
/// most one cell per pair. Cells are created and destroyed only by the
/// table's reconciler: callers mutate values, never the set of cells
/// (except through a full [`init_from_cells`](crate::MutableTable::init_from_cells)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    /// The column this cell belongs to.
    pub column_head: String,
    /// The row this cell belongs to.
    pub row_stub: String,
    /// The displayed value.
    pub value: String,
    /// Checkbox state, present only for tables in checkbox mode.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
}

impl Cell {
    /// Create a cell at the given intersection.
    pub fn new(
        column_head: impl Into<String>,
        row_stub: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            column_head: column_head.into(),
            row_stub: row_stub.into(),
            value: value.into(),
            checked: None,
        }
    }

    /// Set the checkbox state (builder style).
    pub fn with_checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    /// The identity of this cell.
    pub fn key(&self) -> (&str, &str) {
        (&self.column_head, &self.row_stub)
    }

    /// `true` if this cell sits at the given intersection.
    pub fn is_at(&self, column_head: &str, row_stub: &str) -> bool {
        self.column_head == column_head && self.row_stub == row_stub
    }
}
