//! The derived, read-only table projection.
//!
//! `TableModel` is what a view renders: one [`TableRow`] per row stub, each
//! holding that row's cells in column order. It is regenerated from the
//! registries and the cell store on every change and never patched in place.

use serde::Serialize;

use crate::cell::Cell;

/// One row of the projection: the stub plus its cells in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableRow {
    row_stub: String,
    cells: Vec<Cell>,
}

impl TableRow {
    /// The row's stub.
    pub fn row_stub(&self) -> &str {
        &self.row_stub
    }

    /// The row's cells, ordered by the active column heads.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// Row-major projection of the table for presentation.
///
/// Row order matches the row-stub registry; cell order within each row
/// matches the column-head registry. Cells belonging to locked but
/// currently absent heads or stubs do not appear here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TableModel {
    rows: Vec<TableRow>,
}

impl TableModel {
    /// Build the projection from the active registries and the cell store.
    ///
    /// Stub-major, head-major nested iteration; pairs without a matching
    /// cell are skipped (the reconciler guarantees there are none after a
    /// settle).
    pub(crate) fn build(column_heads: &[String], row_stubs: &[String], cells: &[Cell]) -> Self {
        let mut rows = Vec::with_capacity(row_stubs.len());
        for stub in row_stubs {
            let mut row = TableRow {
                row_stub: stub.clone(),
                cells: Vec::with_capacity(column_heads.len()),
            };
            for head in column_heads {
                if let Some(cell) = cells.iter().find(|c| c.is_at(head, stub)) {
                    row.cells.push(cell.clone());
                }
            }
            rows.push(row);
        }
        Self { rows }
    }

    /// The projected rows.
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Number of projected rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// `true` if the projection holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The cell at the given intersection, if projected.
    pub fn cell(&self, column_head: &str, row_stub: &str) -> Option<&Cell> {
        self.rows
            .iter()
            .find(|r| r.row_stub == row_stub)?
            .cells
            .iter()
            .find(|c| c.column_head == column_head)
    }
}
