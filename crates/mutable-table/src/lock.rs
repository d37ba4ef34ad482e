//! Locking for column heads and row stubs.
//!
//! A lock marks a head or stub as non-removable: the entry itself can be
//! taken out of the active registry, but its cells survive. Orphaned locked
//! cells are moved into the cache held here and restored, with their
//! original values, when the head or stub reappears (including across a
//! full re-initialization).

use crate::cell::Cell;

/// Membership records for locked heads and stubs, plus the locked-cell cache.
///
/// Lock and unlock operations are idempotent. Unlocking purges the cache
/// entries for that name, so previously cached cells stop surviving
/// structural edits.
#[derive(Debug, Default)]
pub struct LockRegistry {
    columns: Vec<String>,
    rows: Vec<String>,
    cache: Vec<Cell>,
}

impl LockRegistry {
    /// Create an empty lock registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a column head as locked. Idempotent.
    pub fn lock_column(&mut self, head: impl Into<String>) {
        let head = head.into();
        if !self.columns.contains(&head) {
            tracing::debug!(target: "mutable_table::locks", column = %head, "locking column");
            self.columns.push(head);
        }
    }

    /// Mark a row stub as locked. Idempotent.
    pub fn lock_row(&mut self, stub: impl Into<String>) {
        let stub = stub.into();
        if !self.rows.contains(&stub) {
            tracing::debug!(target: "mutable_table::locks", row = %stub, "locking row");
            self.rows.push(stub);
        }
    }

    /// Remove a column lock and purge its cached cells.
    pub fn unlock_column(&mut self, name: &str) {
        self.columns.retain(|c| c != name);
        self.cache.retain(|cell| cell.column_head != name);
        tracing::debug!(target: "mutable_table::locks", column = %name, "unlocked column");
    }

    /// Remove a row lock and purge its cached cells.
    pub fn unlock_row(&mut self, name: &str) {
        self.rows.retain(|r| r != name);
        self.cache.retain(|cell| cell.row_stub != name);
        tracing::debug!(target: "mutable_table::locks", row = %name, "unlocked row");
    }

    /// `true` if the column head is locked.
    pub fn is_locked_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// `true` if the row stub is locked.
    pub fn is_locked_row(&self, name: &str) -> bool {
        self.rows.iter().any(|r| r == name)
    }

    /// The locked column heads, in lock order.
    pub fn locked_columns(&self) -> &[String] {
        &self.columns
    }

    /// The locked row stubs, in lock order.
    pub fn locked_rows(&self) -> &[String] {
        &self.rows
    }

    /// The cached cells currently surviving outside the active store.
    pub fn cached_cells(&self) -> &[Cell] {
        &self.cache
    }

    /// `true` if either of the cell's coordinates is locked.
    pub(crate) fn is_cell_locked(&self, cell: &Cell) -> bool {
        self.is_locked_column(&cell.column_head) || self.is_locked_row(&cell.row_stub)
    }

    /// Insert or refresh a cache entry, keyed by the cell's identity.
    pub(crate) fn cache_cell(&mut self, cell: Cell) {
        if let Some(existing) = self.cache.iter_mut().find(|c| c.key() == cell.key()) {
            *existing = cell;
        } else {
            self.cache.push(cell);
        }
    }

    /// A cached cell for the given intersection, if any.
    pub(crate) fn cached_cell(&self, column_head: &str, row_stub: &str) -> Option<&Cell> {
        self.cache.iter().find(|c| c.is_at(column_head, row_stub))
    }
}
