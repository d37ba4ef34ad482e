//! The owning table aggregate and its reconciler.
//!
//! [`MutableTable`] holds the three interdependent collections (column
//! heads, row stubs, and cells) together with the lock registry, the
//! validator, the hook dispatch table, and the (at most one) open edit
//! session. All mutation goes through explicit command methods; each
//! successful structural command runs the reconciler synchronously, which
//! generates missing cells, prunes orphaned non-locked cells, rebuilds the
//! projection, and re-runs validation. There is no implicit change
//! detection.

use crate::cell::Cell;
use crate::config::{EditPolicy, TableConfig};
use crate::edit::{EditSession, EditTarget};
use crate::error::{Error, Result};
use crate::hooks::{Axis, Hook, HookKind, Hooks, RemovalEvent};
use crate::lock::LockRegistry;
use crate::model::TableModel;
use crate::validate::Validator;

/// A mutable grid of rows and columns with inline editing, locking,
/// validation, and lifecycle hooks.
///
/// # Invariants
///
/// After every command returns:
///
/// - Heads and stubs contain no duplicates.
/// - Every active (head, stub) pair has exactly one cell.
/// - Cells whose head or stub left the registries are gone: pruned if
///   unlocked, parked in the lock cache if locked.
/// - The projection's ordering follows the registries.
///
/// # Example
///
/// ```
/// use mutable_table::MutableTable;
///
/// let mut table = MutableTable::new();
/// table.add_column("A");
/// table.add_column("B");
/// table.add_row("r1");
///
/// let row = &table.model().rows()[0];
/// assert_eq!(row.row_stub(), "r1");
/// assert_eq!(row.cells().len(), 2);
/// assert_eq!(row.cells()[0].value, "-");
/// ```
#[derive(Debug, Default)]
pub struct MutableTable {
    column_heads: Vec<String>,
    row_stubs: Vec<String>,
    cells: Vec<Cell>,
    model: TableModel,
    locks: LockRegistry,
    hooks: Hooks,
    validator: Validator,
    policy: EditPolicy,
    session: Option<EditSession>,
    config: TableConfig,
}

impl MutableTable {
    /// Create an empty table with a default config (default value `"-"`).
    pub fn new() -> Self {
        Self::with_config(TableConfig::default())
    }

    /// Create a table and apply a declarative config.
    pub fn with_config(config: TableConfig) -> Self {
        let mut table = Self::default();
        table.apply_config(config);
        table
    }

    /// Apply a declarative config: seed columns and rows, then locks.
    ///
    /// Bracketed by the `BeforeInit` / `AfterInit` hooks. Seeds merge into
    /// the existing registries (first occurrence wins); locked seeds are
    /// self-healed into the registries like any lock. Seeding is a
    /// structural edit, so this is a logged no-op while an edit session is
    /// open.
    pub fn apply_config(&mut self, config: TableConfig) -> bool {
        if self.busy() {
            tracing::warn!(target: "mutable_table::table", "apply_config rejected: table busy");
            return false;
        }
        self.hooks.fire_before_init();
        self.config = config;

        for head in self.config.columns.clone() {
            if !self.column_heads.contains(&head) {
                self.column_heads.push(head);
            }
        }
        for stub in self.config.rows.clone() {
            if !self.row_stubs.contains(&stub) {
                self.row_stubs.push(stub);
            }
        }
        for head in self.config.locked_columns.clone() {
            self.locks.lock_column(head.clone());
            if !self.column_heads.contains(&head) {
                self.column_heads.push(head);
            }
        }
        for stub in self.config.locked_rows.clone() {
            self.locks.lock_row(stub.clone());
            if !self.row_stubs.contains(&stub) {
                self.row_stubs.push(stub);
            }
        }

        self.reconcile();
        self.hooks.fire_after_init();
        true
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The active column heads, in display order.
    pub fn column_heads(&self) -> &[String] {
        &self.column_heads
    }

    /// The active row stubs, in display order.
    pub fn row_stubs(&self) -> &[String] {
        &self.row_stubs
    }

    /// The cell store. Includes no cells for locked-but-absent lines;
    /// those live in the lock cache until their head or stub returns.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The current projection.
    pub fn model(&self) -> &TableModel {
        &self.model
    }

    /// The lock registry.
    pub fn locks(&self) -> &LockRegistry {
        &self.locks
    }

    /// The hook dispatch table.
    pub fn hooks(&self) -> &Hooks {
        &self.hooks
    }

    /// The validator and its accumulated errors.
    pub fn validator(&self) -> &Validator {
        &self.validator
    }

    /// Mutable access to the validator, for installing rules and clearing
    /// errors.
    pub fn validator_mut(&mut self) -> &mut Validator {
        &mut self.validator
    }

    /// The applied config.
    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    /// Install per-line edit/remove predicates.
    pub fn set_policy(&mut self, policy: EditPolicy) {
        self.policy = policy;
    }

    /// `true` while an inline edit session is open. Structural edits are
    /// rejected while busy.
    pub fn busy(&self) -> bool {
        self.session.is_some()
    }

    /// The open edit session, if any.
    pub fn edit_session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    // -------------------------------------------------------------------------
    // Header registry commands
    // -------------------------------------------------------------------------

    /// Append a column head. Logged no-op while busy or on a duplicate.
    pub fn add_column(&mut self, head: impl Into<String>) -> bool {
        let head = head.into();
        if self.busy() {
            tracing::warn!(target: "mutable_table::table", column = %head, "add_column rejected: table busy");
            return false;
        }
        if self.column_heads.contains(&head) {
            tracing::warn!(target: "mutable_table::table", column = %head, "add_column rejected: duplicate head");
            return false;
        }
        self.column_heads.push(head);
        self.reconcile();
        true
    }

    /// Append a row stub. Logged no-op while busy or on a duplicate.
    pub fn add_row(&mut self, stub: impl Into<String>) -> bool {
        let stub = stub.into();
        if self.busy() {
            tracing::warn!(target: "mutable_table::table", row = %stub, "add_row rejected: table busy");
            return false;
        }
        if self.row_stubs.contains(&stub) {
            tracing::warn!(target: "mutable_table::table", row = %stub, "add_row rejected: duplicate stub");
            return false;
        }
        self.row_stubs.push(stub);
        self.reconcile();
        true
    }

    /// Remove the column at `index`.
    ///
    /// Consults the removal policy, then the `BeforeRemove` hook (which may
    /// veto); on success reconciles and fires `AfterRemove`. Logged no-op
    /// while busy or out of range.
    pub fn remove_column(&mut self, index: usize) -> bool {
        if self.busy() {
            tracing::warn!(target: "mutable_table::table", index, "remove_column rejected: table busy");
            return false;
        }
        if index >= self.column_heads.len() {
            tracing::warn!(target: "mutable_table::table", index, "remove_column rejected: index out of range");
            return false;
        }
        if !self.policy.allows_remove_column(&self.column_heads[index]) {
            tracing::warn!(
                target: "mutable_table::table",
                column = %self.column_heads[index],
                "remove_column rejected by policy"
            );
            return false;
        }

        let vetoed = {
            let event = RemovalEvent {
                axis: Axis::Column,
                name: &self.column_heads[index],
                entries: &self.column_heads,
                index,
            };
            !self.hooks.fire_before_remove(&event)
        };
        if vetoed {
            tracing::debug!(target: "mutable_table::table", index, "remove_column vetoed by hook");
            return false;
        }

        let removed = self.column_heads.remove(index);
        self.reconcile();

        let event = RemovalEvent {
            axis: Axis::Column,
            name: &removed,
            entries: &self.column_heads,
            index,
        };
        self.hooks.fire_after_remove(&event);
        true
    }

    /// Remove the row at `index`. Same veto and reconcile flow as
    /// [`remove_column`](MutableTable::remove_column).
    pub fn remove_row(&mut self, index: usize) -> bool {
        if self.busy() {
            tracing::warn!(target: "mutable_table::table", index, "remove_row rejected: table busy");
            return false;
        }
        if index >= self.row_stubs.len() {
            tracing::warn!(target: "mutable_table::table", index, "remove_row rejected: index out of range");
            return false;
        }
        if !self.policy.allows_remove_row(&self.row_stubs[index]) {
            tracing::warn!(
                target: "mutable_table::table",
                row = %self.row_stubs[index],
                "remove_row rejected by policy"
            );
            return false;
        }

        let vetoed = {
            let event = RemovalEvent {
                axis: Axis::Row,
                name: &self.row_stubs[index],
                entries: &self.row_stubs,
                index,
            };
            !self.hooks.fire_before_remove(&event)
        };
        if vetoed {
            tracing::debug!(target: "mutable_table::table", index, "remove_row vetoed by hook");
            return false;
        }

        let removed = self.row_stubs.remove(index);
        self.reconcile();

        let event = RemovalEvent {
            axis: Axis::Row,
            name: &removed,
            entries: &self.row_stubs,
            index,
        };
        self.hooks.fire_after_remove(&event);
        true
    }

    // -------------------------------------------------------------------------
    // Cell store & reconciler
    // -------------------------------------------------------------------------

    /// Generate a cell for every (head, stub) pair that lacks one.
    ///
    /// Restores locked cells from the cache where available; otherwise
    /// creates a cell with the configured default value (or the unchecked
    /// checkbox text in checkbox mode). A new cell on a locked row AND
    /// locked column is mirrored into the lock cache. Low-level reconciler
    /// step; does not re-render.
    pub fn add_cells(&mut self) {
        for stub in &self.row_stubs {
            for head in &self.column_heads {
                if self.cells.iter().any(|c| c.is_at(head, stub)) {
                    continue;
                }
                let cell = match self.locks.cached_cell(head, stub) {
                    Some(cached) => cached.clone(),
                    None => match &self.config.checkbox {
                        Some(checkbox) => Cell::new(head.clone(), stub.clone(), checkbox.text_for(false))
                            .with_checked(false),
                        None => Cell::new(head.clone(), stub.clone(), self.config.default_value.clone()),
                    },
                };
                if self.locks.is_locked_row(stub) && self.locks.is_locked_column(head) {
                    self.locks.cache_cell(cell.clone());
                }
                self.cells.push(cell);
            }
        }
    }

    /// Remove every orphaned non-locked cell at or after `start`.
    ///
    /// A cell is orphaned when its head or stub is absent from the active
    /// registries. Orphaned locked cells are parked in the lock cache
    /// instead. Returns the removed (non-locked) cells. Low-level
    /// reconciler step; does not re-render.
    pub fn remove_cells(&mut self, start: usize) -> Vec<Cell> {
        let mut removed = Vec::new();
        let mut i = start;
        while i < self.cells.len() {
            let orphaned = !self.column_heads.contains(&self.cells[i].column_head)
                || !self.row_stubs.contains(&self.cells[i].row_stub);
            if !orphaned {
                i += 1;
                continue;
            }
            let cell = self.cells.remove(i);
            if self.locks.is_cell_locked(&cell) {
                tracing::trace!(
                    target: "mutable_table::table",
                    column = %cell.column_head,
                    row = %cell.row_stub,
                    "parking locked cell in cache"
                );
                self.locks.cache_cell(cell);
            } else {
                removed.push(cell);
            }
        }
        removed
    }

    /// Rebuild the projection, bracketed by the render hooks.
    pub fn render(&mut self) {
        self.hooks.fire_before_render();
        self.model = TableModel::build(&self.column_heads, &self.row_stubs, &self.cells);
        self.hooks.fire_after_render(&self.model);
    }

    /// Re-initialize the table from a cell set.
    ///
    /// Every supplied cell must carry a non-empty head and stub, else this
    /// fails with [`Error::Structure`] before any state is touched.
    /// Previously locked cells are merged in from the cache *before* heads
    /// and stubs are derived from the merged set, so locked lines reappear
    /// with their original values. Duplicate identities in the input keep
    /// the first occurrence; intersections the input leaves out are filled
    /// at the default value. Any open edit session is discarded.
    pub fn init_from_cells(&mut self, cells: Vec<Cell>) -> Result<()> {
        for (index, cell) in cells.iter().enumerate() {
            if cell.column_head.is_empty() {
                return Err(Error::structure(index, "column_head"));
            }
            if cell.row_stub.is_empty() {
                return Err(Error::structure(index, "row_stub"));
            }
        }

        if self.session.take().is_some() {
            tracing::warn!(target: "mutable_table::table", "open edit session discarded by init_from_cells");
        }
        self.column_heads.clear();
        self.row_stubs.clear();
        // With the registries empty every current cell is orphaned: locked
        // ones are parked in the cache, the rest are dropped.
        self.remove_cells(0);

        let mut merged: Vec<Cell> = Vec::with_capacity(cells.len());
        for cell in cells {
            if merged.iter().any(|c| c.key() == cell.key()) {
                tracing::warn!(
                    target: "mutable_table::table",
                    column = %cell.column_head,
                    row = %cell.row_stub,
                    "duplicate cell identity in init_from_cells input; keeping first"
                );
                continue;
            }
            merged.push(cell);
        }
        // Locked cells must be merged before heads and stubs are derived,
        // so locked lines absent from the input still come back.
        for cached in self.locks.cached_cells() {
            if !merged.iter().any(|c| c.key() == cached.key()) {
                merged.push(cached.clone());
            }
        }
        self.cells = merged;

        for cell in &self.cells {
            if !self.column_heads.contains(&cell.column_head) {
                self.column_heads.push(cell.column_head.clone());
            }
            if !self.row_stubs.contains(&cell.row_stub) {
                self.row_stubs.push(cell.row_stub.clone());
            }
        }

        self.reconcile();
        self.hooks.fire_after_init_from_cells(&self.model);
        Ok(())
    }

    /// Re-initialize from a JSON array of cells.
    pub fn init_from_json(&mut self, json: &str) -> Result<()> {
        let cells: Vec<Cell> = serde_json::from_str(json)?;
        self.init_from_cells(cells)
    }

    /// Set a cell's value directly, outside an edit session.
    ///
    /// No structural effect; re-renders and re-validates. `false` if the
    /// intersection has no cell.
    pub fn set_cell_value(&mut self, column_head: &str, row_stub: &str, value: impl Into<String>) -> bool {
        let Some(pos) = self.cells.iter().position(|c| c.is_at(column_head, row_stub)) else {
            tracing::warn!(
                target: "mutable_table::table",
                column = %column_head,
                row = %row_stub,
                "set_cell_value: no such cell"
            );
            return false;
        };
        self.cells[pos].value = value.into();
        self.mirror_if_locked(pos);
        self.refresh();
        true
    }

    /// Toggle a cell's checkbox state, updating its text from the checkbox
    /// config. `false` if the table is not in checkbox mode or the
    /// intersection has no cell.
    pub fn toggle_checked(&mut self, column_head: &str, row_stub: &str) -> bool {
        let Some(checkbox) = self.config.checkbox.clone() else {
            tracing::warn!(target: "mutable_table::table", "toggle_checked: table not in checkbox mode");
            return false;
        };
        let Some(pos) = self.cells.iter().position(|c| c.is_at(column_head, row_stub)) else {
            tracing::warn!(
                target: "mutable_table::table",
                column = %column_head,
                row = %row_stub,
                "toggle_checked: no such cell"
            );
            return false;
        };
        let checked = !self.cells[pos].checked.unwrap_or(false);
        self.cells[pos].checked = Some(checked);
        self.cells[pos].value = checkbox.text_for(checked).to_string();
        self.mirror_if_locked(pos);
        self.refresh();
        true
    }

    // -------------------------------------------------------------------------
    // Lock registry commands
    // -------------------------------------------------------------------------

    /// Lock a column head. If the head is absent from the registry it is
    /// re-inserted (a lock implies presence). Idempotent.
    pub fn lock_column(&mut self, head: impl Into<String>) {
        let head = head.into();
        self.locks.lock_column(head.clone());
        if !self.column_heads.contains(&head) {
            tracing::debug!(target: "mutable_table::locks", column = %head, "self-healing locked column into registry");
            self.column_heads.push(head);
        }
        self.reconcile();
    }

    /// Lock a row stub, re-inserting it if absent. Idempotent.
    pub fn lock_row(&mut self, stub: impl Into<String>) {
        let stub = stub.into();
        self.locks.lock_row(stub.clone());
        if !self.row_stubs.contains(&stub) {
            tracing::debug!(target: "mutable_table::locks", row = %stub, "self-healing locked row into registry");
            self.row_stubs.push(stub);
        }
        self.reconcile();
    }

    /// Unlock a column head and purge its cached cells. Cells for the head
    /// that are now orphaned and unlocked are pruned by the reconcile.
    pub fn unlock_column(&mut self, name: &str) {
        self.locks.unlock_column(name);
        self.reconcile();
    }

    /// Unlock a row stub and purge its cached cells.
    pub fn unlock_row(&mut self, name: &str) {
        self.locks.unlock_row(name);
        self.reconcile();
    }

    /// `true` if the column head is locked.
    pub fn is_locked_column(&self, name: &str) -> bool {
        self.locks.is_locked_column(name)
    }

    /// `true` if the row stub is locked.
    pub fn is_locked_row(&self, name: &str) -> bool {
        self.locks.is_locked_row(name)
    }

    // -------------------------------------------------------------------------
    // Hook commands
    // -------------------------------------------------------------------------

    /// Install a hook handler (last-write-wins).
    pub fn set_hook(&mut self, hook: Hook) {
        self.hooks.set(hook);
    }

    /// Restore the no-op for a lifecycle point.
    pub fn remove_hook(&mut self, kind: HookKind) {
        self.hooks.remove(kind);
    }

    /// Restore the no-op for a lifecycle point named at runtime.
    ///
    /// Fails with [`Error::UnknownHook`] for unrecognized names.
    pub fn remove_hook_by_name(&mut self, name: &str) -> Result<()> {
        self.hooks.remove(name.parse()?);
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Edit sessions
    // -------------------------------------------------------------------------

    /// Open an edit session on the row at `index`, drafting its cells in
    /// column order. Logged no-op (returning `false`) while another
    /// session is open, out of range, or denied by policy.
    pub fn begin_row_edit(&mut self, index: usize) -> bool {
        if self.busy() {
            tracing::warn!(target: "mutable_table::edit", index, "begin_row_edit rejected: session already open");
            return false;
        }
        let Some(stub) = self.row_stubs.get(index) else {
            tracing::warn!(target: "mutable_table::edit", index, "begin_row_edit rejected: index out of range");
            return false;
        };
        if !self.policy.allows_edit_row(stub) {
            tracing::warn!(target: "mutable_table::edit", row = %stub, "begin_row_edit rejected by policy");
            return false;
        }
        let draft: Vec<Cell> = self
            .column_heads
            .iter()
            .filter_map(|head| self.cells.iter().find(|c| c.is_at(head, stub)).cloned())
            .collect();
        self.session = Some(EditSession::new(EditTarget::Row(index), stub.clone(), draft));
        true
    }

    /// Open an edit session on the column at `index`, drafting its cells
    /// in row order.
    pub fn begin_column_edit(&mut self, index: usize) -> bool {
        if self.busy() {
            tracing::warn!(target: "mutable_table::edit", index, "begin_column_edit rejected: session already open");
            return false;
        }
        let Some(head) = self.column_heads.get(index) else {
            tracing::warn!(target: "mutable_table::edit", index, "begin_column_edit rejected: index out of range");
            return false;
        };
        if !self.policy.allows_edit_column(head) {
            tracing::warn!(target: "mutable_table::edit", column = %head, "begin_column_edit rejected by policy");
            return false;
        }
        let draft: Vec<Cell> = self
            .row_stubs
            .iter()
            .filter_map(|stub| self.cells.iter().find(|c| c.is_at(head, stub)).cloned())
            .collect();
        self.session = Some(EditSession::new(EditTarget::Column(index), head.clone(), draft));
        true
    }

    /// Replace the open session's draft value at `index`.
    pub fn set_draft_value(&mut self, index: usize, value: impl Into<String>) -> bool {
        match &mut self.session {
            Some(session) => session.set_value(index, value),
            None => {
                tracing::warn!(target: "mutable_table::edit", "set_draft_value: no open session");
                false
            }
        }
    }

    /// Copy the draft value at `index` into every later slot (row session:
    /// fill right).
    pub fn fill_right(&mut self, index: usize) -> bool {
        self.fill(index, true)
    }

    /// Copy the draft value at `index` into every earlier slot (row
    /// session: fill left).
    pub fn fill_left(&mut self, index: usize) -> bool {
        self.fill(index, false)
    }

    /// Column-session alias for [`fill_right`](MutableTable::fill_right).
    pub fn fill_down(&mut self, index: usize) -> bool {
        self.fill(index, true)
    }

    /// Column-session alias for [`fill_left`](MutableTable::fill_left).
    pub fn fill_up(&mut self, index: usize) -> bool {
        self.fill(index, false)
    }

    fn fill(&mut self, index: usize, forward: bool) -> bool {
        match &mut self.session {
            Some(session) if forward => session.fill_forward(index),
            Some(session) => session.fill_backward(index),
            None => {
                tracing::warn!(target: "mutable_table::edit", "fill: no open session");
                false
            }
        }
    }

    /// Commit the open session's draft into the cell store, close the
    /// session, re-render, and fire `AfterSave`.
    pub fn save_edit(&mut self) -> bool {
        let Some(session) = self.session.take() else {
            tracing::warn!(target: "mutable_table::edit", "save_edit: no open session");
            return false;
        };
        for draft in session.into_draft() {
            if let Some(pos) = self.cells.iter().position(|c| c.key() == draft.key()) {
                self.cells[pos].value = draft.value;
                self.cells[pos].checked = draft.checked;
                self.mirror_if_locked(pos);
            }
        }
        self.refresh();
        self.hooks.fire_after_save(&self.model);
        true
    }

    /// Discard the open session's draft and fire `AfterCancel`. The cell
    /// store is untouched.
    pub fn cancel_edit(&mut self) -> bool {
        if self.session.take().is_none() {
            tracing::warn!(target: "mutable_table::edit", "cancel_edit: no open session");
            return false;
        }
        self.hooks.fire_after_cancel();
        true
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Full settle after a structural change: generate, prune, project,
    /// validate.
    fn reconcile(&mut self) {
        tracing::debug!(
            target: "mutable_table::table",
            columns = self.column_heads.len(),
            rows = self.row_stubs.len(),
            cells = self.cells.len(),
            "reconciling"
        );
        self.add_cells();
        self.remove_cells(0);
        self.refresh();
    }

    /// Rebuild the projection and re-run validation (columns, rows, cells,
    /// cleared first).
    fn refresh(&mut self) {
        self.render();
        self.validator.clear_all_errors();
        self.validator.validate_columns(&self.column_heads);
        self.validator.validate_rows(&self.row_stubs);
        self.validator.validate_cells(&self.cells);
    }

    /// Refresh the lock cache copy of the cell at `pos` if it is locked.
    fn mirror_if_locked(&mut self, pos: usize) {
        if self.locks.is_cell_locked(&self.cells[pos]) {
            let updated = self.cells[pos].clone();
            self.locks.cache_cell(updated);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell as StdCell;
    use std::rc::Rc;

    fn table_with(columns: &[&str], rows: &[&str]) -> MutableTable {
        let mut table = MutableTable::new();
        for head in columns {
            table.add_column(*head);
        }
        for stub in rows {
            table.add_row(*stub);
        }
        table
    }

    #[test]
    fn test_cross_product_of_cells() {
        let table = table_with(&["A", "B", "C"], &["r1", "r2"]);
        assert_eq!(table.cells().len(), 6);
        assert!(table.cells().iter().all(|c| c.value == "-"));
        for head in ["A", "B", "C"] {
            for stub in ["r1", "r2"] {
                assert_eq!(table.cells().iter().filter(|c| c.is_at(head, stub)).count(), 1);
            }
        }
    }

    #[test]
    fn test_two_columns_one_row_projection() {
        let table = table_with(&["A", "B"], &["r1"]);
        let model = table.model();
        assert_eq!(model.row_count(), 1);
        let row = &model.rows()[0];
        assert_eq!(row.row_stub(), "r1");
        assert_eq!(row.cells(), &[Cell::new("A", "r1", "-"), Cell::new("B", "r1", "-")]);
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let mut table = table_with(&["A"], &["r1"]);
        assert!(!table.add_column("A"));
        assert!(!table.add_row("r1"));
        assert_eq!(table.column_heads(), ["A"]);
        assert_eq!(table.row_stubs(), ["r1"]);
        assert_eq!(table.cells().len(), 1);
    }

    #[test]
    fn test_remove_column_preserves_other_values() {
        let mut table = table_with(&["A", "B"], &["r1", "r2"]);
        table.set_cell_value("B", "r1", "kept-1");
        table.set_cell_value("B", "r2", "kept-2");

        assert!(table.remove_column(0));
        assert_eq!(table.column_heads(), ["B"]);
        assert_eq!(table.cells().len(), 2);
        assert_eq!(table.model().cell("B", "r1").unwrap().value, "kept-1");
        assert_eq!(table.model().cell("B", "r2").unwrap().value, "kept-2");
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut table = table_with(&["A"], &["r1"]);
        assert!(!table.remove_column(5));
        assert!(!table.remove_row(5));
        assert_eq!(table.cells().len(), 1);
    }

    #[test]
    fn test_locked_column_survives_removal_and_readd() {
        let mut table = table_with(&["A", "B"], &["r1"]);
        table.set_cell_value("A", "r1", "precious");
        table.lock_column("A");

        assert!(table.remove_column(0));
        assert_eq!(table.column_heads(), ["B"]);
        assert!(table.model().cell("A", "r1").is_none());
        assert_eq!(table.locks().cached_cells().len(), 1);
        assert_eq!(table.locks().cached_cell("A", "r1").unwrap().value, "precious");

        assert!(table.add_column("A"));
        assert_eq!(table.model().cell("A", "r1").unwrap().value, "precious");
    }

    #[test]
    fn test_locked_column_survives_full_row_cycling() {
        let mut table = table_with(&["A", "B"], &["r1", "r2"]);
        table.lock_column("A");
        table.set_cell_value("A", "r1", "v1");
        table.set_cell_value("A", "r2", "v2");

        assert!(table.remove_row(0));
        assert!(table.remove_row(0));
        assert!(table.row_stubs().is_empty());

        assert!(table.add_row("r1"));
        assert!(table.add_row("r2"));
        assert_eq!(table.model().cell("A", "r1").unwrap().value, "v1");
        assert_eq!(table.model().cell("A", "r2").unwrap().value, "v2");
        // The unlocked column was regenerated at the default value.
        assert_eq!(table.model().cell("B", "r1").unwrap().value, "-");
    }

    #[test]
    fn test_unlock_prunes_cached_cells() {
        let mut table = table_with(&["A", "B"], &["r1"]);
        table.lock_column("A");
        table.remove_column(0);
        assert_eq!(table.locks().cached_cells().len(), 1);

        table.unlock_column("A");
        assert!(table.locks().cached_cells().is_empty());
        // Re-adding now yields a fresh default cell.
        table.add_column("A");
        assert_eq!(table.model().cell("A", "r1").unwrap().value, "-");
    }

    #[test]
    fn test_lock_self_heals_missing_head() {
        let mut table = table_with(&["A"], &["r1"]);
        table.lock_column("Z");
        assert_eq!(table.column_heads(), ["A", "Z"]);
        assert_eq!(table.model().cell("Z", "r1").unwrap().value, "-");
    }

    #[test]
    fn test_busy_guard_rejects_structural_edits() {
        let mut table = table_with(&["A", "B"], &["r1"]);
        assert!(table.begin_row_edit(0));
        assert!(table.busy());

        assert!(!table.add_column("C"));
        assert!(!table.remove_column(0));
        assert!(!table.add_row("r2"));
        assert!(!table.remove_row(0));
        assert_eq!(table.column_heads(), ["A", "B"]);

        assert!(table.cancel_edit());
        assert!(!table.busy());
        assert!(table.add_column("C"));
    }

    #[test]
    fn test_busy_guard_rejects_apply_config() {
        let mut table = table_with(&["A"], &["r1"]);
        assert!(table.begin_row_edit(0));

        assert!(!table.apply_config(TableConfig::new().columns_list("B", ',')));
        assert_eq!(table.column_heads(), ["A"]);
        assert!(table.busy());

        assert!(table.cancel_edit());
        assert!(table.apply_config(TableConfig::new().columns_list("B", ',')));
        assert_eq!(table.column_heads(), ["A", "B"]);
    }

    #[test]
    fn test_before_remove_veto() {
        let mut table = table_with(&["A", "B"], &["r1"]);
        table.set_hook(Hook::before_remove(|event| event.name != "A"));

        assert!(!table.remove_column(0));
        assert_eq!(table.column_heads(), ["A", "B"]);
        assert!(table.remove_column(1));
        assert_eq!(table.column_heads(), ["A"]);
    }

    #[test]
    fn test_after_remove_sees_updated_list() {
        let seen: Rc<std::cell::RefCell<Vec<String>>> = Rc::default();
        let mut table = table_with(&["A", "B"], &["r1"]);
        let sink = seen.clone();
        table.set_hook(Hook::after_remove(move |event| {
            sink.borrow_mut().push(format!("{}:{}:{}", event.axis, event.name, event.entries.len()));
        }));

        table.remove_column(0);
        assert_eq!(seen.borrow().as_slice(), ["column:A:1"]);
    }

    #[test]
    fn test_remove_hook_by_name() {
        let mut table = table_with(&["A"], &["r1"]);
        table.set_hook(Hook::after_cancel(|| {}));
        assert!(table.hooks().is_set(HookKind::AfterCancel));

        table.remove_hook_by_name("after_cancel").unwrap();
        assert!(!table.hooks().is_set(HookKind::AfterCancel));

        let err = table.remove_hook_by_name("afterCancel").unwrap_err();
        assert!(matches!(err, Error::UnknownHook(ref name) if name == "afterCancel"));
    }

    #[test]
    fn test_init_from_cells_derives_registries_in_order() {
        let mut table = MutableTable::new();
        table
            .init_from_cells(vec![
                Cell::new("B", "r2", "b2"),
                Cell::new("A", "r1", "a1"),
                Cell::new("A", "r2", "a2"),
                Cell::new("B", "r1", "b1"),
            ])
            .unwrap();

        assert_eq!(table.column_heads(), ["B", "A"]);
        assert_eq!(table.row_stubs(), ["r2", "r1"]);
        assert_eq!(table.model().cell("A", "r1").unwrap().value, "a1");
    }

    #[test]
    fn test_init_from_cells_is_idempotent() {
        let cells = vec![Cell::new("A", "r1", "x"), Cell::new("B", "r1", "y")];
        let mut table = MutableTable::new();
        table.init_from_cells(cells.clone()).unwrap();
        let first = table.model().clone();
        table.init_from_cells(cells).unwrap();
        assert_eq!(*table.model(), first);
    }

    #[test]
    fn test_init_from_cells_rejects_missing_keys() {
        let mut table = MutableTable::new();
        let err = table
            .init_from_cells(vec![Cell::new("A", "r1", "x"), Cell::new("", "r1", "x")])
            .unwrap_err();
        assert!(matches!(err, Error::Structure { index: 1, field: "column_head" }));

        let err = table.init_from_cells(vec![Cell::new("A", "", "x")]).unwrap_err();
        assert!(matches!(err, Error::Structure { index: 0, field: "row_stub" }));
        // Failed before any state was touched.
        assert!(table.column_heads().is_empty());
    }

    #[test]
    fn test_init_from_cells_restores_locked_cells() {
        let mut table = table_with(&["A"], &["r1"]);
        table.set_cell_value("A", "r1", "precious");
        table.lock_column("A");
        table.remove_column(0);

        table.init_from_cells(vec![Cell::new("B", "r1", "b")]).unwrap();
        // Locked "A" merged back in before head derivation.
        assert_eq!(table.column_heads(), ["B", "A"]);
        assert_eq!(table.model().cell("A", "r1").unwrap().value, "precious");
    }

    #[test]
    fn test_init_from_json() {
        let mut table = MutableTable::new();
        table
            .init_from_json(r#"[{"column_head":"A","row_stub":"r1","value":"x"}]"#)
            .unwrap();
        assert_eq!(table.model().cell("A", "r1").unwrap().value, "x");

        assert!(matches!(table.init_from_json("not json"), Err(Error::Json(_))));
    }

    #[test]
    fn test_save_edit_commits_draft() {
        let counter = Rc::new(StdCell::new(0));
        let mut table = table_with(&["A", "B", "C"], &["r1"]);
        let hits = counter.clone();
        table.set_hook(Hook::after_save(move |_| hits.set(hits.get() + 1)));

        assert!(table.begin_row_edit(0));
        assert!(table.set_draft_value(0, "seed"));
        assert!(table.fill_right(0));
        assert!(table.save_edit());

        assert!(!table.busy());
        assert_eq!(counter.get(), 1);
        for head in ["A", "B", "C"] {
            assert_eq!(table.model().cell(head, "r1").unwrap().value, "seed");
        }
    }

    #[test]
    fn test_cancel_edit_discards_draft() {
        let mut table = table_with(&["A"], &["r1"]);
        assert!(table.begin_row_edit(0));
        assert!(table.set_draft_value(0, "draft"));
        assert!(table.cancel_edit());
        assert_eq!(table.model().cell("A", "r1").unwrap().value, "-");
    }

    #[test]
    fn test_column_edit_fill_down() {
        let mut table = table_with(&["A", "B"], &["r1", "r2", "r3"]);
        assert!(table.begin_column_edit(1));
        assert!(table.set_draft_value(0, "top"));
        assert!(table.fill_down(0));
        assert!(table.save_edit());

        for stub in ["r1", "r2", "r3"] {
            assert_eq!(table.model().cell("B", stub).unwrap().value, "top");
        }
        // The other column is untouched.
        assert_eq!(table.model().cell("A", "r1").unwrap().value, "-");
    }

    #[test]
    fn test_save_edit_refreshes_lock_cache() {
        let mut table = table_with(&["A"], &["r1"]);
        table.lock_column("A");
        assert!(table.begin_row_edit(0));
        assert!(table.set_draft_value(0, "edited"));
        assert!(table.save_edit());

        table.remove_column(0);
        table.add_column("A");
        assert_eq!(table.model().cell("A", "r1").unwrap().value, "edited");
    }

    #[test]
    fn test_edit_policy_blocks_lines() {
        let mut table = table_with(&["A"], &["r1", "totals"]);
        table.set_policy(EditPolicy::new().edit_row(|stub| stub != "totals").remove_row(|stub| stub != "totals"));

        assert!(!table.begin_row_edit(1));
        assert!(!table.remove_row(1));
        assert!(table.begin_row_edit(0));
    }

    #[test]
    fn test_config_seeds_and_locks() {
        let hits = Rc::new(StdCell::new((false, false)));
        let mut table = MutableTable::new();
        let before = hits.clone();
        table.set_hook(Hook::before_init(move || {
            let mut v = before.get();
            v.0 = true;
            before.set(v);
        }));
        let after = hits.clone();
        table.set_hook(Hook::after_init(move || {
            let mut v = after.get();
            v.1 = true;
            after.set(v);
        }));

        table.apply_config(
            TableConfig::new()
                .rows_header("Week")
                .default_value("0")
                .columns_list("Mon,Tue", ',')
                .rows_list("w1;w2", ';')
                .locked_columns_list("Mon", ','),
        );

        assert_eq!(hits.get(), (true, true));
        assert_eq!(table.column_heads(), ["Mon", "Tue"]);
        assert_eq!(table.row_stubs(), ["w1", "w2"]);
        assert!(table.is_locked_column("Mon"));
        assert_eq!(table.model().cell("Tue", "w1").unwrap().value, "0");
    }

    #[test]
    fn test_checkbox_mode() {
        let mut table = MutableTable::with_config(
            TableConfig::new()
                .columns_list("A", ',')
                .rows_list("r1", ',')
                .checkbox(crate::config::CheckboxConfig::new("yes", "no")),
        );
        let cell = table.model().cell("A", "r1").unwrap();
        assert_eq!(cell.value, "no");
        assert_eq!(cell.checked, Some(false));

        assert!(table.toggle_checked("A", "r1"));
        let cell = table.model().cell("A", "r1").unwrap();
        assert_eq!(cell.value, "yes");
        assert_eq!(cell.checked, Some(true));
    }

    #[test]
    fn test_validation_runs_after_structural_changes() {
        let mut table = MutableTable::new();
        table.validator_mut().add_column_rule(crate::validate::Rule::new(
            "max-two",
            "at most two columns",
            |heads: &[String]| heads.len() <= 2,
        ));

        table.add_column("A");
        table.add_column("B");
        assert!(!table.validator().has_errors());

        table.add_column("C");
        assert_eq!(table.validator().errors(crate::validate::ValidationTarget::Columns).len(), 1);

        // The reconciler clears before each pass, so errors do not pile up.
        table.add_row("r1");
        assert_eq!(table.validator().errors(crate::validate::ValidationTarget::Columns).len(), 1);

        table.remove_column(2);
        assert!(!table.validator().has_errors());
    }
}
