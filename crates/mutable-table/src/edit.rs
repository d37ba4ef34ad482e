//! Inline edit sessions.
//!
//! An edit session is the state model's view of one open inline-edit form:
//! a draft copy of a single row's or column's cell values. At most one
//! session is open at a time; while one is open the table is busy and
//! structural edits are rejected. Drafts never touch the cell store; they
//! are committed by [`save_edit`](crate::MutableTable::save_edit) or
//! discarded by [`cancel_edit`](crate::MutableTable::cancel_edit).

use crate::cell::Cell;

/// Which line of the table a session edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    /// A row, identified by its index in the row-stub registry.
    Row(usize),
    /// A column, identified by its index in the column-head registry.
    Column(usize),
}

/// Draft state for one open inline-edit form.
///
/// The draft holds a copy of each cell on the edited line, in display
/// order: column order for a row session, row order for a column session.
/// Fill operations propagate one draft value along the line: for a row
/// session [`fill_forward`](EditSession::fill_forward) is the original
/// "fill right", for a column session it is "fill down".
#[derive(Debug)]
pub struct EditSession {
    target: EditTarget,
    line_name: String,
    draft: Vec<Cell>,
}

impl EditSession {
    pub(crate) fn new(target: EditTarget, line_name: String, draft: Vec<Cell>) -> Self {
        Self {
            target,
            line_name,
            draft,
        }
    }

    /// The line being edited.
    pub fn target(&self) -> EditTarget {
        self.target
    }

    /// The stub (row session) or head (column session) of the edited line.
    pub fn line_name(&self) -> &str {
        &self.line_name
    }

    /// The draft cells, in display order.
    pub fn draft(&self) -> &[Cell] {
        &self.draft
    }

    /// Replace the draft value at `index`. `false` if out of range.
    pub fn set_value(&mut self, index: usize, value: impl Into<String>) -> bool {
        match self.draft.get_mut(index) {
            Some(cell) => {
                cell.value = value.into();
                true
            }
            None => {
                tracing::warn!(
                    target: "mutable_table::edit",
                    index,
                    len = self.draft.len(),
                    "draft index out of range"
                );
                false
            }
        }
    }

    /// Copy the draft value at `index` into every later slot.
    ///
    /// Fill right for a row session, fill down for a column session.
    /// `false` if `index` is out of range.
    pub fn fill_forward(&mut self, index: usize) -> bool {
        let Some(value) = self.draft.get(index).map(|c| c.value.clone()) else {
            tracing::warn!(target: "mutable_table::edit", index, "fill source out of range");
            return false;
        };
        for cell in self.draft.iter_mut().skip(index + 1) {
            cell.value = value.clone();
        }
        true
    }

    /// Copy the draft value at `index` into every earlier slot.
    ///
    /// Fill left for a row session, fill up for a column session.
    /// `false` if `index` is out of range.
    pub fn fill_backward(&mut self, index: usize) -> bool {
        let Some(value) = self.draft.get(index).map(|c| c.value.clone()) else {
            tracing::warn!(target: "mutable_table::edit", index, "fill source out of range");
            return false;
        };
        for cell in self.draft.iter_mut().take(index) {
            cell.value = value.clone();
        }
        true
    }

    /// Consume the session, yielding the draft for commit.
    pub(crate) fn into_draft(self) -> Vec<Cell> {
        self.draft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> EditSession {
        EditSession::new(
            EditTarget::Row(0),
            "r1".to_string(),
            vec![
                Cell::new("A", "r1", "a"),
                Cell::new("B", "r1", "b"),
                Cell::new("C", "r1", "c"),
            ],
        )
    }

    fn values(session: &EditSession) -> Vec<&str> {
        session.draft().iter().map(|c| c.value.as_str()).collect()
    }

    #[test]
    fn test_fill_forward() {
        let mut session = session();
        assert!(session.fill_forward(1));
        assert_eq!(values(&session), ["a", "b", "b"]);
    }

    #[test]
    fn test_fill_backward() {
        let mut session = session();
        assert!(session.fill_backward(2));
        assert_eq!(values(&session), ["c", "c", "c"]);
    }

    #[test]
    fn test_fill_from_edge_is_complete() {
        let mut session = session();
        assert!(session.fill_forward(0));
        assert_eq!(values(&session), ["a", "a", "a"]);
        // Filling backward from the first slot changes nothing.
        assert!(session.fill_backward(0));
        assert_eq!(values(&session), ["a", "a", "a"]);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        let mut session = session();
        assert!(!session.set_value(7, "x"));
        assert!(!session.fill_forward(7));
        assert!(!session.fill_backward(7));
        assert_eq!(values(&session), ["a", "b", "c"]);
    }

    #[test]
    fn test_set_value_touches_only_its_slot() {
        let mut session = session();
        assert!(session.set_value(1, "edited"));
        assert_eq!(values(&session), ["a", "edited", "c"]);
        assert_eq!(session.line_name(), "r1");
        assert_eq!(session.target(), EditTarget::Row(0));
    }
}
