//! Validation rules for headers, stubs, and cells.
//!
//! Each target owns an ordered list of named rules. Running a target checks
//! every rule against a snapshot of the current collection; a rule returning
//! `false` appends a [`ValidationError`] to that target's error list.
//! Validation never blocks an operation: errors are records for the caller
//! to query, and they accumulate across runs until explicitly cleared.
//!
//! # Example
//!
//! ```
//! use mutable_table::{Rule, ValidationTarget, Validator};
//!
//! let mut validator = Validator::new();
//! validator.add_column_rule(Rule::new(
//!     "non-empty",
//!     "column heads must not be blank",
//!     |heads: &[String]| heads.iter().all(|h| !h.trim().is_empty()),
//! ));
//!
//! validator.validate_columns(&["Q1".into(), " ".into()]);
//! assert_eq!(validator.errors(ValidationTarget::Columns).len(), 1);
//! ```

use std::fmt;

use serde::Serialize;

use crate::cell::Cell;

/// The collection a rule set applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationTarget {
    /// The column-head registry.
    Columns,
    /// The row-stub registry.
    Rows,
    /// The cell store.
    Cells,
}

impl fmt::Display for ValidationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationTarget::Columns => write!(f, "columns"),
            ValidationTarget::Rows => write!(f, "rows"),
            ValidationTarget::Cells => write!(f, "cells"),
        }
    }
}

/// A recorded rule failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// Name of the failing rule.
    pub name: String,
    /// The rule's configured error message.
    pub message: String,
}

/// A named check over a collection snapshot.
///
/// `T` is the snapshot type: `[String]` for header targets, `[Cell]` for
/// the cell store. The check returns `true` when the collection is valid.
pub struct Rule<T: ?Sized> {
    name: String,
    message: String,
    check: Box<dyn Fn(&T) -> bool>,
}

impl<T: ?Sized> Rule<T> {
    /// Create a rule from a closure.
    pub fn new(
        name: impl Into<String>,
        message: impl Into<String>,
        check: impl Fn(&T) -> bool + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            message: message.into(),
            check: Box::new(check),
        }
    }

    /// The rule's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The message recorded when the rule fails.
    pub fn message(&self) -> &str {
        &self.message
    }

    fn run(&self, snapshot: &T) -> bool {
        (self.check)(snapshot)
    }
}

impl Rule<[String]> {
    /// Rule requiring every entry to match `pattern`.
    pub fn matches_pattern(
        name: impl Into<String>,
        pattern: &str,
        message: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        let re = regex::Regex::new(pattern)?;
        Ok(Self::new(name, message, move |entries: &[String]| {
            entries.iter().all(|e| re.is_match(e))
        }))
    }
}

impl<T: ?Sized> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("name", &self.name)
            .field("message", &self.message)
            .finish()
    }
}

/// Per-target rule sets and their accumulated errors.
///
/// The table's reconciler clears all errors and re-runs the three targets
/// (columns, then rows, then cells) after every structural change. Callers
/// driving [`validate_columns`](Validator::validate_columns) and friends
/// directly must clear before each pass themselves, or accepted duplicates
/// will accumulate.
#[derive(Debug, Default)]
pub struct Validator {
    column_rules: Vec<Rule<[String]>>,
    row_rules: Vec<Rule<[String]>>,
    cell_rules: Vec<Rule<[Cell]>>,
    column_errors: Vec<ValidationError>,
    row_errors: Vec<ValidationError>,
    cell_errors: Vec<ValidationError>,
}

impl Validator {
    /// Create a validator with no rules.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule for the column-head registry.
    pub fn add_column_rule(&mut self, rule: Rule<[String]>) {
        self.column_rules.push(rule);
    }

    /// Append a rule for the row-stub registry.
    pub fn add_row_rule(&mut self, rule: Rule<[String]>) {
        self.row_rules.push(rule);
    }

    /// Append a rule for the cell store.
    pub fn add_cell_rule(&mut self, rule: Rule<[Cell]>) {
        self.cell_rules.push(rule);
    }

    /// Run the column rules against a snapshot, appending errors.
    pub fn validate_columns(&mut self, heads: &[String]) {
        Self::run_rules(&self.column_rules, heads, &mut self.column_errors);
    }

    /// Run the row rules against a snapshot, appending errors.
    pub fn validate_rows(&mut self, stubs: &[String]) {
        Self::run_rules(&self.row_rules, stubs, &mut self.row_errors);
    }

    /// Run the cell rules against a snapshot, appending errors.
    pub fn validate_cells(&mut self, cells: &[Cell]) {
        Self::run_rules(&self.cell_rules, cells, &mut self.cell_errors);
    }

    fn run_rules<T: ?Sized>(rules: &[Rule<T>], snapshot: &T, errors: &mut Vec<ValidationError>) {
        for rule in rules {
            if !rule.run(snapshot) {
                tracing::debug!(target: "mutable_table::validate", rule = %rule.name, "rule failed");
                errors.push(ValidationError {
                    name: rule.name.clone(),
                    message: rule.message.clone(),
                });
            }
        }
    }

    /// The accumulated errors for a target.
    pub fn errors(&self, target: ValidationTarget) -> &[ValidationError] {
        match target {
            ValidationTarget::Columns => &self.column_errors,
            ValidationTarget::Rows => &self.row_errors,
            ValidationTarget::Cells => &self.cell_errors,
        }
    }

    /// `true` if any target has recorded errors.
    pub fn has_errors(&self) -> bool {
        !self.column_errors.is_empty()
            || !self.row_errors.is_empty()
            || !self.cell_errors.is_empty()
    }

    /// Clear the accumulated errors for one target.
    pub fn clear_errors(&mut self, target: ValidationTarget) {
        match target {
            ValidationTarget::Columns => self.column_errors.clear(),
            ValidationTarget::Rows => self.row_errors.clear(),
            ValidationTarget::Cells => self.cell_errors.clear(),
        }
    }

    /// Clear the accumulated errors for all targets.
    pub fn clear_all_errors(&mut self) {
        self.column_errors.clear();
        self.row_errors.clear();
        self.cell_errors.clear();
    }
}
