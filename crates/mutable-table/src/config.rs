//! Declarative table configuration.
//!
//! Mirrors the attribute surface a host exposes when instantiating the
//! widget: seed column/row lists (optionally parsed from delimited
//! strings), locked seeds, the default cell value, checkbox-mode texts, and
//! per-line edit/remove policies. Config is plain data (serde); policies
//! carry closures and live in [`EditPolicy`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Split a delimited seed string into a trimmed, duplicate-free list.
///
/// Empty segments are dropped; first occurrence wins on duplicates.
///
/// ```
/// use mutable_table::parse_list;
///
/// assert_eq!(parse_list("Q1, Q2,,Q3, Q2", ','), ["Q1", "Q2", "Q3"]);
/// ```
pub fn parse_list(input: &str, delimiter: char) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in input.split(delimiter) {
        let part = part.trim();
        if !part.is_empty() && !out.iter().any(|p| p == part) {
            out.push(part.to_string());
        }
    }
    out
}

/// Checkbox-mode settings: the cell text shown per checked state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckboxConfig {
    /// Text displayed while checked.
    pub checked_text: String,
    /// Text displayed while unchecked.
    pub unchecked_text: String,
}

impl CheckboxConfig {
    /// Create checkbox settings.
    pub fn new(checked_text: impl Into<String>, unchecked_text: impl Into<String>) -> Self {
        Self {
            checked_text: checked_text.into(),
            unchecked_text: unchecked_text.into(),
        }
    }

    /// The text for the given state.
    pub fn text_for(&self, checked: bool) -> &str {
        if checked {
            &self.checked_text
        } else {
            &self.unchecked_text
        }
    }
}

/// Declarative seeding and display settings for a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    /// Controller name published to the host, if any.
    pub name: Option<String>,
    /// Header text for the row-stub column.
    pub rows_header: String,
    /// Value given to newly generated cells.
    pub default_value: String,
    /// Seed column heads, applied in order.
    pub columns: Vec<String>,
    /// Seed row stubs, applied in order.
    pub rows: Vec<String>,
    /// Column heads locked at initialization.
    pub locked_columns: Vec<String>,
    /// Row stubs locked at initialization.
    pub locked_rows: Vec<String>,
    /// Checkbox-mode settings; `None` for plain text cells.
    pub checkbox: Option<CheckboxConfig>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            name: None,
            rows_header: String::new(),
            default_value: "-".to_string(),
            columns: Vec::new(),
            rows: Vec::new(),
            locked_columns: Vec::new(),
            locked_rows: Vec::new(),
            checkbox: None,
        }
    }
}

impl TableConfig {
    /// Create a config with defaults (default cell value `"-"`).
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Set the row-stub header text.
    pub fn rows_header(mut self, header: impl Into<String>) -> Self {
        self.rows_header = header.into();
        self
    }

    /// Set the default cell value.
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = value.into();
        self
    }

    /// Seed column heads from a delimited string.
    pub fn columns_list(mut self, input: &str, delimiter: char) -> Self {
        self.columns = parse_list(input, delimiter);
        self
    }

    /// Seed row stubs from a delimited string.
    pub fn rows_list(mut self, input: &str, delimiter: char) -> Self {
        self.rows = parse_list(input, delimiter);
        self
    }

    /// Seed locked column heads from a delimited string.
    pub fn locked_columns_list(mut self, input: &str, delimiter: char) -> Self {
        self.locked_columns = parse_list(input, delimiter);
        self
    }

    /// Seed locked row stubs from a delimited string.
    pub fn locked_rows_list(mut self, input: &str, delimiter: char) -> Self {
        self.locked_rows = parse_list(input, delimiter);
        self
    }

    /// Enable checkbox mode.
    pub fn checkbox(mut self, config: CheckboxConfig) -> Self {
        self.checkbox = Some(config);
        self
    }
}

type Predicate = Box<dyn Fn(&str) -> bool>;

/// Per-line enable/disable predicates for editing and removal.
///
/// Each predicate receives the line's head or stub and returns whether the
/// feature is allowed for it. Unset predicates allow everything.
#[derive(Default)]
pub struct EditPolicy {
    edit_row: Option<Predicate>,
    remove_row: Option<Predicate>,
    edit_column: Option<Predicate>,
    remove_column: Option<Predicate>,
}

impl EditPolicy {
    /// Create a policy that allows everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict which rows may open an edit session.
    pub fn edit_row(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.edit_row = Some(Box::new(predicate));
        self
    }

    /// Restrict which rows may be removed.
    pub fn remove_row(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.remove_row = Some(Box::new(predicate));
        self
    }

    /// Restrict which columns may open an edit session.
    pub fn edit_column(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.edit_column = Some(Box::new(predicate));
        self
    }

    /// Restrict which columns may be removed.
    pub fn remove_column(mut self, predicate: impl Fn(&str) -> bool + 'static) -> Self {
        self.remove_column = Some(Box::new(predicate));
        self
    }

    pub(crate) fn allows_edit_row(&self, stub: &str) -> bool {
        self.edit_row.as_ref().is_none_or(|p| p(stub))
    }

    pub(crate) fn allows_remove_row(&self, stub: &str) -> bool {
        self.remove_row.as_ref().is_none_or(|p| p(stub))
    }

    pub(crate) fn allows_edit_column(&self, head: &str) -> bool {
        self.edit_column.as_ref().is_none_or(|p| p(head))
    }

    pub(crate) fn allows_remove_column(&self, head: &str) -> bool {
        self.remove_column.as_ref().is_none_or(|p| p(head))
    }
}

impl fmt::Debug for EditPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditPolicy")
            .field("edit_row", &self.edit_row.is_some())
            .field("remove_row", &self.remove_row.is_some())
            .field("edit_column", &self.edit_column.is_some())
            .field("remove_column", &self.remove_column.is_some())
            .finish()
    }
}
