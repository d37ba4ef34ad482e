//! Error types for the table state model.

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while operating on a table.
///
/// Non-fatal conditions (structural edits attempted while an edit session is
/// open, duplicate header names, out-of-range indices) are not errors: they
/// are logged through `tracing` and ignored, and the operation reports
/// `false`. Validation failures are accumulated as records on the
/// [`Validator`](crate::Validator), never raised.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A supplied cell is missing a required key.
    ///
    /// Raised by [`MutableTable::init_from_cells`](crate::MutableTable::init_from_cells)
    /// when a cell carries an empty column head or row stub. Fatal to that
    /// initialization call; the caller must retry with corrected input.
    #[error("invalid cell structure at index {index}: empty {field}")]
    Structure {
        /// Position of the offending cell in the supplied slice.
        index: usize,
        /// Which key was empty (`"column_head"` or `"row_stub"`).
        field: &'static str,
    },

    /// A hook name did not match any known lifecycle point.
    ///
    /// Raised by [`HookKind::from_str`](crate::HookKind). A programmer
    /// error, intended to fail fast at integration time.
    #[error("unknown hook name '{0}'")]
    UnknownHook(String),

    /// A cell set or config could not be deserialized from JSON.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create a structure error for the cell at `index`.
    pub fn structure(index: usize, field: &'static str) -> Self {
        Self::Structure { index, field }
    }

    /// Create an unknown-hook error.
    pub fn unknown_hook(name: impl Into<String>) -> Self {
        Self::UnknownHook(name.into())
    }
}
