//! An editable-table state model with synchronous reconciliation.
//!
//! `mutable-table` keeps three interdependent collections (column heads,
//! row stubs, and a sparse cell store) consistent under structural edits. Adding a head or stub generates the missing cells at a default
//! value; removing one prunes the cells it orphans, unless the line is
//! locked, in which case its cells are parked in a cache and restored with
//! their original values when the line returns. Every command settles the
//! table before returning: no watchers, no deferred passes.
//!
//! The crate is a state model, not a view. Presentation layers consume the
//! derived [`TableModel`] projection and drive the command surface on
//! [`MutableTable`]; lifecycle [hooks](crate::Hook) and the per-target
//! [`Validator`] are the integration points.
//!
//! # Example
//!
//! ```
//! use mutable_table::{Hook, MutableTable};
//!
//! let mut table = MutableTable::new();
//! table.set_hook(Hook::before_remove(|event| event.name != "Totals"));
//!
//! table.add_column("Q1");
//! table.add_column("Totals");
//! table.add_row("widgets");
//!
//! // Cells are generated for every intersection.
//! assert_eq!(table.cells().len(), 2);
//!
//! table.lock_column("Q1");
//! table.set_cell_value("Q1", "widgets", "42");
//!
//! // "Totals" is protected by the hook; "Q1" survives removal via its lock.
//! assert!(!table.remove_column(1));
//! assert!(table.remove_column(0));
//! table.add_column("Q1");
//! assert_eq!(table.model().cell("Q1", "widgets").unwrap().value, "42");
//! ```

mod cell;
mod config;
mod edit;
mod error;
mod hooks;
mod lock;
mod model;
mod table;
mod validate;

pub use cell::Cell;
pub use config::{CheckboxConfig, EditPolicy, TableConfig, parse_list};
pub use edit::{EditSession, EditTarget};
pub use error::{Error, Result};
pub use hooks::{Axis, Hook, HookKind, Hooks, RemovalEvent};
pub use lock::LockRegistry;
pub use model::{TableModel, TableRow};
pub use table::MutableTable;
pub use validate::{Rule, ValidationError, ValidationTarget, Validator};
