//! Lifecycle hooks for the mutation workflow.
//!
//! Hooks are named, single-slot extension points invoked synchronously at
//! defined lifecycle transitions. Each [`HookKind`] holds at most one
//! handler at a time; registering a new one replaces the previous
//! (last-write-wins, no chaining), and removing a handler restores the
//! default no-op. Only [`HookKind::BeforeRemove`] may influence the
//! triggering operation, by returning `false` to veto the removal.
//!
//! # Example
//!
//! ```
//! use mutable_table::{Hook, MutableTable};
//!
//! let mut table = MutableTable::new();
//! table.set_hook(Hook::before_remove(|event| {
//!     // Keep the first column no matter what.
//!     event.index != 0
//! }));
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::model::TableModel;

/// Which registry a removal event concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Column heads.
    Column,
    /// Row stubs.
    Row,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Column => write!(f, "column"),
            Axis::Row => write!(f, "row"),
        }
    }
}

/// Payload passed to the removal hooks.
///
/// `entries` is the registry list at the time the hook fires: for
/// `BeforeRemove` it still contains `name`, for `AfterRemove` it no longer
/// does.
#[derive(Debug)]
pub struct RemovalEvent<'a> {
    /// The registry being edited.
    pub axis: Axis,
    /// The head or stub being removed.
    pub name: &'a str,
    /// The current registry contents.
    pub entries: &'a [String],
    /// Index of the entry in the pre-removal list.
    pub index: usize,
}

/// The fixed set of lifecycle points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// An edit session committed its draft.
    AfterSave,
    /// A head or stub is about to be removed; the handler may veto.
    BeforeRemove,
    /// A head or stub was removed and the table reconciled.
    AfterRemove,
    /// An edit session was discarded.
    AfterCancel,
    /// The table was re-initialized from a cell set.
    AfterInitFromCells,
    /// The projection is about to be rebuilt.
    BeforeRender,
    /// The projection was rebuilt.
    AfterRender,
    /// Declarative configuration is about to be applied.
    BeforeInit,
    /// Declarative configuration was applied.
    AfterInit,
}

impl HookKind {
    /// All lifecycle points, in dispatch-table order.
    pub const ALL: [HookKind; 9] = [
        HookKind::AfterSave,
        HookKind::BeforeRemove,
        HookKind::AfterRemove,
        HookKind::AfterCancel,
        HookKind::AfterInitFromCells,
        HookKind::BeforeRender,
        HookKind::AfterRender,
        HookKind::BeforeInit,
        HookKind::AfterInit,
    ];

    /// The canonical name of this lifecycle point.
    pub fn name(&self) -> &'static str {
        match self {
            HookKind::AfterSave => "after_save",
            HookKind::BeforeRemove => "before_remove",
            HookKind::AfterRemove => "after_remove",
            HookKind::AfterCancel => "after_cancel",
            HookKind::AfterInitFromCells => "after_init_from_cells",
            HookKind::BeforeRender => "before_render",
            HookKind::AfterRender => "after_render",
            HookKind::BeforeInit => "before_init",
            HookKind::AfterInit => "after_init",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HookKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HookKind::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| Error::unknown_hook(s))
    }
}

type ModelHookFn = Box<dyn FnMut(&TableModel)>;
type RemovalHookFn = Box<dyn FnMut(&RemovalEvent<'_>)>;
type VetoHookFn = Box<dyn FnMut(&RemovalEvent<'_>) -> bool>;
type UnitHookFn = Box<dyn FnMut()>;

/// A handler bound to the lifecycle point it serves.
///
/// Built through the constructor for the matching [`HookKind`]; the
/// signatures differ per point, so an unknown name or a handler of the
/// wrong shape cannot be expressed.
pub enum Hook {
    /// Receives the freshly rendered projection after a save.
    AfterSave(ModelHookFn),
    /// May veto the removal by returning `false`.
    BeforeRemove(VetoHookFn),
    /// Observes a completed removal.
    AfterRemove(RemovalHookFn),
    /// Observes a discarded edit session.
    AfterCancel(UnitHookFn),
    /// Receives the projection after re-initialization.
    AfterInitFromCells(ModelHookFn),
    /// Fires before the projection is rebuilt.
    BeforeRender(UnitHookFn),
    /// Receives the rebuilt projection.
    AfterRender(ModelHookFn),
    /// Fires before configuration is applied.
    BeforeInit(UnitHookFn),
    /// Fires after configuration is applied.
    AfterInit(UnitHookFn),
}

impl Hook {
    /// Handler for [`HookKind::AfterSave`].
    pub fn after_save(f: impl FnMut(&TableModel) + 'static) -> Self {
        Hook::AfterSave(Box::new(f))
    }

    /// Handler for [`HookKind::BeforeRemove`]; return `false` to veto.
    pub fn before_remove(f: impl FnMut(&RemovalEvent<'_>) -> bool + 'static) -> Self {
        Hook::BeforeRemove(Box::new(f))
    }

    /// Handler for [`HookKind::AfterRemove`].
    pub fn after_remove(f: impl FnMut(&RemovalEvent<'_>) + 'static) -> Self {
        Hook::AfterRemove(Box::new(f))
    }

    /// Handler for [`HookKind::AfterCancel`].
    pub fn after_cancel(f: impl FnMut() + 'static) -> Self {
        Hook::AfterCancel(Box::new(f))
    }

    /// Handler for [`HookKind::AfterInitFromCells`].
    pub fn after_init_from_cells(f: impl FnMut(&TableModel) + 'static) -> Self {
        Hook::AfterInitFromCells(Box::new(f))
    }

    /// Handler for [`HookKind::BeforeRender`].
    pub fn before_render(f: impl FnMut() + 'static) -> Self {
        Hook::BeforeRender(Box::new(f))
    }

    /// Handler for [`HookKind::AfterRender`].
    pub fn after_render(f: impl FnMut(&TableModel) + 'static) -> Self {
        Hook::AfterRender(Box::new(f))
    }

    /// Handler for [`HookKind::BeforeInit`].
    pub fn before_init(f: impl FnMut() + 'static) -> Self {
        Hook::BeforeInit(Box::new(f))
    }

    /// Handler for [`HookKind::AfterInit`].
    pub fn after_init(f: impl FnMut() + 'static) -> Self {
        Hook::AfterInit(Box::new(f))
    }

    /// The lifecycle point this handler serves.
    pub fn kind(&self) -> HookKind {
        match self {
            Hook::AfterSave(_) => HookKind::AfterSave,
            Hook::BeforeRemove(_) => HookKind::BeforeRemove,
            Hook::AfterRemove(_) => HookKind::AfterRemove,
            Hook::AfterCancel(_) => HookKind::AfterCancel,
            Hook::AfterInitFromCells(_) => HookKind::AfterInitFromCells,
            Hook::BeforeRender(_) => HookKind::BeforeRender,
            Hook::AfterRender(_) => HookKind::AfterRender,
            Hook::BeforeInit(_) => HookKind::BeforeInit,
            Hook::AfterInit(_) => HookKind::AfterInit,
        }
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Hook").field(&self.kind()).finish()
    }
}

/// The dispatch table: one optional handler per lifecycle point.
///
/// All dispatch is synchronous and in-line with the triggering operation.
/// Unset points are no-ops; an unset `BeforeRemove` allows the removal.
#[derive(Default)]
pub struct Hooks {
    after_save: Option<ModelHookFn>,
    before_remove: Option<VetoHookFn>,
    after_remove: Option<RemovalHookFn>,
    after_cancel: Option<UnitHookFn>,
    after_init_from_cells: Option<ModelHookFn>,
    before_render: Option<UnitHookFn>,
    after_render: Option<ModelHookFn>,
    before_init: Option<UnitHookFn>,
    after_init: Option<UnitHookFn>,
}

impl Hooks {
    /// Create an empty dispatch table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a handler, replacing any prior handler for the same point.
    pub fn set(&mut self, hook: Hook) {
        let kind = hook.kind();
        if self.is_set(kind) {
            tracing::debug!(target: "mutable_table::hooks", hook = %kind, "replacing hook handler");
        }
        match hook {
            Hook::AfterSave(f) => self.after_save = Some(f),
            Hook::BeforeRemove(f) => self.before_remove = Some(f),
            Hook::AfterRemove(f) => self.after_remove = Some(f),
            Hook::AfterCancel(f) => self.after_cancel = Some(f),
            Hook::AfterInitFromCells(f) => self.after_init_from_cells = Some(f),
            Hook::BeforeRender(f) => self.before_render = Some(f),
            Hook::AfterRender(f) => self.after_render = Some(f),
            Hook::BeforeInit(f) => self.before_init = Some(f),
            Hook::AfterInit(f) => self.after_init = Some(f),
        }
    }

    /// Restore the no-op for the given point.
    pub fn remove(&mut self, kind: HookKind) {
        match kind {
            HookKind::AfterSave => self.after_save = None,
            HookKind::BeforeRemove => self.before_remove = None,
            HookKind::AfterRemove => self.after_remove = None,
            HookKind::AfterCancel => self.after_cancel = None,
            HookKind::AfterInitFromCells => self.after_init_from_cells = None,
            HookKind::BeforeRender => self.before_render = None,
            HookKind::AfterRender => self.after_render = None,
            HookKind::BeforeInit => self.before_init = None,
            HookKind::AfterInit => self.after_init = None,
        }
    }

    /// `true` if a handler is installed for the given point.
    pub fn is_set(&self, kind: HookKind) -> bool {
        match kind {
            HookKind::AfterSave => self.after_save.is_some(),
            HookKind::BeforeRemove => self.before_remove.is_some(),
            HookKind::AfterRemove => self.after_remove.is_some(),
            HookKind::AfterCancel => self.after_cancel.is_some(),
            HookKind::AfterInitFromCells => self.after_init_from_cells.is_some(),
            HookKind::BeforeRender => self.before_render.is_some(),
            HookKind::AfterRender => self.after_render.is_some(),
            HookKind::BeforeInit => self.before_init.is_some(),
            HookKind::AfterInit => self.after_init.is_some(),
        }
    }

    pub(crate) fn fire_after_save(&mut self, model: &TableModel) {
        if let Some(f) = &mut self.after_save {
            f(model);
        }
    }

    /// Returns `false` if the installed handler vetoes the removal.
    pub(crate) fn fire_before_remove(&mut self, event: &RemovalEvent<'_>) -> bool {
        match &mut self.before_remove {
            Some(f) => f(event),
            None => true,
        }
    }

    pub(crate) fn fire_after_remove(&mut self, event: &RemovalEvent<'_>) {
        if let Some(f) = &mut self.after_remove {
            f(event);
        }
    }

    pub(crate) fn fire_after_cancel(&mut self) {
        if let Some(f) = &mut self.after_cancel {
            f();
        }
    }

    pub(crate) fn fire_after_init_from_cells(&mut self, model: &TableModel) {
        if let Some(f) = &mut self.after_init_from_cells {
            f(model);
        }
    }

    pub(crate) fn fire_before_render(&mut self) {
        if let Some(f) = &mut self.before_render {
            f();
        }
    }

    pub(crate) fn fire_after_render(&mut self, model: &TableModel) {
        if let Some(f) = &mut self.after_render {
            f(model);
        }
    }

    pub(crate) fn fire_before_init(&mut self) {
        if let Some(f) = &mut self.before_init {
            f();
        }
    }

    pub(crate) fn fire_after_init(&mut self) {
        if let Some(f) = &mut self.after_init {
            f();
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let installed: Vec<&str> = HookKind::ALL
            .into_iter()
            .filter(|k| self.is_set(*k))
            .map(|k| k.name())
            .collect();
        f.debug_struct("Hooks").field("installed", &installed).finish()
    }
}
