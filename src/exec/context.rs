//! Ambient execution context
//!
//! One context exists per logical unit of work. It carries the ambient
//! transaction pointer and the last-executed-statement diagnostic slot; both
//! are private to the unit of work, never shared across independent
//! concurrent operations.

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use once_cell::sync::Lazy;
use uuid::Uuid;

/// How ambient state follows execution.
///
/// `Scoped` threads the context object through calls explicitly (cloning is
/// an `Arc` bump), so the state survives continuation onto a different worker
/// thread. `ThreadLocal` additionally mirrors the context into a
/// thread-local slot for callers that cannot pass it; that path is faster but
/// the slot is lost when execution resumes on another thread. The trade-off
/// is part of the public contract, not an internal detail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextPropagation {
    Scoped,
    ThreadLocal,
}

struct ContextInner {
    unit_of_work: Uuid,
    propagation: ContextPropagation,
    ambient_transaction: Mutex<Option<Uuid>>,
    last_command_text: Mutex<Option<String>>,
}

/// Ambient state for one logical unit of work.
#[derive(Clone)]
pub struct ExecContext {
    inner: Arc<ContextInner>,
}

impl ExecContext {
    pub fn new(propagation: ContextPropagation) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                unit_of_work: Uuid::new_v4(),
                propagation,
                ambient_transaction: Mutex::new(None),
                last_command_text: Mutex::new(None),
            }),
        }
    }

    pub fn unit_of_work(&self) -> Uuid {
        self.inner.unit_of_work
    }

    pub fn propagation(&self) -> ContextPropagation {
        self.inner.propagation
    }

    /// The transaction newly-created commands bind to, if any.
    pub fn ambient_transaction(&self) -> Option<Uuid> {
        *self
            .inner
            .ambient_transaction
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Install a new ambient transaction pointer, returning the previous one
    /// for the save/restore discipline.
    pub(crate) fn swap_ambient_transaction(&self, transaction: Option<Uuid>) -> Option<Uuid> {
        let mut slot = self
            .inner
            .ambient_transaction
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *slot, transaction)
    }

    /// Record the text of a disposed command for later diagnostics.
    pub fn record_command_text(&self, sql: &str) {
        *self
            .inner
            .last_command_text
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(sql.to_string());
        diagnostics::record(self.inner.unit_of_work, sql);
    }

    /// The last statement executed within this unit of work.
    pub fn last_command_text(&self) -> Option<String> {
        self.inner
            .last_command_text
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Mirror this context into the current thread's slot, restoring the
    /// previous occupant when the guard drops. Only meaningful under
    /// [`ContextPropagation::ThreadLocal`]; a `Scoped` context is expected to
    /// be passed explicitly instead.
    pub fn enter(&self) -> ContextGuard {
        let previous = CURRENT.with(|slot| slot.replace(Some(self.clone())));
        ContextGuard { previous }
    }

    /// The context mirrored into this thread, if any. Returns `None` on a
    /// worker the context was never installed on; that is the documented
    /// limitation of the thread-local path.
    pub fn current() -> Option<ExecContext> {
        CURRENT.with(|slot| slot.borrow().clone())
    }
}

impl std::fmt::Debug for ExecContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecContext")
            .field("unit_of_work", &self.inner.unit_of_work)
            .field("propagation", &self.inner.propagation)
            .finish()
    }
}

thread_local! {
    static CURRENT: RefCell<Option<ExecContext>> = const { RefCell::new(None) };
}

/// Restores the thread's previous context on drop.
pub struct ContextGuard {
    previous: Option<ExecContext>,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|slot| *slot.borrow_mut() = previous);
    }
}

/// Diagnostic read-out keyed by unit of work, for tests and error reporting.
pub mod diagnostics {
    use super::*;

    static LAST_COMMANDS: Lazy<RwLock<HashMap<Uuid, String>>> =
        Lazy::new(|| RwLock::new(HashMap::new()));

    pub(crate) fn record(unit_of_work: Uuid, sql: &str) {
        LAST_COMMANDS
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(unit_of_work, sql.to_string());
    }

    /// The last statement executed within the given unit of work.
    pub fn last_command_text(unit_of_work: Uuid) -> Option<String> {
        LAST_COMMANDS
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&unit_of_work)
            .cloned()
    }
}
