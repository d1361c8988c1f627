//! Ambient transaction scopes
//!
//! Nesting is save/restore discipline, not true nested transactions: only
//! one physical transaction is ever active, and an inner scope merely
//! redirects what subsequently-created commands bind to.

use uuid::Uuid;

use crate::exec::ExecContext;

/// RAII scope for one ambient transaction.
///
/// Opening saves the previous ambient pointer; dropping restores it
/// unconditionally, including when the drop happens during unwinding after
/// a failed unit of work, and regardless of commit or rollback.
pub struct TransactionScope {
    context: ExecContext,
    id: Uuid,
    previous: Option<Uuid>,
}

impl TransactionScope {
    pub fn begin(context: &ExecContext) -> Self {
        let id = Uuid::new_v4();
        let previous = context.swap_ambient_transaction(Some(id));
        tracing::trace!(transaction = %id, ?previous, "ambient transaction opened");
        Self {
            context: context.clone(),
            id,
            previous,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Mark the physical transaction committed. The external execution layer
    /// performs the actual commit; this only closes the ambient scope.
    pub fn commit(self) {
        tracing::trace!(transaction = %self.id, "transaction scope committed");
    }

    /// Mark the physical transaction rolled back and close the scope.
    pub fn rollback(self) {
        tracing::trace!(transaction = %self.id, "transaction scope rolled back");
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        self.context.swap_ambient_transaction(self.previous.take());
    }
}

impl ExecContext {
    /// Open a transaction scope bound to this context.
    pub fn begin_transaction(&self) -> TransactionScope {
        TransactionScope::begin(self)
    }
}
