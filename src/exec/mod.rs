//! Command and transaction lifecycle

mod command;
mod context;
mod transaction;

pub use command::{DbCommand, DbConnection, ExecOutcome, Row, TrackedCommand};
pub use context::{diagnostics, ContextGuard, ContextPropagation, ExecContext};
pub use transaction::TransactionScope;

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::error::SqlForgeError;

static DEFAULT_COMMAND_TIMEOUT_SECS: AtomicU64 = AtomicU64::new(30);

/// Process-wide command timeout, applied when a connection declares no
/// override.
pub fn default_command_timeout() -> Duration {
    Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS.load(Ordering::Relaxed))
}

pub fn set_default_command_timeout(timeout: Duration) {
    DEFAULT_COMMAND_TIMEOUT_SECS.store(timeout.as_secs(), Ordering::Relaxed);
}

/// Interpret the affected-row count of a key-targeted write.
///
/// With a row-version guard in the predicate, zero affected rows means the
/// stored version no longer matches: a concurrency conflict, which must
/// never be conflated with the row simply not existing.
pub fn verify_row_count(
    table: &str,
    expected: u64,
    actual: u64,
    row_version_guarded: bool,
) -> Result<(), SqlForgeError> {
    if actual == expected {
        return Ok(());
    }
    if row_version_guarded {
        Err(SqlForgeError::ConcurrencyConflict {
            table: table.to_string(),
        })
    } else {
        Err(SqlForgeError::RowNotFound {
            table: table.to_string(),
        })
    }
}
