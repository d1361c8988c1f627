//! Command creation and tracking
//!
//! The transport primitives (`DbConnection`, `DbCommand`) are external
//! collaborators; the engine only decides what SQL to send and how values
//! translate. `TrackedCommand` wraps a transport command with ambient
//! transaction binding, timeout resolution, and diagnostics capture.

use std::time::Duration;

use uuid::Uuid;

use crate::convert::Value;
use crate::error::SqlForgeError;
use crate::exec::{default_command_timeout, ExecContext};

/// One result row as (column, value) pairs in select-list order.
pub type Row = Vec<(String, Value)>;

/// Result of executing a command.
#[derive(Debug, Clone, PartialEq)]
pub enum ExecOutcome {
    Affected(u64),
    Rows(Vec<Row>),
}

/// A command on its way to the server. Implemented by the transport layer.
pub trait DbCommand {
    fn set_text(&mut self, sql: &str);
    fn bind(&mut self, name: &str, value: Value);
    fn set_timeout(&mut self, timeout: Duration);
    fn set_transaction(&mut self, transaction: Option<Uuid>);
    fn execute(&mut self) -> Result<ExecOutcome, SqlForgeError>;
}

/// A connection capable of creating commands. Implemented by the transport
/// layer.
pub trait DbConnection {
    fn create_command(&mut self) -> Box<dyn DbCommand>;

    /// Connection-level timeout override; absent means the process-wide
    /// default applies.
    fn command_timeout(&self) -> Option<Duration> {
        None
    }
}

/// Transport command bound to the ambient transaction and timeout at
/// creation, recording its executed text into the context on disposal.
pub struct TrackedCommand {
    inner: Box<dyn DbCommand>,
    context: ExecContext,
    text: String,
}

impl TrackedCommand {
    /// Create a command bound to the context's current ambient transaction.
    /// A transaction opened after this point does not rebind it.
    pub fn create(connection: &mut dyn DbConnection, context: &ExecContext) -> Self {
        let mut inner = connection.create_command();
        inner.set_transaction(context.ambient_transaction());
        inner.set_timeout(
            connection
                .command_timeout()
                .unwrap_or_else(default_command_timeout),
        );
        Self {
            inner,
            context: context.clone(),
            text: String::new(),
        }
    }

    pub fn set_text(&mut self, sql: &str) {
        self.text = sql.to_string();
        self.inner.set_text(sql);
    }

    pub fn bind(&mut self, name: &str, value: Value) {
        self.inner.bind(name, value);
    }

    pub fn execute(&mut self) -> Result<ExecOutcome, SqlForgeError> {
        tracing::trace!(unit_of_work = %self.context.unit_of_work(), sql = %self.text, "executing command");
        self.inner.execute()
    }
}

impl Drop for TrackedCommand {
    fn drop(&mut self) {
        if !self.text.is_empty() {
            self.context.record_command_text(&self.text);
        }
    }
}
