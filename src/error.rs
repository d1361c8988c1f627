//! Error types for sqlforge

use thiserror::Error;

/// Errors that can occur during statement synthesis, value conversion,
/// and command execution.
#[derive(Error, Debug)]
pub enum SqlForgeError {
    #[error("model {model} has no primary key field")]
    MissingPrimaryKey { model: String },

    #[error(
        "foreign key on {model}.{field} references {type_name}, \
         which has no registered model definition"
    )]
    UnresolvedReference {
        model: String,
        field: String,
        type_name: String,
    },

    #[error("cannot convert {value_type} value to {column_type} column {column}")]
    ValueTypeMismatch {
        column: String,
        column_type: String,
        value_type: String,
    },

    #[error("invalid {column_type} value for column {column}: {message}")]
    InvalidValue {
        column: String,
        column_type: String,
        message: String,
    },

    #[error(
        "identifiers {first} and {second} both restrict to {restricted}; \
         supply an explicit name to disambiguate"
    )]
    NameCollision {
        first: String,
        second: String,
        restricted: String,
    },

    #[error("{dialect} does not support {operation}")]
    Unsupported {
        dialect: &'static str,
        operation: &'static str,
    },

    #[error("optimistic concurrency conflict on {table}: stored row version no longer matches")]
    ConcurrencyConflict { table: String },

    #[error("no row in {table} matched the targeted key")]
    RowNotFound { table: String },

    #[error("command execution failed: {message}")]
    Execution { message: String },
}
