//! sqlforge: a dialect-aware SQL schema metadata and value conversion engine
//!
//! This library turns declarative record metadata into dialect-specific DDL
//! and translates values between native Rust types and a database's
//! wire/textual representation. It decides *what SQL to send* and *how to
//! translate values*; moving bytes to a server is the transport layer's job.

pub mod convert;
pub mod dialect;
pub mod error;
pub mod exec;
pub mod model;
pub mod naming;
pub mod util;

pub use error::SqlForgeError;

pub use convert::{Converter, ConverterRegistry, ParameterKind, Value, ValueKind};
pub use dialect::{DialectProvider, MysqlDialect, PostgresDialect, SqliteDialect, SqlStatement};
pub use model::{
    FieldDefinition, ForeignKeyConstraint, ModelBuilder, ModelDefinition, ModelHandle, Record,
    ReferentialAction,
};
pub use naming::NamingStrategy;

/// Generate the complete schema DDL for a record type: backing sequences
/// first, then the table, then one index per indexed field.
pub fn schema_statements<T: Record>(
    dialect: &dyn DialectProvider,
) -> Result<Vec<String>, SqlForgeError> {
    let model = model::model_for::<T>();

    let mut statements = dialect.to_create_sequences(&model);
    statements.push(dialect.to_create_table(&model)?);

    for field in model.fields.iter().filter(|f| f.is_indexed) {
        statements.push(dialect.to_create_index(
            &model,
            &[field.field_name()],
            field.is_unique,
            None,
        )?);
    }

    tracing::debug!(
        model = %model.model_name(),
        dialect = dialect.name(),
        count = statements.len(),
        "generated schema statements"
    );
    Ok(statements)
}

/// Generate the DDL that tears the same schema back down, in reverse order.
pub fn drop_schema_statements<T: Record>(
    dialect: &dyn DialectProvider,
) -> Result<Vec<String>, SqlForgeError> {
    let model = model::model_for::<T>();
    let mut statements = vec![dialect.to_drop_table(&model)];
    statements.extend(dialect.to_drop_sequences(&model));
    Ok(statements)
}
