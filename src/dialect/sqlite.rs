//! SQLite dialect provider

use std::sync::Arc;

use crate::convert::{
    BoolConverter, BytesConverter, ConverterRegistry, DateTimeConverter, DecimalConverter,
    FloatConverter, IntegerConverter, RowVersionConverter, TextConverter, UuidConverter,
    ValueKind,
};
use crate::dialect::DialectProvider;
use crate::error::SqlForgeError;
use crate::model::{FieldDefinition, ForeignKeyConstraint, ModelDefinition};
use crate::naming::{IdentityNaming, NamingStrategy};

/// SQLite: double-quote identifiers, `@name` parameters, inline
/// `PRIMARY KEY AUTOINCREMENT`, and a deliberately loose type system
/// (every integer width stores as INTEGER).
pub struct SqliteDialect {
    naming: Arc<dyn NamingStrategy>,
    converters: ConverterRegistry,
}

impl SqliteDialect {
    pub fn new() -> Self {
        Self::with_naming(Arc::new(IdentityNaming::default()))
    }

    pub fn with_naming(naming: Arc<dyn NamingStrategy>) -> Self {
        Self {
            naming,
            converters: build_registry(),
        }
    }
}

impl Default for SqliteDialect {
    fn default() -> Self {
        Self::new()
    }
}

fn build_registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::new();
    registry.register(ValueKind::Bool, Arc::new(BoolConverter::new("INTEGER", false)));
    registry.register(ValueKind::Int16, Arc::new(IntegerConverter::new("INTEGER")));
    registry.register(ValueKind::Int32, Arc::new(IntegerConverter::new("INTEGER")));
    registry.register(ValueKind::Int64, Arc::new(IntegerConverter::new("INTEGER")));
    registry.register(ValueKind::Float32, Arc::new(FloatConverter::new("REAL")));
    registry.register(ValueKind::Float64, Arc::new(FloatConverter::new("REAL")));
    registry.register(
        ValueKind::Decimal,
        Arc::new(DecimalConverter::new("DECIMAL", 18, 6)),
    );
    registry.register(ValueKind::Text, Arc::new(TextConverter::new("TEXT", "VARCHAR")));
    registry.register(ValueKind::Bytes, Arc::new(BytesConverter::new("BLOB", "X'", "'")));
    registry.register(ValueKind::Uuid, Arc::new(UuidConverter::new("TEXT", true)));
    registry.register(ValueKind::DateTime, Arc::new(DateTimeConverter::new("TEXT")));
    registry.register(
        ValueKind::RowVersion,
        Arc::new(RowVersionConverter::new("INTEGER")),
    );
    registry
}

impl DialectProvider for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_char(&self) -> char {
        '"'
    }

    fn param_prefix(&self) -> &'static str {
        "@"
    }

    fn naming(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    fn auto_increment_clause(&self, _field: &FieldDefinition) -> Option<&'static str> {
        Some("AUTOINCREMENT")
    }

    fn to_alter_column(
        &self,
        _model: &ModelDefinition,
        _field: &FieldDefinition,
    ) -> Result<String, SqlForgeError> {
        Err(SqlForgeError::Unsupported {
            dialect: self.name(),
            operation: "ALTER COLUMN",
        })
    }

    fn to_add_foreign_key(
        &self,
        _model: &ModelDefinition,
        _field: &FieldDefinition,
        _foreign_key: &ForeignKeyConstraint,
    ) -> Result<String, SqlForgeError> {
        Err(SqlForgeError::Unsupported {
            dialect: self.name(),
            operation: "ADD FOREIGN KEY",
        })
    }

    fn to_drop_foreign_key(
        &self,
        _model: &ModelDefinition,
        _constraint_name: &str,
    ) -> Result<String, SqlForgeError> {
        Err(SqlForgeError::Unsupported {
            dialect: self.name(),
            operation: "DROP FOREIGN KEY",
        })
    }
}
