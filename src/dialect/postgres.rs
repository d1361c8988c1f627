//! PostgreSQL dialect provider

use std::sync::Arc;

use crate::convert::{
    BoolConverter, BytesConverter, ConverterRegistry, DateTimeConverter, DecimalConverter,
    FloatConverter, IntegerConverter, RowVersionConverter, TextConverter, UuidConverter,
    ValueKind,
};
use crate::dialect::DialectProvider;
use crate::error::SqlForgeError;
use crate::model::{FieldDefinition, ModelDefinition};
use crate::naming::{IdentityNaming, NamingStrategy};

/// PostgreSQL: double-quote identifiers, `:name` parameters, identity
/// columns, and native sequence support for sequence-backed fields.
pub struct PostgresDialect {
    naming: Arc<dyn NamingStrategy>,
    converters: ConverterRegistry,
}

impl PostgresDialect {
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

impl Default for PostgresDialect {
    fn default() -> Self {
        Self::new()
    }
}

fn build_registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::new();
    registry.register(ValueKind::Bool, Arc::new(BoolConverter::new("BOOLEAN", true)));
    registry.register(ValueKind::Int16, Arc::new(IntegerConverter::new("SMALLINT")));
    registry.register(ValueKind::Int32, Arc::new(IntegerConverter::new("INTEGER")));
    registry.register(ValueKind::Int64, Arc::new(IntegerConverter::new("BIGINT")));
    registry.register(ValueKind::Float32, Arc::new(FloatConverter::new("REAL")));
    registry.register(
        ValueKind::Float64,
        Arc::new(FloatConverter::new("DOUBLE PRECISION")),
    );
    registry.register(
        ValueKind::Decimal,
        Arc::new(DecimalConverter::new("NUMERIC", 18, 6)),
    );
    registry.register(ValueKind::Text, Arc::new(TextConverter::new("TEXT", "VARCHAR")));
    registry.register(
        ValueKind::Bytes,
        Arc::new(BytesConverter::new("BYTEA", "'\\x", "'")),
    );
    registry.register(ValueKind::Uuid, Arc::new(UuidConverter::new("UUID", false)));
    registry.register(
        ValueKind::DateTime,
        Arc::new(DateTimeConverter::new("TIMESTAMP")),
    );
    registry.register(
        ValueKind::RowVersion,
        Arc::new(RowVersionConverter::new("BIGINT")),
    );
    registry
}

impl DialectProvider for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn quote_char(&self) -> char {
        '"'
    }

    fn param_prefix(&self) -> &'static str {
        ":"
    }

    fn naming(&self) -> &dyn NamingStrategy {
        self.naming.as_ref()
    }

    fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    fn auto_increment_clause(&self, _field: &FieldDefinition) -> Option<&'static str> {
        Some("GENERATED BY DEFAULT AS IDENTITY")
    }

    fn sequence_default(&self, sequence: &str) -> Option<String> {
        Some(format!("nextval('{}')", sequence))
    }

    fn computed_clause(&self, expression: &str) -> String {
        format!("GENERATED ALWAYS AS ({}) STORED", expression)
    }

    fn to_alter_column(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
    ) -> Result<String, SqlForgeError> {
        let converter = self.converters().for_field(field);
        Ok(format!(
            "ALTER TABLE {} ALTER COLUMN {} TYPE {};",
            self.quoted_table_name(model),
            self.quoted_column_name(field.field_name()),
            converter.storage_type(field)
        ))
    }

    fn to_create_sequences(&self, model: &ModelDefinition) -> Vec<String> {
        model
            .fields
            .iter()
            .filter_map(|f| f.sequence.as_deref())
            .map(|sequence| {
                format!(
                    "CREATE SEQUENCE IF NOT EXISTS {};",
                    self.quoted_name(sequence)
                )
            })
            .collect()
    }

    fn to_drop_sequences(&self, model: &ModelDefinition) -> Vec<String> {
        model
            .fields
            .iter()
            .filter_map(|f| f.sequence.as_deref())
            .map(|sequence| format!("DROP SEQUENCE IF EXISTS {};", self.quoted_name(sequence)))
            .collect()
    }
}
