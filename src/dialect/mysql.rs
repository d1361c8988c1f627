//! MySQL dialect provider

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

/// MySQL: backtick identifiers, `@name` parameters, `AUTO_INCREMENT`, and
/// `CHANGE COLUMN` / `DROP FOREIGN KEY` alter syntax.
pub struct MysqlDialect {
    naming: Arc<dyn NamingStrategy>,
    converters: ConverterRegistry,
}

impl MysqlDialect {
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

impl Default for MysqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

fn build_registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::new();
    registry.register(
        ValueKind::Bool,
        Arc::new(BoolConverter::new("TINYINT(1)", false)),
    );
    registry.register(ValueKind::Int16, Arc::new(IntegerConverter::new("SMALLINT")));
    registry.register(ValueKind::Int32, Arc::new(IntegerConverter::new("INT")));
    registry.register(ValueKind::Int64, Arc::new(IntegerConverter::new("BIGINT")));
    registry.register(ValueKind::Float32, Arc::new(FloatConverter::new("FLOAT")));
    registry.register(ValueKind::Float64, Arc::new(FloatConverter::new("DOUBLE")));
    registry.register(
        ValueKind::Decimal,
        Arc::new(DecimalConverter::new("DECIMAL", 18, 6)),
    );
    registry.register(
        ValueKind::Text,
        Arc::new(TextConverter::with_default_length("TEXT", "VARCHAR", 255)),
    );
    registry.register(ValueKind::Bytes, Arc::new(BytesConverter::new("BLOB", "0x", "")));
    registry.register(ValueKind::Uuid, Arc::new(UuidConverter::new("CHAR(36)", true)));
    registry.register(
        ValueKind::DateTime,
        Arc::new(DateTimeConverter::new("DATETIME(3)")),
    );
    registry.register(
        ValueKind::RowVersion,
        Arc::new(RowVersionConverter::new("BIGINT")),
    );
    registry
}

impl DialectProvider for MysqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn quote_char(&self) -> char {
        '`'
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
        Some("AUTO_INCREMENT")
    }

    fn to_change_column_name(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
        old_name: &str,
    ) -> Result<String, SqlForgeError> {
        // MySQL renames require restating the full column definition.
        Ok(format!(
            "ALTER TABLE {} CHANGE COLUMN {} {};",
            self.quoted_table_name(model),
            self.quoted_column_name(old_name),
            self.column_definition(field, false)?
        ))
    }

    fn to_drop_foreign_key(
        &self,
        model: &ModelDefinition,
        constraint_name: &str,
    ) -> Result<String, SqlForgeError> {
        Ok(format!(
            "ALTER TABLE {} DROP FOREIGN KEY {};",
            self.quoted_table_name(model),
            self.quoted_name(constraint_name)
        ))
    }

    fn to_drop_index(&self, model: &ModelDefinition, index_name: &str) -> String {
        format!(
            "DROP INDEX {} ON {};",
            self.quoted_name(index_name),
            self.quoted_table_name(model)
        )
    }
}
