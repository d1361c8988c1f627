//! Record metadata representation

use crate::error::SqlForgeError;
use crate::model::FieldDefinition;

/// Immutable description of a record type's SQL shape.
///
/// Constructed once per distinct record type on first use, published through
/// the model registry, and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ModelDefinition {
    /// Logical type name
    pub name: String,
    /// Optional rename; when present it replaces `name` everywhere
    pub alias: Option<String>,
    /// Schema qualifier; presence implies schema-qualified statements
    pub schema: Option<String>,
    /// Fields in declaration order
    pub fields: Vec<FieldDefinition>,
}

impl ModelDefinition {
    /// The effective model name (`alias` wins over `name`).
    pub fn model_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn is_schema_qualified(&self) -> bool {
        self.schema.is_some()
    }

    /// The primary key field. A model without one is a metadata error at the
    /// point of use, never a silent `None`.
    pub fn primary_key(&self) -> Result<&FieldDefinition, SqlForgeError> {
        self.fields
            .iter()
            .find(|f| f.is_primary_key)
            .ok_or_else(|| SqlForgeError::MissingPrimaryKey {
                model: self.model_name().to_string(),
            })
    }

    /// All primary key fields, in declaration order. Usually one; composite
    /// keys render as a trailing PRIMARY KEY clause.
    pub fn primary_keys(&self) -> Vec<&FieldDefinition> {
        self.fields.iter().filter(|f| f.is_primary_key).collect()
    }

    pub fn has_primary_key(&self) -> bool {
        self.fields.iter().any(|f| f.is_primary_key)
    }

    /// Look up a field by its effective name.
    pub fn field(&self, field_name: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.field_name() == field_name)
    }

    /// The optimistic-concurrency token field, if the model declares one.
    pub fn row_version_field(&self) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.is_row_version)
    }
}
