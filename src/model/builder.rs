//! Declarative model assembly
//!
//! The engine never inspects language-level reflection metadata. Whatever
//! discovers per-field annotations (a derive macro, a code generator, plain
//! hand-written code) funnels them through this builder into plain data.

use crate::convert::ValueKind;
use crate::model::{FieldDefinition, ModelDefinition};

/// Assembles a [`ModelDefinition`] from declarative parts.
#[derive(Debug)]
pub struct ModelBuilder {
    name: String,
    alias: Option<String>,
    schema: Option<String>,
    fields: Vec<FieldDefinition>,
}

impl ModelBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            alias: None,
            schema: None,
            fields: Vec::new(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    /// Append a fully-specified field. Declaration order is preserved and
    /// becomes the CREATE TABLE column order.
    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    /// Append a field customized in place, avoiding a separate
    /// `FieldDefinition` binding at the call site.
    pub fn field_with<F>(mut self, name: &str, field_type: ValueKind, customize: F) -> Self
    where
        F: FnOnce(&mut FieldDefinition),
    {
        let mut field = FieldDefinition::new(name, field_type);
        customize(&mut field);
        self.fields.push(field);
        self
    }

    pub fn build(self) -> ModelDefinition {
        ModelDefinition {
            name: self.name,
            alias: self.alias,
            schema: self.schema,
            fields: self.fields,
        }
    }
}
