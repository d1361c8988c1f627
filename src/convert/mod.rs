//! Value conversion between native types and dialect storage representations.

mod converters;
mod value;

pub use converters::{
    BoolConverter, BytesConverter, DateTimeConverter, DecimalConverter, FloatConverter,
    IntegerConverter, RowVersionConverter, TextConverter, UuidConverter,
};
pub use value::{Value, ValueKind};

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::SqlForgeError;
use crate::model::FieldDefinition;

/// The dialect's parameter-binding type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterKind {
    Bool,
    Int,
    Float,
    Decimal,
    Text,
    Bytes,
    Uuid,
    DateTime,
}

/// Converts one native kind to and from a dialect's storage representation.
///
/// `to_storage` and `from_storage` default to identity; `to_parameter`
/// defaults to `to_storage` and diverges only when the wire encoding for
/// bound parameters differs from the literal encoding (binary vs hex text).
pub trait Converter: Send + Sync {
    /// DDL storage type keyword, e.g. `INTEGER` or `DECIMAL(18,6)`.
    fn storage_type(&self, field: &FieldDefinition) -> String;

    fn parameter_kind(&self) -> ParameterKind;

    /// Whether inline literals of this kind are wrapped in single quotes.
    fn quotes_literal(&self) -> bool {
        true
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        let _ = field;
        Ok(value.clone())
    }

    fn to_parameter(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        self.to_storage(field, value)
    }

    fn from_storage(&self, field: &FieldDefinition, raw: Value) -> Result<Value, SqlForgeError> {
        let _ = field;
        Ok(raw)
    }

    /// Render an inline SQL literal for values not bound as parameters.
    fn quoted_literal(&self, field: &FieldDefinition, value: &Value) -> Result<String, SqlForgeError> {
        if value.is_null() {
            return Ok("NULL".to_string());
        }
        let stored = self.to_storage(field, value)?;
        let text = converters::literal_text(&stored);
        if self.quotes_literal() {
            Ok(format!("'{}'", text.replace('\'', "''")))
        } else {
            Ok(text)
        }
    }
}

/// Per-dialect converter table keyed by native kind.
///
/// Populated once at provider construction and read-only thereafter; lookup
/// is a single hash probe, never re-resolved per value.
pub struct ConverterRegistry {
    converters: HashMap<ValueKind, Arc<dyn Converter>>,
    fallback: Arc<dyn Converter>,
}

impl ConverterRegistry {
    /// An empty registry whose fallback is a plain text converter: any
    /// unregistered kind persists as quoted text.
    pub fn new() -> Self {
        Self {
            converters: HashMap::new(),
            fallback: Arc::new(TextConverter::new("TEXT", "VARCHAR")),
        }
    }

    pub fn register(&mut self, kind: ValueKind, converter: Arc<dyn Converter>) {
        self.converters.insert(kind, converter);
    }

    /// The converter for a native kind, falling back to text.
    pub fn get(&self, kind: ValueKind) -> &dyn Converter {
        self.converters
            .get(&kind)
            .unwrap_or(&self.fallback)
            .as_ref()
    }

    /// The converter for a field's effective column type.
    pub fn for_field(&self, field: &FieldDefinition) -> &dyn Converter {
        self.get(field.column_type())
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        Self::new()
    }
}
