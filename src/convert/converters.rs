//! Builtin converters
//!
//! Dialect providers assemble their registries from these, parameterized with
//! the dialect's storage type keywords and literal syntax.

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use uuid::Uuid;

use crate::convert::{Converter, ParameterKind, Value};
use crate::error::SqlForgeError;
use crate::model::FieldDefinition;

/// Render format shared by datetime storage and literals.
const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Bare literal text for a stored value; quoting is the caller's concern.
pub(crate) fn literal_text(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Bool(v) => v.to_string(),
        Value::Int16(v) => v.to_string(),
        Value::Int32(v) => v.to_string(),
        Value::Int64(v) => v.to_string(),
        Value::Float32(v) => v.to_string(),
        Value::Float64(v) => v.to_string(),
        Value::Decimal(v) => v.to_string(),
        Value::Text(v) => v.clone(),
        Value::Bytes(v) => hex::encode(v),
        Value::Uuid(v) => v.hyphenated().to_string(),
        Value::DateTime(v) => v.format(DATETIME_FORMAT).to_string(),
        Value::RowVersion(v) => v.to_string(),
    }
}

fn mismatch(field: &FieldDefinition, value: &Value) -> SqlForgeError {
    SqlForgeError::ValueTypeMismatch {
        column: field.field_name().to_string(),
        column_type: field.column_type().name().to_string(),
        value_type: value.type_name().to_string(),
    }
}

fn invalid(field: &FieldDefinition, message: impl Into<String>) -> SqlForgeError {
    SqlForgeError::InvalidValue {
        column: field.field_name().to_string(),
        column_type: field.column_type().name().to_string(),
        message: message.into(),
    }
}

/// Integer columns of any width.
pub struct IntegerConverter {
    storage: &'static str,
}

impl IntegerConverter {
    pub fn new(storage: &'static str) -> Self {
        Self { storage }
    }
}

impl Converter for IntegerConverter {
    fn storage_type(&self, _field: &FieldDefinition) -> String {
        self.storage.to_string()
    }

    fn parameter_kind(&self) -> ParameterKind {
        ParameterKind::Int
    }

    fn quotes_literal(&self) -> bool {
        false
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        match value {
            Value::Null | Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => Ok(value.clone()),
            other => Err(mismatch(field, other)),
        }
    }
}

/// Floating-point columns; accepts integer values by widening.
pub struct FloatConverter {
    storage: &'static str,
}

impl FloatConverter {
    pub fn new(storage: &'static str) -> Self {
        Self { storage }
    }
}

impl Converter for FloatConverter {
    fn storage_type(&self, _field: &FieldDefinition) -> String {
        self.storage.to_string()
    }

    fn parameter_kind(&self) -> ParameterKind {
        ParameterKind::Float
    }

    fn quotes_literal(&self) -> bool {
        false
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        match value {
            Value::Null | Value::Float32(_) | Value::Float64(_) => Ok(value.clone()),
            Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => {
                // as_i64 covers exactly the three arms above
                Ok(Value::Float64(value.as_i64().unwrap_or_default() as f64))
            }
            other => Err(mismatch(field, other)),
        }
    }
}

/// Boolean columns. Literal syntax differs by dialect: keywords
/// (`TRUE`/`FALSE`) or integers (`1`/`0`).
pub struct BoolConverter {
    storage: &'static str,
    keyword_literals: bool,
}

impl BoolConverter {
    pub fn new(storage: &'static str, keyword_literals: bool) -> Self {
        Self {
            storage,
            keyword_literals,
        }
    }
}

impl Converter for BoolConverter {
    fn storage_type(&self, _field: &FieldDefinition) -> String {
        self.storage.to_string()
    }

    fn parameter_kind(&self) -> ParameterKind {
        ParameterKind::Bool
    }

    fn quotes_literal(&self) -> bool {
        false
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        match value {
            Value::Null | Value::Bool(_) => Ok(value.clone()),
            other => Err(mismatch(field, other)),
        }
    }

    fn quoted_literal(
        &self,
        field: &FieldDefinition,
        value: &Value,
    ) -> Result<String, SqlForgeError> {
        match self.to_storage(field, value)? {
            Value::Null => Ok("NULL".to_string()),
            Value::Bool(v) if self.keyword_literals => {
                Ok(if v { "TRUE" } else { "FALSE" }.to_string())
            }
            Value::Bool(v) => Ok(if v { "1" } else { "0" }.to_string()),
            other => Err(mismatch(field, &other)),
        }
    }
}

/// Exact-precision decimal columns.
///
/// Values whose scale exceeds the declared scale are truncated toward zero,
/// never rounded half-up; `12.345` stored into scale 2 reads back `12.34`.
pub struct DecimalConverter {
    storage: &'static str,
    default_precision: u32,
    default_scale: u32,
}

impl DecimalConverter {
    pub fn new(storage: &'static str, default_precision: u32, default_scale: u32) -> Self {
        Self {
            storage,
            default_precision,
            default_scale,
        }
    }

    fn declared_scale(&self, field: &FieldDefinition) -> u32 {
        field.scale.unwrap_or(self.default_scale)
    }
}

impl Converter for DecimalConverter {
    fn storage_type(&self, field: &FieldDefinition) -> String {
        format!(
            "{}({},{})",
            self.storage,
            field.field_length.unwrap_or(self.default_precision),
            self.declared_scale(field)
        )
    }

    fn parameter_kind(&self) -> ParameterKind {
        ParameterKind::Decimal
    }

    fn quotes_literal(&self) -> bool {
        false
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        let decimal = match value {
            Value::Null => return Ok(Value::Null),
            Value::Decimal(d) => *d,
            Value::Int16(v) => Decimal::from(*v),
            Value::Int32(v) => Decimal::from(*v),
            Value::Int64(v) => Decimal::from(*v),
            Value::Float64(v) => Decimal::try_from(*v)
                .map_err(|e| invalid(field, e.to_string()))?,
            other => return Err(mismatch(field, other)),
        };
        Ok(Value::Decimal(decimal.round_dp_with_strategy(
            self.declared_scale(field),
            RoundingStrategy::ToZero,
        )))
    }

    fn from_storage(&self, field: &FieldDefinition, raw: Value) -> Result<Value, SqlForgeError> {
        match raw {
            Value::Null | Value::Decimal(_) => Ok(raw),
            Value::Text(s) => s
                .parse::<Decimal>()
                .map(Value::Decimal)
                .map_err(|e| invalid(field, e.to_string())),
            Value::Float64(v) => Decimal::try_from(v)
                .map(Value::Decimal)
                .map_err(|e| invalid(field, e.to_string())),
            Value::Int16(_) | Value::Int32(_) | Value::Int64(_) => Ok(Value::Decimal(
                Decimal::from(raw.as_i64().unwrap_or_default()),
            )),
            other => Err(mismatch(field, &other)),
        }
    }
}

/// Text columns: the sized keyword (`VARCHAR(n)`) when a length applies,
/// the bare keyword (`TEXT`) otherwise.
///
/// Doubles as the registry fallback: scalar values of any other kind
/// stringify, which is also why unregistered kinds persist as quoted text.
pub struct TextConverter {
    bare: &'static str,
    sized: &'static str,
    default_length: Option<u32>,
}

impl TextConverter {
    /// Sized only when the field declares a length.
    pub fn new(bare: &'static str, sized: &'static str) -> Self {
        Self {
            bare,
            sized,
            default_length: None,
        }
    }

    /// Always sized, defaulting the length when the field declares none.
    pub fn with_default_length(
        bare: &'static str,
        sized: &'static str,
        default_length: u32,
    ) -> Self {
        Self {
            bare,
            sized,
            default_length: Some(default_length),
        }
    }
}

impl Converter for TextConverter {
    fn storage_type(&self, field: &FieldDefinition) -> String {
        match field.field_length.or(self.default_length) {
            Some(length) => format!("{}({})", self.sized, length),
            None => self.bare.to_string(),
        }
    }

    fn parameter_kind(&self) -> ParameterKind {
        ParameterKind::Text
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        match value {
            Value::Null | Value::Text(_) => Ok(value.clone()),
            Value::Bytes(_) => Err(mismatch(field, value)),
            scalar => Ok(Value::Text(literal_text(scalar))),
        }
    }
}

/// Binary columns.
///
/// Parameters bind the raw bytes; inline literals render as the dialect's
/// hex form (`X'..'`, `0x..`, `'\x..'`), the one converter where
/// `to_parameter` and `quoted_literal` genuinely diverge.
pub struct BytesConverter {
    storage: &'static str,
    literal_prefix: &'static str,
    literal_suffix: &'static str,
}

impl BytesConverter {
    pub fn new(
        storage: &'static str,
        literal_prefix: &'static str,
        literal_suffix: &'static str,
    ) -> Self {
        Self {
            storage,
            literal_prefix,
            literal_suffix,
        }
    }
}

impl Converter for BytesConverter {
    fn storage_type(&self, field: &FieldDefinition) -> String {
        match field.field_length {
            Some(length) => format!("{}({})", self.storage, length),
            None => self.storage.to_string(),
        }
    }

    fn parameter_kind(&self) -> ParameterKind {
        ParameterKind::Bytes
    }

    fn quotes_literal(&self) -> bool {
        false
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        match value {
            Value::Null | Value::Bytes(_) => Ok(value.clone()),
            other => Err(mismatch(field, other)),
        }
    }

    fn quoted_literal(
        &self,
        field: &FieldDefinition,
        value: &Value,
    ) -> Result<String, SqlForgeError> {
        match self.to_storage(field, value)? {
            Value::Null => Ok("NULL".to_string()),
            Value::Bytes(bytes) => Ok(format!(
                "{}{}{}",
                self.literal_prefix,
                hex::encode(bytes),
                self.literal_suffix
            )),
            other => Err(mismatch(field, &other)),
        }
    }
}

/// UUID columns, stored natively or as hyphenated text.
pub struct UuidConverter {
    storage: &'static str,
    store_as_text: bool,
}

impl UuidConverter {
    pub fn new(storage: &'static str, store_as_text: bool) -> Self {
        Self {
            storage,
            store_as_text,
        }
    }
}

impl Converter for UuidConverter {
    fn storage_type(&self, _field: &FieldDefinition) -> String {
        self.storage.to_string()
    }

    fn parameter_kind(&self) -> ParameterKind {
        ParameterKind::Uuid
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::Uuid(v) if self.store_as_text => {
                Ok(Value::Text(v.hyphenated().to_string()))
            }
            Value::Uuid(_) => Ok(value.clone()),
            Value::Text(s) => {
                let parsed = s
                    .parse::<Uuid>()
                    .map_err(|e| invalid(field, e.to_string()))?;
                if self.store_as_text {
                    Ok(Value::Text(parsed.hyphenated().to_string()))
                } else {
                    Ok(Value::Uuid(parsed))
                }
            }
            other => Err(mismatch(field, other)),
        }
    }

    fn from_storage(&self, field: &FieldDefinition, raw: Value) -> Result<Value, SqlForgeError> {
        match raw {
            Value::Null | Value::Uuid(_) => Ok(raw),
            Value::Text(s) => s
                .parse::<Uuid>()
                .map(Value::Uuid)
                .map_err(|e| invalid(field, e.to_string())),
            other => Err(mismatch(field, &other)),
        }
    }
}

/// Datetime columns stored in the dialect's textual format.
pub struct DateTimeConverter {
    storage: &'static str,
}

impl DateTimeConverter {
    pub fn new(storage: &'static str) -> Self {
        Self { storage }
    }
}

impl Converter for DateTimeConverter {
    fn storage_type(&self, _field: &FieldDefinition) -> String {
        self.storage.to_string()
    }

    fn parameter_kind(&self) -> ParameterKind {
        ParameterKind::DateTime
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::DateTime(v) => Ok(Value::Text(v.format(DATETIME_FORMAT).to_string())),
            Value::Text(s) => {
                NaiveDateTime::parse_from_str(s, DATETIME_FORMAT)
                    .map_err(|e| invalid(field, e.to_string()))?;
                Ok(value.clone())
            }
            other => Err(mismatch(field, other)),
        }
    }

    fn from_storage(&self, field: &FieldDefinition, raw: Value) -> Result<Value, SqlForgeError> {
        match raw {
            Value::Null | Value::DateTime(_) => Ok(raw),
            Value::Text(s) => NaiveDateTime::parse_from_str(&s, DATETIME_FORMAT)
                .map(|naive| Value::DateTime(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc)))
                .map_err(|e| invalid(field, e.to_string())),
            other => Err(mismatch(field, &other)),
        }
    }
}

/// Row-version concurrency tokens.
///
/// Read back through this dedicated accessor, not as an ordinary integer
/// column: the server may hand back an 8-byte big-endian token.
pub struct RowVersionConverter {
    storage: &'static str,
}

impl RowVersionConverter {
    pub fn new(storage: &'static str) -> Self {
        Self { storage }
    }
}

impl Converter for RowVersionConverter {
    fn storage_type(&self, _field: &FieldDefinition) -> String {
        self.storage.to_string()
    }

    fn parameter_kind(&self) -> ParameterKind {
        ParameterKind::Int
    }

    fn quotes_literal(&self) -> bool {
        false
    }

    fn to_storage(&self, field: &FieldDefinition, value: &Value) -> Result<Value, SqlForgeError> {
        match value {
            Value::Null => Ok(Value::Null),
            Value::RowVersion(v) => Ok(Value::Int64(*v as i64)),
            Value::Int64(_) => Ok(value.clone()),
            other => Err(mismatch(field, other)),
        }
    }

    fn from_storage(&self, field: &FieldDefinition, raw: Value) -> Result<Value, SqlForgeError> {
        match raw {
            Value::Null | Value::RowVersion(_) => Ok(raw),
            Value::Int64(v) => Ok(Value::RowVersion(v as u64)),
            Value::Bytes(bytes) => {
                let arr: [u8; 8] = bytes
                    .as_slice()
                    .try_into()
                    .map_err(|_| invalid(field, format!("expected 8 bytes, got {}", bytes.len())))?;
                Ok(Value::RowVersion(u64::from_be_bytes(arr)))
            }
            other => Err(mismatch(field, &other)),
        }
    }
}
