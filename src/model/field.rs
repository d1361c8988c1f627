//! Field metadata

use crate::convert::ValueKind;
use crate::model::ForeignKeyConstraint;

/// Immutable description of one field of a record type.
///
/// Declaration order inside [`super::ModelDefinition`] is semantically
/// significant: it is the column order rendered into CREATE TABLE.
#[derive(Debug, Clone)]
pub struct FieldDefinition {
    /// Logical field name
    pub name: String,
    /// Optional rename; when present it replaces `name` everywhere
    pub alias: Option<String>,
    /// Native in-memory type
    pub field_type: ValueKind,
    /// Storage-type override (e.g. persist a uuid as text)
    pub treat_as_type: Option<ValueKind>,
    pub is_primary_key: bool,
    pub auto_increment: bool,
    pub is_nullable: bool,
    pub is_indexed: bool,
    pub is_unique: bool,
    pub is_clustered: bool,
    pub is_non_clustered: bool,
    /// Optimistic-concurrency token column
    pub is_row_version: bool,
    pub is_computed: bool,
    pub ignore_on_insert: bool,
    pub ignore_on_update: bool,
    /// Length for sized text/binary types, precision for decimals
    pub field_length: Option<u32>,
    /// Scale for decimal columns
    pub scale: Option<u32>,
    /// Raw SQL default expression
    pub default_value: Option<String>,
    /// Raw SQL check expression
    pub check_constraint: Option<String>,
    /// Sequence backing this column on dialects with sequence support
    pub sequence: Option<String>,
    /// Expression for computed columns
    pub compute_expression: Option<String>,
    /// Replacement select-list expression
    pub custom_select: Option<String>,
    /// Raw column definition override; rendered verbatim when present
    pub custom_field_definition: Option<String>,
    pub foreign_key: Option<ForeignKeyConstraint>,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, field_type: ValueKind) -> Self {
        Self {
            name: name.into(),
            alias: None,
            field_type,
            treat_as_type: None,
            is_primary_key: false,
            auto_increment: false,
            is_nullable: false,
            is_indexed: false,
            is_unique: false,
            is_clustered: false,
            is_non_clustered: false,
            is_row_version: false,
            is_computed: false,
            ignore_on_insert: false,
            ignore_on_update: false,
            field_length: None,
            scale: None,
            default_value: None,
            check_constraint: None,
            sequence: None,
            compute_expression: None,
            custom_select: None,
            custom_field_definition: None,
            foreign_key: None,
        }
    }

    /// The effective field name (`alias` wins over `name`).
    pub fn field_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// The effective storage kind (`treat_as_type` wins over `field_type`).
    pub fn column_type(&self) -> ValueKind {
        self.treat_as_type.unwrap_or(self.field_type)
    }

    /// Fields the INSERT column list must not include.
    pub fn should_skip_insert(&self) -> bool {
        self.ignore_on_insert || self.auto_increment || self.is_computed || self.is_row_version
    }

    /// Fields the UPDATE set list must not include.
    pub fn should_skip_update(&self) -> bool {
        self.ignore_on_update || self.is_computed
    }

    /// Fields DELETE targeting must not reference.
    pub fn should_skip_delete(&self) -> bool {
        self.is_computed
    }

    /// Whether `name` is this field's conventional back-reference
    /// (`{field_name}Id`).
    pub fn is_self_ref_field(&self, name: &str) -> bool {
        let own = self.field_name();
        name.len() == own.len() + 2 && name.starts_with(own) && name.ends_with("Id")
    }

    /// Structural clone with an optional mutation, used to specialize a cached
    /// field per statement without touching the published original.
    pub fn clone_with<F>(&self, mutate: F) -> FieldDefinition
    where
        F: FnOnce(&mut FieldDefinition),
    {
        let mut copy = self.clone();
        mutate(&mut copy);
        copy
    }
}
