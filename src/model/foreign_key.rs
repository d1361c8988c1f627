//! Foreign key metadata

use std::any::TypeId;
use std::sync::Arc;

use crate::error::SqlForgeError;
use crate::model::registry::{registered_model, Record};
use crate::model::{FieldDefinition, ModelDefinition};
use crate::naming::NamingStrategy;

/// Referential action for ON DELETE / ON UPDATE clauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferentialAction {
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ReferentialAction {
    pub const fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}

/// Handle to a referenced record type.
///
/// The referenced `ModelDefinition` is resolved lazily through the model
/// registry at statement-generation time, so two models may reference each
/// other without eager circular resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelHandle {
    type_id: TypeId,
    type_name: &'static str,
}

impl ModelHandle {
    pub fn of<T: Record>() -> Self {
        Self {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Look up the published model definition, without computing one.
    pub fn resolve(&self) -> Option<Arc<ModelDefinition>> {
        registered_model(self.type_id)
    }
}

/// Immutable foreign key declaration attached to a field.
#[derive(Debug, Clone)]
pub struct ForeignKeyConstraint {
    pub reference: ModelHandle,
    pub on_delete: Option<ReferentialAction>,
    pub on_update: Option<ReferentialAction>,
    /// Explicit constraint name; when absent the name is derived
    /// deterministically from both tables and the column.
    pub foreign_key_name: Option<String>,
}

impl ForeignKeyConstraint {
    pub fn new(reference: ModelHandle) -> Self {
        Self {
            reference,
            on_delete: None,
            on_update: None,
            foreign_key_name: None,
        }
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.foreign_key_name = Some(name.into());
        self
    }

    /// Resolve the referenced model, failing descriptively when the target
    /// type was never registered.
    pub fn resolve_reference(
        &self,
        owner: &ModelDefinition,
        field: &FieldDefinition,
    ) -> Result<Arc<ModelDefinition>, SqlForgeError> {
        self.reference
            .resolve()
            .ok_or_else(|| SqlForgeError::UnresolvedReference {
                model: owner.model_name().to_string(),
                field: field.field_name().to_string(),
                type_name: self.reference.type_name().to_string(),
            })
    }

    /// The effective constraint name.
    ///
    /// Without an explicit name, derives
    /// `FK_{ownerTable}_{referencedTable}_{column}` over physical names,
    /// schema-prefixed when either side is schema-qualified, then passes the
    /// result through the naming strategy's restriction filter. Derivation is
    /// deterministic: drop/alter must produce the same name as creation.
    pub fn constraint_name(
        &self,
        owner: &ModelDefinition,
        referenced: &ModelDefinition,
        field: &FieldDefinition,
        naming: &dyn NamingStrategy,
    ) -> String {
        if let Some(name) = &self.foreign_key_name {
            return name.clone();
        }
        let owner_table = naming.table_name(owner.model_name());
        let referenced_table = naming.table_name(referenced.model_name());
        let column = naming.column_name(field.field_name());
        let name = match owner.schema.as_deref().or(referenced.schema.as_deref()) {
            Some(schema) => format!(
                "FK_{}_{}_{}_{}",
                schema, owner_table, referenced_table, column
            ),
            None => format!("FK_{}_{}_{}", owner_table, referenced_table, column),
        };
        naming.apply_name_restrictions(&name)
    }
}
