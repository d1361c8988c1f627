//! Naming strategies
//!
//! Pure logical-to-physical identifier transforms. Strategies hold no mutable
//! state (the alias strategy's maps are populated at construction) and are
//! safe to share across threads.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::model::ModelDefinition;
use crate::util::to_snake_case;

/// Characters outside this set are stripped before truncation.
static IDENTIFIER_SANITIZER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^A-Za-z0-9_]").expect("Invalid identifier regex"));

/// Sanitize and deterministically truncate an identifier to `max_length`.
fn restrict(name: &str, max_length: Option<usize>) -> String {
    let sanitized = IDENTIFIER_SANITIZER.replace_all(name, "");
    let mut out = sanitized.into_owned();
    if let Some(max) = max_length {
        if out.len() > max {
            out.truncate(max);
        }
    }
    out
}

/// Logical-to-physical identifier mapping.
pub trait NamingStrategy: Send + Sync {
    fn table_name(&self, name: &str) -> String;

    fn column_name(&self, name: &str) -> String;

    /// Physical name of the sequence backing `field` on `model`.
    fn sequence_name(&self, model_name: &str, field_name: &str) -> String {
        self.apply_name_restrictions(&format!(
            "SEQ_{}_{}",
            self.table_name(model_name),
            self.column_name(field_name)
        ))
    }

    /// Sanitization and deterministic truncation for dialect identifier
    /// limits. Truncation never fails; collisions it introduces surface later
    /// as [`crate::SqlForgeError::NameCollision`].
    fn apply_name_restrictions(&self, name: &str) -> String {
        restrict(name, self.max_identifier_length())
    }

    /// Length limit enforced by `apply_name_restrictions`, if any.
    fn max_identifier_length(&self) -> Option<usize> {
        None
    }

    /// Physical table name for a resolved model.
    fn table_name_for(&self, model: &ModelDefinition) -> String {
        self.table_name(model.model_name())
    }
}

/// Passes logical names through untouched (modulo restrictions).
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityNaming {
    pub max_length: Option<usize>,
}

impl NamingStrategy for IdentityNaming {
    fn table_name(&self, name: &str) -> String {
        self.apply_name_restrictions(name)
    }

    fn column_name(&self, name: &str) -> String {
        self.apply_name_restrictions(name)
    }

    fn max_identifier_length(&self) -> Option<usize> {
        self.max_length
    }
}

/// `OrderLineItem` -> `order_line_item`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LowerSnakeNaming {
    pub max_length: Option<usize>,
}

impl NamingStrategy for LowerSnakeNaming {
    fn table_name(&self, name: &str) -> String {
        self.apply_name_restrictions(&to_snake_case(name))
    }

    fn column_name(&self, name: &str) -> String {
        self.apply_name_restrictions(&to_snake_case(name))
    }

    fn max_identifier_length(&self) -> Option<usize> {
        self.max_length
    }
}

/// `OrderLineItem` -> `ORDERLINEITEM`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UpperCaseNaming {
    pub max_length: Option<usize>,
}

impl NamingStrategy for UpperCaseNaming {
    fn table_name(&self, name: &str) -> String {
        self.apply_name_restrictions(&name.to_ascii_uppercase())
    }

    fn column_name(&self, name: &str) -> String {
        self.apply_name_restrictions(&name.to_ascii_uppercase())
    }

    fn max_identifier_length(&self) -> Option<usize> {
        self.max_length
    }
}

/// Consults explicit alias maps, then delegates to an inner strategy.
///
/// Alias substitution happens before the inner transform: an aliased table
/// name still goes through the inner strategy's casing rules.
pub struct AliasNaming {
    table_aliases: HashMap<String, String>,
    column_aliases: HashMap<String, String>,
    inner: Box<dyn NamingStrategy>,
}

impl AliasNaming {
    pub fn new(inner: Box<dyn NamingStrategy>) -> Self {
        Self {
            table_aliases: HashMap::new(),
            column_aliases: HashMap::new(),
            inner,
        }
    }

    pub fn with_table_alias(mut self, logical: impl Into<String>, alias: impl Into<String>) -> Self {
        self.table_aliases.insert(logical.into(), alias.into());
        self
    }

    pub fn with_column_alias(
        mut self,
        logical: impl Into<String>,
        alias: impl Into<String>,
    ) -> Self {
        self.column_aliases.insert(logical.into(), alias.into());
        self
    }
}

impl NamingStrategy for AliasNaming {
    fn table_name(&self, name: &str) -> String {
        let substituted = self.table_aliases.get(name).map(String::as_str).unwrap_or(name);
        self.inner.table_name(substituted)
    }

    fn column_name(&self, name: &str) -> String {
        let substituted = self
            .column_aliases
            .get(name)
            .map(String::as_str)
            .unwrap_or(name);
        self.inner.column_name(substituted)
    }

    fn max_identifier_length(&self) -> Option<usize> {
        self.inner.max_identifier_length()
    }
}
