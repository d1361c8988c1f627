//! SQL dialect providers
//!
//! A dialect provider composes the metadata model, a naming strategy, and a
//! converter registry into concrete SQL text. Statement synthesis is pure:
//! every statement is derived from the metadata snapshot alone, before any
//! network round-trip.

mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MysqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use std::collections::HashMap;

use crate::convert::ConverterRegistry;
use crate::error::SqlForgeError;
use crate::model::{FieldDefinition, ForeignKeyConstraint, ModelDefinition};
use crate::naming::NamingStrategy;
use crate::util::contains_ci;

/// A parameterized DML statement: SQL text plus bind names in order.
///
/// `params` holds logical field names; the text carries the dialect's
/// placeholder token for each (see [`DialectProvider::get_param`]).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<String>,
}

/// Dialect-specific quoting, parameter tokens, and statement synthesis.
pub trait DialectProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// The identifier quote character (open and close).
    fn quote_char(&self) -> char;

    /// Prefix for named parameter placeholders.
    fn param_prefix(&self) -> &'static str;

    fn naming(&self) -> &dyn NamingStrategy;

    fn converters(&self) -> &ConverterRegistry;

    /// Clause appended to an inline auto-increment primary key, if the
    /// dialect has one.
    fn auto_increment_clause(&self, field: &FieldDefinition) -> Option<&'static str>;

    // ------------------------------------------------------------------
    // Identifier quoting
    // ------------------------------------------------------------------

    /// Quote a raw identifier, doubling any embedded quote character.
    fn quoted_name(&self, raw: &str) -> String {
        let quote = self.quote_char();
        let mut out = String::with_capacity(raw.len() + 2);
        out.push(quote);
        for ch in raw.chars() {
            if ch == quote {
                out.push(quote);
            }
            out.push(ch);
        }
        out.push(quote);
        out
    }

    /// Physical, quoted, schema-qualified table name.
    fn quoted_table_name(&self, model: &ModelDefinition) -> String {
        let table = self.naming().table_name_for(model);
        match &model.schema {
            Some(schema) => format!(
                "{}.{}",
                self.quoted_name(schema),
                self.quoted_name(&table)
            ),
            None => self.quoted_name(&table),
        }
    }

    /// Physical, quoted column name.
    fn quoted_column_name(&self, name: &str) -> String {
        self.quoted_name(&self.naming().column_name(name))
    }

    // ------------------------------------------------------------------
    // Parameter tokens
    // ------------------------------------------------------------------

    /// `name` -> dialect placeholder token.
    fn get_param(&self, name: &str) -> String {
        format!("{}{}", self.param_prefix(), name)
    }

    /// Inverse of [`Self::get_param`].
    fn to_field_name<'a>(&self, param: &'a str) -> &'a str {
        param.strip_prefix(self.param_prefix()).unwrap_or(param)
    }

    // ------------------------------------------------------------------
    // Column rendering
    // ------------------------------------------------------------------

    /// Default expression for a sequence-backed column, on dialects with
    /// sequence support.
    fn sequence_default(&self, sequence: &str) -> Option<String> {
        let _ = sequence;
        None
    }

    /// Clause rendering a computed column's expression.
    fn computed_clause(&self, expression: &str) -> String {
        format!("AS ({})", expression)
    }

    /// Render one column of a CREATE TABLE or ADD/ALTER COLUMN statement.
    ///
    /// `inline_pk` is true when the model has a single primary key field,
    /// which renders inline rather than as a trailing clause.
    fn column_definition(
        &self,
        field: &FieldDefinition,
        inline_pk: bool,
    ) -> Result<String, SqlForgeError> {
        let quoted = self.quoted_column_name(field.field_name());
        if let Some(raw) = &field.custom_field_definition {
            return Ok(format!("{} {}", quoted, raw));
        }

        let converter = self.converters().for_field(field);
        let mut sql = format!("{} {}", quoted, converter.storage_type(field));

        if let Some(expression) = &field.compute_expression {
            sql.push(' ');
            sql.push_str(&self.computed_clause(expression));
            return Ok(sql);
        }

        if field.is_primary_key && inline_pk {
            sql.push_str(" PRIMARY KEY");
            if field.auto_increment {
                if let Some(clause) = self.auto_increment_clause(field) {
                    sql.push(' ');
                    sql.push_str(clause);
                }
            }
            return Ok(sql);
        }

        sql.push_str(if field.is_nullable { " NULL" } else { " NOT NULL" });
        if let Some(default) = &field.default_value {
            sql.push_str(&format!(" DEFAULT {}", default));
        } else if let Some(sequence) = &field.sequence {
            if let Some(default) = self.sequence_default(sequence) {
                sql.push_str(&format!(" DEFAULT {}", default));
            }
        }
        if let Some(check) = &field.check_constraint {
            sql.push_str(&format!(" CHECK ({})", check));
        }
        if field.is_unique {
            sql.push_str(" UNIQUE");
        }
        Ok(sql)
    }

    /// Trailing foreign key clause for a field carrying one.
    fn foreign_key_clause(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
        foreign_key: &ForeignKeyConstraint,
    ) -> Result<String, SqlForgeError> {
        let referenced = foreign_key.resolve_reference(model, field)?;
        let referenced_pk = referenced.primary_key()?;
        let name = foreign_key.constraint_name(model, &referenced, field, self.naming());
        let mut sql = format!(
            "CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {}({})",
            self.quoted_name(&name),
            self.quoted_column_name(field.field_name()),
            self.quoted_table_name(&referenced),
            self.quoted_column_name(referenced_pk.field_name())
        );
        if let Some(action) = foreign_key.on_delete {
            sql.push_str(&format!(" ON DELETE {}", action.as_sql()));
        }
        if let Some(action) = foreign_key.on_update {
            sql.push_str(&format!(" ON UPDATE {}", action.as_sql()));
        }
        Ok(sql)
    }

    // ------------------------------------------------------------------
    // DDL synthesis
    // ------------------------------------------------------------------

    fn to_create_table(&self, model: &ModelDefinition) -> Result<String, SqlForgeError> {
        // Restriction/truncation must not silently fold two columns together.
        let mut physical: HashMap<String, &str> = HashMap::new();
        for field in &model.fields {
            let name = self.naming().column_name(field.field_name());
            if let Some(first) = physical.insert(name.clone(), field.field_name()) {
                return Err(SqlForgeError::NameCollision {
                    first: first.to_string(),
                    second: field.field_name().to_string(),
                    restricted: name,
                });
            }
        }

        let primary_keys = model.primary_keys();
        let inline_pk = primary_keys.len() == 1;

        let mut parts = Vec::with_capacity(model.fields.len() + 2);
        for field in &model.fields {
            parts.push(self.column_definition(field, inline_pk)?);
        }

        if primary_keys.len() > 1 {
            let columns: Vec<String> = primary_keys
                .iter()
                .filter(|f| {
                    // A raw override that already declares the key wins.
                    f.custom_field_definition
                        .as_deref()
                        .is_none_or(|raw| !contains_ci(raw, "PRIMARY KEY"))
                })
                .map(|f| self.quoted_column_name(f.field_name()))
                .collect();
            if !columns.is_empty() {
                parts.push(format!("PRIMARY KEY ({})", columns.join(", ")));
            }
        }

        for field in &model.fields {
            if let Some(foreign_key) = &field.foreign_key {
                parts.push(self.foreign_key_clause(model, field, foreign_key)?);
            }
        }

        let table = self.quoted_table_name(model);
        tracing::debug!(dialect = self.name(), table = %table, "generated CREATE TABLE");
        Ok(format!("CREATE TABLE {} ({});", table, parts.join(", ")))
    }

    fn to_drop_table(&self, model: &ModelDefinition) -> String {
        format!("DROP TABLE {};", self.quoted_table_name(model))
    }

    fn to_add_column(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
    ) -> Result<String, SqlForgeError> {
        Ok(format!(
            "ALTER TABLE {} ADD COLUMN {};",
            self.quoted_table_name(model),
            self.column_definition(field, false)?
        ))
    }

    fn to_alter_column(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
    ) -> Result<String, SqlForgeError> {
        Ok(format!(
            "ALTER TABLE {} MODIFY COLUMN {};",
            self.quoted_table_name(model),
            self.column_definition(field, false)?
        ))
    }

    fn to_change_column_name(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
        old_name: &str,
    ) -> Result<String, SqlForgeError> {
        Ok(format!(
            "ALTER TABLE {} RENAME COLUMN {} TO {};",
            self.quoted_table_name(model),
            self.quoted_column_name(old_name),
            self.quoted_column_name(field.field_name())
        ))
    }

    fn to_drop_column(&self, model: &ModelDefinition, field_name: &str) -> String {
        format!(
            "ALTER TABLE {} DROP COLUMN {};",
            self.quoted_table_name(model),
            self.quoted_column_name(field_name)
        )
    }

    fn to_add_foreign_key(
        &self,
        model: &ModelDefinition,
        field: &FieldDefinition,
        foreign_key: &ForeignKeyConstraint,
    ) -> Result<String, SqlForgeError> {
        Ok(format!(
            "ALTER TABLE {} ADD {};",
            self.quoted_table_name(model),
            self.foreign_key_clause(model, field, foreign_key)?
        ))
    }

    fn to_drop_foreign_key(
        &self,
        model: &ModelDefinition,
        constraint_name: &str,
    ) -> Result<String, SqlForgeError> {
        Ok(format!(
            "ALTER TABLE {} DROP CONSTRAINT {};",
            self.quoted_table_name(model),
            self.quoted_name(constraint_name)
        ))
    }

    /// Deterministic fallback name for an unnamed index. Distinct across
    /// multiple indexes on the same table because every participating column
    /// joins the name, in declaration order.
    fn index_name(&self, model: &ModelDefinition, field_names: &[&str], unique: bool) -> String {
        let prefix = if unique { "uidx" } else { "idx" };
        let mut name = format!("{}_{}", prefix, self.naming().table_name_for(model));
        for field_name in field_names {
            name.push('_');
            name.push_str(&self.naming().column_name(field_name));
        }
        self.naming().apply_name_restrictions(&name)
    }

    fn to_create_index(
        &self,
        model: &ModelDefinition,
        field_names: &[&str],
        unique: bool,
        index_name: Option<&str>,
    ) -> Result<String, SqlForgeError> {
        let name = match index_name {
            Some(explicit) => explicit.to_string(),
            None => self.index_name(model, field_names, unique),
        };
        let columns: Vec<String> = field_names
            .iter()
            .map(|f| self.quoted_column_name(f))
            .collect();
        Ok(format!(
            "CREATE {}INDEX {} ON {} ({});",
            if unique { "UNIQUE " } else { "" },
            self.quoted_name(&name),
            self.quoted_table_name(model),
            columns.join(", ")
        ))
    }

    fn to_drop_index(&self, model: &ModelDefinition, index_name: &str) -> String {
        let _ = model;
        format!("DROP INDEX {};", self.quoted_name(index_name))
    }

    /// Sequence DDL for sequence-backed fields, on dialects that have them.
    fn to_create_sequences(&self, model: &ModelDefinition) -> Vec<String> {
        let _ = model;
        Vec::new()
    }

    fn to_drop_sequences(&self, model: &ModelDefinition) -> Vec<String> {
        let _ = model;
        Vec::new()
    }

    // ------------------------------------------------------------------
    // DML synthesis
    // ------------------------------------------------------------------

    fn to_insert_statement(&self, model: &ModelDefinition) -> Result<SqlStatement, SqlForgeError> {
        let mut columns = Vec::new();
        let mut placeholders = Vec::new();
        let mut params = Vec::new();
        for field in model.fields.iter().filter(|f| !f.should_skip_insert()) {
            columns.push(self.quoted_column_name(field.field_name()));
            placeholders.push(self.get_param(field.field_name()));
            params.push(field.field_name().to_string());
        }
        Ok(SqlStatement {
            sql: format!(
                "INSERT INTO {} ({}) VALUES ({});",
                self.quoted_table_name(model),
                columns.join(", "),
                placeholders.join(", ")
            ),
            params,
        })
    }

    /// UPDATE targeting the primary key, with the row-version guard appended
    /// when the model declares a concurrency token.
    fn to_update_statement(&self, model: &ModelDefinition) -> Result<SqlStatement, SqlForgeError> {
        // Fails fast on models without a key; key-based targeting needs one.
        model.primary_key()?;

        let mut assignments = Vec::new();
        let mut params = Vec::new();
        for field in model.fields.iter().filter(|f| {
            !f.should_skip_update() && !f.is_primary_key && !f.is_row_version
        }) {
            assignments.push(format!(
                "{} = {}",
                self.quoted_column_name(field.field_name()),
                self.get_param(field.field_name())
            ));
            params.push(field.field_name().to_string());
        }

        let (predicate, mut where_params) = self.key_predicate(model)?;
        params.append(&mut where_params);

        Ok(SqlStatement {
            sql: format!(
                "UPDATE {} SET {} WHERE {};",
                self.quoted_table_name(model),
                assignments.join(", "),
                predicate
            ),
            params,
        })
    }

    fn to_delete_statement(&self, model: &ModelDefinition) -> Result<SqlStatement, SqlForgeError> {
        model.primary_key()?;
        let (predicate, params) = self.key_predicate(model)?;
        Ok(SqlStatement {
            sql: format!(
                "DELETE FROM {} WHERE {};",
                self.quoted_table_name(model),
                predicate
            ),
            params,
        })
    }

    fn to_select_statement(&self, model: &ModelDefinition) -> Result<String, SqlForgeError> {
        let columns: Vec<String> = model
            .fields
            .iter()
            .map(|field| match &field.custom_select {
                Some(expression) => format!(
                    "{} AS {}",
                    expression,
                    self.quoted_column_name(field.field_name())
                ),
                None => self.quoted_column_name(field.field_name()),
            })
            .collect();
        Ok(format!(
            "SELECT {} FROM {};",
            columns.join(", "),
            self.quoted_table_name(model)
        ))
    }

    /// Key-targeting predicate: all primary key fields, plus the row-version
    /// guard when present. Returns the predicate and its bind names in order.
    fn key_predicate(
        &self,
        model: &ModelDefinition,
    ) -> Result<(String, Vec<String>), SqlForgeError> {
        let mut conditions = Vec::new();
        let mut params = Vec::new();
        for field in model.primary_keys() {
            conditions.push(format!(
                "{} = {}",
                self.quoted_column_name(field.field_name()),
                self.get_param(field.field_name())
            ));
            params.push(field.field_name().to_string());
        }
        if let Some(version) = model.row_version_field() {
            conditions.push(format!(
                "{} = {}",
                self.quoted_column_name(version.field_name()),
                self.get_param(version.field_name())
            ));
            params.push(version.field_name().to_string());
        }
        Ok((conditions.join(" AND "), params))
    }

    // ------------------------------------------------------------------
    // Literals
    // ------------------------------------------------------------------

    /// Inline literal for a field's value, via the converter registry.
    fn quoted_literal(
        &self,
        field: &FieldDefinition,
        value: &crate::convert::Value,
    ) -> Result<String, SqlForgeError> {
        self.converters().for_field(field).quoted_literal(field, value)
    }
}
