//! End-to-end schema generation tests
//!
//! These drive the public `schema_statements` pipeline: registry resolution,
//! naming, converters, and dialect synthesis together.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use sqlforge::model::model_for;
use sqlforge::naming::LowerSnakeNaming;
use sqlforge::{
    schema_statements, drop_schema_statements, DialectProvider, MysqlDialect, PostgresDialect,
    SqliteDialect,
};

use crate::common::{AuditEntry, Customer, Order, Person};

fn snake_sqlite() -> SqliteDialect {
    SqliteDialect::with_naming(Arc::new(LowerSnakeNaming::default()))
}

#[test]
fn test_person_schema_sqlite() {
    let statements = schema_statements::<Person>(&snake_sqlite()).unwrap();
    assert_eq!(
        statements,
        vec![
            "CREATE TABLE \"person\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
             \"name\" TEXT NOT NULL, \"age\" INTEGER NOT NULL);"
                .to_string()
        ]
    );
}

#[test]
fn test_customer_schema_includes_unique_index() {
    let statements = schema_statements::<Customer>(&snake_sqlite()).unwrap();
    assert_eq!(statements.len(), 2);
    assert_eq!(
        statements[1],
        "CREATE UNIQUE INDEX \"uidx_customer_email\" ON \"customer\" (\"email\");"
    );
}

#[test]
fn test_order_schema_resolves_foreign_key_lazily() {
    // Register the referenced model first; the FK resolves at generation time.
    model_for::<Customer>();

    let statements = schema_statements::<Order>(&snake_sqlite()).unwrap();
    let table = &statements[0];
    assert!(
        table.contains(
            "CONSTRAINT \"FK_order_customer_customer_id\" FOREIGN KEY (\"customer_id\") \
             REFERENCES \"customer\"(\"id\") ON DELETE CASCADE ON UPDATE NO ACTION"
        ),
        "got: {table}"
    );
    assert!(
        statements[1].contains("\"idx_order_customer_id\""),
        "got: {}",
        statements[1]
    );
}

#[test]
fn test_audit_schema_postgres_sequences_first() {
    let dialect = PostgresDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    let statements = schema_statements::<AuditEntry>(&dialect).unwrap();

    assert_eq!(
        statements[0],
        "CREATE SEQUENCE IF NOT EXISTS \"seq_audit_entry_no\";"
    );
    let table = &statements[1];
    assert!(table.starts_with("CREATE TABLE \"audit\".\"audit_entry\""), "got: {table}");
    assert!(
        table.contains("\"entry_no\" BIGINT NOT NULL DEFAULT nextval('seq_audit_entry_no')"),
        "got: {table}"
    );
    assert!(table.contains("\"logged_at\" TIMESTAMP NOT NULL"), "got: {table}");
}

#[test]
fn test_drop_schema_reverses_creation() {
    let dialect = PostgresDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    let statements = drop_schema_statements::<AuditEntry>(&dialect).unwrap();
    assert_eq!(
        statements,
        vec![
            "DROP TABLE \"audit\".\"audit_entry\";".to_string(),
            "DROP SEQUENCE IF EXISTS \"seq_audit_entry_no\";".to_string(),
        ]
    );
}

#[test]
fn test_same_model_renders_on_every_dialect() {
    let sqlite = snake_sqlite();
    let postgres = PostgresDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    let mysql = MysqlDialect::with_naming(Arc::new(LowerSnakeNaming::default()));

    for dialect in [&sqlite as &dyn DialectProvider, &postgres, &mysql] {
        let statements = schema_statements::<Person>(dialect).unwrap();
        assert_eq!(statements.len(), 1, "dialect: {}", dialect.name());
        assert!(
            statements[0].starts_with("CREATE TABLE "),
            "dialect {}: {}",
            dialect.name(),
            statements[0]
        );
    }
}
