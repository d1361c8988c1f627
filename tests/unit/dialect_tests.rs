//! Unit tests for dialect providers and statement synthesis

use std::sync::Arc;

use pretty_assertions::assert_eq;

use sqlforge::model::{model_for, ModelBuilder, Record};
use sqlforge::naming::LowerSnakeNaming;
use sqlforge::{
    DialectProvider, FieldDefinition, ForeignKeyConstraint, ModelDefinition, ModelHandle,
    MysqlDialect, PostgresDialect, ReferentialAction, SqlForgeError, SqliteDialect, Value,
    ValueKind,
};

fn person_model() -> ModelDefinition {
    ModelBuilder::new("Person")
        .field_with("Id", ValueKind::Int32, |f| {
            f.is_primary_key = true;
            f.auto_increment = true;
        })
        .field(FieldDefinition::new("Name", ValueKind::Text))
        .field(FieldDefinition::new("Age", ValueKind::Int32))
        .build()
}

fn snake_sqlite() -> SqliteDialect {
    SqliteDialect::with_naming(Arc::new(LowerSnakeNaming::default()))
}

// ============================================================================
// Quoting Tests
// ============================================================================

#[test]
fn test_schema_qualified_names_quote_each_part() {
    let dialect = SqliteDialect::new();
    let model = ModelBuilder::new("AuditLog").schema("audit").build();
    assert_eq!(dialect.quoted_table_name(&model), "\"audit\".\"AuditLog\"");
}

#[test]
fn test_table_alias_overrides_name_in_quoting() {
    let dialect = snake_sqlite();
    let model = ModelBuilder::new("Person").alias("People").build();
    assert_eq!(dialect.quoted_table_name(&model), "\"people\"");
}

// ============================================================================
// CREATE TABLE Tests
// ============================================================================

#[test]
fn test_create_table_person_sqlite_snake_case() {
    let dialect = snake_sqlite();
    let sql = dialect.to_create_table(&person_model()).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE \"person\" (\"id\" INTEGER PRIMARY KEY AUTOINCREMENT, \
         \"name\" TEXT NOT NULL, \"age\" INTEGER NOT NULL);"
    );
}

#[test]
fn test_create_table_lists_every_field_in_declaration_order() {
    let dialect = SqliteDialect::new();
    let model = ModelBuilder::new("Wide")
        .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
        .field(FieldDefinition::new("B", ValueKind::Text))
        .field(FieldDefinition::new("C", ValueKind::Bool))
        .field(FieldDefinition::new("D", ValueKind::Float64))
        .field(FieldDefinition::new("E", ValueKind::Bytes))
        .build();
    let sql = dialect.to_create_table(&model).unwrap();

    let body = sql
        .split_once('(')
        .map(|(_, rest)| rest)
        .unwrap_or_default();
    let column_count = body.split(", \"").count();
    assert_eq!(column_count, model.fields.len(), "got: {sql}");

    let b = sql.find("\"B\"").unwrap();
    let c = sql.find("\"C\"").unwrap();
    let d = sql.find("\"D\"").unwrap();
    assert!(b < c && c < d, "columns out of declaration order: {sql}");
}

#[test]
fn test_create_table_postgres_identity_and_types() {
    let dialect = PostgresDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    let sql = dialect.to_create_table(&person_model()).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE \"person\" (\"id\" INTEGER PRIMARY KEY GENERATED BY DEFAULT AS IDENTITY, \
         \"name\" TEXT NOT NULL, \"age\" INTEGER NOT NULL);"
    );
}

#[test]
fn test_create_table_mysql_auto_increment_and_backticks() {
    let dialect = MysqlDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    let sql = dialect.to_create_table(&person_model()).unwrap();
    assert_eq!(
        sql,
        "CREATE TABLE `person` (`id` INT PRIMARY KEY AUTO_INCREMENT, \
         `name` VARCHAR(255) NOT NULL, `age` INT NOT NULL);"
    );
}

#[test]
fn test_create_table_renders_default_check_and_unique() {
    let dialect = SqliteDialect::new();
    let model = ModelBuilder::new("Account")
        .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
        .field_with("Email", ValueKind::Text, |f| f.is_unique = true)
        .field_with("Balance", ValueKind::Decimal, |f| {
            f.field_length = Some(18);
            f.scale = Some(2);
            f.default_value = Some("0".to_string());
            f.check_constraint = Some("Balance >= 0".to_string());
        })
        .build();
    let sql = dialect.to_create_table(&model).unwrap();
    assert!(sql.contains("\"Email\" TEXT NOT NULL UNIQUE"), "got: {sql}");
    assert!(
        sql.contains("\"Balance\" DECIMAL(18,2) NOT NULL DEFAULT 0 CHECK (Balance >= 0)"),
        "got: {sql}"
    );
}

#[test]
fn test_create_table_nullable_column_renders_null() {
    let dialect = SqliteDialect::new();
    let model = ModelBuilder::new("Note")
        .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
        .field_with("Body", ValueKind::Text, |f| f.is_nullable = true)
        .build();
    let sql = dialect.to_create_table(&model).unwrap();
    assert!(sql.contains("\"Body\" TEXT NULL"), "got: {sql}");
}

#[test]
fn test_create_table_composite_key_renders_trailing_clause() {
    let dialect = SqliteDialect::new();
    let model = ModelBuilder::new("OrderLine")
        .field_with("OrderId", ValueKind::Int64, |f| f.is_primary_key = true)
        .field_with("LineNo", ValueKind::Int32, |f| f.is_primary_key = true)
        .field(FieldDefinition::new("Qty", ValueKind::Int32))
        .build();
    let sql = dialect.to_create_table(&model).unwrap();
    assert!(
        sql.contains("PRIMARY KEY (\"OrderId\", \"LineNo\")"),
        "got: {sql}"
    );
    assert!(
        !sql.contains("\"OrderId\" INTEGER PRIMARY KEY,"),
        "composite keys must not also render inline: {sql}"
    );
}

#[test]
fn test_create_table_custom_field_definition_wins() {
    let dialect = SqliteDialect::new();
    let model = ModelBuilder::new("Legacy")
        .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
        .field_with("Blob", ValueKind::Bytes, |f| {
            f.custom_field_definition = Some("BLOB NOT NULL DEFAULT (x'00')".to_string());
        })
        .build();
    let sql = dialect.to_create_table(&model).unwrap();
    assert!(
        sql.contains("\"Blob\" BLOB NOT NULL DEFAULT (x'00')"),
        "got: {sql}"
    );
}

#[test]
fn test_create_table_computed_column() {
    let dialect = PostgresDialect::new();
    let model = ModelBuilder::new("Invoice")
        .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
        .field(FieldDefinition::new("Net", ValueKind::Decimal))
        .field(FieldDefinition::new("Tax", ValueKind::Decimal))
        .field_with("Gross", ValueKind::Decimal, |f| {
            f.is_computed = true;
            f.compute_expression = Some("\"Net\" + \"Tax\"".to_string());
        })
        .build();
    let sql = dialect.to_create_table(&model).unwrap();
    assert!(
        sql.contains("\"Gross\" NUMERIC(18,6) GENERATED ALWAYS AS (\"Net\" + \"Tax\") STORED"),
        "got: {sql}"
    );
}

#[test]
fn test_create_table_collision_after_restriction_is_an_error() {
    let dialect = snake_sqlite();
    let model = ModelBuilder::new("Clash")
        .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
        .field(FieldDefinition::new("FirstName", ValueKind::Text))
        .field(FieldDefinition::new("first_name", ValueKind::Text))
        .build();
    let err = dialect.to_create_table(&model).unwrap_err();
    assert!(
        matches!(err, SqlForgeError::NameCollision { ref restricted, .. } if restricted == "first_name"),
        "got: {err}"
    );
}

#[test]
fn test_create_table_without_primary_key_is_accepted() {
    let dialect = SqliteDialect::new();
    let model = ModelBuilder::new("EventLog")
        .field(FieldDefinition::new("Message", ValueKind::Text))
        .build();
    let sql = dialect.to_create_table(&model).unwrap();
    assert_eq!(sql, "CREATE TABLE \"EventLog\" (\"Message\" TEXT NOT NULL);");
}

// ============================================================================
// Foreign Key Tests
// ============================================================================

struct Customer;

impl Record for Customer {
    fn model() -> ModelDefinition {
        ModelBuilder::new("Customer")
            .field_with("Id", ValueKind::Int64, |f| {
                f.is_primary_key = true;
                f.auto_increment = true;
            })
            .field(FieldDefinition::new("Name", ValueKind::Text))
            .build()
    }
}

struct Order;

impl Record for Order {
    fn model() -> ModelDefinition {
        ModelBuilder::new("Order")
            .field_with("Id", ValueKind::Int64, |f| {
                f.is_primary_key = true;
                f.auto_increment = true;
            })
            .field_with("CustomerId", ValueKind::Int64, |f| {
                f.is_indexed = true;
                f.foreign_key = Some(
                    ForeignKeyConstraint::new(ModelHandle::of::<Customer>())
                        .on_delete(ReferentialAction::Cascade),
                );
            })
            .build()
    }
}

#[test]
fn test_create_table_with_foreign_key_clause() {
    // The referenced model resolves lazily through the registry.
    model_for::<Customer>();
    let order = model_for::<Order>();

    let dialect = snake_sqlite();
    let sql = dialect.to_create_table(&order).unwrap();
    assert!(
        sql.contains(
            "CONSTRAINT \"FK_order_customer_customer_id\" FOREIGN KEY (\"customer_id\") \
             REFERENCES \"customer\"(\"id\") ON DELETE CASCADE"
        ),
        "got: {sql}"
    );
}

#[test]
fn test_foreign_key_default_name_is_deterministic() {
    model_for::<Customer>();
    let order = model_for::<Order>();
    let dialect = snake_sqlite();

    let field = order.field("CustomerId").unwrap();
    let foreign_key = field.foreign_key.as_ref().unwrap();
    let referenced = foreign_key.resolve_reference(&order, field).unwrap();

    let first = foreign_key.constraint_name(&order, &referenced, field, dialect.naming());
    let second = foreign_key.constraint_name(&order, &referenced, field, dialect.naming());
    assert_eq!(first, second);
    assert_eq!(first, "FK_order_customer_customer_id");
}

struct Orphan;

// Orphan has metadata but is never resolved through the registry.
impl Record for Orphan {
    fn model() -> ModelDefinition {
        ModelBuilder::new("Orphan")
            .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
            .build()
    }
}

struct DanglingReference;

impl Record for DanglingReference {
    fn model() -> ModelDefinition {
        ModelBuilder::new("Dangling")
            .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
            .field_with("OrphanId", ValueKind::Int64, |f| {
                f.foreign_key = Some(ForeignKeyConstraint::new(ModelHandle::of::<Orphan>()));
            })
            .build()
    }
}

#[test]
fn test_unresolved_foreign_key_target_is_descriptive() {
    let model = model_for::<DanglingReference>();
    let dialect = SqliteDialect::new();
    let err = dialect.to_create_table(&model).unwrap_err();
    assert!(
        matches!(err, SqlForgeError::UnresolvedReference { ref type_name, .. } if type_name.contains("Orphan")),
        "got: {err}"
    );
}

#[test]
fn test_add_and_drop_foreign_key_statements() {
    model_for::<Customer>();
    let order = model_for::<Order>();
    let field = order.field("CustomerId").unwrap();
    let foreign_key = field.foreign_key.as_ref().unwrap();

    let mysql = MysqlDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    let add = mysql.to_add_foreign_key(&order, field, foreign_key).unwrap();
    assert!(
        add.starts_with("ALTER TABLE `order` ADD CONSTRAINT `FK_order_customer_customer_id`"),
        "got: {add}"
    );
    let drop = mysql
        .to_drop_foreign_key(&order, "FK_order_customer_customer_id")
        .unwrap();
    assert_eq!(
        drop,
        "ALTER TABLE `order` DROP FOREIGN KEY `FK_order_customer_customer_id`;"
    );

    // SQLite cannot alter constraints after creation.
    let sqlite = SqliteDialect::new();
    assert!(matches!(
        sqlite.to_add_foreign_key(&order, field, foreign_key),
        Err(SqlForgeError::Unsupported { .. })
    ));
}

// ============================================================================
// ALTER / INDEX Tests
// ============================================================================

#[test]
fn test_add_alter_drop_and_rename_column() {
    let model = person_model();
    let nickname = FieldDefinition::new("Nickname", ValueKind::Text);

    let sqlite = snake_sqlite();
    assert_eq!(
        sqlite.to_add_column(&model, &nickname).unwrap(),
        "ALTER TABLE \"person\" ADD COLUMN \"nickname\" TEXT NOT NULL;"
    );
    assert_eq!(
        sqlite.to_drop_column(&model, "Nickname"),
        "ALTER TABLE \"person\" DROP COLUMN \"nickname\";"
    );
    assert_eq!(
        sqlite.to_change_column_name(&model, &nickname, "Name").unwrap(),
        "ALTER TABLE \"person\" RENAME COLUMN \"name\" TO \"nickname\";"
    );
    assert!(matches!(
        sqlite.to_alter_column(&model, &nickname),
        Err(SqlForgeError::Unsupported { .. })
    ));

    let postgres = PostgresDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    assert_eq!(
        postgres.to_alter_column(&model, &nickname).unwrap(),
        "ALTER TABLE \"person\" ALTER COLUMN \"nickname\" TYPE TEXT;"
    );

    let mysql = MysqlDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    assert_eq!(
        mysql.to_change_column_name(&model, &nickname, "Name").unwrap(),
        "ALTER TABLE `person` CHANGE COLUMN `name` `nickname` VARCHAR(255) NOT NULL;"
    );
}

#[test]
fn test_index_names_distinct_per_column_set() {
    let dialect = snake_sqlite();
    let model = person_model();

    let by_name = dialect
        .to_create_index(&model, &["Name"], false, None)
        .unwrap();
    let by_name_age = dialect
        .to_create_index(&model, &["Name", "Age"], false, None)
        .unwrap();

    assert_eq!(
        by_name,
        "CREATE INDEX \"idx_person_name\" ON \"person\" (\"name\");"
    );
    assert_eq!(
        by_name_age,
        "CREATE INDEX \"idx_person_name_age\" ON \"person\" (\"name\", \"age\");"
    );
}

#[test]
fn test_unique_index_prefix_and_explicit_name() {
    let dialect = snake_sqlite();
    let model = person_model();

    let unique = dialect
        .to_create_index(&model, &["Name"], true, None)
        .unwrap();
    assert!(unique.contains("UNIQUE INDEX \"uidx_person_name\""), "got: {unique}");

    let explicit = dialect
        .to_create_index(&model, &["Name"], false, Some("ix_custom"))
        .unwrap();
    assert!(explicit.contains("\"ix_custom\""), "got: {explicit}");
}

#[test]
fn test_drop_index_syntax_per_dialect() {
    let model = person_model();
    let sqlite = snake_sqlite();
    assert_eq!(
        sqlite.to_drop_index(&model, "idx_person_name"),
        "DROP INDEX \"idx_person_name\";"
    );
    let mysql = MysqlDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    assert_eq!(
        mysql.to_drop_index(&model, "idx_person_name"),
        "DROP INDEX `idx_person_name` ON `person`;"
    );
}

// ============================================================================
// DML Tests
// ============================================================================

fn document_model() -> ModelDefinition {
    ModelBuilder::new("Document")
        .field_with("Id", ValueKind::Int64, |f| {
            f.is_primary_key = true;
            f.auto_increment = true;
        })
        .field(FieldDefinition::new("Title", ValueKind::Text))
        .field_with("Version", ValueKind::RowVersion, |f| f.is_row_version = true)
        .field_with("Summary", ValueKind::Text, |f| {
            f.is_computed = true;
            f.compute_expression = Some("substr(\"Title\", 1, 16)".to_string());
        })
        .build()
}

#[test]
fn test_insert_skips_auto_increment_computed_and_row_version() {
    let dialect = SqliteDialect::new();
    let statement = dialect.to_insert_statement(&document_model()).unwrap();
    assert_eq!(
        statement.sql,
        "INSERT INTO \"Document\" (\"Title\") VALUES (@Title);"
    );
    assert_eq!(statement.params, vec!["Title"]);
}

#[test]
fn test_update_guards_on_row_version() {
    let dialect = SqliteDialect::new();
    let statement = dialect.to_update_statement(&document_model()).unwrap();
    assert_eq!(
        statement.sql,
        "UPDATE \"Document\" SET \"Title\" = @Title \
         WHERE \"Id\" = @Id AND \"Version\" = @Version;"
    );
    assert_eq!(statement.params, vec!["Title", "Id", "Version"]);
}

#[test]
fn test_delete_targets_key_and_row_version() {
    let dialect = SqliteDialect::new();
    let statement = dialect.to_delete_statement(&document_model()).unwrap();
    assert_eq!(
        statement.sql,
        "DELETE FROM \"Document\" WHERE \"Id\" = @Id AND \"Version\" = @Version;"
    );
}

#[test]
fn test_update_without_primary_key_fails_fast() {
    let dialect = SqliteDialect::new();
    let model = ModelBuilder::new("EventLog")
        .field(FieldDefinition::new("Message", ValueKind::Text))
        .build();
    assert!(matches!(
        dialect.to_update_statement(&model),
        Err(SqlForgeError::MissingPrimaryKey { .. })
    ));
    assert!(matches!(
        dialect.to_delete_statement(&model),
        Err(SqlForgeError::MissingPrimaryKey { .. })
    ));
}

#[test]
fn test_select_uses_custom_select_expression() {
    let dialect = SqliteDialect::new();
    let model = ModelBuilder::new("Person")
        .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
        .field_with("FullName", ValueKind::Text, |f| {
            f.custom_select = Some("first || ' ' || last".to_string());
        })
        .build();
    let sql = dialect.to_select_statement(&model).unwrap();
    assert_eq!(
        sql,
        "SELECT \"Id\", first || ' ' || last AS \"FullName\" FROM \"Person\";"
    );
}

// ============================================================================
// Sequence Tests
// ============================================================================

#[test]
fn test_postgres_sequences_render_for_sequence_backed_fields() {
    let dialect = PostgresDialect::with_naming(Arc::new(LowerSnakeNaming::default()));
    let model = ModelBuilder::new("AuditLog")
        .field_with("Id", ValueKind::Int64, |f| f.is_primary_key = true)
        .field_with("EntryNo", ValueKind::Int64, |f| {
            f.sequence = Some("seq_audit_entry".to_string());
        })
        .build();

    let create = dialect.to_create_sequences(&model);
    assert_eq!(
        create,
        vec!["CREATE SEQUENCE IF NOT EXISTS \"seq_audit_entry\";".to_string()]
    );

    let table = dialect.to_create_table(&model).unwrap();
    assert!(
        table.contains("\"entry_no\" BIGINT NOT NULL DEFAULT nextval('seq_audit_entry')"),
        "got: {table}"
    );

    // Dialects without sequences emit nothing.
    assert!(SqliteDialect::new().to_create_sequences(&model).is_empty());
}

// ============================================================================
// Literal Tests
// ============================================================================

#[test]
fn test_quoted_literals_follow_converter_policy() {
    let dialect = SqliteDialect::new();
    let name = FieldDefinition::new("Name", ValueKind::Text);
    let age = FieldDefinition::new("Age", ValueKind::Int32);
    let blob = FieldDefinition::new("Payload", ValueKind::Bytes);

    assert_eq!(
        dialect.quoted_literal(&name, &Value::Text("O'Brien".into())).unwrap(),
        "'O''Brien'"
    );
    assert_eq!(dialect.quoted_literal(&age, &Value::Int32(41)).unwrap(), "41");
    assert_eq!(
        dialect
            .quoted_literal(&blob, &Value::Bytes(vec![0xAB]))
            .unwrap(),
        "X'ab'"
    );
}
