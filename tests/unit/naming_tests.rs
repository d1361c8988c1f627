//! Unit tests for naming strategies

use sqlforge::naming::{
    AliasNaming, IdentityNaming, LowerSnakeNaming, NamingStrategy, UpperCaseNaming,
};

// ============================================================================
// Transform Tests
// ============================================================================

#[test]
fn test_identity_passes_names_through() {
    let naming = IdentityNaming::default();
    assert_eq!(naming.table_name("Person"), "Person");
    assert_eq!(naming.column_name("FirstName"), "FirstName");
}

#[test]
fn test_lower_snake_transform() {
    let naming = LowerSnakeNaming::default();
    assert_eq!(naming.table_name("OrderLineItem"), "order_line_item");
    assert_eq!(naming.column_name("CreatedAt"), "created_at");
}

#[test]
fn test_upper_case_transform() {
    let naming = UpperCaseNaming::default();
    assert_eq!(naming.table_name("Person"), "PERSON");
    assert_eq!(naming.column_name("first_name"), "FIRST_NAME");
}

// ============================================================================
// Idempotency Tests
// ============================================================================

#[test]
fn test_identity_is_idempotent() {
    let naming = IdentityNaming::default();
    let once = naming.table_name("Person");
    assert_eq!(naming.table_name(&once), once);
}

#[test]
fn test_lower_snake_is_idempotent() {
    let naming = LowerSnakeNaming::default();
    let once = naming.table_name("OrderLineItem");
    assert_eq!(naming.table_name(&once), once);
}

#[test]
fn test_upper_case_is_idempotent() {
    let naming = UpperCaseNaming::default();
    let once = naming.table_name("OrderLineItem");
    assert_eq!(naming.table_name(&once), once);
}

// ============================================================================
// Alias Strategy Tests
// ============================================================================

#[test]
fn test_alias_table_lookup_before_inner_transform() {
    let naming = AliasNaming::new(Box::new(UpperCaseNaming::default()))
        .with_table_alias("Person", "LegacyPerson")
        .with_column_alias("Name", "FullName");

    // Substitution first, then the inner transform runs over the alias.
    assert_eq!(naming.table_name("Person"), "LEGACYPERSON");
    assert_eq!(naming.column_name("Name"), "FULLNAME");
    // Unmapped names just delegate.
    assert_eq!(naming.table_name("Order"), "ORDER");
}

// ============================================================================
// Restriction Tests
// ============================================================================

#[test]
fn test_restrictions_truncate_deterministically() {
    let naming = LowerSnakeNaming {
        max_length: Some(12),
    };
    let first = naming.apply_name_restrictions("FK_customer_order_line_item_id");
    let second = naming.apply_name_restrictions("FK_customer_order_line_item_id");
    assert_eq!(first, second, "truncation must be deterministic");
    assert_eq!(first.len(), 12);
}

#[test]
fn test_restrictions_strip_invalid_characters() {
    let naming = IdentityNaming::default();
    assert_eq!(
        naming.apply_name_restrictions("order line-item!"),
        "orderlineitem"
    );
}

#[test]
fn test_sequence_name_composes_table_and_column() {
    let naming = LowerSnakeNaming::default();
    assert_eq!(
        naming.sequence_name("AuditLog", "EntryId"),
        "SEQ_audit_log_entry_id"
    );
}
