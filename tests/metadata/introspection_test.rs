mod support;

use schemadoc::metadata::{FetchError, SchemaIntrospector};
use support::{column, credentials, params, Calls, FakeCatalog};

fn sales_catalog() -> FakeCatalog {
    let mut amount = column("amount_total", 3, "decimal");
    amount.column_size = Some(18);
    amount.decimal_digits = Some(2);

    let mut note = column("note", -9, "nvarchar");
    note.column_size = Some(200);
    note.char_octet_length = Some(400);
    note.remarks = Some("Free text".to_string());

    FakeCatalog::builder()
        .table(
            Some("sales"),
            "orders",
            vec![note, amount, column("order_id", 4, "int")],
        )
        .table(
            Some("dbo"),
            "customers",
            vec![column("name", 12, "varchar"), column("customer_id", 4, "int")],
        )
        .table(None, "audit_log", vec![column("logged_at", 93, "datetime2")])
        .table_description("dbo", "customers", "Customers")
        .column_description("dbo", "customers", "name", "Customer Name")
        .column_description("sales", "orders", "note", "Order Note")
        .build()
}

#[tokio::test]
async fn test_fetch_sorts_tables_and_columns() {
    let introspector = SchemaIntrospector::new(sales_catalog());
    let snapshot = introspector
        .fetch("p1", &params(), &credentials())
        .await
        .unwrap();

    let tables: Vec<_> = snapshot.tables.iter().map(|t| t.qualified_name()).collect();
    assert_eq!(tables, vec!["dbo.audit_log", "dbo.customers", "sales.orders"]);

    let orders = snapshot.find_table("sales", "orders").unwrap();
    let columns: Vec<_> = orders.columns.iter().map(|c| c.column_name.as_str()).collect();
    assert_eq!(columns, vec!["amount_total", "note", "order_id"]);

    assert_eq!(snapshot.profile_id, "p1");
    assert_eq!(snapshot.database_name, "sales");
    assert_eq!(snapshot.column_count(), 6);
}

#[tokio::test]
async fn test_fetch_resolves_logical_names() {
    let snapshot = SchemaIntrospector::new(sales_catalog())
        .fetch("p1", &params(), &credentials())
        .await
        .unwrap();

    let customers = snapshot.find_table("dbo", "customers").unwrap();
    assert_eq!(customers.table_description.as_deref(), Some("Customers"));
    let name = customers.columns.iter().find(|c| c.column_name == "name").unwrap();
    assert_eq!(name.logical_name, "Customer Name");
    let id = customers.columns.iter().find(|c| c.column_name == "customer_id").unwrap();
    assert_eq!(id.logical_name, "customer_id");
    assert_eq!(id.column_description, None);
    assert_eq!(id.camel_case_name, "customerId");

    // Annotation wins over driver remarks
    let orders = snapshot.find_table("sales", "orders").unwrap();
    let note = orders.columns.iter().find(|c| c.column_name == "note").unwrap();
    assert_eq!(note.logical_name, "Order Note");

    let audit = snapshot.find_table("dbo", "audit_log").unwrap();
    assert_eq!(audit.table_description, None);
    assert_eq!(audit.logical_name(), "");
}

#[tokio::test]
async fn test_fetch_maps_types_and_keeps_absent_sizes() {
    let snapshot = SchemaIntrospector::new(sales_catalog())
        .fetch("p1", &params(), &credentials())
        .await
        .unwrap();
    let orders = snapshot.find_table("sales", "orders").unwrap();

    let amount = &orders.columns[0];
    assert_eq!(amount.jdbc_type, "DECIMAL");
    assert_eq!(amount.types.java, "java.math.BigDecimal");
    assert_eq!(amount.types.kotlin, "BigDecimal");
    assert_eq!(amount.camel_case_name, "amountTotal");
    assert_eq!(amount.column_size, Some(18));
    assert_eq!(amount.decimal_digits, Some(2));
    assert_eq!(amount.char_octet_length, None);

    let order_id = &orders.columns[2];
    assert_eq!(order_id.types.kotlin, "Int");
    assert_eq!(order_id.column_size, None);
    assert_eq!(order_id.decimal_digits, None);

    let audit = snapshot.find_table("dbo", "audit_log").unwrap();
    assert_eq!(audit.columns[0].types.java, "java.time.LocalDateTime");
}

#[tokio::test]
async fn test_fetch_batches_description_queries() {
    let catalog = sales_catalog();
    let calls = catalog.calls.clone();
    SchemaIntrospector::new(catalog)
        .fetch("p1", &params(), &credentials())
        .await
        .unwrap();

    assert_eq!(Calls::get(&calls.opens), 1);
    assert_eq!(Calls::get(&calls.description_queries), 2);
    assert_eq!(Calls::get(&calls.column_queries), 3);
    assert_eq!(Calls::get(&calls.closes), 1);
}

#[tokio::test]
async fn test_missing_schema_uses_configured_default() {
    let snapshot = SchemaIntrospector::new(sales_catalog())
        .with_default_schema("app")
        .fetch("p1", &params(), &credentials())
        .await
        .unwrap();

    let audit = snapshot.find_table("app", "audit_log").unwrap();
    assert_eq!(audit.columns[0].schema_name, "app");
    assert!(snapshot.find_table("dbo", "audit_log").is_none());
}

#[tokio::test]
async fn test_open_failure_is_connection_error() {
    let catalog = FakeCatalog::builder().fail_open().build();
    let calls = catalog.calls.clone();
    let err = SchemaIntrospector::new(catalog)
        .fetch("p1", &params(), &credentials())
        .await
        .unwrap_err();

    assert!(err.is_connection(), "got {err:?}");
    assert_eq!(Calls::get(&calls.closes), 0);
}

#[tokio::test]
async fn test_query_failure_is_introspection_error_and_closes() {
    let catalog = FakeCatalog::builder()
        .table(Some("dbo"), "t", vec![column("a", 4, "int")])
        .fail_list_columns()
        .build();
    let calls = catalog.calls.clone();
    let err = SchemaIntrospector::new(catalog)
        .fetch("p1", &params(), &credentials())
        .await
        .unwrap_err();

    assert!(matches!(err, FetchError::Introspection(_)), "got {err:?}");
    assert!(!err.is_connection_failure());
    assert_eq!(Calls::get(&calls.closes), 1);
}

#[tokio::test]
async fn test_refetch_of_unchanged_schema_hashes_identically() {
    let introspector = SchemaIntrospector::new(sales_catalog());
    let first = introspector.fetch("p1", &params(), &credentials()).await.unwrap();
    let second = introspector.fetch("p1", &params(), &credentials()).await.unwrap();

    assert_eq!(first.tables, second.tables);
    assert_eq!(first.content_hash().unwrap(), second.content_hash().unwrap());
}

#[tokio::test]
async fn test_connection_check() {
    let ok = SchemaIntrospector::new(sales_catalog());
    assert!(ok.test_connection(&params(), &credentials()).await.is_ok());

    let catalog = FakeCatalog::builder().fail_ping().build();
    let calls = catalog.calls.clone();
    let err = SchemaIntrospector::new(catalog)
        .test_connection(&params(), &credentials())
        .await
        .unwrap_err();
    assert!(err.is_connection());
    assert_eq!(Calls::get(&calls.closes), 1);
}
