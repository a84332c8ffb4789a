mod support;

use schemadoc::cache::{SnapshotCache, SnapshotStore};
use schemadoc::metadata::{FetchError, MetadataService, MetadataSnapshot, SchemaIntrospector};
use support::{column, credentials, params, FakeCatalog};

fn service(catalog: FakeCatalog) -> MetadataService<FakeCatalog, SnapshotCache> {
    MetadataService::new(
        SchemaIntrospector::new(catalog),
        SnapshotCache::open_in_memory().unwrap(),
    )
}

fn working_catalog() -> FakeCatalog {
    FakeCatalog::builder()
        .table(
            Some("dbo"),
            "customers",
            vec![column("customer_id", 4, "int"), column("name", 12, "varchar")],
        )
        .column_description("dbo", "customers", "name", "Customer Name")
        .build()
}

#[tokio::test]
async fn test_fetch_and_save_stores_snapshot() {
    let service = service(working_catalog());
    assert!(service.load_cached("p1").unwrap().is_none());

    let snapshot = service
        .fetch_and_save("p1", &params(), &credentials())
        .await
        .unwrap();

    let cached = service.load_cached("p1").unwrap().unwrap();
    assert_eq!(cached, snapshot);
    assert!(!service.is_fetching("p1"));
}

#[tokio::test]
async fn test_failed_fetch_keeps_previous_snapshot() {
    let failing = FakeCatalog::builder()
        .table(Some("dbo"), "customers", vec![column("name", 12, "varchar")])
        .fail_list_columns()
        .build();
    let service = service(failing);

    let previous = MetadataSnapshot::new("p1", "sales", vec![]);
    service.store().save(&previous).unwrap();

    let err = service
        .fetch_and_save("p1", &params(), &credentials())
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Introspection(_)));

    let cached = service.load_cached("p1").unwrap().unwrap();
    assert_eq!(cached, previous);
    assert!(!service.is_fetching("p1"));
}

#[tokio::test]
async fn test_connection_failure_leaves_cache_empty() {
    let service = service(FakeCatalog::builder().fail_open().build());
    let err = service
        .fetch_and_save("p1", &params(), &credentials())
        .await
        .unwrap_err();

    assert!(err.is_connection());
    assert!(err.is_connection_failure());
    assert!(service.load_cached("p1").unwrap().is_none());
}

#[tokio::test]
async fn test_refresh_identifiers_replaces_cached_copy() {
    let service = service(working_catalog());
    let mut snapshot = service
        .fetch_and_save("p1", &params(), &credentials())
        .await
        .unwrap();
    for column in &mut snapshot.tables[0].columns {
        column.camel_case_name.clear();
    }

    let refreshed = service.refresh_identifiers(&snapshot).unwrap();
    let names: Vec<_> = refreshed.tables[0]
        .columns
        .iter()
        .map(|c| c.camel_case_name.as_str())
        .collect();
    assert_eq!(names, vec!["customerId", "name"]);
    assert!(refreshed.fetched_at >= snapshot.fetched_at);

    // The input value is untouched
    assert!(snapshot.tables[0].columns[0].camel_case_name.is_empty());
    assert_eq!(service.load_cached("p1").unwrap().unwrap(), refreshed);
}

#[tokio::test]
async fn test_service_connection_check() {
    assert!(service(working_catalog())
        .test_connection(&params(), &credentials())
        .await
        .is_ok());
    assert!(service(FakeCatalog::builder().fail_open().build())
        .test_connection(&params(), &credentials())
        .await
        .unwrap_err()
        .is_connection());
}
