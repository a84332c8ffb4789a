use std::collections::HashMap;

use insta::assert_snapshot;
use schemadoc::codegen::{self, CodegenError, RecordField};
use schemadoc::metadata::{build_column, CatalogColumn, TableMeta};
use schemadoc::parser::NoLogicalNames;

fn order_items() -> TableMeta {
    let column = |name: &str, code: i32, type_name: &str, annotation: Option<&str>| {
        build_column(
            "dbo",
            "order_items",
            CatalogColumn {
                name: name.to_string(),
                type_code: code,
                type_name: Some(type_name.to_string()),
                ..Default::default()
            },
            annotation,
        )
    };
    let mut table = TableMeta {
        schema_name: "dbo".to_string(),
        table_name: "order_items".to_string(),
        table_description: None,
        columns: vec![
            column("unit_price", 3, "decimal", None),
            column("order_item_id", 4, "int", Some("Order Item ID")),
            column("created_on", 91, "date", None),
        ],
    };
    table.sort_columns();
    table
}

#[test]
fn test_record_from_pasted_rows() {
    let mut lookup = HashMap::new();
    lookup.insert("user_id".to_string(), "User ID".to_string());

    let raw = "user_id\tname\tcreated_at\n1\tbob\t2024-01-05 10:00:00\n";
    let out = codegen::generate_from_text(raw, "UserRow", &lookup).unwrap();
    assert_snapshot!(out.trim_end(), @r"
    data class UserRow(
        /** User ID*/
        var userId: Int,

        /** name*/
        var name: String,

        /** created_at*/
        var createdAt: java.time.LocalDateTime
    )
    ");
}

#[test]
fn test_record_from_select() {
    let out = codegen::generate_from_text(
        "SELECT o.order_id, SUM(o.total) AS order_total FROM orders o GROUP BY o.order_id",
        "",
        &NoLogicalNames,
    )
    .unwrap();
    assert_snapshot!(out.trim_end(), @r"
    data class ResultRow(
        /** order_id*/
        var orderId: String,

        /** order_total*/
        var orderTotal: String
    )
    ");
}

#[test]
fn test_record_for_table() {
    assert_snapshot!(codegen::generate_for_table(&order_items()).trim_end(), @r"
    data class OrderItem(
        /** created_on*/
        var createdOn: LocalDate,

        /** Order Item ID*/
        var orderItemId: Int,

        /** unit_price*/
        var unitPrice: BigDecimal
    )
    ");
}

#[test]
fn test_rust_struct_for_table() {
    assert_snapshot!(codegen::generate_rust_struct(&order_items()).trim_end(), @r"
    /// dbo.order_items
    pub struct OrderItem {
        /// created_on
        pub created_on: Option<chrono::NaiveDate>,
        /// Order Item ID
        pub order_item_id: Option<i32>,
        /// unit_price
        pub unit_price: Option<rust_decimal::Decimal>,
    }
    ");
}

#[test]
fn test_explicit_fields() {
    let out = codegen::generate_record("Empty", &[RecordField::new("x", "Any", "x")]);
    assert!(out.ends_with("var x: Any\n)\n"));
}

#[test]
fn test_blank_input_is_reported() {
    assert!(matches!(
        codegen::generate_from_text("", "X", &NoLogicalNames),
        Err(CodegenError::Parse(_))
    ));
}
