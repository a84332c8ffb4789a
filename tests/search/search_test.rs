use schemadoc::export;
use schemadoc::metadata::{build_column, CatalogColumn, MetadataSnapshot, TableMeta};
use schemadoc::parser::{self, LogicalNameLookup};
use schemadoc::search::{LogicalNameIndex, MatchMode};

fn table(
    schema: &str,
    name: &str,
    description: Option<&str>,
    columns: &[(&str, Option<&str>)],
) -> TableMeta {
    TableMeta {
        schema_name: schema.to_string(),
        table_name: name.to_string(),
        table_description: description.map(str::to_string),
        columns: columns
            .iter()
            .map(|(column, annotation)| {
                build_column(
                    schema,
                    name,
                    CatalogColumn {
                        name: column.to_string(),
                        type_code: -9,
                        type_name: Some("nvarchar".to_string()),
                        column_size: Some(100),
                        ..Default::default()
                    },
                    *annotation,
                )
            })
            .collect(),
    }
}

fn snapshot() -> MetadataSnapshot {
    MetadataSnapshot::new(
        "p1",
        "sales",
        vec![
            table(
                "sales",
                "customer_accounts",
                Some("Customer Accounts"),
                &[
                    ("billing_name", Some("Customer Name (Billing)")),
                    ("account_no", Some("Account Number")),
                ],
            ),
            table(
                "dbo",
                "customers",
                Some("Customers"),
                &[("name", Some("customer name")), ("email", None)],
            ),
        ],
    )
}

#[test]
fn test_exact_match_ignores_case() {
    let snap = snapshot();
    let index = LogicalNameIndex::build(&snap);
    let queries = ["Customer Name"];

    let outcome = index.search(&queries, MatchMode::Exact, "", "");
    assert!(outcome.unmatched.is_empty());
    assert_eq!(outcome.matches.len(), 1);
    assert_eq!(outcome.matches[0].column.qualified_name(), "dbo.customers.name");
    assert_eq!(outcome.matches[0].table.logical_name(), "Customers");
}

#[test]
fn test_partial_match_spans_tables() {
    let snap = snapshot();
    let index = LogicalNameIndex::build(&snap);
    let queries = ["Customer Name"];

    let outcome = index.search(&queries, MatchMode::Partial, "", "");
    let found: Vec<_> = outcome
        .matches
        .iter()
        .map(|m| m.column.qualified_name())
        .collect();
    assert_eq!(
        found,
        vec!["dbo.customers.name", "sales.customer_accounts.billing_name"]
    );
}

#[test]
fn test_each_query_reported_per_column() {
    let snap = snapshot();
    let index = LogicalNameIndex::build(&snap);
    let queries = vec![
        "customer".to_string(),
        "missing".to_string(),
        "number".to_string(),
        "missing".to_string(),
    ];

    let outcome = index.search(&queries, MatchMode::Partial, "", "");
    let pairs: Vec<_> = outcome
        .matches
        .iter()
        .map(|m| (m.query, m.column.column_name.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("customer", "name"),
            ("customer", "billing_name"),
            ("number", "account_no"),
        ]
    );
    // Duplicate queries are searched (and reported) per occurrence
    assert_eq!(outcome.unmatched, vec!["missing", "missing"]);
}

#[test]
fn test_filters() {
    let snap = snapshot();
    let index = LogicalNameIndex::build(&snap);
    let queries = ["Customer Name"];

    let sales_only = index.search(&queries, MatchMode::Partial, "SALES", "");
    assert_eq!(sales_only.matches.len(), 1);
    assert_eq!(sales_only.matches[0].column.column_name, "billing_name");

    // Schema filter is equality, not containment
    let partial_schema = index.search(&queries, MatchMode::Partial, "sal", "");
    assert!(partial_schema.matches.is_empty());
    assert_eq!(partial_schema.unmatched, vec!["Customer Name"]);

    // Table filter is containment
    let accounts = index.search(&queries, MatchMode::Partial, "", "ACCOUNT");
    assert_eq!(accounts.matches.len(), 1);
}

#[test]
fn test_no_queries_lists_filtered_columns() {
    let snap = snapshot();
    let index = LogicalNameIndex::build(&snap);
    let none: Vec<String> = Vec::new();

    let all = index.search(&none, MatchMode::Exact, "", "");
    assert_eq!(all.matches.len(), snap.column_count());
    assert!(all.unmatched.is_empty());

    let blanks = ["", "   "];
    let dbo = index.search(&blanks, MatchMode::Exact, "dbo", "");
    let queries: Vec<_> = dbo.matches.iter().map(|m| m.query).collect();
    assert_eq!(queries, vec!["email", "customer name"]);
}

#[test]
fn test_index_feeds_parser_comments() {
    let snap = snapshot();
    let index = LogicalNameIndex::build(&snap);
    assert_eq!(index.logical_name("account_no"), Some("Account Number"));

    let fields = parser::parse("SELECT a.ACCOUNT_NO, a.other FROM accounts a", &index).unwrap();
    assert_eq!(fields[0].comment, "Account Number");
    assert_eq!(fields[1].comment, "other");
}

#[test]
fn test_matches_export_as_rows() {
    let snap = snapshot();
    let index = LogicalNameIndex::build(&snap);
    let queries = ["Account Number", "nope"];
    let outcome = index.search(&queries, MatchMode::Exact, "", "");

    let rows = export::rows(&outcome.matches);
    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.input, "Account Number");
    assert_eq!(row.table_logical_name, "Customer Accounts");
    assert_eq!(row.camel_case, "accountNo");
    assert_eq!(row.jdbc_type, "NVARCHAR");
    assert_eq!(row.java_type, "java.lang.String");
    assert_eq!(row.kotlin_type, "String");
    assert_eq!(row.column_size, "100");
    assert_eq!(row.decimal_digits, "");

    let tsv = export::to_tsv(&rows).unwrap();
    assert!(tsv.starts_with("Account Number\tAccount Number\tsales\tCustomer Accounts\t"));
    let csv = export::to_csv(&rows).unwrap();
    assert_eq!(csv.lines().count(), 2);
}
