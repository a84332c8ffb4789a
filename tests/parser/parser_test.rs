use std::collections::HashMap;

use schemadoc::parser::{self, Delimiter, InputMode, NoLogicalNames, ParseError};

fn names(raw: &str) -> Vec<String> {
    parser::parse(raw, &NoLogicalNames)
        .unwrap()
        .into_iter()
        .map(|f| f.name)
        .collect()
}

#[test]
fn test_select_list_respects_parentheses() {
    let fields = parser::parse("SELECT a, COUNT(b, c), d FROM t", &NoLogicalNames).unwrap();
    let raws: Vec<_> = fields.iter().map(|f| f.raw.as_str()).collect();
    assert_eq!(raws, vec!["a", "COUNT(b, c)", "d"]);
}

#[test]
fn test_alias_and_qualifier() {
    let fields = parser::parse(
        "select `user_id` AS uid, t.amount_total\nfrom orders t;",
        &NoLogicalNames,
    )
    .unwrap();

    assert_eq!(fields[0].name, "uid");
    assert_eq!(fields[0].identifier, "uid");
    assert_eq!(fields[1].name, "amount_total");
    assert_eq!(fields[1].identifier, "amountTotal");
}

#[test]
fn test_select_without_from_and_trailing_terminator() {
    assert_eq!(names("SELECT 1 AS one, 2 AS two;"), vec!["one", "two"]);
}

#[test]
fn test_from_inside_subquery_is_not_the_boundary() {
    let fields = parser::parse(
        "SELECT id, (SELECT MAX(x) FROM y) AS top_x FROM t",
        &NoLogicalNames,
    )
    .unwrap();
    let names: Vec<_> = fields.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["id", "top_x"]);
    assert_eq!(fields[1].identifier, "topX");
}

#[test]
fn test_wrapped_names() {
    assert_eq!(
        names("[Order Date]\t\"customer_id\"\t`x`"),
        vec!["Order Date", "customer_id", "x"]
    );
    let fields = parser::parse("[Order Date]", &NoLogicalNames).unwrap();
    assert_eq!(fields[0].identifier, "orderDate");
}

#[test]
fn test_delimited_modes() {
    let tab = parser::parse_input("a\tb,c\n1\t2", &NoLogicalNames).unwrap();
    assert_eq!(tab.mode, InputMode::Delimited(Delimiter::Tab));
    assert_eq!(tab.fields.len(), 2);
    assert_eq!(tab.fields[1].name, "b,c");

    let csv = parser::parse_input("id, name\n1, bob", &NoLogicalNames).unwrap();
    assert_eq!(csv.mode, InputMode::Delimited(Delimiter::Comma));
    assert_eq!(csv.fields[1].name, "name");

    let ws = parser::parse_input("id   name\n1   bob", &NoLogicalNames).unwrap();
    assert_eq!(ws.mode, InputMode::Delimited(Delimiter::Whitespace));
    assert_eq!(ws.rows, vec![vec!["1".to_string(), "bob".to_string()]]);
}

#[test]
fn test_keyword_prefix_is_not_sql() {
    let parsed = parser::parse_input("selected_at\tname", &NoLogicalNames).unwrap();
    assert_eq!(parsed.mode, InputMode::Delimited(Delimiter::Tab));
    assert_eq!(parsed.fields[0].identifier, "selectedAt");
}

#[test]
fn test_comments_from_logical_names() {
    let mut lookup = HashMap::new();
    lookup.insert("customer_id".to_string(), "Customer ID".to_string());

    let fields = parser::parse("SELECT c.CUSTOMER_ID, c.name FROM customers c", &lookup).unwrap();
    assert_eq!(fields[0].comment, "Customer ID");
    assert_eq!(fields[0].identifier, "customerId");
    assert_eq!(fields[1].comment, "name");
}

#[test]
fn test_unusable_names_get_synthetic_fields() {
    let fields = parser::parse("SELECT *, COUNT(*) FROM t", &NoLogicalNames).unwrap();
    assert_eq!(fields[0].identifier, "field0");
    assert_eq!(fields[0].name, "*");
}

#[test]
fn test_blank_input() {
    assert_eq!(
        parser::parse("\n   \n", &NoLogicalNames),
        Err(ParseError::EmptyInput)
    );
    assert!(parser::parse("SELECT FROM t", &NoLogicalNames).unwrap().is_empty());
}
