use schemadoc::inference::{classify, infer, InferredType};
use schemadoc::parser::{self, NoLogicalNames};

#[test]
fn test_date_time_must_match_whole_value() {
    assert_eq!(classify("2024-01-05T10:00:00 not a date"), InferredType::Text);
    assert_eq!(classify("2024-01-05 10:00:00Z"), InferredType::Text);
    assert_eq!(infer(&["2024-01-05T10:00:00 not a date"]), InferredType::Text);
    assert_eq!(infer(&["2024-01-05T10:00:00"]), InferredType::DateTime);
}

#[test]
fn test_classification_precedence() {
    assert_eq!(classify("123"), InferredType::Int);
    assert_eq!(classify("-42"), InferredType::Int);
    assert_eq!(classify("3000000000"), InferredType::Long);
    assert_eq!(classify("3.14"), InferredType::Double);
    assert_eq!(classify("false"), InferredType::Boolean);
    assert_eq!(classify("2024-01-05"), InferredType::Date);
    assert_eq!(classify("10:00:00"), InferredType::Time);
    assert_eq!(classify("2024-01-05T10:00:00"), InferredType::DateTime);
    assert_eq!(classify("2024-01-05 10:00:00"), InferredType::DateTime);
    assert_eq!(classify("2024-01-05 10:00:00.123"), InferredType::Text);
    assert_eq!(classify("1.5e3"), InferredType::Text);
    assert_eq!(classify("yes"), InferredType::Text);
}

#[test]
fn test_only_first_non_blank_sample_counts() {
    assert_eq!(infer(&["", "  ", "7", "abc"]), InferredType::Int);
    assert_eq!(infer(&["abc", "7"]), InferredType::Text);
    let none: [&str; 0] = [];
    assert_eq!(infer(&none), InferredType::Text);
    assert_eq!(infer(&["", ""]), InferredType::Text);
}

#[test]
fn test_type_names() {
    assert_eq!(InferredType::Int.type_name(), "Int");
    assert_eq!(InferredType::Long.type_name(), "Long");
    assert_eq!(InferredType::Date.type_name(), "java.time.LocalDate");
    assert_eq!(InferredType::DateTime.to_string(), "java.time.LocalDateTime");
    assert_eq!(InferredType::Text.type_name(), "String");
}

#[test]
fn test_pasted_result_set() {
    let raw = "id\tname\tcreated_at\tscore\tactive\n\
               1\tbob\t2024-01-05 10:00:00\t9.5\ttrue\n\
               2\talice\t2024-01-06 11:00:00\t7.25\tfalse\n";
    let parsed = parser::parse_input(raw, &NoLogicalNames).unwrap();
    assert_eq!(
        parsed.infer_types(),
        vec![
            InferredType::Int,
            InferredType::Text,
            InferredType::DateTime,
            InferredType::Double,
            InferredType::Boolean,
        ]
    );
}

#[test]
fn test_samples_follow_source_positions() {
    let raw = "id\t\tamount\n1\tignored\t2.50\n";
    let parsed = parser::parse_input(raw, &NoLogicalNames).unwrap();
    let amount = &parsed.fields[1];
    assert_eq!(amount.name, "amount");
    assert_eq!(parsed.samples(amount), vec!["2.50"]);
    assert_eq!(parsed.infer_types(), vec![InferredType::Int, InferredType::Double]);
}

#[test]
fn test_sql_mode_infers_text() {
    let parsed = parser::parse_input("SELECT id, total FROM orders", &NoLogicalNames).unwrap();
    assert!(parsed.rows.is_empty());
    assert_eq!(parsed.infer_types(), vec![InferredType::Text, InferredType::Text]);
}
