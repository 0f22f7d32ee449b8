//! Dispatch table scenarios driven through configuration.

use rest_bundle::config::parse_config;
use rest_bundle::lifecycle::startup::build_table;
use rest_bundle::visitor::{resolve, DispatchTable, HandlerRef, RegistryError};

fn table(toml: &str) -> Result<DispatchTable, RegistryError> {
    build_table(&parse_config(toml).unwrap())
}

fn order(table: &DispatchTable) -> Vec<String> {
    table.handlers().map(HandlerRef::to_string).collect()
}

#[test]
fn test_priority_scenario() {
    let table = table(
        r#"
        [[visitors]]
        handler = "a"
        patterns = [["^application/.*$"]]
        priority = 10

        [[visitors]]
        handler = "b"
        patterns = [["^application/.*$"]]
        priority = -10

        [[visitors]]
        handler = "c"
        patterns = [["^application/json$"]]
        prority = 0

        [[visitors]]
        handler = "d"
        patterns = [["^application/xml$"]]
        "#,
    )
    .unwrap();

    assert_eq!(order(&table), vec!["a", "c", "d", "b"]);
}

#[test]
fn test_string_and_array_pattern_sources() {
    let table = table(
        r#"
        [[visitors]]
        handler = "test_string"
        patterns = "visitor.test1.regexps"

        [[visitors]]
        handler = "test_array"
        patterns = [["(^.*/.*$)"]]

        [parameters]
        "visitor.test1.regexps" = [["(^application/json$)"]]
        "#,
    )
    .unwrap();

    assert_eq!(order(&table), vec!["test_string", "test_array"]);
    assert_eq!(resolve(&table, &["application/json"]).unwrap().as_str(), "test_string");
    assert_eq!(resolve(&table, &["text/plain"]).unwrap().as_str(), "test_array");
}

#[test]
fn test_malformed_priority_is_default() {
    let table = table(
        r#"
        [[visitors]]
        handler = "negative"
        patterns = [["a"]]
        priority = -1

        [[visitors]]
        handler = "odd"
        patterns = [["b"]]
        priority = "urgent"

        [[visitors]]
        handler = "numeric_string"
        patterns = [["c"]]
        priority = "5"
        "#,
    )
    .unwrap();

    assert_eq!(order(&table), vec!["numeric_string", "odd", "negative"]);
}

#[test]
fn test_large_priority_sorts_first() {
    let table = table(
        r#"
        [[visitors]]
        handler = "low"
        patterns = [["a"]]
        priority = 1

        [[visitors]]
        handler = "big"
        patterns = [["b"]]
        priority = 3000000000
        "#,
    )
    .unwrap();

    assert_eq!(order(&table), vec!["big", "low"]);
    assert_eq!(table.entries()[0].priority(), 3_000_000_000);
}

#[test]
fn test_missing_patterns_fail_build() {
    let err = table(
        r#"
        [[visitors]]
        handler = "json"
        priority = 3
        "#,
    )
    .unwrap_err();

    assert!(matches!(err, RegistryError::MissingPatterns { index: 0, .. }));
}

#[test]
fn test_unresolved_parameter_fails_build() {
    let err = table(
        r#"
        [[visitors]]
        handler = "json"
        patterns = "does.not.exist"
        "#,
    )
    .unwrap_err();

    assert!(err.to_string().contains("does.not.exist"));
}
