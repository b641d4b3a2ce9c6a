//! Loading `BuilderSettings` from host configuration files.

use clausekit::{BuilderSettings, FluentBuilder, FormatHint, PlaceholderStyle};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct AppConfig {
    #[serde(default)]
    sql: BuilderSettings,
}

#[test]
fn missing_section_uses_defaults() {
    let cfg: AppConfig = toml::from_str("").unwrap();
    assert_eq!(cfg.sql, BuilderSettings::default());
    assert_eq!(cfg.sql.placeholder, PlaceholderStyle::Dollar);
    assert_eq!(cfg.sql.parameter_name_prefix, "p");
    assert_eq!(cfg.sql.max_logged_sql_length, Some(200));
}

#[test]
fn partial_toml_section() {
    let cfg: AppConfig = toml::from_str(
        r#"
[sql]
placeholder = { named = { prefix = "@" } }
reuse_parameters = true
max_logged_sql_length = 64
"#,
    )
    .unwrap();

    assert_eq!(cfg.sql.placeholder, PlaceholderStyle::Named { prefix: '@' });
    assert!(cfg.sql.reuse_parameters);
    assert!(!cfg.sql.lower_case_clauses);
    assert_eq!(cfg.sql.parameter_name_prefix, "p");
    assert_eq!(cfg.sql.max_logged_sql_length, Some(64));

    let mut b = FluentBuilder::with_settings(cfg.sql);
    b.where_(|s| {
        s.append_literal("id = ").append_formatted(9_i64, FormatHint::None);
    })
    .unwrap();
    assert_eq!(b.sql(), "WHERE id = @p0");
}

#[test]
fn unit_placeholder_from_toml() {
    let cfg: AppConfig = toml::from_str(
        r#"
[sql]
placeholder = "question"
lower_case_clauses = true
"#,
    )
    .unwrap();
    assert_eq!(cfg.sql.placeholder, PlaceholderStyle::Question);
    assert!(cfg.sql.lower_case_clauses);
}

#[test]
fn json_round_trip() {
    let settings = BuilderSettings::default()
        .with_named_placeholders(':')
        .with_parameter_name_prefix("arg")
        .no_log_truncate();
    let json = serde_json::to_value(&settings).unwrap();
    assert_eq!(json["placeholder"]["named"]["prefix"], ":");
    assert_eq!(json["max_logged_sql_length"], serde_json::Value::Null);

    let back: BuilderSettings = serde_json::from_value(json).unwrap();
    assert_eq!(back, settings);
}

#[test]
fn unknown_placeholder_is_rejected() {
    let err = toml::from_str::<AppConfig>("[sql]\nplaceholder = \"colon\"\n");
    assert!(err.is_err());
}
