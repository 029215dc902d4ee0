use super::*;

use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_keep_todos_in_memory() {
    let settings = Settings::default();
    assert_eq!(settings.database_url, None);
    assert_eq!(settings.event_buffer, 64);
    assert_eq!(settings.log_filter, "info");
    assert_eq!(settings.initial_filter, TodoFilter::All);
}

#[test]
fn file_values_override_defaults() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
        database_url = "sqlite://./data/todos.db"
        event_buffer = 8
        log = "debug"
        filter = "active"
        "#,
    )
    .expect("valid toml");

    assert_eq!(
        settings.database_url.as_deref(),
        Some("sqlite://./data/todos.db")
    );
    assert_eq!(settings.event_buffer, 8);
    assert_eq!(settings.log_filter, "debug");
    assert_eq!(settings.initial_filter, TodoFilter::Active);
}

#[test]
fn partial_file_leaves_other_fields_alone() {
    let mut settings = Settings::default();
    apply_file(&mut settings, "event_buffer = 3").expect("valid toml");
    assert_eq!(settings.event_buffer, 3);
    assert_eq!(settings.database_url, None);
}

#[test]
fn unknown_filter_in_file_is_an_error() {
    let mut settings = Settings::default();
    assert!(apply_file(&mut settings, r#"filter = "someday""#).is_err());
}

#[test]
fn app_prefixed_env_wins_over_legacy_name() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[
            ("TODO_DATABASE_URL", "sqlite://legacy.db"),
            ("APP__DATABASE_URL", "sqlite://app.db"),
            ("APP__LOG", "warn"),
            ("APP__FILTER", "completed"),
        ]),
    );

    assert_eq!(settings.database_url.as_deref(), Some("sqlite://app.db"));
    assert_eq!(settings.log_filter, "warn");
    assert_eq!(settings.initial_filter, TodoFilter::Completed);
}

#[test]
fn unparseable_env_values_are_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[("APP__EVENT_BUFFER", "lots"), ("APP__FILTER", "someday")]),
    );
    assert_eq!(settings.event_buffer, 64);
    assert_eq!(settings.initial_filter, TodoFilter::All);
}

#[test]
fn explicit_config_path_must_exist() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let missing = temp_root.path().join("absent.toml");
    assert!(load_settings(Some(&missing)).is_err());
}

#[test]
fn explicit_config_path_is_loaded() {
    let temp_root = tempfile::tempdir().expect("tempdir");
    let path = temp_root.path().join("todo.toml");
    fs::write(&path, "event_buffer = 5\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.event_buffer, 5);
}
