use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::TodoFilter;

const DEFAULT_CONFIG_FILE: &str = "todo.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// `None` keeps todos in memory for the lifetime of the process.
    pub database_url: Option<String>,
    pub event_buffer: usize,
    pub log_filter: String,
    pub initial_filter: TodoFilter,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: None,
            event_buffer: 64,
            log_filter: "info".into(),
            initial_filter: TodoFilter::All,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    database_url: Option<String>,
    event_buffer: Option<usize>,
    log: Option<String>,
    filter: Option<TodoFilter>,
}

/// Defaults, then the config file, then environment variables.
///
/// An explicit `config_path` must exist; the default `todo.toml` is optional.
pub fn load_settings(config_path: Option<&Path>) -> anyhow::Result<Settings> {
    let mut settings = Settings::default();

    let (path, required) = match config_path {
        Some(path) => (path.to_path_buf(), true),
        None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
    };

    if required || path.exists() {
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config file '{}'", path.display()))?;
        apply_file(&mut settings, &raw)
            .with_context(|| format!("invalid config file '{}'", path.display()))?;
    }

    apply_env_overrides(&mut settings, |key| std::env::var(key).ok());
    Ok(settings)
}

pub(crate) fn apply_file(settings: &mut Settings, raw: &str) -> anyhow::Result<()> {
    let file_cfg: FileSettings = toml::from_str(raw)?;

    if let Some(v) = file_cfg.database_url {
        settings.database_url = Some(v);
    }
    if let Some(v) = file_cfg.event_buffer {
        settings.event_buffer = v;
    }
    if let Some(v) = file_cfg.log {
        settings.log_filter = v;
    }
    if let Some(v) = file_cfg.filter {
        settings.initial_filter = v;
    }
    Ok(())
}

pub(crate) fn apply_env_overrides<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup("TODO_DATABASE_URL") {
        settings.database_url = Some(v);
    }
    if let Some(v) = lookup("APP__DATABASE_URL") {
        settings.database_url = Some(v);
    }

    if let Some(v) = lookup("APP__EVENT_BUFFER") {
        if let Ok(parsed) = v.parse::<usize>() {
            settings.event_buffer = parsed;
        }
    }

    if let Some(v) = lookup("APP__LOG") {
        settings.log_filter = v;
    }

    if let Some(v) = lookup("APP__FILTER") {
        if let Ok(parsed) = v.parse::<TodoFilter>() {
            settings.initial_filter = parsed;
        }
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
