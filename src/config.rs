//! Application Configuration
//!
//! Read from an optional TOML file, then overridden by `TIERLIST_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

use crate::domain::DEFAULT_TITLE;

pub const ENV_PREFIX: &str = "TIERLIST_";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: String, value: String },
}

/// Which backend holds the tierlist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    #[default]
    Sqlite,
    Json,
    Memory,
}

impl FromStr for StoreKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" => Ok(StoreKind::Sqlite),
            "json" => Ok(StoreKind::Json),
            "memory" => Ok(StoreKind::Memory),
            other => Err(format!("unknown store kind: {}", other)),
        }
    }
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StoreKind::Sqlite => "sqlite",
            StoreKind::Json => "json",
            StoreKind::Memory => "memory",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database file (sqlite) or record file (json)
    pub db_path: PathBuf,
    pub store: StoreKind,
    /// Where embedded thumbnails are unpacked; a temp dir when unset
    pub thumb_dir: Option<PathBuf>,
    /// Rolling log directory; stderr only when unset
    pub log_dir: Option<PathBuf>,
    /// Title given to new tierlists
    pub default_title: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("tierlist.db3"),
            store: StoreKind::default(),
            thumb_dir: None,
            log_dir: None,
            default_title: DEFAULT_TITLE.to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Read `path` if given, then apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => {
                let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                Self::from_toml_str(&text)?
            }
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply `TIERLIST_<FIELD>` overrides from `lookup`; empty values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |field: &str| {
            lookup(&format!("{}{}", ENV_PREFIX, field.to_ascii_uppercase()))
                .filter(|v| !v.trim().is_empty())
        };

        if let Some(v) = get("db_path") {
            self.db_path = PathBuf::from(v);
        }
        if let Some(v) = get("store") {
            self.store = v.parse().map_err(|_| ConfigError::InvalidValue {
                key: format!("{}STORE", ENV_PREFIX),
                value: v.clone(),
            })?;
        }
        if let Some(v) = get("thumb_dir") {
            self.thumb_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("log_dir") {
            self.log_dir = Some(PathBuf::from(v));
        }
        if let Some(v) = get("default_title") {
            self.default_title = v;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.store, StoreKind::Sqlite);
        assert_eq!(config.default_title, "Untitled");
        assert!(config.thumb_dir.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AppConfig::from_toml_str(
            r#"
            store = "json"
            db_path = "/data/list.json"
            "#,
        )
        .unwrap();

        assert_eq!(config.store, StoreKind::Json);
        assert_eq!(config.db_path, PathBuf::from("/data/list.json"));
        assert_eq!(config.default_title, "Untitled");
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        let err = AppConfig::from_toml_str("store = \"floppy\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(env(&[
                ("TIERLIST_STORE", "Memory"),
                ("TIERLIST_THUMB_DIR", "/tmp/thumbs"),
                ("TIERLIST_DEFAULT_TITLE", "Ramen shops"),
                ("TIERLIST_LOG_DIR", "  "),
            ]))
            .unwrap();

        assert_eq!(config.store, StoreKind::Memory);
        assert_eq!(config.thumb_dir, Some(PathBuf::from("/tmp/thumbs")));
        assert_eq!(config.default_title, "Ramen shops");
        assert!(config.log_dir.is_none());
    }

    #[test]
    fn test_env_rejects_unknown_store() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(env(&[("TIERLIST_STORE", "postgres")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("tierlist.toml");
        std::fs::write(&path, "default_title = \"Books\"\n").unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert!(!config.default_title.is_empty());

        let missing = AppConfig::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));
    }
}
