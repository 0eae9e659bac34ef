//! Tool configuration.
//!
//! Looked up in order: an explicit path, `./schemashift.toml`, then
//! `<config dir>/schemashift/config.toml`. Missing files fall back to
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ShiftError, ShiftResult};

/// File name looked up in the working directory.
pub const LOCAL_CONFIG: &str = "schemashift.toml";

/// How scripts are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Sql,
    Json,
}

/// Main configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Output format for rendered scripts
    pub format: OutputFormat,

    /// Appended to each statement when printing a script
    pub terminator: String,

    /// Where new plan files are written
    pub migrations_dir: PathBuf,

    /// Skip irreversible changes instead of failing a revert script
    pub allow_partial_revert: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            format: OutputFormat::Sql,
            terminator: ";".to_string(),
            migrations_dir: PathBuf::from("migrations"),
            allow_partial_revert: false,
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> ShiftResult<Self> {
        toml::from_str(content).map_err(|e| ShiftError::Config(e.to_string()))
    }

    /// Load from an explicit file. The file must exist.
    pub fn from_path(path: impl AsRef<Path>) -> ShiftResult<Self> {
        let path = path.as_ref();
        tracing::debug!("Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Load from the first config file found, or defaults.
    pub fn load(explicit: Option<&Path>) -> ShiftResult<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }

        for candidate in Self::search_paths() {
            if candidate.is_file() {
                return Self::from_path(candidate);
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Candidate config files, most specific first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG)];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("schemashift").join("config.toml"));
        }
        paths
    }

    /// Render statements as a script, one per line.
    pub fn script(&self, statements: &[String]) -> String {
        statements
            .iter()
            .map(|s| format!("{}{}", s, self.terminator))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.terminator, ";");
    }

    #[test]
    fn test_partial_file() {
        let config = Config::from_toml_str(
            r#"
            format = "json"
            allow_partial_revert = true
            "#,
        )
        .unwrap();
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.allow_partial_revert);
        assert_eq!(config.migrations_dir, PathBuf::from("migrations"));
    }

    #[test]
    fn test_unknown_key() {
        let err = Config::from_toml_str("colour = true").unwrap_err();
        assert!(matches!(err, ShiftError::Config(_)));
    }

    #[test]
    fn test_script() {
        let config = Config {
            terminator: ";".into(),
            ..Config::default()
        };
        let script = config.script(&["DROP TABLE b".to_string(), "DROP TABLE a".to_string()]);
        assert_eq!(script, "DROP TABLE b;\nDROP TABLE a;");
    }

    #[test]
    fn test_search_paths_start_local() {
        assert_eq!(Config::search_paths()[0], PathBuf::from(LOCAL_CONFIG));
    }
}
