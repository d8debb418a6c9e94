//! # CLI Configuration
//!
//! Optional YAML file passed with `--config`:
//!
//! ```yaml
//! output: json           # text | json
//! log_level: debug       # EnvFilter directive; overrides -v
//! log_format: json       # text | json, for stderr log lines
//! grouped_amounts: true  # Indian digit grouping in text output
//! ```
//!
//! Every key is optional. Unknown keys are rejected so that a typo does not
//! silently fall back to a default.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::OutputFormat;

/// Log line format on stderr.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Contents of the `--config` file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CliConfig {
    pub output: OutputFormat,
    pub log_level: Option<String>,
    pub log_format: LogFormat,
    pub grouped_amounts: bool,
}

impl CliConfig {
    /// Read and parse a config file. An empty file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    /// Load `path` when given, otherwise use the defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), contents).unwrap();
        file
    }

    #[test]
    fn full_config_parses() {
        let file = write_config(
            "output: json\nlog_level: debug\nlog_format: json\ngrouped_amounts: true\n",
        );
        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(
            config,
            CliConfig {
                output: OutputFormat::Json,
                log_level: Some("debug".into()),
                log_format: LogFormat::Json,
                grouped_amounts: true,
            }
        );
    }

    #[test]
    fn partial_config_uses_defaults() {
        let file = write_config("grouped_amounts: true\n");
        let config = CliConfig::load(file.path()).unwrap();
        assert_eq!(config.output, OutputFormat::Text);
        assert_eq!(config.log_level, None);
        assert_eq!(config.log_format, LogFormat::Text);
        assert!(config.grouped_amounts);
    }

    #[test]
    fn empty_file_is_default() {
        let file = write_config("  \n");
        assert_eq!(CliConfig::load(file.path()).unwrap(), CliConfig::default());
    }

    #[test]
    fn unknown_key_is_rejected() {
        let file = write_config("output: json\ncolour: always\n");
        let err = CliConfig::load(file.path()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }

    #[test]
    fn bad_output_value_is_rejected() {
        let file = write_config("output: xml\n");
        assert!(CliConfig::load(file.path()).is_err());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = CliConfig::load(&path).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("failed to read config file"));
        assert!(msg.contains("absent.yaml"));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(CliConfig::load_optional(None).unwrap(), CliConfig::default());
    }
}
