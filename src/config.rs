//! Document configuration module.
//!
//! Handles loading and validating `config.toml` from the source directory.
//! Config files are sparse — override just the values you want:
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! title = "Catechism"             # Document title and running head
//! include_optional = false        # Emit questions flagged optional = true
//! numbering = "per-question"      # Footnote numbering: "per-question" | "global"
//!
//! [links]
//! enabled = true                  # Wrap verse references in hyperlinks
//! version = "ESV"                 # BibleGateway translation for the links
//!
//! [fonts]
//! dir = "./fonts/"                # fontspec path to the EB Garamond files
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::number::NumberingScope;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Document configuration loaded from `config.toml`.
///
/// All fields have sensible defaults. User config files need only specify
/// the values they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocConfig {
    /// Document title, also used for the running head and PDF metadata.
    pub title: String,
    /// Emit questions flagged `optional = true` in their records.
    pub include_optional: bool,
    /// Footnote numbering scope: reset per question, or run document-wide.
    pub numbering: NumberingScope,
    /// Scripture hyperlink settings.
    pub links: LinkConfig,
    /// Font settings for the fontspec preamble.
    pub fonts: FontConfig,
}

impl Default for DocConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            include_optional: false,
            numbering: NumberingScope::default(),
            links: LinkConfig::default(),
            fonts: FontConfig::default(),
        }
    }
}

fn default_title() -> String {
    "Catechism".to_string()
}

impl DocConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.title.trim().is_empty() {
            return Err(ConfigError::Validation("title must not be empty".into()));
        }
        if self.links.enabled && self.links.version.trim().is_empty() {
            return Err(ConfigError::Validation(
                "links.version must not be empty when links are enabled".into(),
            ));
        }
        Ok(())
    }
}

/// Scripture hyperlink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LinkConfig {
    /// When true, verse references in footnotes become `\href` links.
    pub enabled: bool,
    /// BibleGateway translation the links point at.
    pub version: String,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            version: "ESV".to_string(),
        }
    }
}

/// Font settings for the fontspec preamble.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontConfig {
    /// Directory holding the EB Garamond OTF files, relative to where the
    /// typesetting engine runs.
    pub dir: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            dir: "./fonts/".to_string(),
        }
    }
}

/// Load config from `config.toml` in the source directory.
///
/// Uses defaults if the file doesn't exist.
pub fn load_config(root: &Path) -> Result<DocConfig, ConfigError> {
    let config_path = root.join("config.toml");
    let config = if config_path.exists() {
        let content = fs::read_to_string(&config_path)?;
        toml::from_str(&content)?
    } else {
        DocConfig::default()
    };
    config.validate()?;
    Ok(config)
}

/// A stock `config.toml` with every option present and documented,
/// printed by `catset gen-config`.
pub fn stock_config_toml() -> String {
    r#"# catset configuration
# Place this file in the source directory, next to the question records.
# Every option is optional; the values below are the defaults.

# Document title, also used for the running head and PDF metadata.
title = "Catechism"

# Emit questions whose records set `optional = true`.
include_optional = false

# Footnote numbering scope:
#   "per-question" - markers restart at 1 for every question
#   "global"       - markers run continuously through the document
numbering = "per-question"

[links]
# Wrap verse references in hyperlinks to an online passage lookup.
enabled = true
# Translation the links point at (any BibleGateway version code).
version = "ESV"

[fonts]
# Directory holding the EB Garamond OTF files, relative to where the
# typesetting engine runs.
dir = "./fonts/"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Catechism");
        assert!(!config.include_optional);
        assert_eq!(config.numbering, NumberingScope::PerQuestion);
        assert!(config.links.enabled);
        assert_eq!(config.links.version, "ESV");
    }

    #[test]
    fn sparse_override_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("config.toml"),
            "title = \"Orthodox Catechism\"\n",
        )
        .unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Orthodox Catechism");
        assert_eq!(config.links.version, "ESV");
    }

    #[test]
    fn numbering_scope_parses_both_values() {
        let config: DocConfig = toml::from_str("numbering = \"global\"").unwrap();
        assert_eq!(config.numbering, NumberingScope::Global);
        let config: DocConfig = toml::from_str("numbering = \"per-question\"").unwrap();
        assert_eq!(config.numbering, NumberingScope::PerQuestion);
    }

    #[test]
    fn unknown_key_is_rejected() {
        let result: Result<DocConfig, _> = toml::from_str("titel = \"typo\"");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_numbering_value_is_rejected() {
        let result: Result<DocConfig, _> = toml::from_str("numbering = \"per-page\"");
        assert!(result.is_err());
    }

    #[test]
    fn empty_title_fails_validation() {
        let config = DocConfig {
            title: "  ".into(),
            ..DocConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn empty_link_version_fails_validation_only_when_enabled() {
        let mut config = DocConfig::default();
        config.links.version = String::new();
        assert!(config.validate().is_err());
        config.links.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let parsed: DocConfig = toml::from_str(&stock_config_toml()).unwrap();
        let defaults = DocConfig::default();
        assert_eq!(parsed.title, defaults.title);
        assert_eq!(parsed.include_optional, defaults.include_optional);
        assert_eq!(parsed.numbering, defaults.numbering);
        assert_eq!(parsed.links.version, defaults.links.version);
        assert_eq!(parsed.fonts.dir, defaults.fonts.dir);
    }
}
