//! Configuration for the layout engine

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum LayoutConfigError {
    #[error("Failed to read layout config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse layout config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Which widget wins when a selector matches several siblings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TieBreak {
    /// The first match in child order
    #[default]
    First,
    /// The last match in child order
    Last,
}

/// Configuration options for layout encoding and resolution
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Emit "Incomplete layoutData" diagnostics for missing anchors
    pub warn_incomplete: bool,

    /// Winner among several selector matches
    pub tie_break: TieBreak,
}

/// TOML structure for deserializing a configuration file
#[derive(Deserialize, Default)]
struct TomlConfig {
    #[serde(default)]
    layout: LayoutConfig,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            warn_incomplete: true,
            tie_break: TieBreak::First,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, LayoutConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; the `[layout]` table is optional
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, LayoutConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        Ok(parsed.layout)
    }

    /// Enable or disable the missing-anchor diagnostics
    pub fn with_warn_incomplete(mut self, warn: bool) -> Self {
        self.warn_incomplete = warn;
        self
    }

    /// Set the selector tie-break rule
    pub fn with_tie_break(mut self, tie_break: TieBreak) -> Self {
        self.tie_break = tie_break;
        self
    }
}
