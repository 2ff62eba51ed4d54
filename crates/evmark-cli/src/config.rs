//! Configuration file support for the evmark CLI
//!
//! Loads settings from `_evmark.toml`.

use anyhow::{Context, Result};
use evmark_core::MacroFallback;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name
pub const CONFIG_FILE_NAME: &str = "_evmark.toml";

/// Schema URL for the configuration file
pub const SCHEMA_URL: &str =
    "https://raw.githubusercontent.com/evmark/evmark/main/crates/evmark-cli/schema/evmark.schema.json";

/// Root configuration structure
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct Config {
    /// Output file configuration
    #[serde(skip_serializing_if = "OutputConfig::is_empty")]
    pub output: OutputConfig,
    /// Rendering configuration
    #[serde(skip_serializing_if = "RenderConfig::is_empty")]
    pub render: RenderConfig,
    /// Link and image target configuration
    #[serde(skip_serializing_if = "ReferencesConfig::is_empty")]
    pub references: ReferencesConfig,
}

/// Output file configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct OutputConfig {
    /// Extension of the written Markdown files (default: "md")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl OutputConfig {
    fn is_empty(&self) -> bool {
        self.extension.is_none()
    }
}

/// Rendering configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct RenderConfig {
    /// What to do with macros that have no Markdown form: "skip" drops them,
    /// "wiki" writes them in wiki macro syntax (default: "skip")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub macro_fallback: Option<String>,
}

impl RenderConfig {
    fn is_empty(&self) -> bool {
        self.macro_fallback.is_none()
    }

    /// Parsed macro fallback, if configured
    pub fn macro_fallback(&self) -> Result<Option<MacroFallback>> {
        self.macro_fallback
            .as_deref()
            .map(|s| s.parse::<MacroFallback>().map_err(anyhow::Error::msg))
            .transpose()
            .context("Invalid [render] macro_fallback")
    }
}

/// Link and image target configuration
#[derive(Debug, Default, Clone, Deserialize, Serialize, JsonSchema)]
#[serde(default)]
pub struct ReferencesConfig {
    /// Keep `type:` prefixes (`doc:`, `attach:`, ...) on typed wiki references (default: true)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub typed_prefixes: Option<bool>,
}

impl ReferencesConfig {
    fn is_empty(&self) -> bool {
        self.typed_prefixes.is_none()
    }
}

impl Config {
    /// Load configuration from a specific file path
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Try to load configuration from a directory (looks for `_evmark.toml`)
    ///
    /// Returns `Ok(None)` if the config file doesn't exist.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Generate JSON schema for the configuration
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Generate JSON schema as a string
    pub fn json_schema_string() -> Result<String> {
        let schema = Self::json_schema();
        serde_json::to_string_pretty(&schema).context("Failed to serialize JSON schema")
    }

    /// Serialize configuration to TOML string with schema directive
    pub fn to_toml_with_schema(&self) -> Result<String> {
        let toml_content =
            toml::to_string_pretty(self).context("Failed to serialize config to TOML")?;

        Ok(format!("#:schema {}\n\n{}", SCHEMA_URL, toml_content))
    }

    /// Create a sample configuration with the defaults spelled out, for the init command
    pub fn sample() -> Self {
        Config {
            output: OutputConfig {
                extension: Some("md".to_string()),
            },
            render: RenderConfig {
                macro_fallback: Some("skip".to_string()),
            },
            references: ReferencesConfig {
                typed_prefixes: Some(true),
            },
        }
    }
}
