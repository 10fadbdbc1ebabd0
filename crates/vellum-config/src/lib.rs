//! Configuration management for Vellum.
//!
//! Parses `vellum.toml` with serde and discovers it in the working directory
//! or its parents. CLI settings are applied during load via [`CliSettings`].
//!
//! ```toml
//! [content]
//! article_class = "article-content"
//! default_language = "python"
//!
//! [toc]
//! title = "Table of Contents"
//!
//! [diagrams]
//! kroki_url = "${KROKI_URL:-https://kroki.io}"
//! timeout_secs = 30
//!
//! [diagrams.mermaid]
//! theme = "default"
//! security_level = "loose"
//!
//! [diagrams.mermaid.theme_variables]
//! primaryColor = "#dce5f2"
//! ```
//!
//! ## Environment Variable Expansion
//!
//! `diagrams.kroki_url` supports `${VAR}` (error if unset) and
//! `${VAR:-default}`.

mod expand;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "vellum.toml";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override Kroki URL for diagram rendering.
    pub kroki_url: Option<String>,
    /// Override article region class.
    pub article_class: Option<String>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Article content settings.
    pub content: ContentConfig,
    /// Table of contents settings.
    pub toc: TocConfig,
    /// Diagram rendering settings.
    pub diagrams: DiagramsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Article content configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Class marking article content regions.
    pub article_class: String,
    /// Language assumed for code blocks without a `language-*` class.
    pub default_language: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            article_class: "article-content".to_owned(),
            default_language: "python".to_owned(),
        }
    }
}

/// Table of contents configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TocConfig {
    /// Title shown above the list.
    pub title: String,
}

impl Default for TocConfig {
    fn default() -> Self {
        Self {
            title: "Table of Contents".to_owned(),
        }
    }
}

/// Diagram rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct DiagramsConfig {
    /// Kroki server URL. Without it, diagrams are left for client-side rendering.
    pub kroki_url: Option<String>,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Mermaid initialization.
    pub mermaid: MermaidSettings,
}

impl Default for DiagramsConfig {
    fn default() -> Self {
        Self {
            kroki_url: None,
            timeout_secs: 30,
            mermaid: MermaidSettings::default(),
        }
    }
}

impl DiagramsConfig {
    /// Per-request timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Mermaid initialization settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MermaidSettings {
    /// Theme name.
    pub theme: String,
    /// Security level.
    pub security_level: String,
    /// Render flowchart labels as HTML.
    pub flowchart_html_labels: bool,
    /// Flowchart edge curve.
    pub flowchart_curve: String,
    /// Theme colors, merged over the built-in palette.
    pub theme_variables: BTreeMap<String, String>,
}

impl Default for MermaidSettings {
    fn default() -> Self {
        Self {
            theme: "default".to_owned(),
            security_level: "loose".to_owned(),
            flowchart_html_labels: true,
            flowchart_curve: "basis".to_owned(),
            theme_variables: BTreeMap::new(),
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`diagrams.kroki_url`").
        field: String,
        /// Error message (e.g., "${`KROKI_URL`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `vellum.toml` in the current directory and its parents, falling
    /// back to defaults. CLI settings take precedence over file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing or
    /// expansion fails, or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(kroki_url) = &settings.kroki_url {
            self.diagrams.kroki_url = Some(kroki_url.clone());
        }
        if let Some(article_class) = &settings.article_class {
            self.content.article_class.clone_from(article_class);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let start = std::env::current_dir().ok()?;
        Self::discover_from(&start)
    }

    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_content()?;
        self.validate_diagrams()?;
        Ok(())
    }

    fn validate_content(&self) -> Result<(), ConfigError> {
        let class = &self.content.article_class;
        require_non_empty(class, "content.article_class")?;
        if class.contains(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "content.article_class must be a single class name".to_owned(),
            ));
        }
        require_non_empty(&self.content.default_language, "content.default_language")?;
        require_non_empty(&self.toc.title, "toc.title")?;
        Ok(())
    }

    fn validate_diagrams(&self) -> Result<(), ConfigError> {
        if let Some(ref kroki_url) = self.diagrams.kroki_url {
            require_non_empty(kroki_url, "diagrams.kroki_url")?;
            require_http_url(kroki_url, "diagrams.kroki_url")?;
        }
        if self.diagrams.timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "diagrams.timeout_secs must be greater than 0".to_owned(),
            ));
        }
        require_non_empty(&self.diagrams.mermaid.theme, "diagrams.mermaid.theme")?;
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref url) = self.diagrams.kroki_url {
            self.diagrams.kroki_url = Some(expand::expand_env(url, "diagrams.kroki_url")?);
        }
        Ok(())
    }
}
