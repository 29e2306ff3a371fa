// SPDX-License-Identifier: PMPL-1.0-or-later
//! Configuration handling for a11y-fixer

use crate::error::{A11yError, Result};
use crate::position::LineEndings;
use crate::resolver::OverlapPolicy;
use crate::rules::labels::{LabelMode, DEFAULT_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rule and position settings
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Batch edit settings
    #[serde(default)]
    pub resolver: ResolverConfig,

    /// Suggestion server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Remote suggestion client settings
    #[serde(default)]
    pub suggestions: SuggestionConfig,

    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
}

/// Analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Which characters end a line: "lf" or "universal"
    #[serde(default)]
    pub line_endings: LineEndings,

    /// How inserted label text is produced: "placeholder" or "heuristic"
    #[serde(default)]
    pub labels: LabelMode,

    /// Text inserted in placeholder mode
    #[serde(default = "default_placeholder")]
    pub placeholder: String,

    /// Language inserted by the html-lang fix
    #[serde(default = "default_language")]
    pub default_language: String,

    /// Rule ids to skip
    #[serde(default)]
    pub disabled_rules: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            line_endings: LineEndings::default(),
            labels: LabelMode::default(),
            placeholder: default_placeholder(),
            default_language: default_language(),
            disabled_rules: vec![],
        }
    }
}

fn default_placeholder() -> String {
    DEFAULT_PLACEHOLDER.to_string()
}

fn default_language() -> String {
    "en".to_string()
}

/// Resolver configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// "priority" or "last-wins"
    #[serde(default)]
    pub overlap: OverlapPolicy,
}

/// Suggestion server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Longer input is truncated before analysis
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_chars: default_max_chars(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_chars() -> usize {
    600_000
}

/// Remote suggestion client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestionConfig {
    /// Base URL of a suggestion server (e.g. "http://127.0.0.1:8000")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        Self {
            url: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    10
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a path
pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        debug!("Config file not found at {}, using defaults", path.display());
        return Ok(Config::default());
    }

    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;

    debug!(?config, "Loaded configuration");
    Ok(config)
}

/// Get the default config path for a project
pub fn default_config_path() -> PathBuf {
    PathBuf::from(".a11y-fixer.toml")
}

/// Write default configuration to a file
pub fn write_default_config(path: &Path) -> Result<()> {
    let config = Config::default();

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(&config).map_err(|e| A11yError::Config(e.to_string()))?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.placeholder, "TODO: describe");
        assert_eq!(config.analysis.line_endings, LineEndings::Lf);
        assert_eq!(config.resolver.overlap, OverlapPolicy::Priority);
        assert_eq!(config.server.max_chars, 600_000);
        assert!(config.suggestions.url.is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            [analysis]
            labels = "heuristic"
            line_endings = "universal"
            disabled_rules = ["html-lang"]

            [resolver]
            overlap = "last-wins"
            "#,
        )
        .unwrap();
        assert_eq!(config.analysis.labels, LabelMode::Heuristic);
        assert_eq!(config.analysis.line_endings, LineEndings::Universal);
        assert_eq!(config.analysis.disabled_rules, vec!["html-lang"]);
        assert_eq!(config.analysis.default_language, "en");
        assert_eq!(config.resolver.overlap, OverlapPolicy::LastWins);
        assert_eq!(config.server.port, 8000);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_write_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(".a11y-fixer.toml");
        write_default_config(&path).unwrap();
        let config = load_config(&path).unwrap();
        assert_eq!(config.analysis.placeholder, "TODO: describe");
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[analysis\nlabels = ").unwrap();
        assert!(matches!(load_config(&path), Err(A11yError::Toml(_))));
    }
}
