//! Configuration loading

use super::{ArbiterConfig, LogFormat};
use crate::error::{ArbiterError, ArbiterResult};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "ARBITER_";

/// Source of configuration data
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Configuration from a JSON, TOML or YAML file
    File(PathBuf),
    /// Overrides from `ARBITER_*` environment variables
    Environment,
    /// Overrides from an explicit key/value map (same keys as the environment)
    Overrides(HashMap<String, String>),
}

/// Configuration loader with support for multiple sources
///
/// Sources are applied in the order they were added. A file replaces the
/// whole configuration (missing keys fall back to defaults); environment and
/// explicit overrides patch individual fields.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    sources: Vec<ConfigSource>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Add a configuration source
    pub fn add_source(mut self, source: ConfigSource) -> Self {
        self.sources.push(source);
        self
    }

    /// Add a file source
    pub fn with_file<P: AsRef<Path>>(self, path: P) -> Self {
        self.add_source(ConfigSource::File(path.as_ref().to_path_buf()))
    }

    /// Add environment variables source
    pub fn with_env(self) -> Self {
        self.add_source(ConfigSource::Environment)
    }

    /// Add explicit overrides
    pub fn with_overrides(self, overrides: HashMap<String, String>) -> Self {
        self.add_source(ConfigSource::Overrides(overrides))
    }

    /// Load configuration from all sources and validate the result
    pub fn load(self) -> ArbiterResult<ArbiterConfig> {
        let mut config = ArbiterConfig::default();

        for source in &self.sources {
            match source {
                ConfigSource::File(path) => {
                    tracing::debug!("Loading config from file: {}", path.display());
                    config = load_from_file(path)?;
                }
                ConfigSource::Environment => {
                    tracing::debug!("Applying config overrides from environment");
                    apply_overrides(&mut config, |key| std::env::var(key).ok())?;
                }
                ConfigSource::Overrides(map) => {
                    tracing::debug!("Applying {} explicit config overrides", map.len());
                    apply_overrides(&mut config, |key| map.get(key).cloned())?;
                }
            }
        }

        config.validate()?;
        Ok(config)
    }
}

/// Load configuration from a file
///
/// The format is chosen by extension: `.toml`, `.yaml`/`.yml`, anything else
/// is parsed as JSON. A missing file yields the default configuration.
pub fn load_from_file(path: &Path) -> ArbiterResult<ArbiterConfig> {
    if !path.exists() {
        tracing::debug!("Config file {} not found, using defaults", path.display());
        return Ok(ArbiterConfig::default());
    }

    let content = fs::read_to_string(path).map_err(|e| {
        ArbiterError::config_with_context(
            format!("Failed to read config file: {}", e),
            format!("Reading configuration from '{}'", path.display()),
        )
    })?;

    let config = match path.extension().and_then(|s| s.to_str()) {
        Some("toml") => toml::from_str(&content).map_err(|e| {
            ArbiterError::config_with_context(
                format!("Failed to parse TOML config: {}", e),
                format!("Deserializing TOML configuration from '{}'", path.display()),
            )
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| {
            ArbiterError::config_with_context(
                format!("Failed to parse YAML config: {}", e),
                format!("Deserializing YAML configuration from '{}'", path.display()),
            )
        })?,
        _ => serde_json::from_str(&content).map_err(|e| {
            ArbiterError::config_with_context(
                format!("Failed to parse JSON config: {}", e),
                format!("Deserializing JSON configuration from '{}'", path.display()),
            )
        })?,
    };

    Ok(config)
}

/// Patch individual fields from `ARBITER_*` keys
fn apply_overrides<F>(config: &mut ArbiterConfig, lookup: F) -> ArbiterResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |name: &str| lookup(&format!("{}{}", ENV_PREFIX, name));

    if let Some(v) = get("MAX_HISTORY_SIZE") {
        config.tracker.max_history_size = parse_value("MAX_HISTORY_SIZE", &v)?;
    }
    if let Some(v) = get("ANALYTICS_CACHE_TTL") {
        config.tracker.analytics_cache_ttl = parse_duration("ANALYTICS_CACHE_TTL", &v)?;
    }
    if let Some(v) = get("RETENTION") {
        config.tracker.retention = parse_duration("RETENTION", &v)?;
    }
    if let Some(v) = get("CACHE_SIZE") {
        config.matching.cache_size = parse_value("CACHE_SIZE", &v)?;
    }
    if let Some(v) = get("CACHE_TTL") {
        config.matching.cache_ttl = parse_duration("CACHE_TTL", &v)?;
    }
    if let Some(v) = get("MAX_RECOMMENDATIONS") {
        config.matching.max_recommendations = parse_value("MAX_RECOMMENDATIONS", &v)?;
    }
    if let Some(v) = get("DECISION_THRESHOLD") {
        config.matching.decision_threshold = parse_value("DECISION_THRESHOLD", &v)?;
    }
    if let Some(v) = get("LOG_LEVEL") {
        config.logging.level = v;
    }
    if let Some(v) = get("LOG_FORMAT") {
        config.logging.format = LogFormat::from_str(&v)
            .map_err(|e| ArbiterError::config_with_context(e, format!("{}LOG_FORMAT", ENV_PREFIX)))?;
    }

    Ok(())
}

fn parse_value<T: FromStr>(name: &str, raw: &str) -> ArbiterResult<T> {
    raw.trim().parse().map_err(|_| {
        ArbiterError::config_with_context(
            format!("Invalid value '{}'", raw),
            format!("{}{}", ENV_PREFIX, name),
        )
    })
}

fn parse_duration(name: &str, raw: &str) -> ArbiterResult<std::time::Duration> {
    humantime_serde::re::humantime::parse_duration(raw.trim()).map_err(|e| {
        ArbiterError::config_with_context(
            format!("Invalid duration '{}': {}", raw, e),
            format!("{}{}", ENV_PREFIX, name),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_load_defaults_when_file_missing() {
        let config = ConfigLoader::new()
            .with_file("/nonexistent/arbiter.toml")
            .load()
            .unwrap();
        assert_eq!(config, ArbiterConfig::default());
    }

    #[test]
    fn test_load_from_toml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("arbiter.toml");
        fs::write(
            &path,
            r#"
[tracker]
max_history_size = 50
analytics_cache_ttl = "1m"

[matching]
cache_size = 10
decision_threshold = 0.8

[logging]
level = "debug"
format = "json"
"#,
        )
        .unwrap();

        let config = ConfigLoader::new().with_file(&path).load().unwrap();
        assert_eq!(config.tracker.max_history_size, 50);
        assert_eq!(config.tracker.analytics_cache_ttl, Duration::from_secs(60));
        assert_eq!(config.tracker.analytics_window, 20);
        assert_eq!(config.matching.cache_size, 10);
        assert_eq!(config.matching.decision_threshold, 0.8);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_load_from_yaml_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("arbiter.yaml");
        fs::write(&path, "matching:\n  cache_ttl: 30s\n  max_recommendations: 3\n").unwrap();

        let config = ConfigLoader::new().with_file(&path).load().unwrap();
        assert_eq!(config.matching.cache_ttl, Duration::from_secs(30));
        assert_eq!(config.matching.max_recommendations, 3);
        assert_eq!(config.matching.cache_size, 100);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("arbiter.json");
        fs::write(&path, "{ not json").unwrap();

        let err = ConfigLoader::new().with_file(&path).load().unwrap_err();
        assert_eq!(err.error_code(), "ARBITER_CONFIG");
    }

    #[test]
    fn test_overrides_patch_fields() {
        let overrides = HashMap::from([
            ("ARBITER_CACHE_SIZE".to_string(), "7".to_string()),
            ("ARBITER_CACHE_TTL".to_string(), "2m".to_string()),
            ("ARBITER_DECISION_THRESHOLD".to_string(), "0.6".to_string()),
            ("ARBITER_LOG_FORMAT".to_string(), "compact".to_string()),
        ]);

        let config = ConfigLoader::new().with_overrides(overrides).load().unwrap();
        assert_eq!(config.matching.cache_size, 7);
        assert_eq!(config.matching.cache_ttl, Duration::from_secs(120));
        assert_eq!(config.matching.decision_threshold, 0.6);
        assert_eq!(config.logging.format, LogFormat::Compact);
    }

    #[test]
    fn test_overrides_are_validated() {
        let overrides = HashMap::from([("ARBITER_CACHE_SIZE".to_string(), "0".to_string())]);
        assert!(ConfigLoader::new().with_overrides(overrides).load().is_err());

        let overrides = HashMap::from([("ARBITER_CACHE_SIZE".to_string(), "lots".to_string())]);
        let err = ConfigLoader::new().with_overrides(overrides).load().unwrap_err();
        assert_eq!(err.context(), Some("ARBITER_CACHE_SIZE"));
    }
}
