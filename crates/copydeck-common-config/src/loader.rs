//! Configuration file loading and parsing.

use crate::types::CopydeckConfig;
use regex::Regex;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;

/// Directory holding project configuration, relative to the project root.
pub const CONFIG_DIR: &str = ".copydeck";

/// Config loading errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("failed to read config: {source}")]
    ReadError {
        #[from]
        source: std::io::Error,
    },

    #[error("invalid YAML at line {}: {message}", line.map(|l| l.to_string()).unwrap_or_else(|| "unknown".to_string()))]
    ParseError { line: Option<usize>, message: String },

    #[error("validation error: {message}")]
    ValidationError { message: String },

    #[error("environment variable not found: {var}")]
    EnvVarNotFound { var: String },
}

fn env_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\$\{([^}:]+)(?::-([^}]*))?\}").expect("env var pattern compiles")
    })
}

/// Configuration loader.
pub struct ConfigLoader {
    config_path: PathBuf,
}

impl ConfigLoader {
    /// Create a loader for `.copydeck/config.yaml` under the given project directory.
    pub fn new(project_dir: impl AsRef<Path>) -> Self {
        Self {
            config_path: project_dir.as_ref().join(CONFIG_DIR).join("config.yaml"),
        }
    }

    /// Create a loader for an explicit file path.
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
        }
    }

    /// Path this loader reads from.
    pub fn path(&self) -> &Path {
        &self.config_path
    }

    /// Load configuration, falling back to defaults when the file is absent.
    pub fn load(&self) -> Result<CopydeckConfig, ConfigError> {
        if !self.config_path.exists() {
            return Ok(CopydeckConfig::default());
        }
        self.load_required()
    }

    /// Load configuration, failing when the file is absent.
    pub fn load_required(&self) -> Result<CopydeckConfig, ConfigError> {
        if !self.config_path.exists() {
            return Err(ConfigError::NotFound {
                path: self.config_path.clone(),
            });
        }

        let contents = std::fs::read_to_string(&self.config_path)?;
        let config = Self::parse(&contents)?;
        Ok(config)
    }

    /// Parse and validate configuration text.
    pub fn parse(contents: &str) -> Result<CopydeckConfig, ConfigError> {
        let expanded = expand_env_vars(contents)?;

        let config: CopydeckConfig =
            serde_yaml::from_str(&expanded).map_err(|e| ConfigError::ParseError {
                line: e.location().map(|l| l.line()),
                message: e.to_string(),
            })?;

        validate(&config)?;
        Ok(config)
    }

    /// Save configuration to the loader's path.
    pub fn save(&self, config: &CopydeckConfig) -> Result<(), ConfigError> {
        if let Some(dir) = self.config_path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let yaml = serde_yaml::to_string(config).map_err(|e| ConfigError::ParseError {
            line: None,
            message: e.to_string(),
        })?;

        std::fs::write(&self.config_path, yaml)?;
        Ok(())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new(std::env::current_dir().unwrap_or_default())
    }
}

/// Expand environment variables in the form `${VAR}` or `${VAR:-default}`.
pub fn expand_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = content.to_string();

    for cap in env_pattern().captures_iter(content) {
        let full_match = &cap[0];
        let var_name = &cap[1];
        let default = cap.get(2).map(|m| m.as_str());

        let value = match (std::env::var(var_name), default) {
            (Ok(v), _) => v,
            (Err(_), Some(d)) => d.to_string(),
            (Err(_), None) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                })
            }
        };

        result = result.replace(full_match, &value);
    }

    Ok(result)
}

fn validate(config: &CopydeckConfig) -> Result<(), ConfigError> {
    let invalid = |message: &str| ConfigError::ValidationError {
        message: message.to_string(),
    };

    if config.qa.rate_limit.max_requests == 0 {
        return Err(invalid("qa.rate_limit.max_requests must be greater than 0"));
    }
    if config.qa.rate_limit.window_secs == 0 {
        return Err(invalid("qa.rate_limit.window_secs must be greater than 0"));
    }
    if config.qa.max_tokens_batch == 0 || config.qa.max_tokens_chat == 0 {
        return Err(invalid("qa token budgets must be greater than 0"));
    }
    if config.import.max_files == 0 {
        return Err(invalid("import.max_files must be greater than 0"));
    }
    if let Some(lead) = &config.export.lead_market {
        if lead.trim().is_empty() {
            return Err(invalid("export.lead_market must not be blank"));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PlaceholderPolicy;
    use std::fs;
    use tempfile::tempdir;

    fn write_config(dir: &Path, content: &str) {
        let config_dir = dir.join(CONFIG_DIR);
        fs::create_dir_all(&config_dir).unwrap();
        fs::write(config_dir.join("config.yaml"), content).unwrap();
    }

    #[test]
    fn test_load_defaults_when_no_file() {
        let dir = tempdir().unwrap();
        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(config.import.max_files, 20);
    }

    #[test]
    fn test_load_required_missing_file() {
        let dir = tempdir().unwrap();
        let result = ConfigLoader::new(dir.path()).load_required();
        assert!(matches!(result, Err(ConfigError::NotFound { .. })));
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
export:
  placeholder_policy: missing_and_blank
  lead_market: en-US
qa:
  model: custom-model
  rate_limit:
    max_requests: 3
    window_secs: 60
"#,
        );

        let config = ConfigLoader::new(dir.path()).load().unwrap();
        assert_eq!(
            config.export.placeholder_policy,
            PlaceholderPolicy::MissingAndBlank
        );
        assert_eq!(config.export.lead_market.as_deref(), Some("en-US"));
        assert_eq!(config.qa.model, "custom-model");
        assert_eq!(config.qa.rate_limit.max_requests, 3);
        assert_eq!(config.qa.rate_limit.window_secs, 60);
        assert_eq!(config.qa.max_tokens_batch, 4000);
    }

    #[test]
    fn test_env_var_expansion() {
        std::env::set_var("COPYDECK_TEST_MODEL", "model-from-env");
        let result = expand_env_vars("model: ${COPYDECK_TEST_MODEL}").unwrap();
        assert_eq!(result, "model: model-from-env");
        std::env::remove_var("COPYDECK_TEST_MODEL");
    }

    #[test]
    fn test_env_var_default() {
        let result = expand_env_vars("key: ${COPYDECK_NONEXISTENT:-fallback}").unwrap();
        assert_eq!(result, "key: fallback");
    }

    #[test]
    fn test_env_var_missing_error() {
        match expand_env_vars("key: ${COPYDECK_MISSING_VAR}") {
            Err(ConfigError::EnvVarNotFound { var }) => assert_eq!(var, "COPYDECK_MISSING_VAR"),
            other => panic!("Expected EnvVarNotFound error, got {other:?}"),
        }
    }

    #[test]
    fn test_validation_rejects_zero_window() {
        let result = ConfigLoader::parse("qa:\n  rate_limit:\n    window_secs: 0\n");
        match result {
            Err(ConfigError::ValidationError { message }) => {
                assert!(message.contains("window_secs"))
            }
            other => panic!("Expected ValidationError, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_error_with_line_number() {
        let result = ConfigLoader::parse("export:\n  lead_market: [unclosed\n");
        match result {
            Err(ConfigError::ParseError { line, .. }) => assert!(line.is_some()),
            other => panic!("Expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempdir().unwrap();
        let loader = ConfigLoader::new(dir.path());

        let mut config = crate::CopydeckConfig::default();
        config.export.lead_market = Some("fr-FR".to_string());
        loader.save(&config).unwrap();

        assert!(loader.path().exists());
        let loaded = loader.load().unwrap();
        assert_eq!(loaded.export.lead_market.as_deref(), Some("fr-FR"));
    }
}
