//! Configuration types for Copydeck.
//!
//! This crate provides the configuration used by Copydeck for
//! `.copydeck/config.yaml` files.

pub mod env;
pub mod loader;
pub mod types;

pub use env::*;
pub use loader::*;
pub use types::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_sensible_values() {
        let config = CopydeckConfig::default();

        assert!(config.catalog.deliverables.is_none());
        assert!(config.catalog.synonyms.is_none());

        assert_eq!(config.export.placeholder_policy, PlaceholderPolicy::MissingOnly);
        assert!(config.export.lead_market.is_none());
        assert_eq!(config.export.template_version, "1.0");

        assert_eq!(config.import.max_files, 20);
        assert_eq!(config.import.max_file_size_mb, 10);

        assert_eq!(config.qa.max_tokens_batch, 4000);
        assert_eq!(config.qa.max_tokens_chat, 2000);
        assert_eq!(config.qa.rate_limit.max_requests, 20);
        assert_eq!(config.qa.rate_limit.window_secs, 3600);
    }

    #[test]
    fn test_config_serializes_to_yaml() {
        let yaml = serde_yaml::to_string(&CopydeckConfig::default()).unwrap();

        assert!(yaml.contains("export:"));
        assert!(yaml.contains("placeholder_policy: missing_only"));
        assert!(yaml.contains("qa:"));
        assert!(yaml.contains("window_secs: 3600"));
    }

    #[test]
    fn test_partial_configs_merge_with_defaults() {
        let partial_yaml = r#"
export:
  placeholder_policy: missing_and_blank
qa:
  rate_limit:
    max_requests: 5
"#;

        let config: CopydeckConfig = serde_yaml::from_str(partial_yaml).unwrap();

        assert_eq!(
            config.export.placeholder_policy,
            PlaceholderPolicy::MissingAndBlank
        );
        assert_eq!(config.qa.rate_limit.max_requests, 5);
        assert_eq!(config.qa.rate_limit.window_secs, 3600);
        assert_eq!(config.import.max_files, 20);
    }
}
