//! Client configuration, loaded from TOML.
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! [service]
//! timeout_seconds = 60
//!
//! [search]
//! indexes = ["2019-51", "2019-47"]
//! worker_count = 4
//! ```

use std::path::PathBuf;

use cdx_search::{IndexId, SearchConfig};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Top-level configuration for the comcrawl client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Where the index service lives and how to reach it.
    pub service: ServiceConfig,
    /// Defaults applied to searches that do not override them.
    pub search: SearchDefaults,
}

/// Index service connection settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Root URL of the index service.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Custom User-Agent. Defaults to `comcrawl/<version>`.
    pub user_agent: Option<String>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        let defaults = SearchConfig::default();
        Self {
            base_url: defaults.base_url,
            timeout_seconds: defaults.timeout_seconds,
            user_agent: defaults.user_agent,
        }
    }
}

/// Search defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchDefaults {
    /// Indexes searched when a search names none. Empty means every index
    /// the service lists.
    pub indexes: Vec<IndexId>,
    /// Worker pool size. `None` or `0` searches indexes one at a time.
    pub worker_count: Option<usize>,
}

impl ClientConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &std::path::Path) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ClientError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load from `path` if given, else from [`Self::default_config_path`]
    /// if that file exists, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if a selected file cannot be read or parsed.
    pub fn load(path: Option<&std::path::Path>) -> crate::error::Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Returns the default config file path: `<config dir>/comcrawl/config.toml`.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("comcrawl")
            .join("config.toml")
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Config`] for an invalid service section.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.to_search_config()
            .validate()
            .map_err(|e| ClientError::Config(e.to_string()))
    }

    /// Service settings in the form the search library takes.
    pub fn to_search_config(&self) -> SearchConfig {
        SearchConfig {
            base_url: self.service.base_url.clone(),
            timeout_seconds: self.service.timeout_seconds,
            user_agent: self.service.user_agent.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_library_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.service.base_url, "https://index.commoncrawl.org");
        assert_eq!(config.service.timeout_seconds, 30);
        assert!(config.search.indexes.is_empty());
        assert!(config.search.worker_count.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: ClientConfig = toml::from_str(
            r#"
            [search]
            indexes = ["2019-51", "CC-MAIN-2019-47"]
            worker_count = 4
            "#,
        )
        .expect("parse");
        assert_eq!(config.service, ServiceConfig::default());
        let ids: Vec<&str> = config.search.indexes.iter().map(IndexId::as_str).collect();
        assert_eq!(ids, vec!["2019-51", "2019-47"]);
        assert_eq!(config.search.worker_count, Some(4));
    }

    #[test]
    fn empty_index_in_toml_rejected() {
        let result: Result<ClientConfig, _> = toml::from_str(
            r#"
            [search]
            indexes = [""]
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn zero_workers_is_valid() {
        let mut config = ClientConfig::default();
        config.search.worker_count = Some(0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_timeout_rejected() {
        let mut config = ClientConfig::default();
        config.service.timeout_seconds = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn from_file_nonexistent_returns_error() {
        let result = ClientConfig::from_file(std::path::Path::new("/nonexistent/path/config.toml"));
        assert!(matches!(result, Err(ClientError::Io(_))));
    }

    #[test]
    fn from_file_invalid_toml_returns_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "this is not valid toml {{{").expect("write");

        let result = ClientConfig::from_file(&path);
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn save_and_reload_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ClientConfig::default();
        config.service.user_agent = Some("ResearchBot/1.0".into());
        config.search.indexes = vec![IndexId::new("2020-05").expect("id")];
        config.search.worker_count = Some(2);
        config.save_to_file(&path).expect("save");

        let loaded = ClientConfig::load(Some(&path)).expect("load");
        assert_eq!(loaded, config);
    }

    #[test]
    fn to_search_config_copies_service_section() {
        let mut config = ClientConfig::default();
        config.service.base_url = "http://127.0.0.1:9000".into();
        config.service.timeout_seconds = 3;
        let search = config.to_search_config();
        assert_eq!(search.base_url, "http://127.0.0.1:9000");
        assert_eq!(search.timeout_seconds, 3);
    }

    #[test]
    fn default_config_path_ends_with_comcrawl() {
        let path = ClientConfig::default_config_path();
        assert!(path.ends_with("comcrawl/config.toml"));
    }
}
