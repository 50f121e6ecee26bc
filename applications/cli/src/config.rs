/// Command line configuration
use anyhow::{bail, Context, Result};
use gramophone_storage::PoolSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Config file read when no `--config` is given; missing is fine
pub const DEFAULT_CONFIG_FILE: &str = "gramophone.toml";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct GramophoneConfig {
    #[serde(default)]
    pub database: PoolSettings,

    #[serde(default)]
    pub lastfm: LastFmSettings,

    #[serde(default)]
    pub log: LogSettings,
}

/// Credentials for the Last.fm API
///
/// Either field may be left out; the `lastfm_api_key` and `lastfm_secret`
/// settings stored in the database are used instead.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LastFmSettings {
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default)]
    pub secret: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "gramophone=info,gramophone_storage=info,gramophone_lastfm=info".to_string()
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl GramophoneConfig {
    /// Load configuration from file and environment
    ///
    /// An explicit `path` must exist. Without one, `gramophone.toml` in the
    /// working directory is read if present. `GRAMOPHONE_` variables override
    /// file values, with `__` between nested keys
    /// (`GRAMOPHONE_DATABASE__MAX_CONNECTIONS=10`).
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = config::Config::builder();

        settings = match path {
            Some(path) => settings.add_source(config::File::from(path).required(true)),
            None => settings.add_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false)),
        };

        settings = settings.add_source(
            config::Environment::with_prefix("GRAMOPHONE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = settings.build().context("failed to read configuration")?;

        config
            .try_deserialize()
            .context("failed to parse configuration")
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.database.url.trim().is_empty() {
            bail!("database.url must not be empty (set GRAMOPHONE_DATABASE__URL)");
        }

        if self.database.max_connections == 0 {
            bail!("database.max_connections must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_are_valid() {
        let config = GramophoneConfig::default();
        assert_eq!(config.database.url, "sqlite://./data/gramophone.db");
        assert_eq!(config.database.max_connections, 5);
        assert!(config.lastfm.api_key.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_fill_sections() {
        let file = write_config(
            r#"
[database]
url = "sqlite://./library.db"

[lastfm]
api_key = "apiKey1"
secret = "secret1"

[log]
level = "debug"
"#,
        );

        let config = GramophoneConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.database.url, "sqlite://./library.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.lastfm.api_key.as_deref(), Some("apiKey1"));
        assert_eq!(config.lastfm.secret.as_deref(), Some("secret1"));
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = GramophoneConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn zero_connections_rejected() {
        let file = write_config("[database]\nmax_connections = 0\n");

        let config = GramophoneConfig::load(Some(file.path())).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_connections"));
    }

    #[test]
    fn empty_url_rejected() {
        let mut config = GramophoneConfig::default();
        config.database.url = String::new();
        assert!(config.validate().is_err());
    }
}
