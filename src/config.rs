use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Result};
use serde::Deserialize;

use crate::storage::mongo::{DEFAULT_COLLECTION, DEFAULT_DATABASE};
use crate::storage::StorageConfig;
use crate::swapi::DEFAULT_BASE_URL;

/// Environment variable naming the document-store connection URL
pub const MONGO_URL_ENV: &str = "MONGO_URL";

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageSection,
    pub swapi: SwapiSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    pub fn load() -> Result<Self> {
        let config_path =
            env::var("PLANETARY_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
        Self::load_from(Path::new(&config_path))
    }

    /// Load configuration from the given file (skipped when absent) and environment.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let mut builder = config::Config::builder();

        if config_path.exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("PLANETARY")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if let Ok(url) = env::var(MONGO_URL_ENV) {
            if !url.trim().is_empty() {
                config.storage.mongo.url = url;
            }
        }

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        Ok(config)
    }

    /// Resolve and validate the storage backend configuration.
    pub fn storage_runtime(&self) -> Result<StorageConfig> {
        self.storage.to_runtime()
    }

    /// Check the settings that have no usable fallback.
    pub fn validate(&self) -> Result<()> {
        self.storage.to_runtime()?;

        if self.server.request_timeout_secs == 0 {
            bail!("server.request_timeout_secs must be greater than zero");
        }
        if self.swapi.timeout_secs == 0 {
            bail!("swapi.timeout_secs must be greater than zero");
        }
        if self.swapi.base_url.trim().is_empty() {
            bail!("swapi.base_url must be specified");
        }
        if self.swapi.timeout_secs >= self.server.request_timeout_secs {
            tracing::warn!(
                swapi_timeout_secs = self.swapi.timeout_secs,
                request_timeout_secs = self.server.request_timeout_secs,
                "Film lookup timeout is not shorter than the request timeout"
            );
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct StorageSection {
    pub backend: StorageBackendKind,
    pub mongo: MongoSection,
}

impl StorageSection {
    pub fn to_runtime(&self) -> Result<StorageConfig> {
        match self.backend {
            StorageBackendKind::Mongo => {
                if self.mongo.url.trim().is_empty() {
                    bail!(
                        "storage.mongo.url must be specified (or set {})",
                        MONGO_URL_ENV
                    );
                }
                if self.mongo.database.trim().is_empty() {
                    bail!("storage.mongo.database must be specified");
                }
                if self.mongo.collection.trim().is_empty() {
                    bail!("storage.mongo.collection must be specified");
                }

                Ok(StorageConfig::Mongo {
                    url: self.mongo.url.clone(),
                    database: self.mongo.database.clone(),
                    collection: self.mongo.collection.clone(),
                })
            }
            StorageBackendKind::Memory => Ok(StorageConfig::Memory),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    #[default]
    Mongo,
    Memory,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MongoSection {
    pub url: String,
    pub database: String,
    pub collection: String,
}

impl Default for MongoSection {
    fn default() -> Self {
        Self {
            url: String::new(),
            database: DEFAULT_DATABASE.to_string(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SwapiSection {
    pub base_url: String,
    pub timeout_secs: u64,
    pub on_failure: FilmLookupPolicy,
}

impl SwapiSection {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for SwapiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 10,
            on_failure: FilmLookupPolicy::Degrade,
        }
    }
}

/// What planet creation does when the film lookup fails
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FilmLookupPolicy {
    /// Log the failure and store the planet with a film count of zero
    #[default]
    Degrade,
    /// Refuse to create the planet
    Reject,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Json,
    Text,
}
