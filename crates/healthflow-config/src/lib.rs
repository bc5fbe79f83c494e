// healthflow-config - Runtime configuration for generation and sync
//
// Supports configuration from multiple sources:
// 1. Environment variables (highest priority)
// 2. Config file path from HEALTHFLOW_CONFIG env var
// 3. Config file contents from HEALTHFLOW_CONFIG_CONTENT env var
// 4. Default config file locations (./healthflow.toml, ./.healthflow.toml)
// 5. Built-in defaults (lowest priority)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

mod env_overrides;
mod sources;
mod validation;

pub use env_overrides::{EnvSource, ENV_PREFIX};

/// Main runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub bronze: BronzeConfig,

    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Synthetic event generation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub seed: u64,
    /// Records produced by one incremental (single-date) run
    pub records_per_run: usize,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            records_per_run: 200,
        }
    }
}

/// Local bronze layer roots
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BronzeConfig {
    /// Root for bulk backfill output
    pub generated_path: String,
    /// Root for incremental single-date output
    pub partitioned_path: String,
}

impl Default for BronzeConfig {
    fn default() -> Self {
        Self {
            generated_path: "data/generated".to_string(),
            partitioned_path: "data/partitioned".to_string(),
        }
    }
}

/// Remote object store configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteConfig {
    pub backend: StorageBackend,

    /// Key prefix every uploaded partition lands under
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Per-operation timeout; 0 disables it and calls may block indefinitely
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fs: Option<FsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Config>,
}

fn default_namespace() -> String {
    "appointments".to_string()
}

fn default_timeout_secs() -> Option<u64> {
    Some(60)
}

fn default_region() -> String {
    "us-east-1".to_string()
}

impl RemoteConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// Human-readable destination, e.g. `s3://bucket/appointments/`
    pub fn destination(&self) -> String {
        let namespace = self.namespace.trim_end_matches('/');
        match self.backend {
            StorageBackend::S3 => {
                let bucket = self.s3.as_ref().map(|s3| s3.bucket.as_str()).unwrap_or("");
                format!("s3://{}/{}/", bucket, namespace)
            }
            StorageBackend::Fs => {
                let path = self.fs.as_ref().map(|fs| fs.path.as_str()).unwrap_or("");
                format!("{}/{}/", path.trim_end_matches('/'), namespace)
            }
        }
    }

    /// Validate the remote section. Called when a store is built, so that
    /// generation-only runs do not need a bucket.
    pub fn validate(&self) -> Result<()> {
        validation::validate_remote_config(self)
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::S3,
            namespace: default_namespace(),
            timeout_secs: default_timeout_secs(),
            fs: None,
            s3: Some(S3Config::default()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Fs,
    S3,
}

impl std::fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackend::Fs => write!(f, "fs"),
            StorageBackend::S3 => write!(f, "s3"),
        }
    }
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "fs" | "filesystem" => Ok(StorageBackend::Fs),
            "s3" | "aws" => Ok(StorageBackend::S3),
            _ => anyhow::bail!("Unsupported storage backend: {}. Supported: fs, s3", s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FsConfig {
    pub path: String,
}

impl Default for FsConfig {
    fn default() -> Self {
        Self {
            path: "./data/remote".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Config {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            bucket: String::new(),
            region: default_region(),
            endpoint: None,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Silence per-operation storage lines; return values are unaffected
    pub quiet: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
            quiet: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

impl RuntimeConfig {
    /// Load configuration from all sources with priority
    pub fn load() -> Result<Self> {
        sources::load_config()
    }

    /// Load configuration from a specific file path (for CLI usage).
    pub fn load_from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        sources::load_from_file_path(path)
    }

    /// Build a configuration from inline TOML plus overrides supplied by an
    /// `EnvSource`. Used by tests and embedders that do not want the
    /// process environment consulted.
    pub fn load_with_env<E: EnvSource>(inline_config: Option<&str>, env: &E) -> Result<Self> {
        let mut config = RuntimeConfig::default();

        if let Some(inline) = inline_config {
            let file_config: RuntimeConfig =
                toml::from_str(inline).context("Failed to parse inline config content")?;
            config.merge(file_config);
        }

        config.apply_env_overrides_from(env)?;
        config.validate()?;
        Ok(config)
    }

    /// Merge another config into this one (used for TOML layering).
    pub fn merge(&mut self, other: RuntimeConfig) {
        self.generator = other.generator;
        self.bronze = other.bronze;
        self.remote = other.remote;
        self.logging = other.logging;
    }

    /// Apply environment overrides from a custom source.
    pub fn apply_env_overrides_from<E: EnvSource>(&mut self, env: &E) -> Result<()> {
        env_overrides::apply_env_overrides(self, env)
    }

    /// Validate everything needed to generate and write partitions
    pub fn validate(&self) -> Result<()> {
        validation::validate_config(self)
    }

    /// Non-fatal findings to log once tracing is up
    pub fn warnings(&self) -> Vec<String> {
        validation::config_warnings(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_backend_from_str() {
        assert_eq!("fs".parse::<StorageBackend>().unwrap(), StorageBackend::Fs);
        assert_eq!("s3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "filesystem".parse::<StorageBackend>().unwrap(),
            StorageBackend::Fs
        );
        assert_eq!("aws".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert!("gcs".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_default_configs() {
        let config = RuntimeConfig::default();
        assert_eq!(config.generator.seed, 42);
        assert_eq!(config.generator.records_per_run, 200);
        assert_eq!(config.bronze.generated_path, "data/generated");
        assert_eq!(config.remote.namespace, "appointments");
        assert_eq!(config.remote.backend, StorageBackend::S3);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert!(!config.logging.quiet);
    }

    #[test]
    fn test_destination_rendering() {
        let mut remote = RemoteConfig::default();
        remote.s3.as_mut().unwrap().bucket = "bronze".to_string();
        assert_eq!(remote.destination(), "s3://bronze/appointments/");

        remote.backend = StorageBackend::Fs;
        remote.fs = Some(FsConfig {
            path: "/tmp/remote/".to_string(),
        });
        assert_eq!(remote.destination(), "/tmp/remote/appointments/");
    }

    #[test]
    fn test_toml_sections_parse() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [generator]
            seed = 7
            records_per_run = 50

            [remote]
            backend = "fs"
            namespace = "bronze/appointments"

            [remote.fs]
            path = "/srv/lake"

            [logging]
            level = "debug"
            format = "json"
            quiet = true
            "#,
        )
        .unwrap();

        assert_eq!(config.generator.seed, 7);
        assert_eq!(config.bronze.partitioned_path, "data/partitioned");
        assert_eq!(config.remote.backend, StorageBackend::Fs);
        assert_eq!(config.remote.timeout_secs, Some(60));
        assert_eq!(config.remote.fs.unwrap().path, "/srv/lake");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.quiet);
    }

    #[test]
    fn test_remote_table_keeps_default_timeout() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [remote]
            backend = "s3"

            [remote.s3]
            bucket = "b"
            region = "us-east-1"
            "#,
        )
        .unwrap();

        assert_eq!(config.remote.timeout_secs, Some(60));
        assert_eq!(config.remote.timeout(), Some(Duration::from_secs(60)));
        assert_eq!(
            config.remote.timeout_secs,
            RuntimeConfig::default().remote.timeout_secs
        );
    }

    #[test]
    fn test_zero_timeout_in_toml_disables_timeout() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [remote]
            backend = "fs"
            timeout_secs = 0

            [remote.fs]
            path = "/srv/lake"
            "#,
        )
        .unwrap();

        assert_eq!(config.remote.timeout(), None);
        assert!(config.remote.validate().is_ok());
    }

    #[test]
    fn test_s3_region_defaults_when_omitted() {
        let config: RuntimeConfig = toml::from_str(
            r#"
            [remote]
            backend = "s3"

            [remote.s3]
            bucket = "b"
            "#,
        )
        .unwrap();

        let s3 = config.remote.s3.unwrap();
        assert_eq!(s3.bucket, "b");
        assert_eq!(s3.region, "us-east-1");
    }
}
