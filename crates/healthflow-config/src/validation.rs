// Configuration validation
//
// Validates that required fields are present and values are sensible

use crate::*;
use anyhow::{bail, Result};

const LARGE_RUN_RECORDS: usize = 100_000;

pub fn validate_config(config: &RuntimeConfig) -> Result<()> {
    validate_generator_config(&config.generator)?;
    validate_bronze_config(&config.bronze)?;
    validate_logging_config(&config.logging)?;
    Ok(())
}

fn validate_generator_config(config: &GeneratorConfig) -> Result<()> {
    if config.records_per_run == 0 {
        bail!("generator.records_per_run must be greater than 0");
    }

    Ok(())
}

/// Settings that are valid but likely unintended. Returned rather than
/// logged so callers can report them once tracing is installed.
pub fn config_warnings(config: &RuntimeConfig) -> Vec<String> {
    let mut warnings = Vec::new();

    if config.generator.records_per_run > LARGE_RUN_RECORDS {
        warnings.push(format!(
            "generator.records_per_run = {} is very large for a single-date partition",
            config.generator.records_per_run
        ));
    }

    warnings
}

fn validate_bronze_config(config: &BronzeConfig) -> Result<()> {
    if config.generated_path.is_empty() {
        bail!("bronze.generated_path must not be empty");
    }

    if config.partitioned_path.is_empty() {
        bail!("bronze.partitioned_path must not be empty");
    }

    Ok(())
}

fn validate_logging_config(config: &LoggingConfig) -> Result<()> {
    if config.level.trim().is_empty() {
        bail!("logging.level must not be empty");
    }

    Ok(())
}

pub fn validate_remote_config(config: &RemoteConfig) -> Result<()> {
    if config.namespace.trim_matches('/').is_empty() {
        bail!("remote.namespace must not be empty");
    }

    match config.backend {
        StorageBackend::Fs => {
            let fs = config.fs.as_ref().ok_or_else(|| {
                anyhow::anyhow!("fs remote backend requires 'remote.fs' configuration")
            })?;

            if fs.path.is_empty() {
                bail!(
                    "Filesystem remote path is required\n\n\
                    How to fix:\n\
                      • Environment: export {}FS_PATH=/data/remote\n\
                      • TOML: [remote.fs]\n              path = \"/data/remote\"\n",
                    ENV_PREFIX
                );
            }
        }
        StorageBackend::S3 => {
            let s3 = config.s3.as_ref().ok_or_else(|| {
                anyhow::anyhow!("s3 remote backend requires 'remote.s3' configuration")
            })?;

            if s3.bucket.is_empty() {
                bail!(
                    "S3 bucket name is required\n\n\
                    How to fix:\n\
                      • Environment: export {}S3_BUCKET=my-bucket (or BRONZE_BUCKET=my-bucket)\n\
                      • TOML: [remote.s3]\n              bucket = \"my-bucket\"\n",
                    ENV_PREFIX
                );
            }

            if s3.region.is_empty() {
                bail!(
                    "S3 region is required\n\n\
                    How to fix:\n\
                      • Environment: export {}S3_REGION=us-east-1\n\
                      • TOML: [remote.s3]\n              region = \"us-east-1\"\n",
                    ENV_PREFIX
                );
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_generator_config() {
        let valid = GeneratorConfig {
            seed: 1,
            records_per_run: 10,
        };
        assert!(validate_generator_config(&valid).is_ok());

        let invalid = GeneratorConfig {
            seed: 1,
            records_per_run: 0,
        };
        assert!(validate_generator_config(&invalid).is_err());
    }

    #[test]
    fn test_validate_remote_config() {
        // Default S3 config has no bucket
        let mut remote = RemoteConfig::default();
        let err = validate_remote_config(&remote).unwrap_err();
        assert!(err.to_string().contains("S3 bucket name is required"));

        remote.s3.as_mut().unwrap().bucket = "bronze".to_string();
        assert!(validate_remote_config(&remote).is_ok());

        // Zero disables the timeout rather than failing validation
        remote.timeout_secs = Some(0);
        assert!(validate_remote_config(&remote).is_ok());
        assert_eq!(remote.timeout(), None);

        // Fs backend without fs section
        let fs_remote = RemoteConfig {
            backend: StorageBackend::Fs,
            fs: None,
            ..RemoteConfig::default()
        };
        assert!(validate_remote_config(&fs_remote).is_err());
    }

    #[test]
    fn test_remote_not_checked_at_load() {
        // Generation-only runs must not need a bucket
        assert!(validate_config(&RuntimeConfig::default()).is_ok());
    }

    #[test]
    fn test_large_run_is_a_warning_not_an_error() {
        let mut config = RuntimeConfig::default();
        assert!(config_warnings(&config).is_empty());

        config.generator.records_per_run = 100_001;
        assert!(validate_config(&config).is_ok());
        let warnings = config_warnings(&config);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("records_per_run = 100001"));
    }
}
