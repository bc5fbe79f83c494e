use super::{FsConfig, LogFormat, RuntimeConfig, S3Config, StorageBackend};
use anyhow::{anyhow, Context, Result};

pub const ENV_PREFIX: &str = "HEALTHFLOW_";

/// Abstraction over environment-variable lookups so tests and embedders can
/// supply their own source of overrides.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Get an environment variable WITHOUT the HEALTHFLOW_ prefix
    /// Used for shared variables (BRONZE_BUCKET, AWS_REGION, etc.)
    fn get_raw(&self, key: &str) -> Option<String>;
}

/// Apply environment-variable overrides (highest priority) to the runtime config.
pub fn apply_env_overrides<E: EnvSource>(config: &mut RuntimeConfig, env: &E) -> Result<()> {
    // Generator
    if let Some(val) = get_env_u64(env, "SEED")? {
        config.generator.seed = val;
    }
    if let Some(val) = get_env_usize(env, "RECORDS_PER_RUN")? {
        config.generator.records_per_run = val;
    }

    // Bronze layer
    if let Some(path) = get_env_string(env, "GENERATED_PATH") {
        config.bronze.generated_path = path;
    }
    if let Some(path) = get_env_string(env, "PARTITIONED_PATH") {
        config.bronze.partitioned_path = path;
    }

    // Logging
    if let Some(level) = get_env_string(env, "LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(format) = get_env_string(env, "LOG_FORMAT") {
        config.logging.format = match format.to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        };
    }
    if let Some(val) = get_env_bool(env, "QUIET")? {
        config.logging.quiet = val;
    }

    // Remote backend
    if let Some(backend) = get_env_string(env, "REMOTE_BACKEND") {
        config.remote.backend = backend
            .parse::<StorageBackend>()
            .context("Invalid HEALTHFLOW_REMOTE_BACKEND value")?;
    }
    if let Some(namespace) = get_env_string(env, "REMOTE_NAMESPACE") {
        config.remote.namespace = namespace;
    }
    if let Some(val) = get_env_u64(env, "REMOTE_TIMEOUT_SECS")? {
        config.remote.timeout_secs = if val == 0 { None } else { Some(val) };
    }

    // Filesystem remote
    if let Some(path) = get_env_string(env, "FS_PATH") {
        config.remote.fs.get_or_insert_with(FsConfig::default).path = path;
    }

    // S3 remote; the bare BRONZE_BUCKET name is accepted for compatibility
    // with existing .env files, the prefixed form wins when both are set.
    if let Some(bucket) = env.get_raw("BRONZE_BUCKET") {
        ensure_s3(config).bucket = bucket;
    }
    if let Some(bucket) = get_env_string(env, "S3_BUCKET") {
        ensure_s3(config).bucket = bucket;
    }
    if let Some(region) = env.get_raw("AWS_REGION") {
        ensure_s3(config).region = region;
    }
    if let Some(region) = get_env_string(env, "S3_REGION") {
        ensure_s3(config).region = region;
    }
    if let Some(endpoint) = env.get_raw("AWS_ENDPOINT_URL") {
        ensure_s3(config).endpoint = Some(endpoint);
    }
    if let Some(endpoint) = get_env_string(env, "S3_ENDPOINT") {
        ensure_s3(config).endpoint = Some(endpoint);
    }

    Ok(())
}

fn ensure_s3(config: &mut RuntimeConfig) -> &mut S3Config {
    config.remote.s3.get_or_insert_with(S3Config::default)
}

fn get_env_string<E: EnvSource>(env: &E, key: &str) -> Option<String> {
    env.get(key).filter(|val| !val.is_empty())
}

fn get_env_usize<E: EnvSource>(env: &E, key: &str) -> Result<Option<usize>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<usize>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_u64<E: EnvSource>(env: &E, key: &str) -> Result<Option<u64>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = val
                .parse::<u64>()
                .map_err(|e| anyhow!("Failed to parse {}{}: {}", ENV_PREFIX, key, e))?;
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

fn get_env_bool<E: EnvSource>(env: &E, key: &str) -> Result<Option<bool>> {
    match get_env_string(env, key) {
        Some(val) => {
            let parsed = match val.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(anyhow!(
                        "Failed to parse {}{} (expected bool): {}",
                        ENV_PREFIX,
                        key,
                        val
                    ))
                }
            };
            Ok(Some(parsed))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MapEnv {
        prefixed: HashMap<String, String>,
        raw: HashMap<String, String>,
    }

    impl MapEnv {
        fn with(mut self, key: &str, val: &str) -> Self {
            self.prefixed.insert(key.to_string(), val.to_string());
            self
        }

        fn with_raw(mut self, key: &str, val: &str) -> Self {
            self.raw.insert(key.to_string(), val.to_string());
            self
        }
    }

    impl EnvSource for MapEnv {
        fn get(&self, key: &str) -> Option<String> {
            self.prefixed.get(key).cloned()
        }

        fn get_raw(&self, key: &str) -> Option<String> {
            self.raw.get(key).cloned()
        }
    }

    #[test]
    fn overrides_generator_and_logging() {
        let env = MapEnv::default()
            .with("SEED", "7")
            .with("RECORDS_PER_RUN", "25")
            .with("LOG_FORMAT", "JSON")
            .with("QUIET", "yes");
        let mut config = RuntimeConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();

        assert_eq!(config.generator.seed, 7);
        assert_eq!(config.generator.records_per_run, 25);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert!(config.logging.quiet);
    }

    #[test]
    fn prefixed_bucket_wins_over_bronze_bucket() {
        let env = MapEnv::default()
            .with_raw("BRONZE_BUCKET", "legacy-bucket")
            .with_raw("AWS_REGION", "eu-west-1");
        let mut config = RuntimeConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();
        let s3 = config.remote.s3.as_ref().unwrap();
        assert_eq!(s3.bucket, "legacy-bucket");
        assert_eq!(s3.region, "eu-west-1");

        let env = env.with("S3_BUCKET", "new-bucket");
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.remote.s3.unwrap().bucket, "new-bucket");
    }

    #[test]
    fn zero_timeout_disables_timeout() {
        let env = MapEnv::default().with("REMOTE_TIMEOUT_SECS", "0");
        let mut config = RuntimeConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.remote.timeout_secs, None);
    }

    #[test]
    fn malformed_numbers_are_rejected() {
        let env = MapEnv::default().with("SEED", "forty-two");
        let mut config = RuntimeConfig::default();
        let err = apply_env_overrides(&mut config, &env).unwrap_err();
        assert!(err.to_string().contains("HEALTHFLOW_SEED"));
    }

    #[test]
    fn fs_path_creates_fs_section() {
        let env = MapEnv::default()
            .with("REMOTE_BACKEND", "fs")
            .with("FS_PATH", "/mnt/lake");
        let mut config = RuntimeConfig::default();
        apply_env_overrides(&mut config, &env).unwrap();
        assert_eq!(config.remote.backend, StorageBackend::Fs);
        assert_eq!(config.remote.fs.unwrap().path, "/mnt/lake");
    }
}
