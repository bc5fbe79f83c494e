// Remote object store backed by OpenDAL
//
// One operator per run, addressed by a label for logs (s3://bucket or a
// filesystem root) and a namespace every partition key is prefixed with.

use crate::error::{Result, StorageError};
use healthflow_config::{RemoteConfig, StorageBackend};
use metrics::counter;
use opendal::layers::TimeoutLayer;
use opendal::{ErrorKind, Operator};
use std::path::Path;
use tracing::{debug, error, info, warn};

/// Observed state of a remote object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
    /// Credentials cannot see the object; it may or may not exist
    Denied,
    /// The check itself failed (network, timeout, ...)
    Unknown,
}

impl Presence {
    /// Classify a failed `stat`.
    pub fn from_error(err: &opendal::Error) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Presence::Absent,
            ErrorKind::PermissionDenied => Presence::Denied,
            _ => Presence::Unknown,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Presence::Present)
    }

    /// Metric label value
    pub fn as_str(&self) -> &'static str {
        match self {
            Presence::Present => "present",
            Presence::Absent => "absent",
            Presence::Denied => "denied",
            Presence::Unknown => "error",
        }
    }
}

#[derive(Clone, Debug)]
pub struct RemoteStore {
    op: Operator,
    label: String,
    namespace: String,
}

impl RemoteStore {
    pub const DEFAULT_NAMESPACE: &'static str = "appointments";

    pub fn new(op: Operator, label: impl Into<String>) -> Self {
        Self {
            op,
            label: label.into(),
            namespace: Self::DEFAULT_NAMESPACE.to_string(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into().trim_matches('/').to_string();
        self
    }

    /// Build a store from the `[remote]` section.
    pub fn from_config(config: &RemoteConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| StorageError::invalid_config(format!("{:#}", e)))?;

        let (op, label) = match config.backend {
            StorageBackend::Fs => {
                let fs = config
                    .fs
                    .as_ref()
                    .ok_or_else(|| StorageError::invalid_config("fs config required for filesystem backend"))?;
                info!("Using filesystem remote at: {}", fs.path);

                let fs_builder = opendal::services::Fs::default().root(&fs.path);
                let op = Operator::new(fs_builder)
                    .map_err(|e| StorageError::invalid_config(e.to_string()))?
                    .finish();
                (op, fs.path.clone())
            }
            StorageBackend::S3 => {
                let s3 = config
                    .s3
                    .as_ref()
                    .ok_or_else(|| StorageError::invalid_config("s3 config required for S3 backend"))?;
                info!(
                    "Using S3 remote: bucket={}, region={}",
                    s3.bucket, s3.region
                );

                let mut s3_builder = opendal::services::S3::default()
                    .bucket(&s3.bucket)
                    .region(&s3.region);

                if let Some(endpoint) = &s3.endpoint {
                    s3_builder = s3_builder.endpoint(endpoint);
                }

                let op = Operator::new(s3_builder)
                    .map_err(|e| StorageError::invalid_config(e.to_string()))?
                    .finish();
                (op, format!("s3://{}", s3.bucket))
            }
        };

        let op = match config.timeout() {
            Some(timeout) => {
                debug!(timeout_secs = timeout.as_secs(), "Applying per-operation timeout");
                op.layer(TimeoutLayer::new().with_timeout(timeout))
            }
            None => op,
        };

        Ok(Self::new(op, label).with_namespace(config.namespace.clone()))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn operator(&self) -> &Operator {
        &self.op
    }

    /// Check an object without collapsing denial or failure into absence.
    pub async fn presence(&self, key: &str) -> Presence {
        let presence = match self.op.stat(key).await {
            Ok(_) => {
                info!(store = %self.label, key, "Object exists");
                Presence::Present
            }
            Err(err) => {
                let presence = Presence::from_error(&err);
                match presence {
                    Presence::Absent => debug!(store = %self.label, key, "Object not found"),
                    Presence::Denied => warn!(
                        store = %self.label,
                        key,
                        error = %err,
                        "Access denied while checking object; treating as absent"
                    ),
                    _ => error!(
                        store = %self.label,
                        key,
                        error = %err,
                        "Existence check failed; treating as absent"
                    ),
                }
                presence
            }
        };

        counter!("healthflow.storage.exists", "outcome" => presence.as_str()).increment(1);
        presence
    }

    /// `true` only when the object is known to exist.
    pub async fn exists(&self, key: &str) -> bool {
        self.presence(key).await.is_present()
    }

    /// Upload a local file, replacing any existing object. Returns bytes written.
    pub async fn upload(&self, local_path: impl AsRef<Path>, key: &str) -> Result<u64> {
        let local_path = local_path.as_ref();
        let data = tokio::fs::read(local_path)
            .await
            .map_err(|e| StorageError::local_io(local_path, e))?;
        let bytes = data.len() as u64;

        self.op
            .write(key, data)
            .await
            .map_err(|e| StorageError::from_opendal("write", key, e))?;

        info!(
            store = %self.label,
            key,
            bytes,
            "Uploaded {}",
            local_path.display()
        );
        counter!("healthflow.storage.uploaded_bytes").increment(bytes);
        Ok(bytes)
    }

    /// Download an object to a local file, creating parent directories.
    pub async fn download(&self, key: &str, local_path: impl AsRef<Path>) -> Result<u64> {
        let local_path = local_path.as_ref();
        let data = self
            .op
            .read(key)
            .await
            .map_err(|e| StorageError::from_opendal("read", key, e))?
            .to_vec();

        if let Some(parent) = local_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StorageError::local_io(parent, e))?;
        }
        tokio::fs::write(local_path, &data)
            .await
            .map_err(|e| StorageError::local_io(local_path, e))?;

        let bytes = data.len() as u64;
        info!(
            store = %self.label,
            key,
            bytes,
            "Downloaded to {}",
            local_path.display()
        );
        Ok(bytes)
    }

    /// Every object key under `prefix`, sorted.
    ///
    /// A prefix ending in `/` is treated as a directory; otherwise keys are
    /// matched by plain string prefix.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let prefix = prefix.trim_start_matches('/');
        let (dir, filter) = if prefix.is_empty() {
            ("/", None)
        } else if prefix.ends_with('/') {
            (prefix, None)
        } else {
            match prefix.rfind('/') {
                Some(idx) => (&prefix[..=idx], Some(prefix)),
                None => ("/", Some(prefix)),
            }
        };

        let entries = match self.op.list_with(dir).recursive(true).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => return Err(StorageError::from_opendal("list", prefix, e)),
        };

        let mut keys: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.metadata().mode().is_file())
            .map(|entry| entry.path().trim_start_matches('/').to_string())
            .filter(|key| filter.map_or(true, |f| key.starts_with(f)))
            .collect();
        keys.sort();

        info!(
            store = %self.label,
            prefix,
            objects = keys.len(),
            "Listed objects"
        );
        Ok(keys)
    }

    /// Delete an object. Deleting an absent key succeeds.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.op
            .delete(key)
            .await
            .map_err(|e| StorageError::from_opendal("delete", key, e))?;

        info!(store = %self.label, key, "Deleted object");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opendal::services;

    fn memory_store() -> RemoteStore {
        let op = Operator::new(services::Memory::default()).unwrap().finish();
        RemoteStore::new(op, "memory")
    }

    #[test]
    fn test_presence_classification() {
        let denied = opendal::Error::new(ErrorKind::PermissionDenied, "403 Forbidden");
        assert_eq!(Presence::from_error(&denied), Presence::Denied);
        assert!(!Presence::from_error(&denied).is_present());

        let missing = opendal::Error::new(ErrorKind::NotFound, "404");
        assert_eq!(Presence::from_error(&missing), Presence::Absent);

        let flaky = opendal::Error::new(ErrorKind::Unexpected, "timeout");
        assert_eq!(Presence::from_error(&flaky), Presence::Unknown);
        assert_eq!(Presence::Unknown.as_str(), "error");
    }

    #[test]
    fn test_namespace_normalised() {
        let store = memory_store().with_namespace("/bronze/appointments/");
        assert_eq!(store.namespace(), "bronze/appointments");
        assert_eq!(memory_store().namespace(), "appointments");
    }

    #[tokio::test]
    async fn test_exists_after_write() {
        let store = memory_store();
        assert!(!store.exists("missing/key.csv").await);
        assert_eq!(store.presence("missing/key.csv").await, Presence::Absent);

        store
            .operator()
            .write("present/key.csv", b"a,b\n".to_vec())
            .await
            .unwrap();
        assert!(store.exists("present/key.csv").await);
    }

    #[tokio::test]
    async fn test_delete_absent_key_succeeds() {
        let store = memory_store();
        store.delete("never/written.csv").await.unwrap();
    }

    #[tokio::test]
    async fn test_download_missing_is_not_found() {
        let store = memory_store();
        let dir = tempfile::tempdir().unwrap();
        let err = store
            .download("missing.csv", dir.path().join("out.csv"))
            .await
            .unwrap_err();
        assert_eq!(err.code(), crate::ErrorCode::E003NotFound);
        assert!(!dir.path().join("out.csv").exists());
    }

    #[test]
    fn test_from_config_rejects_missing_bucket() {
        let config = RemoteConfig::default();
        let err = RemoteStore::from_config(&config).unwrap_err();
        assert_eq!(err.code(), crate::ErrorCode::E006InvalidConfig);
        assert!(err.to_string().contains("S3 bucket name is required"));
    }
}
