//! Batch upload of local partition files.

use crate::error::{Result, StorageError};
use crate::keys::remote_key;
use crate::store::RemoteStore;
use healthflow_writer::PartitionKey;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const PROGRESS_EVERY: usize = 100;

/// Local files matching `year=*/month=*/day=*/*.csv` under `root`, sorted.
///
/// A missing root yields an empty list.
pub fn discover_partitions(root: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    if !root.exists() {
        tracing::warn!(root = %root.display(), "Local partition root does not exist");
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .min_depth(4)
        .max_depth(4)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(root).to_path_buf();
            StorageError::local_io(path, e.into())
        })?;

        if !entry.file_type().is_file() || !is_partition_file(root, entry.path()) {
            continue;
        }
        files.push(entry.into_path());
    }

    files.sort();
    tracing::debug!(root = %root.display(), files = files.len(), "Discovered partition files");
    Ok(files)
}

fn is_partition_file(root: &Path, path: &Path) -> bool {
    if path.extension().and_then(|ext| ext.to_str()) != Some("csv") {
        return false;
    }

    let Ok(relative) = path.strip_prefix(root) else {
        return false;
    };
    let segments: Vec<&str> = relative
        .iter()
        .filter_map(|segment| segment.to_str())
        .collect();

    match segments.as_slice() {
        [year, month, day, _file] => PartitionKey::from_segments(year, month, day).is_some(),
        _ => false,
    }
}

/// One file that did not make it to the remote store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub path: PathBuf,
    pub error: String,
}

/// Aggregate result of a batch upload. Failures are reported, never raised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    pub uploaded: usize,
    pub failed: usize,
    pub bytes: u64,
    pub failures: Vec<BatchFailure>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.uploaded + self.failed
    }

    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// Upload each file under its namespaced key, one at a time.
///
/// A failing file is logged and counted; the batch always runs to the end.
pub async fn upload_batch(
    store: &RemoteStore,
    local_root: impl AsRef<Path>,
    files: &[PathBuf],
) -> BatchReport {
    let local_root = local_root.as_ref();
    let total = files.len();
    let mut report = BatchReport::default();

    for path in files {
        let result = match remote_key(store.namespace(), local_root, path) {
            Ok(key) => store.upload(path, &key).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(bytes) => {
                report.uploaded += 1;
                report.bytes += bytes;
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to upload partition"
                );
                metrics::counter!("healthflow.storage.upload_failures").increment(1);
                report.failed += 1;
                report.failures.push(BatchFailure {
                    path: path.clone(),
                    error: e.to_string(),
                });
            }
        }

        let done = report.total();
        if done % PROGRESS_EVERY == 0 {
            tracing::info!("Uploaded {}/{} files", done, total);
        }
    }

    tracing::info!(
        uploaded = report.uploaded,
        failed = report.failed,
        bytes = report.bytes,
        "Batch sync finished"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "appointment_id\n").unwrap();
    }

    #[test]
    fn test_discover_filters_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        let good_b = root.join("year=2024/month=02/day=01/appointments.csv");
        let good_a = root.join("year=2024/month=01/day=31/appointments.csv");
        touch(&good_b);
        touch(&good_a);

        // Wrong depth, wrong extension, invalid date, not partition dirs
        touch(&root.join("year=2024/month=01/appointments.csv"));
        touch(&root.join("year=2024/month=01/day=30/notes.txt"));
        touch(&root.join("year=2023/month=02/day=30/appointments.csv"));
        touch(&root.join("misc/a/b/appointments.csv"));
        touch(&root.join("year=2024/month=01/day=29/nested/appointments.csv"));

        let files = discover_partitions(root).unwrap();
        assert_eq!(files, vec![good_a, good_b]);
    }

    #[test]
    fn test_discover_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let files = discover_partitions(dir.path().join("absent")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_report_totals() {
        let report = BatchReport {
            uploaded: 8,
            failed: 2,
            bytes: 10,
            failures: Vec::new(),
        };
        assert_eq!(report.total(), 10);
        assert!(!report.is_complete());
        assert!(BatchReport::default().is_complete());
    }
}
