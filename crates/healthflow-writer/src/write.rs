//! Materialise partitions as CSV files under a local root.

use crate::error::{Result, WriterError};
use crate::partition::{FileNaming, Partition, PartitionKey};
use healthflow_generator::AppointmentRecord;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Outcome of writing one partition file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenPartition {
    pub key: PartitionKey,
    pub path: PathBuf,
    pub rows: usize,
    pub bytes: u64,
}

/// Writes each partition to `root/year=YYYY/month=MM/day=DD/<file>`.
///
/// Existing files are truncated and rewritten; nothing is merged or appended.
#[derive(Debug, Clone)]
pub struct PartitionWriter {
    root: PathBuf,
    naming: FileNaming,
}

impl PartitionWriter {
    pub fn new(root: impl Into<PathBuf>, naming: FileNaming) -> Self {
        Self {
            root: root.into(),
            naming,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path the partition for `key` is written to.
    pub fn path_for(&self, key: &PartitionKey) -> PathBuf {
        self.root
            .join(key.relative_dir())
            .join(self.naming.file_name(key))
    }

    pub fn write(
        &self,
        partitions: &BTreeMap<PartitionKey, Partition>,
    ) -> Result<Vec<WrittenPartition>> {
        let total = partitions.len();
        let mut written = Vec::with_capacity(total);

        tracing::debug!(
            partitions = total,
            root = %self.root.display(),
            "Writing partitions"
        );

        for (index, partition) in partitions.values().enumerate() {
            written.push(self.write_one(partition)?);

            let done = index + 1;
            if done % 50 == 0 {
                tracing::info!("Created {}/{} partitions", done, total);
            }
        }

        Ok(written)
    }

    fn write_one(&self, partition: &Partition) -> Result<WrittenPartition> {
        let path = self.path_for(&partition.key);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).map_err(|e| WriterError::io(dir, e))?;
        }

        write_csv(&path, &partition.records)?;

        let bytes = fs::metadata(&path)
            .map_err(|e| WriterError::io(&path, e))?
            .len();

        tracing::debug!(
            partition = %partition.key,
            rows = partition.len(),
            bytes,
            "Wrote partition file"
        );

        Ok(WrittenPartition {
            key: partition.key,
            path,
            rows: partition.len(),
            bytes,
        })
    }
}

fn write_csv(path: &Path, records: &[AppointmentRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).map_err(|e| WriterError::csv(path, e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| WriterError::csv(path, e))?;
    }
    writer
        .flush()
        .map_err(|e| WriterError::io(path, e))
}

/// Read a partition file back into records.
pub fn read_partition(path: impl AsRef<Path>) -> Result<Vec<AppointmentRecord>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path).map_err(|e| WriterError::csv(path, e))?;
    reader
        .deserialize()
        .collect::<std::result::Result<Vec<AppointmentRecord>, _>>()
        .map_err(|e| WriterError::csv(path, e))
}
