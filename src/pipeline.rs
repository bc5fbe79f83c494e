// Pipeline driver
//
// Wires generation, partitioned writes, and batch sync together. Generation
// and writing are synchronous; sync awaits each storage call in turn.

use crate::confirm::ConfirmPolicy;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use healthflow_config::RuntimeConfig;
use healthflow_generator::{DateRange, EventGenerator, GenerationSummary};
use healthflow_storage::{discover_partitions, upload_batch, BatchReport, RemoteStore};
use healthflow_writer::{partition, FileNaming, PartitionWriter, WrittenPartition};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Output of a single-date incremental run.
#[derive(Debug, Clone)]
pub struct IncrementalReport {
    pub date: NaiveDate,
    pub partition: WrittenPartition,
    pub summary: GenerationSummary,
}

/// Output of a historical backfill.
#[derive(Debug, Clone)]
pub struct BackfillReport {
    pub partitions: Vec<WrittenPartition>,
    pub rows: usize,
    pub summary: GenerationSummary,
}

/// What a sync would transfer, shown to the confirmation policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPlan {
    pub local_root: PathBuf,
    pub destination: String,
    pub files: Vec<PathBuf>,
}

impl SyncPlan {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// Confirmation refused; nothing was transferred
    Declined,
    Completed(BatchReport),
}

pub struct Pipeline {
    config: RuntimeConfig,
}

impl Pipeline {
    pub fn new(config: RuntimeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Generate `generator.records_per_run` records for one date and write
    /// them as a single dated partition under `bronze.partitioned_path`.
    pub fn run_incremental(&self, execution_date: NaiveDate) -> Result<IncrementalReport> {
        let count = self.config.generator.records_per_run;
        info!(
            date = %execution_date,
            records = count,
            "Starting incremental run"
        );

        let mut generator = EventGenerator::new(self.config.generator.seed);
        let records = generator
            .generate(count, &DateRange::single(execution_date))
            .with_context(|| format!("Failed to generate records for {}", execution_date))?;
        let summary = GenerationSummary::from_records(&records);
        summary.log();

        let writer = PartitionWriter::new(
            &self.config.bronze.partitioned_path,
            FileNaming::incremental(),
        );
        let partition = writer
            .write(&partition(records))
            .context("Failed to write incremental partition")?
            .into_iter()
            .next()
            .context("Incremental run produced no partition")?;

        info!(
            path = %partition.path.display(),
            rows = partition.rows,
            bytes = partition.bytes,
            "Incremental partition written"
        );

        Ok(IncrementalReport {
            date: execution_date,
            partition,
            summary,
        })
    }

    /// Generate `count` records across `[start, end]` and write one
    /// `appointments.csv` per date under `bronze.generated_path`.
    pub fn run_backfill(
        &self,
        count: usize,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<BackfillReport> {
        let range = DateRange::new(start, end).context("Invalid backfill range")?;
        info!(
            records = count,
            start = %range.start(),
            end = %range.end(),
            days = range.days(),
            "Starting backfill"
        );

        let mut generator = EventGenerator::new(self.config.generator.seed);
        let records = generator
            .generate(count, &range)
            .context("Failed to generate backfill records")?;
        let summary = GenerationSummary::from_records(&records);
        summary.log();

        let writer =
            PartitionWriter::new(&self.config.bronze.generated_path, FileNaming::backfill());
        let partitions = writer
            .write(&partition(records))
            .context("Failed to write backfill partitions")?;
        let rows = partitions.iter().map(|p| p.rows).sum();

        info!(
            partitions = partitions.len(),
            rows,
            root = %writer.root().display(),
            "Backfill complete"
        );

        Ok(BackfillReport {
            partitions,
            rows,
            summary,
        })
    }

    /// Upload every partition file under `local_root` once `confirm`
    /// approves the plan.
    pub async fn sync(
        &self,
        store: &RemoteStore,
        local_root: impl AsRef<Path>,
        confirm: &impl ConfirmPolicy,
    ) -> Result<SyncOutcome> {
        let local_root = local_root.as_ref();
        let files = discover_partitions(local_root).with_context(|| {
            format!("Failed to scan partitions under {}", local_root.display())
        })?;

        let plan = SyncPlan {
            local_root: local_root.to_path_buf(),
            destination: format!(
                "{}/{}/",
                store.label().trim_end_matches('/'),
                store.namespace()
            ),
            files,
        };

        if plan.is_empty() {
            info!(root = %local_root.display(), "No partition files to sync");
            return Ok(SyncOutcome::Completed(BatchReport::default()));
        }

        info!(
            files = plan.len(),
            destination = %plan.destination,
            "Prepared sync plan"
        );

        if !confirm.confirm(&plan)? {
            info!("Sync declined; nothing transferred");
            return Ok(SyncOutcome::Declined);
        }

        let report = upload_batch(store, local_root, &plan.files).await;
        if report.is_complete() {
            info!(
                uploaded = report.uploaded,
                bytes = report.bytes,
                "Sync complete"
            );
        } else {
            warn!(
                uploaded = report.uploaded,
                failed = report.failed,
                "Sync finished with failures; re-run to retry"
            );
            for failure in &report.failures {
                warn!(path = %failure.path.display(), "{}", failure.error);
            }
        }

        Ok(SyncOutcome::Completed(report))
    }
}
