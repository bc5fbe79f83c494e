// healthflow - synthetic hospital appointments into a date-partitioned
// bronze layer, synced to object storage
//
// Library surface of the `healthflow` binary: the pipeline driver, the
// confirmation policies it asks before a sync, and runtime initialization.

mod confirm;
mod init;
mod pipeline;

pub use confirm::{AssumeYes, ConfirmPolicy, Decline, InteractivePrompt};
pub use init::{build_filter, init_remote, init_tracing};
pub use pipeline::{BackfillReport, IncrementalReport, Pipeline, SyncOutcome, SyncPlan};

pub use healthflow_config::RuntimeConfig;
pub use healthflow_storage::{BatchReport, RemoteStore};
