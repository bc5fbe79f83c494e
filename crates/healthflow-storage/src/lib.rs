//! Remote store access and batch sync for bronze layer partitions.
//!
//! [`RemoteStore`] wraps an OpenDAL operator (S3 or local filesystem) and
//! exposes the handful of object operations the pipeline needs. The
//! [`sync`] module walks a local partition tree and uploads every file,
//! isolating per-file failures.

mod error;
mod keys;
mod store;
pub mod sync;

pub use error::{ErrorCode, Result, StorageError};
pub use keys::remote_key;
pub use store::{Presence, RemoteStore};
pub use sync::{discover_partitions, upload_batch, BatchFailure, BatchReport};
