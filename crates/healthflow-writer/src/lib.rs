//! Date-partitioned bronze layer writer.
//!
//! Groups appointment records by calendar date and writes one CSV file per
//! date under a Hive-style `year=/month=/day=` directory tree.

mod error;
mod partition;
mod write;

pub use error::{ErrorCode, Result, WriterError};
pub use partition::{partition, FileNaming, Partition, PartitionKey};
pub use write::{read_partition, PartitionWriter, WrittenPartition};

/// Partition file columns, in file order.
pub const COLUMNS: [&str; 15] = [
    "appointment_id",
    "patient_id",
    "patient_name",
    "patient_age",
    "patient_age_group",
    "facility_id",
    "department",
    "appointment_type",
    "appointment_datetime",
    "service_start_datetime",
    "wait_time_minutes",
    "hour_of_day",
    "day_of_week",
    "month",
    "year",
];
