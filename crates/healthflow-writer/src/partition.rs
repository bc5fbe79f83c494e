//! Partition keys and grouping
//!
//! Generates Hive-style partition directories:
//! year={year}/month={month}/day={day}/{file}

use chrono::{Datelike, NaiveDate};
use healthflow_generator::AppointmentRecord;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Calendar date a partition covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PartitionKey {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl PartitionKey {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// Key of the calendar date of `appointment_datetime`.
    pub fn of(record: &AppointmentRecord) -> Self {
        Self::from_date(record.appointment_datetime.date())
    }

    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
    }

    /// `year=YYYY/month=MM/day=DD` as a relative path
    pub fn relative_dir(&self) -> PathBuf {
        PathBuf::from(format!("year={}", self.year))
            .join(format!("month={:02}", self.month))
            .join(format!("day={:02}", self.day))
    }

    /// Parse the three directory segments of a partition path, e.g.
    /// `("year=2024", "month=01", "day=15")`. Rejects segments that do not
    /// name a real calendar date.
    pub fn from_segments(year: &str, month: &str, day: &str) -> Option<Self> {
        let key = Self {
            year: year.strip_prefix("year=")?.parse().ok()?,
            month: month.strip_prefix("month=")?.parse().ok()?,
            day: day.strip_prefix("day=")?.parse().ok()?,
        };
        key.date().map(|_| key)
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "year={}/month={:02}/day={:02}",
            self.year, self.month, self.day
        )
    }
}

/// All records of one calendar date, in generation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Partition {
    pub key: PartitionKey,
    pub records: Vec<AppointmentRecord>,
}

impl Partition {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Group records by the calendar date of `appointment_datetime`.
pub fn partition(records: Vec<AppointmentRecord>) -> BTreeMap<PartitionKey, Partition> {
    let mut partitions: BTreeMap<PartitionKey, Partition> = BTreeMap::new();

    for record in records {
        let key = PartitionKey::of(&record);
        partitions
            .entry(key)
            .or_insert_with(|| Partition {
                key,
                records: Vec::new(),
            })
            .records
            .push(record);
    }

    partitions
}

/// File name policy inside a partition directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileNaming {
    /// Same name in every partition, e.g. `appointments.csv`
    Fixed(String),
    /// `<stem>_YYYY-MM-DD.csv`
    Dated { stem: String },
}

impl FileNaming {
    pub fn backfill() -> Self {
        FileNaming::Fixed("appointments.csv".to_string())
    }

    pub fn incremental() -> Self {
        FileNaming::Dated {
            stem: "appointments".to_string(),
        }
    }

    pub fn file_name(&self, key: &PartitionKey) -> String {
        match self {
            FileNaming::Fixed(name) => name.clone(),
            FileNaming::Dated { stem } => format!(
                "{}_{}-{:02}-{:02}.csv",
                stem, key.year, key.month, key.day
            ),
        }
    }
}
