//! Appointment record schema.
//!
//! Field order on [`AppointmentRecord`] is the partition file column order.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Base wait for any department name outside the known set.
pub const DEFAULT_BASE_WAIT_MINUTES: f64 = 20.0;

/// Hospital department.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    Emergency,
    Cardiology,
    Imaging,
    Laboratory,
    Orthopedics,
    Neurology,
}

impl Department {
    pub const ALL: [Department; 6] = [
        Department::Emergency,
        Department::Cardiology,
        Department::Imaging,
        Department::Laboratory,
        Department::Orthopedics,
        Department::Neurology,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Emergency => "Emergency",
            Department::Cardiology => "Cardiology",
            Department::Imaging => "Imaging",
            Department::Laboratory => "Laboratory",
            Department::Orthopedics => "Orthopedics",
            Department::Neurology => "Neurology",
        }
    }

    /// Unadjusted wait before peak, weekend, and jitter factors.
    pub fn base_wait_minutes(&self) -> f64 {
        match self {
            Department::Emergency => 45.0,
            Department::Cardiology => 25.0,
            Department::Imaging => 15.0,
            Department::Laboratory => 10.0,
            Department::Orthopedics => 30.0,
            Department::Neurology => 35.0,
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Department {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Department::ALL
            .into_iter()
            .find(|d| d.as_str() == s)
            .ok_or_else(|| format!("unknown department: {}", s))
    }
}

/// Base wait for a department by name, falling back to
/// [`DEFAULT_BASE_WAIT_MINUTES`] for unrecognised names.
pub fn base_wait_minutes(department: &str) -> f64 {
    department
        .parse::<Department>()
        .map(|d| d.base_wait_minutes())
        .unwrap_or(DEFAULT_BASE_WAIT_MINUTES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AppointmentType {
    Emergency,
    Scheduled,
    #[serde(rename = "Walk-in")]
    WalkIn,
    #[serde(rename = "Follow-up")]
    FollowUp,
}

impl AppointmentType {
    pub const ALL: [AppointmentType; 4] = [
        AppointmentType::Emergency,
        AppointmentType::Scheduled,
        AppointmentType::WalkIn,
        AppointmentType::FollowUp,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentType::Emergency => "Emergency",
            AppointmentType::Scheduled => "Scheduled",
            AppointmentType::WalkIn => "Walk-in",
            AppointmentType::FollowUp => "Follow-up",
        }
    }
}

impl fmt::Display for AppointmentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age bucket; inclusive low bound, exclusive high bound, open top bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-30")]
    Young,
    #[serde(rename = "30-50")]
    Adult,
    #[serde(rename = "50-70")]
    MiddleAged,
    #[serde(rename = "70+")]
    Senior,
}

impl AgeGroup {
    pub fn from_age(age: u8) -> Self {
        match age {
            0..=29 => AgeGroup::Young,
            30..=49 => AgeGroup::Adult,
            50..=69 => AgeGroup::MiddleAged,
            _ => AgeGroup::Senior,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AgeGroup::Young => "18-30",
            AgeGroup::Adult => "30-50",
            AgeGroup::MiddleAged => "50-70",
            AgeGroup::Senior => "70+",
        }
    }
}

/// One simulated appointment event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub appointment_id: String,
    pub patient_id: String,
    pub patient_name: String,
    pub patient_age: u8,
    pub patient_age_group: AgeGroup,
    pub facility_id: String,
    pub department: Department,
    pub appointment_type: AppointmentType,
    #[serde(with = "datetime_format")]
    pub appointment_datetime: NaiveDateTime,
    #[serde(with = "datetime_format")]
    pub service_start_datetime: NaiveDateTime,
    pub wait_time_minutes: u32,
    pub hour_of_day: u32,
    #[serde(with = "weekday_format")]
    pub day_of_week: Weekday,
    pub month: u32,
    pub year: i32,
}

/// Fields that are pure functions of the appointment timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeFields {
    pub hour_of_day: u32,
    pub day_of_week: Weekday,
    pub month: u32,
    pub year: i32,
}

impl TimeFields {
    pub fn of(datetime: &NaiveDateTime) -> Self {
        Self {
            hour_of_day: datetime.hour(),
            day_of_week: datetime.weekday(),
            month: datetime.month(),
            year: datetime.year(),
        }
    }
}

/// English weekday name, e.g. `Saturday`.
pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub mod datetime_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(dt: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&dt.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}

pub mod weekday_format {
    use chrono::Weekday;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(super::weekday_name(*day))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Weekday, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // chrono parses both full and abbreviated English names
        raw.parse::<Weekday>()
            .map_err(|_| serde::de::Error::custom(format!("invalid weekday: {}", raw)))
    }
}
