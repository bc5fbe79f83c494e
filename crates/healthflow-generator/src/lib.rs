//! Synthetic hospital appointment events.
//!
//! An [`EventGenerator`] owns a seeded RNG and produces
//! [`AppointmentRecord`]s whose wait times follow a department, time-of-day,
//! and weekend dependent [`WaitTimeModel`].

mod error;
mod generator;
mod names;
mod record;
mod summary;
mod wait_time;

pub use error::{ErrorCode, GeneratorError, Result};
pub use generator::{generate, parse_date, DateRange, EventGenerator, DATE_FORMAT, PATIENT_ID_RANGE};
pub use record::{
    base_wait_minutes, datetime_format, weekday_name, AgeGroup, AppointmentRecord,
    AppointmentType, Department, TimeFields, DEFAULT_BASE_WAIT_MINUTES,
};
pub use summary::{DepartmentWaitStats, GenerationSummary};
pub use wait_time::WaitTimeModel;
