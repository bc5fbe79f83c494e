//! Seeded appointment event generator.

use crate::error::{GeneratorError, Result};
use crate::names;
use crate::record::{AgeGroup, AppointmentRecord, AppointmentType, Department, TimeFields};
use crate::wait_time::WaitTimeModel;
use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::ops::RangeInclusive;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Patient ids are drawn from this range, so a run can hold at most
/// 900 000 distinct patients.
pub const PATIENT_ID_RANGE: RangeInclusive<u32> = 100_000..=999_999;

const FACILITY_COUNT: u32 = 10;
const SECONDS_PER_DAY: i64 = 86_400;
const PROGRESS_EVERY: usize = 1_000;
/// Room kept after the last sampled second for service start times
const SERVICE_HEADROOM_DAYS: i64 = 1;

/// Inclusive range of calendar dates. Timestamps are sampled from the first
/// second of `start` through the last second of `end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if end < start {
            return Err(GeneratorError::invalid_input(format!(
                "end date {} is before start date {}",
                end, start
            )));
        }
        let range = Self { start, end };
        range.ensure_representable()?;
        Ok(range)
    }

    /// Range covering exactly one calendar date.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Parse `YYYY-MM-DD` strings.
    pub fn parse(start: &str, end: &str) -> Result<Self> {
        Self::new(parse_date(start)?, parse_date(end)?)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    fn first_instant(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    fn span_seconds(&self) -> i64 {
        self.days() * SECONDS_PER_DAY - 1
    }

    /// Every sampled timestamp plus a service wait must fit in `NaiveDateTime`.
    fn ensure_representable(&self) -> Result<()> {
        self.end
            .and_hms_opt(23, 59, 59)
            .and_then(|last| last.checked_add_signed(Duration::days(SERVICE_HEADROOM_DAYS)))
            .map(|_| ())
            .ok_or_else(|| {
                GeneratorError::invalid_input(format!(
                    "end date {} leaves no room for service start times",
                    self.end
                ))
            })
    }
}

pub fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|e| {
        GeneratorError::invalid_input(format!("'{}' is not a YYYY-MM-DD date: {}", raw, e))
    })
}

/// Generates appointment records from an explicit, owned RNG.
///
/// Two generators built from the same seed produce identical output for the
/// same sequence of `generate` calls.
pub struct EventGenerator {
    rng: StdRng,
    model: WaitTimeModel,
}

impl EventGenerator {
    pub fn new(seed: u64) -> Self {
        Self::with_model(seed, WaitTimeModel::default())
    }

    pub fn with_model(seed: u64, model: WaitTimeModel) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            model,
        }
    }

    pub fn model(&self) -> &WaitTimeModel {
        &self.model
    }

    /// Generate `n` records with timestamps uniformly spread over `range`.
    ///
    /// Records are returned in generation order with sequential ids
    /// (`APT_00000001`, ...). Patient ids are unique within the call.
    pub fn generate(&mut self, n: usize, range: &DateRange) -> Result<Vec<AppointmentRecord>> {
        validate_count(n)?;
        range.ensure_representable()?;

        tracing::debug!(
            records = n,
            start = %range.start(),
            end = %range.end(),
            "Generating appointments"
        );

        let mut seen_patients = HashSet::with_capacity(n);
        let mut records = Vec::with_capacity(n);

        for i in 0..n {
            if i > 0 && i % PROGRESS_EVERY == 0 {
                tracing::debug!(generated = i, total = n, "Generation progress");
            }
            records.push(self.next_record(i, range, &mut seen_patients)?);
        }

        Ok(records)
    }

    fn next_record(
        &mut self,
        index: usize,
        range: &DateRange,
        seen_patients: &mut HashSet<u32>,
    ) -> Result<AppointmentRecord> {
        let offset = self.rng.gen_range(0..=range.span_seconds());
        let appointment_datetime = range
            .first_instant()
            .checked_add_signed(Duration::seconds(offset))
            .ok_or_else(|| out_of_range(range))?;
        let time = TimeFields::of(&appointment_datetime);

        let facility_id = format!("HOSP_{:03}", self.rng.gen_range(1..=FACILITY_COUNT));
        let department = *Department::ALL
            .choose(&mut self.rng)
            .unwrap_or(&Department::Emergency);
        let appointment_type = *AppointmentType::ALL
            .choose(&mut self.rng)
            .unwrap_or(&AppointmentType::Scheduled);

        let patient_id = self.unique_patient_id(seen_patients);
        let patient_name = names::full_name(&mut self.rng);
        let patient_age: u8 = self.rng.gen_range(18..=85);

        let wait_time_minutes = self.model.sample(
            department.as_str(),
            time.hour_of_day,
            time.day_of_week,
            &mut self.rng,
        );
        let service_start_datetime = appointment_datetime
            .checked_add_signed(Duration::minutes(i64::from(wait_time_minutes)))
            .ok_or_else(|| out_of_range(range))?;

        Ok(AppointmentRecord {
            appointment_id: format!("APT_{:08}", index + 1),
            patient_id: format!("PAT_{}", patient_id),
            patient_name,
            patient_age,
            patient_age_group: AgeGroup::from_age(patient_age),
            facility_id,
            department,
            appointment_type,
            appointment_datetime,
            service_start_datetime,
            wait_time_minutes,
            hour_of_day: time.hour_of_day,
            day_of_week: time.day_of_week,
            month: time.month,
            year: time.year,
        })
    }

    fn unique_patient_id(&mut self, seen: &mut HashSet<u32>) -> u32 {
        // validate_count bounds n by the id space, so this terminates
        loop {
            let candidate = self.rng.gen_range(PATIENT_ID_RANGE);
            if seen.insert(candidate) {
                return candidate;
            }
        }
    }
}

fn out_of_range(range: &DateRange) -> GeneratorError {
    GeneratorError::invalid_input(format!(
        "timestamps for {}..={} exceed the supported date range",
        range.start(),
        range.end()
    ))
}

fn validate_count(n: usize) -> Result<()> {
    if n == 0 {
        return Err(GeneratorError::invalid_input(
            "record count must be greater than 0",
        ));
    }

    let id_space = (PATIENT_ID_RANGE.end() - PATIENT_ID_RANGE.start() + 1) as usize;
    if n > id_space {
        return Err(GeneratorError::invalid_input(format!(
            "record count {} exceeds the {} available unique patient ids",
            n, id_space
        )));
    }

    Ok(())
}

/// Convenience wrapper: build a generator from `seed` and run it once.
pub fn generate(
    n: usize,
    start_date: &str,
    end_date: &str,
    seed: u64,
) -> Result<Vec<AppointmentRecord>> {
    let range = DateRange::parse(start_date, end_date)?;
    EventGenerator::new(seed).generate(n, &range)
}
