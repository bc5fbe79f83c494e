//! Descriptive statistics for a generated record set.

use crate::record::{AppointmentRecord, Department};
use chrono::NaiveDateTime;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentWaitStats {
    pub count: usize,
    pub mean_minutes: f64,
    pub min_minutes: u32,
    pub max_minutes: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSummary {
    pub records: usize,
    pub first_appointment: Option<NaiveDateTime>,
    pub last_appointment: Option<NaiveDateTime>,
    pub facilities: usize,
    pub departments: usize,
    pub unique_patients: usize,
    pub mean_wait_minutes: f64,
    pub by_department: BTreeMap<Department, DepartmentWaitStats>,
}

impl GenerationSummary {
    pub fn from_records(records: &[AppointmentRecord]) -> Self {
        let mut facilities = HashSet::new();
        let mut patients = HashSet::new();
        let mut totals: BTreeMap<Department, (usize, u64, u32, u32)> = BTreeMap::new();
        let mut total_wait: u64 = 0;

        for record in records {
            facilities.insert(record.facility_id.as_str());
            patients.insert(record.patient_id.as_str());
            total_wait += u64::from(record.wait_time_minutes);

            let entry = totals
                .entry(record.department)
                .or_insert((0, 0, u32::MAX, 0));
            entry.0 += 1;
            entry.1 += u64::from(record.wait_time_minutes);
            entry.2 = entry.2.min(record.wait_time_minutes);
            entry.3 = entry.3.max(record.wait_time_minutes);
        }

        let by_department = totals
            .into_iter()
            .map(|(department, (count, sum, min, max))| {
                let stats = DepartmentWaitStats {
                    count,
                    mean_minutes: sum as f64 / count as f64,
                    min_minutes: min,
                    max_minutes: max,
                };
                (department, stats)
            })
            .collect::<BTreeMap<_, _>>();

        Self {
            records: records.len(),
            first_appointment: records.iter().map(|r| r.appointment_datetime).min(),
            last_appointment: records.iter().map(|r| r.appointment_datetime).max(),
            facilities: facilities.len(),
            departments: by_department.len(),
            unique_patients: patients.len(),
            mean_wait_minutes: if records.is_empty() {
                0.0
            } else {
                total_wait as f64 / records.len() as f64
            },
            by_department,
        }
    }

    /// Emit the summary and per-department wait statistics at info level.
    pub fn log(&self) {
        tracing::info!(
            records = self.records,
            first = ?self.first_appointment,
            last = ?self.last_appointment,
            facilities = self.facilities,
            departments = self.departments,
            unique_patients = self.unique_patients,
            avg_wait_minutes = %format!("{:.1}", self.mean_wait_minutes),
            "Generated appointments"
        );

        for (department, stats) in &self.by_department {
            tracing::info!(
                department = %department,
                count = stats.count,
                mean = %format!("{:.1}", stats.mean_minutes),
                min = stats.min_minutes,
                max = stats.max_minutes,
                "Wait time by department"
            );
        }
    }
}
