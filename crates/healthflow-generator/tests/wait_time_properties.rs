use chrono::{Duration, Weekday};
use healthflow_generator::{generate, DateRange, Department, EventGenerator, WaitTimeModel};
use proptest::prelude::*;

fn weekday() -> impl Strategy<Value = Weekday> {
    (0u8..7).prop_map(|d| match d {
        0 => Weekday::Mon,
        1 => Weekday::Tue,
        2 => Weekday::Wed,
        3 => Weekday::Thu,
        4 => Weekday::Fri,
        5 => Weekday::Sat,
        _ => Weekday::Sun,
    })
}

fn department_name() -> impl Strategy<Value = String> {
    prop_oneof![
        (0usize..Department::ALL.len()).prop_map(|i| Department::ALL[i].as_str().to_string()),
        "[A-Za-z]{1,12}",
    ]
}

proptest! {
    #[test]
    fn wait_is_never_below_floor(
        department in department_name(),
        hour in 0u32..24,
        day in weekday(),
        jitter in 0.7f64..=1.3,
    ) {
        let model = WaitTimeModel::default();
        prop_assert!(model.wait_minutes(&department, hour, day, jitter) >= 5);
    }

    #[test]
    fn weekend_never_waits_longer_than_weekday(
        department in department_name(),
        hour in 0u32..24,
        jitter in 0.7f64..=1.3,
    ) {
        let model = WaitTimeModel::default();
        let weekday = model.wait_minutes(&department, hour, Weekday::Wed, jitter);
        let weekend = model.wait_minutes(&department, hour, Weekday::Sat, jitter);
        prop_assert!(weekend <= weekday);
    }

    #[test]
    fn generated_records_hold_invariants(seed in any::<u64>(), n in 1usize..200) {
        let range = DateRange::parse("2024-01-01", "2024-01-14").unwrap();
        let records = EventGenerator::new(seed).generate(n, &range).unwrap();
        prop_assert_eq!(records.len(), n);
        for r in &records {
            prop_assert!(r.wait_time_minutes >= 5);
            prop_assert!(r.service_start_datetime >= r.appointment_datetime);
            prop_assert_eq!(
                r.service_start_datetime,
                r.appointment_datetime + Duration::minutes(i64::from(r.wait_time_minutes))
            );
        }
    }
}

#[test]
fn yearly_backfill_is_reproducible() {
    let first = generate(5_000, "2024-01-01", "2024-12-31", 42).unwrap();
    let second = generate(5_000, "2024-01-01", "2024-12-31", 42).unwrap();
    assert_eq!(first, second);
}
