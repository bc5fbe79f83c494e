use healthflow_generator::{generate, DateRange, EventGenerator};
use healthflow_writer::{
    partition, read_partition, FileNaming, PartitionKey, PartitionWriter, COLUMNS,
};
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;

#[test]
fn yearly_backfill_rows_sum_to_count() {
    let dir = TempDir::new().unwrap();
    let records = generate(5_000, "2024-01-01", "2024-12-31", 42).unwrap();
    let dates: HashSet<_> = records
        .iter()
        .map(|r| r.appointment_datetime.date())
        .collect();

    let partitions = partition(records);
    let writer = PartitionWriter::new(dir.path(), FileNaming::backfill());
    let written = writer.write(&partitions).unwrap();

    assert!(!written.is_empty());
    assert!(written.len() <= 366);
    assert_eq!(written.len(), dates.len());

    let mut total_rows = 0;
    for file in &written {
        assert!(file.path.exists());
        assert!(file.bytes > 0);
        let rows = read_partition(&file.path).unwrap();
        assert_eq!(rows.len(), file.rows);
        total_rows += rows.len();
    }
    assert_eq!(total_rows, 5_000);
}

#[test]
fn files_follow_hive_layout() {
    let dir = TempDir::new().unwrap();
    let records = generate(100, "2024-01-15", "2024-01-15", 1).unwrap();
    let partitions = partition(records);
    let writer = PartitionWriter::new(dir.path(), FileNaming::backfill());
    let written = writer.write(&partitions).unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(
        written[0].path,
        dir.path()
            .join("year=2024")
            .join("month=01")
            .join("day=15")
            .join("appointments.csv")
    );
}

#[test]
fn header_follows_column_order() {
    let dir = TempDir::new().unwrap();
    let records = generate(5, "2024-02-10", "2024-02-10", 8).unwrap();
    let written = PartitionWriter::new(dir.path(), FileNaming::incremental())
        .write(&partition(records))
        .unwrap();

    let content = fs::read_to_string(&written[0].path).unwrap();
    let header = content.lines().next().unwrap();
    assert_eq!(header, COLUMNS.join(","));
    assert!(written[0]
        .path
        .ends_with("year=2024/month=02/day=10/appointments_2024-02-10.csv"));

    let first_row = content.lines().nth(1).unwrap();
    assert!(first_row.starts_with("APT_00000001,PAT_"));
    assert!(first_row.contains(",2024-02-10 "));
}

#[test]
fn rewrite_overwrites_without_append() {
    let dir = TempDir::new().unwrap();
    let date = chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap();
    let writer = PartitionWriter::new(dir.path(), FileNaming::backfill());

    let big = EventGenerator::new(1)
        .generate(300, &DateRange::single(date))
        .unwrap();
    writer.write(&partition(big)).unwrap();

    // Second run with fewer rows; directories already exist
    let small = EventGenerator::new(2)
        .generate(40, &DateRange::single(date))
        .unwrap();
    let expected = small.clone();
    let written = writer.write(&partition(small)).unwrap();

    let path = writer.path_for(&PartitionKey::from_date(date));
    assert_eq!(written[0].path, path);
    assert_eq!(read_partition(&path).unwrap(), expected);
}

#[test]
fn read_round_trips_records() {
    let dir = TempDir::new().unwrap();
    let records = generate(250, "2024-08-01", "2024-08-03", 77).unwrap();
    let partitions = partition(records);
    let written = PartitionWriter::new(dir.path(), FileNaming::backfill())
        .write(&partitions)
        .unwrap();

    for file in written {
        assert_eq!(read_partition(&file.path).unwrap(), partitions[&file.key].records);
    }
}

#[test]
fn read_missing_partition_fails() {
    let dir = TempDir::new().unwrap();
    let err = read_partition(dir.path().join("nope.csv")).unwrap_err();
    assert!(err.to_string().starts_with("[E002]"));
}
