use crate::analysis::{analyze, SnapshotSource};
use crate::config::{CapacitySource, DeviceParameters, ParameterInput};
use crate::engine::{FlashCounters, WafSource};
use crate::error::{AnalysisError, EngineError, ExtractError, ParameterError, ValidationError};
use crate::snapshot::{Dialect, Snapshot};
use crate::validate::validate_pair;
use chrono::{NaiveDate, NaiveDateTime};

fn jan(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 1, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid datetime")
}

fn snap(serial: Option<&str>, ts: Option<NaiveDateTime>, units: u64) -> Snapshot {
    let mut snapshot = Snapshot::new(units, Dialect::Flash);
    snapshot.serial = serial.map(str::to_string);
    snapshot.timestamp = ts;
    snapshot
}

fn dump(local_time: &str, units_written: &str, capacity_line: &str) -> String {
    format!(
        "=== START OF INFORMATION SECTION ===
Model Number:                       WD Blue SN570 1TB
Serial Number:                      22183K800123
{capacity_line}
Local Time is:                      {local_time}
NVMe Version:                       1.4

=== START OF SMART DATA SECTION ===
Percentage Used:                    2%
Data Units Written:                 {units_written} [1.20 TB]
Power On Hours:                     812
"
    )
}

fn source<'a>(name: &'a str, text: &'a str) -> SnapshotSource<'a> {
    SnapshotSource { name, text }
}

fn input(capacity_gib: Option<f64>) -> ParameterInput {
    ParameterInput {
        host_unit_size_kib: 0.5,
        flash_unit_size_kib: 32.0,
        rated_endurance_cycles: 3000,
        capacity_gib,
    }
}

#[test]
fn valid_pair_passes() {
    let first = snap(Some("SN1"), Some(jan(1)), 100);
    let second = snap(Some("SN1"), Some(jan(30)), 200);

    assert_eq!(validate_pair(&first, &second), Ok(()));
}

#[test]
fn different_serials_are_rejected() {
    let first = snap(Some("SN1"), Some(jan(1)), 100);
    let second = snap(Some("SN2"), Some(jan(30)), 200);

    let err = validate_pair(&first, &second).expect_err("serial mismatch");

    assert_eq!(
        err,
        ValidationError::IdentityMismatch {
            first: "SN1".to_string(),
            second: "SN2".to_string(),
        }
    );
    assert!(err.to_string().contains("different drives"));
}

#[test]
fn out_of_order_and_equal_timestamps_are_rejected() {
    for (a, b) in [(jan(20), jan(1)), (jan(1), jan(1))] {
        let first = snap(Some("SN1"), Some(a), 100);
        let second = snap(Some("SN1"), Some(b), 200);

        let err = validate_pair(&first, &second).expect_err("ordering");

        assert!(matches!(err, ValidationError::OrderingViolation { .. }));
    }
}

#[test]
fn regressed_counter_is_rejected() {
    let first = snap(Some("SN1"), Some(jan(1)), 500);
    let second = snap(Some("SN1"), Some(jan(30)), 100);

    let err = validate_pair(&first, &second).expect_err("regression");

    assert_eq!(
        err,
        ValidationError::CounterRegression {
            first: 500,
            second: 100,
        }
    );
}

#[test]
fn absent_identity_and_time_skip_their_checks() {
    let first = snap(None, None, 100);
    let second = snap(Some("SN2"), Some(jan(1)), 100);

    assert_eq!(validate_pair(&first, &second), Ok(()));
    assert!(validate_pair(&snap(None, None, 2), &snap(None, None, 1)).is_err());
}

#[test]
fn supplied_capacity_wins_over_reported() {
    let mut reference = snap(None, None, 1);
    reference.capacity_bytes = Some(1 << 40);

    let (params, source) = input(Some(512.0)).resolve(&reference).expect("resolve");

    assert_eq!(params.capacity_gib, 512.0);
    assert_eq!(source, CapacitySource::Supplied);
}

#[test]
fn reported_capacity_is_the_fallback() {
    let mut reference = snap(None, None, 1);
    reference.capacity_bytes = Some(500 * (1 << 30));

    let (params, source) = input(None).resolve(&reference).expect("resolve");

    assert_eq!(params.capacity_gib, 500.0);
    assert_eq!(source, CapacitySource::Reported);
}

#[test]
fn missing_capacity_is_an_error() {
    let reference = snap(None, None, 1);

    assert_eq!(
        input(None).resolve(&reference),
        Err(ParameterError::MissingCapacity)
    );
}

#[test]
fn non_positive_parameters_are_rejected() {
    assert_eq!(
        DeviceParameters::new(0.0, 32.0, 3000, 500.0),
        Err(ParameterError::NonPositive {
            field: "host unit size",
            value: 0.0,
        })
    );
    assert!(DeviceParameters::new(0.5, 32.0, 0, 500.0).is_err());
    assert!(DeviceParameters::new(0.5, -1.0, 3000, 500.0).is_err());
    assert!(DeviceParameters::new(0.5, 32.0, 3000, f64::NAN).is_err());
}

#[test]
fn analyze_runs_every_stage() {
    // Arrange
    let capacity = "Total NVM Capacity: 1,000,204,886,016 [1.00 TB]";
    let day1 = dump("Thu Jan  1 09:00:00 2026 UTC", "50,000,000", capacity);
    let day31 = dump("Sat Jan 31 09:00:00 2026 UTC", "52,500,000", capacity);
    let flash = FlashCounters {
        before: 10_000,
        after: 60_000,
    };

    // Act
    let analysis = analyze(
        SnapshotSource { name: "day1.txt", text: &day1 },
        SnapshotSource { name: "day31.txt", text: &day31 },
        &input(None),
        Some(flash),
    )
    .expect("analyze");

    // Assert
    assert_eq!(analysis.capacity_source, CapacitySource::Reported);
    assert_eq!(analysis.first.data_units_written, 50_000_000);
    assert_eq!(analysis.second.model.as_deref(), Some("WD Blue SN570 1TB"));
    assert!((analysis.metrics.elapsed_days - 30.0).abs() < 1e-9);
    assert_eq!(analysis.metrics.waf_source, WafSource::Measured);
    let expected_gib = 1_000_204_886_016.0 / (1u64 << 30) as f64;
    assert!((analysis.params.capacity_gib - expected_gib).abs() < 1e-9);
}

#[test]
fn analyze_stops_at_the_first_failing_stage() {
    let good = dump("2026-01-01 00:00:00", "100", "");
    let later_lower = dump("2026-01-02 00:00:00", "50", "");
    let same_time = dump("2026-01-01 00:00:00", "200", "");
    let broken = "NVMe\nnothing useful here\n";

    assert!(matches!(
        analyze(source("a", &good), source("b", broken), &input(Some(500.0)), None),
        Err(AnalysisError::Extract(ExtractError::MissingField { .. }))
    ));
    assert!(matches!(
        analyze(source("a", &good), source("b", &later_lower), &input(Some(500.0)), None),
        Err(AnalysisError::Validation(ValidationError::CounterRegression { .. }))
    ));
    assert!(matches!(
        analyze(source("a", &good), source("b", &same_time), &input(Some(500.0)), None),
        Err(AnalysisError::Validation(ValidationError::OrderingViolation { .. }))
    ));
    let later_higher = later_lower.replace("50 [", "150 [");
    assert!(matches!(
        analyze(source("a", &good), source("b", &later_higher), &input(None), None),
        Err(AnalysisError::Parameter(ParameterError::MissingCapacity))
    ));
}

#[test]
fn analyze_rejects_swapped_flash_counters() {
    let earlier = dump("2026-01-01 00:00:00", "1,000,000", "");
    let later = dump("2026-01-31 00:00:00", "2,000,000", "");
    let swapped = FlashCounters {
        before: 200_000,
        after: 100_000,
    };

    let err = analyze(
        source("a", &earlier),
        source("b", &later),
        &input(Some(500.0)),
        Some(swapped),
    )
    .expect_err("flash counter regression");

    assert_eq!(
        err,
        AnalysisError::Engine(EngineError::FlashCounterRegression {
            before: 200_000,
            after: 100_000,
        })
    );
}

#[test]
fn analyze_reports_undated_pairs() {
    let undated_a = dump("unknown", "100", "");
    let undated_b = dump("unknown", "200", "");

    let err = analyze(
        SnapshotSource { name: "a", text: &undated_a },
        SnapshotSource { name: "b", text: &undated_b },
        &input(Some(500.0)),
        None,
    )
    .expect_err("no timestamps");

    assert_eq!(
        err,
        AnalysisError::Engine(EngineError::MissingTimestamp { which: "snapshot 1" })
    );
}
