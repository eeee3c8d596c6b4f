//! Polling cycle tests against a simulated interface table.

mod common;

use common::{SimulatedInterface, SimulatedTable, TestHost, assert_close, interface_table};
use snmp_ifrate::{
    CycleConfig, DeltaTracking, DuplexStatus, RateConfig, RowOutcome, SENTINEL, TableKind,
};
use std::time::Duration;

/// First cycle only establishes baselines.
#[test]
fn first_cycle_reports_sentinels() {
    let table = interface_table(TableKind::IfXTable, 3);
    let mut host = TestHost::new(TableKind::IfXTable);

    let report = host.poll(&table, &DeltaTracking::since_last_poll());

    assert_eq!(report.rows.len(), 3);
    for rates in report.rows.values() {
        assert_eq!(rates.bitrate_in, SENTINEL);
        assert_eq!(rates.bitrate_out, SENTINEL);
        assert_eq!(rates.utilization, SENTINEL);
    }
    assert_eq!(host.snapshots.len(), 3);
}

/// Steady traffic on a 64-bit table yields exact bit rates.
#[test]
fn steady_traffic_on_hc_counters() {
    let mut table = interface_table(TableKind::IfXTable, 3);
    let mut host = TestHost::new(TableKind::IfXTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    table.advance(30);
    let report = host.poll(&table, &tracking);

    for idx in 1..=3u32 {
        let rates = report.get(idx).unwrap();
        assert_eq!(rates.outcome, RowOutcome::Calculated);
        assert_eq!(rates.bitrate_in, 8_000.0 * f64::from(idx));
        assert_eq!(rates.bitrate_out, 4_000.0 * f64::from(idx));
        // Full duplex on 100 Mbit/s: the larger direction counts
        assert_close(rates.utilization, 8_000.0 * f64::from(idx) * 100.0 / 1e8);
    }
}

/// A Counter32 wrapping between polls still produces the true rate.
#[test]
fn counter32_wraparound() {
    let mut table = SimulatedTable::new(
        TableKind::IfTable,
        vec![SimulatedInterface::new(1, 10_000, 0, 10_000_000)],
    );
    table.interface_mut(1).in_octets = u64::from(u32::MAX) - 50_000;
    let mut host = TestHost::new(TableKind::IfTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    table.advance(10);
    assert!(table.interface_mut(1).in_octets < 100_000, "counter wrapped");

    let report = host.poll(&table, &tracking);
    let rates = report.get(1).unwrap();
    assert_eq!(rates.bitrate_in, 80_000.0);
    assert_eq!(rates.bitrate_out, 0.0);
    assert_close(rates.utilization, 0.8);
}

/// Half duplex links add both directions.
#[test]
fn half_duplex_sums_directions() {
    let mut iface = SimulatedInterface::new(1, 62_500, 62_500, 10_000_000);
    iface.duplex = Some(DuplexStatus::HalfDuplex);
    let mut table = SimulatedTable::new(TableKind::IfTable, vec![iface]);
    let mut host = TestHost::new(TableKind::IfTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    table.advance(20);
    let report = host.poll(&table, &tracking);

    // 500 kbit/s each way on 10 Mbit/s
    assert_close(report.get(1).unwrap().utilization, 10.0);
}

/// Without a duplex row utilization is unavailable but rates still flow.
#[test]
fn missing_duplex_row() {
    let mut iface = SimulatedInterface::new(1, 1_000, 1_000, 10_000_000);
    iface.duplex = None;
    let mut table = SimulatedTable::new(TableKind::IfTable, vec![iface]);
    let mut host = TestHost::new(TableKind::IfTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    table.advance(10);
    let rates = host.poll(&table, &tracking).get(1).cloned().unwrap();

    assert_eq!(rates.bitrate_in, 8_000.0);
    assert_eq!(rates.utilization, SENTINEL);
}

/// A saturated ifSpeed cannot be used for utilization.
#[test]
fn saturated_if_speed() {
    let mut table = SimulatedTable::new(
        TableKind::IfTable,
        vec![SimulatedInterface::new(1, 1_000, 1_000, u32::MAX)],
    );
    let mut host = TestHost::new(TableKind::IfTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    table.advance(10);
    let rates = host.poll(&table, &tracking).get(1).cloned().unwrap();

    assert_eq!(rates.bitrate_in, 8_000.0);
    assert_eq!(rates.utilization, SENTINEL);
}

/// A changed discontinuity marker discards the baseline for one cycle.
#[test]
fn discontinuity_resets_one_cycle() {
    let mut table = interface_table(TableKind::IfXTable, 2);
    table.interface_mut(1).discontinuity = "1000".into();
    let mut host = TestHost::new(TableKind::IfXTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    table.advance(30);

    // Counters of interface 1 were cleared out of band
    let iface = table.interface_mut(1);
    iface.discontinuity = "2000".into();
    iface.in_octets = 500;
    iface.out_octets = 0;

    let report = host.poll(&table, &tracking);
    assert_eq!(report.get(1).unwrap().outcome, RowOutcome::Reset);
    assert_eq!(report.get(1).unwrap().bitrate_in, SENTINEL);
    assert_eq!(report.get(2).unwrap().bitrate_in, 16_000.0);

    table.advance(30);
    let report = host.poll(&table, &tracking);
    assert_eq!(report.get(1).unwrap().outcome, RowOutcome::Calculated);
    assert_eq!(report.get(1).unwrap().bitrate_in, 8_000.0);
}

/// An agent restart restarts every row and is reported back to the host.
#[test]
fn agent_restart_restarts_all_rows() {
    let mut table = interface_table(TableKind::IfXTable, 2);
    let mut host = TestHost::new(TableKind::IfXTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    table.advance(30);
    host.agent_restarted = true;
    let report = host.poll(&table, &tracking);

    assert!(report.agent_restart_handled);
    assert!(!host.agent_restarted);
    assert!(
        report
            .rows
            .values()
            .all(|rates| rates.outcome == RowOutcome::Reset && rates.bitrate_in == SENTINEL)
    );

    table.advance(30);
    let report = host.poll(&table, &tracking);
    assert!(!report.agent_restart_handled);
    assert_eq!(report.get(2).unwrap().bitrate_in, 16_000.0);
}

/// With group-start tracking a timed-out cycle is folded into the next rate.
#[test]
fn timeout_buffers_group_delta() {
    let mut table = interface_table(TableKind::IfXTable, 1);
    let mut host = TestHost::new(TableKind::IfXTable);
    let tracking = DeltaTracking::since_group_start(Duration::from_secs(30));

    host.poll(&table, &tracking);
    table.advance(30);
    host.timeout(&tracking);
    table.advance(30);
    let report = host.poll(&table, &tracking);

    assert_eq!(report.get(1).unwrap().bitrate_in, 8_000.0);
}

/// With timestamp tracking a timed-out cycle simply widens the interval.
#[test]
fn timeout_keeps_baseline_with_timestamps() {
    let mut table = interface_table(TableKind::IfTable, 1);
    let mut host = TestHost::new(TableKind::IfTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    let before = host.snapshots.clone();
    table.advance(30);
    host.timeout(&tracking);
    assert_eq!(host.snapshots, before);

    table.advance(30);
    let report = host.poll(&table, &tracking);
    assert_eq!(report.get(1).unwrap().bitrate_in, 8_000.0);
}

/// A gap longer than max_delta restarts the measurement.
#[test]
fn gap_above_max_delta() {
    let config = CycleConfig {
        rate: RateConfig::builder()
            .max_delta(Duration::from_secs(120))
            .build()
            .unwrap(),
        table: TableKind::IfXTable,
    };
    let mut table = interface_table(TableKind::IfXTable, 1);
    let mut host = TestHost::with_config(config);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    table.advance(300);
    assert_eq!(host.poll(&table, &tracking).get(1).unwrap().bitrate_in, SENTINEL);

    table.advance(60);
    assert_eq!(host.poll(&table, &tracking).get(1).unwrap().bitrate_in, 8_000.0);
}

/// Polls closer than min_delta keep the older baseline.
#[test]
fn fast_repoll_keeps_baseline() {
    let mut table = interface_table(TableKind::IfXTable, 1);
    let mut host = TestHost::new(TableKind::IfXTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    table.advance(2);
    assert_eq!(host.poll(&table, &tracking).get(1).unwrap().bitrate_in, SENTINEL);

    table.advance(28);
    assert_eq!(host.poll(&table, &tracking).get(1).unwrap().bitrate_in, 8_000.0);
}

/// One corrupt stored snapshot does not disturb the rest of the table.
#[test]
fn corrupt_snapshot_is_isolated() {
    let mut table = interface_table(TableKind::IfXTable, 3);
    let mut host = TestHost::new(TableKind::IfXTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    host.snapshots.insert(2, "BitrateIn=garbage".to_string());
    table.advance(30);
    let report = host.poll(&table, &tracking);

    assert_eq!(report.forwarded(), 1);
    assert_eq!(report.get(2).unwrap().outcome, RowOutcome::Forwarded);
    assert_eq!(host.snapshots[&2], "BitrateIn=garbage");
    assert_eq!(report.get(1).unwrap().bitrate_in, 8_000.0);
    assert_eq!(report.get(3).unwrap().bitrate_in, 24_000.0);
}

/// Snapshots written for one table width are rejected by the other.
#[test]
fn snapshot_from_other_table_is_forwarded() {
    let table32 = interface_table(TableKind::IfTable, 1);
    let mut host32 = TestHost::new(TableKind::IfTable);
    host32.poll(&table32, &DeltaTracking::default());

    let mut table64 = interface_table(TableKind::IfXTable, 1);
    table64.advance(30);
    let mut host64 = TestHost::new(TableKind::IfXTable);
    host64.snapshots = host32.snapshots.clone();
    let report = host64.poll(&table64, &DeltaTracking::default());

    assert_eq!(report.get(1).unwrap().outcome, RowOutcome::Forwarded);
}

/// A well-formed snapshot whose baseline cannot fit the counter width is
/// forwarded without disturbing the other rows.
#[test]
fn out_of_range_baseline_is_isolated() {
    let mut table = interface_table(TableKind::IfTable, 3);
    let mut host = TestHost::new(TableKind::IfTable);
    let tracking = DeltaTracking::since_last_poll();

    host.poll(&table, &tracking);
    let stored = host.snapshots[&2].replacen(r#""value":0"#, r#""value":10000000000"#, 1);
    assert_ne!(stored, host.snapshots[&2]);
    host.snapshots.insert(2, stored.clone());

    table.advance(30);
    let report = host.poll(&table, &tracking);

    assert_eq!(report.forwarded(), 1);
    assert_eq!(report.get(2).unwrap().outcome, RowOutcome::Forwarded);
    assert_eq!(report.get(2).unwrap().bitrate_in, SENTINEL);
    assert_eq!(host.snapshots[&2], stored);
    assert_eq!(report.get(1).unwrap().bitrate_in, 8_000.0);
    assert_eq!(report.get(3).unwrap().bitrate_in, 24_000.0);
}
