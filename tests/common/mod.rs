//! Shared test infrastructure for snmp-ifrate.
//!
//! Provides a simulated interface table and a host loop that threads
//! snapshots between polling cycles.

// Allow dead code and unused imports since not all test files use all utilities
#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;
pub mod host;

pub use fixtures::{SimulatedInterface, SimulatedTable, epoch, interface_table};
pub use host::TestHost;

/// Assert two floats agree to within 1e-9 relative error.
#[track_caller]
pub fn assert_close(actual: f64, expected: f64) {
    let tolerance = expected.abs().max(1.0) * 1e-9;
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected}, got {actual}"
    );
}
