//! # snmp-ifrate
//!
//! Post-processing of polled SNMP interface counters into rates and
//! utilization.
//!
//! ## Features
//!
//! - Wrap-aware rates for Counter32 and Counter64 octet counters
//! - Minimum/maximum sample spacing with baseline handling
//! - Two elapsed-time policies: sample timestamps or poll-group deltas
//! - Discontinuity and agent-restart detection
//! - Duplex-aware utilization for `ifTable` and `ifXTable`
//! - Versioned text snapshots so state survives between polling cycles
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::{TimeDelta, Utc};
//! use snmp_ifrate::{CounterWidth, DeltaTracking, RateConfig, SENTINEL, calculate_rate};
//!
//! let config = RateConfig::default();
//! let tracking = DeltaTracking::since_last_poll();
//! let t0 = Utc::now();
//!
//! // First poll only stores the baseline
//! let (rate, snapshot) =
//!     calculate_rate("", 4_294_967_000, t0, &config, CounterWidth::Bits32, &tracking)?;
//! assert_eq!(rate, SENTINEL);
//!
//! // 30s later the counter has wrapped
//! let (rate, _snapshot) = calculate_rate(
//!     &snapshot,
//!     2_704,
//!     t0 + TimeDelta::seconds(30),
//!     &config,
//!     CounterWidth::Bits32,
//!     &tracking,
//! )?;
//! assert_eq!(rate, 100.0);
//! # Ok::<(), snmp_ifrate::Error>(())
//! ```
//!
//! Whole tables are processed with [`CycleProcessor`].

pub mod cycle;
pub mod discontinuity;
pub mod error;
pub mod interface;
pub mod prelude;
pub mod rate;
pub mod sample;
pub mod snapshot;
pub mod state;
pub mod utilization;

#[cfg(feature = "cli")]
pub mod cli;

/// Value reported when no rate or utilization can be computed.
pub const SENTINEL: f64 = -1.0;

// Re-exports for convenience
pub use cycle::{
    CycleConfig, CycleProcessor, CycleReport, IfIndex, InterfaceRates, InterfaceRow, PollBatch,
    RowOutcome,
};
pub use discontinuity::has_discontinuity;
pub use error::{Error, Result};
pub use interface::{TableKind, to_bitrate};
pub use rate::{
    CalculationMethod, DeltaTracking, RateBase, RateCalculator, RateConfig, RateConfigBuilder,
    calculate_rate,
};
pub use sample::{CounterSample, CounterWidth};
pub use snapshot::SNAPSHOT_VERSION;
pub use state::RateState;
pub use utilization::{DuplexStatus, calculate_utilization};
