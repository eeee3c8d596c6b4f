//! IF-MIB table conventions.
//!
//! Octet counters and interface speed are reported differently by `ifTable`
//! (RFC 1213) and `ifXTable` (RFC 2863). [`TableKind`] captures those
//! differences so the cycle processor can treat both tables alike.

use serde::{Deserialize, Serialize};

use crate::SENTINEL;
use crate::sample::CounterWidth;

/// Speed above which RFC 2863 requires 64-bit octet counters (20 Mbit/s).
pub const HIGH_CAPACITY_THRESHOLD_BPS: f64 = 20_000_000.0;

/// `ifSpeed` value meaning "faster than a Gauge32 can express".
pub const IF_SPEED_SATURATED: u32 = u32::MAX;

const BITS_PER_OCTET: f64 = 8.0;
const BPS_PER_MBPS: f64 = 1_000_000.0;

/// Source table of an interface's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableKind {
    /// `ifInOctets`/`ifOutOctets` (Counter32) with `ifSpeed` in bit/s.
    #[default]
    IfTable,
    /// `ifHCInOctets`/`ifHCOutOctets` (Counter64) with `ifHighSpeed` in Mbit/s.
    IfXTable,
}

impl TableKind {
    /// Width of the octet counters in this table.
    pub fn counter_width(self) -> CounterWidth {
        match self {
            Self::IfTable => CounterWidth::Bits32,
            Self::IfXTable => CounterWidth::Bits64,
        }
    }

    /// Interface speed in bit/s from the table's raw speed column.
    ///
    /// A saturated `ifSpeed` maps to [`SENTINEL`] so utilization is reported
    /// as unavailable rather than computed against a wrong speed.
    ///
    /// ```
    /// use snmp_ifrate::TableKind;
    ///
    /// assert_eq!(TableKind::IfTable.speed_bps(100_000_000), 100_000_000.0);
    /// assert_eq!(TableKind::IfTable.speed_bps(u32::MAX), -1.0);
    /// assert_eq!(TableKind::IfXTable.speed_bps(10_000), 10_000_000_000.0);
    /// ```
    pub fn speed_bps(self, raw_speed: u32) -> f64 {
        match self {
            Self::IfTable if raw_speed == IF_SPEED_SATURATED => SENTINEL,
            Self::IfTable => f64::from(raw_speed),
            Self::IfXTable => f64::from(raw_speed) * BPS_PER_MBPS,
        }
    }

    /// Table whose octet counters should be used for an interface, given its
    /// raw `ifSpeed`, when both tables are available.
    ///
    /// A saturated `ifSpeed` is above the threshold and selects `ifXTable`.
    pub fn preferred_for_if_speed(if_speed: u32) -> Self {
        if f64::from(if_speed) <= HIGH_CAPACITY_THRESHOLD_BPS {
            Self::IfTable
        } else {
            Self::IfXTable
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IfTable => write!(f, "ifTable"),
            Self::IfXTable => write!(f, "ifXTable"),
        }
    }
}

/// Convert an octet rate to a bit rate.
///
/// Only positive rates are scaled; zero and the sentinel pass through.
pub fn to_bitrate(octet_rate: f64) -> f64 {
    if octet_rate > 0.0 {
        octet_rate * BITS_PER_OCTET
    } else {
        octet_rate
    }
}
