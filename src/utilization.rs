//! Link utilization.
//!
//! Combines the in and out bitrates of an interface with its speed and
//! duplex mode. Rates and speed must share a unit.

use serde::{Deserialize, Serialize};

use crate::SENTINEL;

/// MAC operating mode (EtherLike-MIB `dot3StatsDuplexStatus`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplexStatus {
    /// No duplex information for the interface.
    #[default]
    NotInitialized,
    /// Agent reports the mode as unknown (1).
    Unknown,
    /// Half duplex (2): both directions share one channel.
    HalfDuplex,
    /// Full duplex (3): independent channels per direction.
    FullDuplex,
}

impl DuplexStatus {
    /// Create from the raw `dot3StatsDuplexStatus` value.
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::Unknown,
            2 => Self::HalfDuplex,
            3 => Self::FullDuplex,
            other => {
                tracing::warn!(target: "snmp_ifrate::utilization", { duplex_status = other }, "unknown duplex status");
                Self::Unknown
            }
        }
    }
}

impl std::fmt::Display for DuplexStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotInitialized => write!(f, "notInitialized"),
            Self::Unknown => write!(f, "unknown"),
            Self::HalfDuplex => write!(f, "halfDuplex"),
            Self::FullDuplex => write!(f, "fullDuplex"),
        }
    }
}

/// Interface utilization in percent.
///
/// Returns [`SENTINEL`] when either rate is negative (including the
/// sentinel itself), the speed is not positive, any input is NaN, or the
/// duplex mode is not known.
///
/// ```
/// use snmp_ifrate::{DuplexStatus, calculate_utilization};
///
/// assert_eq!(calculate_utilization(1500.0, 2000.0, 5000.0, DuplexStatus::HalfDuplex), 70.0);
/// assert_eq!(calculate_utilization(1500.0, 2000.0, 5000.0, DuplexStatus::FullDuplex), 40.0);
/// assert_eq!(calculate_utilization(-1.0, 2000.0, 5000.0, DuplexStatus::FullDuplex), -1.0);
/// ```
pub fn calculate_utilization(
    input_rate: f64,
    output_rate: f64,
    interface_speed: f64,
    duplex_status: DuplexStatus,
) -> f64 {
    let invalid_rate = |rate: f64| rate.is_nan() || rate < 0.0;
    if invalid_rate(input_rate)
        || invalid_rate(output_rate)
        || interface_speed.is_nan()
        || interface_speed <= 0.0
    {
        return SENTINEL;
    }

    match duplex_status {
        DuplexStatus::HalfDuplex => (input_rate + output_rate) * 100.0 / interface_speed,
        DuplexStatus::FullDuplex => input_rate.max(output_rate) * 100.0 / interface_speed,
        DuplexStatus::NotInitialized | DuplexStatus::Unknown => SENTINEL,
    }
}
