//! Raw counter samples.
//!
//! A [`CounterSample`] is one reading of a wrapping SNMP counter
//! (`ifInOctets`, `ifHCOutOctets`, ...) together with the instant it was
//! captured. [`CounterWidth`] fixes the wraparound modulus.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Bit width of a wrapping SNMP counter.
///
/// Counter32 wraps after `2^32 - 1`, Counter64 after `2^64 - 1` (RFC 2578).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CounterWidth {
    /// Counter32 (ifTable octet counters).
    Bits32,
    /// Counter64 (ifXTable high-capacity octet counters).
    Bits64,
}

impl CounterWidth {
    /// Number of bits in the counter.
    pub fn bits(self) -> u8 {
        match self {
            Self::Bits32 => 32,
            Self::Bits64 => 64,
        }
    }

    /// Largest value the counter can hold before wrapping to zero.
    pub fn max_value(self) -> u64 {
        match self {
            Self::Bits32 => u64::from(u32::MAX),
            Self::Bits64 => u64::MAX,
        }
    }

    /// Whether `value` is representable by a counter of this width.
    pub fn contains(self, value: u64) -> bool {
        value <= self.max_value()
    }

    /// Increase from `previous` to `current`, assuming at most one wrap.
    ///
    /// Both values must be representable by this width.
    ///
    /// ```
    /// use snmp_ifrate::CounterWidth;
    ///
    /// assert_eq!(CounterWidth::Bits32.delta(100, 250), 150);
    /// assert_eq!(CounterWidth::Bits32.delta(4_294_967_290, 5), 11);
    /// ```
    pub fn delta(self, previous: u64, current: u64) -> u64 {
        if current >= previous {
            current - previous
        } else {
            // (max + 1) - previous + current, ordered to stay within u64
            (self.max_value() - previous) + current + 1
        }
    }
}

impl std::fmt::Display for CounterWidth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bits32 => write!(f, "Counter32"),
            Self::Bits64 => write!(f, "Counter64"),
        }
    }
}

impl From<CounterWidth> for u8 {
    fn from(width: CounterWidth) -> Self {
        width.bits()
    }
}

impl TryFrom<u8> for CounterWidth {
    type Error = String;

    fn try_from(bits: u8) -> std::result::Result<Self, Self::Error> {
        match bits {
            32 => Ok(Self::Bits32),
            64 => Ok(Self::Bits64),
            other => Err(format!("unsupported counter width: {} bits", other)),
        }
    }
}

/// One reading of a wrapping counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CounterSample {
    /// Raw counter value as reported by the agent.
    pub value: u64,
    /// Instant the value was captured.
    pub timestamp: DateTime<Utc>,
}

impl CounterSample {
    /// Create a sample captured at `timestamp`.
    pub fn new(value: u64, timestamp: DateTime<Utc>) -> Self {
        Self { value, timestamp }
    }

    /// Create a sample captured now.
    ///
    /// ```
    /// use snmp_ifrate::CounterSample;
    ///
    /// let before = chrono::Utc::now();
    /// let sample = CounterSample::now(42);
    /// assert_eq!(sample.value, 42);
    /// assert!(sample.timestamp >= before);
    /// ```
    pub fn now(value: u64) -> Self {
        Self::new(value, Utc::now())
    }
}
