//! Error types for snmp-ifrate.
//!
//! Numeric edge cases (wraparound, gaps, unknown duplex, invalid speed) are
//! never errors: they resolve to the [`SENTINEL`](crate::SENTINEL) rate.
//! [`Error`] only covers configuration validation and decoding of persisted
//! snapshots.
//!
//! # Handling a bad snapshot
//!
//! ```
//! use snmp_ifrate::{CounterWidth, Error, RateConfig, RateState};
//!
//! let config = RateConfig::default();
//! match RateState::from_snapshot("{not json", &config, CounterWidth::Bits32) {
//!     Err(Error::MalformedSnapshot { .. }) => {
//!         // forward the stored text unchanged and try again next cycle
//!     }
//!     other => panic!("unexpected: {:?}", other),
//! }
//! ```

use crate::sample::CounterWidth;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for snapshot decoding and configuration.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Snapshot text is not valid JSON or does not have the expected shape.
    #[error("malformed rate snapshot: {source}")]
    MalformedSnapshot {
        #[source]
        source: serde_json::Error,
    },

    /// Snapshot was written by an incompatible encoder.
    #[error("unsupported snapshot version {found} (supported: {supported})")]
    UnsupportedSnapshotVersion { found: u32, supported: u32 },

    /// Snapshot baseline was recorded for a different counter width.
    #[error("snapshot holds {found} counters, expected {expected}")]
    CounterWidthMismatch {
        expected: CounterWidth,
        found: CounterWidth,
    },

    /// Snapshot baseline value cannot be held by the snapshot's counter width.
    #[error("snapshot baseline {value} does not fit a {width}")]
    BaselineOutOfRange { value: u64, width: CounterWidth },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(Box<str>),
}

impl Error {
    /// Whether the error came from decoding a persisted snapshot.
    ///
    /// The cycle processor treats these as per-interface failures and keeps
    /// processing the rest of the batch.
    pub fn is_snapshot_error(&self) -> bool {
        matches!(
            self,
            Self::MalformedSnapshot { .. }
                | Self::UnsupportedSnapshotVersion { .. }
                | Self::CounterWidthMismatch { .. }
                | Self::BaselineOutOfRange { .. }
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::MalformedSnapshot { source }
    }
}
