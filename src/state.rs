//! Per-interface rate state.
//!
//! [`RateState`] is what the host persists for each interface row between
//! polling cycles: the in and out calculators plus the last discontinuity
//! marker seen for the interface.

use crate::error::Result;
use crate::rate::{DeltaTracking, RateCalculator, RateConfig};
use crate::sample::CounterWidth;
use crate::snapshot::{self, StateRecord};

/// Rate calculators for both directions of one interface.
#[derive(Debug, Clone, PartialEq)]
pub struct RateState {
    /// Octet rate calculator for received traffic.
    pub bitrate_in: RateCalculator,
    /// Octet rate calculator for transmitted traffic.
    pub bitrate_out: RateCalculator,
    /// Discontinuity marker recorded in the previous cycle.
    pub previous_discontinuity: String,
}

impl RateState {
    /// Fresh state: no baselines, empty marker.
    pub fn new(config: &RateConfig, width: CounterWidth) -> Self {
        Self {
            bitrate_in: RateCalculator::new(*config, width),
            bitrate_out: RateCalculator::new(*config, width),
            previous_discontinuity: String::new(),
        }
    }

    /// Restore state from persisted snapshot text.
    ///
    /// Empty or whitespace-only text gives a fresh state.
    ///
    /// ```
    /// use snmp_ifrate::{CounterWidth, RateConfig, RateState};
    ///
    /// let config = RateConfig::default();
    /// let state = RateState::from_snapshot("", &config, CounterWidth::Bits64).unwrap();
    /// assert!(state.bitrate_in.baseline().is_none());
    /// assert!(state.previous_discontinuity.is_empty());
    ///
    /// let text = state.to_snapshot().unwrap();
    /// let restored = RateState::from_snapshot(&text, &config, CounterWidth::Bits64).unwrap();
    /// assert_eq!(restored, state);
    /// ```
    pub fn from_snapshot(text: &str, config: &RateConfig, width: CounterWidth) -> Result<Self> {
        if snapshot::is_blank(text) {
            return Ok(Self::new(config, width));
        }

        let record: StateRecord = snapshot::decode(text)?;
        Ok(Self {
            bitrate_in: RateCalculator::from_record(record.bitrate_in, config, width)?,
            bitrate_out: RateCalculator::from_record(record.bitrate_out, config, width)?,
            previous_discontinuity: record.discontinuity,
        })
    }

    /// Encode the state for persistence.
    pub fn to_snapshot(&self) -> Result<String> {
        snapshot::encode(&StateRecord {
            bitrate_in: self.bitrate_in.to_record(),
            bitrate_out: self.bitrate_out.to_record(),
            discontinuity: self.previous_discontinuity.clone(),
        })
    }

    /// Drop both baselines (counter reset or agent restart).
    pub fn reset_baselines(&mut self) {
        self.bitrate_in.reset();
        self.bitrate_out.reset();
    }

    /// Carry both baselines through a cycle without samples.
    pub fn buffer_delta(&mut self, tracking: &DeltaTracking) {
        self.bitrate_in.buffer_delta(tracking);
        self.bitrate_out.buffer_delta(tracking);
    }
}
