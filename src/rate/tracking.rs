//! Delta tracking policy.
//!
//! Decides how the elapsed time between two samples is measured. The method
//! is a process-wide setting owned by the host; it is handed to every
//! calculation explicitly through a [`DeltaTracking`] value built once per
//! polling cycle.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::sample::CounterSample;

/// How elapsed time between samples is measured.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationMethod {
    /// Difference between the capture timestamps of the two samples.
    #[default]
    SinceLastPoll,
    /// Time between poll-group starts as reported by the host, accumulated
    /// across cycles that produced no sample.
    SinceGroupStart,
}

impl CalculationMethod {
    /// Create from the host's raw parameter value (1 or 2).
    pub fn from_i32(value: i32) -> Self {
        match value {
            1 => Self::SinceLastPoll,
            2 => Self::SinceGroupStart,
            other => {
                tracing::warn!(target: "snmp_ifrate::rate", { method = other }, "unknown rate calculation method, using since-last-poll");
                Self::SinceLastPoll
            }
        }
    }

    /// Convert to the host's raw parameter value.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::SinceLastPoll => 1,
            Self::SinceGroupStart => 2,
        }
    }
}

/// Elapsed-time source for one polling cycle.
///
/// # Examples
///
/// ```
/// use snmp_ifrate::{CalculationMethod, DeltaTracking};
/// use std::time::Duration;
///
/// // Timestamps decide
/// let tracking = DeltaTracking::since_last_poll();
/// assert_eq!(tracking.method(), CalculationMethod::SinceLastPoll);
///
/// // Host reports 30s between group executions
/// let tracking = DeltaTracking::since_group_start(Duration::from_secs(30));
/// assert_eq!(tracking.group_delta(), Some(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeltaTracking {
    method: CalculationMethod,
    group_delta: Option<Duration>,
}

/// Outcome of measuring the time between a baseline and a new sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Elapsed {
    Forward(Duration),
    /// The new sample predates the baseline (clock stepped backwards).
    Backward,
}

impl DeltaTracking {
    /// Build from the process-wide method and the host-reported group delta.
    ///
    /// `group_delta` is ignored by [`CalculationMethod::SinceLastPoll`].
    pub fn new(method: CalculationMethod, group_delta: Option<Duration>) -> Self {
        Self {
            method,
            group_delta,
        }
    }

    /// Measure elapsed time from sample timestamps.
    pub fn since_last_poll() -> Self {
        Self::new(CalculationMethod::SinceLastPoll, None)
    }

    /// Measure elapsed time from the host's group execution delta.
    pub fn since_group_start(group_delta: Duration) -> Self {
        Self::new(CalculationMethod::SinceGroupStart, Some(group_delta))
    }

    pub fn method(&self) -> CalculationMethod {
        self.method
    }

    pub fn group_delta(&self) -> Option<Duration> {
        self.group_delta
    }

    /// Elapsed time between `baseline` and `sample`.
    ///
    /// `buffered` is the group time accumulated since the baseline was taken
    /// by cycles that did not produce a rate.
    pub(crate) fn elapsed(
        &self,
        baseline: &CounterSample,
        sample: &CounterSample,
        buffered: Duration,
    ) -> Elapsed {
        match (self.method, self.group_delta) {
            (CalculationMethod::SinceGroupStart, Some(delta)) => {
                Elapsed::Forward(buffered.saturating_add(delta))
            }
            (method, _) => {
                if method == CalculationMethod::SinceGroupStart {
                    tracing::trace!(target: "snmp_ifrate::rate", "no group delta reported, falling back to timestamps");
                }
                (sample.timestamp - baseline.timestamp)
                    .to_std()
                    .map_or(Elapsed::Backward, Elapsed::Forward)
            }
        }
    }

    /// Group time to carry forward when this cycle produced no rate.
    pub(crate) fn buffer(&self, buffered: Duration) -> Duration {
        match (self.method, self.group_delta) {
            (CalculationMethod::SinceGroupStart, Some(delta)) => buffered.saturating_add(delta),
            _ => buffered,
        }
    }
}
