//! Delta-based rate calculation.
//!
//! A [`RateCalculator`] keeps the last accepted [`CounterSample`] of one
//! counter and turns each new sample into a rate:
//!
//! - no baseline yet: the sample becomes the baseline, rate is [`SENTINEL`]
//! - elapsed below `min_delta`: [`SENTINEL`], baseline kept
//! - elapsed above `max_delta` (or negative): [`SENTINEL`], baseline reset to the sample
//! - otherwise: `delta / elapsed` scaled to the [`RateBase`], wrap-aware
//!
//! # Example
//!
//! ```
//! use chrono::{TimeDelta, Utc};
//! use snmp_ifrate::{CounterSample, CounterWidth, DeltaTracking, RateCalculator, RateConfig, SENTINEL};
//!
//! let tracking = DeltaTracking::since_last_poll();
//! let mut rate = RateCalculator::new(RateConfig::default(), CounterWidth::Bits32);
//!
//! let t0 = Utc::now();
//! assert_eq!(rate.calculate(CounterSample::new(1_000, t0), &tracking), SENTINEL);
//!
//! let t1 = t0 + TimeDelta::seconds(10);
//! assert_eq!(rate.calculate(CounterSample::new(6_000, t1), &tracking), 500.0);
//! ```

pub mod tracking;

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::SENTINEL;
use crate::error::{Error, Result};
use crate::sample::{CounterSample, CounterWidth};
use crate::snapshot::{self, RateRecord};

pub use tracking::{CalculationMethod, DeltaTracking};
use tracking::Elapsed;

/// Default minimum accepted time between samples (5 seconds).
pub const DEFAULT_MIN_DELTA: Duration = Duration::from_secs(5);

/// Default maximum accepted time between samples (10 minutes).
pub const DEFAULT_MAX_DELTA: Duration = Duration::from_secs(600);

/// Time unit rates are normalised to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateBase {
    /// Units per second (default).
    #[default]
    Second,
    /// Units per minute.
    Minute,
    /// Units per hour.
    Hour,
    /// Units per day.
    Day,
}

impl RateBase {
    /// Length of the unit in seconds.
    pub fn seconds(self) -> f64 {
        match self {
            Self::Second => 1.0,
            Self::Minute => 60.0,
            Self::Hour => 3_600.0,
            Self::Day => 86_400.0,
        }
    }
}

/// Accepted sample spacing and output unit for rate calculation.
///
/// # Examples
///
/// ```
/// use snmp_ifrate::{RateBase, RateConfig};
/// use std::time::Duration;
///
/// let config = RateConfig::builder()
///     .min_delta(Duration::from_secs(1))
///     .max_delta(Duration::from_secs(300))
///     .rate_base(RateBase::Minute)
///     .build()
///     .unwrap();
/// assert_eq!(config.rate_base, RateBase::Minute);
///
/// // Inverted window is rejected
/// assert!(RateConfig::builder()
///     .min_delta(Duration::from_secs(60))
///     .max_delta(Duration::from_secs(30))
///     .build()
///     .is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Samples closer together than this are treated as noise.
    pub min_delta: Duration,
    /// Samples further apart than this restart the baseline.
    pub max_delta: Duration,
    /// Unit of the produced rate.
    #[serde(default)]
    pub rate_base: RateBase,
}

impl Default for RateConfig {
    fn default() -> Self {
        Self {
            min_delta: DEFAULT_MIN_DELTA,
            max_delta: DEFAULT_MAX_DELTA,
            rate_base: RateBase::Second,
        }
    }
}

impl RateConfig {
    /// Start building a configuration from the defaults.
    pub fn builder() -> RateConfigBuilder {
        RateConfigBuilder {
            config: Self::default(),
        }
    }

    /// Check that the accepted window is usable.
    pub fn validate(&self) -> Result<()> {
        if self.max_delta.is_zero() {
            return Err(Error::Config("max_delta must be greater than zero".into()));
        }
        if self.min_delta > self.max_delta {
            return Err(Error::Config(
                format!(
                    "min_delta {:?} exceeds max_delta {:?}",
                    self.min_delta, self.max_delta
                )
                .into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`RateConfig`].
#[derive(Debug, Clone)]
pub struct RateConfigBuilder {
    config: RateConfig,
}

impl RateConfigBuilder {
    /// Set the minimum accepted elapsed time (default: 5 seconds).
    pub fn min_delta(mut self, delta: Duration) -> Self {
        self.config.min_delta = delta;
        self
    }

    /// Set the maximum accepted elapsed time (default: 10 minutes).
    pub fn max_delta(mut self, delta: Duration) -> Self {
        self.config.max_delta = delta;
        self
    }

    /// Set the rate unit (default: per second).
    pub fn rate_base(mut self, base: RateBase) -> Self {
        self.config.rate_base = base;
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> Result<RateConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

/// Rate calculator for a single wrapping counter.
#[derive(Debug, Clone, PartialEq)]
pub struct RateCalculator {
    config: RateConfig,
    width: CounterWidth,
    baseline: Option<CounterSample>,
    buffered: Duration,
}

impl RateCalculator {
    /// Create a calculator with no baseline.
    pub fn new(config: RateConfig, width: CounterWidth) -> Self {
        Self {
            config,
            width,
            baseline: None,
            buffered: Duration::ZERO,
        }
    }

    /// Restore a calculator from its snapshot text.
    ///
    /// Blank text yields a calculator with no baseline. The configuration is
    /// not part of the snapshot; the caller supplies it every cycle.
    pub fn from_snapshot(text: &str, config: &RateConfig, width: CounterWidth) -> Result<Self> {
        if snapshot::is_blank(text) {
            return Ok(Self::new(*config, width));
        }
        let record: RateRecord = snapshot::decode(text)?;
        Self::from_record(record, config, width)
    }

    /// Encode the calculator's baseline for persistence.
    pub fn to_snapshot(&self) -> Result<String> {
        snapshot::encode(&self.to_record())
    }

    pub(crate) fn from_record(
        record: RateRecord,
        config: &RateConfig,
        width: CounterWidth,
    ) -> Result<Self> {
        if record.width != width {
            return Err(Error::CounterWidthMismatch {
                expected: width,
                found: record.width,
            });
        }
        if let Some(baseline) = record.baseline.filter(|b| !width.contains(b.value)) {
            return Err(Error::BaselineOutOfRange {
                value: baseline.value,
                width,
            });
        }
        Ok(Self {
            config: *config,
            width,
            baseline: record.baseline,
            buffered: record.buffered,
        })
    }

    pub(crate) fn to_record(&self) -> RateRecord {
        RateRecord {
            width: self.width,
            baseline: self.baseline,
            buffered: self.buffered,
        }
    }

    pub fn config(&self) -> &RateConfig {
        &self.config
    }

    pub fn width(&self) -> CounterWidth {
        self.width
    }

    /// Last accepted sample, if any.
    pub fn baseline(&self) -> Option<&CounterSample> {
        self.baseline.as_ref()
    }

    /// Group time accumulated since the baseline without producing a rate.
    pub fn buffered(&self) -> Duration {
        self.buffered
    }

    /// Drop the baseline; the next sample starts a new measurement.
    pub fn reset(&mut self) {
        self.baseline = None;
        self.buffered = Duration::ZERO;
    }

    fn restart_from(&mut self, sample: CounterSample) {
        self.baseline = Some(sample);
        self.buffered = Duration::ZERO;
    }

    /// Feed a new sample and return the rate since the baseline.
    ///
    /// Returns [`SENTINEL`] when no rate can be computed this cycle.
    pub fn calculate(&mut self, sample: CounterSample, tracking: &DeltaTracking) -> f64 {
        if !self.width.contains(sample.value) {
            tracing::warn!(target: "snmp_ifrate::rate", { value = sample.value, width = %self.width }, "counter value out of range for width");
            return SENTINEL;
        }

        let Some(baseline) = self.baseline else {
            tracing::trace!(target: "snmp_ifrate::rate", { value = sample.value }, "no baseline, storing first sample");
            self.restart_from(sample);
            return SENTINEL;
        };

        let elapsed = match tracking.elapsed(&baseline, &sample, self.buffered) {
            Elapsed::Forward(elapsed) => elapsed,
            Elapsed::Backward => {
                tracing::debug!(target: "snmp_ifrate::rate", { baseline = %baseline.timestamp, sample = %sample.timestamp }, "sample predates baseline, restarting");
                self.restart_from(sample);
                return SENTINEL;
            }
        };

        if elapsed.is_zero() || elapsed < self.config.min_delta {
            tracing::trace!(target: "snmp_ifrate::rate", { elapsed_ms = elapsed.as_millis() as u64 }, "elapsed below minimum, keeping baseline");
            self.buffered = tracking.buffer(self.buffered);
            return SENTINEL;
        }

        if elapsed > self.config.max_delta {
            tracing::debug!(target: "snmp_ifrate::rate", { elapsed_ms = elapsed.as_millis() as u64 }, "elapsed above maximum, restarting baseline");
            self.restart_from(sample);
            return SENTINEL;
        }

        let delta = self.width.delta(baseline.value, sample.value);
        self.restart_from(sample);

        delta as f64 / elapsed.as_secs_f64() * self.config.rate_base.seconds()
    }

    /// Carry the baseline through a cycle that produced no sample.
    ///
    /// The baseline is untouched; with [`CalculationMethod::SinceGroupStart`]
    /// the group delta is accumulated so the next rate spans the whole gap.
    pub fn buffer_delta(&mut self, tracking: &DeltaTracking) {
        self.buffered = tracking.buffer(self.buffered);
    }
}

/// One-shot rate calculation over snapshot text.
///
/// Restores the calculator from `previous_snapshot`, feeds it the new
/// counter value and returns the rate together with the snapshot to persist.
/// Fails on an invalid `config` or an unusable snapshot.
///
/// ```
/// use chrono::{TimeDelta, Utc};
/// use snmp_ifrate::{CounterWidth, DeltaTracking, RateConfig, SENTINEL, calculate_rate};
///
/// let config = RateConfig::default();
/// let tracking = DeltaTracking::since_last_poll();
/// let t0 = Utc::now();
///
/// let (rate, text) = calculate_rate("", 100, t0, &config, CounterWidth::Bits64, &tracking).unwrap();
/// assert_eq!(rate, SENTINEL);
///
/// let t1 = t0 + TimeDelta::seconds(20);
/// let (rate, _) = calculate_rate(&text, 300, t1, &config, CounterWidth::Bits64, &tracking).unwrap();
/// assert_eq!(rate, 10.0);
/// ```
pub fn calculate_rate(
    previous_snapshot: &str,
    value: u64,
    timestamp: DateTime<Utc>,
    config: &RateConfig,
    width: CounterWidth,
    tracking: &DeltaTracking,
) -> Result<(f64, String)> {
    config.validate()?;
    let mut calculator = RateCalculator::from_snapshot(previous_snapshot, config, width)?;
    let rate = calculator.calculate(CounterSample::new(value, timestamp), tracking);
    Ok((rate, calculator.to_snapshot()?))
}
