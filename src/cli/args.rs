//! Command-line argument structures for the `ifrate` tool.

use chrono::{DateTime, Utc};
use clap::{Parser, ValueEnum};
use std::time::Duration;

use crate::error::Result;
use crate::rate::{DEFAULT_MAX_DELTA, DEFAULT_MIN_DELTA, DeltaTracking, RateBase, RateConfig};
use crate::sample::CounterWidth;
use crate::utilization::DuplexStatus;

/// Counter width for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum WidthArg {
    /// Counter32 (`ifInOctets`)
    #[value(name = "32")]
    Bits32,
    /// Counter64 (`ifHCInOctets`, default)
    #[default]
    #[value(name = "64")]
    Bits64,
}

impl From<WidthArg> for CounterWidth {
    fn from(w: WidthArg) -> Self {
        match w {
            WidthArg::Bits32 => CounterWidth::Bits32,
            WidthArg::Bits64 => CounterWidth::Bits64,
        }
    }
}

/// Rate unit for CLI argument parsing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RateBaseArg {
    #[default]
    Second,
    Minute,
    Hour,
    Day,
}

impl From<RateBaseArg> for RateBase {
    fn from(b: RateBaseArg) -> Self {
        match b {
            RateBaseArg::Second => RateBase::Second,
            RateBaseArg::Minute => RateBase::Minute,
            RateBaseArg::Hour => RateBase::Hour,
            RateBaseArg::Day => RateBase::Day,
        }
    }
}

/// Duplex status for CLI argument parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DuplexArg {
    Half,
    Full,
    Unknown,
    NotInitialized,
}

impl From<DuplexArg> for DuplexStatus {
    fn from(d: DuplexArg) -> Self {
        match d {
            DuplexArg::Half => DuplexStatus::HalfDuplex,
            DuplexArg::Full => DuplexStatus::FullDuplex,
            DuplexArg::Unknown => DuplexStatus::Unknown,
            DuplexArg::NotInitialized => DuplexStatus::NotInitialized,
        }
    }
}

/// Arguments for a single rate calculation.
#[derive(Debug, Parser)]
pub struct RateArgs {
    /// Counter width: 32 or 64.
    #[arg(short = 'w', long = "width", default_value = "64")]
    pub width: WidthArg,

    /// Current raw counter value.
    #[arg(short = 'n', long = "value")]
    pub value: u64,

    /// Snapshot printed by the previous invocation (empty on first poll).
    #[arg(short = 's', long = "snapshot", default_value = "")]
    pub snapshot: String,

    /// Capture time as RFC 3339 (default: now).
    #[arg(short = 't', long = "timestamp")]
    pub timestamp: Option<DateTime<Utc>>,

    /// Minimum accepted seconds between samples.
    #[arg(long = "min-delta", default_value_t = DEFAULT_MIN_DELTA.as_secs())]
    pub min_delta: u64,

    /// Maximum accepted seconds between samples.
    #[arg(long = "max-delta", default_value_t = DEFAULT_MAX_DELTA.as_secs())]
    pub max_delta: u64,

    /// Rate unit: second, minute, hour, or day.
    #[arg(long = "rate-base", default_value = "second")]
    pub rate_base: RateBaseArg,

    /// Poll-group delta in seconds; measures elapsed time since group start.
    #[arg(long = "group-delta")]
    pub group_delta: Option<f64>,
}

impl RateArgs {
    /// Build and validate the rate configuration.
    pub fn rate_config(&self) -> Result<RateConfig> {
        RateConfig::builder()
            .min_delta(Duration::from_secs(self.min_delta))
            .max_delta(Duration::from_secs(self.max_delta))
            .rate_base(self.rate_base.into())
            .build()
    }

    /// Elapsed-time policy selected by `--group-delta`.
    pub fn tracking(&self) -> DeltaTracking {
        self.group_delta
            .and_then(|secs| Duration::try_from_secs_f64(secs).ok())
            .map_or_else(DeltaTracking::since_last_poll, DeltaTracking::since_group_start)
    }

    /// Capture time, defaulting to now.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or_else(Utc::now)
    }
}

/// Arguments for a utilization calculation.
#[derive(Debug, Parser)]
pub struct UtilizationArgs {
    /// Received bit rate.
    #[arg(short = 'i', long = "input", allow_negative_numbers = true)]
    pub input: f64,

    /// Transmitted bit rate.
    #[arg(short = 'o', long = "output", allow_negative_numbers = true)]
    pub output: f64,

    /// Interface speed in bit/s.
    #[arg(short = 'S', long = "speed", allow_negative_numbers = true)]
    pub speed: f64,

    /// Duplex mode: half, full, unknown, or not-initialized.
    #[arg(long = "duplex", default_value = "full")]
    pub duplex: DuplexArg,
}

/// Arguments for a discontinuity check.
#[derive(Debug, Parser)]
pub struct DiscontinuityArgs {
    /// Marker reported by the device this cycle.
    #[arg(long = "current", default_value = "")]
    pub current: String,

    /// Marker recorded in the previous cycle.
    #[arg(long = "previous", default_value = "")]
    pub previous: String,
}

/// Logging arguments shared by all subcommands.
#[derive(Debug, Parser)]
pub struct OutputArgs {
    /// Enable debug logging (snmp_ifrate=debug).
    #[arg(short = 'd', long = "debug", global = true)]
    pub debug: bool,

    /// Enable trace logging (snmp_ifrate=trace).
    #[arg(short = 'D', long = "trace", global = true)]
    pub trace: bool,
}

impl OutputArgs {
    fn filter(&self) -> &'static str {
        if self.trace {
            "snmp_ifrate=trace"
        } else if self.debug {
            "snmp_ifrate=debug"
        } else {
            "snmp_ifrate=warn"
        }
    }

    /// Initialize tracing based on debug/trace flags.
    pub fn init_tracing(&self) {
        use tracing_subscriber::EnvFilter;

        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(self.filter()))
            .with_writer(std::io::stderr)
            .try_init();
    }
}
