//! Snapshot wire format.
//!
//! Rate state is persisted by the host between polling cycles as text. The
//! encoding is JSON with an explicit `version` field:
//!
//! ```text
//! {"version":1,
//!  "bitrate_in":{"width":32,"baseline":{"value":1200,"timestamp":"2024-05-01T10:00:00Z"}},
//!  "bitrate_out":{"width":32,"buffered":{"secs":30,"nanos":0}},
//!  "discontinuity":"8421"}
//! ```
//!
//! Absent `baseline` means "no sample yet"; absent `buffered` means zero.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sample::{CounterSample, CounterWidth};

/// Version written by this encoder and the only version accepted on decode.
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    version: u32,
    #[serde(flatten)]
    body: T,
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

/// Persisted form of one rate calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RateRecord {
    pub width: CounterWidth,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<CounterSample>,
    #[serde(default, skip_serializing_if = "Duration::is_zero")]
    pub buffered: Duration,
}

/// Persisted form of an interface's in/out pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StateRecord {
    pub bitrate_in: RateRecord,
    pub bitrate_out: RateRecord,
    #[serde(default)]
    pub discontinuity: String,
}

/// Whether `text` carries no state at all.
pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

pub(crate) fn encode<T: Serialize>(body: &T) -> Result<String> {
    let envelope = Envelope {
        version: SNAPSHOT_VERSION,
        body,
    };
    Ok(serde_json::to_string(&envelope)?)
}

pub(crate) fn decode<T: DeserializeOwned>(text: &str) -> Result<T> {
    let probe: VersionProbe = serde_json::from_str(text)?;
    if probe.version != SNAPSHOT_VERSION {
        return Err(Error::UnsupportedSnapshotVersion {
            found: probe.version,
            supported: SNAPSHOT_VERSION,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(text)?;
    Ok(envelope.body)
}
