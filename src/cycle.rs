//! Polling cycle orchestration.
//!
//! Once per polling cycle the host hands over everything it fetched for one
//! interface table as a [`PollBatch`]. The [`CycleProcessor`] runs every row
//! through discontinuity detection, rate calculation and utilization, and
//! returns a [`CycleReport`] holding the values and snapshots to write back.
//!
//! A row whose stored snapshot cannot be decoded does not affect the other
//! rows: its snapshot is forwarded unchanged and its values are reported as
//! [`SENTINEL`].
//!
//! # Example
//!
//! ```
//! use chrono::{TimeDelta, Utc};
//! use snmp_ifrate::{
//!     CycleConfig, CycleProcessor, DeltaTracking, DuplexStatus, InterfaceRow, PollBatch,
//!     SENTINEL, TableKind,
//! };
//!
//! let processor = CycleProcessor::new(CycleConfig::for_table(TableKind::IfTable)).unwrap();
//! let tracking = DeltaTracking::since_last_poll();
//! let t0 = Utc::now();
//!
//! let mut batch = PollBatch::new(t0);
//! batch.insert_row(InterfaceRow::new(1, 0, 0, 1_000_000));
//! batch.insert_duplex(1, DuplexStatus::FullDuplex);
//! let report = processor.process(&batch, &tracking);
//! assert_eq!(report.get(1).unwrap().bitrate_in, SENTINEL);
//!
//! // Second poll 10s later: 12_500 octets/s in = 100 kbit/s = 10% of 1 Mbit/s
//! let mut batch = PollBatch::new(t0 + TimeDelta::seconds(10));
//! let mut row = InterfaceRow::new(1, 125_000, 0, 1_000_000);
//! row.snapshot = report.get(1).unwrap().snapshot.clone();
//! batch.insert_row(row);
//! batch.insert_duplex(1, DuplexStatus::FullDuplex);
//! let report = processor.process(&batch, &tracking);
//! assert_eq!(report.get(1).unwrap().bitrate_in, 100_000.0);
//! assert_eq!(report.get(1).unwrap().utilization, 10.0);
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::SENTINEL;
use crate::discontinuity::has_discontinuity;
use crate::error::Result;
use crate::interface::{TableKind, to_bitrate};
use crate::rate::{DeltaTracking, RateConfig};
use crate::sample::CounterSample;
use crate::state::RateState;
use crate::utilization::{DuplexStatus, calculate_utilization};

/// SNMP interface index (`ifIndex`), the key shared by all interface tables.
pub type IfIndex = u32;

/// Configuration for processing one interface table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Accepted sample spacing and rate unit.
    #[serde(default)]
    pub rate: RateConfig,
    /// Table the counters and speed come from.
    pub table: TableKind,
}

impl CycleConfig {
    /// Default rate settings for the given table.
    pub fn for_table(table: TableKind) -> Self {
        Self {
            rate: RateConfig::default(),
            table,
        }
    }
}

/// One interface row as fetched by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceRow {
    pub if_index: IfIndex,
    /// Raw received-octets counter.
    pub in_octets: u64,
    /// Raw transmitted-octets counter.
    pub out_octets: u64,
    /// Raw speed column (`ifSpeed` or `ifHighSpeed`, see [`TableKind`]).
    pub speed: u32,
    /// Device-reported discontinuity marker.
    pub discontinuity: String,
    /// Snapshot persisted by the previous cycle (empty on first poll).
    pub snapshot: String,
}

impl InterfaceRow {
    /// Row with empty discontinuity marker and no stored snapshot.
    pub fn new(if_index: IfIndex, in_octets: u64, out_octets: u64, speed: u32) -> Self {
        Self {
            if_index,
            in_octets,
            out_octets,
            speed,
            discontinuity: String::new(),
            snapshot: String::new(),
        }
    }
}

/// Everything fetched for one table in one polling cycle.
#[derive(Debug, Clone)]
pub struct PollBatch {
    polled_at: DateTime<Utc>,
    agent_restarted: bool,
    rows: IndexMap<IfIndex, InterfaceRow>,
    duplex: HashMap<IfIndex, DuplexStatus>,
}

impl PollBatch {
    /// Empty batch for counters captured at `polled_at`.
    pub fn new(polled_at: DateTime<Utc>) -> Self {
        Self {
            polled_at,
            agent_restarted: false,
            rows: IndexMap::new(),
            duplex: HashMap::new(),
        }
    }

    /// Flag that the agent restarted since the previous cycle.
    pub fn set_agent_restarted(&mut self, restarted: bool) {
        self.agent_restarted = restarted;
    }

    /// Add a row, replacing any earlier row with the same index.
    pub fn insert_row(&mut self, row: InterfaceRow) {
        self.rows.insert(row.if_index, row);
    }

    /// Record the companion duplex-table value for an interface.
    pub fn insert_duplex(&mut self, if_index: IfIndex, status: DuplexStatus) {
        self.duplex.insert(if_index, status);
    }

    pub fn polled_at(&self) -> DateTime<Utc> {
        self.polled_at
    }

    pub fn agent_restarted(&self) -> bool {
        self.agent_restarted
    }

    pub fn rows(&self) -> impl Iterator<Item = &InterfaceRow> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Duplex status for an interface; `NotInitialized` without a duplex row.
    pub fn duplex(&self, if_index: IfIndex) -> DuplexStatus {
        self.duplex.get(&if_index).copied().unwrap_or_default()
    }
}

impl Extend<InterfaceRow> for PollBatch {
    fn extend<I: IntoIterator<Item = InterfaceRow>>(&mut self, rows: I) {
        for row in rows {
            self.insert_row(row);
        }
    }
}

/// How a row's values were produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowOutcome {
    /// Rates were calculated from the stored baselines.
    Calculated,
    /// Baselines were discarded (discontinuity or agent restart).
    Reset,
    /// Stored snapshot was unusable and forwarded unchanged.
    Forwarded,
}

/// Values to write back for one interface.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceRates {
    /// Received bit rate in bits per rate unit.
    pub bitrate_in: f64,
    /// Transmitted bit rate in bits per rate unit.
    pub bitrate_out: f64,
    /// Utilization in percent.
    pub utilization: f64,
    /// Snapshot to persist for the next cycle.
    pub snapshot: String,
    pub outcome: RowOutcome,
}

impl InterfaceRates {
    fn forwarded(snapshot: String) -> Self {
        Self {
            bitrate_in: SENTINEL,
            bitrate_out: SENTINEL,
            utilization: SENTINEL,
            snapshot,
            outcome: RowOutcome::Forwarded,
        }
    }
}

/// Result of processing one [`PollBatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct CycleReport {
    /// Per-interface values, in batch order.
    pub rows: IndexMap<IfIndex, InterfaceRates>,
    /// The batch carried an agent-restart flag; the host should clear it.
    pub agent_restart_handled: bool,
}

impl CycleReport {
    pub fn get(&self, if_index: IfIndex) -> Option<&InterfaceRates> {
        self.rows.get(&if_index)
    }

    /// Number of rows whose snapshot was forwarded unchanged.
    pub fn forwarded(&self) -> usize {
        self.rows
            .values()
            .filter(|rates| rates.outcome == RowOutcome::Forwarded)
            .count()
    }
}

/// Runs polling cycles for one interface table.
#[derive(Debug, Clone)]
pub struct CycleProcessor {
    config: CycleConfig,
}

impl CycleProcessor {
    /// Create a processor, validating the rate configuration.
    pub fn new(config: CycleConfig) -> Result<Self> {
        config.rate.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Process a successfully polled batch.
    #[tracing::instrument(level = "debug", skip_all, fields(table = %self.config.table, rows = batch.len()))]
    pub fn process(&self, batch: &PollBatch, tracking: &DeltaTracking) -> CycleReport {
        let rows = batch
            .rows()
            .map(|row| {
                let rates = self.process_row(row, batch, tracking).unwrap_or_else(|e| {
                    tracing::warn!(target: "snmp_ifrate::cycle", { if_index = row.if_index, error = %e }, "unusable rate snapshot, forwarding unchanged");
                    InterfaceRates::forwarded(row.snapshot.clone())
                });
                (row.if_index, rates)
            })
            .collect();

        CycleReport {
            rows,
            agent_restart_handled: batch.agent_restarted(),
        }
    }

    fn process_row(
        &self,
        row: &InterfaceRow,
        batch: &PollBatch,
        tracking: &DeltaTracking,
    ) -> Result<InterfaceRates> {
        let width = self.config.table.counter_width();

        // After an agent restart the stored baselines are meaningless
        let mut state = if batch.agent_restarted() {
            RateState::new(&self.config.rate, width)
        } else {
            RateState::from_snapshot(&row.snapshot, &self.config.rate, width)?
        };

        let discontinuity = has_discontinuity(&row.discontinuity, &state.previous_discontinuity);
        let outcome = if discontinuity || batch.agent_restarted() {
            tracing::debug!(target: "snmp_ifrate::cycle", { if_index = row.if_index, discontinuity, agent_restarted = batch.agent_restarted() }, "discarding rate baselines");
            state.reset_baselines();
            RowOutcome::Reset
        } else {
            RowOutcome::Calculated
        };
        state.previous_discontinuity.clone_from(&row.discontinuity);

        let polled_at = batch.polled_at();
        let octets_in = state
            .bitrate_in
            .calculate(CounterSample::new(row.in_octets, polled_at), tracking);
        let octets_out = state
            .bitrate_out
            .calculate(CounterSample::new(row.out_octets, polled_at), tracking);

        let bitrate_in = to_bitrate(octets_in);
        let bitrate_out = to_bitrate(octets_out);
        let speed = self.config.table.speed_bps(row.speed);
        let utilization =
            calculate_utilization(bitrate_in, bitrate_out, speed, batch.duplex(row.if_index));

        tracing::trace!(target: "snmp_ifrate::cycle", { if_index = row.if_index, bitrate_in, bitrate_out, utilization }, "interface rates");

        Ok(InterfaceRates {
            bitrate_in,
            bitrate_out,
            utilization,
            snapshot: state.to_snapshot()?,
            outcome,
        })
    }

    /// Process a cycle in which polling timed out.
    ///
    /// No samples are available: every stored baseline is carried forward
    /// unchanged (buffering the group delta when tracking since group start).
    /// Snapshots that cannot be decoded are returned as they were.
    #[tracing::instrument(level = "debug", skip_all, fields(table = %self.config.table))]
    pub fn process_timeout<'a, I>(&self, snapshots: I, tracking: &DeltaTracking) -> IndexMap<IfIndex, String>
    where
        I: IntoIterator<Item = (IfIndex, &'a str)>,
    {
        let width = self.config.table.counter_width();

        snapshots
            .into_iter()
            .map(|(if_index, text)| {
                let forwarded = RateState::from_snapshot(text, &self.config.rate, width)
                    .and_then(|mut state| {
                        state.buffer_delta(tracking);
                        state.to_snapshot()
                    })
                    .unwrap_or_else(|e| {
                        tracing::warn!(target: "snmp_ifrate::cycle", { if_index, error = %e }, "unusable rate snapshot during timeout, forwarding unchanged");
                        text.to_owned()
                    });
                (if_index, forwarded)
            })
            .collect()
    }
}
