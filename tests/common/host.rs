//! A minimal host that persists snapshots between cycles.

use indexmap::IndexMap;
use snmp_ifrate::{
    CycleConfig, CycleProcessor, CycleReport, DeltaTracking, IfIndex, PollBatch, TableKind,
};

use super::SimulatedTable;

/// Keeps the per-row snapshot store and flags the way a poller host would.
pub struct TestHost {
    pub processor: CycleProcessor,
    pub snapshots: IndexMap<IfIndex, String>,
    pub agent_restarted: bool,
}

impl TestHost {
    pub fn new(table: TableKind) -> Self {
        Self::with_config(CycleConfig::for_table(table))
    }

    pub fn with_config(config: CycleConfig) -> Self {
        Self {
            processor: CycleProcessor::new(config).expect("valid config"),
            snapshots: IndexMap::new(),
            agent_restarted: false,
        }
    }

    /// Poll the table, attach stored snapshots and process the cycle.
    pub fn poll(&mut self, table: &SimulatedTable, tracking: &DeltaTracking) -> CycleReport {
        let polled = table.poll();
        let mut batch = PollBatch::new(polled.polled_at());
        batch.set_agent_restarted(self.agent_restarted);
        for row in polled.rows() {
            let mut row = row.clone();
            row.snapshot = self.snapshots.get(&row.if_index).cloned().unwrap_or_default();
            batch.insert_duplex(row.if_index, polled.duplex(row.if_index));
            batch.insert_row(row);
        }

        let report = self.processor.process(&batch, tracking);
        for (if_index, rates) in &report.rows {
            self.snapshots.insert(*if_index, rates.snapshot.clone());
        }
        if report.agent_restart_handled {
            self.agent_restarted = false;
        }
        report
    }

    /// Process a cycle in which the poll timed out.
    pub fn timeout(&mut self, tracking: &DeltaTracking) {
        let forwarded = self.processor.process_timeout(
            self.snapshots.iter().map(|(idx, text)| (*idx, text.as_str())),
            tracking,
        );
        self.snapshots = forwarded;
    }
}
