//! Simulated interface tables.

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use snmp_ifrate::{CounterWidth, DuplexStatus, IfIndex, InterfaceRow, PollBatch, TableKind};

/// Fixed start time for deterministic tests.
pub fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_714_557_600, 0).unwrap()
}

/// One interface whose octet counters advance at a fixed rate.
#[derive(Debug, Clone)]
pub struct SimulatedInterface {
    pub if_index: IfIndex,
    pub in_octets: u64,
    pub out_octets: u64,
    /// Octets per second received.
    pub in_rate: u64,
    /// Octets per second transmitted.
    pub out_rate: u64,
    /// Raw speed column value.
    pub speed: u32,
    pub duplex: Option<DuplexStatus>,
    pub discontinuity: String,
}

impl SimulatedInterface {
    pub fn new(if_index: IfIndex, in_rate: u64, out_rate: u64, speed: u32) -> Self {
        Self {
            if_index,
            in_octets: 0,
            out_octets: 0,
            in_rate,
            out_rate,
            speed,
            duplex: Some(DuplexStatus::FullDuplex),
            discontinuity: String::new(),
        }
    }

    fn advance(&mut self, secs: u64, width: CounterWidth) {
        self.in_octets = wrap(self.in_octets, self.in_rate * secs, width);
        self.out_octets = wrap(self.out_octets, self.out_rate * secs, width);
    }
}

fn wrap(value: u64, add: u64, width: CounterWidth) -> u64 {
    match width {
        CounterWidth::Bits32 => (value + add) % (u64::from(u32::MAX) + 1),
        CounterWidth::Bits64 => value.wrapping_add(add),
    }
}

/// A device's interface table with a shared clock.
#[derive(Debug, Clone)]
pub struct SimulatedTable {
    pub kind: TableKind,
    pub now: DateTime<Utc>,
    pub interfaces: Vec<SimulatedInterface>,
}

impl SimulatedTable {
    pub fn new(kind: TableKind, interfaces: Vec<SimulatedInterface>) -> Self {
        Self {
            kind,
            now: epoch(),
            interfaces,
        }
    }

    /// Let `secs` seconds of traffic pass.
    pub fn advance(&mut self, secs: u64) {
        let width = self.kind.counter_width();
        for iface in &mut self.interfaces {
            iface.advance(secs, width);
        }
        self.now += TimeDelta::seconds(secs as i64);
    }

    pub fn interface_mut(&mut self, if_index: IfIndex) -> &mut SimulatedInterface {
        self.interfaces
            .iter_mut()
            .find(|iface| iface.if_index == if_index)
            .expect("unknown interface")
    }

    /// Rows as fetched right now, without stored snapshots.
    pub fn poll(&self) -> PollBatch {
        let mut batch = PollBatch::new(self.now);
        for iface in &self.interfaces {
            batch.insert_row(InterfaceRow {
                discontinuity: iface.discontinuity.clone(),
                ..InterfaceRow::new(iface.if_index, iface.in_octets, iface.out_octets, iface.speed)
            });
            if let Some(duplex) = iface.duplex {
                batch.insert_duplex(iface.if_index, duplex);
            }
        }
        batch
    }
}

/// `count` 100 Mbit/s interfaces, each receiving `1_000 * ifIndex` octets/s
/// and transmitting half that.
pub fn interface_table(kind: TableKind, count: u32) -> SimulatedTable {
    let speed = match kind {
        TableKind::IfTable => 100_000_000,
        TableKind::IfXTable => 100,
    };
    let interfaces = (1..=count)
        .map(|idx| {
            let rate = 1_000 * u64::from(idx);
            SimulatedInterface::new(idx, rate, rate / 2, speed)
        })
        .collect();
    SimulatedTable::new(kind, interfaces)
}
