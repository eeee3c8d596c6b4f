//! Convenience re-exports for hosts driving polling cycles.
//!
//! ```
//! use snmp_ifrate::prelude::*;
//!
//! let processor = CycleProcessor::new(CycleConfig::for_table(TableKind::IfXTable))?;
//! let report = processor.process(&PollBatch::new(chrono::Utc::now()), &DeltaTracking::default());
//! assert!(report.rows.is_empty());
//! # Ok::<(), snmp_ifrate::Error>(())
//! ```

pub use crate::SENTINEL;
pub use crate::cycle::{CycleConfig, CycleProcessor, CycleReport, InterfaceRow, PollBatch};
pub use crate::error::{Error, Result};
pub use crate::interface::TableKind;
pub use crate::rate::{CalculationMethod, DeltaTracking, RateBase, RateConfig};
pub use crate::utilization::DuplexStatus;
