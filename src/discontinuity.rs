//! Counter discontinuity detection.
//!
//! Agents report `ifCounterDiscontinuityTime` (or an equivalent marker) that
//! changes whenever an interface's counters were reset out of band. Markers
//! are compared as opaque strings; no time arithmetic is done on them.

/// Whether the counters were reset since `previous` was recorded.
///
/// An empty `previous` means nothing has been recorded yet, which is never a
/// discontinuity.
///
/// ```
/// use snmp_ifrate::has_discontinuity;
///
/// assert!(has_discontinuity("0", "1"));
/// assert!(!has_discontinuity("0", "0"));
/// assert!(!has_discontinuity("x", ""));
/// ```
pub fn has_discontinuity(current: &str, previous: &str) -> bool {
    !previous.is_empty() && current != previous
}
