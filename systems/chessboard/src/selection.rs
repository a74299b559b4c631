//! Lane choice for the next soldier spawn.

use crate::ThreatScan;

/// Picks the column for the next soldier.
///
/// Candidates are the columns whose danger equals the scan's lowest danger.
/// The candidate with the highest interest wins, the lowest index breaking
/// ties. Falls back to `previous` when no column qualifies.
#[must_use]
pub fn preferred_column(scan: &ThreatScan, previous: u32) -> u32 {
    let mut best: Option<(u32, u32)> = None;
    for column in 0..scan.width() {
        if !scan.is_least_dangerous(column) {
            continue;
        }

        let interest = scan.interest(column);
        if best.map_or(true, |(_, highest)| interest > highest) {
            best = Some((column, interest));
        }
    }

    best.map_or(previous, |(column, _)| column)
}
