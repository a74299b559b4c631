//! Per-column danger and interest scoring of the enemy lane.

use lane_defence_core::{CellCoord, LaneSide, Occupant, PlayerContext};

/// Danger is tracked in half health units so the neighbour bleed (half of a
/// tower's health) stays an exact integer.
const HALF_UNITS_PER_HEALTH: u64 = 2;
const NEIGHBOUR_HALF_UNITS_PER_HEALTH: u64 = 1;

/// Danger and interest scores of every enemy lane column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThreatScan {
    danger: Vec<u64>,
    interest: Vec<u32>,
    lowest_danger: Option<u64>,
}

impl ThreatScan {
    /// Scans the enemy lane's buildable band.
    ///
    /// Only even columns are inspected, every row of the band. A tower adds its
    /// health to its column and half of it to each neighbouring column; a
    /// soldier adds one to its column's interest.
    #[must_use]
    pub fn scan(player: &dyn PlayerContext) -> Self {
        let dimensions = player.dimensions();
        let mut scan = Self::empty(dimensions.width());

        for column in (0..dimensions.width()).step_by(2) {
            for row in 0..dimensions.buildable_height() {
                let Some(grid_row) = dimensions.translate_row(row) else {
                    continue;
                };
                let cell = CellCoord::new(column, grid_row);
                match player.occupant(LaneSide::Enemy, cell) {
                    Some(Occupant::Tower { health }) => scan.add_tower(column, health),
                    Some(Occupant::Soldier) => scan.add_interest(column),
                    None => {}
                }
            }
        }

        scan
    }

    fn empty(width: u32) -> Self {
        let width = usize::try_from(width).unwrap_or(0);
        Self {
            danger: vec![0; width],
            interest: vec![0; width],
            lowest_danger: None,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(
        danger: Vec<u64>,
        interest: Vec<u32>,
        lowest_danger: Option<u64>,
    ) -> Self {
        Self {
            danger,
            interest,
            lowest_danger,
        }
    }

    /// Number of columns covered by the scan.
    #[must_use]
    pub fn width(&self) -> u32 {
        u32::try_from(self.danger.len()).unwrap_or(u32::MAX)
    }

    /// Danger of the column measured in tower health.
    #[must_use]
    pub fn danger(&self, column: u32) -> f64 {
        self.danger_half_units(column) as f64 / HALF_UNITS_PER_HEALTH as f64
    }

    /// Interest of the column: the number of friendly soldiers counted in it.
    #[must_use]
    pub fn interest(&self, column: u32) -> u32 {
        index(column)
            .and_then(|index| self.interest.get(index).copied())
            .unwrap_or(0)
    }

    /// Lowest danger reached by any column a tower touched, measured in tower
    /// health. `None` when the lane holds no towers.
    #[must_use]
    pub fn lowest_danger(&self) -> Option<f64> {
        self.lowest_danger
            .map(|half_units| half_units as f64 / HALF_UNITS_PER_HEALTH as f64)
    }

    /// Reports whether the column's danger equals the recorded minimum.
    #[must_use]
    pub fn is_least_dangerous(&self, column: u32) -> bool {
        self.lowest_danger
            .is_some_and(|lowest| self.danger_half_units(column) == lowest)
    }

    fn danger_half_units(&self, column: u32) -> u64 {
        index(column)
            .and_then(|index| self.danger.get(index).copied())
            .unwrap_or(0)
    }

    fn add_tower(&mut self, column: u32, health: u32) {
        let health = u64::from(health);
        self.add_danger(column, health * HALF_UNITS_PER_HEALTH);
        if let Some(left) = column.checked_sub(1) {
            self.add_danger(left, health * NEIGHBOUR_HALF_UNITS_PER_HEALTH);
        }
        if column + 1 < self.width() {
            self.add_danger(column + 1, health * NEIGHBOUR_HALF_UNITS_PER_HEALTH);
        }
    }

    // The minimum is a running one: it only ever sees a column's value right
    // after that column grew.
    fn add_danger(&mut self, column: u32, half_units: u64) {
        let Some(slot) = index(column).and_then(|index| self.danger.get_mut(index)) else {
            return;
        };
        *slot = slot.saturating_add(half_units);
        let value = *slot;
        if self.lowest_danger.map_or(true, |lowest| value < lowest) {
            self.lowest_danger = Some(value);
        }
    }

    fn add_interest(&mut self, column: u32) {
        if let Some(slot) = index(column).and_then(|index| self.interest.get_mut(index)) {
            *slot = slot.saturating_add(1);
        }
    }
}

fn index(column: u32) -> Option<usize> {
    usize::try_from(column).ok()
}
