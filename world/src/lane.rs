//! Dense lane grid storing the unit occupying each cell.

use lane_defence_core::{CellCoord, LaneDimensions, Occupant, UnitKind};

/// Read-only grid of a single player's lane.
#[derive(Clone, Debug)]
pub struct Lane {
    dimensions: LaneDimensions,
    cells: Vec<Option<Occupant>>,
    towers: u32,
    soldiers: u32,
}

impl Lane {
    pub(crate) fn new(dimensions: LaneDimensions) -> Self {
        Self {
            dimensions,
            cells: vec![None; dimensions.area()],
            towers: 0,
            soldiers: 0,
        }
    }

    /// Geometry of the lane.
    #[must_use]
    pub const fn dimensions(&self) -> LaneDimensions {
        self.dimensions
    }

    /// Returns the unit occupying the provided cell, if any.
    #[must_use]
    pub fn occupant(&self, cell: CellCoord) -> Option<Occupant> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied().flatten())
    }

    /// Reports whether the cell lies inside the lane and is empty.
    #[must_use]
    pub fn is_free(&self, cell: CellCoord) -> bool {
        self.index(cell)
            .is_some_and(|index| self.cells.get(index).copied().flatten().is_none())
    }

    /// Number of units of the provided kind standing on the lane.
    #[must_use]
    pub const fn unit_count(&self, kind: UnitKind) -> u32 {
        match kind {
            UnitKind::Tower => self.towers,
            UnitKind::Soldier => self.soldiers,
        }
    }

    /// Iterates over occupied cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Occupant)> + '_ {
        let width = self.dimensions.width();
        self.cells
            .iter()
            .enumerate()
            .filter_map(move |(index, occupant)| {
                let occupant = (*occupant)?;
                let index = u32::try_from(index).ok()?;
                Some((CellCoord::new(index % width, index / width), occupant))
            })
    }

    /// Stores the occupant in an empty cell. Returns `false` when the cell is
    /// outside the lane or already taken.
    pub(crate) fn occupy(&mut self, cell: CellCoord, occupant: Occupant) -> bool {
        let Some(slot) = self.index(cell).and_then(|index| self.cells.get_mut(index)) else {
            return false;
        };
        if slot.is_some() {
            return false;
        }

        *slot = Some(occupant);
        match occupant.kind() {
            UnitKind::Tower => self.towers += 1,
            UnitKind::Soldier => self.soldiers += 1,
        }
        true
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.dimensions.contains(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.dimensions.width()).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
