//! Checkerboard tower placement and the defence gate built on it.

use lane_defence_core::{
    CellCoord, LaneDimensions, LaneSide, PlayerContext, Purchase, StrategyError, UnitKind,
};

use crate::absorb_rejection;

/// Enumerates candidate tower sites, innermost row first.
///
/// Rows are counted from the defensive line and clamped to the buildable
/// band. Even rows start at column 0 and odd rows at column 1, stepping by two,
/// so no two sites in one row touch.
pub fn checkerboard_sites(
    dimensions: LaneDimensions,
    max_height: u32,
) -> impl Iterator<Item = CellCoord> {
    let rows = max_height.min(dimensions.buildable_height());
    let width = dimensions.width();
    (0..rows)
        .filter_map(move |row| Some((row, dimensions.translate_row(row)?)))
        .flat_map(move |(row, translated)| {
            (row % 2..width)
                .step_by(2)
                .map(move |column| CellCoord::new(column, translated))
        })
}

/// Returns the first empty checkerboard site of the home lane within
/// `height` rows of the defensive line.
#[must_use]
pub fn first_open_site(player: &dyn PlayerContext, height: u32) -> Option<CellCoord> {
    checkerboard_sites(player.dimensions(), height)
        .find(|cell| player.occupant(LaneSide::Home, *cell).is_none())
}

/// Buys towers along the checkerboard until the pattern is covered or the
/// next tower is unaffordable. Returns the number of towers built.
pub fn build_towers(
    player: &mut dyn PlayerContext,
    max_height: u32,
) -> Result<u32, StrategyError> {
    if !can_afford_tower(player) {
        tracing::trace!(gold = player.gold().get(), "cannot afford a tower");
        return Ok(0);
    }

    let mut built = 0;
    for cell in checkerboard_sites(player.dimensions(), max_height) {
        let purchase = Purchase::Tower { cell };
        match player.try_purchase(purchase) {
            Ok(_) => built += 1,
            Err(reason) => absorb_rejection(purchase, reason)?,
        }

        if !can_afford_tower(player) {
            break;
        }
    }

    Ok(built)
}

fn can_afford_tower(player: &dyn PlayerContext) -> bool {
    player.gold() >= player.next_cost(UnitKind::Tower)
}
