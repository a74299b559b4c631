use lane_defence_core::{CellCoord, Gold, Occupant, PlayerId, UnitKind};
use lane_defence_world::{query, World};
use serde::Serialize;

use crate::StrategyKind;

/// End-of-run report for a single player.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct PlayerSummary {
    /// Player described by the report.
    pub(crate) player: PlayerId,
    /// Strategy that controlled the player.
    pub(crate) strategy: StrategyKind,
    /// Balance left after the final cycle.
    pub(crate) gold: Gold,
    /// Towers standing on the player's lane.
    pub(crate) towers: u32,
    /// Soldiers the player sent into the opponent's lane.
    pub(crate) soldiers_sent: usize,
    /// Purchases the world rejected.
    pub(crate) rejected_purchases: usize,
    /// Layout code of the player's lane.
    pub(crate) layout: String,
}

/// End-of-run report for the whole match.
#[derive(Clone, Debug, Serialize)]
pub(crate) struct MatchSummary {
    /// Seed that drove the run.
    pub(crate) seed: u64,
    /// Number of decision cycles played.
    pub(crate) cycles: u32,
    /// Per-player reports in acting order.
    pub(crate) players: Vec<PlayerSummary>,
}

/// Draws the player's lane, far edge first.
pub(crate) fn render_lane(world: &World, player: PlayerId) -> String {
    let dimensions = query::dimensions(world);
    let lane = query::lane(world, player);
    let mut out = String::with_capacity(dimensions.area() + dimensions.height() as usize);
    for row in 0..dimensions.height() {
        for column in 0..dimensions.width() {
            let cell = CellCoord::new(column, row);
            let glyph = match lane.occupant(cell) {
                Some(Occupant::Tower { .. }) => 'T',
                Some(Occupant::Soldier) => 's',
                None if dimensions.in_safety_zone(cell) => '~',
                None => '.',
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

/// Formats the summary for terminal output.
pub(crate) fn render_text(world: &World, summary: &MatchSummary) -> String {
    let mut out = format!("seed {:#x}, {} cycles\n", summary.seed, summary.cycles);
    for report in &summary.players {
        out.push_str(&format!(
            "\n{:?} ({:?}): {} gold, {} towers, {} soldiers on lane, {} sent, {} rejected\n",
            report.player,
            report.strategy,
            report.gold.get(),
            report.towers,
            query::lane(world, report.player).unit_count(UnitKind::Soldier),
            report.soldiers_sent,
            report.rejected_purchases,
        ));
        out.push_str(&render_lane(world, report.player));
        out.push_str(&format!("layout {}\n", report.layout));
    }
    out
}
