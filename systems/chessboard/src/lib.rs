#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Checkerboard strategy: builds a brick-pattern tower line near the
//! defensive edge and sends soldiers down the least defended enemy column.

mod placement;
mod selection;
mod threat;

pub use placement::{build_towers, checkerboard_sites, first_open_site};
pub use selection::preferred_column;
pub use threat::ThreatScan;

use lane_defence_core::{
    LaneSide, PlayerContext, Purchase, PurchaseError, Strategy, StrategyError, UnitKind,
};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};

/// Tuning knobs of the checkerboard strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChessboardConfig {
    /// Rows from the defensive line that must be fully built before any
    /// soldier is bought.
    pub danger_height: u32,
    /// Rows from the defensive line eligible for towers.
    pub max_placement_height: u32,
    /// Soldiers on the enemy lane beyond which no more are bought.
    pub soldier_cap: u32,
}

impl Default for ChessboardConfig {
    fn default() -> Self {
        Self {
            danger_height: 2,
            max_placement_height: 3,
            soldier_cap: 80,
        }
    }
}

/// Rule-based strategy combining checkerboard defence with threat-aware
/// soldier spawning.
#[derive(Clone, Debug, Default)]
pub struct Chessboard {
    config: ChessboardConfig,
}

impl Chessboard {
    /// Creates a strategy with the provided tuning.
    #[must_use]
    pub const fn new(config: ChessboardConfig) -> Self {
        Self { config }
    }

    /// Tuning used by the strategy.
    #[must_use]
    pub const fn config(&self) -> &ChessboardConfig {
        &self.config
    }

    fn below_cap(&self, player: &dyn PlayerContext) -> bool {
        player.unit_count(LaneSide::Enemy, UnitKind::Soldier) < self.config.soldier_cap
    }

    fn spawn_along_preferred_lanes(
        &self,
        player: &mut dyn PlayerContext,
        mut previous: u32,
    ) -> Result<(), StrategyError> {
        let width = player.dimensions().width();
        let mut attempts = 0;
        while self.below_cap(player) && attempts < width {
            let scan = ThreatScan::scan(player);
            let column = preferred_column(&scan, previous);
            let purchase = Purchase::Soldier { column };
            match player.try_purchase(purchase) {
                Ok(_) => {
                    tracing::trace!(column, "soldier spawned on preferred lane");
                    previous = column;
                }
                Err(reason) => absorb_rejection(purchase, reason)?,
            }
            attempts += 1;
        }
        Ok(())
    }

    fn sweep_spawn_row(&self, player: &mut dyn PlayerContext) -> Result<(), StrategyError> {
        let dimensions = player.dimensions();
        for column in 0..dimensions.width() {
            let entry = dimensions.spawn_cell(column);
            if player.occupant(LaneSide::Enemy, entry).is_some() {
                continue;
            }

            let purchase = Purchase::Soldier { column };
            if let Err(reason) = player.try_purchase(purchase) {
                absorb_rejection(purchase, reason)?;
            }

            if !self.below_cap(player) {
                break;
            }
        }
        Ok(())
    }
}

impl Strategy for Chessboard {
    fn deploy_towers(&mut self, player: &mut dyn PlayerContext) -> Result<(), StrategyError> {
        let built = build_towers(player, self.config.max_placement_height)?;
        tracing::debug!(
            built,
            towers = player.unit_count(LaneSide::Home, UnitKind::Tower),
            gold = player.gold().get(),
            "tower deployment finished"
        );
        Ok(())
    }

    fn deploy_soldiers(
        &mut self,
        player: &mut dyn PlayerContext,
        rng: &mut dyn RngCore,
    ) -> Result<(), StrategyError> {
        if let Some(cell) = first_open_site(player, self.config.danger_height) {
            tracing::debug!(?cell, "inner defence incomplete, holding soldiers");
            return Ok(());
        }

        let width = player.dimensions().width();
        if width == 0 {
            return Ok(());
        }

        let seed_column = rng.gen_range(0..width);
        self.spawn_along_preferred_lanes(player, seed_column)?;
        if self.below_cap(player) {
            self.sweep_spawn_row(player)?;
        }

        tracing::debug!(
            soldiers = player.unit_count(LaneSide::Enemy, UnitKind::Soldier),
            gold = player.gold().get(),
            "soldier deployment finished"
        );
        Ok(())
    }
}

/// Treats an unavailable slot as a skip and anything else as fatal.
pub(crate) fn absorb_rejection(
    purchase: Purchase,
    reason: PurchaseError,
) -> Result<(), StrategyError> {
    if reason.is_recoverable() {
        tracing::trace!(?purchase, %reason, "purchase skipped");
        Ok(())
    } else {
        Err(StrategyError::ContractViolation { purchase, reason })
    }
}
