#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Baseline strategy that never spends currency.

use lane_defence_core::{PlayerContext, Strategy, StrategyError};
use rand::RngCore;

/// Strategy that passes every decision cycle.
///
/// Serves as a disabled opponent when exercising other strategies.
#[derive(Clone, Copy, Debug, Default)]
pub struct Idle;

impl Strategy for Idle {
    fn deploy_towers(&mut self, _player: &mut dyn PlayerContext) -> Result<(), StrategyError> {
        Ok(())
    }

    fn deploy_soldiers(
        &mut self,
        _player: &mut dyn PlayerContext,
        _rng: &mut dyn RngCore,
    ) -> Result<(), StrategyError> {
        Ok(())
    }
}
