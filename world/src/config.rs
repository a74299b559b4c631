//! Match configuration consumed by the world.

use lane_defence_core::{Gold, LaneDimensions, UnitKind};
use serde::{Deserialize, Serialize};

/// Parameters fixed for the lifetime of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchConfig {
    /// Geometry shared by both lanes.
    pub dimensions: LaneDimensions,
    /// Balance each player starts with.
    pub starting_gold: Gold,
    /// Health assigned to newly built towers.
    pub tower_health: u32,
    /// Pricing rules for purchases.
    pub costs: CostModel,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            dimensions: LaneDimensions::new(8, 10, 2),
            starting_gold: Gold::new(100),
            tower_health: 100,
            costs: CostModel::default(),
        }
    }
}

/// Linear pricing: each unit already owned on the priced lane raises the
/// next price by the kind's step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostModel {
    /// Price of the first tower.
    pub tower_base: Gold,
    /// Increase applied per tower already standing on the home lane.
    pub tower_step: Gold,
    /// Price of the first soldier.
    pub soldier_base: Gold,
    /// Increase applied per soldier already standing on the enemy lane.
    pub soldier_step: Gold,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            tower_base: Gold::new(10),
            tower_step: Gold::new(2),
            soldier_base: Gold::new(2),
            soldier_step: Gold::ZERO,
        }
    }
}

impl CostModel {
    /// Price of the next unit of `kind` given how many already stand on the
    /// priced lane.
    #[must_use]
    pub fn next_cost(&self, kind: UnitKind, owned: u32) -> Gold {
        let (base, step) = match kind {
            UnitKind::Tower => (self.tower_base, self.tower_step),
            UnitKind::Soldier => (self.soldier_base, self.soldier_step),
        };
        Gold::new(base.get().saturating_add(step.get().saturating_mul(owned)))
    }
}
