#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Lane Defence engine.
//!
//! This crate defines the message surface that connects adapters, the
//! authoritative world, and strategy systems. Adapters submit [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then reports [`Event`] values describing what
//! happened. Strategies never touch the world directly: they read lanes and
//! request purchases through the [`PlayerContext`] collaborator.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fixed geometry shared by every lane of a match.
///
/// Rows are stored top-down: row `0` is the far edge where soldiers enter and
/// the first `safety_zone_height` rows are exempt from tower placement. The
/// owner's defensive line is the last row, `height - 1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LaneDimensions {
    width: u32,
    height: u32,
    safety_zone_height: u32,
}

impl LaneDimensions {
    /// Creates a new lane geometry descriptor.
    #[must_use]
    pub const fn new(width: u32, height: u32, safety_zone_height: u32) -> Self {
        Self {
            width,
            height,
            safety_zone_height,
        }
    }

    /// Number of columns in the lane.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows in the lane.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of rows, counted from the far edge, exempt from tower placement.
    #[must_use]
    pub const fn safety_zone_height(&self) -> u32 {
        self.safety_zone_height
    }

    /// Number of rows, counted from the defensive line, that accept towers.
    #[must_use]
    pub const fn buildable_height(&self) -> u32 {
        self.height.saturating_sub(self.safety_zone_height)
    }

    /// Converts a row measured from the defensive line into a grid row.
    ///
    /// Strategies count rows outward from their own defensive edge, while the
    /// grid counts from the far edge. Returns `None` when `row` lies past the
    /// far edge.
    #[must_use]
    pub const fn translate_row(&self, row: u32) -> Option<u32> {
        if row < self.height {
            Some(self.height - row - 1)
        } else {
            None
        }
    }

    /// Cell where a soldier purchased for `column` enters the lane.
    #[must_use]
    pub const fn spawn_cell(&self, column: u32) -> CellCoord {
        CellCoord::new(column, 0)
    }

    /// Reports whether the cell lies inside the lane.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.column() < self.width && cell.row() < self.height
    }

    /// Reports whether the cell lies inside the safety zone band.
    #[must_use]
    pub const fn in_safety_zone(&self, cell: CellCoord) -> bool {
        cell.row() < self.safety_zone_height
    }

    /// Total number of cells in the lane.
    #[must_use]
    pub fn area(&self) -> usize {
        let area = u64::from(self.width) * u64::from(self.height);
        usize::try_from(area).unwrap_or(usize::MAX)
    }
}

/// Location of a single lane cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Amount of currency held or spent by a player.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Gold(u32);

impl Gold {
    /// Zero currency.
    pub const ZERO: Self = Self(0);

    /// Wraps the provided amount.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric amount.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }

    /// Adds two amounts, clamping at the numeric ceiling.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Subtracts `other`, returning `None` when the balance would go negative.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

/// Unique identifier assigned to a soldier by the world.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoldierId(u32);

impl SoldierId {
    /// Creates a new soldier identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Kinds of units that can be purchased.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    /// Stationary defensive unit placed on the owner's lane.
    Tower,
    /// Offensive unit spawned into the opponent's lane.
    Soldier,
}

/// Unit occupying a lane cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Occupant {
    /// Tower carrying its remaining health.
    Tower {
        /// Remaining health of the tower.
        health: u32,
    },
    /// Soldier unit.
    Soldier,
}

impl Occupant {
    /// Kind of unit represented by the occupant.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        match self {
            Self::Tower { .. } => UnitKind::Tower,
            Self::Soldier => UnitKind::Soldier,
        }
    }
}

/// Selects one of the two lanes visible to a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LaneSide {
    /// Lane owned by the player, where its towers stand.
    Home,
    /// Lane owned by the opponent, where the player's soldiers are spawned.
    Enemy,
}

/// Identifies one of the two players of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// Player that acts first in each decision cycle.
    First,
    /// Player that acts second in each decision cycle.
    Second,
}

impl PlayerId {
    /// Both players in acting order.
    pub const ALL: [Self; 2] = [Self::First, Self::Second];

    /// Returns the opposing player.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::First => Self::Second,
            Self::Second => Self::First,
        }
    }
}

/// Purchase requested by a player.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Purchase {
    /// Build a tower at the provided cell of the home lane.
    Tower {
        /// Grid cell of the home lane that should host the tower.
        cell: CellCoord,
    },
    /// Spawn a soldier at the entry of the provided enemy lane column.
    Soldier {
        /// Column of the enemy lane the soldier enters.
        column: u32,
    },
}

impl Purchase {
    /// Kind of unit bought by the purchase.
    #[must_use]
    pub const fn kind(&self) -> UnitKind {
        match self {
            Self::Tower { .. } => UnitKind::Tower,
            Self::Soldier { .. } => UnitKind::Soldier,
        }
    }
}

/// Reasons a purchase may be rejected by the world.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PurchaseError {
    /// The target cell already hosts a unit.
    #[error("target cell is occupied")]
    Occupied,
    /// The player cannot afford the unit.
    #[error("insufficient funds")]
    InsufficientFunds,
    /// The target lies outside the lane.
    #[error("target lies outside the lane")]
    OutOfBounds,
    /// Towers may not be built inside the safety zone.
    #[error("target lies inside the safety zone")]
    SafetyZone,
}

impl PurchaseError {
    /// Reports whether a strategy may treat the failure as "slot unavailable".
    ///
    /// The remaining variants can only be produced by a strategy addressing
    /// cells it must never address.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Occupied | Self::InsufficientFunds)
    }
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Credits the player's balance.
    GrantGold {
        /// Player receiving the currency.
        player: PlayerId,
        /// Amount credited.
        amount: Gold,
    },
    /// Requests construction of a tower on the player's home lane.
    PurchaseTower {
        /// Player paying for the tower.
        player: PlayerId,
        /// Home lane cell that should host the tower.
        cell: CellCoord,
    },
    /// Requests a soldier spawn on the opponent's lane.
    PurchaseSoldier {
        /// Player paying for the soldier.
        player: PlayerId,
        /// Opponent lane column the soldier enters.
        column: u32,
    },
}

/// Events reported by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Event {
    /// Confirms that a player's balance was credited.
    GoldGranted {
        /// Player that received the currency.
        player: PlayerId,
        /// Amount credited.
        amount: Gold,
    },
    /// Confirms that a tower was built.
    TowerPurchased {
        /// Player that paid for the tower.
        player: PlayerId,
        /// Home lane cell now hosting the tower.
        cell: CellCoord,
        /// Price paid.
        cost: Gold,
    },
    /// Confirms that a soldier was spawned.
    SoldierPurchased {
        /// Player that paid for the soldier.
        player: PlayerId,
        /// Identifier allocated to the soldier.
        soldier: SoldierId,
        /// Opponent lane cell now hosting the soldier.
        cell: CellCoord,
        /// Price paid.
        cost: Gold,
    },
    /// Reports that a purchase request was rejected.
    PurchaseRejected {
        /// Player that requested the purchase.
        player: PlayerId,
        /// Purchase that failed.
        purchase: Purchase,
        /// Specific reason the purchase failed.
        reason: PurchaseError,
    },
}

/// Collaborator through which a strategy observes and acts on the match.
///
/// Implementations are owned by the game engine; strategies only read the
/// lanes and request purchases.
pub trait PlayerContext {
    /// Geometry shared by both lanes.
    fn dimensions(&self) -> LaneDimensions;

    /// Unit occupying the cell of the selected lane. Out-of-range cells are
    /// reported as empty.
    fn occupant(&self, side: LaneSide, cell: CellCoord) -> Option<Occupant>;

    /// Number of units of the provided kind standing on the selected lane.
    fn unit_count(&self, side: LaneSide, kind: UnitKind) -> u32;

    /// Current currency balance.
    fn gold(&self) -> Gold;

    /// Price of the next unit of the provided kind.
    fn next_cost(&self, kind: UnitKind) -> Gold;

    /// Attempts a purchase, returning the cell that received the unit.
    fn try_purchase(&mut self, purchase: Purchase) -> Result<CellCoord, PurchaseError>;
}

/// Failures that abort a strategy's decision cycle.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum StrategyError {
    /// The engine rejected a purchase the strategy must never have produced.
    #[error("engine rejected {purchase:?} as a contract violation: {reason}")]
    ContractViolation {
        /// Purchase that was rejected.
        purchase: Purchase,
        /// Reason reported by the engine.
        reason: PurchaseError,
    },
}

/// Decision policy driving one automated player.
pub trait Strategy {
    /// Spends currency on towers for the home lane.
    fn deploy_towers(&mut self, player: &mut dyn PlayerContext) -> Result<(), StrategyError>;

    /// Spends currency on soldiers for the enemy lane.
    ///
    /// The random source is supplied per decision cycle so runs can be
    /// replayed from a seed.
    fn deploy_soldiers(
        &mut self,
        player: &mut dyn PlayerContext,
        rng: &mut dyn RngCore,
    ) -> Result<(), StrategyError>;

    /// Orders the player's soldiers for the engine's movement pass.
    fn order_soldiers(&self, soldiers: Vec<SoldierId>) -> Vec<SoldierId> {
        soldiers
    }
}
