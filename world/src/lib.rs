#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state for Lane Defence.
//!
//! The world owns both lanes, the players' balances and the pricing rules.
//! All mutations flow through [`apply`]; strategies reach the world through a
//! [`Seat`], which implements [`PlayerContext`] for one player.

mod config;
mod lane;

pub use config::{CostModel, MatchConfig};
pub use lane::Lane;

use lane_defence_core::{
    CellCoord, Command, Event, Gold, LaneSide, Occupant, PlayerContext, PlayerId, Purchase,
    PurchaseError, SoldierId, UnitKind,
};

#[derive(Debug)]
struct PlayerState {
    gold: Gold,
    lane: Lane,
    soldiers: Vec<SoldierId>,
}

impl PlayerState {
    fn new(config: &MatchConfig) -> Self {
        Self {
            gold: config.starting_gold,
            lane: Lane::new(config.dimensions),
            soldiers: Vec::new(),
        }
    }
}

/// Represents the authoritative Lane Defence match state.
#[derive(Debug)]
pub struct World {
    config: MatchConfig,
    players: [PlayerState; 2],
    next_soldier_id: SoldierId,
}

impl World {
    /// Creates a new match with empty lanes and starting balances.
    #[must_use]
    pub fn new(config: MatchConfig) -> Self {
        Self {
            players: [PlayerState::new(&config), PlayerState::new(&config)],
            config,
            next_soldier_id: SoldierId::new(0),
        }
    }

    /// Places a tower on the player's lane without charging for it.
    ///
    /// Used to set up scenarios; follows the same placement rules as a
    /// purchase apart from the price.
    pub fn seed_tower(
        &mut self,
        player: PlayerId,
        cell: CellCoord,
        health: u32,
    ) -> Result<(), PurchaseError> {
        self.validate_tower_site(player, cell)?;
        if self.player_mut(player).lane.occupy(cell, Occupant::Tower { health }) {
            Ok(())
        } else {
            Err(PurchaseError::Occupied)
        }
    }

    fn player(&self, player: PlayerId) -> &PlayerState {
        &self.players[player_index(player)]
    }

    fn player_mut(&mut self, player: PlayerId) -> &mut PlayerState {
        &mut self.players[player_index(player)]
    }

    fn validate_tower_site(&self, player: PlayerId, cell: CellCoord) -> Result<(), PurchaseError> {
        let dimensions = self.config.dimensions;
        if !dimensions.contains(cell) {
            return Err(PurchaseError::OutOfBounds);
        }
        if dimensions.in_safety_zone(cell) {
            return Err(PurchaseError::SafetyZone);
        }
        if !self.player(player).lane.is_free(cell) {
            return Err(PurchaseError::Occupied);
        }
        Ok(())
    }

    fn charge(&mut self, player: PlayerId, kind: UnitKind) -> Result<Gold, PurchaseError> {
        let cost = query::next_cost(self, player, kind);
        let state = self.player_mut(player);
        state.gold = state
            .gold
            .checked_sub(cost)
            .ok_or(PurchaseError::InsufficientFunds)?;
        Ok(cost)
    }

    fn purchase(
        &mut self,
        player: PlayerId,
        purchase: Purchase,
        out_events: &mut Vec<Event>,
    ) -> Result<CellCoord, PurchaseError> {
        let outcome = match purchase {
            Purchase::Tower { cell } => self.purchase_tower(player, cell),
            Purchase::Soldier { column } => self.purchase_soldier(player, column),
        };

        match outcome {
            Ok((cell, event)) => {
                out_events.push(event);
                Ok(cell)
            }
            Err(reason) => {
                out_events.push(Event::PurchaseRejected {
                    player,
                    purchase,
                    reason,
                });
                Err(reason)
            }
        }
    }

    fn purchase_tower(
        &mut self,
        player: PlayerId,
        cell: CellCoord,
    ) -> Result<(CellCoord, Event), PurchaseError> {
        self.validate_tower_site(player, cell)?;
        let cost = self.charge(player, UnitKind::Tower)?;
        let health = self.config.tower_health;
        let placed = self.player_mut(player).lane.occupy(cell, Occupant::Tower { health });
        debug_assert!(placed, "validated tower site must accept the tower");
        Ok((cell, Event::TowerPurchased { player, cell, cost }))
    }

    fn purchase_soldier(
        &mut self,
        player: PlayerId,
        column: u32,
    ) -> Result<(CellCoord, Event), PurchaseError> {
        let dimensions = self.config.dimensions;
        if column >= dimensions.width() || dimensions.height() == 0 {
            return Err(PurchaseError::OutOfBounds);
        }
        let cell = dimensions.spawn_cell(column);
        if !self.player(player.opponent()).lane.is_free(cell) {
            return Err(PurchaseError::Occupied);
        }

        let cost = self.charge(player, UnitKind::Soldier)?;
        let placed = self
            .player_mut(player.opponent())
            .lane
            .occupy(cell, Occupant::Soldier);
        debug_assert!(placed, "validated spawn cell must accept the soldier");

        let soldier = self.next_soldier_id;
        self.next_soldier_id = SoldierId::new(soldier.get().saturating_add(1));
        self.player_mut(player).soldiers.push(soldier);
        Ok((
            cell,
            Event::SoldierPurchased {
                player,
                soldier,
                cell,
                cost,
            },
        ))
    }
}

const fn player_index(player: PlayerId) -> usize {
    match player {
        PlayerId::First => 0,
        PlayerId::Second => 1,
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::GrantGold { player, amount } => {
            let state = world.player_mut(player);
            state.gold = state.gold.saturating_add(amount);
            out_events.push(Event::GoldGranted { player, amount });
        }
        Command::PurchaseTower { player, cell } => {
            let _ = world.purchase(player, Purchase::Tower { cell }, out_events);
        }
        Command::PurchaseSoldier { player, column } => {
            let _ = world.purchase(player, Purchase::Soldier { column }, out_events);
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::{Lane, MatchConfig, World};
    use lane_defence_core::{Gold, LaneDimensions, PlayerId, SoldierId, UnitKind};

    /// Provides read-only access to the match configuration.
    #[must_use]
    pub fn config(world: &World) -> &MatchConfig {
        &world.config
    }

    /// Geometry shared by both lanes.
    #[must_use]
    pub fn dimensions(world: &World) -> LaneDimensions {
        world.config.dimensions
    }

    /// Current balance of the player.
    #[must_use]
    pub fn gold(world: &World, player: PlayerId) -> Gold {
        world.player(player).gold
    }

    /// Provides read-only access to the lane owned by the player.
    #[must_use]
    pub fn lane(world: &World, player: PlayerId) -> &Lane {
        &world.player(player).lane
    }

    /// Soldiers purchased by the player, in purchase order.
    #[must_use]
    pub fn soldiers(world: &World, player: PlayerId) -> &[SoldierId] {
        &world.player(player).soldiers
    }

    /// Price the player would pay for the next unit of `kind`.
    ///
    /// Towers are priced against the player's own lane, soldiers against the
    /// opponent's lane where they are spawned.
    #[must_use]
    pub fn next_cost(world: &World, player: PlayerId, kind: UnitKind) -> Gold {
        let priced_lane = match kind {
            UnitKind::Tower => lane(world, player),
            UnitKind::Soldier => lane(world, player.opponent()),
        };
        world
            .config
            .costs
            .next_cost(kind, priced_lane.unit_count(kind))
    }
}

/// One player's view of the world, handed to strategies.
///
/// Purchases take the same path as the commands handled by [`apply`]; the
/// resulting events are kept so callers can log or replay them.
#[derive(Debug)]
pub struct Seat<'world> {
    world: &'world mut World,
    player: PlayerId,
    events: Vec<Event>,
}

impl<'world> Seat<'world> {
    /// Seats the player at the world.
    #[must_use]
    pub fn new(world: &'world mut World, player: PlayerId) -> Self {
        Self {
            world,
            player,
            events: Vec::new(),
        }
    }

    /// Player represented by the seat.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// Events produced by purchases made through the seat.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Consumes the seat, yielding the events produced through it.
    #[must_use]
    pub fn into_events(self) -> Vec<Event> {
        self.events
    }

    fn lane_owner(&self, side: LaneSide) -> PlayerId {
        match side {
            LaneSide::Home => self.player,
            LaneSide::Enemy => self.player.opponent(),
        }
    }
}

impl PlayerContext for Seat<'_> {
    fn dimensions(&self) -> lane_defence_core::LaneDimensions {
        query::dimensions(self.world)
    }

    fn occupant(&self, side: LaneSide, cell: CellCoord) -> Option<Occupant> {
        query::lane(self.world, self.lane_owner(side)).occupant(cell)
    }

    fn unit_count(&self, side: LaneSide, kind: UnitKind) -> u32 {
        query::lane(self.world, self.lane_owner(side)).unit_count(kind)
    }

    fn gold(&self) -> Gold {
        query::gold(self.world, self.player)
    }

    fn next_cost(&self, kind: UnitKind) -> Gold {
        query::next_cost(self.world, self.player, kind)
    }

    fn try_purchase(&mut self, purchase: Purchase) -> Result<CellCoord, PurchaseError> {
        self.world.purchase(self.player, purchase, &mut self.events)
    }
}
