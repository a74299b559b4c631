use lane_defence_core::{
    CellCoord, Event, Gold, LaneDimensions, LaneSide, Occupant, PlayerContext, PlayerId,
    Purchase, PurchaseError, Strategy, StrategyError, UnitKind,
};
use lane_defence_system_chessboard::{
    build_towers, checkerboard_sites, first_open_site, preferred_column, Chessboard, ChessboardConfig,
    ThreatScan,
};
use lane_defence_world::{query, CostModel, MatchConfig, Seat, World};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn config_with_gold(gold: u32) -> MatchConfig {
    MatchConfig {
        dimensions: LaneDimensions::new(8, 10, 2),
        starting_gold: Gold::new(gold),
        tower_health: 100,
        costs: CostModel::default(),
    }
}

fn attempted(events: &[Event]) -> Vec<Purchase> {
    events
        .iter()
        .filter_map(|event| match event {
            Event::TowerPurchased { cell, .. } => Some(Purchase::Tower { cell: *cell }),
            Event::SoldierPurchased { cell, .. } => Some(Purchase::Soldier {
                column: cell.column(),
            }),
            Event::PurchaseRejected { purchase, .. } => Some(*purchase),
            Event::GoldGranted { .. } => None,
        })
        .collect()
}

fn tower_cells(events: &[Event]) -> Vec<CellCoord> {
    attempted(events)
        .into_iter()
        .filter_map(|purchase| match purchase {
            Purchase::Tower { cell } => Some(cell),
            Purchase::Soldier { .. } => None,
        })
        .collect()
}

fn deploy_towers(world: &mut World, player: PlayerId, strategy: &mut Chessboard) -> Vec<Event> {
    let mut seat = Seat::new(world, player);
    strategy.deploy_towers(&mut seat).expect("tower deployment");
    seat.into_events()
}

fn deploy_soldiers(
    world: &mut World,
    player: PlayerId,
    strategy: &mut Chessboard,
    seed: u64,
) -> Vec<Event> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut seat = Seat::new(world, player);
    strategy
        .deploy_soldiers(&mut seat, &mut rng)
        .expect("soldier deployment");
    seat.into_events()
}

fn fortify_inner_rows(world: &mut World, player: PlayerId, rows: u32) {
    let dimensions = query::dimensions(world);
    for cell in checkerboard_sites(dimensions, rows) {
        world.seed_tower(player, cell, 50).expect("seed tower");
    }
}

#[test]
fn towers_follow_the_checkerboard_sequence() {
    let mut world = World::new(config_with_gold(10_000));
    let mut strategy = Chessboard::default();

    let events = deploy_towers(&mut world, PlayerId::First, &mut strategy);

    let expected: Vec<CellCoord> = [
        (0, 9),
        (2, 9),
        (4, 9),
        (6, 9),
        (1, 8),
        (3, 8),
        (5, 8),
        (7, 8),
        (0, 7),
        (2, 7),
        (4, 7),
        (6, 7),
    ]
    .into_iter()
    .map(|(column, row)| CellCoord::new(column, row))
    .collect();
    assert_eq!(
        tower_cells(&events),
        expected,
        "towers should fill the three inner rows in checkerboard order"
    );
    assert_eq!(
        query::lane(&world, PlayerId::First).unit_count(UnitKind::Tower),
        12,
        "every checkerboard site should hold a tower"
    );
}

#[test]
fn no_attempts_when_first_tower_is_unaffordable() {
    let mut world = World::new(config_with_gold(9));
    let mut strategy = Chessboard::default();

    let events = deploy_towers(&mut world, PlayerId::First, &mut strategy);

    assert!(events.is_empty(), "unexpected attempts: {events:?}");
}

#[test]
fn tower_deployment_stops_once_the_rising_price_is_unaffordable() {
    // Prices run 10, 12, 14: after two towers 13 gold remains.
    let mut world = World::new(config_with_gold(35));
    let mut strategy = Chessboard::default();

    let events = deploy_towers(&mut world, PlayerId::First, &mut strategy);

    assert_eq!(
        tower_cells(&events),
        vec![CellCoord::new(0, 9), CellCoord::new(2, 9)],
        "deployment should stop once the next tower costs more than the balance"
    );
    assert_eq!(
        query::gold(&world, PlayerId::First),
        Gold::new(13),
        "unspent gold should stay with the player"
    );
}

#[test]
fn occupied_sites_are_skipped_without_retry() {
    let mut world = World::new(config_with_gold(10_000));
    world
        .seed_tower(PlayerId::First, CellCoord::new(2, 9), 100)
        .expect("seed tower");
    let mut strategy = Chessboard::default();

    let events = deploy_towers(&mut world, PlayerId::First, &mut strategy);

    let cells = tower_cells(&events);
    assert_eq!(cells.len(), 12, "every site should be attempted once");
    assert_eq!(
        cells.iter().filter(|cell| **cell == CellCoord::new(2, 9)).count(),
        1,
        "occupied site should not be retried"
    );
    assert!(
        events.contains(&Event::PurchaseRejected {
        player: PlayerId::First,
        purchase: Purchase::Tower {
            cell: CellCoord::new(2, 9)
        },
        reason: PurchaseError::Occupied,
        }),
        "occupied site should be reported as rejected"
    );
}

#[test]
fn placement_height_is_clamped_by_the_safety_zone() {
    let config = MatchConfig {
        dimensions: LaneDimensions::new(4, 4, 3),
        ..config_with_gold(10_000)
    };
    let mut world = World::new(config);
    let mut strategy = Chessboard::new(ChessboardConfig {
        max_placement_height: 4,
        ..ChessboardConfig::default()
    });

    let events = deploy_towers(&mut world, PlayerId::First, &mut strategy);

    assert_eq!(
        tower_cells(&events),
        vec![CellCoord::new(0, 3), CellCoord::new(2, 3)],
        "only the single row outside the safety zone should be built"
    );
}

#[test]
fn soldiers_wait_while_inner_rows_have_gaps() {
    let mut world = World::new(config_with_gold(10_000));
    let dimensions = query::dimensions(&world);
    let mut sites: Vec<_> = checkerboard_sites(dimensions, 2).collect();
    let gap = sites.pop().expect("at least one site");
    for cell in sites {
        world.seed_tower(PlayerId::First, cell, 50).expect("seed tower");
    }
    let mut strategy = Chessboard::default();

    {
        let seat = Seat::new(&mut world, PlayerId::First);
        assert_eq!(
            first_open_site(&seat, 2),
            Some(gap),
            "gate should report the missing inner site"
        );
    }
    let events = deploy_soldiers(&mut world, PlayerId::First, &mut strategy, 1);

    assert!(events.is_empty(), "unexpected attempts: {events:?}");
}

#[test]
fn soldiers_are_bought_once_inner_rows_are_complete() {
    let mut world = World::new(config_with_gold(10_000));
    fortify_inner_rows(&mut world, PlayerId::First, 2);
    let mut strategy = Chessboard::default();

    let _ = deploy_soldiers(&mut world, PlayerId::First, &mut strategy, 1);

    let enemy_lane = query::lane(&world, PlayerId::Second);
    for column in 0..8 {
        assert_eq!(
            enemy_lane.occupant(CellCoord::new(column, 0)),
            Some(Occupant::Soldier),
            "spawn row should be filled by the sweep"
        );
    }
}

#[test]
fn soldiers_target_the_least_dangerous_touched_column() {
    for seed in [1, 2, 3, 99] {
        let mut world = World::new(config_with_gold(10_000));
        fortify_inner_rows(&mut world, PlayerId::First, 2);
        for column in [0, 2, 4] {
            world
                .seed_tower(PlayerId::Second, CellCoord::new(column, 9), 100)
                .expect("seed enemy tower");
        }
        let mut strategy = Chessboard::default();

        let events = deploy_soldiers(&mut world, PlayerId::First, &mut strategy, seed);

        assert_eq!(
            attempted(&events).first(),
            Some(&Purchase::Soldier { column: 5 }),
            "seed {seed}"
        );
    }
}

#[test]
fn soldier_cap_stops_the_loop_and_the_sweep() {
    let mut world = World::new(config_with_gold(10_000));
    fortify_inner_rows(&mut world, PlayerId::First, 2);
    let mut strategy = Chessboard::new(ChessboardConfig {
        soldier_cap: 3,
        ..ChessboardConfig::default()
    });

    let events = deploy_soldiers(&mut world, PlayerId::First, &mut strategy, 5);

    let last_purchase = events
        .iter()
        .rposition(|event| matches!(event, Event::SoldierPurchased { .. }))
        .expect("soldiers were bought");
    assert_eq!(last_purchase, events.len() - 1, "attempts continued past cap");
    assert_eq!(
        query::lane(&world, PlayerId::Second).unit_count(UnitKind::Soldier),
        3,
        "soldier count should stop at the cap"
    );

    let events = deploy_soldiers(&mut world, PlayerId::First, &mut strategy, 6);
    assert!(events.is_empty(), "cap reached, nothing should be attempted");
}

#[test]
fn threat_scan_spreads_a_single_tower_across_three_columns() {
    let mut world = World::new(config_with_gold(0));
    world
        .seed_tower(PlayerId::Second, CellCoord::new(4, 6), 30)
        .expect("seed enemy tower");
    let seat = Seat::new(&mut world, PlayerId::First);

    let scan = ThreatScan::scan(&seat);

    let danger: Vec<f64> = (0..8).map(|column| scan.danger(column)).collect();
    assert_eq!(
        danger,
        vec![0.0, 0.0, 0.0, 15.0, 30.0, 15.0, 0.0, 0.0],
        "tower should add full health to its column and half to each neighbour"
    );
    assert_eq!(
        scan.lowest_danger(),
        Some(15.0),
        "lowest danger should come from the neighbour bleed"
    );
    assert_eq!(
        preferred_column(&scan, 0),
        3,
        "first least dangerous column should win"
    );
}

#[test]
fn threat_scan_ignores_odd_columns_and_the_safety_zone() {
    let mut world = World::new(config_with_gold(10_000));
    world
        .seed_tower(PlayerId::Second, CellCoord::new(3, 9), 30)
        .expect("seed enemy tower");
    {
        // Soldiers enter at row 0, inside the safety zone.
        let mut seat = Seat::new(&mut world, PlayerId::First);
        let _ = seat
            .try_purchase(Purchase::Soldier { column: 2 })
            .expect("soldier");
    }
    let seat = Seat::new(&mut world, PlayerId::First);

    let scan = ThreatScan::scan(&seat);

    assert_eq!(
        scan.lowest_danger(),
        None,
        "tower on an odd column should not be scanned"
    );
    assert_eq!(
        scan.interest(2),
        0,
        "soldier inside the safety zone should not add interest"
    );
}

/// Lane without a safety zone, so the spawn row lies inside the scanned band.
fn open_lane_config() -> MatchConfig {
    MatchConfig {
        dimensions: LaneDimensions::new(8, 10, 0),
        ..config_with_gold(10_000)
    }
}

fn buy_soldiers(world: &mut World, player: PlayerId, columns: &[u32]) {
    let mut seat = Seat::new(world, player);
    for &column in columns {
        let _ = seat
            .try_purchase(Purchase::Soldier { column })
            .expect("spawn cell free");
    }
}

#[test]
fn threat_scan_counts_soldiers_on_even_columns() {
    let mut world = World::new(open_lane_config());
    // A worn-out tower leaves every column at zero danger.
    world
        .seed_tower(PlayerId::Second, CellCoord::new(6, 9), 0)
        .expect("seed enemy tower");
    buy_soldiers(&mut world, PlayerId::First, &[2, 3, 4]);
    let seat = Seat::new(&mut world, PlayerId::First);

    let scan = ThreatScan::scan(&seat);

    assert_eq!(scan.interest(2), 1, "soldier at column 2 should add interest");
    assert_eq!(scan.interest(4), 1, "soldier at column 4 should add interest");
    assert_eq!(scan.interest(3), 0, "odd columns should not be scanned");
    assert_eq!(
        scan.lowest_danger(),
        Some(0.0),
        "zero health tower should set the lowest danger to zero"
    );
    assert!(
        (0..8).all(|column| scan.is_least_dangerous(column)),
        "every column should tie on danger"
    );
    assert_eq!(
        preferred_column(&scan, 7),
        2,
        "first column with the highest interest should win the tie"
    );
}

#[test]
fn soldiers_follow_interest_when_columns_tie_on_danger() {
    let mut world = World::new(open_lane_config());
    fortify_inner_rows(&mut world, PlayerId::First, 2);
    world
        .seed_tower(PlayerId::Second, CellCoord::new(6, 9), 0)
        .expect("seed enemy tower");
    buy_soldiers(&mut world, PlayerId::First, &[2, 4]);
    let mut strategy = Chessboard::default();

    let events = deploy_soldiers(&mut world, PlayerId::First, &mut strategy, 4);

    assert_eq!(
        attempted(&events).first(),
        Some(&Purchase::Soldier { column: 2 }),
        "interest should steer the first attempt to column 2"
    );
    assert!(
        events.contains(&Event::PurchaseRejected {
            player: PlayerId::First,
            purchase: Purchase::Soldier { column: 2 },
            reason: PurchaseError::Occupied,
        }),
        "occupied spawn cell should be skipped, not fatal"
    );
    assert_eq!(
        query::lane(&world, PlayerId::Second).unit_count(UnitKind::Soldier),
        8,
        "sweep should fill the remaining spawn cells"
    );
}

#[test]
fn build_towers_reports_how_many_towers_were_bought() {
    let mut world = World::new(config_with_gold(35));
    let mut seat = Seat::new(&mut world, PlayerId::First);

    let built = build_towers(&mut seat, 3).expect("tower deployment");

    assert_eq!(built, 2, "two towers should fit a balance of 35");
    assert_eq!(
        seat.events().len(),
        2,
        "only successful purchases should be recorded"
    );
}

struct RejectingPlayer {
    dimensions: LaneDimensions,
}

impl PlayerContext for RejectingPlayer {
    fn dimensions(&self) -> LaneDimensions {
        self.dimensions
    }

    fn occupant(&self, _side: LaneSide, _cell: CellCoord) -> Option<Occupant> {
        None
    }

    fn unit_count(&self, _side: LaneSide, _kind: UnitKind) -> u32 {
        0
    }

    fn gold(&self) -> Gold {
        Gold::new(100)
    }

    fn next_cost(&self, _kind: UnitKind) -> Gold {
        Gold::new(1)
    }

    fn try_purchase(&mut self, _purchase: Purchase) -> Result<CellCoord, PurchaseError> {
        Err(PurchaseError::OutOfBounds)
    }
}

#[test]
fn engine_contract_violations_abort_the_cycle() {
    let mut player = RejectingPlayer {
        dimensions: LaneDimensions::new(4, 6, 1),
    };
    let mut strategy = Chessboard::default();

    let error = strategy
        .deploy_towers(&mut player)
        .expect_err("out of bounds must be fatal");

    assert_eq!(
        error,
        StrategyError::ContractViolation {
            purchase: Purchase::Tower {
                cell: CellCoord::new(0, 5)
            },
            reason: PurchaseError::OutOfBounds,
        },
        "out of bounds rejection should surface as a contract violation"
    );
}
