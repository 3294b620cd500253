//! Integration tests for the panzer game engine
//!
//! Tests the full stack: purchases, deployment, movement, combat, capture,
//! turn flow, board copies and a custom rules engine behind the trait.

use panzer_core::{
    Board, Cell, CombatResult, Country, EquipmentId, Facing, GameConfig, GameError, Grid, Hex, PathStep, Player,
    RangeCell, Rules, RulesConfig, Side, StandardRules, Supply, Unit, UnitId,
};

// ============================================================================
// TEST FIXTURES
// ============================================================================

const AXIS: u8 = 0;
const ALLIES: u8 = 1;

fn deterministic() -> GameConfig {
    GameConfig {
        rules: RulesConfig::deterministic(),
        ..Default::default()
    }
}

/// One-row front: Axis at the west end, an Allied-held objective in the east
fn front_line() -> Board {
    let mut board = Board::new("Front", 1, 6, deterministic());
    board.add_player(Player::new(AXIS, Side::Axis, Country::Germany, 1000));
    board.add_player(Player::new(ALLIES, Side::Allies, Country::Britain, 1000));

    let mut objective = Hex::new(Cell::new(0, 5));
    objective.victory_side = Some(Side::Axis);
    objective.owner = Some(ALLIES);
    objective.name = "Hill 112".to_string();
    board.set_hex(&objective).unwrap();
    board
}

fn counters<R: Rules>(board: &Board<R>) -> Vec<[u16; 4]> {
    board
        .grid()
        .hexes()
        .map(|h| {
            [
                h.zoc_count(Side::Axis),
                h.zoc_count(Side::Allies),
                h.spot_count(Side::Axis),
                h.spot_count(Side::Allies),
            ]
        })
        .collect()
}

/// Counters must match what a fresh registration of the same units gives
fn assert_counters_consistent(board: &Board) {
    let mut fresh = Board::new("Fresh", 1, 1, GameConfig::default());
    fresh.copy_from(board);
    assert_eq!(counters(board), counters(&fresh));
}

// ============================================================================
// FULL GAME FLOW
// ============================================================================

#[test]
fn test_buy_deploy_fight_and_win() {
    let mut board = front_line();
    assert_eq!(board.sides_victory_hexes(), [1, 0]);

    board.buy_unit(AXIS, 3, None).unwrap();
    board.buy_unit(ALLIES, 20, None).unwrap();
    let tank = board.deploy_player_unit(AXIS, 0, Cell::new(0, 0)).unwrap();
    let inf = board.deploy_player_unit(ALLIES, 0, Cell::new(0, 3)).unwrap();
    assert!(board.player(AXIS).unwrap().deployment_list.is_empty());

    // Turn 1: advance into contact and attack
    board.select_unit(tank).unwrap();
    let advance = board.move_unit(tank, Cell::new(0, 2)).unwrap();
    assert!(!advance.is_surprised);
    assert!(!board.can_undo_move(tank), "the infantry came into view");
    let first = board.attack_unit(tank, inf, false).unwrap();
    assert_eq!(first.kills, 4);
    assert_eq!(board.unit(inf).unwrap().strength, 6);
    assert_counters_consistent(&board);
    board.end_turn();
    board.end_turn();

    // Turn 2
    board.select_unit(tank).unwrap();
    board.attack_unit(tank, inf, false).unwrap();
    assert_eq!(board.unit(inf).unwrap().strength, 2);
    board.end_turn();
    board.end_turn();
    assert_eq!(board.turn(), 3);

    // Turn 3: finish the defender and roll onto the objective
    board.select_unit(tank).unwrap();
    board.attack_unit(tank, inf, false).unwrap();
    assert!(board.unit(inf).is_none());
    assert_counters_consistent(&board);

    let result = board.move_unit(tank, Cell::new(0, 5)).unwrap();
    assert_eq!(result.passed_cells.len(), 4);
    assert_eq!(result.victory_side, Some(Side::Axis));
    assert!(board.sides_victory_hexes()[Side::Axis.index()] <= 0);
    assert_eq!(board.hex(Cell::new(0, 5)).unwrap().owner, Some(AXIS));
    assert_counters_consistent(&board);
}

#[test]
fn test_prestige_flow_over_turns() {
    let mut board = front_line();
    let start = board.player(AXIS).unwrap().prestige;
    board.buy_unit(AXIS, 1, Some(10)).unwrap();
    let spent = start - board.player(AXIS).unwrap().prestige;
    assert_eq!(spent, (6 + 4) * panzer_core::CURRENCY_MULTIPLIER);

    board.end_turn();
    board.end_turn();
    let stipend = board.config().end_turn_prestige;
    assert_eq!(board.player(AXIS).unwrap().prestige, start - spent + stipend);
    assert_eq!(board.player(ALLIES).unwrap().prestige, 1000 + stipend);
    assert_eq!(board.player(AXIS).unwrap().played_turn, Some(1));
}

#[test]
fn test_move_undo_move_again() {
    let mut board = front_line();
    board.buy_unit(AXIS, 1, None).unwrap();
    let inf = board.deploy_player_unit(AXIS, 0, Cell::new(0, 0)).unwrap();
    let before = counters(&board);

    board.select_unit(inf).unwrap();
    board.move_unit(inf, Cell::new(0, 3)).unwrap();
    assert!(board.undo_last_move());
    assert_eq!(counters(&board), before);
    assert_eq!(board.unit(inf).unwrap().moves_left, 3);

    // The unit is selected again and may take a different route
    let result = board.move_unit(inf, Cell::new(0, 1)).unwrap();
    assert_eq!(result.destination(), Some(Cell::new(0, 1)));
    assert_counters_consistent(&board);
}

#[test]
fn test_rejections_leave_board_untouched() {
    let mut board = front_line();
    board.buy_unit(ALLIES, 20, None).unwrap();
    let inf = board.deploy_player_unit(ALLIES, 0, Cell::new(0, 4)).unwrap();
    let before = counters(&board);

    assert_eq!(board.select_unit(inf), Err(GameError::NotYourUnit { unit: inf, player: AXIS }));
    assert_eq!(board.move_unit(inf, Cell::new(0, 3)), Err(GameError::Unreachable(Cell::new(0, 3))));
    assert_eq!(board.select_unit(UnitId(42)), Err(GameError::UnitNotFound(UnitId(42))));
    assert_eq!(board.deploy_player_unit(AXIS, 0, Cell::new(0, 0)), Err(GameError::InvalidDeployment(0)));
    assert_eq!(board.deploy_player_unit(ALLIES, 0, Cell::new(0, 4)), Err(GameError::InvalidDeployment(0)));

    assert_eq!(board.unit(inf).unwrap().hex(), Some(Cell::new(0, 4)));
    assert_eq!(counters(&board), before);
    assert_eq!(board.current_unit(), None);
}

// ============================================================================
// CONFIGURATION AND RANDOMNESS
// ============================================================================

fn duel(config: GameConfig) -> CombatResult {
    let mut board = Board::new("Duel", 1, 2, config);
    board.add_player(Player::new(AXIS, Side::Axis, Country::Germany, 0));
    board.add_player(Player::new(ALLIES, Side::Allies, Country::Britain, 0));
    let mut tank = Unit::new(panzer_core::get_equipment(2).unwrap());
    tank.owner = AXIS;
    let mut inf = Unit::new(panzer_core::get_equipment(20).unwrap());
    inf.owner = ALLIES;
    let tank = board.place_unit(tank, Cell::new(0, 0)).unwrap();
    let inf = board.place_unit(inf, Cell::new(0, 1)).unwrap();
    board.attack_unit(tank, inf, false).unwrap()
}

#[test]
fn test_seeded_combat_is_reproducible() {
    let config = GameConfig {
        rules: RulesConfig { combat_variance: 2, seed: Some(1940) },
        ..Default::default()
    };
    assert_eq!(duel(config.clone()), duel(config));
}

#[test]
fn test_config_file_drives_board() {
    let path = std::env::temp_dir().join(format!("panzer-it-{}.json", std::process::id()));
    std::fs::write(&path, r#"{ "starting_prestige": 500, "end_turn_prestige": 10, "rules": { "combat_variance": 0, "seed": 3 } }"#).unwrap();
    let config = GameConfig::load(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(config.flag_capture_prestige, GameConfig::default().flag_capture_prestige);
    let mut board = Board::new("Configured", 2, 2, config);
    board.add_player(Player::new(AXIS, Side::Axis, Country::Germany, 500));
    board.end_turn();
    assert_eq!(board.player(AXIS).unwrap().prestige, 510);
}

// ============================================================================
// CUSTOM RULES ENGINE
// ============================================================================

/// Stock rules with every unit sold at a flat price
struct FlatPriceRules {
    inner: StandardRules,
    price: u32,
}

impl Rules for FlatPriceRules {
    fn unit_cost(&self, equipment: EquipmentId, transport: Option<EquipmentId>) -> Option<u32> {
        self.inner.unit_cost(equipment, transport).map(|_| self.price)
    }

    fn upgrade_cost(&self, unit: &Unit, upgrade: EquipmentId, transport: Option<EquipmentId>) -> Option<u32> {
        self.inner.upgrade_cost(unit, upgrade, transport).map(|_| self.price)
    }

    fn is_air(&self, unit: &Unit) -> bool {
        self.inner.is_air(unit)
    }

    fn can_attack(&self, attacker: &Unit, defender: &Unit) -> bool {
        self.inner.can_attack(attacker, defender)
    }

    fn resolve_attack(&mut self, attacker: &Unit, defender: &Unit) -> CombatResult {
        self.inner.resolve_attack(attacker, defender)
    }

    fn direction(&self, from: Cell, to: Cell) -> Option<Facing> {
        self.inner.direction(from, to)
    }

    fn apply_zoc(&self, grid: &mut Grid, unit: &Unit, add: bool) {
        self.inner.apply_zoc(grid, unit, add)
    }

    fn apply_spotting(&self, grid: &mut Grid, units: &[Unit], unit: &Unit, add: bool) -> usize {
        self.inner.apply_spotting(grid, units, unit, add)
    }

    fn can_capture(&self, unit: &Unit) -> bool {
        self.inner.can_capture(unit)
    }

    fn can_enter(&self, grid: &Grid, units: &[Unit], unit: &Unit, cell: Cell) -> bool {
        self.inner.can_enter(grid, units, unit, cell)
    }

    fn move_range(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> Vec<RangeCell> {
        self.inner.move_range(grid, units, unit)
    }

    fn attack_range(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> Vec<Cell> {
        self.inner.attack_range(grid, units, unit)
    }

    fn shortest_path(&self, from: Cell, to: Cell, range: &[RangeCell]) -> Vec<PathStep> {
        self.inner.shortest_path(from, to, range)
    }

    fn resupply_value(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> Supply {
        self.inner.resupply_value(grid, units, unit)
    }

    fn reinforce_value(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> u8 {
        self.inner.reinforce_value(grid, units, unit)
    }
}

#[test]
fn test_custom_rules_engine() {
    let config = deterministic();
    let rules = FlatPriceRules {
        inner: StandardRules::new(&config.rules),
        price: 5,
    };
    let mut board = Board::with_rules("Flat", 1, 4, config, rules);
    board.add_player(Player::new(AXIS, Side::Axis, Country::Germany, 100));

    board.buy_unit(AXIS, 3, None).unwrap();
    board.buy_unit(AXIS, 9, None).unwrap();
    assert_eq!(board.player(AXIS).unwrap().prestige, 90);
    assert_eq!(board.buy_unit(AXIS, 999, None), Err(GameError::UnknownEquipment(999)));

    let tank = board.deploy_player_unit(AXIS, 0, Cell::new(0, 0)).unwrap();
    board.upgrade_unit(tank, 2, None).unwrap();
    assert_eq!(board.player(AXIS).unwrap().prestige, 85);

    board.select_unit(tank).unwrap();
    let result = board.move_unit(tank, Cell::new(0, 3)).unwrap();
    assert_eq!(result.passed_cells.len(), 4);
    assert!(board.can_undo_move(tank));
}
