//! Built-in skirmish scenario
//!
//! A small 8x12 map: a German bridgehead on the west bank of a river and a
//! British-held town to the east. Axis units get ids 0-5, Allied units
//! ids 6-10, in the order listed below.

use anyhow::{Context, Result};

use panzer_core::{
    get_equipment, Board, Cell, Country, EquipmentId, Facing, GameConfig, Hex, Player, PlayerId, Road, Side,
    Terrain, Unit,
};

pub const ROWS: usize = 8;
pub const COLS: usize = 12;

pub const AXIS: PlayerId = 0;
pub const ALLIES: PlayerId = 1;

/// Column of the river, crossed by the road at `BRIDGE_ROW`
const RIVER_COL: i32 = 6;
const BRIDGE_ROW: i32 = 3;

/// (equipment, transport, row, col)
const AXIS_UNITS: [(EquipmentId, Option<EquipmentId>, i32, i32); 6] = [
    (1, Some(10), 3, 1),
    (2, None, 2, 2),
    (3, None, 4, 2),
    (6, None, 3, 0),
    (8, None, 1, 1),
    (4, None, 5, 1),
];

const ALLIED_UNITS: [(EquipmentId, Option<EquipmentId>, i32, i32); 5] = [
    (20, Some(28), 3, 9),
    (21, None, 4, 8),
    (23, None, 2, 8),
    (24, None, 3, 11),
    (26, None, 6, 10),
];

/// Build the skirmish board
pub fn skirmish(config: GameConfig) -> Result<Board> {
    let prestige = config.starting_prestige;
    let mut board = Board::new("Arras Counterstroke", ROWS, COLS, config);
    board.set_description("Hold the bridge and take the town before the Matildas arrive.");
    board.add_player(Player::new(AXIS, Side::Axis, Country::Germany, prestige));
    board.add_player(Player::new(ALLIES, Side::Allies, Country::Britain, prestige));

    lay_terrain(&mut board)?;
    for (equipment, transport, row, col) in AXIS_UNITS {
        place(&mut board, AXIS, equipment, transport, Cell::new(row, col), Facing::SE)?;
    }
    for (equipment, transport, row, col) in ALLIED_UNITS {
        place(&mut board, ALLIES, equipment, transport, Cell::new(row, col), Facing::NW)?;
    }
    Ok(board)
}

fn lay_terrain(board: &mut Board) -> Result<()> {
    for row in 0..ROWS as i32 {
        for col in 0..COLS as i32 {
            let cell = Cell::new(row, col);
            let mut hex = Hex::new(cell);
            hex.terrain = terrain_at(cell);
            if row == BRIDGE_ROW {
                hex.road = Road::Road;
            }
            if col <= 1 {
                hex.deployment = Some(AXIS);
            } else if col >= 10 {
                hex.deployment = Some(ALLIES);
            }
            hex.owner = match col {
                c if c < RIVER_COL => Some(AXIS),
                c if c > RIVER_COL => Some(ALLIES),
                _ => None,
            };
            board.set_hex(&hex)?;
        }
    }

    objective(board, Cell::new(3, 9), "Arras", Some(Side::Axis), Country::Britain)?;
    objective(board, Cell::new(5, 10), "Beaurains", Some(Side::Axis), Country::Britain)?;
    objective(board, Cell::new(2, 2), "Duisans", None, Country::Germany)?;
    objective(board, Cell::new(6, 8), "Achicourt", None, Country::Britain)?;

    let mut supply = Hex::new(Cell::new(3, 0));
    supply.road = Road::Road;
    supply.owner = Some(AXIS);
    supply.deployment = Some(AXIS);
    supply.is_supply = true;
    supply.name = "Supply depot".to_string();
    board.set_hex(&supply)?;
    Ok(())
}

fn terrain_at(cell: Cell) -> Terrain {
    match (cell.row, cell.col) {
        (_, RIVER_COL) => Terrain::River,
        (0..=1, 3..=4) | (6..=7, 2..=4) => Terrain::Forest,
        (0, 9..=11) => Terrain::Hill,
        (7, 7..=9) => Terrain::Swamp,
        _ => Terrain::Clear,
    }
}

/// Town hex with a flag; a victory hex when `victory_side` is set
fn objective(board: &mut Board, cell: Cell, name: &str, victory_side: Option<Side>, holder: Country) -> Result<()> {
    let current = board.hex(cell).with_context(|| format!("Objective {} off the map", name))?;
    let mut hex = current.clone();
    hex.terrain = Terrain::City;
    hex.name = name.to_string();
    hex.flag = Some(holder);
    hex.victory_side = victory_side;
    board.set_hex(&hex)?;
    Ok(())
}

fn place(
    board: &mut Board,
    owner: PlayerId,
    equipment: EquipmentId,
    transport: Option<EquipmentId>,
    cell: Cell,
    facing: Facing,
) -> Result<()> {
    let eq = get_equipment(equipment).with_context(|| format!("Unknown equipment {}", equipment))?;
    let mut unit = Unit::new(eq);
    if let Some(t) = transport {
        let t_eq = get_equipment(t).with_context(|| format!("Unknown transport {}", t))?;
        anyhow::ensure!(unit.set_transport(Some(t_eq)), "{} cannot use {}", eq.name, t_eq.name);
    }
    unit.owner = owner;
    unit.facing = facing;
    board.place_unit(unit, cell)?;
    Ok(())
}
