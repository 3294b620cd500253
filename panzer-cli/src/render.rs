//! Plain-text rendering of the board

use std::fmt::Write;

use panzer_core::{Board, Hex, Road, Rules, Side, Terrain, Unit};

/// Width of one map column
const CELL_WIDTH: usize = 4;

fn terrain_char(hex: &Hex) -> char {
    if hex.victory_side.is_some() {
        return '*';
    }
    if hex.flag.is_some() {
        return 'f';
    }
    match hex.terrain {
        Terrain::Clear if hex.road == Road::Road => '+',
        Terrain::Clear => '.',
        Terrain::City => 'C',
        Terrain::Airfield => 'A',
        Terrain::Forest => 'w',
        Terrain::Hill => 'h',
        Terrain::Mountain => 'M',
        Terrain::Rough => 'r',
        Terrain::Swamp => 's',
        Terrain::River => '~',
        Terrain::Ocean => '=',
    }
}

fn unit_token(unit: &Unit) -> String {
    let side = match unit.side {
        Side::Axis => 'x',
        Side::Allies => 'a',
    };
    format!("{}{}", side, unit.id().0)
}

/// Map with column header and row labels. Units show as side letter plus
/// id (`x3`, `a7`), ground units before air units.
pub fn render_map<R: Rules>(board: &Board<R>) -> String {
    let mut out = String::new();
    let _ = write!(out, "{:>3} ", "");
    for col in 0..board.cols() {
        let _ = write!(out, "{:>width$}", col, width = CELL_WIDTH);
    }
    out.push('\n');

    for (i, hex) in board.grid().hexes().enumerate() {
        let cell = hex.cell();
        if cell.col == 0 {
            let _ = write!(out, "{:>3} ", cell.row);
        }
        let token = match board.unit_at(cell, false) {
            Some(unit) => unit_token(unit),
            None => terrain_char(hex).to_string(),
        };
        let _ = write!(out, "{:>width$}", token, width = CELL_WIDTH);
        if (i + 1) % board.cols() == 0 {
            out.push('\n');
        }
    }
    out
}

/// One line per unit with its vital statistics
pub fn render_units<R: Rules>(board: &Board<R>) -> String {
    let mut out = String::new();
    for unit in board.units() {
        let position = unit.hex().map_or_else(|| "-".to_string(), |c| c.to_string());
        let _ = writeln!(
            out,
            "{:>4} {:<14} {:<6} {:>7} str {:>2} ammo {:>2} fuel {:>2}{}{}{}",
            unit.id(),
            unit.equipment().name,
            unit.side.name(),
            position,
            unit.strength,
            unit.ammo,
            unit.fuel,
            if unit.is_mounted { " mounted" } else { "" },
            if unit.has_moved { " moved" } else { "" },
            if unit.has_fired { " fired" } else { "" },
        );
    }
    out
}
