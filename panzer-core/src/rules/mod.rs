//! Rules engine contract
//!
//! The board owns state and bookkeeping; everything derived (costs, ranges,
//! paths, combat outcomes, ZOC and spotting footprints) comes from a
//! `Rules` implementation. `StandardRules` is the stock engine.

pub mod standard;

use serde::{Deserialize, Serialize};

use crate::coords::{Cell, Facing};
use crate::equipment::EquipmentId;
use crate::grid::Grid;
use crate::results::CombatResult;
use crate::unit::Unit;

pub use standard::StandardRules;

/// One reachable cell of a move range
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeCell {
    pub cell: Cell,
    /// Total movement cost from the unit's position
    pub cost: u8,
    /// Valid destination
    pub can_move: bool,
    /// Movement may continue through this cell
    pub can_pass: bool,
}

/// One step of a resolved path
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathStep {
    pub cell: Cell,
    /// Cost of entering this cell (0 for the starting cell)
    pub cost: u8,
}

/// Ammo and fuel a unit may take on
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Supply {
    pub ammo: u8,
    pub fuel: u8,
}

pub trait Rules {
    /// Prestige price of a new unit, `None` for unknown equipment
    fn unit_cost(&self, equipment: EquipmentId, transport: Option<EquipmentId>) -> Option<u32>;

    /// Prestige price of re-equipping `unit`, `None` for unknown equipment
    fn upgrade_cost(&self, unit: &Unit, upgrade: EquipmentId, transport: Option<EquipmentId>) -> Option<u32>;

    fn is_air(&self, unit: &Unit) -> bool;

    /// Range and class check only; visibility is the caller's concern
    fn can_attack(&self, attacker: &Unit, defender: &Unit) -> bool;

    fn resolve_attack(&mut self, attacker: &Unit, defender: &Unit) -> CombatResult;

    fn direction(&self, from: Cell, to: Cell) -> Option<Facing>;

    /// Add or remove the unit's zone of control. Every add must be paired
    /// with a remove from the same position.
    fn apply_zoc(&self, grid: &mut Grid, unit: &Unit, add: bool);

    /// Add or remove the unit's spotting. Returns how many enemy units
    /// became visible to its side (always 0 on removal).
    fn apply_spotting(&self, grid: &mut Grid, units: &[Unit], unit: &Unit, add: bool) -> usize;

    fn can_capture(&self, unit: &Unit) -> bool;

    /// Whether the unit may actually step into `cell` right now
    fn can_enter(&self, grid: &Grid, units: &[Unit], unit: &Unit, cell: Cell) -> bool;

    fn move_range(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> Vec<RangeCell>;

    fn attack_range(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> Vec<Cell>;

    /// Path from `from` to `to` through a precomputed move range. Empty if
    /// the destination is not in the range.
    fn shortest_path(&self, from: Cell, to: Cell, range: &[RangeCell]) -> Vec<PathStep>;

    fn resupply_value(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> Supply;

    fn reinforce_value(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> u8;
}
