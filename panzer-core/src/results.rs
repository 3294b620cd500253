//! Outcome records handed back to the UI after an action

use serde::{Deserialize, Serialize};

use crate::coords::Cell;
use crate::player::Side;
use crate::rules::PathStep;

/// What happened during a move
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementResult {
    /// Cells actually walked, starting with the origin
    pub passed_cells: Vec<PathStep>,
    /// Movement stopped early by something unseen
    pub is_surprised: bool,
    /// The cell that could not be entered
    pub surprise_cell: Option<Cell>,
    /// Set when a capture along the way won the game for this side
    pub victory_side: Option<Side>,
}

impl MovementResult {
    /// Cell the unit ended up on
    pub fn destination(&self) -> Option<Cell> {
        self.passed_cells.last().map(|step| step.cell)
    }
}

/// Outcome of one attack as computed by the rules engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    /// Strength lost by the defender
    pub kills: u8,
    /// Strength lost by the attacker
    pub losses: u8,
    pub attacker_exp_gain: u32,
    pub defender_exp_gain: u32,
    /// Defender is able to shoot back
    pub defender_can_fire: bool,
}
