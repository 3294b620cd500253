//! Error types for board operations

use crate::coords::Cell;
use crate::equipment::EquipmentId;
use crate::player::PlayerId;
use crate::unit::UnitId;

/// Reasons a game action is rejected. A rejected action leaves the board
/// untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameError {
    #[error("Unit {0} not found")]
    UnitNotFound(UnitId),

    #[error("Player {0} not found")]
    PlayerNotFound(PlayerId),

    #[error("Unit {unit} does not belong to player {player}")]
    NotYourUnit { unit: UnitId, player: PlayerId },

    #[error("Insufficient prestige: need {cost}, have {available}")]
    InsufficientPrestige { cost: u32, available: u32 },

    #[error("Destination {0} is not reachable")]
    Unreachable(Cell),

    #[error("Unit {0} cannot be upgraded to that equipment")]
    UpgradeIncompatible(UnitId),

    #[error("Unknown equipment id: {0}")]
    UnknownEquipment(EquipmentId),

    #[error("Invalid deployment index: {0}")]
    InvalidDeployment(usize),

    #[error("Hex {0} is already occupied")]
    HexOccupied(Cell),

    #[error("Hex {0} is outside the map")]
    OutOfBounds(Cell),

    #[error("Unit {0} cannot change its mounted state")]
    CannotMount(UnitId),
}
