//! Panzer Core - Game state engine for a hex wargame
//!
//! This crate provides the authoritative game state:
//! - Hex grid geometry (odd-q offset cells, axial distances, facings)
//! - Equipment table, units and players with a prestige economy
//! - Board orchestration: movement, combat, capture, deployment, undo
//! - ZOC and spotting bookkeeping as per-side reference counters
//! - A pluggable rules engine (`Rules`) with a stock implementation

pub mod coords;
pub mod equipment;
pub mod player;
pub mod hex;
pub mod grid;
pub mod unit;
pub mod rules;
pub mod results;
pub mod board;
pub mod config;
pub mod error;

// Re-exports for convenient access
pub use coords::{Cell, Facing, DIRECTIONS};
pub use equipment::{get_equipment, Country, Equipment, EquipmentId, UnitClass, CURRENCY_MULTIPLIER, EQUIPMENT, MAX_STRENGTH};
pub use player::{Deployment, Player, PlayerId, Side};
pub use hex::{Hex, Road, Terrain};
pub use grid::Grid;
pub use unit::{Unit, UnitId, UnitState};
pub use rules::{PathStep, RangeCell, Rules, StandardRules, Supply};
pub use results::{CombatResult, MovementResult};
pub use board::Board;
pub use config::{GameConfig, RulesConfig};
pub use error::GameError;
