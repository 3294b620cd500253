//! Deployed military units

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::coords::{Cell, Facing};
use crate::equipment::{Country, Equipment, UnitClass, MAX_STRENGTH};
use crate::player::{PlayerId, Side};

/// Fuel an airborne unit burns at the end of every turn
pub const AIR_FUEL_UPKEEP: u8 = 5;

/// Unique unit identifier, assigned by the board on registration
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UnitId(pub u32);

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-turn state captured before a move so it can be undone
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnitState {
    pub facing: Facing,
    pub strength: u8,
    pub experience: u32,
    pub fuel: u8,
    pub ammo: u8,
    pub moves_left: u8,
    pub has_moved: bool,
    pub has_fired: bool,
    pub has_resupplied: bool,
    pub is_mounted: bool,
}

/// A unit on (or about to be placed on) the map.
///
/// The unit knows which hex it sits on through `hex()`; the hex in turn
/// stores the unit id. Both halves are kept in sync by `Hex::set_unit` and
/// `Hex::del_unit`.
#[derive(Clone, Debug)]
pub struct Unit {
    id: UnitId,
    equipment: &'static Equipment,
    transport: Option<&'static Equipment>,
    hex: Option<Cell>,
    pub owner: PlayerId,
    pub side: Side,
    pub flag: Country,
    pub facing: Facing,
    pub strength: u8,
    pub experience: u32,
    pub fuel: u8,
    pub ammo: u8,
    pub moves_left: u8,
    pub has_moved: bool,
    pub has_fired: bool,
    pub has_resupplied: bool,
    pub is_mounted: bool,
    pub destroyed: bool,
    /// Revealed by bumping into it this turn, even if not spotted
    pub temp_spotted: bool,
}

impl Unit {
    pub fn new(equipment: &'static Equipment) -> Self {
        Self {
            id: UnitId::default(),
            equipment,
            transport: None,
            hex: None,
            owner: 0,
            side: Side::Axis,
            flag: equipment.country,
            facing: Facing::default(),
            strength: MAX_STRENGTH,
            experience: 0,
            fuel: equipment.fuel,
            ammo: equipment.ammo,
            moves_left: equipment.movement,
            has_moved: false,
            has_fired: false,
            has_resupplied: false,
            is_mounted: false,
            destroyed: false,
            temp_spotted: false,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn id(&self) -> UnitId {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: UnitId) {
        self.id = id;
    }

    pub fn equipment(&self) -> &'static Equipment {
        self.equipment
    }

    pub fn transport(&self) -> Option<&'static Equipment> {
        self.transport
    }

    /// Hex this unit currently occupies
    pub fn hex(&self) -> Option<Cell> {
        self.hex
    }

    pub(crate) fn set_hex(&mut self, hex: Option<Cell>) {
        self.hex = hex;
    }

    pub fn class(&self) -> UnitClass {
        self.equipment.class
    }

    pub fn is_air(&self) -> bool {
        self.equipment.class.is_air()
    }

    /// Movement allowance for a fresh turn
    pub fn movement(&self) -> u8 {
        match (self.is_mounted, self.transport) {
            (true, Some(transport)) => transport.movement,
            _ => self.equipment.movement,
        }
    }

    pub fn can_fire(&self) -> bool {
        !self.has_fired && self.ammo > 0
    }

    /// Icon for the current state (the transport's while mounted)
    pub fn icon(&self) -> &'static str {
        match (self.is_mounted, self.transport) {
            (true, Some(transport)) => transport.icon,
            _ => self.equipment.icon,
        }
    }

    /// Attach a transport. Only transport equipment on a transportable unit
    /// is accepted.
    pub fn set_transport(&mut self, transport: Option<&'static Equipment>) -> bool {
        if let Some(t) = transport {
            if t.class != UnitClass::Transport || !self.equipment.class.is_transportable() {
                return false;
            }
        } else {
            self.is_mounted = false;
        }
        self.transport = transport;
        true
    }

    // ========================================================================
    // MUTATORS
    // ========================================================================

    /// Spend ammo. A full attack also uses up the unit's fire for the turn.
    pub fn fire(&mut self, full_attack: bool) {
        self.ammo = self.ammo.saturating_sub(1);
        if full_attack {
            self.has_fired = true;
        }
    }

    pub fn hit(&mut self, losses: u8) {
        self.strength = self.strength.saturating_sub(losses);
        if self.strength == 0 {
            self.destroyed = true;
        }
    }

    pub fn move_by(&mut self, cost: u8) {
        self.moves_left = self.moves_left.saturating_sub(cost);
        if self.equipment.uses_fuel() {
            self.fuel = self.fuel.saturating_sub(cost);
        }
        self.has_moved = true;
    }

    /// Refill ammo and fuel. Uses the unit's whole turn.
    pub fn resupply(&mut self, ammo: u8, fuel: u8) {
        self.ammo = self.ammo.saturating_add(ammo).min(self.equipment.ammo);
        self.fuel = self.fuel.saturating_add(fuel).min(self.equipment.fuel);
        self.spend_turn();
    }

    /// Add replacement strength. Uses the unit's whole turn.
    pub fn reinforce(&mut self, strength: u8) {
        self.strength = self.strength.saturating_add(strength).min(MAX_STRENGTH);
        self.spend_turn();
    }

    pub fn mount(&mut self) -> bool {
        let transport = match self.transport {
            Some(t) if !self.is_mounted && !self.has_moved => t,
            _ => return false,
        };
        self.is_mounted = true;
        self.moves_left = transport.movement;
        true
    }

    pub fn unmount(&mut self) -> bool {
        if !self.is_mounted {
            return false;
        }
        self.is_mounted = false;
        self.moves_left = if self.has_moved { 0 } else { self.equipment.movement };
        true
    }

    /// Swap to new equipment of the same class. Returns false (and changes
    /// nothing) if the combination is not allowed.
    pub fn upgrade(&mut self, equipment: &'static Equipment, transport: Option<&'static Equipment>) -> bool {
        if equipment.class != self.equipment.class {
            return false;
        }
        if let Some(t) = transport {
            if t.class != UnitClass::Transport || !equipment.class.is_transportable() {
                return false;
            }
        }

        self.equipment = equipment;
        self.transport = transport;
        if transport.is_none() {
            self.is_mounted = false;
        }
        self.ammo = equipment.ammo;
        self.fuel = equipment.fuel;
        self.moves_left = if self.has_moved { 0 } else { self.movement() };
        true
    }

    /// Reset per-turn flags at the start of a new turn
    pub fn end_turn(&mut self) {
        self.has_moved = false;
        self.has_fired = false;
        self.has_resupplied = false;
        self.temp_spotted = false;
        self.moves_left = self.movement();
        if self.is_air() && self.equipment.uses_fuel() {
            self.fuel = self.fuel.saturating_sub(AIR_FUEL_UPKEEP);
        }
    }

    pub fn save_state(&self) -> UnitState {
        UnitState {
            facing: self.facing,
            strength: self.strength,
            experience: self.experience,
            fuel: self.fuel,
            ammo: self.ammo,
            moves_left: self.moves_left,
            has_moved: self.has_moved,
            has_fired: self.has_fired,
            has_resupplied: self.has_resupplied,
            is_mounted: self.is_mounted,
        }
    }

    pub fn restore_state(&mut self, state: &UnitState) {
        self.facing = state.facing;
        self.strength = state.strength;
        self.experience = state.experience;
        self.fuel = state.fuel;
        self.ammo = state.ammo;
        self.moves_left = state.moves_left;
        self.has_moved = state.has_moved;
        self.has_fired = state.has_fired;
        self.has_resupplied = state.has_resupplied;
        self.is_mounted = state.is_mounted;
    }

    fn spend_turn(&mut self) {
        self.has_resupplied = true;
        self.has_moved = true;
        self.has_fired = true;
    }
}

/// Find a unit by id in a registry slice
pub fn find_unit(units: &[Unit], id: UnitId) -> Option<&Unit> {
    units.iter().find(|u| u.id == id)
}
