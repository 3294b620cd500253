//! Map hexes: terrain, ownership, occupancy and per-side ZOC/spotting

use serde::{Deserialize, Serialize};

use crate::coords::Cell;
use crate::equipment::Country;
use crate::player::{PlayerId, Side};
use crate::rules::Rules;
use crate::unit::{find_unit, Unit, UnitId};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    #[default]
    Clear,
    City,
    Airfield,
    Forest,
    Hill,
    Mountain,
    Rough,
    Swamp,
    River,
    Ocean,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Road {
    #[default]
    None,
    Road,
}

/// A single map hex.
///
/// ZOC and spotting are reference counters rather than flags: several units
/// can project onto the same hex, and removing one of them must not clear
/// the others' effect. A side "has" ZOC/spotting while its counter is > 0.
#[derive(Clone, Debug)]
pub struct Hex {
    cell: Cell,
    pub terrain: Terrain,
    pub road: Road,
    pub owner: Option<PlayerId>,
    /// Secondary objective, shows the holding country's flag
    pub flag: Option<Country>,
    /// Primary objective for this side
    pub victory_side: Option<Side>,
    /// Deployment hex for a player
    pub deployment: Option<PlayerId>,
    pub is_supply: bool,
    pub name: String,
    unit: Option<UnitId>,
    air_unit: Option<UnitId>,
    zoc: [u16; 2],
    spotted: [u16; 2],
    /// Current unit can move here (UI state)
    pub is_move_sel: bool,
    /// Current unit can attack here (UI state)
    pub is_attack_sel: bool,
}

impl Hex {
    pub fn new(cell: Cell) -> Self {
        Self {
            cell,
            terrain: Terrain::Clear,
            road: Road::None,
            owner: None,
            flag: None,
            victory_side: None,
            deployment: None,
            is_supply: false,
            name: String::new(),
            unit: None,
            air_unit: None,
            zoc: [0; 2],
            spotted: [0; 2],
            is_move_sel: false,
            is_attack_sel: false,
        }
    }

    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Copy the scenario fields of another hex. Occupancy, counters and
    /// selection are left alone.
    pub fn copy_from(&mut self, other: &Hex) {
        self.terrain = other.terrain;
        self.road = other.road;
        self.owner = other.owner;
        self.flag = other.flag;
        self.victory_side = other.victory_side;
        self.deployment = other.deployment;
        self.is_supply = other.is_supply;
        self.name = other.name.clone();
    }

    // ========================================================================
    // OCCUPANCY
    // ========================================================================

    pub fn ground_unit(&self) -> Option<UnitId> {
        self.unit
    }

    pub fn air_unit(&self) -> Option<UnitId> {
        self.air_unit
    }

    /// Unit on this hex as seen in air or ground view mode
    pub fn get_unit(&self, prefer_air: bool) -> Option<UnitId> {
        match (self.unit, self.air_unit) {
            (Some(ground), Some(air)) => Some(if prefer_air { air } else { ground }),
            (ground, air) => ground.or(air),
        }
    }

    /// Place a unit here and point the unit back at this hex
    pub fn set_unit<R: Rules + ?Sized>(&mut self, unit: &mut Unit, rules: &R) {
        unit.set_hex(Some(self.cell));
        if rules.is_air(unit) {
            self.air_unit = Some(unit.id());
        } else {
            self.unit = Some(unit.id());
        }
    }

    /// Remove a unit from this hex and clear its back-reference
    pub fn del_unit<R: Rules + ?Sized>(&mut self, unit: &mut Unit, rules: &R) {
        if unit.hex() == Some(self.cell) {
            unit.set_hex(None);
        }
        let slot = if rules.is_air(unit) {
            &mut self.air_unit
        } else {
            &mut self.unit
        };
        if *slot == Some(unit.id()) {
            *slot = None;
        }
    }

    /// First unit on this hex that `attacker` can see and shoot at,
    /// checking the `air_mode` slot before the other one.
    pub fn attackable_unit<R: Rules + ?Sized>(
        &self,
        attacker: &Unit,
        air_mode: bool,
        units: &[Unit],
        rules: &R,
    ) -> Option<UnitId> {
        let side = attacker.side;
        let (first, second) = if air_mode {
            (self.air_unit, self.unit)
        } else {
            (self.unit, self.air_unit)
        };

        [first, second]
            .into_iter()
            .flatten()
            .filter_map(|id| find_unit(units, id))
            .find(|target| {
                (self.is_spotted(side) || target.temp_spotted) && rules.can_attack(attacker, target)
            })
            .map(|target| target.id())
    }

    // ========================================================================
    // ZOC / SPOTTING
    // ========================================================================

    pub fn is_zoc(&self, side: Side) -> bool {
        self.zoc[side.index()] > 0
    }

    pub fn is_spotted(&self, side: Side) -> bool {
        self.spotted[side.index()] > 0
    }

    pub fn set_zoc(&mut self, side: Side, on: bool) {
        update_counter(&mut self.zoc[side.index()], on, self.cell, "zoc");
    }

    pub fn set_spotted(&mut self, side: Side, on: bool) {
        update_counter(&mut self.spotted[side.index()], on, self.cell, "spotting");
    }

    pub fn zoc_count(&self, side: Side) -> u16 {
        self.zoc[side.index()]
    }

    pub fn spot_count(&self, side: Side) -> u16 {
        self.spotted[side.index()]
    }
}

fn update_counter(counter: &mut u16, on: bool, cell: Cell, what: &str) {
    if on {
        *counter += 1;
    } else if let Some(v) = counter.checked_sub(1) {
        *counter = v;
    } else {
        tracing::warn!("Unbalanced {} removal on hex {}", what, cell);
    }
}
