//! Equipment definitions (unit stat table)

use serde::{Deserialize, Serialize};

/// Equipment identifier (matches `Equipment::id`)
pub type EquipmentId = u16;

/// Table costs are multiplied by this to get prestige
pub const CURRENCY_MULTIPLIER: u32 = 12;

/// Full strength of a unit
pub const MAX_STRENGTH: u8 = 10;

/// Nations fielding units
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Country {
    Germany,
    Italy,
    Britain,
    France,
    Usa,
    Ussr,
    Poland,
}

impl Country {
    pub fn name(self) -> &'static str {
        match self {
            Country::Germany => "Germany",
            Country::Italy => "Italy",
            Country::Britain => "Great Britain",
            Country::France => "France",
            Country::Usa => "USA",
            Country::Ussr => "USSR",
            Country::Poland => "Poland",
        }
    }
}

/// Broad unit class, drives movement layer, targeting and compatibility
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitClass {
    Infantry,
    Tank,
    Recon,
    AntiTank,
    Artillery,
    AirDefence,
    Fighter,
    TacticalBomber,
    Transport,
}

/// What kind of target a unit presents to attackers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetType {
    Soft,
    Hard,
    Air,
}

impl UnitClass {
    pub fn is_air(self) -> bool {
        matches!(self, UnitClass::Fighter | UnitClass::TacticalBomber)
    }

    /// Classes that can be carried by a ground transport
    pub fn is_transportable(self) -> bool {
        matches!(
            self,
            UnitClass::Infantry | UnitClass::AntiTank | UnitClass::Artillery | UnitClass::AirDefence
        )
    }

    pub fn target_type(self) -> TargetType {
        match self {
            UnitClass::Tank | UnitClass::Recon => TargetType::Hard,
            UnitClass::Fighter | UnitClass::TacticalBomber => TargetType::Air,
            _ => TargetType::Soft,
        }
    }
}

/// Equipment stat block
#[derive(Clone, Debug)]
pub struct Equipment {
    pub id: EquipmentId,
    pub name: &'static str,
    pub country: Country,
    pub class: UnitClass,
    /// Purchase cost before `CURRENCY_MULTIPLIER`
    pub cost: u32,
    pub movement: u8,
    /// Maximum fuel; 0 means the unit does not use fuel
    pub fuel: u8,
    pub ammo: u8,
    pub spot_range: u8,
    pub attack_range: u8,
    pub soft_attack: u8,
    pub hard_attack: u8,
    pub air_attack: u8,
    pub ground_defense: u8,
    pub air_defense: u8,
    pub icon: &'static str,
}

impl Equipment {
    /// `logistics` is (movement, fuel, ammo), `ranges` is (spot, attack),
    /// `attack` is (soft, hard, air) and `defense` is (ground, air)
    #[allow(clippy::too_many_arguments)]
    const fn new(
        id: EquipmentId,
        name: &'static str,
        country: Country,
        class: UnitClass,
        cost: u32,
        logistics: (u8, u8, u8),
        ranges: (u8, u8),
        attack: (u8, u8, u8),
        defense: (u8, u8),
        icon: &'static str,
    ) -> Self {
        Self {
            id,
            name,
            country,
            class,
            cost,
            movement: logistics.0,
            fuel: logistics.1,
            ammo: logistics.2,
            spot_range: ranges.0,
            attack_range: ranges.1,
            soft_attack: attack.0,
            hard_attack: attack.1,
            air_attack: attack.2,
            ground_defense: defense.0,
            air_defense: defense.1,
            icon,
        }
    }

    /// Attack value against a given target type
    pub fn attack_against(&self, target: TargetType) -> u8 {
        match target {
            TargetType::Soft => self.soft_attack,
            TargetType::Hard => self.hard_attack,
            TargetType::Air => self.air_attack,
        }
    }

    /// Defense value when attacked by a unit of the given class
    pub fn defense_against(&self, attacker: UnitClass) -> u8 {
        if attacker.is_air() {
            self.air_defense
        } else {
            self.ground_defense
        }
    }

    pub fn uses_fuel(&self) -> bool {
        self.fuel > 0
    }
}

use Country::*;
use UnitClass::*;

/// Built-in equipment table
pub static EQUIPMENT: [Equipment; 20] = [
    // Germany
    Equipment::new(1, "Wehr Inf 39", Germany, Infantry, 6, (3, 0, 10), (2, 1), (6, 2, 0), (5, 6), "ger/inf39.png"),
    Equipment::new(2, "PzIIIF", Germany, Tank, 25, (5, 50, 8), (2, 1), (6, 7, 0), (8, 8), "ger/pz3f.png"),
    Equipment::new(3, "PzIVF2", Germany, Tank, 35, (5, 50, 8), (2, 1), (9, 10, 0), (11, 10), "ger/pz4f2.png"),
    Equipment::new(4, "PSW 231/6r", Germany, Recon, 16, (7, 60, 8), (4, 1), (4, 3, 0), (4, 5), "ger/psw231.png"),
    Equipment::new(5, "Pak 38", Germany, AntiTank, 12, (2, 0, 8), (1, 1), (2, 9, 0), (3, 4), "ger/pak38.png"),
    Equipment::new(6, "10.5 leFH 18", Germany, Artillery, 20, (1, 0, 7), (1, 3), (9, 4, 0), (4, 4), "ger/lefh18.png"),
    Equipment::new(7, "8.8 Flak 36", Germany, AirDefence, 24, (1, 0, 8), (2, 2), (3, 6, 12), (3, 6), "ger/flak36.png"),
    Equipment::new(8, "Bf109E", Germany, Fighter, 38, (9, 50, 7), (4, 1), (3, 2, 10), (8, 9), "ger/bf109e.png"),
    Equipment::new(9, "Ju87B", Germany, TacticalBomber, 36, (8, 50, 5), (3, 1), (12, 10, 0), (5, 5), "ger/ju87b.png"),
    Equipment::new(10, "Opel 6700", Germany, Transport, 4, (6, 40, 0), (1, 0), (0, 0, 0), (2, 2), "ger/opel.png"),
    Equipment::new(11, "SdKfz 251", Germany, Transport, 8, (6, 40, 0), (1, 0), (0, 0, 0), (4, 4), "ger/sdkfz251.png"),
    // Great Britain
    Equipment::new(20, "GB Inf 39", Britain, Infantry, 6, (3, 0, 10), (2, 1), (6, 1, 0), (5, 6), "gb/inf39.png"),
    Equipment::new(21, "Matilda II", Britain, Tank, 30, (3, 40, 8), (2, 1), (3, 8, 0), (14, 12), "gb/matilda2.png"),
    Equipment::new(22, "Cromwell IV", Britain, Tank, 34, (6, 60, 8), (2, 1), (7, 9, 0), (10, 9), "gb/cromwell4.png"),
    Equipment::new(23, "2 Pdr ATG", Britain, AntiTank, 10, (2, 0, 8), (1, 1), (1, 8, 0), (3, 4), "gb/2pdr.png"),
    Equipment::new(24, "25 Pdr Gun", Britain, Artillery, 22, (1, 0, 7), (1, 3), (10, 4, 0), (4, 4), "gb/25pdr.png"),
    Equipment::new(25, "Bofors 40mm", Britain, AirDefence, 18, (1, 0, 8), (2, 2), (4, 4, 9), (3, 5), "gb/bofors.png"),
    Equipment::new(26, "Spitfire I", Britain, Fighter, 40, (10, 45, 7), (4, 1), (3, 2, 11), (8, 10), "gb/spitfire1.png"),
    Equipment::new(27, "Blenheim IV", Britain, TacticalBomber, 32, (8, 60, 5), (3, 1), (10, 7, 0), (4, 5), "gb/blenheim4.png"),
    Equipment::new(28, "Bedford MWD", Britain, Transport, 4, (6, 40, 0), (1, 0), (0, 0, 0), (2, 2), "gb/bedford.png"),
];

/// Look up equipment by id
pub fn get_equipment(id: EquipmentId) -> Option<&'static Equipment> {
    EQUIPMENT.iter().find(|eq| eq.id == id)
}
