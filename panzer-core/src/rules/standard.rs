//! Stock rules engine
//!
//! Terrain costs are paid on entering a hex, so any cheapest neighbour of a
//! cell in a move range is a valid predecessor; `shortest_path` relies on
//! that to walk back through a range without re-running the search.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rustc_hash::FxHashMap;

use crate::config::RulesConfig;
use crate::coords::{Cell, Facing};
use crate::equipment::{get_equipment, EquipmentId, UnitClass, CURRENCY_MULTIPLIER, MAX_STRENGTH};
use crate::grid::Grid;
use crate::hex::{Hex, Road, Terrain};
use crate::results::CombatResult;
use crate::unit::{find_unit, Unit};

use super::{PathStep, RangeCell, Rules, Supply};

/// Experience points worth one point of attack/defense
const EXPERIENCE_PER_LEVEL: u32 = 100;

#[derive(Clone, Debug)]
pub struct StandardRules {
    combat_variance: u8,
    rng: ChaCha8Rng,
}

impl StandardRules {
    pub fn new(config: &RulesConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            combat_variance: config.combat_variance,
            rng,
        }
    }

    /// Cost of entering a hex, `None` if the unit cannot go there at all
    fn entry_cost(hex: &Hex, unit: &Unit) -> Option<u8> {
        if unit.is_air() {
            return Some(1);
        }
        if hex.terrain == Terrain::Ocean {
            return None;
        }
        if hex.road == Road::Road {
            return Some(1);
        }
        Some(match hex.terrain {
            Terrain::Clear | Terrain::City | Terrain::Airfield => 1,
            Terrain::Forest | Terrain::Hill | Terrain::Rough => 2,
            Terrain::Swamp | Terrain::River | Terrain::Mountain => 3,
            Terrain::Ocean => return None,
        })
    }

    /// Unit sharing the mover's layer (air or ground) on a hex
    fn occupant<'a>(hex: &Hex, units: &'a [Unit], unit: &Unit) -> Option<&'a Unit> {
        let slot = if unit.is_air() { hex.air_unit() } else { hex.ground_unit() };
        slot.and_then(|id| find_unit(units, id))
    }

    fn roll(&mut self) -> i32 {
        if self.combat_variance == 0 {
            return 0;
        }
        let v = i32::from(self.combat_variance);
        self.rng.gen_range(-v..=v)
    }

    fn strike(&mut self, strength: u8, attack: i32, defense: i32, cap: u8) -> u8 {
        let factor = (4 + attack - defense).clamp(1, 12);
        let hits = i32::from(strength) * factor / 20 + self.roll();
        hits.clamp(0, i32::from(cap)) as u8
    }

    fn in_enemy_zoc(grid: &Grid, unit: &Unit) -> bool {
        !unit.is_air()
            && unit
                .hex()
                .and_then(|c| grid.get(c))
                .map_or(false, |hex| hex.is_zoc(unit.side.opponent()))
    }
}

impl Default for StandardRules {
    fn default() -> Self {
        Self::new(&RulesConfig::default())
    }
}

fn equipment_cost(id: EquipmentId) -> Option<u32> {
    get_equipment(id).map(|eq| eq.cost)
}

fn combat_bonus(unit: &Unit) -> i32 {
    (unit.experience / EXPERIENCE_PER_LEVEL) as i32
}

impl Rules for StandardRules {
    fn unit_cost(&self, equipment: EquipmentId, transport: Option<EquipmentId>) -> Option<u32> {
        let transport_cost = match transport {
            Some(id) => equipment_cost(id)?,
            None => 0,
        };
        Some((equipment_cost(equipment)? + transport_cost) * CURRENCY_MULTIPLIER)
    }

    fn upgrade_cost(&self, unit: &Unit, upgrade: EquipmentId, transport: Option<EquipmentId>) -> Option<u32> {
        let new_cost = self.unit_cost(upgrade, transport)?;
        let old_cost = (unit.equipment().cost + unit.transport().map_or(0, |t| t.cost)) * CURRENCY_MULTIPLIER;
        Some(new_cost.saturating_sub(old_cost))
    }

    fn is_air(&self, unit: &Unit) -> bool {
        unit.is_air()
    }

    fn can_attack(&self, attacker: &Unit, defender: &Unit) -> bool {
        if attacker.side == defender.side || attacker.ammo == 0 || attacker.is_mounted {
            return false;
        }
        if attacker.equipment().attack_against(defender.class().target_type()) == 0 {
            return false;
        }
        match (attacker.hex(), defender.hex()) {
            (Some(a), Some(d)) => {
                let distance = a.distance_to(d);
                let range = i32::from(attacker.equipment().attack_range.max(1));
                distance >= 1 && distance <= range
            }
            _ => false,
        }
    }

    fn resolve_attack(&mut self, attacker: &Unit, defender: &Unit) -> CombatResult {
        let attack = i32::from(attacker.equipment().attack_against(defender.class().target_type()))
            + combat_bonus(attacker);
        let defense = i32::from(defender.equipment().defense_against(attacker.class())) + combat_bonus(defender);
        let kills = self.strike(attacker.strength, attack, defense, defender.strength);

        let survivors = defender.strength - kills;
        let adjacent = match (attacker.hex(), defender.hex()) {
            (Some(a), Some(d)) => a.distance_to(d) == 1,
            _ => false,
        };
        let return_attack = defender.equipment().attack_against(attacker.class().target_type());
        let defender_can_fire = survivors > 0
            && adjacent
            && defender.ammo > 0
            && return_attack > 0
            && defender.class() != UnitClass::Artillery;

        let losses = if defender_can_fire {
            let counter = i32::from(return_attack) + combat_bonus(defender);
            let cover = i32::from(attacker.equipment().defense_against(defender.class())) + combat_bonus(attacker);
            self.strike(survivors, counter, cover, attacker.strength)
        } else {
            0
        };

        CombatResult {
            kills,
            losses,
            attacker_exp_gain: u32::from(kills) * 5 + 1,
            defender_exp_gain: u32::from(losses) * 5,
            defender_can_fire,
        }
    }

    fn direction(&self, from: Cell, to: Cell) -> Option<Facing> {
        from.direction_to(to)
    }

    fn apply_zoc(&self, grid: &mut Grid, unit: &Unit, add: bool) {
        if unit.is_air() {
            return;
        }
        let Some(center) = unit.hex() else { return };
        let cells: Vec<Cell> = grid.neighbors(center).collect();
        for cell in cells {
            if let Some(hex) = grid.get_mut(cell) {
                hex.set_zoc(unit.side, add);
            }
        }
    }

    fn apply_spotting(&self, grid: &mut Grid, units: &[Unit], unit: &Unit, add: bool) -> usize {
        let Some(center) = unit.hex() else { return 0 };
        let side = unit.side;
        let mut newly_spotted = 0;

        for cell in grid.cells_within(center, i32::from(unit.equipment().spot_range)) {
            let Some(hex) = grid.get_mut(cell) else { continue };
            if !add {
                hex.set_spotted(side, false);
                continue;
            }
            let was_spotted = hex.is_spotted(side);
            hex.set_spotted(side, true);
            if !was_spotted {
                newly_spotted += [hex.ground_unit(), hex.air_unit()]
                    .into_iter()
                    .flatten()
                    .filter_map(|id| find_unit(units, id))
                    .filter(|u| u.side != side)
                    .count();
            }
        }
        newly_spotted
    }

    fn can_capture(&self, unit: &Unit) -> bool {
        !unit.is_air() && unit.class() != UnitClass::Transport
    }

    fn can_enter(&self, grid: &Grid, units: &[Unit], unit: &Unit, cell: Cell) -> bool {
        let Some(hex) = grid.get(cell) else { return false };
        if Self::entry_cost(hex, unit).is_none() {
            return false;
        }
        !matches!(Self::occupant(hex, units, unit), Some(other) if other.side != unit.side)
    }

    fn move_range(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> Vec<RangeCell> {
        let Some(start) = unit.hex() else { return Vec::new() };
        if unit.has_moved {
            return Vec::new();
        }
        let budget = if unit.equipment().uses_fuel() {
            unit.moves_left.min(unit.fuel)
        } else {
            unit.moves_left
        };

        let enemy = unit.side.opponent();
        let mut range: FxHashMap<Cell, RangeCell> = FxHashMap::default();
        range.insert(
            start,
            RangeCell { cell: start, cost: 0, can_move: false, can_pass: true },
        );
        let mut queue = BinaryHeap::new();
        queue.push(Reverse((0u8, start)));

        while let Some(Reverse((cost, cell))) = queue.pop() {
            let current = match range.get(&cell) {
                Some(rc) if rc.cost == cost => *rc,
                _ => continue,
            };
            if !current.can_pass {
                continue;
            }

            for next in grid.neighbors(cell) {
                let Some(hex) = grid.get(next) else { continue };
                let Some(step) = Self::entry_cost(hex, unit) else { continue };
                let total = cost.saturating_add(step);
                if total > budget {
                    continue;
                }
                if range.get(&next).map_or(false, |rc| rc.cost <= total) {
                    continue;
                }

                let occupant = Self::occupant(hex, units, unit);
                let (can_move, can_pass) = match occupant {
                    // Visible enemies block; hidden ones are only found by bumping into them
                    Some(o) if o.side != unit.side && (hex.is_spotted(unit.side) || o.temp_spotted) => continue,
                    Some(o) if o.side == unit.side => (false, true),
                    _ => (true, true),
                };
                let stops_here = !unit.is_air() && hex.is_zoc(enemy);

                range.insert(
                    next,
                    RangeCell { cell: next, cost: total, can_move, can_pass: can_pass && !stops_here },
                );
                queue.push(Reverse((total, next)));
            }
        }

        let mut cells: Vec<RangeCell> = range.into_values().collect();
        cells.sort_by_key(|rc| (rc.cost, rc.cell));
        cells
    }

    fn attack_range(&self, grid: &Grid, units: &[Unit], unit: &Unit) -> Vec<Cell> {
        let Some(center) = unit.hex() else { return Vec::new() };
        if !unit.can_fire() {
            return Vec::new();
        }
        let reach = i32::from(unit.equipment().attack_range.max(1));
        grid.cells_within(center, reach)
            .into_iter()
            .filter(|&cell| cell != center)
            .filter(|&cell| {
                grid.get(cell)
                    .and_then(|hex| hex.attackable_unit(unit, unit.is_air(), units, self))
                    .is_some()
            })
            .collect()
    }

    fn shortest_path(&self, from: Cell, to: Cell, range: &[RangeCell]) -> Vec<PathStep> {
        let by_cell: FxHashMap<Cell, RangeCell> = range.iter().map(|rc| (rc.cell, *rc)).collect();
        match (by_cell.get(&from), by_cell.get(&to)) {
            (Some(_), Some(dest)) if dest.can_move => {}
            _ => return Vec::new(),
        }

        let mut path = Vec::new();
        let mut current = by_cell[&to];
        while current.cell != from {
            let previous = current
                .cell
                .neighbors()
                .into_iter()
                .filter_map(|n| by_cell.get(&n))
                .filter(|rc| rc.cost < current.cost && (rc.can_pass || rc.cell == from))
                .min_by_key(|rc| (rc.cost, rc.cell));
            let Some(previous) = previous else { return Vec::new() };
            path.push(PathStep { cell: current.cell, cost: current.cost - previous.cost });
            current = *previous;
        }
        path.push(PathStep { cell: from, cost: 0 });
        path.reverse();
        path
    }

    fn resupply_value(&self, grid: &Grid, _units: &[Unit], unit: &Unit) -> Supply {
        if unit.has_moved || unit.has_fired {
            return Supply::default();
        }
        let eq = unit.equipment();
        let mut supply = Supply {
            ammo: eq.ammo.saturating_sub(unit.ammo),
            fuel: eq.fuel.saturating_sub(unit.fuel),
        };
        if Self::in_enemy_zoc(grid, unit) {
            supply.ammo /= 2;
            supply.fuel /= 2;
        }
        supply
    }

    fn reinforce_value(&self, grid: &Grid, _units: &[Unit], unit: &Unit) -> u8 {
        if unit.has_moved || unit.has_fired {
            return 0;
        }
        let missing = MAX_STRENGTH.saturating_sub(unit.strength);
        if Self::in_enemy_zoc(grid, unit) {
            missing / 2
        } else {
            missing
        }
    }
}
