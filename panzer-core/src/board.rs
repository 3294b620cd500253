//! Board: the authoritative game state and every action that mutates it
//!
//! The board owns the grid, the player roster and the unit registry. It
//! keeps three sets of bookkeeping in step with every action:
//! - unit/hex occupancy (hex slots hold ids, units hold their cell)
//! - per-side ZOC and spotting counters on the hexes
//! - victory-hex counters and the single-slot move undo
//!
//! Everything derived (ranges, paths, combat) comes from the `Rules` engine.

use rustc_hash::FxHashMap;

use crate::config::GameConfig;
use crate::coords::Cell;
use crate::equipment::{get_equipment, Country, EquipmentId, UnitClass};
use crate::error::GameError;
use crate::grid::Grid;
use crate::hex::Hex;
use crate::player::{Player, PlayerId, Side};
use crate::results::{CombatResult, MovementResult};
use crate::rules::{RangeCell, Rules, StandardRules, Supply};
use crate::unit::{Unit, UnitId, UnitState};

// ============================================================================
// INTERNAL TYPES
// ============================================================================

/// Everything needed to put a unit back where it started its move
#[derive(Clone, Debug)]
struct LastMove {
    unit: UnitId,
    cell: Cell,
    state: UnitState,
    /// Unowned hexes claimed on the way, released again on undo
    claimed: Vec<Cell>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Capture {
    /// Hex had no owner and was simply claimed
    claimed: bool,
    /// Hex was taken from the other side
    transferred: bool,
    /// Prestige was paid out
    rewarded: bool,
    /// A victory counter changed
    counted: bool,
    win: bool,
}

impl Capture {
    fn blocks_undo(&self) -> bool {
        self.transferred || self.rewarded || self.counted
    }
}

// ============================================================================
// BOARD
// ============================================================================

#[derive(Debug)]
pub struct Board<R: Rules = StandardRules> {
    name: String,
    description: String,
    grid: Grid,
    players: Vec<Player>,
    /// Live units in registration order
    units: Vec<Unit>,
    rules: R,
    config: GameConfig,
    turn: u32,
    /// Roster index of the player whose turn it is
    current_player: Option<usize>,
    current_unit: Option<UnitId>,
    move_selected: Vec<RangeCell>,
    attack_selected: Vec<Cell>,
    /// Victory hexes each side still has to take
    sides_victory_hexes: [i32; 2],
    last_move: Option<LastMove>,
    unit_images: FxHashMap<EquipmentId, &'static str>,
    next_unit_id: u32,
}

impl Board<StandardRules> {
    /// Empty board driven by the stock rules engine
    pub fn new(name: &str, rows: usize, cols: usize, config: GameConfig) -> Self {
        let rules = StandardRules::new(&config.rules);
        Self::with_rules(name, rows, cols, config, rules)
    }
}

impl<R: Rules> Board<R> {
    pub fn with_rules(name: &str, rows: usize, cols: usize, config: GameConfig, rules: R) -> Self {
        Self {
            name: name.to_string(),
            description: String::new(),
            grid: Grid::new(rows, cols),
            players: Vec::new(),
            units: Vec::new(),
            rules,
            config,
            turn: 1,
            current_player: None,
            current_unit: None,
            move_selected: Vec::new(),
            attack_selected: Vec::new(),
            sides_victory_hexes: [0; 2],
            last_move: None,
            unit_images: FxHashMap::default(),
            next_unit_id: 0,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: &str) {
        self.description = description.to_string();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn hex(&self, cell: Cell) -> Option<&Hex> {
        self.grid.get(cell)
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.current_player.and_then(|i| self.players.get(i))
    }

    pub fn units(&self) -> &[Unit] {
        &self.units
    }

    pub fn unit(&self, id: UnitId) -> Option<&Unit> {
        self.units.iter().find(|u| u.id() == id)
    }

    /// Unit on a hex as seen in air or ground view mode
    pub fn unit_at(&self, cell: Cell, prefer_air: bool) -> Option<&Unit> {
        self.grid
            .get(cell)
            .and_then(|hex| hex.get_unit(prefer_air))
            .and_then(|id| self.unit(id))
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn current_unit(&self) -> Option<UnitId> {
        self.current_unit
    }

    /// Move range of the selected unit, pass-through cells included
    pub fn move_range(&self) -> &[RangeCell] {
        &self.move_selected
    }

    pub fn attack_targets(&self) -> &[Cell] {
        &self.attack_selected
    }

    pub fn sides_victory_hexes(&self) -> [i32; 2] {
        self.sides_victory_hexes
    }

    pub fn unit_images(&self) -> &FxHashMap<EquipmentId, &'static str> {
        &self.unit_images
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn rules(&self) -> &R {
        &self.rules
    }

    pub fn countries_by_side(&self, side: Side) -> Vec<Country> {
        self.players
            .iter()
            .filter(|p| p.side == side)
            .map(|p| p.country)
            .collect()
    }

    /// Last move of this unit can still be taken back
    pub fn can_undo_move(&self, id: UnitId) -> bool {
        self.last_move.as_ref().map_or(false, |m| m.unit == id)
    }

    pub fn log_summary(&self) {
        for player in &self.players {
            tracing::info!(
                "Player {} side {} country {} prestige {}",
                player.id,
                player.side_name(),
                player.country_name(),
                player.prestige
            );
        }
        tracing::info!(
            "Victory hexes needed: Axis {} Allies {}",
            self.sides_victory_hexes[Side::Axis.index()],
            self.sides_victory_hexes[Side::Allies.index()]
        );
    }

    // ========================================================================
    // SETUP
    // ========================================================================

    /// Add a player to the roster. The first player added starts.
    pub fn add_player(&mut self, player: Player) {
        self.players.push(player);
        if self.current_player.is_none() {
            self.current_player = Some(0);
        }
    }

    /// Copy a scenario hex onto the map and count its victory objective
    pub fn set_hex(&mut self, template: &Hex) -> Result<(), GameError> {
        let cell = template.cell();
        let hex = self.grid.get_mut(cell).ok_or(GameError::OutOfBounds(cell))?;
        if let Some(side) = hex.victory_side {
            self.sides_victory_hexes[side.index()] -= 1;
        }
        hex.copy_from(template);
        if let Some(side) = hex.victory_side {
            self.sides_victory_hexes[side.index()] += 1;
        }
        Ok(())
    }

    /// Put a scenario unit on the map for its owner
    pub fn place_unit(&mut self, mut unit: Unit, cell: Cell) -> Result<UnitId, GameError> {
        let player = self.player(unit.owner).ok_or(GameError::PlayerNotFound(unit.owner))?;
        unit.side = player.side;
        self.ensure_slot_free(&unit, cell)?;
        Ok(self.register(unit, cell))
    }

    pub fn buy_unit(
        &mut self,
        player: PlayerId,
        equipment: EquipmentId,
        transport: Option<EquipmentId>,
    ) -> Result<(), GameError> {
        let index = self.player_index(player)?;
        self.players[index].buy_unit(&self.rules, equipment, transport)
    }

    /// Deploy a purchased unit from a player's deployment list
    pub fn deploy_player_unit(&mut self, player: PlayerId, index: usize, cell: Cell) -> Result<UnitId, GameError> {
        let p = self.player_index(player)?;
        let deployment = self.players[p]
            .deployment_list
            .get(index)
            .copied()
            .ok_or(GameError::InvalidDeployment(index))?;

        let equipment = get_equipment(deployment.equipment).ok_or(GameError::UnknownEquipment(deployment.equipment))?;
        let mut unit = Unit::new(equipment);
        if let Some(transport) = deployment.transport {
            let transport_eq = get_equipment(transport).ok_or(GameError::UnknownEquipment(transport))?;
            if !unit.set_transport(Some(transport_eq)) {
                tracing::warn!("{} cannot use transport {}, deploying without it", equipment.name, transport_eq.name);
            }
        }
        unit.owner = player;
        unit.side = self.players[p].side;
        unit.flag = self.players[p].country;
        self.ensure_slot_free(&unit, cell)?;

        let id = self.register(unit, cell);
        self.players[p].deployment_list.remove(index);
        self.last_move = None;
        tracing::debug!("Player {} deployed {} {} at {}", player, equipment.name, id, cell);
        Ok(id)
    }

    // ========================================================================
    // SELECTION
    // ========================================================================

    /// Make a unit of the current player the selected unit
    pub fn select_unit(&mut self, id: UnitId) -> Result<(), GameError> {
        let index = self.unit_index(id)?;
        let owner = self.units[index].owner;
        let current = self.current_player().map(|p| p.id).ok_or(GameError::PlayerNotFound(owner))?;
        if owner != current {
            return Err(GameError::NotYourUnit { unit: id, player: current });
        }

        self.clear_selection();
        self.current_unit = Some(id);
        if !self.units[index].has_moved {
            self.set_move_range(index);
        }
        if !self.units[index].has_fired {
            self.set_attack_range(index);
        }
        tracing::debug!(
            "Selected {} ({} moves, {} targets)",
            id,
            self.move_selected.iter().filter(|rc| rc.can_move).count(),
            self.attack_selected.len()
        );
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.current_unit = None;
        self.clear_move_selection();
        self.clear_attack_selection();
    }

    fn clear_move_selection(&mut self) {
        for rc in self.move_selected.drain(..) {
            if let Some(hex) = self.grid.get_mut(rc.cell) {
                hex.is_move_sel = false;
            }
        }
    }

    fn clear_attack_selection(&mut self) {
        for cell in self.attack_selected.drain(..) {
            if let Some(hex) = self.grid.get_mut(cell) {
                hex.is_attack_sel = false;
            }
        }
    }

    fn set_move_range(&mut self, index: usize) {
        self.clear_move_selection();
        let range = self.rules.move_range(&self.grid, &self.units, &self.units[index]);
        for rc in range.iter().filter(|rc| rc.can_move) {
            if let Some(hex) = self.grid.get_mut(rc.cell) {
                hex.is_move_sel = true;
            }
        }
        self.move_selected = range;
    }

    fn set_attack_range(&mut self, index: usize) {
        self.clear_attack_selection();
        let targets = self.rules.attack_range(&self.grid, &self.units, &self.units[index]);
        for &cell in &targets {
            if let Some(hex) = self.grid.get_mut(cell) {
                hex.is_attack_sel = true;
            }
        }
        self.attack_selected = targets;
    }

    // ========================================================================
    // ACTIONS
    // ========================================================================

    /// Move the selected unit to a cell of its current move range.
    ///
    /// The walk stops early if a hidden unit blocks the path. Hexes along
    /// the way are captured if the unit is allowed to.
    pub fn move_unit(&mut self, id: UnitId, destination: Cell) -> Result<MovementResult, GameError> {
        let index = self.unit_index(id)?;
        let reachable = self.current_unit == Some(id)
            && self
                .move_selected
                .iter()
                .any(|rc| rc.cell == destination && rc.can_move);
        let start = match self.units[index].hex() {
            Some(start) if reachable => start,
            _ => return Err(GameError::Unreachable(destination)),
        };
        let path = self.rules.shortest_path(start, destination, &self.move_selected);
        if path.is_empty() {
            return Err(GameError::Unreachable(destination));
        }
        let player = self.player_index(self.units[index].owner)?;
        let side = self.units[index].side;

        let mut last_move = LastMove {
            unit: id,
            cell: start,
            state: self.units[index].save_state(),
            claimed: Vec::new(),
        };
        let can_capture = self.rules.can_capture(&self.units[index]);
        let mut result = MovementResult::default();
        let mut cost: u8 = 0;
        let mut undo_blocked = false;

        let mut reached = path.len();
        for (i, step) in path.iter().enumerate().skip(1) {
            if !self.rules.can_enter(&self.grid, &self.units, &self.units[index], step.cell) {
                result.is_surprised = true;
                result.surprise_cell = Some(step.cell);
                self.reveal_hidden(step.cell, side);
                reached = i;
                break;
            }
        }
        // A stopped unit may not end on a cell it could only pass through
        while reached > 1 && !self.is_destination(path[reached - 1].cell) {
            reached -= 1;
        }

        result.passed_cells.push(path[0]);
        for step in &path[1..reached] {
            if can_capture {
                let capture = self.capture(step.cell, player);
                if capture.win {
                    result.victory_side = Some(side);
                }
                if capture.claimed {
                    last_move.claimed.push(step.cell);
                }
                undo_blocked |= capture.blocks_undo();
            }
            result.passed_cells.push(*step);
            cost = cost.saturating_add(step.cost);
        }
        let end = result.destination().unwrap_or(start);

        let before = self.units[index].clone();
        self.units[index].move_by(cost);
        self.rules.apply_zoc(&mut self.grid, &self.units[index], false);
        if end != start {
            if let Some(hex) = self.grid.get_mut(start) {
                hex.del_unit(&mut self.units[index], &self.rules);
            }
            if let Some(hex) = self.grid.get_mut(end) {
                hex.set_unit(&mut self.units[index], &self.rules);
            }
            if let Some(facing) = self.rules.direction(start, end) {
                self.units[index].facing = facing;
            }
        }
        self.rules.apply_zoc(&mut self.grid, &self.units[index], true);
        // Spot from the new position before dropping the old footprint so
        // hexes seen from both do not count as new sightings
        let newly_spotted = self
            .rules
            .apply_spotting(&mut self.grid, &self.units, &self.units[index], true);
        self.rules.apply_spotting(&mut self.grid, &self.units, &before, false);

        self.set_move_range(index);
        self.set_attack_range(index);

        self.last_move = if newly_spotted == 0 && !result.is_surprised && !undo_blocked {
            Some(last_move)
        } else {
            None
        };
        tracing::debug!(
            "{} moved {} -> {} (cost {}, spotted {}, surprised {})",
            id,
            start,
            end,
            cost,
            newly_spotted,
            result.is_surprised
        );
        Ok(result)
    }

    /// Attack `defender` with `attacker`. Support fire uses ammo but not
    /// the attacker's turn, and draws no return fire.
    pub fn attack_unit(
        &mut self,
        attacker: UnitId,
        defender: UnitId,
        support_fire: bool,
    ) -> Result<CombatResult, GameError> {
        let a = self.unit_index(attacker)?;
        let d = self.unit_index(defender)?;
        let (a_cell, d_cell) = match (self.units[a].hex(), self.units[d].hex()) {
            (Some(a_cell), Some(d_cell)) => (a_cell, d_cell),
            (None, _) => return Err(GameError::UnitNotFound(attacker)),
            (_, None) => return Err(GameError::UnitNotFound(defender)),
        };
        if !self.rules.can_attack(&self.units[a], &self.units[d]) {
            return Err(GameError::Unreachable(d_cell));
        }

        self.last_move = None;
        let result = self.rules.resolve_attack(&self.units[a], &self.units[d]);
        tracing::debug!("{} at {} attacking {} at {}: {:?}", attacker, a_cell, defender, d_cell, result);

        if let Some(facing) = self.rules.direction(a_cell, d_cell) {
            self.units[a].facing = facing;
        }
        if let Some(facing) = self.rules.direction(d_cell, a_cell) {
            self.units[d].facing = facing;
        }
        if self.units[d].is_mounted && self.units[d].class() == UnitClass::Infantry {
            self.units[d].unmount();
        }

        self.units[a].experience += result.attacker_exp_gain;
        self.units[d].experience += result.defender_exp_gain;
        self.units[a].fire(!support_fire);
        self.units[d].hit(result.kills);
        if result.defender_can_fire && !support_fire {
            self.units[d].fire(false);
            self.units[a].hit(result.losses);
        }

        for index in [a, d] {
            if self.units[index].destroyed {
                self.remove_from_map(index);
            }
        }

        if !support_fire && self.current_unit == Some(attacker) {
            self.clear_attack_selection();
            let survivor = &self.units[a];
            if !survivor.destroyed && !survivor.has_moved {
                self.set_move_range(a);
            }
        }

        if self.units[a].destroyed || self.units[d].destroyed {
            if let Some(current) = self.current_unit {
                if self.unit(current).map_or(true, |u| u.destroyed) {
                    self.clear_selection();
                }
            }
            self.units.retain(|u| !u.destroyed);
        }
        Ok(result)
    }

    /// Refill ammo and fuel as far as the rules allow
    pub fn resupply_unit(&mut self, id: UnitId) -> Result<Supply, GameError> {
        let index = self.unit_index(id)?;
        let supply = self.rules.resupply_value(&self.grid, &self.units, &self.units[index]);
        self.last_move = None;
        self.units[index].resupply(supply.ammo, supply.fuel);
        self.clear_attack_selection();
        self.clear_move_selection();
        tracing::debug!("{} resupplied {:?}", id, supply);
        Ok(supply)
    }

    /// Buy replacement strength for a unit from its owner's prestige
    pub fn reinforce_unit(&mut self, id: UnitId) -> Result<(), GameError> {
        let index = self.unit_index(id)?;
        let player = self.player_index(self.units[index].owner)?;
        let strength = self.rules.reinforce_value(&self.grid, &self.units, &self.units[index]);
        if strength == 0 {
            tracing::debug!("{} cannot take replacements now", id);
            return Ok(());
        }

        self.players[player].reinforce_unit(&mut self.units[index], strength)?;
        self.last_move = None;
        self.clear_attack_selection();
        self.clear_move_selection();
        tracing::debug!("{} reinforced to {}", id, self.units[index].strength);
        Ok(())
    }

    pub fn mount_unit(&mut self, id: UnitId) -> Result<(), GameError> {
        self.toggle_mount(id, true)
    }

    pub fn unmount_unit(&mut self, id: UnitId) -> Result<(), GameError> {
        self.toggle_mount(id, false)
    }

    fn toggle_mount(&mut self, id: UnitId, mount: bool) -> Result<(), GameError> {
        let index = self.unit_index(id)?;
        self.ensure_current_owner(index)?;
        let unit = &mut self.units[index];
        let changed = if mount { unit.mount() } else { unit.unmount() };
        if !changed {
            return Err(GameError::CannotMount(id));
        }
        self.last_move = None;
        self.select_unit(id)
    }

    /// Re-equip a unit, paid for by its owner
    pub fn upgrade_unit(
        &mut self,
        id: UnitId,
        upgrade: EquipmentId,
        transport: Option<EquipmentId>,
    ) -> Result<(), GameError> {
        let index = self.unit_index(id)?;
        let player = self.player_index(self.units[index].owner)?;

        // Footprints depend on the equipment, so swap them around the upgrade
        self.rules.apply_zoc(&mut self.grid, &self.units[index], false);
        self.rules.apply_spotting(&mut self.grid, &self.units, &self.units[index], false);
        let outcome = self.players[player].upgrade_unit(&self.rules, &mut self.units[index], upgrade, transport);
        self.rules.apply_zoc(&mut self.grid, &self.units[index], true);
        self.rules.apply_spotting(&mut self.grid, &self.units, &self.units[index], true);
        outcome?;

        self.last_move = None;
        self.cache_images(index);
        if self.current_unit == Some(id) {
            self.select_unit(id)?;
        }
        tracing::debug!("{} upgraded to {}", id, self.units[index].equipment().name);
        Ok(())
    }

    /// Take a hex for `player`. Returns true if the capture wins the game.
    pub fn capture_hex(&mut self, cell: Cell, player: PlayerId) -> bool {
        match self.player_index(player) {
            Ok(index) => self.capture(cell, index).win,
            Err(_) => false,
        }
    }

    fn capture(&mut self, cell: Cell, player: usize) -> Capture {
        let (player_id, side, country) = {
            let p = &self.players[player];
            (p.id, p.side, p.country)
        };
        let Some(hex) = self.grid.get_mut(cell) else {
            return Capture::default();
        };
        let holder = hex
            .owner
            .and_then(|owner| self.players.iter().find(|p| p.id == owner))
            .map(|p| p.side);
        if holder == Some(side) {
            return Capture::default();
        }

        let mut capture = Capture {
            claimed: holder.is_none(),
            transferred: holder.is_some(),
            ..Capture::default()
        };
        let mut bonus = 0;
        hex.owner = Some(player_id);

        if capture.transferred && hex.flag.is_some() {
            hex.flag = Some(country);
            bonus += self.config.flag_capture_prestige;
        }
        if hex.victory_side.is_some() {
            capture.counted = true;
            self.sides_victory_hexes[side.index()] -= 1;
            if let Some(loser) = holder {
                self.sides_victory_hexes[loser.index()] += 1;
            }
            bonus += self.config.objective_capture_prestige;
            capture.win = self.sides_victory_hexes[side.index()] <= 0;
        }

        capture.rewarded = bonus > 0;
        if capture.blocks_undo() {
            self.players[player].prestige += bonus;
            tracing::info!(
                "Player {} captured {} (+{} prestige, {} victory hexes left)",
                player_id,
                cell,
                bonus,
                self.sides_victory_hexes[side.index()]
            );
        }
        if capture.win {
            tracing::info!("Side {} wins", side.name());
        }
        capture
    }

    /// Pass the turn to the next player. Wrapping back to the first player
    /// starts a new game turn.
    pub fn end_turn(&mut self) {
        self.clear_selection();
        self.last_move = None;
        let Some(current) = self.current_player else { return };
        if self.players.is_empty() {
            return;
        }

        let stipend = self.config.end_turn_prestige;
        self.players[current].end_turn(self.turn, stipend);
        let next = (current + 1) % self.players.len();
        self.current_player = Some(next);

        if next == 0 {
            self.turn += 1;
            for unit in &mut self.units {
                unit.end_turn();
            }
            tracing::info!("Turn {} begins", self.turn);
        }
        tracing::debug!("Player {} to play", self.players[next].id);
    }

    /// Take back the last move. Returns false if there is nothing to undo.
    pub fn undo_last_move(&mut self) -> bool {
        let Some(last) = self.last_move.take() else {
            return false;
        };
        let Ok(index) = self.unit_index(last.unit) else {
            return false;
        };
        let Some(current) = self.units[index].hex() else {
            return false;
        };

        self.rules.apply_zoc(&mut self.grid, &self.units[index], false);
        self.rules.apply_spotting(&mut self.grid, &self.units, &self.units[index], false);
        if let Some(hex) = self.grid.get_mut(current) {
            hex.del_unit(&mut self.units[index], &self.rules);
        }
        self.units[index].restore_state(&last.state);
        if let Some(hex) = self.grid.get_mut(last.cell) {
            hex.set_unit(&mut self.units[index], &self.rules);
        }
        self.rules.apply_zoc(&mut self.grid, &self.units[index], true);
        self.rules.apply_spotting(&mut self.grid, &self.units, &self.units[index], true);

        for cell in last.claimed {
            if let Some(hex) = self.grid.get_mut(cell) {
                hex.owner = None;
            }
        }
        tracing::debug!("Undid move of {} back to {}", last.unit, last.cell);
        if let Err(e) = self.select_unit(last.unit) {
            tracing::debug!("Could not reselect {}: {}", last.unit, e);
        }
        true
    }

    /// Rebuild this board as a copy of `other`. Units keep their ids;
    /// counters are rebuilt by registering the copies. The rules engine is
    /// not copied.
    pub fn copy_from<S: Rules>(&mut self, other: &Board<S>) {
        self.name = other.name.clone();
        self.description = other.description.clone();
        self.config = other.config.clone();
        self.turn = other.turn;
        self.grid = Grid::new(other.rows(), other.cols());
        self.players = other.players.clone();
        self.current_player = other.current_player;
        self.units.clear();
        self.unit_images.clear();
        self.current_unit = None;
        self.move_selected.clear();
        self.attack_selected.clear();
        self.last_move = None;

        for (dst, src) in self.grid.hexes_mut().zip(other.grid.hexes()) {
            dst.copy_from(src);
        }
        for unit in &other.units {
            if let Some(cell) = unit.hex() {
                self.insert_unit(unit.clone(), cell);
            }
        }
        self.next_unit_id = other.next_unit_id;
        self.sides_victory_hexes = other.sides_victory_hexes;
    }

    // ========================================================================
    // HELPERS
    // ========================================================================

    fn unit_index(&self, id: UnitId) -> Result<usize, GameError> {
        self.units
            .iter()
            .position(|u| u.id() == id)
            .ok_or(GameError::UnitNotFound(id))
    }

    fn player_index(&self, id: PlayerId) -> Result<usize, GameError> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(GameError::PlayerNotFound(id))
    }

    fn ensure_current_owner(&self, index: usize) -> Result<(), GameError> {
        let unit = &self.units[index];
        let current = self
            .current_player()
            .map(|p| p.id)
            .ok_or(GameError::PlayerNotFound(unit.owner))?;
        if unit.owner != current {
            return Err(GameError::NotYourUnit { unit: unit.id(), player: current });
        }
        Ok(())
    }

    fn ensure_slot_free(&self, unit: &Unit, cell: Cell) -> Result<(), GameError> {
        let hex = self.grid.get(cell).ok_or(GameError::OutOfBounds(cell))?;
        let slot = if self.rules.is_air(unit) {
            hex.air_unit()
        } else {
            hex.ground_unit()
        };
        match slot {
            Some(_) => Err(GameError::HexOccupied(cell)),
            None => Ok(()),
        }
    }

    /// Give a new unit a fresh id and put it on the map
    fn register(&mut self, mut unit: Unit, cell: Cell) -> UnitId {
        unit.set_id(UnitId(self.next_unit_id));
        self.next_unit_id += 1;
        self.insert_unit(unit, cell)
    }

    /// Place, record and project ZOC/spotting for a unit that already has an id
    fn insert_unit(&mut self, mut unit: Unit, cell: Cell) -> UnitId {
        if let Some(hex) = self.grid.get_mut(cell) {
            hex.set_unit(&mut unit, &self.rules);
        }
        let id = unit.id();
        self.units.push(unit);
        let index = self.units.len() - 1;
        self.cache_images(index);
        self.rules.apply_zoc(&mut self.grid, &self.units[index], true);
        self.rules.apply_spotting(&mut self.grid, &self.units, &self.units[index], true);
        id
    }

    fn cache_images(&mut self, index: usize) {
        let unit = &self.units[index];
        self.unit_images.insert(unit.equipment().id, unit.equipment().icon);
        if let Some(transport) = unit.transport() {
            self.unit_images.insert(transport.id, transport.icon);
        }
    }

    /// Withdraw a unit's ZOC/spotting and clear its hex
    fn remove_from_map(&mut self, index: usize) {
        self.rules.apply_zoc(&mut self.grid, &self.units[index], false);
        self.rules.apply_spotting(&mut self.grid, &self.units, &self.units[index], false);
        if let Some(cell) = self.units[index].hex() {
            if let Some(hex) = self.grid.get_mut(cell) {
                hex.del_unit(&mut self.units[index], &self.rules);
            }
        }
        tracing::debug!("{} destroyed", self.units[index].id());
    }

    /// Cell of the current move range the selected unit may stop on
    fn is_destination(&self, cell: Cell) -> bool {
        self.move_selected.iter().any(|rc| rc.cell == cell && rc.can_move)
    }

    /// Flag enemy units on a hex the mover bumped into
    fn reveal_hidden(&mut self, cell: Cell, side: Side) {
        let Some(hex) = self.grid.get(cell) else { return };
        let ids: Vec<UnitId> = [hex.ground_unit(), hex.air_unit()].into_iter().flatten().collect();
        for unit in self.units.iter_mut().filter(|u| ids.contains(&u.id()) && u.side != side) {
            unit.temp_spotted = true;
        }
    }
}
