//! Players: prestige economy and pending deployments

use serde::{Deserialize, Serialize};

use crate::equipment::{get_equipment, Country, EquipmentId, CURRENCY_MULTIPLIER};
use crate::error::GameError;
use crate::rules::Rules;
use crate::unit::Unit;

/// Player identifier as used by hex and unit ownership
pub type PlayerId = u8;

/// The two opposing sides
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Axis = 0,
    Allies = 1,
}

impl Side {
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn opponent(self) -> Self {
        match self {
            Side::Axis => Side::Allies,
            Side::Allies => Side::Axis,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Side::Axis => "Axis",
            Side::Allies => "Allies",
        }
    }
}

/// A purchased unit waiting to be placed on the map
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deployment {
    pub equipment: EquipmentId,
    pub transport: Option<EquipmentId>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub side: Side,
    pub country: Country,
    pub prestige: u32,
    /// Last turn this player finished
    pub played_turn: Option<u32>,
    /// Pending purchases in buying order
    pub deployment_list: Vec<Deployment>,
}

impl Player {
    pub fn new(id: PlayerId, side: Side, country: Country, prestige: u32) -> Self {
        Self {
            id,
            side,
            country,
            prestige,
            played_turn: None,
            deployment_list: Vec::new(),
        }
    }

    pub fn country_name(&self) -> &'static str {
        self.country.name()
    }

    pub fn side_name(&self) -> &'static str {
        self.side.name()
    }

    /// Buy a unit and queue it for deployment
    pub fn buy_unit<R: Rules + ?Sized>(
        &mut self,
        rules: &R,
        equipment: EquipmentId,
        transport: Option<EquipmentId>,
    ) -> Result<(), GameError> {
        let cost = rules
            .unit_cost(equipment, transport)
            .ok_or(GameError::UnknownEquipment(equipment))?;
        self.ensure_affordable(cost)?;

        self.deployment_list.push(Deployment { equipment, transport });
        self.prestige -= cost;
        Ok(())
    }

    /// Pay for an upgrade. Prestige is only spent if the unit accepts it.
    pub fn upgrade_unit<R: Rules + ?Sized>(
        &mut self,
        rules: &R,
        unit: &mut Unit,
        upgrade: EquipmentId,
        transport: Option<EquipmentId>,
    ) -> Result<(), GameError> {
        let cost = rules
            .upgrade_cost(unit, upgrade, transport)
            .ok_or(GameError::UnknownEquipment(upgrade))?;
        self.ensure_affordable(cost)?;

        let new_equipment = get_equipment(upgrade).ok_or(GameError::UnknownEquipment(upgrade))?;
        let new_transport = match transport {
            Some(id) => Some(get_equipment(id).ok_or(GameError::UnknownEquipment(id))?),
            None => None,
        };
        if !unit.upgrade(new_equipment, new_transport) {
            return Err(GameError::UpgradeIncompatible(unit.id()));
        }

        self.prestige -= cost;
        Ok(())
    }

    /// Buy up to `strength` replacement points for a unit.
    ///
    /// The grant is capped by what the player can afford; a partial grant
    /// still succeeds.
    pub fn reinforce_unit(&mut self, unit: &mut Unit, strength: u8) -> Result<(), GameError> {
        let cost_per_strength = unit.equipment().cost * CURRENCY_MULTIPLIER / 10;
        let affordable = match cost_per_strength {
            0 => u32::from(strength),
            c => self.prestige / c,
        };

        if affordable < 1 {
            return Err(GameError::InsufficientPrestige {
                cost: cost_per_strength,
                available: self.prestige,
            });
        }

        let granted = affordable.min(u32::from(strength));
        self.prestige -= granted * cost_per_strength;
        // granted <= strength, which fits in u8
        unit.reinforce(granted as u8);
        Ok(())
    }

    /// Record the finished turn and collect the per-turn stipend
    pub fn end_turn(&mut self, turn: u32, stipend: u32) {
        self.played_turn = Some(turn);
        self.prestige += stipend;
    }

    fn ensure_affordable(&self, cost: u32) -> Result<(), GameError> {
        if cost > self.prestige {
            return Err(GameError::InsufficientPrestige {
                cost,
                available: self.prestige,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RulesConfig;
    use crate::equipment::get_equipment;
    use crate::rules::StandardRules;

    fn rules() -> StandardRules {
        StandardRules::new(&RulesConfig::default())
    }

    fn infantry() -> Unit {
        Unit::new(get_equipment(1).unwrap())
    }

    #[test]
    fn test_buy_unit_deducts_cost() {
        let rules = rules();
        let mut player = Player::new(0, Side::Axis, Country::Germany, 300);

        player.buy_unit(&rules, 1, None).unwrap();

        assert_eq!(player.prestige, 300 - 6 * CURRENCY_MULTIPLIER);
        assert_eq!(player.deployment_list, vec![Deployment { equipment: 1, transport: None }]);
    }

    #[test]
    fn test_buy_unit_with_transport() {
        let rules = rules();
        let mut player = Player::new(0, Side::Axis, Country::Germany, 300);

        player.buy_unit(&rules, 1, Some(10)).unwrap();

        assert_eq!(player.prestige, 300 - (6 + 4) * CURRENCY_MULTIPLIER);
    }

    #[test]
    fn test_buy_unit_unaffordable_leaves_state() {
        let rules = rules();
        let mut player = Player::new(0, Side::Axis, Country::Germany, 100);

        let err = player.buy_unit(&rules, 3, None).unwrap_err();

        assert_eq!(err, GameError::InsufficientPrestige { cost: 35 * CURRENCY_MULTIPLIER, available: 100 });
        assert_eq!(player.prestige, 100);
        assert!(player.deployment_list.is_empty());
    }

    #[test]
    fn test_buy_unknown_equipment() {
        let rules = rules();
        let mut player = Player::new(0, Side::Axis, Country::Germany, 1000);
        assert_eq!(player.buy_unit(&rules, 999, None), Err(GameError::UnknownEquipment(999)));
        assert_eq!(player.prestige, 1000);
    }

    #[test]
    fn test_purchase_order_preserved() {
        let rules = rules();
        let mut player = Player::new(0, Side::Axis, Country::Germany, 2000);
        player.buy_unit(&rules, 2, None).unwrap();
        player.buy_unit(&rules, 1, Some(10)).unwrap();
        let ids: Vec<_> = player.deployment_list.iter().map(|d| d.equipment).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn test_upgrade_charges_difference() {
        let rules = rules();
        let mut player = Player::new(0, Side::Axis, Country::Germany, 1000);
        let mut unit = Unit::new(get_equipment(2).unwrap());

        player.upgrade_unit(&rules, &mut unit, 3, None).unwrap();

        assert_eq!(unit.equipment().id, 3);
        assert_eq!(player.prestige, 1000 - (35 - 25) * CURRENCY_MULTIPLIER);
    }

    #[test]
    fn test_upgrade_incompatible_keeps_prestige() {
        let rules = rules();
        let mut player = Player::new(0, Side::Axis, Country::Germany, 1000);
        let mut unit = infantry();

        // Infantry cannot become a fighter
        let err = player.upgrade_unit(&rules, &mut unit, 8, None).unwrap_err();

        assert_eq!(err, GameError::UpgradeIncompatible(unit.id()));
        assert_eq!(player.prestige, 1000);
        assert_eq!(unit.equipment().id, 1);
    }

    #[test]
    fn test_upgrade_unaffordable() {
        let rules = rules();
        let mut player = Player::new(0, Side::Axis, Country::Germany, 10);
        let mut unit = Unit::new(get_equipment(2).unwrap());

        assert!(matches!(
            player.upgrade_unit(&rules, &mut unit, 3, None),
            Err(GameError::InsufficientPrestige { .. })
        ));
        assert_eq!(unit.equipment().id, 2);
        assert_eq!(player.prestige, 10);
    }

    #[test]
    fn test_reinforce_partial_grant() {
        let mut player = Player::new(0, Side::Axis, Country::Germany, 20);
        let mut unit = infantry();
        unit.strength = 4;

        // Infantry costs 6 * 12 / 10 = 7 per point, 20 buys two points
        player.reinforce_unit(&mut unit, 6).unwrap();

        assert_eq!(unit.strength, 6);
        assert_eq!(player.prestige, 20 - 2 * 7);
    }

    #[test]
    fn test_reinforce_capped_at_request() {
        let mut player = Player::new(0, Side::Axis, Country::Germany, 500);
        let mut unit = infantry();
        unit.strength = 7;

        player.reinforce_unit(&mut unit, 3).unwrap();

        assert_eq!(unit.strength, 10);
        assert_eq!(player.prestige, 500 - 3 * 7);
    }

    #[test]
    fn test_reinforce_unaffordable() {
        let mut player = Player::new(0, Side::Axis, Country::Germany, 5);
        let mut unit = infantry();
        unit.strength = 5;

        assert!(player.reinforce_unit(&mut unit, 5).is_err());
        assert_eq!(unit.strength, 5);
        assert_eq!(player.prestige, 5);
    }

    #[test]
    fn test_end_turn_stipend() {
        let mut player = Player::new(1, Side::Allies, Country::Britain, 300);
        player.end_turn(3, 50);
        assert_eq!(player.played_turn, Some(3));
        assert_eq!(player.prestige, 350);
    }
}
