//! Game configuration: prestige economy and rules-engine tuning

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prestige rewards and engine settings for a game session
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Prestige each player starts with
    pub starting_prestige: u32,
    /// Stipend collected at the end of each player turn
    pub end_turn_prestige: u32,
    /// Bonus for taking a flag (secondary objective)
    pub flag_capture_prestige: u32,
    /// Bonus for taking a victory hex
    pub objective_capture_prestige: u32,
    pub rules: RulesConfig,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_prestige: 300,
            end_turn_prestige: 50,
            flag_capture_prestige: 25,
            objective_capture_prestige: 100,
            rules: RulesConfig::default(),
        }
    }
}

/// Settings for `StandardRules`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Random swing (+/-) applied to each side's combat losses
    pub combat_variance: u8,
    /// Seed for combat randomness (None = from entropy)
    pub seed: Option<u64>,
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            combat_variance: 1,
            seed: None,
        }
    }
}

impl RulesConfig {
    /// Deterministic combat with no random swing
    pub fn deterministic() -> Self {
        Self {
            combat_variance: 0,
            seed: Some(0),
        }
    }
}

impl GameConfig {
    /// Parse from JSON text; missing fields take their defaults
    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    /// Load from JSON file
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save to JSON file
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
