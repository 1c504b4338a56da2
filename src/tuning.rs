//! Data-driven game balance
//!
//! Every knob the balance passes touched across builds lives here, so a
//! rebalance is a JSON edit rather than a code change. Defaults match the
//! shipped "power buffed" tuning.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Runtime-adjustable balance values
///
/// Upgrades mutate a copy of this held by the game state, so the loaded
/// file stays pristine for the next run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Player acceleration stat (velocity gain = speed * 0.25 per tick)
    pub player_speed: f32,
    /// Damage per swing
    pub player_damage: f32,
    /// Starting and maximum player health
    pub player_hp: f32,
    /// Ticks between player attacks
    pub attack_cooldown: u32,
    /// Maximum meat the player can carry
    pub meat_cap: u32,
    /// Ticks per machine conversion
    pub machine_speed: u32,
    /// Money per converted meat
    pub machine_value: u64,
    /// Multiplicative velocity drag per tick
    pub drag: f32,
    /// Enemies idle beyond this distance when set
    pub aggro_radius: Option<f32>,
    /// Enemies never move to an x below this boundary when set,
    /// keeping the machine's side of the map safe
    pub hunt_boundary_x: Option<f32>,
    /// Stages to clear before winning
    pub max_stages: u32,
    /// Meat drops per enemy kill
    pub drops_per_kill: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: PLAYER_SPEED,
            player_damage: PLAYER_DAMAGE,
            player_hp: PLAYER_HP,
            attack_cooldown: ATTACK_COOLDOWN_TICKS,
            meat_cap: MEAT_CAP,
            machine_speed: MACHINE_SPEED_TICKS,
            machine_value: MACHINE_VALUE,
            drag: PLAYER_DRAG,
            aggro_radius: None,
            hunt_boundary_x: None,
            max_stages: MAX_STAGES,
            drops_per_kill: DROPS_PER_KILL,
        }
    }
}

/// Failure loading a tuning file
#[derive(Debug)]
pub enum TuningError {
    Io(std::io::Error),
    Parse(serde_json::Error),
}

impl std::fmt::Display for TuningError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TuningError::Io(e) => write!(f, "failed to read tuning file: {e}"),
            TuningError::Parse(e) => write!(f, "failed to parse tuning file: {e}"),
        }
    }
}

impl std::error::Error for TuningError {}

impl From<std::io::Error> for TuningError {
    fn from(e: std::io::Error) -> Self {
        TuningError::Io(e)
    }
}

impl From<serde_json::Error> for TuningError {
    fn from(e: serde_json::Error) -> Self {
        TuningError::Parse(e)
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load tuning from a JSON file
    pub fn load(path: &std::path::Path) -> Result<Self, TuningError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load tuning from a file, falling back to defaults on any failure
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match Self::load(path) {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("{e}; using default tuning");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_shipped_balance() {
        let t = Tuning::default();
        assert_eq!(t.player_damage, 35.0);
        assert_eq!(t.player_hp, 200.0);
        assert_eq!(t.meat_cap, 12);
        assert_eq!(t.machine_speed, 50);
        assert_eq!(t.machine_value, 15);
        assert!(t.aggro_radius.is_none());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let t = Tuning::from_json(r#"{"player_damage": 50.0, "meat_cap": 20}"#).unwrap();
        assert_eq!(t.player_damage, 50.0);
        assert_eq!(t.meat_cap, 20);
        assert_eq!(t.player_hp, 200.0);
        assert_eq!(t.drag, 0.82);
    }

    #[test]
    fn test_bad_json_is_an_error() {
        assert!(Tuning::from_json("not json").is_err());
    }
}
