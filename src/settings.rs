//! Game settings and tuning
//!
//! Defaults mirror `crate::consts`. A settings file is plain JSON; any field
//! left out keeps its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Rule set for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Fixed exit at the far end of the maze, kills are permanent
    #[default]
    Classic,
    /// No exit; killed enemies respawn elsewhere and pickups are replenished
    Survival,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Classic => "classic",
            Variant::Survival => "survival",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "classic" | "exit" => Some(Variant::Classic),
            "survival" | "respawn" => Some(Variant::Survival),
            _ => None,
        }
    }

    /// Whether levels have an exit cell
    pub fn has_exit(&self) -> bool {
        matches!(self, Variant::Classic)
    }

    /// Whether killed enemies come back somewhere else
    pub fn respawns_enemies(&self) -> bool {
        matches!(self, Variant::Survival)
    }
}

/// Errors produced while loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Simulation tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub variant: Variant,

    // === Maze ===
    /// Level 1 maze width (rounded up to odd)
    pub base_width: i32,
    /// Level 1 maze height (rounded up to odd)
    pub base_height: i32,
    /// Upper bound for either side as levels grow
    pub max_side: i32,

    // === Cooldowns (ms) ===
    pub player_move_cooldown_ms: u64,
    pub enemy_move_cooldown_ms: u64,
    pub projectile_cooldown_ms: u64,
    pub fire_flash_ms: u64,

    // === Ammo ===
    pub starting_ammo: u32,
    pub max_ammo: u32,

    // === Spawning ===
    /// Inclusive range for the number of pickups placed on a classic level
    pub classic_pickups_min: usize,
    pub classic_pickups_max: usize,
    /// Enemy population kept alive in survival
    pub survival_enemy_count: usize,
    /// Pickups replenished up to this count in survival
    pub survival_pickup_floor: usize,
    /// Minimum Manhattan distance between a fresh enemy and the player
    pub enemy_spawn_min_distance: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            variant: Variant::Classic,

            base_width: BASE_MAZE_SIDE,
            base_height: BASE_MAZE_SIDE,
            max_side: MAX_MAZE_SIDE,

            player_move_cooldown_ms: PLAYER_MOVE_COOLDOWN_MS,
            enemy_move_cooldown_ms: ENEMY_MOVE_COOLDOWN_MS,
            projectile_cooldown_ms: PROJECTILE_COOLDOWN_MS,
            fire_flash_ms: FIRE_FLASH_MS,

            starting_ammo: STARTING_AMMO,
            max_ammo: MAX_AMMO,

            classic_pickups_min: 1,
            classic_pickups_max: 3,
            survival_enemy_count: SURVIVAL_ENEMY_COUNT,
            survival_pickup_floor: SURVIVAL_PICKUP_FLOOR,
            enemy_spawn_min_distance: ENEMY_SPAWN_MIN_DISTANCE,
        }
    }
}

impl Settings {
    /// Default settings for a given variant
    pub fn for_variant(variant: Variant) -> Self {
        Self {
            variant,
            ..Self::default()
        }
    }

    /// Parse settings from a JSON document and validate them
    pub fn from_json_str(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json_str(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason: String| Err(SettingsError::Invalid { field, reason });

        if !(MIN_MAZE_SIDE..=MAX_MAZE_SIDE).contains(&self.max_side) {
            return invalid(
                "max_side",
                format!("{} is outside {MIN_MAZE_SIDE}..={MAX_MAZE_SIDE}", self.max_side),
            );
        }
        if self.max_side % 2 == 0 {
            return invalid("max_side", format!("{} must be odd", self.max_side));
        }
        for (field, side) in [("base_width", self.base_width), ("base_height", self.base_height)] {
            if side < MIN_MAZE_SIDE || side > self.max_side {
                return invalid(
                    field,
                    format!("{side} is outside {MIN_MAZE_SIDE}..={}", self.max_side),
                );
            }
        }
        for (field, cooldown) in [
            ("player_move_cooldown_ms", self.player_move_cooldown_ms),
            ("enemy_move_cooldown_ms", self.enemy_move_cooldown_ms),
            ("projectile_cooldown_ms", self.projectile_cooldown_ms),
        ] {
            if cooldown == 0 {
                return invalid(field, "must be greater than zero".to_string());
            }
        }
        if self.max_ammo == 0 {
            return invalid("max_ammo", "must be greater than zero".to_string());
        }
        if self.starting_ammo > self.max_ammo {
            return invalid(
                "starting_ammo",
                format!("{} exceeds max_ammo {}", self.starting_ammo, self.max_ammo),
            );
        }
        if self.classic_pickups_min > self.classic_pickups_max {
            return invalid(
                "classic_pickups_min",
                "must not exceed classic_pickups_max".to_string(),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let settings = Settings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.player_move_cooldown_ms, 150);
        assert_eq!(settings.enemy_move_cooldown_ms, 300);
        assert_eq!(settings.projectile_cooldown_ms, 75);
        assert_eq!(settings.max_ammo, 3);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json_str(r#"{ "variant": "survival", "max_ammo": 5 }"#)
            .expect("valid settings");
        assert_eq!(settings.variant, Variant::Survival);
        assert_eq!(settings.max_ammo, 5);
        assert_eq!(settings.base_width, BASE_MAZE_SIDE);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Settings::from_json_str(r#"{ "starting_ammo": 9 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "starting_ammo", .. }));

        let err = Settings::from_json_str(r#"{ "base_width": 3 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "base_width", .. }));

        let err = Settings::from_json_str(r#"{ "enemy_move_cooldown_ms": 0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "enemy_move_cooldown_ms", .. }));
    }

    #[test]
    fn test_max_side_must_be_odd_and_bounded() {
        let err = Settings::from_json_str(r#"{ "max_side": 30 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "max_side", .. }));

        let err = Settings::from_json_str(r#"{ "max_side": 101 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::Invalid { field: "max_side", .. }));

        let settings = Settings::from_json_str(r#"{ "max_side": 21 }"#).expect("valid settings");
        assert_eq!(settings.max_side, 21);
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        let err = Settings::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_variant_parsing() {
        assert_eq!(Variant::from_str("Classic"), Some(Variant::Classic));
        assert_eq!(Variant::from_str("survival"), Some(Variant::Survival));
        assert_eq!(Variant::from_str("arcade"), None);
        assert!(Variant::Classic.has_exit());
        assert!(Variant::Survival.respawns_enemies());
    }
}
