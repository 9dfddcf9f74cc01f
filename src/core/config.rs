//! Simulation configuration loaded from TOML
//!
//! Every section falls back to its defaults, so an empty file is a valid
//! config (an empty 16x16 map with no players).

use std::fs;
use std::path::Path;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::core::error::{EaterError, Result};
use crate::core::types::{Direction, Location, PlayerId, Tick};

/// Grid dimensions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub width: i32,
    pub height: i32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            width: 16,
            height: 16,
        }
    }
}

impl MapConfig {
    pub fn contains(&self, location: Location) -> bool {
        location.x >= 0 && location.y >= 0 && location.x < self.width && location.y < self.height
    }
}

/// What the driver does with players that have no move ready
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPolicy {
    /// Hold the tick open until every player has a move
    #[default]
    WaitForAll,
    /// Resolve the tick with whoever is ready; the rest stay idle
    SkipIdle,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TurnConfig {
    pub policy: TurnPolicy,
    /// Upper bound on completed ticks, headless or interactive
    pub max_ticks: Option<Tick>,
}

impl TurnConfig {
    /// `requested` ticks, capped by `max_ticks`
    pub fn tick_limit(&self, requested: Tick) -> Tick {
        match self.max_ticks {
            Some(max) => requested.min(max),
            None => requested,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerKind {
    #[default]
    Human,
    Scripted,
}

/// One `[[players]]` entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerConfig {
    pub id: PlayerId,
    #[serde(default)]
    pub kind: PlayerKind,
    /// `[x, y]`
    pub location: (i32, i32),
    #[serde(default)]
    pub facing: Direction,
    /// Directions a scripted player cycles through
    #[serde(default)]
    pub script: Vec<Direction>,
}

impl PlayerConfig {
    pub fn location(&self) -> Location {
        Location::new(self.location.0, self.location.1)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub map: MapConfig,
    pub turn: TurnConfig,
    pub players: Vec<PlayerConfig>,
}

impl SimulationConfig {
    /// Parse and validate a config from TOML text
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(
            "Loaded config from {:?}: {}x{} map, {} players",
            path,
            config.map.width,
            config.map.height,
            config.players.len()
        );
        Ok(config)
    }

    /// Check the config for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.map.width <= 0 || self.map.height <= 0 {
            return Err(EaterError::InvalidConfig(format!(
                "map must be at least 1x1, got {}x{}",
                self.map.width, self.map.height
            )));
        }

        let mut seen = AHashSet::new();
        for player in &self.players {
            if !seen.insert(player.id.clone()) {
                return Err(EaterError::DuplicatePlayer(player.id.clone()));
            }

            let location = player.location();
            if !self.map.contains(location) {
                return Err(EaterError::OutOfBounds {
                    location,
                    width: self.map.width,
                    height: self.map.height,
                });
            }

            if player.kind == PlayerKind::Scripted && player.script.is_empty() {
                return Err(EaterError::InvalidConfig(format!(
                    "scripted player {} has an empty script",
                    player.id
                )));
            }
        }

        Ok(())
    }
}
