//! World - owns the map bounds and every player on it
//!
//! Locations kept here are authoritative; each player's own copy is synced
//! through `Player::update` at the start of every tick.

use ahash::AHashMap;

use crate::core::config::{MapConfig, PlayerKind, SimulationConfig, TurnPolicy};
use crate::core::error::{EaterError, Result};
use crate::core::types::{Location, PlayerId, Tick};
use crate::input::InputQueue;
use crate::player::{self, Player};

/// The game world containing all players
pub struct World {
    pub current_tick: Tick,
    pub(crate) map: MapConfig,
    pub(crate) policy: TurnPolicy,
    pub(crate) players: Vec<Box<dyn Player>>,
    pub(crate) locations: Vec<Location>,
    index: AHashMap<PlayerId, usize>,
    /// `update` has run for `current_tick` but moves are not resolved yet
    pub(crate) tick_open: bool,
    pub(crate) stopped: bool,
}

impl World {
    pub fn new(map: MapConfig, policy: TurnPolicy) -> Self {
        Self {
            current_tick: 0,
            map,
            policy,
            players: Vec::new(),
            locations: Vec::new(),
            index: AHashMap::new(),
            tick_open: false,
            stopped: false,
        }
    }

    /// Build a world and its players from a validated config
    pub fn from_config(config: &SimulationConfig) -> Result<Self> {
        config.validate()?;
        let mut world = Self::new(config.map.clone(), config.turn.policy);
        for player_config in &config.players {
            let player = player::from_config(player_config)?;
            world.add_player(player, player_config.location())?;
        }
        tracing::info!(
            "World ready: {}x{} map, {} players, {:?}",
            world.map.width,
            world.map.height,
            world.players.len(),
            world.policy
        );
        Ok(world)
    }

    pub fn add_player(&mut self, mut player: Box<dyn Player>, location: Location) -> Result<()> {
        let id = player.id().clone();
        if self.index.contains_key(&id) {
            return Err(EaterError::DuplicatePlayer(id));
        }
        self.check_bounds(location)?;

        player.update(location);
        self.index.insert(id.clone(), self.players.len());
        self.players.push(player);
        self.locations.push(location);
        tracing::debug!("Added {} at {:?}", id, location);
        Ok(())
    }

    /// Take a player out of the world (eaten, disconnected)
    pub fn remove_player(&mut self, id: &PlayerId) -> Result<Box<dyn Player>> {
        let idx = self
            .index
            .remove(id)
            .ok_or_else(|| EaterError::PlayerNotFound(id.clone()))?;
        let player = self.players.remove(idx);
        self.locations.remove(idx);
        for slot in self.index.values_mut() {
            if *slot > idx {
                *slot -= 1;
            }
        }
        tracing::info!("Removed {}", id);
        Ok(player)
    }

    /// Remove a player and drop any input still queued for it
    pub fn disconnect(&mut self, id: &PlayerId, input: &mut InputQueue) -> Result<Box<dyn Player>> {
        let player = self.remove_player(id)?;
        let dropped = input.clear(id);
        if dropped > 0 {
            tracing::debug!("Dropped {} queued move(s) for {}", dropped, id);
        }
        Ok(player)
    }

    /// Only human players read the input queue; anything queued for another
    /// kind would never be consumed
    pub fn check_human(&self, id: &PlayerId) -> Result<()> {
        let player = self
            .player(id)
            .ok_or_else(|| EaterError::PlayerNotFound(id.clone()))?;
        match player.kind() {
            PlayerKind::Human => Ok(()),
            kind => Err(EaterError::InvalidMove(format!(
                "{} is {:?}, not human-controlled",
                id, kind
            ))),
        }
    }

    pub fn player(&self, id: &PlayerId) -> Option<&dyn Player> {
        self.index.get(id).map(|&idx| self.players[idx].as_ref())
    }

    pub fn location_of(&self, id: &PlayerId) -> Option<Location> {
        self.index.get(id).map(|&idx| self.locations[idx])
    }

    /// Players with their authoritative locations, in insertion order
    pub fn players(&self) -> impl Iterator<Item = (&dyn Player, Location)> + '_ {
        self.players
            .iter()
            .zip(self.locations.iter())
            .map(|(player, location)| (player.as_ref(), *location))
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn map(&self) -> &MapConfig {
        &self.map
    }

    pub fn policy(&self) -> TurnPolicy {
        self.policy
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// A tick has started but is waiting on input
    pub fn is_waiting(&self) -> bool {
        self.tick_open
    }

    pub fn check_bounds(&self, location: Location) -> Result<()> {
        if self.map.contains(location) {
            Ok(())
        } else {
            Err(EaterError::OutOfBounds {
                location,
                width: self.map.width,
                height: self.map.height,
            })
        }
    }
}
