//! Players on the grid
//!
//! `PlayerState` is what every kind of player shares; the `Player` trait is
//! the contract the world driver dispatches on. `Eater` takes its moves from
//! a human, `ScriptedEater` from a fixed list.

pub mod eater;
pub mod move_info;
pub mod scripted;
pub mod turn;

pub use eater::Eater;
pub use move_info::MoveInfo;
pub use scripted::ScriptedEater;
pub use turn::TurnState;

use crate::core::config::{PlayerConfig, PlayerKind};
use crate::core::error::{EaterError, Result};
use crate::core::types::{Direction, Location, PlayerId};
use crate::input::MoveSource;

/// Identity and spatial state common to every player kind
#[derive(Debug, Clone)]
pub struct PlayerState {
    id: PlayerId,
    location: Location,
    facing: Direction,
    turn: TurnState,
}

impl PlayerState {
    pub fn new(id: PlayerId, facing: Direction) -> Self {
        Self {
            id,
            location: Location::default(),
            facing,
            turn: TurnState::AwaitingMove,
        }
    }

    pub fn id(&self) -> &PlayerId {
        &self.id
    }

    pub fn location(&self) -> Location {
        self.location
    }

    pub fn facing(&self) -> Direction {
        self.facing
    }

    pub fn turn(&self) -> &TurnState {
        &self.turn
    }

    /// Overwrite the location and open a new tick
    pub fn update(&mut self, location: Location) {
        self.location = location;
        self.turn.begin();
    }

    pub fn set_facing(&mut self, direction: Direction) {
        self.facing = direction;
    }

    pub fn ready(&mut self, mv: MoveInfo) {
        self.turn.ready(mv);
    }

    /// Hand out this tick's move, turning to face its direction.
    ///
    /// A move without a direction leaves the facing alone.
    pub fn resolve_move(&mut self) -> Result<MoveInfo> {
        let mv = self.turn.take(&self.id)?;
        if let Some(direction) = mv.move_direction {
            self.set_facing(direction);
        }
        Ok(mv)
    }
}

/// Contract between the world driver and one player
pub trait Player: std::fmt::Debug {
    fn state(&self) -> &PlayerState;

    fn state_mut(&mut self) -> &mut PlayerState;

    fn kind(&self) -> PlayerKind;

    /// Get a move ready for this tick. `false` means "not ready yet".
    fn prepare_move(&mut self, input: &mut dyn MoveSource) -> bool;

    /// This tick's move; `MoveUnavailable` if `prepare_move` has not succeeded
    fn get_move(&mut self) -> Result<MoveInfo>;

    fn id(&self) -> &PlayerId {
        self.state().id()
    }

    fn location(&self) -> Location {
        self.state().location()
    }

    fn facing(&self) -> Direction {
        self.state().facing()
    }

    fn set_facing(&mut self, direction: Direction) {
        self.state_mut().set_facing(direction);
    }

    /// Sync the location at the start of a tick
    fn update(&mut self, location: Location) {
        self.state_mut().update(location);
    }

    fn has_move(&self) -> bool {
        self.state().turn().has_move()
    }
}

/// Build a player of the configured kind, already placed on its start cell
pub fn from_config(config: &PlayerConfig) -> Result<Box<dyn Player>> {
    let mut player: Box<dyn Player> = match config.kind {
        PlayerKind::Human => Box::new(Eater::with_facing(config.id.clone(), config.facing)),
        PlayerKind::Scripted => {
            let script = config.script.iter().copied().map(MoveInfo::toward).collect();
            let scripted = ScriptedEater::new(config.id.clone(), script).ok_or_else(|| {
                EaterError::InvalidConfig(format!("scripted player {} has an empty script", config.id))
            })?;
            Box::new(scripted.with_facing(config.facing))
        }
    };
    player.update(config.location());
    Ok(player)
}
