//! Eater driven by a fixed move list
//!
//! Stands in for agent-controlled players: it is always ready and never
//! touches the human input source.

use crate::core::config::PlayerKind;
use crate::core::error::Result;
use crate::core::types::{Direction, PlayerId};
use crate::input::MoveSource;
use crate::player::{MoveInfo, Player, PlayerState};

#[derive(Debug, Clone)]
pub struct ScriptedEater {
    state: PlayerState,
    script: Vec<MoveInfo>,
    cursor: usize,
}

impl ScriptedEater {
    /// `None` for an empty script
    pub fn new(id: impl Into<PlayerId>, script: Vec<MoveInfo>) -> Option<Self> {
        if script.is_empty() {
            return None;
        }
        Some(Self {
            state: PlayerState::new(id.into(), Direction::North),
            script,
            cursor: 0,
        })
    }

    pub fn with_facing(mut self, facing: Direction) -> Self {
        self.state.set_facing(facing);
        self
    }

    fn next_move(&mut self) -> MoveInfo {
        let mv = self.script[self.cursor];
        self.cursor = (self.cursor + 1) % self.script.len();
        mv
    }
}

impl Player for ScriptedEater {
    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Scripted
    }

    fn prepare_move(&mut self, _input: &mut dyn MoveSource) -> bool {
        if !self.state.turn().has_move() {
            let mv = self.next_move();
            self.state.ready(mv);
        }
        true
    }

    fn get_move(&mut self) -> Result<MoveInfo> {
        self.state.resolve_move()
    }
}
