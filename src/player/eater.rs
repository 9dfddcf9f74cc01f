//! Human-controlled eater

use crate::core::config::PlayerKind;
use crate::core::error::Result;
use crate::core::types::{Direction, PlayerId};
use crate::input::MoveSource;
use crate::player::{MoveInfo, Player, PlayerState};

/// An eater whose moves come from a person at the keyboard
#[derive(Debug, Clone)]
pub struct Eater {
    state: PlayerState,
}

impl Eater {
    /// New eater facing north at the origin
    pub fn new(id: impl Into<PlayerId>) -> Self {
        Self::with_facing(id, Direction::North)
    }

    pub fn with_facing(id: impl Into<PlayerId>, facing: Direction) -> Self {
        Self {
            state: PlayerState::new(id.into(), facing),
        }
    }

    /// Ask `input` for this eater's move.
    ///
    /// On `false` nothing changes: any move already cached this tick stays,
    /// and so does the facing.
    pub fn poll_human_move(&mut self, input: &mut dyn MoveSource) -> bool {
        match input.human_move(self.state.id()) {
            Some(mv) => {
                tracing::debug!("{} submitted {:?}", self.state.id(), mv);
                self.state.ready(mv);
                true
            }
            None => false,
        }
    }

    /// The move cached by the last successful poll, if any
    pub fn pending_move(&self) -> Option<&MoveInfo> {
        self.state.turn().pending()
    }
}

impl Player for Eater {
    fn state(&self) -> &PlayerState {
        &self.state
    }

    fn state_mut(&mut self) -> &mut PlayerState {
        &mut self.state
    }

    fn kind(&self) -> PlayerKind {
        PlayerKind::Human
    }

    fn prepare_move(&mut self, input: &mut dyn MoveSource) -> bool {
        self.poll_human_move(input)
    }

    fn get_move(&mut self) -> Result<MoveInfo> {
        self.state.resolve_move()
    }
}
