//! Per-tick move state machine
//!
//! ```text
//! AwaitingMove --ready--> MoveReady --take--> Consumed
//!      ^                                         |
//!      +------------------begin------------------+
//! ```

use crate::core::error::{EaterError, Result};
use crate::core::types::PlayerId;
use crate::player::MoveInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TurnState {
    #[default]
    AwaitingMove,
    MoveReady(MoveInfo),
    /// Already handed to the driver; further reads return the same move
    Consumed(MoveInfo),
}

impl TurnState {
    /// Start a new tick, discarding last tick's move
    pub fn begin(&mut self) {
        *self = TurnState::AwaitingMove;
    }

    pub fn ready(&mut self, mv: MoveInfo) {
        *self = TurnState::MoveReady(mv);
    }

    /// Hand out this tick's move
    pub fn take(&mut self, player: &PlayerId) -> Result<MoveInfo> {
        match *self {
            TurnState::AwaitingMove => Err(EaterError::MoveUnavailable {
                player: player.clone(),
            }),
            TurnState::MoveReady(mv) | TurnState::Consumed(mv) => {
                *self = TurnState::Consumed(mv);
                Ok(mv)
            }
        }
    }

    pub fn has_move(&self) -> bool {
        !matches!(self, TurnState::AwaitingMove)
    }

    pub fn pending(&self) -> Option<&MoveInfo> {
        match self {
            TurnState::AwaitingMove => None,
            TurnState::MoveReady(mv) | TurnState::Consumed(mv) => Some(mv),
        }
    }
}
