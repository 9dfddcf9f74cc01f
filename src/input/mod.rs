//! Human input routing
//!
//! Players never reach for a global input manager. The driver hands a
//! `MoveSource` to each poll instead.

pub mod queue;

pub use queue::{InputQueue, SharedInputQueue};

use crate::core::types::PlayerId;
use crate::player::MoveInfo;

/// Where human moves come from
///
/// Implementations must return immediately: `None` means the player has not
/// acted yet (or is gone), never "wait and see".
pub trait MoveSource {
    fn human_move(&mut self, player: &PlayerId) -> Option<MoveInfo>;
}

/// A source with no input at all
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInput;

impl MoveSource for NoInput {
    fn human_move(&mut self, _player: &PlayerId) -> Option<MoveInfo> {
        None
    }
}
