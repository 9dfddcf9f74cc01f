//! One tick's action

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::EaterError;
use crate::core::types::Direction;

/// The action a player takes during a tick
///
/// Only `move_direction` and `stop_sim` mean anything to the driver; the
/// remaining flags ride along for whoever resolves eating and doors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MoveInfo {
    pub move_direction: Option<Direction>,
    #[serde(default)]
    pub jump: bool,
    #[serde(default)]
    pub dont_eat: bool,
    #[serde(default)]
    pub open: bool,
    #[serde(default)]
    pub stop_sim: bool,
}

impl MoveInfo {
    /// Step one cell toward `direction`
    pub fn toward(direction: Direction) -> Self {
        Self {
            move_direction: Some(direction),
            ..Self::default()
        }
    }

    /// Jump two cells toward `direction`
    pub fn jump(direction: Direction) -> Self {
        Self {
            move_direction: Some(direction),
            jump: true,
            ..Self::default()
        }
    }

    /// Do nothing this tick
    pub fn stay() -> Self {
        Self::default()
    }

    pub fn is_move(&self) -> bool {
        self.move_direction.is_some()
    }
}

/// Parses whitespace-separated words: a direction plus any of
/// `jump`, `dont_eat`, `open`, `stop`. `stay` is an empty move.
impl FromStr for MoveInfo {
    type Err = EaterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut mv = MoveInfo::default();
        let mut any = false;

        for word in s.split_whitespace() {
            any = true;
            match word.to_lowercase().as_str() {
                "stay" => {}
                "jump" => mv.jump = true,
                "dont_eat" | "donteat" => mv.dont_eat = true,
                "open" => mv.open = true,
                "stop" => mv.stop_sim = true,
                other => {
                    let dir: Direction = other.parse()?;
                    if mv.move_direction.replace(dir).is_some() {
                        return Err(EaterError::InvalidMove(format!(
                            "more than one direction in '{}'",
                            s
                        )));
                    }
                }
            }
        }

        if !any {
            return Err(EaterError::InvalidMove("empty move".into()));
        }
        if mv.jump && mv.move_direction.is_none() {
            return Err(EaterError::InvalidMove("jump needs a direction".into()));
        }

        Ok(mv)
    }
}
