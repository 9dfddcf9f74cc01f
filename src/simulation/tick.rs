//! Tick system - one turn for every player
//!
//! update -> prepare (poll) -> resolve -> apply
//!
//! Players are processed sequentially. Under `WaitForAll` a tick that is
//! missing input stays open; the next call resumes at the poll phase
//! without calling `update` again.

use serde::Serialize;

use crate::core::config::TurnPolicy;
use crate::core::types::{Direction, Location, PlayerId, Tick};
use crate::input::MoveSource;
use crate::player::Player;
use crate::world::World;

/// Events generated while resolving a tick
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum TickEvent {
    Moved {
        player: PlayerId,
        from: Location,
        to: Location,
        facing: Direction,
    },
    /// The move would leave the map; the player stays put
    Blocked {
        player: PlayerId,
        at: Location,
        direction: Direction,
    },
    /// A move with no direction
    Stayed { player: PlayerId },
    /// No input this tick (`SkipIdle` only)
    Idle { player: PlayerId },
    /// The player reported ready but had no move to give
    Failed { player: PlayerId, reason: String },
    StopRequested { player: PlayerId },
}

#[derive(Debug, Clone, Serialize)]
pub struct TickReport {
    pub tick: Tick,
    pub events: Vec<TickEvent>,
}

impl TickReport {
    pub fn moved(&self) -> impl Iterator<Item = &PlayerId> {
        self.events.iter().filter_map(|e| match e {
            TickEvent::Moved { player, .. } => Some(player),
            _ => None,
        })
    }

    pub fn idle(&self) -> impl Iterator<Item = &PlayerId> {
        self.events.iter().filter_map(|e| match e {
            TickEvent::Idle { player } => Some(player),
            _ => None,
        })
    }
}

#[derive(Debug, Clone)]
pub enum TickOutcome {
    Completed(TickReport),
    /// `WaitForAll` and these players have not acted yet
    Waiting { tick: Tick, not_ready: Vec<PlayerId> },
    /// A player asked to stop the simulation on an earlier tick
    Stopped,
}

impl TickOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, TickOutcome::Completed(_))
    }
}

/// Cells covered by a move: two for a jump, one otherwise
fn move_distance(jump: bool) -> i32 {
    if jump {
        2
    } else {
        1
    }
}

/// Run (or resume) one tick
pub fn run_tick(world: &mut World, input: &mut dyn MoveSource) -> TickOutcome {
    if world.stopped {
        return TickOutcome::Stopped;
    }

    // Phase 1: sync locations, once per tick
    if !world.tick_open {
        for (player, location) in world.players.iter_mut().zip(world.locations.iter()) {
            player.update(*location);
        }
        world.tick_open = true;
    }

    // Phase 2: collect moves from whoever still needs one
    let ready: Vec<bool> = world
        .players
        .iter_mut()
        .map(|player| player.has_move() || player.prepare_move(input))
        .collect();

    let not_ready: Vec<PlayerId> = world
        .players
        .iter()
        .zip(ready.iter())
        .filter(|(_, ready)| !**ready)
        .map(|(player, _)| player.id().clone())
        .collect();

    if world.policy == TurnPolicy::WaitForAll && !not_ready.is_empty() {
        tracing::debug!(
            "Tick {} waiting on {} player(s): {:?}",
            world.current_tick,
            not_ready.len(),
            not_ready
        );
        return TickOutcome::Waiting {
            tick: world.current_tick,
            not_ready,
        };
    }

    // Phase 3: resolve and apply
    let mut events = Vec::with_capacity(world.players.len());
    let mut stop = false;

    for (idx, player) in world.players.iter_mut().enumerate() {
        let id = player.id().clone();

        if !ready[idx] {
            tracing::debug!("{} idle on tick {}", id, world.current_tick);
            events.push(TickEvent::Idle { player: id });
            continue;
        }

        let mv = match player.get_move() {
            Ok(mv) => mv,
            Err(e) => {
                tracing::error!("Skipping {} on tick {}: {}", id, world.current_tick, e);
                events.push(TickEvent::Failed {
                    player: id,
                    reason: e.to_string(),
                });
                continue;
            }
        };

        if mv.stop_sim {
            stop = true;
            events.push(TickEvent::StopRequested { player: id.clone() });
        }

        let Some(direction) = mv.move_direction else {
            events.push(TickEvent::Stayed { player: id });
            continue;
        };

        let from = world.locations[idx];
        let to = (0..move_distance(mv.jump)).fold(from, |at, _| at.step(direction));

        if world.map.contains(to) {
            tracing::debug!("{} {:?} -> {:?}", id, from, to);
            world.locations[idx] = to;
            events.push(TickEvent::Moved {
                player: id,
                from,
                to,
                facing: player.facing(),
            });
        } else {
            tracing::warn!("{} tried to move {} off the map from {:?}", id, direction, from);
            events.push(TickEvent::Blocked {
                player: id,
                at: from,
                direction,
            });
        }
    }

    let report = TickReport {
        tick: world.current_tick,
        events,
    };

    world.tick_open = false;
    world.current_tick += 1;
    if stop {
        tracing::info!("Simulation stopped after tick {}", report.tick);
        world.stopped = true;
    }

    TickOutcome::Completed(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{MapConfig, PlayerKind};
    use crate::core::error::Result;
    use crate::input::{InputQueue, NoInput};
    use crate::player::{Eater, MoveInfo, PlayerState, ScriptedEater};

    fn world(policy: TurnPolicy) -> World {
        World::new(MapConfig { width: 5, height: 5 }, policy)
    }

    fn completed(outcome: TickOutcome) -> TickReport {
        match outcome {
            TickOutcome::Completed(report) => report,
            other => panic!("expected completed tick, got {:?}", other),
        }
    }

    /// Claims to be ready without ever caching a move
    #[derive(Debug)]
    struct Liar {
        state: PlayerState,
    }

    impl Player for Liar {
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
            true
        }
        fn get_move(&mut self) -> Result<MoveInfo> {
            self.state.resolve_move()
        }
    }

    #[test]
    fn test_human_move_applied() {
        let mut w = world(TurnPolicy::WaitForAll);
        w.add_player(Box::new(Eater::new("P1")), Location::new(2, 2)).unwrap();
        let mut queue = InputQueue::new();
        queue.push(PlayerId::from("P1"), MoveInfo::toward(Direction::East));

        let report = completed(run_tick(&mut w, &mut queue));
        assert_eq!(report.tick, 0);
        assert_eq!(
            report.events,
            vec![TickEvent::Moved {
                player: PlayerId::from("P1"),
                from: Location::new(2, 2),
                to: Location::new(3, 2),
                facing: Direction::East,
            }]
        );
        assert_eq!(w.current_tick, 1);
        assert_eq!(w.location_of(&PlayerId::from("P1")), Some(Location::new(3, 2)));
    }

    #[test]
    fn test_wait_for_all_holds_tick_open() {
        let mut w = world(TurnPolicy::WaitForAll);
        w.add_player(Box::new(Eater::new("P1")), Location::new(0, 0)).unwrap();
        w.add_player(Box::new(Eater::new("P2")), Location::new(4, 4)).unwrap();

        let mut queue = InputQueue::new();
        queue.push(PlayerId::from("P1"), MoveInfo::toward(Direction::South));

        match run_tick(&mut w, &mut queue) {
            TickOutcome::Waiting { tick, not_ready } => {
                assert_eq!(tick, 0);
                assert_eq!(not_ready, vec![PlayerId::from("P2")]);
            }
            other => panic!("expected waiting, got {:?}", other),
        }
        assert!(w.is_waiting());
        assert_eq!(w.current_tick, 0);

        // P1's move survives the wait
        queue.push(PlayerId::from("P2"), MoveInfo::toward(Direction::North));
        let report = completed(run_tick(&mut w, &mut queue));
        assert_eq!(report.moved().count(), 2);
        assert_eq!(w.location_of(&PlayerId::from("P1")), Some(Location::new(0, 1)));
        assert_eq!(w.location_of(&PlayerId::from("P2")), Some(Location::new(4, 3)));
        assert!(!w.is_waiting());
    }

    #[test]
    fn test_skip_idle_resolves_without_input() {
        let mut w = world(TurnPolicy::SkipIdle);
        w.add_player(Box::new(Eater::new("P1")), Location::new(1, 1)).unwrap();
        let bot = ScriptedEater::new("bot", vec![MoveInfo::toward(Direction::West)]).unwrap();
        w.add_player(Box::new(bot), Location::new(3, 3)).unwrap();

        let report = completed(run_tick(&mut w, &mut NoInput));
        let idle: Vec<_> = report.idle().cloned().collect();
        assert_eq!(idle, vec![PlayerId::from("P1")]);
        assert_eq!(w.location_of(&PlayerId::from("P1")), Some(Location::new(1, 1)));
        assert_eq!(w.location_of(&PlayerId::from("bot")), Some(Location::new(2, 3)));
    }

    #[test]
    fn test_move_off_map_is_blocked() {
        let mut w = world(TurnPolicy::WaitForAll);
        w.add_player(Box::new(Eater::new("P1")), Location::new(0, 0)).unwrap();
        let mut queue = InputQueue::new();
        queue.push(PlayerId::from("P1"), MoveInfo::toward(Direction::West));

        let report = completed(run_tick(&mut w, &mut queue));
        assert!(matches!(report.events[0], TickEvent::Blocked { direction: Direction::West, .. }));
        assert_eq!(w.location_of(&PlayerId::from("P1")), Some(Location::new(0, 0)));
        // the attempt still turns the eater
        assert_eq!(w.player(&PlayerId::from("P1")).unwrap().facing(), Direction::West);
    }

    #[test]
    fn test_jump_covers_two_cells() {
        let mut w = world(TurnPolicy::WaitForAll);
        w.add_player(Box::new(Eater::new("P1")), Location::new(0, 0)).unwrap();
        let mut queue = InputQueue::new();
        queue.push(PlayerId::from("P1"), MoveInfo::jump(Direction::South));

        completed(run_tick(&mut w, &mut queue));
        assert_eq!(w.location_of(&PlayerId::from("P1")), Some(Location::new(0, 2)));
    }

    #[test]
    fn test_stay_keeps_location() {
        let mut w = world(TurnPolicy::WaitForAll);
        w.add_player(Box::new(Eater::new("P1")), Location::new(2, 2)).unwrap();
        let mut queue = InputQueue::new();
        queue.push(PlayerId::from("P1"), MoveInfo::stay());

        let report = completed(run_tick(&mut w, &mut queue));
        assert_eq!(report.events, vec![TickEvent::Stayed { player: PlayerId::from("P1") }]);
    }

    #[test]
    fn test_stop_move_stops_world() {
        let mut w = world(TurnPolicy::WaitForAll);
        w.add_player(Box::new(Eater::new("P1")), Location::new(2, 2)).unwrap();
        let mut queue = InputQueue::new();
        queue.push(PlayerId::from("P1"), "north stop".parse().unwrap());

        let report = completed(run_tick(&mut w, &mut queue));
        assert!(report
            .events
            .contains(&TickEvent::StopRequested { player: PlayerId::from("P1") }));
        assert!(w.is_stopped());
        assert!(matches!(run_tick(&mut w, &mut queue), TickOutcome::Stopped));
    }

    #[test]
    fn test_move_unavailable_skips_player() {
        let mut w = world(TurnPolicy::WaitForAll);
        let liar = Liar {
            state: PlayerState::new(PlayerId::from("liar"), Direction::North),
        };
        w.add_player(Box::new(liar), Location::new(1, 1)).unwrap();
        let bot = ScriptedEater::new("bot", vec![MoveInfo::toward(Direction::East)]).unwrap();
        w.add_player(Box::new(bot), Location::new(0, 0)).unwrap();

        let report = completed(run_tick(&mut w, &mut NoInput));
        assert!(matches!(&report.events[0], TickEvent::Failed { player, .. } if player.as_str() == "liar"));
        assert_eq!(w.location_of(&PlayerId::from("liar")), Some(Location::new(1, 1)));
        assert_eq!(w.location_of(&PlayerId::from("bot")), Some(Location::new(1, 0)));
    }

    #[test]
    fn test_player_location_synced_next_tick() {
        let mut w = world(TurnPolicy::WaitForAll);
        w.add_player(Box::new(Eater::new("P1")), Location::new(2, 2)).unwrap();
        let mut queue = InputQueue::new();
        queue.push(PlayerId::from("P1"), MoveInfo::toward(Direction::North));
        completed(run_tick(&mut w, &mut queue));

        // update for tick 1 runs even though P1 has no move yet
        assert!(matches!(run_tick(&mut w, &mut queue), TickOutcome::Waiting { .. }));
        assert_eq!(w.player(&PlayerId::from("P1")).unwrap().location(), Location::new(2, 1));
    }

    #[test]
    fn test_report_serializes_to_json() {
        let report = TickReport {
            tick: 3,
            events: vec![TickEvent::Idle { player: PlayerId::from("P1") }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["tick"], 3);
        assert_eq!(json["events"][0]["event"], "idle");
        assert_eq!(json["events"][0]["player"], "P1");
    }
}
