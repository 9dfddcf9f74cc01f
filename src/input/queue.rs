//! Per-player move queues

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use ahash::AHashMap;

use crate::core::types::PlayerId;
use crate::input::MoveSource;
use crate::player::MoveInfo;

/// FIFO of submitted moves, one queue per player
///
/// Each queued move is handed out to exactly one successful poll.
#[derive(Debug, Default)]
pub struct InputQueue {
    queues: AHashMap<PlayerId, VecDeque<MoveInfo>>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, player: PlayerId, mv: MoveInfo) {
        tracing::trace!("Queued {:?} for {}", mv, player);
        self.queues.entry(player).or_default().push_back(mv);
    }

    /// Number of moves waiting for `player`
    pub fn pending(&self, player: &PlayerId) -> usize {
        self.queues.get(player).map_or(0, VecDeque::len)
    }

    /// Drop everything queued for `player`, e.g. on disconnect
    pub fn clear(&mut self, player: &PlayerId) -> usize {
        self.queues.remove(player).map_or(0, |q| q.len())
    }

    pub fn is_empty(&self) -> bool {
        self.queues.values().all(VecDeque::is_empty)
    }
}

impl MoveSource for InputQueue {
    fn human_move(&mut self, player: &PlayerId) -> Option<MoveInfo> {
        let queue = self.queues.get_mut(player)?;
        let mv = queue.pop_front();
        if queue.is_empty() {
            self.queues.remove(player);
        }
        mv
    }
}

/// Cloneable handle to an `InputQueue` shared with an input thread
#[derive(Debug, Clone, Default)]
pub struct SharedInputQueue {
    inner: Arc<Mutex<InputQueue>>,
}

impl SharedInputQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, player: PlayerId, mv: MoveInfo) {
        match self.inner.lock() {
            Ok(mut queue) => queue.push(player, mv),
            Err(_) => tracing::warn!("Input queue lock poisoned; dropping move for {}", player),
        }
    }

    pub fn pending(&self, player: &PlayerId) -> usize {
        match self.inner.lock() {
            Ok(queue) => queue.pending(player),
            Err(_) => {
                tracing::warn!("Input queue lock poisoned; reporting nothing pending for {}", player);
                0
            }
        }
    }

    /// Drop everything queued for `player`
    pub fn clear(&self, player: &PlayerId) -> usize {
        match self.inner.lock() {
            Ok(mut queue) => queue.clear(player),
            Err(_) => {
                tracing::warn!("Input queue lock poisoned; cannot clear {}", player);
                0
            }
        }
    }
}

impl MoveSource for SharedInputQueue {
    fn human_move(&mut self, player: &PlayerId) -> Option<MoveInfo> {
        match self.inner.lock() {
            Ok(mut queue) => queue.human_move(player),
            Err(_) => {
                tracing::warn!("Input queue lock poisoned; treating {} as not ready", player);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Direction;

    #[test]
    fn test_moves_come_out_in_order() {
        let mut queue = InputQueue::new();
        let p1 = PlayerId::from("P1");
        queue.push(p1.clone(), MoveInfo::toward(Direction::North));
        queue.push(p1.clone(), MoveInfo::toward(Direction::East));
        assert_eq!(queue.pending(&p1), 2);

        assert_eq!(queue.human_move(&p1), Some(MoveInfo::toward(Direction::North)));
        assert_eq!(queue.human_move(&p1), Some(MoveInfo::toward(Direction::East)));
        assert_eq!(queue.human_move(&p1), None);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queues_are_per_player() {
        let mut queue = InputQueue::new();
        queue.push(PlayerId::from("P1"), MoveInfo::toward(Direction::West));

        assert_eq!(queue.human_move(&PlayerId::from("P2")), None);
        assert_eq!(queue.pending(&PlayerId::from("P1")), 1);
    }

    #[test]
    fn test_clear_drops_pending_moves() {
        let mut queue = InputQueue::new();
        let p1 = PlayerId::from("P1");
        queue.push(p1.clone(), MoveInfo::stay());
        queue.push(p1.clone(), MoveInfo::stay());

        assert_eq!(queue.clear(&p1), 2);
        assert_eq!(queue.pending(&p1), 0);
        assert_eq!(queue.human_move(&p1), None);
    }

    #[test]
    fn test_shared_queue_across_threads() {
        let shared = SharedInputQueue::new();
        let producer = shared.clone();

        std::thread::spawn(move || {
            producer.push(PlayerId::from("P1"), MoveInfo::toward(Direction::South));
        })
        .join()
        .unwrap();

        let mut consumer = shared;
        assert_eq!(consumer.pending(&PlayerId::from("P1")), 1);
        assert_eq!(
            consumer.human_move(&PlayerId::from("P1")),
            Some(MoveInfo::toward(Direction::South))
        );
    }

    #[test]
    fn test_poisoned_lock_reads_as_no_input() {
        let mut shared = SharedInputQueue::new();
        shared.push(PlayerId::from("P1"), MoveInfo::toward(Direction::North));

        let inner = Arc::clone(&shared.inner);
        let result = std::thread::spawn(move || {
            let _guard = inner.lock().unwrap();
            panic!("input thread died holding the lock");
        })
        .join();
        assert!(result.is_err());
        assert!(shared.inner.is_poisoned());

        assert_eq!(shared.human_move(&PlayerId::from("P1")), None);
        assert_eq!(shared.pending(&PlayerId::from("P1")), 0);
        assert_eq!(shared.clear(&PlayerId::from("P1")), 0);
        // must not panic
        shared.push(PlayerId::from("P1"), MoveInfo::stay());
    }
}
