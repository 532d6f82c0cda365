//! Event Scheduler
//!
//! Generic future one-off scheduling, keyed by game-time (seconds) rather
//! than a discrete turn counter. Used for deferred restorations (room
//! `env_interactions` that clear an exit requirement for a duration, see
//! [`crate::room`]) and anything else that needs a "do this at/after time T"
//! without a timer thread -- the world simply compares stored deadlines to
//! `now` on every clock advance.
//!
//! Implemented as a binary heap, same pattern the original engine used for
//! its turn-indexed scheduler, just reindexed on `f64` game seconds (via a
//! millisecond-resolution integer key so the heap can stay `Ord`).

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use log::info;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A deferred task the world scheduler can fire.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ScheduledTask {
    /// Re-impose a room's exit requirement that was temporarily cleared by
    /// an `env_interaction` reaction (§4.2).
    RestoreExitRequirement { region_id: Uuid, room_id: Uuid, direction: String },
}

/// A task scheduled for a particular game-time deadline.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScheduledEvent {
    pub due: f64,
    pub task: ScheduledTask,
    pub note: Option<String>,
}

fn due_key(due: f64) -> i64 {
    (due * 1000.0).round() as i64
}

/// Priority queue of [`ScheduledEvent`]s ordered by due time, FIFO among ties.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Scheduler {
    heap: BinaryHeap<Reverse<(i64, usize)>>,
    events: Vec<Option<ScheduledEvent>>,
}

impl Scheduler {
    /// Schedule `task` to fire `delay` game-seconds after `now`.
    pub fn schedule_in(&mut self, now: f64, delay: f64, task: ScheduledTask, note: Option<String>) {
        self.schedule_at(now + delay, task, note);
    }

    /// Schedule `task` to fire at an absolute game-time deadline.
    pub fn schedule_at(&mut self, due: f64, task: ScheduledTask, note: Option<String>) {
        let idx = self.events.len();
        info!(
            "scheduling task due={due:.1}: {}",
            note.as_deref().unwrap_or("<no note>")
        );
        self.heap.push(Reverse((due_key(due), idx)));
        self.events.push(Some(ScheduledEvent { due, task, note }));
    }

    /// Pop a single due event, if any are ready at `now`. Call repeatedly
    /// (e.g. in a `while let`) to drain everything due this tick.
    pub fn pop_due(&mut self, now: f64) -> Option<ScheduledEvent> {
        let due_now = due_key(now);
        if let Some(Reverse((due, idx))) = self.heap.peek().copied() {
            if due <= due_now {
                self.heap.pop();
                return self.events[idx].take();
            }
        }
        None
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> ScheduledTask {
        ScheduledTask::RestoreExitRequirement {
            region_id: Uuid::nil(),
            room_id: Uuid::nil(),
            direction: "north".to_string(),
        }
    }

    #[test]
    fn schedule_in_adds_event_correctly() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule_in(5.0, 3.0, task(), Some("test".to_string()));
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.pop_due(7.9).is_none());
        let event = scheduler.pop_due(8.0).unwrap();
        assert_eq!(event.due, 8.0);
    }

    #[test]
    fn pop_due_overdue_still_fires() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule_at(8.0, task(), None);
        let event = scheduler.pop_due(100.0).unwrap();
        assert_eq!(event.due, 8.0);
    }

    #[test]
    fn events_fire_in_chronological_then_fifo_order() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule_at(15.0, task(), Some("Third".to_string()));
        scheduler.schedule_at(5.0, task(), Some("First".to_string()));
        scheduler.schedule_at(10.0, task(), Some("Second".to_string()));
        scheduler.schedule_at(10.0, task(), Some("Second-b".to_string()));

        assert_eq!(scheduler.pop_due(20.0).unwrap().note.as_deref(), Some("First"));
        assert_eq!(scheduler.pop_due(20.0).unwrap().note.as_deref(), Some("Second"));
        assert_eq!(scheduler.pop_due(20.0).unwrap().note.as_deref(), Some("Second-b"));
        assert_eq!(scheduler.pop_due(20.0).unwrap().note.as_deref(), Some("Third"));
        assert!(scheduler.pop_due(20.0).is_none());
    }

    #[test]
    fn serialization_roundtrip() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule_at(8.0, task(), Some("a".to_string()));
        let json = serde_json::to_string(&scheduler).unwrap();
        let mut restored: Scheduler = serde_json::from_str(&json).unwrap();
        let event = restored.pop_due(8.0).unwrap();
        assert_eq!(event.note.as_deref(), Some("a"));
    }
}
