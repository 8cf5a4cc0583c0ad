//! Time-indexed queue of one-shot callbacks.
//!
//! Every delayed effect in the game (spawn spacing, break timers, slow
//! expiry, trap rearm, siege halts, corpse removal) is an entry here,
//! popped by the engine once game time reaches its due time. Entries
//! that reference an entity carry its handle and spawn id; the engine
//! checks both on expiry and drops the action if the entity is gone or
//! has been recycled.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use hecs::Entity;

/// What to do when a timer fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerAction {
    /// Spawn the next enemy of `wave`.
    SpawnNext { wave: u32 },
    /// Break after `wave` finished spawning has elapsed; check completion.
    BreakElapsed { wave: u32 },
    /// Start the wave after `after_wave`, unless one already started.
    StartNextWave { after_wave: u32 },
    /// Restore base speed of a slowed enemy.
    SlowExpired { enemy: Entity, id: u32 },
    /// Let a sieging enemy walk again.
    SiegeResume { enemy: Entity, id: u32 },
    /// Take a dead enemy out of play.
    RemoveEnemy { enemy: Entity, id: u32 },
    /// Make a trap ready to trigger again.
    TrapRearm { trap: Entity },
    /// Recurring combo-decay check.
    ComboCheck,
}

#[derive(Debug)]
struct TimerEntry {
    due_secs: f64,
    seq: u64,
    action: TimerAction,
}

// Min-heap on (due time, insertion order).
impl Ord for TimerEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_secs
            .total_cmp(&self.due_secs)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for TimerEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TimerEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TimerEntry {}

/// Pending timers ordered by due time, FIFO among equal due times.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<TimerEntry>,
    next_seq: u64,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to fire `delay_secs` after `now_secs`.
    pub fn schedule(&mut self, now_secs: f64, delay_secs: f64, action: TimerAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(TimerEntry {
            due_secs: now_secs + delay_secs.max(0.0),
            seq,
            action,
        });
    }

    /// Pop the earliest timer whose due time is at or before `now_secs`.
    pub fn pop_due(&mut self, now_secs: f64) -> Option<TimerAction> {
        if self.heap.peek()?.due_secs > now_secs {
            return None;
        }
        self.heap.pop().map(|entry| entry.action)
    }

    /// Due time of the next pending timer.
    pub fn next_due(&self) -> Option<f64> {
        self.heap.peek().map(|entry| entry.due_secs)
    }

    /// Whether any pending timer matches `predicate`.
    pub fn any(&self, predicate: impl Fn(&TimerAction) -> bool) -> bool {
        self.heap.iter().any(|entry| predicate(&entry.action))
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
