//! One-shot timers bound to entity handles.
//!
//! [`Scheduler::schedule`] records `(owner, tag, now + delay)` and returns
//! immediately. Each tick the game advances the scheduler clock and drains
//! the timers that have come due, in deadline order with ties broken by
//! scheduling order. The world then dispatches each one to its owner if, and
//! only if, the owner handle still resolves to a non-expired entity.
//!
//! There is no cancellation and no de-duplication: two timers with the same
//! owner and tag both fire. Repeating behavior is built by re-arming from
//! inside the handler.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::entity::EntityId;

/// Identifies which behavior a timer triggers on its owner.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerTag {
    /// Ends the ship's spawn invincibility.
    Invincible,
    /// Toggles the ship's thrust flame.
    Flame,
    /// Ends a projectile's flight.
    Expire,
    /// Ends a debris particle.
    FloatAway,
    /// Alien course change cadence.
    Move,
    /// Alien and boss firing cadence.
    Fire,
    /// Brings a dormant alien or boss to life.
    Spawn,
    /// Halts the boss after its entry.
    Stop,
    /// Ambient rhythm pulse.
    Beat,
    /// Missile motor burn and homing correction.
    Burn,
}

/// A pending one-shot timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timer {
    /// Entity that receives the timer.
    pub owner: EntityId,
    /// Which behavior to run.
    pub tag: TimerTag,
    /// Absolute simulated time at which the timer fires.
    pub fire_at_ms: u64,
    seq: u64,
}

impl Ord for Timer {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.fire_at_ms, self.seq).cmp(&(other.fire_at_ms, other.seq))
    }
}

impl PartialOrd for Timer {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Clock plus a deadline-ordered queue of one-shot timers.
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    now_ms: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Timer>>,
}

impl Scheduler {
    /// Creates a scheduler at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Moves the clock forward. Time never runs backwards.
    pub fn advance_to(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    /// Arranges for `owner` to receive `tag` `delay_ms` from now.
    ///
    /// ```
    /// use asteroids_core::entity::EntityId;
    /// use asteroids_core::timer::{Scheduler, TimerTag};
    ///
    /// let mut scheduler = Scheduler::new();
    /// let owner = EntityId::new(0, 0);
    /// scheduler.schedule(owner, TimerTag::Beat, 100);
    ///
    /// scheduler.advance_to(99);
    /// assert!(scheduler.drain_due().is_empty());
    /// scheduler.advance_to(100);
    /// assert_eq!(scheduler.drain_due().len(), 1);
    /// ```
    pub fn schedule(&mut self, owner: EntityId, tag: TimerTag, delay_ms: u64) {
        let timer = Timer {
            owner,
            tag,
            fire_at_ms: self.now_ms.saturating_add(delay_ms),
            seq: self.next_seq,
        };
        self.next_seq += 1;
        trace!(?owner, ?tag, fire_at_ms = timer.fire_at_ms, "timer_scheduled");
        self.queue.push(Reverse(timer));
    }

    /// Removes and returns every timer due at the current time, earliest
    /// first.
    ///
    /// Timers scheduled while handling the returned batch are not part of it;
    /// at the earliest they come due on the next drain.
    pub fn drain_due(&mut self) -> Vec<Timer> {
        let mut due = Vec::new();
        while let Some(Reverse(next)) = self.queue.peek() {
            if next.fire_at_ms > self.now_ms {
                break;
            }
            if let Some(Reverse(timer)) = self.queue.pop() {
                due.push(timer);
            }
        }
        due
    }

    /// Number of timers not yet fired.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Number of pending timers for one owner.
    #[must_use]
    pub fn pending_for(&self, owner: EntityId) -> usize {
        self.queue.iter().filter(|t| t.0.owner == owner).count()
    }

    /// Drops every pending timer and rewinds the clock to zero.
    pub fn reset(&mut self) {
        self.queue.clear();
        self.now_ms = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(n: u32) -> EntityId {
        EntityId::new(n, 0)
    }

    #[test]
    fn fires_in_deadline_order() {
        let mut s = Scheduler::new();
        s.schedule(id(0), TimerTag::Beat, 300);
        s.schedule(id(1), TimerTag::Fire, 100);
        s.schedule(id(2), TimerTag::Move, 200);
        s.advance_to(1000);
        let order: Vec<_> = s.drain_due().iter().map(|t| t.owner).collect();
        assert_eq!(order, vec![id(1), id(2), id(0)]);
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut s = Scheduler::new();
        s.schedule(id(5), TimerTag::Move, 50);
        s.schedule(id(3), TimerTag::Fire, 50);
        s.advance_to(50);
        let order: Vec<_> = s.drain_due().iter().map(|t| t.owner).collect();
        assert_eq!(order, vec![id(5), id(3)]);
    }

    #[test]
    fn no_deduplication() {
        let mut s = Scheduler::new();
        s.schedule(id(0), TimerTag::Beat, 10);
        s.schedule(id(0), TimerTag::Beat, 10);
        assert_eq!(s.pending_for(id(0)), 2);
        s.advance_to(10);
        assert_eq!(s.drain_due().len(), 2);
        assert_eq!(s.pending(), 0);
    }

    #[test]
    fn delay_is_relative_to_now() {
        let mut s = Scheduler::new();
        s.advance_to(500);
        s.schedule(id(0), TimerTag::Stop, 100);
        s.advance_to(599);
        assert!(s.drain_due().is_empty());
        s.advance_to(600);
        let due = s.drain_due();
        assert_eq!(due[0].fire_at_ms, 600);
    }

    #[test]
    fn clock_never_rewinds() {
        let mut s = Scheduler::new();
        s.advance_to(100);
        s.advance_to(50);
        assert_eq!(s.now_ms(), 100);
    }

    #[test]
    fn rearm_during_drain_waits_for_next_drain() {
        let mut s = Scheduler::new();
        s.schedule(id(0), TimerTag::Beat, 0);
        let first = s.drain_due();
        assert_eq!(first.len(), 1);
        s.schedule(id(0), TimerTag::Beat, 0);
        assert_eq!(s.pending(), 1);
        assert_eq!(s.drain_due().len(), 1);
    }

    #[test]
    fn reset_clears_queue() {
        let mut s = Scheduler::new();
        s.schedule(id(0), TimerTag::Beat, 10);
        s.advance_to(5);
        s.reset();
        assert_eq!(s.pending(), 0);
        assert_eq!(s.now_ms(), 0);
    }
}
