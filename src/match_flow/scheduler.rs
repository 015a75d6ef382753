//! Deferred one-shot transitions
//!
//! The orchestrator never waits on wall time itself: it asks a `Scheduler`
//! to hand a token back after a delay. Tokens carry the orchestrator's
//! generation, so a token scheduled before a reset is recognisably stale.

use serde::{Deserialize, Serialize};

/// Transition the orchestrator asked to run later
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// RoundIntro -> Playing
    BeginFight,
    /// RoundOver -> RoundIntro of the next round
    NextRound,
    /// RoundOver -> MatchOver
    EndMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TransitionToken {
    pub generation: u64,
    pub transition: Transition,
}

/// Handle for cancelling a scheduled token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TimerHandle(pub u64);

/// Fires each scheduled token once, no earlier than its delay
pub trait Scheduler {
    fn schedule_once(&mut self, delay: f32, token: TransitionToken) -> TimerHandle;

    /// Returns false if the handle already fired or was cancelled
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone)]
struct PendingTimer {
    handle: TimerHandle,
    due: f64,
    token: TransitionToken,
}

/// Deterministic scheduler advanced explicitly by the tick driver
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: f64,
    next_handle: u64,
    pending: Vec<PendingTimer>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.handle == handle)
    }

    /// Move time forward and return every token that came due, earliest first
    pub fn advance(&mut self, dt: f32) -> Vec<TransitionToken> {
        self.now += f64::from(dt);
        let now = self.now;

        let (mut due, rest): (Vec<_>, Vec<_>) = self.pending.drain(..).partition(|p| p.due <= now);
        self.pending = rest;
        // Handles increase monotonically, so they break ties in schedule order
        due.sort_by(|a, b| a.due.total_cmp(&b.due).then(a.handle.cmp(&b.handle)));

        for timer in &due {
            tracing::trace!("timer {:?} fired {:?}", timer.handle, timer.token.transition);
        }
        due.into_iter().map(|p| p.token).collect()
    }
}

impl Scheduler for ManualClock {
    fn schedule_once(&mut self, delay: f32, token: TransitionToken) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        let due = self.now + f64::from(delay.max(0.0));
        tracing::trace!("timer {:?} scheduled {:?} at {:.3}", handle, token.transition, due);
        self.pending.push(PendingTimer { handle, due, token });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.handle != handle);
        before != self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(transition: Transition) -> TransitionToken {
        TransitionToken { generation: 0, transition }
    }

    #[test]
    fn test_fires_once_not_early() {
        let mut clock = ManualClock::new();
        clock.schedule_once(1.0, token(Transition::BeginFight));
        assert!(clock.advance(0.5).is_empty());
        assert!(clock.advance(0.4).is_empty());
        assert_eq!(clock.advance(0.2), vec![token(Transition::BeginFight)]);
        assert!(clock.advance(5.0).is_empty());
    }

    #[test]
    fn test_fires_in_delay_order() {
        let mut clock = ManualClock::new();
        clock.schedule_once(2.0, token(Transition::EndMatch));
        clock.schedule_once(1.0, token(Transition::NextRound));
        let fired = clock.advance(3.0);
        assert_eq!(fired, vec![token(Transition::NextRound), token(Transition::EndMatch)]);
    }

    #[test]
    fn test_cancel() {
        let mut clock = ManualClock::new();
        let handle = clock.schedule_once(1.0, token(Transition::NextRound));
        assert!(clock.is_pending(handle));
        assert!(clock.cancel(handle));
        assert!(!clock.cancel(handle));
        assert!(clock.advance(2.0).is_empty());
        assert_eq!(clock.pending_count(), 0);
    }

    #[test]
    fn test_zero_delay_fires_next_advance() {
        let mut clock = ManualClock::new();
        clock.schedule_once(0.0, token(Transition::BeginFight));
        assert_eq!(clock.advance(0.0).len(), 1);
    }
}
