//! Round/match state machine, its deferred transitions and event log

pub mod events;
pub mod orchestrator;
pub mod scheduler;

pub use events::{MatchEvent, MatchEventLog, MatchEventType};
pub use orchestrator::{spawn_point, MatchPhase, Orchestrator, RoundState};
pub use scheduler::{ManualClock, Scheduler, TimerHandle, Transition, TransitionToken};
