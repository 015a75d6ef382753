pub mod config;
pub mod error;
pub mod types;

pub use config::{AiConfig, AttackConfig, FighterConfig, MatchConfig, RoundConfig, StageConfig, TimeUpRule};
pub use error::{DuelError, Result};
pub use types::{Facing, Rect, Side, Tick, Vec2};
