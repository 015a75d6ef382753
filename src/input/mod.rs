//! Player input: device-merged action state and edge-triggered intents

pub mod intent;
pub mod manager;

pub use intent::{apply_intent, ControlIntent, Horizontal, IntentReader};
pub use manager::{Action, ActionSource, InputManager, InputSource};
