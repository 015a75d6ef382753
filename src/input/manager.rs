//! Action state merged from several input sources

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::error::DuelError;

/// Abstract player action, independent of the device that produced it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Left,
    Right,
    Up,
    Down,
    Attack,
}

impl Action {
    pub const ALL: [Action; 5] = [Action::Left, Action::Right, Action::Up, Action::Down, Action::Attack];

    pub fn name(self) -> &'static str {
        match self {
            Action::Left => "left",
            Action::Right => "right",
            Action::Up => "up",
            Action::Down => "down",
            Action::Attack => "attack",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Action {
    type Err = DuelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Action::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| DuelError::InvalidConfig(format!("unknown action '{s}'")))
    }
}

/// Device that holds an action down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputSource {
    Keyboard,
    /// One finger on a touch control, by touch id
    Touch(u64),
    Gamepad(u32),
    /// Test harnesses and replays
    Scripted,
}

/// Level-triggered action lookup
pub trait ActionSource {
    fn is_action_active(&self, action: Action) -> bool;

    /// Lookup by action name; unknown names are never active
    fn is_named_action_active(&self, name: &str) -> bool {
        name.parse::<Action>().map(|a| self.is_action_active(a)).unwrap_or(false)
    }
}

/// Tracks which sources currently hold each action
///
/// An action is active while at least one source holds it, so releasing a
/// key does not cancel the same action held on a touch button.
#[derive(Debug, Clone, Default)]
pub struct InputManager {
    holders: [HashSet<InputSource>; 5],
}

impl InputManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Press or release `action` for `source`
    ///
    /// Returns true only when the action went from inactive to active.
    pub fn set(&mut self, action: Action, pressed: bool, source: InputSource) -> bool {
        let holders = &mut self.holders[action.index()];
        let was_active = !holders.is_empty();
        if pressed {
            holders.insert(source);
        } else {
            holders.remove(&source);
        }
        !was_active && !holders.is_empty()
    }

    /// Drop everything a source holds, e.g. when a touch ends
    pub fn clear_source(&mut self, source: InputSource) {
        for holders in &mut self.holders {
            holders.remove(&source);
        }
    }

    pub fn reset(&mut self) {
        for holders in &mut self.holders {
            holders.clear();
        }
    }

    pub fn active_actions(&self) -> impl Iterator<Item = Action> + '_ {
        Action::ALL.into_iter().filter(|a| self.is_action_active(*a))
    }
}

impl ActionSource for InputManager {
    fn is_action_active(&self, action: Action) -> bool {
        !self.holders[action.index()].is_empty()
    }
}
