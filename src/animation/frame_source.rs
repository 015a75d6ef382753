//! Contract between the combat core and whatever plays a fighter's animation

use serde::{Deserialize, Serialize};

use crate::core::types::Rect;

/// Animation selected for a fighter; doubles as the frame table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimState {
    Idle,
    Run,
    Jump,
    Attack,
    Hit,
    Defeat,
    Victory,
}

impl AnimState {
    pub const ALL: [AnimState; 7] = [
        AnimState::Idle,
        AnimState::Run,
        AnimState::Jump,
        AnimState::Attack,
        AnimState::Hit,
        AnimState::Defeat,
        AnimState::Victory,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AnimState::Idle => "idle",
            AnimState::Run => "run",
            AnimState::Jump => "jump",
            AnimState::Attack => "attack",
            AnimState::Hit => "hit",
            AnimState::Defeat => "defeat",
            AnimState::Victory => "victory",
        }
    }
}

/// Named geometry a frame may carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameBox {
    Hurtbox,
    Hitbox,
}

/// Read-only view of the current animation frame
pub trait FrameSource {
    /// Pixel size of the current frame
    fn current_frame_size(&self) -> (f32, f32);

    /// Authored box for the current frame, exactly as stored
    ///
    /// Values may be normalised (0..1) or in pixels; callers scale them.
    fn current_frame_box(&self, kind: FrameBox) -> Option<Rect>;

    /// Non-looping animation resting on its last frame
    fn is_animation_finished(&self) -> bool;

    fn current_state(&self) -> AnimState;

    /// Position in the current clip, 0.0 on the first frame and 1.0 on the last
    fn progress(&self) -> f32;
}

/// Frame source the owning fighter can also drive
pub trait Animator: FrameSource + std::fmt::Debug {
    /// Switch clip; a clip already playing is only rewound when `restart` is set
    fn play(&mut self, state: AnimState, looped: bool, restart: bool);

    /// Jump to a specific frame of the current clip
    fn seek(&mut self, frame: usize);

    fn advance(&mut self, dt: f32);
}
