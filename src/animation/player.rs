//! Frame clock over one character's clips

use std::sync::Arc;

use crate::animation::frame_source::{AnimState, Animator, FrameBox, FrameSource};
use crate::animation::frame_table::{CharacterFrames, Clip};
use crate::core::types::Rect;

/// Plays clips out of a shared `CharacterFrames`
#[derive(Debug, Clone)]
pub struct AnimationPlayer {
    frames: Arc<CharacterFrames>,
    state: AnimState,
    /// Fractional frame index into the current clip
    frame: f32,
    looped: bool,
}

impl AnimationPlayer {
    pub fn new(frames: Arc<CharacterFrames>) -> Self {
        Self {
            frames,
            state: AnimState::Idle,
            frame: 0.0,
            looped: true,
        }
    }

    /// Player over the standard unannotated clips
    pub fn standard(frame_px: f32) -> Self {
        Self::new(Arc::new(CharacterFrames::standard(frame_px, frame_px)))
    }

    fn clip(&self) -> Option<&Clip> {
        self.frames.clip(self.state)
    }

    pub fn frame_index(&self) -> usize {
        match self.clip() {
            Some(clip) => (self.frame.max(0.0) as usize).min(clip.len() - 1),
            None => 0,
        }
    }

    pub fn is_looping(&self) -> bool {
        self.looped
    }
}

impl FrameSource for AnimationPlayer {
    fn current_frame_size(&self) -> (f32, f32) {
        match self.clip() {
            Some(clip) => {
                let f = &clip.frames[self.frame_index()];
                (f.w, f.h)
            }
            None => (self.frames.default_frame[0], self.frames.default_frame[1]),
        }
    }

    fn current_frame_box(&self, kind: FrameBox) -> Option<Rect> {
        self.clip()?.frames[self.frame_index()].frame_box(kind)
    }

    fn is_animation_finished(&self) -> bool {
        let count = self.clip().map_or(0, Clip::len);
        !self.looped && self.frame >= count.saturating_sub(1) as f32
    }

    fn current_state(&self) -> AnimState {
        self.state
    }

    fn progress(&self) -> f32 {
        match self.clip() {
            Some(clip) if clip.len() > 1 => {
                (self.frame_index() as f32 / (clip.len() - 1) as f32).min(1.0)
            }
            _ => 0.0,
        }
    }
}

impl Animator for AnimationPlayer {
    fn play(&mut self, state: AnimState, looped: bool, restart: bool) {
        if self.state != state || restart {
            self.state = state;
            self.frame = 0.0;
        }
        self.looped = looped;
    }

    fn seek(&mut self, frame: usize) {
        if let Some(last) = self.clip().map(|clip| clip.len() - 1) {
            self.frame = frame.min(last) as f32;
        }
    }

    fn advance(&mut self, dt: f32) {
        let frame = self.frame;
        let Some((count, step)) = self.clip().map(|clip| {
            let step = match &clip.durations {
                Some(durations) if !durations.is_empty() => {
                    let idx = (frame.max(0.0) as usize).min(durations.len() - 1);
                    dt / durations[idx].max(1e-6)
                }
                _ => clip.fps * dt,
            };
            (clip.len() as f32, step)
        }) else {
            return;
        };
        self.frame += step;

        if self.frame >= count {
            if self.looped {
                self.frame %= count;
            } else {
                self.frame = count - 1e-3;
            }
        }
    }
}
