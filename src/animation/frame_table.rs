//! Read-only frame table shared by every animation player
//!
//! Built once at startup (usually from the JSON the sprite slicer writes) and
//! handed out behind `Arc`. Nothing in the combat core mutates it.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::animation::frame_source::{AnimState, FrameBox};
use crate::core::error::{DuelError, Result};
use crate::core::types::Rect;

/// Authored box, either `{"x":..,"y":..,"w":..,"h":..}` or `[x, y, w, h]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoxSpec {
    Array([f32; 4]),
    Object {
        #[serde(default)]
        x: f32,
        #[serde(default)]
        y: f32,
        #[serde(default)]
        w: f32,
        #[serde(default)]
        h: f32,
    },
}

impl BoxSpec {
    pub fn to_rect(self) -> Rect {
        match self {
            BoxSpec::Array([x, y, w, h]) => Rect::new(x, y, w, h),
            BoxSpec::Object { x, y, w, h } => Rect::new(x, y, w, h),
        }
    }
}

/// One frame of a clip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    pub w: f32,
    pub h: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hurtbox: Option<BoxSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hitbox: Option<BoxSpec>,
}

impl FrameData {
    pub fn plain(w: f32, h: f32) -> Self {
        Self { w, h, hurtbox: None, hitbox: None }
    }

    pub fn frame_box(&self, kind: FrameBox) -> Option<Rect> {
        match kind {
            FrameBox::Hurtbox => self.hurtbox,
            FrameBox::Hitbox => self.hitbox,
        }
        .map(BoxSpec::to_rect)
    }
}

/// A sequence of frames played at a fixed rate or with per-frame durations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub fps: f32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub durations: Option<Vec<f32>>,
    pub frames: Vec<FrameData>,
}

impl Clip {
    pub fn uniform(frame_count: usize, fps: f32, w: f32, h: f32) -> Self {
        Self {
            fps,
            durations: None,
            frames: vec![FrameData::plain(w, h); frame_count],
        }
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

fn default_frame() -> [f32; 2] {
    [96.0, 96.0]
}

/// All clips of one character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharacterFrames {
    /// Frame size reported for states without a clip
    #[serde(default = "default_frame")]
    pub default_frame: [f32; 2],
    #[serde(default)]
    pub clips: HashMap<AnimState, Clip>,
}

impl CharacterFrames {
    /// Unannotated clips with the reference frame counts and rates
    pub fn standard(w: f32, h: f32) -> Self {
        let layout = [
            (AnimState::Idle, 4, 6.0),
            (AnimState::Run, 5, 12.0),
            (AnimState::Jump, 7, 8.0),
            (AnimState::Attack, 5, 8.0),
            (AnimState::Hit, 4, 8.0),
            (AnimState::Defeat, 5, 4.0),
            (AnimState::Victory, 3, 6.0),
        ];
        let clips = layout
            .into_iter()
            .map(|(state, count, fps)| (state, Clip::uniform(count, fps, w, h)))
            .collect();
        Self { default_frame: [w, h], clips }
    }

    pub fn clip(&self, state: AnimState) -> Option<&Clip> {
        self.clips.get(&state).filter(|c| !c.is_empty())
    }

    /// Error out if any state has no playable clip
    pub fn require_complete(&self, character: &str) -> Result<()> {
        for state in AnimState::ALL {
            if self.clip(state).is_none() {
                return Err(DuelError::MissingAnimation {
                    character: character.to_string(),
                    state,
                });
            }
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct RawFrameTable {
    characters: HashMap<String, CharacterFrames>,
}

/// Process-wide table of every character's frames
#[derive(Debug, Clone, Default)]
pub struct FrameTable {
    characters: HashMap<String, Arc<CharacterFrames>>,
}

impl FrameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, name: impl Into<String>, frames: CharacterFrames) -> Self {
        self.characters.insert(name.into(), Arc::new(frames));
        self
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let raw: RawFrameTable = serde_json::from_str(text)?;
        let characters = raw
            .characters
            .into_iter()
            .map(|(name, frames)| (name, Arc::new(frames)))
            .collect();
        Ok(Self { characters })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        let table = Self::from_json_str(&text)?;
        tracing::info!(
            "Loaded frame table {:?} with {} characters",
            path.as_ref(),
            table.characters.len()
        );
        Ok(table)
    }

    pub fn character(&self, name: &str) -> Result<Arc<CharacterFrames>> {
        self.characters
            .get(name)
            .cloned()
            .ok_or_else(|| DuelError::UnknownCharacter(name.to_string()))
    }

    pub fn character_names(&self) -> impl Iterator<Item = &str> {
        self.characters.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "characters": {
            "ryu": {
                "default_frame": [50, 90],
                "clips": {
                    "attack": {
                        "fps": 8,
                        "frames": [
                            { "w": 45, "h": 90 },
                            { "w": 77, "h": 90, "hitbox": [0.6, 0.4, 0.4, 0.2] },
                            { "w": 57, "h": 90, "hurtbox": { "x": 5, "y": 0, "w": 40, "h": 80 } }
                        ]
                    }
                }
            }
        }
    }"#;

    #[test]
    fn test_parse_table_with_both_box_shapes() {
        let table = FrameTable::from_json_str(TABLE).expect("table should parse");
        let ryu = table.character("ryu").unwrap();
        assert_eq!(ryu.default_frame, [50.0, 90.0]);

        let attack = ryu.clip(AnimState::Attack).expect("attack clip");
        assert_eq!(attack.len(), 3);
        assert_eq!(
            attack.frames[1].frame_box(FrameBox::Hitbox),
            Some(Rect::new(0.6, 0.4, 0.4, 0.2))
        );
        assert_eq!(
            attack.frames[2].frame_box(FrameBox::Hurtbox),
            Some(Rect::new(5.0, 0.0, 40.0, 80.0))
        );
        assert_eq!(attack.frames[0].frame_box(FrameBox::Hitbox), None);
    }

    #[test]
    fn test_unknown_character() {
        let table = FrameTable::from_json_str(TABLE).unwrap();
        assert!(matches!(
            table.character("ken"),
            Err(DuelError::UnknownCharacter(name)) if name == "ken"
        ));
    }

    #[test]
    fn test_incomplete_character_reported() {
        let table = FrameTable::from_json_str(TABLE).unwrap();
        let ryu = table.character("ryu").unwrap();
        assert!(matches!(
            ryu.require_complete("ryu"),
            Err(DuelError::MissingAnimation { state: AnimState::Idle, .. })
        ));
    }

    #[test]
    fn test_standard_frames_complete() {
        let frames = CharacterFrames::standard(96.0, 96.0);
        assert!(frames.require_complete("standard").is_ok());
        assert_eq!(frames.clip(AnimState::Attack).unwrap().len(), 5);
    }

    #[test]
    fn test_shared_character_is_not_copied() {
        let table = FrameTable::new().with_character("ken", CharacterFrames::standard(96.0, 96.0));
        let a = table.character("ken").unwrap();
        let b = table.character("ken").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
