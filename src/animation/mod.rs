//! Animation frame source: clip playback and the shared frame table
//!
//! The combat core only reads frames through `FrameSource`; rendering and
//! sprite slicing live outside this crate.

pub mod frame_source;
pub mod frame_table;
pub mod player;

pub use frame_source::{AnimState, Animator, FrameBox, FrameSource};
pub use frame_table::{BoxSpec, CharacterFrames, Clip, FrameData, FrameTable};
pub use player::AnimationPlayer;
