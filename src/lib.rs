//! Duel Sim - two-fighter combat simulation core
//!
//! Physics, attack timelines, hit resolution, opponent AI and round flow for
//! a side-view fighting game, driven by a fixed-rate tick. Rendering, audio
//! and input devices stay outside; they talk to the core through
//! `FrameSource`/`Animator`, `ActionSource` and the match event log.

pub mod ai;
pub mod animation;
pub mod combat;
pub mod core;
pub mod fighter;
pub mod input;
pub mod match_flow;
pub mod simulation;
