//! # movement-types
//!
//! Shared vocabulary for the Movement chord sequencer: scale degrees,
//! chord qualities, the progression edit model, and the session patch.
//! This crate is pure data — no MIDI, no terminal, no clocks.

pub mod music;
pub mod patch;
pub mod select;
pub mod step;

pub use music::{Degree, NoteName, Quality, Tonic};
pub use patch::Patch;
pub use select::{step_clamped, step_wrapped};
pub use step::{Progression, Step};
