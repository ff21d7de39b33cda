//! # movement-core
//!
//! The engine behind the Movement chord sequencer: chord resolution,
//! the tick-driven step sequencer and transport state machine, the
//! built-in preset table, and the MIDI glue (external clock in, notes out).

pub mod midi;
pub mod presets;
pub mod resolve;
pub mod sequencer;

pub use midi::{MidiClockInput, MidiNoteOutput, TransportEvent};
pub use presets::{ParseError, PresetBank};
pub use sequencer::{NoteSink, Sequencer, TransportMode, TICKS_PER_BEAT};
