//! Editor state and key-driven edit operations.
//!
//! Two focus modes: Edit walks the chord row, Ctl walks the control row.
//! `k`/`j` adjust whatever the control row focuses, applied to the step
//! selected in the chord row. All operations are total — invalid intents
//! clamp or wrap, they never error.

use movement_core::PresetBank;
use movement_types::patch::{BEATS, OCTAVES};
use movement_types::{step_clamped, step_wrapped, Degree, Patch, Quality, Tonic};
use movement_types::select::wrap_index;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiMode {
    Edit,
    Ctl,
}

impl UiMode {
    pub fn toggled(self) -> Self {
        match self {
            UiMode::Edit => UiMode::Ctl,
            UiMode::Ctl => UiMode::Edit,
        }
    }
}

/// The control row, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Degree,
    Quality,
    Preset,
    Tonic,
    Octave,
    Beats,
    Add,
    Delete,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::Degree,
        Control::Quality,
        Control::Preset,
        Control::Tonic,
        Control::Octave,
        Control::Beats,
        Control::Add,
        Control::Delete,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Control::Degree => "deg",
            Control::Quality => "qlt",
            Control::Preset => "pst",
            Control::Tonic => "tnc",
            Control::Octave => "oct",
            Control::Beats => "len",
            Control::Add => "add",
            Control::Delete => "del",
        }
    }
}

/// What the editor currently points at.
#[derive(Debug, Clone, Copy)]
pub struct EditorState {
    pub mode: UiMode,
    /// Selected step in the chord row, always in range
    pub step_index: usize,
    pub control: Control,
}

impl EditorState {
    pub fn new() -> Self {
        Self {
            mode: UiMode::Edit,
            step_index: 0,
            control: Control::Degree,
        }
    }

    /// Move the chord-row selection (wraps at both ends).
    pub fn move_step(&mut self, patch: &Patch, dir: i32) {
        self.step_index = wrap_index(self.step_index, patch.progression.len(), dir);
    }

    /// Move the control-row selection (clamps at both ends).
    pub fn move_control(&mut self, dir: i32) {
        self.control = step_clamped(self.control, &Control::ALL, dir);
    }

    /// Pull the step selection back into range after structural edits.
    pub fn clamp_selection(&mut self, patch: &Patch) {
        self.step_index = self.step_index.min(patch.progression.len() - 1);
    }

    /// Adjust the focused field by `dir`. Wrap/clamp policy is per field:
    /// degree, tonic and preset wrap; quality, octave and beats clamp.
    pub fn adjust(&mut self, patch: &mut Patch, bank: &PresetBank, dir: i32) {
        let step = self.step_index;
        match self.control {
            Control::Degree => {
                let current = patch.progression.step(step).degree;
                patch.set_degree(step, step_wrapped(current, &Degree::ALL, dir));
            }
            Control::Quality => {
                let current = patch.progression.step(step).quality;
                patch.set_quality(step, step_clamped(current, &quality_choices(), dir));
            }
            Control::Preset => {
                let index = wrap_index(patch.preset_index, bank.len(), dir);
                patch.load_preset(index, bank.progression(index));
                self.clamp_selection(patch);
            }
            Control::Tonic => {
                patch.tonic = step_wrapped(patch.tonic, &Tonic::ALL, dir);
            }
            Control::Octave => {
                patch.octave = step_clamped(patch.octave, &OCTAVES, dir);
            }
            Control::Beats => {
                let current = patch.progression.step(step).beats;
                patch.set_beats(step, step_clamped(current, &BEATS, dir));
            }
            Control::Add | Control::Delete => {}
        }
    }

    /// Enter on the control row: structural edits.
    pub fn activate(&mut self, patch: &mut Patch) {
        match self.control {
            Control::Add => {
                self.step_index = patch.insert_step(self.step_index);
            }
            Control::Delete => {
                if patch.delete_step(self.step_index) {
                    self.step_index = self.step_index.saturating_sub(1);
                }
                self.clamp_selection(patch);
            }
            _ => {}
        }
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered quality choices for the editor; the leading `None` is the plain
/// triad the original presents as "-".
pub fn quality_choices() -> Vec<Option<Quality>> {
    let mut choices = vec![None];
    choices.extend(Quality::ALL.iter().map(|q| Some(*q)));
    choices
}
