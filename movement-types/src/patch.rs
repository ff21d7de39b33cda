//! Session configuration ("patch"): tonic, octave, the working progression,
//! and which preset it came from.

use serde::{Deserialize, Serialize};

use crate::music::{Degree, Quality, Tonic};
use crate::step::Progression;

/// Octaves the editor can reach.
pub const OCTAVES: [i32; 9] = [0, 1, 2, 3, 4, 5, 6, 7, 8];

/// Beats-per-step values the editor can reach.
pub const BEATS: [u32; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16];

/// Everything the sequencer reads and the editor mutates, passed around
/// explicitly rather than living in globals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    pub tonic: Tonic,
    pub octave: i32,
    pub progression: Progression,
    pub preset_index: usize,
    /// True from the first step edit after a preset load until the next
    /// load. Derived state: never set directly by the UI.
    pub preset_dirty: bool,
}

impl Patch {
    pub fn new(progression: Progression) -> Self {
        Self {
            tonic: Tonic::C,
            octave: 4,
            progression,
            preset_index: 0,
            preset_dirty: false,
        }
    }

    /// Replace the working progression with a (deep-copied) preset.
    /// The caller resolves the index against the preset table, wrapping
    /// out-of-range values around.
    pub fn load_preset(&mut self, index: usize, progression: Progression) {
        self.preset_index = index;
        self.progression = progression;
        self.preset_dirty = false;
    }

    pub fn set_degree(&mut self, step: usize, degree: Degree) {
        self.progression.step_mut(step).degree = degree;
        self.preset_dirty = true;
    }

    pub fn set_quality(&mut self, step: usize, quality: Option<Quality>) {
        self.progression.step_mut(step).quality = quality;
        self.preset_dirty = true;
    }

    pub fn set_beats(&mut self, step: usize, beats: u32) {
        debug_assert!(beats >= 1);
        self.progression.step_mut(step).beats = beats;
        self.preset_dirty = true;
    }

    /// Duplicate the step at `index` after itself. Returns the new index.
    pub fn insert_step(&mut self, index: usize) -> usize {
        self.preset_dirty = true;
        self.progression.insert_duplicate(index)
    }

    /// Delete the step at `index` (refused at length 1). The working copy
    /// only counts as dirty when something was actually removed.
    pub fn delete_step(&mut self, index: usize) -> bool {
        let removed = self.progression.delete(index);
        if removed {
            self.preset_dirty = true;
        }
        removed
    }
}

impl Default for Patch {
    fn default() -> Self {
        Patch::new(Progression::default())
    }
}
