//! Progression edit model.

use serde::{Deserialize, Serialize};

use crate::music::{Degree, Quality};

/// A single chord step: scale degree, optional quality, duration in beats.
///
/// Steps have positional identity — inserting or deleting shifts the
/// identity of everything after the edit point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    pub degree: Degree,
    pub quality: Option<Quality>,
    /// Duration in quarter-note beats, always >= 1
    pub beats: u32,
}

impl Step {
    pub const DEFAULT_BEATS: u32 = 4;

    pub fn new(degree: Degree, quality: Option<Quality>) -> Self {
        Self {
            degree,
            quality,
            beats: Self::DEFAULT_BEATS,
        }
    }

    /// Display token, e.g. "VIm" or "bIII7"
    pub fn token(&self) -> String {
        match self.quality {
            Some(q) => format!("{}{}", self.degree.name(), q.symbol()),
            None => self.degree.name().to_string(),
        }
    }
}

impl Default for Step {
    fn default() -> Self {
        Step::new(Degree::I, None)
    }
}

/// Ordered sequence of steps. Never empty: deletion of the last remaining
/// step is a no-op, so every query over the progression is total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    steps: Vec<Step>,
}

impl Progression {
    pub fn new(steps: Vec<Step>) -> Self {
        let steps = if steps.is_empty() {
            vec![Step::default()]
        } else {
            steps
        };
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        // Always false: the length-1 floor is enforced by construction
        // and by delete()
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> &Step {
        &self.steps[index]
    }

    pub fn step_mut(&mut self, index: usize) -> &mut Step {
        &mut self.steps[index]
    }

    /// Total cycle length in beats. Recomputed on every call so live edits
    /// are always reflected.
    pub fn total_beats(&self) -> u32 {
        self.steps.iter().map(|s| s.beats).sum()
    }

    /// Duplicate the step at `index` and insert the copy right after it.
    /// Returns the index of the new step.
    pub fn insert_duplicate(&mut self, index: usize) -> usize {
        let copy = self.steps[index];
        self.steps.insert(index + 1, copy);
        index + 1
    }

    /// Remove the step at `index`. Refused when only one step remains.
    /// Returns whether a step was removed.
    pub fn delete(&mut self, index: usize) -> bool {
        if self.steps.len() <= 1 {
            return false;
        }
        self.steps.remove(index);
        true
    }
}

impl Default for Progression {
    fn default() -> Self {
        Progression::new(vec![Step::default()])
    }
}
