//! The step sequencer: tick arithmetic, chord-change gating, and the
//! transport state machine.
//!
//! Position is re-derived from the raw tick on every query instead of
//! keeping a running cursor. The progression can be edited live between
//! any two ticks, and a cached cursor would desync; the walk is
//! O(step count) over a handful of steps.

use log::{debug, info};

use movement_types::{NoteName, Patch, Progression};

use crate::midi::TransportEvent;
use crate::resolve::resolve_chord;

/// Standard MIDI clock resolution: 24 pulses per quarter note.
pub const TICKS_PER_BEAT: i64 = 24;

/// Default note-on velocity, matching the original hardware-style output.
pub const DEFAULT_VELOCITY: u8 = 127;

/// Default MIDI channel.
pub const DEFAULT_CHANNEL: u8 = 0;

/// Where note commands go. Kept as a trait so the engine can be driven
/// against a recording fake in tests; the real sink is the MIDI output.
pub trait NoteSink {
    fn note_on(&mut self, note: NoteName, velocity: u8, channel: u8);
    fn note_off(&mut self, note: NoteName, channel: u8);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportMode {
    Stopped,
    Running,
}

/// Whole-beat position of `tick` within the progression's cycle.
fn beat_position(tick: i64, total_beats: i64) -> i64 {
    (tick / TICKS_PER_BEAT).rem_euclid(total_beats)
}

/// Index of the step sounding at `tick`. Total over all ticks whenever the
/// progression is non-empty (its length invariant guarantees that).
pub fn active_step_index(tick: i64, progression: &Progression) -> usize {
    let beat_pos = beat_position(tick, progression.total_beats() as i64);
    let mut cumulative = 0i64;
    for (index, step) in progression.steps().iter().enumerate() {
        cumulative += step.beats as i64;
        if beat_pos < cumulative {
            return index;
        }
    }
    progression.len() - 1
}

/// True exactly on the first tick of a beat that begins a step.
pub fn is_step_boundary(tick: i64, progression: &Progression) -> bool {
    if tick % TICKS_PER_BEAT != 0 {
        return false;
    }
    let beat_pos = beat_position(tick, progression.total_beats() as i64);
    let mut cumulative = 0i64;
    for step in progression.steps() {
        if beat_pos == cumulative {
            return true;
        }
        cumulative += step.beats as i64;
    }
    false
}

/// Playback state: the tick counter, transport mode, and the set of notes
/// currently gated on. Owns the note lifecycle — old chord tones are
/// always turned off, in full, before new ones are turned on.
pub struct Sequencer {
    tick: i64,
    mode: TransportMode,
    sounding: Vec<NoteName>,
    channel: u8,
    velocity: u8,
}

impl Sequencer {
    pub fn new() -> Self {
        Self {
            tick: -1,
            mode: TransportMode::Stopped,
            sounding: Vec::new(),
            channel: DEFAULT_CHANNEL,
            velocity: DEFAULT_VELOCITY,
        }
    }

    pub fn mode(&self) -> TransportMode {
        self.mode
    }

    pub fn is_running(&self) -> bool {
        self.mode == TransportMode::Running
    }

    pub fn tick(&self) -> i64 {
        self.tick
    }

    pub fn sounding(&self) -> &[NoteName] {
        &self.sounding
    }

    /// Step currently playing, for display. None while stopped or before
    /// the first pulse has landed.
    pub fn playing_step(&self, progression: &Progression) -> Option<usize> {
        if self.is_running() && self.tick >= 0 {
            Some(active_step_index(self.tick, progression))
        } else {
            None
        }
    }

    /// Feed one transport event. Returns true when the sounding chord
    /// changed (the UI's cue to redraw).
    pub fn handle_event(
        &mut self,
        event: TransportEvent,
        patch: &Patch,
        sink: &mut impl NoteSink,
    ) -> bool {
        match event {
            TransportEvent::Pulse => self.pulse(patch, sink),
            TransportEvent::Start => self.start(patch, sink),
            TransportEvent::Continue => {
                self.resume();
                false
            }
            TransportEvent::Stop => {
                let was_active = self.is_running() || !self.sounding.is_empty();
                self.stop(sink);
                was_active
            }
        }
    }

    /// One external clock pulse. Ignored entirely while stopped; otherwise
    /// advances the tick and fires a chord change on step boundaries.
    pub fn pulse(&mut self, patch: &Patch, sink: &mut impl NoteSink) -> bool {
        if !self.is_running() {
            return false;
        }
        self.tick += 1;

        if !is_step_boundary(self.tick, &patch.progression) {
            return false;
        }

        let index = active_step_index(self.tick, &patch.progression);
        self.change_chord(index, patch, sink);
        true
    }

    /// "Start": rewind so the first pulse lands on tick 0, then process it
    /// synchronously — the first chord sounds with the start itself.
    pub fn start(&mut self, patch: &Patch, sink: &mut impl NoteSink) -> bool {
        info!("transport start");
        self.tick = -1;
        self.mode = TransportMode::Running;
        self.pulse(patch, sink)
    }

    /// "Continue": resume mid-progression, no tick reset.
    pub fn resume(&mut self) {
        info!("transport continue at tick {}", self.tick);
        self.mode = TransportMode::Running;
    }

    /// "Stop": flush note-offs for everything sounding, clear, rewind.
    /// Idempotent — stopping again only re-guarantees silence.
    pub fn stop(&mut self, sink: &mut impl NoteSink) {
        if self.mode == TransportMode::Running {
            info!("transport stop at tick {}", self.tick);
        }
        for note in self.sounding.drain(..) {
            sink.note_off(note, self.channel);
        }
        self.tick = -1;
        self.mode = TransportMode::Stopped;
    }

    fn change_chord(&mut self, step_index: usize, patch: &Patch, sink: &mut impl NoteSink) {
        let step = patch.progression.step(step_index);
        let chord = resolve_chord(patch.tonic, step, patch.octave);
        debug!(
            "tick {}: step {} ({}) -> {:?}",
            self.tick,
            step_index,
            step.token(),
            chord.iter().map(|n| n.to_string()).collect::<Vec<_>>()
        );

        // All offs before any ons: a shared channel processes commands in
        // emission order, and overlapping identical pitches across the
        // change would leave a stuck note.
        for note in self.sounding.drain(..) {
            sink.note_off(note, self.channel);
        }
        self.sounding = chord;
        for note in &self.sounding {
            sink.note_on(*note, self.velocity, self.channel);
        }
    }
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movement_types::{Degree, Quality, Step, Tonic};

    #[derive(Debug, Clone, PartialEq, Eq)]
    enum Sent {
        On(String, u8, u8),
        Off(String, u8),
    }

    #[derive(Default)]
    struct RecordingSink {
        sent: Vec<Sent>,
    }

    impl NoteSink for RecordingSink {
        fn note_on(&mut self, note: NoteName, velocity: u8, channel: u8) {
            self.sent.push(Sent::On(note.to_string(), velocity, channel));
        }
        fn note_off(&mut self, note: NoteName, channel: u8) {
            self.sent.push(Sent::Off(note.to_string(), channel));
        }
    }

    fn four_chords() -> Patch {
        let mut patch = Patch::new(Progression::new(vec![
            Step::new(Degree::I, None),
            Step::new(Degree::V, None),
            Step::new(Degree::VI, Some(Quality::Minor)),
            Step::new(Degree::IV, None),
        ]));
        patch.tonic = Tonic::C;
        patch.octave = 4;
        patch
    }

    #[test]
    fn active_step_is_total_and_in_range() {
        let patch = four_chords();
        for tick in 0..(24 * 16 * 3) {
            let index = active_step_index(tick, &patch.progression);
            assert!(index < patch.progression.len());
        }
    }

    #[test]
    fn active_step_is_periodic() {
        let patch = four_chords();
        let period = TICKS_PER_BEAT * patch.progression.total_beats() as i64;
        for tick in 0..period {
            assert_eq!(
                active_step_index(tick, &patch.progression),
                active_step_index(tick + period, &patch.progression)
            );
        }
    }

    #[test]
    fn boundaries_every_four_beats() {
        let patch = four_chords();
        let boundaries: Vec<i64> = (0..=288)
            .filter(|&t| is_step_boundary(t, &patch.progression))
            .collect();
        assert_eq!(boundaries, vec![0, 96, 192, 288]);
    }

    #[test]
    fn uneven_beats_shift_boundaries() {
        let mut patch = four_chords();
        patch.progression.step_mut(0).beats = 3;
        patch.progression.step_mut(1).beats = 1;
        // Steps at beats 0, 3, 4, 8 of a 12-beat cycle
        let boundaries: Vec<i64> = (0..(12 * 24))
            .filter(|&t| is_step_boundary(t, &patch.progression))
            .collect();
        assert_eq!(boundaries, vec![0, 72, 96, 192]);
    }

    #[test]
    fn pulses_ignored_while_stopped() {
        let patch = four_chords();
        let mut seq = Sequencer::new();
        let mut sink = RecordingSink::default();
        for _ in 0..100 {
            assert!(!seq.pulse(&patch, &mut sink));
        }
        assert_eq!(seq.tick(), -1);
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn start_fires_first_chord_synchronously() {
        let patch = four_chords();
        let mut seq = Sequencer::new();
        let mut sink = RecordingSink::default();
        assert!(seq.start(&patch, &mut sink));
        assert_eq!(seq.tick(), 0);
        assert_eq!(
            sink.sent,
            vec![
                Sent::On("C4".into(), 127, 0),
                Sent::On("E4".into(), 127, 0),
                Sent::On("G4".into(), 127, 0),
            ]
        );
    }

    #[test]
    fn non_boundary_pulses_are_silent() {
        let patch = four_chords();
        let mut seq = Sequencer::new();
        let mut sink = RecordingSink::default();
        seq.start(&patch, &mut sink);
        let before = sink.sent.len();
        for _ in 0..95 {
            assert!(!seq.pulse(&patch, &mut sink));
        }
        assert_eq!(sink.sent.len(), before);
    }

    #[test]
    fn end_to_end_four_chord_cycle() {
        let patch = four_chords();
        let mut seq = Sequencer::new();
        let mut sink = RecordingSink::default();

        seq.start(&patch, &mut sink);
        let mut change_ticks = vec![seq.tick()];
        for _ in 0..288 {
            if seq.pulse(&patch, &mut sink) {
                change_ticks.push(seq.tick());
            }
        }
        assert_eq!(change_ticks, vec![0, 96, 192, 288]);

        // Each change turns the prior triad off in full before the next on
        let ons: Vec<&Sent> = sink
            .sent
            .iter()
            .filter(|s| matches!(s, Sent::On(..)))
            .collect();
        assert_eq!(ons.len(), 12); // 4 chord changes x 3 tones
        assert_eq!(
            sink.sent[3..9],
            [
                Sent::Off("C4".into(), 0),
                Sent::Off("E4".into(), 0),
                Sent::Off("G4".into(), 0),
                Sent::On("G4".into(), 127, 0),
                Sent::On("B4".into(), 127, 0),
                Sent::On("D4".into(), 127, 0),
            ]
        );
        // Third change: A minor; fourth: F major
        assert_eq!(sink.sent[12], Sent::On("A4".into(), 127, 0));
        assert_eq!(sink.sent[18], Sent::On("F4".into(), 127, 0));
    }

    #[test]
    fn stop_flushes_all_sounding_notes() {
        let patch = four_chords();
        let mut seq = Sequencer::new();
        let mut sink = RecordingSink::default();
        seq.start(&patch, &mut sink);
        sink.sent.clear();

        seq.stop(&mut sink);
        assert_eq!(
            sink.sent,
            vec![
                Sent::Off("C4".into(), 0),
                Sent::Off("E4".into(), 0),
                Sent::Off("G4".into(), 0),
            ]
        );
        assert!(seq.sounding().is_empty());
        assert_eq!(seq.tick(), -1);
        assert_eq!(seq.mode(), TransportMode::Stopped);

        // Stopping again is a no-op beyond guaranteeing silence
        sink.sent.clear();
        seq.stop(&mut sink);
        assert!(sink.sent.is_empty());
    }

    #[test]
    fn stop_event_only_reports_a_change_when_active() {
        let patch = four_chords();
        let mut seq = Sequencer::new();
        let mut sink = RecordingSink::default();

        // Stopping a silent, stopped transport is not a redraw cue
        assert!(!seq.handle_event(TransportEvent::Stop, &patch, &mut sink));

        seq.start(&patch, &mut sink);
        assert!(seq.handle_event(TransportEvent::Stop, &patch, &mut sink));
        assert!(!seq.handle_event(TransportEvent::Stop, &patch, &mut sink));
    }

    #[test]
    fn continue_resumes_without_reset() {
        let patch = four_chords();
        let mut seq = Sequencer::new();
        let mut sink = RecordingSink::default();
        seq.start(&patch, &mut sink);
        for _ in 0..50 {
            seq.pulse(&patch, &mut sink);
        }
        let tick = seq.tick();

        // Pause without the reset of a stop
        seq.handle_event(TransportEvent::Continue, &patch, &mut sink);
        assert_eq!(seq.tick(), tick);
        assert!(seq.is_running());
        seq.handle_event(TransportEvent::Pulse, &patch, &mut sink);
        assert_eq!(seq.tick(), tick + 1);
    }

    #[test]
    fn live_edit_between_ticks_is_tolerated() {
        let mut patch = four_chords();
        let mut seq = Sequencer::new();
        let mut sink = RecordingSink::default();
        seq.start(&patch, &mut sink);
        for _ in 0..50 {
            seq.pulse(&patch, &mut sink);
        }
        // Shrink the progression mid-flight; the next query re-derives
        // position and stays in range
        patch.progression.delete(3);
        patch.progression.delete(2);
        for _ in 0..200 {
            seq.pulse(&patch, &mut sink);
            let index = active_step_index(seq.tick(), &patch.progression);
            assert!(index < patch.progression.len());
        }
    }

    #[test]
    fn playing_step_tracks_boundaries() {
        let patch = four_chords();
        let mut seq = Sequencer::new();
        let mut sink = RecordingSink::default();
        assert_eq!(seq.playing_step(&patch.progression), None);
        seq.start(&patch, &mut sink);
        assert_eq!(seq.playing_step(&patch.progression), Some(0));
        for _ in 0..96 {
            seq.pulse(&patch, &mut sink);
        }
        assert_eq!(seq.playing_step(&patch.progression), Some(1));
    }
}
