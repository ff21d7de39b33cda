//! Roman-numeral chord resolution.
//!
//! Pure mapping from (tonic, degree, quality) to concrete pitches. Total
//! over the typed vocabulary — there is no malformed-step case once a
//! `Step` exists, so resolution cannot fail.

use movement_types::{NoteName, Step, Tonic};

/// Resolve a step to its chord tones at the given octave.
///
/// The chord root is the tonic pitch class plus the degree offset; tones
/// come from the quality's interval table (plain major triad when the step
/// has no quality). Every tone sits at the configured octave — the fifth
/// of V in C is D4, not D5 — so changing the octave shifts the whole
/// chord as one block.
pub fn resolve_chord(tonic: Tonic, step: &Step, octave: i32) -> Vec<NoteName> {
    let root = tonic.semitone() + step.degree.offset();
    let intervals: &[i32] = match step.quality {
        Some(q) => q.intervals(),
        None => &[0, 4, 7],
    };

    intervals
        .iter()
        .map(|interval| NoteName::new(((root + interval) % 12) as u8, octave))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use movement_types::{Degree, Quality};

    fn names(tonic: Tonic, step: Step, octave: i32) -> Vec<String> {
        resolve_chord(tonic, &step, octave)
            .iter()
            .map(|n| n.to_string())
            .collect()
    }

    #[test]
    fn c_major_triad() {
        let got = names(Tonic::C, Step::new(Degree::I, None), 4);
        assert_eq!(got, ["C4", "E4", "G4"]);
    }

    #[test]
    fn g_major_from_fifth_degree() {
        let got = names(Tonic::C, Step::new(Degree::V, None), 4);
        assert_eq!(got, ["G4", "B4", "D4"]);
    }

    #[test]
    fn a_minor_from_sixth_degree() {
        let got = names(Tonic::C, Step::new(Degree::VI, Some(Quality::Minor)), 4);
        assert_eq!(got, ["A4", "C4", "E4"]);
    }

    #[test]
    fn flat_degree_lowers_root() {
        let got = names(Tonic::C, Step::new(Degree::FlatVII, None), 4);
        assert_eq!(got, ["A#4", "D4", "F4"]);
    }

    #[test]
    fn every_tone_sits_at_the_configured_octave() {
        for degree in Degree::ALL {
            for quality in [None, Some(Quality::Dominant7), Some(Quality::Diminished7)] {
                let chord = resolve_chord(Tonic::B, &Step::new(degree, quality), 3);
                assert!(chord.iter().all(|n| n.octave == 3), "{:?} {:?}", degree, quality);
            }
        }
    }

    #[test]
    fn seventh_chord_has_four_tones() {
        let got = resolve_chord(Tonic::C, &Step::new(Degree::V, Some(Quality::Dominant7)), 4);
        assert_eq!(got.len(), 4);
    }

    #[test]
    fn tonic_transposes_whole_chord() {
        let in_c = resolve_chord(Tonic::C, &Step::new(Degree::I, None), 4);
        let in_d = resolve_chord(Tonic::D, &Step::new(Degree::I, None), 4);
        for (c, d) in in_c.iter().zip(&in_d) {
            assert_eq!(
                (d.octave * 12 + d.pitch_class as i32) - (c.octave * 12 + c.pitch_class as i32),
                2
            );
        }
    }
}
