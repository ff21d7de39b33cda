use serde::{Deserialize, Serialize};

/// Tonic pitch letter (naturals only — the UI cycles A through G)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tonic {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
}

impl Tonic {
    pub const ALL: [Tonic; 7] = [
        Tonic::A,
        Tonic::B,
        Tonic::C,
        Tonic::D,
        Tonic::E,
        Tonic::F,
        Tonic::G,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Tonic::A => "A",
            Tonic::B => "B",
            Tonic::C => "C",
            Tonic::D => "D",
            Tonic::E => "E",
            Tonic::F => "F",
            Tonic::G => "G",
        }
    }

    /// Pitch class, C-based (C=0 .. B=11)
    pub fn semitone(&self) -> i32 {
        match self {
            Tonic::C => 0,
            Tonic::D => 2,
            Tonic::E => 4,
            Tonic::F => 5,
            Tonic::G => 7,
            Tonic::A => 9,
            Tonic::B => 11,
        }
    }
}

impl Default for Tonic {
    fn default() -> Self {
        Tonic::C
    }
}

/// Roman-numeral scale degree, each numeral optionally flatted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Degree {
    I,
    FlatII,
    II,
    FlatIII,
    III,
    FlatIV,
    IV,
    FlatV,
    V,
    FlatVI,
    VI,
    FlatVII,
    VII,
}

impl Degree {
    pub const ALL: [Degree; 13] = [
        Degree::I,
        Degree::FlatII,
        Degree::II,
        Degree::FlatIII,
        Degree::III,
        Degree::FlatIV,
        Degree::IV,
        Degree::FlatV,
        Degree::V,
        Degree::FlatVI,
        Degree::VI,
        Degree::FlatVII,
        Degree::VII,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Degree::I => "I",
            Degree::FlatII => "bII",
            Degree::II => "II",
            Degree::FlatIII => "bIII",
            Degree::III => "III",
            Degree::FlatIV => "bIV",
            Degree::IV => "IV",
            Degree::FlatV => "bV",
            Degree::V => "V",
            Degree::FlatVI => "bVI",
            Degree::VI => "VI",
            Degree::FlatVII => "bVII",
            Degree::VII => "VII",
        }
    }

    /// Semitone offset of the degree root above the tonic.
    /// Major-scale degree positions; the flat lowers by one semitone.
    pub fn offset(&self) -> i32 {
        match self {
            Degree::I => 0,
            Degree::FlatII => 1,
            Degree::II => 2,
            Degree::FlatIII => 3,
            Degree::III => 4,
            Degree::FlatIV => 4,
            Degree::IV => 5,
            Degree::FlatV => 6,
            Degree::V => 7,
            Degree::FlatVI => 8,
            Degree::VI => 9,
            Degree::FlatVII => 10,
            Degree::VII => 11,
        }
    }
}

/// Chord quality symbol. A step with no quality is a plain major triad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Quality {
    Major,
    Minor,
    Augmented,
    Diminished,
    Dominant7,
    Major7,
    MinorMajor7,
    Minor7,
    Major7Sharp5,
    Augmented7,
    Minor7Flat5,
    Diminished7,
    Dominant7Flat5,
}

impl Quality {
    pub const ALL: [Quality; 13] = [
        Quality::Major,
        Quality::Minor,
        Quality::Augmented,
        Quality::Diminished,
        Quality::Dominant7,
        Quality::Major7,
        Quality::MinorMajor7,
        Quality::Minor7,
        Quality::Major7Sharp5,
        Quality::Augmented7,
        Quality::Minor7Flat5,
        Quality::Diminished7,
        Quality::Dominant7Flat5,
    ];

    pub fn symbol(&self) -> &'static str {
        match self {
            Quality::Major => "M",
            Quality::Minor => "m",
            Quality::Augmented => "+",
            Quality::Diminished => "o",
            Quality::Dominant7 => "7",
            Quality::Major7 => "M7",
            Quality::MinorMajor7 => "mM7",
            Quality::Minor7 => "m7",
            Quality::Major7Sharp5 => "maj7#5",
            Quality::Augmented7 => "+7",
            Quality::Minor7Flat5 => "m7b5",
            Quality::Diminished7 => "o7",
            Quality::Dominant7Flat5 => "7b5",
        }
    }

    /// Semitone intervals from the chord root
    pub fn intervals(&self) -> &'static [i32] {
        match self {
            Quality::Major => &[0, 4, 7],
            Quality::Minor => &[0, 3, 7],
            Quality::Augmented => &[0, 4, 8],
            Quality::Diminished => &[0, 3, 6],
            Quality::Dominant7 => &[0, 4, 7, 10],
            Quality::Major7 => &[0, 4, 7, 11],
            Quality::MinorMajor7 => &[0, 3, 7, 11],
            Quality::Minor7 => &[0, 3, 7, 10],
            Quality::Major7Sharp5 => &[0, 4, 8, 11],
            Quality::Augmented7 => &[0, 4, 8, 10],
            Quality::Minor7Flat5 => &[0, 3, 6, 10],
            Quality::Diminished7 => &[0, 3, 6, 9],
            Quality::Dominant7Flat5 => &[0, 4, 6, 10],
        }
    }
}

/// A concrete pitch: pitch class (0-11, C-based, sharps) plus octave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteName {
    pub pitch_class: u8,
    pub octave: i32,
}

const PITCH_CLASS_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

impl NoteName {
    pub fn new(pitch_class: u8, octave: i32) -> Self {
        debug_assert!(pitch_class < 12);
        Self {
            pitch_class,
            octave,
        }
    }

    /// MIDI key number, where C4 = 60. None when outside 0..=127.
    pub fn midi(&self) -> Option<u8> {
        let n = (self.octave + 1) * 12 + self.pitch_class as i32;
        u8::try_from(n).ok().filter(|&n| n <= 127)
    }
}

impl std::fmt::Display for NoteName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}{}",
            PITCH_CLASS_NAMES[self.pitch_class as usize % 12],
            self.octave
        )
    }
}
