//! Built-in progression presets.
//!
//! Presets are authored as compact strings ("I-V-VIm-IV") and parsed once,
//! at bank construction, into structured steps. Nothing re-parses at
//! runtime; the working progression is always a deep copy, so edits never
//! touch the table.

use regex::Regex;

use movement_types::{Degree, Progression, Quality, Step};

struct PresetSource {
    name: &'static str,
    source: &'static str,
}

const BUILTIN: &[PresetSource] = &[
    PresetSource { name: "those four chords (maj)", source: "I-V-VIm-IV" },
    PresetSource { name: "those four chords (min)", source: "Im-VI-III-VII" },
    PresetSource { name: "happy days", source: "I-VIm-IV-V" },
    PresetSource { name: "sweet n cheerful", source: "I-IV-V-IV" },
    PresetSource { name: "just floatin' around #1", source: "IV-V-VIm-IIIm" },
    PresetSource { name: "poptastic", source: "I-IV-bVII-IV" },
    PresetSource { name: "mr peppy", source: "I-IV-IIm-V" },
    PresetSource { name: "just floatin' around #2", source: "I-IV-V-VIm" },
    PresetSource { name: "those four chords alt", source: "I-III-VIm-IV" },
    PresetSource { name: "The Power Trip", source: "I-bIII-VI-bIII" },
    PresetSource { name: "The Andalusian", source: "Im-VII-VI-V" },
    PresetSource { name: "The Epic Adventure", source: "Im-III-IVm-IIIm" },
    PresetSource { name: "Totally Modal", source: "Im-IV7-V7-Im" },
    PresetSource { name: "Funky AF", source: "Im-VI7-IV7-V7" },
    PresetSource { name: "Moody Tuesdays", source: "Im-VI-IIo-V7" },
    PresetSource { name: "The Smooth Mover #2", source: "VIm-bV-I-V" },
    PresetSource { name: "The Old Timer", source: "I-bIIIo-IIm-V" },
];

/// A progression token that failed to parse, with enough context to name
/// the offending step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    pub preset: String,
    /// Zero-based step position within the progression
    pub position: usize,
    pub token: String,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "preset '{}': bad chord token '{}' at step {}",
            self.preset, self.token, self.position
        )
    }
}

impl std::error::Error for ParseError {}

/// The preset table, parsed into structured progressions.
pub struct PresetBank {
    presets: Vec<(String, Progression)>,
}

impl PresetBank {
    /// Parse the built-in table. The table is static and covered by tests,
    /// so this only fails if the table itself is broken.
    pub fn builtin() -> Result<Self, ParseError> {
        let mut presets = Vec::with_capacity(BUILTIN.len());
        for preset in BUILTIN {
            let progression = parse_progression(preset.name, preset.source)?;
            presets.push((preset.name.to_string(), progression));
        }
        Ok(Self { presets })
    }

    pub fn len(&self) -> usize {
        self.presets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.presets.is_empty()
    }

    pub fn name(&self, index: usize) -> &str {
        &self.presets[index].0
    }

    /// Deep copy of the preset's progression, ready to be edited.
    pub fn progression(&self, index: usize) -> Progression {
        self.presets[index].1.clone()
    }
}

/// Parse a dash-separated progression string into steps with the default
/// beats-per-step.
pub fn parse_progression(preset: &str, source: &str) -> Result<Progression, ParseError> {
    // Longest symbols first so e.g. "m7b5" is not read as "m" + junk
    let mut symbols: Vec<&str> = Quality::ALL.iter().map(|q| q.symbol()).collect();
    symbols.sort_by_key(|s| std::cmp::Reverse(s.len()));
    let quality_alt: Vec<String> = symbols.iter().map(|s| regex::escape(s)).collect();
    let pattern = format!(
        "^(?P<deg>b?(?:VII|VI|V|IV|III|II|I))(?P<qlt>(?:{})?)$",
        quality_alt.join("|")
    );
    let re = Regex::new(&pattern).expect("chord token pattern is valid");

    let mut steps = Vec::new();
    for (position, token) in source.split('-').enumerate() {
        let step = parse_token(&re, token).ok_or_else(|| ParseError {
            preset: preset.to_string(),
            position,
            token: token.to_string(),
        })?;
        steps.push(step);
    }
    if steps.is_empty() {
        return Err(ParseError {
            preset: preset.to_string(),
            position: 0,
            token: source.to_string(),
        });
    }
    Ok(Progression::new(steps))
}

fn parse_token(re: &Regex, token: &str) -> Option<Step> {
    let caps = re.captures(token)?;
    let degree_name = caps.name("deg")?.as_str();
    let quality_symbol = caps.name("qlt").map(|m| m.as_str()).unwrap_or("");

    let degree = Degree::ALL.iter().copied().find(|d| d.name() == degree_name)?;
    let quality = if quality_symbol.is_empty() {
        None
    } else {
        Some(
            Quality::ALL
                .iter()
                .copied()
                .find(|q| q.symbol() == quality_symbol)?,
        )
    };
    Some(Step::new(degree, quality))
}
