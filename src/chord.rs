//! Chord symbol parsing and transposition
//!
//! A chord symbol is a root note, an opaque quality suffix and an optional
//! `/bass` note: `C#m7`, `Bbmaj7/D`, `G/B`. The quality is never interpreted,
//! only carried verbatim behind the transposed root.

use crate::pitch::{note_index, note_name, split_root, transpose_index};
use serde::Serialize;
use std::fmt;

/// A parsed chord symbol.
///
/// `bass` holds the text after the first `/`, trimmed. It is usually a note
/// name but is kept as text so that an unparseable bass survives untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordSymbol {
    pub root: String,
    pub quality: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bass: Option<String>,
}

impl ChordSymbol {
    /// Parse a chord symbol. Returns `None` when it does not start with a root note.
    ///
    /// ```
    /// use chartbook::ChordSymbol;
    ///
    /// let chord = ChordSymbol::parse("Ebmaj7/G").unwrap();
    /// assert_eq!(chord.root, "Eb");
    /// assert_eq!(chord.quality, "maj7");
    /// assert_eq!(chord.bass.as_deref(), Some("G"));
    /// ```
    pub fn parse(symbol: &str) -> Option<Self> {
        let (main, bass) = match symbol.split_once('/') {
            Some((main, bass)) => (main, Some(bass.trim().to_string())),
            None => (symbol, None),
        };
        let (root, quality) = split_root(main)?;
        Some(ChordSymbol {
            root: root.to_string(),
            quality: quality.to_string(),
            bass,
        })
    }

    /// Pitch class of the root.
    pub fn root_index(&self) -> Option<u8> {
        note_index(&self.root)
    }

    /// Pitch class of the bass note, if present and parseable.
    pub fn bass_index(&self) -> Option<u8> {
        self.bass.as_deref().and_then(note_index)
    }

    /// Transpose root and bass by `semitones`, keeping each one's accidental style.
    pub fn transposed(&self, semitones: i32) -> ChordSymbol {
        if semitones == 0 {
            return self.clone();
        }
        let root = shift_note(&self.root, semitones).unwrap_or_else(|| self.root.clone());
        let bass = self.bass.as_deref().map(|bass| match split_root(bass) {
            Some((bass_root, suffix)) => match shift_note(bass_root, semitones) {
                Some(shifted) => format!("{}{}", shifted, suffix),
                None => bass.to_string(),
            },
            None => {
                log::debug!("bass '{}' is not a note, passing through", bass);
                bass.to_string()
            }
        });
        ChordSymbol {
            root,
            quality: self.quality.clone(),
            bass,
        }
    }
}

impl fmt::Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.quality)?;
        if let Some(bass) = &self.bass {
            write!(f, "/{}", bass)?;
        }
        Ok(())
    }
}

/// Shift a bare root spelling, preferring a flat name when the original was flat
fn shift_note(root: &str, semitones: i32) -> Option<String> {
    let index = note_index(root)?;
    let prefer_flat = root.ends_with('b');
    Some(note_name(transpose_index(index, semitones), prefer_flat).to_string())
}

/// Transpose a chord symbol by a number of semitones.
///
/// Never fails: a symbol that does not start with a root note comes back
/// unchanged, and an unparseable bass note is passed through verbatim.
///
/// ```
/// use chartbook::transpose_chord;
///
/// assert_eq!(transpose_chord("Gm7", 2), "Am7");
/// assert_eq!(transpose_chord("D/F#", 1), "D#/G");
/// assert_eq!(transpose_chord("Bb", -1), "A");
/// assert_eq!(transpose_chord("Bb", 1), "Cb");
/// assert_eq!(transpose_chord("Eb", 2), "F");
/// assert_eq!(transpose_chord("Ab7", 3), "Cb7");
/// assert_eq!(transpose_chord("N.C.", 5), "N.C.");
/// ```
pub fn transpose_chord(symbol: &str, semitones: i32) -> String {
    if semitones == 0 || symbol.is_empty() {
        return symbol.to_string();
    }
    match ChordSymbol::parse(symbol) {
        Some(chord) => chord.transposed(semitones).to_string(),
        None => {
            log::debug!("'{}' has no root note, leaving it untransposed", symbol);
            symbol.to_string()
        }
    }
}
