//! Twelve-tone pitch classes and interval arithmetic.
//!
//! Pitch classes are indexed 0-11 from C using the sharp-based table
//! `C C# D D# E F F# G G# A A# B`. Flat spellings (`Db`, `Eb`, `Gb`, `Ab`,
//! `Bb`, `Cb`, `Fb`) and the enharmonics `E#` / `B#` are accepted on input
//! and normalized onto that table.

/// Sharp-based names for the twelve pitch classes, indexed from C.
pub const SHARP_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Number of pitch classes in an octave.
pub const OCTAVE: i32 = 12;

/// Split a note or chord symbol into its root spelling and the remainder.
///
/// The root is a letter `A`-`G` optionally followed by `#` or `b`.
/// Returns `None` when the string does not start with a root letter.
///
/// ```
/// use chartbook::pitch::split_root;
///
/// assert_eq!(split_root("C#m7"), Some(("C#", "m7")));
/// assert_eq!(split_root("G"), Some(("G", "")));
/// assert_eq!(split_root("Hm"), None);
/// ```
pub fn split_root(symbol: &str) -> Option<(&str, &str)> {
    let mut chars = symbol.chars();
    match chars.next() {
        Some('A'..='G') => {}
        _ => return None,
    }
    let root_len = match chars.next() {
        Some('#') | Some('b') => 2,
        _ => 1,
    };
    Some(symbol.split_at(root_len))
}

/// Letter name to semitone offset from C
fn letter_to_semitone(letter: char) -> Option<i32> {
    match letter {
        'C' => Some(0),
        'D' => Some(2),
        'E' => Some(4),
        'F' => Some(5),
        'G' => Some(7),
        'A' => Some(9),
        'B' => Some(11),
        _ => None,
    }
}

/// Pitch-class index of a note name, ignoring any chord quality after the root.
///
/// ```
/// use chartbook::pitch::note_index;
///
/// assert_eq!(note_index("C"), Some(0));
/// assert_eq!(note_index("Bb"), Some(10));
/// assert_eq!(note_index("E#"), Some(5));
/// assert_eq!(note_index("F#m7"), Some(6));
/// assert_eq!(note_index("?"), None);
/// ```
pub fn note_index(note: &str) -> Option<u8> {
    let (root, _) = split_root(note.trim())?;
    let mut chars = root.chars();
    let base = letter_to_semitone(chars.next()?)?;
    let acc = match chars.next() {
        Some('#') => 1,
        Some('b') => -1,
        _ => 0,
    };
    Some((base + acc).rem_euclid(OCTAVE) as u8)
}

/// Shift a pitch-class index by any number of semitones, wrapping into 0-11.
pub fn transpose_index(index: u8, semitones: i32) -> u8 {
    (index as i32 + semitones).rem_euclid(OCTAVE) as u8
}

/// Shortest signed distance in semitones from one pitch class to another.
///
/// The result lies in `-5..=6`; a tritone resolves upward to `+6`.
pub fn shortest_signed_offset(from: u8, to: u8) -> i8 {
    let diff = (to as i32 - from as i32).rem_euclid(OCTAVE);
    if diff > OCTAVE / 2 {
        (diff - OCTAVE) as i8
    } else {
        diff as i8
    }
}

/// Flat spelling of a pitch class: `Db Eb Fb Gb Ab Bb Cb`.
///
/// `C`, `D`, `F`, `G` and `A` have none.
pub fn flat_name(index: u8) -> Option<&'static str> {
    match index % 12 {
        1 => Some("Db"),
        3 => Some("Eb"),
        4 => Some("Fb"),
        6 => Some("Gb"),
        8 => Some("Ab"),
        10 => Some("Bb"),
        11 => Some("Cb"),
        _ => None,
    }
}

/// Name of a pitch class, using the flat spelling when preferred and available.
pub fn note_name(index: u8, prefer_flat: bool) -> &'static str {
    let index = index % 12;
    if prefer_flat {
        if let Some(flat) = flat_name(index) {
            return flat;
        }
    }
    SHARP_NAMES[index as usize]
}
