//! Key-to-key transposition distances.
//!
//! Drives "transpose to key X" actions: the UI offers [`KEY_CHOICES`], works
//! out which key the chart is currently in, and asks for the shortest
//! semitone offset between the two.

use crate::lexer::{Lexer, Token};
use crate::pitch::{note_index, shortest_signed_offset};

/// Target keys offered for transposition, in chromatic order.
pub const KEY_CHOICES: [&str; 12] = [
    "C", "Db", "D", "Eb", "E", "F", "Gb", "G", "Ab", "A", "Bb", "B",
];

/// Key assumed when neither the chart nor its body names one.
pub const DEFAULT_KEY: &str = "C";

/// Shortest signed semitone offset between two keys, in `-5..=6`.
///
/// Any quality suffix is ignored, so `"Am"` counts as `A`. Unrecognized
/// names (including the `?` placeholder of imported charts) yield 0.
///
/// ```
/// use chartbook::key_distance;
///
/// assert_eq!(key_distance("C", "D"), 2);
/// assert_eq!(key_distance("C", "Bb"), -2);
/// assert_eq!(key_distance("G", "C"), 5);
/// assert_eq!(key_distance("?", "D"), 0);
/// ```
pub fn key_distance(from: &str, to: &str) -> i8 {
    match (note_index(from), note_index(to)) {
        (Some(from_idx), Some(to_idx)) => shortest_signed_offset(from_idx, to_idx),
        _ => {
            log::debug!("cannot measure distance from '{}' to '{}'", from, to);
            0
        }
    }
}

/// The key a chart is considered to be in.
///
/// Uses the chart's own key when it is not blank, otherwise the first chord
/// written in the body, otherwise [`DEFAULT_KEY`].
pub fn resolve_source_key(chart_key: &str, body: &str) -> String {
    let key = chart_key.trim();
    if !key.is_empty() {
        return key.to_string();
    }
    Lexer::new(body)
        .find_map(|token| match token {
            Token::Chord(chord) if !chord.trim().is_empty() => Some(chord.trim().to_string()),
            _ => None,
        })
        .unwrap_or_else(|| DEFAULT_KEY.to_string())
}

/// Offset needed to show a chart in `target` key.
pub fn offset_to_key(chart_key: &str, body: &str, target: &str) -> i8 {
    key_distance(&resolve_source_key(chart_key, body), target)
}

/// Format a transposition offset for display: `+2`, `0`, `-3`.
pub fn format_offset(offset: i32) -> String {
    if offset > 0 {
        format!("+{}", offset)
    } else {
        offset.to_string()
    }
}
