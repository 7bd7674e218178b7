//! Chart markup rendering
//!
//! Turns a chart body into the ordered list of items the view displays:
//! transposed chords, section titles, italic annotations and lyric lines.
//! The display mode removes items without reordering the survivors, so the
//! chords-only and notes-only renderings of a body interleave back into the
//! full rendering.

use crate::chord::transpose_chord;
use crate::config::DisplayMode;
use crate::lexer::{Lexer, Token};
use serde::Serialize;

/// One renderable item
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "text", rename_all = "lowercase")]
pub enum RenderItem {
    /// A chord symbol, already transposed
    Chord(String),
    /// A section title block
    Title(String),
    /// An annotation, shown with its parentheses
    Comment(String),
    /// One line of lyric or plain text
    Line(String),
}

impl RenderItem {
    pub fn is_chord(&self) -> bool {
        matches!(self, RenderItem::Chord(_))
    }
}

/// Render a chart body.
///
/// ```
/// use chartbook::{render, DisplayMode, RenderItem};
///
/// let items = render("[Coro]{G}Hello", 2, DisplayMode::Both);
/// assert_eq!(
///     items,
///     vec![
///         RenderItem::Title("Coro".to_string()),
///         RenderItem::Chord("A".to_string()),
///         RenderItem::Line("Hello".to_string()),
///     ]
/// );
/// ```
pub fn render(body: &str, transpose_offset: i32, display: DisplayMode) -> Vec<RenderItem> {
    let mut items = Vec::new();
    for token in Lexer::new(body) {
        match token {
            Token::Chord(chord) => {
                if display.shows_chords() {
                    items.push(RenderItem::Chord(transpose_chord(chord.trim(), transpose_offset)));
                }
            }
            Token::SectionTitle(title) => {
                if display.shows_notes() {
                    items.push(RenderItem::Title(title.to_string()));
                }
            }
            Token::Annotation(text) => {
                if display.shows_notes() {
                    items.push(RenderItem::Comment(format!("({})", text)));
                }
            }
            Token::Text(text) => {
                if display.shows_notes() {
                    items.extend(text.split('\n').map(|line| RenderItem::Line(line.to_string())));
                }
            }
        }
    }
    items
}

#[cfg(test)]
mod tests {
    use super::*;

    const BODY: &str = "[Verse 1]\n{C}{G/B}\nAmazing (soft) grace\n{Am}";

    fn merge(chords: &[RenderItem], notes: &[RenderItem], both: &[RenderItem]) -> Vec<RenderItem> {
        // interleave using the full rendering as the order template
        let mut c = chords.iter();
        let mut n = notes.iter();
        both.iter()
            .map(|item| if item.is_chord() { c.next() } else { n.next() })
            .map(|item| item.cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_render_both() {
        let items = render(BODY, 0, DisplayMode::Both);
        assert_eq!(
            items,
            vec![
                RenderItem::Title("Verse 1".to_string()),
                RenderItem::Line("".to_string()),
                RenderItem::Line("".to_string()),
                RenderItem::Chord("C".to_string()),
                RenderItem::Chord("G/B".to_string()),
                RenderItem::Line("".to_string()),
                RenderItem::Line("Amazing ".to_string()),
                RenderItem::Comment("(soft)".to_string()),
                RenderItem::Line(" grace".to_string()),
                RenderItem::Line("".to_string()),
                RenderItem::Chord("Am".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_transposes_trimmed_chords() {
        let items = render("{ Bb }", -1, DisplayMode::Both);
        assert_eq!(items, vec![RenderItem::Chord("A".to_string())]);
    }

    #[test]
    fn test_annotations_are_not_transposed() {
        let items = render("(capo C)", 3, DisplayMode::Both);
        assert_eq!(items, vec![RenderItem::Comment("(capo C)".to_string())]);
    }

    #[test]
    fn test_chords_mode_only_chords() {
        let items = render(BODY, 2, DisplayMode::Chords);
        assert_eq!(
            items,
            vec![
                RenderItem::Chord("D".to_string()),
                RenderItem::Chord("A/C#".to_string()),
                RenderItem::Chord("Bm".to_string()),
            ]
        );
    }

    #[test]
    fn test_notes_mode_has_no_chords() {
        let items = render(BODY, 2, DisplayMode::Notes);
        assert!(!items.is_empty());
        assert!(items.iter().all(|item| !item.is_chord()));
    }

    #[test]
    fn test_modes_are_complementary() {
        let both = render(BODY, 5, DisplayMode::Both);
        let chords = render(BODY, 5, DisplayMode::Chords);
        let notes = render(BODY, 5, DisplayMode::Notes);
        assert_eq!(chords.len() + notes.len(), both.len());
        assert_eq!(merge(&chords, &notes, &both), both);
    }

    #[test]
    fn test_empty_body() {
        assert!(render("", 3, DisplayMode::Both).is_empty());
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_yaml::to_string(&RenderItem::Chord("C".to_string())).unwrap();
        assert!(json.contains("type: chord"));
        assert!(json.contains("text: C"));
    }
}
