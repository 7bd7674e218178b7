//! # PDF Text Import
//!
//! Rebuilds chart markup from the positioned text fragments of a PDF.
//!
//! ## Pipeline
//! 1. **Line reconstruction** - fragments are grouped by their rounded `y`
//!    coordinate, lines are ordered top to bottom (larger `y` is higher on the
//!    page) and fragments left to right, joined with single spaces. Pages are
//!    separated by a blank line.
//! 2. **Markup synthesis** - each non-blank line is classified:
//!    - a *chord line* (only chord symbols, see [`is_chord_line`]) or a line
//!      forced with a `->` prefix becomes `{C}{G}...`; when the next line is a
//!      non-blank, non-chord line it is taken as the lyric under it
//!    - a line already written as `[Title]` is kept
//!    - anything else becomes a section header `[line]`
//!
//! An empty result means no chart was found.
//!
//! ## Example
//! ```rust
//! use chartbook::{import_pages, PageText, TextFragment};
//!
//! let page = PageText {
//!     fragments: vec![
//!         TextFragment::new("Hello world", 10.0, 680.2),
//!         TextFragment::new("G", 60.0, 700.0),
//!         TextFragment::new("C", 10.0, 699.8),
//!     ],
//! };
//! assert_eq!(import_pages(&[page]).unwrap(), "{C}{G}\nHello world\n\n");
//! ```
//!
//! Text extraction itself is the host's job: a [`TextExtractor`] turns PDF
//! bytes into [`PageText`]s. [`Importer`] runs one extraction at a time and
//! hands back an [`ImportDraft`] for the user to confirm.

use crate::chart::{Chart, DEFAULT_ARTIST};
use crate::error::ChartError;
use crate::sections::header_title;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A run of text at a position on a page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFragment {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl TextFragment {
    pub fn new(text: &str, x: f64, y: f64) -> Self {
        Self {
            text: text.to_string(),
            x,
            y,
        }
    }
}

/// The fragments of one page, in extraction order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PageText {
    pub fragments: Vec<TextFragment>,
}

static CHORD_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-G](?:#|b)?(?:m|maj|min|dim|aug|sus|add|sus2|sus4|°|\+)?[0-9]*(?:/[A-G](?:#|b)?)?$")
        .expect("chord token pattern is valid")
});

/// Whether a line holds nothing but whitespace-separated chord symbols.
///
/// Each symbol is an uppercase root, an optional quality from `m maj min dim
/// aug sus add sus2 sus4 ° +`, an optional number and an optional `/bass`.
///
/// ```
/// use chartbook::is_chord_line;
///
/// assert!(is_chord_line("C  G/B  Am7  Fmaj7"));
/// assert!(is_chord_line("  Dsus4 D  "));
/// assert!(!is_chord_line("Amazing grace"));
/// assert!(!is_chord_line("Faded"));
/// assert!(!is_chord_line(""));
/// ```
pub fn is_chord_line(line: &str) -> bool {
    let mut tokens = line.split_whitespace().peekable();
    tokens.peek().is_some() && tokens.all(|token| CHORD_TOKEN_RE.is_match(token))
}

/// Strip a `->` force prefix, returning the rest of the line
fn strip_arrow(line: &str) -> Option<&str> {
    line.strip_prefix("->").map(str::trim)
}

/// Rebuild text lines from positioned fragments.
pub fn reconstruct_lines(pages: &[PageText]) -> String {
    let mut text = String::new();
    for page in pages {
        let mut lines: BTreeMap<i64, Vec<&TextFragment>> = BTreeMap::new();
        for fragment in &page.fragments {
            lines.entry(fragment.y.round() as i64).or_default().push(fragment);
        }
        for fragments in lines.values_mut().rev() {
            fragments.sort_by(|a, b| a.x.total_cmp(&b.x));
            let line: Vec<&str> = fragments.iter().map(|f| f.text.as_str()).collect();
            text.push_str(&line.join(" "));
            text.push('\n');
        }
        text.push('\n');
    }
    text
}

/// Turn reconstructed text into chart markup.
pub fn synthesize_markup(text: &str) -> String {
    let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
    let mut body = String::new();
    let mut i = 0;

    while i < lines.len() {
        let mut line = lines[i];
        i += 1;
        if line.is_empty() {
            continue;
        }

        let forced = strip_arrow(line);
        if let Some(rest) = forced {
            line = rest;
        }

        if forced.is_some() || is_chord_line(line) {
            let chords: String = line
                .split_whitespace()
                .map(|chord| format!("{{{}}}", chord))
                .collect();
            body.push_str(&chords);
            body.push('\n');

            match lines.get(i) {
                Some(next)
                    if !next.is_empty() && !is_chord_line(next) && strip_arrow(next).is_none() =>
                {
                    body.push_str(next);
                    body.push_str("\n\n");
                    i += 1;
                }
                _ => body.push('\n'),
            }
        } else if header_title(line).is_some() {
            body.push_str(line);
            body.push('\n');
        } else {
            body.push('[');
            body.push_str(line);
            body.push_str("]\n");
        }
    }
    body
}

/// Import a chart body from extracted pages.
///
/// # Errors
/// [`ChartError::NoChartDetected`] when nothing could be synthesized.
pub fn import_pages(pages: &[PageText]) -> Result<String, ChartError> {
    let text = reconstruct_lines(pages);
    let body = synthesize_markup(&text);
    if body.is_empty() {
        log::warn!("no chart detected in {} pages", pages.len());
        return Err(ChartError::NoChartDetected);
    }
    log::info!(
        "imported {} pages: {} text lines, {} chord lines",
        pages.len(),
        text.lines().filter(|l| !l.trim().is_empty()).count(),
        body.lines().filter(|l| l.starts_with('{')).count()
    );
    Ok(body)
}

/// Host capability that pulls positioned text out of PDF bytes
pub trait TextExtractor {
    type Error: std::fmt::Display;

    fn extract(&self, bytes: &[u8]) -> Result<Vec<PageText>, Self::Error>;
}

pub const IMPORTED_TITLE: &str = "Imported Chart";
/// Key and tempo of an imported chart until the user sets them
pub const UNKNOWN_FIELD: &str = "?";

/// An imported chart waiting for the user's confirmation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDraft {
    pub title: String,
    pub artist: String,
    pub key: String,
    pub tempo: String,
    pub body: String,
}

impl ImportDraft {
    pub fn new(body: String) -> Self {
        Self {
            title: IMPORTED_TITLE.to_string(),
            artist: DEFAULT_ARTIST.to_string(),
            key: UNKNOWN_FIELD.to_string(),
            tempo: UNKNOWN_FIELD.to_string(),
            body,
        }
    }

    /// Commit the draft as a chart. Fields cleared by the user fall back to the import defaults.
    pub fn into_chart(self, id: u64) -> Chart {
        let pick = |value: String, default: &str| {
            if value.trim().is_empty() {
                default.to_string()
            } else {
                value
            }
        };
        Chart {
            id,
            title: pick(self.title, IMPORTED_TITLE),
            artist: pick(self.artist, DEFAULT_ARTIST),
            key: pick(self.key, UNKNOWN_FIELD),
            tempo: pick(self.tempo, UNKNOWN_FIELD),
            body: self.body,
        }
    }
}

/// Tracks the single import allowed in flight
#[derive(Debug, Default)]
pub struct Importer {
    busy: bool,
}

impl Importer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Mark an import as started.
    pub fn begin(&mut self) -> Result<(), ChartError> {
        if self.busy {
            return Err(ChartError::ImportInProgress);
        }
        self.busy = true;
        Ok(())
    }

    /// Finish the running import with the extracted pages.
    pub fn finish(&mut self, pages: &[PageText]) -> Result<ImportDraft, ChartError> {
        self.busy = false;
        import_pages(pages).map(ImportDraft::new)
    }

    /// Abort the running import because extraction failed.
    pub fn fail(&mut self, reason: &str) -> ChartError {
        self.busy = false;
        log::warn!("PDF import failed: {}", reason);
        ChartError::ImportUnreadable(reason.to_string())
    }

    /// Run a whole import: extraction through `extractor`, then synthesis.
    pub fn import_bytes<E: TextExtractor>(
        &mut self,
        extractor: &E,
        bytes: &[u8],
    ) -> Result<ImportDraft, ChartError> {
        self.begin()?;
        if !bytes.starts_with(b"%PDF") {
            return Err(self.fail("not a PDF file"));
        }
        match extractor.extract(bytes) {
            Ok(pages) => self.finish(&pages),
            Err(e) => Err(self.fail(&e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(lines: &[(&str, f64)]) -> PageText {
        PageText {
            fragments: lines.iter().map(|(t, y)| TextFragment::new(t, 0.0, *y)).collect(),
        }
    }

    struct FixedExtractor(Result<Vec<PageText>, String>);

    impl TextExtractor for FixedExtractor {
        type Error = String;

        fn extract(&self, _bytes: &[u8]) -> Result<Vec<PageText>, String> {
            self.0.clone()
        }
    }

    #[test]
    fn test_reconstruct_orders_lines_and_fragments() {
        let page = PageText {
            fragments: vec![
                TextFragment::new("world", 50.0, 100.4),
                TextFragment::new("second", 0.0, 80.0),
                TextFragment::new("Hello", 5.0, 99.6),
            ],
        };
        assert_eq!(reconstruct_lines(&[page]), "Hello world\nsecond\n\n");
    }

    #[test]
    fn test_reconstruct_separates_pages() {
        let text = reconstruct_lines(&[page(&[("a", 10.0)]), page(&[("b", 10.0)])]);
        assert_eq!(text, "a\n\nb\n\n");
    }

    #[test]
    fn test_chord_line_grammar() {
        assert!(is_chord_line("C"));
        assert!(is_chord_line("Bb/D  F#m7  C°  Eaug  Gsus2 Dadd9 A+"));
        assert!(!is_chord_line("am  em"));
        assert!(!is_chord_line("C G walk"));
        assert!(!is_chord_line("Cmaj7(#11)"));
        assert!(!is_chord_line("H"));
        assert!(!is_chord_line("   "));
    }

    #[test]
    fn test_words_spelled_with_note_letters_are_lyrics() {
        for line in ["Faded", "A bed", "Be a babe", "Cafe", "Add", "CG", "a"] {
            assert!(!is_chord_line(line), "{}", line);
        }
        assert_eq!(synthesize_markup("G\nA bed\n"), "{G}\nA bed\n\n");
    }

    #[test]
    fn test_chord_line_with_lyric() {
        assert_eq!(synthesize_markup("C G\nHello world\n"), "{C}{G}\nHello world\n\n");
    }

    #[test]
    fn test_chord_line_without_lyric() {
        let body = synthesize_markup("Intro\nC G Am F\nD G\n\nLa la\n");
        assert_eq!(body, "[Intro]\n{C}{G}{Am}{F}\n\n{D}{G}\n\n[La la]\n");
    }

    #[test]
    fn test_arrow_forces_chord_line() {
        let body = synthesize_markup("-> N.C. riff\nsung words\n");
        assert_eq!(body, "{N.C.}{riff}\nsung words\n\n");
        // an arrow line is never taken as a lyric
        let body = synthesize_markup("C\n->G\n");
        assert_eq!(body, "{C}\n\n{G}\n\n");
    }

    #[test]
    fn test_existing_headers_kept_and_prose_wrapped() {
        let body = synthesize_markup("[Coro]\nCopyright 2020\n");
        assert_eq!(body, "[Coro]\n[Copyright 2020]\n");
    }

    #[test]
    fn test_import_example() {
        let pages = [page(&[("C G", 700.0), ("Hello world", 680.0)])];
        assert_eq!(import_pages(&pages).unwrap(), "{C}{G}\nHello world\n\n");
    }

    #[test]
    fn test_import_nothing_detected() {
        assert_eq!(import_pages(&[]), Err(ChartError::NoChartDetected));
        assert_eq!(import_pages(&[page(&[(" ", 5.0)])]), Err(ChartError::NoChartDetected));
    }

    #[test]
    fn test_imported_body_segments() {
        let pages = [page(&[("Verse 1", 700.0), ("G D", 690.0), ("Amazing grace", 680.0), ("Coro", 670.0), ("C", 660.0)])];
        let body = import_pages(&pages).unwrap();
        let found = crate::sections::sections(&body);
        let titles: Vec<_> = found.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Verse 1", "Coro"]);
    }

    #[test]
    fn test_importer_busy_flag() {
        let mut importer = Importer::new();
        importer.begin().unwrap();
        assert!(importer.is_busy());
        assert_eq!(importer.begin(), Err(ChartError::ImportInProgress));
        let draft = importer.finish(&[page(&[("Am", 1.0)])]).unwrap();
        assert!(!importer.is_busy());
        assert_eq!(draft.body, "{Am}\n\n");
        assert_eq!(draft.key, "?");
    }

    #[test]
    fn test_import_bytes_failures_reset_busy() {
        let mut importer = Importer::new();
        let ok = FixedExtractor(Ok(vec![page(&[("E", 1.0)])]));
        let broken = FixedExtractor(Err("encrypted".to_string()));

        let err = importer.import_bytes(&ok, b"not a pdf").unwrap_err();
        assert!(matches!(err, ChartError::ImportUnreadable(_)));
        assert!(!importer.is_busy());

        let err = importer.import_bytes(&broken, b"%PDF-1.7").unwrap_err();
        assert_eq!(err, ChartError::ImportUnreadable("encrypted".to_string()));
        assert!(!importer.is_busy());

        let draft = importer.import_bytes(&ok, b"%PDF-1.7").unwrap();
        assert_eq!(draft.title, IMPORTED_TITLE);
        assert!(!importer.is_busy());
    }

    #[test]
    fn test_draft_into_chart_defaults() {
        let mut draft = ImportDraft::new("{C}\n\n".to_string());
        draft.title = "  ".to_string();
        draft.key = "D".to_string();
        let chart = draft.into_chart(5);
        assert_eq!(chart.title, IMPORTED_TITLE);
        assert_eq!(chart.key, "D");
        assert_eq!(chart.artist, "Unknown");
        assert_eq!(chart.tempo, "?");
        assert_eq!(chart.id, 5);
    }
}
