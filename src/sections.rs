//! # Section Segmentation
//!
//! Reconstructs the logical sections of a song (verse, chorus, bridge, ...)
//! from a linear chart body.
//!
//! ## Rules
//! - A line whose trimmed text is `[Title]` starts a new section and stays
//!   at the top of it
//! - A line holding only `.` ends the current section and is dropped
//! - An empty header `[]` (or `[ ]`) ends the current section without
//!   starting a titled one
//! - Every other line, blank lines included, belongs to the current section
//! - Sections are trimmed; empty ones are dropped
//! - When nothing at all was produced from a non-empty body, the whole
//!   trimmed body is returned as a single section, so a whitespace-only
//!   body gives one empty section and only `""` gives none
//!
//! ## Example
//! ```rust
//! use chartbook::sections;
//!
//! let body = "[Coro]\nHello\n{C}{G}\nworld\n.\n[Verse 1]\nfoo";
//! let found = sections(body);
//! assert_eq!(found.len(), 2);
//! assert_eq!(found[0].title, "Coro");
//! assert_eq!(found[1].title, "Verse 1");
//! assert_eq!(found[1].body, "foo");
//! ```
//!
//! ## Overview
//! [`overview()`] goes one step further for the section overview cards:
//! each section gets a badge from the label taxonomy and its lines are
//! grouped into chord-over-lyric pairs.

use crate::chord::transpose_chord;
use crate::config::DisplayMode;
use crate::lexer::{Lexer, Token};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Title given to a section that has no header line.
pub const UNTITLED: &str = "Untitled";

/// A titled block of a chart body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub body: String,
}

impl Section {
    /// Split a raw section into its `[Title]` header and the lines after it.
    pub fn from_raw(raw: &str) -> Self {
        let mut lines = raw.lines();
        let first = lines.next().unwrap_or("").trim();
        match header_title(first) {
            Some(title) => {
                let title = title.trim();
                let title = if title.is_empty() { UNTITLED } else { title };
                Section {
                    title: title.to_string(),
                    body: lines.collect::<Vec<_>>().join("\n").trim().to_string(),
                }
            }
            None => Section {
                title: UNTITLED.to_string(),
                body: raw.trim().to_string(),
            },
        }
    }

    /// The section written back as markup, header first.
    pub fn to_markup(&self) -> String {
        if self.body.is_empty() {
            format!("[{}]", self.title)
        } else {
            format!("[{}]\n{}", self.title, self.body)
        }
    }
}

/// Inner text of a header line, if the whole line is `[...]`
pub(crate) fn header_title(line: &str) -> Option<&str> {
    if line.len() >= 2 && line.starts_with('[') && line.ends_with(']') {
        Some(&line[1..line.len() - 1])
    } else {
        None
    }
}

/// Split a chart body into raw section texts, in source order.
///
/// Each raw section keeps its header line and any blank lines inside it.
pub fn segment(body: &str) -> Vec<String> {
    if body.is_empty() {
        return Vec::new();
    }

    let mut sections = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    let flush = |current: &mut Vec<&str>, sections: &mut Vec<String>| {
        let text = current.join("\n");
        let text = text.trim();
        if !text.is_empty() {
            sections.push(text.to_string());
        }
        current.clear();
    };

    for raw in body.lines() {
        let line = raw.trim();

        if line == "." {
            flush(&mut current, &mut sections);
            continue;
        }

        if let Some(title) = header_title(line) {
            flush(&mut current, &mut sections);
            if !title.trim().is_empty() {
                current.push(line);
            }
            continue;
        }

        current.push(raw);
    }
    flush(&mut current, &mut sections);

    if sections.is_empty() {
        sections.push(body.trim().to_string());
    }
    sections
}

/// Segment a chart body into titled sections.
pub fn sections(body: &str) -> Vec<Section> {
    segment(body).iter().map(|raw| Section::from_raw(raw)).collect()
}

/// Write sections back as one chart body, separated by blank lines.
pub fn join_sections(sections: &[Section]) -> String {
    sections
        .iter()
        .map(Section::to_markup)
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// A chord line with the lyric line under it.
///
/// Lines without chords become pairs with no chords; chord lines with no
/// lyric under them become pairs with an empty lyric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChordLyricPair {
    pub chords: Vec<String>,
    pub lyric: String,
}

fn line_chords(line: &str) -> Vec<&str> {
    Lexer::new(line)
        .filter_map(|token| match token {
            Token::Chord(chord) if !chord.is_empty() => Some(chord.trim()),
            _ => None,
        })
        .collect()
}

/// Group the lines of a section body into chord-over-lyric pairs. Blank lines are skipped.
pub fn pair_lines(body: &str) -> Vec<ChordLyricPair> {
    let lines: Vec<&str> = body.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
    let mut pairs = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let chords = line_chords(lines[i]);
        if chords.is_empty() {
            pairs.push(ChordLyricPair {
                chords: Vec::new(),
                lyric: lines[i].to_string(),
            });
        } else {
            let lyric = match lines.get(i + 1) {
                Some(next) if line_chords(next).is_empty() => {
                    i += 1;
                    next.to_string()
                }
                _ => String::new(),
            };
            pairs.push(ChordLyricPair {
                chords: chords.into_iter().map(str::to_string).collect(),
                lyric,
            });
        }
        i += 1;
    }
    pairs
}

/// Display badge for a section label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionBadge {
    pub key: String,
    pub color: &'static str,
    pub label: String,
}

/// Color of badges for labels outside the taxonomy.
pub const GENERIC_COLOR: &str = "#9e9e9e";

struct SectionKind {
    pattern: Regex,
    key: &'static str,
    color: &'static str,
}

static SECTION_KINDS: Lazy<Vec<SectionKind>> = Lazy::new(|| {
    let kind = |pattern: &str, key, color| SectionKind {
        pattern: Regex::new(pattern).expect("section pattern is valid"),
        key,
        color,
    };
    vec![
        kind(r"(?i)^v(?:erse|erso)?\s*1$", "V1", "#8A2BE2"),
        kind(r"(?i)^v(?:erse|erso)?\s*2$", "V2", "#8A2BE2"),
        kind(r"(?i)^v(?:erse|erso)?\s*3$", "V3", "#8A2BE2"),
        kind(r"(?i)^(?:chorus|coro)$", "C", "#FF7F50"),
        kind(r"(?i)^(?:pre-?chorus|pre-?coro)$", "PC", "#FFB347"),
        kind(r"(?i)^(?:bridge|puente)$", "B", "#1E90FF"),
        kind(r"(?i)^instrumental$", "I", "#00BFFF"),
        kind(r"(?i)^intro$", "Intro", "#FF6347"),
        kind(r"(?i)^(?:outro|final)$", "Outro", "#800000"),
    ]
});

/// Classify a section label (with or without its brackets).
///
/// ```
/// use chartbook::detect_section;
///
/// assert_eq!(detect_section("[Verse 2]").key, "V2");
/// assert_eq!(detect_section("CORO").key, "C");
/// assert_eq!(detect_section("Tag").key, "Tag");
/// assert_eq!(detect_section("").label, "Section");
/// ```
pub fn detect_section(label: &str) -> SectionBadge {
    let clean = label.trim();
    let clean = clean.strip_prefix('[').unwrap_or(clean);
    let clean = clean.strip_suffix(']').unwrap_or(clean).trim();

    for kind in SECTION_KINDS.iter() {
        if kind.pattern.is_match(clean) {
            return SectionBadge {
                key: kind.key.to_string(),
                color: kind.color,
                label: clean.to_string(),
            };
        }
    }

    let (key, label) = if clean.is_empty() { ("S", "Section") } else { (clean, clean) };
    SectionBadge {
        key: key.to_string(),
        color: GENERIC_COLOR,
        label: label.to_string(),
    }
}

/// One card of the section overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionOverview {
    pub badge: SectionBadge,
    pub pairs: Vec<ChordLyricPair>,
}

/// Build the section overview of a chart body.
///
/// Chords are transposed by `transpose_offset`. The display mode empties the
/// chords or lyrics of each pair; pairs left with neither are dropped.
pub fn overview(body: &str, transpose_offset: i32, display: DisplayMode) -> Vec<SectionOverview> {
    sections(body)
        .into_iter()
        .map(|section| {
            let pairs = pair_lines(&section.body)
                .into_iter()
                .map(|pair| ChordLyricPair {
                    chords: if display.shows_chords() {
                        pair.chords
                            .iter()
                            .map(|chord| transpose_chord(chord, transpose_offset))
                            .collect()
                    } else {
                        Vec::new()
                    },
                    lyric: if display.shows_notes() { pair.lyric } else { String::new() },
                })
                .filter(|pair| !pair.chords.is_empty() || !pair.lyric.is_empty())
                .collect();
            SectionOverview {
                badge: detect_section(&section.title),
                pairs,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_example() {
        let raw = segment("[Coro]\nHello\n{C}{G}\nworld\n.\n[Verse 1]\nfoo");
        assert_eq!(raw, vec!["[Coro]\nHello\n{C}{G}\nworld", "[Verse 1]\nfoo"]);
    }

    #[test]
    fn test_blank_lines_stay_inside_section() {
        let raw = segment("[Verse]\nline one\n\nline two\n\n[Coro]\nla la");
        assert_eq!(raw, vec!["[Verse]\nline one\n\nline two", "[Coro]\nla la"]);
    }

    #[test]
    fn test_dot_separator_without_headers() {
        let found = sections("first\n.\nsecond\n .  \nthird");
        let bodies: Vec<_> = found.iter().map(|s| s.body.as_str()).collect();
        assert_eq!(bodies, vec!["first", "second", "third"]);
        assert!(found.iter().all(|s| s.title == UNTITLED));
    }

    #[test]
    fn test_empty_brackets_terminate() {
        let raw = segment("[Intro]\n{C}\n[ ]\nloose text\n[]\n[Outro]\n{G}");
        assert_eq!(raw, vec!["[Intro]\n{C}", "loose text", "[Outro]\n{G}"]);
    }

    #[test]
    fn test_header_only_section_kept() {
        let found = sections("[Solo]\n[Coro]\nla");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0], Section { title: "Solo".to_string(), body: String::new() });
    }

    #[test]
    fn test_content_before_first_header_is_untitled() {
        let found = sections("Capo 2\n[Verse 1]\nwords");
        assert_eq!(found[0].title, UNTITLED);
        assert_eq!(found[0].body, "Capo 2");
        assert_eq!(found[1].title, "Verse 1");
    }

    #[test]
    fn test_fallback_single_section() {
        assert_eq!(segment(".\n.\n"), vec![".\n."]);
        assert_eq!(segment("[]"), vec!["[]"]);
        assert_eq!(sections("[]")[0].title, UNTITLED);
        assert!(segment("").is_empty());
    }

    #[test]
    fn test_whitespace_body_gives_one_empty_section() {
        assert_eq!(segment("  "), vec![""]);
        assert_eq!(segment("  \n \n"), vec![""]);
        let found = sections(" \n");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, UNTITLED);
        assert_eq!(found[0].body, "");
    }

    #[test]
    fn test_crlf_lines() {
        let raw = segment("[A]\r\nx\r\n.\r\n[B]\r\ny");
        assert_eq!(raw, vec!["[A]\nx", "[B]\ny"]);
    }

    #[test]
    fn test_resegmenting_joined_sections() {
        let body = "intro words\n.\n[Verse 1]\n{C}\nline\n\nmore\n.\nafter dot\n[Coro]\n{G}{D}";
        let first = sections(body);
        let second = sections(&join_sections(&first));
        assert_eq!(first.len(), second.len());
        let titles = |s: &[Section]| s.iter().map(|x| x.title.clone()).collect::<Vec<_>>();
        assert_eq!(titles(&first), titles(&second));
    }

    #[test]
    fn test_pair_lines() {
        let pairs = pair_lines("{C}{G}\nHello world\n\n{Am}\n{F}\nend\nspoken");
        assert_eq!(
            pairs,
            vec![
                ChordLyricPair { chords: vec!["C".into(), "G".into()], lyric: "Hello world".into() },
                ChordLyricPair { chords: vec!["Am".into()], lyric: String::new() },
                ChordLyricPair { chords: vec!["F".into()], lyric: "end".into() },
                ChordLyricPair { chords: vec![], lyric: "spoken".into() },
            ]
        );
    }

    #[test]
    fn test_detect_section_taxonomy() {
        assert_eq!(detect_section("verse 1").key, "V1");
        assert_eq!(detect_section("Verso3").key, "V3");
        assert_eq!(detect_section("v2").key, "V2");
        assert_eq!(detect_section("Chorus").key, "C");
        assert_eq!(detect_section("Pre-Chorus").key, "PC");
        assert_eq!(detect_section("precoro").key, "PC");
        assert_eq!(detect_section("Puente").key, "B");
        assert_eq!(detect_section("instrumental").key, "I");
        assert_eq!(detect_section("INTRO").key, "Intro");
        assert_eq!(detect_section("Final").key, "Outro");
        assert_eq!(detect_section("Chorus").color, "#FF7F50");
    }

    #[test]
    fn test_detect_section_generic() {
        let badge = detect_section(" [Solo guitarra] ");
        assert_eq!(badge.key, "Solo guitarra");
        assert_eq!(badge.label, "Solo guitarra");
        assert_eq!(badge.color, GENERIC_COLOR);
        assert_eq!(detect_section("verse 4").key, "verse 4");
        let empty = detect_section("[ ]");
        assert_eq!((empty.key.as_str(), empty.label.as_str()), ("S", "Section"));
    }

    #[test]
    fn test_overview_modes() {
        let body = "[Coro]\n{G}\nHello\n{D}";
        let both = overview(body, 2, DisplayMode::Both);
        assert_eq!(both.len(), 1);
        assert_eq!(both[0].badge.key, "C");
        assert_eq!(both[0].pairs[0].chords, vec!["A"]);
        assert_eq!(both[0].pairs[0].lyric, "Hello");
        assert_eq!(both[0].pairs[1].chords, vec!["E"]);

        let notes = overview(body, 2, DisplayMode::Notes);
        assert_eq!(notes[0].pairs.len(), 1);
        assert!(notes[0].pairs[0].chords.is_empty());

        let chords = overview(body, 0, DisplayMode::Chords);
        assert_eq!(chords[0].pairs.len(), 2);
        assert!(chords[0].pairs.iter().all(|p| p.lyric.is_empty()));
    }
}
