//! Chart markup tokenizer
//!
//! Splits a chart body into delimited groups and the plain text between them:
//!
//! | Markup    | Token                    |
//! |-----------|--------------------------|
//! | `{Am7}`   | [`Token::Chord`]         |
//! | `(x2)`    | [`Token::Annotation`]    |
//! | `[Coro]`  | [`Token::SectionTitle`]  |
//! | other     | [`Token::Text`]          |
//!
//! Groups never span a newline and close at the first matching delimiter.
//! Text runs keep their newlines; the tokenizer is lossless, so the markup of
//! every token concatenated gives back the input.

use once_cell::sync::Lazy;
use regex::{Matches, Regex};

static GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{.*?\}|\(.*?\)|\[.*?\]").expect("group pattern is valid"));

/// Token types for chart markup. Delimited tokens hold the text between the delimiters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token<'a> {
    Chord(&'a str),
    Annotation(&'a str),
    SectionTitle(&'a str),
    Text(&'a str),
}

impl<'a> Token<'a> {
    fn from_group(group: &'a str) -> Self {
        let inner = &group[1..group.len() - 1];
        match group.as_bytes()[0] {
            b'{' => Token::Chord(inner),
            b'(' => Token::Annotation(inner),
            _ => Token::SectionTitle(inner),
        }
    }

    /// The token written back as markup.
    pub fn to_markup(&self) -> String {
        match self {
            Token::Chord(s) => format!("{{{}}}", s),
            Token::Annotation(s) => format!("({})", s),
            Token::SectionTitle(s) => format!("[{}]", s),
            Token::Text(s) => s.to_string(),
        }
    }

    pub fn is_chord(&self) -> bool {
        matches!(self, Token::Chord(_))
    }
}

/// Lazy tokenizer over a chart body
pub struct Lexer<'a> {
    input: &'a str,
    groups: Matches<'static, 'a>,
    position: usize,
    pending: Option<Token<'a>>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let group_re: &'static Regex = &GROUP_RE;
        Self {
            input,
            groups: group_re.find_iter(input),
            position: 0,
            pending: None,
        }
    }

    /// Collect all remaining tokens.
    pub fn tokenize(self) -> Vec<Token<'a>> {
        self.collect()
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Token<'a>> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }

        match self.groups.next() {
            Some(group) => {
                let token = Token::from_group(group.as_str());
                let before = &self.input[self.position..group.start()];
                self.position = group.end();
                if before.is_empty() {
                    Some(token)
                } else {
                    self.pending = Some(token);
                    Some(Token::Text(before))
                }
            }
            None if self.position < self.input.len() => {
                let rest = &self.input[self.position..];
                self.position = self.input.len();
                Some(Token::Text(rest))
            }
            None => None,
        }
    }
}

/// Tokenize a chart body.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).tokenize()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_tokens() {
        let tokens = tokenize("[Coro]\n{C}Hello (soft) world");
        assert_eq!(
            tokens,
            vec![
                Token::SectionTitle("Coro"),
                Token::Text("\n"),
                Token::Chord("C"),
                Token::Text("Hello "),
                Token::Annotation("soft"),
                Token::Text(" world"),
            ]
        );
    }

    #[test]
    fn test_adjacent_groups_have_no_empty_text() {
        let tokens = tokenize("{C}{G}{Am}");
        assert_eq!(tokens, vec![Token::Chord("C"), Token::Chord("G"), Token::Chord("Am")]);
    }

    #[test]
    fn test_empty_input() {
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_group_does_not_cross_newline() {
        let tokens = tokenize("{C\nG}");
        assert_eq!(tokens, vec![Token::Text("{C\nG}")]);
    }

    #[test]
    fn test_first_opening_delimiter_wins() {
        // the bracket opens first, so the brace inside belongs to the title
        let tokens = tokenize("[A {x}] {y}");
        assert_eq!(
            tokens,
            vec![Token::SectionTitle("A {x}"), Token::Text(" "), Token::Chord("y")]
        );
    }

    #[test]
    fn test_unclosed_delimiters_stay_text() {
        let tokens = tokenize("{C (rit");
        assert_eq!(tokens, vec![Token::Text("{C (rit")]);
    }

    #[test]
    fn test_lossless() {
        let body = "[Verse 1]\n{C}{G/B}\nAmazing grace (x2)\n\n.\n[]\n{ }text";
        let rebuilt: String = Lexer::new(body).map(|t| t.to_markup()).collect();
        assert_eq!(rebuilt, body);
    }

    #[test]
    fn test_lazy_iteration() {
        let mut lexer = Lexer::new("{C}rest of a long line");
        assert_eq!(lexer.next(), Some(Token::Chord("C")));
        assert!(lexer.next().is_some());
        assert_eq!(lexer.next(), None);
    }
}
