//! Lexical tokenizer for callable and class source text.
//!
//! Splits text into whitespace runs, comments, string, template and regular expression
//! literals, numbers, identifiers and punctuators. It doesn't validate anything:
//! every byte of the input belongs to exactly one token, so joining the token
//! texts back together always gives the original input.

use core::iter::FusedIterator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Whitespace,
    LineComment,
    BlockComment,
    String,
    Template,
    Regex,
    Number,
    Identifier,
    Punctuator,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    /// Byte offset of the token in the source text
    pub start: usize,
}

impl Token<'_> {
    #[inline]
    #[must_use]
    pub const fn end(&self) -> usize {
        self.start + self.text.len()
    }

    #[inline]
    #[must_use]
    pub fn is_trivia(&self) -> bool {
        matches!(self.kind, TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment)
    }

    #[inline]
    #[must_use]
    pub fn is_punctuator(&self, punctuator: &str) -> bool {
        self.kind == TokenKind::Punctuator && self.text == punctuator
    }
}

/// Longest first, so the first match is the longest one
const PUNCTUATORS: &[&str] = &[
    ">>>=", "...", "===", "!==", "**=", "<<=", ">>=", ">>>", "&&=", "||=", "??=", "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.",
    "++", "--", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<", ">>", "**",
];

#[inline]
#[must_use]
pub fn tokenize(source: &str) -> Tokens<'_> {
    Tokens {
        source,
        position: 0,
        regex_allowed: true,
    }
}

#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    source: &'a str,
    position: usize,
    /// A `/` here starts a regular expression, not a division
    regex_allowed: bool,
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.source[self.position..];
        let first = rest.chars().next()?;

        let (kind, len) = if first.is_whitespace() {
            (TokenKind::Whitespace, take_while(rest, char::is_whitespace))
        } else if rest.starts_with("//") {
            (TokenKind::LineComment, rest.find(['\n', '\r']).unwrap_or(rest.len()))
        } else if rest.starts_with("/*") {
            (TokenKind::BlockComment, rest[2..].find("*/").map_or(rest.len(), |end| end + 4))
        } else if first == '\'' || first == '"' {
            (TokenKind::String, quoted_len(rest, first))
        } else if first == '`' {
            (TokenKind::Template, quoted_len(rest, first))
        } else if let Some(len) = (first == '/' && self.regex_allowed).then(|| regex_len(rest)).flatten() {
            (TokenKind::Regex, len)
        } else if first.is_ascii_digit() || (first == '.' && rest[1..].starts_with(|ch: char| ch.is_ascii_digit())) {
            (TokenKind::Number, take_while(rest, |ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '.'))
        } else if is_identifier_start(first) {
            (TokenKind::Identifier, take_while(rest, is_identifier_part))
        } else {
            let len = PUNCTUATORS
                .iter()
                .find(|punctuator| rest.starts_with(**punctuator))
                .map_or(first.len_utf8(), |punctuator| punctuator.len());
            (TokenKind::Punctuator, len)
        };

        let token = Token {
            kind,
            text: &rest[..len],
            start: self.position,
        };
        self.position += len;
        if !token.is_trivia() {
            self.regex_allowed = precedes_expression(&token);
        }
        Some(token)
    }
}

impl FusedIterator for Tokens<'_> {}

/// Whether an expression, so a regular expression, may follow the token
fn precedes_expression(token: &Token<'_>) -> bool {
    match token.kind {
        TokenKind::Punctuator => !matches!(token.text, ")" | "]" | "}" | "++" | "--"),
        TokenKind::Identifier => matches!(
            token.text,
            "return" | "typeof" | "instanceof" | "in" | "of" | "new" | "delete" | "void" | "case" | "do" | "else" | "yield" | "await"
        ),
        _ => false,
    }
}

#[inline]
fn is_identifier_start(ch: char) -> bool {
    ch.is_alphabetic() || ch == '_' || ch == '$'
}

#[inline]
fn is_identifier_part(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_' || ch == '$'
}

fn take_while(text: &str, predicate: impl Fn(char) -> bool) -> usize {
    text.char_indices()
        .find(|(_, ch)| !predicate(*ch))
        .map_or(text.len(), |(index, _)| index)
}

/// Length of a literal opened by `quote`, including both quotes.
/// An unterminated literal runs to the end of the text.
fn quoted_len(text: &str, quote: char) -> usize {
    let mut chars = text.char_indices().skip(1);
    while let Some((index, ch)) = chars.next() {
        if ch == '\\' {
            chars.next();
        } else if ch == quote {
            return index + ch.len_utf8();
        }
    }
    text.len()
}

/// Length of a regular expression literal with its flags.
/// `None` if the literal isn't closed on its line, the `/` is a punctuator then.
fn regex_len(text: &str) -> Option<usize> {
    let mut chars = text.char_indices().skip(1);
    let mut in_class = false;
    while let Some((index, ch)) = chars.next() {
        match ch {
            '\\' => match chars.next() {
                Some((_, '\n' | '\r')) | None => return None,
                Some(_) => {}
            },
            '\n' | '\r' => return None,
            '[' => in_class = true,
            ']' => in_class = false,
            '/' if !in_class => {
                let end = index + 1;
                return Some(end + take_while(&text[end..], is_identifier_part));
            }
            _ => {}
        }
    }
    None
}
