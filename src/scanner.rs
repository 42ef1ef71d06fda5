use alloc::string::String;

use crate::tokenizer::{tokenize, TokenKind};

/// Removes line and block comments from source text.
///
/// String, template and regular expression literals are copied verbatim with their escapes,
/// so comment markers inside them are kept.
/// A line comment is dropped up to its line break, the line break itself is kept.
/// A block comment is replaced with a single space to keep the tokens around it apart.
/// Unterminated literals and comments run to the end of the text.
#[must_use]
pub fn strip_comments(source: &str) -> String {
    let mut result = String::with_capacity(source.len());

    for token in tokenize(source) {
        match token.kind {
            TokenKind::LineComment => {}
            TokenKind::BlockComment => result.push(' '),
            _ => result.push_str(token.text),
        }
    }

    result
}
