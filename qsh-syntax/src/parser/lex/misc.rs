// This file is part of qsh, an extended POSIX shell.
// Copyright (C) 2026 The qsh developers
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Character classes, blanks, newlines, and comments.

use crate::arena::Handle;
use crate::dialect::Dialect;
use crate::parser::core::Parser;
use crate::parser::core::Result;
use crate::parser::error::Error;
use crate::parser::error::SyntaxError;
use crate::source::InputCursor;
use crate::source::Span;
use crate::source::SplicedCursor;
use crate::syntax::Blank;
use crate::syntax::BlankOrEmpty;
use crate::syntax::Comment;

/// Tests if the byte is a blank (space or tab).
#[must_use]
pub fn is_blank(byte: u8) -> bool {
    byte == b' ' || byte == b'\t'
}

/// Tests if the byte is one of the punctuation metacharacters
/// `| & ; ( ) < >`.
#[must_use]
pub fn is_punct_metacharacter(byte: u8) -> bool {
    matches!(byte, b'|' | b'&' | b';' | b'(' | b')' | b'<' | b'>')
}

/// Tests if the byte can start a name (`[A-Za-z_]`).
#[must_use]
pub fn is_name_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == b'_'
}

/// Tests if the byte can continue a name (`[A-Za-z0-9_]`).
#[must_use]
pub fn is_name_continue(byte: u8) -> bool {
    is_name_start(byte) || byte.is_ascii_digit()
}

/// Tests if the byte is a metacharacter: punctuation, blank, or the start of
/// a newline sequence of the dialect.
pub(crate) fn is_metacharacter(dialect: &Dialect, byte: u8) -> bool {
    is_punct_metacharacter(byte)
        || is_blank(byte)
        || dialect.is_newline(byte)
        || dialect.is_newline_start(byte)
}

/// Tests if the byte can start a simple (structure-free) word run.
pub(crate) fn is_simple_word_start(dialect: &Dialect, byte: u8) -> bool {
    !is_metacharacter(dialect, byte)
        && !matches!(byte, b'"' | b'\'' | b'!' | b'$' | b'`' | b'\\' | b'#')
}

/// Tests if the byte can continue a simple word run; `#` is admitted here.
pub(crate) fn is_simple_word_continue(dialect: &Dialect, byte: u8) -> bool {
    is_simple_word_start(dialect, byte) || byte == b'#'
}

/// Tests if the byte can start a word. A backquote can only when the word is
/// not being parsed inside a backquote substitution.
pub(crate) fn is_word_start(dialect: &Dialect, byte: u8, in_backquote: bool) -> bool {
    is_simple_word_start(dialect, byte)
        || matches!(byte, b'"' | b'\'' | b'$' | b'!' | b'\\')
        || (byte == b'`' && !in_backquote)
}

impl Parser<'_> {
    /// Parses one blank character.
    pub fn parse_blank<C: InputCursor>(&self, at: &mut C) -> Result<u8> {
        match at.peek() {
            Some(byte) if is_blank(byte) => {
                at.consume();
                Ok(byte)
            }
            _ => Err(Error::syntax(SyntaxError::MissingBlank, at.location())),
        }
    }

    /// Parses one newline sequence of the current dialect.
    ///
    /// A CRLF newline consumes two bytes; CR and LF each consume one. The
    /// returned span covers exactly the consumed bytes.
    pub fn parse_newline<C: InputCursor>(&self, at: &mut C) -> Result<Span> {
        let dialect = at.input().dialect();
        let start = at.index();
        match at.peek() {
            Some(b'\r') if dialect.allow_crlf_as_newline => {
                let mut probe = at.clone();
                probe.consume();
                if probe.peek() == Some(b'\n') {
                    probe.consume();
                    let end = probe.index();
                    let span = probe.input().span(start..end);
                    *at = probe;
                    return Ok(span);
                }
                if dialect.allow_cr_as_newline {
                    *at = probe;
                    return Ok(at.input().span(start..start + 1));
                }
                Err(Error::syntax(SyntaxError::MissingNewline, at.location()))
            }
            Some(byte) if dialect.is_newline(byte) => {
                at.consume();
                Ok(at.input().span(start..start + 1))
            }
            _ => Err(Error::syntax(SyntaxError::MissingNewline, at.location())),
        }
    }

    /// Parses one metacharacter: `| & ; ( ) < >`, a newline, or a blank.
    ///
    /// Returns the first byte of what was consumed.
    pub fn parse_metacharacter<C: InputCursor>(&self, at: &mut C) -> Result<u8> {
        match at.peek() {
            Some(byte) if is_punct_metacharacter(byte) || is_blank(byte) => {
                at.consume();
                Ok(byte)
            }
            Some(byte) => {
                let mut probe = at.clone();
                if self.parse_newline(&mut probe).is_ok() {
                    *at = probe;
                    Ok(byte)
                } else {
                    Err(Error::syntax(
                        SyntaxError::MissingMetacharacter,
                        at.location(),
                    ))
                }
            }
            None => Err(Error::syntax(
                SyntaxError::MissingMetacharacter,
                at.location(),
            )),
        }
    }

    /// Like [`parse_metacharacter`](Self::parse_metacharacter), but also
    /// matches an end of input, which occupies one position and yields
    /// `None`.
    pub fn parse_metacharacter_or_eof<C: InputCursor>(&self, at: &mut C) -> Result<Option<u8>> {
        if at.peek().is_none() {
            at.consume();
            return Ok(None);
        }
        self.parse_metacharacter(at).map(Some)
    }

    /// Parses one name start character (`[A-Za-z_]`).
    pub fn parse_name_start_character<C: InputCursor>(&self, at: &mut C) -> Result<u8> {
        at.consume_if(is_name_start)
            .ok_or_else(|| Error::syntax(SyntaxError::MissingNameCharacter, at.location()))
    }

    /// Parses one name continuation character (`[A-Za-z0-9_]`).
    pub fn parse_name_continue_character<C: InputCursor>(&self, at: &mut C) -> Result<u8> {
        at.consume_if(is_name_continue)
            .ok_or_else(|| Error::syntax(SyntaxError::MissingNameCharacter, at.location()))
    }

    /// Parses one character that can start a simple word run.
    pub fn parse_simple_word_start_character<C: InputCursor>(&self, at: &mut C) -> Result<u8> {
        let dialect = at.input().dialect();
        at.consume_if(|byte| is_simple_word_start(&dialect, byte))
            .ok_or_else(|| Error::syntax(SyntaxError::MissingWordCharacter, at.location()))
    }

    /// Parses one character that can continue a simple word run.
    pub fn parse_simple_word_continue_character<C: InputCursor>(&self, at: &mut C) -> Result<u8> {
        let dialect = at.input().dialect();
        at.consume_if(|byte| is_simple_word_continue(&dialect, byte))
            .ok_or_else(|| Error::syntax(SyntaxError::MissingWordCharacter, at.location()))
    }

    /// Parses one character that can start a word.
    pub fn parse_word_start_character<C: InputCursor>(
        &self,
        at: &mut C,
        in_backquote: bool,
    ) -> Result<u8> {
        let dialect = at.input().dialect();
        at.consume_if(|byte| is_word_start(&dialect, byte, in_backquote))
            .ok_or_else(|| Error::syntax(SyntaxError::MissingWordCharacter, at.location()))
    }

    /// Parses a non-empty run of blanks.
    pub fn parse_blanks(&self, at: &mut SplicedCursor) -> Result<Handle<Blank>> {
        let start = at.index();
        self.parse_blank(at)?;
        while self.parse_blank(at).is_ok() {}
        let end = at.index();
        let span = at.input().span(start..end);
        Ok(self.arena().alloc(Blank { span }))
    }

    /// Parses a possibly empty run of blanks.
    pub fn parse_blank_or_empty(&self, at: &mut SplicedCursor) -> Handle<BlankOrEmpty> {
        let start = at.index();
        while self.parse_blank(at).is_ok() {}
        let end = at.index();
        let span = at.input().span(start..end);
        self.arena().alloc(BlankOrEmpty { span })
    }

    /// Parses a `#` comment up to, but not including, the next newline or the
    /// end of input.
    ///
    /// Line continuations are not recognized inside a comment. Inside a
    /// backquote substitution a backquote terminates the comment, or is an
    /// error when the dialect says so.
    pub fn parse_comment(
        &self,
        at: &mut SplicedCursor,
        backquote_nest_level: u32,
    ) -> Result<Handle<Comment>> {
        let start = at.index();
        if at.consume_if(|byte| byte == b'#').is_none() {
            return Err(Error::syntax(SyntaxError::MissingComment, at.location()));
        }

        let dialect = at.input().dialect();
        let raw = at.raw_mut();
        loop {
            match raw.peek() {
                None => break,
                Some(byte) if dialect.is_newline(byte) || dialect.is_newline_start(byte) => break,
                Some(b'`') if backquote_nest_level >= 1 => {
                    if dialect.error_on_backquote_ending_comment {
                        return Err(Error::syntax(
                            SyntaxError::BackquoteEndsComment,
                            raw.location(),
                        ));
                    }
                    break;
                }
                Some(_) => raw.consume(),
            }
        }

        let end = raw.index();
        let span = raw.input().span(start..end);
        Ok(self.arena().alloc(Comment { span }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::input::memory_input;
    use crate::parser::error::ErrorCause;

    fn parser_at<'a>(
        arena: &'a Arena,
        dialect: Dialect,
        source: &str,
    ) -> (Parser<'a>, SplicedCursor) {
        let input = memory_input("test", dialect, source.as_bytes().to_vec());
        let parser = Parser::new(input, arena);
        let cursor = parser.cursor();
        (parser, cursor)
    }

    #[test]
    fn character_classes() {
        let d = Dialect::POSIX;
        assert!(is_blank(b' '));
        assert!(is_blank(b'\t'));
        assert!(!is_blank(b'\n'));
        for byte in *b"|&;()<>" {
            assert!(is_punct_metacharacter(byte));
            assert!(is_metacharacter(&d, byte));
            assert!(!is_simple_word_start(&d, byte));
        }
        assert!(is_metacharacter(&d, b'\n'));
        assert!(!is_metacharacter(&d, b'\r'));
        assert!(is_metacharacter(&Dialect::QSH, b'\r'));
        assert!(is_name_start(b'_'));
        assert!(is_name_start(b'A'));
        assert!(!is_name_start(b'1'));
        assert!(is_name_continue(b'1'));
        for byte in *b"\"'!$`\\#" {
            assert!(!is_simple_word_start(&d, byte), "byte {byte}");
        }
        assert!(is_simple_word_continue(&d, b'#'));
        assert!(!is_simple_word_continue(&d, b'!'));
        assert!(is_word_start(&d, b'!', false));
        assert!(is_word_start(&d, b'`', false));
        assert!(!is_word_start(&d, b'`', true));
        assert!(!is_word_start(&d, b'#', false));
    }

    #[test]
    fn character_primitives_consume_on_match_only() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "_a1 ");
        assert_eq!(parser.parse_name_start_character(&mut at), Ok(b'_'));
        assert_eq!(parser.parse_name_start_character(&mut at), Ok(b'a'));
        let error = parser.parse_name_start_character(&mut at).unwrap_err();
        assert_eq!(
            error.cause,
            ErrorCause::Syntax(SyntaxError::MissingNameCharacter)
        );
        assert_eq!(parser.parse_name_continue_character(&mut at), Ok(b'1'));
        assert!(parser.parse_simple_word_start_character(&mut at).is_err());
        assert_eq!(at.index(), 3);

        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "w\"");
        assert_eq!(parser.parse_simple_word_start_character(&mut at), Ok(b'w'));
        assert!(parser.parse_simple_word_start_character(&mut at).is_err());
        assert_eq!(parser.parse_word_start_character(&mut at, false), Ok(b'"'));

        // A backquote starts a word only outside a backquote substitution.
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "`");
        assert!(parser.parse_word_start_character(&mut at, true).is_err());
        assert_eq!(parser.parse_word_start_character(&mut at, false), Ok(b'`'));
    }

    #[test]
    fn parse_blank_consumes_space_or_tab() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, " \tx");
        assert_eq!(parser.parse_blank(&mut at), Ok(b' '));
        assert_eq!(parser.parse_blank(&mut at), Ok(b'\t'));
        let error = parser.parse_blank(&mut at).unwrap_err();
        assert_eq!(error.cause, ErrorCause::Syntax(SyntaxError::MissingBlank));
        assert_eq!(error.location.index, 2);
    }

    #[test]
    fn parse_newline_by_dialect() {
        let arena = Arena::new();

        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "\n");
        assert_eq!(parser.parse_newline(&mut at).unwrap().range, 0..1);

        // CRLF is one newline of two bytes under QSH.
        let (parser, mut at) = parser_at(&arena, Dialect::QSH, "\r\nx");
        assert_eq!(parser.parse_newline(&mut at).unwrap().range, 0..2);
        assert_eq!(at.index(), 2);

        // A lone CR is not a newline under QSH.
        let (parser, mut at) = parser_at(&arena, Dialect::QSH, "\rx");
        let error = parser.parse_newline(&mut at).unwrap_err();
        assert_eq!(error.cause, ErrorCause::Syntax(SyntaxError::MissingNewline));
        assert_eq!(at.index(), 0);

        let cr_dialect = Dialect {
            allow_cr_as_newline: true,
            ..Dialect::POSIX
        };
        let (parser, mut at) = parser_at(&arena, cr_dialect, "\rx");
        assert_eq!(parser.parse_newline(&mut at).unwrap().range, 0..1);
    }

    #[test]
    fn parse_metacharacter_matches_the_class() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "| \nx");
        assert_eq!(parser.parse_metacharacter(&mut at), Ok(b'|'));
        assert_eq!(parser.parse_metacharacter(&mut at), Ok(b' '));
        assert_eq!(parser.parse_metacharacter(&mut at), Ok(b'\n'));
        let error = parser.parse_metacharacter(&mut at).unwrap_err();
        assert_eq!(
            error.cause,
            ErrorCause::Syntax(SyntaxError::MissingMetacharacter)
        );
        assert_eq!(at.index(), 3);
    }

    #[test]
    fn parse_metacharacter_or_eof_consumes_one_position() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "");
        assert_eq!(parser.parse_metacharacter_or_eof(&mut at), Ok(None));
        assert_eq!(at.index(), 1);
    }

    #[test]
    fn parse_blanks_requires_at_least_one() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "  \t x");
        let blank = parser.parse_blanks(&mut at).unwrap();
        assert_eq!(blank.span.range, 0..4);

        let error = parser.parse_blanks(&mut at).unwrap_err();
        assert_eq!(error.cause, ErrorCause::Syntax(SyntaxError::MissingBlank));
    }

    #[test]
    fn parse_blanks_skips_line_continuations() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, " \\\n x");
        let blank = parser.parse_blanks(&mut at).unwrap();
        assert_eq!(blank.span.range, 0..4);
        assert_eq!(at.peek(), Some(b'x'));
    }

    #[test]
    fn parse_blank_or_empty_accepts_nothing() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "x");
        let blanks = parser.parse_blank_or_empty(&mut at);
        assert_eq!(blanks.span.range, 0..0);
        assert_eq!(at.index(), 0);
    }

    #[test]
    fn parse_comment_stops_before_the_newline() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "# hello\nrest");
        let comment = parser.parse_comment(&mut at, 0).unwrap();
        assert_eq!(comment.span.range, 0..7);
        assert_eq!(comment.span.raw_text(), "# hello");
        assert_eq!(at.peek(), Some(b'\n'));
    }

    #[test]
    fn parse_comment_does_not_splice_line_continuations() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "#c\\\nd");
        let comment = parser.parse_comment(&mut at, 0).unwrap();
        // The backslash belongs to the comment; the newline ends it.
        assert_eq!(comment.span.raw_text(), "#c\\");
        assert_eq!(at.peek(), Some(b'\n'));
    }

    #[test]
    fn parse_comment_runs_to_end_of_input() {
        let arena = Arena::new();
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "#tail");
        let comment = parser.parse_comment(&mut at, 0).unwrap();
        assert_eq!(comment.span.range, 0..5);
        assert_eq!(at.peek(), None);
    }

    #[test]
    fn comment_ending_backquote_is_dialect_dependent() {
        let arena = Arena::new();

        // Bash lets the backquote terminate the comment.
        let (parser, mut at) = parser_at(&arena, Dialect::BASH, "#c`x");
        let comment = parser.parse_comment(&mut at, 1).unwrap();
        assert_eq!(comment.span.raw_text(), "#c");
        assert_eq!(at.peek(), Some(b'`'));

        // POSIX and the extended dialect report an error.
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "#c`x");
        let error = parser.parse_comment(&mut at, 1).unwrap_err();
        assert_eq!(
            error.cause,
            ErrorCause::Syntax(SyntaxError::BackquoteEndsComment)
        );
        assert_eq!(error.location.index, 2);

        // Outside a backquote substitution the backquote is comment text.
        let (parser, mut at) = parser_at(&arena, Dialect::POSIX, "#c`x");
        let comment = parser.parse_comment(&mut at, 0).unwrap();
        assert_eq!(comment.span.raw_text(), "#c`x");
    }
}
