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

//! Part of the lexer that parses `$'...'` strings.
//!
//! The contents are walked with the raw cursor: a backslash before a newline
//! is an escape sequence here, never a line continuation.

use super::word::text_value;
use crate::arena::Handle;
use crate::parser::core::Parser;
use crate::parser::core::Result;
use crate::parser::error::Error;
use crate::parser::error::SyntaxError;
use crate::source::InputCursor;
use crate::source::SplicedCursor;
use crate::syntax::QuoteKind;
use crate::syntax::WordPart;
use crate::syntax::WordPartKind;

impl Parser<'_> {
    /// Parses a `$'...'` string into quote-start, content, and quote-stop
    /// parts.
    ///
    /// The cursor must rest on the opening `'`; `dollar_index` is the
    /// position of the already consumed `$`, which the quote-start part
    /// covers. The closing quote is its own quote-stop part with the quote
    /// byte inside its span.
    pub(super) fn parse_dollar_single_quote(
        &self,
        cur: &mut SplicedCursor,
        parts: &mut Vec<Handle<WordPart>>,
        dollar_index: usize,
    ) -> Result<()> {
        const QUOTE: QuoteKind = QuoteKind::EscapeInterpretingSingleQuote;
        let opening = cur.input().location(dollar_index);
        debug_assert_eq!(cur.peek(), Some(b'\''));
        cur.consume();
        let content_start = cur.raw_mut().index();
        let input = cur.input().clone();
        self.alloc_part(
            parts,
            QUOTE,
            dollar_index..content_start,
            WordPartKind::QuoteStart,
            &input,
        );

        loop {
            let raw = cur.raw_mut();
            match raw.peek() {
                None => {
                    return Err(Error::syntax(
                        SyntaxError::UnclosedDollarSingleQuote,
                        opening,
                    ))
                }
                Some(b'\'') => {
                    let stop_start = raw.index();
                    raw.consume();
                    let stop_end = cur.index();
                    self.alloc_part(
                        parts,
                        QUOTE,
                        stop_start..stop_end,
                        WordPartKind::QuoteStop,
                        &input,
                    );
                    return Ok(());
                }
                Some(b'\\') => self.parse_dollar_single_escape(cur.raw_mut(), parts, &opening)?,
                Some(_) => {
                    let run_start = raw.index();
                    let mut bytes = Vec::new();
                    while let Some(byte) = raw.peek() {
                        if byte == b'\'' || byte == b'\\' {
                            break;
                        }
                        bytes.push(byte);
                        raw.consume();
                    }
                    let run_end = raw.index();
                    self.alloc_part(
                        parts,
                        QUOTE,
                        run_start..run_end,
                        WordPartKind::Text(text_value(bytes)),
                        &input,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::dialect::Dialect;
    use crate::input::memory_input;
    use crate::parser::error::ErrorCause;
    use crate::parser::lex::WordContext;
    use crate::syntax::Word;

    fn parse_word_in<'a>(arena: &'a Arena, dialect: Dialect, source: &[u8]) -> Result<Handle<Word>> {
        let input = memory_input("test", dialect, source.to_vec());
        let parser = Parser::new(input, arena);
        let mut at = parser.cursor();
        parser.parse_word(&mut at, &WordContext::default())
    }

    fn kinds(word: &Word) -> Vec<WordPartKind> {
        word.parts.iter().map(|part| part.kind.clone()).collect()
    }

    /// Content part kinds, quote delimiters stripped.
    fn content_kinds(word: &Word) -> Vec<WordPartKind> {
        let all = kinds(word);
        assert_eq!(all.first(), Some(&WordPartKind::QuoteStart));
        assert_eq!(all.last(), Some(&WordPartKind::QuoteStop));
        all[1..all.len() - 1].to_vec()
    }

    #[test]
    fn empty_dollar_single_quote() {
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, b"$''").unwrap();
        assert_eq!(kinds(&word), [WordPartKind::QuoteStart, WordPartKind::QuoteStop]);
        assert_eq!(word.parts[0].span.range, 0..2);
        assert_eq!(word.parts[1].span.range, 2..3);
    }

    #[test]
    fn named_escapes() {
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, br#"$'\"\'\\\?\a\b\e\E\f\n\r\t\v'"#).unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::SimpleEscape(b'"'),
                WordPartKind::SimpleEscape(b'\''),
                WordPartKind::SimpleEscape(b'\\'),
                WordPartKind::SimpleEscape(b'?'),
                WordPartKind::SimpleEscape(0x07),
                WordPartKind::SimpleEscape(0x08),
                WordPartKind::SimpleEscape(0x1B),
                WordPartKind::SimpleEscape(0x1B),
                WordPartKind::SimpleEscape(0x0C),
                WordPartKind::SimpleEscape(0x0A),
                WordPartKind::SimpleEscape(0x0D),
                WordPartKind::SimpleEscape(0x09),
                WordPartKind::SimpleEscape(0x0B),
            ]
        );
    }

    #[test]
    fn literal_runs_between_escapes() {
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, br"$'ab\ncd'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::Text("ab".to_string()),
                WordPartKind::SimpleEscape(0x0A),
                WordPartKind::Text("cd".to_string()),
            ]
        );
    }

    #[test]
    fn hex_escapes() {
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\x41\x7fQ\x0'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::HexEscape(0x41),
                WordPartKind::HexEscape(0x7F),
                WordPartKind::Text("Q".to_string()),
                WordPartKind::HexEscape(0x00),
            ]
        );

        // No digit: the backslash and the `x` stay text.
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\xg'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::Text("\\x".to_string()),
                WordPartKind::Text("g".to_string()),
            ]
        );

        // At most two digits are consumed.
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\xd4A'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::HexEscape(0xD4),
                WordPartKind::Text("A".to_string()),
            ]
        );
    }

    #[test]
    fn octal_escapes() {
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\0\07\177\0123'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::OctalEscape(0),
                WordPartKind::OctalEscape(0o7),
                WordPartKind::OctalEscape(0o177),
                WordPartKind::OctalEscape(0o12),
                WordPartKind::Text("3".to_string()),
            ]
        );

        // The low eight bits survive an overlong value.
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\777'").unwrap();
        assert_eq!(content_kinds(&word), [WordPartKind::OctalEscape(0xFF)]);
    }

    #[test]
    fn unicode_escapes() {
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\u41\u4B9d0\U0001F4A9b'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::UnicodeEscape('\u{41}'),
                WordPartKind::UnicodeEscape('\u{4B9D}'),
                WordPartKind::Text("0".to_string()),
                WordPartKind::UnicodeEscape('\u{1F4A9}'),
                WordPartKind::Text("b".to_string()),
            ]
        );

        // No digits: the selector stays text.
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\uz\Uz'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::Text("\\u".to_string()),
                WordPartKind::Text("z".to_string()),
                WordPartKind::Text("\\U".to_string()),
                WordPartKind::Text("z".to_string()),
            ]
        );
    }

    #[test]
    fn invalid_unicode_escape_is_an_error() {
        let arena = Arena::new();
        let error = parse_word_in(&arena, Dialect::BASH, br"$'\uD800'").unwrap_err();
        assert_eq!(
            error.cause,
            ErrorCause::Syntax(SyntaxError::InvalidUnicodeEscape)
        );
    }

    #[test]
    fn control_escapes() {
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\cA\cz\c^\c?'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::SimpleEscape(0x01),
                WordPartKind::SimpleEscape(0x1A),
                WordPartKind::SimpleEscape(0x1E),
                WordPartKind::SimpleEscape(0x1F),
            ]
        );

        // `\c` against the closing quote stays text.
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\c'").unwrap();
        assert_eq!(content_kinds(&word), [WordPartKind::Text("\\c".to_string())]);
    }

    #[test]
    fn control_backslash_under_bug_compatibility() {
        // With the bash flaws reproduced, `\c\\` is control-backslash.
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\c\\'").unwrap();
        assert_eq!(content_kinds(&word), [WordPartKind::SimpleEscape(0x1C)]);
        assert_eq!(word.parts[1].span.range, 2..6);

        // Without them the sequence stays literal text.
        let word = parse_word_in(&arena, Dialect::SECURE_BASH, br"$'\c\\'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::Text("\\c".to_string()),
                WordPartKind::Text("\\\\".to_string()),
            ]
        );
    }

    #[test]
    fn escape_byte_anomaly_under_bug_compatibility() {
        // `\` followed by the byte 0x01: bash emits the byte twice.
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, b"$'\\\x01'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [WordPartKind::BashBugEscape(vec![0x01, 0x01])]
        );

        let word = parse_word_in(&arena, Dialect::SECURE_BASH, b"$'\\\x01'").unwrap();
        assert_eq!(content_kinds(&word), [WordPartKind::SimpleEscape(0x01)]);
    }

    #[test]
    fn control_byte_anomaly_under_bug_compatibility() {
        // `\c` followed by the byte 0x01.
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, b"$'\\c\x01'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [WordPartKind::BashBugEscape(vec![0x01, 0x01])]
        );

        let word = parse_word_in(&arena, Dialect::SECURE_BASH, b"$'\\c\x01'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [WordPartKind::Text(text_value(vec![b'\\', b'c', 0x01]))]
        );
    }

    #[test]
    fn flaw_switch_only_affects_the_documented_anomalies() {
        // Everything except the 0x01 anomalies decodes identically under
        // both settings of the flaw switch.
        let arena = Arena::new();
        let source: &[u8] = br#"$'a\n\x41\0101\u42\cGz\q'"#;
        let with_flaws = parse_word_in(&arena, Dialect::BASH, source).unwrap();
        let without_flaws = parse_word_in(&arena, Dialect::SECURE_BASH, source).unwrap();
        assert_eq!(kinds(&with_flaws), kinds(&without_flaws));
    }

    #[test]
    fn unrecognized_escapes_stay_literal() {
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, br"$'\q\z'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::Text("\\q".to_string()),
                WordPartKind::Text("\\z".to_string()),
            ]
        );
    }

    #[test]
    fn newline_splices_are_not_elided() {
        // A backslash-newline is an unrecognized escape here, not a line
        // continuation.
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, b"$'a\\\nb'").unwrap();
        assert_eq!(
            content_kinds(&word),
            [
                WordPartKind::Text("a".to_string()),
                WordPartKind::Text("\\\n".to_string()),
                WordPartKind::Text("b".to_string()),
            ]
        );
    }

    #[test]
    fn unclosed_dollar_single_quote_reports_the_dollar() {
        let arena = Arena::new();
        let error = parse_word_in(&arena, Dialect::BASH, br"$'abc").unwrap_err();
        assert_eq!(
            error.cause,
            ErrorCause::Syntax(SyntaxError::UnclosedDollarSingleQuote)
        );
        assert_eq!(error.location.index, 0);

        // A trailing backslash is also unclosed.
        let error = parse_word_in(&arena, Dialect::BASH, br"$'a\").unwrap_err();
        assert_eq!(
            error.cause,
            ErrorCause::Syntax(SyntaxError::UnclosedDollarSingleQuote)
        );
    }

    #[test]
    fn part_spans_tile_the_string() {
        let arena = Arena::new();
        let word = parse_word_in(&arena, Dialect::BASH, br"$'ab\x41\ncd\q'").unwrap();
        let mut expected = word.span.range.start;
        for part in &word.parts {
            assert_eq!(part.span.range.start, expected);
            expected = part.span.range.end;
        }
        assert_eq!(expected, word.span.range.end);
    }
}
