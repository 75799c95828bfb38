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

//! Escape sequences of `$'...'` strings.
//!
//! This subparser runs on the raw cursor: a backslash-newline inside
//! `$'...'` is an (unrecognized) escape sequence, not a line continuation.

use super::word::text_value;
use crate::arena::Handle;
use crate::parser::core::Parser;
use crate::parser::core::Result;
use crate::parser::error::Error;
use crate::parser::error::SyntaxError;
use crate::source::Cursor;
use crate::source::InputCursor;
use crate::source::Location;
use crate::syntax::QuoteKind;
use crate::syntax::WordPart;
use crate::syntax::WordPartKind;

/// Escape selectors that decode to one fixed byte, sorted by selector.
const SIMPLE_ESCAPES: [(u8, u8); 13] = [
    (b'"', b'"'),
    (b'\'', b'\''),
    (b'?', b'?'),
    (b'E', 0x1B),
    (b'\\', b'\\'),
    (b'a', 0x07),
    (b'b', 0x08),
    (b'e', 0x1B),
    (b'f', 0x0C),
    (b'n', b'\n'),
    (b'r', b'\r'),
    (b't', b'\t'),
    (b'v', 0x0B),
];

impl Parser<'_> {
    /// Parses one `\...` escape sequence inside `$'...'` into word parts.
    ///
    /// The cursor must rest on the backslash. Unrecognized selectors keep the
    /// backslash and the selector as literal text, the way bash keeps them.
    /// Two bash parse flaws around the byte `0x01` are reproduced when the
    /// dialect's `duplicate_dollar_single_quote_string_bash_parsing_flaws`
    /// switch is on.
    pub(super) fn parse_dollar_single_escape(
        &self,
        raw: &mut Cursor,
        parts: &mut Vec<Handle<WordPart>>,
        opening: &Location,
    ) -> Result<()> {
        const QUOTE: QuoteKind = QuoteKind::EscapeInterpretingSingleQuote;
        let flaws = raw
            .input()
            .dialect()
            .duplicate_dollar_single_quote_string_bash_parsing_flaws;
        let start = raw.index();
        debug_assert_eq!(raw.peek(), Some(b'\\'));
        raw.consume();

        let Some(selector) = raw.peek() else {
            return Err(Error::syntax(
                SyntaxError::UnclosedDollarSingleQuote,
                opening.clone(),
            ));
        };

        if let Ok(found) = SIMPLE_ESCAPES.binary_search_by_key(&selector, |&(key, _)| key) {
            raw.consume();
            let input = raw.input().clone();
            self.alloc_part(
                parts,
                QUOTE,
                start..raw.index(),
                WordPartKind::SimpleEscape(SIMPLE_ESCAPES[found].1),
                &input,
            );
            return Ok(());
        }

        match selector {
            // Bash duplicates its internal escape byte on output.
            0x01 => {
                raw.consume();
                let kind = if flaws {
                    WordPartKind::BashBugEscape(vec![0x01, 0x01])
                } else {
                    WordPartKind::SimpleEscape(0x01)
                };
                let input = raw.input().clone();
                self.alloc_part(parts, QUOTE, start..raw.index(), kind, &input);
                Ok(())
            }

            b'x' => {
                raw.consume();
                match self.hex_digits(raw, 2) {
                    None => {
                        let input = raw.input().clone();
                        self.alloc_part(
                            parts,
                            QUOTE,
                            start..raw.index(),
                            WordPartKind::Text("\\x".to_string()),
                            &input,
                        );
                    }
                    Some(value) => {
                        let input = raw.input().clone();
                        self.alloc_part(
                            parts,
                            QUOTE,
                            start..raw.index(),
                            WordPartKind::HexEscape(value as u8),
                            &input,
                        );
                    }
                }
                Ok(())
            }

            b'0'..=b'7' => {
                let mut value = 0u32;
                let mut count = 0;
                while count < 3 {
                    match self.parse_digit(raw, 8) {
                        Ok(digit) => {
                            value = value * 8 + digit;
                            count += 1;
                        }
                        Err(_) => break,
                    }
                }
                let input = raw.input().clone();
                self.alloc_part(
                    parts,
                    QUOTE,
                    start..raw.index(),
                    WordPartKind::OctalEscape((value & 0xFF) as u8),
                    &input,
                );
                Ok(())
            }

            b'u' => self.unicode_escape(raw, parts, start, 4),
            b'U' => self.unicode_escape(raw, parts, start, 8),

            b'c' => self.control_escape(raw, parts, start, flaws),

            _ => {
                raw.consume();
                let input = raw.input().clone();
                self.alloc_part(
                    parts,
                    QUOTE,
                    start..raw.index(),
                    WordPartKind::Text(text_value(vec![b'\\', selector])),
                    &input,
                );
                Ok(())
            }
        }
    }

    /// Consumes up to `max` hexadecimal digits; `None` if there is none.
    fn hex_digits(&self, raw: &mut Cursor, max: usize) -> Option<u32> {
        let mut value = 0u32;
        let mut count = 0;
        while count < max {
            match self.parse_digit(raw, 16) {
                Ok(digit) => {
                    value = value << 4 | digit;
                    count += 1;
                }
                Err(_) => break,
            }
        }
        (count > 0).then_some(value)
    }

    /// Parses the digits of a `\u` or `\U` escape, the selector already
    /// peeked.
    fn unicode_escape(
        &self,
        raw: &mut Cursor,
        parts: &mut Vec<Handle<WordPart>>,
        start: usize,
        max_digits: usize,
    ) -> Result<()> {
        let selector = raw.peek();
        raw.consume();
        match self.hex_digits(raw, max_digits) {
            None => {
                let text = if selector == Some(b'U') { "\\U" } else { "\\u" };
                let input = raw.input().clone();
                self.alloc_part(
                    parts,
                    QuoteKind::EscapeInterpretingSingleQuote,
                    start..raw.index(),
                    WordPartKind::Text(text.to_string()),
                    &input,
                );
                Ok(())
            }
            Some(value) => match char::from_u32(value) {
                Some(c) => {
                    let input = raw.input().clone();
                    self.alloc_part(
                        parts,
                        QuoteKind::EscapeInterpretingSingleQuote,
                        start..raw.index(),
                        WordPartKind::UnicodeEscape(c),
                        &input,
                    );
                    Ok(())
                }
                None => Err(Error::syntax(
                    SyntaxError::InvalidUnicodeEscape,
                    raw.input().location(start),
                )),
            },
        }
    }

    /// Parses a `\c...` control escape, the `c` already peeked.
    fn control_escape(
        &self,
        raw: &mut Cursor,
        parts: &mut Vec<Handle<WordPart>>,
        start: usize,
        flaws: bool,
    ) -> Result<()> {
        const QUOTE: QuoteKind = QuoteKind::EscapeInterpretingSingleQuote;
        raw.consume();
        let input = raw.input().clone();
        match raw.peek() {
            // `\c` with nothing to control stays literal text.
            None | Some(b'\'') => {
                self.alloc_part(
                    parts,
                    QUOTE,
                    start..raw.index(),
                    WordPartKind::Text("\\c".to_string()),
                    &input,
                );
                Ok(())
            }
            Some(0x01) => {
                raw.consume();
                let kind = if flaws {
                    WordPartKind::BashBugEscape(vec![0x01, 0x01])
                } else {
                    WordPartKind::Text(text_value(vec![b'\\', b'c', 0x01]))
                };
                self.alloc_part(parts, QUOTE, start..raw.index(), kind, &input);
                Ok(())
            }
            Some(b'\\') => {
                let mut probe = raw.clone();
                probe.consume();
                if probe.peek() == Some(b'\\') {
                    probe.consume();
                    if flaws {
                        // Control-backslash, written `\c\\`.
                        *raw = probe;
                        self.alloc_part(
                            parts,
                            QUOTE,
                            start..raw.index(),
                            WordPartKind::SimpleEscape(0x1C),
                            &input,
                        );
                    } else {
                        let middle = raw.index();
                        self.alloc_part(
                            parts,
                            QUOTE,
                            start..middle,
                            WordPartKind::Text("\\c".to_string()),
                            &input,
                        );
                        *raw = probe;
                        self.alloc_part(
                            parts,
                            QUOTE,
                            middle..raw.index(),
                            WordPartKind::Text("\\\\".to_string()),
                            &input,
                        );
                    }
                } else {
                    // A lone backslash after `\c`; leave it for the next
                    // escape parse.
                    self.alloc_part(
                        parts,
                        QUOTE,
                        start..raw.index(),
                        WordPartKind::Text("\\c".to_string()),
                        &input,
                    );
                }
                Ok(())
            }
            Some(byte) if byte.is_ascii() => {
                raw.consume();
                self.alloc_part(
                    parts,
                    QUOTE,
                    start..raw.index(),
                    WordPartKind::SimpleEscape(byte & 0x1F),
                    &input,
                );
                Ok(())
            }
            Some(_) => {
                self.alloc_part(
                    parts,
                    QUOTE,
                    start..raw.index(),
                    WordPartKind::Text("\\c".to_string()),
                    &input,
                );
                Ok(())
            }
        }
    }
}
