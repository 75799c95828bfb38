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

//! Part of the lexer that parses words.
//!
//! A word is parsed into a sequence of [`WordPart`]s whose spans concatenate
//! exactly to the word span. Decoded part values never contain line
//! continuations; the raw text, continuations included, stays reachable
//! through the spans.

use super::keyword::ReservedWord;
use super::misc::is_blank;
use super::misc::is_name_continue;
use super::misc::is_name_start;
use super::misc::is_punct_metacharacter;
use super::misc::is_simple_word_continue;
use super::misc::is_word_start;
use crate::arena::Handle;
use crate::parser::core::Parser;
use crate::parser::core::Result;
use crate::parser::error::Error;
use crate::parser::error::SyntaxError;
use crate::source::InputCursor;
use crate::source::SplicedCursor;
use crate::source::TextInput;
use crate::syntax::QuoteKind;
use crate::syntax::Word;
use crate::syntax::WordPart;
use crate::syntax::WordPartKind;
use std::ops::Range;
use std::rc::Rc;

/// Policy flags for one word parse.
#[derive(Clone, Debug)]
pub struct WordContext {
    /// Depth of backquote command-substitution nesting; a backquote
    /// terminates the word at depth 1 or more.
    pub backquote_nest_level: u32,
    /// Recognize a `name=`, `name+=`, or `name[...]=` prefix and emit
    /// assignment marker parts for it.
    pub check_for_variable_assignment: bool,
    /// Replace a word that is exactly one unquoted text run spelling a
    /// reserved word with a reserved-word part.
    pub check_for_reserved_words: bool,
}

impl Default for WordContext {
    fn default() -> WordContext {
        WordContext {
            backquote_nest_level: 0,
            check_for_variable_assignment: true,
            check_for_reserved_words: true,
        }
    }
}

/// Converts collected word-part bytes into their stored text.
pub(super) fn text_value(bytes: Vec<u8>) -> String {
    String::from_utf8_lossy(&bytes).into_owned()
}

impl Parser<'_> {
    /// Allocates one word part.
    pub(super) fn alloc_part(
        &self,
        parts: &mut Vec<Handle<WordPart>>,
        quote: QuoteKind,
        range: Range<usize>,
        kind: WordPartKind,
        input: &Rc<TextInput>,
    ) {
        parts.push(self.arena().alloc(WordPart {
            quote,
            span: input.span(range),
            kind,
        }));
    }

    /// Parses a word.
    ///
    /// The word ends at an unquoted blank, metacharacter, newline, end of
    /// input, or, inside a backquote substitution, at a backquote. A word
    /// that would have no parts is reported as [`SyntaxError::MissingWord`]
    /// at its starting position, and the cursor is then left unchanged.
    pub fn parse_word(
        &self,
        at: &mut SplicedCursor,
        context: &WordContext,
    ) -> Result<Handle<Word>> {
        let mut cur = at.clone();
        let dialect = cur.input().dialect();
        let in_backquote = context.backquote_nest_level >= 1;
        match cur.peek() {
            Some(byte) if is_word_start(&dialect, byte, in_backquote) => {}
            _ => return Err(Error::syntax(SyntaxError::MissingWord, cur.location())),
        }

        let start = cur.index();
        let mut parts = Vec::new();
        let mut end_override = None;
        if context.check_for_variable_assignment {
            self.parse_assignment_prefix(&mut cur, &mut parts);
        }

        loop {
            let Some(byte) = cur.peek() else { break };
            if is_blank(byte)
                || is_punct_metacharacter(byte)
                || dialect.is_newline(byte)
                || dialect.is_newline_start(byte)
            {
                break;
            }
            match byte {
                b'`' if in_backquote => break,
                b'`' => {
                    return Err(Error::syntax(
                        SyntaxError::UnsupportedBackquote,
                        cur.location(),
                    ))
                }
                b'\'' => self.parse_single_quote(&mut cur, &mut parts)?,
                b'"' => {
                    let quote_start = cur.index();
                    cur.consume();
                    self.parse_double_quote_body(
                        &mut cur,
                        &mut parts,
                        QuoteKind::DoubleQuote,
                        quote_start,
                        context,
                    )?;
                }
                b'$' => self.parse_dollar(&mut cur, &mut parts, context)?,
                b'\\' => {
                    let escape_start = cur.index();
                    cur.consume();
                    match cur.peek() {
                        None => {
                            // `\` at the end of input terminates the word;
                            // the stray backslash belongs to no part.
                            end_override = Some(escape_start);
                            break;
                        }
                        Some(escaped) => {
                            cur.consume();
                            self.alloc_part(
                                &mut parts,
                                QuoteKind::Unquoted,
                                escape_start..cur.index(),
                                WordPartKind::SimpleEscape(escaped),
                                cur.input(),
                            );
                        }
                    }
                }
                b'!' => {
                    let bang_start = cur.index();
                    cur.consume();
                    self.alloc_part(
                        &mut parts,
                        QuoteKind::Unquoted,
                        bang_start..cur.index(),
                        WordPartKind::Text("!".to_string()),
                        cur.input(),
                    );
                }
                _ => self.parse_text_run(&mut cur, &mut parts),
            }
        }

        if parts.is_empty() {
            return Err(Error::syntax(
                SyntaxError::MissingWord,
                cur.input().location(start),
            ));
        }
        if context.check_for_reserved_words {
            self.fold_reserved_word(&mut parts);
        }
        let end = match end_override {
            Some(end) => end,
            None => cur.index(),
        };
        let span = cur.input().span(start..end);
        let word = self.arena().alloc(Word { parts, span });
        *at = cur;
        Ok(word)
    }

    /// Absorbs a maximal run of simple word characters into one text part.
    fn parse_text_run(&self, cur: &mut SplicedCursor, parts: &mut Vec<Handle<WordPart>>) {
        let dialect = cur.input().dialect();
        let start = cur.index();
        let mut bytes = Vec::new();
        while let Some(byte) = cur.peek() {
            if is_simple_word_continue(&dialect, byte) {
                bytes.push(byte);
                cur.consume();
            } else {
                break;
            }
        }
        debug_assert!(!bytes.is_empty());
        self.alloc_part(
            parts,
            QuoteKind::Unquoted,
            start..cur.index(),
            WordPartKind::Text(text_value(bytes)),
            cur.input(),
        );
    }

    /// Recognizes a `name=`, `name+=`, or `name[...]=` prefix.
    ///
    /// On a match the marker parts are emitted and the cursor advances past
    /// the sign; otherwise nothing changes.
    fn parse_assignment_prefix(
        &self,
        cur: &mut SplicedCursor,
        parts: &mut Vec<Handle<WordPart>>,
    ) {
        let dialect = cur.input().dialect();
        let mut probe = cur.clone();
        let name_start = probe.index();
        let mut name = Vec::new();
        match probe.peek() {
            Some(byte) if is_name_start(byte) => {
                name.push(byte);
                probe.consume();
            }
            _ => return,
        }
        while let Some(byte) = probe.peek() {
            if is_name_continue(byte) {
                name.push(byte);
                probe.consume();
            } else {
                break;
            }
        }

        // A subscripted assignment target: absorb the bracketed subscript
        // into the name.
        if probe.peek() == Some(b'[') {
            name.push(b'[');
            probe.consume();
            let mut depth = 1u32;
            while depth > 0 {
                match probe.peek() {
                    None => return,
                    Some(byte)
                        if is_blank(byte)
                            || is_punct_metacharacter(byte)
                            || dialect.is_newline(byte)
                            || dialect.is_newline_start(byte) =>
                    {
                        return
                    }
                    Some(byte) => {
                        if byte == b'[' {
                            depth += 1;
                        } else if byte == b']' {
                            depth -= 1;
                        }
                        name.push(byte);
                        probe.consume();
                    }
                }
            }
        }

        let name_end = probe.index();
        let sign = match probe.peek() {
            Some(b'=') => {
                probe.consume();
                Some((WordPartKind::AssignmentEqualSign, name_end..probe.index()))
            }
            Some(b'+') => {
                let mut after_plus = probe.clone();
                after_plus.consume();
                if after_plus.peek() == Some(b'=') {
                    after_plus.consume();
                    let range = name_end..after_plus.index();
                    probe = after_plus;
                    Some((WordPartKind::AssignmentPlusEqualSign, range))
                } else {
                    None
                }
            }
            _ => None,
        };
        let Some((sign_kind, sign_range)) = sign else {
            return;
        };

        self.alloc_part(
            parts,
            QuoteKind::Unquoted,
            name_start..name_end,
            WordPartKind::AssignmentVariableName(text_value(name)),
            cur.input(),
        );
        self.alloc_part(parts, QuoteKind::Unquoted, sign_range, sign_kind, cur.input());
        *cur = probe;
    }

    /// Replaces a word that is one unquoted text run spelling a reserved
    /// word with a reserved-word part.
    fn fold_reserved_word(&self, parts: &mut Vec<Handle<WordPart>>) {
        let part = match parts[..] {
            [part] => part,
            _ => return,
        };
        let value = match (&part.quote, &part.kind) {
            (QuoteKind::Unquoted, WordPartKind::Text(value)) => value,
            _ => return,
        };
        if let Ok(reserved) = ReservedWord::try_from(value.as_str()) {
            parts[0] = self.arena().alloc(WordPart {
                quote: QuoteKind::Unquoted,
                span: part.span.clone(),
                kind: WordPartKind::ReservedWord(reserved),
            });
        }
    }

    /// Parses a single-quoted string into quote-start, text, and quote-stop
    /// parts.
    ///
    /// The contents are literal: neither escapes nor line continuations are
    /// interpreted between the quotes.
    fn parse_single_quote(
        &self,
        cur: &mut SplicedCursor,
        parts: &mut Vec<Handle<WordPart>>,
    ) -> Result<()> {
        let opening = cur.location();
        let quote_start = cur.index();
        cur.consume();
        let content_start = cur.raw_mut().index();
        self.alloc_part(
            parts,
            QuoteKind::SingleQuote,
            quote_start..content_start,
            WordPartKind::QuoteStart,
            cur.input(),
        );

        let mut bytes = Vec::new();
        loop {
            let raw = cur.raw_mut();
            match raw.peek() {
                None => return Err(Error::syntax(SyntaxError::UnclosedSingleQuote, opening)),
                Some(b'\'') => break,
                Some(byte) => {
                    bytes.push(byte);
                    raw.consume();
                }
            }
        }
        let content_end = cur.raw_mut().index();
        if content_end > content_start {
            self.alloc_part(
                parts,
                QuoteKind::SingleQuote,
                content_start..content_end,
                WordPartKind::Text(text_value(bytes)),
                cur.input(),
            );
        }
        cur.raw_mut().consume();
        let stop_end = cur.index();
        self.alloc_part(
            parts,
            QuoteKind::SingleQuote,
            content_end..stop_end,
            WordPartKind::QuoteStop,
            cur.input(),
        );
        Ok(())
    }

    /// Parses the body of a `"..."` or `$"..."` string, the opening
    /// delimiter already consumed.
    ///
    /// `start_index` is where the delimiter began (the `$` for a localized
    /// string); the quote-start part covers it. Inside the quotes only
    /// `\$ \` \" \\` are escapes; any other `\X` stays a two-byte literal.
    pub(super) fn parse_double_quote_body(
        &self,
        cur: &mut SplicedCursor,
        parts: &mut Vec<Handle<WordPart>>,
        quote: QuoteKind,
        start_index: usize,
        context: &WordContext,
    ) -> Result<()> {
        let opening = cur.input().location(start_index);
        let unclosed = match quote {
            QuoteKind::LocalizedDoubleQuote => SyntaxError::UnclosedDollarDoubleQuote,
            _ => SyntaxError::UnclosedDoubleQuote,
        };
        self.alloc_part(
            parts,
            quote,
            start_index..cur.index(),
            WordPartKind::QuoteStart,
            cur.input(),
        );

        let mut text_start = cur.index();
        let mut bytes = Vec::new();
        loop {
            match cur.peek() {
                None => return Err(Error::syntax(unclosed, opening)),
                Some(b'"') => {
                    let stop_start = cur.index();
                    self.flush_text(parts, quote, &mut bytes, text_start..stop_start, cur.input());
                    cur.consume();
                    self.alloc_part(
                        parts,
                        quote,
                        stop_start..cur.index(),
                        WordPartKind::QuoteStop,
                        cur.input(),
                    );
                    return Ok(());
                }
                Some(b'\\') => {
                    let escape_start = cur.index();
                    self.flush_text(parts, quote, &mut bytes, text_start..escape_start, cur.input());
                    let mut probe = cur.clone();
                    probe.consume();
                    match probe.peek() {
                        Some(escaped @ (b'$' | b'`' | b'"' | b'\\')) => {
                            probe.consume();
                            *cur = probe;
                            self.alloc_part(
                                parts,
                                quote,
                                escape_start..cur.index(),
                                WordPartKind::SimpleEscape(escaped),
                                cur.input(),
                            );
                        }
                        Some(other) => {
                            probe.consume();
                            *cur = probe;
                            self.alloc_part(
                                parts,
                                quote,
                                escape_start..cur.index(),
                                WordPartKind::Text(text_value(vec![b'\\', other])),
                                cur.input(),
                            );
                        }
                        None => {
                            // Lone backslash; the next iteration reports the
                            // missing closing quote.
                            *cur = probe;
                            self.alloc_part(
                                parts,
                                quote,
                                escape_start..cur.index(),
                                WordPartKind::Text("\\".to_string()),
                                cur.input(),
                            );
                        }
                    }
                    text_start = cur.index();
                }
                Some(b'$') => {
                    let dollar_start = cur.index();
                    self.flush_text(parts, quote, &mut bytes, text_start..dollar_start, cur.input());
                    if !self.parse_dollar_in_text(cur, parts, quote, context)? {
                        cur.consume();
                        self.alloc_part(
                            parts,
                            quote,
                            dollar_start..cur.index(),
                            WordPartKind::Text("$".to_string()),
                            cur.input(),
                        );
                    }
                    text_start = cur.index();
                }
                Some(b'`') if context.backquote_nest_level >= 1 => {
                    // The backquote closes the enclosing substitution, so the
                    // quotation cannot be completed.
                    return Err(Error::syntax(unclosed, opening));
                }
                Some(b'`') => {
                    return Err(Error::syntax(
                        SyntaxError::UnsupportedBackquote,
                        cur.location(),
                    ))
                }
                Some(byte) => {
                    bytes.push(byte);
                    cur.consume();
                }
            }
        }
    }

    fn flush_text(
        &self,
        parts: &mut Vec<Handle<WordPart>>,
        quote: QuoteKind,
        bytes: &mut Vec<u8>,
        range: Range<usize>,
        input: &Rc<TextInput>,
    ) {
        if !bytes.is_empty() {
            let value = text_value(std::mem::take(bytes));
            self.alloc_part(parts, quote, range, WordPartKind::Text(value), input);
        }
    }

    /// Handles `$` in an unquoted word position.
    fn parse_dollar(
        &self,
        cur: &mut SplicedCursor,
        parts: &mut Vec<Handle<WordPart>>,
        context: &WordContext,
    ) -> Result<()> {
        let dialect = cur.input().dialect();
        let dollar_start = cur.index();
        let mut probe = cur.clone();
        probe.consume();
        match probe.peek() {
            Some(b'\'') => {
                if !dialect.allow_dollar_single_quote_strings {
                    return Err(Error::syntax(
                        SyntaxError::DollarSingleQuoteNotAllowed,
                        cur.location(),
                    ));
                }
                *cur = probe;
                self.parse_dollar_single_quote(cur, parts, dollar_start)
            }
            Some(b'"') => {
                if !dialect.allow_dollar_double_quote_strings {
                    return Err(Error::syntax(
                        SyntaxError::DollarDoubleQuoteNotAllowed,
                        cur.location(),
                    ));
                }
                probe.consume();
                *cur = probe;
                self.parse_double_quote_body(
                    cur,
                    parts,
                    QuoteKind::LocalizedDoubleQuote,
                    dollar_start,
                    context,
                )
            }
            Some(b'(') => Err(Error::syntax(
                SyntaxError::UnsupportedCommandSubstitution,
                cur.location(),
            )),
            Some(b'{') => Err(Error::syntax(
                SyntaxError::UnsupportedBracedParam,
                cur.location(),
            )),
            _ => {
                if let Some(name) = parse_substitution_name(&mut probe) {
                    *cur = probe;
                    self.alloc_part(
                        parts,
                        QuoteKind::Unquoted,
                        dollar_start..cur.index(),
                        WordPartKind::SimpleSubstitution(name),
                        cur.input(),
                    );
                } else {
                    cur.consume();
                    self.alloc_part(
                        parts,
                        QuoteKind::Unquoted,
                        dollar_start..cur.index(),
                        WordPartKind::Text("$".to_string()),
                        cur.input(),
                    );
                }
                Ok(())
            }
        }
    }

    /// Handles `$` inside a double-quoted string. Returns whether anything
    /// was consumed; a `$` with nothing to substitute stays literal.
    fn parse_dollar_in_text(
        &self,
        cur: &mut SplicedCursor,
        parts: &mut Vec<Handle<WordPart>>,
        quote: QuoteKind,
        _context: &WordContext,
    ) -> Result<bool> {
        let dialect = cur.input().dialect();
        let secure_localized = quote == QuoteKind::LocalizedDoubleQuote
            && dialect.secure_dollar_double_quote_strings;
        let dollar_start = cur.index();
        let mut probe = cur.clone();
        probe.consume();
        match probe.peek() {
            Some(b'(') => {
                if secure_localized {
                    return Err(Error::syntax(
                        SyntaxError::SubstitutionInLocalizedString,
                        cur.location(),
                    ));
                }
                Err(Error::syntax(
                    SyntaxError::UnsupportedCommandSubstitution,
                    cur.location(),
                ))
            }
            Some(b'{') => {
                if secure_localized {
                    return Err(Error::syntax(
                        SyntaxError::SubstitutionInLocalizedString,
                        cur.location(),
                    ));
                }
                Err(Error::syntax(
                    SyntaxError::UnsupportedBracedParam,
                    cur.location(),
                ))
            }
            _ => match parse_substitution_name(&mut probe) {
                Some(name) => {
                    if secure_localized {
                        return Err(Error::syntax(
                            SyntaxError::SubstitutionInLocalizedString,
                            cur.location(),
                        ));
                    }
                    *cur = probe;
                    self.alloc_part(
                        parts,
                        quote,
                        dollar_start..cur.index(),
                        WordPartKind::SimpleSubstitution(name),
                        cur.input(),
                    );
                    Ok(true)
                }
                None => Ok(false),
            },
        }
    }
}

/// Parses the parameter name after `$`: a name, one positional digit, or one
/// special parameter character.
fn parse_substitution_name(probe: &mut SplicedCursor) -> Option<String> {
    match probe.peek() {
        Some(byte) if is_name_start(byte) => {
            let mut name = vec![byte];
            probe.consume();
            while let Some(byte) = probe.peek() {
                if is_name_continue(byte) {
                    name.push(byte);
                    probe.consume();
                } else {
                    break;
                }
            }
            Some(text_value(name))
        }
        Some(byte) if byte.is_ascii_digit() => {
            probe.consume();
            Some(text_value(vec![byte]))
        }
        Some(byte @ (b'?' | b'@' | b'#' | b'*' | b'$' | b'!' | b'-')) => {
            probe.consume();
            Some(text_value(vec![byte]))
        }
        _ => None,
    }
}
