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

//! Fundamentals for implementing the parser.

use super::error::Error;
use super::lex::is_punct_metacharacter;
use super::lex::WordContext;
use crate::arena::Arena;
use crate::arena::Handle;
use crate::dialect::Dialect;
use crate::source::InputCursor;
use crate::source::Location;
use crate::source::Span;
use crate::source::SplicedCursor;
use crate::source::TextInput;
use crate::syntax::Blank;
use crate::syntax::Comment;
use crate::syntax::CommandPart;
use crate::syntax::SimpleCommand;
use crate::syntax::Word;
use std::rc::Rc;

/// Entire result of parsing.
pub type Result<T> = std::result::Result<T, Error>;

/// Result of one step of lexical analysis.
#[derive(Clone, Debug)]
pub enum Token {
    /// A word.
    Word(Handle<Word>),
    /// A run of blanks.
    Blank(Handle<Blank>),
    /// A `#` comment.
    Comment(Handle<Comment>),
    /// A newline sequence.
    Newline(Span),
    /// One of `| & ; ( ) < >`.
    Metacharacter {
        /// The metacharacter itself.
        byte: u8,
        /// Where it is.
        span: Span,
    },
    /// The end of the input, one position wide.
    EndOfInput(Location),
}

/// The shell syntax parser.
///
/// A parser borrows an [`Arena`] that receives every AST node it produces and
/// shares the [`TextInput`] it reads. The parsing primitives are defined in
/// the [`lex`](super::lex) submodules; each takes a cursor by mutable
/// reference, advances it past what was consumed on success, and leaves it
/// untouched on failure.
#[derive(Debug)]
pub struct Parser<'a> {
    input: Rc<TextInput>,
    arena: &'a Arena,
}

impl<'a> Parser<'a> {
    /// Creates a parser reading the given input and allocating in the given
    /// arena.
    pub fn new(input: Rc<TextInput>, arena: &'a Arena) -> Parser<'a> {
        Parser { input, arena }
    }

    /// Returns the input this parser reads.
    #[must_use]
    pub fn input(&self) -> &Rc<TextInput> {
        &self.input
    }

    /// Returns the arena this parser allocates in.
    #[must_use]
    pub fn arena(&self) -> &'a Arena {
        self.arena
    }

    /// Returns the dialect of the input.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.input.dialect()
    }

    /// Returns a cursor at the beginning of the input, with line
    /// continuations elided.
    #[must_use]
    pub fn cursor(&self) -> SplicedCursor {
        SplicedCursor::new(self.input.cursor())
    }

    /// Parses one token.
    ///
    /// A token is a word, a run of blanks, a comment, a newline, a single
    /// metacharacter, or the end of input. Reaching the end of input consumes
    /// one position, so a retrying interactive input can continue past it on
    /// the next call.
    pub fn parse_token(&self, at: &mut SplicedCursor, context: &WordContext) -> Result<Token> {
        let dialect = at.input().dialect();
        match at.peek() {
            None => {
                if let Some(error) = at.input().take_read_error() {
                    return Err(Error {
                        cause: error.into(),
                        location: at.location(),
                    });
                }
                let location = at.location();
                at.consume();
                Ok(Token::EndOfInput(location))
            }
            Some(byte) if super::lex::is_blank(byte) => self.parse_blanks(at).map(Token::Blank),
            Some(b'#') => self
                .parse_comment(at, context.backquote_nest_level)
                .map(Token::Comment),
            Some(byte) if dialect.is_newline(byte) || dialect.is_newline_start(byte) => {
                self.parse_newline(at).map(Token::Newline)
            }
            Some(byte) if is_punct_metacharacter(byte) => {
                let start = at.index();
                at.consume();
                let end = at.index();
                let span = at.input().span(start..end);
                Ok(Token::Metacharacter { byte, span })
            }
            Some(_) => self.parse_word(at, context).map(Token::Word),
        }
    }

    /// Parses one simple command: assignment words followed by command words,
    /// delimited by a newline, a metacharacter, a comment, or the end of
    /// input.
    ///
    /// Returns `Ok(None)` when there is no command before the delimiter. The
    /// delimiting token itself is not consumed.
    pub fn parse_simple_command(
        &self,
        at: &mut SplicedCursor,
    ) -> Result<Option<Handle<SimpleCommand>>> {
        let start = at.index();
        let initial_blanks = self.parse_blank_or_empty(at);
        let mut parts = Vec::new();
        let mut final_comment = None;
        let mut check_assignment = true;
        loop {
            let dialect = at.input().dialect();
            match at.peek() {
                None => break,
                Some(byte)
                    if dialect.is_newline(byte)
                        || dialect.is_newline_start(byte)
                        || is_punct_metacharacter(byte) =>
                {
                    break
                }
                Some(b'#') => {
                    final_comment = Some(self.parse_comment(at, 0)?);
                    break;
                }
                Some(_) => {
                    let context = WordContext {
                        backquote_nest_level: 0,
                        check_for_variable_assignment: check_assignment,
                        check_for_reserved_words: parts.is_empty(),
                    };
                    let word = self.parse_word(at, &context)?;
                    if !word.is_assignment() {
                        check_assignment = false;
                    }
                    let following_blanks = self.parse_blank_or_empty(at);
                    parts.push(CommandPart {
                        word,
                        following_blanks,
                    });
                }
            }
        }

        if parts.is_empty() && final_comment.is_none() {
            return Ok(None);
        }
        let end = at.index();
        let span = at.input().span(start..end);
        Ok(Some(self.arena.alloc(SimpleCommand {
            initial_blanks,
            parts,
            final_comment,
            span,
        })))
    }
}
