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

//! Shell command language syntax.
//!
//! This module defines the abstract syntax tree the parser produces. The
//! central type is [`Word`]: an ordered sequence of typed [`WordPart`]s, each
//! tagged with the [`QuoteKind`] that governed its lexing and the exact
//! source [`Span`] it came from.
//!
//! Nodes are allocated in an [`Arena`](crate::arena::Arena) and referenced
//! through [`Handle`]s; a whole tree is freed by dropping its arena.
//!
//! Word-part values store *decoded* text: line continuations are already
//! removed and escape sequences carry their decoded bytes. The raw source
//! text of any node remains reachable through its span.

use crate::arena::Handle;
use crate::parser::lex::ReservedWord;
use crate::source::Span;

/// Enclosing quotation style that governs how escapes are interpreted.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum QuoteKind {
    /// No enclosing quotes.
    Unquoted,
    /// `'...'`
    SingleQuote,
    /// `"..."`
    DoubleQuote,
    /// `$'...'`
    EscapeInterpretingSingleQuote,
    /// `$"..."`
    LocalizedDoubleQuote,
}

impl QuoteKind {
    /// Returns the source text that opens this kind of quotation.
    #[must_use]
    pub fn quote_prefix(self) -> &'static str {
        use QuoteKind::*;
        match self {
            Unquoted => "",
            SingleQuote => "'",
            DoubleQuote => "\"",
            EscapeInterpretingSingleQuote => "$'",
            LocalizedDoubleQuote => "$\"",
        }
    }

    /// Returns the source text that closes this kind of quotation.
    #[must_use]
    pub fn quote_suffix(self) -> &'static str {
        use QuoteKind::*;
        match self {
            Unquoted => "",
            SingleQuote | EscapeInterpretingSingleQuote => "'",
            DoubleQuote | LocalizedDoubleQuote => "\"",
        }
    }
}

/// Payload of a [`WordPart`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WordPartKind {
    /// Literal run with no structural interpretation.
    ///
    /// The value is the decoded text: line continuations inside the part's
    /// span do not appear in it.
    Text(String),
    /// A single opening quote delimiter.
    QuoteStart,
    /// A single closing quote delimiter.
    QuoteStop,
    /// `\X` style escape producing one byte.
    SimpleEscape(u8),
    /// `\xHH` escape.
    HexEscape(u8),
    /// `\NNN` octal escape (low 8 bits of the digits).
    OctalEscape(u8),
    /// `\uHHHH` or `\UHHHHHHHH` escape; the value is UTF-8-encoded on
    /// expansion.
    UnicodeEscape(char),
    /// A sequence that bash parses wrongly, preserved byte-exactly for
    /// bug-compatible dialects. The value holds the bytes bash would produce.
    BashBugEscape(Vec<u8>),
    /// The name prefix of a variable assignment, subscript included.
    AssignmentVariableName(String),
    /// The `=` of a variable assignment.
    AssignmentEqualSign,
    /// The `+=` of an appending variable assignment.
    AssignmentPlusEqualSign,
    /// `$name` substitution that needs no delimiters; the value is the
    /// parameter name.
    SimpleSubstitution(String),
    /// The sole unquoted text run of the word coincided with a reserved word
    /// spelling.
    ReservedWord(ReservedWord),
}

/// Minimal typed element of a [`Word`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WordPart {
    /// Quotation style this part was lexed under.
    pub quote: QuoteKind,
    /// Exact source range of this part.
    pub span: Span,
    /// What the part is.
    pub kind: WordPartKind,
}

/// Maximal sequence of lexical pieces not broken by an unquoted
/// metacharacter.
///
/// A word produced by the parser has at least one part, and the part spans
/// concatenate exactly to the word span.
#[derive(Clone, Debug)]
pub struct Word {
    /// Parts of the word, in source order.
    pub parts: Vec<Handle<WordPart>>,
    /// Source range of the whole word.
    pub span: Span,
}

impl Word {
    /// Returns the decoded text if this word is one unquoted literal run.
    #[must_use]
    pub fn single_unquoted_text(&self) -> Option<&str> {
        match &self.parts[..] {
            [part] => match (&part.quote, &part.kind) {
                (QuoteKind::Unquoted, WordPartKind::Text(value)) => Some(value),
                _ => None,
            },
            _ => None,
        }
    }

    /// Returns the reserved word this word was recognized as, if any.
    #[must_use]
    pub fn reserved_word(&self) -> Option<ReservedWord> {
        match self.parts[..] {
            [part] => match part.kind {
                WordPartKind::ReservedWord(word) => Some(word),
                _ => None,
            },
            _ => None,
        }
    }

    /// Tests if the word begins with assignment marker parts.
    #[must_use]
    pub fn is_assignment(&self) -> bool {
        self.parts
            .first()
            .is_some_and(|part| matches!(part.kind, WordPartKind::AssignmentVariableName(_)))
    }
}

/// A possibly empty run of blanks.
#[derive(Clone, Debug)]
pub struct BlankOrEmpty {
    /// Source range of the run; empty when there were no blanks.
    pub span: Span,
}

/// A non-empty run of blanks.
#[derive(Clone, Debug)]
pub struct Blank {
    /// Source range of the run.
    pub span: Span,
}

/// A `#` comment, up to but not including the terminating newline.
#[derive(Clone, Debug)]
pub struct Comment {
    /// Source range of the comment.
    pub span: Span,
}

/// One word of a [`SimpleCommand`] together with the blanks that follow it.
#[derive(Clone, Copy, Debug)]
pub struct CommandPart {
    /// The word.
    pub word: Handle<Word>,
    /// Blanks after the word, possibly empty.
    pub following_blanks: Handle<BlankOrEmpty>,
}

/// A simple command: assignment words and command words, no control
/// structure.
///
/// Pipelines, redirections, and compound commands are recognized only as the
/// metacharacter tokens that delimit this node; their grammar lives outside
/// this crate's scope.
#[derive(Clone, Debug)]
pub struct SimpleCommand {
    /// Blanks before the first word, possibly empty.
    pub initial_blanks: Handle<BlankOrEmpty>,
    /// The words, each with its trailing blanks.
    pub parts: Vec<CommandPart>,
    /// Comment ending the command, if any.
    pub final_comment: Option<Handle<Comment>>,
    /// Source range of the whole command.
    pub span: Span,
}
