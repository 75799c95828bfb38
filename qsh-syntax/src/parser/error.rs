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

//! Definition of errors that happen in the parser.
//!
//! Error construction on the parse hot path is allocation-free: a
//! [`SyntaxError`] is a small `Copy` value and the message text is produced
//! only when the error is displayed.

use crate::source::Location;
use std::borrow::Cow;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Types of syntax errors.
///
/// The error's location is carried by the enclosing [`Error`]; for an
/// unclosed quotation that location is the opening quote.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum SyntaxError {
    /// A word was required but the input does not start one.
    #[error("missing word")]
    MissingWord,
    /// A blank was required.
    #[error("missing blank")]
    MissingBlank,
    /// A newline was required.
    #[error("missing newline")]
    MissingNewline,
    /// A metacharacter was required.
    #[error("missing metacharacter")]
    MissingMetacharacter,
    /// A name character was required.
    #[error("missing name character")]
    MissingNameCharacter,
    /// A word start character was required.
    #[error("missing word character")]
    MissingWordCharacter,
    /// A `#` comment was required.
    #[error("missing comment")]
    MissingComment,
    /// A digit of the given base was required.
    #[error("missing {} digit", base_name(.base))]
    MissingDigit {
        /// Base the digit was required in, between 2 and 36.
        base: u32,
    },
    /// A parsed number does not fit the result type.
    #[error("number too big")]
    NumberTooBig,
    /// A single quotation lacks its closing `'`.
    #[error("missing closing '")]
    UnclosedSingleQuote,
    /// A double quotation lacks its closing `"`.
    #[error("missing closing \"")]
    UnclosedDoubleQuote,
    /// A `$'...'` string lacks its closing `'`.
    #[error("missing closing '")]
    UnclosedDollarSingleQuote,
    /// A `$"..."` string lacks its closing `"`.
    #[error("missing closing \"")]
    UnclosedDollarDoubleQuote,
    /// A `\u` or `\U` escape names a value that is not a Unicode scalar.
    #[error("invalid unicode escape")]
    InvalidUnicodeEscape,
    /// `$'...'` is not allowed by the current dialect.
    #[error("$'...' is not allowed in this shell dialect")]
    DollarSingleQuoteNotAllowed,
    /// `$"..."` is not allowed by the current dialect.
    #[error("$\"...\" is not allowed in this shell dialect")]
    DollarDoubleQuoteNotAllowed,
    /// A substitution appeared inside `$"..."` while the dialect forbids
    /// interior side effects there.
    #[error("substitutions are not allowed inside $\"...\"")]
    SubstitutionInLocalizedString,
    /// A backquote would terminate a comment inside a backquote command
    /// substitution.
    #[error("a backquote cannot end a comment inside a backquote substitution")]
    BackquoteEndsComment,
    /// `$(...)` is recognized but not implemented yet.
    #[error("command substitution is not yet supported")]
    UnsupportedCommandSubstitution,
    /// `${...}` is recognized but not implemented yet.
    #[error("braced parameter expansion is not yet supported")]
    UnsupportedBracedParam,
    /// `` `...` `` is recognized but not implemented yet.
    #[error("backquote command substitution is not yet supported")]
    UnsupportedBackquote,
}

fn base_name(base: &u32) -> Cow<'static, str> {
    match *base {
        2 => Cow::Borrowed("binary"),
        8 => Cow::Borrowed("octal"),
        10 => Cow::Borrowed("decimal"),
        16 => Cow::Borrowed("hexadecimal"),
        _ => Cow::Owned(format!("base-{base}")),
    }
}

/// Types of errors that may happen in parsing.
#[derive(Clone, Debug)]
pub enum ErrorCause {
    /// Error in the underlying input source.
    Io(Rc<std::io::Error>),
    /// Syntax error.
    Syntax(SyntaxError),
}

impl PartialEq for ErrorCause {
    fn eq(&self, other: &ErrorCause) -> bool {
        match (self, other) {
            (ErrorCause::Syntax(a), ErrorCause::Syntax(b)) => a == b,
            _ => false,
        }
    }
}

impl ErrorCause {
    /// Returns a message describing the error cause.
    #[must_use]
    pub fn message(&self) -> Cow<'static, str> {
        match self {
            ErrorCause::Io(error) => format!("cannot read commands: {error}").into(),
            ErrorCause::Syntax(error) => error.to_string().into(),
        }
    }
}

impl fmt::Display for ErrorCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.message().fmt(f)
    }
}

impl From<Rc<std::io::Error>> for ErrorCause {
    fn from(error: Rc<std::io::Error>) -> ErrorCause {
        ErrorCause::Io(error)
    }
}

impl From<std::io::Error> for ErrorCause {
    fn from(error: std::io::Error) -> ErrorCause {
        ErrorCause::from(Rc::new(error))
    }
}

impl From<SyntaxError> for ErrorCause {
    fn from(error: SyntaxError) -> ErrorCause {
        ErrorCause::Syntax(error)
    }
}

/// Explanation of a failure in parsing.
///
/// Formats as `<location>: <message>` where the location prints as
/// `name:line:column`.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("{location}: {cause}")]
pub struct Error {
    /// What went wrong.
    pub cause: ErrorCause,
    /// Where it went wrong.
    pub location: Location,
}

impl Error {
    /// Creates a syntax error at the given location.
    #[must_use]
    pub fn syntax(error: SyntaxError, location: Location) -> Error {
        Error {
            cause: error.into(),
            location,
        }
    }
}

/// Owned data backing an annotated snippet for an [`Error`].
///
/// Available only when the `"annotate-snippets"` feature is enabled. The
/// snippet borrows from this value, so keep it alive while rendering.
#[cfg(feature = "annotate-snippets")]
#[derive(Debug)]
pub struct ErrorSnippet {
    message: String,
    origin: String,
    line_text: String,
    line: usize,
    column: usize,
}

#[cfg(feature = "annotate-snippets")]
impl ErrorSnippet {
    /// Extracts the erroneous source line and position from an error.
    #[must_use]
    pub fn new(error: &Error) -> ErrorSnippet {
        let (line, column) = error.location.line_and_column();
        let (_, line_start) = error
            .location
            .input
            .line_and_start_index(error.location.index);
        let line_text = error
            .location
            .input
            .raw_text(line_start..error.location.index + 1);
        ErrorSnippet {
            message: error.cause.message().into_owned(),
            origin: error.location.input.name().to_owned(),
            line_text,
            line,
            column,
        }
    }

    /// Builds the snippet for rendering.
    #[must_use]
    pub fn snippet(&self) -> annotate_snippets::snippet::Snippet<'_> {
        use annotate_snippets::snippet::*;
        Snippet {
            title: Some(Annotation {
                label: Some(&self.message),
                id: None,
                annotation_type: AnnotationType::Error,
            }),
            footer: vec![],
            slices: vec![Slice {
                source: &self.line_text,
                line_start: self.line,
                origin: Some(&self.origin),
                fold: false,
                annotations: vec![SourceAnnotation {
                    label: "",
                    annotation_type: AnnotationType::Error,
                    range: (self.column - 1, self.column),
                }],
            }],
            opt: Default::default(),
        }
    }
}
