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

//! Syntax parser for the shell language.
//!
//! The [`Parser`] drives a [cursor](crate::source::SplicedCursor) over a
//! [text input](crate::source::TextInput) and produces
//! [AST nodes](crate::syntax) in an [arena](crate::arena::Arena).
//!
//! Every parsing primitive takes the cursor by mutable reference. On success
//! the cursor has advanced past what was consumed; on failure it is left
//! where it was, so a caller that wants to try an alternative simply clones
//! the cursor first and commits the clone on success. Primitives never panic
//! on bad input; they return a [`Result`] whose error carries one location
//! and one deferred message.

pub mod lex;

mod core;
mod error;

pub use self::core::Parser;
pub use self::core::Result;
pub use self::core::Token;
pub use self::error::Error;
pub use self::error::ErrorCause;
#[cfg(feature = "annotate-snippets")]
pub use self::error::ErrorSnippet;
pub use self::error::SyntaxError;
