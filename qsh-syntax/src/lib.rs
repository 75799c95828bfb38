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

//! Shell language syntax and parser.
//!
//! This crate is the front-end of qsh. It reads shell source code from a
//! [byte source](input), indexes it into a [text input](source) with stable
//! byte positions and line/column mapping, and parses it into an
//! [abstract syntax tree](syntax) whose nodes live in an [arena](arena).
//!
//! The lexical grammar is context-sensitive and configurable through a
//! [dialect](dialect::Dialect) value that selects POSIX, bash-compatible, or
//! extended behavior.
//!
//! To parse source code, prepare a [`TextInput`](source::TextInput) over an
//! input source, an [`Arena`](arena::Arena), and a
//! [`Parser`](parser::Parser). See the [`parser`] module for details.

pub mod arena;
pub mod dialect;
pub mod input;
pub mod parser;
pub mod source;
pub mod syntax;
