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

//! Source code that is passed to the parser.
//!
//! A [`TextInput`] owns the bytes of one shell source (a file, a memory
//! buffer, or standard input) in fixed-size chunks that are materialized on
//! demand. Bytes once read are stable: a byte index is a permanent address
//! into the input, which is what makes [`Location`] and [`Span`] values cheap
//! and freely shareable.
//!
//! An end of input does not necessarily end the input. Interactive sources
//! may be read past an observed EOF, so every EOF is recorded as a position
//! of its own in the index space, and reading such a position yields `None`
//! instead of a byte.
//!
//! Parsing walks the input through [`Cursor`] (raw bytes) and
//! [`SplicedCursor`] (raw bytes with `\<newline>` line continuations elided).
//! Cursors are cheap to clone; parser code clones a cursor to speculate and
//! overwrites the original only when the speculation succeeds.

use crate::dialect::Dialect;
use crate::input::InputSource;
use std::cell::Cell;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;
use std::rc::Rc;

const CHUNK_SIZE: usize = 4096;

/// Chunked, random-access view of an underlying byte source.
///
/// See the [module documentation](self) for an overview. All methods take
/// `&self`; the chunk buffer, EOF set, and line index live behind interior
/// mutability so that locations and cursors can share the input freely.
pub struct TextInput {
    name: String,
    dialect: Cell<Dialect>,
    retry_after_eof: bool,
    source: RefCell<Box<dyn InputSource>>,
    chunks: RefCell<Vec<Box<[u8; CHUNK_SIZE]>>>,
    valid_len: Cell<usize>,
    eof_positions: RefCell<BTreeSet<usize>>,
    /// Start indexes of every line after the first.
    line_starts: RefCell<Vec<usize>>,
    /// Prefix length already covered by `line_starts`.
    scanned_len: Cell<usize>,
    read_error: RefCell<Option<std::io::Error>>,
}

impl TextInput {
    /// Creates a new text input over the given byte source.
    ///
    /// `name` identifies the input in diagnostics. A `retry_after_eof` input
    /// keeps invoking the source after an end of input has been observed,
    /// which is the behavior wanted for interactive terminals.
    pub fn new(
        name: &str,
        dialect: Dialect,
        source: Box<dyn InputSource>,
        retry_after_eof: bool,
    ) -> Rc<TextInput> {
        Rc::new(TextInput {
            name: name.to_owned(),
            dialect: Cell::new(dialect),
            retry_after_eof,
            source: RefCell::new(source),
            chunks: RefCell::new(Vec::new()),
            valid_len: Cell::new(0),
            eof_positions: RefCell::new(BTreeSet::new()),
            line_starts: RefCell::new(Vec::new()),
            scanned_len: Cell::new(0),
            read_error: RefCell::new(None),
        })
    }

    /// Returns the name of this input.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the current dialect.
    #[must_use]
    pub fn dialect(&self) -> Dialect {
        self.dialect.get()
    }

    /// Replaces the dialect.
    ///
    /// Changing the dialect invalidates the cached line index because the
    /// newline recognition switches may differ. Setting an equal dialect is a
    /// no-op.
    pub fn set_dialect(&self, new_dialect: Dialect) {
        if self.dialect.get() == new_dialect {
            return;
        }
        self.dialect.set(new_dialect);
        self.line_starts.borrow_mut().clear();
        self.scanned_len.set(0);
    }

    /// Whether this input keeps reading past an observed end of input.
    #[must_use]
    pub fn retries_after_eof(&self) -> bool {
        self.retry_after_eof
    }

    /// Number of byte positions materialized so far.
    ///
    /// Every EOF observed so far occupies one position of its own.
    #[must_use]
    pub fn valid_len(&self) -> usize {
        self.valid_len.get()
    }

    /// Tests if an EOF has been recorded at the given index.
    #[must_use]
    pub fn is_eof_position(&self, index: usize) -> bool {
        self.eof_positions.borrow().contains(&index)
    }

    /// Takes the sticky I/O error of the underlying source, if any.
    ///
    /// A failed read is recorded as an EOF position so that parsing can stop
    /// gracefully; the error itself is stashed here for the parser to
    /// surface.
    pub fn take_read_error(&self) -> Option<std::io::Error> {
        self.read_error.borrow_mut().take()
    }

    /// Returns the byte at the given index, or `None` for an EOF position.
    ///
    /// Bytes are materialized on demand, strictly in increasing index order.
    /// For a non-retrying input, any index at or past the first recorded EOF
    /// yields `None` without touching the source again.
    pub fn read_byte(&self, index: usize) -> Option<u8> {
        if index >= self.valid_len.get() {
            if !self.retry_after_eof {
                if let Some(&first_eof) = self.eof_positions.borrow().iter().next() {
                    if index >= first_eof {
                        return None;
                    }
                }
            }
            self.read_to(index);
            if index >= self.valid_len.get() {
                return None;
            }
        }
        if self.eof_positions.borrow().contains(&index) {
            None
        } else {
            Some(self.byte_at(index))
        }
    }

    fn byte_at(&self, index: usize) -> u8 {
        debug_assert!(index < self.valid_len.get());
        self.chunks.borrow()[index / CHUNK_SIZE][index % CHUNK_SIZE]
    }

    /// Materializes bytes until `target_index` is a valid position.
    fn read_to(&self, target_index: usize) {
        if target_index > self.valid_len.get() {
            tracing::debug!(
                from = self.valid_len.get(),
                to = target_index,
                "input read skipped ahead of the materialized prefix"
            );
        }
        while target_index >= self.valid_len.get() {
            if !self.retry_after_eof && !self.eof_positions.borrow().is_empty() {
                return;
            }
            let start = self.valid_len.get();
            let chunk_index = start / CHUNK_SIZE;
            let chunk_offset = start % CHUNK_SIZE;
            let read_result = {
                let mut chunks = self.chunks.borrow_mut();
                if chunk_index >= chunks.len() {
                    chunks.push(Box::new([0; CHUNK_SIZE]));
                }
                let buffer = &mut chunks[chunk_index][chunk_offset..];
                self.source.borrow_mut().read(start, buffer)
            };
            match read_result {
                Ok(0) => {
                    self.eof_positions.borrow_mut().insert(start);
                    self.valid_len.set(start + 1);
                }
                Ok(count) => self.valid_len.set(start + count),
                Err(error) => {
                    tracing::debug!(%error, "input read failed; recording an end of input");
                    *self.read_error.borrow_mut() = Some(error);
                    self.eof_positions.borrow_mut().insert(start);
                    self.valid_len.set(start + 1);
                    return;
                }
            }
        }
    }

    /// Extends the cached line index over the materialized prefix.
    ///
    /// A line boundary follows every newline sequence recognized by the
    /// dialect and every EOF position. When CRLF is recognized and the prefix
    /// ends in a bare CR, the decision is deferred until the next byte is
    /// known.
    fn update_line_starts(&self) {
        let valid = self.valid_len.get();
        let mut index = self.scanned_len.get();
        if index >= valid {
            return;
        }
        let dialect = self.dialect.get();
        let mut starts = self.line_starts.borrow_mut();
        let eofs = self.eof_positions.borrow();
        while index < valid {
            if eofs.contains(&index) {
                starts.push(index + 1);
                index += 1;
                continue;
            }
            let byte = self.byte_at(index);
            if byte == b'\r' && dialect.allow_crlf_as_newline {
                if index + 1 >= valid {
                    break;
                }
                if !eofs.contains(&(index + 1)) && self.byte_at(index + 1) == b'\n' {
                    starts.push(index + 2);
                    index += 2;
                    continue;
                }
            }
            if dialect.is_newline(byte) {
                starts.push(index + 1);
            }
            index += 1;
        }
        self.scanned_len.set(index);
    }

    /// Returns the 1-based line number containing `index` and the index at
    /// which that line starts.
    pub fn line_and_start_index(&self, index: usize) -> (usize, usize) {
        if index >= self.valid_len.get() {
            self.read_to(index);
        }
        self.update_line_starts();
        let starts = self.line_starts.borrow();
        let line = 1 + starts.partition_point(|&start| start <= index);
        let start = if line == 1 { 0 } else { starts[line - 2] };
        (line, start)
    }

    /// Returns the 1-based line and column of the given index.
    ///
    /// The column is computed by walking from the line start and expanding
    /// tabs per the dialect's tab size.
    pub fn line_and_column(&self, index: usize) -> (usize, usize) {
        let (line, start) = self.line_and_start_index(index);
        let dialect = self.dialect.get();
        let mut column = 1;
        for i in start..index {
            if self.read_byte(i) == Some(b'\t') {
                column = dialect.column_after_tab(column);
            } else {
                column += 1;
            }
        }
        (line, column)
    }

    /// Extracts the raw source text of the given index range.
    ///
    /// EOF positions inside the range contribute nothing. Invalid UTF-8 is
    /// replaced, as this function exists for diagnostics and tests.
    pub fn raw_text(&self, range: Range<usize>) -> String {
        let mut bytes = Vec::with_capacity(range.len());
        for index in range {
            if let Some(byte) = self.read_byte(index) {
                bytes.push(byte);
            }
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Returns the location of the given index in this input.
    #[must_use]
    pub fn location(self: &Rc<Self>, index: usize) -> Location {
        Location {
            input: Rc::clone(self),
            index,
        }
    }

    /// Returns the span of the given index range in this input.
    #[must_use]
    pub fn span(self: &Rc<Self>, range: Range<usize>) -> Span {
        Span {
            input: Rc::clone(self),
            range,
        }
    }

    /// Returns a cursor at the beginning of this input.
    #[must_use]
    pub fn cursor(self: &Rc<Self>) -> Cursor {
        self.cursor_at(0)
    }

    /// Returns a cursor at the given index.
    #[must_use]
    pub fn cursor_at(self: &Rc<Self>, index: usize) -> Cursor {
        Cursor {
            input: Rc::clone(self),
            index,
        }
    }
}

impl fmt::Debug for TextInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextInput")
            .field("name", &self.name)
            .field("dialect", &self.dialect.get())
            .field("retry_after_eof", &self.retry_after_eof)
            .field("valid_len", &self.valid_len.get())
            .finish_non_exhaustive()
    }
}

/// Position of a byte in a [`TextInput`].
///
/// A location is just a byte index plus a shared handle to the owning input,
/// so it stays valid for as long as any part of the program keeps the input
/// alive. Formatting a location prints `name:line:column`.
#[derive(Clone, Debug)]
pub struct Location {
    /// Input that contains the position.
    pub input: Rc<TextInput>,
    /// Byte index of the position.
    pub index: usize,
}

impl Location {
    /// Returns the 1-based line and column of this location.
    #[must_use]
    pub fn line_and_column(&self) -> (usize, usize) {
        self.input.line_and_column(self.index)
    }
}

impl PartialEq for Location {
    fn eq(&self, other: &Location) -> bool {
        Rc::ptr_eq(&self.input, &other.input) && self.index == other.index
    }
}

impl Eq for Location {}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (line, column) = self.line_and_column();
        write!(f, "{}:{}:{}", self.input.name(), line, column)
    }
}

/// Half-open byte range `[begin, end)` in a [`TextInput`].
///
/// Every AST node carries its span. Formatting a span prints the input name
/// followed by the range.
#[derive(Clone, Debug)]
pub struct Span {
    /// Input that contains the range.
    pub input: Rc<TextInput>,
    /// Byte range of the span.
    pub range: Range<usize>,
}

impl Span {
    /// Returns the location of the first byte of this span.
    #[must_use]
    pub fn begin(&self) -> Location {
        self.input.location(self.range.start)
    }

    /// Returns the location just past the last byte of this span.
    #[must_use]
    pub fn end(&self) -> Location {
        self.input.location(self.range.end)
    }

    /// Extracts the raw source text covered by this span.
    #[must_use]
    pub fn raw_text(&self) -> String {
        self.input.raw_text(self.range.clone())
    }
}

impl PartialEq for Span {
    fn eq(&self, other: &Span) -> bool {
        Rc::ptr_eq(&self.input, &other.input) && self.range == other.range
    }
}

impl Eq for Span {}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:[{}, {})",
            self.input.name(),
            self.range.start,
            self.range.end
        )
    }
}

/// Forward byte cursor interface shared by [`Cursor`] and [`SplicedCursor`].
///
/// Methods take `&mut self` because peeking may need to normalize the
/// position or trigger a fresh read from the underlying source. Cursors are
/// cheap to clone; a caller that wants to speculate clones the cursor and
/// commits by overwriting the original on success.
pub trait InputCursor: Clone {
    /// Returns the byte at the current position without consuming it, or
    /// `None` at an EOF position.
    fn peek(&mut self) -> Option<u8>;

    /// Advances past the current position.
    ///
    /// Advancing past an EOF position is permitted and yields a cursor that
    /// keeps reporting EOF for a non-retrying input.
    fn consume(&mut self);

    /// Returns the current byte index.
    fn index(&mut self) -> usize;

    /// Returns the location of the current position.
    fn location(&mut self) -> Location;

    /// Returns the input this cursor walks.
    fn input(&self) -> &Rc<TextInput>;

    /// Consumes and returns the current byte if `predicate` accepts it.
    fn consume_if(&mut self, predicate: impl FnOnce(u8) -> bool) -> Option<u8> {
        match self.peek() {
            Some(byte) if predicate(byte) => {
                self.consume();
                Some(byte)
            }
            _ => None,
        }
    }
}

/// Forward cursor over the raw bytes of a [`TextInput`].
///
/// Equality compares byte indexes only.
#[derive(Clone, Debug)]
pub struct Cursor {
    input: Rc<TextInput>,
    index: usize,
}

impl InputCursor for Cursor {
    fn peek(&mut self) -> Option<u8> {
        self.input.read_byte(self.index)
    }

    fn consume(&mut self) {
        self.index += 1;
    }

    fn index(&mut self) -> usize {
        self.index
    }

    fn location(&mut self) -> Location {
        self.input.location(self.index)
    }

    fn input(&self) -> &Rc<TextInput> {
        &self.input
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Cursor) -> bool {
        self.index == other.index
    }
}

impl Eq for Cursor {}

/// Cursor that presents the input with `\<newline>` line continuations
/// elided.
///
/// Peeking normalizes the position: as long as the cursor rests on a
/// backslash followed by a newline sequence of the current dialect, both are
/// skipped. Splices may be chained, so `\\<newline>\\<newline>A` normalizes
/// to `A`. The skipped bytes stay addressable through the underlying raw
/// cursor, which is what keeps node spans exact.
#[derive(Clone, Debug)]
pub struct SplicedCursor {
    raw: Cursor,
}

impl SplicedCursor {
    /// Wraps a raw cursor.
    #[must_use]
    pub fn new(raw: Cursor) -> SplicedCursor {
        SplicedCursor { raw }
    }

    /// Returns the underlying raw cursor at the normalized position.
    #[must_use]
    pub fn base(&mut self) -> Cursor {
        self.normalize();
        self.raw.clone()
    }

    /// Gives direct access to the underlying raw cursor.
    ///
    /// Subparsers that must see line continuations literally (the `$'...'`
    /// parser) walk the raw cursor and leave it wherever they stop; the
    /// spliced view resumes from there.
    pub fn raw_mut(&mut self) -> &mut Cursor {
        &mut self.raw
    }

    /// Tests if two cursors rest on the same position once both are
    /// normalized past any splices.
    pub fn position_eq(&mut self, other: &mut SplicedCursor) -> bool {
        self.normalize();
        other.normalize();
        self.raw == other.raw
    }

    /// Skips line-continuation sequences at the current position.
    fn normalize(&mut self) {
        let dialect = self.raw.input.dialect();
        loop {
            if self.raw.peek() != Some(b'\\') {
                return;
            }
            let mut after_backslash = self.raw.clone();
            after_backslash.consume();
            match after_backslash.peek() {
                Some(b'\r') if dialect.allow_crlf_as_newline => {
                    let mut after_cr = after_backslash.clone();
                    after_cr.consume();
                    if after_cr.peek() == Some(b'\n') {
                        after_cr.consume();
                        self.raw = after_cr;
                        continue;
                    }
                    if dialect.allow_cr_as_newline {
                        after_backslash.consume();
                        self.raw = after_backslash;
                        continue;
                    }
                    return;
                }
                Some(b'\r') if dialect.allow_cr_as_newline => {
                    after_backslash.consume();
                    self.raw = after_backslash;
                }
                Some(b'\n') if dialect.allow_lf_as_newline => {
                    after_backslash.consume();
                    self.raw = after_backslash;
                }
                _ => return,
            }
        }
    }
}

impl InputCursor for SplicedCursor {
    fn peek(&mut self) -> Option<u8> {
        self.normalize();
        self.raw.peek()
    }

    fn consume(&mut self) {
        self.normalize();
        self.raw.consume();
    }

    fn index(&mut self) -> usize {
        self.normalize();
        self.raw.index
    }

    fn location(&mut self) -> Location {
        self.normalize();
        self.raw.location()
    }

    fn input(&self) -> &Rc<TextInput> {
        self.raw.input()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::memory_input;
    use crate::input::Memory;
    use std::collections::VecDeque;

    /// Source that yields a scripted sequence of reads; an empty entry is an
    /// EOF observation.
    struct Scripted {
        reads: VecDeque<Vec<u8>>,
    }

    impl Scripted {
        fn new<const N: usize>(reads: [&[u8]; N]) -> Scripted {
            Scripted {
                reads: reads.iter().map(|r| r.to_vec()).collect(),
            }
        }
    }

    impl InputSource for Scripted {
        fn read(&mut self, _start_index: usize, buffer: &mut [u8]) -> std::io::Result<usize> {
            match self.reads.pop_front() {
                None => Ok(0),
                Some(bytes) => {
                    buffer[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
            }
        }
    }

    #[test]
    fn read_byte_materializes_in_order() {
        let input = memory_input("test", Dialect::POSIX, &b"ab"[..]);
        assert_eq!(input.read_byte(0), Some(b'a'));
        assert_eq!(input.read_byte(1), Some(b'b'));
        assert_eq!(input.read_byte(2), None);
        assert_eq!(input.valid_len(), 3);
        assert!(input.is_eof_position(2));
    }

    #[test]
    fn read_byte_past_eof_of_non_retrying_input() {
        let input = memory_input("test", Dialect::POSIX, &b"x"[..]);
        assert_eq!(input.read_byte(5), None);
        assert_eq!(input.read_byte(1), None);
        assert_eq!(input.read_byte(0), Some(b'x'));
        // The first EOF ends a non-retrying input for good.
        assert_eq!(input.read_byte(2), None);
    }

    #[test]
    fn retrying_input_reads_past_eof() {
        let source = Scripted::new([b"a", b"", b"b"]);
        let input = TextInput::new("tty", Dialect::POSIX, Box::new(source), true);
        assert_eq!(input.read_byte(0), Some(b'a'));
        assert_eq!(input.read_byte(1), None);
        assert!(input.is_eof_position(1));
        assert_eq!(input.read_byte(2), Some(b'b'));
        assert_eq!(input.read_byte(3), None);
    }

    #[test]
    fn line_and_column_with_tabs() {
        // Scenario: lines end at LF, tabs advance to the next multiple of 8.
        let input = memory_input("m", Dialect::POSIX, &b"abcdefgh\ni\njk\tmn"[..]);
        for (index, column) in (0..8).zip(1..) {
            assert_eq!(input.line_and_column(index), (1, column), "index {index}");
        }
        assert_eq!(input.line_and_column(9), (2, 1));
        assert_eq!(input.line_and_column(11), (3, 1));
        assert_eq!(input.line_and_column(13), (3, 3));
        assert_eq!(input.line_and_column(14), (3, 9));
        assert_eq!(input.line_and_column(16), (3, 11));
    }

    #[test]
    fn line_boundaries_after_eof_positions() {
        let source = Scripted::new([b"a", b"", b"b"]);
        let input = TextInput::new("tty", Dialect::POSIX, Box::new(source), true);
        assert_eq!(input.read_byte(2), Some(b'b'));
        // The EOF at index 1 ends line 1.
        assert_eq!(input.line_and_column(0), (1, 1));
        assert_eq!(input.line_and_column(2), (2, 1));
    }

    #[test]
    fn crlf_counts_as_one_line_break() {
        let input = memory_input("m", Dialect::QSH, &b"a\r\nb\nc"[..]);
        assert_eq!(input.line_and_column(0), (1, 1));
        assert_eq!(input.line_and_column(3), (2, 1));
        assert_eq!(input.line_and_column(5), (3, 1));
    }

    #[test]
    fn lone_cr_is_data_when_not_a_newline() {
        let input = memory_input("m", Dialect::QSH, &b"a\rb"[..]);
        assert_eq!(input.line_and_column(2), (1, 3));
    }

    #[test]
    fn set_dialect_invalidates_line_index() {
        let input = memory_input("m", Dialect::QSH, &b"a\r\nb"[..]);
        assert_eq!(input.line_and_column(3), (2, 1));

        let mut no_crlf = Dialect::QSH;
        no_crlf.allow_crlf_as_newline = false;
        input.set_dialect(no_crlf);
        // Now only the LF breaks the line, so `b` is still on line 2, but the
        // CR no longer pairs.
        assert_eq!(input.line_and_column(2), (1, 3));
        assert_eq!(input.line_and_column(3), (2, 1));
    }

    #[test]
    fn location_display() {
        let input = memory_input("script.sh", Dialect::POSIX, &b"ab\ncd"[..]);
        assert_eq!(input.location(4).to_string(), "script.sh:2:2");
    }

    #[test]
    fn span_display_and_text() {
        let input = memory_input("script.sh", Dialect::POSIX, &b"hello"[..]);
        let span = input.span(1..4);
        assert_eq!(span.to_string(), "script.sh:[1, 4)");
        assert_eq!(span.raw_text(), "ell");
        assert_eq!(span.begin().index, 1);
        assert_eq!(span.end().index, 4);
    }

    #[test]
    fn cursor_walks_and_compares_by_index() {
        let input = memory_input("m", Dialect::POSIX, &b"ab"[..]);
        let mut cursor = input.cursor();
        assert_eq!(cursor.peek(), Some(b'a'));
        assert_eq!(cursor.peek(), Some(b'a'));
        cursor.consume();
        assert_eq!(cursor.peek(), Some(b'b'));
        assert_eq!(cursor, input.cursor_at(1));
        cursor.consume();
        assert_eq!(cursor.peek(), None);
        // Advancing out of range stays EOF.
        cursor.consume();
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn consume_if_commits_only_on_match() {
        let input = memory_input("m", Dialect::POSIX, &b"ab"[..]);
        let mut cursor = input.cursor();
        assert_eq!(cursor.consume_if(|b| b == b'x'), None);
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.consume_if(|b| b == b'a'), Some(b'a'));
        assert_eq!(cursor.index(), 1);
    }

    #[test]
    fn spliced_cursor_elides_chained_continuations() {
        let input = memory_input("m", Dialect::POSIX, &b"\\\n\\\n\\\nA"[..]);
        let mut cursor = SplicedCursor::new(input.cursor());
        assert_eq!(cursor.peek(), Some(b'A'));
        assert_eq!(cursor.index(), 6);
        cursor.consume();
        assert_eq!(cursor.peek(), None);
    }

    #[test]
    fn spliced_cursor_keeps_literal_backslashes() {
        let input = memory_input("m", Dialect::POSIX, &b"\\\n\\A"[..]);
        let mut cursor = SplicedCursor::new(input.cursor());
        assert_eq!(cursor.peek(), Some(b'\\'));
        assert_eq!(cursor.index(), 2);
    }

    #[test]
    fn spliced_cursor_elides_crlf_continuation() {
        let input = memory_input("m", Dialect::QSH, &b"\\\r\nZ"[..]);
        let mut cursor = SplicedCursor::new(input.cursor());
        assert_eq!(cursor.peek(), Some(b'Z'));
        assert_eq!(cursor.index(), 3);
    }

    #[test]
    fn spliced_cursor_position_eq_normalizes_both_sides() {
        let input = memory_input("m", Dialect::POSIX, &b"\\\nA"[..]);
        let mut before = SplicedCursor::new(input.cursor());
        let mut after = SplicedCursor::new(input.cursor_at(2));
        assert!(before.position_eq(&mut after));
    }

    #[test]
    fn read_error_is_recorded_as_eof() {
        struct Failing;
        impl InputSource for Failing {
            fn read(&mut self, _: usize, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
        }
        let input = TextInput::new("bad", Dialect::POSIX, Box::new(Failing), false);
        assert_eq!(input.read_byte(0), None);
        assert!(input.is_eof_position(0));
        let error = input.take_read_error().unwrap();
        assert_eq!(error.kind(), std::io::ErrorKind::Other);
        assert!(input.take_read_error().is_none());
    }

    #[test]
    fn chunk_boundary_reads() {
        let bytes = vec![b'x'; CHUNK_SIZE + 10];
        let input = TextInput::new(
            "big",
            Dialect::POSIX,
            Box::new(Memory::new(bytes)),
            false,
        );
        assert_eq!(input.read_byte(CHUNK_SIZE - 1), Some(b'x'));
        assert_eq!(input.read_byte(CHUNK_SIZE), Some(b'x'));
        assert_eq!(input.read_byte(CHUNK_SIZE + 9), Some(b'x'));
        assert_eq!(input.read_byte(CHUNK_SIZE + 10), None);
    }
}
