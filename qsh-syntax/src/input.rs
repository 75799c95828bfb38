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

//! Methods of passing source code bytes to the [text input](crate::source).
//!
//! An [`InputSource`] produces raw bytes on demand. The
//! [`TextInput`](crate::source::TextInput) layers chunked buffering, EOF
//! bookkeeping, and line indexing on top of it; this module only defines the
//! sources themselves: an in-memory buffer, a file, and standard input.

use crate::dialect::Dialect;
use crate::source::TextInput;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::rc::Rc;

/// Byte-oriented source code reader.
///
/// The text input calls [`read`](Self::read) with strictly increasing
/// `start_index` values, each equal to the number of bytes obtained so far.
/// An implementation fills the buffer with up to `buffer.len()` fresh bytes
/// and returns how many it wrote. Returning zero means the source observed an
/// end of input at `start_index`; a retrying source (an interactive terminal)
/// may still yield more bytes on a later call.
pub trait InputSource {
    /// Reads up to `buffer.len()` bytes that start at `start_index`.
    fn read(&mut self, start_index: usize, buffer: &mut [u8]) -> std::io::Result<usize>;
}

/// Input source that reads from a byte string in memory.
#[derive(Clone, Debug)]
pub struct Memory {
    bytes: Vec<u8>,
}

impl Memory {
    /// Creates a new `Memory` that yields the given bytes.
    pub fn new<B: Into<Vec<u8>>>(bytes: B) -> Memory {
        Memory {
            bytes: bytes.into(),
        }
    }
}

impl InputSource for Memory {
    fn read(&mut self, start_index: usize, buffer: &mut [u8]) -> std::io::Result<usize> {
        let rest = self.bytes.get(start_index..).unwrap_or(&[]);
        let count = rest.len().min(buffer.len());
        buffer[..count].copy_from_slice(&rest[..count]);
        Ok(count)
    }
}

/// Input source that reads from an open file.
#[derive(Debug)]
pub struct FileSource {
    file: File,
}

impl FileSource {
    /// Opens the file at the given path for reading.
    pub fn open<P: AsRef<Path>>(path: P) -> std::io::Result<FileSource> {
        Ok(FileSource {
            file: File::open(path)?,
        })
    }
}

impl InputSource for FileSource {
    fn read(&mut self, _start_index: usize, buffer: &mut [u8]) -> std::io::Result<usize> {
        self.file.read(buffer)
    }
}

/// Input source that reads from standard input.
#[derive(Debug)]
pub struct Stdin {
    stdin: std::io::Stdin,
}

impl Stdin {
    /// Creates a new `Stdin`.
    pub fn new() -> Stdin {
        Stdin {
            stdin: std::io::stdin(),
        }
    }
}

impl Default for Stdin {
    fn default() -> Stdin {
        Stdin::new()
    }
}

impl InputSource for Stdin {
    fn read(&mut self, _start_index: usize, buffer: &mut [u8]) -> std::io::Result<usize> {
        self.stdin.read(buffer)
    }
}

/// Tests if standard input is connected to a terminal.
///
/// The result decides whether the standard input text source retries reading
/// after an end of input: an interactive user may continue typing after
/// sending EOF, while a pipe or a redirected file is done for good.
#[must_use]
pub fn stdin_is_terminal() -> bool {
    use std::os::unix::io::AsRawFd;
    nix::unistd::isatty(std::io::stdin().as_raw_fd()).unwrap_or(false)
}

/// Creates a text input over a byte string in memory.
///
/// The `name` identifies the input in diagnostics.
pub fn memory_input<B: Into<Vec<u8>>>(name: &str, dialect: Dialect, bytes: B) -> Rc<TextInput> {
    TextInput::new(name, dialect, Box::new(Memory::new(bytes)), false)
}

/// Creates a text input over the file at the given path.
///
/// The path itself becomes the input name used in diagnostics.
pub fn file_input<P: AsRef<Path>>(path: P, dialect: Dialect) -> std::io::Result<Rc<TextInput>> {
    let source = FileSource::open(&path)?;
    let name = path.as_ref().display().to_string();
    Ok(TextInput::new(&name, dialect, Box::new(source), false))
}

/// Creates a text input over standard input.
///
/// The input retries after EOF exactly when standard input
/// [is a terminal](stdin_is_terminal).
pub fn stdin_input(dialect: Dialect) -> Rc<TextInput> {
    TextInput::new("stdin", dialect, Box::new(Stdin::new()), stdin_is_terminal())
}
