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

//! Dialect configuration.
//!
//! A [`Dialect`] is a collection of policy switches that select bash, POSIX,
//! or extended behavior of the lexer. The text-oriented switches (newline
//! recognition and tab size) also drive line/column mapping in the
//! [text input](crate::source::TextInput).

use std::str::FromStr;

/// Default column advance for a tab character.
pub const DEFAULT_TAB_SIZE: usize = 8;

/// Policy switches that select the shell language variant being parsed.
///
/// Each preset is available as an associated constant. The [`Default`]
/// implementation returns [`Dialect::QSH`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Dialect {
    /// `\r\n` is a single newline (two bytes, one line break).
    pub allow_crlf_as_newline: bool,
    /// A lone `\r` is a newline.
    pub allow_cr_as_newline: bool,
    /// A lone `\n` is a newline.
    pub allow_lf_as_newline: bool,
    /// Column advance on a tab character; `0` means a tab advances by one
    /// column.
    pub tab_size: usize,
    /// Enables `$'...'` strings.
    pub allow_dollar_single_quote_strings: bool,
    /// Reproduces two bash parse flaws in `$'...'` byte-exactly.
    pub duplicate_dollar_single_quote_string_bash_parsing_flaws: bool,
    /// Enables `$"..."` strings.
    pub allow_dollar_double_quote_strings: bool,
    /// Forbids substitutions with interior side effects inside `$"..."`.
    pub secure_dollar_double_quote_strings: bool,
    /// Reports an error when a backquote would end a comment inside a
    /// backquote command substitution.
    pub error_on_backquote_ending_comment: bool,
}

impl Dialect {
    /// Strict POSIX shell language.
    pub const POSIX: Dialect = Dialect {
        allow_crlf_as_newline: false,
        allow_cr_as_newline: false,
        allow_lf_as_newline: true,
        tab_size: DEFAULT_TAB_SIZE,
        allow_dollar_single_quote_strings: false,
        duplicate_dollar_single_quote_string_bash_parsing_flaws: false,
        allow_dollar_double_quote_strings: false,
        secure_dollar_double_quote_strings: false,
        error_on_backquote_ending_comment: true,
    };

    /// Bash-compatible language, including its known parse flaws.
    pub const BASH: Dialect = Dialect {
        allow_crlf_as_newline: false,
        allow_cr_as_newline: false,
        allow_lf_as_newline: true,
        tab_size: DEFAULT_TAB_SIZE,
        allow_dollar_single_quote_strings: true,
        duplicate_dollar_single_quote_string_bash_parsing_flaws: true,
        allow_dollar_double_quote_strings: true,
        secure_dollar_double_quote_strings: false,
        error_on_backquote_ending_comment: false,
    };

    /// Bash-compatible language minus the security flaws.
    pub const SECURE_BASH: Dialect = Dialect {
        duplicate_dollar_single_quote_string_bash_parsing_flaws: false,
        secure_dollar_double_quote_strings: true,
        ..Dialect::BASH
    };

    /// The extended superset language of qsh itself.
    pub const QSH: Dialect = Dialect {
        allow_crlf_as_newline: true,
        allow_cr_as_newline: false,
        allow_lf_as_newline: true,
        tab_size: DEFAULT_TAB_SIZE,
        allow_dollar_single_quote_strings: true,
        duplicate_dollar_single_quote_string_bash_parsing_flaws: false,
        allow_dollar_double_quote_strings: true,
        secure_dollar_double_quote_strings: true,
        error_on_backquote_ending_comment: true,
    };

    /// Tests if the byte alone constitutes a newline.
    #[must_use]
    pub fn is_newline(&self, byte: u8) -> bool {
        match byte {
            b'\r' => self.allow_cr_as_newline,
            b'\n' => self.allow_lf_as_newline,
            _ => false,
        }
    }

    /// Tests if the two bytes form a two-byte newline sequence.
    #[must_use]
    pub fn is_newline_pair(&self, first: u8, second: u8) -> bool {
        self.allow_crlf_as_newline && first == b'\r' && second == b'\n'
    }

    /// Tests if the byte can begin a newline sequence.
    #[must_use]
    pub fn is_newline_start(&self, byte: u8) -> bool {
        self.is_newline(byte) || (byte == b'\r' && self.allow_crlf_as_newline)
    }

    /// Returns the column just after a tab read at the given column.
    ///
    /// Columns are counted from 1. When `tab_size` is zero the tab advances by
    /// a single column, like any other character.
    #[must_use]
    pub fn column_after_tab(&self, column: usize) -> usize {
        if self.tab_size == 0 || column == 0 {
            column + 1
        } else {
            column + (self.tab_size - (column - 1) % self.tab_size)
        }
    }
}

impl Default for Dialect {
    fn default() -> Dialect {
        Dialect::QSH
    }
}

/// Error returned when a dialect name is not recognized.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct UnknownDialectName;

impl FromStr for Dialect {
    type Err = UnknownDialectName;

    /// Looks up a preset dialect by name (`posix`, `bash`, `secure-bash`,
    /// `qsh`).
    fn from_str(name: &str) -> Result<Dialect, UnknownDialectName> {
        match name {
            "posix" => Ok(Dialect::POSIX),
            "bash" => Ok(Dialect::BASH),
            "secure-bash" => Ok(Dialect::SECURE_BASH),
            "qsh" => Ok(Dialect::QSH),
            _ => Err(UnknownDialectName),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newline_recognition_follows_switches() {
        let d = Dialect::POSIX;
        assert!(d.is_newline(b'\n'));
        assert!(!d.is_newline(b'\r'));
        assert!(!d.is_newline_pair(b'\r', b'\n'));

        let d = Dialect::QSH;
        assert!(d.is_newline(b'\n'));
        assert!(!d.is_newline(b'\r'));
        assert!(d.is_newline_pair(b'\r', b'\n'));
        assert!(d.is_newline_start(b'\r'));

        let d = Dialect {
            allow_cr_as_newline: true,
            ..Dialect::POSIX
        };
        assert!(d.is_newline(b'\r'));
        assert!(!d.is_newline_pair(b'\r', b'\n'));
    }

    #[test]
    fn column_after_tab_advances_to_next_stop() {
        let d = Dialect::QSH;
        assert_eq!(d.column_after_tab(1), 9);
        assert_eq!(d.column_after_tab(3), 9);
        assert_eq!(d.column_after_tab(8), 9);
        assert_eq!(d.column_after_tab(9), 17);
    }

    #[test]
    fn column_after_tab_with_zero_tab_size() {
        let d = Dialect {
            tab_size: 0,
            ..Dialect::QSH
        };
        assert_eq!(d.column_after_tab(1), 2);
        assert_eq!(d.column_after_tab(7), 8);
    }

    #[test]
    fn preset_lookup_by_name() {
        assert_eq!("posix".parse(), Ok(Dialect::POSIX));
        assert_eq!("bash".parse(), Ok(Dialect::BASH));
        assert_eq!("secure-bash".parse(), Ok(Dialect::SECURE_BASH));
        assert_eq!("qsh".parse(), Ok(Dialect::QSH));
        assert_eq!(Dialect::from_str("ksh"), Err(UnknownDialectName));
    }

    #[test]
    fn secure_bash_drops_the_flaws() {
        assert!(Dialect::BASH.duplicate_dollar_single_quote_string_bash_parsing_flaws);
        assert!(!Dialect::SECURE_BASH.duplicate_dollar_single_quote_string_bash_parsing_flaws);
        assert!(Dialect::SECURE_BASH.secure_dollar_double_quote_strings);
        assert_eq!(
            Dialect::SECURE_BASH.allow_dollar_single_quote_strings,
            Dialect::BASH.allow_dollar_single_quote_strings
        );
    }
}
