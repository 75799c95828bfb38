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

//! Digits and bounded numbers.

use crate::parser::core::Parser;
use crate::parser::core::Result;
use crate::parser::error::Error;
use crate::parser::error::SyntaxError;
use crate::source::InputCursor;

impl Parser<'_> {
    /// Parses one digit of the given base and returns its value.
    ///
    /// `base` must be between 2 and 36; letters of either case are digits
    /// from 10 up.
    pub fn parse_digit<C: InputCursor>(&self, at: &mut C, base: u32) -> Result<u32> {
        debug_assert!((2..=36).contains(&base), "base {base} out of range");
        match at.peek() {
            Some(byte) => match (byte as char).to_digit(base) {
                Some(value) => {
                    at.consume();
                    Ok(value)
                }
                None => Err(Error::syntax(
                    SyntaxError::MissingDigit { base },
                    at.location(),
                )),
            },
            None => Err(Error::syntax(
                SyntaxError::MissingDigit { base },
                at.location(),
            )),
        }
    }

    /// Parses a run of `min_digits` to `max_digits` digits of the given base
    /// and accumulates their value.
    ///
    /// On success the cursor has advanced past the consumed digits; on
    /// failure it is unchanged. A value that does not fit `u64` is reported
    /// as [`SyntaxError::NumberTooBig`] at the start of the number.
    pub fn parse_simple_number<C: InputCursor>(
        &self,
        at: &mut C,
        base: u32,
        min_digits: usize,
        max_digits: usize,
    ) -> Result<u64> {
        debug_assert!(min_digits <= max_digits);
        let start = at.location();
        let mut probe = at.clone();
        let mut value: u64 = 0;
        let mut count = 0;
        while count < max_digits {
            match self.parse_digit(&mut probe, base) {
                Ok(digit) => {
                    value = value
                        .checked_mul(u64::from(base))
                        .and_then(|v| v.checked_add(u64::from(digit)))
                        .ok_or_else(|| Error::syntax(SyntaxError::NumberTooBig, start.clone()))?;
                    count += 1;
                }
                Err(error) => {
                    if count < min_digits {
                        return Err(error);
                    }
                    break;
                }
            }
        }
        *at = probe;
        Ok(value)
    }
}
