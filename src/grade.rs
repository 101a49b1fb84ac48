// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Letter grades and their grade-point values.

use crate::error::RecordsError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Letter grade with a fixed grade-point value.
///
/// | Grade | Points |
/// |-------|--------|
/// | S | 10 |
/// | A | 9 |
/// | B | 8 |
/// | C | 7 |
/// | D | 6 |
/// | E | 5 |
/// | F | 0 |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grade {
    S,
    A,
    B,
    C,
    D,
    E,
    F,
}

impl Grade {
    pub const ALL: [Grade; 7] = [
        Grade::S,
        Grade::A,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::E,
        Grade::F,
    ];

    pub fn grade_point(self) -> Decimal {
        match self {
            Grade::S => dec!(10.0),
            Grade::A => dec!(9.0),
            Grade::B => dec!(8.0),
            Grade::C => dec!(7.0),
            Grade::D => dec!(6.0),
            Grade::E => dec!(5.0),
            Grade::F => dec!(0.0),
        }
    }

    pub fn letter(self) -> &'static str {
        match self {
            Grade::S => "S",
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::E => "E",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.letter())
    }
}

/// Parses user or file input. Case-insensitive, surrounding whitespace ignored.
impl FromStr for Grade {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Grade::ALL
            .into_iter()
            .find(|grade| grade.letter().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| RecordsError::InvalidGradeValue(trimmed.to_string()))
    }
}
