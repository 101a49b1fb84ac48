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

//! Courses and the semesters they run in.

use crate::base::{CourseCode, InstructorId};
use crate::error::RecordsError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Academic term. Scopes the per-semester credit limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Semester {
    #[default]
    Fall,
    Interim,
    Summer,
    Winter,
}

impl Semester {
    pub fn name(self) -> &'static str {
        match self {
            Semester::Fall => "FALL",
            Semester::Interim => "INTERIM",
            Semester::Summer => "SUMMER",
            Semester::Winter => "WINTER",
        }
    }
}

impl fmt::Display for Semester {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Semester {
    type Err = RecordsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "FALL" => Ok(Semester::Fall),
            "INTERIM" => Ok(Semester::Interim),
            "SUMMER" => Ok(Semester::Summer),
            "WINTER" => Ok(Semester::Winter),
            _ => Err(RecordsError::InvalidSemester(s.trim().to_string())),
        }
    }
}

/// Optional course attributes.
///
/// Defaults: 3 credits, department `UNDECLARED`, [`Semester::Fall`], no
/// instructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseOptions {
    pub credits: u32,
    pub department: String,
    pub semester: Semester,
    pub instructor: Option<InstructorId>,
}

impl Default for CourseOptions {
    fn default() -> Self {
        Self {
            credits: 3,
            department: "UNDECLARED".to_string(),
            semester: Semester::Fall,
            instructor: None,
        }
    }
}

/// A course offering. Only the instructor can change after creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    code: CourseCode,
    title: String,
    credits: u32,
    department: String,
    semester: Semester,
    instructor: Option<InstructorId>,
}

impl Course {
    pub fn new(code: impl Into<CourseCode>, title: impl Into<String>, options: CourseOptions) -> Self {
        debug_assert!(options.credits > 0, "course credits must be positive");
        Self {
            code: code.into(),
            title: title.into(),
            credits: options.credits,
            department: options.department,
            semester: options.semester,
            instructor: options.instructor,
        }
    }

    pub fn code(&self) -> &CourseCode {
        &self.code
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn credits(&self) -> u32 {
        self.credits
    }

    pub fn department(&self) -> &str {
        &self.department
    }

    pub fn semester(&self) -> Semester {
        self.semester
    }

    pub fn instructor(&self) -> Option<InstructorId> {
        self.instructor
    }

    pub(crate) fn set_instructor(&mut self, instructor: Option<InstructorId>) {
        self.instructor = instructor;
    }
}

impl fmt::Display for Course {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Course[Code={}, Title='{}', Credits={}, Dept={}, Semester={}, InstructorID={}]",
            self.code,
            self.title,
            self.credits,
            self.department,
            self.semester,
            self.instructor.map_or(0, |id| id.0)
        )
    }
}
