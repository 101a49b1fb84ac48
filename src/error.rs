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

//! Error types for record keeping and persistence.

use crate::base::{CourseCode, InstructorId, StudentId};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The record an error refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Student(StudentId),
    Instructor(InstructorId),
    Course(CourseCode),
    Enrollment {
        student: StudentId,
        course: CourseCode,
    },
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Student(id) => write!(f, "student with ID {id}"),
            Entity::Instructor(id) => write!(f, "instructor with ID {id}"),
            Entity::Course(code) => write!(f, "course with code {code}"),
            Entity::Enrollment { student, course } => {
                write!(f, "enrollment of student {student} in course {course}")
            }
        }
    }
}

/// Business-rule and lookup errors.
///
/// All of these are recoverable: the failed operation has no effect.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordsError {
    /// Referenced record does not exist
    #[error("{0} not found")]
    NotFound(Entity),

    /// A record with the same identity is already stored
    #[error("{0} already exists")]
    AlreadyExists(Entity),

    /// Every identifier of the kind has already been issued
    #[error("no {0} IDs left to issue")]
    IdsExhausted(&'static str),

    /// Student already holds an enrollment for the course
    #[error("student is already enrolled in course {course}")]
    DuplicateEnrollment { course: CourseCode },

    /// Enrollment would push the semester credit total past the limit
    #[error("exceeds max credit limit of {limit} for the semester (attempted {attempted})")]
    CreditLimitExceeded { limit: u32, attempted: u32 },

    /// Grade text is not one of S, A, B, C, D, E, F
    #[error("invalid grade '{0}', expected one of S, A, B, C, D, E, F")]
    InvalidGradeValue(String),

    /// Semester text is not one of FALL, INTERIM, SUMMER, WINTER
    #[error("invalid semester '{0}', expected one of FALL, INTERIM, SUMMER, WINTER")]
    InvalidSemester(String),
}

/// File-system and CSV failures from the persistence and backup layers.
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Backup source directory does not exist
    #[error("source directory '{}' does not exist", .0.display())]
    MissingSource(PathBuf),
}
