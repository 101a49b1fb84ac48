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

//! Enrollment records.
//!
//! An enrollment follows a small state machine:
//! - [`Ungraded`](EnrollmentStatus::Ungraded) on creation
//! - [`Ungraded`](EnrollmentStatus::Ungraded) → [`Graded`](EnrollmentStatus::Graded) (via grade assignment)
//! - [`Graded`](EnrollmentStatus::Graded) → [`Graded`](EnrollmentStatus::Graded) (re-assignment replaces the grade)

use crate::base::{CourseCode, StudentId};
use crate::grade::Grade;
use chrono::NaiveDate;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrollmentStatus {
    Ungraded,
    Graded(Grade),
}

/// Links one student to one course. Owned by the student's record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    student_id: StudentId,
    course_code: CourseCode,
    grade: Option<Grade>,
    enrolled_on: NaiveDate,
}

impl Enrollment {
    pub(crate) fn new(student_id: StudentId, course_code: CourseCode, enrolled_on: NaiveDate) -> Self {
        Self {
            student_id,
            course_code,
            grade: None,
            enrolled_on,
        }
    }

    pub fn student_id(&self) -> StudentId {
        self.student_id
    }

    pub fn course_code(&self) -> &CourseCode {
        &self.course_code
    }

    pub fn grade(&self) -> Option<Grade> {
        self.grade
    }

    pub fn enrolled_on(&self) -> NaiveDate {
        self.enrolled_on
    }

    pub fn status(&self) -> EnrollmentStatus {
        match self.grade {
            Some(grade) => EnrollmentStatus::Graded(grade),
            None => EnrollmentStatus::Ungraded,
        }
    }

    pub(crate) fn set_grade(&mut self, grade: Grade) {
        self.grade = Some(grade);
    }
}

impl fmt::Display for Enrollment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.grade {
            Some(grade) => write!(
                f,
                "Enrollment[StudentId={}, CourseCode={}, Grade={}]",
                self.student_id, self.course_code, grade
            ),
            None => write!(
                f,
                "Enrollment[StudentId={}, CourseCode={}, Grade=Not Graded]",
                self.student_id, self.course_code
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Enrollment {
        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        Enrollment::new(StudentId(1), CourseCode::from("CS101"), date)
    }

    #[test]
    fn starts_ungraded() {
        let enrollment = sample();
        assert_eq!(enrollment.grade(), None);
        assert_eq!(enrollment.status(), EnrollmentStatus::Ungraded);
        assert_eq!(
            enrollment.to_string(),
            "Enrollment[StudentId=1, CourseCode=CS101, Grade=Not Graded]"
        );
    }

    #[test]
    fn regrading_replaces_grade() {
        let mut enrollment = sample();
        enrollment.set_grade(Grade::B);
        assert_eq!(enrollment.status(), EnrollmentStatus::Graded(Grade::B));
        enrollment.set_grade(Grade::S);
        assert_eq!(enrollment.status(), EnrollmentStatus::Graded(Grade::S));
        assert_eq!(
            enrollment.enrolled_on(),
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap()
        );
    }
}
