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

//! Transcript generation and GPA.
//!
//! Transcripts are read-only views over a student's enrollments. The GPA is
//! the unweighted mean of the grade points of graded enrollments, so a
//! 1-credit course weighs as much as a 5-credit one. Ungraded enrollments
//! are listed but left out of the mean.
//!
//! # Example
//!
//! ```
//! use ccrm::{Course, CourseOptions, EnrollmentEngine, Grade, RecordStore, TranscriptGenerator};
//! use rust_decimal_macros::dec;
//!
//! let store = RecordStore::new();
//! let student = store.register_student("Ada", "ada@example.edu", "REG1").unwrap();
//! store.insert_course(Course::new("CS101", "Intro", CourseOptions::default())).unwrap();
//!
//! let engine = EnrollmentEngine::new(&store);
//! engine.enroll(student.id(), &"CS101".into()).unwrap();
//! engine.assign_grade(student.id(), &"CS101".into(), Grade::A).unwrap();
//!
//! let transcript = TranscriptGenerator::new(&store).generate(student.id()).unwrap();
//! assert_eq!(transcript.gpa(), dec!(9.0));
//! ```

use crate::base::{CourseCode, StudentId};
use crate::enrollment::Enrollment;
use crate::error::{Entity, RecordsError};
use crate::grade::Grade;
use crate::person::{Profile, Student};
use crate::store::RecordStore;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

const RULE_HEAVY: &str = "========================================";
const RULE_LIGHT: &str = "----------------------------------------";

/// One course line of a transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptLine {
    pub course_code: CourseCode,
    pub grade: Option<Grade>,
}

/// A student's academic record at one point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    profile: String,
    lines: Vec<TranscriptLine>,
    gpa: Decimal,
}

impl Transcript {
    /// Builds a transcript from a student's current enrollments.
    pub fn for_student(student: &Student) -> Self {
        Self {
            profile: student.profile(),
            lines: student
                .enrollments()
                .iter()
                .map(|e| TranscriptLine {
                    course_code: e.course_code().clone(),
                    grade: e.grade(),
                })
                .collect(),
            gpa: calculate_gpa(student.enrollments()),
        }
    }

    pub fn profile(&self) -> &str {
        &self.profile
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn gpa(&self) -> Decimal {
        self.gpa
    }
}

impl fmt::Display for Transcript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f)?;
        writeln!(f, "{RULE_HEAVY}")?;
        writeln!(f, "      ACADEMIC TRANSCRIPT")?;
        writeln!(f, "{RULE_HEAVY}")?;
        writeln!(f, "{}", self.profile)?;
        writeln!(f, "{RULE_LIGHT}")?;
        writeln!(f, "Enrolled Courses:")?;
        if self.lines.is_empty() {
            writeln!(f, "  No courses enrolled.")?;
        }
        for line in &self.lines {
            let grade = line.grade.map_or("Not Graded", Grade::letter);
            writeln!(f, "  - {:<10} | Grade: {}", line.course_code.as_str(), grade)?;
        }
        writeln!(f, "{RULE_LIGHT}")?;
        // `{:.2}` alone truncates a Decimal, so round half away from zero first.
        let gpa = self
            .gpa
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        writeln!(f, "Cumulative GPA: {gpa:.2}")?;
        writeln!(f, "{RULE_HEAVY}")
    }
}

/// Unweighted mean grade point over graded enrollments; zero when none are graded.
pub fn calculate_gpa(enrollments: &[Enrollment]) -> Decimal {
    let (total, count) = enrollments
        .iter()
        .filter_map(Enrollment::grade)
        .fold((Decimal::ZERO, 0u32), |(total, count), grade| {
            (total + grade.grade_point(), count + 1)
        });

    if count == 0 {
        Decimal::ZERO
    } else {
        total / Decimal::from(count)
    }
}

/// Produces transcripts for students held in a [`RecordStore`].
pub struct TranscriptGenerator<'a> {
    store: &'a RecordStore,
}

impl<'a> TranscriptGenerator<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// [`RecordsError::NotFound`] if the student does not exist.
    pub fn generate(&self, student_id: StudentId) -> Result<Transcript, RecordsError> {
        let student = self
            .store
            .find_student(student_id)
            .ok_or(RecordsError::NotFound(Entity::Student(student_id)))?;
        Ok(Transcript::for_student(&student))
    }
}
