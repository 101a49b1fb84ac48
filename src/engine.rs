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

//! Enrollment engine.
//!
//! The [`EnrollmentEngine`] enforces the enrollment rules and is the only
//! component that creates enrollments or changes their grades.
//!
//! # Rules
//!
//! - **Existence**: the student and the course must be on record.
//! - **No duplicates**: a student holds at most one enrollment per course.
//! - **Credit limit**: the credits of a student's enrollments within one
//!   semester never exceed [`MAX_CREDITS_PER_SEMESTER`].

use crate::base::{CourseCode, StudentId};
use crate::course::Semester;
use crate::enrollment::Enrollment;
use crate::error::{Entity, RecordsError};
use crate::grade::Grade;
use crate::store::RecordStore;
use chrono::{Local, NaiveDate};
use log::debug;

/// Maximum total credits a student may hold within one semester.
pub const MAX_CREDITS_PER_SEMESTER: u32 = 18;

/// Applies enrollment and grading operations to a [`RecordStore`].
///
/// # Invariants
///
/// - A (student, course) pair has at most one enrollment.
/// - Same-semester credits never exceed [`MAX_CREDITS_PER_SEMESTER`].
/// - Every check passes before the student's enrollment list is touched.
pub struct EnrollmentEngine<'a> {
    store: &'a RecordStore,
}

impl<'a> EnrollmentEngine<'a> {
    pub fn new(store: &'a RecordStore) -> Self {
        Self { store }
    }

    /// Enrolls a student in a course, dated today.
    ///
    /// # Errors
    ///
    /// - [`RecordsError::NotFound`] - Student or course does not exist.
    /// - [`RecordsError::DuplicateEnrollment`] - Student already holds the course.
    /// - [`RecordsError::CreditLimitExceeded`] - Semester total would pass the limit.
    pub fn enroll(
        &self,
        student_id: StudentId,
        course_code: &CourseCode,
    ) -> Result<Enrollment, RecordsError> {
        self.enroll_on(student_id, course_code, Local::now().date_naive())
    }

    /// Same as [`enroll`](Self::enroll) with an explicit enrollment date.
    pub fn enroll_on(
        &self,
        student_id: StudentId,
        course_code: &CourseCode,
        date: NaiveDate,
    ) -> Result<Enrollment, RecordsError> {
        // Holding the student's entry for the whole operation keeps the
        // checks and the append together.
        let mut student = self
            .store
            .student_mut(student_id)
            .ok_or(RecordsError::NotFound(Entity::Student(student_id)))?;

        let (target_code, target_credits, target_semester) = {
            let course = self
                .store
                .find_course(course_code)
                .ok_or_else(|| RecordsError::NotFound(Entity::Course(course_code.clone())))?;
            (course.code().clone(), course.credits(), course.semester())
        };

        if student
            .enrollments()
            .iter()
            .any(|e| e.course_code() == &target_code)
        {
            return Err(RecordsError::DuplicateEnrollment {
                course: target_code,
            });
        }

        // Enrollments whose course has since disappeared do not count.
        let current: u32 = student
            .enrollments()
            .iter()
            .filter_map(|e| self.store.find_course(e.course_code()))
            .filter(|course| course.semester() == target_semester)
            .map(|course| course.credits())
            .fold(0, u32::saturating_add);

        // Saturates instead of wrapping, so oversized courses still fail the check.
        let attempted = current.saturating_add(target_credits);
        if attempted > MAX_CREDITS_PER_SEMESTER {
            return Err(RecordsError::CreditLimitExceeded {
                limit: MAX_CREDITS_PER_SEMESTER,
                attempted,
            });
        }

        let enrollment = Enrollment::new(student_id, target_code, date);
        student.enrollments_mut().push(enrollment.clone());
        debug!(
            "enrolled student {} in {} ({} credits in {})",
            student_id,
            enrollment.course_code(),
            attempted,
            target_semester
        );
        Ok(enrollment)
    }

    /// Records a grade for an existing enrollment, replacing any prior grade.
    ///
    /// The grade has already been validated at the input boundary through
    /// [`Grade::from_str`](std::str::FromStr).
    ///
    /// # Errors
    ///
    /// - [`RecordsError::NotFound`] - Student does not exist, or holds no
    ///   enrollment for the course.
    pub fn assign_grade(
        &self,
        student_id: StudentId,
        course_code: &CourseCode,
        grade: Grade,
    ) -> Result<(), RecordsError> {
        let mut student = self
            .store
            .student_mut(student_id)
            .ok_or(RecordsError::NotFound(Entity::Student(student_id)))?;

        let enrollment = student
            .enrollments_mut()
            .iter_mut()
            .find(|e| e.course_code() == course_code)
            .ok_or_else(|| {
                RecordsError::NotFound(Entity::Enrollment {
                    student: student_id,
                    course: course_code.clone(),
                })
            })?;

        enrollment.set_grade(grade);
        debug!("graded student {} in {}: {}", student_id, course_code, grade);
        Ok(())
    }

    /// Credits the student currently holds in `semester`.
    pub fn semester_credits(
        &self,
        student_id: StudentId,
        semester: Semester,
    ) -> Result<u32, RecordsError> {
        let student = self
            .store
            .find_student(student_id)
            .ok_or(RecordsError::NotFound(Entity::Student(student_id)))?;
        Ok(student
            .enrollments()
            .iter()
            .filter_map(|e| self.store.find_course(e.course_code()))
            .filter(|course| course.semester() == semester)
            .map(|course| course.credits())
            .fold(0, u32::saturating_add))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Course, CourseOptions};

    fn course(code: &str, credits: u32, semester: Semester) -> Course {
        Course::new(
            code,
            code,
            CourseOptions {
                credits,
                semester,
                ..CourseOptions::default()
            },
        )
    }

    #[test]
    fn enroll_matches_course_code_case_insensitively() {
        let store = RecordStore::new();
        let student = store.register_student("A", "a@x", "REG-A").unwrap();
        store.insert_course(course("CS101", 3, Semester::Fall)).unwrap();

        let engine = EnrollmentEngine::new(&store);
        let enrollment = engine.enroll(student.id(), &"cs101".into()).unwrap();

        // Stored with the course's canonical spelling.
        assert_eq!(enrollment.course_code().as_str(), "CS101");
        assert_eq!(
            engine.enroll(student.id(), &"CS101".into()),
            Err(RecordsError::DuplicateEnrollment {
                course: "CS101".into()
            })
        );
    }

    #[test]
    fn other_semesters_do_not_count_toward_limit() {
        let store = RecordStore::new();
        let student = store.register_student("A", "a@x", "REG-A").unwrap();
        store.insert_course(course("F1", 18, Semester::Fall)).unwrap();
        store.insert_course(course("S1", 18, Semester::Summer)).unwrap();

        let engine = EnrollmentEngine::new(&store);
        engine.enroll(student.id(), &"F1".into()).unwrap();
        engine.enroll(student.id(), &"S1".into()).unwrap();

        assert_eq!(engine.semester_credits(student.id(), Semester::Fall), Ok(18));
        assert_eq!(engine.semester_credits(student.id(), Semester::Summer), Ok(18));
        assert_eq!(engine.semester_credits(student.id(), Semester::Winter), Ok(0));
    }

    #[test]
    fn oversized_course_cannot_wrap_past_limit() {
        let store = RecordStore::new();
        let student = store.register_student("A", "a@x", "REG-A").unwrap();
        store.insert_course(course("A1", 10, Semester::Fall)).unwrap();
        store
            .insert_course(course("BIG", u32::MAX - 5, Semester::Fall))
            .unwrap();

        let engine = EnrollmentEngine::new(&store);
        engine.enroll(student.id(), &"A1".into()).unwrap();
        assert_eq!(
            engine.enroll(student.id(), &"BIG".into()),
            Err(RecordsError::CreditLimitExceeded {
                limit: MAX_CREDITS_PER_SEMESTER,
                attempted: u32::MAX,
            })
        );
        assert_eq!(engine.semester_credits(student.id(), Semester::Fall), Ok(10));
        assert_eq!(store.find_student(student.id()).unwrap().enrollments().len(), 1);
    }

    #[test]
    fn student_checked_before_course() {
        let store = RecordStore::new();
        let engine = EnrollmentEngine::new(&store);
        assert_eq!(
            engine.enroll(StudentId(1), &"NOPE".into()),
            Err(RecordsError::NotFound(Entity::Student(StudentId(1))))
        );
    }
}
