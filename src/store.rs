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

//! In-memory record store.
//!
//! Holds students, instructors and courses, keeps their insertion order for
//! listing and export, and issues identifiers.
//!
//! # Identifiers
//!
//! Ids come from one counter per record kind, guarded by a single
//! [`parking_lot::Mutex`]. The lock is held across the map insert, so two
//! racing registrations can never receive the same id. Records inserted with
//! an explicit id (CSV import) advance the counter past that id.

use crate::base::{CourseCode, InstructorId, StudentId};
use crate::course::Course;
use crate::error::{Entity, RecordsError};
use crate::person::{Instructor, Student, StudentStatus};
use chrono::{Local, NaiveDate};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::{Ref, RefMut};
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct IdCounters {
    last_student: u32,
    last_instructor: u32,
}

#[derive(Debug, Default)]
struct InsertionOrder {
    students: Vec<StudentId>,
    instructors: Vec<InstructorId>,
    courses: Vec<CourseCode>,
}

/// Owns every record of the running process.
///
/// Constructed once by the caller and passed by reference to the
/// [`EnrollmentEngine`](crate::EnrollmentEngine), the
/// [`TranscriptGenerator`](crate::TranscriptGenerator) and the persistence
/// functions.
#[derive(Debug, Default)]
pub struct RecordStore {
    students: DashMap<StudentId, Student>,
    instructors: DashMap<InstructorId, Instructor>,
    courses: DashMap<CourseCode, Course>,
    order: Mutex<InsertionOrder>,
    counters: Mutex<IdCounters>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an active student with the next free id, enrolled today.
    ///
    /// # Errors
    ///
    /// [`RecordsError::IdsExhausted`] once an import has taken the largest
    /// student id.
    pub fn register_student(
        &self,
        full_name: impl Into<String>,
        email: impl Into<String>,
        registration_number: impl Into<String>,
    ) -> Result<Student, RecordsError> {
        let mut counters = self.counters.lock();
        let id = counters
            .last_student
            .checked_add(1)
            .map(StudentId)
            .ok_or(RecordsError::IdsExhausted("student"))?;

        let student = Student::new(
            id,
            full_name,
            email,
            registration_number,
            Local::now().date_naive(),
        );
        match self.students.entry(id) {
            Entry::Occupied(_) => return Err(RecordsError::AlreadyExists(Entity::Student(id))),
            Entry::Vacant(entry) => {
                entry.insert(student.clone());
            }
        }
        counters.last_student = id.0;
        self.order.lock().students.push(id);
        Ok(student)
    }

    /// Creates an instructor with the next free id.
    ///
    /// # Errors
    ///
    /// [`RecordsError::IdsExhausted`] once an import has taken the largest
    /// instructor id.
    pub fn register_instructor(
        &self,
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Result<Instructor, RecordsError> {
        let mut counters = self.counters.lock();
        let id = counters
            .last_instructor
            .checked_add(1)
            .map(InstructorId)
            .ok_or(RecordsError::IdsExhausted("instructor"))?;

        let instructor = Instructor::new(id, full_name, email, department);
        match self.instructors.entry(id) {
            Entry::Occupied(_) => {
                return Err(RecordsError::AlreadyExists(Entity::Instructor(id)));
            }
            Entry::Vacant(entry) => {
                entry.insert(instructor.clone());
            }
        }
        counters.last_instructor = id.0;
        self.order.lock().instructors.push(id);
        Ok(instructor)
    }

    /// Adds a student that already carries an id.
    ///
    /// # Errors
    ///
    /// [`RecordsError::AlreadyExists`] if the id is taken.
    pub fn insert_student(&self, student: Student) -> Result<(), RecordsError> {
        let mut counters = self.counters.lock();
        let id = student.id();

        match self.students.entry(id) {
            Entry::Occupied(_) => Err(RecordsError::AlreadyExists(Entity::Student(id))),
            Entry::Vacant(entry) => {
                entry.insert(student);
                counters.last_student = counters.last_student.max(id.0);
                self.order.lock().students.push(id);
                Ok(())
            }
        }
    }

    /// Adds an instructor that already carries an id.
    ///
    /// # Errors
    ///
    /// [`RecordsError::AlreadyExists`] if the id is taken.
    pub fn insert_instructor(&self, instructor: Instructor) -> Result<(), RecordsError> {
        let mut counters = self.counters.lock();
        let id = instructor.id();

        match self.instructors.entry(id) {
            Entry::Occupied(_) => Err(RecordsError::AlreadyExists(Entity::Instructor(id))),
            Entry::Vacant(entry) => {
                entry.insert(instructor);
                counters.last_instructor = counters.last_instructor.max(id.0);
                self.order.lock().instructors.push(id);
                Ok(())
            }
        }
    }

    /// Adds a course.
    ///
    /// # Errors
    ///
    /// [`RecordsError::AlreadyExists`] if a course with the same code
    /// (ignoring case) is stored.
    pub fn insert_course(&self, course: Course) -> Result<(), RecordsError> {
        let code = course.code().clone();

        match self.courses.entry(code.clone()) {
            Entry::Occupied(_) => Err(RecordsError::AlreadyExists(Entity::Course(code))),
            Entry::Vacant(entry) => {
                entry.insert(course);
                self.order.lock().courses.push(code);
                Ok(())
            }
        }
    }

    /// Retrieves a student by id.
    ///
    /// The returned guard locks the student's shard; drop it before
    /// mutating the same student through the engine.
    pub fn find_student(&self, id: StudentId) -> Option<Ref<'_, StudentId, Student>> {
        self.students.get(&id)
    }

    pub fn find_instructor(&self, id: InstructorId) -> Option<Ref<'_, InstructorId, Instructor>> {
        self.instructors.get(&id)
    }

    /// Retrieves a course by code, ignoring case.
    pub fn find_course(&self, code: &CourseCode) -> Option<Ref<'_, CourseCode, Course>> {
        self.courses.get(code)
    }

    pub(crate) fn student_mut(&self, id: StudentId) -> Option<RefMut<'_, StudentId, Student>> {
        self.students.get_mut(&id)
    }

    /// All students in insertion order.
    pub fn all_students(&self) -> Vec<Student> {
        let order = self.order.lock();
        order
            .students
            .iter()
            .filter_map(|id| self.students.get(id).map(|s| s.clone()))
            .collect()
    }

    /// All instructors in insertion order.
    pub fn all_instructors(&self) -> Vec<Instructor> {
        let order = self.order.lock();
        order
            .instructors
            .iter()
            .filter_map(|id| self.instructors.get(id).map(|i| i.clone()))
            .collect()
    }

    /// All courses in insertion order.
    pub fn all_courses(&self) -> Vec<Course> {
        let order = self.order.lock();
        order
            .courses
            .iter()
            .filter_map(|code| self.courses.get(code).map(|c| c.clone()))
            .collect()
    }

    /// Courses taught by `instructor`, in insertion order.
    pub fn courses_by_instructor(&self, instructor: InstructorId) -> Vec<Course> {
        self.all_courses()
            .into_iter()
            .filter(|course| course.instructor() == Some(instructor))
            .collect()
    }

    /// Assigns a course to an instructor, or unassigns it with `None`.
    ///
    /// # Errors
    ///
    /// - [`RecordsError::NotFound`] for an unknown course.
    /// - [`RecordsError::NotFound`] for an unknown instructor.
    pub fn reassign_instructor(
        &self,
        code: &CourseCode,
        instructor: Option<InstructorId>,
    ) -> Result<(), RecordsError> {
        if let Some(id) = instructor
            && !self.instructors.contains_key(&id)
        {
            return Err(RecordsError::NotFound(Entity::Instructor(id)));
        }
        let mut course = self
            .courses
            .get_mut(code)
            .ok_or_else(|| RecordsError::NotFound(Entity::Course(code.clone())))?;
        course.set_instructor(instructor);
        Ok(())
    }

    /// # Errors
    ///
    /// [`RecordsError::NotFound`] for an unknown student.
    pub fn set_student_status(&self, id: StudentId, status: StudentStatus) -> Result<(), RecordsError> {
        let mut student = self
            .students
            .get_mut(&id)
            .ok_or(RecordsError::NotFound(Entity::Student(id)))?;
        student.set_status(status);
        Ok(())
    }

    pub fn student_count(&self) -> usize {
        self.students.len()
    }

    pub fn instructor_count(&self) -> usize {
        self.instructors.len()
    }

    pub fn course_count(&self) -> usize {
        self.courses.len()
    }
}

/// Enrollment date given to records restored from an import: one year ago.
pub(crate) fn imported_enrollment_date(today: NaiveDate) -> NaiveDate {
    today
        .checked_sub_months(chrono::Months::new(12))
        .unwrap_or(today)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::CourseOptions;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, 1).unwrap()
    }

    #[test]
    fn register_issues_increasing_ids() {
        let store = RecordStore::new();
        let a = store.register_student("A", "a@x", "REG-A").unwrap();
        let b = store.register_student("B", "b@x", "REG-B").unwrap();
        assert_eq!(a.id(), StudentId(1));
        assert_eq!(b.id(), StudentId(2));
        assert_eq!(store.student_count(), 2);
    }

    #[test]
    fn explicit_insert_advances_counter() {
        let store = RecordStore::new();
        store
            .insert_student(Student::new(StudentId(40), "X", "x@x", "REG40", date()))
            .unwrap();
        let next = store.register_student("Y", "y@x", "REG-Y").unwrap();
        assert_eq!(next.id(), StudentId(41));
    }

    #[test]
    fn exhausted_counter_never_overwrites() {
        let store = RecordStore::new();
        store
            .insert_student(Student::new(StudentId(1), "Original", "o@x", "REG1", date()))
            .unwrap();
        store
            .insert_student(Student::new(StudentId(u32::MAX), "Last", "l@x", "REGMAX", date()))
            .unwrap();

        for _ in 0..2 {
            assert_eq!(
                store.register_student("New", "n@x", "REG-N").map(|s| s.id()),
                Err(RecordsError::IdsExhausted("student"))
            );
        }
        assert_eq!(store.student_count(), 2);
        assert_eq!(store.find_student(StudentId(1)).unwrap().full_name(), "Original");

        store
            .insert_instructor(Instructor::new(InstructorId(u32::MAX), "I", "i@x", "CS"))
            .unwrap();
        assert_eq!(
            store.register_instructor("J", "j@x", "CS").map(|i| i.id()),
            Err(RecordsError::IdsExhausted("instructor"))
        );
    }

    #[test]
    fn explicit_insert_rejects_taken_id() {
        let store = RecordStore::new();
        let first = store.register_student("A", "a@x", "REG-A").unwrap();
        let clash = Student::new(first.id(), "B", "b@x", "REG-B", date());
        assert_eq!(
            store.insert_student(clash),
            Err(RecordsError::AlreadyExists(Entity::Student(first.id())))
        );
        assert_eq!(store.find_student(first.id()).unwrap().full_name(), "A");
    }

    #[test]
    fn course_lookup_ignores_case() {
        let store = RecordStore::new();
        store
            .insert_course(Course::new("CS101", "Intro", CourseOptions::default()))
            .unwrap();
        assert!(store.find_course(&CourseCode::from("cs101")).is_some());
        assert_eq!(
            store.insert_course(Course::new("cs101", "Dup", CourseOptions::default())),
            Err(RecordsError::AlreadyExists(Entity::Course(CourseCode::from("CS101"))))
        );
    }

    #[test]
    fn listings_keep_insertion_order() {
        let store = RecordStore::new();
        for code in ["PH300", "CS101", "MA201"] {
            store
                .insert_course(Course::new(code, code, CourseOptions::default()))
                .unwrap();
        }
        let codes: Vec<String> = store
            .all_courses()
            .iter()
            .map(|c| c.code().to_string())
            .collect();
        assert_eq!(codes, ["PH300", "CS101", "MA201"]);
    }

    #[test]
    fn reassign_instructor_validates_both_sides() {
        let store = RecordStore::new();
        let instructor = store.register_instructor("T", "t@x", "CS").unwrap();
        store
            .insert_course(Course::new("CS101", "Intro", CourseOptions::default()))
            .unwrap();

        let code = CourseCode::from("CS101");
        assert_eq!(
            store.reassign_instructor(&code, Some(InstructorId(99))),
            Err(RecordsError::NotFound(Entity::Instructor(InstructorId(99))))
        );
        assert_eq!(
            store.reassign_instructor(&CourseCode::from("XX1"), Some(instructor.id())),
            Err(RecordsError::NotFound(Entity::Course(CourseCode::from("XX1"))))
        );

        store.reassign_instructor(&code, Some(instructor.id())).unwrap();
        assert_eq!(store.courses_by_instructor(instructor.id()).len(), 1);

        store.reassign_instructor(&code, None).unwrap();
        assert!(store.courses_by_instructor(instructor.id()).is_empty());
    }

    #[test]
    fn status_update() {
        let store = RecordStore::new();
        let student = store.register_student("A", "a@x", "REG-A").unwrap();
        store
            .set_student_status(student.id(), StudentStatus::Graduated)
            .unwrap();
        assert_eq!(
            store.find_student(student.id()).unwrap().status(),
            StudentStatus::Graduated
        );
        assert_eq!(
            store.set_student_status(StudentId(77), StudentStatus::Inactive),
            Err(RecordsError::NotFound(Entity::Student(StudentId(77))))
        );
    }

    #[test]
    fn imported_date_is_one_year_back() {
        assert_eq!(
            imported_enrollment_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()),
            NaiveDate::from_ymd_opt(2023, 2, 28).unwrap()
        );
    }
}
