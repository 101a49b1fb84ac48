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

//! # CCRM
//!
//! Campus course and records manager: students, instructors, courses and
//! enrollments kept in memory, with enrollment rules, transcripts, CSV
//! import/export and directory backups.
//!
//! ## Core Components
//!
//! - [`RecordStore`]: Owns every record and issues identifiers
//! - [`EnrollmentEngine`]: Enrolls students and assigns grades under the enrollment rules
//! - [`TranscriptGenerator`]: Builds a [`Transcript`] and GPA for a student
//! - [`RecordsError`]: Business-rule and lookup failures
//!
//! ## Example
//!
//! ```
//! use ccrm::{Course, CourseOptions, EnrollmentEngine, RecordStore, RecordsError, Semester};
//!
//! let store = RecordStore::new();
//! let student = store.register_student("Ada Lovelace", "ada@example.edu", "REG1001").unwrap();
//! store
//!     .insert_course(Course::new(
//!         "CS101",
//!         "Intro to Programming",
//!         CourseOptions { credits: 4, semester: Semester::Fall, ..CourseOptions::default() },
//!     ))
//!     .unwrap();
//!
//! let engine = EnrollmentEngine::new(&store);
//! engine.enroll(student.id(), &"cs101".into()).unwrap();
//!
//! // A second enrollment in the same course is rejected.
//! assert!(matches!(
//!     engine.enroll(student.id(), &"CS101".into()),
//!     Err(RecordsError::DuplicateEnrollment { .. })
//! ));
//! ```
//!
//! ## Concurrency
//!
//! The store is built on [`dashmap`] and [`parking_lot`] so it can be shared,
//! but the application drives it from a single interactive session.

pub mod backup;
mod base;
mod course;
mod engine;
mod enrollment;
pub mod error;
mod grade;
mod person;
pub mod persistence;
pub mod shell;
mod store;
mod transcript;

pub use base::{CourseCode, InstructorId, StudentId};
pub use course::{Course, CourseOptions, Semester};
pub use engine::{EnrollmentEngine, MAX_CREDITS_PER_SEMESTER};
pub use enrollment::{Enrollment, EnrollmentStatus};
pub use error::{Entity, RecordsError, StorageError};
pub use grade::Grade;
pub use person::{Instructor, PersonDetails, Profile, Student, StudentStatus};
pub use store::RecordStore;
pub use transcript::{Transcript, TranscriptGenerator, TranscriptLine, calculate_gpa};
