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

//! CSV import and export.
//!
//! # Import
//!
//! [`load_initial_data`] reads up to four files from a data directory, in
//! dependency order:
//!
//! | File | Columns |
//! |------|---------|
//! | `instructors.csv` | `id, name, email[, department]` |
//! | `students.csv` | `id, name, email` |
//! | `courses.csv` | `code, title, credits, instructor id, semester` |
//! | `enrollments.csv` | `student id, course code, grade or N/A` |
//!
//! The first row of each file is a header. Short or malformed rows are
//! skipped. A missing or unreadable file is logged and the remaining files
//! are still loaded.
//!
//! # Export
//!
//! [`export_data`] writes `students_export.csv`, `courses_export.csv` and
//! `enrollments_export.csv`, each with a header row, overwriting old files.

use crate::base::{CourseCode, InstructorId, StudentId};
use crate::course::{Course, CourseOptions, Semester};
use crate::engine::EnrollmentEngine;
use crate::error::StorageError;
use crate::grade::Grade;
use crate::person::{Instructor, Student};
use crate::store::{RecordStore, imported_enrollment_date};
use chrono::Local;
use csv::{ReaderBuilder, StringRecord, Trim, Writer};
use log::{info, warn};
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

pub const INSTRUCTORS_FILE: &str = "instructors.csv";
pub const STUDENTS_FILE: &str = "students.csv";
pub const COURSES_FILE: &str = "courses.csv";
pub const ENROLLMENTS_FILE: &str = "enrollments.csv";

pub const STUDENTS_EXPORT: &str = "students_export.csv";
pub const COURSES_EXPORT: &str = "courses_export.csv";
pub const ENROLLMENTS_EXPORT: &str = "enrollments_export.csv";

const UNGRADED: &str = "N/A";

/// Counts of what an import accepted and skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub instructors: usize,
    pub students: usize,
    pub courses: usize,
    pub enrollments: usize,
    pub skipped: usize,
    pub failed_files: usize,
}

/// Files written by an export and files that failed.
#[derive(Debug, Default)]
pub struct ExportReport {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, StorageError)>,
}

impl ExportReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Imports every known file under `data_dir` into `store`.
///
/// Never fails as a whole: whatever loads is kept.
pub fn load_initial_data(store: &RecordStore, data_dir: &Path) -> LoadReport {
    info!("loading initial data from {}", data_dir.display());
    let mut report = LoadReport::default();

    let loaders: [(&str, fn(&RecordStore, File, &mut LoadReport) -> Result<(), StorageError>); 4] = [
        (INSTRUCTORS_FILE, load_instructors::<File>),
        (STUDENTS_FILE, load_students::<File>),
        (COURSES_FILE, load_courses::<File>),
        (ENROLLMENTS_FILE, load_enrollments::<File>),
    ];

    for (name, loader) in loaders {
        let path = data_dir.join(name);
        if !path.exists() {
            warn!("{} not found, skipping", path.display());
            continue;
        }
        let result = File::open(&path)
            .map_err(StorageError::from)
            .and_then(|file| loader(store, file, &mut report));
        if let Err(e) = result {
            warn!("failed to load {}: {}", path.display(), e);
            report.failed_files += 1;
        }
    }

    info!(
        "loaded {} instructors, {} students, {} courses, {} enrollments ({} rows skipped)",
        report.instructors, report.students, report.courses, report.enrollments, report.skipped
    );
    report
}

fn reader<R: Read>(reader: R) -> csv::Reader<R> {
    ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .has_headers(true)
        .from_reader(reader)
}

/// Runs `parse` over each row, counting the rows it rejects.
///
/// Malformed rows are skipped; an I/O failure stops the file.
fn for_each_row<R: Read>(
    source: R,
    report: &mut LoadReport,
    mut parse: impl FnMut(&StringRecord) -> Option<()>,
) -> Result<(), StorageError> {
    for (index, result) in reader(source).records().enumerate() {
        let accepted = match result {
            Ok(record) => parse(&record).is_some(),
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                warn!("row {}: unreadable: {}", index + 2, e);
                false
            }
        };
        if !accepted {
            report.skipped += 1;
        }
    }
    Ok(())
}

fn field<'r>(record: &'r StringRecord, index: usize) -> Option<&'r str> {
    record.get(index).filter(|value| !value.is_empty())
}

/// Loads instructor rows: `id, name, email[, department]`.
pub fn load_instructors<R: Read>(
    store: &RecordStore,
    source: R,
    report: &mut LoadReport,
) -> Result<(), StorageError> {
    let mut loaded = 0;
    for_each_row(source, report, |record| {
        let id = field(record, 0)?.parse::<u32>().ok().map(InstructorId)?;
        let name = field(record, 1)?;
        let email = field(record, 2)?;
        let department = field(record, 3).unwrap_or("General");
        store
            .insert_instructor(Instructor::new(id, name, email, department))
            .map_err(|e| warn!("instructor row skipped: {e}"))
            .ok()?;
        loaded += 1;
        Some(())
    })?;
    report.instructors += loaded;
    Ok(())
}

/// Loads student rows: `id, name, email`.
///
/// Registration numbers are derived as `REG<id>`; the enrollment date is
/// set one year back.
pub fn load_students<R: Read>(
    store: &RecordStore,
    source: R,
    report: &mut LoadReport,
) -> Result<(), StorageError> {
    let enrolled_on = imported_enrollment_date(Local::now().date_naive());
    let mut loaded = 0;
    for_each_row(source, report, |record| {
        let id = field(record, 0)?.parse::<u32>().ok().map(StudentId)?;
        let name = field(record, 1)?;
        let email = field(record, 2)?;
        let student = Student::new(id, name, email, format!("REG{id}"), enrolled_on);
        store
            .insert_student(student)
            .map_err(|e| warn!("student row skipped: {e}"))
            .ok()?;
        loaded += 1;
        Some(())
    })?;
    report.students += loaded;
    Ok(())
}

/// Loads course rows: `code, title, credits, instructor id, semester`.
///
/// Instructor id `0` means unassigned. Departments are not part of the
/// import format and take the default.
pub fn load_courses<R: Read>(
    store: &RecordStore,
    source: R,
    report: &mut LoadReport,
) -> Result<(), StorageError> {
    let mut loaded = 0;
    for_each_row(source, report, |record| {
        if record.len() < 5 {
            return None;
        }
        let code = field(record, 0)?;
        let title = field(record, 1)?;
        let credits = field(record, 2)?.parse::<u32>().ok().filter(|c| *c > 0)?;
        let instructor = field(record, 3)?.parse::<u32>().ok()?;
        let semester = field(record, 4)?
            .parse::<Semester>()
            .map_err(|e| warn!("course row skipped: {e}"))
            .ok()?;
        let options = CourseOptions {
            credits,
            semester,
            instructor: (instructor != 0).then_some(InstructorId(instructor)),
            ..CourseOptions::default()
        };
        store
            .insert_course(Course::new(code, title, options))
            .map_err(|e| warn!("course row skipped: {e}"))
            .ok()?;
        loaded += 1;
        Some(())
    })?;
    report.courses += loaded;
    Ok(())
}

/// Restores enrollment rows: `student id, course code, grade`.
///
/// Rows go through the [`EnrollmentEngine`], so they obey the same rules as
/// interactive enrollments. A grade of `N/A` leaves the enrollment ungraded.
/// Restored enrollments carry the same date as imported students.
pub fn load_enrollments<R: Read>(
    store: &RecordStore,
    source: R,
    report: &mut LoadReport,
) -> Result<(), StorageError> {
    let engine = EnrollmentEngine::new(store);
    let enrolled_on = imported_enrollment_date(Local::now().date_naive());
    let mut loaded = 0;
    for_each_row(source, report, |record| {
        let student = field(record, 0)?.parse::<u32>().ok().map(StudentId)?;
        let course = CourseCode::from(field(record, 1)?);
        let grade = match field(record, 2) {
            None | Some(UNGRADED) => None,
            Some(text) => Some(
                text.parse::<Grade>()
                    .map_err(|e| warn!("enrollment row skipped: {e}"))
                    .ok()?,
            ),
        };

        let enrollment = engine
            .enroll_on(student, &course, enrolled_on)
            .map_err(|e| warn!("enrollment row skipped: {e}"))
            .ok()?;
        if let Some(grade) = grade {
            engine
                .assign_grade(student, enrollment.course_code(), grade)
                .map_err(|e| warn!("grade for enrollment row dropped: {e}"))
                .ok()?;
        }
        loaded += 1;
        Some(())
    })?;
    report.enrollments += loaded;
    Ok(())
}

/// Writes every export file into `export_dir`, creating it if needed.
///
/// # Errors
///
/// Only creating the directory is fatal. Individual file failures are
/// logged and collected in the [`ExportReport`].
pub fn export_data(store: &RecordStore, export_dir: &Path) -> Result<ExportReport, StorageError> {
    info!("exporting current data to {}", export_dir.display());
    fs::create_dir_all(export_dir)?;

    let mut report = ExportReport::default();
    let exports: [(&str, fn(&RecordStore, File) -> Result<(), StorageError>); 3] = [
        (STUDENTS_EXPORT, write_students::<File>),
        (COURSES_EXPORT, write_courses::<File>),
        (ENROLLMENTS_EXPORT, write_enrollments::<File>),
    ];

    for (name, write) in exports {
        let path = export_dir.join(name);
        match File::create(&path)
            .map_err(StorageError::from)
            .and_then(|file| write(store, file))
        {
            Ok(()) => report.written.push(path),
            Err(e) => {
                warn!("failed to export {}: {}", path.display(), e);
                report.failed.push((path, e));
            }
        }
    }

    Ok(report)
}

/// Columns: `ID,FullName,Email,RegistrationNumber,Status,EnrollmentDate`
pub fn write_students<W: Write>(store: &RecordStore, writer: W) -> Result<(), StorageError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record([
        "ID",
        "FullName",
        "Email",
        "RegistrationNumber",
        "Status",
        "EnrollmentDate",
    ])?;
    for student in store.all_students() {
        wtr.write_record([
            student.id().to_string(),
            student.full_name().to_string(),
            student.email().to_string(),
            student.registration_number().to_string(),
            student.status().to_string(),
            student.enrolled_on().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Columns: `CourseCode,Title,Credits,InstructorID,Semester`
pub fn write_courses<W: Write>(store: &RecordStore, writer: W) -> Result<(), StorageError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["CourseCode", "Title", "Credits", "InstructorID", "Semester"])?;
    for course in store.all_courses() {
        wtr.write_record([
            course.code().to_string(),
            course.title().to_string(),
            course.credits().to_string(),
            course.instructor().map_or(0, |id| id.0).to_string(),
            course.semester().to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Columns: `StudentID,CourseCode,Grade`, with `N/A` for ungraded rows.
pub fn write_enrollments<W: Write>(store: &RecordStore, writer: W) -> Result<(), StorageError> {
    let mut wtr = Writer::from_writer(writer);
    wtr.write_record(["StudentID", "CourseCode", "Grade"])?;
    for student in store.all_students() {
        for enrollment in student.enrollments() {
            wtr.write_record([
                enrollment.student_id().to_string(),
                enrollment.course_code().to_string(),
                enrollment
                    .grade()
                    .map_or(UNGRADED, Grade::letter)
                    .to_string(),
            ])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn parse_students_skips_short_and_bad_rows() {
        let store = RecordStore::new();
        let mut report = LoadReport::default();
        let csv = "id,name,email\n\
                   1,Ada Lovelace,ada@example.edu\n\
                   2,Missing Email\n\
                   x,Bad Id,bad@example.edu\n\
                   3, Grace Hopper , grace@example.edu \n";
        load_students(&store, Cursor::new(csv), &mut report).unwrap();

        assert_eq!(report.students, 2);
        assert_eq!(report.skipped, 2);
        let grace = store.find_student(StudentId(3)).unwrap();
        assert_eq!(grace.full_name(), "Grace Hopper");
        assert_eq!(grace.registration_number(), "REG3");
    }

    #[test]
    fn parse_instructor_department_defaults() {
        let store = RecordStore::new();
        let mut report = LoadReport::default();
        let csv = "id,name,email,department\n\
                   1,Alan Turing,alan@example.edu\n\
                   2,Emmy Noether,emmy@example.edu,Math\n";
        load_instructors(&store, Cursor::new(csv), &mut report).unwrap();

        assert_eq!(report.instructors, 2);
        assert_eq!(store.find_instructor(InstructorId(1)).unwrap().department(), "General");
        assert_eq!(store.find_instructor(InstructorId(2)).unwrap().department(), "Math");
    }

    #[test]
    fn parse_courses() {
        let store = RecordStore::new();
        let mut report = LoadReport::default();
        let csv = "code,title,credits,instructor,semester\n\
                   CS101,Intro to Programming,4,1,fall\n\
                   MA201,Linear Algebra,3,0,WINTER\n\
                   PH100,Physics,3,0,SPRING\n\
                   BI100,Biology,0,0,FALL\n\
                   EN100,English,3\n";
        load_courses(&store, Cursor::new(csv), &mut report).unwrap();

        assert_eq!(report.courses, 2);
        assert_eq!(report.skipped, 3);
        let cs = store.find_course(&"cs101".into()).unwrap();
        assert_eq!(cs.credits(), 4);
        assert_eq!(cs.instructor(), Some(InstructorId(1)));
        assert_eq!(cs.semester(), Semester::Fall);
        let ma = store.find_course(&"MA201".into()).unwrap();
        assert_eq!(ma.instructor(), None);
    }

    #[test]
    fn write_enrollments_marks_ungraded() {
        let store = RecordStore::new();
        let student = store.register_student("Ada", "ada@x", "REG1").unwrap();
        store
            .insert_course(Course::new("CS101", "Intro", CourseOptions::default()))
            .unwrap();
        store
            .insert_course(Course::new("MA101", "Calc", CourseOptions::default()))
            .unwrap();
        let engine = EnrollmentEngine::new(&store);
        engine.enroll(student.id(), &"CS101".into()).unwrap();
        engine.enroll(student.id(), &"MA101".into()).unwrap();
        engine
            .assign_grade(student.id(), &"CS101".into(), Grade::B)
            .unwrap();

        let mut output = Vec::new();
        write_enrollments(&store, &mut output).unwrap();
        let output = String::from_utf8(output).unwrap();
        assert_eq!(output, "StudentID,CourseCode,Grade\n1,CS101,B\n1,MA101,N/A\n");
    }

    #[test]
    fn restored_enrollments_share_student_import_date() {
        let store = RecordStore::new();
        let mut report = LoadReport::default();
        load_students(&store, Cursor::new("id,name,email\n1,Ada,ada@x\n"), &mut report).unwrap();
        store
            .insert_course(Course::new("CS101", "Intro", CourseOptions::default()))
            .unwrap();
        load_enrollments(&store, Cursor::new("s,c,g\n1,CS101,A\n"), &mut report).unwrap();

        let ada = store.find_student(StudentId(1)).unwrap();
        assert_eq!(report.enrollments, 1);
        assert_eq!(ada.enrollments()[0].enrolled_on(), ada.enrolled_on());
        assert!(ada.enrolled_on() < Local::now().date_naive());
    }
}
