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

//! Menu-driven text interface.
//!
//! The shell reads commands from any [`BufRead`] and writes prompts and
//! results to any [`Write`], so a whole session can be scripted in tests.
//! Business-rule failures are printed and the menu continues; end of input
//! ends the session.

use crate::backup::create_backup;
use crate::base::{CourseCode, InstructorId, StudentId};
use crate::engine::EnrollmentEngine;
use crate::error::StorageError;
use crate::grade::Grade;
use crate::person::{Profile, StudentStatus};
use crate::persistence::export_data;
use crate::store::RecordStore;
use crate::transcript::TranscriptGenerator;
use chrono::Local;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

/// Directories the file utilities work with.
#[derive(Debug, Clone)]
pub struct ShellPaths {
    pub export_dir: PathBuf,
    pub backup_dir: PathBuf,
}

enum Flow {
    Continue,
    Exit,
}

pub struct Shell<'a, R, W> {
    store: &'a RecordStore,
    paths: ShellPaths,
    input: R,
    output: W,
}

impl<'a, R: BufRead, W: Write> Shell<'a, R, W> {
    pub fn new(store: &'a RecordStore, paths: ShellPaths, input: R, output: W) -> Self {
        Self {
            store,
            paths,
            input,
            output,
        }
    }

    /// Runs the main menu until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "======================================================")?;
        writeln!(self.output, " Welcome to the Campus Course & Records Manager (CCRM)")?;
        writeln!(self.output, "======================================================")?;

        loop {
            writeln!(self.output, "\n--- Main Menu ---")?;
            writeln!(self.output, "1. Manage Students")?;
            writeln!(self.output, "2. Manage Courses")?;
            writeln!(self.output, "3. Manage Enrollments & Grades")?;
            writeln!(self.output, "4. File Utilities")?;
            writeln!(self.output, "5. Exit")?;

            let Some(choice) = self.prompt_number("Enter your choice: ")? else {
                break;
            };
            let flow = match choice {
                1 => self.student_menu()?,
                2 => self.course_menu()?,
                3 => self.enrollment_menu()?,
                4 => self.file_menu()?,
                5 => break,
                _ => {
                    writeln!(self.output, "Invalid choice. Please enter a number between 1 and 5.")?;
                    Flow::Continue
                }
            };
            if let Flow::Exit = flow {
                break;
            }
        }

        writeln!(self.output, "\nThank you for using CCRM. Goodbye!")?;
        self.output.flush()
    }

    /// Prints `message` and reads one trimmed line. `None` at end of input.
    fn prompt_line(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    /// Re-prompts until a number is entered. `None` at end of input.
    fn prompt_number(&mut self, message: &str) -> io::Result<Option<u32>> {
        let mut message = message;
        loop {
            let Some(line) = self.prompt_line(message)? else {
                return Ok(None);
            };
            match line.parse() {
                Ok(number) => return Ok(Some(number)),
                Err(_) => message = "Invalid input. Please enter a number: ",
            }
        }
    }

    fn student_menu(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- Student Management ---")?;
        writeln!(self.output, "1. Add New Student")?;
        writeln!(self.output, "2. List All Students")?;
        writeln!(self.output, "3. View Student Profile & Transcript")?;
        writeln!(self.output, "4. Change Student Status")?;
        writeln!(self.output, "5. Back to Main Menu")?;
        let Some(choice) = self.prompt_number("Enter your choice: ")? else {
            return Ok(Flow::Exit);
        };
        match choice {
            1 => self.add_student(),
            2 => {
                writeln!(self.output, "\n--- List of All Students ---")?;
                for student in self.store.all_students() {
                    writeln!(self.output, "{}", student.profile())?;
                }
                Ok(Flow::Continue)
            }
            3 => self.view_transcript(),
            4 => self.change_status(),
            5 => {
                writeln!(self.output, "Returning to Main Menu...")?;
                Ok(Flow::Continue)
            }
            _ => {
                writeln!(self.output, "Invalid choice.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn add_student(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- Add New Student ---")?;
        let Some(name) = self.prompt_line("Enter Full Name: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(email) = self.prompt_line("Enter Email: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(registration) = self.prompt_line("Enter Registration Number (e.g., REG1006): ")?
        else {
            return Ok(Flow::Exit);
        };
        match self.store.register_student(name, email, registration) {
            Ok(student) => {
                writeln!(self.output, "Student added successfully!")?;
                writeln!(self.output, "{}", student.profile())?;
            }
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn view_transcript(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_number("Enter Student ID to view profile: ")? else {
            return Ok(Flow::Exit);
        };
        match TranscriptGenerator::new(self.store).generate(StudentId(id)) {
            Ok(transcript) => write!(self.output, "{transcript}")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn change_status(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_number("Enter Student ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(choice) = self.prompt_number("New status (1. ACTIVE, 2. INACTIVE, 3. GRADUATED): ")?
        else {
            return Ok(Flow::Exit);
        };
        let status = match choice {
            1 => StudentStatus::Active,
            2 => StudentStatus::Inactive,
            3 => StudentStatus::Graduated,
            _ => {
                writeln!(self.output, "Invalid choice.")?;
                return Ok(Flow::Continue);
            }
        };
        match self.store.set_student_status(StudentId(id), status) {
            Ok(()) => writeln!(self.output, "Status updated to {status}.")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn course_menu(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- Course Management ---")?;
        writeln!(self.output, "1. List All Courses")?;
        writeln!(self.output, "2. Search Courses by Instructor ID")?;
        writeln!(self.output, "3. Assign Instructor to Course")?;
        writeln!(self.output, "4. Back to Main Menu")?;
        let Some(choice) = self.prompt_number("Enter your choice: ")? else {
            return Ok(Flow::Exit);
        };
        match choice {
            1 => {
                writeln!(self.output, "\n--- List of All Courses ---")?;
                for course in self.store.all_courses() {
                    writeln!(self.output, "{course}")?;
                }
            }
            2 => {
                let Some(id) = self.prompt_number("Enter Instructor ID to search courses: ")? else {
                    return Ok(Flow::Exit);
                };
                writeln!(self.output, "\n--- Courses taught by Instructor ID: {id} ---")?;
                let courses = self.store.courses_by_instructor(InstructorId(id));
                if courses.is_empty() {
                    writeln!(self.output, "No courses found for this instructor.")?;
                }
                for course in courses {
                    writeln!(self.output, "{course}")?;
                }
            }
            3 => return self.assign_instructor(),
            4 => writeln!(self.output, "Returning to Main Menu...")?,
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(Flow::Continue)
    }

    fn assign_instructor(&mut self) -> io::Result<Flow> {
        let Some(code) = self.prompt_line("Enter Course Code: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(id) = self.prompt_number("Enter Instructor ID (0 to unassign): ")? else {
            return Ok(Flow::Exit);
        };
        let instructor = (id != 0).then_some(InstructorId(id));
        match self
            .store
            .reassign_instructor(&CourseCode::from(code), instructor)
        {
            Ok(()) => writeln!(self.output, "Instructor updated.")?,
            Err(e) => writeln!(self.output, "Error: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn enrollment_menu(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- Enrollment & Grade Management ---")?;
        writeln!(self.output, "1. Enroll Student in a Course")?;
        writeln!(self.output, "2. Assign Grade to Student")?;
        writeln!(self.output, "3. Back to Main Menu")?;
        let Some(choice) = self.prompt_number("Enter your choice: ")? else {
            return Ok(Flow::Exit);
        };
        match choice {
            1 => self.enroll(),
            2 => self.assign_grade(),
            3 => {
                writeln!(self.output, "Returning to Main Menu...")?;
                Ok(Flow::Continue)
            }
            _ => {
                writeln!(self.output, "Invalid choice.")?;
                Ok(Flow::Continue)
            }
        }
    }

    fn enroll(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_number("Enter Student ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(code) = self.prompt_line("Enter Course Code (e.g., CS101): ")? else {
            return Ok(Flow::Exit);
        };
        match EnrollmentEngine::new(self.store).enroll(StudentId(id), &CourseCode::from(code)) {
            Ok(_) => writeln!(self.output, "Enrollment successful!")?,
            Err(e) => writeln!(self.output, "Enrollment Failed: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn assign_grade(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_number("Enter Student ID: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(code) = self.prompt_line("Enter Course Code: ")? else {
            return Ok(Flow::Exit);
        };
        let Some(text) = self.prompt_line("Enter Grade (S, A, B, C, D, E, F): ")? else {
            return Ok(Flow::Exit);
        };
        let grade = match text.parse::<Grade>() {
            Ok(grade) => grade,
            Err(e) => {
                writeln!(self.output, "Invalid Grade: {e}")?;
                return Ok(Flow::Continue);
            }
        };
        match EnrollmentEngine::new(self.store).assign_grade(
            StudentId(id),
            &CourseCode::from(code),
            grade,
        ) {
            Ok(()) => writeln!(self.output, "Grade assigned successfully!")?,
            Err(e) => writeln!(self.output, "Failed to assign grade: {e}")?,
        }
        Ok(Flow::Continue)
    }

    fn file_menu(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "\n--- File Utilities ---")?;
        writeln!(self.output, "1. Export All Data")?;
        writeln!(self.output, "2. Create Backup of Exported Data")?;
        writeln!(self.output, "3. Back to Main Menu")?;
        let Some(choice) = self.prompt_number("Enter your choice: ")? else {
            return Ok(Flow::Exit);
        };
        match choice {
            1 => match export_data(self.store, &self.paths.export_dir) {
                Ok(report) if report.is_complete() => writeln!(
                    self.output,
                    "Data successfully exported to '{}'.",
                    self.paths.export_dir.display()
                )?,
                Ok(report) => writeln!(
                    self.output,
                    "Export finished with {} failed file(s).",
                    report.failed.len()
                )?,
                Err(e) => writeln!(self.output, "Error exporting data: {e}")?,
            },
            2 => match create_backup(
                &self.paths.export_dir,
                &self.paths.backup_dir,
                Local::now().naive_local(),
            ) {
                Ok(report) => {
                    writeln!(
                        self.output,
                        "Backup created successfully at: {}",
                        report.target.display()
                    )?;
                    writeln!(
                        self.output,
                        "Total size of the new backup is: {:.2} KB",
                        report.size_kib()
                    )?;
                }
                Err(e @ StorageError::MissingSource(_)) => {
                    writeln!(self.output, "Backup failed: {e}. Please export data first.")?
                }
                Err(e) => writeln!(self.output, "An error occurred while creating the backup: {e}")?,
            },
            3 => writeln!(self.output, "Returning to Main Menu...")?,
            _ => writeln!(self.output, "Invalid choice.")?,
        }
        Ok(Flow::Continue)
    }
}
