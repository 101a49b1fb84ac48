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

//! Students and instructors.
//!
//! Both carry a [`PersonDetails`] block and describe themselves through the
//! [`Profile`] trait.
//!
//! # Example
//!
//! ```
//! use ccrm::{Profile, Student, StudentId};
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
//! let student = Student::new(StudentId(1), "Ada Lovelace", "ada@example.edu", "REG1", date);
//! assert_eq!(
//!     student.profile(),
//!     "STUDENT | ID: 1 | Name: Ada Lovelace | Reg No: REG1 | Status: ACTIVE"
//! );
//! ```

use crate::base::{InstructorId, StudentId};
use crate::enrollment::Enrollment;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Produces a one-record human readable summary.
pub trait Profile {
    fn profile(&self) -> String;
}

/// Fields shared by every person on record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonDetails {
    pub full_name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
}

impl fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StudentStatus::Active => "ACTIVE",
            StudentStatus::Inactive => "INACTIVE",
            StudentStatus::Graduated => "GRADUATED",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    id: StudentId,
    details: PersonDetails,
    registration_number: String,
    status: StudentStatus,
    enrolled_on: NaiveDate,
    /// Insertion order is enrollment order.
    enrollments: Vec<Enrollment>,
}

impl Student {
    pub fn new(
        id: StudentId,
        full_name: impl Into<String>,
        email: impl Into<String>,
        registration_number: impl Into<String>,
        enrolled_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            details: PersonDetails {
                full_name: full_name.into(),
                email: email.into(),
            },
            registration_number: registration_number.into(),
            status: StudentStatus::Active,
            enrolled_on,
            enrollments: Vec::new(),
        }
    }

    pub fn id(&self) -> StudentId {
        self.id
    }

    pub fn details(&self) -> &PersonDetails {
        &self.details
    }

    pub fn full_name(&self) -> &str {
        &self.details.full_name
    }

    pub fn email(&self) -> &str {
        &self.details.email
    }

    pub fn registration_number(&self) -> &str {
        &self.registration_number
    }

    pub fn status(&self) -> StudentStatus {
        self.status
    }

    pub fn enrolled_on(&self) -> NaiveDate {
        self.enrolled_on
    }

    pub fn enrollments(&self) -> &[Enrollment] {
        &self.enrollments
    }

    pub(crate) fn set_status(&mut self, status: StudentStatus) {
        self.status = status;
    }

    pub(crate) fn enrollments_mut(&mut self) -> &mut Vec<Enrollment> {
        &mut self.enrollments
    }
}

impl Profile for Student {
    fn profile(&self) -> String {
        format!(
            "STUDENT | ID: {} | Name: {} | Reg No: {} | Status: {}",
            self.id, self.details.full_name, self.registration_number, self.status
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instructor {
    id: InstructorId,
    details: PersonDetails,
    department: String,
}

impl Instructor {
    pub fn new(
        id: InstructorId,
        full_name: impl Into<String>,
        email: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id,
            details: PersonDetails {
                full_name: full_name.into(),
                email: email.into(),
            },
            department: department.into(),
        }
    }

    pub fn id(&self) -> InstructorId {
        self.id
    }

    pub fn details(&self) -> &PersonDetails {
        &self.details
    }

    pub fn full_name(&self) -> &str {
        &self.details.full_name
    }

    pub fn email(&self) -> &str {
        &self.details.email
    }

    pub fn department(&self) -> &str {
        &self.department
    }
}

impl Profile for Instructor {
    fn profile(&self) -> String {
        format!(
            "Instructor Profile:\n  ID: {}\n  Name: {}\n  Department: {}",
            self.id, self.details.full_name, self.department
        )
    }
}

impl fmt::Display for Instructor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Instructor[ID={}, Name={}, Dept={}]",
            self.id, self.details.full_name, self.department
        )
    }
}
