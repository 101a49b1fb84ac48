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

//! Transcript and GPA integration tests.

use ccrm::{
    Course, CourseCode, CourseOptions, Entity, EnrollmentEngine, Grade, RecordStore,
    RecordsError, StudentId, TranscriptGenerator,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn setup(codes: &[&str]) -> (RecordStore, StudentId) {
    let store = RecordStore::new();
    let student = store.register_student("Ada Lovelace", "ada@example.edu", "REG1001").unwrap();
    for code in codes {
        store
            .insert_course(Course::new(*code, *code, CourseOptions::default()))
            .unwrap();
    }
    (store, student.id())
}

fn code(text: &str) -> CourseCode {
    CourseCode::from(text)
}

#[test]
fn empty_transcript() {
    let (store, id) = setup(&[]);
    let transcript = TranscriptGenerator::new(&store).generate(id).unwrap();

    assert_eq!(transcript.gpa(), Decimal::ZERO);
    assert!(transcript.lines().is_empty());
    let rendered = transcript.to_string();
    assert!(rendered.contains("No courses enrolled"));
    assert!(rendered.contains("Cumulative GPA: 0.00"));
}

#[test]
fn ungraded_enrollments_give_zero_gpa() {
    let (store, id) = setup(&["CS101", "MA101"]);
    let engine = EnrollmentEngine::new(&store);
    engine.enroll(id, &code("CS101")).unwrap();
    engine.enroll(id, &code("MA101")).unwrap();

    let transcript = TranscriptGenerator::new(&store).generate(id).unwrap();
    assert_eq!(transcript.gpa(), Decimal::ZERO);
    assert_eq!(transcript.lines().len(), 2);
    assert!(transcript.to_string().contains("Grade: Not Graded"));
}

#[test]
fn single_a_gives_nine() {
    let (store, id) = setup(&["CS101"]);
    let engine = EnrollmentEngine::new(&store);
    engine.enroll(id, &code("CS101")).unwrap();
    engine.assign_grade(id, &code("CS101"), Grade::A).unwrap();

    let transcript = TranscriptGenerator::new(&store).generate(id).unwrap();
    assert_eq!(transcript.gpa(), dec!(9.0));
    assert!(transcript.to_string().contains("Cumulative GPA: 9.00"));
}

#[test]
fn s_and_f_average_to_five() {
    let (store, id) = setup(&["CS101", "MA101"]);
    let engine = EnrollmentEngine::new(&store);
    engine.enroll(id, &code("CS101")).unwrap();
    engine.enroll(id, &code("MA101")).unwrap();
    engine.assign_grade(id, &code("CS101"), Grade::S).unwrap();
    engine.assign_grade(id, &code("MA101"), Grade::F).unwrap();

    let transcript = TranscriptGenerator::new(&store).generate(id).unwrap();
    assert_eq!(transcript.gpa(), dec!(5.0));
}

#[test]
fn repeating_mean_is_rounded_in_report() {
    let (store, id) = setup(&["CS101", "MA101", "PH101"]);
    let engine = EnrollmentEngine::new(&store);
    for (c, grade) in [("CS101", Grade::S), ("MA101", Grade::S), ("PH101", Grade::F)] {
        engine.enroll(id, &code(c)).unwrap();
        engine.assign_grade(id, &code(c), grade).unwrap();
    }

    let transcript = TranscriptGenerator::new(&store).generate(id).unwrap();
    assert_eq!(transcript.gpa().round_dp(4), dec!(6.6667));
    assert!(transcript.to_string().contains("Cumulative GPA: 6.67\n"));
}

#[test]
fn gpa_ignores_credit_weight() {
    let store = RecordStore::new();
    let id = store.register_student("Ada", "ada@x", "REG1").unwrap().id();
    store
        .insert_course(Course::new(
            "BIG",
            "Five credits",
            CourseOptions {
                credits: 5,
                ..CourseOptions::default()
            },
        ))
        .unwrap();
    store
        .insert_course(Course::new(
            "SMALL",
            "One credit",
            CourseOptions {
                credits: 1,
                ..CourseOptions::default()
            },
        ))
        .unwrap();
    let engine = EnrollmentEngine::new(&store);
    engine.enroll(id, &code("BIG")).unwrap();
    engine.enroll(id, &code("SMALL")).unwrap();
    engine.assign_grade(id, &code("BIG"), Grade::S).unwrap();
    engine.assign_grade(id, &code("SMALL"), Grade::B).unwrap();

    let transcript = TranscriptGenerator::new(&store).generate(id).unwrap();
    assert_eq!(transcript.gpa(), dec!(9.0));
}

#[test]
fn regrade_is_reflected_in_listing_and_gpa() {
    let (store, id) = setup(&["CS101"]);
    let engine = EnrollmentEngine::new(&store);
    let generator = TranscriptGenerator::new(&store);
    engine.enroll(id, &code("CS101")).unwrap();

    engine.assign_grade(id, &code("CS101"), Grade::D).unwrap();
    let before = generator.generate(id).unwrap();
    assert_eq!(before.gpa(), dec!(6.0));
    assert_eq!(before.lines()[0].grade, Some(Grade::D));

    engine.assign_grade(id, &code("CS101"), Grade::S).unwrap();
    let after = generator.generate(id).unwrap();
    assert_eq!(after.gpa(), dec!(10.0));
    assert_eq!(after.lines().len(), 1);
    assert_eq!(after.lines()[0].grade, Some(Grade::S));
    assert!(after.to_string().contains("Grade: S"));
}

#[test]
fn repeated_generation_is_identical() {
    let (store, id) = setup(&["CS101", "MA101"]);
    let engine = EnrollmentEngine::new(&store);
    engine.enroll(id, &code("CS101")).unwrap();
    engine.enroll(id, &code("MA101")).unwrap();
    engine.assign_grade(id, &code("MA101"), Grade::B).unwrap();

    let generator = TranscriptGenerator::new(&store);
    let first = generator.generate(id).unwrap();
    let second = generator.generate(id).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn transcript_lists_profile_first() {
    let (store, id) = setup(&[]);
    let transcript = TranscriptGenerator::new(&store).generate(id).unwrap();
    assert_eq!(
        transcript.profile(),
        "STUDENT | ID: 1 | Name: Ada Lovelace | Reg No: REG1001 | Status: ACTIVE"
    );
    assert!(transcript.to_string().contains("ACADEMIC TRANSCRIPT"));
}

#[test]
fn unknown_student() {
    let (store, _) = setup(&[]);
    assert_eq!(
        TranscriptGenerator::new(&store).generate(StudentId(5)),
        Err(RecordsError::NotFound(Entity::Student(StudentId(5))))
    );
}
