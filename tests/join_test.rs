// Copyright 2025 Csvql Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::fs;

use csvql::{Database, Error, Value};
use tempfile::TempDir;

fn school_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("student.csv"),
        "id,name\n1,John\n2,Jane\n3,Bob\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("enrollment.csv"),
        "student_id,course\n1,Mathematics\n1,Physics\n2,Chemistry\n5,Biology\n",
    )
    .unwrap();
    let db = Database::open(dir.path());
    (dir, db)
}

#[test]
fn test_inner_join() {
    let (_dir, db) = school_db();
    let rows = db
        .query(
            "SELECT student.name, enrollment.course FROM student \
             INNER JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();

    // John twice, Jane once; Bob and Biology drop out
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("student.name"), Some(&Value::text("John")));
    assert_eq!(
        rows[0].get("enrollment.course"),
        Some(&Value::text("Mathematics"))
    );
    assert_eq!(rows[2].get("student.name"), Some(&Value::text("Jane")));
}

#[test]
fn test_inner_join_with_where() {
    let (_dir, db) = school_db();
    let rows = db
        .query(
            "SELECT student.name, enrollment.course FROM student \
             INNER JOIN enrollment ON student.id = enrollment.student_id \
             WHERE student.name = John",
        )
        .unwrap();

    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.get("student.name"), Some(&Value::text("John")));
    }
}

#[test]
fn test_left_join_keeps_unmatched_main_rows() {
    let (_dir, db) = school_db();
    let rows = db
        .query(
            "SELECT student.name, enrollment.course FROM student \
             LEFT JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();

    // 2 for John + 1 for Jane + 1 null-extended for Bob
    assert_eq!(rows.len(), 4);
    let bob = &rows[3];
    assert_eq!(bob.get("student.name"), Some(&Value::text("Bob")));
    assert_eq!(bob.get("enrollment.course"), Some(&Value::Null));
}

#[test]
fn test_left_join_row_count_at_least_main() {
    let (_dir, db) = school_db();
    let main_count = db.query("SELECT id FROM student").unwrap().len();
    let rows = db
        .query(
            "SELECT student.name FROM student \
             LEFT JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();
    assert!(rows.len() >= main_count);
}

#[test]
fn test_right_join_row_count_equals_join_side() {
    let (_dir, db) = school_db();
    let join_count = db.query("SELECT course FROM enrollment").unwrap().len();
    let rows = db
        .query(
            "SELECT student.name, enrollment.course FROM student \
             RIGHT JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();
    assert_eq!(rows.len(), join_count);
}

#[test]
fn test_right_join_unmatched_join_rows_null_extend() {
    let (_dir, db) = school_db();
    let rows = db
        .query(
            "SELECT student.name, enrollment.course FROM student \
             RIGHT JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();

    let biology = rows
        .iter()
        .find(|r| r.get("enrollment.course") == Some(&Value::text("Biology")))
        .expect("Biology row present");
    assert_eq!(biology.get("student.name"), Some(&Value::Null));
}

#[test]
fn test_join_with_filter_on_joined_field() {
    let (_dir, db) = school_db();
    let rows = db
        .query(
            "SELECT student.name, enrollment.course FROM student \
             INNER JOIN enrollment ON student.id = enrollment.student_id \
             WHERE enrollment.course = 'Physics'",
        )
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("student.name"), Some(&Value::text("John")));
}

#[test]
fn test_join_on_unknown_qualifier_fails() {
    let (_dir, db) = school_db();
    let err = db
        .query(
            "SELECT student.name FROM student \
             INNER JOIN enrollment ON teacher.id = enrollment.student_id",
        )
        .unwrap_err();
    assert!(matches!(err, Error::FieldResolution { .. }));
}

#[test]
fn test_join_missing_table() {
    let (_dir, db) = school_db();
    let err = db
        .query(
            "SELECT student.name FROM student \
             INNER JOIN grade ON student.id = grade.student_id",
        )
        .unwrap_err();
    assert!(matches!(err, Error::TableNotFound(_)));
}

#[test]
fn test_join_with_empty_join_table() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("student.csv"), "id,name\n1,John\n").unwrap();
    fs::write(dir.path().join("enrollment.csv"), "student_id,course\n").unwrap();
    let db = Database::open(dir.path());

    let rows = db
        .query(
            "SELECT student.name, enrollment.course FROM student \
             INNER JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();
    assert!(rows.is_empty());

    let rows = db
        .query(
            "SELECT student.name, enrollment.course FROM student \
             LEFT JOIN enrollment ON student.id = enrollment.student_id",
        )
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].get("enrollment.course"), Some(&Value::Null));
}
