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

use csvql::{Database, Value};
use tempfile::TempDir;

fn student_db() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("student.csv"),
        "id,name,age\n1,John,30\n2,Jane,25\n3,Bob,22\n4,Alice,25\n",
    )
    .unwrap();
    let db = Database::open(dir.path());
    (dir, db)
}

#[test]
fn test_order_by_asc() {
    let (_dir, db) = student_db();
    let rows = db.query("SELECT name FROM student ORDER BY age ASC").unwrap();

    let names: Vec<String> = rows
        .iter()
        .map(|r| r.get("name").unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Bob", "Jane", "Alice", "John"]);
}

#[test]
fn test_order_by_desc() {
    let (_dir, db) = student_db();
    let rows = db
        .query("SELECT name FROM student ORDER BY age DESC")
        .unwrap();
    assert_eq!(rows[0].get("name"), Some(&Value::text("John")));
    assert_eq!(rows[3].get("name"), Some(&Value::text("Bob")));
}

#[test]
fn test_order_by_default_direction_is_asc() {
    let (_dir, db) = student_db();
    let explicit = db.query("SELECT id FROM student ORDER BY age ASC").unwrap();
    let implicit = db.query("SELECT id FROM student ORDER BY age").unwrap();
    assert_eq!(explicit, implicit);
}

#[test]
fn test_order_by_is_numeric() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("n.csv"), "v\n10\n9\n100\n").unwrap();
    let db = Database::open(dir.path());

    let rows = db.query("SELECT v FROM n ORDER BY v ASC").unwrap();
    let values: Vec<String> = rows.iter().map(|r| r.get("v").unwrap().to_string()).collect();
    assert_eq!(values, vec!["9", "10", "100"]);
}

#[test]
fn test_order_by_ties_keep_input_order() {
    let (_dir, db) = student_db();
    let rows = db.query("SELECT name FROM student ORDER BY age ASC").unwrap();
    // Jane (row 2) precedes Alice (row 4) within the age-25 tie
    assert_eq!(rows[1].get("name"), Some(&Value::text("Jane")));
    assert_eq!(rows[2].get("name"), Some(&Value::text("Alice")));
}

#[test]
fn test_order_by_multiple_fields() {
    let (_dir, db) = student_db();
    let rows = db
        .query("SELECT name FROM student ORDER BY age ASC, name DESC")
        .unwrap();
    // Within the age-25 tie, name descends: Jane before Alice
    assert_eq!(rows[1].get("name"), Some(&Value::text("Jane")));
    assert_eq!(rows[2].get("name"), Some(&Value::text("Alice")));
}

#[test]
fn test_limit_truncates() {
    let (_dir, db) = student_db();
    let rows = db.query("SELECT id FROM student LIMIT 2").unwrap();
    assert_eq!(rows.len(), 2);
}

#[test]
fn test_limit_zero() {
    let (_dir, db) = student_db();
    let rows = db.query("SELECT id FROM student LIMIT 0").unwrap();
    assert!(rows.is_empty());
}

#[test]
fn test_limit_beyond_row_count() {
    let (_dir, db) = student_db();
    let rows = db.query("SELECT id FROM student LIMIT 100").unwrap();
    assert_eq!(rows.len(), 4);
}

#[test]
fn test_order_then_limit_gives_top_n() {
    let (_dir, db) = student_db();
    let rows = db
        .query("SELECT name FROM student ORDER BY age DESC LIMIT 2")
        .unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].get("name"), Some(&Value::text("John")));
    assert_eq!(rows[1].get("name"), Some(&Value::text("Jane")));
}

#[test]
fn test_limit_output_prefix_property() {
    let (_dir, db) = student_db();
    let all = db.query("SELECT id FROM student ORDER BY id ASC").unwrap();
    let limited = db
        .query("SELECT id FROM student ORDER BY id ASC LIMIT 3")
        .unwrap();
    assert_eq!(limited.as_slice(), &all[..3]);
}
