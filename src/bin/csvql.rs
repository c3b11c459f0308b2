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

//! Csvql CLI - Interactive SQL-over-CSV command-line interface
//!

use std::io::{self, BufRead, IsTerminal};
use std::time::Instant;

use clap::Parser;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Cell, ContentArrangement, Table};
use rustyline::error::ReadlineError;
use rustyline::{Config, DefaultEditor, EditMode};

use csvql::{Database, Row, Value};

/// Csvql SQL-over-CSV CLI
#[derive(Parser, Debug)]
#[command(name = "csvql")]
#[command(author = "Csvql Contributors")]
#[command(version)]
#[command(about = "Query directories of CSV files with a SQL subset")]
#[command(
    long_about = "Csvql queries directories of CSV files with a SELECT subset:\n\
projection, WHERE, INNER/LEFT/RIGHT JOIN, GROUP BY with COUNT/SUM/AVG/MIN/MAX,\n\
ORDER BY, LIMIT, DISTINCT, and LIKE patterns. A table named `t` reads from\n\
`<data-dir>/t.csv`.\n\n\
EXAMPLES:\n\
  csvql -d ./data                                         Interactive session\n\
  csvql -d ./data -e 'SELECT name FROM student'           Single query\n\
  echo 'SELECT COUNT(*) FROM student' | csvql -d ./data   Piped input"
)]
struct Args {
    /// Directory of <table>.csv files
    #[arg(short = 'd', long = "data", default_value = ".")]
    data_dir: String,

    /// Output results in JSON format
    #[arg(short = 'j', long = "json", default_value = "false")]
    json_output: bool,

    /// Suppress summary messages
    #[arg(short = 'q', long = "quiet", default_value = "false")]
    quiet: bool,

    /// Maximum number of rows to display (0 for unlimited)
    #[arg(short = 'l', long = "limit", default_value = "40")]
    limit: usize,

    /// Execute a single query and exit
    #[arg(short = 'e', long = "execute")]
    execute: Option<String>,
}

fn main() {
    let args = Args::parse();

    let db = Database::open(&args.data_dir);

    if !args.quiet {
        eprintln!("Data directory: {}", args.data_dir);
    }

    // Single query and exit
    if let Some(ref sql) = args.execute {
        if let Err(e) = run_query(&db, sql, &args) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // Piped input: one query per line
    if !io::stdin().is_terminal() {
        if let Err(e) = run_piped(&db, &args) {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
        return;
    }

    if let Err(e) = run_interactive(&db, &args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run_piped(db: &Database, args: &Args) -> Result<(), String> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.map_err(|e| e.to_string())?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("--") {
            continue;
        }
        if let Err(e) = run_query(db, line, args) {
            eprintln!("Error: {}", e);
        }
    }
    Ok(())
}

fn run_interactive(db: &Database, args: &Args) -> Result<(), String> {
    let config = Config::builder()
        .history_ignore_space(true)
        .edit_mode(EditMode::Emacs)
        .build();
    let mut editor = DefaultEditor::with_config(config).map_err(|e| e.to_string())?;

    let history_file = dirs::home_dir().map(|home| home.join(".csvql_history"));
    if let Some(ref path) = history_file {
        let _ = editor.load_history(path);
    }

    println!("Csvql v{}", env!("CARGO_PKG_VERSION"));
    println!("Enter a SELECT query, 'help' for assistance, or 'exit' to quit.");
    println!();

    loop {
        match editor.readline("\x1b[1;36m>\x1b[0m ") {
            Ok(line) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }

                match line.to_lowercase().as_str() {
                    "exit" | "quit" | "\\q" => break,
                    "help" | "\\h" | "\\?" => {
                        print_help();
                        continue;
                    }
                    _ => {}
                }

                let _ = editor.add_history_entry(line);

                let start = Instant::now();
                match run_query(db, line, args) {
                    Ok(()) => {
                        if !args.quiet && !args.json_output {
                            println!("\x1b[1;32mQuery executed in {:?}\x1b[0m", start.elapsed());
                        }
                    }
                    Err(e) => eprintln!("\x1b[1;31mError:\x1b[0m {}", e),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Error: {}", e);
                break;
            }
        }
    }

    if let Some(ref path) = history_file {
        let _ = editor.save_history(path);
    }

    Ok(())
}

fn run_query(db: &Database, sql: &str, args: &Args) -> Result<(), String> {
    let rows = db.query(sql).map_err(|e| e.to_string())?;

    // Every result row carries the same columns, in projection order
    let columns: Vec<String> = rows
        .first()
        .map(|row| row.column_names().map(str::to_string).collect())
        .unwrap_or_default();

    if args.json_output {
        output_json(&columns, &rows)
    } else {
        output_table(&columns, &rows, args.limit, args.quiet);
        Ok(())
    }
}

fn output_json(columns: &[String], rows: &[Row]) -> Result<(), String> {
    let json_rows: Vec<Vec<serde_json::Value>> = rows
        .iter()
        .map(|row| row.iter().map(|(_, v)| value_to_json(v)).collect())
        .collect();

    let result = serde_json::json!({
        "columns": columns,
        "rows": json_rows,
        "count": rows.len()
    });

    println!(
        "{}",
        serde_json::to_string(&result).map_err(|e| e.to_string())?
    );
    Ok(())
}

fn output_table(columns: &[String], rows: &[Row], row_limit: usize, quiet: bool) {
    let row_count = rows.len();

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(columns.iter().map(Cell::new));

    if row_limit > 0 && row_count > row_limit {
        let top_rows = row_limit / 2;
        let bottom_rows = row_limit - top_rows;

        for row in rows.iter().take(top_rows) {
            table.add_row(row.iter().map(|(_, v)| Cell::new(format_value(v))));
        }

        let hidden_rows = row_count - row_limit;
        let message = format!("... ({} more rows) ...", hidden_rows);
        let truncation_row: Vec<Cell> = columns
            .iter()
            .enumerate()
            .map(|(i, _)| {
                if i == columns.len() / 2 {
                    Cell::new(&message)
                } else {
                    Cell::new("")
                }
            })
            .collect();
        table.add_row(truncation_row);

        let start_idx = row_count.saturating_sub(bottom_rows).max(top_rows);
        for row in rows.iter().skip(start_idx) {
            table.add_row(row.iter().map(|(_, v)| Cell::new(format_value(v))));
        }
    } else {
        for row in rows {
            table.add_row(row.iter().map(|(_, v)| Cell::new(format_value(v))));
        }
    }

    println!("{table}");

    if !quiet {
        let row_text = if row_count == 1 { "row" } else { "rows" };
        if row_limit > 0 && row_count > row_limit {
            println!(
                "\x1b[1;32m{} {} in set (showing {})\x1b[0m",
                row_count, row_text, row_limit
            );
        } else {
            println!("\x1b[1;32m{} {} in set\x1b[0m", row_count, row_text);
        }
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "NULL".to_string(),
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => {
            if *f == f.trunc() {
                format!("{:.1}", f)
            } else {
                format!("{:.4}", f)
                    .trim_end_matches('0')
                    .trim_end_matches('.')
                    .to_string()
            }
        }
        Value::Text(s) => s.to_string(),
    }
}

fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Null => serde_json::Value::Null,
        Value::Integer(i) => serde_json::json!(i),
        Value::Float(f) => serde_json::json!(f),
        Value::Text(s) => serde_json::json!(s.as_ref()),
    }
}

fn print_help() {
    println!("Csvql SQL CLI");
    println!();
    println!("  Queries:");
    println!("    SELECT <fields> FROM <table>");
    println!("    ... WHERE <field> <op> <value> [AND ...]");
    println!("    ... INNER|LEFT|RIGHT JOIN <table> ON <a.f> = <b.f>");
    println!("    ... GROUP BY <fields>       with COUNT/SUM/AVG/MIN/MAX");
    println!("    ... ORDER BY <field> [ASC|DESC]");
    println!("    ... LIMIT <n>");
    println!("    SELECT DISTINCT ...");
    println!();
    println!("  Operators: = != <> > < >= <= LIKE ('%' any run, '_' one char)");
    println!();
    println!("  Special Commands:");
    println!("    exit, quit, \\q         Exit the CLI");
    println!("    help, \\h, \\?          Show this help message");
    println!();
}
