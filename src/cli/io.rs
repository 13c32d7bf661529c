//! CLI output handling
//!
//! Results go to stdout as pretty-printed JSON, one value per command.
//! Notices (confirmations, counts) go to stdout as plain lines so they
//! stay greppable.

use std::io::{self, Write};

use serde_json::Value;

use super::errors::CliResult;

/// Write a JSON value to stdout
pub fn write_json(value: &Value) -> CliResult<()> {
    let rendered = serde_json::to_string_pretty(value)?;
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", rendered)?;
    stdout.flush()?;
    Ok(())
}

/// Write a list of records to stdout as a JSON array
pub fn write_records(records: &[Value]) -> CliResult<()> {
    write_json(&Value::Array(records.to_vec()))
}

/// Write a plain line to stdout
pub fn write_line(line: &str) -> CliResult<()> {
    let mut stdout = io::stdout();
    writeln!(stdout, "{}", line)?;
    stdout.flush()?;
    Ok(())
}
