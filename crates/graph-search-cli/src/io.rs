//! Reading relation files and writing result relations.
//!
//! Relations come from CSV files with a header row or from JSON Lines files
//! with one object per row. Cells must be integers or NULL; which CSV texts
//! count as NULL is configurable, JSON uses `null`.
//!
//! CSV output follows the diff-test convention: header names and NULL cells
//! are quoted, integers are not.

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use graph_search::{Column, Table, Value};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::debug;

use crate::config::{InputConfig, OutputConfig, OutputFormat};
use crate::error::{Error, Result};

/// Supported relation file formats, chosen by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    /// `.csv` with a header row
    Csv,
    /// `.jsonl` or `.ndjson`, one object per line
    Jsonl,
}

impl InputFormat {
    /// Pick a format from the file extension.
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase());
        match ext.as_deref() {
            Some("csv") => Ok(Self::Csv),
            Some("jsonl" | "ndjson") => Ok(Self::Jsonl),
            _ => Err(Error::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Read a relation file into a table.
///
/// A file that yields no columns at all (an empty JSON Lines file, or a CSV
/// file without a header) reads as a table with `schema` and no rows.
pub fn read_table(path: &Path, input: &InputConfig, schema: &[&str]) -> Result<Table> {
    let mut table = match InputFormat::from_path(path)? {
        InputFormat::Csv => read_csv(path, input)?,
        InputFormat::Jsonl => read_jsonl(path)?,
    };
    if table.column_count() == 0 {
        table = Table::empty(schema)?;
    }
    debug!(
        path = %path.display(),
        rows = table.row_count(),
        columns = table.column_count(),
        "read relation"
    );
    Ok(table)
}

fn invalid_cell(path: &Path, line: u64, column: &str, value: impl Into<String>) -> Error {
    Error::InvalidCell {
        path: PathBuf::from(path),
        line,
        column: column.to_string(),
        value: value.into(),
    }
}

fn read_csv(path: &Path, input: &InputConfig) -> Result<Table> {
    let mut reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)?;
    let names: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    let mut cells: Vec<Vec<Option<i64>>> = vec![Vec::new(); names.len()];

    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, csv::Position::line);
        for ((name, column), cell) in names.iter().zip(cells.iter_mut()).zip(record.iter()) {
            let value = if input.is_null(cell) {
                None
            } else {
                Some(
                    cell.parse::<i64>()
                        .map_err(|_| invalid_cell(path, line, name, cell))?,
                )
            };
            column.push(value);
        }
    }

    Ok(Table::from_columns(
        names
            .into_iter()
            .zip(cells)
            .map(|(name, values)| Column::new(name, values))
            .collect(),
    )?)
}

fn read_jsonl(path: &Path) -> Result<Table> {
    let reader = BufReader::new(File::open(path)?);
    let mut names: Vec<String> = Vec::new();
    let mut known: HashSet<String> = HashSet::new();
    let mut rows: Vec<BTreeMap<String, Option<i64>>> = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let line_number = u64::try_from(index + 1).unwrap_or(u64::MAX);
        let object: BTreeMap<String, serde_json::Value> = serde_json::from_str(&line)?;

        let mut row = BTreeMap::new();
        for (name, value) in object {
            let cell = match &value {
                serde_json::Value::Null => None,
                serde_json::Value::Number(n) => Some(
                    n.as_i64()
                        .ok_or_else(|| invalid_cell(path, line_number, &name, n.to_string()))?,
                ),
                other => return Err(invalid_cell(path, line_number, &name, other.to_string())),
            };
            if known.insert(name.clone()) {
                names.push(name.clone());
            }
            row.insert(name, cell);
        }
        rows.push(row);
    }

    let columns = names
        .iter()
        .map(|name| {
            let values = rows
                .iter()
                .map(|row| row.get(name).copied().flatten())
                .collect();
            Column::new(name.clone(), values)
        })
        .collect();
    Ok(Table::from_columns(columns)?)
}

/// Write a table in the configured format.
pub fn write_table<W: Write>(table: &Table, out: W, output: &OutputConfig) -> Result<()> {
    match output.format {
        OutputFormat::Csv => write_csv(table, out, output),
        OutputFormat::Jsonl => write_jsonl(table, out),
    }
}

fn write_csv<W: Write>(table: &Table, out: W, output: &OutputConfig) -> Result<()> {
    let quote_style = if output.quote_all {
        QuoteStyle::Always
    } else {
        QuoteStyle::NonNumeric
    };
    let mut writer = WriterBuilder::new()
        .quote_style(quote_style)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(out);

    writer.write_record(table.column_names())?;
    for row in table.rows() {
        writer.write_record(row.iter().map(|value| match value {
            Value::Null => output.null_token.clone(),
            Value::Integer(v) => v.to_string(),
        }))?;
    }
    writer.flush()?;
    Ok(())
}

/// One result row as a JSON object with keys in column order.
struct JsonRow<'a> {
    names: &'a [&'a str],
    values: &'a [Value],
}

impl Serialize for JsonRow<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.names.len()))?;
        for (name, value) in self.names.iter().zip(self.values) {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn write_jsonl<W: Write>(table: &Table, mut out: W) -> Result<()> {
    let names: Vec<&str> = table.column_names().collect();
    for values in table.rows() {
        serde_json::to_writer(
            &mut out,
            &JsonRow {
                names: &names,
                values: &values,
            },
        )?;
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(())
}
