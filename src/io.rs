//! Loading and saving tables as CSV.
//!
//! Column types are inferred on load. On save, values are written in the
//! table's natural column order using their plain text form, so a saved
//! file loads back to the same values.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::info;

use crate::error::IoError;
use crate::model::{Table, Values};

/// A column as read from a source, before it joins a table.
#[derive(Clone, Debug)]
pub struct LoadedColumn {
    pub name: String,
    pub values: Values,
}

/// Parses a boolean the way [`crate::model::Value`] prints it, ignoring case.
fn parse_bool(s: &str) -> Option<bool> {
    if s.eq_ignore_ascii_case("true") {
        Some(true)
    } else if s.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Picks the narrowest type every field parses as: int, float, bool, then
/// string.
pub fn infer_values(fields: Vec<String>) -> Values {
    let trimmed = || fields.iter().map(|f| f.trim());

    if let Ok(ints) = trimmed().map(str::parse::<i64>).collect::<Result<Vec<_>, _>>() {
        return Values::Int(ints);
    }
    // Empty fields in a numeric column are missing values.
    let float = |s: &str| {
        if s.is_empty() {
            Ok(f64::NAN)
        } else {
            s.parse::<f64>()
        }
    };
    if let Ok(floats) = trimmed().map(float).collect::<Result<Vec<_>, _>>() {
        if trimmed().any(|s| !s.is_empty()) {
            return Values::Float(floats);
        }
    }
    if let Some(bools) = trimmed().map(parse_bool).collect::<Option<Vec<_>>>() {
        return Values::Bool(bools);
    }
    Values::strings(fields)
}

/// Reads CSV with a header row into typed columns.
pub fn read_columns<R: Read>(reader: R) -> Result<Vec<LoadedColumn>, IoError> {
    let mut rdr = csv::ReaderBuilder::new().from_reader(reader);
    let names: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if names.is_empty() {
        return Err(IoError::Empty);
    }

    let mut fields: Vec<Vec<String>> = vec![Vec::new(); names.len()];
    for record in rdr.records() {
        let record = record?;
        for (column, field) in fields.iter_mut().zip(record.iter()) {
            column.push(field.to_string());
        }
    }

    Ok(names
        .into_iter()
        .zip(fields)
        .map(|(name, fields)| LoadedColumn {
            name,
            values: infer_values(fields),
        })
        .collect())
}

impl Table {
    /// Builds a table from loaded columns, in order.
    pub fn from_columns(columns: Vec<LoadedColumn>) -> Result<Table, IoError> {
        if columns.is_empty() {
            return Err(IoError::Empty);
        }
        let mut table = Table::new();
        for column in columns {
            table.add_column(column.values, column.name, None)?;
        }
        Ok(table)
    }
}

/// Writes the header, then one line per row.
pub fn write_table<W: Write>(table: &Table, writer: W) -> Result<(), IoError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(table.columns().map(|c| c.name()))?;
    for row in 0..table.row_count() {
        let record: Vec<String> = table
            .columns()
            .map(|c| c.value_at(row).map(|v| v.to_string()).unwrap_or_default())
            .collect();
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn load_csv(path: &Path) -> Result<Table, IoError> {
    let file = File::open(path)?;
    let table = Table::from_columns(read_columns(file)?)?;
    info!(
        path = %path.display(),
        columns = table.num_columns(),
        rows = table.row_count(),
        "loaded table"
    );
    Ok(table)
}

pub fn save_csv(table: &Table, path: &Path) -> Result<(), IoError> {
    let file = File::create(path)?;
    write_table(table, file)?;
    info!(path = %path.display(), rows = table.row_count(), "saved table");
    Ok(())
}
