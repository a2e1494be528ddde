//! CSV extract naming and writing.

use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{aqs::types::RecordSet, cli::types::time::YearRange, Result};


pub const FILE_PREFIX: &str = "AQS_county_data";

/// `AQS_county_data_[<scope>_]<first>[_<last>].csv`
pub fn output_file_name(scope: Option<&str>, range: &YearRange) -> String {
    match scope {
        Some(scope) => format!("{FILE_PREFIX}_{scope}_{}.csv", range.file_suffix()),
        None => format!("{FILE_PREFIX}_{}.csv", range.file_suffix()),
    }
}

pub fn output_path(dir: &Path, scope: Option<&str>, range: &YearRange) -> PathBuf {
    dir.join(output_file_name(scope, range))
}

/// Render one JSON value as a CSV cell.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(nested) => nested.to_string(),
    }
}

/// Write `records` to `path`, creating parent directories as needed.
///
/// Columns are the union of row keys in first-seen order. With `with_index`
/// a leading unnamed column holds the 0-based row number.
pub fn write_csv(path: &Path, records: &RecordSet, with_index: bool) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let columns = records.columns();
    let mut wtr = csv::Writer::from_path(path)?;

    let mut header: Vec<&str> = Vec::with_capacity(columns.len() + 1);
    if with_index {
        header.push("");
    }
    header.extend(columns.iter().map(String::as_str));
    if !header.is_empty() {
        wtr.write_record(&header)?;
    }

    for (idx, row) in records.rows().iter().enumerate() {
        let mut fields: Vec<String> = Vec::with_capacity(header.len());
        if with_index {
            fields.push(idx.to_string());
        }
        fields.extend(columns.iter().map(|c| cell(row.get(c))));
        wtr.write_record(&fields)?;
    }

    wtr.flush()?;
    tracing::info!(path = %path.display(), rows = records.len(), "wrote CSV extract");
    Ok(())
}
