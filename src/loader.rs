//! Loads an exported table (CSV/TSV or a spreadsheet workbook) into a
//! [`RawTable`].
//!
//! Delimited files go through the `csv` reader in [`io_utils`]; workbooks are
//! opened with `calamine`, which keeps numbers, booleans and dates typed.

use std::path::{Path, PathBuf};

use anyhow::{Context, anyhow};
use calamine::{Data, Reader, open_workbook_auto};
use encoding_rs::{Encoding, UTF_8};
use log::{debug, info};

use crate::{
    data::{RawValue, parse_naive_datetime},
    io_utils,
    rows::RawTable,
};

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("no input file matching {patterns:?} found in {dir:?}")]
    NoFileFound { dir: PathBuf, patterns: Vec<String> },
    #[error("failed to read {path:?}: {error:#}")]
    Unreadable { path: PathBuf, error: anyhow::Error },
    #[error("no reader available for {path:?} (extension '{extension}')")]
    UnsupportedFormat { path: PathBuf, extension: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Delimited,
    Workbook,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self, LoadError> {
        if io_utils::is_dash(path) {
            return Ok(TableFormat::Delimited);
        }
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "csv" | "tsv" | "txt" => Ok(TableFormat::Delimited),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(TableFormat::Workbook),
            _ => Err(LoadError::UnsupportedFormat {
                path: path.to_path_buf(),
                extension,
            }),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    pub delimiter: Option<u8>,
    pub encoding: &'static Encoding,
    pub sheet: Option<String>,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            delimiter: None,
            encoding: UTF_8,
            sheet: None,
        }
    }
}

pub fn load_table(path: &Path, options: &LoadOptions) -> Result<RawTable, LoadError> {
    let format = TableFormat::from_path(path)?;
    let loaded = match format {
        TableFormat::Delimited => load_delimited(path, options),
        TableFormat::Workbook => load_workbook(path, options.sheet.as_deref()),
    };
    let table = loaded.map_err(|error| LoadError::Unreadable {
        path: path.to_path_buf(),
        error,
    })?;
    info!(
        "Read {} row(s) across {} column(s) from {:?}",
        table.row_count(),
        table.headers().len(),
        path
    );
    debug!("Columns: {:?}", table.headers());
    Ok(table)
}

fn load_delimited(path: &Path, options: &LoadOptions) -> anyhow::Result<RawTable> {
    let delimiter = io_utils::resolve_input_delimiter(path, options.delimiter);
    let mut reader = io_utils::open_csv_reader_from_path(path, delimiter, true)?;
    let headers = io_utils::reader_headers(&mut reader, options.encoding)?;
    let mut rows = Vec::new();
    for (idx, record) in reader.byte_records().enumerate() {
        let record = record.with_context(|| format!("Reading row {}", idx + 2))?;
        let decoded = io_utils::decode_record(&record, options.encoding)
            .with_context(|| format!("Decoding row {}", idx + 2))?;
        rows.push(decoded.iter().map(|cell| RawValue::from_text(cell)).collect());
    }
    RawTable::new(headers, rows)
}

fn load_workbook(path: &Path, sheet: Option<&str>) -> anyhow::Result<RawTable> {
    let mut workbook = open_workbook_auto(path).context("Opening workbook")?;
    let sheet_names = workbook.sheet_names().to_vec();
    let sheet_name = match sheet {
        Some(name) => sheet_names
            .iter()
            .find(|candidate| candidate.as_str() == name)
            .cloned()
            .ok_or_else(|| anyhow!("Workbook has no sheet named '{name}'"))?,
        None => sheet_names
            .first()
            .cloned()
            .ok_or_else(|| anyhow!("Workbook has no sheets"))?,
    };
    debug!("Reading sheet '{sheet_name}' of {} sheet(s)", sheet_names.len());
    let range = workbook
        .worksheet_range(&sheet_name)
        .with_context(|| format!("Reading sheet '{sheet_name}'"))?;

    let mut rows = range.rows();
    let headers = match rows.next() {
        Some(header_row) => header_row.iter().map(header_label).collect::<Vec<_>>(),
        None => return RawTable::new(Vec::new(), Vec::new()),
    };
    let body = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    RawTable::new(headers, body)
}

fn header_label(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => cell_value(other).as_display(),
    }
}

pub fn cell_value(cell: &Data) -> RawValue {
    match cell {
        Data::Empty | Data::Error(_) => RawValue::Empty,
        Data::String(s) | Data::DurationIso(s) => RawValue::from_text(s),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Float(f) => RawValue::Number(*f),
        Data::Bool(b) => RawValue::Boolean(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => RawValue::DateTime(naive),
            None => RawValue::Number(dt.as_f64()),
        },
        Data::DateTimeIso(s) => match parse_naive_datetime(s) {
            Ok(naive) => RawValue::DateTime(naive),
            Err(_) => RawValue::from_text(s),
        },
    }
}
