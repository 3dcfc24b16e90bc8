//! In-memory raw table handed from the loader to the pipeline.
//!
//! Provides [`RawTable`], an ordered list of header labels plus rows of
//! [`RawValue`] cells, and [`RawRow`], a borrowed view of one row that looks
//! cells up by the column positions a [`ColumnMap`](crate::schema::ColumnMap)
//! resolved.

use anyhow::{Result, bail};

use crate::{data::RawValue, schema::ResolvedColumn};

static EMPTY: RawValue = RawValue::Empty;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<RawValue>>,
}

impl RawTable {
    /// Every row must carry exactly one cell per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<RawValue>>) -> Result<Self> {
        for (idx, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                bail!(
                    "Row {} has {} cell(s) but the header declares {} column(s)",
                    idx + 2,
                    row.len(),
                    headers.len()
                );
            }
        }
        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> {
        self.rows.iter().map(|cells| RawRow { cells })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    cells: &'a [RawValue],
}

impl<'a> RawRow<'a> {
    pub fn cell(&self, index: usize) -> &'a RawValue {
        self.cells.get(index).unwrap_or(&EMPTY)
    }

    /// Cell behind a resolved column, or `None` when the field was not resolved.
    pub fn resolved(&self, column: Option<&ResolvedColumn>) -> Option<&'a RawValue> {
        column.map(|column| self.cell(column.index))
    }
}
