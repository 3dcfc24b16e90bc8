//! Plain-text tables for terminal output.
//!
//! Widths are measured in terminal columns, so CJK titles (two columns per
//! character) line up with ASCII numbers.

use std::borrow::Cow;
use std::fmt::Write as _;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Right,
}

#[derive(Debug, Clone, Default)]
pub struct TextTable {
    headers: Vec<String>,
    align: Vec<Align>,
    max_width: Vec<Option<usize>>,
    rows: Vec<Vec<String>>,
}

impl TextTable {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let headers = headers.into_iter().map(Into::into).collect::<Vec<String>>();
        let columns = headers.len();
        Self {
            headers,
            align: vec![Align::Left; columns],
            max_width: vec![None; columns],
            rows: Vec::new(),
        }
    }

    pub fn align(mut self, column: usize, align: Align) -> Self {
        if let Some(slot) = self.align.get_mut(column) {
            *slot = align;
        }
        self
    }

    /// Cells wider than `width` columns are cut and end in `…`.
    pub fn max_width(mut self, column: usize, width: usize) -> Self {
        if let Some(slot) = self.max_width.get_mut(column) {
            *slot = Some(width.max(2));
        }
        self
    }

    pub fn push_row(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn render(&self) -> String {
        let prepared = self
            .rows
            .iter()
            .map(|row| {
                (0..self.headers.len())
                    .map(|idx| self.prepare_cell(idx, row.get(idx).map_or("", String::as_str)))
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();

        let mut widths = self
            .headers
            .iter()
            .map(|header| header.width().max(3))
            .collect::<Vec<_>>();
        for row in &prepared {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.width());
            }
        }

        let mut output = String::new();
        let header_cells = self.headers.iter().map(String::as_str).collect::<Vec<_>>();
        let _ = writeln!(output, "{}", self.line(&header_cells, &widths));
        let rules = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
        let rule_cells = rules.iter().map(String::as_str).collect::<Vec<_>>();
        let _ = writeln!(output, "{}", self.line(&rule_cells, &widths));
        for row in &prepared {
            let cells = row.iter().map(|cell| cell.as_ref()).collect::<Vec<_>>();
            let _ = writeln!(output, "{}", self.line(&cells, &widths));
        }
        output
    }

    pub fn print(&self) {
        print!("{}", self.render());
    }

    fn prepare_cell<'a>(&self, column: usize, value: &'a str) -> Cow<'a, str> {
        let flattened = flatten_whitespace(value);
        match self.max_width.get(column).copied().flatten() {
            Some(limit) if flattened.width() > limit => Cow::Owned(truncate_to_width(&flattened, limit)),
            _ => flattened,
        }
    }

    fn line(&self, cells: &[&str], widths: &[usize]) -> String {
        let mut line = String::new();
        for (idx, (cell, width)) in cells.iter().zip(widths).enumerate() {
            if idx > 0 {
                line.push_str("  ");
            }
            let padding = " ".repeat(width.saturating_sub(cell.width()));
            match self.align.get(idx).copied().unwrap_or_default() {
                Align::Left => {
                    line.push_str(cell);
                    line.push_str(&padding);
                }
                Align::Right => {
                    line.push_str(&padding);
                    line.push_str(cell);
                }
            }
        }
        line.trim_end().to_string()
    }
}

fn flatten_whitespace(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

fn truncate_to_width(value: &str, limit: usize) -> String {
    let budget = limit.saturating_sub(1);
    let mut used = 0usize;
    let mut truncated = String::new();
    for ch in value.chars() {
        let width = ch.width().unwrap_or(0);
        if used + width > budget {
            break;
        }
        used += width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}
