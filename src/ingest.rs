use calamine::{open_workbook_auto_from_rs, Data, Reader};
use chrono::NaiveDate;
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::time::Instant;
use tracing::info;

use crate::error::IngestError;
use crate::table::{cell_from_sheet_text, Cell, Table};

/// Sheets of an uploaded workbook, in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SheetSet {
    sheets: Vec<(String, Table)>,
}

impl SheetSet {
    pub fn new(sheets: Vec<(String, Table)>) -> Self {
        Self { sheets }
    }

    /// Table at position `index`; by convention 0 is the main domain and
    /// `k + 1` is competitor `k`.
    pub fn get(&self, index: usize) -> Option<&Table> {
        self.sheets.get(index).map(|(_, t)| t)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sheets.iter().map(|(n, _)| n.as_str())
    }

    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

pub fn read_workbook_file(path: &Path) -> Result<SheetSet, IngestError> {
    let bytes = fs::read(path)?;
    read_workbook(bytes)
}

/// Reads every sheet, treating the first row as the header.
pub fn read_workbook(bytes: Vec<u8>) -> Result<SheetSet, IngestError> {
    let start_time = Instant::now();
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        let mut rows = range.rows();

        let mut table = match rows.next() {
            Some(header) => Table::new(header.iter().map(header_text)),
            None => Table::default(),
        };
        for row in rows {
            table.push(row.iter().map(to_cell).collect());
        }
        sheets.push((name, table));
    }

    if sheets.is_empty() {
        return Err(IngestError::NoSheets);
    }

    info!(
        action = "complete",
        component = "workbook_ingest",
        sheet_count = sheets.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Workbook loaded"
    );
    Ok(SheetSet::new(sheets))
}

/// Domains listed in column 0 of the first sheet, below its header row.
pub fn read_domain_column(sheets: &SheetSet) -> Vec<String> {
    let Some(table) = sheets.get(0) else {
        return Vec::new();
    };
    table
        .records()
        .iter()
        .filter_map(|record| match record.first() {
            Some(Cell::Text(s)) => Some(s.trim().to_string()),
            _ => None,
        })
        .filter(|s| !s.is_empty())
        .collect()
}

fn header_text(data: &Data) -> String {
    if let Data::String(s) = data {
        return s.clone();
    }
    match to_cell(data) {
        Cell::Empty | Cell::Missing => String::new(),
        other => other.to_string(),
    }
}

fn to_cell(data: &Data) -> Cell {
    match data {
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        Data::String(s) => cell_from_sheet_text(s),
        Data::Bool(b) => Cell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|d| Cell::Date(d.date()))
            .unwrap_or(Cell::Number(dt.as_f64())),
        Data::DateTimeIso(s) => s
            .get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .map(Cell::Date)
            .unwrap_or_else(|| Cell::Text(s.clone())),
        Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Error(_) => Cell::Missing,
        Data::Empty => Cell::Empty,
    }
}
