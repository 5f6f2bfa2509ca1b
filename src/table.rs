use chrono::NaiveDate;
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;

/// Text shown wherever a source field was not available.
pub const NOT_AVAILABLE: &str = "N/A";

/// Prefix that keeps sheet text from reading back as a marker or a blank.
const SHEET_TEXT_ESCAPE: char = '\'';

/// Spreadsheet form of a text value. Blank text, the N/A marker and text
/// already starting with the escape get one escape prepended.
pub fn escape_sheet_text(text: &str) -> Cow<'_, str> {
    if text.is_empty() || text == NOT_AVAILABLE || text.starts_with(SHEET_TEXT_ESCAPE) {
        Cow::Owned(format!("{}{}", SHEET_TEXT_ESCAPE, text))
    } else {
        Cow::Borrowed(text)
    }
}

/// Reads a spreadsheet string written by [`escape_sheet_text`] or by hand.
pub fn cell_from_sheet_text(raw: &str) -> Cell {
    if raw == NOT_AVAILABLE {
        return Cell::Missing;
    }
    match raw.strip_prefix(SHEET_TEXT_ESCAPE) {
        Some(text) => Cell::Text(text.to_string()),
        None => Cell::Text(raw.to_string()),
    }
}

/// A single scalar value in a table.
///
/// `Missing` marks a field the source did not provide. It never compares
/// equal to a legitimate zero, blank string or empty spreadsheet cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
    Empty,
    Missing,
}

impl Cell {
    pub fn from_json(value: Option<&Value>) -> Cell {
        match value {
            None | Some(Value::Null) => Cell::Missing,
            Some(Value::Number(n)) => n.as_f64().map(Cell::Number).unwrap_or(Cell::Missing),
            Some(Value::String(s)) => Cell::Text(s.clone()),
            Some(Value::Bool(b)) => Cell::Bool(*b),
            Some(other) => Cell::Text(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{}", *n as i64),
            Cell::Number(n) => write!(f, "{}", n),
            Cell::Text(s) => f.write_str(s),
            Cell::Bool(b) => write!(f, "{}", b),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::Empty => Ok(()),
            Cell::Missing => f.write_str(NOT_AVAILABLE),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                serializer.serialize_i64(*n as i64)
            }
            Cell::Number(n) => serializer.serialize_f64(*n),
            Cell::Text(s) => serializer.serialize_str(s),
            Cell::Bool(b) => serializer.serialize_bool(*b),
            Cell::Date(d) => d.serialize(serializer),
            Cell::Empty => serializer.serialize_str(""),
            Cell::Missing => serializer.serialize_none(),
        }
    }
}

/// One row, aligned with the owning table's columns.
pub type Record = Vec<Cell>;

/// Ordered records sharing one column set.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl Table {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            records: Vec::new(),
        }
    }

    /// Appends a record, padding with `Missing` or truncating so it matches
    /// the column count.
    pub fn push(&mut self, mut record: Record) {
        record.resize(self.columns.len(), Cell::Missing);
        self.records.push(record);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn get(&self, row: usize, column: &str) -> Option<&Cell> {
        let idx = self.column_index(column)?;
        self.records.get(row).and_then(|r| r.get(idx))
    }

    /// Drops the first `n` records.
    pub fn skip_leading(&mut self, n: usize) {
        let n = n.min(self.records.len());
        self.records.drain(..n);
    }
}

struct RecordView<'a> {
    columns: &'a [String],
    record: &'a Record,
}

impl Serialize for RecordView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, cell) in self.columns.iter().zip(self.record) {
            map.serialize_entry(column, cell)?;
        }
        map.end()
    }
}

impl Serialize for Table {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.records.len()))?;
        for record in &self.records {
            seq.serialize_element(&RecordView {
                columns: &self.columns,
                record,
            })?;
        }
        seq.end()
    }
}
