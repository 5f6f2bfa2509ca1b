use regex::Regex;
use rust_xlsxwriter::{Format, Workbook, Worksheet, XlsxError};
use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Instant;
use tracing::info;

use crate::bundle::ExportBundle;
use crate::domain::first_label;
use crate::error::ExportError;
use crate::table::{escape_sheet_text, Cell, Table, NOT_AVAILABLE};

/// Content type of the exported workbook.
pub const XLSX_MIME: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const DEFAULT_EXPORT_FILENAME: &str = "domains_data.xlsx";

/// Hard limit of the xlsx format.
pub const MAX_SHEET_NAME_LEN: usize = 31;

static INVALID_SHEET_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[\]:*?/\\]").expect("static regex"));

/// `report_domainlabel`, cleaned of forbidden characters and cut to the
/// length limit.
pub fn sheet_name(report: &str, domain: &str) -> String {
    let raw = format!("{}_{}", report, first_label(domain));
    let cleaned = INVALID_SHEET_CHARS.replace_all(&raw, "_");
    trim_quotes(&truncate(&cleaned, MAX_SHEET_NAME_LEN))
}

/// Sheet names may not start or end with `'`.
fn trim_quotes(name: &str) -> String {
    name.trim_matches('\'').to_string()
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}

/// Hands out sheet names that are unique ignoring case, appending `~2`,
/// `~3`, … when a name is already taken.
#[derive(Debug, Default)]
pub struct SheetNamer {
    used: HashSet<String>,
}

impl SheetNamer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn claim(&mut self, base: &str) -> String {
        let base = trim_quotes(&truncate(base, MAX_SHEET_NAME_LEN));
        if self.used.insert(base.to_lowercase()) {
            return base;
        }

        let mut n = 2usize;
        loop {
            let suffix = format!("~{}", n);
            let candidate = format!(
                "{}{}",
                trim_quotes(&truncate(&base, MAX_SHEET_NAME_LEN - suffix.len())),
                suffix
            );
            if self.used.insert(candidate.to_lowercase()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Writes one sheet per non-empty (domain, report) table and returns the
/// workbook bytes.
pub fn export_workbook(bundle: &ExportBundle) -> Result<Vec<u8>, ExportError> {
    let start_time = Instant::now();
    if bundle.non_empty_tables() == 0 {
        return Err(ExportError::NothingToExport);
    }

    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();
    let date = Format::new().set_num_format("yyyy-mm-dd");
    let mut namer = SheetNamer::new();
    let mut sheet_count = 0usize;

    for (domain, reports) in bundle.iter() {
        for (report, table) in reports.iter() {
            if table.is_empty() {
                continue;
            }
            let name = namer.claim(&sheet_name(report.title(), domain));
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(&name)?;
            write_table(worksheet, table, &header, &date)?;
            sheet_count += 1;
        }
    }

    let buffer = workbook.save_to_buffer()?;
    info!(
        action = "complete",
        component = "workbook_export",
        sheet_count,
        bytes = buffer.len(),
        duration_ms = start_time.elapsed().as_millis(),
        "Workbook written"
    );
    Ok(buffer)
}

fn write_table(
    worksheet: &mut Worksheet,
    table: &Table,
    header: &Format,
    date: &Format,
) -> Result<(), XlsxError> {
    for (col, name) in table.columns().iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, name, header)?;
    }

    for (r, record) in table.records().iter().enumerate() {
        let row = r as u32 + 1;
        for (c, cell) in record.iter().enumerate() {
            let col = c as u16;
            match cell {
                Cell::Number(n) => {
                    worksheet.write_number(row, col, *n)?;
                }
                Cell::Text(s) => {
                    worksheet.write_string(row, col, escape_sheet_text(s))?;
                }
                Cell::Bool(b) => {
                    worksheet.write_boolean(row, col, *b)?;
                }
                Cell::Date(d) => {
                    worksheet.write_datetime_with_format(row, col, d, date)?;
                }
                Cell::Missing => {
                    worksheet.write_string(row, col, NOT_AVAILABLE)?;
                }
                Cell::Empty => {}
            }
        }
    }

    worksheet.autofit();
    Ok(())
}
