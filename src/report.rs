use std::io::{self, Write};

use crate::bundle::{ExportBundle, Report};
use crate::query::ReportKind;
use crate::stats::DomainKpis;
use crate::table::{Table, NOT_AVAILABLE};
use crate::utils::format_number;

const MAX_CELL_WIDTH: usize = 48;

pub fn kpi_line(domain: &str, kpis: &DomainKpis) -> String {
    let backlinks = kpis
        .total_backlinks
        .map(|n| format_number(n as u64))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());
    format!(
        "Organic Rank ({domain}): {} | Organic Results ({domain}): {} | Organic Clicks ({domain}): {} | Total Backlinks ({domain}): {}",
        kpis.organic_rank, kpis.organic_results, kpis.organic_clicks, backlinks
    )
}

/// Renders `table` as left-aligned columns separated by two spaces.
pub fn render_table(table: &Table) -> String {
    let clip = |s: String| -> String {
        if s.chars().count() > MAX_CELL_WIDTH {
            let mut clipped: String = s.chars().take(MAX_CELL_WIDTH - 1).collect();
            clipped.push('…');
            clipped
        } else {
            s
        }
    };

    let header: Vec<String> = table.columns().iter().map(|c| clip(c.clone())).collect();
    let rows: Vec<Vec<String>> = table
        .records()
        .iter()
        .map(|r| r.iter().map(|c| clip(c.to_string())).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let line = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(&widths)
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(&header);
    out.push('\n');
    out.push_str(
        &widths
            .iter()
            .map(|w| "-".repeat(*w))
            .collect::<Vec<_>>()
            .join("  "),
    );
    for row in &rows {
        out.push('\n');
        out.push_str(&line(row));
    }
    out
}

pub fn print_dashboard(bundle: &ExportBundle, out: &mut impl Write) -> io::Result<()> {
    for (position, (domain, reports)) in bundle.iter().enumerate() {
        if position == 0 {
            writeln!(out, "\n=== KPIs for {} ===", domain)?;
        } else {
            writeln!(out, "\n=== KPIs for Competitor {}: {} ===", position, domain)?;
        }
        writeln!(out, "{}", kpi_line(domain, &DomainKpis::from_reports(reports)))?;

        for (report, table) in reports.iter() {
            if report == Report::Api(ReportKind::DomainStats) {
                continue;
            }
            writeln!(out, "\n--- {} for {} ---", report, domain)?;
            if table.is_empty() {
                writeln!(out, "No {} data available.", report.title().to_lowercase())?;
            } else {
                writeln!(out, "{}", render_table(table))?;
            }
        }
    }
    Ok(())
}

pub fn print_json(bundle: &ExportBundle, out: &mut impl Write) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(&mut *out, bundle)?;
    writeln!(out)?;
    Ok(())
}
