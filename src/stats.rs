use crate::bundle::{DomainReportSet, Report};
use crate::query::ReportKind;
use crate::table::Cell;

/// Headline figures shown above a domain's tables.
#[derive(Debug, Clone, PartialEq)]
pub struct DomainKpis {
    pub organic_rank: Cell,
    pub organic_results: Cell,
    pub organic_clicks: Cell,
    /// Row count of the domain's backlinks sheet; `None` when no sheet was
    /// supplied for it.
    pub total_backlinks: Option<usize>,
}

impl DomainKpis {
    pub fn from_reports(reports: &DomainReportSet) -> Self {
        let stats = reports.get(Report::Api(ReportKind::DomainStats));
        let first = |column: &str| {
            stats
                .and_then(|t| t.get(0, column))
                .cloned()
                .unwrap_or(Cell::Missing)
        };

        Self {
            organic_rank: first("Organic Rank"),
            organic_results: first("Organic Results"),
            organic_clicks: first("Organic Clicks"),
            total_backlinks: reports.get(Report::Backlinks).map(|t| t.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::extract;
    use crate::table::Table;
    use serde_json::json;

    #[test]
    fn kpis_from_domain_stats_without_backlinks() {
        let response = json!({"results":[{"averageOrganicRank":12,"totalOrganicResults":500,"monthlyOrganicClicks":1000}]});
        let mut reports = DomainReportSet::new();
        reports.insert(
            Report::Api(ReportKind::DomainStats),
            extract(ReportKind::DomainStats, &response),
        );

        let kpis = DomainKpis::from_reports(&reports);
        assert_eq!(kpis.organic_rank, Cell::Number(12.0));
        assert_eq!(kpis.organic_results, Cell::Number(500.0));
        assert_eq!(kpis.organic_clicks, Cell::Number(1000.0));
        assert_eq!(kpis.total_backlinks, None);
    }

    #[test]
    fn empty_backlinks_sheet_counts_as_zero() {
        let mut reports = DomainReportSet::new();
        reports.insert(Report::Backlinks, Table::new(["Source URL"]));

        let kpis = DomainKpis::from_reports(&reports);
        assert_eq!(kpis.total_backlinks, Some(0));
        assert_eq!(kpis.organic_rank, Cell::Missing);
    }
}
