use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::BTreeMap;
use std::fmt;

use crate::query::ReportKind;
use crate::table::Table;

/// Name under which a table is stored. Ordering is the display and export
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Report {
    Api(ReportKind),
    Backlinks,
    TopPages,
}

impl Report {
    pub fn title(self) -> &'static str {
        match self {
            Report::Api(kind) => kind.title(),
            Report::Backlinks => "Backlinks",
            Report::TopPages => "Top Pages",
        }
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// All tables collected for one domain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainReportSet {
    reports: BTreeMap<Report, Table>,
}

impl DomainReportSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, report: Report, table: Table) {
        self.reports.insert(report, table);
    }

    pub fn get(&self, report: Report) -> Option<&Table> {
        self.reports.get(&report)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Report, &Table)> {
        self.reports.iter().map(|(r, t)| (*r, t))
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn non_empty_count(&self) -> usize {
        self.reports.values().filter(|t| !t.is_empty()).count()
    }
}

impl Serialize for DomainReportSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.reports.len()))?;
        for (report, table) in &self.reports {
            map.serialize_entry(report.title(), table)?;
        }
        map.end()
    }
}

/// Domain → reports, in the order domains were first inserted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportBundle {
    domains: Vec<(String, DomainReportSet)>,
}

impl ExportBundle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserting a domain twice replaces the earlier set but keeps its
    /// position.
    pub fn insert(&mut self, domain: String, reports: DomainReportSet) {
        match self.domains.iter_mut().find(|(d, _)| *d == domain) {
            Some((_, existing)) => *existing = reports,
            None => self.domains.push((domain, reports)),
        }
    }

    pub fn get(&self, domain: &str) -> Option<&DomainReportSet> {
        self.domains
            .iter()
            .find(|(d, _)| d == domain)
            .map(|(_, r)| r)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &DomainReportSet)> {
        self.domains.iter().map(|(d, r)| (d.as_str(), r))
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Number of sheets an export would contain.
    pub fn non_empty_tables(&self) -> usize {
        self.domains.iter().map(|(_, r)| r.non_empty_count()).sum()
    }
}

impl Serialize for ExportBundle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.domains.len()))?;
        for (domain, reports) in &self.domains {
            map.serialize_entry(domain, reports)?;
        }
        map.end()
    }
}
