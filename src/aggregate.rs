use anyhow::{Context, Result};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{info, warn};

use crate::bundle::{DomainReportSet, ExportBundle, Report};
use crate::client::ReportSource;
use crate::extract;
use crate::ingest::SheetSet;
use crate::query::{CountryCode, Period, Query, ReportKind};

/// What to fetch: the main domain first, then competitors in input order.
#[derive(Debug, Clone)]
pub struct FetchPlan {
    pub main_domain: String,
    pub competitors: Vec<String>,
    pub period: Period,
    pub country: CountryCode,
}

impl FetchPlan {
    pub fn domains(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.main_domain.as_str()).chain(self.competitors.iter().map(String::as_str))
    }
}

/// Workbooks supplied alongside the API data, one sheet per domain.
#[derive(Debug, Clone, Default)]
pub struct Uploads {
    pub backlinks: Option<SheetSet>,
    pub top_pages: Option<SheetSet>,
}

/// Collects every report for the domain at position `index` of the plan.
pub fn collect_domain<S: ReportSource + ?Sized>(
    source: &S,
    plan: &FetchPlan,
    index: usize,
    domain: &str,
    uploads: &Uploads,
) -> DomainReportSet {
    let mut reports = DomainReportSet::new();

    for kind in ReportKind::ALL {
        let query = Query::new(kind, domain, plan.period, plan.country);
        let table = match source.fetch(&query) {
            Ok(response) => extract::extract(kind, &response),
            Err(e) => {
                warn!(action = "fetch", component = "aggregator", domain = domain, report = %kind, error = %e, "Report unavailable, leaving it empty");
                extract::empty_table(kind)
            }
        };
        reports.insert(Report::Api(kind), table);
    }

    let uploaded = [
        (Report::Backlinks, uploads.backlinks.as_ref()),
        (Report::TopPages, uploads.top_pages.as_ref()),
    ];
    for (report, sheets) in uploaded {
        if let Some(table) = sheets.and_then(|s| s.get(index)) {
            reports.insert(report, table.clone());
        }
    }

    reports
}

/// Builds the bundle for every domain in `plan`. Domains are fetched in
/// parallel on a pool of `workers` threads; the bundle keeps plan order.
pub fn aggregate<S: ReportSource + Sync + ?Sized>(
    source: &S,
    plan: &FetchPlan,
    uploads: &Uploads,
    workers: usize,
) -> Result<ExportBundle> {
    let start_time = Instant::now();
    let domains: Vec<&str> = plan.domains().collect();
    info!(
        action = "start",
        component = "aggregator",
        domain_count = domains.len(),
        worker_count = workers,
        "Collecting reports"
    );

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .build()
        .context("Failed to build worker pool")?;

    let collected: Vec<(String, DomainReportSet)> = pool.install(|| {
        domains
            .par_iter()
            .enumerate()
            .map(|(index, domain)| {
                let reports = collect_domain(source, plan, index, domain, uploads);
                (domain.to_string(), reports)
            })
            .collect()
    });

    let bundle = collected
        .into_iter()
        .fold(ExportBundle::new(), |mut bundle, (domain, reports)| {
            bundle.insert(domain, reports);
            bundle
        });

    info!(
        action = "complete",
        component = "aggregator",
        domain_count = bundle.len(),
        table_count = bundle.non_empty_tables(),
        duration_ms = start_time.elapsed().as_millis(),
        "Reports collected"
    );
    Ok(bundle)
}
