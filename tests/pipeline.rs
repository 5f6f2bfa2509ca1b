mod common;

use chrono::NaiveDate;
use seolens::aggregate::{aggregate, FetchPlan, Uploads};
use seolens::bundle::DomainReportSet;
use seolens::client::ApiClient;
use seolens::credentials::Credentials;
use seolens::error::ApiError;
use seolens::query::Query;
use seolens::ReportSource;
use serde_json::Value;
use std::net::TcpListener;
use std::time::Duration;
use seolens::export::{export_workbook, MAX_SHEET_NAME_LEN};
use seolens::ingest::{read_workbook, SheetSet};
use seolens::query::{CountryCode, Period, ReportKind};
use seolens::{Cell, DomainKpis, Report, Table};

use common::Canned;

fn plan(main: &str, competitors: &[&str]) -> FetchPlan {
    FetchPlan {
        main_domain: main.to_string(),
        competitors: competitors.iter().map(|s| s.to_string()).collect(),
        period: Period { month: 6, year: 2020 },
        country: CountryCode::Fr,
    }
}

fn backlinks_sheets(count: usize) -> SheetSet {
    SheetSet::new(
        (0..count)
            .map(|i| {
                let mut table = Table::new(["Source URL", "Domain Rating"]);
                for n in 0..=i {
                    table.push(vec![
                        Cell::Text(format!("https://ref{n}.example/page")),
                        Cell::Number(40.0 + n as f64),
                    ]);
                }
                (format!("Sheet{}", i + 1), table)
            })
            .collect(),
    )
}

#[test]
fn exported_workbook_has_one_sheet_per_non_empty_table() {
    let uploads = Uploads {
        backlinks: Some(backlinks_sheets(3)),
        top_pages: None,
    };
    let bundle = aggregate(
        &Canned,
        &plan("carrefour.fr", &["carrefour.com", "auchan.fr"]),
        &uploads,
        3,
    )
    .unwrap();

    // Domain stats, newly ranked, ad history and backlinks for each domain.
    assert_eq!(bundle.non_empty_tables(), 3 * 4);

    let bytes = export_workbook(&bundle).unwrap();
    let sheets = read_workbook(bytes).unwrap();
    let names: Vec<&str> = sheets.names().collect();

    assert_eq!(names.len(), 12);
    assert!(names.iter().all(|n| n.chars().count() <= MAX_SHEET_NAME_LEN));

    let mut lowered: Vec<String> = names.iter().map(|n| n.to_lowercase()).collect();
    lowered.sort();
    lowered.dedup();
    assert_eq!(lowered.len(), 12, "sheet names must be unique: {names:?}");

    assert_eq!(names[0], "Domain Stats_carrefour");
    assert!(names.contains(&"Newly Ranked Keywords_carrefour"));
    assert!(names.contains(&"Newly Ranked Keywords_carrefo~2"));
    assert!(!names.iter().any(|n| n.starts_with("Most Valuable Keywords")));
    assert!(!names.iter().any(|n| n.starts_with("PPC Keywords")));
}

#[test]
fn tables_survive_export_and_reingest() {
    let uploads = Uploads {
        backlinks: Some(backlinks_sheets(2)),
        top_pages: None,
    };
    let mut bundle = aggregate(&Canned, &plan("lidl.fr", &["aldi.fr"]), &uploads, 2).unwrap();

    let mut pages = Table::new(["Page", "Title", "Traffic"]);
    pages.push(vec![Cell::Text(String::new()), Cell::Text("N/A".into()), Cell::Number(1.0)]);
    pages.push(vec![Cell::Text("'quoted".into()), Cell::Missing, Cell::Empty]);
    let mut reports = DomainReportSet::new();
    reports.insert(Report::TopPages, pages);
    bundle.insert("edge.com".into(), reports);

    let bytes = export_workbook(&bundle).unwrap();
    let sheets = read_workbook(bytes).unwrap();

    let written: Vec<&Table> = bundle
        .iter()
        .flat_map(|(_, reports)| reports.iter().map(|(_, t)| t))
        .filter(|t| !t.is_empty())
        .collect();
    assert_eq!(written.len(), sheets.len());

    for (index, original) in written.into_iter().enumerate() {
        assert_eq!(sheets.get(index), Some(original), "sheet {index}");
    }
}

#[test]
fn ad_history_round_trips_dates_and_missing_values() {
    let bundle = aggregate(&Canned, &plan("lidl.fr", &[]), &Uploads::default(), 1).unwrap();
    let ads = bundle
        .get("lidl.fr")
        .unwrap()
        .get(Report::Api(ReportKind::AdHistory))
        .unwrap();

    assert_eq!(ads.len(), 3);
    assert_eq!(
        ads.get(0, "Date"),
        Some(&Cell::Date(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap()))
    );
    assert_eq!(ads.get(1, "Date"), Some(&Cell::Missing));
    assert_eq!(ads.get(2, "Search Volume"), Some(&Cell::Missing));

    let sheets = read_workbook(export_workbook(&bundle).unwrap()).unwrap();
    let index = sheets.names().position(|n| n == "Ad History_lidl").unwrap();
    assert_eq!(sheets.get(index), Some(ads));
}

#[test]
fn kpis_come_from_domain_stats_and_backlinks_sheet() {
    let uploads = Uploads {
        backlinks: Some(backlinks_sheets(1)),
        top_pages: None,
    };
    let bundle = aggregate(&Canned, &plan("m.com", &["a.com"]), &uploads, 2).unwrap();

    let main = DomainKpis::from_reports(bundle.get("m.com").unwrap());
    assert_eq!(main.organic_rank, Cell::Number(12.0));
    assert_eq!(main.organic_results, Cell::Number(500.0));
    assert_eq!(main.organic_clicks, Cell::Number(1000.0));
    assert_eq!(main.total_backlinks, Some(1));

    let rival = DomainKpis::from_reports(bundle.get("a.com").unwrap());
    assert_eq!(rival.total_backlinks, None);
}

/// Sends one report to an unreachable endpoint and answers the rest locally.
struct Unreachable {
    client: ApiClient,
    kind: ReportKind,
}

impl ReportSource for Unreachable {
    fn fetch(&self, query: &Query) -> Result<Value, ApiError> {
        if query.kind == self.kind {
            self.client.fetch(query)
        } else {
            Canned.fetch(query)
        }
    }
}

#[test]
fn refused_connection_only_empties_that_report() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let credentials = Credentials::new("id", "secret").unwrap();
    let client = ApiClient::new(&base, &credentials, Duration::from_secs(2)).unwrap();
    let query = Query::new(
        ReportKind::NewlyRankedKeywords,
        "lidl.fr",
        Period { month: 6, year: 2020 },
        CountryCode::Fr,
    );
    assert!(matches!(client.fetch(&query), Err(ApiError::Transport { .. })));

    let source = Unreachable {
        client,
        kind: ReportKind::NewlyRankedKeywords,
    };
    let bundle = aggregate(&source, &plan("lidl.fr", &[]), &Uploads::default(), 1).unwrap();
    let reports = bundle.get("lidl.fr").unwrap();

    let newly = reports.get(Report::Api(ReportKind::NewlyRankedKeywords)).unwrap();
    assert!(newly.is_empty());
    assert_eq!(newly.columns()[0], "Keyword");
    assert!(!reports.get(Report::Api(ReportKind::DomainStats)).unwrap().is_empty());
    assert_eq!(reports.get(Report::Api(ReportKind::AdHistory)).unwrap().len(), 3);
}
