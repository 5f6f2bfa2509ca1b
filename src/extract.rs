use chrono::NaiveDate;
use serde_json::{Map, Value};
use tracing::warn;

use crate::query::ReportKind;
use crate::table::{Cell, Record, Table};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Plain,
    /// `YYYYMMDD` packed into a number or string.
    CompactDate,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub header: &'static str,
    pub source: &'static str,
    pub kind: ColumnKind,
}

const fn plain(header: &'static str, source: &'static str) -> Column {
    Column {
        header,
        source,
        kind: ColumnKind::Plain,
    }
}

/// Nested list expanded into one row per child element.
#[derive(Debug, Clone, Copy)]
pub struct Child {
    pub list_key: &'static str,
    pub columns: &'static [Column],
}

/// Projection of one report's JSON into a table.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub list_key: &'static str,
    pub columns: &'static [Column],
    pub child: Option<Child>,
    pub skip_leading: usize,
}

impl Schema {
    pub fn headers(&self) -> Vec<&'static str> {
        let child = self.child.map(|c| c.columns).unwrap_or(&[]);
        self.columns
            .iter()
            .chain(child)
            .map(|c| c.header)
            .collect()
    }
}

const DOMAIN_STATS: Schema = Schema {
    list_key: "results",
    columns: &[
        plain("Organic Rank", "averageOrganicRank"),
        plain("Organic Results", "totalOrganicResults"),
        plain("Organic Clicks", "monthlyOrganicClicks"),
        plain("Paid Clicks", "monthlyPaidClicks"),
        plain("Ads Purchased", "totalAdsPurchased"),
    ],
    child: None,
    skip_leading: 0,
};

// Eleven rows are requested and the first, the domain's own top keyword, is
// dropped so the table lists ten.
const VALUABLE_KEYWORDS: Schema = Schema {
    list_key: "results",
    columns: &[
        plain("Keyword", "keyword"),
        plain("Search Volume", "searchVolume"),
        plain("SEO Clicks", "seoClicks"),
    ],
    child: None,
    skip_leading: 1,
};

const NEWLY_RANKED_KEYWORDS: Schema = Schema {
    list_key: "results",
    columns: &[
        plain("Keyword", "keyword"),
        plain("Search Volume", "searchVolume"),
        plain("Rank", "rank"),
        plain("SEO Clicks", "seoClicks"),
    ],
    child: None,
    skip_leading: 0,
};

const GAINED_CLICKS_KEYWORDS: Schema = Schema {
    list_key: "results",
    columns: &[
        plain("Keyword", "keyword"),
        plain("Rank", "rank"),
        plain("SEO Clicks", "seoClicks"),
    ],
    child: None,
    skip_leading: 0,
};

const PPC_KEYWORDS: Schema = Schema {
    list_key: "results",
    columns: &[
        plain("Keyword", "keyword"),
        plain("Search Volume", "searchVolume"),
        plain("Cost Per Click", "broadCostPerClick"),
        plain("Ranking Difficulty", "rankingDifficulty"),
    ],
    child: None,
    skip_leading: 0,
};

const AD_HISTORY: Schema = Schema {
    list_key: "keywords",
    columns: &[
        plain("Keyword", "keyword"),
        plain("Search Volume", "searchVolume"),
    ],
    child: Some(Child {
        list_key: "top_ads",
        columns: &[
            plain("Ad Title", "title"),
            plain("Ad Body", "body"),
            plain("Ad Position", "position"),
            Column {
                header: "Date",
                source: "date",
                kind: ColumnKind::CompactDate,
            },
        ],
    }),
    skip_leading: 0,
};

pub fn schema(kind: ReportKind) -> &'static Schema {
    match kind {
        ReportKind::DomainStats => &DOMAIN_STATS,
        ReportKind::ValuableKeywords => &VALUABLE_KEYWORDS,
        ReportKind::NewlyRankedKeywords => &NEWLY_RANKED_KEYWORDS,
        ReportKind::GainedClicksKeywords => &GAINED_CLICKS_KEYWORDS,
        ReportKind::PpcKeywords => &PPC_KEYWORDS,
        ReportKind::AdHistory => &AD_HISTORY,
    }
}

/// Empty table carrying the report's fixed columns.
pub fn empty_table(kind: ReportKind) -> Table {
    Table::new(schema(kind).headers())
}

pub fn extract(kind: ReportKind, response: &Value) -> Table {
    extract_with(schema(kind), response)
}

/// Evaluates `schema` against `response`. A missing or non-list top-level key
/// yields an empty table, never an error.
pub fn extract_with(schema: &Schema, response: &Value) -> Table {
    let mut table = Table::new(schema.headers());

    let Some(items) = response.get(schema.list_key).and_then(Value::as_array) else {
        return table;
    };

    for item in items {
        let object = item.as_object();
        let parent = project(schema.columns, object);

        match schema.child {
            None => table.push(parent),
            Some(child) => {
                let Some(children) = object
                    .and_then(|o| o.get(child.list_key))
                    .and_then(Value::as_array)
                else {
                    continue;
                };
                for element in children {
                    let mut record = parent.clone();
                    record.extend(project(child.columns, element.as_object()));
                    table.push(record);
                }
            }
        }
    }

    table.skip_leading(schema.skip_leading);
    table
}

fn project(columns: &[Column], object: Option<&Map<String, Value>>) -> Record {
    columns
        .iter()
        .map(|column| {
            let cell = Cell::from_json(object.and_then(|o| o.get(column.source)));
            match column.kind {
                ColumnKind::Plain => cell,
                ColumnKind::CompactDate => compact_date(cell),
            }
        })
        .collect()
}

/// Converts `20240615` (number or string) into a date. `Missing` passes
/// through; anything unparseable is kept as-is.
pub fn compact_date(cell: Cell) -> Cell {
    let raw = match &cell {
        Cell::Number(n) if n.fract() == 0.0 && *n >= 0.0 => format!("{}", *n as u64),
        Cell::Text(s) => s.trim().to_string(),
        _ => return cell,
    };

    match NaiveDate::parse_from_str(&raw, "%Y%m%d") {
        Ok(date) if raw.len() == 8 => Cell::Date(date),
        _ => {
            warn!(action = "parse", component = "compact_date", value = %raw, "Unrecognized compact date");
            cell
        }
    }
}
