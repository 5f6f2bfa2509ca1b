use clap::ValueEnum;
use std::fmt;

/// Reports served by the upstream API, in the order they are fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ReportKind {
    DomainStats,
    ValuableKeywords,
    NewlyRankedKeywords,
    GainedClicksKeywords,
    PpcKeywords,
    AdHistory,
}

impl ReportKind {
    pub const ALL: [ReportKind; 6] = [
        ReportKind::DomainStats,
        ReportKind::ValuableKeywords,
        ReportKind::NewlyRankedKeywords,
        ReportKind::GainedClicksKeywords,
        ReportKind::PpcKeywords,
        ReportKind::AdHistory,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            ReportKind::DomainStats => "domain-stats",
            ReportKind::ValuableKeywords => "valuable-keywords",
            ReportKind::NewlyRankedKeywords => "newly-ranked-keywords",
            ReportKind::GainedClicksKeywords => "gained-clicks-keywords",
            ReportKind::PpcKeywords => "ppc-keywords",
            ReportKind::AdHistory => "ad-history",
        }
    }

    /// Human-readable name, also used as the export sheet prefix.
    pub fn title(self) -> &'static str {
        match self {
            ReportKind::DomainStats => "Domain Stats",
            ReportKind::ValuableKeywords => "Most Valuable Keywords",
            ReportKind::NewlyRankedKeywords => "Newly Ranked Keywords",
            ReportKind::GainedClicksKeywords => "Gained Clicks Keywords",
            ReportKind::PpcKeywords => "PPC Keywords",
            ReportKind::AdHistory => "Ad History",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            ReportKind::DomainStats => "/apis/domain_stats_api/v2/getDomainStatsForExactDate",
            ReportKind::ValuableKeywords => "/apis/serp_api/v2/seo/getMostValuableKeywords",
            ReportKind::NewlyRankedKeywords => "/apis/serp_api/v2/seo/getNewlyRankedKeywords",
            ReportKind::GainedClicksKeywords => "/apis/serp_api/v2/seo/getGainedClicksKeywords",
            ReportKind::PpcKeywords => "/apis/keyword_api/v2/ppc/getMostSuccessful",
            ReportKind::AdHistory => "/apis/ad_history_api/domain_ad_history_with_metrics",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "UPPER")]
pub enum CountryCode {
    Ar,
    Au,
    Br,
    Ca,
    De,
    Es,
    Fr,
    Ie,
    In,
    It,
    Jp,
    Mx,
    Nl,
    Nz,
    Sg,
    Ua,
    Uk,
    Us,
    Za,
}

impl CountryCode {
    pub fn as_str(self) -> &'static str {
        match self {
            CountryCode::Ar => "AR",
            CountryCode::Au => "AU",
            CountryCode::Br => "BR",
            CountryCode::Ca => "CA",
            CountryCode::De => "DE",
            CountryCode::Es => "ES",
            CountryCode::Fr => "FR",
            CountryCode::Ie => "IE",
            CountryCode::In => "IN",
            CountryCode::It => "IT",
            CountryCode::Jp => "JP",
            CountryCode::Mx => "MX",
            CountryCode::Nl => "NL",
            CountryCode::Nz => "NZ",
            CountryCode::Sg => "SG",
            CountryCode::Ua => "UA",
            CountryCode::Uk => "UK",
            CountryCode::Us => "US",
            CountryCode::Za => "ZA",
        }
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ad history is only served for the US market.
const AD_HISTORY_COUNTRY: CountryCode = CountryCode::Us;
const AD_HISTORY_MAX_ADS: &str = "200";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Period {
    pub month: u8,
    pub year: u16,
}

/// A single request against the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub kind: ReportKind,
    pub domain: String,
    pub period: Period,
    pub country: CountryCode,
}

impl Query {
    pub fn new(kind: ReportKind, domain: &str, period: Period, country: CountryCode) -> Self {
        Self {
            kind,
            domain: domain.to_string(),
            period,
            country,
        }
    }

    /// Query parameters in the order the API documents them. Values are raw;
    /// the client takes care of encoding.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let domain = self.domain.clone();
        let country = self.country.as_str().to_string();
        let fixed = |pairs: &[(&'static str, &str)]| {
            pairs
                .iter()
                .map(|(k, v)| (*k, v.to_string()))
                .collect::<Vec<_>>()
        };

        match self.kind {
            ReportKind::DomainStats => vec![
                ("month", self.period.month.to_string()),
                ("year", self.period.year.to_string()),
                ("domain", domain),
                ("countryCode", country),
            ],
            ReportKind::ValuableKeywords => {
                let mut p = vec![("query", domain)];
                p.extend(fixed(&[
                    ("sortBy", "seoClicks"),
                    ("sortOrder", "Descending"),
                    ("startingRow", "1"),
                    ("pageSize", "11"),
                ]));
                p.push(("countryCode", country));
                p
            }
            ReportKind::NewlyRankedKeywords => {
                let mut p = vec![("query", domain)];
                p.extend(fixed(&[
                    ("sortBy", "SeoClicks"),
                    ("sortOrder", "Descending"),
                    ("startingRow", "1"),
                    ("pageSize", "10"),
                ]));
                p.push(("countryCode", country));
                p
            }
            ReportKind::GainedClicksKeywords => {
                let mut p = vec![("query", domain)];
                p.extend(fixed(&[
                    ("sortBy", "SearchVolume"),
                    ("sortOrder", "Descending"),
                    ("startingRow", "1"),
                    ("pageSize", "5"),
                ]));
                p.push(("countryCode", country));
                p
            }
            ReportKind::PpcKeywords => {
                let mut p = vec![("query", domain.clone()), ("excludeDomain", domain)];
                p.extend(fixed(&[("sortBy", "SearchVolume"), ("pageSize", "10")]));
                p.push(("countryCode", country));
                p.push(("adultFilter", "true".to_string()));
                p
            }
            ReportKind::AdHistory => vec![
                ("d", domain),
                ("m", AD_HISTORY_MAX_ADS.to_string()),
                ("countryCode", AD_HISTORY_COUNTRY.as_str().to_string()),
            ],
        }
    }
}
