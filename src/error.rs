use thiserror::Error;

use crate::query::ReportKind;

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("API identifier must not be empty")]
    EmptyIdentifier,

    #[error("API secret must not be empty")]
    EmptySecret,

    #[error("API identifier must not contain ':'")]
    ColonInIdentifier,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request for {report} failed: {source}")]
    Transport {
        report: ReportKind,
        #[source]
        source: reqwest::Error,
    },

    #[error("API returned HTTP {status} for {report}: {message}")]
    Status {
        report: ReportKind,
        status: u16,
        message: String,
    },

    #[error("Response for {report} is not valid JSON: {source}")]
    Parse {
        report: ReportKind,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to open workbook: {0}")]
    Open(#[from] calamine::Error),

    #[error("Workbook contains no sheets")]
    NoSheets,

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("No non-empty tables to export")]
    NothingToExport,

    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}
