pub mod aggregate;
pub mod args;
pub mod bundle;
pub mod client;
pub mod credentials;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod export;
pub mod extract;
pub mod ingest;
pub mod query;
pub mod report;
pub mod stats;
pub mod table;
pub mod utils;

pub use aggregate::{aggregate, FetchPlan, Uploads};
pub use args::Args;
pub use bundle::{DomainReportSet, ExportBundle, Report};
pub use client::{ApiClient, ReportSource};
pub use dashboard::run_dashboard;
pub use stats::DomainKpis;
pub use table::{Cell, Table};
