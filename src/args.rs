use clap::Parser;
use std::path::PathBuf;

use crate::client::DEFAULT_API_BASE;
use crate::export::DEFAULT_EXPORT_FILENAME;
use crate::query::CountryCode;

#[derive(Parser, Debug)]
#[command(
    name = "seolens",
    about = "Fetch SEO/SEA KPIs for a domain and its competitors and export them to a spreadsheet",
    version,
    long_about = None
)]
pub struct Args {
    /// Main domain to analyze
    #[arg(short, long, default_value = "lidl.fr")]
    pub domain: String,

    /// Competitor domains, comma-separated
    #[arg(short, long)]
    pub competitors: Option<String>,

    /// Workbook whose first column lists competitor domains
    #[arg(long)]
    pub competitors_file: Option<PathBuf>,

    /// Workbook with one backlinks sheet per domain (main first)
    #[arg(long)]
    pub backlinks: Option<PathBuf>,

    /// Workbook with one top pages sheet per domain (main first)
    #[arg(long)]
    pub top_pages: Option<PathBuf>,

    /// Market to query
    #[arg(long, value_enum, ignore_case = true, default_value = "FR")]
    pub country: CountryCode,

    /// Month of the domain stats snapshot (1-12)
    #[arg(short, long, default_value_t = 6)]
    pub month: u8,

    /// Year of the domain stats snapshot
    #[arg(short, long, default_value_t = 2020)]
    pub year: u16,

    /// API identifier
    #[arg(long, env = "SEOLENS_API_ID", hide_env_values = true)]
    pub api_id: Option<String>,

    /// API secret key
    #[arg(long, env = "SEOLENS_SECRET_KEY", hide_env_values = true)]
    pub secret_key: Option<String>,

    /// Base URL of the API
    #[arg(long, env = "SEOLENS_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Path of the exported workbook
    #[arg(short, long, default_value = DEFAULT_EXPORT_FILENAME)]
    pub output: PathBuf,

    /// Skip writing the workbook
    #[arg(long)]
    pub no_export: bool,

    /// Print the collected tables as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of domains fetched in parallel
    #[arg(short, long)]
    pub workers: Option<usize>,
}
