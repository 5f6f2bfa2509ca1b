use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

use crate::aggregate::{aggregate, FetchPlan, Uploads};
use crate::args::Args;
use crate::bundle::ExportBundle;
use crate::client::ApiClient;
use crate::credentials::Credentials;
use crate::domain::{has_valid_tld, normalize_domain, parse_domain_list};
use crate::error::ExportError;
use crate::export::{export_workbook, XLSX_MIME};
use crate::ingest::{read_domain_column, read_workbook_file, SheetSet};
use crate::query::Period;

pub fn default_workers() -> usize {
    std::cmp::min(num_cpus::get(), 8)
}

/// Reads an optional upload. Unreadable files are logged and treated as
/// absent.
fn load_upload(path: Option<&Path>, label: &str) -> Option<SheetSet> {
    let path = path?;
    match read_workbook_file(path) {
        Ok(sheets) => {
            info!(action = "load", component = "upload", upload = label, file_path = ?path, sheet_count = sheets.len(), "Upload loaded");
            Some(sheets)
        }
        Err(e) => {
            warn!(action = "load", component = "upload", upload = label, file_path = ?path, error = %e, "Upload unreadable, no data available");
            None
        }
    }
}

/// Manual competitors first, then those listed in the competitors workbook.
pub fn load_competitors(args: &Args) -> Vec<String> {
    let mut competitors = args
        .competitors
        .as_deref()
        .map(parse_domain_list)
        .unwrap_or_default();

    if let Some(sheets) = load_upload(args.competitors_file.as_deref(), "competitors") {
        competitors.extend(read_domain_column(&sheets).iter().map(|d| normalize_domain(d)));
    }

    for domain in &competitors {
        if !has_valid_tld(domain) {
            warn!(action = "validate", component = "competitors", domain = %domain, "Domain has no recognizable TLD");
        }
    }
    competitors
}

pub fn build_plan(args: &Args) -> FetchPlan {
    let main_domain = normalize_domain(&args.domain);
    if !has_valid_tld(&main_domain) {
        warn!(action = "validate", component = "main_domain", domain = %main_domain, "Domain has no recognizable TLD");
    }

    FetchPlan {
        main_domain,
        competitors: load_competitors(args),
        period: Period {
            month: args.month,
            year: args.year,
        },
        country: args.country,
    }
}

pub fn run_dashboard(args: &Args) -> Result<ExportBundle> {
    let total_start_time = Instant::now();
    info!(action = "start", component = "dashboard", "Starting dashboard run");

    let (Some(api_id), Some(secret_key)) = (args.api_id.as_deref(), args.secret_key.as_deref())
    else {
        anyhow::bail!("API credentials missing: pass --api-id/--secret-key or set SEOLENS_API_ID/SEOLENS_SECRET_KEY");
    };
    let credentials = Credentials::new(api_id, secret_key).context("Invalid API credentials")?;
    let client = ApiClient::new(
        &args.api_base,
        &credentials,
        Duration::from_secs(args.timeout),
    )
    .context("Failed to set up API client")?;

    let plan = build_plan(args);
    let uploads = Uploads {
        backlinks: load_upload(args.backlinks.as_deref(), "backlinks"),
        top_pages: load_upload(args.top_pages.as_deref(), "top_pages"),
    };

    info!(
        action = "configure",
        component = "dashboard",
        api_id = credentials.identifier(),
        main_domain = %plan.main_domain,
        competitor_count = plan.competitors.len(),
        country = %plan.country,
        month = plan.period.month,
        year = plan.period.year,
        "Fetch plan ready"
    );

    let workers = args.workers.unwrap_or_else(default_workers);
    let bundle = aggregate(&client, &plan, &uploads, workers)?;

    info!(
        action = "complete",
        component = "dashboard",
        duration_ms = total_start_time.elapsed().as_millis(),
        "Dashboard run completed"
    );
    Ok(bundle)
}

/// Writes the workbook to `path`. Returns `false` when there was nothing to
/// write.
pub fn write_export(bundle: &ExportBundle, path: &Path) -> Result<bool> {
    let buffer = match export_workbook(bundle) {
        Ok(buffer) => buffer,
        Err(ExportError::NothingToExport) => {
            warn!(action = "export", component = "dashboard", "No data to export, skipping workbook");
            return Ok(false);
        }
        Err(e) => return Err(e).context("Failed to build workbook"),
    };

    fs::write(path, &buffer).with_context(|| format!("Failed to write {:?}", path))?;
    info!(
        action = "export",
        component = "dashboard",
        file_path = ?path,
        bytes = buffer.len(),
        content_type = XLSX_MIME,
        "Workbook saved"
    );
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn plan_normalizes_domains_and_keeps_order() {
        let args = Args::parse_from([
            "seolens",
            "--domain",
            " Lidl.FR ",
            "--competitors",
            "aldi.fr, https://www.carrefour.fr/,",
        ]);
        let plan = build_plan(&args);

        assert_eq!(plan.main_domain, "lidl.fr");
        assert_eq!(plan.competitors, ["aldi.fr", "www.carrefour.fr"]);
        assert_eq!(plan.domains().collect::<Vec<_>>(), ["lidl.fr", "aldi.fr", "www.carrefour.fr"]);
    }

    #[test]
    fn unreadable_upload_is_treated_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("backlinks.xlsx");
        fs::write(&path, b"not a workbook").unwrap();

        assert!(load_upload(Some(path.as_path()), "backlinks").is_none());
        let missing = dir.path().join("missing.xlsx");
        assert!(load_upload(Some(missing.as_path()), "backlinks").is_none());
        assert!(load_upload(None, "backlinks").is_none());
    }

    #[test]
    fn missing_credentials_abort_before_fetching() {
        let mut args = Args::parse_from(["seolens"]);
        args.api_id = None;
        args.secret_key = None;
        let err = run_dashboard(&args).unwrap_err();
        assert!(err.to_string().contains("credentials missing"));
    }

    #[test]
    fn nothing_to_export_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        assert!(!write_export(&ExportBundle::new(), &path).unwrap());
        assert!(!path.exists());
    }
}
