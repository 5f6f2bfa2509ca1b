use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde_json::Value;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use url::Url;

use crate::credentials::Credentials;
use crate::error::ApiError;
use crate::query::{Query, ReportKind};

pub const DEFAULT_API_BASE: &str = "https://www.spyfu.com";
const MAX_ERROR_BODY: usize = 200;

/// Anything that can answer a [`Query`] with a JSON document.
pub trait ReportSource {
    fn fetch(&self, query: &Query) -> Result<Value, ApiError>;
}

pub struct ApiClient {
    http: Client,
    base: Url,
    authorization: String,
}

impl ApiClient {
    pub fn new(base: &str, credentials: &Credentials, timeout: Duration) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("seolens/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base: Url::parse(base)?,
            authorization: credentials.authorization_header(),
        })
    }

    pub fn request_url(&self, query: &Query) -> Result<Url, ApiError> {
        let mut url = self.base.join(query.kind.path())?;
        url.query_pairs_mut()
            .extend_pairs(query.params().iter().map(|(k, v)| (*k, v.as_str())));
        Ok(url)
    }
}

impl ReportSource for ApiClient {
    fn fetch(&self, query: &Query) -> Result<Value, ApiError> {
        let start_time = Instant::now();
        let url = self.request_url(query)?;
        debug!(action = "request", component = "api_client", report = %query.kind, url = %url, "Sending API request");

        let transport = |source: reqwest::Error| ApiError::Transport {
            report: query.kind,
            source,
        };
        let response = self
            .http
            .get(url)
            .header(AUTHORIZATION, &self.authorization)
            .header(ACCEPT, "application/json")
            .send()
            .map_err(transport)?;
        let status = response.status().as_u16();
        let body = response.text().map_err(transport)?;

        info!(
            action = "response",
            component = "api_client",
            report = %query.kind,
            domain = %query.domain,
            status,
            bytes = body.len(),
            duration_ms = start_time.elapsed().as_millis(),
            "API response received"
        );

        interpret_response(query.kind, status, &body)
    }
}

/// Turns a raw status/body pair into JSON. Any non-2xx status is an error
/// even when the body happens to be valid JSON.
pub fn interpret_response(report: ReportKind, status: u16, body: &str) -> Result<Value, ApiError> {
    if !(200..300).contains(&status) {
        return Err(ApiError::Status {
            report,
            status,
            message: body.chars().take(MAX_ERROR_BODY).collect(),
        });
    }
    serde_json::from_str(body).map_err(|source| ApiError::Parse { report, source })
}
