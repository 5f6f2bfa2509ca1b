#![allow(dead_code)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use seolens::error::ApiError;
use seolens::query::{Query, ReportKind};
use seolens::ReportSource;
use serde_json::{json, Value};
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

pub fn cmd() -> Command {
    let mut cmd = cargo_bin_cmd!("seolens");
    cmd.env_remove("RUST_LOG")
        .env_remove("SEOLENS_API_ID")
        .env_remove("SEOLENS_SECRET_KEY")
        .env_remove("SEOLENS_API_BASE");
    cmd
}

/// Canned API body for each report, keyed by the queried domain so rows can
/// be told apart.
pub fn canned_response(kind: ReportKind, domain: &str) -> Value {
    match kind {
        ReportKind::DomainStats => json!({"resultCount": 1, "results": [{
            "averageOrganicRank": 12,
            "totalOrganicResults": 500,
            "monthlyOrganicClicks": 1000,
            "monthlyPaidClicks": 40
        }]}),
        ReportKind::ValuableKeywords => json!({"results": []}),
        ReportKind::NewlyRankedKeywords => json!({"results": [
            {"keyword": format!("{domain} promo"), "searchVolume": 880, "rank": 4, "seoClicks": 120},
            {"keyword": format!("{domain} horaires"), "searchVolume": 320, "rank": 9}
        ]}),
        ReportKind::GainedClicksKeywords => json!({"error": "unexpected"}),
        ReportKind::PpcKeywords => json!({"results": "not a list"}),
        ReportKind::AdHistory => json!({"keywords": [
            {"keyword": "drive", "searchVolume": 5400, "top_ads": [
                {"title": "Drive gratuit", "body": "Commandez", "position": 1, "date": 20240615},
                {"title": "Retrait 2h", "position": 2}
            ]},
            {"keyword": "catalogue", "top_ads": [
                {"title": "Catalogue", "body": "Cette semaine", "position": 1, "date": "20230102"}
            ]}
        ]}),
    }
}

pub struct Canned;

impl ReportSource for Canned {
    fn fetch(&self, query: &Query) -> Result<Value, ApiError> {
        Ok(canned_response(query.kind, &query.domain))
    }
}

/// Answers `count` HTTP requests, choosing the body by request path.
pub fn serve(count: usize) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind test server");
    let base = format!("http://{}", listener.local_addr().expect("local addr"));

    thread::spawn(move || {
        for stream in listener.incoming().take(count) {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().expect("clone stream"));
            let mut request_line = String::new();
            reader.read_line(&mut request_line).expect("read request line");
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
            }

            let path = request_line.split_whitespace().nth(1).unwrap_or("/");
            let kind = ReportKind::ALL
                .into_iter()
                .find(|k| path.starts_with(k.path()));
            let body = match kind {
                Some(kind) => canned_response(kind, "test.com").to_string(),
                None => "{}".to_string(),
            };
            let _ = write!(
                stream,
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
        }
    });

    base
}
