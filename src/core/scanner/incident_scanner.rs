// src/core/scanner/incident_scanner.rs

use tracing::{debug, error, info, warn};

use crate::core::models::IncidentRecord;
use crate::core::scanner::probes::IncidentFeed;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// The `<item>` list of the disclosure feed. The root element name is ignored.
#[derive(Debug, Default, Deserialize)]
struct FeedDocument {
    #[serde(rename = "item", default)]
    items: Vec<FeedItem>,
}

#[derive(Debug, Deserialize)]
struct FeedItem {
    #[serde(default)]
    url: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    reporteddate: Option<String>,
    #[serde(default)]
    fixed: Option<String>,
    #[serde(default)]
    fixeddate: Option<String>,
}

/// The production `IncidentFeed`: an HTTP GET against an XML search API,
/// with the domain appended to `base_url`.
pub struct XmlIncidentFeed {
    client: reqwest::Client,
    base_url: String,
}

impl XmlIncidentFeed {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {e}"))?;
        Ok(Self { client, base_url: base_url.to_string() })
    }
}

#[async_trait]
impl IncidentFeed for XmlIncidentFeed {
    async fn incidents(&self, domain: &str) -> Result<Vec<IncidentRecord>, String> {
        let url = format!("{}{}", self.base_url, domain);
        info!(url = %url, "Fetching disclosed incidents.");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| {
                error!(url = %url, error = %e, "Incident feed request failed.");
                format!("Incident feed request failed: {e}")
            })?;
        let body = response
            .text()
            .await
            .map_err(|e| format!("Failed to read incident feed response: {e}"))?;
        debug!(bytes = body.len(), "Incident feed body received.");

        let incidents = parse_incident_feed(&body)?;
        info!(count = incidents.len(), "Incident feed parsed.");
        Ok(incidents)
    }
}

/// Parses the feed XML. Every item becomes a record; unreadable dates become `None`.
pub fn parse_incident_feed(xml: &str) -> Result<Vec<IncidentRecord>, String> {
    let document: FeedDocument =
        quick_xml::de::from_str(xml).map_err(|e| format!("Malformed incident feed: {e}"))?;

    let incidents = document
        .items
        .into_iter()
        .map(|item| {
            let reported_date = item.reporteddate.as_deref().and_then(parse_feed_date);
            if reported_date.is_none() {
                warn!(url = ?item.url, raw = ?item.reporteddate, "Incident has no readable report date.");
            }
            IncidentRecord {
                reported_date,
                fixed_date: item.fixeddate.as_deref().and_then(parse_feed_date),
                fixed: item.fixed.as_deref().is_some_and(parse_flag),
                kind: non_empty(item.kind),
                url: non_empty(item.url),
            }
        })
        .collect();
    Ok(incidents)
}

/// Accepts RFC 2822 / RFC 1123 dates, RFC 3339, and a plain `YYYY-MM-DD HH:MM:SS` in UTC.
pub fn parse_feed_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DateTime::parse_from_rfc2822(value)
        .or_else(|_| DateTime::parse_from_rfc3339(value))
        .map(|date| date.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|naive| naive.and_utc())
        })
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes")
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}
