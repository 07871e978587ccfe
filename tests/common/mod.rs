// tests/common/mod.rs

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use url::Url;
use vanguard_score::core::error::ProbeError;
use vanguard_score::core::models::{HeaderSet, HttpProbe, IncidentRecord, TlsVersion};
use vanguard_score::core::scanner::probes::{HttpProber, IncidentFeed, TlsDialer, TlsSession, TxtResolver};
use vanguard_score::core::server_catalog::ServerCatalog;
use vanguard_score::ScoreEngine;

pub enum HttpBehavior {
    Respond(HttpProbe),
    Unresolvable,
    Refused,
}

pub struct FakeHttp(pub HttpBehavior);

#[async_trait]
impl HttpProber for FakeHttp {
    async fn head(&self, url: &Url) -> Result<HttpProbe, ProbeError> {
        match &self.0 {
            HttpBehavior::Respond(probe) => Ok(probe.clone()),
            HttpBehavior::Unresolvable => Err(ProbeError::UnresolvableHost {
                host: url.host_str().unwrap_or_default().to_string(),
                message: "no record found".to_string(),
            }),
            HttpBehavior::Refused => Err(ProbeError::Transport("connection refused".to_string())),
        }
    }
}

pub struct FakeTls(pub Result<TlsSession, String>);

#[async_trait]
impl TlsDialer for FakeTls {
    async fn dial(&self, _host: &str, _port: u16) -> Result<TlsSession, String> {
        self.0.clone()
    }
}

/// Answers from a fixed table; unknown names have no records. When `failure`
/// is set every lookup fails with it.
#[derive(Default)]
pub struct FakeDns {
    pub records: HashMap<String, Vec<String>>,
    pub failure: Option<String>,
}

impl FakeDns {
    pub fn failing(message: &str) -> Self {
        Self { records: HashMap::new(), failure: Some(message.to_string()) }
    }

    pub fn with(mut self, name: &str, values: &[&str]) -> Self {
        self.records
            .insert(name.to_string(), values.iter().map(|v| v.to_string()).collect());
        self
    }
}

#[async_trait]
impl TxtResolver for FakeDns {
    async fn txt(&self, name: &str) -> Result<Vec<String>, String> {
        if let Some(failure) = &self.failure {
            return Err(failure.clone());
        }
        Ok(self.records.get(name).cloned().unwrap_or_default())
    }
}

pub struct FakeFeed(pub Result<Vec<IncidentRecord>, String>);

#[async_trait]
impl IncidentFeed for FakeFeed {
    async fn incidents(&self, _domain: &str) -> Result<Vec<IncidentRecord>, String> {
        self.0.clone()
    }
}

pub fn probe(headers: &[(&str, &str)], protocol_version: &str, tls: Option<TlsVersion>) -> HttpProbe {
    HttpProbe {
        headers: HeaderSet::from_pairs(headers.iter().copied()),
        protocol_version: protocol_version.to_string(),
        tls_version: tls,
    }
}

pub fn engine(http: HttpBehavior, tls: Result<TlsSession, String>, dns: FakeDns, feed: FakeFeed) -> ScoreEngine {
    let catalog = ServerCatalog::embedded().expect("embedded catalog parses");
    ScoreEngine::new(
        Arc::new(FakeHttp(http)),
        Arc::new(FakeTls(tls)),
        Arc::new(dns),
        Arc::new(feed),
        Arc::new(catalog),
    )
}
