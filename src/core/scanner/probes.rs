// src/core/scanner/probes.rs

//! The seams between the scoring engine and the network. Each trait has one
//! production adapter in this module tree and can be replaced by a fake in tests.

use crate::core::error::ProbeError;
use crate::core::models::{HttpProbe, IncidentRecord, TlsVersion};
use async_trait::async_trait;
use std::net::IpAddr;
use url::Url;

/// Issues the primary HEAD request.
#[async_trait]
pub trait HttpProber: Send + Sync {
    async fn head(&self, url: &Url) -> Result<HttpProbe, ProbeError>;
}

/// What a completed TLS handshake exposes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TlsSession {
    /// DER-encoded certificates, leaf first.
    pub peer_certificates: Vec<Vec<u8>>,
    pub peer_ip: Option<IpAddr>,
    pub protocol_version: Option<TlsVersion>,
}

/// Dials `host:port` and completes a TLS handshake within a bounded time.
#[async_trait]
pub trait TlsDialer: Send + Sync {
    async fn dial(&self, host: &str, port: u16) -> Result<TlsSession, String>;
}

/// Returns the raw TXT strings published at a DNS name.
/// A name without TXT records yields an empty list, not an error.
#[async_trait]
pub trait TxtResolver: Send + Sync {
    async fn txt(&self, name: &str) -> Result<Vec<String>, String>;
}

/// Returns the publicly disclosed incidents for a domain.
#[async_trait]
pub trait IncidentFeed: Send + Sync {
    async fn incidents(&self, domain: &str) -> Result<Vec<IncidentRecord>, String>;
}
