// src/core/scanner/headers_scanner.rs

use tracing::{debug, error, info, warn};

use crate::core::error::ProbeError;
use crate::core::models::{HeaderSet, HttpProbe, TlsVersion};
use crate::core::scanner::probes::HttpProber;
use crate::core::scanner::{dial_host, ssl_scanner};
use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::tls::Version;
use std::error::Error as StdError;
use std::time::Duration;
use url::Url;

/// Fragments the connector puts in the error chain when name resolution fails.
const RESOLUTION_FAILURE_MARKERS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "no such host",
    "name or service not known",
    "nodename nor servname",
];

/// The production `HttpProber`: one HEAD request through `reqwest`, plus a
/// separate handshake to learn the negotiated TLS version for `https` targets.
///
/// Both run on the platform TLS stack with TLS 1.0 allowed, so legacy-only
/// servers are graded rather than unreachable.
pub struct ReqwestProber {
    client: reqwest::Client,
    tls_timeout: Duration,
}

impl ReqwestProber {
    pub fn new(user_agent: &str, http_timeout: Duration, tls_timeout: Duration) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .use_native_tls()
            .min_tls_version(Version::TLS_1_0)
            .user_agent(user_agent)
            .timeout(http_timeout)
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client for header probe.");
                format!("Failed to build HTTP client: {e}")
            })?;
        Ok(Self { client, tls_timeout })
    }

    async fn negotiated_tls_version(&self, url: &Url) -> Option<TlsVersion> {
        if url.scheme() != "https" {
            return None;
        }
        let host = dial_host(url)?;
        let port = url.port_or_known_default().unwrap_or(443);
        match ssl_scanner::negotiate_version(&host, port, self.tls_timeout).await {
            Ok(version) => Some(version),
            Err(e) => {
                // The HEAD request went over TLS, so the check still applies.
                warn!(host, error = %e, "Could not determine negotiated TLS version.");
                Some(TlsVersion::Other("unknown".to_string()))
            }
        }
    }
}

#[async_trait]
impl HttpProber for ReqwestProber {
    async fn head(&self, url: &Url) -> Result<HttpProbe, ProbeError> {
        info!(url = %url, "Starting header probe.");
        let host = url.host_str().unwrap_or_default().to_string();

        let response = self.client.head(url.clone()).send().await.map_err(|e| {
            error!(url = %url, error = %e, "HEAD request failed.");
            classify_request_error(&host, &e)
        })?;
        info!(status = %response.status(), "Received HTTP response for header probe.");

        let headers = header_set_from(response.headers());
        if headers.is_empty() {
            warn!(url = %url, "Response carried no headers; every header check will score as absent.");
        }
        let protocol_version = format!("{:?}", response.version());
        let tls_version = self.negotiated_tls_version(response.url()).await;

        info!(headers = headers.len(), protocol = %protocol_version, "Header probe finished.");
        Ok(HttpProbe { headers, protocol_version, tls_version })
    }
}

/// Separates "the name does not resolve" from every other transport failure.
pub fn classify_request_error(host: &str, err: &reqwest::Error) -> ProbeError {
    let chain = error_chain(err);
    if is_resolution_failure(&chain) {
        ProbeError::UnresolvableHost { host: host.to_string(), message: chain }
    } else {
        ProbeError::Transport(chain)
    }
}

fn error_chain(err: &dyn StdError) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn is_resolution_failure(chain: &str) -> bool {
    let chain = chain.to_ascii_lowercase();
    RESOLUTION_FAILURE_MARKERS.iter().any(|marker| chain.contains(marker))
}

/// Converts the response headers, keeping non-UTF-8 values as a placeholder
/// so their presence still counts.
pub fn header_set_from(headers: &HeaderMap) -> HeaderSet {
    HeaderSet::from_pairs(headers.iter().map(|(name, value)| {
        let value = match value.to_str() {
            Ok(s) => s.to_string(),
            Err(_) => {
                warn!(header_name = %name, "Header found but contained invalid UTF-8.");
                "[Invalid UTF-8]".to_string()
            }
        };
        debug!(header_name = %name, value = %value, "Header found.");
        (name.as_str().to_string(), value)
    }))
}
