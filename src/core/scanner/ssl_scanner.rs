// src/core/scanner/ssl_scanner.rs

use tracing::{debug, info, warn};

use crate::core::models::{CertificateSummary, TlsVersion};
use crate::core::scanner::probes::{TlsDialer, TlsSession};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use openssl::ssl::{SslConnector, SslMethod, SslVerifyMode, SslVersion};
use rustls::{ClientConfig, ProtocolVersion, RootCertStore};
use rustls_pki_types::ServerName;
use std::collections::BTreeSet;
use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use x509_parser::prelude::*;

/// Builds the client configuration shared by every handshake: ring crypto,
/// the Mozilla root store, and the library's safe protocol versions.
pub fn client_config() -> Result<Arc<ClientConfig>, String> {
    let mut root_store = RootCertStore::empty();
    root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let config = ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| format!("TLS configuration error: {e}"))?
        .with_root_certificates(root_store)
        .with_no_client_auth();
    Ok(Arc::new(config))
}

/// Connects to `host:port` and completes a TLS handshake, all within `limit`.
pub async fn handshake(
    config: Arc<ClientConfig>,
    host: &str,
    port: u16,
    limit: Duration,
) -> Result<TlsSession, String> {
    let server_name = ServerName::try_from(host)
        .map_err(|e| format!("Invalid server name '{host}': {e}"))?
        .to_owned();
    let connector = TlsConnector::from(config);

    let attempt = async {
        debug!(host, port, "Connecting TCP stream.");
        let stream = TcpStream::connect((host, port))
            .await
            .map_err(|e| format!("TCP Connection Error: {e}"))?;
        let peer_ip = stream.peer_addr().ok().map(|addr| addr.ip());

        debug!(host, "Performing TLS handshake.");
        let tls_stream = connector
            .connect(server_name, stream)
            .await
            .map_err(|e| format!("TLS Handshake Error: {e}"))?;

        let (_, connection) = tls_stream.get_ref();
        let peer_certificates = connection
            .peer_certificates()
            .map(|chain| chain.iter().map(|cert| cert.as_ref().to_vec()).collect())
            .unwrap_or_default();

        Ok::<_, String>(TlsSession {
            peer_certificates,
            peer_ip,
            protocol_version: connection.protocol_version().map(tls_version_from),
        })
    };

    timeout(limit, attempt)
        .await
        .map_err(|_| format!("TLS dial to {host}:{port} timed out after {}s", limit.as_secs()))?
}

/// rustls only speaks TLS 1.2 and 1.3; older servers never get this far.
pub fn tls_version_from(version: ProtocolVersion) -> TlsVersion {
    match version {
        ProtocolVersion::TLSv1_2 => TlsVersion::Tls12,
        ProtocolVersion::TLSv1_3 => TlsVersion::Tls13,
        other => TlsVersion::Other(format!("{other:?}")),
    }
}

/// `None` for anything older than TLS 1.0.
pub fn tls_version_from_openssl(version: SslVersion) -> Option<TlsVersion> {
    if version == SslVersion::TLS1 {
        Some(TlsVersion::Tls10)
    } else if version == SslVersion::TLS1_1 {
        Some(TlsVersion::Tls11)
    } else if version == SslVersion::TLS1_2 {
        Some(TlsVersion::Tls12)
    } else if version == SslVersion::TLS1_3 {
        Some(TlsVersion::Tls13)
    } else {
        None
    }
}

/// Handshakes with OpenSSL, which still negotiates TLS 1.0 and 1.1, and
/// reports the agreed version. The certificate is not verified: only the
/// version matters here, and the certificate has its own probe.
pub async fn negotiate_version(host: &str, port: u16, limit: Duration) -> Result<TlsVersion, String> {
    let stream = timeout(limit, TcpStream::connect((host, port)))
        .await
        .map_err(|_| format!("TLS dial to {host}:{port} timed out after {}s", limit.as_secs()))?
        .map_err(|e| format!("TCP Connection Error: {e}"))?;
    let std_stream = stream
        .into_std()
        .map_err(|e| format!("TCP Connection Error: {e}"))?;
    std_stream
        .set_nonblocking(false)
        .and_then(|_| std_stream.set_read_timeout(Some(limit)))
        .and_then(|_| std_stream.set_write_timeout(Some(limit)))
        .map_err(|e| format!("TCP Connection Error: {e}"))?;

    let host = host.to_string();
    tokio::task::spawn_blocking(move || -> Result<TlsVersion, String> {
        let mut builder =
            SslConnector::builder(SslMethod::tls()).map_err(|e| format!("TLS configuration error: {e}"))?;
        builder
            .set_min_proto_version(Some(SslVersion::TLS1))
            .map_err(|e| format!("TLS configuration error: {e}"))?;
        // Security level 1+ refuses TLS 1.0/1.1 on current OpenSSL builds.
        builder.set_security_level(0);
        builder.set_verify(SslVerifyMode::NONE);
        let connector = builder.build();

        let tls_stream = connector
            .configure()
            .map_err(|e| format!("TLS configuration error: {e}"))?
            .use_server_name_indication(host.parse::<IpAddr>().is_err())
            .verify_hostname(false)
            .connect(&host, std_stream)
            .map_err(|e| format!("TLS Handshake Error: {e}"))?;

        let ssl = tls_stream.ssl();
        let version = ssl
            .version2()
            .and_then(tls_version_from_openssl)
            .unwrap_or_else(|| TlsVersion::Other(ssl.version_str().to_string()));
        debug!(host = %host, version = %version, "Negotiated TLS version.");
        Ok(version)
    })
    .await
    .map_err(|e| format!("TLS handshake task failed: {e}"))?
}

/// The production `TlsDialer`.
pub struct RustlsDialer {
    config: Arc<ClientConfig>,
    timeout: Duration,
}

impl RustlsDialer {
    pub fn new(config: Arc<ClientConfig>, timeout: Duration) -> Self {
        Self { config, timeout }
    }
}

#[async_trait]
impl TlsDialer for RustlsDialer {
    async fn dial(&self, host: &str, port: u16) -> Result<TlsSession, String> {
        handshake(self.config.clone(), host, port, self.timeout).await
    }
}

/// Dials the target and summarizes its leaf certificate.
///
/// Never fails: a dial, handshake or parse error ends up in `error`.
pub async fn summarize_certificate(dialer: &dyn TlsDialer, host: &str, port: u16) -> CertificateSummary {
    info!(host, port, "Starting certificate scan.");
    let summary = match dialer.dial(host, port).await {
        Ok(session) => summarize_session(host, &session),
        Err(e) => {
            warn!(host, port, error = %e, "TLS dial failed.");
            CertificateSummary::failed(host, e)
        }
    };
    info!(host, has_error = summary.error.is_some(), "Certificate scan finished.");
    summary
}

/// Extracts the leaf certificate facts from a completed handshake.
pub fn summarize_session(host: &str, session: &TlsSession) -> CertificateSummary {
    let Some(leaf) = session.peer_certificates.first() else {
        debug!(host, "TLS connection succeeded but no peer certificate was provided.");
        return CertificateSummary::failed(host, "Server did not provide a certificate.");
    };

    let x509 = match parse_x509_certificate(leaf) {
        Ok((_, x509)) => x509,
        Err(e) => {
            warn!(host, error = %e, "Failed to parse X.509 certificate.");
            return CertificateSummary::failed(host, format!("X.509 Parse Error: {e}"));
        }
    };

    info!(subject = %x509.subject(), issuer = %x509.issuer(), "Successfully parsed certificate.");

    let subject_alt_names: BTreeSet<String> = match x509.subject_alternative_name() {
        Ok(Some(extension)) => extension
            .value
            .general_names
            .iter()
            .filter_map(|name| match name {
                GeneralName::DNSName(dns) => Some(dns.to_string()),
                _ => None,
            })
            .collect(),
        Ok(None) => BTreeSet::new(),
        Err(e) => {
            debug!(host, error = %e, "Ignoring malformed subjectAltName extension.");
            BTreeSet::new()
        }
    };

    let validity = x509.validity();
    CertificateSummary {
        domain: host.to_string(),
        ip: session.peer_ip.map(|ip| ip.to_string()),
        issuer_common_name: first_common_name(x509.issuer()),
        subject_common_name: first_common_name(x509.subject()),
        subject_alt_names,
        not_before: Some(asn1_time_to_chrono_utc(&validity.not_before)),
        not_after: Some(asn1_time_to_chrono_utc(&validity.not_after)),
        error: None,
    }
}

fn first_common_name(name: &X509Name<'_>) -> Option<String> {
    name.iter_common_name()
        .next()
        .and_then(|cn| cn.as_str().ok())
        .map(str::to_string)
}

fn asn1_time_to_chrono_utc(time: &ASN1Time) -> DateTime<Utc> {
    DateTime::from_timestamp(time.timestamp(), 0).unwrap_or_default()
}
