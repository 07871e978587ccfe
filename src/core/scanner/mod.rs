// src/core/scanner/mod.rs

// Probe adapters and the orchestration that turns their output into a score.
pub mod dns_scanner;
pub mod headers_scanner;
pub mod incident_scanner;
pub mod probes;
pub mod ssl_scanner;

use crate::config::ScoreConfig;
use crate::core::error::ScoreError;
use crate::core::models::{CheckKind, CheckResult, IncidentRecord, ScoreContribution, ScoreReport};
use crate::core::scoring;
use crate::core::server_catalog::ServerCatalog;
use self::dns_scanner::{apex_domain, lookup_mail_auth, HickoryResolver};
use self::headers_scanner::ReqwestProber;
use self::incident_scanner::XmlIncidentFeed;
use self::probes::{HttpProber, IncidentFeed, TlsDialer, TxtResolver};
use self::ssl_scanner::{summarize_certificate, RustlsDialer};
use std::sync::Arc;
use tracing::{info, warn};
use url::{Host, Url};

/// A parsed scoring target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub url: Url,
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl Target {
    /// Parses an absolute URL with a host. An explicit port wins; otherwise
    /// `http` defaults to 80 and everything else to 443.
    pub fn parse(input: &str) -> Result<Self, ScoreError> {
        let invalid = |reason: String| ScoreError::InvalidUrl {
            input: input.to_string(),
            reason,
        };
        let url = Url::parse(input.trim()).map_err(|e| invalid(e.to_string()))?;
        let host = dial_host(&url).ok_or_else(|| invalid("URL has no host".to_string()))?;
        let scheme = url.scheme().to_string();
        let port = url
            .port()
            .unwrap_or(if scheme == "http" { 80 } else { 443 });
        Ok(Self { url, scheme, host, port })
    }
}

/// The host as a socket or SNI name: IPv6 literals lose the brackets that
/// `Url::host_str` keeps.
pub fn dial_host(url: &Url) -> Option<String> {
    match url.host()? {
        Host::Domain(domain) if !domain.is_empty() => Some(domain.to_string()),
        Host::Domain(_) => None,
        Host::Ipv4(addr) => Some(addr.to_string()),
        Host::Ipv6(addr) => Some(addr.to_string()),
    }
}

/// Runs every probe for a URL and reduces the results to one report.
///
/// Holds no state between calls: two calls against identical external
/// responses produce identical reports.
pub struct ScoreEngine {
    http: Arc<dyn HttpProber>,
    tls: Arc<dyn TlsDialer>,
    dns: Arc<dyn TxtResolver>,
    incidents: Arc<dyn IncidentFeed>,
    catalog: Arc<ServerCatalog>,
}

impl ScoreEngine {
    pub fn new(
        http: Arc<dyn HttpProber>,
        tls: Arc<dyn TlsDialer>,
        dns: Arc<dyn TxtResolver>,
        incidents: Arc<dyn IncidentFeed>,
        catalog: Arc<ServerCatalog>,
    ) -> Self {
        Self { http, tls, dns, incidents, catalog }
    }

    /// Wires the production adapters from configuration.
    pub fn from_config(config: &ScoreConfig, catalog: Arc<ServerCatalog>) -> Result<Self, ScoreError> {
        let tls_config = ssl_scanner::client_config().map_err(ScoreError::ClientSetup)?;
        let http = ReqwestProber::new(&config.user_agent, config.http_timeout(), config.tls_timeout())
            .map_err(ScoreError::ClientSetup)?;
        let incidents = XmlIncidentFeed::new(
            &config.incident_feed_url,
            &config.user_agent,
            config.feed_timeout(),
        )
        .map_err(ScoreError::ClientSetup)?;

        Ok(Self::new(
            Arc::new(http),
            Arc::new(RustlsDialer::new(tls_config, config.tls_timeout())),
            Arc::new(HickoryResolver::new(config.dns_timeout())),
            Arc::new(incidents),
            catalog,
        ))
    }

    /// Computes the score, badges and certificate summary for `url`.
    ///
    /// All probes run concurrently. Only the HEAD probe can abort the
    /// computation; certificate, DNS and incident failures degrade to
    /// messages and zero contributions. Dropping the returned future cancels
    /// every probe still in flight.
    pub async fn compute_score(&self, url: &str) -> Result<ScoreReport, ScoreError> {
        let target = Target::parse(url)?;
        let apex = apex_domain(&target.host);
        info!(url = %target.url, host = %target.host, port = target.port, "Starting score computation.");

        let (http, certificate, mail, incidents) = tokio::join!(
            self.http.head(&target.url),
            summarize_certificate(self.tls.as_ref(), &target.host, target.port),
            lookup_mail_auth(self.dns.as_ref(), apex),
            self.incidents.incidents(apex),
        );

        let probe = http.map_err(|e| {
            warn!(url = %target.url, error = %e, "Primary probe failed; aborting.");
            ScoreError::from(e)
        })?;

        let (protocol, protocol_message) = scoring::score_protocol(&target.scheme);
        let header_scores = scoring::score_probe(&probe);

        let mut notes = Vec::new();
        let mut checks = vec![CheckResult::new(CheckKind::Protocol, protocol)];
        checks.extend(header_scores.checks.iter().copied());

        let spf = match &mail.spf {
            Ok(records) => scoring::score_spf(records),
            Err(e) => {
                notes.push(format!("SPF lookup failed: {e}"));
                ScoreContribution::NONE
            }
        };
        let dmarc = match &mail.dmarc {
            Ok(record) => scoring::score_dmarc(record.as_deref()),
            Err(e) => {
                notes.push(format!("DMARC lookup failed: {e}"));
                ScoreContribution::NONE
            }
        };
        if mail.facts().dmarc_policy().as_deref() == Some("none") {
            notes.push("DMARC policy is 'none': failing mail is reported but not rejected.".to_string());
        }
        checks.push(CheckResult::new(CheckKind::Spf, spf));
        checks.push(CheckResult::new(CheckKind::Dmarc, dmarc));

        let incidents: Vec<IncidentRecord> = match incidents {
            Ok(incidents) => incidents,
            Err(e) => {
                warn!(domain = apex, error = %e, "Incident feed unavailable.");
                notes.push(format!("Incident history unavailable: {e}"));
                Vec::new()
            }
        };
        checks.push(CheckResult::new(CheckKind::Incidents, scoring::score_incidents(&incidents)));

        if let Some(error) = &certificate.error {
            notes.push(format!("Certificate check failed: {error}"));
        }

        let aggregate = scoring::aggregate(&checks, protocol_message, notes)?;
        let server = header_scores
            .server
            .as_deref()
            .and_then(|value| self.catalog.lookup(value))
            .cloned();

        info!(
            url = %target.url,
            achieved = aggregate.score.achieved_total,
            maximum = aggregate.score.max_total,
            normalized = aggregate.score.normalized,
            "Score computed."
        );

        Ok(ScoreReport {
            url: target.url.to_string(),
            score: aggregate.score,
            badges: aggregate.badges,
            checks,
            certificate,
            server,
            xss_report_url: header_scores.xss_report_url,
            incidents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_word_is_not_a_url() {
        assert!(matches!(Target::parse("example"), Err(ScoreError::InvalidUrl { .. })));
    }

    #[test]
    fn url_without_host_is_rejected() {
        assert!(matches!(Target::parse("mailto:someone@example.com"), Err(ScoreError::InvalidUrl { .. })));
    }

    #[test]
    fn default_ports_follow_the_scheme() {
        assert_eq!(Target::parse("http://example.com").unwrap().port, 80);
        assert_eq!(Target::parse("https://example.com").unwrap().port, 443);
        assert_eq!(Target::parse("ftp://example.com").unwrap().port, 443);
    }

    #[test]
    fn ipv6_literals_are_unbracketed() {
        let target = Target::parse("https://[::1]:8443/").unwrap();
        assert_eq!(target.host, "::1");
        assert_eq!(target.port, 8443);
        assert!(rustls_pki_types::ServerName::try_from(target.host.as_str()).is_ok());
        assert_eq!(Target::parse("http://127.0.0.1/").unwrap().host, "127.0.0.1");
    }

    #[test]
    fn explicit_port_wins() {
        let target = Target::parse("https://www.example.com:8443/login").unwrap();
        assert_eq!(target.host, "www.example.com");
        assert_eq!(target.port, 8443);
        assert_eq!(target.scheme, "https");
    }
}
