// src/core/scanner/dns_scanner.rs

use tracing::{debug, info, warn};

use crate::core::models::{MailAuthFacts, ScanResult};
use crate::core::scanner::probes::TxtResolver;
use async_trait::async_trait;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::ResolveErrorKind;
use hickory_resolver::TokioAsyncResolver;
use std::time::Duration;

/// The production `TxtResolver`, backed by an asynchronous hickory resolver.
pub struct HickoryResolver {
    resolver: TokioAsyncResolver,
}

impl HickoryResolver {
    pub fn new(timeout: Duration) -> Self {
        let mut options = ResolverOpts::default();
        options.timeout = timeout;
        options.attempts = 2;
        Self {
            resolver: TokioAsyncResolver::tokio(ResolverConfig::default(), options),
        }
    }
}

#[async_trait]
impl TxtResolver for HickoryResolver {
    async fn txt(&self, name: &str) -> Result<Vec<String>, String> {
        debug!(name, "Looking up TXT records.");
        match self.resolver.txt_lookup(name).await {
            Ok(lookup) => {
                let records: Vec<String> = lookup
                    .iter()
                    .map(|txt| {
                        txt.txt_data()
                            .iter()
                            .map(|chunk| String::from_utf8_lossy(chunk))
                            .collect::<String>()
                    })
                    .collect();
                debug!(name, count = records.len(), "TXT records found.");
                Ok(records)
            }
            Err(e) if matches!(e.kind(), ResolveErrorKind::NoRecordsFound { .. }) => {
                debug!(name, "No TXT records published.");
                Ok(Vec::new())
            }
            Err(e) => Err(format!("DNS Error: {e}")),
        }
    }
}

/// SPF and DMARC lookups for one apex domain. Each lookup fails on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MailAuthLookup {
    pub spf: Result<Vec<String>, String>,
    pub dmarc: ScanResult<String>,
}

impl MailAuthLookup {
    /// The facts that were retrieved; failed lookups contribute nothing.
    pub fn facts(&self) -> MailAuthFacts {
        MailAuthFacts {
            spf_records: self.spf.clone().unwrap_or_default(),
            dmarc_record: self.dmarc.clone().ok().flatten(),
        }
    }
}

/// Strips a leading `www.` to query the registrable name, where SPF and DMARC live.
pub fn apex_domain(host: &str) -> &str {
    host.strip_prefix("www.").unwrap_or(host)
}

/// Runs the SPF and DMARC lookups concurrently.
pub async fn lookup_mail_auth(resolver: &dyn TxtResolver, apex: &str) -> MailAuthLookup {
    info!(target = %apex, "Starting mail authentication lookups.");
    let (spf, dmarc) = tokio::join!(lookup_spf(resolver, apex), lookup_dmarc(resolver, apex));
    info!(target = %apex, spf_ok = spf.is_ok(), dmarc_ok = dmarc.is_ok(), "Mail authentication lookups finished.");
    MailAuthLookup { spf, dmarc }
}

/// Every TXT record at the apex is kept; the scorer decides which ones qualify.
async fn lookup_spf(resolver: &dyn TxtResolver, apex: &str) -> Result<Vec<String>, String> {
    resolver.txt(apex).await.map_err(|e| {
        warn!(target = apex, error = %e, "SPF lookup failed.");
        e
    })
}

/// The first TXT record at `_dmarc.<apex>`.
async fn lookup_dmarc(resolver: &dyn TxtResolver, apex: &str) -> ScanResult<String> {
    let dmarc_target = format!("_dmarc.{apex}");
    match resolver.txt(&dmarc_target).await {
        Ok(records) => {
            let record = records.into_iter().next();
            match &record {
                Some(r) => debug!(record = %r, "DMARC record found."),
                None => debug!(target = %dmarc_target, "No DMARC record found."),
            }
            Ok(record)
        }
        Err(e) => {
            warn!(target = %dmarc_target, error = %e, "DMARC lookup failed.");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct StaticResolver {
        records: HashMap<&'static str, Result<Vec<String>, String>>,
    }

    #[async_trait]
    impl TxtResolver for StaticResolver {
        async fn txt(&self, name: &str) -> Result<Vec<String>, String> {
            self.records.get(name).cloned().unwrap_or_else(|| Ok(Vec::new()))
        }
    }

    #[test]
    fn www_is_stripped() {
        assert_eq!(apex_domain("www.example.com"), "example.com");
        assert_eq!(apex_domain("example.com"), "example.com");
        assert_eq!(apex_domain("wwwexample.com"), "wwwexample.com");
    }

    #[tokio::test]
    async fn collects_spf_and_first_dmarc_record() {
        let resolver = StaticResolver {
            records: HashMap::from([
                ("example.com", Ok(vec!["v=spf1 -all".to_string(), "site-verification=1".to_string()])),
                ("_dmarc.example.com", Ok(vec!["v=DMARC1; p=none".to_string(), "second".to_string()])),
            ]),
        };
        let lookup = lookup_mail_auth(&resolver, "example.com").await;
        let facts = lookup.facts();
        assert_eq!(facts.spf_records.len(), 2);
        assert_eq!(facts.dmarc_record.as_deref(), Some("v=DMARC1; p=none"));
        assert_eq!(facts.dmarc_policy().as_deref(), Some("none"));
    }

    #[tokio::test]
    async fn failures_are_kept_per_lookup() {
        let resolver = StaticResolver {
            records: HashMap::from([
                ("example.com", Err("DNS Error: timed out".to_string())),
                ("_dmarc.example.com", Ok(vec!["v=DMARC1; p=reject".to_string()])),
            ]),
        };
        let lookup = lookup_mail_auth(&resolver, "example.com").await;
        assert!(lookup.spf.is_err());
        assert_eq!(lookup.dmarc, Ok(Some("v=DMARC1; p=reject".to_string())));
        assert!(lookup.facts().spf_records.is_empty());
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn resolves_real_txt_records() {
        let resolver = HickoryResolver::new(Duration::from_secs(5));
        let records = resolver.txt("google.com").await.unwrap();
        assert!(records.iter().any(|r| r.starts_with("v=spf1")));
    }
}
