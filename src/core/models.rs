// src/core/models.rs

use chrono::{DateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use strum::{Display, EnumIter};

// --- Reusable Result Types ---

/// A lookup that can succeed with a value, succeed with nothing, or fail with a message.
pub type ScanResult<T> = Result<Option<T>, String>;

// --- Score Contributions ---

/// Points achieved by one check against the points it could have achieved.
///
/// `maximum` is zero only when the signal does not apply to the target at all
/// (no TLS, no SPF records, no disclosed incidents), which keeps it out of the
/// achievable ceiling instead of counting it as a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreContribution {
    pub achieved: u32,
    pub maximum: u32,
}

impl ScoreContribution {
    /// A contribution that adds nothing to either total.
    pub const NONE: Self = Self { achieved: 0, maximum: 0 };

    pub fn new(achieved: u32, maximum: u32) -> Self {
        debug_assert!(achieved <= maximum, "achieved {achieved} exceeds maximum {maximum}");
        Self { achieved, maximum }
    }

    /// Most checks are graded on a 0..=5 scale.
    pub fn out_of_five(achieved: u32) -> Self {
        Self::new(achieved, 5)
    }

    pub fn is_applicable(&self) -> bool {
        self.maximum > 0
    }

    pub fn is_full(&self) -> bool {
        self.is_applicable() && self.achieved == self.maximum
    }
}

impl Add for ScoreContribution {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            achieved: self.achieved + rhs.achieved,
            maximum: self.maximum + rhs.maximum,
        }
    }
}

impl Sum for ScoreContribution {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::NONE, Add::add)
    }
}

/// Every scored signal. The declaration order is the order in which checks
/// (and their messages) appear in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    #[strum(to_string = "Protocol")]
    Protocol,
    #[strum(to_string = "X-XSS-Protection")]
    XssProtection,
    #[strum(to_string = "X-Frame-Options")]
    XFrameOptions,
    #[strum(to_string = "Strict-Transport-Security")]
    StrictTransportSecurity,
    #[strum(to_string = "Content-Security-Policy")]
    ContentSecurityPolicy,
    #[strum(to_string = "Public-Key-Pins")]
    PublicKeyPins,
    #[strum(to_string = "Referrer-Policy")]
    ReferrerPolicy,
    #[strum(to_string = "X-Content-Type-Options")]
    XContentTypeOptions,
    #[strum(to_string = "HTTP Version")]
    HttpVersion,
    #[strum(to_string = "TLS Version")]
    TlsVersion,
    #[strum(to_string = "SPF")]
    Spf,
    #[strum(to_string = "DMARC")]
    Dmarc,
    #[strum(to_string = "Disclosed Incidents")]
    Incidents,
}

/// The outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub kind: CheckKind,
    pub contribution: ScoreContribution,
}

impl CheckResult {
    pub fn new(kind: CheckKind, contribution: ScoreContribution) -> Self {
        Self { kind, contribution }
    }

    /// A check passes only when it applies and scored full marks.
    pub fn passed(&self) -> bool {
        self.contribution.is_full()
    }
}

// --- HTTP Probe Models ---

/// Response headers keyed by lowercase name. Repeated headers are joined with `,`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSet {
    values: BTreeMap<String, String>,
}

impl HeaderSet {
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut values: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in pairs {
            let value = value.into();
            values
                .entry(name.as_ref().to_ascii_lowercase())
                .and_modify(|existing| {
                    existing.push(',');
                    existing.push_str(&value);
                })
                .or_insert(value);
        }
        Self { values }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// The TLS protocol version negotiated with the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TlsVersion {
    Tls10,
    Tls11,
    Tls12,
    Tls13,
    Other(String),
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TlsVersion::Tls10 => write!(f, "TLS1.0"),
            TlsVersion::Tls11 => write!(f, "TLS1.1"),
            TlsVersion::Tls12 => write!(f, "TLS1.2"),
            TlsVersion::Tls13 => write!(f, "TLS1.3"),
            TlsVersion::Other(name) => write!(f, "{name}"),
        }
    }
}

/// What a single HEAD request tells us about the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpProbe {
    pub headers: HeaderSet,
    /// e.g. "HTTP/2.0" or "HTTP/1.1".
    pub protocol_version: String,
    /// `None` when the request did not travel over TLS.
    pub tls_version: Option<TlsVersion>,
}

// --- Certificate Models ---

/// Facts extracted from the leaf certificate of a TLS dial.
///
/// When the dial or handshake fails only `domain` and `error` are populated;
/// a broken certificate is itself a finding, so it travels in the report
/// instead of failing the whole computation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateSummary {
    pub domain: String,
    pub ip: Option<String>,
    pub issuer_common_name: Option<String>,
    pub subject_common_name: Option<String>,
    pub subject_alt_names: BTreeSet<String>,
    pub not_before: Option<DateTime<Utc>>,
    pub not_after: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl CertificateSummary {
    pub fn failed(domain: &str, error: impl Into<String>) -> Self {
        Self {
            domain: domain.to_string(),
            error: Some(error.into()),
            ..Default::default()
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        match (self.not_before, self.not_after) {
            (Some(not_before), Some(not_after)) => now > not_before && now < not_after,
            _ => false,
        }
    }
}

// --- Mail Authentication Models ---

static RE_DMARC_POLICY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|;)\s*p\s*=\s*([a-z]+)").unwrap());

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailAuthFacts {
    pub spf_records: Vec<String>,
    pub dmarc_record: Option<String>,
}

impl MailAuthFacts {
    /// The `p=` tag of the DMARC record, lowercased.
    pub fn dmarc_policy(&self) -> Option<String> {
        let record = self.dmarc_record.as_deref()?;
        RE_DMARC_POLICY
            .captures(record)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_ascii_lowercase())
    }
}

// --- Incident Models ---

/// A disclosed security incident for the target domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentRecord {
    /// `None` when the feed's date could not be read. The incident still counts.
    pub reported_date: Option<DateTime<Utc>>,
    pub fixed_date: Option<DateTime<Utc>>,
    pub fixed: bool,
    pub kind: Option<String>,
    pub url: Option<String>,
}

// --- Server Fingerprint Models ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerDetail {
    pub name: String,
    pub vendor: String,
    pub description: String,
    #[serde(default)]
    pub homepage: Option<String>,
}

// --- Badges ---

/// Machine-readable identifier of a badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum BadgeCode {
    HttpSecure,
    XssProtect,
    ClickjackingProtect,
    HttpsOnly,
    CspEnabled,
    PublicKeyPinningEnabled,
    EnsurePrivacy,
    NoSniff,
    LatestHttp,
    LatestTls,
    EmailSpoofingProtect,
    DmarcEnforced,
    RapidIncidentResponse,
}

/// A strength shown to the end user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub code: BadgeCode,
    pub title: String,
    pub description: String,
}

// --- Main Report ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallScore {
    /// `ceil(achieved_total / max_total * 100) / 100`, always in `[0, 1]`.
    pub normalized: f64,
    pub achieved_total: u32,
    pub max_total: u32,
    pub messages: Vec<String>,
}

/// Everything a client needs to render the grade of one URL.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub url: String,
    pub score: OverallScore,
    pub badges: Vec<Badge>,
    pub checks: Vec<CheckResult>,
    pub certificate: CertificateSummary,
    pub server: Option<ServerDetail>,
    pub xss_report_url: Option<String>,
    pub incidents: Vec<IncidentRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_set_is_case_insensitive_and_joins_repeats() {
        let headers = HeaderSet::from_pairs([
            ("X-Frame-Options", "DENY"),
            ("Set-Cookie", "a=1"),
            ("set-cookie", "b=2"),
        ]);
        assert_eq!(headers.get("x-frame-options"), Some("DENY"));
        assert_eq!(headers.get("SET-COOKIE"), Some("a=1,b=2"));
        assert!(!headers.contains("content-security-policy"));
        assert_eq!(headers.len(), 2);
    }

    #[test]
    fn contributions_sum_both_totals() {
        let total: ScoreContribution = [
            ScoreContribution::out_of_five(5),
            ScoreContribution::NONE,
            ScoreContribution::new(3, 10),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, ScoreContribution::new(8, 15));
    }

    #[test]
    fn inapplicable_check_never_passes() {
        assert!(!CheckResult::new(CheckKind::Spf, ScoreContribution::NONE).passed());
        assert!(CheckResult::new(CheckKind::Spf, ScoreContribution::new(10, 10)).passed());
        assert!(!CheckResult::new(CheckKind::Spf, ScoreContribution::new(8, 10)).passed());
    }

    #[test]
    fn dmarc_policy_is_extracted() {
        let facts = MailAuthFacts {
            spf_records: vec![],
            dmarc_record: Some("v=DMARC1; p=Reject; rua=mailto:d@example.com".to_string()),
        };
        assert_eq!(facts.dmarc_policy().as_deref(), Some("reject"));
        assert_eq!(MailAuthFacts::default().dmarc_policy(), None);
    }

    #[test]
    fn badge_codes_render_in_screaming_snake_case() {
        assert_eq!(BadgeCode::HttpSecure.to_string(), "HTTP_SECURE");
        assert_eq!(BadgeCode::PublicKeyPinningEnabled.to_string(), "PUBLIC_KEY_PINNING_ENABLED");
    }

    #[test]
    fn failed_certificate_carries_only_domain_and_error() {
        let summary = CertificateSummary::failed("example.com", "connection refused");
        assert_eq!(summary.domain, "example.com");
        assert_eq!(summary.error.as_deref(), Some("connection refused"));
        assert!(summary.ip.is_none());
        assert!(summary.subject_alt_names.is_empty());
        assert!(!summary.is_valid_at(Utc::now()));
    }
}
