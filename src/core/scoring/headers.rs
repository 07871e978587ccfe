// src/core/scoring/headers.rs

use crate::core::models::{CheckKind, CheckResult, HeaderSet, HttpProbe, ScoreContribution, TlsVersion};
use tracing::debug;

pub const XSS_HEADER: &str = "x-xss-protection";
pub const X_FRAME_HEADER: &str = "x-frame-options";
pub const HSTS_HEADER: &str = "strict-transport-security";
pub const CSP_HEADER: &str = "content-security-policy";
pub const PKP_HEADER: &str = "public-key-pins";
pub const REFERRER_POLICY_HEADER: &str = "referrer-policy";
pub const X_CONTENT_TYPE_HEADER: &str = "x-content-type-options";
pub const SERVER_HEADER: &str = "server";

/// Referrer policies that still restrict what leaks cross-origin.
const RESTRICTIVE_REFERRER_POLICIES: &[&str] = &[
    "no-referrer-when-downgrade",
    "origin",
    "origin-when-cross-origin",
    "same-origin",
    "strict-origin",
    "strict-origin-when-cross-origin",
];

/// Header-derived checks plus the auxiliary facts read from the same response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderScores {
    pub checks: Vec<CheckResult>,
    /// The `report=` target of X-XSS-Protection, if any. Not scored.
    pub xss_report_url: Option<String>,
    /// The raw `Server` header, for catalog lookup. Not scored.
    pub server: Option<String>,
}

impl HeaderScores {
    pub fn total(&self) -> ScoreContribution {
        self.checks.iter().map(|c| c.contribution).sum()
    }
}

/// Scores the seven security headers.
pub fn score_headers(headers: &HeaderSet) -> HeaderScores {
    let (xss, xss_report_url) = score_xss(headers.get(XSS_HEADER));
    let checks = vec![
        CheckResult::new(CheckKind::XssProtection, xss),
        CheckResult::new(CheckKind::XFrameOptions, score_x_frame(headers.get(X_FRAME_HEADER))),
        CheckResult::new(CheckKind::StrictTransportSecurity, score_hsts(headers.get(HSTS_HEADER))),
        CheckResult::new(CheckKind::ContentSecurityPolicy, score_presence(headers.contains(CSP_HEADER))),
        CheckResult::new(CheckKind::PublicKeyPins, score_presence(headers.contains(PKP_HEADER))),
        CheckResult::new(
            CheckKind::ReferrerPolicy,
            score_referrer_policy(headers.get(REFERRER_POLICY_HEADER)),
        ),
        CheckResult::new(
            CheckKind::XContentTypeOptions,
            score_x_content_type(headers.get(X_CONTENT_TYPE_HEADER)),
        ),
    ];
    HeaderScores {
        checks,
        xss_report_url,
        server: headers.get(SERVER_HEADER).map(str::to_string),
    }
}

/// Scores the headers and the HTTP and TLS versions of one HEAD probe.
pub fn score_probe(probe: &HttpProbe) -> HeaderScores {
    let mut scores = score_headers(&probe.headers);
    scores.checks.push(CheckResult::new(
        CheckKind::HttpVersion,
        score_http_version(&probe.protocol_version),
    ));
    scores.checks.push(CheckResult::new(
        CheckKind::TlsVersion,
        score_tls_version(probe.tls_version.as_ref()),
    ));
    debug!(total = ?scores.total(), "Header probe scored.");
    scores
}

/// Absent → 1, "0" → 0, starting with "1" → 5, anything else → 0.
pub fn score_xss(value: Option<&str>) -> (ScoreContribution, Option<String>) {
    let Some(value) = value else {
        return (ScoreContribution::out_of_five(1), None);
    };
    let value = value.trim();
    let points = if value == "0" {
        0
    } else if value.starts_with('1') {
        5
    } else {
        0
    };
    let report_url = value
        .split_once("report=")
        .map(|(_, url)| url.trim().trim_end_matches(';').trim().to_string())
        .filter(|url| !url.is_empty());
    (ScoreContribution::out_of_five(points), report_url)
}

/// Absent → 1, deny/sameorigin → 5, allow-from → 4, anything else → 1.
pub fn score_x_frame(value: Option<&str>) -> ScoreContribution {
    let points = match value.map(|v| v.trim().to_ascii_lowercase()) {
        Some(v) if v == "deny" || v == "sameorigin" => 5,
        Some(v) if v.starts_with("allow-from") => 4,
        _ => 1,
    };
    ScoreContribution::out_of_five(points)
}

/// Absent → 2, max-age → 4, max-age with includeSubDomains or preload → 5,
/// any other value → 0.
pub fn score_hsts(value: Option<&str>) -> ScoreContribution {
    let points = match value.map(str::trim) {
        None => 2,
        Some(v) if v.starts_with("max-age") => {
            if v.contains("includeSubDomains") || v.contains("preload") {
                5
            } else {
                4
            }
        }
        Some(_) => 0,
    };
    ScoreContribution::out_of_five(points)
}

/// For headers whose mere presence is the signal: present → 5, absent → 3.
pub fn score_presence(present: bool) -> ScoreContribution {
    ScoreContribution::out_of_five(if present { 5 } else { 3 })
}

/// Absent → 2, no-referrer → 5, restrictive policies → 4, unsafe-url → 2,
/// anything else → 0.
pub fn score_referrer_policy(value: Option<&str>) -> ScoreContribution {
    let Some(value) = value else {
        return ScoreContribution::out_of_five(2);
    };
    let policy = value.trim().to_ascii_lowercase();
    let points = if policy == "no-referrer" {
        5
    } else if RESTRICTIVE_REFERRER_POLICIES.contains(&policy.as_str()) {
        4
    } else if policy == "unsafe-url" {
        2
    } else {
        0
    };
    ScoreContribution::out_of_five(points)
}

/// Only "nosniff" scores.
pub fn score_x_content_type(value: Option<&str>) -> ScoreContribution {
    let points = match value {
        Some(v) if v.trim().eq_ignore_ascii_case("nosniff") => 5,
        _ => 0,
    };
    ScoreContribution::out_of_five(points)
}

/// HTTP/2.0 → 5, HTTP/1.1 → 2, anything else → 0.
pub fn score_http_version(protocol_version: &str) -> ScoreContribution {
    let points = if protocol_version.eq_ignore_ascii_case("HTTP/2.0") {
        5
    } else if protocol_version.eq_ignore_ascii_case("HTTP/1.1") {
        2
    } else {
        0
    };
    ScoreContribution::out_of_five(points)
}

/// TLS1.2 → 5, TLS1.1 → 3, TLS1.0 → 1, any other version → 0.
/// Without TLS the check does not apply.
pub fn score_tls_version(version: Option<&TlsVersion>) -> ScoreContribution {
    match version {
        None => ScoreContribution::NONE,
        Some(TlsVersion::Tls12) => ScoreContribution::out_of_five(5),
        Some(TlsVersion::Tls11) => ScoreContribution::out_of_five(3),
        Some(TlsVersion::Tls10) => ScoreContribution::out_of_five(1),
        Some(_) => ScoreContribution::out_of_five(0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn achieved(c: ScoreContribution) -> u32 {
        assert_eq!(c.maximum, 5);
        c.achieved
    }

    #[test]
    fn xss_rules() {
        assert_eq!(score_xss(None), (ScoreContribution::out_of_five(1), None));
        assert_eq!(achieved(score_xss(Some("0")).0), 0);
        assert_eq!(achieved(score_xss(Some(" 1; mode=block ")).0), 5);
        assert_eq!(achieved(score_xss(Some("yes")).0), 0);
    }

    #[test]
    fn xss_report_url_is_extracted() {
        let (score, report) = score_xss(Some("1; report=https://example.com/xss"));
        assert_eq!(achieved(score), 5);
        assert_eq!(report.as_deref(), Some("https://example.com/xss"));
    }

    #[test]
    fn x_frame_rules() {
        assert_eq!(achieved(score_x_frame(None)), 1);
        assert_eq!(achieved(score_x_frame(Some("DENY"))), 5);
        assert_eq!(achieved(score_x_frame(Some(" SameOrigin "))), 5);
        assert_eq!(achieved(score_x_frame(Some("ALLOW-FROM https://example.com"))), 4);
        assert_eq!(achieved(score_x_frame(Some("whatever"))), 1);
    }

    #[test]
    fn hsts_rules() {
        assert_eq!(achieved(score_hsts(None)), 2);
        assert_eq!(achieved(score_hsts(Some("max-age=31536000"))), 4);
        assert_eq!(achieved(score_hsts(Some("max-age=31536000; includeSubDomains"))), 5);
        assert_eq!(achieved(score_hsts(Some("max-age=31536000; preload"))), 5);
        assert_eq!(achieved(score_hsts(Some("includeSubDomains"))), 0);
    }

    #[test]
    fn presence_rules() {
        assert_eq!(achieved(score_presence(false)), 3);
        assert_eq!(achieved(score_presence(true)), 5);
        let empty_csp = HeaderSet::from_pairs([("Content-Security-Policy", "")]);
        assert_eq!(achieved(score_headers(&empty_csp).checks[3].contribution), 5);
    }

    #[test]
    fn referrer_policy_rules() {
        assert_eq!(achieved(score_referrer_policy(None)), 2);
        assert_eq!(achieved(score_referrer_policy(Some("No-Referrer"))), 5);
        for policy in RESTRICTIVE_REFERRER_POLICIES {
            assert_eq!(achieved(score_referrer_policy(Some(policy))), 4, "{policy}");
        }
        assert_eq!(achieved(score_referrer_policy(Some("unsafe-url"))), 2);
        assert_eq!(achieved(score_referrer_policy(Some("bogus"))), 0);
    }

    #[test]
    fn x_content_type_rules() {
        assert_eq!(achieved(score_x_content_type(None)), 0);
        assert_eq!(achieved(score_x_content_type(Some("NoSniff"))), 5);
        assert_eq!(achieved(score_x_content_type(Some("sniff"))), 0);
    }

    #[test]
    fn http_version_rules() {
        assert_eq!(achieved(score_http_version("HTTP/2.0")), 5);
        assert_eq!(achieved(score_http_version("HTTP/1.1")), 2);
        assert_eq!(achieved(score_http_version("HTTP/1.0")), 0);
    }

    #[test]
    fn tls_version_rules() {
        assert_eq!(score_tls_version(None), ScoreContribution::NONE);
        assert_eq!(achieved(score_tls_version(Some(&TlsVersion::Tls12))), 5);
        assert_eq!(achieved(score_tls_version(Some(&TlsVersion::Tls11))), 3);
        assert_eq!(achieved(score_tls_version(Some(&TlsVersion::Tls10))), 1);
        assert_eq!(achieved(score_tls_version(Some(&TlsVersion::Tls13))), 0);
        assert_eq!(achieved(score_tls_version(Some(&TlsVersion::Other("SSLv3".into())))), 0);
    }

    #[test]
    fn secure_values_reach_the_maximum() {
        let headers = HeaderSet::from_pairs([
            ("X-XSS-Protection", "1; mode=block"),
            ("X-Frame-Options", "deny"),
            ("Strict-Transport-Security", "max-age=63072000; includeSubDomains; preload"),
            ("Content-Security-Policy", "default-src 'self'"),
            ("Public-Key-Pins", "pin-sha256=\"abc\"; max-age=5184000"),
            ("Referrer-Policy", "no-referrer"),
            ("X-Content-Type-Options", "nosniff"),
        ]);
        let scores = score_headers(&headers);
        assert_eq!(scores.checks.len(), 7);
        assert!(scores.checks.iter().all(CheckResult::passed));
        assert_eq!(scores.total(), ScoreContribution::new(35, 35));
    }

    #[test]
    fn empty_headers_use_the_defaults() {
        let scores = score_headers(&HeaderSet::default());
        // 1 + 1 + 2 + 3 + 3 + 2 + 0
        assert_eq!(scores.total(), ScoreContribution::new(12, 35));
        assert!(scores.server.is_none());
    }

    #[test]
    fn probe_without_tls_has_no_tls_maximum() {
        let probe = HttpProbe {
            headers: HeaderSet::from_pairs([("Server", "nginx/1.25")]),
            protocol_version: "HTTP/1.1".to_string(),
            tls_version: None,
        };
        let scores = score_probe(&probe);
        assert_eq!(scores.checks.len(), 9);
        assert_eq!(scores.total(), ScoreContribution::new(14, 40));
        assert_eq!(scores.server.as_deref(), Some("nginx/1.25"));
    }
}
