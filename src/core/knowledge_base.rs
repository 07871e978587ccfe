//! The static catalog behind every badge and weakness message.
//! Each scored check has exactly one entry: the badge it earns when it passes,
//! and the explanation shown when it does not.

use crate::core::models::{Badge, BadgeCode, CheckKind, CheckResult};
use std::fmt;

/// High-level grouping of checks, used to label entries in the user interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum CheckCategory {
    /// Transport layer: scheme, HTTP and TLS versions.
    Transport,
    /// HTTP response security headers.
    Headers,
    /// SPF and DMARC records.
    Mail,
    /// Publicly disclosed incident history.
    Disclosure,
}

impl fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckCategory::Transport => write!(f, "Transport Security"),
            CheckCategory::Headers => write!(f, "HTTP Security Headers"),
            CheckCategory::Mail => write!(f, "Mail Authentication"),
            CheckCategory::Disclosure => write!(f, "Incident History"),
        }
    }
}

/// Everything the catalog knows about one check.
pub struct CheckDetail {
    pub kind: CheckKind,
    pub category: CheckCategory,
    /// Awarded when the check passes.
    pub badge: BadgeCode,
    pub badge_title: &'static str,
    pub badge_description: &'static str,
    /// Shown when the check applies but falls short. The protocol check
    /// produces its own message and has none here.
    pub weakness: Option<&'static str>,
    pub remediation: &'static str,
}

static CHECKS: &[CheckDetail] = &[
    // --- Transport ---
    CheckDetail {
        kind: CheckKind::Protocol,
        category: CheckCategory::Transport,
        badge: BadgeCode::HttpSecure,
        badge_title: "Encrypted HTTPS Connection",
        badge_description: "This site is served over HTTPS and is less exposed to Man-in-the-Middle (MITM) and eavesdropping attacks.",
        weakness: None,
        remediation: "Serve the site over HTTPS with a certificate from a trusted authority and redirect all plain HTTP traffic.",
    },
    CheckDetail {
        kind: CheckKind::HttpVersion,
        category: CheckCategory::Transport,
        badge: BadgeCode::LatestHttp,
        badge_title: "Uses the latest version of the HTTP protocol",
        badge_description: "This site speaks HTTP/2, which brings better performance and stricter security requirements.",
        weakness: Some("The site does not negotiate HTTP/2."),
        remediation: "Enable HTTP/2 on the web server or CDN. Most modern servers support it with a single configuration switch.",
    },
    CheckDetail {
        kind: CheckKind::TlsVersion,
        category: CheckCategory::Transport,
        badge: BadgeCode::LatestTls,
        badge_title: "Uses a current version of the TLS protocol",
        badge_description: "This site negotiates TLS 1.2, benefiting from current performance and security standards.",
        weakness: Some("The negotiated TLS version is outdated or not recognised."),
        remediation: "Disable SSLv3, TLS 1.0 and TLS 1.1 on the server and make sure TLS 1.2 is offered.",
    },
    // --- Headers ---
    CheckDetail {
        kind: CheckKind::XssProtection,
        category: CheckCategory::Headers,
        badge: BadgeCode::XssProtect,
        badge_title: "Prevention of reflected Cross-Site Scripting (XSS) attacks",
        badge_description: "This site asks browsers to block pages when a reflected cross-site scripting attack is detected.",
        weakness: Some("X-XSS-Protection is missing or disabled."),
        remediation: "Send 'X-XSS-Protection: 1; mode=block'. Browsers without an XSS auditor ignore it, so pair it with a Content-Security-Policy.",
    },
    CheckDetail {
        kind: CheckKind::XFrameOptions,
        category: CheckCategory::Headers,
        badge: BadgeCode::ClickjackingProtect,
        badge_title: "Protection from Clickjacking attacks",
        badge_description: "Content from this site cannot be embedded into other sites, which protects visitors from clickjacking.",
        weakness: Some("X-Frame-Options does not forbid framing by other sites."),
        remediation: "Add the 'X-Frame-Options' header and set it to 'DENY' or 'SAMEORIGIN'.",
    },
    CheckDetail {
        kind: CheckKind::StrictTransportSecurity,
        category: CheckCategory::Headers,
        badge: BadgeCode::HttpsOnly,
        badge_title: "Enforces HTTPS-only site access",
        badge_description: "Browsers are told to reach this site, and its subdomains, over HTTPS only.",
        weakness: Some("Strict-Transport-Security is missing or does not cover subdomains."),
        remediation: "Send 'Strict-Transport-Security: max-age=31536000; includeSubDomains; preload'.",
    },
    CheckDetail {
        kind: CheckKind::ContentSecurityPolicy,
        category: CheckCategory::Headers,
        badge: BadgeCode::CspEnabled,
        badge_title: "Protection against XSS, data injection and packet sniffing",
        badge_description: "A Content-Security-Policy restricts which resources browsers may load for this site.",
        weakness: Some("No Content-Security-Policy header was sent."),
        remediation: "Define a Content-Security-Policy listing trusted sources for scripts, styles and other assets. Start restrictive and relax as needed.",
    },
    CheckDetail {
        kind: CheckKind::PublicKeyPins,
        category: CheckCategory::Headers,
        badge: BadgeCode::PublicKeyPinningEnabled,
        badge_title: "Protection against MITM attacks with forged certificates",
        badge_description: "This site pins its public keys, lowering the risk of interception with a mis-issued certificate.",
        weakness: Some("No Public-Key-Pins header was sent."),
        remediation: "HPKP is deprecated in browsers. Prefer CAA records and Certificate Transparency monitoring for the same protection.",
    },
    CheckDetail {
        kind: CheckKind::ReferrerPolicy,
        category: CheckCategory::Headers,
        badge: BadgeCode::EnsurePrivacy,
        badge_title: "Enforces a strict Referrer-Policy",
        badge_description: "This site prevents referrer information about its visitors from leaking to other sites.",
        weakness: Some("Referrer-Policy allows referrer information to leak."),
        remediation: "Send 'Referrer-Policy: no-referrer', or 'strict-origin-when-cross-origin' if analytics depend on referrers.",
    },
    CheckDetail {
        kind: CheckKind::XContentTypeOptions,
        category: CheckCategory::Headers,
        badge: BadgeCode::NoSniff,
        badge_title: "Prevention of media-type (MIME) sniffing",
        badge_description: "Browsers are not allowed to guess content types for this site's responses.",
        weakness: Some("X-Content-Type-Options is not set to 'nosniff'."),
        remediation: "Add the 'X-Content-Type-Options' header with the value 'nosniff'.",
    },
    // --- Mail ---
    CheckDetail {
        kind: CheckKind::Spf,
        category: CheckCategory::Mail,
        badge: BadgeCode::EmailSpoofingProtect,
        badge_title: "Prevention of email spoofing",
        badge_description: "A strict Sender Policy Framework (SPF) record reduces the risk of forged emails sent on behalf of this domain.",
        weakness: Some("SPF records do not end with a strict '-all' policy."),
        remediation: "End the SPF record with '-all' once every legitimate mail source is listed, e.g. 'v=spf1 include:_spf.google.com -all'.",
    },
    CheckDetail {
        kind: CheckKind::Dmarc,
        category: CheckCategory::Mail,
        badge: BadgeCode::DmarcEnforced,
        badge_title: "Publishes a DMARC policy",
        badge_description: "Receiving mail servers are told how to handle messages that fail SPF or DKIM checks for this domain.",
        weakness: Some("No valid DMARC record was found."),
        remediation: "Publish a TXT record at _dmarc.<domain>, starting with 'v=DMARC1; p=none;' and moving to 'quarantine' or 'reject'.",
    },
    // --- Disclosure ---
    CheckDetail {
        kind: CheckKind::Incidents,
        category: CheckCategory::Disclosure,
        badge: BadgeCode::RapidIncidentResponse,
        badge_title: "Fixes disclosed vulnerabilities quickly",
        badge_description: "Every publicly disclosed vulnerability for this domain was fixed within 30 days.",
        weakness: Some("Some disclosed vulnerabilities are unfixed or took longer than 30 days to fix."),
        remediation: "Triage incoming vulnerability reports promptly and publish a security.txt with a reachable contact.",
    },
];

/// Looks up the catalog entry for a check.
pub fn get_check_detail(kind: CheckKind) -> Option<&'static CheckDetail> {
    CHECKS.iter().find(|detail| detail.kind == kind)
}

/// The badge earned by a check, if it passed.
pub fn badge_for(result: &CheckResult) -> Option<Badge> {
    if !result.passed() {
        return None;
    }
    get_check_detail(result.kind).map(|detail| Badge {
        code: detail.badge,
        title: detail.badge_title.to_string(),
        description: detail.badge_description.to_string(),
    })
}

/// The explanation for an applicable check that fell short.
pub fn weakness_for(result: &CheckResult) -> Option<&'static str> {
    if !result.contribution.is_applicable() || result.passed() {
        return None;
    }
    get_check_detail(result.kind).and_then(|detail| detail.weakness)
}
