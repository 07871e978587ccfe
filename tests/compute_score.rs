// tests/compute_score.rs

mod common;

use chrono::{Duration, TimeZone, Utc};
use common::{engine, probe, FakeDns, FakeFeed, HttpBehavior};
use vanguard_score::core::models::{BadgeCode, CheckKind, IncidentRecord, ScoreContribution, TlsVersion};
use vanguard_score::core::scanner::probes::TlsSession;
use vanguard_score::core::scoring::protocol::SECURE_MESSAGE;
use vanguard_score::ScoreError;

const HARDENED_HEADERS: &[(&str, &str)] = &[
    ("X-Frame-Options", "DENY"),
    ("Strict-Transport-Security", "max-age=31536000; includeSubDomains"),
];

fn contribution(report: &vanguard_score::ScoreReport, kind: CheckKind) -> ScoreContribution {
    report
        .checks
        .iter()
        .find(|check| check.kind == kind)
        .map(|check| check.contribution)
        .unwrap_or_else(|| panic!("{kind} missing from report"))
}

fn incident(hours_to_fix: i64) -> IncidentRecord {
    let reported = Utc.with_ymd_and_hms(2021, 3, 1, 12, 0, 0).unwrap();
    IncidentRecord {
        reported_date: Some(reported),
        fixed_date: Some(reported + Duration::hours(hours_to_fix)),
        fixed: true,
        kind: Some("Cross Site Scripting".to_string()),
        url: None,
    }
}

#[tokio::test]
async fn hardened_headers_without_mail_data_score_point_six_eight() {
    let engine = engine(
        HttpBehavior::Respond(probe(HARDENED_HEADERS, "HTTP/2.0", Some(TlsVersion::Tls12))),
        Err("connection refused".to_string()),
        FakeDns::failing("SERVFAIL"),
        FakeFeed(Ok(Vec::new())),
    );

    let report = engine.compute_score("https://example.com").await.unwrap();

    assert_eq!(report.score.achieved_total, 34);
    assert_eq!(report.score.max_total, 50);
    assert_eq!(report.score.normalized, 0.68);
    assert_eq!(report.score.messages[0], SECURE_MESSAGE);
    assert_eq!(contribution(&report, CheckKind::Spf), ScoreContribution::NONE);
    assert_eq!(contribution(&report, CheckKind::Dmarc), ScoreContribution::NONE);
    assert_eq!(contribution(&report, CheckKind::Incidents), ScoreContribution::NONE);

    let badges: Vec<BadgeCode> = report.badges.iter().map(|b| b.code).collect();
    assert_eq!(
        badges,
        vec![
            BadgeCode::HttpSecure,
            BadgeCode::ClickjackingProtect,
            BadgeCode::HttpsOnly,
            BadgeCode::LatestHttp,
            BadgeCode::LatestTls,
        ]
    );
    assert!(report.score.messages.iter().any(|m| m.starts_with("SPF lookup failed")));
    assert!(report.score.messages.iter().any(|m| m.starts_with("Certificate check failed")));
}

#[tokio::test]
async fn missing_dmarc_record_counts_against_the_site() {
    let engine = engine(
        HttpBehavior::Respond(probe(HARDENED_HEADERS, "HTTP/2.0", Some(TlsVersion::Tls12))),
        Err("connection refused".to_string()),
        FakeDns::default(),
        FakeFeed(Ok(Vec::new())),
    );

    let report = engine.compute_score("https://www.example.com").await.unwrap();

    assert_eq!(contribution(&report, CheckKind::Spf), ScoreContribution::NONE);
    assert_eq!(contribution(&report, CheckKind::Dmarc), ScoreContribution::new(0, 5));
    assert_eq!(report.score.achieved_total, 34);
    assert_eq!(report.score.max_total, 55);
    assert_eq!(report.score.normalized, 0.62);
}

#[tokio::test]
async fn mail_records_and_incidents_join_the_total() {
    let dns = FakeDns::default()
        .with("example.com", &["v=spf1 include:_spf.example.net -all", "google-site-verification=x"])
        .with("_dmarc.example.com", &["v=DMARC1; p=none; rua=mailto:d@example.com"]);
    let engine = engine(
        HttpBehavior::Respond(probe(HARDENED_HEADERS, "HTTP/2.0", Some(TlsVersion::Tls12))),
        Err("connection refused".to_string()),
        dns,
        FakeFeed(Ok(vec![incident(24), incident(24 * 60)])),
    );

    let report = engine.compute_score("https://www.example.com/login").await.unwrap();

    assert_eq!(contribution(&report, CheckKind::Spf), ScoreContribution::new(5, 5));
    assert_eq!(contribution(&report, CheckKind::Dmarc), ScoreContribution::new(5, 5));
    assert_eq!(contribution(&report, CheckKind::Incidents), ScoreContribution::new(15, 20));
    assert_eq!(report.score.achieved_total, 34 + 5 + 5 + 15);
    assert_eq!(report.score.max_total, 50 + 5 + 5 + 20);
    assert_eq!(report.incidents.len(), 2);
    assert!(report.score.messages.iter().any(|m| m.contains("DMARC policy is 'none'")));
}

#[tokio::test]
async fn plain_http_scores_the_protocol_at_zero() {
    let engine = engine(
        HttpBehavior::Respond(probe(&[("Server", "nginx/1.25.3")], "HTTP/1.1", None)),
        Err("connection refused".to_string()),
        FakeDns::failing("timeout"),
        FakeFeed(Ok(Vec::new())),
    );

    let report = engine.compute_score("http://example.com").await.unwrap();

    assert_eq!(contribution(&report, CheckKind::Protocol), ScoreContribution::new(0, 5));
    assert_eq!(contribution(&report, CheckKind::TlsVersion), ScoreContribution::NONE);
    assert!(report.score.messages[0].starts_with("Website is unencrypted"));
    assert!(!report.badges.iter().any(|b| b.code == BadgeCode::HttpSecure));
    assert_eq!(report.server.as_ref().map(|s| s.name.as_str()), Some("nginx"));
}

#[tokio::test]
async fn urls_without_a_host_are_rejected() {
    let engine = engine(
        HttpBehavior::Refused,
        Err("unused".to_string()),
        FakeDns::default(),
        FakeFeed(Ok(Vec::new())),
    );

    for input in ["example", "", "mailto:someone@example.com"] {
        let err = engine.compute_score(input).await.unwrap_err();
        assert!(matches!(err, ScoreError::InvalidUrl { .. }), "{input:?} gave {err:?}");
    }
}

#[tokio::test]
async fn unresolvable_hosts_are_reported_distinctly() {
    let engine = engine(
        HttpBehavior::Unresolvable,
        Err("no route".to_string()),
        FakeDns::default(),
        FakeFeed(Ok(Vec::new())),
    );

    let err = engine.compute_score("https://nonexistent.invalid").await.unwrap_err();

    match err {
        ScoreError::UnresolvableHost { host, .. } => assert_eq!(host, "nonexistent.invalid"),
        other => panic!("expected UnresolvableHost, got {other:?}"),
    }
}

#[tokio::test]
async fn primary_probe_failure_aborts_the_computation() {
    let engine = engine(
        HttpBehavior::Refused,
        Err("connection refused".to_string()),
        FakeDns::default(),
        FakeFeed(Ok(Vec::new())),
    );

    let err = engine.compute_score("https://example.com").await.unwrap_err();

    assert!(matches!(err, ScoreError::ProbeFailure(_)));
}

#[tokio::test]
async fn secondary_failures_degrade_to_messages() {
    let engine = engine(
        HttpBehavior::Respond(probe(HARDENED_HEADERS, "HTTP/2.0", Some(TlsVersion::Tls12))),
        Ok(TlsSession::default()),
        FakeDns::failing("SERVFAIL"),
        FakeFeed(Err("feed returned 503".to_string())),
    );

    let report = engine.compute_score("https://example.com").await.unwrap();

    assert!(report.incidents.is_empty());
    assert_eq!(
        report.certificate.error.as_deref(),
        Some("Server did not provide a certificate.")
    );
    let messages = &report.score.messages;
    assert!(messages.iter().any(|m| m == "Incident history unavailable: feed returned 503"));
    assert!(messages.iter().any(|m| m.contains("did not provide a certificate")));
    assert_eq!(report.score.normalized, 0.68);
}

#[tokio::test]
async fn repeated_runs_produce_identical_reports() {
    let engine = engine(
        HttpBehavior::Respond(probe(HARDENED_HEADERS, "HTTP/2.0", Some(TlsVersion::Tls12))),
        Err("connection refused".to_string()),
        FakeDns::default().with("_dmarc.example.com", &["v=DMARC1; p=reject"]),
        FakeFeed(Ok(vec![incident(10)])),
    );

    let first = engine.compute_score("https://example.com").await.unwrap();
    let second = engine.compute_score("https://example.com").await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn adding_a_security_header_never_lowers_the_score() {
    let baseline = engine(
        HttpBehavior::Respond(probe(HARDENED_HEADERS, "HTTP/2.0", Some(TlsVersion::Tls12))),
        Err("connection refused".to_string()),
        FakeDns::failing("SERVFAIL"),
        FakeFeed(Ok(Vec::new())),
    );
    let mut headers = HARDENED_HEADERS.to_vec();
    headers.push(("X-Content-Type-Options", "nosniff"));
    let improved = engine(
        HttpBehavior::Respond(probe(&headers, "HTTP/2.0", Some(TlsVersion::Tls12))),
        Err("connection refused".to_string()),
        FakeDns::failing("SERVFAIL"),
        FakeFeed(Ok(Vec::new())),
    );

    let before = baseline.compute_score("https://example.com").await.unwrap();
    let after = improved.compute_score("https://example.com").await.unwrap();

    assert!(after.score.normalized >= before.score.normalized);
    assert!(after.badges.iter().any(|b| b.code == BadgeCode::NoSniff));
}
