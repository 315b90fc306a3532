//! End-to-end tests for color resolution through a session.
//!
//! Tests cover:
//! 1. Optimistic color before any lookup
//! 2. Cache hits skipping the remote call
//! 3. Fallback to the label on permanent and exhausted failures
//! 4. Retry after rate limiting with the backoff schedule
//! 5. Empty labels resolving to the default
#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod common;

use std::time::Duration;

use futures::executor::block_on;
use test_case::test_case;

use common::{body, hex, network_error, status, MockLookup, RecordingSleep};
use yarnview::error::Result;
use yarnview::lookup::{LookupConfig, LookupResponse};
use yarnview::{ColorSession, ResolvedColor, Resolution};

fn session() -> ColorSession<MockLookup, RecordingSleep> {
    ColorSession::new(MockLookup::new(), RecordingSleep::new())
}

// ============================================================================
// Cache
// ============================================================================

#[test]
fn test_remote_lookup_invoked_once_per_label() {
    let session = session();
    // Only one reply is scripted; a second remote call would fail.
    session.lookup().script("forest green", vec![hex("#228b22")]);

    let first = block_on(session.resolve(Some("Forest Green")));
    let second = block_on(session.resolve(Some("  forest green ")));

    assert_eq!(first.color, "#228b22");
    assert_eq!(second, first);
    assert_eq!(session.lookup().calls_for("forest green"), 1);
}

#[test]
fn test_cache_hit_is_synchronous() {
    let session = session();
    session.lookup().script("teal", vec![hex("#008080")]);
    block_on(session.resolve(Some("teal")));

    match session.begin(Some("TEAL")) {
        Resolution::Cached(color) => assert_eq!(color, ResolvedColor::new("#008080")),
        other => panic!("expected cache hit, got {other:?}"),
    }
}

#[test]
fn test_optimistic_color_is_label() {
    let session = session();
    let resolution = session.begin(Some(" Black "));
    assert!(resolution.is_pending());
    assert_eq!(resolution.color().color, "black");
    assert!(resolution.color().is_dark);
    assert!(session.lookup().calls().is_empty());
}

// ============================================================================
// Fallback
// ============================================================================

#[test_case(vec![status(500)] ; "server error")]
#[test_case(vec![status(404)] ; "not found")]
#[test_case(vec![status(429), status(429), status(429)] ; "rate limited past budget")]
#[test_case(vec![network_error(), network_error(), network_error()] ; "network down")]
#[test_case(vec![body("<html>oops</html>")] ; "malformed body")]
#[test_case(vec![body(r#"{"colors":[]}"#)] ; "no candidates")]
#[test_case(vec![body(r#"{"colors":[{"hex":null}]}"#)] ; "hex not a string")]
fn test_failure_falls_back_to_label(replies: Vec<Result<LookupResponse>>) {
    let session = session();
    session.lookup().script("mauve", replies);

    let color = block_on(session.resolve(Some("Mauve")));
    assert_eq!(color, ResolvedColor::new("mauve"));
    assert!(!color.is_dark);
    assert_eq!(session.cached("mauve").as_deref(), Some("mauve"));

    // Cached as-is: no further calls.
    let calls = session.lookup().calls_for("mauve");
    block_on(session.resolve(Some("mauve")));
    assert_eq!(session.lookup().calls_for("mauve"), calls);
}

#[test]
fn test_rate_limit_uses_full_budget() {
    let session = session();
    session.lookup().script("mauve", vec![status(429), status(429), status(429)]);
    block_on(session.resolve(Some("mauve")));

    assert_eq!(session.lookup().calls_for("mauve"), 3);
    assert_eq!(
        session.sleeper().delays(),
        vec![Duration::from_millis(300), Duration::from_millis(1200)]
    );
}

#[test]
fn test_server_error_not_retried() {
    let session = session();
    session.lookup().script("mauve", vec![status(503), hex("#e0b0ff")]);
    block_on(session.resolve(Some("mauve")));

    assert_eq!(session.lookup().calls_for("mauve"), 1);
    assert!(session.sleeper().delays().is_empty());
}

// ============================================================================
// Retry
// ============================================================================

#[test]
fn test_rate_limited_then_resolved() {
    let session = session();
    session.lookup().script("blue", vec![status(429), hex("#336699")]);

    let color = block_on(session.resolve(Some("blue")));
    assert_eq!(color.color, "#336699");
    assert!(color.is_dark);
    assert_eq!(session.lookup().calls_for("blue"), 2);
    assert_eq!(session.sleeper().delays(), vec![Duration::from_millis(300)]);
    assert_eq!(session.cached("blue").as_deref(), Some("#336699"));
}

#[test]
fn test_custom_backoff_config() {
    let config = LookupConfig {
        max_retries: 3,
        base_backoff_ms: 10,
        ..LookupConfig::default()
    };
    let session = ColorSession::with_config(MockLookup::new(), RecordingSleep::new(), config);
    session.lookup().script(
        "ochre",
        vec![status(429), network_error(), status(429), hex("#cc7722")],
    );

    assert_eq!(block_on(session.resolve(Some("ochre"))).color, "#cc7722");
    assert_eq!(
        session.sleeper().delays(),
        vec![
            Duration::from_millis(10),
            Duration::from_millis(40),
            Duration::from_millis(90)
        ]
    );
}

// ============================================================================
// Default label
// ============================================================================

#[test]
fn test_empty_label_resolves_to_slate() {
    let session = session();
    // The service knows no color literally named "slate".
    session.lookup().script("slate", vec![body(r#"{"colors":[]}"#)]);

    let resolution = session.begin(Some(""));
    assert_eq!(resolution.color().color, "slate");

    let color = block_on(session.resolve(None));
    assert_eq!(color.color, "slate");
    assert!(!color.is_dark);
    assert_eq!(session.lookup().calls(), vec!["slate".to_string()]);
}
