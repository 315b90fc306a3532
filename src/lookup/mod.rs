//! Remote color-name lookup.
//!
//! Resolves a normalized color label to a hex color through a public
//! color-naming service (`GET <base>/names/?name=<label>`). Rate limiting
//! and transport failures are retried with quadratic backoff; every other
//! failure resolves to `None` so the caller can fall back to the label.
//!
//! The HTTP call and the backoff delay both go through traits so the retry
//! loop runs the same way in the browser, natively, and under test:
//! - [`ColorNameLookup`] issues a single GET and reports status + body
//! - [`Sleep`] waits out a backoff delay

#[cfg(target_arch = "wasm32")]
mod fetch;
#[cfg(not(target_arch = "wasm32"))]
mod http;

#[cfg(target_arch = "wasm32")]
pub use fetch::{FetchLookup, TimeoutSleep};
#[cfg(not(target_arch = "wasm32"))]
pub use http::{HttpLookup, ThreadSleep};

use std::rc::Rc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{Result, YarnviewError};

/// Public color-naming service
pub const DEFAULT_BASE_URL: &str = "https://api.color.pizza/v1";

/// Retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Backoff unit; attempt `n` (0-based) waits `BASE_BACKOFF_MS * (n + 1)^2`
pub const BASE_BACKOFF_MS: u64 = 300;

/// Lookup service settings.
///
/// Deserializable so the browser host can pass a partial JS object; any
/// missing field takes its default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LookupConfig {
    pub base_url: String,
    pub max_retries: u32,
    pub base_backoff_ms: u64,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            base_backoff_ms: BASE_BACKOFF_MS,
        }
    }
}

impl LookupConfig {
    /// Delay before retrying after the given 0-based attempt failed.
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let step = u64::from(attempt).saturating_add(1);
        Duration::from_millis(self.base_backoff_ms.saturating_mul(step.saturating_mul(step)))
    }

    /// Lookup URL for a label, with the label form-encoded into the query.
    ///
    /// # Errors
    /// Returns an error if `base_url` is not an absolute URL.
    pub fn names_url(&self, label: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/names/", self.base_url.trim_end_matches('/')))?;
        url.query_pairs_mut().append_pair("name", label);
        Ok(url)
    }
}

/// Status and body of one lookup response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupResponse {
    pub status: u16,
    pub body: String,
}

impl LookupResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// One HTTP GET against the lookup service, sent with `Accept: application/json`.
///
/// Implementations return `Err` only when no response arrived at all;
/// non-2xx statuses are reported through [`LookupResponse::status`].
#[allow(async_fn_in_trait)]
pub trait ColorNameLookup {
    async fn fetch(&self, url: &Url) -> Result<LookupResponse>;
}

/// Suspends the current task for a backoff delay.
#[allow(async_fn_in_trait)]
pub trait Sleep {
    async fn sleep(&self, delay: Duration);
}

impl<T: ColorNameLookup + ?Sized> ColorNameLookup for &T {
    async fn fetch(&self, url: &Url) -> Result<LookupResponse> {
        (**self).fetch(url).await
    }
}

impl<T: ColorNameLookup + ?Sized> ColorNameLookup for Rc<T> {
    async fn fetch(&self, url: &Url) -> Result<LookupResponse> {
        (**self).fetch(url).await
    }
}

impl<T: Sleep + ?Sized> Sleep for &T {
    async fn sleep(&self, delay: Duration) {
        (**self).sleep(delay).await;
    }
}

impl<T: Sleep + ?Sized> Sleep for Rc<T> {
    async fn sleep(&self, delay: Duration) {
        (**self).sleep(delay).await;
    }
}

/// Extract the first candidate's `hex` from a `{"colors":[{"hex":..}]}` body.
///
/// Returns `Ok(None)` when the body is JSON but carries no usable hex
/// (missing field, non-string, empty string).
///
/// # Errors
/// Returns an error if the body is not valid JSON.
pub fn first_hex(body: &str) -> Result<Option<String>> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    let hex = value
        .get("colors")
        .and_then(|colors| colors.get(0))
        .and_then(|color| color.get("hex"))
        .and_then(serde_json::Value::as_str)
        .filter(|hex| !hex.is_empty())
        .map(str::to_string);
    Ok(hex)
}

/// Resolve a normalized label to a hex color, or `None` if it cannot be.
///
/// Makes up to `config.max_retries + 1` requests. HTTP 429 and transport
/// errors wait [`LookupConfig::backoff`] and retry; any other non-2xx
/// status gives up immediately. Nothing is cached here.
pub async fn resolve_hex<L, S>(
    lookup: &L,
    sleeper: &S,
    config: &LookupConfig,
    label: &str,
) -> Option<String>
where
    L: ColorNameLookup + ?Sized,
    S: Sleep + ?Sized,
{
    let url = match config.names_url(label) {
        Ok(url) => url,
        Err(e) => {
            log::error!("color lookup for {label:?} skipped: {e}");
            return None;
        }
    };

    for attempt in 0..=config.max_retries {
        let err = match lookup.fetch(&url).await {
            Ok(response) if response.is_success() => {
                return match first_hex(&response.body) {
                    Ok(Some(hex)) => Some(hex),
                    Ok(None) => {
                        log::debug!("color lookup for {label:?} returned no hex");
                        None
                    }
                    Err(e) => {
                        log::warn!("color lookup for {label:?} returned malformed body: {e}");
                        None
                    }
                };
            }
            Ok(response) => YarnviewError::Http {
                status: response.status,
            },
            Err(e) => e,
        };

        if !err.is_transient() {
            log::warn!("color lookup for {label:?} failed: {err}");
            return None;
        }
        if attempt >= config.max_retries {
            log::error!(
                "color lookup for {label:?} gave up after {} attempts: {err}",
                attempt.saturating_add(1)
            );
            return None;
        }

        let delay = config.backoff(attempt);
        log::debug!("color lookup for {label:?} retrying in {delay:?}: {err}");
        sleeper.sleep(delay).await;
    }

    None
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use futures::executor::block_on;

    /// Replays canned responses and records every URL requested.
    #[derive(Default)]
    struct Scripted {
        responses: RefCell<VecDeque<Result<LookupResponse>>>,
        urls: RefCell<Vec<String>>,
    }

    impl Scripted {
        fn new(responses: Vec<Result<LookupResponse>>) -> Self {
            Self {
                responses: RefCell::new(responses.into()),
                urls: RefCell::default(),
            }
        }

        fn calls(&self) -> usize {
            self.urls.borrow().len()
        }
    }

    impl ColorNameLookup for Scripted {
        async fn fetch(&self, url: &Url) -> Result<LookupResponse> {
            self.urls.borrow_mut().push(url.to_string());
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(YarnviewError::Transport("script exhausted".into())))
        }
    }

    #[derive(Default)]
    struct Delays(RefCell<Vec<Duration>>);

    impl Sleep for Delays {
        async fn sleep(&self, delay: Duration) {
            self.0.borrow_mut().push(delay);
        }
    }

    fn status(status: u16) -> Result<LookupResponse> {
        Ok(LookupResponse {
            status,
            body: String::new(),
        })
    }

    fn ok(body: &str) -> Result<LookupResponse> {
        Ok(LookupResponse {
            status: 200,
            body: body.to_string(),
        })
    }

    fn run(lookup: &Scripted, delays: &Delays) -> Option<String> {
        block_on(resolve_hex(lookup, delays, &LookupConfig::default(), "mauve"))
    }

    #[test]
    fn test_backoff_schedule() {
        let config = LookupConfig::default();
        assert_eq!(config.backoff(0), Duration::from_millis(300));
        assert_eq!(config.backoff(1), Duration::from_millis(1200));
        assert_eq!(config.backoff(2), Duration::from_millis(2700));
        assert_eq!(config.backoff(u32::MAX), Duration::from_millis(u64::MAX));
    }

    #[test]
    fn test_names_url_encodes_label() {
        let url = LookupConfig::default().names_url("forest green").unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.color.pizza/v1/names/?name=forest+green"
        );

        let url = LookupConfig::default().names_url("#abc&x=1").unwrap();
        assert_eq!(url.query(), Some("name=%23abc%26x%3D1"));
    }

    #[test]
    fn test_names_url_trailing_slash_and_bad_base() {
        let config = LookupConfig {
            base_url: "http://localhost:8080/v1/".into(),
            ..LookupConfig::default()
        };
        assert_eq!(
            config.names_url("red").unwrap().as_str(),
            "http://localhost:8080/v1/names/?name=red"
        );

        let config = LookupConfig {
            base_url: "not a url".into(),
            ..LookupConfig::default()
        };
        assert!(matches!(config.names_url("red"), Err(YarnviewError::Url(_))));
    }

    #[test]
    fn test_config_partial_deserialize() {
        let config: LookupConfig = serde_json::from_str(r#"{"maxRetries": 5}"#).unwrap();
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.base_backoff_ms, BASE_BACKOFF_MS);
    }

    #[test]
    fn test_first_hex() {
        assert_eq!(
            first_hex(r##"{"colors":[{"hex":"#336699"},{"hex":"#000000"}]}"##).unwrap(),
            Some("#336699".to_string())
        );
        assert_eq!(first_hex(r#"{"colors":[]}"#).unwrap(), None);
        assert_eq!(first_hex(r#"{"colors":[{"name":"x"}]}"#).unwrap(), None);
        assert_eq!(first_hex(r#"{"colors":[{"hex":42}]}"#).unwrap(), None);
        assert_eq!(first_hex(r#"{"colors":[{"hex":""}]}"#).unwrap(), None);
        assert_eq!(first_hex(r#"{"paletteTitle":"x"}"#).unwrap(), None);
        assert!(first_hex("<html>").is_err());
    }

    #[test]
    fn test_success_first_try() {
        let lookup = Scripted::new(vec![ok(r##"{"colors":[{"hex":"#e0b0ff"}]}"##)]);
        let delays = Delays::default();
        assert_eq!(run(&lookup, &delays), Some("#e0b0ff".to_string()));
        assert_eq!(lookup.calls(), 1);
        assert!(delays.0.borrow().is_empty());
        assert_eq!(
            lookup.urls.borrow()[0],
            "https://api.color.pizza/v1/names/?name=mauve"
        );
    }

    #[test]
    fn test_rate_limited_then_success() {
        let lookup = Scripted::new(vec![status(429), ok(r##"{"colors":[{"hex":"#336699"}]}"##)]);
        let delays = Delays::default();
        assert_eq!(run(&lookup, &delays), Some("#336699".to_string()));
        assert_eq!(lookup.calls(), 2);
        assert_eq!(*delays.0.borrow(), vec![Duration::from_millis(300)]);
    }

    #[test]
    fn test_rate_limited_exhausts_retries() {
        let lookup = Scripted::new(vec![status(429), status(429), status(429), ok("{}")]);
        let delays = Delays::default();
        assert_eq!(run(&lookup, &delays), None);
        assert_eq!(lookup.calls(), 3);
        assert_eq!(
            *delays.0.borrow(),
            vec![Duration::from_millis(300), Duration::from_millis(1200)]
        );
    }

    #[test]
    fn test_server_error_is_not_retried() {
        let lookup = Scripted::new(vec![status(500), ok(r##"{"colors":[{"hex":"#000"}]}"##)]);
        let delays = Delays::default();
        assert_eq!(run(&lookup, &delays), None);
        assert_eq!(lookup.calls(), 1);
        assert!(delays.0.borrow().is_empty());
    }

    #[test]
    fn test_transport_error_retried_with_same_schedule() {
        let lookup = Scripted::new(vec![
            Err(YarnviewError::Transport("connection reset".into())),
            Err(YarnviewError::Transport("connection reset".into())),
            ok(r##"{"colors":[{"hex":"#112233"}]}"##),
        ]);
        let delays = Delays::default();
        assert_eq!(run(&lookup, &delays), Some("#112233".to_string()));
        assert_eq!(
            *delays.0.borrow(),
            vec![Duration::from_millis(300), Duration::from_millis(1200)]
        );
    }

    #[test]
    fn test_transport_error_exhausts_retries() {
        let lookup = Scripted::new(Vec::new());
        let delays = Delays::default();
        assert_eq!(run(&lookup, &delays), None);
        assert_eq!(lookup.calls(), 3);
        assert_eq!(delays.0.borrow().len(), 2);
    }

    #[test]
    fn test_malformed_body_is_not_retried() {
        let lookup = Scripted::new(vec![ok("not json"), ok(r##"{"colors":[{"hex":"#000"}]}"##)]);
        let delays = Delays::default();
        assert_eq!(run(&lookup, &delays), None);
        assert_eq!(lookup.calls(), 1);
    }

    #[test]
    fn test_zero_retries() {
        let lookup = Scripted::new(vec![status(429), ok(r##"{"colors":[{"hex":"#000"}]}"##)]);
        let delays = Delays::default();
        let config = LookupConfig {
            max_retries: 0,
            ..LookupConfig::default()
        };
        assert_eq!(block_on(resolve_hex(&lookup, &delays, &config, "red")), None);
        assert_eq!(lookup.calls(), 1);
        assert!(delays.0.borrow().is_empty());
    }
}
