//! Color resolution session.
//!
//! A session owns the label cache together with the lookup transport and
//! backoff sleeper. Resolution is split in two halves so a UI can render
//! immediately and update once:
//! - [`ColorSession::begin`] is synchronous and never suspends: it
//!   normalizes the label and answers from the cache or optimistically with
//!   the label itself
//! - [`ColorSession::complete`] performs the remote lookup and records the
//!   outcome in the cache, unless the caller cancelled in the meantime

use std::cell::RefCell;

use crate::cache::ColorCache;
use crate::cancel::CancellationToken;
use crate::color::{normalize, ResolvedColor};
use crate::lookup::{resolve_hex, ColorNameLookup, LookupConfig, Sleep};

/// Outcome of the synchronous half of a resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Label was already resolved this session; no remote call needed.
    Cached(ResolvedColor),
    /// Remote lookup still needed. `optimistic` renders the label itself.
    Pending {
        label: String,
        optimistic: ResolvedColor,
    },
}

impl Resolution {
    /// The color to render right now.
    #[must_use]
    pub fn color(&self) -> &ResolvedColor {
        match self {
            Self::Cached(color) => color,
            Self::Pending { optimistic, .. } => optimistic,
        }
    }

    #[must_use]
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending { .. })
    }
}

/// Cache plus lookup transport for one UI session.
pub struct ColorSession<L, S> {
    lookup: L,
    sleeper: S,
    config: LookupConfig,
    cache: RefCell<ColorCache>,
}

impl<L: ColorNameLookup, S: Sleep> ColorSession<L, S> {
    pub fn new(lookup: L, sleeper: S) -> Self {
        Self::with_config(lookup, sleeper, LookupConfig::default())
    }

    pub fn with_config(lookup: L, sleeper: S, config: LookupConfig) -> Self {
        Self {
            lookup,
            sleeper,
            config,
            cache: RefCell::new(ColorCache::new()),
        }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    pub fn lookup(&self) -> &L {
        &self.lookup
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    /// Cached resolution for an already-normalized label.
    pub fn cached(&self, label: &str) -> Option<String> {
        self.cache.borrow().get(label).map(str::to_string)
    }

    /// Number of distinct labels resolved so far.
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Synchronous half: normalize and answer from the cache if possible.
    pub fn begin(&self, raw: Option<&str>) -> Resolution {
        let label = normalize(raw);
        if let Some(hit) = self.cached(&label) {
            log::debug!("color {label:?} served from cache as {hit:?}");
            return Resolution::Cached(ResolvedColor::new(hit));
        }
        let optimistic = ResolvedColor::new(label.as_str());
        Resolution::Pending { label, optimistic }
    }

    /// Asynchronous half: resolve a normalized label remotely and cache it.
    ///
    /// A failed lookup caches the label as its own color so it is never
    /// looked up again this session. Returns `None`, without touching the
    /// cache, if `token` was cancelled while the lookup was in flight.
    pub async fn complete(&self, label: &str, token: &CancellationToken) -> Option<ResolvedColor> {
        let hex = resolve_hex(&self.lookup, &self.sleeper, &self.config, label).await;
        if token.is_cancelled() {
            log::debug!("discarding superseded resolution for {label:?}");
            return None;
        }

        let mut cache = self.cache.borrow_mut();
        cache.insert(label, hex.as_deref().unwrap_or(label));
        // An overlapping resolution of the same label may have landed first;
        // the first write wins.
        let color = cache.get(label).unwrap_or(label).to_string();
        Some(ResolvedColor::new(color))
    }

    /// Resolve a raw label to its final color, with no cancellation.
    pub async fn resolve(&self, raw: Option<&str>) -> ResolvedColor {
        match self.begin(raw) {
            Resolution::Cached(color) => color,
            Resolution::Pending { label, optimistic } => self
                .complete(&label, &CancellationToken::new())
                .await
                .unwrap_or(optimistic),
        }
    }
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
    use std::cell::Cell;
    use std::time::Duration;

    use futures::executor::block_on;
    use url::Url;

    use crate::error::Result;
    use crate::lookup::LookupResponse;

    /// Answers every request with the same body and counts calls.
    struct Fixed {
        body: &'static str,
        calls: Cell<usize>,
    }

    impl Fixed {
        fn new(body: &'static str) -> Self {
            Self {
                body,
                calls: Cell::new(0),
            }
        }
    }

    impl ColorNameLookup for Fixed {
        async fn fetch(&self, _url: &Url) -> Result<LookupResponse> {
            self.calls.set(self.calls.get() + 1);
            Ok(LookupResponse {
                status: 200,
                body: self.body.to_string(),
            })
        }
    }

    struct NoSleep;

    impl Sleep for NoSleep {
        async fn sleep(&self, _delay: Duration) {}
    }

    #[test]
    fn test_begin_is_optimistic() {
        let session = ColorSession::new(Fixed::new("{}"), NoSleep);
        let resolution = session.begin(Some("  Forest Green "));
        assert!(resolution.is_pending());
        assert_eq!(resolution.color(), &ResolvedColor::new("forest green"));
        assert_eq!(session.lookup.calls.get(), 0);
    }

    #[test]
    fn test_second_resolution_hits_cache() {
        let session = ColorSession::new(Fixed::new(r##"{"colors":[{"hex":"#228b22"}]}"##), NoSleep);

        let first = block_on(session.resolve(Some("Forest Green")));
        assert_eq!(first.color, "#228b22");
        assert!(first.is_dark);

        let second = session.begin(Some("forest green "));
        assert_eq!(second, Resolution::Cached(ResolvedColor::new("#228b22")));
        assert_eq!(block_on(session.resolve(Some("FOREST GREEN"))), first);
        assert_eq!(session.lookup.calls.get(), 1);
    }

    #[test]
    fn test_failed_lookup_caches_label() {
        let session = ColorSession::new(Fixed::new(r#"{"colors":[]}"#), NoSleep);
        let color = block_on(session.resolve(Some("mauve")));
        assert_eq!(color, ResolvedColor::new("mauve"));
        assert_eq!(session.cached("mauve").as_deref(), Some("mauve"));

        block_on(session.resolve(Some("mauve")));
        assert_eq!(session.lookup.calls.get(), 1);
    }

    #[test]
    fn test_cancelled_completion_leaves_cache_alone() {
        let session = ColorSession::new(Fixed::new(r##"{"colors":[{"hex":"#ff0000"}]}"##), NoSleep);
        let token = CancellationToken::new();
        token.cancel();
        assert_eq!(block_on(session.complete("red", &token)), None);
        assert_eq!(session.cache_len(), 0);
    }

    #[test]
    fn test_first_write_wins() {
        let session = ColorSession::new(Fixed::new(r##"{"colors":[{"hex":"#0000ff"}]}"##), NoSleep);
        session.cache.borrow_mut().insert("blue", "#0000fe");
        let color = block_on(session.complete("blue", &CancellationToken::new())).unwrap();
        assert_eq!(color.color, "#0000fe");
    }
}
