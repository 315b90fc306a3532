//! Common test utilities: scripted lookup transports and sleepers.
//!
//! Lookups are scripted per label so tests can interleave resolutions of
//! different labels and hold some of them open with a gate.
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::time::Duration;

use futures::channel::oneshot;
use url::Url;

use yarnview::error::{Result, YarnviewError};
use yarnview::lookup::{ColorNameLookup, LookupResponse, Sleep};

// ============================================================================
// Response builders
// ============================================================================

pub fn status(status: u16) -> Result<LookupResponse> {
    Ok(LookupResponse {
        status,
        body: String::new(),
    })
}

pub fn body(body: &str) -> Result<LookupResponse> {
    Ok(LookupResponse {
        status: 200,
        body: body.to_string(),
    })
}

/// A 200 response naming a single color.
pub fn hex(hex: &str) -> Result<LookupResponse> {
    body(&serde_json::json!({ "colors": [{ "name": "Test", "hex": hex }] }).to_string())
}

pub fn network_error() -> Result<LookupResponse> {
    Err(YarnviewError::Transport("connection reset".into()))
}

// ============================================================================
// Scripted lookup
// ============================================================================

enum Reply {
    Now(Result<LookupResponse>),
    Gated(oneshot::Receiver<Result<LookupResponse>>),
}

/// Lookup whose replies are queued per label.
///
/// A label with nothing queued fails with a transport error.
#[derive(Default)]
pub struct MockLookup {
    replies: RefCell<HashMap<String, VecDeque<Reply>>>,
    calls: RefCell<Vec<String>>,
}

impl MockLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue immediate replies for `label`.
    pub fn script(&self, label: &str, replies: Vec<Result<LookupResponse>>) {
        let mut all = self.replies.borrow_mut();
        let queue = all.entry(label.to_string()).or_default();
        queue.extend(replies.into_iter().map(Reply::Now));
    }

    /// Queue a reply for `label` that arrives only when the sender fires.
    pub fn gate(&self, label: &str) -> oneshot::Sender<Result<LookupResponse>> {
        let (tx, rx) = oneshot::channel();
        self.replies
            .borrow_mut()
            .entry(label.to_string())
            .or_default()
            .push_back(Reply::Gated(rx));
        tx
    }

    /// Labels requested so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn calls_for(&self, label: &str) -> usize {
        self.calls.borrow().iter().filter(|l| *l == label).count()
    }
}

fn label_of(url: &Url) -> String {
    url.query_pairs()
        .find(|(key, _)| key == "name")
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

impl ColorNameLookup for MockLookup {
    async fn fetch(&self, url: &Url) -> Result<LookupResponse> {
        let label = label_of(url);
        self.calls.borrow_mut().push(label.clone());

        let reply = self
            .replies
            .borrow_mut()
            .get_mut(&label)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Now(result)) => result,
            Some(Reply::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(YarnviewError::Transport("gate dropped".into()))),
            None => Err(YarnviewError::Transport(format!("no reply for {label:?}"))),
        }
    }
}

// ============================================================================
// Sleepers
// ============================================================================

/// Records requested delays without waiting.
#[derive(Default)]
pub struct RecordingSleep {
    delays: RefCell<Vec<Duration>>,
}

impl RecordingSleep {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delays(&self) -> Vec<Duration> {
        self.delays.borrow().clone()
    }
}

impl Sleep for RecordingSleep {
    async fn sleep(&self, delay: Duration) {
        self.delays.borrow_mut().push(delay);
    }
}
