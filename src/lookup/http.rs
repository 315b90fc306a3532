//! Native transport: blocking `reqwest` client and thread sleep.
//!
//! Meant to be driven by a single-task executor such as `pollster`; both
//! calls block the calling thread while "awaiting".

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use url::Url;

use super::{ColorNameLookup, LookupResponse, Sleep};
use crate::error::{Result, YarnviewError};

/// Lookup over a blocking HTTP client.
#[derive(Debug, Clone)]
pub struct HttpLookup {
    client: Client,
}

impl HttpLookup {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built (TLS backend init).
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("yarnview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| YarnviewError::Transport(e.to_string()))?;
        Ok(Self { client })
    }
}

impl ColorNameLookup for HttpLookup {
    async fn fetch(&self, url: &Url) -> Result<LookupResponse> {
        let response = self
            .client
            .get(url.as_str())
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|e| YarnviewError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .map_err(|e| YarnviewError::Transport(e.to_string()))?;

        Ok(LookupResponse { status, body })
    }
}

/// Backoff by parking the current thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

impl Sleep for ThreadSleep {
    async fn sleep(&self, delay: Duration) {
        std::thread::sleep(delay);
    }
}
