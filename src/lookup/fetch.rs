//! Browser transport: `window.fetch` and `setTimeout` (wasm32 only).

use std::time::Duration;

use url::Url;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::{ColorNameLookup, LookupResponse, Sleep};
use crate::error::{Result, YarnviewError};

fn transport_error(value: &JsValue) -> YarnviewError {
    YarnviewError::Transport(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

/// Lookup over the page's `fetch`, in CORS mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct FetchLookup;

impl ColorNameLookup for FetchLookup {
    async fn fetch(&self, url: &Url) -> Result<LookupResponse> {
        let window =
            web_sys::window().ok_or_else(|| YarnviewError::Transport("no window".into()))?;

        let init = RequestInit::new();
        init.set_method("GET");
        init.set_mode(RequestMode::Cors);

        let request = Request::new_with_str_and_init(url.as_str(), &init)
            .map_err(|e| transport_error(&e))?;
        request
            .headers()
            .set("Accept", "application/json")
            .map_err(|e| transport_error(&e))?;

        let value = JsFuture::from(window.fetch_with_request(&request))
            .await
            .map_err(|e| transport_error(&e))?;
        let response: Response = value.dyn_into().map_err(|e| transport_error(&e))?;

        let status = response.status();
        if !response.ok() {
            return Ok(LookupResponse {
                status,
                body: String::new(),
            });
        }

        let text = response.text().map_err(|e| transport_error(&e))?;
        let body = JsFuture::from(text)
            .await
            .map_err(|e| transport_error(&e))?
            .as_string()
            .unwrap_or_default();

        Ok(LookupResponse { status, body })
    }
}

/// Backoff via `window.setTimeout`; resolves immediately outside a window.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimeoutSleep;

impl Sleep for TimeoutSleep {
    async fn sleep(&self, delay: Duration) {
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        let promise = js_sys::Promise::new(&mut |resolve, _reject| {
            let scheduled = web_sys::window().is_some_and(|window| {
                window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, millis)
                    .is_ok()
            });
            if !scheduled {
                let _ = resolve.call0(&JsValue::NULL);
            }
        });
        let _ = JsFuture::from(promise).await;
    }
}
