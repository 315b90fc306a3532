//! yarnview - yarn inventory core for the web
//!
//! Backs a knitting-yarn inventory page compiled to WebAssembly:
//! - Color labels resolved to hex through a public color-name API
//! - Retry with backoff on rate limiting, per-session label cache
//! - Light/dark text decision from perceived luminance
//! - Card bindings that drop superseded lookups
//! - Yarn records, add form and editable cards over a document store
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { ColorResolver, initLogging } from 'yarnview';
//! await init();
//! initLogging();
//! const resolver = new ColorResolver({ maxRetries: 2 });
//! const card = resolver.resolve(yarn.color, (color, isDark) => paint(color, isDark));
//! // later, when the card goes away
//! card.cancel();
//! ```

// Color resolution
pub mod binding;
pub mod cache;
pub mod cancel;
pub mod color;
pub mod error;
pub mod lookup;
pub mod session;

// Inventory model
pub mod card;
pub mod inventory;
pub mod store;
pub mod yarn;

// Browser bindings
#[cfg(target_arch = "wasm32")]
pub mod web;

use wasm_bindgen::prelude::*;

pub use binding::ColorBinding;
pub use cancel::CancellationToken;
pub use color::{ResolvedColor, TextTone};
pub use error::YarnviewError;
pub use lookup::LookupConfig;
pub use session::{ColorSession, Resolution};

#[cfg(target_arch = "wasm32")]
pub use web::{CardColor, ColorResolver};

/// Install the panic hook and route `log` output to the browser console.
///
/// Safe to call more than once.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(js_name = initLogging)]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        log::debug!("console logger already installed");
    }
}

/// Normalize a color label: lower-cased, trimmed, `"slate"` when empty
#[must_use]
#[wasm_bindgen(js_name = normalizeColorLabel)]
pub fn normalize_color_label(raw: Option<String>) -> String {
    color::normalize(raw.as_deref())
}

/// Whether text over this background color should be light
#[must_use]
#[wasm_bindgen(js_name = isDarkBackground)]
pub fn is_dark_background(color: &str) -> bool {
    color::is_dark_background(color)
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
