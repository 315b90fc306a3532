//! Browser bindings for card colors (wasm32 only).
//!
//! One `ColorResolver` per page holds the session cache. Each card gets a
//! `CardColor` whose callback fires with `(color, isDark)` immediately and
//! again when the remote lookup lands.

use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use crate::binding::ColorBinding;
use crate::color::ResolvedColor;
use crate::lookup::{FetchLookup, LookupConfig, TimeoutSleep};
use crate::session::ColorSession;

type WebSession = ColorSession<FetchLookup, TimeoutSleep>;

#[wasm_bindgen]
pub struct ColorResolver {
    session: Rc<WebSession>,
}

#[wasm_bindgen]
impl ColorResolver {
    /// Create a resolver. `config` is an optional partial `LookupConfig`
    /// object (`baseUrl`, `maxRetries`, `baseBackoffMs`).
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<ColorResolver, JsValue> {
        console_error_panic_hook::set_once();

        let config: LookupConfig = if config.is_undefined() || config.is_null() {
            LookupConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        // Surface a bad base URL now rather than on every lookup.
        config.names_url(crate::color::DEFAULT_LABEL)?;

        Ok(Self {
            session: Rc::new(ColorSession::with_config(
                FetchLookup,
                TimeoutSleep,
                config,
            )),
        })
    }

    /// Create a card binding and point it at `label` in one call.
    pub fn resolve(&self, label: Option<String>, callback: Function) -> CardColor {
        let card = self.bind(callback);
        card.set_label(label);
        card
    }

    /// Create an unbound card binding that reports changes to `callback`.
    pub fn bind(&self, callback: Function) -> CardColor {
        let binding =
            ColorBinding::with_observer(Rc::clone(&self.session), move |c: &ResolvedColor| {
                if let Err(e) = callback.call2(
                    &JsValue::NULL,
                    &JsValue::from_str(&c.color),
                    &JsValue::from_bool(c.is_dark),
                ) {
                    log::warn!("color callback threw: {e:?}");
                }
            });
        CardColor { binding }
    }

    /// Distinct labels resolved so far this session.
    #[wasm_bindgen(getter, js_name = cacheSize)]
    pub fn cache_size(&self) -> usize {
        self.session.cache_len()
    }
}

/// One card's background color.
#[wasm_bindgen]
pub struct CardColor {
    binding: ColorBinding<FetchLookup, TimeoutSleep>,
}

#[wasm_bindgen]
impl CardColor {
    /// Rebind to a new saved color; a pending lookup for the old one is dropped.
    #[wasm_bindgen(js_name = setLabel)]
    pub fn set_label(&self, label: Option<String>) {
        if let Some(pending) = self.binding.bind(label.as_deref()) {
            spawn_local(pending);
        }
    }

    #[wasm_bindgen(getter)]
    pub fn color(&self) -> String {
        self.binding.current().color
    }

    #[wasm_bindgen(getter, js_name = isDark)]
    pub fn is_dark(&self) -> bool {
        self.binding.current().is_dark
    }

    /// Teardown hook: discard any pending lookup.
    pub fn cancel(&self) {
        self.binding.teardown();
    }
}
