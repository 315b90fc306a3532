//! Per-card color binding.
//!
//! A binding tracks the label a card currently shows and the color it
//! resolved to. Re-binding to a new label cancels the previous pending
//! resolution, so a late answer for an old label can never overwrite the
//! color of the current one. Dropping the binding cancels too.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use crate::cancel::CancellationToken;
use crate::color::{normalize, ResolvedColor};
use crate::lookup::{ColorNameLookup, Sleep};
use crate::session::ColorSession;

type Observer = Rc<dyn Fn(&ResolvedColor)>;

struct BindingState {
    label: Option<String>,
    color: ResolvedColor,
    token: Option<CancellationToken>,
}

/// The resolved background of one card, updated as lookups land.
pub struct ColorBinding<L, S> {
    session: Rc<ColorSession<L, S>>,
    state: Rc<RefCell<BindingState>>,
    observer: Option<Observer>,
}

impl<L, S> ColorBinding<L, S>
where
    L: ColorNameLookup + 'static,
    S: Sleep + 'static,
{
    pub fn new(session: Rc<ColorSession<L, S>>) -> Self {
        Self {
            session,
            state: Rc::new(RefCell::new(BindingState {
                label: None,
                color: ResolvedColor::new(normalize(None)),
                token: None,
            })),
            observer: None,
        }
    }

    /// Like [`ColorBinding::new`], calling `observer` every time the color changes.
    pub fn with_observer(
        session: Rc<ColorSession<L, S>>,
        observer: impl Fn(&ResolvedColor) + 'static,
    ) -> Self {
        let mut binding = Self::new(session);
        binding.observer = Some(Rc::new(observer));
        binding
    }

    /// Color to render right now.
    pub fn current(&self) -> ResolvedColor {
        self.state.borrow().color.clone()
    }

    /// Normalized label currently bound, if any.
    pub fn label(&self) -> Option<String> {
        self.state.borrow().label.clone()
    }

    /// Whether a remote lookup for the bound label is still outstanding.
    pub fn is_pending(&self) -> bool {
        self.state.borrow().token.is_some()
    }

    /// Point the binding at a new label.
    ///
    /// The optimistic (or cached) color is applied before this returns.
    /// When a remote lookup is needed, the returned future performs it and
    /// applies the result; the caller drives it (e.g. `spawn_local`).
    /// Binding the label already shown is a no-op and returns `None`.
    pub fn bind(&self, raw: Option<&str>) -> Option<impl Future<Output = ()> + 'static> {
        let label = normalize(raw);
        if self.state.borrow().label.as_deref() == Some(label.as_str()) {
            return None;
        }

        let resolution = self.session.begin(Some(label.as_str()));
        let token = resolution.is_pending().then(CancellationToken::new);
        {
            let mut state = self.state.borrow_mut();
            if let Some(previous) = state.token.take() {
                previous.cancel();
            }
            state.label = Some(label.clone());
            state.color = resolution.color().clone();
            state.token = token.clone();
        }
        self.notify(resolution.color());

        let token = token?;
        let session = Rc::clone(&self.session);
        let state = Rc::clone(&self.state);
        let observer = self.observer.clone();
        Some(async move {
            let Some(resolved) = session.complete(&label, &token).await else {
                return;
            };
            {
                let mut state = state.borrow_mut();
                state.color = resolved.clone();
                state.token = None;
            }
            if let Some(observer) = observer {
                observer(&resolved);
            }
        })
    }

    /// Cancel any pending lookup and forget the bound label.
    ///
    /// The last color stays visible; a later `bind` to the same label
    /// resolves again (from cache if the session already knows it).
    pub fn teardown(&self) {
        let mut state = self.state.borrow_mut();
        if let Some(token) = state.token.take() {
            token.cancel();
        }
        state.label = None;
    }

    fn notify(&self, color: &ResolvedColor) {
        if let Some(observer) = &self.observer {
            observer(color);
        }
    }
}

impl<L, S> Drop for ColorBinding<L, S> {
    fn drop(&mut self) {
        if let Some(token) = self.state.borrow_mut().token.take() {
            token.cancel();
        }
    }
}
