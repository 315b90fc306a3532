//! Inventory screen state: the yarn list, the add form and notifications.

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::Result;
use crate::store::YarnStore;
use crate::yarn::{Yarn, YarnDraft, YarnField};

pub const SAVED_MESSAGE: &str = "🧶 Saved the yarn successfully!";
pub const UPDATED_MESSAGE: &str = "🧶 updated the yarn successfully!";

/// A transient success notification for the UI to show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Toast {
    pub message: String,
}

impl Toast {
    fn success(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Yarns loaded from a store plus the add-yarn form.
pub struct Inventory<S> {
    store: S,
    yarns: Vec<Yarn>,
    form: YarnDraft,
    form_error: bool,
    toasts: VecDeque<Toast>,
}

impl<S: YarnStore> Inventory<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            yarns: Vec::new(),
            form: YarnDraft::blank(),
            form_error: false,
            toasts: VecDeque::new(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn yarns(&self) -> &[Yarn] {
        &self.yarns
    }

    pub fn get(&self, id: &str) -> Option<&Yarn> {
        self.yarns.iter().find(|yarn| yarn.id == id)
    }

    pub fn form(&self) -> &YarnDraft {
        &self.form
    }

    /// Whether the last submit failed.
    pub fn form_error(&self) -> bool {
        self.form_error
    }

    /// Replace the local list with the store's contents.
    ///
    /// # Errors
    /// Propagates store failures; the local list is left unchanged.
    pub async fn load(&mut self) -> Result<usize> {
        self.yarns = self.store.list().await?;
        log::debug!("loaded {} yarns", self.yarns.len());
        Ok(self.yarns.len())
    }

    pub fn set_input(&mut self, field: YarnField, value: impl Into<String>) {
        self.form.set(field, value);
    }

    /// Save the form as a new yarn.
    ///
    /// On success the yarn is appended locally, the form is cleared and a
    /// toast is queued. On failure `form_error` is raised and the form keeps
    /// what the user typed.
    ///
    /// # Errors
    /// Returns validation or store errors.
    pub async fn submit(&mut self) -> Result<String> {
        let added = match self.form.validate() {
            Ok(()) => self.store.add(&self.form).await,
            Err(e) => Err(e),
        };

        match added {
            Ok(id) => {
                self.yarns.push(Yarn::from_draft(id.as_str(), &self.form));
                self.form = YarnDraft::blank();
                self.form_error = false;
                self.toasts.push_back(Toast::success(SAVED_MESSAGE));
                Ok(id)
            }
            Err(e) => {
                log::warn!("saving yarn failed: {e}");
                self.form_error = true;
                Err(e)
            }
        }
    }

    /// Persist a card's edits and merge them into the local copy.
    ///
    /// Failures are logged and leave the local copy as it was. Returns
    /// whether the update was stored.
    pub async fn update_yarn(&mut self, id: &str, draft: &YarnDraft) -> bool {
        if let Err(e) = self.store.update(id, draft).await {
            log::error!("updating yarn {id:?} failed: {e}");
            return false;
        }
        if let Some(yarn) = self.yarns.iter_mut().find(|yarn| yarn.id == id) {
            yarn.apply(draft);
        }
        self.toasts.push_back(Toast::success(UPDATED_MESSAGE));
        true
    }

    /// Drain queued notifications, oldest first.
    pub fn take_toasts(&mut self) -> Vec<Toast> {
        self.toasts.drain(..).collect()
    }
}
