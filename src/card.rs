//! Editable yarn card.
//!
//! A card shows one saved yarn and can switch into edit mode, where input
//! goes to a draft until it is committed or discarded. The background color
//! follows the saved yarn, never the draft, so typing a color does not
//! trigger lookups on every keystroke.

use std::future::Future;

use crate::binding::ColorBinding;
use crate::color::normalize;
use crate::lookup::{ColorNameLookup, Sleep};
use crate::yarn::{Yarn, YarnDraft, YarnField};

#[derive(Debug, Clone)]
pub struct YarnCard {
    yarn: Yarn,
    is_edit: bool,
    draft: YarnDraft,
}

impl YarnCard {
    #[must_use]
    pub fn new(yarn: Yarn) -> Self {
        let draft = YarnDraft::from(&yarn);
        Self {
            yarn,
            is_edit: false,
            draft,
        }
    }

    #[must_use]
    pub fn yarn(&self) -> &Yarn {
        &self.yarn
    }

    #[must_use]
    pub fn is_edit(&self) -> bool {
        self.is_edit
    }

    #[must_use]
    pub fn draft(&self) -> &YarnDraft {
        &self.draft
    }

    /// Text shown in an input: the draft value, or empty.
    #[must_use]
    pub fn value(&self, field: YarnField) -> &str {
        self.draft.get(field).unwrap_or_default()
    }

    pub fn toggle_edit(&mut self) {
        self.is_edit = !self.is_edit;
    }

    /// Leave edit mode and throw away the draft.
    pub fn close(&mut self) {
        self.is_edit = false;
        self.draft = YarnDraft::from(&self.yarn);
    }

    pub fn set_input(&mut self, field: YarnField, value: impl Into<String>) {
        self.draft.set(field, value);
    }

    /// Leave edit mode and hand back `(id, draft)` for the store update.
    ///
    /// The draft is kept so the inputs keep showing the edited values.
    #[must_use]
    pub fn commit(&mut self) -> (String, YarnDraft) {
        self.is_edit = false;
        (self.yarn.id.clone(), self.draft.clone())
    }

    /// Replace the saved yarn after the store accepted an update.
    pub fn set_saved(&mut self, yarn: Yarn) {
        self.yarn = yarn;
        if !self.is_edit {
            self.draft = YarnDraft::from(&self.yarn);
        }
    }

    /// Normalized label of the saved color.
    #[must_use]
    pub fn saved_color_label(&self) -> String {
        normalize(Some(self.yarn.color.as_str()))
    }

    /// Point `binding` at the saved color; see [`ColorBinding::bind`].
    pub fn bind_color<L, S>(
        &self,
        binding: &ColorBinding<L, S>,
    ) -> Option<impl Future<Output = ()> + 'static>
    where
        L: ColorNameLookup + 'static,
        S: Sleep + 'static,
    {
        binding.bind(Some(self.yarn.color.as_str()))
    }
}
