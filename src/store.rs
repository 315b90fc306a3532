//! Document store interface for yarn records.
//!
//! The app keeps yarns in a cloud document collection. Only the three calls
//! the inventory needs are modelled; [`MemoryStore`] backs tests and offline use.

use std::cell::{Cell, RefCell};

use crate::error::{Result, YarnviewError};
use crate::yarn::{Yarn, YarnDraft};

/// A collection of yarn documents.
#[allow(async_fn_in_trait)]
pub trait YarnStore {
    /// Every yarn in the collection.
    async fn list(&self) -> Result<Vec<Yarn>>;

    /// Insert a new document and return its id.
    async fn add(&self, draft: &YarnDraft) -> Result<String>;

    /// Merge `draft` into an existing document.
    async fn update(&self, id: &str, draft: &YarnDraft) -> Result<()>;
}

/// In-process store with sequential ids (`yarn-1`, `yarn-2`, ...).
#[derive(Debug, Default)]
pub struct MemoryStore {
    docs: RefCell<Vec<Yarn>>,
    next_id: Cell<u64>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing records.
    #[must_use]
    pub fn with_yarns(yarns: Vec<Yarn>) -> Self {
        let next_id = u64::try_from(yarns.len()).unwrap_or(u64::MAX);
        Self {
            docs: RefCell::new(yarns),
            next_id: Cell::new(next_id),
        }
    }

    pub fn len(&self) -> usize {
        self.docs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.borrow().is_empty()
    }

    pub fn get(&self, id: &str) -> Option<Yarn> {
        self.docs.borrow().iter().find(|yarn| yarn.id == id).cloned()
    }
}

impl YarnStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Yarn>> {
        Ok(self.docs.borrow().clone())
    }

    async fn add(&self, draft: &YarnDraft) -> Result<String> {
        let n = self.next_id.get().saturating_add(1);
        self.next_id.set(n);
        let id = format!("yarn-{n}");
        self.docs.borrow_mut().push(Yarn::from_draft(id.as_str(), draft));
        Ok(id)
    }

    async fn update(&self, id: &str, draft: &YarnDraft) -> Result<()> {
        let mut docs = self.docs.borrow_mut();
        let yarn = docs
            .iter_mut()
            .find(|yarn| yarn.id == id)
            .ok_or_else(|| YarnviewError::Store(format!("no yarn with id {id:?}")))?;
        yarn.apply(draft);
        Ok(())
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
    use crate::yarn::YarnField;
    use futures::executor::block_on;

    #[test]
    fn test_add_then_list() {
        let store = MemoryStore::new();
        let mut draft = YarnDraft::blank();
        draft.set(YarnField::Color, "teal");
        let first = block_on(store.add(&draft)).unwrap();
        let second = block_on(store.add(&draft)).unwrap();
        assert_eq!(first, "yarn-1");
        assert_eq!(second, "yarn-2");

        let yarns = block_on(store.list()).unwrap();
        assert_eq!(yarns.len(), 2);
        assert_eq!(yarns[0].color, "teal");
    }

    #[test]
    fn test_update_merges() {
        let store = MemoryStore::new();
        let id = block_on(store.add(&YarnDraft::blank())).unwrap();
        let mut draft = YarnDraft::default();
        draft.set(YarnField::Weight, "dk");
        block_on(store.update(&id, &draft)).unwrap();
        assert_eq!(store.get(&id).unwrap().weight, "dk");
    }

    #[test]
    fn test_update_unknown_id() {
        let store = MemoryStore::new();
        let err = block_on(store.update("missing", &YarnDraft::default())).unwrap_err();
        assert!(matches!(err, YarnviewError::Store(_)));
    }

    #[test]
    fn test_seeded_ids_continue() {
        let store = MemoryStore::with_yarns(vec![Yarn {
            id: "yarn-1".into(),
            ..Yarn::default()
        }]);
        assert_eq!(block_on(store.add(&YarnDraft::blank())).unwrap(), "yarn-2");
    }
}
