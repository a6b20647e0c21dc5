use crate::storage::ConversationStore;
use std::cell::{Cell, RefCell};

/// Per-chat state: the backend conversation id and whether a query is in
/// flight. Lives on the UI thread only.
pub struct Session {
    store: Box<dyn ConversationStore>,
    key: String,
    conversation_id: RefCell<Option<String>>,
    loading: Cell<bool>,
}

impl Session {
    /// Build a session, picking up any conversation id left by a previous page load.
    pub fn restore(store: Box<dyn ConversationStore>, key: impl Into<String>) -> Self {
        let session = Self {
            store,
            key: key.into(),
            conversation_id: RefCell::new(None),
            loading: Cell::new(false),
        };
        let stored = session.stored_conversation_id();
        if let Some(id) = &stored {
            tracing::debug!(conversation_id = %id, "restored conversation");
        }
        session.conversation_id.replace(stored);
        session
    }

    /// Read the persisted id. Storage failures read as "no conversation".
    pub fn stored_conversation_id(&self) -> Option<String> {
        match self.store.load(&self.key) {
            Ok(value) => value.filter(|id| !id.is_empty()),
            Err(err) => {
                tracing::warn!("failed to read conversation id: {err}");
                None
            }
        }
    }

    pub fn conversation_id(&self) -> Option<String> {
        self.conversation_id.borrow().clone()
    }

    pub fn set_conversation_id(&self, id: &str) {
        self.conversation_id.replace(Some(id.to_string()));
        if let Err(err) = self.store.save(&self.key, id) {
            tracing::warn!("failed to persist conversation id: {err}");
        }
    }

    pub fn clear_conversation_id(&self) {
        self.conversation_id.replace(None);
        if let Err(err) = self.store.remove(&self.key) {
            tracing::warn!("failed to remove conversation id: {err}");
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.get()
    }

    /// Claim the in-flight slot. Returns false when a query is already running.
    pub fn try_begin_request(&self) -> bool {
        !self.loading.replace(true)
    }

    pub fn end_request(&self) {
        self.loading.set(false);
    }
}
