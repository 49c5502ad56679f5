//! Dismissible user-facing failure notices.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;

/// One failure message awaiting dismissal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, derive_getters::Getters)]
pub struct Notice {
    /// Monotonic identifier
    id: u64,
    /// Human-readable message
    message: String,
}

#[derive(Debug, Default)]
struct NoticeState {
    items: Vec<Notice>,
    next_id: u64,
}

/// Ordered list of pending notices, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    state: Arc<Mutex<NoticeState>>,
}

impl Notices {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a notice and return its id.
    pub fn push(&self, message: impl Into<String>) -> u64 {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = state.next_id;
        state.items.push(Notice {
            id,
            message: message.into(),
        });
        id
    }

    /// Remove a notice. Unknown ids are ignored.
    pub fn dismiss(&self, id: u64) {
        self.state.lock().items.retain(|n| n.id != id);
    }

    /// Pending notices, oldest first.
    pub fn list(&self) -> Vec<Notice> {
        self.state.lock().items.clone()
    }
}
