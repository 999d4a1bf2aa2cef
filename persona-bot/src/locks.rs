//! Per-chat mutual exclusion so turns of one chat run one at a time.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

type LockMap = DashMap<i64, Arc<Mutex<()>>>;

/// One async mutex per chat id. Different chats never wait on each other.
/// An entry lives only while a turn of that chat runs or waits.
#[derive(Clone, Default)]
pub struct ChatLocks {
    locks: Arc<LockMap>,
}

/// Held for the duration of one turn. Dropping it releases the chat.
pub struct ChatTurnGuard {
    guard: Option<OwnedMutexGuard<()>>,
    chat_id: i64,
    locks: Arc<LockMap>,
}

impl Drop for ChatTurnGuard {
    fn drop(&mut self) {
        self.guard.take();
        // Only the map's own reference left: nobody holds or waits for this chat.
        self.locks
            .remove_if(&self.chat_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl ChatLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until no other turn of `chat_id` is running. The turn ends when the guard drops.
    pub async fn acquire(&self, chat_id: i64) -> ChatTurnGuard {
        let lock = self
            .locks
            .entry(chat_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock.lock_owned().await;
        ChatTurnGuard {
            guard: Some(guard),
            chat_id,
            locks: self.locks.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
