//! Chat history stores: ordered per-key message logs backing the conversation memory window.
//!
//! Keys are opaque strings chosen by the caller (one key per chat session). Messages come
//! back oldest first.

mod inmemory;
mod sqlite;
mod store;

pub use inmemory::InMemoryHistoryStore;
pub use sqlite::SqliteHistoryStore;
pub use store::ChatHistoryStore;
