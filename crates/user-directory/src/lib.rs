//! Local identity directory and session store.
//!
//! Users are re-identified across sessions by natural keys (email, phone)
//! kept as secondary indices next to a primary table keyed by user id. The
//! backing store is a plain key-value space behind the [`KeyValue`] seam:
//! Redis in deployment, an in-memory map in tests and mock mode.

pub mod directory;
pub mod kv;
pub mod session;

pub use directory::Directory;
pub use kv::{KeyValue, MemoryKv, RedisKv};
pub use session::SessionStore;
