//! Persisted application state.
//!
//! The whole [`AppState`] is stored as one JSON blob under a single key of a
//! [`KeyValueStorage`]. Every mutation on [`AppStore`] persists the full state
//! afterwards.
//!
//! # Architecture
//!
//! ```text
//! AppStore (mutations + audit trail)
//!     └── KeyValueStorage
//!           ├── SqliteStorage (kv_store table)
//!           └── MemoryStorage (tests, previews)
//! ```

mod error;
mod manager;
mod state;
mod storage;

pub use error::{Result, StoreError};
pub use manager::AppStore;
pub use state::AppState;
pub use storage::{KeyValueStorage, MemoryStorage, SqliteStorage};
