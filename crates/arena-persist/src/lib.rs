//! # Arena Persistence
//!
//! Storage backends for debate sessions.
//!
//! Supports:
//! - In-memory (for testing)
//! - A directory of JSON files (one per session)
//! - Single-file export/import for sharing one debate

pub mod backend;
pub mod file;
pub mod session_store;

pub use backend::{MemoryBackend, StorageBackend, StorageError, StorageExt};
pub use file::FileBackend;
pub use session_store::{export_session, import_session, SessionRecord, SessionStore};
