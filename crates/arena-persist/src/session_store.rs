//! Debate session storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use arena_debate::{DebateAnalysis, DebateSession};

use crate::backend::{StorageBackend, StorageError, StorageExt};
use crate::file::{read_json, write_json};

/// A saved session plus an analysis snapshot taken at save time
///
/// The analysis is a convenience for readers of the JSON; it can always be
/// recomputed from the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub session: DebateSession,
    pub analysis: DebateAnalysis,
    pub saved_at: DateTime<Utc>,
}

impl SessionRecord {
    pub fn new(session: &DebateSession) -> Self {
        Self {
            session: session.clone(),
            analysis: session.analysis(),
            saved_at: Utc::now(),
        }
    }
}

/// Session store for persistence
#[derive(Debug)]
pub struct SessionStore<B: StorageBackend + ?Sized> {
    backend: Arc<B>,
    prefix: String,
}

impl<B: StorageBackend + ?Sized> SessionStore<B> {
    /// Create a new session store
    pub fn new(backend: Arc<B>) -> Self {
        Self {
            backend,
            prefix: "session-".to_string(),
        }
    }

    /// Create with custom prefix
    pub fn with_prefix(backend: Arc<B>, prefix: &str) -> Self {
        Self {
            backend,
            prefix: prefix.to_string(),
        }
    }

    /// Whether the backing storage can currently be used
    pub async fn is_healthy(&self) -> bool {
        self.backend.is_healthy().await
    }

    fn key(&self, id: Uuid) -> String {
        format!("{}{}", self.prefix, id)
    }

    /// Save a session, replacing any earlier save of the same id
    pub async fn save(&self, session: &DebateSession) -> Result<(), StorageError> {
        self.backend
            .set(&self.key(session.id), &SessionRecord::new(session))
            .await?;
        tracing::info!(
            session = %session.id,
            backend = self.backend.name(),
            turns = session.turn_count(),
            "Session saved"
        );
        Ok(())
    }

    /// Load a session by ID
    pub async fn load(&self, id: Uuid) -> Result<Option<DebateSession>, StorageError> {
        Ok(self.load_record(id).await?.map(|r| r.session))
    }

    /// Load a session with its saved analysis snapshot
    pub async fn load_record(&self, id: Uuid) -> Result<Option<SessionRecord>, StorageError> {
        self.backend.get(&self.key(id)).await
    }

    /// Delete a session
    pub async fn delete(&self, id: Uuid) -> Result<bool, StorageError> {
        self.backend.delete(&self.key(id)).await
    }

    /// Check if a session exists
    pub async fn exists(&self, id: Uuid) -> Result<bool, StorageError> {
        self.backend.exists(&self.key(id)).await
    }

    /// List all saved session IDs
    pub async fn list(&self) -> Result<Vec<Uuid>, StorageError> {
        let keys = self.backend.list_keys(&self.prefix).await?;
        Ok(keys
            .iter()
            .filter_map(|k| {
                k.strip_prefix(&self.prefix)
                    .and_then(|s| Uuid::parse_str(s).ok())
            })
            .collect())
    }

    /// Load all saved sessions, oldest first
    pub async fn load_all(&self) -> Result<Vec<DebateSession>, StorageError> {
        let mut sessions = Vec::new();
        for id in self.list().await? {
            if let Some(session) = self.load(id).await? {
                sessions.push(session);
            }
        }
        sessions.sort_by_key(|s| s.created_at);
        Ok(sessions)
    }
}

/// Write a single session record to an arbitrary JSON file
pub async fn export_session(path: &Path, session: &DebateSession) -> Result<(), StorageError> {
    write_json(path, &SessionRecord::new(session)).await?;
    tracing::info!(session = %session.id, path = %path.display(), "Session exported");
    Ok(())
}

/// Read a session record written by [`export_session`]
pub async fn import_session(path: &Path) -> Result<SessionRecord, StorageError> {
    read_json(path).await
}
