//! Sessions saved to disk mid-debate resume exactly where they stopped

use std::sync::Arc;

use arena_core::{DebatePhase, PersonaRegistry};
use arena_debate::{DebateEngine, DebateSession};
use arena_llm::MockProvider;
use arena_persist::{
    export_session, import_session, FileBackend, SessionStore, StorageBackend, StorageError,
};

async fn debated_session(turns: usize) -> DebateSession {
    let engine = DebateEngine::with_defaults(Arc::new(MockProvider::debate()));
    let mut session = DebateSession::with_seed(PersonaRegistry::builtin(), 21);
    session.add_user_message("Should public transit be free?").unwrap();
    let outcome = engine.run(&mut session, turns).await;
    assert!(outcome.is_complete());
    session
}

#[tokio::test]
async fn test_file_store_roundtrip_and_resume() {
    let dir = tempfile::tempdir().unwrap();
    let backend = Arc::new(FileBackend::new(dir.path()));
    let store = SessionStore::new(backend.clone());

    let session = debated_session(5).await;
    store.save(&session).await.unwrap();

    let keys = backend.list_keys("session-").await.unwrap();
    assert_eq!(keys, vec![format!("session-{}", session.id)]);

    let record = store.load_record(session.id).await.unwrap().unwrap();
    assert_eq!(record.analysis.turn_count, 5);
    assert_eq!(record.analysis.phase, DebatePhase::Confrontation);

    let mut restored = record.session;
    assert_eq!(restored.transcript(), session.transcript());
    assert_eq!(restored.next_speaker().id, "conservative");
    assert_eq!(restored.consecutive_errors(), 0);

    let engine = DebateEngine::with_defaults(Arc::new(MockProvider::constant("Next point.")));
    let message = engine.generate_turn(&mut restored).await.unwrap();
    assert_eq!(message.meta("persona_id"), Some("conservative"));
    assert_eq!(restored.transcript().len(), session.transcript().len() + 1);
}

#[tokio::test]
async fn test_load_all_orders_by_creation() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(Arc::new(FileBackend::new(dir.path())));

    let older = debated_session(1).await;
    let newer = debated_session(2).await;
    store.save(&newer).await.unwrap();
    store.save(&older).await.unwrap();

    let all = store.load_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, older.id);
    assert_eq!(all[1].id, newer.id);
}

#[tokio::test]
async fn test_export_import_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("debates").join("transit.json");

    let session = debated_session(3).await;
    export_session(&path, &session).await.unwrap();

    let record = import_session(&path).await.unwrap();
    assert_eq!(record.session.id, session.id);
    assert_eq!(record.session.transcript(), session.transcript());
    assert_eq!(record.analysis, session.analysis());
}

#[tokio::test]
async fn test_store_health_follows_directory() {
    let dir = tempfile::tempdir().unwrap();
    let store = SessionStore::new(Arc::new(FileBackend::new(dir.path().join("not-yet"))));
    assert!(store.is_healthy().await);

    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, b"not a directory").unwrap();
    let store = SessionStore::new(Arc::new(FileBackend::new(&blocker)));
    assert!(!store.is_healthy().await);
}

#[tokio::test]
async fn test_import_rejects_tampered_session() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tampered.json");

    let session = debated_session(2).await;
    export_session(&path, &session).await.unwrap();

    let mut value: serde_json::Value = serde_json::from_slice(&std::fs::read(&path).unwrap()).unwrap();
    value["session"]["registry"] = serde_json::json!([]);
    std::fs::write(&path, serde_json::to_vec(&value).unwrap()).unwrap();

    let err = import_session(&path).await.unwrap_err();
    assert!(matches!(err, StorageError::Serialization(ref msg) if msg.contains("at least one persona")));
}
