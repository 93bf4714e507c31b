#![allow(dead_code)]

pub mod faults;

use std::sync::Arc;

use backend_test_support::unique_helpers::unique_subject;
use neutrino_backend::{connect_db, DbKind, InMemoryGameStore, PlayerId, SeaGameStore};

pub use faults::FaultyStore;

/// Fresh, collision-free player identity.
pub fn player(prefix: &str) -> PlayerId {
    backend_test_support::test_logging::init();
    PlayerId::new(unique_subject(prefix)).expect("unique subject is never blank")
}

pub fn memory_store() -> Arc<InMemoryGameStore> {
    backend_test_support::test_logging::init();
    Arc::new(InMemoryGameStore::new())
}

/// Store over a private, migrated in-memory SQLite database.
pub async fn sqlite_store() -> Arc<SeaGameStore> {
    backend_test_support::test_logging::init();
    let conn = connect_db(DbKind::SqliteMemory)
        .await
        .expect("in-memory sqlite connects and migrates");
    Arc::new(SeaGameStore::new(conn))
}
