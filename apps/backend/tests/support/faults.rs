//! Fault- and race-injecting `GameDataStore` wrapper.

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use backend_test_support::unique_helpers::unique_subject;
use neutrino_backend::errors::{DomainError, InfraErrorKind, StoragePhase};
use neutrino_backend::{GameDataStore, GameId, GameRecord, PlayerId};

/// Delegates to `inner`, optionally losing races or failing on purpose.
pub struct FaultyStore {
    inner: Arc<dyn GameDataStore>,
    /// Joins and creates that a third party wins just before the caller.
    preemptions: AtomicU32,
    fail_reads: AtomicBool,
    /// Apply the save, then report a lost connection.
    fail_after_save: AtomicBool,
    join_calls: AtomicU32,
    create_calls: AtomicU32,
    save_calls: AtomicU32,
}

impl FaultyStore {
    pub fn new(inner: Arc<dyn GameDataStore>) -> Self {
        Self {
            inner,
            preemptions: AtomicU32::new(0),
            fail_reads: AtomicBool::new(false),
            fail_after_save: AtomicBool::new(false),
            join_calls: AtomicU32::new(0),
            create_calls: AtomicU32::new(0),
            save_calls: AtomicU32::new(0),
        }
    }

    pub fn preempt(&self, times: u32) -> &Self {
        self.preemptions.store(times, Ordering::SeqCst);
        self
    }

    pub fn fail_reads(&self, on: bool) -> &Self {
        self.fail_reads.store(on, Ordering::SeqCst);
        self
    }

    pub fn fail_after_save(&self, on: bool) -> &Self {
        self.fail_after_save.store(on, Ordering::SeqCst);
        self
    }

    pub fn join_calls(&self) -> u32 {
        self.join_calls.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> u32 {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn save_calls(&self) -> u32 {
        self.save_calls.load(Ordering::SeqCst)
    }

    fn take_preemption(&self) -> bool {
        self.preemptions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn read_guard(&self) -> Result<(), DomainError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::infra(
                InfraErrorKind::Unavailable,
                StoragePhase::Read,
                "injected read failure",
            ));
        }
        Ok(())
    }

    fn thief() -> PlayerId {
        PlayerId::new(unique_subject("thief")).expect("unique subject is never blank")
    }
}

#[async_trait]
impl GameDataStore for FaultyStore {
    async fn active_games_count(&self, player: &PlayerId) -> Result<usize, DomainError> {
        self.read_guard()?;
        self.inner.active_games_count(player).await
    }

    async fn find_open_session(&self) -> Result<Option<GameRecord>, DomainError> {
        self.read_guard()?;
        self.inner.find_open_session().await
    }

    async fn create_session(&self, player: &PlayerId) -> Result<GameId, DomainError> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);
        if self.take_preemption() {
            self.inner.create_session(&Self::thief()).await?;
        }
        self.inner.create_session(player).await
    }

    async fn join_session(
        &self,
        player: &PlayerId,
        game_id: &GameId,
    ) -> Result<GameRecord, DomainError> {
        self.join_calls.fetch_add(1, Ordering::SeqCst);
        if self.take_preemption() {
            self.inner.join_session(&Self::thief(), game_id).await?;
        }
        self.inner.join_session(player, game_id).await
    }

    async fn load_session(&self, game_id: &GameId) -> Result<Option<GameRecord>, DomainError> {
        self.read_guard()?;
        self.inner.load_session(game_id).await
    }

    async fn save_session(&self, record: &GameRecord) -> Result<GameRecord, DomainError> {
        self.save_calls.fetch_add(1, Ordering::SeqCst);
        let saved = self.inner.save_session(record).await?;
        if self.fail_after_save.load(Ordering::SeqCst) {
            return Err(DomainError::infra(
                InfraErrorKind::Unavailable,
                StoragePhase::Read,
                "connection dropped before the write was acknowledged",
            ));
        }
        Ok(saved)
    }

    async fn games_for_player(
        &self,
        player: &PlayerId,
        include_done: bool,
    ) -> Result<Vec<GameRecord>, DomainError> {
        self.read_guard()?;
        self.inner.games_for_player(player, include_done).await
    }
}
