//! Process-local `GameDataStore`.
//!
//! One mutex guards the whole table, so every trait call is linearizable and
//! the open-slot, join and optimistic-save guards hold without further care.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use time::OffsetDateTime;

use crate::domain::{GameId, GameRecord, PlayerId};
use crate::errors::domain::{ConflictKind, DomainError, NotFoundKind};
use crate::repos::games::GameDataStore;

#[derive(Debug, Default)]
pub struct InMemoryGameStore {
    games: Mutex<HashMap<GameId, GameRecord>>,
}

impl InMemoryGameStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a record verbatim, replacing any game with the same id.
    pub fn insert_record(&self, record: GameRecord) {
        self.games.lock().insert(record.id.clone(), record);
    }

    pub fn len(&self) -> usize {
        self.games.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.lock().is_empty()
    }
}

fn game_not_found(game_id: &GameId) -> DomainError {
    DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
}

#[async_trait]
impl GameDataStore for InMemoryGameStore {
    async fn active_games_count(&self, player: &PlayerId) -> Result<usize, DomainError> {
        let games = self.games.lock();
        Ok(games
            .values()
            .filter(|g| g.lifecycle_phase.is_active() && g.is_participant(player))
            .count())
    }

    async fn find_open_session(&self) -> Result<Option<GameRecord>, DomainError> {
        let games = self.games.lock();
        Ok(games.values().find(|g| g.is_open()).cloned())
    }

    async fn create_session(&self, player: &PlayerId) -> Result<GameId, DomainError> {
        let mut games = self.games.lock();
        if let Some(open) = games.values().find(|g| g.is_open()) {
            return Err(DomainError::conflict(
                ConflictKind::OpenSlotExists,
                format!("Game {} is already waiting for a second player", open.id),
            ));
        }
        let id = GameId::generate();
        let record = GameRecord::open(id.clone(), player.clone(), OffsetDateTime::now_utc());
        games.insert(id.clone(), record);
        Ok(id)
    }

    async fn join_session(
        &self,
        player: &PlayerId,
        game_id: &GameId,
    ) -> Result<GameRecord, DomainError> {
        let mut games = self.games.lock();
        let game = games
            .get_mut(game_id)
            .ok_or_else(|| game_not_found(game_id))?;
        let mut joined = game.clone();
        joined.seat_second_player(player.clone())?;
        joined.lock_version += 1;
        joined.updated_at = OffsetDateTime::now_utc();
        *game = joined.clone();
        Ok(joined)
    }

    async fn load_session(&self, game_id: &GameId) -> Result<Option<GameRecord>, DomainError> {
        Ok(self.games.lock().get(game_id).cloned())
    }

    async fn save_session(&self, record: &GameRecord) -> Result<GameRecord, DomainError> {
        let mut games = self.games.lock();
        let stored = games
            .get_mut(&record.id)
            .ok_or_else(|| game_not_found(&record.id))?;
        if stored.lock_version != record.lock_version {
            return Err(DomainError::conflict(
                ConflictKind::OptimisticLock,
                format!(
                    "Game was modified concurrently (expected version {}, actual version {}). Reload and retry.",
                    record.lock_version, stored.lock_version
                ),
            ));
        }
        stored.lifecycle_phase = record.lifecycle_phase;
        stored.winning_condition = record.winning_condition;
        stored.packed_state = record.packed_state;
        stored.lock_version += 1;
        stored.updated_at = OffsetDateTime::now_utc();
        Ok(stored.clone())
    }

    async fn games_for_player(
        &self,
        player: &PlayerId,
        include_done: bool,
    ) -> Result<Vec<GameRecord>, DomainError> {
        let games = self.games.lock();
        let mut mine: Vec<GameRecord> = games
            .values()
            .filter(|g| g.is_participant(player))
            .filter(|g| include_done || g.lifecycle_phase.is_active())
            .cloned()
            .collect();
        mine.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(mine)
    }
}
