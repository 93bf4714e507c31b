//! Game session repository contract.

use async_trait::async_trait;

use crate::domain::{GameId, GameRecord, PlayerId};
use crate::errors::domain::DomainError;

/// Persistence operations the session services depend on.
///
/// Implementations own the two race guards: `join_session` is a
/// compare-and-set on the empty second seat, and `save_session` is an
/// optimistic write keyed on `GameRecord::lock_version`. At most one
/// session may be open (`INITIALIZING`) at any time.
#[async_trait]
pub trait GameDataStore: Send + Sync {
    /// Number of non-`DONE` sessions in which `player` holds either seat.
    async fn active_games_count(&self, player: &PlayerId) -> Result<usize, DomainError>;

    /// The open session, if any. Only ever returns `INITIALIZING` sessions.
    async fn find_open_session(&self) -> Result<Option<GameRecord>, DomainError>;

    /// Insert a new open session for `player`.
    ///
    /// Fails with `Conflict(OpenSlotExists)` when an open session already exists.
    async fn create_session(&self, player: &PlayerId) -> Result<GameId, DomainError>;

    /// Claim seat two of `game_id` for `player` and move the session to `PLAYING`.
    ///
    /// Fails with `NotFound` for unknown games and `Conflict(SlotTaken)` when the
    /// session is no longer open or `player` already holds seat one.
    async fn join_session(
        &self,
        player: &PlayerId,
        game_id: &GameId,
    ) -> Result<GameRecord, DomainError>;

    async fn load_session(&self, game_id: &GameId) -> Result<Option<GameRecord>, DomainError>;

    /// Replace the mutable game state as a whole.
    ///
    /// Succeeds only if the stored `lock_version` equals `record.lock_version`;
    /// returns the stored record with its bumped version.
    async fn save_session(&self, record: &GameRecord) -> Result<GameRecord, DomainError>;

    /// Sessions in which `player` holds a seat, newest first.
    async fn games_for_player(
        &self,
        player: &PlayerId,
        include_done: bool,
    ) -> Result<Vec<GameRecord>, DomainError>;
}
