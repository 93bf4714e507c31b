//! Read-side queries over a player's sessions.

use std::sync::Arc;

use tracing::instrument;

use crate::domain::{GameId, GameRecord, PlayerId};
use crate::errors::domain::{DomainError, ForbiddenKind, NotFoundKind};
use crate::logging::pii::RedactedPlayer;
use crate::repos::games::GameDataStore;

pub struct GameQueryService {
    store: Arc<dyn GameDataStore>,
}

impl GameQueryService {
    pub fn new(store: Arc<dyn GameDataStore>) -> Self {
        Self { store }
    }

    /// A single session, visible only to its participants.
    #[instrument(skip(self, player), fields(player = %RedactedPlayer(player), game_id = %game_id))]
    pub async fn game_for_player(
        &self,
        player: &PlayerId,
        game_id: &GameId,
    ) -> Result<GameRecord, DomainError> {
        let record = self.store.load_session(game_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
        })?;
        if !record.is_participant(player) {
            return Err(DomainError::forbidden(
                ForbiddenKind::NotAParticipant,
                format!("player is not seated in game {game_id}"),
            ));
        }
        Ok(record)
    }

    /// The player's sessions, newest first. Finished games only with `include_inactive`.
    pub async fn games_for_player(
        &self,
        player: &PlayerId,
        include_inactive: bool,
    ) -> Result<Vec<GameRecord>, DomainError> {
        self.store.games_for_player(player, include_inactive).await
    }
}
