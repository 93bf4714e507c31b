//! Session admission: quota check, then fill the open slot or open a new one.

use std::sync::Arc;

use tracing::{debug, info, instrument};

use crate::config::GameplayConfig;
use crate::domain::{GameId, PlayerId, PlayerSlot};
use crate::errors::domain::{ConflictKind, DomainError};
use crate::logging::events;
use crate::logging::pii::RedactedPlayer;
use crate::repos::games::GameDataStore;

/// How the player ended up in the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionOutcome {
    /// A new open session was created with the player in seat one.
    Created,
    /// The player claimed seat two of the open session; play has started.
    Joined,
    /// The open session already belongs to the player.
    AlreadyWaiting,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admission {
    pub game_id: GameId,
    pub seat: PlayerSlot,
    pub outcome: AdmissionOutcome,
}

impl Admission {
    fn new(game_id: GameId, seat: PlayerSlot, outcome: AdmissionOutcome) -> Self {
        Self {
            game_id,
            seat,
            outcome,
        }
    }
}

pub struct SessionMatchmaker {
    store: Arc<dyn GameDataStore>,
    config: GameplayConfig,
}

impl SessionMatchmaker {
    pub fn new(store: Arc<dyn GameDataStore>, config: GameplayConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &GameplayConfig {
        &self.config
    }

    /// Admit `player` into a session.
    ///
    /// Losing a join or create race re-routes the player through the open
    /// slot lookup again, at most `max_admit_attempts` times in total.
    #[instrument(skip(self, player), fields(player = %RedactedPlayer(player)))]
    pub async fn admit(&self, player: &PlayerId) -> Result<Admission, DomainError> {
        let active = self.store.active_games_count(player).await?;
        let limit = self.config.max_active_games;
        if active >= limit {
            events::quota_exceeded(player, active, limit);
            return Err(DomainError::quota_exceeded(active, limit));
        }

        for attempt in 1..=self.config.max_admit_attempts {
            match self.store.find_open_session().await? {
                Some(open) if open.player_one == *player => {
                    debug!(game_id = %open.id, "player already owns the open slot");
                    return Ok(Admission::new(
                        open.id,
                        PlayerSlot::One,
                        AdmissionOutcome::AlreadyWaiting,
                    ));
                }
                Some(open) => match self.store.join_session(player, &open.id).await {
                    Ok(joined) => {
                        info!(game_id = %joined.id, attempt, "player joined open session");
                        return Ok(Admission::new(
                            joined.id,
                            PlayerSlot::Two,
                            AdmissionOutcome::Joined,
                        ));
                    }
                    Err(DomainError::Conflict(ConflictKind::SlotTaken, _)) => {
                        debug!(game_id = %open.id, attempt, "open slot claimed by another player");
                    }
                    Err(e) => return Err(self.write_failed(e, Some(&open.id), "join_session")),
                },
                None => match self.store.create_session(player).await {
                    Ok(game_id) => {
                        info!(game_id = %game_id, attempt, "opened new session");
                        return Ok(Admission::new(
                            game_id,
                            PlayerSlot::One,
                            AdmissionOutcome::Created,
                        ));
                    }
                    Err(DomainError::Conflict(ConflictKind::OpenSlotExists, _)) => {
                        debug!(attempt, "another session was opened concurrently");
                    }
                    Err(e) => return Err(self.write_failed(e, None, "create_session")),
                },
            }
        }

        let attempts = self.config.max_admit_attempts;
        events::matchmaking_contention(player, attempts);
        Err(DomainError::conflict(
            ConflictKind::MatchmakingContention,
            format!("no session could be claimed after {attempts} attempts"),
        ))
    }

    fn write_failed(
        &self,
        e: DomainError,
        game_id: Option<&GameId>,
        operation: &'static str,
    ) -> DomainError {
        let e = e.during_write();
        if e.requires_reconciliation() {
            events::write_outcome_unknown(game_id, operation);
        }
        e
    }
}
