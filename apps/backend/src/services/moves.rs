//! Turn-gated move application.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::domain::{
    GameId, GameRecord, LifecyclePhase, MakeMoveRequest, PlayerId, PlayerSlot, TurnMove,
    TurnPhase,
};
use crate::engine::{GameEngine, IllegalMove, NeutrinoEngine};
use crate::errors::domain::{DomainError, ForbiddenKind, MoveStep, NotFoundKind};
use crate::logging::events;
use crate::logging::pii::RedactedPlayer;
use crate::repos::games::GameDataStore;

/// Validates turn ownership and applies the neutrino + piece relocation pair
/// as one all-or-nothing update of the session's packed state.
pub struct MoveOrchestrator<E: GameEngine = NeutrinoEngine> {
    store: Arc<dyn GameDataStore>,
    engine: E,
}

impl MoveOrchestrator<NeutrinoEngine> {
    pub fn neutrino(store: Arc<dyn GameDataStore>) -> Self {
        Self::new(store, NeutrinoEngine::new())
    }
}

impl<E: GameEngine> MoveOrchestrator<E> {
    pub fn new(store: Arc<dyn GameDataStore>, engine: E) -> Self {
        Self { store, engine }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Engine view of a stored session.
    pub fn turn_phase(&self, record: &GameRecord) -> TurnPhase {
        self.engine
            .current_turn_phase(&self.engine.decode(record.packed_state))
    }

    /// Convenience entry point for the flat request shape.
    pub async fn apply_request(
        &self,
        player: &PlayerId,
        request: MakeMoveRequest,
    ) -> Result<GameRecord, DomainError> {
        let (game_id, turn) = request.into_parts()?;
        self.apply(player, &game_id, turn).await
    }

    /// Apply one full turn for `player`.
    ///
    /// Returns the persisted record. Nothing is written unless both
    /// relocations are legal; a stale read is rejected by the store with
    /// `Conflict(OptimisticLock)` and is not retried here.
    #[instrument(skip(self, player, turn), fields(player = %RedactedPlayer(player), game_id = %game_id))]
    pub async fn apply(
        &self,
        player: &PlayerId,
        game_id: &GameId,
        turn: TurnMove,
    ) -> Result<GameRecord, DomainError> {
        let mut record = self.store.load_session(game_id).await?.ok_or_else(|| {
            DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"))
        })?;

        let seat = record.slot_of(player).ok_or_else(|| {
            DomainError::forbidden(
                ForbiddenKind::NotAParticipant,
                format!("player is not seated in game {game_id}"),
            )
        })?;
        ensure_in_play(&record)?;

        let session = self.engine.decode(record.packed_state);
        match self.engine.current_turn_phase(&session) {
            TurnPhase::Turn(current) if current.owner == seat => {}
            TurnPhase::Turn(current) => {
                debug!(?seat, owner = ?current.owner, "move submitted out of turn");
                return Err(DomainError::forbidden(
                    ForbiddenKind::NotYourTurn,
                    format!("it is {} to move", seat_name(current.owner)),
                ));
            }
            TurnPhase::Finished(_) => {
                return Err(DomainError::forbidden(
                    ForbiddenKind::GameFinished,
                    format!("game {game_id} is already decided"),
                ));
            }
        }

        let session = self
            .engine
            .apply_move(session, turn.neutrino)
            .map_err(|e| illegal(MoveStep::Neutrino, e))?;
        let session = match self.engine.current_turn_phase(&session) {
            TurnPhase::Finished(_) => {
                debug!("neutrino relocation decided the game; piece relocation skipped");
                session
            }
            TurnPhase::Turn(_) => self
                .engine
                .apply_move(session, turn.piece)
                .map_err(|e| illegal(MoveStep::Piece, e))?,
        };

        record.packed_state = self.engine.encode(&session);
        let outcome = self.engine.current_turn_phase(&session).outcome();
        if let Some(outcome) = outcome {
            record.finish(outcome.condition)?;
        }

        let saved = match self.store.save_session(&record).await {
            Ok(saved) => saved,
            Err(e) => {
                let e = e.during_write();
                if e.requires_reconciliation() {
                    events::write_outcome_unknown(Some(game_id), "save_session");
                } else {
                    warn!(error = %e, "move rejected at save");
                }
                return Err(e);
            }
        };

        match outcome {
            Some(outcome) => info!(
                winner = ?outcome.winner,
                condition = ?outcome.condition,
                lock_version = saved.lock_version,
                "game finished"
            ),
            None => info!(lock_version = saved.lock_version, "move committed"),
        }
        Ok(saved)
    }
}

fn ensure_in_play(record: &GameRecord) -> Result<(), DomainError> {
    match record.lifecycle_phase {
        LifecyclePhase::Playing => Ok(()),
        LifecyclePhase::Initializing => Err(DomainError::forbidden(
            ForbiddenKind::NotInPlay,
            format!("game {} is still waiting for a second player", record.id),
        )),
        LifecyclePhase::Done => Err(DomainError::forbidden(
            ForbiddenKind::GameFinished,
            format!("game {} is finished", record.id),
        )),
    }
}

fn illegal(step: MoveStep, e: IllegalMove) -> DomainError {
    let label = match step {
        MoveStep::Neutrino => "neutrino",
        MoveStep::Piece => "piece",
        MoveStep::Request => "request",
    };
    DomainError::invalid_move(step, format!("illegal {label} relocation: {e}"))
}

fn seat_name(seat: PlayerSlot) -> &'static str {
    match seat {
        PlayerSlot::One => "player one",
        PlayerSlot::Two => "player two",
    }
}
