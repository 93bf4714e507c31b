use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use tracing::{debug, instrument};

use super::dto::{GameCreate, GameSeat, GameUpdateState};
use crate::domain::{GameId, GameRecord, PackedState, PlayerId};
use crate::entities::games;
use crate::errors::domain::{DomainError, InfraErrorKind, StoragePhase};
use crate::infra::db_errors::map_db_err;
use crate::logging::pii::RedactedPlayer;
use crate::repos::games::GameDataStore;

/// `GameDataStore` backed by a SeaORM connection (Postgres or SQLite).
#[derive(Debug, Clone)]
pub struct SeaGameStore {
    conn: DatabaseConnection,
}

impl SeaGameStore {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }
}

fn read_err(e: sea_orm::DbErr) -> DomainError {
    map_db_err(e, StoragePhase::Read)
}

fn write_err(e: sea_orm::DbErr) -> DomainError {
    map_db_err(e, StoragePhase::Write)
}

impl TryFrom<games::Model> for GameRecord {
    type Error = DomainError;

    fn try_from(model: games::Model) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| {
            DomainError::infra(
                InfraErrorKind::DataCorruption,
                StoragePhase::Read,
                format!("game {} has a blank {what}", model.id),
            )
        };
        let player_one = PlayerId::new(model.player_one_id.clone()).map_err(|_| corrupt("player one"))?;
        let player_two = match model.player_two_id.clone() {
            Some(raw) => Some(PlayerId::new(raw).map_err(|_| corrupt("player two"))?),
            None => None,
        };

        Ok(GameRecord {
            id: GameId::from(model.id),
            player_one,
            player_two,
            lifecycle_phase: model.lifecycle_phase.into(),
            winning_condition: model.winning_condition.into(),
            packed_state: PackedState::from_storage(model.packed_state),
            lock_version: model.lock_version,
            created_at: model.created_at,
            updated_at: model.updated_at,
        })
    }
}

#[async_trait]
impl GameDataStore for SeaGameStore {
    #[instrument(skip_all, fields(player = %RedactedPlayer(player)))]
    async fn active_games_count(&self, player: &PlayerId) -> Result<usize, DomainError> {
        let count = super::count_active_for_player(&self.conn, player.as_str())
            .await
            .map_err(read_err)?;
        Ok(usize::try_from(count).unwrap_or(usize::MAX))
    }

    async fn find_open_session(&self) -> Result<Option<GameRecord>, DomainError> {
        super::find_open(&self.conn)
            .await
            .map_err(read_err)?
            .map(GameRecord::try_from)
            .transpose()
    }

    #[instrument(skip_all, fields(player = %RedactedPlayer(player)))]
    async fn create_session(&self, player: &PlayerId) -> Result<GameId, DomainError> {
        let id = GameId::generate();
        let model = super::create_game(&self.conn, GameCreate::new(id.as_str(), player.as_str()))
            .await
            .map_err(write_err)?;
        debug!(game_id = %model.id, "open session inserted");
        Ok(GameId::from(model.id))
    }

    #[instrument(skip_all, fields(player = %RedactedPlayer(player), game_id = %game_id))]
    async fn join_session(
        &self,
        player: &PlayerId,
        game_id: &GameId,
    ) -> Result<GameRecord, DomainError> {
        let seat = GameSeat {
            id: game_id.as_str().to_owned(),
            player_two_id: player.as_str().to_owned(),
        };
        let model = super::claim_second_seat(&self.conn, seat)
            .await
            .map_err(write_err)?;
        GameRecord::try_from(model)
    }

    async fn load_session(&self, game_id: &GameId) -> Result<Option<GameRecord>, DomainError> {
        super::find_by_id(&self.conn, game_id.as_str())
            .await
            .map_err(read_err)?
            .map(GameRecord::try_from)
            .transpose()
    }

    #[instrument(skip_all, fields(game_id = %record.id, lock_version = record.lock_version))]
    async fn save_session(&self, record: &GameRecord) -> Result<GameRecord, DomainError> {
        let update = GameUpdateState {
            id: record.id.as_str().to_owned(),
            lifecycle_phase: record.lifecycle_phase.into(),
            winning_condition: record.winning_condition.into(),
            packed_state: record.packed_state.to_storage(),
            current_lock_version: record.lock_version,
        };
        let model = super::update_state(&self.conn, update)
            .await
            .map_err(write_err)?;
        GameRecord::try_from(model)
    }

    async fn games_for_player(
        &self,
        player: &PlayerId,
        include_done: bool,
    ) -> Result<Vec<GameRecord>, DomainError> {
        super::list_for_player(&self.conn, player.as_str(), include_done)
            .await
            .map_err(read_err)?
            .into_iter()
            .map(GameRecord::try_from)
            .collect()
    }
}
