//! SeaORM adapter for the games table - generic over ConnectionTrait.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::entities::games::{self, LifecyclePhase};

pub mod dto;
mod store;

pub use dto::{GameCreate, GameSeat, GameUpdateState};
pub use store::SeaGameStore;

// Adapter functions return DbErr; the store maps to DomainError via map_db_err.

fn game_not_found(id: &str) -> sea_orm::DbErr {
    sea_orm::DbErr::Custom(format!("GAME_NOT_FOUND:{id}"))
}

/// Helper: apply an optimistic update with lock version check, then refetch.
///
/// - Adds lock_version increment and updated_at to the update
/// - Filters by id and current_lock_version
/// - Checks rows_affected to distinguish NotFound vs OptimisticLock
async fn optimistic_update_then_fetch<C, F>(
    conn: &C,
    id: &str,
    current_lock_version: i32,
    configure_update: F,
) -> Result<games::Model, sea_orm::DbErr>
where
    C: ConnectionTrait + Send + Sync,
    F: FnOnce(sea_orm::UpdateMany<games::Entity>) -> sea_orm::UpdateMany<games::Entity>,
{
    let now = time::OffsetDateTime::now_utc();

    let result = configure_update(games::Entity::update_many())
        .col_expr(games::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            games::Column::LockVersion,
            Expr::col(games::Column::LockVersion).add(1),
        )
        .filter(games::Column::Id.eq(id))
        .filter(games::Column::LockVersion.eq(current_lock_version))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let game = games::Entity::find_by_id(id.to_owned()).one(conn).await?;
        return match game {
            Some(game) => Err(sea_orm::DbErr::Custom(format!(
                "OPTIMISTIC_LOCK:{{\"expected\":{},\"actual\":{}}}",
                current_lock_version, game.lock_version
            ))),
            None => Err(game_not_found(id)),
        };
    }

    require_game(conn, id).await
}

pub async fn find_by_id<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find_by_id(game_id.to_owned()).one(conn).await
}

/// Find game by ID or return a structured not-found error.
pub async fn require_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    game_id: &str,
) -> Result<games::Model, sea_orm::DbErr> {
    find_by_id(conn, game_id)
        .await?
        .ok_or_else(|| game_not_found(game_id))
}

/// The single `INITIALIZING` row, if there is one.
pub async fn find_open<C: ConnectionTrait + Send + Sync>(
    conn: &C,
) -> Result<Option<games::Model>, sea_orm::DbErr> {
    games::Entity::find()
        .filter(games::Column::LifecyclePhase.eq(LifecyclePhase::Initializing))
        .filter(games::Column::PlayerTwoId.is_null())
        .order_by_asc(games::Column::CreatedAt)
        .one(conn)
        .await
}

fn seated(player_id: &str) -> Condition {
    Condition::any()
        .add(games::Column::PlayerOneId.eq(player_id))
        .add(games::Column::PlayerTwoId.eq(player_id))
}

pub async fn count_active_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: &str,
) -> Result<u64, sea_orm::DbErr> {
    games::Entity::find()
        .filter(seated(player_id))
        .filter(games::Column::LifecyclePhase.ne(LifecyclePhase::Done))
        .count(conn)
        .await
}

pub async fn list_for_player<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    player_id: &str,
    include_done: bool,
) -> Result<Vec<games::Model>, sea_orm::DbErr> {
    let mut query = games::Entity::find().filter(seated(player_id));
    if !include_done {
        query = query.filter(games::Column::LifecyclePhase.ne(LifecyclePhase::Done));
    }
    query
        .order_by_desc(games::Column::CreatedAt)
        .order_by_desc(games::Column::Id)
        .all(conn)
        .await
}

/// Insert an open session. The `games_single_open_slot` index rejects a
/// second concurrent `INITIALIZING` row.
pub async fn create_game<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameCreate,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();
    let game_active = games::ActiveModel {
        id: Set(dto.id),
        player_one_id: Set(dto.player_one_id),
        player_two_id: Set(None),
        lifecycle_phase: Set(LifecyclePhase::Initializing),
        winning_condition: Set(games::WinningCondition::Default),
        packed_state: Set(dto.packed_state),
        lock_version: Set(1),
        created_at: Set(now),
        updated_at: Set(now),
    };

    game_active.insert(conn).await
}

/// Compare-and-set on the empty second seat.
///
/// The update only matches while the row is still `INITIALIZING` with no
/// second player, so of two racing joiners exactly one sees a row affected.
pub async fn claim_second_seat<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameSeat,
) -> Result<games::Model, sea_orm::DbErr> {
    let now = time::OffsetDateTime::now_utc();

    let result = games::Entity::update_many()
        .col_expr(
            games::Column::PlayerTwoId,
            Expr::val(Some(dto.player_two_id.clone())).into(),
        )
        .col_expr(
            games::Column::LifecyclePhase,
            Expr::val(LifecyclePhase::Playing).into(),
        )
        .col_expr(games::Column::UpdatedAt, Expr::val(now).into())
        .col_expr(
            games::Column::LockVersion,
            Expr::col(games::Column::LockVersion).add(1),
        )
        .filter(games::Column::Id.eq(dto.id.as_str()))
        .filter(games::Column::LifecyclePhase.eq(LifecyclePhase::Initializing))
        .filter(games::Column::PlayerTwoId.is_null())
        .filter(games::Column::PlayerOneId.ne(dto.player_two_id.as_str()))
        .exec(conn)
        .await?;

    if result.rows_affected == 0 {
        let game = require_game(conn, &dto.id).await?;
        let reason = if game.player_one_id == dto.player_two_id {
            "SELF_JOIN"
        } else {
            "SLOT_TAKEN"
        };
        return Err(sea_orm::DbErr::Custom(format!("{reason}:{}", dto.id)));
    }

    require_game(conn, &dto.id).await
}

pub async fn update_state<C: ConnectionTrait + Send + Sync>(
    conn: &C,
    dto: GameUpdateState,
) -> Result<games::Model, sea_orm::DbErr> {
    optimistic_update_then_fetch(conn, &dto.id, dto.current_lock_version, |update| {
        update
            .col_expr(
                games::Column::LifecyclePhase,
                Expr::val(dto.lifecycle_phase).into(),
            )
            .col_expr(
                games::Column::WinningCondition,
                Expr::val(dto.winning_condition).into(),
            )
            .col_expr(games::Column::PackedState, Expr::val(dto.packed_state).into())
    })
    .await
}
