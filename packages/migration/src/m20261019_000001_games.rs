use sea_orm::Statement;
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Games {
    Table,
    Id,
    PlayerOneId,
    PlayerTwoId,
    LifecyclePhase,
    WinningCondition,
    PackedState,
    LockVersion,
    CreatedAt,
    UpdatedAt,
}

const OPEN_SLOT_INDEX: &str = "games_single_open_slot";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Games::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Games::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Games::PlayerOneId).string().not_null())
                    .col(ColumnDef::new(Games::PlayerTwoId).string().null())
                    .col(
                        ColumnDef::new(Games::LifecyclePhase)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::WinningCondition)
                            .string_len(16)
                            .not_null()
                            .default("DEFAULT"),
                    )
                    .col(
                        ColumnDef::new(Games::PackedState)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Games::LockVersion)
                            .integer()
                            .not_null()
                            .default(1),
                    )
                    .col(
                        ColumnDef::new(Games::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Games::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Quota counts and per-player listings filter on either seat.
        manager
            .create_index(
                Index::create()
                    .name("ix_games_player_one_phase")
                    .table(Games::Table)
                    .col(Games::PlayerOneId)
                    .col(Games::LifecyclePhase)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_games_player_two_phase")
                    .table(Games::Table)
                    .col(Games::PlayerTwoId)
                    .col(Games::LifecyclePhase)
                    .to_owned(),
            )
            .await?;

        // At most one INITIALIZING row. Same partial-index syntax on both backends.
        let backend = manager.get_database_backend();
        match backend {
            sea_orm::DatabaseBackend::Postgres | sea_orm::DatabaseBackend::Sqlite => {
                manager
                    .get_connection()
                    .execute(Statement::from_string(
                        backend,
                        format!(
                            "CREATE UNIQUE INDEX IF NOT EXISTS {OPEN_SLOT_INDEX} \
                             ON games (lifecycle_phase) \
                             WHERE lifecycle_phase = 'INITIALIZING';"
                        ),
                    ))
                    .await?;
            }
            _ => {
                return Err(DbErr::Custom("Unsupported database backend".into()));
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in [
            OPEN_SLOT_INDEX,
            "ix_games_player_two_phase",
            "ix_games_player_one_phase",
        ] {
            manager
                .drop_index(Index::drop().name(name).table(Games::Table).to_owned())
                .await?;
        }

        manager
            .drop_table(Table::drop().table(Games::Table).to_owned())
            .await
    }
}
