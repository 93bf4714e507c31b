use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum LifecyclePhase {
    #[sea_orm(string_value = "INITIALIZING")]
    Initializing,
    #[sea_orm(string_value = "PLAYING")]
    Playing,
    #[sea_orm(string_value = "DONE")]
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum WinningCondition {
    #[sea_orm(string_value = "BACK_LINE")]
    BackLine,
    #[sea_orm(string_value = "TRAP")]
    Trap,
    #[sea_orm(string_value = "DEFAULT")]
    Default,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "games")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "player_one_id")]
    pub player_one_id: String,
    #[sea_orm(column_name = "player_two_id")]
    pub player_two_id: Option<String>,
    #[sea_orm(column_name = "lifecycle_phase")]
    pub lifecycle_phase: LifecyclePhase,
    #[sea_orm(column_name = "winning_condition")]
    pub winning_condition: WinningCondition,
    #[sea_orm(column_name = "packed_state")]
    pub packed_state: i64,
    #[sea_orm(column_name = "lock_version")]
    pub lock_version: i32,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
    #[sea_orm(column_name = "updated_at")]
    pub updated_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
