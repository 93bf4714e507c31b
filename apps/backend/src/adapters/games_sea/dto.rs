//! DTOs for games_sea adapter.

use crate::domain;
use crate::entities::games::{LifecyclePhase, WinningCondition};

/// DTO for inserting a new open session.
#[derive(Debug, Clone)]
pub struct GameCreate {
    pub id: String,
    pub player_one_id: String,
    pub packed_state: i64,
}

impl GameCreate {
    pub fn new(id: impl Into<String>, player_one_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            player_one_id: player_one_id.into(),
            packed_state: 0,
        }
    }
}

/// DTO for claiming the empty second seat of an open session.
#[derive(Debug, Clone)]
pub struct GameSeat {
    pub id: String,
    pub player_two_id: String,
}

/// Whole-state replacement guarded by the optimistic lock.
///
/// `current_lock_version` must equal the stored version for the update to apply.
#[derive(Debug, Clone)]
pub struct GameUpdateState {
    pub id: String,
    pub lifecycle_phase: LifecyclePhase,
    pub winning_condition: WinningCondition,
    pub packed_state: i64,
    pub current_lock_version: i32,
}

impl From<domain::LifecyclePhase> for LifecyclePhase {
    fn from(phase: domain::LifecyclePhase) -> Self {
        match phase {
            domain::LifecyclePhase::Initializing => LifecyclePhase::Initializing,
            domain::LifecyclePhase::Playing => LifecyclePhase::Playing,
            domain::LifecyclePhase::Done => LifecyclePhase::Done,
        }
    }
}

impl From<LifecyclePhase> for domain::LifecyclePhase {
    fn from(phase: LifecyclePhase) -> Self {
        match phase {
            LifecyclePhase::Initializing => domain::LifecyclePhase::Initializing,
            LifecyclePhase::Playing => domain::LifecyclePhase::Playing,
            LifecyclePhase::Done => domain::LifecyclePhase::Done,
        }
    }
}

impl From<domain::WinningCondition> for WinningCondition {
    fn from(condition: domain::WinningCondition) -> Self {
        match condition {
            domain::WinningCondition::BackLine => WinningCondition::BackLine,
            domain::WinningCondition::Trap => WinningCondition::Trap,
            domain::WinningCondition::Default => WinningCondition::Default,
        }
    }
}

impl From<WinningCondition> for domain::WinningCondition {
    fn from(condition: WinningCondition) -> Self {
        match condition {
            WinningCondition::BackLine => domain::WinningCondition::BackLine,
            WinningCondition::Trap => domain::WinningCondition::Trap,
            WinningCondition::Default => domain::WinningCondition::Default,
        }
    }
}
