//! Persisted session state.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::ids::{GameId, PlayerId};
use super::turn::PlayerSlot;
use crate::errors::domain::{ConflictKind, DomainError};

/// Session lifecycle. Transitions only move forward; `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecyclePhase {
    /// Waiting for a second player.
    Initializing,
    Playing,
    Done,
}

impl LifecyclePhase {
    pub fn can_transition_to(self, next: LifecyclePhase) -> bool {
        matches!(
            (self, next),
            (LifecyclePhase::Initializing, LifecyclePhase::Playing)
                | (LifecyclePhase::Playing, LifecyclePhase::Done)
        )
    }

    pub fn is_active(self) -> bool {
        self != LifecyclePhase::Done
    }
}

/// How a finished game was decided. `Default` until the game is `Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WinningCondition {
    BackLine,
    Trap,
    #[default]
    Default,
}

/// Opaque 64-bit board + turn encoding owned by the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PackedState(pub u64);

impl PackedState {
    /// Bit-preserving conversion for signed 64-bit storage columns.
    pub fn to_storage(self) -> i64 {
        self.0 as i64
    }

    pub fn from_storage(raw: i64) -> Self {
        Self(raw as u64)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub id: GameId,
    pub player_one: PlayerId,
    pub player_two: Option<PlayerId>,
    pub lifecycle_phase: LifecyclePhase,
    pub winning_condition: WinningCondition,
    pub packed_state: PackedState,
    /// Bumped by the store on every successful write.
    pub lock_version: i32,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl GameRecord {
    /// A freshly created open session.
    pub fn open(id: GameId, player_one: PlayerId, now: OffsetDateTime) -> Self {
        Self {
            id,
            player_one,
            player_two: None,
            lifecycle_phase: LifecyclePhase::Initializing,
            winning_condition: WinningCondition::Default,
            packed_state: PackedState::default(),
            lock_version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// Open slot: still initializing with nobody in seat two.
    pub fn is_open(&self) -> bool {
        self.lifecycle_phase == LifecyclePhase::Initializing && self.player_two.is_none()
    }

    pub fn slot_of(&self, player: &PlayerId) -> Option<PlayerSlot> {
        if &self.player_one == player {
            Some(PlayerSlot::One)
        } else if self.player_two.as_ref() == Some(player) {
            Some(PlayerSlot::Two)
        } else {
            None
        }
    }

    pub fn is_participant(&self, player: &PlayerId) -> bool {
        self.slot_of(player).is_some()
    }

    /// Seat `joiner` in slot two and start play.
    pub fn seat_second_player(&mut self, joiner: PlayerId) -> Result<(), DomainError> {
        if !self.is_open() {
            return Err(DomainError::conflict(
                ConflictKind::SlotTaken,
                format!("game {} is no longer open", self.id),
            ));
        }
        if joiner == self.player_one {
            return Err(DomainError::conflict(
                ConflictKind::Other("SelfJoin".into()),
                format!("player already holds seat one of game {}", self.id),
            ));
        }
        self.player_two = Some(joiner);
        self.lifecycle_phase = LifecyclePhase::Playing;
        Ok(())
    }

    /// Mark the game finished with the given condition.
    pub fn finish(&mut self, condition: WinningCondition) -> Result<(), DomainError> {
        if !self.lifecycle_phase.can_transition_to(LifecyclePhase::Done) {
            return Err(DomainError::conflict(
                ConflictKind::Other("LifecycleTransition".into()),
                format!(
                    "game {} cannot finish from {:?}",
                    self.id, self.lifecycle_phase
                ),
            ));
        }
        self.lifecycle_phase = LifecyclePhase::Done;
        self.winning_condition = condition;
        Ok(())
    }
}
