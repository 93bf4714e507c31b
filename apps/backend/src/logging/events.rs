//! Tagged warning events for operationally interesting outcomes.
//!
//! Each event carries a stable `event` field so log pipelines can alert on it.

use tracing::warn;

use crate::domain::{GameId, PlayerId};
use crate::logging::pii::RedactedPlayer;

/// A player was turned away because they hit the active-game quota.
pub fn quota_exceeded(player: &PlayerId, active: usize, limit: usize) {
    warn!(
        event = "SESSION_QUOTA_EXCEEDED",
        player = %RedactedPlayer(player),
        active,
        limit,
        "Admission rejected by active game quota"
    );
}

/// Matchmaking lost every slot race it was allowed to retry.
pub fn matchmaking_contention(player: &PlayerId, attempts: u32) {
    warn!(
        event = "SESSION_MATCHMAKING_CONTENTION",
        player = %RedactedPlayer(player),
        attempts,
        "Admission abandoned after repeated slot races"
    );
}

/// A storage write failed in a way that leaves its outcome unknown.
pub fn write_outcome_unknown(game_id: Option<&GameId>, operation: &'static str) {
    warn!(
        event = "SESSION_WRITE_OUTCOME_UNKNOWN",
        game_id = game_id.map(GameId::as_str).unwrap_or(""),
        operation,
        "Storage write failed; caller must reload before retrying"
    );
}
