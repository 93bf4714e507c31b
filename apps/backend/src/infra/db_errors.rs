//! SeaORM -> DomainError translation helpers.
//!
//! Adapters return `sea_orm::DbErr`; stores convert it here so services only
//! ever see `DomainError`.

use tracing::{error, warn};

use crate::errors::domain::{
    ConflictKind, DomainError, InfraErrorKind, NotFoundKind, StoragePhase,
};
use crate::logging::pii::Redacted;

/// Partial unique index allowing at most one `INITIALIZING` game.
pub const OPEN_SLOT_INDEX: &str = "games_single_open_slot";

fn mentions_sqlstate(msg: &str, code: &str) -> bool {
    msg.contains(code) || msg.contains(&format!("SQLSTATE({code})"))
}

/// Extract table.column from SQLite "UNIQUE constraint failed: table.column" messages.
fn extract_sqlite_table_column(error_msg: &str) -> Option<&str> {
    let marker = "UNIQUE constraint failed: ";
    let start = error_msg.find(marker)? + marker.len();
    error_msg[start..]
        .split(|c: char| c.is_whitespace() || c == '"' || c == ',')
        .next()
        .filter(|s| !s.is_empty())
}

fn map_unique_violation(error_msg: &str) -> Option<(ConflictKind, &'static str)> {
    let open_slot = (
        ConflictKind::OpenSlotExists,
        "An open game is already waiting for a second player",
    );
    if error_msg.contains(OPEN_SLOT_INDEX) {
        return Some(open_slot);
    }
    match extract_sqlite_table_column(error_msg) {
        Some("games.lifecycle_phase") => Some(open_slot),
        Some("games.id") => Some((ConflictKind::Other("DuplicateGameId".into()), "Game id already exists")),
        _ if error_msg.contains("games_pkey") => {
            Some((ConflictKind::Other("DuplicateGameId".into()), "Game id already exists"))
        }
        _ => None,
    }
}

/// Parse `PREFIX:<game id>` payloads produced by the games adapter.
fn tagged_game_id<'a>(msg: &'a str, prefix: &str) -> Option<&'a str> {
    msg.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix(':'))
}

/// Translate a `DbErr` into a `DomainError` with sanitized, PII-safe detail.
///
/// `phase` records whether the failing call was a read or a write; it is
/// carried on infra errors so callers know whether state may have changed.
pub fn map_db_err(e: sea_orm::DbErr, phase: StoragePhase) -> DomainError {
    let error_msg = e.to_string();

    match &e {
        sea_orm::DbErr::RecordNotFound(_) => {
            return DomainError::not_found(NotFoundKind::Other("Record".into()), "Record not found");
        }
        sea_orm::DbErr::Custom(msg) => {
            if let Some(game_id) = tagged_game_id(msg, "GAME_NOT_FOUND") {
                warn!(game_id, "Game not found");
                return DomainError::not_found(NotFoundKind::Game, format!("Game {game_id} not found"));
            }
            if let Some(game_id) = tagged_game_id(msg, "SLOT_TAKEN") {
                warn!(game_id, "Open slot already claimed");
                return DomainError::conflict(
                    ConflictKind::SlotTaken,
                    format!("Game {game_id} is no longer open"),
                );
            }
            if let Some(game_id) = tagged_game_id(msg, "SELF_JOIN") {
                return DomainError::conflict(
                    ConflictKind::Other("SelfJoin".into()),
                    format!("Player already holds seat one of game {game_id}"),
                );
            }
            if let Some(json_str) = msg.strip_prefix("OPTIMISTIC_LOCK:") {
                #[derive(serde::Deserialize)]
                struct LockInfo {
                    expected: i32,
                    actual: i32,
                }

                if let Ok(info) = serde_json::from_str::<LockInfo>(json_str) {
                    warn!(
                        expected = info.expected,
                        actual = info.actual,
                        "Optimistic lock conflict detected"
                    );
                    return DomainError::conflict(
                        ConflictKind::OptimisticLock,
                        format!(
                            "Game was modified concurrently (expected version {}, actual version {}). Reload and retry.",
                            info.expected, info.actual
                        ),
                    );
                }

                warn!("Optimistic lock conflict detected (version info unavailable)");
                return DomainError::conflict(
                    ConflictKind::OptimisticLock,
                    "Game was modified concurrently; reload and retry",
                );
            }
        }
        sea_orm::DbErr::ConnectionAcquire(_) | sea_orm::DbErr::Conn(_) => {
            warn!(raw_error = %Redacted(&error_msg), ?phase, "Database unavailable");
            return DomainError::infra(InfraErrorKind::Unavailable, phase, "Database unavailable");
        }
        _ => {}
    }

    if mentions_sqlstate(&error_msg, "23505")
        || error_msg.contains("duplicate key value violates unique constraint")
        || error_msg.contains("UNIQUE constraint failed")
    {
        warn!(raw_error = %Redacted(&error_msg), "Unique constraint violation");
        if let Some((kind, detail)) = map_unique_violation(&error_msg) {
            return DomainError::conflict(kind, detail);
        }
        return DomainError::conflict(
            ConflictKind::Other("Unique".into()),
            "Unique constraint violation",
        );
    }

    if error_msg.contains("timeout") || error_msg.contains("timed out") {
        warn!(raw_error = %Redacted(&error_msg), ?phase, "Database timeout");
        return DomainError::infra(InfraErrorKind::Timeout, phase, "Database timeout");
    }

    if error_msg.contains("pool") || error_msg.contains("unavailable") {
        warn!(raw_error = %Redacted(&error_msg), ?phase, "Database pool issue");
        return DomainError::infra(InfraErrorKind::Unavailable, phase, "Database unavailable");
    }

    error!(raw_error = %Redacted(&error_msg), ?phase, "Unhandled database error");
    DomainError::infra(
        InfraErrorKind::Other("DbErr".into()),
        phase,
        "Database operation failed",
    )
}
