//! Error codes for the Neutrino backend.
//!
//! Add new codes here; never pass ad-hoc strings as error codes.
//! All error codes are SCREAMING_SNAKE_CASE.

use core::fmt;

/// Centralized error codes.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that an outer
/// adapter can surface unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Identity & Authorization
    /// Identity could not be resolved
    Unauthorized,
    /// Caller is not seated in the game
    NotAParticipant,
    /// Caller does not own the current turn
    OutOfTurn,
    /// Game is still waiting for a second player
    GameNotStarted,
    /// Game has finished
    GameFinished,

    // Request Validation
    /// Rule engine rejected a relocation
    IllegalMove,
    /// Malformed request
    BadRequest,
    /// Player already holds the maximum number of active games
    QuotaExceeded,

    // Resource Not Found
    /// Game not found
    GameNotFound,
    /// General not found error
    NotFound,

    // Business Logic Conflicts
    /// Open slot claimed by another player
    SlotTaken,
    /// An open session already exists
    OpenSlotExists,
    /// Optimistic lock conflict
    OptimisticLock,
    /// Generic conflict (fallback for unmatched conflicts)
    Conflict,

    // System Errors
    /// Database error
    DbError,
    /// Database unavailable
    DbUnavailable,
    /// Database timeout
    DbTimeout,
    /// Data corruption detected
    DataCorruption,
    /// Configuration error
    ConfigError,
}

impl ErrorCode {
    /// Returns the canonical SCREAMING_SNAKE_CASE string for this error code.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unauthorized => "UNAUTHORIZED",
            Self::NotAParticipant => "NOT_A_PARTICIPANT",
            Self::OutOfTurn => "OUT_OF_TURN",
            Self::GameNotStarted => "GAME_NOT_STARTED",
            Self::GameFinished => "GAME_FINISHED",

            Self::IllegalMove => "ILLEGAL_MOVE",
            Self::BadRequest => "BAD_REQUEST",
            Self::QuotaExceeded => "QUOTA_EXCEEDED",

            Self::GameNotFound => "GAME_NOT_FOUND",
            Self::NotFound => "NOT_FOUND",

            Self::SlotTaken => "SLOT_TAKEN",
            Self::OpenSlotExists => "OPEN_SLOT_EXISTS",
            Self::OptimisticLock => "OPTIMISTIC_LOCK",
            Self::Conflict => "CONFLICT",

            Self::DbError => "DB_ERROR",
            Self::DbUnavailable => "DB_UNAVAILABLE",
            Self::DbTimeout => "DB_TIMEOUT",
            Self::DataCorruption => "DATA_CORRUPTION",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_strings() {
        assert_eq!(ErrorCode::Unauthorized.as_str(), "UNAUTHORIZED");
        assert_eq!(ErrorCode::NotAParticipant.as_str(), "NOT_A_PARTICIPANT");
        assert_eq!(ErrorCode::OutOfTurn.as_str(), "OUT_OF_TURN");
        assert_eq!(ErrorCode::GameNotStarted.as_str(), "GAME_NOT_STARTED");
        assert_eq!(ErrorCode::GameFinished.as_str(), "GAME_FINISHED");
        assert_eq!(ErrorCode::IllegalMove.as_str(), "ILLEGAL_MOVE");
        assert_eq!(ErrorCode::QuotaExceeded.as_str(), "QUOTA_EXCEEDED");
        assert_eq!(ErrorCode::GameNotFound.as_str(), "GAME_NOT_FOUND");
        assert_eq!(ErrorCode::SlotTaken.as_str(), "SLOT_TAKEN");
        assert_eq!(ErrorCode::OpenSlotExists.as_str(), "OPEN_SLOT_EXISTS");
        assert_eq!(ErrorCode::OptimisticLock.as_str(), "OPTIMISTIC_LOCK");
        assert_eq!(ErrorCode::DbUnavailable.as_str(), "DB_UNAVAILABLE");
        assert_eq!(ErrorCode::ConfigError.as_str(), "CONFIG_ERROR");
    }

    #[test]
    fn test_display_trait() {
        assert_eq!(format!("{}", ErrorCode::OutOfTurn), "OUT_OF_TURN");
        assert_eq!(format!("{}", ErrorCode::DbTimeout), "DB_TIMEOUT");
    }
}
