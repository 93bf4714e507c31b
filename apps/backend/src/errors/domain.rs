//! Domain-level error type used across services, stores and the engine seam.
//!
//! This error type is transport- and DB-agnostic. An outer adapter maps
//! `DomainError::kind()` (or `ErrorCode`) onto whatever status scheme it speaks.

use thiserror::Error;

use super::error_code::ErrorCode;

/// Coarse error taxonomy exposed to callers of the core services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    QuotaExceeded,
    NotFound,
    Forbidden,
    InvalidMove,
    Conflict,
    StorageError,
    AuthError,
    ConfigError,
}

/// Infra error kinds to distinguish operational failures
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InfraErrorKind {
    Timeout,
    Unavailable,
    DataCorruption,
    Other(String),
}

/// Whether the failing storage call was a read or a write.
///
/// A failed write leaves the stored state unknown to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoragePhase {
    Read,
    Write,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Game,
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ForbiddenKind {
    /// Caller holds neither seat of the session.
    NotAParticipant,
    /// Caller is seated but the engine reports the other seat to move.
    NotYourTurn,
    /// Session is still waiting for its second player.
    NotInPlay,
    /// Session reached `DONE`; nobody owns a turn any more.
    GameFinished,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    /// Another player claimed the open slot first.
    SlotTaken,
    /// An open session already exists; a second one may not be created.
    OpenSlotExists,
    /// The session changed between load and save.
    OptimisticLock,
    /// Matchmaking lost every race it was allowed to retry.
    MatchmakingContention,
    Other(String),
}

/// Which part of a submitted turn was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveStep {
    /// The request itself was malformed before reaching the engine.
    Request,
    Neutrino,
    Piece,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("quota exceeded: {active} active games, limit is {limit}")]
    QuotaExceeded { active: usize, limit: usize },
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    #[error("forbidden {0:?}: {1}")]
    Forbidden(ForbiddenKind, String),
    #[error("invalid move ({0:?}): {1}")]
    InvalidMove(MoveStep, String),
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    #[error("infra {0:?} during {1:?}: {2}")]
    Infra(InfraErrorKind, StoragePhase, String),
    #[error("auth error: {0}")]
    Auth(String),
    #[error("configuration error: {0}")]
    Config(String),
}

impl DomainError {
    pub fn quota_exceeded(active: usize, limit: usize) -> Self {
        Self::QuotaExceeded { active, limit }
    }
    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }
    pub fn forbidden(kind: ForbiddenKind, detail: impl Into<String>) -> Self {
        Self::Forbidden(kind, detail.into())
    }
    pub fn invalid_move(step: MoveStep, detail: impl Into<String>) -> Self {
        Self::InvalidMove(step, detail.into())
    }
    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }
    pub fn infra(kind: InfraErrorKind, phase: StoragePhase, detail: impl Into<String>) -> Self {
        Self::Infra(kind, phase, detail.into())
    }
    pub fn auth(detail: impl Into<String>) -> Self {
        Self::Auth(detail.into())
    }
    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config(detail.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::QuotaExceeded { .. } => ErrorKind::QuotaExceeded,
            DomainError::NotFound(..) => ErrorKind::NotFound,
            DomainError::Forbidden(..) => ErrorKind::Forbidden,
            DomainError::InvalidMove(..) => ErrorKind::InvalidMove,
            DomainError::Conflict(..) => ErrorKind::Conflict,
            DomainError::Infra(..) => ErrorKind::StorageError,
            DomainError::Auth(_) => ErrorKind::AuthError,
            DomainError::Config(_) => ErrorKind::ConfigError,
        }
    }

    /// Stable machine-readable code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::QuotaExceeded { .. } => ErrorCode::QuotaExceeded,
            DomainError::NotFound(NotFoundKind::Game, _) => ErrorCode::GameNotFound,
            DomainError::NotFound(..) => ErrorCode::NotFound,
            DomainError::Forbidden(ForbiddenKind::NotAParticipant, _) => ErrorCode::NotAParticipant,
            DomainError::Forbidden(ForbiddenKind::NotYourTurn, _) => ErrorCode::OutOfTurn,
            DomainError::Forbidden(ForbiddenKind::NotInPlay, _) => ErrorCode::GameNotStarted,
            DomainError::Forbidden(ForbiddenKind::GameFinished, _) => ErrorCode::GameFinished,
            DomainError::InvalidMove(MoveStep::Request, _) => ErrorCode::BadRequest,
            DomainError::InvalidMove(..) => ErrorCode::IllegalMove,
            DomainError::Conflict(ConflictKind::OptimisticLock, _) => ErrorCode::OptimisticLock,
            DomainError::Conflict(ConflictKind::SlotTaken, _) => ErrorCode::SlotTaken,
            DomainError::Conflict(ConflictKind::OpenSlotExists, _) => ErrorCode::OpenSlotExists,
            DomainError::Conflict(..) => ErrorCode::Conflict,
            DomainError::Infra(InfraErrorKind::Timeout, ..) => ErrorCode::DbTimeout,
            DomainError::Infra(InfraErrorKind::Unavailable, ..) => ErrorCode::DbUnavailable,
            DomainError::Infra(InfraErrorKind::DataCorruption, ..) => ErrorCode::DataCorruption,
            DomainError::Infra(..) => ErrorCode::DbError,
            DomainError::Auth(_) => ErrorCode::Unauthorized,
            DomainError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// True when a write was attempted and its outcome is unknown.
    ///
    /// Callers must reconcile (reload) before deciding whether to retry.
    pub fn requires_reconciliation(&self) -> bool {
        matches!(self, DomainError::Infra(_, StoragePhase::Write, _))
    }

    /// True when the failure guarantees that nothing was persisted.
    pub fn is_no_op(&self) -> bool {
        !matches!(self, DomainError::Infra(..) | DomainError::Config(_))
    }

    /// Re-tag a storage failure as having happened during a write.
    pub fn during_write(self) -> Self {
        match self {
            DomainError::Infra(kind, _, detail) => DomainError::Infra(kind, StoragePhase::Write, detail),
            other => other,
        }
    }
}
