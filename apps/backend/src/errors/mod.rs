//! Error handling for the Neutrino backend.

pub mod domain;
pub mod error_code;

pub use domain::{
    ConflictKind, DomainError, ErrorKind, ForbiddenKind, InfraErrorKind, MoveStep, NotFoundKind,
    StoragePhase,
};
pub use error_code::ErrorCode;
