#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod infra;
pub mod logging;
pub mod repos;
pub mod services;
pub mod telemetry;

#[cfg(test)]
pub mod test_bootstrap;

// Re-exports for public API
pub use adapters::{InMemoryGameStore, SeaGameStore};
pub use config::db::DbKind;
pub use config::GameplayConfig;
pub use domain::{
    GameId, GameRecord, LifecyclePhase, MakeMoveRequest, PackedState, PlayerId, PlayerSlot,
    TurnMove, TurnPhase, WinningCondition,
};
pub use engine::{GameEngine, NeutrinoEngine};
pub use errors::{DomainError, ErrorCode, ErrorKind};
pub use infra::db::connect_db;
pub use repos::GameDataStore;
pub use services::{Admission, AdmissionOutcome, GameQueryService, MoveOrchestrator, SessionMatchmaker};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
