//! Session services: admission, move application and read queries.

pub mod games;
pub mod matchmaking;
pub mod moves;

pub use games::GameQueryService;
pub use matchmaking::{Admission, AdmissionOutcome, SessionMatchmaker};
pub use moves::MoveOrchestrator;
