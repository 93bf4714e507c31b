//! Rule-engine seam.
//!
//! The orchestrator never looks inside a `PackedState`; it only hands it to a
//! `GameEngine`, asks whose turn it is, applies relocations and re-encodes.

pub mod neutrino;

use thiserror::Error;

use crate::domain::{PackedState, Relocation, Square, SubPhase, TurnPhase};

pub use neutrino::{NeutrinoEngine, NeutrinoSession};

/// Rejection reasons reported by a rule engine for a single relocation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IllegalMove {
    #[error("game is already over")]
    GameOver,
    #[error("square ({}, {}) is off the board", .0.x, .0.y)]
    OutOfBounds(Square),
    #[error("square ({}, {}) does not hold a movable {expected:?} token", square.x, square.y)]
    WrongToken { square: Square, expected: SubPhase },
    #[error("relocation is not along a straight line or diagonal")]
    NotStraight,
    #[error("token must slide as far as possible, stopping at ({}, {})", stop.x, stop.y)]
    MustSlideFully { stop: Square },
}

/// Capability contract the orchestrator needs from a rule engine.
///
/// Implementations must keep `decode(encode(s))` observationally equal to `s`
/// (same turn phase, same legal moves).
pub trait GameEngine: Send + Sync {
    type Session: Clone + Send + Sync + std::fmt::Debug;

    fn decode(&self, packed: PackedState) -> Self::Session;

    fn encode(&self, session: &Self::Session) -> PackedState;

    fn current_turn_phase(&self, session: &Self::Session) -> TurnPhase;

    /// Apply one relocation for whoever owns the current sub-phase.
    fn apply_move(
        &self,
        session: Self::Session,
        relocation: Relocation,
    ) -> Result<Self::Session, IllegalMove>;
}
