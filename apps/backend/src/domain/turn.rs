//! Turn ownership: which seat moves next and which relocation it owes.

use serde::{Deserialize, Serialize};

use super::game_record::WinningCondition;

/// One of the two seats of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerSlot {
    One,
    Two,
}

impl PlayerSlot {
    pub fn opponent(self) -> Self {
        match self {
            PlayerSlot::One => PlayerSlot::Two,
            PlayerSlot::Two => PlayerSlot::One,
        }
    }
}

/// The two relocations that make up a turn, in the order they are owed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubPhase {
    Neutrino,
    Piece,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Turn {
    pub owner: PlayerSlot,
    pub step: SubPhase,
}

impl Turn {
    pub const fn new(owner: PlayerSlot, step: SubPhase) -> Self {
        Self { owner, step }
    }

    /// The turn that follows this one in the
    /// `P1 neutrino → P1 piece → P2 neutrino → P2 piece` cycle.
    pub fn next(self) -> Self {
        match self.step {
            SubPhase::Neutrino => Turn::new(self.owner, SubPhase::Piece),
            SubPhase::Piece => Turn::new(self.owner.opponent(), SubPhase::Neutrino),
        }
    }
}

/// Result of a finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Option<PlayerSlot>,
    pub condition: WinningCondition,
}

/// Engine-reported phase: somebody owes a relocation, or the game is over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    Turn(Turn),
    Finished(Outcome),
}

impl TurnPhase {
    /// Seat that must act, or `None` once finished.
    pub fn owner(&self) -> Option<PlayerSlot> {
        match self {
            TurnPhase::Turn(turn) => Some(turn.owner),
            TurnPhase::Finished(_) => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            TurnPhase::Turn(_) => None,
            TurnPhase::Finished(outcome) => Some(*outcome),
        }
    }
}
