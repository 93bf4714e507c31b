//! Submitted moves: board coordinates and the two-part turn.

use serde::{Deserialize, Serialize};

use super::ids::GameId;
use crate::errors::domain::{DomainError, MoveStep};

/// Board coordinate. Range checks belong to the rule engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square {
    pub x: u8,
    pub y: u8,
}

impl Square {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relocation {
    pub from: Square,
    pub to: Square,
}

impl Relocation {
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

/// A full turn: the neutrino relocation, then the mover's piece relocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnMove {
    pub neutrino: Relocation,
    pub piece: Relocation,
}

/// Flat make-move request as produced by the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MakeMoveRequest {
    #[serde(rename = "GameID")]
    pub game_id: String,
    pub neutrino_from_x: u8,
    pub neutrino_from_y: u8,
    pub neutrino_to_x: u8,
    pub neutrino_to_y: u8,
    pub piece_from_x: u8,
    pub piece_from_y: u8,
    pub piece_to_x: u8,
    pub piece_to_y: u8,
}

impl MakeMoveRequest {
    /// Split into the target game and the typed turn.
    pub fn into_parts(self) -> Result<(GameId, TurnMove), DomainError> {
        if self.game_id.trim().is_empty() {
            return Err(DomainError::invalid_move(
                MoveStep::Request,
                "missing game id in make move request",
            ));
        }
        let turn = TurnMove {
            neutrino: Relocation::new(
                Square::new(self.neutrino_from_x, self.neutrino_from_y),
                Square::new(self.neutrino_to_x, self.neutrino_to_y),
            ),
            piece: Relocation::new(
                Square::new(self.piece_from_x, self.piece_from_y),
                Square::new(self.piece_to_x, self.piece_to_y),
            ),
        };
        Ok((GameId::from(self.game_id), turn))
    }
}
