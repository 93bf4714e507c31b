//! Domain layer: session records, turn ownership and move types.

pub mod game_record;
pub mod ids;
pub mod moves;
pub mod turn;

// Re-exports for ergonomics
pub use game_record::{GameRecord, LifecyclePhase, PackedState, WinningCondition};
pub use ids::{GameId, PlayerId};
pub use moves::{MakeMoveRequest, Relocation, Square, TurnMove};
pub use turn::{Outcome, PlayerSlot, SubPhase, Turn, TurnPhase};
