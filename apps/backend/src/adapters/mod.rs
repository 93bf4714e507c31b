//! Adapters for external dependencies.

pub mod games_memory;
pub mod games_sea;

pub use games_memory::InMemoryGameStore;
pub use games_sea::SeaGameStore;
