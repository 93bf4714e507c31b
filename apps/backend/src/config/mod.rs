pub mod db;

use std::env;

use crate::errors::domain::DomainError;

pub const MAX_ACTIVE_GAMES_VAR: &str = "NEUTRINO_MAX_ACTIVE_GAMES";
pub const MAX_ADMIT_ATTEMPTS_VAR: &str = "NEUTRINO_MAX_ADMIT_ATTEMPTS";

/// Tunables for session admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameplayConfig {
    /// Non-`DONE` games a player may hold at once.
    pub max_active_games: usize,
    /// Slot races a single admission may lose before giving up.
    pub max_admit_attempts: u32,
}

impl Default for GameplayConfig {
    fn default() -> Self {
        Self {
            max_active_games: 5,
            max_admit_attempts: 3,
        }
    }
}

impl GameplayConfig {
    /// Read overrides from the process environment; unset variables keep defaults.
    pub fn from_env() -> Result<Self, DomainError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DomainError> {
        let defaults = Self::default();
        Ok(Self {
            max_active_games: positive(&lookup, MAX_ACTIVE_GAMES_VAR)?
                .unwrap_or(defaults.max_active_games),
            max_admit_attempts: positive(&lookup, MAX_ADMIT_ATTEMPTS_VAR)?
                .unwrap_or(defaults.max_admit_attempts),
        })
    }
}

fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>, DomainError>
where
    T: std::str::FromStr + PartialEq + Default,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(Some(value)),
        _ => Err(DomainError::config(format!(
            "{name} must be a positive integer, got '{raw}'"
        ))),
    }
}
