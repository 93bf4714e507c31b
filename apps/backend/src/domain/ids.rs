//! Identity newtypes for players and games.

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::errors::domain::DomainError;

/// An authenticated player identity (the identity provider's subject).
///
/// Construction rejects blank identities, so holding a `PlayerId` means
/// identity resolution already succeeded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerId(String);

impl PlayerId {
    pub fn new(raw: impl Into<String>) -> Result<Self, DomainError> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            return Err(DomainError::auth("missing player identity"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PlayerId {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerId> for String {
    fn from(value: PlayerId) -> Self {
        value.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque game identifier. Freshly minted ids are ULIDs; any non-empty
/// string is accepted when parsing ids handed back by callers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameId(String);

impl GameId {
    pub fn generate() -> Self {
        Self(Ulid::new().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for GameId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for GameId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::domain::ErrorKind;

    #[test]
    fn blank_identities_are_auth_errors() {
        for raw in ["", "   ", "\t\n"] {
            let err = PlayerId::new(raw).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::AuthError);
        }
        assert_eq!(PlayerId::new("firebase|abc").unwrap().as_str(), "firebase|abc");
    }

    #[test]
    fn player_id_deserialization_enforces_identity() {
        let ok: PlayerId = serde_json::from_str("\"alice\"").unwrap();
        assert_eq!(ok.as_str(), "alice");
        assert!(serde_json::from_str::<PlayerId>("\"\"").is_err());
    }

    #[test]
    fn generated_game_ids_are_unique() {
        let a = GameId::generate();
        let b = GameId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 26);
    }
}
