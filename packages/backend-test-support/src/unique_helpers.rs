//! Unique identifiers for test isolation.
//!
//! Scenarios that share a store (or a database file) must not collide on
//! player identities, so every helper suffixes a fresh ULID.

use ulid::Ulid;

/// `{prefix}-{ulid}`
///
/// ```
/// use backend_test_support::unique_helpers::unique_str;
///
/// let a = unique_str("player");
/// let b = unique_str("player");
/// assert_ne!(a, b);
/// assert!(a.starts_with("player-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}-{}", Ulid::new())
}

/// Email-shaped identity subject, `{prefix}-{ulid}@example.test`.
pub fn unique_subject(prefix: &str) -> String {
    format!("{}@example.test", unique_str(prefix))
}

/// `count` distinct identities sharing one prefix.
pub fn unique_players(prefix: &str, count: usize) -> Vec<String> {
    (0..count).map(|i| unique_str(&format!("{prefix}{i}"))).collect()
}
