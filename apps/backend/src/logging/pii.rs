use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::domain::PlayerId;

/// Regex patterns used for PII redaction.
///
/// Player identities come from the identity provider's subject and are often
/// email addresses or opaque tokens, so both are masked before logging.
pub struct PiiRegexRegistry;

impl PiiRegexRegistry {
    /// SAFETY: vetted literal, compiles.
    pub fn email() -> &'static Regex {
        static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
        });
        &EMAIL_REGEX
    }

    /// Base64-like or hex runs of 16 chars or more.
    /// SAFETY: vetted literal, compiles.
    pub fn opaque_token() -> &'static Regex {
        static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
            #[allow(clippy::unwrap_used)]
            Regex::new(r"\b[A-Za-z0-9+/]{16,}={0,2}").unwrap()
        });
        &TOKEN_REGEX
    }
}

/// Mask emails (first local char kept, domain kept) and opaque tokens.
///
/// Emails are handled first so their domains are not mistaken for tokens.
pub fn redact(input: &str) -> String {
    let emails_masked = PiiRegexRegistry::email().replace_all(input, |caps: &regex::Captures| {
        let full_match = &caps[0];
        match full_match.find('@') {
            Some(0) | None => full_match.to_string(),
            Some(at_pos) => {
                let (local_part, domain) = full_match.split_at(at_pos);
                let first_char: String = local_part.chars().take(1).collect();
                format!("{first_char}***{domain}")
            }
        }
    });

    PiiRegexRegistry::opaque_token()
        .replace_all(&emails_masked, "[REDACTED_TOKEN]")
        .into_owned()
}

/// Display wrapper that redacts an arbitrary string.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

/// Display wrapper for player identities in log fields.
pub struct RedactedPlayer<'a>(pub &'a PlayerId);

impl fmt::Display for RedactedPlayer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&Redacted(self.0.as_str()), f)
    }
}

impl fmt::Debug for RedactedPlayer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
