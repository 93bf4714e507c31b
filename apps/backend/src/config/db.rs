use std::env;
use std::str::FromStr;

use crate::errors::domain::DomainError;

/// Which database backend to connect to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbKind {
    Postgres,
    /// SQLite on disk, path from `NEUTRINO_SQLITE_PATH`.
    SqliteFile,
    /// Private in-memory SQLite; lives as long as its single pooled connection.
    SqliteMemory,
}

impl DbKind {
    pub fn is_sqlite(self) -> bool {
        !matches!(self, DbKind::Postgres)
    }
}

impl FromStr for DbKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" => Ok(DbKind::Postgres),
            "sqlite-file" => Ok(DbKind::SqliteFile),
            "sqlite-memory" => Ok(DbKind::SqliteMemory),
            other => Err(DomainError::config(format!(
                "unsupported database kind '{other}' (expected postgres, sqlite-file or sqlite-memory)"
            ))),
        }
    }
}

/// Builds a connection URL for `kind` from environment variables.
pub fn db_url(kind: DbKind) -> Result<String, DomainError> {
    match kind {
        DbKind::Postgres => {
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db_name = must_var("NEUTRINO_DB")?;
            let username = must_var("APP_DB_USER")?;
            let password = must_var("APP_DB_PASSWORD")?;
            Ok(format!(
                "postgresql://{username}:{password}@{host}:{port}/{db_name}"
            ))
        }
        DbKind::SqliteFile => {
            let path = must_var("NEUTRINO_SQLITE_PATH")?;
            Ok(format!("sqlite://{path}?mode=rwc"))
        }
        DbKind::SqliteMemory => Ok("sqlite::memory:".to_string()),
    }
}

/// Mask the password in a connection URL for logging.
pub fn sanitize_db_url(url: &str) -> String {
    let Some((auth_part, host_part)) = url.rsplit_once('@') else {
        return url.to_string();
    };
    match auth_part.rfind(':') {
        Some(colon_pos) if !auth_part[colon_pos + 1..].starts_with("//") => {
            format!("{}:***@{host_part}", &auth_part[..colon_pos])
        }
        _ => url.to_string(),
    }
}

fn must_var(name: &str) -> Result<String, DomainError> {
    env::var(name)
        .map_err(|_| DomainError::config(format!("Required environment variable '{name}' is not set")))
}
