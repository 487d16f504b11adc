//! End-to-end migration invocation.
//!
//! One action per call: validate the dialect, connect, take the process-wide
//! lock, hand off to the runner, and release everything on every exit path.
//! No retries anywhere; a failed step aborts the action.

use std::fmt;
use std::str::FromStr;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::info;

use crate::config::{Config, ConfigError, Dialect};
use crate::migrations;

/// Serializes migration runs within this process. Cross-process exclusion is
/// the runner's concern (it holds a database-level advisory lock).
static MIGRATION_LOCK: Mutex<()> = Mutex::const_new(());

/// Migration direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Apply all pending migrations.
    Up,
    /// Revert the most recently applied migration.
    Down,
}

impl Action {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Action::Up => "up",
            Action::Down => "down",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Action {
    type Err = MigrateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Action::Up),
            "down" => Ok(Action::Down),
            other => Err(MigrateError::InvalidAction(other.to_string())),
        }
    }
}

/// Errors that can occur while running a migration action.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Unrecognized action token; rejected before anything is opened
    #[error("invalid migration action {0:?} (expected \"up\" or \"down\")")]
    InvalidAction(String),

    /// Connection URL or dialect could not be resolved from configuration
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Initial connection to the database failed
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    /// Database error outside of migration execution
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The runner reported a migration failure; partial-failure semantics
    /// are the runner's
    #[error("migration failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Run one migration action end to end.
///
/// The pool is closed and the lock released on every exit path, success or
/// failure.
pub async fn run(action: Action, config: &Config) -> Result<(), MigrateError> {
    let url = config.database.connection_url()?;
    let dialect = Dialect::for_url(&url)?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&url)
        .await
        .map_err(MigrateError::Connect)?;
    info!(
        host = %config.database.host,
        database = %config.database.name,
        "connected to database"
    );

    let result = run_locked(action, dialect, &pool).await;
    pool.close().await;
    result
}

async fn run_locked(action: Action, dialect: Dialect, pool: &PgPool) -> Result<(), MigrateError> {
    let _guard = MIGRATION_LOCK.lock().await;
    info!(action = %action, dialect = dialect.as_str(), "running migrations");

    match action {
        Action::Up => migrations::run_up(pool).await,
        Action::Down => migrations::run_down(pool).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_parses_the_two_directions() {
        assert_eq!("up".parse::<Action>().unwrap(), Action::Up);
        assert_eq!("down".parse::<Action>().unwrap(), Action::Down);
    }

    #[test]
    fn unrecognized_tokens_are_rejected() {
        for token in ["sideways", "UP", "Down", "", "up "] {
            let err = token.parse::<Action>().unwrap_err();
            assert!(
                matches!(err, MigrateError::InvalidAction(ref t) if t == token),
                "token {token:?} should be rejected"
            );
        }
    }

    #[test]
    fn action_displays_as_its_token() {
        assert_eq!(Action::Up.to_string(), "up");
        assert_eq!(Action::Down.to_string(), "down");
    }
}
