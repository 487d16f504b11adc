//! Embedded database migrations.
//!
//! The SQL file set under `migrations/` is compiled into the binary by
//! `sqlx::migrate!`; the applied-version ledger (`_sqlx_migrations`) lives in
//! the target database and is owned by the sqlx migrator, which also takes a
//! database-level advisory lock for the duration of a run.

use sqlx::migrate::{Migrate, Migrator};
use sqlx::PgPool;
use tracing::info;

use crate::migrate::MigrateError;

// No-argument form embeds the crate-root `migrations/` directory.
static MIGRATOR: Migrator = sqlx::migrate!();

/// Apply all pending migrations in version order.
pub async fn run_up(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("migrations applied");
    Ok(())
}

/// Revert the most recently applied migration (one step).
///
/// A revert with nothing applied is a successful no-op, so repeating the
/// backward action past an empty ledger stays idempotent.
pub async fn run_down(pool: &PgPool) -> Result<(), MigrateError> {
    let applied = {
        let mut conn = pool.acquire().await?;
        conn.ensure_migrations_table().await?;
        conn.list_applied_migrations().await?
    };

    let mut versions: Vec<i64> = applied.iter().map(|m| m.version).collect();
    versions.sort_unstable();

    let Some(latest) = versions.pop() else {
        info!("no migrations applied; nothing to revert");
        return Ok(());
    };
    let target = versions.pop().unwrap_or(0);

    MIGRATOR.undo(pool, target).await?;
    info!(reverted = latest, "migration reverted");
    Ok(())
}
