//! Embedded schema migrations.

use std::future::Future;
use std::time::{Duration, Instant};

use diesel_async::async_connection_wrapper::AsyncConnectionWrapper;
use diesel_migrations::MigrationHarness;
use tokio::task::spawn_blocking;

use super::custom_hooks;
use crate::{MIGRATIONS, PgClient, PgError, PgResult, PooledConnection, TRACING_TARGET_MIGRATION};

/// Outcome of a migration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Total duration of the migration operation.
    pub duration: Duration,
    /// Versions applied by this run, in order.
    pub processed_versions: Vec<String>,
}

impl MigrationResult {
    /// Returns whether the schema was already up to date.
    #[inline]
    pub fn is_no_op(&self) -> bool {
        self.processed_versions.is_empty()
    }
}

/// Extension trait adding migration support to [`PgClient`].
pub trait PgClientMigrationExt {
    /// Applies all pending embedded migrations.
    ///
    /// Safe to call repeatedly; an up-to-date schema is a no-op.
    fn run_pending_migrations(&self) -> impl Future<Output = PgResult<MigrationResult>> + Send;
}

impl PgClientMigrationExt for PgClient {
    async fn run_pending_migrations(&self) -> PgResult<MigrationResult> {
        run_pending_migrations(self).await
    }
}

#[tracing::instrument(skip(pg), target = TRACING_TARGET_MIGRATION)]
async fn run_pending_migrations(pg: &PgClient) -> PgResult<MigrationResult> {
    tracing::info!(target: TRACING_TARGET_MIGRATION, "Starting database migration process");

    let start_time = Instant::now();
    let mut conn = pg.get_connection().await?.into_inner();
    custom_hooks::pre_migrate(&mut conn).await;

    let mut conn: AsyncConnectionWrapper<PooledConnection> = conn.into();
    let results = spawn_blocking(move || {
        conn.run_pending_migrations(MIGRATIONS).map(|versions| {
            versions
                .into_iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
        })
    })
    .await;

    let duration = start_time.elapsed();
    let versions = results
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                duration = ?duration,
                error = %err,
                "Migration task panicked"
            );

            PgError::Migration(err.into())
        })?
        .map_err(|err| {
            tracing::error!(
                target: TRACING_TARGET_MIGRATION,
                duration = ?duration,
                error = %err,
                "Database migration process failed"
            );

            PgError::Migration(err)
        })?;

    tracing::info!(
        target: TRACING_TARGET_MIGRATION,
        duration = ?duration,
        migrations_count = versions.len(),
        "Database migration process completed"
    );

    Ok(MigrationResult {
        duration,
        processed_versions: versions,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_is_no_op() {
        let result = MigrationResult {
            duration: Duration::from_millis(5),
            processed_versions: vec![],
        };
        assert!(result.is_no_op());
    }
}
