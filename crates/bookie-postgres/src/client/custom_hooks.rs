//! Callbacks and hooks for [`diesel`] and [`deadpool`].

use std::time::Instant;

use deadpool::managed::{HookResult, Metrics};
use diesel::ConnectionResult;
use diesel_async::pooled_connection::{PoolError, PoolableConnection};
use diesel_async::{AsyncConnection, AsyncPgConnection};
use futures::FutureExt;
use futures::future::BoxFuture;

use super::PgConfig;
use crate::{TRACING_TARGET_CONNECTION, TRACING_TARGET_MIGRATION};

/// Establishes a new connection, logging the masked address and latency.
///
/// See [`ManagerConfig`] for more details.
///
/// [`ManagerConfig`]: diesel_async::pooled_connection::ManagerConfig
pub fn setup_callback<C>(addr: &str) -> BoxFuture<'_, ConnectionResult<C>>
where
    C: AsyncConnection + 'static,
{
    let start = Instant::now();
    let masked_addr = PgConfig::mask_url(addr);

    async move {
        let result = C::establish(addr).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => tracing::info!(
                target: TRACING_TARGET_CONNECTION,
                hook = "setup_callback",
                addr = %masked_addr,
                elapsed_ms = elapsed.as_millis(),
                "Database connection established"
            ),
            Err(err) => tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                hook = "setup_callback",
                addr = %masked_addr,
                elapsed_ms = elapsed.as_millis(),
                error = %err,
                "Failed to establish database connection"
            ),
        }

        result
    }
    .boxed()
}

/// Called after a new connection has been added to the pool.
pub fn post_create(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    if conn.is_broken() {
        tracing::warn!(
            target: TRACING_TARGET_CONNECTION,
            hook = "post_create",
            created_at = ?metrics.created,
            "Connection is broken after creation"
        );
    }

    Ok(())
}

/// Called before a connection is handed out again.
pub fn pre_recycle(conn: &mut AsyncPgConnection, metrics: &Metrics) -> HookResult<PoolError> {
    let is_broken = conn.is_broken();

    tracing::debug!(
        target: TRACING_TARGET_CONNECTION,
        hook = "pre_recycle",
        is_broken = is_broken,
        recycle_count = metrics.recycle_count,
        "Preparing to recycle connection"
    );

    Ok(())
}

/// Logs connection health right before migrations run.
pub async fn pre_migrate(conn: &mut AsyncPgConnection) {
    if conn.is_broken() {
        tracing::error!(
            target: TRACING_TARGET_MIGRATION,
            hook = "pre_migrate",
            "Connection is broken before migrations, migrations may fail"
        );
    }
}
