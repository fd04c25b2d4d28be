use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use deadpool::managed::{Hook, Pool};
use derive_more::{Deref, DerefMut};
use diesel_async::RunQueryDsl;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, ManagerConfig};

use super::custom_hooks;
use crate::{
    ConnectionPool, PgConfig, PgError, PgResult, PooledConnection, TRACING_TARGET_CLIENT,
    TRACING_TARGET_CONNECTION,
};

/// Connection pool status information.
#[derive(Debug, Clone)]
pub struct PgPoolStatus {
    /// Maximum number of connections in the pool
    pub max_size: usize,
    /// Current number of connections in the pool
    pub size: usize,
    /// Number of available connections
    pub available: usize,
    /// Number of requests waiting for connections
    pub waiting: usize,
}

/// Database client owning the connection pool.
///
/// Cheap to clone; all clones share the same pool.
#[derive(Clone)]
pub struct PgClient {
    inner: Arc<PgClientInner>,
}

struct PgClientInner {
    pool: ConnectionPool,
    config: PgConfig,
}

impl PgClient {
    /// Creates a new database client with the provided configuration.
    ///
    /// Connections are established lazily on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the pool cannot be built.
    #[tracing::instrument(
        skip(config),
        target = TRACING_TARGET_CLIENT,
        fields(database_url = %config.database_url_masked())
    )]
    pub fn new(config: PgConfig) -> PgResult<Self> {
        config.validate()?;
        tracing::info!(target: TRACING_TARGET_CLIENT, "Initializing database client");

        let mut manager_config = ManagerConfig::default();
        manager_config.custom_setup = Box::new(custom_hooks::setup_callback);
        let manager =
            AsyncDieselConnectionManager::new_with_config(&config.postgres_url, manager_config);

        let pool = Pool::builder(manager)
            .max_size(config.postgres_max_connections as usize)
            .wait_timeout(config.connection_timeout())
            .create_timeout(config.connection_timeout())
            .recycle_timeout(config.idle_timeout())
            .runtime(deadpool::Runtime::Tokio1)
            .post_create(Hook::sync_fn(custom_hooks::post_create))
            .pre_recycle(Hook::sync_fn(custom_hooks::pre_recycle))
            .build()
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET_CLIENT, error = %e, "Failed to create connection pool");
                PgError::Unexpected(format!("Failed to build connection pool: {e}").into())
            })?;

        Ok(Self {
            inner: Arc::new(PgClientInner { pool, config }),
        })
    }

    /// Creates a new client and verifies connectivity with `SELECT 1`.
    pub async fn new_with_test(config: PgConfig) -> PgResult<Self> {
        let this = Self::new(config)?;

        #[derive(diesel::QueryableByName)]
        struct ConnectivityTest {
            #[diesel(sql_type = diesel::sql_types::Integer)]
            #[allow(dead_code)]
            result: i32,
        }

        let mut conn = this.get_connection().await?;
        let _: ConnectivityTest = diesel::sql_query("SELECT 1 as result")
            .get_result(&mut **conn)
            .await
            .map_err(|e| {
                tracing::error!(target: TRACING_TARGET_CLIENT, error = %e, "Database connectivity test failed");
                PgError::from(e)
            })?;

        tracing::info!(
            target: TRACING_TARGET_CLIENT,
            max_connections = this.inner.config.postgres_max_connections,
            "Database client initialized"
        );

        Ok(this)
    }

    /// Gets a connection from the pool.
    ///
    /// Waits up to the configured timeout for an available connection.
    pub async fn get_connection(&self) -> PgResult<PgConn> {
        let start = Instant::now();
        let conn = self.inner.pool.get().await.map_err(|e| {
            tracing::error!(
                target: TRACING_TARGET_CONNECTION,
                error = %e,
                elapsed = ?start.elapsed(),
                "Failed to acquire connection from pool"
            );
            PgError::from(e)
        })?;

        let elapsed = start.elapsed();
        if elapsed > Duration::from_millis(100) {
            tracing::warn!(
                target: TRACING_TARGET_CONNECTION,
                elapsed = ?elapsed,
                "Connection acquisition took longer than expected"
            );
        }

        Ok(PgConn::new(conn))
    }

    /// Gets the current pool status.
    #[inline]
    pub fn pool_status(&self) -> PgPoolStatus {
        let status = self.inner.pool.status();
        PgPoolStatus {
            max_size: status.max_size,
            size: status.size,
            available: status.available,
            waiting: status.waiting,
        }
    }

    /// Gets the database configuration used by this client.
    #[inline]
    pub fn config(&self) -> &PgConfig {
        &self.inner.config
    }
}

impl fmt::Debug for PgClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pool_status = self.pool_status();
        f.debug_struct("PgClient")
            .field("database_url", &self.inner.config.database_url_masked())
            .field("pool_max_connections", &pool_status.max_size)
            .field("pool_current_size", &pool_status.size)
            .field("pool_available", &pool_status.available)
            .finish()
    }
}

/// A pooled database connection.
///
/// Implements all repository traits (e.g. [`UserRepository`]) through
/// [`Deref`] to the underlying [`AsyncPgConnection`]. Returned to the pool on drop.
///
/// ```ignore
/// let mut conn = pg_client.get_connection().await?;
/// let user = conn.find_user_by_id(user_id).await?;
/// ```
///
/// [`UserRepository`]: crate::query::UserRepository
/// [`AsyncPgConnection`]: crate::PgConnection
#[derive(Deref, DerefMut)]
pub struct PgConn {
    #[deref]
    #[deref_mut]
    conn: PooledConnection,
}

impl PgConn {
    /// Creates a new connection wrapper from a pooled connection.
    pub fn new(conn: PooledConnection) -> Self {
        Self { conn }
    }

    /// Unwraps the underlying pooled connection.
    pub(crate) fn into_inner(self) -> PooledConnection {
        self.conn
    }
}

impl fmt::Debug for PgConn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PgConn").finish_non_exhaustive()
    }
}
