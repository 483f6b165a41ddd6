use crate::config::DatabaseConfig;
use crate::db::schema::SQLITE_INIT;
use crate::error::NaviconomyError;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Pool, Sqlite, Transaction};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

pub type SqlitePool = Pool<Sqlite>;

/// One transactional boundary around a single logical operation.
pub type UnitOfWork = Transaction<'static, Sqlite>;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Owner of the process-wide connection pool.
///
/// Created once by [`Database::init`] and released by [`Database::shutdown`];
/// clones share the same pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect the pool with the configured bounds and create missing tables.
    pub async fn init(cfg: &DatabaseConfig) -> Result<Self, NaviconomyError> {
        let connect_opts = SqliteConnectOptions::from_str(cfg.url.as_str())?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(cfg.max_connections)
            .min_connections(cfg.min_connections)
            .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
            .connect_with(connect_opts)
            .await?;

        let db = Self::new(pool);
        db.init_schema().await?;
        info!(
            max_connections = cfg.max_connections,
            min_connections = cfg.min_connections,
            "database pool initialized"
        );
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), NaviconomyError> {
        // sqlx::query runs a single statement at a time
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Borrow a connection and open a transaction on it.
    ///
    /// Waits for a free connection when the pool is exhausted. Dropping the
    /// returned unit of work without [`Database::finish`] rolls it back.
    pub async fn begin(&self) -> Result<UnitOfWork, NaviconomyError> {
        debug!("opening unit of work");
        Ok(self.pool.begin().await?)
    }

    /// Open a unit of work that will write.
    ///
    /// Takes the write lock up front (`BEGIN IMMEDIATE`); concurrent writers
    /// queue on `busy_timeout`.
    pub async fn begin_write(&self) -> Result<UnitOfWork, NaviconomyError> {
        debug!("opening write unit of work");
        Ok(self.pool.begin_with("BEGIN IMMEDIATE").await?)
    }

    /// Commit on success, roll back on failure, and return the connection.
    pub async fn finish<T>(
        &self,
        tx: UnitOfWork,
        result: Result<T, NaviconomyError>,
    ) -> Result<T, NaviconomyError> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                debug!("unit of work committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(e) = tx.rollback().await {
                    warn!(error = %e, "rollback failed");
                } else {
                    debug!("unit of work rolled back");
                }
                Err(err)
            }
        }
    }

    /// Close every pooled connection. Pending acquisitions fail afterwards.
    pub async fn shutdown(&self) {
        self.pool.close().await;
        info!("database pool closed");
    }
}

/// True when the storage engine rejected a write on a UNIQUE constraint.
pub fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Database;
    use crate::config::DatabaseConfig;
    use tempfile::TempDir;

    /// Fresh database in a temporary directory; keep the dir alive with the pool.
    pub(crate) async fn database() -> (Database, TempDir) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let cfg = DatabaseConfig {
            url: format!("sqlite:{}", dir.path().join("naviconomy.sqlite").display()),
            max_connections: 4,
            ..DatabaseConfig::default()
        };
        let db = Database::init(&cfg).await.expect("failed to init database");
        (db, dir)
    }
}
