//! Database connection helpers.
//!
//! Besides the pool itself this module owns [`SharedTransaction`], the
//! connection that mutating requests keep checked out while their
//! transaction is open.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use diesel::connection::{AnsiTransactionManager, SimpleConnection, TransactionManager};
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PoolError, PooledConnection};
use diesel::sqlite::SqliteConnection;
use log::error;

use crate::repository::errors::{RepositoryError, RepositoryResult};

pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

#[derive(Debug)]
/// Options that are applied each time a connection is acquired from the pool.
pub struct ConnectionOptions {
    /// Enable Write Ahead Logging mode for SQLite.
    pub enable_wal: bool,
    /// Enforce foreign key checks for SQLite.
    pub enable_foreign_keys: bool,
    /// Timeout to wait for a locked database.
    pub busy_timeout: Option<Duration>,
}

impl Default for ConnectionOptions {
    fn default() -> Self {
        Self {
            enable_wal: true,
            enable_foreign_keys: true,
            busy_timeout: Some(Duration::from_secs(30)),
        }
    }
}

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        let mut pragmas = String::new();
        if self.enable_wal {
            pragmas.push_str("PRAGMA journal_mode = WAL; PRAGMA synchronous = NORMAL;");
        }
        if self.enable_foreign_keys {
            pragmas.push_str("PRAGMA foreign_keys = ON;");
        }
        if let Some(timeout) = self.busy_timeout {
            pragmas.push_str(&format!("PRAGMA busy_timeout = {};", timeout.as_millis()));
        }
        if pragmas.is_empty() {
            return Ok(());
        }
        conn.batch_execute(&pragmas)
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// Create a Diesel connection pool for the given database URL.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .connection_customizer(Box::new(ConnectionOptions::default()))
        .build(manager)
}

/// Retrieve a connection from the pool
pub fn get_connection(pool: &DbPool) -> Result<DbConnection, PoolError> {
    pool.get().inspect_err(|e| error!("Failed to get connection from pool: {e}"))
}

type SqliteTransactionManager = AnsiTransactionManager;

/// Pooled connection held inside an open transaction for one request.
///
/// Clones share the same connection; whoever owns the request lifecycle
/// calls [`SharedTransaction::commit`] or [`SharedTransaction::rollback`]
/// exactly once.
#[derive(Clone)]
pub struct SharedTransaction(Arc<Mutex<DbConnection>>);

impl SharedTransaction {
    pub fn begin(pool: &DbPool) -> RepositoryResult<Self> {
        let mut conn = get_connection(pool)?;
        <SqliteTransactionManager as TransactionManager<SqliteConnection>>::begin_transaction(
            &mut *conn,
        )?;
        Ok(Self(Arc::new(Mutex::new(conn))))
    }

    pub fn lock(&self) -> RepositoryResult<MutexGuard<'_, DbConnection>> {
        self.0
            .lock()
            .map_err(|_| RepositoryError::Connection("transaction lock poisoned".to_string()))
    }

    pub fn commit(&self) -> RepositoryResult<()> {
        let mut conn = self.lock()?;
        <SqliteTransactionManager as TransactionManager<SqliteConnection>>::commit_transaction(
            &mut **conn,
        )?;
        Ok(())
    }

    pub fn rollback(&self) -> RepositoryResult<()> {
        let mut conn = self.lock()?;
        <SqliteTransactionManager as TransactionManager<SqliteConnection>>::rollback_transaction(
            &mut **conn,
        )?;
        Ok(())
    }
}
