// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistent storage.
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use actee_core::{ActorKindError, IdentityError};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection, SqlitePool, migrate};
use thiserror::Error;
use tokio::sync::{Mutex, OwnedSemaphorePermit, Semaphore};
use tracing::{debug, trace};

use crate::traits::Store;

/// Opens (and if needed creates) a SQLite database and brings its schema up to date.
///
/// Defaults to a single connection to a private in-memory database. File databases should allow
/// more connections, otherwise reads outside of an open transaction wait for it to finish.
pub struct SqliteStoreBuilder {
    url: String,
    max_connections: u32,
}

impl Default for SqliteStoreBuilder {
    fn default() -> Self {
        Self {
            url: "sqlite::memory:".into(),
            max_connections: 1,
        }
    }
}

impl SqliteStoreBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Private in-memory database with a random name.
    ///
    /// Every connection opens its own private database, keep `max_connections` at 1 with this.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn random_memory_url(mut self) -> Self {
        // See related issue: https://github.com/launchbadge/sqlx/issues/2510
        self.url = format!(
            "sqlite://dbmem{}?mode=memory&cache=private",
            rand::random::<u32>()
        );
        self
    }

    pub fn database_url(mut self, url: &str) -> Self {
        self.url = url.to_string();
        self
    }

    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub async fn build(self) -> Result<SqliteStore, SqliteError> {
        // Write-ahead logging lets pool readers see the last committed state while a
        // transaction is open on another connection.
        let options = SqliteConnectOptions::from_str(&self.url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal);

        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await?;

        migrate!().run(&pool).await?;
        debug!(url = %self.url, "ran pending sqlite migrations");

        Ok(SqliteStore::new(pool))
    }
}

pub type SqliteTransaction = sqlx::Transaction<'static, Sqlite>;

/// The one open transaction of a store together with the id of the permit owning it.
#[derive(Debug)]
struct OpenTransaction {
    id: u64,
    tx: SqliteTransaction,
}

/// SQLite database with connection pool and transaction provider.
///
/// Handles are cheap to clone and share the pool. Only one transaction can be open at a time,
/// `begin` waits until the current holder of the `TransactionPermit` commits or rolls back.
///
/// An open transaction is only visible through handles scoped to its permit (see
/// [`SqliteStore::scoped`]):
///
/// - Writes (granting roles, creating actors, ..) need a scoped handle and fail with
///   `SqliteError::TransactionMissing` otherwise.
/// - Reads of a scoped handle see the uncommitted changes of its transaction, all other reads
///   run on the pool and only ever see committed data.
///
/// A permission check and the mutation depending on it are placed into one atomic unit of work
/// by running both through the same scoped handle.
#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    open: Arc<Mutex<Option<OpenTransaction>>>,
    semaphore: Arc<Semaphore>,
    next_id: Arc<AtomicU64>,
    scope: Option<u64>,
}

impl SqliteStore {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            open: Arc::default(),
            // SQLite only ever allows _one_ writing transaction at a time.
            semaphore: Arc::new(Semaphore::new(1)),
            next_id: Arc::default(),
            scope: None,
        }
    }

    /// Shortcut building an in-memory SQLite database with a randomised name for testing purposes.
    #[cfg(any(test, feature = "test_utils"))]
    pub async fn temporary() -> Self {
        SqliteStoreBuilder::new()
            .random_memory_url()
            .max_connections(1)
            .build()
            .await
            .expect("migrations succeeded")
    }

    /// Handle which reads and writes through the transaction held by `permit`.
    ///
    /// Clones of the returned handle keep the scope. Once the transaction is committed or rolled
    /// back the handle behaves like an unscoped one again.
    pub fn scoped(&self, permit: &TransactionPermit) -> Self {
        Self {
            scope: Some(permit.id),
            ..self.clone()
        }
    }

    /// Execute SQL query within the transaction this handle is scoped to.
    ///
    /// Fails with `SqliteError::TransactionMissing` when the handle is unscoped or its
    /// transaction has ended. A failed query does not roll back the transaction, this is up to
    /// the permit holder.
    pub async fn tx<F, R>(&self, f: F) -> Result<R, SqliteError>
    where
        F: AsyncFnOnce(&mut SqliteConnection) -> Result<R, SqliteError>,
    {
        let mut open = self.open.lock().await;
        match open.as_mut() {
            Some(current) if self.scope == Some(current.id) => f(&mut *current.tx).await,
            _ => Err(SqliteError::TransactionMissing),
        }
    }

    /// Execute read-only SQL query.
    ///
    /// Runs inside the transaction of a scoped handle, on the pool otherwise.
    pub async fn read<F, R>(&self, f: F) -> Result<R, SqliteError>
    where
        F: AsyncFnOnce(&mut SqliteConnection) -> Result<R, SqliteError>,
    {
        if self.scope.is_some() {
            let mut open = self.open.lock().await;
            match open.as_mut() {
                Some(current) if self.scope == Some(current.id) => {
                    return f(&mut *current.tx).await;
                }
                _ => (),
            }
        }

        let mut connection = self.pool.acquire().await?;
        f(&mut *connection).await
    }

    async fn finish(&self, permit: &TransactionPermit) -> Result<SqliteTransaction, SqliteError> {
        let mut open = self.open.lock().await;
        match open.take() {
            Some(current) if current.id == permit.id => Ok(current.tx),
            other => {
                *open = other;
                Err(SqliteError::TransactionMissing)
            }
        }
    }
}

impl Store for SqliteStore {
    type Error = SqliteError;
}

impl crate::traits::Transaction for SqliteStore {
    type Error = SqliteError;

    type Permit = TransactionPermit;

    /// Begins a transaction, waiting for the current one to finish first.
    async fn begin(&self) -> Result<TransactionPermit, SqliteError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore is never closed");

        let abandoned = self.open.lock().await.take();
        if let Some(abandoned) = abandoned {
            trace!(id = abandoned.id, "rolling back abandoned transaction");
            abandoned.tx.rollback().await?;
        }

        let tx = self.pool.begin().await?;
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.open.lock().await.replace(OpenTransaction { id, tx });
        trace!(id, "began transaction");

        Ok(TransactionPermit { id, _permit: permit })
    }

    async fn rollback(&self, permit: TransactionPermit) -> Result<(), SqliteError> {
        let tx = self.finish(&permit).await?;
        let result = tx.rollback().await.map_err(SqliteError::Sqlite);
        trace!(id = permit.id, ok = result.is_ok(), "rolled back transaction");
        result
    }

    async fn commit(&self, permit: TransactionPermit) -> Result<(), SqliteError> {
        let tx = self.finish(&permit).await?;
        let result = tx.commit().await.map_err(SqliteError::Sqlite);
        trace!(id = permit.id, ok = result.is_ok(), "committed transaction");
        result
    }
}

/// Proof of holding the one open transaction of a `SqliteStore`. Dropping it without commit or
/// rollback lets the next `begin` proceed, the abandoned transaction is rolled back then.
#[derive(Debug)]
pub struct TransactionPermit {
    id: u64,
    _permit: OwnedSemaphorePermit,
}

#[derive(Debug, Error)]
pub enum SqliteError {
    /// Writes need a handle scoped to an open transaction, see `SqliteStore::scoped`.
    #[error("no transaction open for this store handle")]
    TransactionMissing,

    /// SQLite database and connection error.
    #[error(transparent)]
    Sqlite(#[from] sqlx::Error),

    /// SQL table schema migration error.
    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    /// Invalid, corrupted data was found in the database. This is a critical error.
    #[error("could not decode corrupted '{0}' value from database: {1}")]
    Decode(String, DecodeError),
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    ActorKind(#[from] ActorKindError),

    #[error("negative timestamp {0}")]
    Timestamp(i64),
}

/// Timestamps are stored as signed integers in SQLite.
pub(crate) fn decode_timestamp(value: i64) -> Result<u64, SqliteError> {
    u64::try_from(value)
        .map_err(|_| SqliteError::Decode("timestamp".into(), DecodeError::Timestamp(value)))
}

/// Builds a `?, ?, ?` placeholder list for `IN` clauses.
pub(crate) fn placeholders(len: usize) -> String {
    vec!["?"; len].join(", ")
}

#[cfg(test)]
mod tests {
    use std::task::Poll;

    use futures_test::task::noop_context;
    use sqlx::{query, query_as};
    use tokio::pin;

    use crate::sqlite::{SqliteError, SqliteStore, SqliteStoreBuilder, placeholders};
    use crate::traits::Transaction;

    async fn count_actees(store: &SqliteStore) -> i64 {
        store
            .read(async |conn| {
                let row: (i64,) = query_as("SELECT COUNT(*) FROM actees_v1")
                    .fetch_one(&mut *conn)
                    .await?;
                Ok(row.0)
            })
            .await
            .unwrap()
    }

    async fn insert_actee(store: &SqliteStore, id: &str) -> Result<(), SqliteError> {
        store
            .tx(async |conn| {
                query("INSERT INTO actees_v1 (id, kind) VALUES (?, 'form')")
                    .bind(id)
                    .execute(&mut *conn)
                    .await?;
                Ok(())
            })
            .await
    }

    #[test]
    fn in_clause_placeholders() {
        assert_eq!(placeholders(1), "?");
        assert_eq!(placeholders(3), "?, ?, ?");
    }

    #[tokio::test]
    async fn writes_require_scoped_transaction() {
        let store = SqliteStore::temporary().await;

        assert!(matches!(
            insert_actee(&store, "f1").await,
            Err(SqliteError::TransactionMissing)
        ));

        // Reads work without transaction.
        assert_eq!(count_actees(&store).await, 0);

        let permit = store.begin().await.unwrap();

        // .. attempting to start a second one should make us wait.
        assert!(matches!(
            {
                let fut = store.begin();
                let mut cx = noop_context();
                pin!(fut);
                fut.poll(&mut cx)
            },
            Poll::Pending
        ));

        // The handle which began the transaction is not scoped to it.
        assert!(matches!(
            insert_actee(&store, "f1").await,
            Err(SqliteError::TransactionMissing)
        ));

        let scoped = store.scoped(&permit);
        insert_actee(&scoped, "f1").await.unwrap();
        assert_eq!(count_actees(&scoped).await, 1);
        assert_eq!(count_actees(&scoped.clone()).await, 1);

        store.rollback(permit).await.unwrap();

        assert_eq!(count_actees(&scoped).await, 0);
        assert!(matches!(
            insert_actee(&scoped, "f1").await,
            Err(SqliteError::TransactionMissing)
        ));

        // A new transaction is not reachable through the scope of an old permit.
        let permit = store.begin().await.unwrap();
        assert!(matches!(
            insert_actee(&scoped, "f1").await,
            Err(SqliteError::TransactionMissing)
        ));
        insert_actee(&store.scoped(&permit), "f2").await.unwrap();
        store.commit(permit).await.unwrap();
        assert_eq!(count_actees(&store).await, 1);
    }

    #[tokio::test]
    async fn unscoped_reads_only_see_committed_data() {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}", dir.path().join("auth.sqlite").display());
        let store = SqliteStoreBuilder::new()
            .database_url(&url)
            .max_connections(2)
            .build()
            .await
            .unwrap();

        let permit = store.begin().await.unwrap();
        insert_actee(&store.scoped(&permit), "f1").await.unwrap();
        store.commit(permit).await.unwrap();

        let permit = store.begin().await.unwrap();
        let scoped = store.scoped(&permit);
        insert_actee(&scoped, "f2").await.unwrap();

        // Another handle reads from the pool while the transaction is still open.
        let other = store.clone();
        assert_eq!(count_actees(&other).await, 1);
        assert_eq!(count_actees(&scoped).await, 2);

        store.rollback(permit).await.unwrap();
        assert_eq!(count_actees(&other).await, 1);
        assert_eq!(count_actees(&scoped).await, 1);
    }

    #[tokio::test]
    async fn dropped_permit_rolls_back() {
        let store = SqliteStore::temporary().await;

        let permit = store.begin().await.unwrap();
        insert_actee(&store.scoped(&permit), "f1").await.unwrap();
        drop(permit);

        let permit = store.begin().await.unwrap();
        assert_eq!(count_actees(&store.scoped(&permit)).await, 0);
        store.commit(permit).await.unwrap();
    }
}
