use std::path::Path;

use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::r2d2::{self, ConnectionManager};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use log::info;

use crate::models::{NewUser, User};
use crate::schema::users;

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;
pub type PooledConnection = r2d2::PooledConnection<ConnectionManager<SqliteConnection>>;

/// Errors surfaced by the credential store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The username is already taken. The only store error a handler is
    /// expected to branch on.
    #[error("username already exists")]
    DuplicateUsername,

    /// Failed to check a connection out of the pool.
    #[error("connection pool: {0}")]
    Pool(String),

    /// Any other database failure.
    #[error("database: {0}")]
    Database(#[from] DieselError),

    /// Failed to create the directory holding the database file.
    #[error("storage path: {0}")]
    Io(#[from] std::io::Error),
}

/// Applied to every connection handed out by the pool. WAL lets concurrent
/// writers serialize through the log instead of failing, and busy_timeout
/// makes a second writer queue rather than error while the first commits.
#[derive(Debug)]
struct ConnectionOptions;

impl r2d2::CustomizeConnection<SqliteConnection, r2d2::Error> for ConnectionOptions {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), r2d2::Error> {
        conn.batch_execute(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA busy_timeout = 5000;
             PRAGMA foreign_keys = ON;",
        )
        .map_err(r2d2::Error::QueryError)
    }
}

/// SQLite-backed persistence for user records.
///
/// Constructed once per process and shared by handle; every operation checks
/// its own connection out of the pool and returns it when done.
#[derive(Clone)]
pub struct Store {
    pool: Pool,
}

impl Store {
    /// Open (or create) the credential database at the given path.
    ///
    /// The schema is created on first access if not already present.
    pub fn open<P>(path: P) -> Result<Store, StoreError>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }

        let manager = ConnectionManager::<SqliteConnection>::new(path.to_string_lossy());
        let pool = Pool::builder()
            .connection_customizer(Box::new(ConnectionOptions))
            .build(manager)
            .map_err(|e| StoreError::Pool(e.to_string()))?;

        let store = Store { pool };
        store.conn()?.batch_execute(
            "CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE CHECK (length(username) > 0),
                password_hash TEXT NOT NULL,
                created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
            );",
        )?;
        info!("credential store open at {}", path.display());

        Ok(store)
    }

    fn conn(&self) -> Result<PooledConnection, StoreError> {
        self.pool.get().map_err(|e| StoreError::Pool(e.to_string()))
    }

    /// Total number of user records.
    pub fn count_users(&self) -> Result<i64, StoreError> {
        let mut conn = self.conn()?;
        Ok(users::table.count().get_result(&mut conn)?)
    }

    /// Insert a new user record, or fail with [`StoreError::DuplicateUsername`].
    ///
    /// Uniqueness is enforced by the insert itself, so two concurrent
    /// attempts on the same username cannot both succeed.
    pub fn insert_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut conn = self.conn()?;
        let new_user = NewUser {
            username,
            password_hash,
        };

        diesel::insert_into(users::table)
            .values(&new_user)
            .returning(User::as_returning())
            .get_result(&mut conn)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    StoreError::DuplicateUsername
                }
                other => StoreError::Database(other),
            })
    }

    /// Exact-match lookup. An unknown username is `Ok(None)`, not an error.
    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.conn()?;
        Ok(users::table
            .filter(users::username.eq(username))
            .select(User::as_select())
            .first(&mut conn)
            .optional()?)
    }
}
