use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;

/// An r2d2 connection pool over SQLite.
pub type DbPool = Pool<ConnectionManager<SqliteConnection>>;

/// Builds the connection pool for the given database URL.
///
/// Panics if the pool cannot be constructed; there is nothing useful the
/// server can do without storage.
pub fn init_pool(database_url: &str) -> DbPool {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    Pool::builder()
        .build(manager)
        .expect("Failed to create pool.")
}
