mod error;
mod pagination;
pub mod toggle;
pub mod user;

pub use error::*;
pub use pagination::*;

use sqlx::SqlitePool;

/// Explicit storage handle passed to every command and query.
#[derive(Clone)]
pub struct State {
    pub read_db: SqlitePool,
    pub write_db: SqlitePool,
}

impl State {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            read_db: pool.clone(),
            write_db: pool,
        }
    }
}

/// Current unix timestamp in seconds.
pub fn now() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}
