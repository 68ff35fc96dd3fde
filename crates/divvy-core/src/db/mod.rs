//! Database access layer with connection pooling and migrations
//!
//! One domain file so far:
//! - `breakdowns` - Saved receipt breakdown operations
//!
//! The core computation never touches this layer; it hands finished
//! `ReceiptBreakdown` records over and queries them back.

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::info;

use crate::error::Result;

mod breakdowns;


pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Create a new database connection pool and run migrations
    pub fn new(path: &str) -> Result<Self> {
        let manager = SqliteConnectionManager::file(path);
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Note: Uses a temporary file rather than `:memory:` because each
    /// pooled connection would otherwise get its own private database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = format!("/tmp/divvy_test_{}_{}.db", std::process::id(), id);

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path)
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Run database migrations
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: better concurrency, readers don't block writers
            PRAGMA journal_mode = WAL;

            -- Synchronous NORMAL: good balance of safety and performance
            PRAGMA synchronous = NORMAL;

            -- Saved receipt breakdowns, partitioned by owning user.
            -- people_breakdown is a JSON array of per-person shares.
            -- date is canonical YYYY-MM-DD, so TEXT range queries are
            -- equivalent to date range queries.
            CREATE TABLE IF NOT EXISTS breakdowns (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                merchant_name TEXT NOT NULL,
                date TEXT NOT NULL,
                subtotal REAL NOT NULL,
                tax REAL NOT NULL,
                tip REAL,
                total REAL,
                user_paid REAL NOT NULL,
                people_breakdown TEXT NOT NULL,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_breakdowns_user ON breakdowns(user_id);
            CREATE INDEX IF NOT EXISTS idx_breakdowns_user_date ON breakdowns(user_id, date);
            "#,
        )?;

        info!("Database migrations complete");
        Ok(())
    }
}
