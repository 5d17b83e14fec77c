//! SQLite backed counter store
//!
//! One row per entity in `counts`, keyed by the entity's four identity columns. Several processes
//! may share one database file; WAL mode and a busy timeout keep them from tripping over each
//! other's locks. It does not stop them from overwriting each other's counts, see `counter`.
use std::path::Path;
use std::time::Duration;
use rusqlite::{Connection, OptionalExtension, params};
use errors::*;
use entity::CountedEntity;
use store::CounterStore;

const BUSY_TIMEOUT_SECS: u64 = 30;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open (or create) the database at `path`
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                ::std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path.as_ref())?;
        let store = SqliteStore::init(conn)?;
        info!("Counting into {}", path.as_ref().display());
        Ok(store)
    }

    /// A private database that vanishes with the connection
    pub fn in_memory() -> Result<Self> {
        SqliteStore::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        // journal_mode answers with the mode it ended up in
        let mode: String = conn.query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        debug!("SQLite journal mode is {}", mode);
        conn.busy_timeout(Duration::from_secs(BUSY_TIMEOUT_SECS))?;
        conn.execute(
            "CREATE TABLE IF NOT EXISTS counts (
                kind TEXT NOT NULL,
                lhs TEXT NOT NULL,
                rhs TEXT NOT NULL,
                label TEXT NOT NULL,
                count INTEGER NOT NULL,
                PRIMARY KEY (kind, lhs, rhs, label)
            )",
            [],
        )?;
        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_kind_count ON counts(kind, count DESC)",
            [],
        )?;
        Ok(SqliteStore { conn: conn })
    }

    /// The `limit` largest counters of one kind, largest first
    pub fn top(&self, kind: &str, limit: usize) -> Result<Vec<(CountedEntity, u64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT lhs, rhs, label, count FROM counts
             WHERE kind = ?1
             ORDER BY count DESC, lhs, rhs, label
             LIMIT ?2")?;
        let rows = stmt.query_map(params![kind, limit as i64], |row| {
            Ok((row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)?))
        })?;
        let mut out = vec![];
        for row in rows {
            let (lhs, rhs, label, count) = row?;
            out.push((CountedEntity::from_columns(kind, &lhs, &rhs, &label)?, count as u64));
        }
        Ok(out)
    }

    /// How many distinct entities of one kind have been counted
    pub fn distinct(&self, kind: &str) -> Result<u64> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM counts WHERE kind = ?1",
            params![kind],
            |row| row.get(0))?;
        Ok(n as u64)
    }
}

impl CounterStore for SqliteStore {
    fn fetch(&mut self, entity: &CountedEntity) -> Result<Option<u64>> {
        let (kind, lhs, rhs, label) = entity.columns();
        let mut stmt = self.conn.prepare_cached(
            "SELECT count FROM counts WHERE kind = ?1 AND lhs = ?2 AND rhs = ?3 AND label = ?4")?;
        let count: Option<i64> = stmt
            .query_row(params![kind, lhs, rhs, label], |row| row.get(0))
            .optional()?;
        Ok(count.map(|c| c as u64))
    }

    fn persist(&mut self, entity: &CountedEntity, count: u64) -> Result<()> {
        let (kind, lhs, rhs, label) = entity.columns();
        let mut stmt = self.conn.prepare_cached(
            "INSERT INTO counts (kind, lhs, rhs, label, count) VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(kind, lhs, rhs, label) DO UPDATE SET count = excluded.count")?;
        stmt.execute(params![kind, lhs, rhs, label, count as i64])?;
        Ok(())
    }
}
