//! SQLite persistence for challenge days.
//!
//! A single connection sits behind an async mutex. Every request borrows it
//! through [`Store::with_session`], which wraps the work in one transaction.

use crate::calendar::YearMonth;
use crate::models::{DayRecord, NewDayRecord};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension, Row, Transaction};
use std::{fs, path::Path, sync::Arc};
use thiserror::Error;
use tokio::sync::Mutex;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS challenge_days (
    id        INTEGER PRIMARY KEY AUTOINCREMENT,
    year      INTEGER NOT NULL,
    month     INTEGER NOT NULL,
    day       INTEGER NOT NULL,
    completed INTEGER NOT NULL DEFAULT 0,
    UNIQUE (year, month, day)
);
";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("record already exists for {year}-{month:02}-{day:02}")]
    ConstraintViolation { year: i32, month: u32, day: u32 },

    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Clone)]
pub struct Store {
    conn: Arc<Mutex<Connection>>,
}

impl Store {
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Runs `func` inside a transaction: committed when it returns `Ok`,
    /// rolled back otherwise.
    pub async fn with_session<F, T>(&self, func: F) -> StoreResult<T>
    where
        F: FnOnce(&Session<'_>) -> StoreResult<T>,
    {
        let mut conn = self.conn.lock().await;
        let session = Session {
            tx: conn.transaction()?,
        };
        let out = func(&session)?;
        session.tx.commit()?;
        Ok(out)
    }
}

pub struct Session<'conn> {
    tx: Transaction<'conn>,
}

impl Session<'_> {
    pub fn add(&self, record: NewDayRecord) -> StoreResult<DayRecord> {
        let inserted = self.tx.execute(
            "INSERT INTO challenge_days (year, month, day, completed)
             VALUES (?1, ?2, ?3, ?4)",
            params![record.year, record.month, record.day, record.completed],
        );

        match inserted {
            Ok(_) => Ok(DayRecord {
                id: self.tx.last_insert_rowid(),
                year: record.year,
                month: record.month,
                day: record.day,
                completed: record.completed,
            }),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                Err(StoreError::ConstraintViolation {
                    year: record.year,
                    month: record.month,
                    day: record.day,
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Inserts unless the (year, month, day) slot is taken. Returns whether a
    /// row was written.
    pub fn insert_if_absent(&self, record: NewDayRecord) -> StoreResult<bool> {
        let changed = self.tx.execute(
            "INSERT INTO challenge_days (year, month, day, completed)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT (year, month, day) DO NOTHING",
            params![record.year, record.month, record.day, record.completed],
        )?;
        Ok(changed == 1)
    }

    pub fn list_all(&self) -> StoreResult<Vec<DayRecord>> {
        let mut stmt = self.tx.prepare(
            "SELECT id, year, month, day, completed FROM challenge_days
             ORDER BY year, month, day",
        )?;
        let rows = stmt.query_map([], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn list_month(&self, ym: YearMonth) -> StoreResult<Vec<DayRecord>> {
        let mut stmt = self.tx.prepare(
            "SELECT id, year, month, day, completed FROM challenge_days
             WHERE year = ?1 AND month = ?2
             ORDER BY day",
        )?;
        let rows = stmt.query_map(params![ym.year, ym.month], map_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub fn get_one(&self, ym: YearMonth, day: u32) -> StoreResult<Option<DayRecord>> {
        let record = self
            .tx
            .query_row(
                "SELECT id, year, month, day, completed FROM challenge_days
                 WHERE year = ?1 AND month = ?2 AND day = ?3",
                params![ym.year, ym.month, day],
                map_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn save(&self, record: &DayRecord) -> StoreResult<()> {
        self.tx.execute(
            "UPDATE challenge_days SET completed = ?1 WHERE id = ?2",
            params![record.completed, record.id],
        )?;
        Ok(())
    }

    /// Flips `completed` for one day. `None` when the day has no record.
    pub fn toggle(&self, ym: YearMonth, day: u32) -> StoreResult<Option<DayRecord>> {
        let Some(mut record) = self.get_one(ym, day)? else {
            return Ok(None);
        };
        record.completed = !record.completed;
        self.save(&record)?;
        Ok(Some(record))
    }
}

fn map_row(row: &Row) -> rusqlite::Result<DayRecord> {
    Ok(DayRecord {
        id: row.get("id")?,
        year: row.get("year")?,
        month: row.get("month")?,
        day: row.get("day")?,
        completed: row.get("completed")?,
    })
}
