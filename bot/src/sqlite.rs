use anyhow::Context;
use chipjar_execution::{GiftWrite, Store, StoreError};
use chipjar_types::{UserId, UserRecord};
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::{
    path::Path,
    sync::{Arc, Mutex, PoisonError},
    time::Duration,
};

/// How long a writer waits for another process holding the database lock.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed [`Store`].
///
/// Every mutation runs in an `IMMEDIATE` transaction, so the read-compare-write of a daily gift
/// is serialized against other connections (including other processes sharing the file).
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("open user store at {}", path.display()))?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory user store")?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> anyhow::Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)
            .context("set user store busy timeout")?;
        init_schema_sqlite(&conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    async fn with_conn<T, F>(&self, op: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = conn.lock().unwrap_or_else(PoisonError::into_inner);
            op(&mut conn)
        })
        .await
        .map_err(|err| StoreError::Unavailable(format!("store task failed: {err}")))?
    }
}

fn init_schema_sqlite(conn: &Connection) -> anyhow::Result<()> {
    conn.execute_batch(
        "PRAGMA journal_mode=WAL;
         PRAGMA synchronous=NORMAL;
         CREATE TABLE IF NOT EXISTS users (
             user_id TEXT PRIMARY KEY,
             balance INTEGER NOT NULL DEFAULT 0,
             last_gift_ms INTEGER
         );",
    )
    .context("init user store schema")?;
    Ok(())
}

fn unavailable(err: rusqlite::Error) -> StoreError {
    StoreError::Unavailable(err.to_string())
}

fn to_sql(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

fn from_sql(column: &str, value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Corrupt(format!("negative {column}: {value}")))
}

fn load_user(conn: &Connection, user: &str) -> Result<UserRecord, StoreError> {
    let row = conn
        .query_row(
            "SELECT balance, last_gift_ms FROM users WHERE user_id = ?1",
            params![user],
            |row| Ok((row.get::<_, i64>(0)?, row.get::<_, Option<i64>>(1)?)),
        )
        .optional()
        .map_err(unavailable)?;
    let Some((balance, last_gift_ms)) = row else {
        return Ok(UserRecord::default());
    };
    Ok(UserRecord {
        balance: from_sql("balance", balance)?,
        last_gift_ms: last_gift_ms
            .map(|ms| from_sql("last_gift_ms", ms))
            .transpose()?,
    })
}

fn save_user(conn: &Connection, user: &str, record: &UserRecord) -> Result<(), StoreError> {
    conn.execute(
        "INSERT INTO users (user_id, balance, last_gift_ms) VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id) DO UPDATE SET
             balance = excluded.balance,
             last_gift_ms = excluded.last_gift_ms",
        params![
            user,
            to_sql(record.balance),
            record.last_gift_ms.map(to_sql)
        ],
    )
    .map_err(unavailable)?;
    Ok(())
}

/// Balances are capped at what an SQLite integer holds.
fn credit(balance: u64, amount: u64) -> u64 {
    balance.saturating_add(amount).min(i64::MAX as u64)
}

impl Store for SqliteStore {
    async fn user(&self, user: &UserId) -> Result<UserRecord, StoreError> {
        let user = user.as_str().to_string();
        self.with_conn(move |conn| load_user(conn, &user)).await
    }

    async fn credit_balance(&self, user: &UserId, amount: u64) -> Result<u64, StoreError> {
        let user = user.as_str().to_string();
        self.with_conn(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(unavailable)?;
            let mut record = load_user(&tx, &user)?;
            record.balance = credit(record.balance, amount);
            save_user(&tx, &user, &record)?;
            tx.commit().map_err(unavailable)?;
            Ok(record.balance)
        })
        .await
    }

    async fn credit_and_set_gift_time(
        &self,
        user: &UserId,
        amount: u64,
        expected_last_ms: Option<u64>,
        now_ms: u64,
    ) -> Result<GiftWrite, StoreError> {
        let user = user.as_str().to_string();
        self.with_conn(move |conn| {
            let tx = conn
                .transaction_with_behavior(TransactionBehavior::Immediate)
                .map_err(unavailable)?;
            let mut record = load_user(&tx, &user)?;
            if record.last_gift_ms != expected_last_ms {
                // Dropping the transaction rolls it back.
                return Ok(GiftWrite::Conflict);
            }
            record.balance = credit(record.balance, amount);
            record.last_gift_ms = Some(now_ms);
            save_user(&tx, &user, &record)?;
            tx.commit().map_err(unavailable)?;
            Ok(GiftWrite::Applied {
                balance: record.balance,
            })
        })
        .await
    }
}
