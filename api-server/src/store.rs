use std::{
    fs,
    path::Path,
    sync::Mutex,
    time::{SystemTime, UNIX_EPOCH},
};

use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

pub(crate) fn now_unix_s() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PayoutRecord {
    pub(crate) payout_id: Uuid,
    pub(crate) user_id: String,
    pub(crate) amount: u32,
    pub(crate) created_at_unix_s: u64,
    pub(crate) settled_at_unix_s: Option<u64>,
    pub(crate) last_error: Option<String>,
}

/// SQLite-backed ledger of payouts the house owes players. Every accrued
/// payout is written here before the transfer attempt; rows that never get
/// marked settled are the manual-reconciliation queue.
pub(crate) struct PayoutStore {
    conn: Mutex<Connection>,
}

impl PayoutStore {
    pub(crate) fn open(data_dir: &Path) -> Result<Self, String> {
        fs::create_dir_all(data_dir)
            .map_err(|e| format!("failed to create data dir {}: {e}", data_dir.display()))?;

        let db_path = data_dir.join("payouts.db");
        let conn = Connection::open(&db_path)
            .map_err(|e| format!("failed to open SQLite at {}: {e}", db_path.display()))?;

        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;
             PRAGMA synchronous=NORMAL;",
        )
        .map_err(|e| format!("failed to set pragmas: {e}"))?;

        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS payouts (
                payout_id   TEXT PRIMARY KEY,
                user_id     TEXT NOT NULL,
                amount      INTEGER NOT NULL,
                created_at  INTEGER NOT NULL,
                settled_at  INTEGER,
                last_error  TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_payouts_settled_at ON payouts(settled_at);",
        )
        .map_err(|e| format!("failed to create schema: {e}"))?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Record that `amount` is owed to `user_id` before any transfer runs.
    pub(crate) fn record_owed(&self, user_id: &str, amount: u32) -> Result<Uuid, String> {
        let payout_id = Uuid::new_v4();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO payouts (payout_id, user_id, amount, created_at) VALUES (?1,?2,?3,?4)",
            params![
                payout_id.to_string(),
                user_id,
                amount as i64,
                now_unix_s() as i64
            ],
        )
        .map_err(|e| format!("record payout failed: {e}"))?;
        Ok(payout_id)
    }

    pub(crate) fn mark_settled(&self, payout_id: Uuid) -> Result<(), String> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE payouts SET settled_at = ?1, last_error = NULL WHERE payout_id = ?2",
            params![now_unix_s() as i64, payout_id.to_string()],
        )
        .map_err(|e| format!("settle payout failed: {e}"))?;
        Ok(())
    }

    pub(crate) fn mark_failed(&self, payout_id: Uuid, error: &str) -> Result<(), String> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE payouts SET last_error = ?1 WHERE payout_id = ?2",
            params![error, payout_id.to_string()],
        )
        .map_err(|e| format!("mark payout failed: {e}"))?;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn get(&self, payout_id: Uuid) -> Result<Option<PayoutRecord>, String> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT payout_id, user_id, amount, created_at, settled_at, last_error
             FROM payouts WHERE payout_id = ?1",
            params![payout_id.to_string()],
            row_to_record,
        )
        .optional()
        .map_err(|e| format!("get payout failed: {e}"))
    }

    /// Rows still owed, oldest first.
    pub(crate) fn unsettled(&self) -> Result<Vec<PayoutRecord>, String> {
        let conn = self.conn.lock().unwrap();
        let mut statement = conn
            .prepare(
                "SELECT payout_id, user_id, amount, created_at, settled_at, last_error
                 FROM payouts WHERE settled_at IS NULL ORDER BY created_at ASC",
            )
            .map_err(|e| format!("prepare unsettled failed: {e}"))?;

        let rows = statement
            .query_map([], row_to_record)
            .map_err(|e| format!("query unsettled failed: {e}"))?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row.map_err(|e| format!("read unsettled row failed: {e}"))?);
        }
        Ok(records)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<PayoutRecord> {
    let payout_id: String = row.get(0)?;
    Ok(PayoutRecord {
        payout_id: Uuid::parse_str(&payout_id).unwrap_or_default(),
        user_id: row.get(1)?,
        amount: row.get::<_, i64>(2)? as u32,
        created_at_unix_s: row.get::<_, i64>(3)? as u64,
        settled_at_unix_s: row.get::<_, Option<i64>>(4)?.map(|v| v as u64),
        last_error: row.get(5)?,
    })
}
