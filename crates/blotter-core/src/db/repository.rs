//! Sync queue repository implementation

use crate::error::{Error, Result};
use crate::models::{NewQueueItem, SyncAction, SyncQueueItem, MAX_RETRIES};
use rusqlite::{params, Connection};

const ITEM_COLUMNS: &str =
    "id, entity_type, entity_id, action, data, retry_count, last_error, created_at, synced";

/// Trait for sync queue storage operations
pub trait SyncQueueRepository {
    /// Insert a new pending item with `retry_count = 0`
    fn enqueue(&self, item: &NewQueueItem) -> Result<SyncQueueItem>;

    /// Get an item by ID
    fn get(&self, id: i64) -> Result<Option<SyncQueueItem>>;

    /// List undelivered items in queue read order (ascending id)
    fn list_pending(&self) -> Result<Vec<SyncQueueItem>>;

    /// Count undelivered rows
    fn count(&self) -> Result<usize>;

    /// Flag an item as delivered; it is removed by `delete_synced`
    fn mark_synced(&self, id: i64) -> Result<()>;

    /// Persist a new retry count and the error that caused it
    fn record_retry(&self, id: i64, retry_count: u32, error: &str) -> Result<()>;

    /// Remove an item outright
    fn delete(&self, id: i64) -> Result<()>;

    /// Remove every delivered item, returning how many were removed
    fn delete_synced(&self) -> Result<usize>;

    /// Remove every item, returning how many were removed
    fn clear(&self) -> Result<usize>;
}

/// `SQLite` implementation of `SyncQueueRepository`
pub struct SqliteSyncQueueRepository<'a> {
    conn: &'a Connection,
}

impl<'a> SqliteSyncQueueRepository<'a> {
    /// Create a new repository with the given connection
    pub const fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Parse a queue item from a database row
    fn parse_item(row: &rusqlite::Row<'_>) -> rusqlite::Result<SyncQueueItem> {
        let id: i64 = row.get(0)?;
        let stored_action: String = row.get(3)?;
        // Delivery always goes through the create endpoint, so a corrupt action is not fatal
        let action = stored_action.parse().unwrap_or_else(|error| {
            tracing::warn!(item_id = id, "Treating queue item as CREATE: {error}");
            SyncAction::Create
        });
        Ok(SyncQueueItem {
            id,
            entity_type: row.get(1)?,
            entity_id: row.get(2)?,
            action,
            data: row.get(4)?,
            retry_count: row.get(5)?,
            last_error: row.get(6)?,
            created_at: row.get(7)?,
            synced: row.get::<_, i32>(8)? != 0,
        })
    }
}

impl SyncQueueRepository for SqliteSyncQueueRepository<'_> {
    fn enqueue(&self, item: &NewQueueItem) -> Result<SyncQueueItem> {
        let created_at = chrono::Utc::now().timestamp_millis();

        self.conn.execute(
            "INSERT INTO sync_queue (entity_type, entity_id, action, data, retry_count, created_at, synced)
             VALUES (?, ?, ?, ?, 0, ?, 0)",
            params![
                item.entity_type,
                item.entity_id,
                item.action.as_str(),
                item.data,
                created_at
            ],
        )?;

        Ok(SyncQueueItem {
            id: self.conn.last_insert_rowid(),
            entity_type: item.entity_type.clone(),
            entity_id: item.entity_id.clone(),
            action: item.action,
            data: item.data.clone(),
            retry_count: 0,
            last_error: None,
            created_at,
            synced: false,
        })
    }

    fn get(&self, id: i64) -> Result<Option<SyncQueueItem>> {
        let result = self.conn.query_row(
            &format!("SELECT {ITEM_COLUMNS} FROM sync_queue WHERE id = ?"),
            params![id],
            Self::parse_item,
        );

        match result {
            Ok(item) => Ok(Some(item)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn list_pending(&self) -> Result<Vec<SyncQueueItem>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ITEM_COLUMNS} FROM sync_queue WHERE synced = 0 ORDER BY id ASC"
        ))?;

        let items = stmt
            .query_map([], Self::parse_item)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(items)
    }

    fn count(&self) -> Result<usize> {
        let count: usize = self
            .conn
            .query_row("SELECT COUNT(*) FROM sync_queue WHERE synced = 0", [], |row| {
                row.get(0)
            })?;
        Ok(count)
    }

    fn mark_synced(&self, id: i64) -> Result<()> {
        let rows = self
            .conn
            .execute("UPDATE sync_queue SET synced = 1 WHERE id = ?", params![id])?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn record_retry(&self, id: i64, retry_count: u32, error: &str) -> Result<()> {
        if retry_count > MAX_RETRIES {
            return Err(Error::InvalidInput(format!(
                "retry count {retry_count} exceeds maximum of {MAX_RETRIES}"
            )));
        }

        let rows = self.conn.execute(
            "UPDATE sync_queue SET retry_count = ?, last_error = ? WHERE id = ?",
            params![retry_count, error, id],
        )?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete(&self, id: i64) -> Result<()> {
        let rows = self
            .conn
            .execute("DELETE FROM sync_queue WHERE id = ?", params![id])?;

        if rows == 0 {
            return Err(Error::NotFound(id.to_string()));
        }
        Ok(())
    }

    fn delete_synced(&self) -> Result<usize> {
        Ok(self
            .conn
            .execute("DELETE FROM sync_queue WHERE synced = 1", [])?)
    }

    fn clear(&self) -> Result<usize> {
        Ok(self.conn.execute("DELETE FROM sync_queue", [])?)
    }
}
