use rusqlite::Connection;

use crate::error::StorageError;

pub fn create_tables(conn: &Connection) -> Result<(), StorageError> {
    // Live catalog entries
    conn.execute(
        "CREATE TABLE IF NOT EXISTS entries (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            body TEXT NOT NULL,
            category TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            negative_body TEXT,
            primary_media_ref TEXT,
            secondary_media_ref TEXT,
            is_video INTEGER,
            created_at TEXT NOT NULL,
            owner_ref TEXT,
            dirty INTEGER NOT NULL DEFAULT 1
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_entries_dirty ON entries(dirty)",
        [],
    )?;

    // Local deletes not yet confirmed by the remote store
    conn.execute(
        "CREATE TABLE IF NOT EXISTS deleted_queue (
            id TEXT PRIMARY KEY,
            deleted_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}
