use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::StorageError;
use crate::models::{CatalogEntry, Tombstone};

const ENTRY_COLUMNS: &str = "id, title, body, category, tags, negative_body, primary_media_ref,
                             secondary_media_ref, is_video, created_at, owner_ref, dirty";

fn entry_from_row(row: &Row) -> rusqlite::Result<CatalogEntry> {
    let tags_json: String = row.get(4)?;
    let tags = serde_json::from_str(&tags_json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(4, Type::Text, Box::new(e)))?;

    Ok(CatalogEntry {
        id: row.get(0)?,
        title: row.get(1)?,
        body: row.get(2)?,
        category: row.get(3)?,
        tags,
        negative_body: row.get(5)?,
        primary_media_ref: row.get(6)?,
        secondary_media_ref: row.get(7)?,
        is_video_hint: row.get(8)?,
        created_at: row.get(9)?,
        owner_ref: row.get(10)?,
        dirty: row.get(11)?,
    })
}

pub fn get_all_entries(conn: &Connection) -> Result<Vec<CatalogEntry>, StorageError> {
    let mut stmt = conn.prepare(&format!("SELECT {} FROM entries", ENTRY_COLUMNS))?;

    let entries = stmt
        .query_map([], entry_from_row)?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(entries)
}

pub fn get_entry(conn: &Connection, id: &str) -> Result<Option<CatalogEntry>, StorageError> {
    let entry = conn
        .query_row(
            &format!("SELECT {} FROM entries WHERE id = ?1", ENTRY_COLUMNS),
            [id],
            entry_from_row,
        )
        .optional()?;

    Ok(entry)
}

/// Insert or replace by id with the given dirty flag.
///
/// An existing row keeps its `created_at` and `owner_ref`.
pub fn write_entry(conn: &Connection, entry: &CatalogEntry, dirty: bool) -> Result<(), StorageError> {
    let tags = serde_json::to_string(&entry.tags).map_err(|source| StorageError::Tags {
        id: entry.id.clone(),
        source,
    })?;

    conn.execute(
        &format!(
            "INSERT INTO entries ({})
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
             ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                body = excluded.body,
                category = excluded.category,
                tags = excluded.tags,
                negative_body = excluded.negative_body,
                primary_media_ref = excluded.primary_media_ref,
                secondary_media_ref = excluded.secondary_media_ref,
                is_video = excluded.is_video,
                dirty = excluded.dirty",
            ENTRY_COLUMNS
        ),
        params![
            entry.id,
            entry.title,
            entry.body,
            entry.category,
            tags,
            entry.negative_body,
            entry.primary_media_ref,
            entry.secondary_media_ref,
            entry.is_video_hint,
            entry.created_at,
            entry.owner_ref,
            dirty,
        ],
    )?;

    Ok(())
}

pub fn set_clean(conn: &Connection, id: &str) -> Result<usize, StorageError> {
    Ok(conn.execute("UPDATE entries SET dirty = 0 WHERE id = ?1", [id])?)
}

pub fn delete_entry(conn: &Connection, id: &str) -> Result<usize, StorageError> {
    Ok(conn.execute("DELETE FROM entries WHERE id = ?1", [id])?)
}

pub fn clear_entries(conn: &Connection) -> Result<usize, StorageError> {
    Ok(conn.execute("DELETE FROM entries", [])?)
}

pub fn count_entries(conn: &Connection, dirty_only: bool) -> Result<i64, StorageError> {
    let sql = if dirty_only {
        "SELECT COUNT(*) FROM entries WHERE dirty = 1"
    } else {
        "SELECT COUNT(*) FROM entries"
    };
    Ok(conn.query_row(sql, [], |row| row.get(0))?)
}

/// Record a local delete. A repeated delete of the same id replaces the earlier tombstone.
pub fn put_tombstone(conn: &Connection, id: &str, deleted_at: DateTime<Utc>) -> Result<(), StorageError> {
    conn.execute(
        "INSERT INTO deleted_queue (id, deleted_at) VALUES (?1, ?2)
         ON CONFLICT(id) DO UPDATE SET deleted_at = excluded.deleted_at",
        params![id, deleted_at],
    )?;
    Ok(())
}

pub fn delete_tombstone(conn: &Connection, id: &str) -> Result<usize, StorageError> {
    Ok(conn.execute("DELETE FROM deleted_queue WHERE id = ?1", [id])?)
}

pub fn has_tombstone(conn: &Connection, id: &str) -> Result<bool, StorageError> {
    let found = conn
        .query_row("SELECT 1 FROM deleted_queue WHERE id = ?1", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

pub fn get_tombstones(conn: &Connection) -> Result<Vec<Tombstone>, StorageError> {
    let mut stmt = conn.prepare("SELECT id, deleted_at FROM deleted_queue ORDER BY deleted_at")?;

    let tombstones = stmt
        .query_map([], |row| {
            Ok(Tombstone {
                id: row.get(0)?,
                deleted_at: row.get(1)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(tombstones)
}

pub fn count_tombstones(conn: &Connection) -> Result<i64, StorageError> {
    Ok(conn.query_row("SELECT COUNT(*) FROM deleted_queue", [], |row| row.get(0))?)
}

pub fn clear_tombstones(conn: &Connection) -> Result<usize, StorageError> {
    Ok(conn.execute("DELETE FROM deleted_queue", [])?)
}
