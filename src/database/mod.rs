use rusqlite::Connection;
use std::path::Path;

use crate::error::StorageError;

pub mod queries;
pub mod schema;
pub mod store;

pub use store::{RecordStore, TombstoneQueue};

pub fn init_database(db_path: &Path) -> Result<Connection, StorageError> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(db_path)?;

    // Enable WAL mode
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    schema::create_tables(&conn)?;

    Ok(conn)
}

pub fn init_in_memory() -> Result<Connection, StorageError> {
    let conn = Connection::open_in_memory()?;
    schema::create_tables(&conn)?;
    Ok(conn)
}
