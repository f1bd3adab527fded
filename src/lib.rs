//! Offline-first prompt catalog.
//!
//! Entries live in a local SQLite store and are reconciled with a remote
//! table on demand: push sends local edits and deletes, pull replaces the
//! local store with the remote snapshot.

pub mod cli;
pub mod commands;
pub mod database;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

pub use error::{CatalogError, GatewayError, StorageError, SyncError, SyncStep};
