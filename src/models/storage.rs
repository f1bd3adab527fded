use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageStats {
    pub entries_count: i64,
    pub dirty_count: i64,
    pub pending_deletes: i64,
    /// Estimated payload size: the sum of each entry's JSON length.
    pub total_size_bytes: i64,
}
