pub mod catalog;
pub mod remote;
pub mod status;
pub mod sync_engine;

pub use catalog::Catalog;
pub use remote::{CloudGateway, InMemoryRemote, RemoteConfig, RemoteStore};
pub use status::StatusIndicator;
pub use sync_engine::SyncEngine;
