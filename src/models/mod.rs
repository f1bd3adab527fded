pub mod entry;
pub mod remote;
pub mod settings;
pub mod storage;
pub mod sync;

pub use entry::*;
pub use remote::*;
pub use settings::*;
pub use storage::*;
pub use sync::*;
