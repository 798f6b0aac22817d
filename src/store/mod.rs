pub mod file;
pub mod leaderboard;
pub mod memory;

use crate::standings::Driver;
use anyhow::Result;

/// Where the driver set for an event lives between runs.
///
/// The leaderboard only ever hands a store complete, already-scored
/// snapshots; stores never compute anything themselves.
pub trait DriverStore {
    fn load(&self) -> Result<Vec<Driver>>;
    fn save(&mut self, drivers: &[Driver]) -> Result<()>;
}

pub use file::{get_data_path, read_import, JsonFileStore, StoreFile, STORE_VERSION};
pub use leaderboard::{EventStats, Leaderboard};
pub use memory::MemoryStore;
