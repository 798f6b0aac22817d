use super::DriverStore;
use crate::standings::Driver;
use anyhow::Result;

/// Keeps the driver set in process memory. Used by tests and by callers
/// embedding the leaderboard without a file.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    drivers: Vec<Driver>,
    saves: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_drivers(drivers: Vec<Driver>) -> Self {
        Self { drivers, saves: 0 }
    }

    /// The last snapshot that was saved (or the seed set)
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl DriverStore for MemoryStore {
    fn load(&self) -> Result<Vec<Driver>> {
        Ok(self.drivers.clone())
    }

    fn save(&mut self, drivers: &[Driver]) -> Result<()> {
        self.drivers = drivers.to_vec();
        self.saves += 1;
        Ok(())
    }
}
