use super::DriverStore;
use crate::buffered_eprintln;
use crate::standings::{compute_standings, fastest_lap_of_day, rank_standings, Driver};
use anyhow::{bail, Result};
use std::collections::HashSet;

/// Header counters for an event
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventStats {
    pub total_drivers: usize,
    pub completed_sprints: usize,
    pub completed_features: usize,
}

/// The driver set of one event, always scored and ranked.
///
/// Every mutation rescores the whole set, sorts it by points and writes the
/// full snapshot to the store before the in-memory copy is replaced, so
/// a failed save leaves the leaderboard as it was.
pub struct Leaderboard<S: DriverStore> {
    store: S,
    drivers: Vec<Driver>,
}

impl<S: DriverStore> Leaderboard<S> {
    /// Load the event from `store`, dropping records whose identifier repeats
    /// an earlier one, then score and rank.
    pub fn open(store: S) -> Result<Self> {
        let loaded = store.load()?;
        let drivers = rescore(dedup_ids(loaded));
        Ok(Self { store, drivers })
    }

    /// Drivers in rank order
    pub fn drivers(&self) -> &[Driver] {
        &self.drivers
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn get(&self, id: &str) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    pub fn fastest_lap_of_day(&self) -> Option<f64> {
        fastest_lap_of_day(&self.drivers)
    }

    pub fn stats(&self) -> EventStats {
        EventStats {
            total_drivers: self.drivers.len(),
            completed_sprints: self
                .drivers
                .iter()
                .filter(|d| d.sprint_race.classified_position().is_some())
                .count(),
            completed_features: self
                .drivers
                .iter()
                .filter(|d| d.feature_race.classified_position().is_some())
                .count(),
        }
    }

    /// Find a driver by 1-based rank, full identifier or unique identifier prefix.
    /// Returns the 1-based rank along with the driver.
    pub fn resolve(&self, target: &str) -> Result<(usize, &Driver)> {
        let target = target.trim();
        if target.is_empty() {
            bail!("No driver given");
        }

        if let Some(idx) = self.drivers.iter().position(|d| d.id == target) {
            return Ok((idx + 1, &self.drivers[idx]));
        }

        if let Ok(rank) = target.parse::<usize>() {
            if rank >= 1 && rank <= self.drivers.len() {
                return Ok((rank, &self.drivers[rank - 1]));
            }
        }

        let matches: Vec<usize> = self
            .drivers
            .iter()
            .enumerate()
            .filter(|(_, d)| d.id.starts_with(target))
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [idx] => Ok((idx + 1, &self.drivers[*idx])),
            [] => {
                if self.drivers.is_empty() {
                    bail!("No driver matches '{}': the leaderboard is empty", target)
                }
                bail!(
                    "No driver matches '{}'. Use a position between 1 and {} or a driver id.",
                    target,
                    self.drivers.len()
                )
            }
            many => bail!(
                "'{}' matches {} drivers; give more of the id",
                target,
                many.len()
            ),
        }
    }

    /// Add a new driver. Returns the stored, scored record.
    pub fn add(&mut self, driver: Driver) -> Result<Driver> {
        if self.get(&driver.id).is_some() {
            bail!("A driver with id {} already exists", driver.id);
        }
        let id = driver.id.clone();
        let mut next = self.drivers.clone();
        next.push(driver);
        self.commit(next)?;
        self.scored(&id)
    }

    /// Replace the driver with the same identifier, keeping its slot.
    pub fn update(&mut self, driver: Driver) -> Result<Driver> {
        let Some(idx) = self.drivers.iter().position(|d| d.id == driver.id) else {
            bail!("No driver with id {}", driver.id);
        };
        let id = driver.id.clone();
        let mut next = self.drivers.clone();
        next[idx] = driver;
        self.commit(next)?;
        self.scored(&id)
    }

    /// Remove a driver by identifier and return it as it was before removal.
    pub fn remove(&mut self, id: &str) -> Result<Driver> {
        let Some(idx) = self.drivers.iter().position(|d| d.id == id) else {
            bail!("No driver with id {}", id);
        };
        let mut next = self.drivers.clone();
        let removed = next.remove(idx);
        self.commit(next)?;
        Ok(removed)
    }

    /// Replace the whole set. Returns how many drivers were kept.
    pub fn replace_all(&mut self, drivers: Vec<Driver>) -> Result<usize> {
        self.commit(dedup_ids(drivers))?;
        Ok(self.drivers.len())
    }

    /// Upsert by identifier. Returns (added, updated).
    pub fn merge(&mut self, drivers: Vec<Driver>) -> Result<(usize, usize)> {
        let mut next = self.drivers.clone();
        let mut added = 0;
        let mut updated = 0;

        for driver in dedup_ids(drivers) {
            if let Some(existing) = next.iter_mut().find(|d| d.id == driver.id) {
                *existing = driver;
                updated += 1;
            } else {
                next.push(driver);
                added += 1;
            }
        }

        self.commit(next)?;
        Ok((added, updated))
    }

    /// Remove every driver. Returns how many were removed.
    pub fn clear(&mut self) -> Result<usize> {
        let count = self.drivers.len();
        self.commit(Vec::new())?;
        Ok(count)
    }

    fn commit(&mut self, drivers: Vec<Driver>) -> Result<()> {
        let ranked = rescore(drivers);
        self.store.save(&ranked)?;
        self.drivers = ranked;
        Ok(())
    }

    fn scored(&self, id: &str) -> Result<Driver> {
        match self.get(id) {
            Some(driver) => Ok(driver.clone()),
            None => bail!("Driver {} missing after save", id),
        }
    }
}

fn rescore(drivers: Vec<Driver>) -> Vec<Driver> {
    rank_standings(compute_standings(&drivers))
}

fn dedup_ids(drivers: Vec<Driver>) -> Vec<Driver> {
    let mut seen = HashSet::new();
    drivers
        .into_iter()
        .filter(|d| {
            if seen.insert(d.id.clone()) {
                true
            } else {
                buffered_eprintln!(
                    "Warning: skipping driver '{}': id {} is already in use",
                    d.name,
                    d.id
                );
                false
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::standings::RaceResult;
    use crate::store::MemoryStore;

    fn sample_driver(id: &str, sprint_pos: Option<u32>, feature_pos: Option<u32>) -> Driver {
        Driver {
            id: id.to_string(),
            name: format!("Driver {}", id),
            qualifying_time: None,
            sprint_race: RaceResult {
                laps: 6,
                total_time: 180.0,
                position: sprint_pos,
            },
            feature_race: RaceResult {
                laps: 12,
                total_time: 360.0,
                position: feature_pos,
            },
            fastest_lap: None,
            total_points: 0,
        }
    }

    fn assert_consistent(board: &Leaderboard<MemoryStore>) {
        // Totals match a fresh computation and the set is ranked
        let fresh = compute_standings(board.drivers());
        assert_eq!(fresh, board.drivers());
        assert!(board
            .drivers()
            .windows(2)
            .all(|w| w[0].total_points >= w[1].total_points));
        assert_eq!(board.store().drivers(), board.drivers());
    }

    #[test]
    fn test_open_rescores_loaded_drivers() {
        let mut stale = sample_driver("a", Some(1), None);
        stale.total_points = 77;
        let store = MemoryStore::with_drivers(vec![sample_driver("b", None, Some(1)), stale]);

        let board = Leaderboard::open(store).unwrap();
        assert_eq!(board.drivers()[0].id, "b");
        assert_eq!(board.drivers()[0].total_points, 25);
        assert_eq!(board.drivers()[1].total_points, 10);
        assert_eq!(board.store().save_count(), 0);
    }

    #[test]
    fn test_open_drops_duplicate_ids() {
        crate::stderr_buffer::activate();
        let store = MemoryStore::with_drivers(vec![
            sample_driver("a", Some(1), None),
            sample_driver("a", Some(2), None),
        ]);
        let board = Leaderboard::open(store).unwrap();
        let warnings = crate::stderr_buffer::drain();

        assert_eq!(board.len(), 1);
        assert_eq!(board.drivers()[0].sprint_race.position, Some(1));
        assert!(warnings.iter().any(|w| w.contains("id a is already in use")));
    }

    #[test]
    fn test_add_scores_and_ranks() {
        let mut board = Leaderboard::open(MemoryStore::new()).unwrap();
        board.add(sample_driver("a", Some(3), None)).unwrap();
        let added = board.add(sample_driver("b", Some(1), Some(1))).unwrap();

        assert_eq!(added.total_points, 35);
        assert_eq!(board.drivers()[0].id, "b");
        assert_eq!(board.store().save_count(), 2);
        assert_consistent(&board);
    }

    #[test]
    fn test_add_duplicate_rejected() {
        let mut board = Leaderboard::open(MemoryStore::new()).unwrap();
        board.add(sample_driver("a", None, None)).unwrap();
        assert!(board.add(sample_driver("a", Some(1), None)).is_err());
        assert_eq!(board.len(), 1);
        assert_eq!(board.store().save_count(), 1);
    }

    #[test]
    fn test_update_keeps_id_and_rescores_everyone() {
        let mut a = sample_driver("a", None, None);
        a.fastest_lap = Some(30.0);
        let mut b = sample_driver("b", None, None);
        b.fastest_lap = Some(31.0);
        let mut board = Leaderboard::open(MemoryStore::with_drivers(vec![a, b])).unwrap();
        assert_eq!(board.get("a").unwrap().total_points, 1);

        // b takes the fastest lap; a loses the bonus without being edited
        let mut edited = board.get("b").unwrap().clone();
        edited.fastest_lap = Some(29.5);
        let updated = board.update(edited).unwrap();

        assert_eq!(updated.id, "b");
        assert_eq!(updated.total_points, 1);
        assert_eq!(board.get("a").unwrap().total_points, 0);
        assert_consistent(&board);
    }

    #[test]
    fn test_update_unknown_fails() {
        let mut board = Leaderboard::open(MemoryStore::new()).unwrap();
        assert!(board.update(sample_driver("zz", None, None)).is_err());
        assert_eq!(board.store().save_count(), 0);
    }

    #[test]
    fn test_remove_last_driver_persists_empty_set() {
        let store = MemoryStore::with_drivers(vec![sample_driver("a", Some(1), None)]);
        let mut board = Leaderboard::open(store).unwrap();

        let removed = board.remove("a").unwrap();
        assert_eq!(removed.id, "a");
        assert!(board.is_empty());
        assert_eq!(board.store().save_count(), 1);
        assert!(board.store().drivers().is_empty());
    }

    #[test]
    fn test_remove_restores_bonus_elsewhere() {
        let mut a = sample_driver("a", None, None);
        a.fastest_lap = Some(25.0);
        let mut b = sample_driver("b", None, None);
        b.fastest_lap = Some(26.0);
        let mut board = Leaderboard::open(MemoryStore::with_drivers(vec![a, b])).unwrap();

        board.remove("a").unwrap();
        assert_eq!(board.get("b").unwrap().total_points, 1);
        assert_consistent(&board);
    }

    #[test]
    fn test_resolve_by_rank_and_id() {
        let store = MemoryStore::with_drivers(vec![
            sample_driver("alpha-1", None, Some(2)),
            sample_driver("bravo-2", None, Some(1)),
        ]);
        let board = Leaderboard::open(store).unwrap();

        let (rank, driver) = board.resolve("1").unwrap();
        assert_eq!((rank, driver.id.as_str()), (1, "bravo-2"));

        let (rank, driver) = board.resolve("alpha").unwrap();
        assert_eq!((rank, driver.id.as_str()), (2, "alpha-1"));

        let (rank, _) = board.resolve("bravo-2").unwrap();
        assert_eq!(rank, 1);

        assert!(board.resolve("3").is_err());
        assert!(board.resolve("charlie").is_err());
        assert!(board.resolve("").is_err());
    }

    #[test]
    fn test_resolve_ambiguous_prefix() {
        let store = MemoryStore::with_drivers(vec![
            sample_driver("abc1", None, None),
            sample_driver("abc2", None, None),
        ]);
        let board = Leaderboard::open(store).unwrap();
        let err = board.resolve("abc").unwrap_err();
        assert!(err.to_string().contains("matches 2 drivers"));
    }

    #[test]
    fn test_stats_ignore_zero_positions() {
        let store = MemoryStore::with_drivers(vec![
            sample_driver("a", Some(1), Some(2)),
            sample_driver("b", Some(0), Some(1)),
            sample_driver("c", None, None),
        ]);
        let board = Leaderboard::open(store).unwrap();
        assert_eq!(
            board.stats(),
            EventStats {
                total_drivers: 3,
                completed_sprints: 1,
                completed_features: 2,
            }
        );
    }

    #[test]
    fn test_merge_upserts() {
        let store = MemoryStore::with_drivers(vec![sample_driver("a", None, None)]);
        let mut board = Leaderboard::open(store).unwrap();

        let (added, updated) = board
            .merge(vec![
                sample_driver("a", Some(1), None),
                sample_driver("b", None, Some(1)),
            ])
            .unwrap();

        assert_eq!((added, updated), (1, 1));
        assert_eq!(board.get("a").unwrap().total_points, 10);
        assert_eq!(board.get("b").unwrap().total_points, 25);
        assert_consistent(&board);
    }

    #[test]
    fn test_replace_all_and_clear() {
        let store = MemoryStore::with_drivers(vec![sample_driver("a", None, None)]);
        let mut board = Leaderboard::open(store).unwrap();

        let kept = board
            .replace_all(vec![
                sample_driver("x", Some(2), None),
                sample_driver("y", Some(1), None),
            ])
            .unwrap();
        assert_eq!(kept, 2);
        assert!(board.get("a").is_none());
        assert_consistent(&board);

        assert_eq!(board.clear().unwrap(), 2);
        assert!(board.store().drivers().is_empty());
    }
}
