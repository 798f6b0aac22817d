use super::tables::{feature_points, sprint_points, FASTEST_LAP_BONUS};
use super::types::Driver;

/// Points earned by one driver, split by source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PointsBreakdown {
    pub sprint: u32,
    pub feature: u32,
    pub fastest_lap_bonus: u32,
}

impl PointsBreakdown {
    pub fn total(&self) -> u32 {
        self.sprint + self.feature + self.fastest_lap_bonus
    }
}

/// Minimum fastest lap across the event, ignoring absent and non-positive values.
/// `None` means nobody is eligible for the bonus.
pub fn fastest_lap_of_day(drivers: &[Driver]) -> Option<f64> {
    drivers
        .iter()
        .filter_map(|d| d.fastest_lap)
        .filter(|&lap| lap > 0.0)
        .min_by(|a, b| a.total_cmp(b))
}

/// Whether the driver's lap equals the event's fastest. Ties all qualify.
pub fn holds_fastest_lap(driver: &Driver, fastest_of_day: Option<f64>) -> bool {
    match (driver.fastest_lap, fastest_of_day) {
        (Some(lap), Some(best)) => lap > 0.0 && lap == best,
        _ => false,
    }
}

pub fn points_breakdown(driver: &Driver, fastest_of_day: Option<f64>) -> PointsBreakdown {
    PointsBreakdown {
        sprint: sprint_points(driver.sprint_race.position),
        feature: feature_points(driver.feature_race.position),
        fastest_lap_bonus: if holds_fastest_lap(driver, fastest_of_day) {
            FASTEST_LAP_BONUS
        } else {
            0
        },
    }
}

/// Recompute total points for every driver in the event.
///
/// Returns a fresh vector in the input order; only `total_points` differs
/// from the input. The input's own `total_points` values are never read,
/// so applying this to its own output is a no-op.
pub fn compute_standings(drivers: &[Driver]) -> Vec<Driver> {
    let fastest = fastest_lap_of_day(drivers);

    drivers
        .iter()
        .map(|driver| Driver {
            total_points: points_breakdown(driver, fastest).total(),
            ..driver.clone()
        })
        .collect()
}

/// Sort by total points descending. The sort is stable and has no tie-break:
/// drivers level on points keep their prior relative order.
pub fn rank_standings(mut drivers: Vec<Driver>) -> Vec<Driver> {
    drivers.sort_by(|a, b| b.total_points.cmp(&a.total_points));
    drivers
}
