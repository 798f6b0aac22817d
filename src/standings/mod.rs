pub mod engine;
pub mod tables;
pub mod types;

pub use engine::{
    compute_standings, fastest_lap_of_day, holds_fastest_lap, points_breakdown, rank_standings,
    PointsBreakdown,
};
pub use tables::{feature_points, sprint_points, FASTEST_LAP_BONUS, FEATURE_POINTS, SPRINT_POINTS};
pub use types::{Driver, RaceResult};
