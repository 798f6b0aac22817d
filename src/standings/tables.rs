/// Sprint race points for positions 1-8.
pub const SPRINT_POINTS: [u32; 8] = [10, 8, 6, 5, 4, 3, 2, 1];

/// Feature race points for positions 1-10.
pub const FEATURE_POINTS: [u32; 10] = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];

/// Awarded to every driver matching the fastest lap of the day.
pub const FASTEST_LAP_BONUS: u32 = 1;

/// Look up a 1-based finishing position in a points table.
/// Absent, zero and out-of-table positions score nothing.
pub fn table_points(table: &[u32], position: Option<u32>) -> u32 {
    match position {
        Some(p) if p >= 1 => table.get(p as usize - 1).copied().unwrap_or(0),
        _ => 0,
    }
}

pub fn sprint_points(position: Option<u32>) -> u32 {
    table_points(&SPRINT_POINTS, position)
}

pub fn feature_points(position: Option<u32>) -> u32 {
    table_points(&FEATURE_POINTS, position)
}
