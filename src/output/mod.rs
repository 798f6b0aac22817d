pub mod formatter;

pub use formatter::{
    format_driver_detail, format_leaderboard, format_optional_time, format_race, format_stats,
    format_time, format_tsv, parse_time, should_use_colors,
};
