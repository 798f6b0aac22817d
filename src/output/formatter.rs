use std::io::IsTerminal;

use anyhow::{bail, Context, Result};
use owo_colors::OwoColorize;
use terminal_size::{terminal_size, Width};

use crate::standings::{holds_fastest_lap, points_breakdown, Driver, RaceResult};
use crate::store::EventStats;

const EMPTY_MESSAGE: &str =
    "No drivers yet. Add your first driver to start building the leaderboard!";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format seconds as a lap/race time.
///
/// "--" for zero or missing, "S.mmm" under a minute, "M:SS.mmm" otherwise.
/// Rounds to whole milliseconds first so 59.9996 becomes "1:00.000".
pub fn format_time(seconds: f64) -> String {
    if seconds.is_nan() || seconds.is_infinite() || seconds <= 0.0 {
        return "--".to_string();
    }

    let total_ms = (seconds * 1000.0).round() as u64;
    let mins = total_ms / 60_000;
    let secs = (total_ms % 60_000) / 1000;
    let millis = total_ms % 1000;

    if mins > 0 {
        format!("{}:{:02}.{:03}", mins, secs, millis)
    } else {
        format!("{}.{:03}", secs, millis)
    }
}

pub fn format_optional_time(seconds: Option<f64>) -> String {
    seconds.map(format_time).unwrap_or_else(|| "--".to_string())
}

/// Parse a time typed by the user: "M:SS.mmm" or plain seconds.
/// Empty input and "--" mean no time (0).
pub fn parse_time(input: &str) -> Result<f64> {
    let s = input.trim();
    if s.is_empty() || s == "--" {
        return Ok(0.0);
    }

    match s.split_once(':') {
        Some((mins, secs)) => {
            let mins: u32 = mins
                .trim()
                .parse()
                .with_context(|| format!("Invalid time '{}': bad minutes", s))?;
            Ok(f64::from(mins) * 60.0 + parse_seconds(secs, s)?)
        }
        None => parse_seconds(s, s),
    }
}

fn parse_seconds(part: &str, whole: &str) -> Result<f64> {
    let value: f64 = part
        .trim()
        .parse()
        .with_context(|| format!("Invalid time '{}': expected seconds or M:SS.mmm", whole))?;
    if !value.is_finite() || value < 0.0 {
        bail!("Invalid time '{}': must be a non-negative number", whole);
    }
    Ok(value)
}

/// "12 laps - 5:01.500 P1", "No data P4", or "No data"
pub fn format_race(race: &RaceResult) -> String {
    let mut out = if race.has_laps() {
        format!("{} laps - {}", race.laps, format_time(race.total_time))
    } else {
        "No data".to_string()
    };
    if let Some(pos) = race.classified_position() {
        out.push_str(&format!(" P{}", pos));
    }
    out
}

pub fn format_stats(stats: &EventStats) -> String {
    format!(
        "Drivers: {} | Sprint races completed: {} | Feature races completed: {}",
        stats.total_drivers, stats.completed_sprints, stats.completed_features
    )
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - len))
    }
}

fn pad_left(s: &str, width: usize) -> String {
    let len = s.chars().count();
    if len >= width {
        s.to_string()
    } else {
        format!("{}{}", " ".repeat(width - len), s)
    }
}

struct Row {
    pos: String,
    name: String,
    qual: String,
    sprint: String,
    feature: String,
    fastest: String,
    points: String,
    bonus: bool,
}

fn column_width(header: &str, rows: &[Row], cell: fn(&Row) -> &str) -> usize {
    rows.iter()
        .map(|r| cell(r).chars().count())
        .chain(std::iter::once(header.chars().count()))
        .max()
        .unwrap_or(0)
}

const HEADERS: [&str; 7] = [
    "Pos",
    "Driver",
    "Qual",
    "Sprint Race",
    "Feature Race",
    "Fastest",
    "Points",
];
const SEPARATOR: &str = "  ";

/// Format drivers (already in rank order) as a table with a header row.
/// The top three rows are highlighted gold, silver and bronze when colors are on.
pub fn format_leaderboard(drivers: &[Driver], use_colors: bool) -> String {
    format_leaderboard_with_width(drivers, use_colors, get_terminal_width())
}

fn format_leaderboard_with_width(
    drivers: &[Driver],
    use_colors: bool,
    term_width: Option<usize>,
) -> String {
    if drivers.is_empty() {
        return EMPTY_MESSAGE.to_string();
    }

    let fastest = crate::standings::fastest_lap_of_day(drivers);

    let mut rows: Vec<Row> = drivers
        .iter()
        .enumerate()
        .map(|(idx, driver)| {
            let bonus = holds_fastest_lap(driver, fastest);
            let mut fastest_cell = format_optional_time(driver.fastest_lap);
            if bonus {
                fastest_cell.push_str(" +1pt");
            }
            Row {
                pos: format!("{}.", idx + 1),
                name: driver.name.clone(),
                qual: format_optional_time(driver.qualifying_time),
                sprint: format_race(&driver.sprint_race),
                feature: format_race(&driver.feature_race),
                fastest: fastest_cell,
                points: driver.total_points.to_string(),
                bonus,
            }
        })
        .collect();

    let pos_w = column_width(HEADERS[0], &rows, |r| &r.pos);
    let mut name_w = column_width(HEADERS[1], &rows, |r| &r.name);
    let qual_w = column_width(HEADERS[2], &rows, |r| &r.qual);
    let sprint_w = column_width(HEADERS[3], &rows, |r| &r.sprint);
    let feature_w = column_width(HEADERS[4], &rows, |r| &r.feature);
    let fastest_w = column_width(HEADERS[5], &rows, |r| &r.fastest);
    let points_w = column_width(HEADERS[6], &rows, |r| &r.points);

    // Shrink only the name column to fit the terminal
    if let Some(width) = term_width {
        let fixed = pos_w + qual_w + sprint_w + feature_w + fastest_w + points_w
            + SEPARATOR.len() * (HEADERS.len() - 1);
        let available = width.saturating_sub(fixed).max(HEADERS[1].len());
        if name_w > available {
            name_w = available;
            for row in rows.iter_mut() {
                row.name = truncate_name(&row.name, name_w);
            }
        }
    }

    let header = [
        pad(HEADERS[0], pos_w),
        pad(HEADERS[1], name_w),
        pad(HEADERS[2], qual_w),
        pad(HEADERS[3], sprint_w),
        pad(HEADERS[4], feature_w),
        pad(HEADERS[5], fastest_w),
        pad_left(HEADERS[6], points_w),
    ]
    .join(SEPARATOR);

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(if use_colors {
        header.bold().to_string()
    } else {
        header
    });

    for (idx, row) in rows.iter().enumerate() {
        let pos = pad(&row.pos, pos_w);
        let name = pad(&row.name, name_w);
        let qual = pad(&row.qual, qual_w);
        let sprint = pad(&row.sprint, sprint_w);
        let feature = pad(&row.feature, feature_w);
        let fastest = pad(&row.fastest, fastest_w);
        let points = pad_left(&row.points, points_w);

        let line = if use_colors {
            let pos = match idx {
                0 => pos.yellow().bold().to_string(),
                1 => pos.bright_white().bold().to_string(),
                2 => pos.truecolor(205, 127, 50).bold().to_string(),
                _ => pos.dimmed().to_string(),
            };
            let fastest = if row.bonus {
                fastest.green().bold().to_string()
            } else {
                fastest.dimmed().to_string()
            };
            [
                pos,
                name.bold().to_string(),
                qual.dimmed().to_string(),
                sprint,
                feature,
                fastest,
                points.green().bold().to_string(),
            ]
            .join(SEPARATOR)
        } else {
            [pos, name, qual, sprint, feature, fastest, points].join(SEPARATOR)
        };
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Multi-line view of one driver with the points breakdown
pub fn format_driver_detail(
    driver: &Driver,
    rank: usize,
    fastest_of_day: Option<f64>,
    use_colors: bool,
) -> String {
    let breakdown = points_breakdown(driver, fastest_of_day);
    let fastest_note = if breakdown.fastest_lap_bonus > 0 {
        format!(
            "{} (fastest of the day) -> +{} pt",
            format_optional_time(driver.fastest_lap),
            breakdown.fastest_lap_bonus
        )
    } else {
        format!("{} -> +0 pt", format_optional_time(driver.fastest_lap))
    };

    let title = format!("#{} {}", rank, driver.name);
    let total = format!("{} pts", driver.total_points);

    if use_colors {
        format!(
            "{}\n  Id: {}\n  Qualifying: {}\n  Sprint: {} -> {} pts\n  Feature: {} -> {} pts\n  Fastest lap: {}\n  Total: {}",
            title.bold(),
            driver.id.dimmed(),
            format_optional_time(driver.qualifying_time),
            format_race(&driver.sprint_race),
            breakdown.sprint,
            format_race(&driver.feature_race),
            breakdown.feature,
            fastest_note,
            total.green().bold()
        )
    } else {
        format!(
            "{}\n  Id: {}\n  Qualifying: {}\n  Sprint: {} -> {} pts\n  Feature: {} -> {} pts\n  Fastest lap: {}\n  Total: {}",
            title,
            driver.id,
            format_optional_time(driver.qualifying_time),
            format_race(&driver.sprint_race),
            breakdown.sprint,
            format_race(&driver.feature_race),
            breakdown.feature,
            fastest_note,
            total
        )
    }
}

/// Format drivers as tab-separated values for scripting
/// Columns: rank, points, name, id (no headers, no colors)
pub fn format_tsv(drivers: &[Driver]) -> String {
    drivers
        .iter()
        .enumerate()
        .map(|(idx, d)| format!("{}\t{}\t{}\t{}", idx + 1, d.total_points, d.name, d.id))
        .collect::<Vec<_>>()
        .join("\n")
}
