use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::time::Instant;

use rc_leaderboard::standings::Driver;
use rc_leaderboard::store::{JsonFileStore, Leaderboard};
use rc_leaderboard::verbose_eprintln;

const EXIT_SUCCESS: i32 = 0;
const EXIT_USAGE: i32 = 1;
const EXIT_STORAGE: i32 = 2;
const EXIT_CONFIG: i32 = 4;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the leaderboard (default if no subcommand)
    List {
        /// Tab-separated output for scripting: rank, points, name, id
        #[arg(long)]
        tsv: bool,
    },
    /// Add a driver
    Add {
        /// Driver name
        #[arg(long)]
        name: String,

        #[command(flatten)]
        results: ResultArgs,
    },
    /// Change a driver's name or results
    Edit {
        /// Position on the leaderboard (1-based) or driver id / id prefix
        target: String,

        /// New driver name
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        results: ResultArgs,
    },
    /// Remove a driver
    Remove {
        /// Position on the leaderboard (1-based) or driver id / id prefix
        target: String,
    },
    /// Show one driver with a points breakdown
    Show {
        /// Position on the leaderboard (1-based) or driver id / id prefix
        target: String,
    },
    /// Load drivers from a JSON file (browser export or data file)
    Import {
        file: PathBuf,

        /// Update matching ids and add new ones instead of replacing everything
        #[arg(long)]
        merge: bool,
    },
    /// Print the ranked drivers as JSON
    Export,
    /// Remove every driver
    Clear,
}

/// Race result fields shared by `add` and `edit`.
/// Times accept seconds ("65.25") or "M:SS.mmm" ("1:05.250").
/// A time or position of 0 clears the value.
#[derive(Args, Debug, Default)]
struct ResultArgs {
    /// Qualifying best lap
    #[arg(long)]
    qualifying: Option<String>,

    /// Sprint race laps completed
    #[arg(long)]
    sprint_laps: Option<u32>,

    /// Sprint race total time
    #[arg(long)]
    sprint_time: Option<String>,

    /// Sprint race finishing position
    #[arg(long)]
    sprint_pos: Option<u32>,

    /// Feature race laps completed
    #[arg(long)]
    feature_laps: Option<u32>,

    /// Feature race total time
    #[arg(long)]
    feature_time: Option<String>,

    /// Feature race finishing position
    #[arg(long)]
    feature_pos: Option<u32>,

    /// Fastest lap of the event for this driver
    #[arg(long)]
    fastest_lap: Option<String>,
}

impl ResultArgs {
    /// Copy every given field onto `driver`, leaving the rest untouched
    fn apply(&self, driver: &mut Driver) -> Result<()> {
        if let Some(ref s) = self.qualifying {
            driver.qualifying_time = optional_time(s)?;
        }
        if let Some(laps) = self.sprint_laps {
            driver.sprint_race.laps = laps;
        }
        if let Some(ref s) = self.sprint_time {
            driver.sprint_race.total_time = rc_leaderboard::output::parse_time(s)?;
        }
        if let Some(pos) = self.sprint_pos {
            driver.sprint_race.position = (pos > 0).then_some(pos);
        }
        if let Some(laps) = self.feature_laps {
            driver.feature_race.laps = laps;
        }
        if let Some(ref s) = self.feature_time {
            driver.feature_race.total_time = rc_leaderboard::output::parse_time(s)?;
        }
        if let Some(pos) = self.feature_pos {
            driver.feature_race.position = (pos > 0).then_some(pos);
        }
        if let Some(ref s) = self.fastest_lap {
            driver.fastest_lap = optional_time(s)?;
        }
        Ok(())
    }
}

fn optional_time(s: &str) -> Result<Option<f64>> {
    let seconds = rc_leaderboard::output::parse_time(s)?;
    Ok((seconds > 0.0).then_some(seconds))
}

#[derive(Parser, Debug)]
#[command(name = "rc-leaderboard")]
#[command(about = "Championship standings for an RC race event", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/rc-leaderboard/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Path to the drivers data file (overrides the config)
    #[arg(short, long, global = true)]
    data: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn exit_with(code: i32, category: &str, err: impl std::fmt::Display) -> ! {
    eprintln!("{} error: {:#}", category, err);
    std::process::exit(code);
}

fn clean_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        exit_with(EXIT_USAGE, "Input", "driver name must not be empty");
    }
    trimmed.to_string()
}

fn main() {
    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Commands::List { tsv: false });
    let start_time = Instant::now();
    rc_leaderboard::stderr_buffer::set_verbose(cli.verbose);

    // Load config
    let config_path = cli.config.map(PathBuf::from);
    let config = match rc_leaderboard::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => exit_with(EXIT_CONFIG, "Config", e),
    };

    if let Err(errors) = rc_leaderboard::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let data_path =
        match rc_leaderboard::config::resolve_data_path(&config, cli.data.map(PathBuf::from)) {
            Ok(p) => p,
            Err(e) => exit_with(EXIT_CONFIG, "Config", e),
        };

    let mut board = match Leaderboard::open(JsonFileStore::new(&data_path)) {
        Ok(b) => b,
        Err(e) => exit_with(EXIT_STORAGE, "Storage", e),
    };

    verbose_eprintln!(
        "Loaded {} drivers from {}",
        board.len(),
        board.store().path().display()
    );

    let use_colors = !cli.no_color && rc_leaderboard::output::should_use_colors();

    match command {
        Commands::List { tsv } => {
            if tsv {
                let output = rc_leaderboard::output::format_tsv(board.drivers());
                if !output.is_empty() {
                    println!("{}", output);
                }
            } else {
                let title = config.event_title();
                if use_colors {
                    println!("{}", title.bold());
                } else {
                    println!("{}", title);
                }
                println!("{}", rc_leaderboard::output::format_stats(&board.stats()));
                println!();
                println!(
                    "{}",
                    rc_leaderboard::output::format_leaderboard(board.drivers(), use_colors)
                );
            }
        }
        Commands::Add { name, results } => {
            let mut driver = Driver::new(clean_name(&name));
            if let Err(e) = results.apply(&mut driver) {
                exit_with(EXIT_USAGE, "Input", e);
            }
            let added = match board.add(driver) {
                Ok(d) => d,
                Err(e) => exit_with(EXIT_STORAGE, "Storage", e),
            };
            println!(
                "Driver Added: {} has been added to the leaderboard.",
                added.name
            );
            verbose_eprintln!("  id {} with {} pts", added.id, added.total_points);
        }
        Commands::Edit {
            target,
            name,
            results,
        } => {
            let mut driver = match board.resolve(&target) {
                Ok((_, d)) => d.clone(),
                Err(e) => exit_with(EXIT_USAGE, "Input", e),
            };
            if let Some(ref name) = name {
                driver.name = clean_name(name);
            }
            if let Err(e) = results.apply(&mut driver) {
                exit_with(EXIT_USAGE, "Input", e);
            }
            let updated = match board.update(driver) {
                Ok(d) => d,
                Err(e) => exit_with(EXIT_STORAGE, "Storage", e),
            };
            println!("Driver Updated: {} has been updated successfully.", updated.name);
            verbose_eprintln!("  id {} now on {} pts", updated.id, updated.total_points);
        }
        Commands::Remove { target } => {
            let id = match board.resolve(&target) {
                Ok((_, d)) => d.id.clone(),
                Err(e) => exit_with(EXIT_USAGE, "Input", e),
            };
            let removed = match board.remove(&id) {
                Ok(d) => d,
                Err(e) => exit_with(EXIT_STORAGE, "Storage", e),
            };
            println!(
                "Driver Removed: {} has been removed from the leaderboard.",
                removed.name
            );
        }
        Commands::Show { target } => {
            let fastest = board.fastest_lap_of_day();
            match board.resolve(&target) {
                Ok((rank, driver)) => println!(
                    "{}",
                    rc_leaderboard::output::format_driver_detail(
                        driver, rank, fastest, use_colors
                    )
                ),
                Err(e) => exit_with(EXIT_USAGE, "Input", e),
            }
        }
        Commands::Import { file, merge } => {
            let drivers = match rc_leaderboard::store::read_import(&file) {
                Ok(d) => d,
                Err(e) => exit_with(EXIT_USAGE, "Import", e),
            };
            verbose_eprintln!("Read {} drivers from {}", drivers.len(), file.display());

            if merge {
                match board.merge(drivers) {
                    Ok((added, updated)) => {
                        println!("Imported: {} added, {} updated.", added, updated)
                    }
                    Err(e) => exit_with(EXIT_STORAGE, "Storage", e),
                }
            } else {
                match board.replace_all(drivers) {
                    Ok(count) => println!("Imported: {} drivers.", count),
                    Err(e) => exit_with(EXIT_STORAGE, "Storage", e),
                }
            }
        }
        Commands::Export => match serde_json::to_string_pretty(board.drivers()) {
            Ok(json) => println!("{}", json),
            Err(e) => exit_with(EXIT_STORAGE, "Export", e),
        },
        Commands::Clear => match board.clear() {
            Ok(count) => println!("Cleared: {} drivers removed.", count),
            Err(e) => exit_with(EXIT_STORAGE, "Storage", e),
        },
    }

    verbose_eprintln!("Done in {:?}", start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}
