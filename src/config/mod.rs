mod schema;
mod validation;

pub use schema::Config;
pub use validation::validate_config;

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// Get the config directory path (~/.config/rc-leaderboard/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("rc-leaderboard"))
}

/// Get the default config file path (~/.config/rc-leaderboard/config.yaml)
pub fn get_config_path() -> Result<PathBuf> {
    Ok(get_config_dir()?.join("config.yaml"))
}

/// Load configuration from a YAML file
///
/// # Arguments
///
/// * `path` - Optional path to config file. If None, uses the default path
///   and falls back to built-in defaults when that file does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - An explicitly given config file does not exist
/// - The config file cannot be read
/// - The YAML cannot be parsed
pub fn load_config(path: Option<PathBuf>) -> Result<Config> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                anyhow::bail!("Config file not found at {}", p.display());
            }
            p
        }
        None => match get_config_path() {
            Ok(p) if p.exists() => p,
            _ => return Ok(Config::default()),
        },
    };

    let config_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file at {}", config_path.display()))?;

    let config: Config = serde_saphyr::from_str(&config_content).with_context(|| {
        format!(
            "Failed to parse config: invalid YAML in {}",
            config_path.display()
        )
    })?;

    Ok(config)
}

/// Resolve where drivers are stored: the `--data` override, then the
/// config's `data_file`, then the default under the config directory.
pub fn resolve_data_path(config: &Config, data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    match config.data_file.as_deref() {
        Some(file) => expand_home(file.trim()),
        None => crate::store::get_data_path(),
    }
}

fn expand_home(path: &str) -> Result<PathBuf> {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home.join(rest))
    } else {
        Ok(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_explicit_missing_config_fails() {
        let path = env::temp_dir().join("rc_leaderboard_test_no_such_config.yaml");
        let _ = fs::remove_file(&path);
        let err = load_config(Some(path)).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_load_explicit_config() {
        let path = env::temp_dir().join("rc_leaderboard_test_config.yaml");
        fs::write(&path, "event_name: \"Club Night\"\n").unwrap();

        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.event_name, Some("Club Night".to_string()));
        assert!(config.data_file.is_none());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_load_invalid_yaml() {
        let path = env::temp_dir().join("rc_leaderboard_test_bad_config.yaml");
        fs::write(&path, "event_name: [unclosed\n").unwrap();

        let err = load_config(Some(path.clone())).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_data_override_wins() {
        let config = Config {
            event_name: None,
            data_file: Some("/from/config.json".to_string()),
        };
        let path = resolve_data_path(&config, Some(PathBuf::from("/from/flag.json"))).unwrap();
        assert_eq!(path, PathBuf::from("/from/flag.json"));
    }

    #[test]
    fn test_data_file_from_config() {
        let config = Config {
            event_name: None,
            data_file: Some("/from/config.json".to_string()),
        };
        let path = resolve_data_path(&config, None).unwrap();
        assert_eq!(path, PathBuf::from("/from/config.json"));
    }

    #[test]
    fn test_expand_home() {
        let home = dirs::home_dir().unwrap();
        assert_eq!(
            expand_home("~/racing/r1.json").unwrap(),
            home.join("racing/r1.json")
        );
        assert_eq!(
            expand_home("/abs/r1.json").unwrap(),
            PathBuf::from("/abs/r1.json")
        );
    }
}
