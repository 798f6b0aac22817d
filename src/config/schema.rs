use serde::{Deserialize, Serialize};

/// Contents of `~/.config/rc-leaderboard/config.yaml`.
///
/// Example YAML:
/// ```yaml
/// event_name: "Round 3 - Indoor Carpet"
/// data_file: "~/racing/round3.json"
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Title printed above the leaderboard
    #[serde(default)]
    pub event_name: Option<String>,

    /// Where drivers are stored (default: ~/.config/rc-leaderboard/drivers.json).
    /// A leading `~/` is expanded to the home directory.
    #[serde(default)]
    pub data_file: Option<String>,
}

impl Config {
    pub fn event_title(&self) -> &str {
        self.event_name
            .as_deref()
            .unwrap_or("RC Car Racing Leaderboard")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config_parse() {
        let yaml = r#"
event_name: "Round 3"
data_file: "~/racing/round3.json"
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.event_name, Some("Round 3".to_string()));
        assert_eq!(config.data_file, Some("~/racing/round3.json".to_string()));
        assert_eq!(config.event_title(), "Round 3");
    }

    #[test]
    fn test_empty_config_parse() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.event_title(), "RC Car Racing Leaderboard");
    }

    #[test]
    fn test_unknown_key_rejected() {
        let yaml = "queries: []\n";
        assert!(serde_saphyr::from_str::<Config>(yaml).is_err());
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config {
            event_name: Some("Club Night".to_string()),
            data_file: None,
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }
}
