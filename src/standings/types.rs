use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One race (sprint or feature) as entered for a driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RaceResult {
    #[serde(default)]
    pub laps: u32,
    #[serde(default)]
    pub total_time: f64, // seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<u32>, // 1-based finishing position
}

impl RaceResult {
    /// Finishing position, treating a stored 0 the same as absent
    pub fn classified_position(&self) -> Option<u32> {
        self.position.filter(|&p| p > 0)
    }

    /// True when any lap data was entered for this race
    pub fn has_laps(&self) -> bool {
        self.laps > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Driver {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qualifying_time: Option<f64>, // seconds, not scored
    #[serde(default)]
    pub sprint_race: RaceResult,
    #[serde(default)]
    pub feature_race: RaceResult,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fastest_lap: Option<f64>, // seconds
    /// Derived by the scoring engine. Whatever is read from disk is overwritten.
    #[serde(default)]
    pub total_points: u32,
}

impl Driver {
    /// Create a driver with a fresh identifier and no results
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            qualifying_time: None,
            sprint_race: RaceResult::default(),
            feature_race: RaceResult::default(),
            fastest_lap: None,
            total_points: 0,
        }
    }

    /// First 8 characters of the identifier, enough to address a driver from the CLI
    pub fn short_id(&self) -> &str {
        let end = self
            .id
            .char_indices()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(self.id.len());
        &self.id[..end]
    }
}
