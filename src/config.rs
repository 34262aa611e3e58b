use crate::airport::{AirportId, Distance};
use crate::error::TowerError;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Debug, PartialEq)]
pub struct TowerConfig {
    pub runways: u16,
    /// Airport that unknown destinations get connected to on admission.
    pub hub: AirportId,
    pub hub_distance: Distance,
    pub sample_routes: bool,
}

impl Default for TowerConfig {
    fn default() -> Self {
        TowerConfig {
            runways: 3,
            hub: Arc::from("JFK"),
            hub_distance: 5,
            sample_routes: true,
        }
    }
}

impl TowerConfig {
    pub const SAMPLE_ROUTES: [(&'static str, &'static str, Distance); 6] = [
        ("JFK", "LAX", 5),
        ("JFK", "LHR", 7),
        ("LAX", "SFO", 1),
        ("LHR", "CDG", 1),
        ("SFO", "NRT", 10),
        ("CDG", "FRA", 1),
    ];
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioRoute {
    pub from: AirportId,
    pub to: AirportId,
    pub distance: Distance,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioFlight {
    pub number: Arc<str>,
    pub destination: AirportId,
    /// Time of day, `HH:MM`.
    pub time: String,
    #[serde(default)]
    pub emergency: bool,
}

/// Routes and flights to seed a tower with at startup.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Scenario {
    #[serde(default)]
    pub routes: Vec<ScenarioRoute>,
    #[serde(default)]
    pub flights: Vec<ScenarioFlight>,
}

impl Scenario {
    pub fn load_from_file(path: &Path) -> Result<Self, TowerError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> Result<Self, TowerError> {
        Ok(serde_json::from_str(data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scenario() {
        let scenario = Scenario::from_json(
            r#"{
                "routes": [{"from": "KRK", "to": "WAW", "distance": 3}],
                "flights": [
                    {"number": "LO3901", "destination": "WAW", "time": "06:40"},
                    {"number": "EM1", "destination": "KRK", "time": "07:00", "emergency": true}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(1, scenario.routes.len());
        assert_eq!(3, scenario.routes[0].distance);
        assert!(!scenario.flights[0].emergency);
        assert!(scenario.flights[1].emergency);
    }

    #[test]
    fn test_empty_scenario() {
        assert_eq!(Scenario::default(), Scenario::from_json("{}").unwrap());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = Scenario::from_json(r#"{"aircraft": []}"#).unwrap_err();
        assert!(matches!(err, TowerError::Scenario(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = Scenario::load_from_file(Path::new("/nonexistent/scenario.json")).unwrap_err();
        assert!(matches!(err, TowerError::Scenario(_)));
    }

    #[test]
    fn test_bundled_scenario_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/default.json");
        let scenario = Scenario::load_from_file(&path).unwrap();
        assert!(!scenario.flights.is_empty());
    }
}
