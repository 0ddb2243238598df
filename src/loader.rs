//! Startup dataset loading.
//!
//! Fetches `planets.json` and `systems.json` concurrently from a directory
//! or URL base. A failed fetch of either resource is fatal for the session;
//! there is no retry and no partial data. A decoded body that is not a JSON
//! array is coerced to an empty collection with a warning.

use crate::data::{PlanetRecord, SystemRecord};
use crate::state::Datasets;
use serde::de::DeserializeOwned;
use std::sync::mpsc;

#[derive(Debug, Clone)]
pub struct DataSource {
    pub planets: String,
    pub systems: String,
}

impl DataSource {
    /// Resolve a directory path or URL base into the two resource locations.
    pub fn from_base(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            planets: format!("{base}/planets.json"),
            systems: format!("{base}/systems.json"),
        }
    }
}

fn fetch_text(location: &str) -> Result<String, String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        let response = ureq::get(location)
            .call()
            .map_err(|e| format!("Failed to load {location}: {e}"))?;
        response
            .into_string()
            .map_err(|e| format!("Read error for {location}: {e}"))
    } else {
        std::fs::read_to_string(location)
            .map_err(|e| format!("Failed to load {location}: {e}"))
    }
}

/// Decode a JSON array of records. A valid JSON body that is not an array
/// becomes an empty collection; malformed JSON is an error.
fn parse_records<T: DeserializeOwned>(text: &str, what: &str) -> Result<Vec<T>, String> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| format!("JSON error in {what}: {e}"))?;
    if !value.is_array() {
        log::warn!("{what}: payload is not an array, using an empty collection");
        return Ok(Vec::new());
    }
    serde_json::from_value(value).map_err(|e| format!("Schema error in {what}: {e}"))
}

fn load_resource<T: DeserializeOwned>(location: &str, what: &str) -> Result<Vec<T>, String> {
    let text = fetch_text(location)?;
    parse_records(&text, what)
}

/// Load both resources, planets on a helper thread, systems on the caller.
pub fn load_datasets(source: &DataSource) -> Result<Datasets, String> {
    let planets_loc = source.planets.clone();
    let planets_handle = std::thread::spawn(move || {
        load_resource::<PlanetRecord>(&planets_loc, "planets.json")
    });

    let systems = load_resource::<SystemRecord>(&source.systems, "systems.json");

    let planets = planets_handle
        .join()
        .map_err(|_| "planets.json loader thread panicked".to_string())?;

    let datasets = Datasets {
        planets: planets?,
        systems: systems?,
    };
    log::info!(
        "loaded {} planets, {} systems",
        datasets.planets.len(),
        datasets.systems.len()
    );
    Ok(datasets)
}

/// Kick off loading in the background; the UI polls the receiver each frame.
pub fn spawn_load(source: DataSource) -> mpsc::Receiver<Result<Datasets, String>> {
    let (tx, rx) = mpsc::channel();
    std::thread::spawn(move || {
        let _ = tx.send(load_datasets(&source));
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_resolution_appends_resource_names() {
        let src = DataSource::from_base("public/data/");
        assert_eq!(src.planets, "public/data/planets.json");
        assert_eq!(src.systems, "public/data/systems.json");

        let src = DataSource::from_base("https://example.org/exo");
        assert_eq!(src.systems, "https://example.org/exo/systems.json");
    }

    #[test]
    fn non_array_payload_coerces_to_empty() {
        let out: Vec<PlanetRecord> =
            parse_records(r#"{"oops": true}"#, "planets.json").unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn malformed_json_is_an_error() {
        let out: Result<Vec<PlanetRecord>, String> = parse_records("not json", "planets.json");
        assert!(out.is_err());
    }

    #[test]
    fn array_payload_decodes_records() {
        let out: Vec<SystemRecord> = parse_records(
            r#"[{"hostName": "TRAPPIST-1", "hasCandidate": true, "candidateCountConservative": 3}]"#,
            "systems.json",
        )
        .unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].host_name, "TRAPPIST-1");
        assert_eq!(out[0].candidate_count_conservative, 3);
    }

    #[test]
    fn missing_file_is_fatal() {
        let source = DataSource::from_base("/nonexistent/exoviz-data");
        assert!(load_datasets(&source).is_err());
    }
}
