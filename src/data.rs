//! Catalog record types and per-host aggregation.
//!
//! Planets and systems are loaded once at startup and never mutated;
//! every view works on filtered slices of these two collections.

use serde::{Deserialize, Serialize};

/// One confirmed exoplanet, one row of `planets.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlanetRecord {
    pub name: Option<String>,
    pub host_name: Option<String>,

    pub star_count: Option<i64>,
    pub planet_count: Option<i64>,

    pub radius_earth: Option<f64>,
    pub mass_earth: Option<f64>,
    pub density_gcm3: Option<f64>,
    pub relative_gravity: Option<f64>,

    pub insolation_observed: Option<f64>,
    pub insolation_estimated: Option<f64>,
    pub insolation_merged: Option<f64>,
    pub equilibrium_temp_k: Option<f64>,

    pub period_days: Option<f64>,
    pub semi_major_axis_au: Option<f64>,
    pub eccentricity: Option<f64>,

    pub stellar_luminosity_log: Option<f64>,
    pub stellar_mass_sun: Option<f64>,
    pub stellar_radius_sun: Option<f64>,
    pub stellar_temp_k: Option<f64>,
    pub spectral_type: Option<String>,

    pub distance_pc: Option<f64>,
    pub galactic_longitude_deg: Option<f64>,

    pub detected_transit: bool,
    pub detected_radial_velocity: bool,
    pub detected_imaging: bool,
    pub detected_microlensing: bool,

    pub discovery_method: Option<String>,
    pub discovery_year: Option<i64>,

    pub is_rocky_size: bool,
    pub has_comfortable_gravity: bool,
    pub is_optimistic_candidate: bool,
    pub is_conservative_candidate: bool,
    pub has_data: bool,
}

impl PlanetRecord {
    pub fn is_candidate(&self) -> bool {
        self.is_optimistic_candidate || self.is_conservative_candidate
    }
}

/// Compact planet subset carried inside its host system record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CandidateSummary {
    pub name: Option<String>,
    pub radius_earth: Option<f64>,
    pub mass_earth: Option<f64>,
    pub relative_gravity: Option<f64>,
    pub insolation_merged: Option<f64>,
    pub equilibrium_temp_k: Option<f64>,
    pub semi_major_axis_au: Option<f64>,
    pub period_days: Option<f64>,
    pub is_optimistic_candidate: bool,
    pub is_conservative_candidate: bool,
}

/// One host star, aggregated from its planets; one row of `systems.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SystemRecord {
    pub host_name: String,

    pub star_count: Option<i64>,
    pub planet_count: Option<i64>,

    pub spectral_type: Option<String>,
    pub stellar_temp_k: Option<f64>,
    pub stellar_mass_sun: Option<f64>,
    pub stellar_radius_sun: Option<f64>,
    pub stellar_luminosity_log: Option<f64>,

    pub distance_pc: Option<f64>,
    pub galactic_longitude_deg: Option<f64>,

    pub has_data: bool,
    pub has_candidate: bool,
    pub candidate_count_optimistic: u32,
    pub candidate_count_conservative: u32,
    pub candidate_planets: Vec<CandidateSummary>,
}

impl SystemRecord {
    /// First conservative candidate, the one a portrait card is built around.
    pub fn conservative_candidate(&self) -> Option<&CandidateSummary> {
        self.candidate_planets
            .iter()
            .find(|p| p.is_conservative_candidate)
    }

    /// Candidates that are optimistic but not conservative, for display only.
    /// The two counters are independent booleans per planet; containment is
    /// not a data invariant, so this saturates at zero.
    pub fn optimistic_only_count(&self) -> u32 {
        self.candidate_count_optimistic
            .saturating_sub(self.candidate_count_conservative)
    }

    /// Spectral class letter, estimated from effective temperature when the
    /// catalog has no spectral type string.
    pub fn spectral_class(&self) -> Option<char> {
        if let Some(t) = self
            .spectral_type
            .as_deref()
            .and_then(|s| s.chars().next())
        {
            return Some(t);
        }
        let temp = self.stellar_temp_k?;
        Some(if temp >= 7500.0 {
            'F'
        } else if temp >= 5200.0 {
            'G'
        } else if temp >= 3700.0 {
            'K'
        } else {
            'M'
        })
    }
}

fn candidate_summary(planet: &PlanetRecord) -> CandidateSummary {
    CandidateSummary {
        name: planet.name.clone(),
        radius_earth: planet.radius_earth,
        mass_earth: planet.mass_earth,
        relative_gravity: planet.relative_gravity,
        insolation_merged: planet.insolation_merged,
        equilibrium_temp_k: planet.equilibrium_temp_k,
        semi_major_axis_au: planet.semi_major_axis_au,
        period_days: planet.period_days,
        is_optimistic_candidate: planet.is_optimistic_candidate,
        is_conservative_candidate: planet.is_conservative_candidate,
    }
}

/// Aggregate planets into one system per unique host, in first-seen order.
///
/// Stellar and positional fields come from the first planet of the host;
/// `has_data` is the OR across members; the two candidate counters are
/// incremented independently per flag.
pub fn aggregate_systems(planets: &[PlanetRecord]) -> Vec<SystemRecord> {
    let mut systems: Vec<SystemRecord> = Vec::new();
    let mut index: std::collections::HashMap<String, usize> =
        std::collections::HashMap::new();

    for planet in planets {
        let host = match planet.host_name.as_deref() {
            Some(h) if !h.is_empty() => h,
            _ => continue,
        };

        let i = *index.entry(host.to_string()).or_insert_with(|| {
            systems.push(SystemRecord {
                host_name: host.to_string(),
                star_count: planet.star_count,
                planet_count: planet.planet_count,
                spectral_type: planet.spectral_type.clone(),
                stellar_temp_k: planet.stellar_temp_k,
                stellar_mass_sun: planet.stellar_mass_sun,
                stellar_radius_sun: planet.stellar_radius_sun,
                stellar_luminosity_log: planet.stellar_luminosity_log,
                distance_pc: planet.distance_pc,
                galactic_longitude_deg: planet.galactic_longitude_deg,
                has_data: false,
                has_candidate: false,
                candidate_count_optimistic: 0,
                candidate_count_conservative: 0,
                candidate_planets: Vec::new(),
            });
            systems.len() - 1
        });

        let system = &mut systems[i];
        system.has_data = system.has_data || planet.has_data;

        if planet.is_candidate() {
            system.has_candidate = true;
            if planet.is_optimistic_candidate {
                system.candidate_count_optimistic += 1;
            }
            if planet.is_conservative_candidate {
                system.candidate_count_conservative += 1;
            }
            system.candidate_planets.push(candidate_summary(planet));
        }
    }

    systems
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet(host: &str, optimistic: bool, conservative: bool) -> PlanetRecord {
        PlanetRecord {
            name: Some(format!("{host} x")),
            host_name: Some(host.to_string()),
            is_optimistic_candidate: optimistic,
            is_conservative_candidate: conservative,
            has_data: true,
            ..Default::default()
        }
    }

    #[test]
    fn aggregation_counts_flags_independently() {
        let planets = vec![
            planet("A", true, false),
            planet("A", false, true),
            planet("A", false, false),
        ];
        let systems = aggregate_systems(&planets);
        assert_eq!(systems.len(), 1);
        let a = &systems[0];
        assert_eq!(a.host_name, "A");
        assert_eq!(a.candidate_count_optimistic, 1);
        assert_eq!(a.candidate_count_conservative, 1);
        assert!(a.has_candidate);
        assert_eq!(a.candidate_planets.len(), 2);
    }

    #[test]
    fn aggregation_or_combines_has_data() {
        let mut quiet = planet("B", false, false);
        quiet.has_data = false;
        let systems = aggregate_systems(&[quiet.clone(), planet("B", false, false)]);
        assert_eq!(systems.len(), 1);
        assert!(systems[0].has_data);

        let systems = aggregate_systems(&[quiet.clone(), quiet]);
        assert!(!systems[0].has_data);
    }

    #[test]
    fn aggregation_skips_hostless_rows_and_keeps_order() {
        let mut orphan = planet("", false, false);
        orphan.host_name = None;
        let planets = vec![planet("Z", false, false), orphan, planet("A", false, false)];
        let systems = aggregate_systems(&planets);
        let hosts: Vec<&str> = systems.iter().map(|s| s.host_name.as_str()).collect();
        assert_eq!(hosts, vec!["Z", "A"]);
    }

    #[test]
    fn optimistic_only_count_saturates() {
        let sys = SystemRecord {
            candidate_count_optimistic: 1,
            candidate_count_conservative: 2,
            ..Default::default()
        };
        assert_eq!(sys.optimistic_only_count(), 0);

        let sys = SystemRecord {
            candidate_count_optimistic: 3,
            candidate_count_conservative: 1,
            ..Default::default()
        };
        assert_eq!(sys.optimistic_only_count(), 2);
    }

    #[test]
    fn spectral_class_falls_back_to_temperature() {
        let mut sys = SystemRecord {
            spectral_type: Some("G2 V".to_string()),
            stellar_temp_k: Some(3000.0),
            ..Default::default()
        };
        assert_eq!(sys.spectral_class(), Some('G'));

        sys.spectral_type = None;
        assert_eq!(sys.spectral_class(), Some('M'));
        sys.stellar_temp_k = Some(4500.0);
        assert_eq!(sys.spectral_class(), Some('K'));
        sys.stellar_temp_k = Some(5800.0);
        assert_eq!(sys.spectral_class(), Some('G'));
        sys.stellar_temp_k = Some(8000.0);
        assert_eq!(sys.spectral_class(), Some('F'));
        sys.stellar_temp_k = None;
        assert_eq!(sys.spectral_class(), None);
    }

    #[test]
    fn planet_json_uses_camel_case_field_names() {
        let json = r#"{
            "name": "Kepler-442 b",
            "hostName": "Kepler-442",
            "radiusEarth": 1.34,
            "massEarth": 2.3,
            "relativeGravity": 1.3,
            "insolationMerged": 0.7,
            "galacticLongitudeDeg": 76.9,
            "distancePc": 370.5,
            "isRockySize": true,
            "isConservativeCandidate": true,
            "hasData": true
        }"#;
        let p: PlanetRecord = serde_json::from_str(json).unwrap();
        assert_eq!(p.host_name.as_deref(), Some("Kepler-442"));
        assert_eq!(p.radius_earth, Some(1.34));
        assert!(p.is_rocky_size);
        assert!(p.is_conservative_candidate);
        assert!(!p.is_optimistic_candidate);
        assert_eq!(p.period_days, None);

        let back = serde_json::to_value(&p).unwrap();
        assert!(back.get("hostName").is_some());
        assert!(back.get("galacticLongitudeDeg").is_some());
    }
}
