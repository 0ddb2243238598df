//! Offline preprocessing: exoplanet archive CSV → planets.json + systems.json.
//!
//! Usage: preprocess <input.csv> [out-dir]
//!
//! Tolerates the archive's irregularities: blank and "nan" numeric cells
//! and loose boolean spellings.

use exoviz::data::{aggregate_systems, PlanetRecord};
use std::path::Path;

fn parse_number(cell: Option<&str>) -> Option<f64> {
    let v = cell?.trim();
    if v.is_empty() || v.eq_ignore_ascii_case("nan") {
        return None;
    }
    v.parse::<f64>().ok()
}

fn parse_int(cell: Option<&str>) -> Option<i64> {
    parse_number(cell).map(|n| n.round() as i64)
}

fn parse_bool(cell: Option<&str>) -> bool {
    matches!(
        cell.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true") | Some("t") | Some("1") | Some("yes")
    )
}

fn parse_string(cell: Option<&str>) -> Option<String> {
    let v = cell?.trim();
    if v.is_empty() {
        None
    } else {
        Some(v.to_string())
    }
}

struct Row<'a> {
    headers: &'a csv::StringRecord,
    record: &'a csv::StringRecord,
}

impl<'a> Row<'a> {
    fn get(&self, name: &str) -> Option<&'a str> {
        self.headers
            .iter()
            .position(|h| h == name)
            .and_then(|i| self.record.get(i))
    }

    fn number(&self, name: &str) -> Option<f64> {
        parse_number(self.get(name))
    }

    fn int(&self, name: &str) -> Option<i64> {
        parse_int(self.get(name))
    }

    fn boolean(&self, name: &str) -> bool {
        parse_bool(self.get(name))
    }

    fn string(&self, name: &str) -> Option<String> {
        parse_string(self.get(name))
    }
}

fn planet_from_row(row: &Row) -> PlanetRecord {
    PlanetRecord {
        name: row.string("pl_name"),
        host_name: row.string("hostname"),

        star_count: row.int("sy_snum"),
        planet_count: row.int("sy_pnum"),

        radius_earth: row.number("pl_rade"),
        mass_earth: row.number("pl_bmasse"),
        density_gcm3: row.number("pl_dens"),
        relative_gravity: row.number("pl_g_rel"),

        insolation_observed: row.number("pl_insol"),
        insolation_estimated: row.number("pl_insol_est"),
        insolation_merged: row.number("pl_insol_merged"),
        equilibrium_temp_k: row.number("pl_eqt"),

        period_days: row.number("pl_orbper"),
        semi_major_axis_au: row.number("pl_orbsmax"),
        eccentricity: row.number("pl_orbeccen"),

        stellar_luminosity_log: row.number("st_lum"),
        stellar_mass_sun: row.number("st_mass"),
        stellar_radius_sun: row.number("st_rad"),
        stellar_temp_k: row.number("st_teff"),
        spectral_type: row.string("st_spectype"),

        distance_pc: row.number("sy_dist"),
        galactic_longitude_deg: row.number("glon"),

        detected_transit: row.boolean("tran_flag"),
        detected_radial_velocity: row.boolean("rv_flag"),
        detected_imaging: row.boolean("ima_flag"),
        detected_microlensing: row.boolean("micro_flag"),

        discovery_method: row.string("discoverymethod"),
        discovery_year: row.int("disc_year"),

        is_rocky_size: row.boolean("pl_is_rocky_size"),
        has_comfortable_gravity: row.boolean("pl_is_gravity_comfortable"),
        is_optimistic_candidate: row.boolean("pl_is_optimistic_candidate"),
        is_conservative_candidate: row.boolean("pl_is_conservative_candidate"),
        has_data: row.boolean("has_data"),
    }
}

fn run(input: &str, out_dir: &str) -> Result<(), String> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(input)
        .map_err(|e| format!("Failed to open {input}: {e}"))?;
    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read CSV headers: {e}"))?
        .clone();

    let mut planets = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| format!("CSV error at row {}: {e}", line + 2))?;
        planets.push(planet_from_row(&Row {
            headers: &headers,
            record: &record,
        }));
    }

    let systems = aggregate_systems(&planets);

    let out = Path::new(out_dir);
    std::fs::create_dir_all(out).map_err(|e| format!("Failed to create {out_dir}: {e}"))?;

    let planets_path = out.join("planets.json");
    let systems_path = out.join("systems.json");
    let planets_json = serde_json::to_string_pretty(&planets)
        .map_err(|e| format!("Failed to encode planets: {e}"))?;
    let systems_json = serde_json::to_string_pretty(&systems)
        .map_err(|e| format!("Failed to encode systems: {e}"))?;
    std::fs::write(&planets_path, planets_json)
        .map_err(|e| format!("Failed to write {}: {e}", planets_path.display()))?;
    std::fs::write(&systems_path, systems_json)
        .map_err(|e| format!("Failed to write {}: {e}", systems_path.display()))?;

    println!("Wrote {} planets to {}", planets.len(), planets_path.display());
    println!("Wrote {} systems to {}", systems.len(), systems_path.display());
    Ok(())
}

fn main() {
    env_logger::init();
    let mut args = std::env::args().skip(1);
    let input = args.next().unwrap_or_else(|| "exoplanets.csv".to_string());
    let out_dir = args.next().unwrap_or_else(|| "public/data".to_string());

    if let Err(e) = run(&input, &out_dir) {
        eprintln!("preprocess: {e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_cells_tolerate_blank_and_nan() {
        assert_eq!(parse_number(Some("1.5")), Some(1.5));
        assert_eq!(parse_number(Some(" 2 ")), Some(2.0));
        assert_eq!(parse_number(Some("")), None);
        assert_eq!(parse_number(Some("NaN")), None);
        assert_eq!(parse_number(Some("n/a")), None);
        assert_eq!(parse_number(None), None);
    }

    #[test]
    fn boolean_cells_accept_loose_spellings() {
        for v in ["true", "T", "1", "yes"] {
            assert!(parse_bool(Some(v)), "{v} should parse true");
        }
        for v in ["false", "0", "", "no", "2"] {
            assert!(!parse_bool(Some(v)), "{v} should parse false");
        }
        assert!(!parse_bool(None));
    }

    #[test]
    fn rows_map_into_planet_records() {
        let headers = csv::StringRecord::from(vec![
            "pl_name",
            "hostname",
            "pl_rade",
            "pl_bmasse",
            "pl_g_rel",
            "pl_is_rocky_size",
            "pl_is_conservative_candidate",
            "has_data",
        ]);
        let record = csv::StringRecord::from(vec![
            "Kepler-442 b",
            "Kepler-442",
            "1.34",
            "",
            "1.30",
            "true",
            "1",
            "yes",
        ]);
        let planet = planet_from_row(&Row {
            headers: &headers,
            record: &record,
        });
        assert_eq!(planet.name.as_deref(), Some("Kepler-442 b"));
        assert_eq!(planet.radius_earth, Some(1.34));
        assert_eq!(planet.mass_earth, None);
        assert!(planet.is_rocky_size);
        assert!(planet.is_conservative_candidate);
        assert!(!planet.is_optimistic_candidate);
        assert!(planet.has_data);
    }
}
