//! Hover tooltip content for planets, systems, and candidate summaries.

use crate::data::{CandidateSummary, PlanetRecord, SystemRecord};
use crate::scenes::{HABITABLE, ROCKY};
use eframe::egui;

pub const PARSECS_TO_LY: f64 = 3.26156;

fn row(ui: &mut egui::Ui, text: String) {
    ui.label(egui::RichText::new(text).size(12.0));
}

fn header(ui: &mut egui::Ui, name: &str) {
    ui.label(egui::RichText::new(name).strong().size(14.0));
    ui.separator();
}

pub fn planet_tooltip_ui(ui: &mut egui::Ui, planet: &PlanetRecord) {
    ui.set_min_width(160.0);
    header(ui, planet.name.as_deref().unwrap_or("Unknown"));
    if let Some(host) = &planet.host_name {
        row(ui, format!("Host: {host}"));
    }
    if let Some(r) = planet.radius_earth {
        row(ui, format!("Radius: {r:.2} R⊕"));
    }
    if let Some(m) = planet.mass_earth {
        row(ui, format!("Mass: {m:.2} M⊕"));
    }
    if let Some(g) = planet.relative_gravity {
        row(ui, format!("Gravity: {g:.2} g⊕"));
    }
    if let Some(s) = planet.insolation_merged {
        row(ui, format!("Insolation: {s:.2} S⊕"));
    }
    if let Some(t) = planet.equilibrium_temp_k {
        row(ui, format!("Eq. Temp: {t:.0} K"));
    }
    if let Some(d) = planet.distance_pc {
        row(ui, format!("Distance: {d:.1} pc"));
    }
    if planet.is_conservative_candidate {
        ui.label(
            egui::RichText::new("★ Conservative candidate")
                .color(HABITABLE)
                .size(12.0),
        );
    } else if planet.is_optimistic_candidate {
        ui.label(
            egui::RichText::new("★ Optimistic candidate")
                .color(ROCKY)
                .size(12.0),
        );
    }
}

/// System hover card. Candidate counts only show on the candidates scene;
/// the "optimistic only" figure is a display derivation, the stored
/// counters stay independent.
pub fn system_tooltip_ui(ui: &mut egui::Ui, system: &SystemRecord, show_candidates: bool) {
    ui.set_min_width(160.0);
    header(ui, &system.host_name);
    if let Some(n) = system.planet_count {
        row(ui, format!("Planets: {n}"));
    }
    if let Some(d) = system.distance_pc {
        row(ui, format!("Distance: {d:.1} pc"));
    }
    if let Some(t) = &system.spectral_type {
        row(ui, format!("Spectral Type: {t}"));
    }
    if let Some(t) = system.stellar_temp_k {
        row(ui, format!("Temp: {t:.0} K"));
    }
    if let Some(m) = system.stellar_mass_sun {
        row(ui, format!("Mass: {m:.2} M☉"));
    }
    if let Some(r) = system.stellar_radius_sun {
        row(ui, format!("Radius: {r:.2} R☉"));
    }
    if show_candidates && system.has_candidate {
        let conservative = system.candidate_count_conservative;
        let optimistic_only = system.optimistic_only_count();
        if conservative > 0 {
            ui.label(
                egui::RichText::new(format!("★ {conservative} conservative"))
                    .color(HABITABLE)
                    .size(12.0),
            );
        }
        if optimistic_only > 0 {
            ui.label(
                egui::RichText::new(format!("★ {optimistic_only} optimistic only"))
                    .color(ROCKY)
                    .size(12.0),
            );
        }
    }
}

pub fn candidate_tooltip_ui(ui: &mut egui::Ui, candidate: &CandidateSummary, host: &str) {
    ui.set_min_width(160.0);
    header(ui, candidate.name.as_deref().unwrap_or("Unknown"));
    row(ui, format!("Host: {host}"));
    if let Some(r) = candidate.radius_earth {
        row(ui, format!("Radius: {r:.2} R⊕"));
    }
    if let Some(m) = candidate.mass_earth {
        row(ui, format!("Mass: {m:.2} M⊕"));
    }
    if let Some(g) = candidate.relative_gravity {
        row(ui, format!("Gravity: {g:.2} g⊕"));
    }
    if let Some(s) = candidate.insolation_merged {
        row(ui, format!("Insolation: {s:.2} S⊕"));
    }
    if let Some(p) = candidate.period_days {
        row(ui, format!("Period: {p:.1} days"));
    }
    if candidate.is_conservative_candidate {
        ui.label(
            egui::RichText::new("★ Conservative candidate")
                .color(HABITABLE)
                .size(12.0),
        );
    } else if candidate.is_optimistic_candidate {
        ui.label(
            egui::RichText::new("★ Optimistic candidate")
                .color(ROCKY)
                .size(12.0),
        );
    }
}
