//! Small-multiples card renderer.
//!
//! One animated portrait per system with a conservative candidate: the
//! host star(s) morph into Sun form and back on a repeating cycle, Earth
//! and the candidate planet travel the same shared orbit at independent
//! periods, and concentric rings pulse inward at a rate tied to surface
//! gravity. All real quantities are clamped to a narrow display range
//! before scaling so missing or pathological data cannot produce
//! degenerate shapes.

use crate::data::{CandidateSummary, SystemRecord};
use crate::tooltip::PARSECS_TO_LY;
use eframe::egui;

/// Seconds for one Earth revolution on the shared orbit.
pub const EARTH_ORBIT_PERIOD_SECS: f64 = 120.0;

/// Card-local coordinate space; everything is laid out in a 200-unit box.
const CARD_UNITS: f32 = 200.0;
const CARD_PX: f32 = 180.0;
const ORBIT_RADIUS: f32 = 65.0;
const SUN_RADIUS: f32 = 15.0;
/// Earth radius in solar radii, scaled up 50x for visibility.
const EARTH_TO_SUN_RADIUS: f64 = 0.009155;

/// Morph cycle: hold as system star(s), ease to Sun form, hold, ease back.
const MORPH_HOLD_SECS: f64 = 3.0;
const MORPH_EASE_SECS: f64 = 1.0;
const MORPH_CYCLE_SECS: f64 = 2.0 * (MORPH_HOLD_SECS + MORPH_EASE_SECS);

const SUN_COLOR: egui::Color32 = egui::Color32::from_rgb(0xff, 0xd9, 0x3d);
const ORBIT_GUIDE: egui::Color32 = egui::Color32::from_rgb(0x7d, 0xd3, 0xfc);
const EARTH_ACCENT: egui::Color32 = egui::Color32::from_rgb(0xa8, 0x55, 0xf7);
const CANDIDATE_ACCENT: egui::Color32 = egui::Color32::from_rgb(0x4a, 0xde, 0x80);

/// Discrete temperature → spectral-class color mapping.
pub fn star_color(temp_k: Option<f64>) -> egui::Color32 {
    match temp_k {
        None => SUN_COLOR,
        Some(t) if t < 3700.0 => egui::Color32::from_rgb(0xff, 0x6b, 0x6b),
        Some(t) if t < 5200.0 => egui::Color32::from_rgb(0xff, 0x9f, 0x4a),
        Some(t) if t < 6000.0 => SUN_COLOR,
        Some(_) => egui::Color32::from_rgb(0xa5, 0xd8, 0xff),
    }
}

/// Clamp a relative astronomical ratio into the displayable window before
/// any scaling happens (clamp-then-scale).
pub fn clamp_display_ratio(v: Option<f64>) -> f64 {
    v.unwrap_or(1.0).clamp(0.3, 3.0)
}

/// Gravity pulse period in seconds: an inverse cubic of clamped relative
/// gravity, bounded so extreme worlds stay watchable. Lower gravity pulses
/// visibly slower, higher gravity faster.
pub fn gravity_pulse_period(g_rel: Option<f64>) -> f64 {
    let g = match g_rel {
        Some(g) if g > 0.0 => g.clamp(0.3, 2.0),
        _ => return 2.0,
    };
    (2.0 / g.powi(3)).clamp(0.3, 8.0)
}

/// Animation period for the candidate's orbit: the real orbital period is
/// log-compressed and clamped so wildly different years remain comparable
/// within one UI cycle.
pub fn orbit_animation_period(period_days: Option<f64>) -> f64 {
    let days = match period_days {
        Some(d) if d > 0.0 => d.clamp(10.0, 1000.0),
        _ => return EARTH_ORBIT_PERIOD_SECS,
    };
    let ratio = (days / 365.0).ln() / 10f64.ln();
    (EARTH_ORBIT_PERIOD_SECS * 2f64.powf(ratio)).clamp(30.0, 240.0)
}

fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Position in the morph cycle: 0 = system star form, 1 = Sun form.
pub fn morph_progress(now: f64, offset: f64) -> f64 {
    let t = (now + offset).rem_euclid(MORPH_CYCLE_SECS);
    if t < MORPH_HOLD_SECS {
        0.0
    } else if t < MORPH_HOLD_SECS + MORPH_EASE_SECS {
        smoothstep(t - MORPH_HOLD_SECS)
    } else if t < 2.0 * MORPH_HOLD_SECS + MORPH_EASE_SECS {
        1.0
    } else {
        1.0 - smoothstep(t - 2.0 * MORPH_HOLD_SECS - MORPH_EASE_SECS)
    }
}

/// Per-card morph clocks must never synchronize; derive a stable phase
/// offset from the host name.
fn morph_offset(host: &str) -> f64 {
    let mut x: u64 = 0xcbf29ce484222325;
    for b in host.bytes() {
        x ^= b as u64;
        x = x.wrapping_mul(0x100000001b3);
    }
    (x % 8000) as f64 / 1000.0
}

/// Static layout of the system's stars around the card center, with a
/// per-star radius multiplier. Patterns: single at center, binary side by
/// side, three or more on a radial arrangement (capped at four drawn).
fn star_layout(star_count: i64, star_radius: f32) -> Vec<(egui::Vec2, f32)> {
    match star_count.max(1) {
        1 => vec![(egui::Vec2::ZERO, 1.0)],
        2 => {
            let sep = star_radius * 1.5;
            vec![
                (egui::vec2(-sep, 0.0), 0.85),
                (egui::vec2(sep, 0.0), 0.85),
            ]
        }
        n => {
            let drawn = n.min(4);
            let sep = star_radius * 1.2;
            (0..drawn)
                .map(|i| {
                    let angle = i as f32 * std::f32::consts::TAU / drawn as f32;
                    (egui::vec2(angle.cos() * sep, angle.sin() * sep), 0.7)
                })
                .collect()
        }
    }
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_color(a: egui::Color32, b: egui::Color32, t: f32) -> egui::Color32 {
    egui::Color32::from_rgb(
        lerp(a.r() as f32, b.r() as f32, t) as u8,
        lerp(a.g() as f32, b.g() as f32, t) as u8,
        lerp(a.b() as f32, b.b() as f32, t) as u8,
    )
}

struct Card {
    system_row: usize,
    star_color: egui::Color32,
    star_radius: f32,
    stars: Vec<(egui::Vec2, f32)>,
    earth_radius: f32,
    earth_pulse_period: f64,
    candidate_radius: f32,
    candidate_pulse_period: f64,
    candidate_orbit_period: f64,
    morph_offset: f64,
    distance_ly: Option<f64>,
}

impl Card {
    fn build(system: &SystemRecord, row: usize, candidate: &CandidateSummary) -> Self {
        let star_radius = (clamp_display_ratio(system.stellar_radius_sun) * 15.0).max(8.0) as f32;
        let candidate_in_star_radii =
            clamp_display_ratio(candidate.radius_earth) * EARTH_TO_SUN_RADIUS;
        Self {
            system_row: row,
            star_color: star_color(system.stellar_temp_k),
            star_radius,
            stars: star_layout(system.star_count.unwrap_or(1), star_radius),
            earth_radius: ((SUN_RADIUS as f64) * EARTH_TO_SUN_RADIUS * 50.0).max(6.0) as f32,
            earth_pulse_period: gravity_pulse_period(Some(1.0)),
            candidate_radius: ((star_radius as f64) * candidate_in_star_radii * 50.0).max(6.0)
                as f32,
            candidate_pulse_period: gravity_pulse_period(candidate.relative_gravity),
            candidate_orbit_period: orbit_animation_period(candidate.period_days),
            morph_offset: morph_offset(&system.host_name),
            distance_ly: system.distance_pc.map(|d| d * PARSECS_TO_LY),
        }
    }
}

pub struct CardsView {
    cards: Vec<Card>,
    selected: Option<usize>,
}

impl CardsView {
    pub fn new() -> Self {
        Self {
            cards: Vec::new(),
            selected: None,
        }
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    #[cfg(test)]
    fn card_hosts<'a>(&self, systems: &'a [SystemRecord]) -> Vec<&'a str> {
        self.cards
            .iter()
            .map(|c| systems[c.system_row].host_name.as_str())
            .collect()
    }

    /// Rebuild the grid: systems with at least one conservative candidate,
    /// nearest first.
    pub fn update(&mut self, systems: &[SystemRecord], filtered: &[usize]) {
        self.selected = None;
        let mut rows: Vec<usize> = filtered
            .iter()
            .copied()
            .filter(|&i| {
                systems[i].candidate_count_conservative >= 1
                    && systems[i].conservative_candidate().is_some()
            })
            .collect();
        rows.sort_by(|&a, &b| {
            let da = systems[a].distance_pc.unwrap_or(f64::INFINITY);
            let db = systems[b].distance_pc.unwrap_or(f64::INFINITY);
            da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
        });
        self.cards = rows
            .iter()
            .filter_map(|&i| {
                systems[i]
                    .conservative_candidate()
                    .map(|c| Card::build(&systems[i], i, c))
            })
            .collect();
    }

    pub fn draw(&mut self, ui: &mut egui::Ui, systems: &[SystemRecord], now: f64) {
        if self.cards.is_empty() {
            ui.centered_and_justified(|ui| {
                ui.label(
                    egui::RichText::new("No conservative candidate systems found").weak(),
                );
            });
            return;
        }

        let mut clicked: Option<usize> = None;
        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.add_space(8.0);
            let columns = ((ui.available_width() / (CARD_PX + 16.0)) as usize).max(1);
            egui::Grid::new("system_cards")
                .num_columns(columns)
                .spacing([16.0, 16.0])
                .show(ui, |ui| {
                    for (idx, card) in self.cards.iter().enumerate() {
                        if idx > 0 && idx % columns == 0 {
                            ui.end_row();
                        }
                        ui.vertical(|ui| {
                            let (response, painter) = ui.allocate_painter(
                                egui::vec2(CARD_PX, CARD_PX),
                                egui::Sense::click().union(egui::Sense::hover()),
                            );
                            draw_card(&painter, response.rect, card, now);
                            if response.hovered() {
                                painter.rect_stroke(
                                    response.rect,
                                    4.0,
                                    egui::Stroke::new(1.0, ORBIT_GUIDE.gamma_multiply(0.6)),
                                    egui::StrokeKind::Outside,
                                );
                                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                            }
                            if response.clicked() {
                                clicked = Some(idx);
                            }

                            let system = &systems[card.system_row];
                            ui.label(
                                egui::RichText::new(&system.host_name).strong().size(12.0),
                            );
                            let distance = match card.distance_ly {
                                Some(ly) => format!("{:.0} ly", ly),
                                None => "? ly".to_string(),
                            };
                            ui.label(egui::RichText::new(distance).weak().size(10.0));
                        });
                    }
                    ui.end_row();
                });
            ui.add_space(8.0);
        });

        if let Some(idx) = clicked {
            self.selected = Some(idx);
        }
        self.show_detail_window(ui, systems);

        // the grid animates continuously while it is on screen
        ui.ctx().request_repaint();
    }

    fn show_detail_window(&mut self, ui: &mut egui::Ui, systems: &[SystemRecord]) {
        let Some(idx) = self.selected else { return };
        let Some(card) = self.cards.get(idx) else {
            self.selected = None;
            return;
        };
        let system = &systems[card.system_row];
        let Some(candidate) = system.conservative_candidate() else {
            self.selected = None;
            return;
        };

        let mut open = true;
        egui::Window::new(&system.host_name)
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
            .show(ui.ctx(), |ui| {
                ui.label(egui::RichText::new("Star Properties").strong());
                detail_row(ui, "Temperature", system.stellar_temp_k.map(|t| format!("{t:.0} K")));
                detail_row(ui, "Radius", system.stellar_radius_sun.map(|r| format!("{r:.2} R☉")));
                detail_row(ui, "Mass", system.stellar_mass_sun.map(|m| format!("{m:.2} M☉")));
                detail_row(ui, "Spectral Type", system.spectral_type.clone());
                ui.separator();

                ui.label(egui::RichText::new("System Information").strong());
                detail_row(
                    ui,
                    "Distance",
                    card.distance_ly.map(|ly| format!("{:.0} light years", ly)),
                );
                detail_row(ui, "Total Planets", system.planet_count.map(|n| n.to_string()));
                detail_row(
                    ui,
                    "Conservative Candidates",
                    Some(system.candidate_count_conservative.to_string()),
                );
                detail_row(
                    ui,
                    "Optimistic Candidates",
                    Some(system.candidate_count_optimistic.to_string()),
                );
                ui.separator();

                ui.label(
                    egui::RichText::new(format!(
                        "Candidate Planet: {}",
                        candidate.name.as_deref().unwrap_or("Unknown")
                    ))
                    .strong(),
                );
                detail_row(ui, "Orbital Period", candidate.period_days.map(|p| format!("{p:.1} days")));
                detail_row(
                    ui,
                    "Semi-Major Axis",
                    candidate.semi_major_axis_au.map(|a| format!("{a:.3} AU")),
                );
                detail_row(ui, "Radius", candidate.radius_earth.map(|r| format!("{r:.2} R⊕")));
                detail_row(
                    ui,
                    "Surface Gravity",
                    candidate.relative_gravity.map(|g| format!("{g:.2} g")),
                );
                detail_row(
                    ui,
                    "Equilibrium Temp",
                    candidate.equilibrium_temp_k.map(|t| format!("{t:.0} K")),
                );
            });
        if !open {
            self.selected = None;
        }
    }
}

fn detail_row(ui: &mut egui::Ui, label: &str, value: Option<String>) {
    ui.horizontal(|ui| {
        ui.label(egui::RichText::new(format!("{label}:")).weak().size(12.0));
        ui.label(egui::RichText::new(value.unwrap_or_else(|| "Unknown".into())).size(12.0));
    });
}

fn draw_card(painter: &egui::Painter, rect: egui::Rect, card: &Card, now: f64) {
    let painter = painter.with_clip_rect(rect);
    painter.rect_filled(rect, 4.0, egui::Color32::from_rgb(8, 14, 34));

    let scale = rect.width() / CARD_UNITS;
    let center = rect.center();
    let unit = |v: f32| v * scale;

    // shared orbital path, the visible guide both planets travel
    painter.circle_stroke(
        center,
        unit(ORBIT_RADIUS),
        egui::Stroke::new(0.8, ORBIT_GUIDE.gamma_multiply(0.4)),
    );

    // star(s), interpolated between system form and Sun form
    let sun_t = morph_progress(now, card.morph_offset) as f32;
    for (i, (offset, radius_mult)) in card.stars.iter().enumerate() {
        let pos = egui::pos2(
            center.x + unit(offset.x) * (1.0 - sun_t),
            center.y + unit(offset.y) * (1.0 - sun_t),
        );
        let r = unit(lerp(card.star_radius * radius_mult, SUN_RADIUS, sun_t));
        let color = lerp_color(card.star_color, SUN_COLOR, sun_t);
        // secondary stars fade out as the card merges into a single Sun
        let alpha = if i > 0 { 1.0 - sun_t } else { 1.0 };
        if alpha <= 0.01 {
            continue;
        }
        painter.circle_filled(pos, r * 1.6, color.gamma_multiply(0.25 * alpha));
        painter.circle_filled(pos, r, color.gamma_multiply(alpha));
    }

    // Earth and the candidate share the orbit at independent periods
    let earth_angle = std::f64::consts::TAU * now / EARTH_ORBIT_PERIOD_SECS;
    let earth_pos = orbit_pos(center, unit(ORBIT_RADIUS), earth_angle);
    draw_pulsing_planet(
        &painter,
        earth_pos,
        unit(card.earth_radius),
        EARTH_ACCENT,
        card.earth_pulse_period,
        now,
        "⊕",
    );

    let candidate_angle =
        std::f64::consts::TAU * (now - 0.5) / card.candidate_orbit_period;
    let candidate_pos = orbit_pos(center, unit(ORBIT_RADIUS), candidate_angle);
    draw_pulsing_planet(
        &painter,
        candidate_pos,
        unit(card.candidate_radius),
        CANDIDATE_ACCENT,
        card.candidate_pulse_period,
        now,
        "P",
    );
}

fn orbit_pos(center: egui::Pos2, radius: f32, angle: f64) -> egui::Pos2 {
    egui::pos2(
        center.x + (angle.cos() as f32) * radius,
        center.y + (angle.sin() as f32) * radius,
    )
}

/// Planet outline with concentric rings sweeping from the outer radius
/// inward; ring cadence encodes surface gravity.
fn draw_pulsing_planet(
    painter: &egui::Painter,
    pos: egui::Pos2,
    radius: f32,
    accent: egui::Color32,
    pulse_period: f64,
    now: f64,
    label: &str,
) {
    painter.circle_stroke(pos, radius, egui::Stroke::new(1.0, accent));

    for i in 0..4 {
        let phase = ((now - i as f64 * pulse_period / 4.0).rem_euclid(pulse_period))
            / pulse_period;
        let ring_r = radius * (1.0 - phase as f32);
        // fade in fast, hold, fade out at the center
        let alpha = if phase < 0.1 {
            0.6 * (phase / 0.1)
        } else if phase < 0.9 {
            0.6
        } else {
            0.6 * (1.0 - phase) / 0.1
        };
        let alpha = alpha as f32;
        if ring_r > 0.3 && alpha > 0.01 {
            painter.circle_stroke(
                pos,
                ring_r,
                egui::Stroke::new(0.75, accent.gamma_multiply(alpha)),
            );
        }
    }

    painter.text(
        egui::pos2(pos.x + radius + 4.0, pos.y),
        egui::Align2::LEFT_CENTER,
        label,
        egui::FontId::proportional(8.0),
        accent,
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_color_follows_temperature_classes() {
        assert_eq!(star_color(Some(3000.0)), egui::Color32::from_rgb(0xff, 0x6b, 0x6b));
        assert_eq!(star_color(Some(4500.0)), egui::Color32::from_rgb(0xff, 0x9f, 0x4a));
        assert_eq!(star_color(Some(5778.0)), SUN_COLOR);
        assert_eq!(star_color(Some(6500.0)), egui::Color32::from_rgb(0xa5, 0xd8, 0xff));
        assert_eq!(star_color(None), SUN_COLOR);
    }

    #[test]
    fn gravity_pulse_period_is_bounded_and_inverse() {
        // lower gravity pulses slower, higher gravity faster
        assert!(gravity_pulse_period(Some(0.5)) > gravity_pulse_period(Some(1.0)));
        assert!(gravity_pulse_period(Some(1.5)) < gravity_pulse_period(Some(1.0)));
        // clamps keep extreme worlds watchable
        assert_eq!(gravity_pulse_period(Some(0.01)), 8.0);
        assert!((gravity_pulse_period(Some(100.0)) - 0.3).abs() < 1e-9);
        // unknown gravity gets the Earth-like default
        assert_eq!(gravity_pulse_period(None), 2.0);
        assert_eq!(gravity_pulse_period(Some(-1.0)), 2.0);
    }

    #[test]
    fn orbit_animation_period_compresses_and_clamps() {
        let earth_like = orbit_animation_period(Some(365.0));
        assert!((earth_like - EARTH_ORBIT_PERIOD_SECS).abs() < 1e-9);

        let fast = orbit_animation_period(Some(10.0));
        let slow = orbit_animation_period(Some(1000.0));
        assert!(fast < earth_like && earth_like < slow);
        assert!(fast >= 30.0 && slow <= 240.0);

        // out-of-range real periods clamp before compression
        assert_eq!(orbit_animation_period(Some(1.0)), orbit_animation_period(Some(10.0)));
        assert_eq!(orbit_animation_period(None), EARTH_ORBIT_PERIOD_SECS);
    }

    #[test]
    fn display_ratio_clamps_before_scaling() {
        assert_eq!(clamp_display_ratio(Some(0.0)), 0.3);
        assert_eq!(clamp_display_ratio(Some(50.0)), 3.0);
        assert_eq!(clamp_display_ratio(Some(1.2)), 1.2);
        assert_eq!(clamp_display_ratio(None), 1.0);
    }

    #[test]
    fn morph_cycle_holds_then_eases_both_ways() {
        assert_eq!(morph_progress(0.0, 0.0), 0.0);
        assert_eq!(morph_progress(2.9, 0.0), 0.0);
        let rising = morph_progress(3.5, 0.0);
        assert!(rising > 0.0 && rising < 1.0);
        assert_eq!(morph_progress(5.0, 0.0), 1.0);
        assert_eq!(morph_progress(6.9, 0.0), 1.0);
        let falling = morph_progress(7.5, 0.0);
        assert!(falling > 0.0 && falling < 1.0);
        // full cycle wraps
        assert_eq!(morph_progress(8.0, 0.0), 0.0);
    }

    #[test]
    fn morph_offsets_decorrelate_cards() {
        let a = morph_offset("Kepler-442");
        let b = morph_offset("TRAPPIST-1");
        assert_ne!(a, b);
        assert!(a >= 0.0 && a < MORPH_CYCLE_SECS);
    }

    #[test]
    fn star_layouts_match_multiplicity() {
        assert_eq!(star_layout(1, 15.0).len(), 1);
        assert_eq!(star_layout(2, 15.0).len(), 2);
        assert_eq!(star_layout(3, 15.0).len(), 3);
        // capped at four drawn stars
        assert_eq!(star_layout(6, 15.0).len(), 4);
        // single star sits at the center
        assert_eq!(star_layout(1, 15.0)[0].0, egui::Vec2::ZERO);
    }

    fn system(host: &str, dist: Option<f64>, conservative: bool) -> SystemRecord {
        let candidate = CandidateSummary {
            name: Some(format!("{host} b")),
            is_conservative_candidate: conservative,
            is_optimistic_candidate: !conservative,
            ..Default::default()
        };
        SystemRecord {
            host_name: host.to_string(),
            distance_pc: dist,
            has_candidate: true,
            candidate_count_conservative: u32::from(conservative),
            candidate_count_optimistic: u32::from(!conservative),
            candidate_planets: vec![candidate],
            ..Default::default()
        }
    }

    #[test]
    fn update_keeps_conservative_systems_sorted_by_distance() {
        let systems = vec![
            system("Far", Some(300.0), true),
            system("OptimisticOnly", Some(5.0), false),
            system("Near", Some(12.0), true),
            system("NoDistance", None, true),
        ];
        let filtered: Vec<usize> = (0..systems.len()).collect();
        let mut view = CardsView::new();
        view.update(&systems, &filtered);

        assert_eq!(view.card_count(), 3);
        assert_eq!(view.card_hosts(&systems), vec!["Near", "Far", "NoDistance"]);
    }
}
