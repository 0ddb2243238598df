//! Galaxy renderer.
//!
//! Positions systems by polar projection (angle from galactic longitude,
//! radius from log-scaled distance), autoscales the cloud to the viewport,
//! draws a circular distance/angle grid, lays out orbiting candidate
//! planets around hover-eligible hosts, and hit-tests the nearest point
//! under the current pan/zoom transform. While a scene with orbits is
//! active the renderer keeps a continuous frame loop running; leaving the
//! scene stops it.

use crate::data::SystemRecord;
use crate::scene::GalaxySpec;
use crate::scenes::{HABITABLE, ROCKY};
use crate::tooltip;
use eframe::egui;

pub const HIT_THRESHOLD_PX: f32 = 15.0;
pub const PLANET_HIT_THRESHOLD_PX: f32 = 10.0;
pub const MAX_AUTOSCALE: f64 = 200.0;
const FALLBACK_SCALE: f64 = 60.0;
/// Opacity above which a point is considered highlighted (glow, orbits).
const HIGHLIGHT_OPACITY: f32 = 0.7;
/// Orbit sub-layout angular rate, radians per second of wall-clock time.
const ORBIT_RATE: f64 = 0.1;

const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(2, 6, 23);
const GRID: egui::Color32 = egui::Color32::from_rgb(148, 163, 184);
const LABEL: egui::Color32 = egui::Color32::from_rgb(156, 163, 175);
const CENTER_LABEL: egui::Color32 = egui::Color32::from_rgb(229, 231, 235);
const HOVER_ACCENT: egui::Color32 = egui::Color32::from_rgb(0x22, 0xd3, 0xee);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimState {
    Idle,
    Running,
}

/// Screen placement of the projected galaxy: world -> screen is
/// `center + world * scale + pan`.
#[derive(Debug, Clone, Copy)]
pub struct GalaxyTransform {
    pub center: egui::Pos2,
    pub scale: f64,
    pub pan: egui::Vec2,
}

impl GalaxyTransform {
    pub fn to_screen(&self, world: [f64; 2]) -> egui::Pos2 {
        egui::pos2(
            self.center.x + (world[0] * self.scale) as f32 + self.pan.x,
            self.center.y + (world[1] * self.scale) as f32 + self.pan.y,
        )
    }

    pub fn to_world(&self, screen: egui::Pos2) -> [f64; 2] {
        [
            (screen.x - self.center.x - self.pan.x) as f64 / self.scale,
            (screen.y - self.center.y - self.pan.y) as f64 / self.scale,
        ]
    }
}

/// Largest scale factor that fits the projected extent into ~90% of the
/// viewport in both dimensions, capped so a tight cluster cannot blow up
/// to infinity.
pub fn autoscale_factor(positions: &[[f64; 2]], width: f64, height: f64) -> f64 {
    if positions.is_empty() {
        return FALLBACK_SCALE;
    }
    let mut min_x = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for p in positions {
        min_x = min_x.min(p[0]);
        max_x = max_x.max(p[0]);
        min_y = min_y.min(p[1]);
        max_y = max_y.max(p[1]);
    }
    let x_range = (max_x - min_x).max(1e-9);
    let y_range = (max_y - min_y).max(1e-9);
    let x_scale = width * 0.9 / x_range;
    let y_scale = height * 0.9 / y_range;
    x_scale.min(y_scale).min(MAX_AUTOSCALE)
}

/// Nearest hover-eligible system within `threshold` screen pixels of the
/// cursor, under the given transform.
pub fn nearest_hoverable(
    systems: &[&SystemRecord],
    spec: &GalaxySpec,
    transform: &GalaxyTransform,
    cursor: egui::Pos2,
    threshold: f32,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for (i, system) in systems.iter().enumerate() {
        if !(spec.hoverable)(system) {
            continue;
        }
        let screen = transform.to_screen(GalaxySpec::project(system));
        let dist = screen.distance(cursor);
        if dist < threshold && best.map_or(true, |(_, d)| dist < d) {
            best = Some((i, dist));
        }
    }
    best.map(|(i, _)| i)
}

struct OrbitingPlanet {
    pos: egui::Pos2,
    radius: f32,
    system: usize,
    candidate: usize,
}

pub struct GalaxyView {
    zoom: f64,
    pan: egui::Vec2,
    anim: AnimState,
    hovered_system: Option<usize>,
    hovered_planet: Option<(usize, usize)>,
}

impl GalaxyView {
    pub fn new() -> Self {
        Self {
            zoom: 1.0,
            pan: egui::Vec2::ZERO,
            anim: AnimState::Idle,
            hovered_system: None,
            hovered_planet: None,
        }
    }

    /// Scene entry: pan/zoom are scene-scoped and reset here; the frame
    /// loop starts only for orbit-bearing scenes.
    pub fn set_scene(&mut self, spec: &GalaxySpec) {
        self.zoom = 1.0;
        self.pan = egui::Vec2::ZERO;
        self.hovered_system = None;
        self.hovered_planet = None;
        self.anim = if spec.orbits {
            AnimState::Running
        } else {
            AnimState::Idle
        };
    }

    /// Scene exit: cancel the frame loop before another view takes over.
    pub fn stop(&mut self) {
        self.anim = AnimState::Idle;
        self.hovered_system = None;
        self.hovered_planet = None;
    }

    #[cfg(test)]
    pub fn anim_state(&self) -> AnimState {
        self.anim
    }

    pub fn draw(
        &mut self,
        ui: &mut egui::Ui,
        systems: &[&SystemRecord],
        spec: &GalaxySpec,
        now: f64,
    ) {
        let size = ui.available_size();
        let (response, painter) = ui.allocate_painter(
            size,
            egui::Sense::click_and_drag().union(egui::Sense::hover()),
        );
        let rect = response.rect;
        let painter = painter.with_clip_rect(rect);
        painter.rect_filled(rect, 0.0, BACKGROUND);

        if systems.is_empty() {
            return;
        }

        let positions: Vec<[f64; 2]> = systems.iter().map(|s| GalaxySpec::project(s)).collect();
        let base_scale = autoscale_factor(&positions, rect.width() as f64, rect.height() as f64);

        // wheel zoom, anchored so the world point under the cursor stays put
        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll.abs() > 0.1 {
                if let Some(cursor) = response.hover_pos() {
                    let before = GalaxyTransform {
                        center: rect.center(),
                        scale: base_scale * self.zoom,
                        pan: self.pan,
                    };
                    let anchor = before.to_world(cursor);
                    self.zoom = (self.zoom * (scroll as f64 * 0.002).exp()).clamp(0.2, 50.0);
                    let scale = base_scale * self.zoom;
                    self.pan = egui::vec2(
                        cursor.x - rect.center().x - (anchor[0] * scale) as f32,
                        cursor.y - rect.center().y - (anchor[1] * scale) as f32,
                    );
                }
            }
        }

        // drag pans the whole scene unless the cursor is on an interactive point
        if response.dragged() && self.hovered_system.is_none() && self.hovered_planet.is_none() {
            self.pan += response.drag_delta();
        }

        let transform = GalaxyTransform {
            center: rect.center(),
            scale: base_scale * self.zoom,
            pan: self.pan,
        };

        let max_world_r = positions
            .iter()
            .map(|p| (p[0] * p[0] + p[1] * p[1]).sqrt())
            .fold(0.0_f64, f64::max);
        self.draw_circular_grid(&painter, &transform, max_world_r);

        // dim context first, bright highlights on top
        let mut order: Vec<usize> = (0..systems.len()).collect();
        order.sort_by(|&a, &b| {
            spec.opacity_of(systems[a])
                .partial_cmp(&spec.opacity_of(systems[b]))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        // orbit sub-layout positions are needed before hover resolution
        let mut orbiting: Vec<OrbitingPlanet> = Vec::new();
        if spec.orbits {
            for &i in &order {
                let system = systems[i];
                if !system.has_candidate || spec.opacity_of(system) <= HIGHLIGHT_OPACITY {
                    continue;
                }
                let star = transform.to_screen(positions[i]);
                let star_r = spec.size_of(system);
                let n = system.candidate_planets.len().max(1);
                for (ci, candidate) in system.candidate_planets.iter().enumerate() {
                    let orbit_r = star_r * 3.0
                        + (candidate.semi_major_axis_au.unwrap_or((ci + 1) as f64) * 8.0) as f32;
                    let angle = ci as f64 * std::f64::consts::TAU / n as f64 + now * ORBIT_RATE;
                    let pos = egui::pos2(
                        star.x + (angle.cos() as f32) * orbit_r,
                        star.y + (angle.sin() as f32) * orbit_r,
                    );
                    let radius = ((candidate.radius_earth.unwrap_or(1.0) * 1.5) as f32).max(2.0);
                    orbiting.push(OrbitingPlanet {
                        pos,
                        radius,
                        system: i,
                        candidate: ci,
                    });
                }
            }
        }

        self.hovered_planet = None;
        self.hovered_system = None;
        if let Some(cursor) = response.hover_pos() {
            let mut best = PLANET_HIT_THRESHOLD_PX;
            for planet in &orbiting {
                let dist = planet.pos.distance(cursor);
                if dist < best {
                    best = dist;
                    self.hovered_planet = Some((planet.system, planet.candidate));
                }
            }
            if self.hovered_planet.is_none() {
                self.hovered_system =
                    nearest_hoverable(systems, spec, &transform, cursor, HIT_THRESHOLD_PX);
            }
        }

        for &i in &order {
            let system = systems[i];
            let screen = transform.to_screen(positions[i]);
            let r = spec.size_of(system);
            let color = spec.color_of(system);
            let alpha = spec.opacity_of(system);
            let hovered = self.hovered_system == Some(i);

            if spec.orbits && system.has_candidate && alpha > HIGHLIGHT_OPACITY {
                self.draw_orbits(&painter, screen, system, color, &orbiting, i);
            }

            if hovered {
                // layered halo so the hovered system reads from across the map
                for (mult, a) in [(8.0, 30), (4.0, 60), (2.0, 110)] {
                    painter.circle_filled(
                        screen,
                        r * mult,
                        egui::Color32::from_rgba_unmultiplied(0x22, 0xd3, 0xee, a),
                    );
                }
                painter.circle_stroke(screen, r * 1.5, egui::Stroke::new(2.0, HOVER_ACCENT));
            } else if alpha > HIGHLIGHT_OPACITY {
                for (mult, a) in [(2.5, 40), (1.6, 80)] {
                    painter.circle_filled(screen, r * mult, color.gamma_multiply(a as f32 / 255.0));
                }
            }

            painter.circle_filled(screen, r, color.gamma_multiply(alpha));
            if alpha > 0.6 {
                painter.circle_stroke(
                    screen,
                    r,
                    egui::Stroke::new(0.5, egui::Color32::WHITE.gamma_multiply(alpha * 0.5)),
                );
            }
        }

        if let Some((si, ci)) = self.hovered_planet {
            let system = systems[si];
            if let Some(candidate) = system.candidate_planets.get(ci) {
                ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
                egui::Tooltip::always_open(
                    ui.ctx().clone(),
                    egui::LayerId::background(),
                    egui::Id::new("galaxy_tooltip"),
                    egui::PopupAnchor::Pointer,
                )
                .gap(12.0)
                .show(|ui| tooltip::candidate_tooltip_ui(ui, candidate, &system.host_name));
            }
        } else if let Some(si) = self.hovered_system {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            egui::Tooltip::always_open(
                ui.ctx().clone(),
                egui::LayerId::background(),
                egui::Id::new("galaxy_tooltip"),
                egui::PopupAnchor::Pointer,
            )
            .gap(12.0)
            .show(|ui| tooltip::system_tooltip_ui(ui, systems[si], spec.orbits));
        }

        if self.anim == AnimState::Running {
            ui.ctx().request_repaint();
        }
    }

    fn draw_orbits(
        &self,
        painter: &egui::Painter,
        star: egui::Pos2,
        system: &SystemRecord,
        star_color: egui::Color32,
        orbiting: &[OrbitingPlanet],
        system_index: usize,
    ) {
        for planet in orbiting.iter().filter(|p| p.system == system_index) {
            let candidate = &system.candidate_planets[planet.candidate];
            let orbit_r = star.distance(planet.pos);
            painter.circle_stroke(
                star,
                orbit_r,
                egui::Stroke::new(0.5, star_color.gamma_multiply(0.3)),
            );

            let color = if candidate.is_conservative_candidate {
                HABITABLE
            } else if candidate.is_optimistic_candidate {
                ROCKY
            } else {
                egui::Color32::from_rgb(0x88, 0x88, 0x88)
            };
            if candidate.is_conservative_candidate || candidate.is_optimistic_candidate {
                painter.circle_filled(planet.pos, planet.radius * 2.0, color.gamma_multiply(0.25));
            }
            painter.circle_filled(planet.pos, planet.radius, color.gamma_multiply(0.8));
        }
    }

    fn draw_circular_grid(
        &self,
        painter: &egui::Painter,
        transform: &GalaxyTransform,
        max_world_r: f64,
    ) {
        if max_world_r <= 0.0 {
            return;
        }
        let origin = transform.to_screen([0.0, 0.0]);

        // more rings and tighter spokes as the user zooms in
        let rings = (4 + self.zoom.log2().round() as i64).clamp(3, 9) as usize;
        let spoke_step = if self.zoom >= 4.0 {
            15
        } else if self.zoom >= 2.0 {
            30
        } else {
            45
        };

        let grid_stroke = egui::Stroke::new(1.0, GRID.gamma_multiply(0.12));
        for i in 1..=rings {
            let world_r = max_world_r * i as f64 / rings as f64;
            let screen_r = (world_r * transform.scale) as f32;
            painter.circle_stroke(origin, screen_r, grid_stroke);

            // label with the real distance this projected ring corresponds to
            let parsecs = 10f64.powf(world_r) - 1.0;
            let label = if parsecs >= 1000.0 {
                format!("{:.1} kpc", parsecs / 1000.0)
            } else {
                format!("{:.0} pc", parsecs)
            };
            painter.text(
                egui::pos2(origin.x, origin.y - screen_r - 5.0),
                egui::Align2::CENTER_BOTTOM,
                label,
                egui::FontId::proportional(10.0),
                LABEL.gamma_multiply(0.6),
            );
        }

        let max_screen_r = (max_world_r * transform.scale) as f32;
        let spoke_stroke = egui::Stroke::new(1.0, GRID.gamma_multiply(0.08));
        for angle in (0..360).step_by(spoke_step) {
            let rad = (angle as f32).to_radians();
            let tip = egui::pos2(
                origin.x + rad.cos() * max_screen_r,
                origin.y + rad.sin() * max_screen_r,
            );
            painter.line_segment([origin, tip], spoke_stroke);

            if angle % 90 == 0 {
                let label_r = max_screen_r + 20.0;
                painter.text(
                    egui::pos2(
                        origin.x + rad.cos() * label_r,
                        origin.y + rad.sin() * label_r,
                    ),
                    egui::Align2::CENTER_CENTER,
                    format!("{angle}°"),
                    egui::FontId::proportional(11.0),
                    LABEL.gamma_multiply(0.7),
                );
            }
        }

        painter.text(
            egui::pos2(origin.x, origin.y - 5.0),
            egui::Align2::CENTER_BOTTOM,
            "Center",
            egui::FontId::proportional(12.0),
            CENTER_LABEL.gamma_multiply(0.8),
        );
        painter.text(
            egui::pos2(origin.x, origin.y + 8.0),
            egui::Align2::CENTER_CENTER,
            "(Solar System)",
            egui::FontId::proportional(10.0),
            CENTER_LABEL.gamma_multiply(0.7),
        );

        let rect = painter.clip_rect();
        painter.text(
            egui::pos2(rect.right() - 10.0, rect.bottom() - 10.0),
            egui::Align2::RIGHT_BOTTOM,
            "Distance: log₁₀(parsecs)",
            egui::FontId::proportional(11.0),
            LABEL.gamma_multiply(0.6),
        );
        painter.text(
            egui::pos2(rect.left() + 10.0, rect.top() + 10.0),
            egui::Align2::LEFT_TOP,
            "Angle: Galactic longitude (°)",
            egui::FontId::proportional(11.0),
            LABEL.gamma_multiply(0.6),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ViewSpec;
    use crate::scenes::build_scenes;

    fn system(host: &str, glon: f64, dist: f64, candidate: bool) -> SystemRecord {
        SystemRecord {
            host_name: host.to_string(),
            galactic_longitude_deg: Some(glon),
            distance_pc: Some(dist),
            has_data: true,
            has_candidate: candidate,
            candidate_count_optimistic: u32::from(candidate),
            ..Default::default()
        }
    }

    fn candidates_spec() -> GalaxySpec {
        match build_scenes()[5].view {
            ViewSpec::Galaxy(spec) => spec,
            _ => panic!("scene 5 must be a galaxy scene"),
        }
    }

    #[test]
    fn transform_round_trips() {
        let tf = GalaxyTransform {
            center: egui::pos2(320.0, 240.0),
            scale: 80.0,
            pan: egui::vec2(13.0, -27.0),
        };
        let world = [1.25, -0.5];
        let back = tf.to_world(tf.to_screen(world));
        assert!((back[0] - world[0]).abs() < 1e-5);
        assert!((back[1] - world[1]).abs() < 1e-5);
    }

    #[test]
    fn autoscale_fits_extent_and_caps() {
        let positions = vec![[-1.0, -1.0], [1.0, 1.0]];
        let s = autoscale_factor(&positions, 600.0, 400.0);
        // limited by the smaller dimension: 400 * 0.9 / 2
        assert!((s - 180.0).abs() < 1e-9);

        let tight = vec![[0.0, 0.0], [1e-6, 1e-6]];
        assert_eq!(autoscale_factor(&tight, 600.0, 400.0), MAX_AUTOSCALE);

        assert_eq!(autoscale_factor(&[], 600.0, 400.0), FALLBACK_SCALE);
    }

    #[test]
    fn hit_testing_respects_threshold_under_pan_zoom() {
        let spec = candidates_spec();
        let a = system("A", 0.0, 9.0, true); // world [1, 0]
        let b = system("B", 180.0, 9.0, true); // world [-1, 0]
        let systems: Vec<&SystemRecord> = vec![&a, &b];

        let tf = GalaxyTransform {
            center: egui::pos2(300.0, 200.0),
            scale: 100.0,
            pan: egui::vec2(10.0, 20.0),
        };
        let a_screen = tf.to_screen([1.0, 0.0]);

        // inside the threshold: found
        let near = egui::pos2(a_screen.x + 8.0, a_screen.y + 8.0);
        assert_eq!(nearest_hoverable(&systems, &spec, &tf, near, HIT_THRESHOLD_PX), Some(0));

        // beyond the threshold: nothing
        let far = egui::pos2(a_screen.x + 40.0, a_screen.y);
        assert_eq!(nearest_hoverable(&systems, &spec, &tf, far, HIT_THRESHOLD_PX), None);
    }

    #[test]
    fn hit_testing_skips_ineligible_systems() {
        let spec = candidates_spec();
        let quiet = system("Q", 0.0, 9.0, false);
        let systems: Vec<&SystemRecord> = vec![&quiet];
        let tf = GalaxyTransform {
            center: egui::pos2(0.0, 0.0),
            scale: 100.0,
            pan: egui::Vec2::ZERO,
        };
        let on_top = tf.to_screen([1.0, 0.0]);
        assert_eq!(nearest_hoverable(&systems, &spec, &tf, on_top, HIT_THRESHOLD_PX), None);
    }

    #[test]
    fn scene_changes_drive_the_animation_state() {
        let mut view = GalaxyView::new();
        assert_eq!(view.anim_state(), AnimState::Idle);

        view.set_scene(&candidates_spec());
        assert_eq!(view.anim_state(), AnimState::Running);

        view.stop();
        assert_eq!(view.anim_state(), AnimState::Idle);

        let context_spec = match build_scenes()[0].view {
            ViewSpec::Galaxy(spec) => spec,
            _ => panic!(),
        };
        view.set_scene(&context_spec);
        assert_eq!(view.anim_state(), AnimState::Idle);
    }
}
