//! Scatter renderer.
//!
//! Data-bound 2-D point cloud for an arbitrary pair of numeric planet
//! columns. Axis scales are recomputed from the currently filtered slice
//! on every scene update, background context layers draw before the
//! points, and points live through a keyed enter/update/exit lifecycle
//! with short transitions. Wheel and button zoom rescale both axes
//! independently of each other and reset whenever a new scene arrives.

use crate::data::PlanetRecord;
use crate::scale::{AxisScale, SizeScale};
use crate::scene::{PlanetField, ScatterSpec};
use crate::scenes::{GRAVITY, GRAVITY_BAND, HABITABLE, ROCKY};
use crate::tooltip;
use eframe::egui;
use std::collections::HashMap;

const MARGIN_LEFT: f32 = 60.0;
const MARGIN_RIGHT: f32 = 20.0;
const MARGIN_TOP: f32 = 30.0;
const MARGIN_BOTTOM: f32 = 50.0;

/// Enter/update transition length; exits run a bit faster.
pub const TRANSITION_SECS: f64 = 0.3;
const EXIT_SECS: f64 = 0.2;

const MIN_POINT_RADIUS: f64 = 2.0;
const MAX_POINT_RADIUS: f64 = 12.0;

/// Points dimmer than this are non-interactive context.
pub const HOVER_OPACITY_THRESHOLD: f32 = 0.6;

const AXIS: egui::Color32 = egui::Color32::from_rgb(148, 163, 184);
const AXIS_LABEL: egui::Color32 = egui::Color32::from_rgb(204, 204, 204);
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(2, 6, 23);
const EARTH_MARKER: egui::Color32 = egui::Color32::from_rgb(0x60, 0xa5, 0xfa);
const HOVER_ACCENT: egui::Color32 = egui::Color32::from_rgb(0x22, 0xd3, 0xee);

#[derive(Debug, Clone, Copy)]
pub struct PointVisual {
    /// Position in unzoomed plot coordinates (origin at the inner top-left).
    pub x: f32,
    pub y: f32,
    pub r: f32,
    pub color: egui::Color32,
    pub opacity: f32,
}

fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

fn lerp_color(a: egui::Color32, b: egui::Color32, t: f32) -> egui::Color32 {
    egui::Color32::from_rgba_unmultiplied(
        lerp(a.r() as f32, b.r() as f32, t) as u8,
        lerp(a.g() as f32, b.g() as f32, t) as u8,
        lerp(a.b() as f32, b.b() as f32, t) as u8,
        lerp(a.a() as f32, b.a() as f32, t) as u8,
    )
}

fn ease_cubic(t: f32) -> f32 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        let u = -2.0 * t + 2.0;
        1.0 - u * u * u / 2.0
    }
}

struct PointAnim {
    from: PointVisual,
    to: PointVisual,
    start: f64,
    exiting: bool,
    /// Index into the planets collection, for hover content.
    row: Option<usize>,
}

impl PointAnim {
    fn duration(&self) -> f64 {
        if self.exiting {
            EXIT_SECS
        } else {
            TRANSITION_SECS
        }
    }

    fn sample(&self, now: f64) -> PointVisual {
        let t = (((now - self.start) / self.duration()).clamp(0.0, 1.0)) as f32;
        let t = ease_cubic(t);
        PointVisual {
            x: lerp(self.from.x, self.to.x, t),
            y: lerp(self.from.y, self.to.y, t),
            r: lerp(self.from.r, self.to.r, t),
            color: lerp_color(self.from.color, self.to.color, t),
            opacity: lerp(self.from.opacity, self.to.opacity, t),
        }
    }

    fn finished(&self, now: f64) -> bool {
        now - self.start >= self.duration()
    }
}

/// Stable per-datum identity: planet name, else host name, else ordinal.
fn point_key(planet: &PlanetRecord, ordinal: usize) -> String {
    planet
        .name
        .clone()
        .or_else(|| planet.host_name.clone())
        .unwrap_or_else(|| format!("#{ordinal}"))
}

fn format_tick(v: f64) -> String {
    let a = v.abs();
    if a >= 10_000.0 {
        format!("{:.0}k", v / 1000.0)
    } else if a >= 1000.0 {
        format!("{:.1}k", v / 1000.0)
    } else if a >= 10.0 {
        format!("{v:.0}")
    } else if a >= 1.0 {
        format!("{v:.1}")
    } else {
        format!("{v:.2}")
    }
}

/// Plot area remaining once the axis margins are taken out of a panel.
pub fn inner_size(available: egui::Vec2) -> egui::Vec2 {
    egui::vec2(
        (available.x - MARGIN_LEFT - MARGIN_RIGHT).max(50.0),
        (available.y - MARGIN_TOP - MARGIN_BOTTOM).max(50.0),
    )
}

pub struct ScatterView {
    scene_id: Option<&'static str>,
    x_scale: Option<AxisScale>,
    y_scale: Option<AxisScale>,
    size_scale: Option<SizeScale>,
    zoom_x: f64,
    zoom_y: f64,
    pan: egui::Vec2,
    points: HashMap<String, PointAnim>,
    hovered: Option<String>,
    inner: egui::Vec2,
}

impl ScatterView {
    pub fn new() -> Self {
        Self {
            scene_id: None,
            x_scale: None,
            y_scale: None,
            size_scale: None,
            zoom_x: 1.0,
            zoom_y: 1.0,
            pan: egui::Vec2::ZERO,
            points: HashMap::new(),
            hovered: None,
            inner: egui::vec2(600.0, 400.0),
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.values().filter(|p| !p.exiting).count()
    }

    pub fn has_axes(&self) -> bool {
        self.x_scale.is_some() && self.y_scale.is_some()
    }

    #[cfg(test)]
    fn visual_of(&self, key: &str, now: f64) -> Option<PointVisual> {
        self.points.get(key).map(|p| p.sample(now))
    }

    /// Rebuild scales and point targets from the filtered slice. An empty
    /// slice clears everything previously drawn: points, axes, and the
    /// background layers that hang off the scales.
    pub fn update(
        &mut self,
        planets: &[PlanetRecord],
        filtered: &[usize],
        spec: &ScatterSpec,
        scene_id: &'static str,
        inner: egui::Vec2,
        now: f64,
    ) {
        if self.scene_id != Some(scene_id) {
            self.scene_id = Some(scene_id);
            self.zoom_x = 1.0;
            self.zoom_y = 1.0;
            self.pan = egui::Vec2::ZERO;
        }
        self.inner = inner;

        let valid: Vec<usize> = filtered
            .iter()
            .copied()
            .filter(|&i| {
                let p = &planets[i];
                spec.x.value(p).is_some() && spec.y.value(p).is_some()
            })
            .collect();

        if valid.is_empty() {
            self.points.clear();
            self.x_scale = None;
            self.y_scale = None;
            self.size_scale = None;
            return;
        }

        let xs: Vec<f64> = valid.iter().map(|&i| spec.x.value(&planets[i]).unwrap()).collect();
        let ys: Vec<f64> = valid.iter().map(|&i| spec.y.value(&planets[i]).unwrap()).collect();

        let x_scale = AxisScale::fit(&xs, [0.0, inner.x as f64], &spec.x_scale);
        let y_scale = AxisScale::fit(&ys, [inner.y as f64, 0.0], &spec.y_scale);
        let size_scale = SizeScale::fit(
            valid.iter().map(|&i| (spec.encodings.size)(&planets[i])),
            MIN_POINT_RADIUS,
            MAX_POINT_RADIUS,
        );

        let mut seen: HashMap<String, usize> = HashMap::new();
        for (ordinal, &i) in valid.iter().enumerate() {
            seen.insert(point_key(&planets[i], ordinal), i);
        }

        // removed keys shrink out
        for (key, anim) in self.points.iter_mut() {
            if !seen.contains_key(key) && !anim.exiting {
                let current = anim.sample(now);
                anim.from = current;
                anim.to = PointVisual { r: 0.0, ..current };
                anim.start = now;
                anim.exiting = true;
                anim.row = None;
            }
        }

        for (ordinal, &i) in valid.iter().enumerate() {
            let planet = &planets[i];
            let key = point_key(planet, ordinal);
            let target = PointVisual {
                x: x_scale.apply(spec.x.value(planet).unwrap()) as f32,
                y: y_scale.apply(spec.y.value(planet).unwrap()) as f32,
                r: size_scale.radius((spec.encodings.size)(planet)) as f32,
                color: (spec.encodings.color)(planet),
                opacity: (spec.encodings.opacity)(planet),
            };
            match self.points.entry(key) {
                std::collections::hash_map::Entry::Occupied(mut entry) => {
                    let anim = entry.get_mut();
                    anim.from = anim.sample(now);
                    anim.to = target;
                    anim.start = now;
                    anim.exiting = false;
                    anim.row = Some(i);
                }
                std::collections::hash_map::Entry::Vacant(entry) => {
                    // new points grow from nothing at their target position
                    entry.insert(PointAnim {
                        from: PointVisual { r: 0.0, ..target },
                        to: target,
                        start: now,
                        exiting: false,
                        row: Some(i),
                    });
                }
            }
        }

        self.x_scale = Some(x_scale);
        self.y_scale = Some(y_scale);
        self.size_scale = Some(size_scale);
    }

    /// Drop exit animations that have played out.
    pub fn prune(&mut self, now: f64) {
        self.points.retain(|_, p| !(p.exiting && p.finished(now)));
    }

    fn to_screen(&self, origin: egui::Pos2, base: PointVisual) -> egui::Pos2 {
        egui::pos2(
            origin.x + base.x * self.zoom_x as f32 + self.pan.x,
            origin.y + base.y * self.zoom_y as f32 + self.pan.y,
        )
    }

    fn x_to_screen(&self, origin: egui::Pos2, scale: &AxisScale, v: f64) -> f32 {
        origin.x + (scale.apply(v) * self.zoom_x) as f32 + self.pan.x
    }

    fn y_to_screen(&self, origin: egui::Pos2, scale: &AxisScale, v: f64) -> f32 {
        origin.y + (scale.apply(v) * self.zoom_y) as f32 + self.pan.y
    }

    /// Data interval currently visible on the x axis.
    fn visible_x(&self, scale: &AxisScale) -> (f64, f64) {
        let lo = scale.invert(-self.pan.x as f64 / self.zoom_x);
        let hi = scale.invert((self.inner.x as f64 - self.pan.x as f64) / self.zoom_x);
        (lo.min(hi), lo.max(hi))
    }

    fn visible_y(&self, scale: &AxisScale) -> (f64, f64) {
        let lo = scale.invert(-self.pan.y as f64 / self.zoom_y);
        let hi = scale.invert((self.inner.y as f64 - self.pan.y as f64) / self.zoom_y);
        (lo.min(hi), lo.max(hi))
    }

    fn apply_zoom(&mut self, factor: f64, anchor: egui::Pos2, origin: egui::Pos2) {
        let old_x = self.zoom_x;
        let old_y = self.zoom_y;
        self.zoom_x = (self.zoom_x * factor).clamp(0.5, 40.0);
        self.zoom_y = (self.zoom_y * factor).clamp(0.5, 40.0);
        // keep the plot point under the anchor fixed on both axes
        let base_x = (anchor.x - origin.x - self.pan.x) / old_x as f32;
        let base_y = (anchor.y - origin.y - self.pan.y) / old_y as f32;
        self.pan.x = anchor.x - origin.x - base_x * self.zoom_x as f32;
        self.pan.y = anchor.y - origin.y - base_y * self.zoom_y as f32;
    }

    fn reset_zoom(&mut self) {
        self.zoom_x = 1.0;
        self.zoom_y = 1.0;
        self.pan = egui::Vec2::ZERO;
    }

    pub fn draw(
        &mut self,
        ui: &mut egui::Ui,
        planets: &[PlanetRecord],
        spec: &ScatterSpec,
        now: f64,
    ) {
        let size = ui.available_size();
        let (response, painter) = ui.allocate_painter(
            size,
            egui::Sense::click_and_drag().union(egui::Sense::hover()),
        );
        let rect = response.rect;
        painter.rect_filled(rect, 0.0, BACKGROUND);

        let inner_rect = egui::Rect::from_min_max(
            egui::pos2(rect.left() + MARGIN_LEFT, rect.top() + MARGIN_TOP),
            egui::pos2(rect.right() - MARGIN_RIGHT, rect.bottom() - MARGIN_BOTTOM),
        );
        let origin = inner_rect.min;

        let (x_scale, y_scale) = match (self.x_scale, self.y_scale) {
            (Some(x), Some(y)) => (x, y),
            _ => return, // empty slice: nothing but the background
        };

        // input: anchored wheel zoom and drag pan, only inside the plot area
        if let Some(cursor) = response.hover_pos() {
            if inner_rect.contains(cursor) {
                let scroll = ui.input(|i| i.raw_scroll_delta.y);
                if scroll.abs() > 0.1 {
                    self.apply_zoom((scroll as f64 * 0.002).exp(), cursor, origin);
                }
            }
        }
        if response.dragged() && self.hovered.is_none() {
            self.pan += response.drag_delta();
        }

        let clipped = painter.with_clip_rect(inner_rect);
        self.draw_background(&clipped, origin, spec, &x_scale, &y_scale, inner_rect);
        self.draw_axes(&painter, origin, spec, &x_scale, &y_scale, inner_rect);
        self.draw_earth_marker(&clipped, origin, spec, &x_scale, &y_scale, inner_rect);

        self.prune(now);

        // hover: only points bright enough to be part of the narrative
        self.hovered = None;
        if let Some(cursor) = response.hover_pos() {
            if inner_rect.contains(cursor) {
                let mut best = f32::INFINITY;
                for (key, anim) in &self.points {
                    if anim.exiting {
                        continue;
                    }
                    let visual = anim.sample(now);
                    if visual.opacity < HOVER_OPACITY_THRESHOLD {
                        continue;
                    }
                    let pos = self.to_screen(origin, visual);
                    let dist = pos.distance(cursor);
                    if dist <= visual.r.max(5.0) + 3.0 && dist < best {
                        best = dist;
                        self.hovered = Some(key.clone());
                    }
                }
            }
        }

        let mut animating = false;
        for (key, anim) in &self.points {
            let visual = anim.sample(now);
            if !anim.finished(now) {
                animating = true;
            }
            if visual.r <= 0.0 {
                continue;
            }
            let pos = self.to_screen(origin, visual);
            if !inner_rect.expand(visual.r).contains(pos) {
                continue;
            }
            clipped.circle_filled(pos, visual.r, visual.color.gamma_multiply(visual.opacity));
            if visual.opacity > HOVER_OPACITY_THRESHOLD {
                clipped.circle_stroke(
                    pos,
                    visual.r,
                    egui::Stroke::new(0.5, egui::Color32::WHITE.gamma_multiply(0.2)),
                );
            }
            if self.hovered.as_deref() == Some(key.as_str()) {
                clipped.circle_stroke(
                    pos,
                    visual.r + 2.5,
                    egui::Stroke::new(1.5, HOVER_ACCENT),
                );
            }
        }

        if let Some(row) = self
            .hovered
            .as_ref()
            .and_then(|key| self.points.get(key))
            .and_then(|anim| anim.row)
        {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
            egui::Tooltip::always_open(
                ui.ctx().clone(),
                egui::LayerId::background(),
                egui::Id::new("scatter_tooltip"),
                egui::PopupAnchor::Pointer,
            )
            .gap(12.0)
            .show(|ui| tooltip::planet_tooltip_ui(ui, &planets[row]));
        }

        self.zoom_buttons(ui, rect);

        if animating {
            ui.ctx().request_repaint();
        }
    }

    fn zoom_buttons(&mut self, ui: &mut egui::Ui, rect: egui::Rect) {
        let buttons = egui::Rect::from_min_size(
            egui::pos2(rect.right() - 92.0, rect.top() + 6.0),
            egui::vec2(86.0, 24.0),
        );
        ui.scope_builder(egui::UiBuilder::new().max_rect(buttons), |ui| {
            ui.horizontal(|ui| {
                let center = egui::pos2(
                    rect.left() + MARGIN_LEFT + self.inner.x / 2.0,
                    rect.top() + MARGIN_TOP + self.inner.y / 2.0,
                );
                let origin = egui::pos2(rect.left() + MARGIN_LEFT, rect.top() + MARGIN_TOP);
                if ui.small_button("+").clicked() {
                    self.apply_zoom(1.25, center, origin);
                }
                if ui.small_button("−").clicked() {
                    self.apply_zoom(0.8, center, origin);
                }
                if ui.small_button("⟲").clicked() {
                    self.reset_zoom();
                }
            });
        });
    }

    fn draw_background(
        &self,
        painter: &egui::Painter,
        origin: egui::Pos2,
        spec: &ScatterSpec,
        x_scale: &AxisScale,
        y_scale: &AxisScale,
        inner_rect: egui::Rect,
    ) {
        let enc = &spec.encodings;

        if let Some(window) = enc.rocky_window {
            let x1 = self.x_to_screen(origin, x_scale, window.min);
            let x2 = self.x_to_screen(origin, x_scale, window.max);
            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2(x1.min(x2), inner_rect.top()),
                    egui::pos2(x1.max(x2), inner_rect.bottom()),
                ),
                0.0,
                ROCKY.gamma_multiply(0.08),
            );
        }

        if let Some(bands) = enc.hz_bands {
            for (band, alpha) in [(bands.optimistic, 0.06), (bands.conservative, 0.10)] {
                let x1 = self.x_to_screen(origin, x_scale, band.min);
                let x2 = self.x_to_screen(origin, x_scale, band.max);
                painter.rect_filled(
                    egui::Rect::from_min_max(
                        egui::pos2(x1.min(x2), inner_rect.top()),
                        egui::pos2(x1.max(x2), inner_rect.bottom()),
                    ),
                    0.0,
                    HABITABLE.gamma_multiply(alpha),
                );
            }
        }

        if let Some(band) = enc.gravity_band {
            let y1 = self.y_to_screen(origin, y_scale, band.max);
            let y2 = self.y_to_screen(origin, y_scale, band.min);
            painter.rect_filled(
                egui::Rect::from_min_max(
                    egui::pos2(inner_rect.left(), y1.min(y2)),
                    egui::pos2(inner_rect.right(), y1.max(y2)),
                ),
                0.0,
                GRAVITY_BAND.gamma_multiply(0.15),
            );
        }

        // curved zone between mass = g_min r² and mass = g_max r²; its screen
        // shape depends on the live transform, so it is resampled every frame
        if let Some(zone) = enc.gravity_zone {
            if spec.x == PlanetField::RadiusEarth && spec.y == PlanetField::MassEarth {
                let (r_lo, r_hi) = self.visible_x(x_scale);
                let steps = 64;
                let mut prev: Option<(f32, f32, f32)> = None;
                for step in 0..=steps {
                    let r = r_lo + (r_hi - r_lo) * step as f64 / steps as f64;
                    let x = self.x_to_screen(origin, x_scale, r);
                    let y_low = self.y_to_screen(origin, y_scale, zone.g_min * r * r);
                    let y_high = self.y_to_screen(origin, y_scale, zone.g_max * r * r);
                    if let Some((px, py_low, py_high)) = prev {
                        painter.add(egui::Shape::convex_polygon(
                            vec![
                                egui::pos2(px, py_low),
                                egui::pos2(px, py_high),
                                egui::pos2(x, y_high),
                                egui::pos2(x, y_low),
                            ],
                            GRAVITY.gamma_multiply(0.12),
                            egui::Stroke::NONE,
                        ));
                    }
                    prev = Some((x, y_low, y_high));
                }
            }
        }
    }

    fn draw_axes(
        &self,
        painter: &egui::Painter,
        origin: egui::Pos2,
        spec: &ScatterSpec,
        x_scale: &AxisScale,
        y_scale: &AxisScale,
        inner_rect: egui::Rect,
    ) {
        let axis_stroke = egui::Stroke::new(1.0, AXIS.gamma_multiply(0.6));
        painter.line_segment(
            [inner_rect.left_bottom(), inner_rect.right_bottom()],
            axis_stroke,
        );
        painter.line_segment(
            [inner_rect.left_top(), inner_rect.left_bottom()],
            axis_stroke,
        );

        let (x_lo, x_hi) = self.visible_x(x_scale);
        for tick in x_scale.ticks_in(x_lo, x_hi, 8) {
            let x = self.x_to_screen(origin, x_scale, tick);
            if x < inner_rect.left() - 0.5 || x > inner_rect.right() + 0.5 {
                continue;
            }
            painter.line_segment(
                [
                    egui::pos2(x, inner_rect.bottom()),
                    egui::pos2(x, inner_rect.bottom() + 5.0),
                ],
                axis_stroke,
            );
            painter.text(
                egui::pos2(x, inner_rect.bottom() + 8.0),
                egui::Align2::CENTER_TOP,
                format_tick(tick),
                egui::FontId::proportional(10.0),
                AXIS,
            );
        }

        let (y_lo, y_hi) = self.visible_y(y_scale);
        for tick in y_scale.ticks_in(y_lo, y_hi, 8) {
            let y = self.y_to_screen(origin, y_scale, tick);
            if y < inner_rect.top() - 0.5 || y > inner_rect.bottom() + 0.5 {
                continue;
            }
            painter.line_segment(
                [
                    egui::pos2(inner_rect.left() - 5.0, y),
                    egui::pos2(inner_rect.left(), y),
                ],
                axis_stroke,
            );
            painter.text(
                egui::pos2(inner_rect.left() - 8.0, y),
                egui::Align2::RIGHT_CENTER,
                format_tick(tick),
                egui::FontId::proportional(10.0),
                AXIS,
            );
        }

        painter.text(
            egui::pos2(inner_rect.center().x, inner_rect.bottom() + 28.0),
            egui::Align2::CENTER_TOP,
            spec.x_label,
            egui::FontId::proportional(12.0),
            AXIS_LABEL,
        );
        // egui has no rotated text; the y label sits above the axis instead
        painter.text(
            egui::pos2(inner_rect.left(), inner_rect.top() - 8.0),
            egui::Align2::LEFT_BOTTOM,
            spec.y_label,
            egui::FontId::proportional(12.0),
            AXIS_LABEL,
        );
    }

    /// Dashed guides and a distinguished marker at Earth's position, drawn
    /// only when both axes carry an Earth-relative reference value in view.
    fn draw_earth_marker(
        &self,
        painter: &egui::Painter,
        origin: egui::Pos2,
        spec: &ScatterSpec,
        x_scale: &AxisScale,
        y_scale: &AxisScale,
        inner_rect: egui::Rect,
    ) {
        let ex = spec.x.earth_reference();
        let ey = spec.y.earth_reference();
        let (x_lo, x_hi) = self.visible_x(x_scale);
        let (y_lo, y_hi) = self.visible_y(y_scale);
        if ex < x_lo || ex > x_hi || ey < y_lo || ey > y_hi {
            return;
        }

        let pos = egui::pos2(
            self.x_to_screen(origin, x_scale, ex),
            self.y_to_screen(origin, y_scale, ey),
        );
        let guide = egui::Stroke::new(1.0, EARTH_MARKER.gamma_multiply(0.5));
        painter.extend(egui::Shape::dashed_line(
            &[pos, egui::pos2(pos.x, inner_rect.bottom())],
            guide,
            4.0,
            3.0,
        ));
        painter.extend(egui::Shape::dashed_line(
            &[pos, egui::pos2(inner_rect.left(), pos.y)],
            guide,
            4.0,
            3.0,
        ));
        painter.circle_filled(pos, 4.0, EARTH_MARKER);
        painter.circle_stroke(pos, 5.5, egui::Stroke::new(1.0, egui::Color32::WHITE));
        painter.text(
            pos + egui::vec2(8.0, -8.0),
            egui::Align2::LEFT_BOTTOM,
            "Earth",
            egui::FontId::proportional(11.0),
            EARTH_MARKER,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::ViewSpec;
    use crate::scenes::build_scenes;

    fn planet(name: &str, radius: f64, mass: f64) -> PlanetRecord {
        PlanetRecord {
            name: Some(name.to_string()),
            host_name: Some(format!("{name} host")),
            radius_earth: Some(radius),
            mass_earth: Some(mass),
            has_data: true,
            ..Default::default()
        }
    }

    fn raw_spec() -> ScatterSpec {
        match build_scenes()[1].view {
            ViewSpec::Scatter(spec) => spec,
            _ => panic!("scene 1 must be a scatter scene"),
        }
    }

    const INNER: egui::Vec2 = egui::vec2(600.0, 400.0);

    #[test]
    fn update_builds_scales_and_points() {
        let planets = vec![planet("a", 1.0, 1.0), planet("b", 2.0, 8.0)];
        let mut view = ScatterView::new();
        view.update(&planets, &[0, 1], &raw_spec(), "s", INNER, 0.0);
        assert!(view.has_axes());
        assert_eq!(view.point_count(), 2);
    }

    #[test]
    fn empty_slice_clears_points_axes_and_layers() {
        let planets = vec![planet("a", 1.0, 1.0), planet("b", 2.0, 8.0)];
        let mut view = ScatterView::new();
        view.update(&planets, &[0, 1], &raw_spec(), "s", INNER, 0.0);
        assert_eq!(view.point_count(), 2);

        view.update(&planets, &[], &raw_spec(), "s", INNER, 1.0);
        assert_eq!(view.point_count(), 0);
        assert!(!view.has_axes());
    }

    #[test]
    fn rows_missing_either_axis_value_are_excluded() {
        let mut half = planet("half", 1.0, 1.0);
        half.mass_earth = None;
        let planets = vec![planet("a", 1.0, 1.0), half];
        let mut view = ScatterView::new();
        view.update(&planets, &[0, 1], &raw_spec(), "s", INNER, 0.0);
        assert_eq!(view.point_count(), 1);
    }

    #[test]
    fn new_points_enter_small_and_grow_to_target() {
        let planets = vec![planet("a", 1.0, 1.0)];
        let mut view = ScatterView::new();
        view.update(&planets, &[0], &raw_spec(), "s", INNER, 10.0);

        let at_start = view.visual_of("a", 10.0).unwrap();
        assert!(at_start.r < 0.01);

        let settled = view.visual_of("a", 10.0 + TRANSITION_SECS).unwrap();
        assert!(settled.r >= MIN_POINT_RADIUS as f32);
        // position does not slide during enter
        assert!((at_start.x - settled.x).abs() < 1e-3);
        assert!((at_start.y - settled.y).abs() < 1e-3);
    }

    #[test]
    fn removed_points_shrink_and_prune() {
        let planets = vec![planet("a", 1.0, 1.0), planet("b", 2.0, 8.0)];
        let mut view = ScatterView::new();
        view.update(&planets, &[0, 1], &raw_spec(), "s", INNER, 0.0);

        view.update(&planets, &[0], &raw_spec(), "s", INNER, 1.0);
        assert_eq!(view.point_count(), 1);
        let exiting = view.visual_of("b", 1.0 + EXIT_SECS).unwrap();
        assert!(exiting.r < 0.01);

        view.prune(1.0 + EXIT_SECS + 0.01);
        assert!(view.visual_of("b", 2.0).is_none());
        assert!(view.visual_of("a", 2.0).is_some());
    }

    #[test]
    fn continuing_points_animate_between_positions() {
        let mut planets = vec![planet("a", 1.0, 1.0), planet("pad", 0.5, 0.2)];
        planets.push(planet("pad2", 4.0, 60.0));
        let mut view = ScatterView::new();
        let spec = raw_spec();
        view.update(&planets, &[0, 1, 2], &spec, "s", INNER, 0.0);
        let before = view.visual_of("a", 1.0).unwrap();

        planets[0].radius_earth = Some(3.0);
        view.update(&planets, &[0, 1, 2], &spec, "s", INNER, 5.0);
        let mid = view.visual_of("a", 5.0 + TRANSITION_SECS / 2.0).unwrap();
        let after = view.visual_of("a", 5.0 + TRANSITION_SECS).unwrap();

        assert!(after.x > before.x);
        assert!(mid.x > before.x && mid.x < after.x);
    }

    #[test]
    fn scene_change_resets_zoom_state() {
        let planets = vec![planet("a", 1.0, 1.0), planet("b", 2.0, 8.0)];
        let mut view = ScatterView::new();
        view.update(&planets, &[0, 1], &raw_spec(), "one", INNER, 0.0);
        view.apply_zoom(2.0, egui::pos2(100.0, 100.0), egui::pos2(0.0, 0.0));
        assert!(view.zoom_x > 1.0);

        view.update(&planets, &[0, 1], &raw_spec(), "two", INNER, 1.0);
        assert_eq!(view.zoom_x, 1.0);
        assert_eq!(view.zoom_y, 1.0);
        assert_eq!(view.pan, egui::Vec2::ZERO);
    }

    #[test]
    fn anchored_zoom_keeps_the_anchor_fixed() {
        let planets = vec![planet("a", 1.0, 1.0), planet("b", 2.0, 8.0)];
        let mut view = ScatterView::new();
        view.update(&planets, &[0, 1], &raw_spec(), "s", INNER, 0.0);

        let origin = egui::pos2(60.0, 30.0);
        let anchor = egui::pos2(260.0, 170.0);
        let base = egui::pos2(
            (anchor.x - origin.x) / view.zoom_x as f32,
            (anchor.y - origin.y) / view.zoom_y as f32,
        );
        view.apply_zoom(1.6, anchor, origin);
        let after = egui::pos2(
            origin.x + base.x * view.zoom_x as f32 + view.pan.x,
            origin.y + base.y * view.zoom_y as f32 + view.pan.y,
        );
        assert!((after.x - anchor.x).abs() < 1e-3);
        assert!((after.y - anchor.y).abs() < 1e-3);
    }
}
