//! Scene descriptor types.
//!
//! A scene combines a dataset selector, a filter predicate, a view
//! specification with per-datum visual encodings, and sidebar content.
//! Encodings are plain function pointers built in code, never parsed from
//! data, and scenes are immutable once the registry is built.

use crate::data::{PlanetRecord, SystemRecord};
use crate::scale::ScaleConfig;
use eframe::egui::Color32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    Planets,
    Systems,
}

/// Filter predicate, typed by the dataset the scene selects.
#[derive(Clone, Copy)]
pub enum SceneFilter {
    Planets(fn(&PlanetRecord) -> bool),
    Systems(fn(&SystemRecord) -> bool),
}

/// Numeric planet column a scatter axis can bind to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanetField {
    RadiusEarth,
    MassEarth,
    RelativeGravity,
    InsolationMerged,
}

impl PlanetField {
    pub fn value(&self, p: &PlanetRecord) -> Option<f64> {
        match self {
            PlanetField::RadiusEarth => p.radius_earth,
            PlanetField::MassEarth => p.mass_earth,
            PlanetField::RelativeGravity => p.relative_gravity,
            PlanetField::InsolationMerged => p.insolation_merged,
        }
    }

    /// Earth's value on this axis; all supported columns are expressed in
    /// Earth-relative units.
    pub fn earth_reference(&self) -> f64 {
        1.0
    }
}

/// Inclusive value window for a rectangular background band.
#[derive(Debug, Clone, Copy)]
pub struct Band {
    pub min: f64,
    pub max: f64,
}

/// Nested habitable-zone insolation windows; the optimistic band contains
/// the conservative one on the axis, not in the data model.
#[derive(Debug, Clone, Copy)]
pub struct HzBands {
    pub optimistic: Band,
    pub conservative: Band,
}

/// Region between the curves mass = g_min * r^2 and mass = g_max * r^2,
/// meaningful only when the axes are radius and mass.
#[derive(Debug, Clone, Copy)]
pub struct GravityZone {
    pub g_min: f64,
    pub g_max: f64,
}

#[derive(Clone, Copy)]
pub struct ScatterEncodings {
    pub color: fn(&PlanetRecord) -> Color32,
    pub opacity: fn(&PlanetRecord) -> f32,
    /// Raw value fed to the perceptual size scale.
    pub size: fn(&PlanetRecord) -> f64,
    pub rocky_window: Option<Band>,
    pub hz_bands: Option<HzBands>,
    pub gravity_band: Option<Band>,
    pub gravity_zone: Option<GravityZone>,
}

#[derive(Clone, Copy)]
pub struct ScatterSpec {
    pub x: PlanetField,
    pub y: PlanetField,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub x_scale: ScaleConfig,
    pub y_scale: ScaleConfig,
    pub encodings: ScatterEncodings,
}

#[derive(Clone, Copy)]
pub struct GalaxyEncodings {
    pub base_color: Color32,
    pub base_opacity: fn(&SystemRecord) -> f32,
    pub base_size: fn(&SystemRecord) -> f32,
    pub color: Option<fn(&SystemRecord) -> Color32>,
    pub opacity: Option<fn(&SystemRecord) -> f32>,
    pub size: Option<fn(&SystemRecord) -> f32>,
}

#[derive(Clone, Copy)]
pub struct GalaxySpec {
    pub encodings: GalaxyEncodings,
    /// Scene-specific rule gating which systems respond to hover.
    pub hoverable: fn(&SystemRecord) -> bool,
    /// Draw candidate orbit sub-layouts and keep the frame loop running.
    pub orbits: bool,
}

impl GalaxySpec {
    /// Polar projection shared by every galaxy scene: angle from galactic
    /// longitude, radius from log-compressed distance.
    pub fn project(system: &SystemRecord) -> [f64; 2] {
        let angle = system.galactic_longitude_deg.unwrap_or(0.0).to_radians();
        let r = (system.distance_pc.unwrap_or(1.0) + 1.0).log10();
        [r * angle.cos(), r * angle.sin()]
    }

    pub fn color_of(&self, s: &SystemRecord) -> Color32 {
        match self.encodings.color {
            Some(f) => f(s),
            None => self.encodings.base_color,
        }
    }

    pub fn opacity_of(&self, s: &SystemRecord) -> f32 {
        match self.encodings.opacity {
            Some(f) => f(s),
            None => (self.encodings.base_opacity)(s),
        }
    }

    pub fn size_of(&self, s: &SystemRecord) -> f32 {
        match self.encodings.size {
            Some(f) => f(s),
            None => (self.encodings.base_size)(s),
        }
    }
}

#[derive(Clone, Copy)]
pub enum ViewSpec {
    Galaxy(GalaxySpec),
    Scatter(ScatterSpec),
    /// Hand-off to the small-multiples card grid.
    Transition,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    User,
    Guide,
}

#[derive(Debug, Clone, Copy)]
pub struct ChatMessage {
    pub from: Speaker,
    pub text: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub enum LegendSwatch {
    Color(Color32),
    Area(Color32),
}

#[derive(Debug, Clone, Copy)]
pub struct LegendItem {
    pub swatch: LegendSwatch,
    pub label: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct LegendSection {
    pub title: &'static str,
    pub items: &'static [LegendItem],
}

#[derive(Debug, Clone, Copy)]
pub struct SidebarContent {
    pub heading: &'static str,
    pub chat: &'static [ChatMessage],
    pub notes: &'static [&'static str],
    pub diagram_hint: &'static str,
    pub legend: &'static [LegendSection],
}

#[derive(Clone, Copy)]
pub struct SceneDescriptor {
    pub id: &'static str,
    pub title: &'static str,
    pub dataset: DatasetKind,
    pub filter: SceneFilter,
    pub view: ViewSpec,
    pub sidebar: SidebarContent,
}
