//! The seven-scene story registry.
//!
//! Scene order is the narrative: galaxy overview, raw mass/radius cloud,
//! rocky-size filter, surface-gravity filter, insolation x gravity filter,
//! candidate systems in the galaxy, and the small-multiples hand-off.

use crate::data::{PlanetRecord, SystemRecord};
use crate::scale::ScaleConfig;
use crate::scene::*;
use eframe::egui::Color32;

pub const ROCKY: Color32 = Color32::from_rgb(0x22, 0xd3, 0xee);
pub const GREY: Color32 = Color32::from_rgb(0x9c, 0xa3, 0xaf);
pub const GRAVITY: Color32 = Color32::from_rgb(0xfb, 0x92, 0x3c);
pub const HABITABLE: Color32 = Color32::from_rgb(0x4a, 0xde, 0x80);
pub const GRAVITY_BAND: Color32 = Color32::from_rgb(0xfa, 0xcc, 0x15);

pub const STAR_M: Color32 = Color32::from_rgb(0xff, 0x6b, 0x6b);
pub const STAR_K: Color32 = Color32::from_rgb(0xff, 0x9f, 0x4a);
pub const STAR_G: Color32 = Color32::from_rgb(0xff, 0xd9, 0x3d);
pub const STAR_F: Color32 = Color32::from_rgb(0xa5, 0xd8, 0xff);
pub const STAR_UNKNOWN: Color32 = Color32::from_rgb(0x99, 0x99, 0x99);

const CONTEXT_DOT: Color32 = Color32::from_rgb(0xdd, 0xdd, 0xdd);
const FAINT_DOT: Color32 = Color32::from_rgb(0x55, 0x55, 0x55);

pub const ROCKY_WINDOW: Band = Band { min: 0.5, max: 1.6 };
pub const COMFORT_GRAVITY: Band = Band { min: 0.5, max: 1.5 };
pub const HZ_OPTIMISTIC: Band = Band { min: 0.32, max: 1.78 };
pub const HZ_CONSERVATIVE: Band = Band { min: 0.35, max: 1.04 };

fn comfortable_gravity(p: &PlanetRecord) -> bool {
    matches!(p.relative_gravity,
        Some(g) if g >= COMFORT_GRAVITY.min && g <= COMFORT_GRAVITY.max)
}

fn habitable_light(p: &PlanetRecord) -> bool {
    matches!(p.insolation_merged,
        Some(s) if s >= HZ_OPTIMISTIC.min && s <= HZ_OPTIMISTIC.max)
}

pub fn spectral_class_color(system: &SystemRecord) -> Color32 {
    match system.spectral_class() {
        Some('M') => STAR_M,
        Some('K') => STAR_K,
        Some('G') => STAR_G,
        Some('F') => STAR_F,
        _ => STAR_UNKNOWN,
    }
}

fn galaxy_context_scene() -> SceneDescriptor {
    SceneDescriptor {
        id: "S1_GALAXY_CONTEXT",
        title: "A Galaxy of Exoplanet Systems",
        dataset: DatasetKind::Systems,
        filter: SceneFilter::Systems(|s| s.has_data),
        view: ViewSpec::Galaxy(GalaxySpec {
            encodings: GalaxyEncodings {
                base_color: CONTEXT_DOT,
                base_opacity: |s| {
                    let dist = s.distance_pc.unwrap_or(10.0);
                    (1.0 - ((dist + 1.0).log10() * 0.25) as f32).max(0.15)
                },
                base_size: |s| {
                    let pnum = s.planet_count.unwrap_or(1).max(1) as f32;
                    2.0 + pnum.sqrt() * 1.2
                },
                color: None,
                opacity: None,
                size: None,
            },
            hoverable: |_| true,
            orbits: false,
        }),
        sidebar: SidebarContent {
            heading: "Step 1 · Where are our exoplanet systems?",
            chat: &[
                ChatMessage { from: Speaker::User, text: "What are all these dots?" },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "Each dot is a star system with at least one exoplanet. \
                           The angle shows its direction in the Galaxy; distance \
                           from the center grows with how far it is from us.",
                },
            ],
            notes: &[
                "Dot size roughly encodes how many known planets a system has.",
                "We use galactic longitude for the angle around the map.",
                "Radial distance uses a logarithmic scale so that nearby and \
                 far-away systems can fit on the same view.",
            ],
            diagram_hint: "Polar sketch of the galaxy with two stars: one near, one far.",
            legend: &[],
        },
    }
}

fn planets_raw_scene() -> SceneDescriptor {
    SceneDescriptor {
        id: "S2_0_PLANETS_RAW",
        title: "All known planets: mass vs size",
        dataset: DatasetKind::Planets,
        filter: SceneFilter::Planets(|p| {
            p.has_data && p.radius_earth.is_some() && p.mass_earth.is_some()
        }),
        view: ViewSpec::Scatter(ScatterSpec {
            x: PlanetField::RadiusEarth,
            y: PlanetField::MassEarth,
            x_label: "Planet Radius (R⊕)",
            y_label: "Planet Mass (M⊕)",
            x_scale: ScaleConfig::default(),
            y_scale: ScaleConfig::default(),
            encodings: ScatterEncodings {
                color: |_| Color32::from_rgb(0xbb, 0xbb, 0xbb),
                opacity: |_| 0.6,
                size: |p| p.radius_earth.unwrap_or(1.0),
                rocky_window: None,
                hz_bands: None,
                gravity_band: None,
                gravity_zone: None,
            },
        }),
        sidebar: SidebarContent {
            heading: "Step 2 · Zooming in to planets",
            chat: &[
                ChatMessage {
                    from: Speaker::User,
                    text: "Can we see individual planets instead of systems?",
                },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "Here each dot is a planet. Left–right is size, \
                           bottom–top is mass. Tiny rocks bottom-left, giant \
                           gas worlds top-right.",
                },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "If you are curious: the axes use Earth units. A value \
                           of 1 on each axis corresponds to Earth's radius or mass.",
                },
            ],
            notes: &[
                "The x-axis is planet radius in Earth radii (R⊕).",
                "The y-axis is planet mass in Earth masses (M⊕).",
                "No habitability filters yet - just the full diversity of known planets.",
            ],
            diagram_hint: "Plane with labels: small/light vs giant planets, Earth marked in between.",
            legend: &[],
        },
    }
}

fn rocky_size_scene() -> SceneDescriptor {
    SceneDescriptor {
        id: "S2_1_ROCKY_SIZE",
        title: "Rocky-size planets",
        dataset: DatasetKind::Planets,
        filter: SceneFilter::Planets(|p| {
            p.has_data && p.radius_earth.is_some() && p.mass_earth.is_some()
        }),
        view: ViewSpec::Scatter(ScatterSpec {
            x: PlanetField::RadiusEarth,
            y: PlanetField::MassEarth,
            x_label: "Planet Radius (R⊕)",
            y_label: "Planet Mass (M⊕)",
            x_scale: ScaleConfig::default(),
            y_scale: ScaleConfig::default(),
            encodings: ScatterEncodings {
                color: |p| if p.is_rocky_size { ROCKY } else { GREY },
                opacity: |p| if p.is_rocky_size { 0.9 } else { 0.2 },
                size: |p| p.radius_earth.unwrap_or(1.0),
                rocky_window: Some(ROCKY_WINDOW),
                hz_bands: None,
                gravity_band: None,
                gravity_zone: None,
            },
        }),
        sidebar: SidebarContent {
            heading: "Step 3 · Looking for rocky-size planets",
            chat: &[
                ChatMessage {
                    from: Speaker::User,
                    text: "How do we spot rocky worlds in all these points?",
                },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "We focus on planets in a rocky size range, where they \
                           are more likely to be made of rock and metal instead \
                           of mostly gas.",
                },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "The blue band shows that size range in radius, and \
                           coloured dots are planets whose mass and radius fit \
                           this rocky profile.",
                },
            ],
            notes: &[
                "Rocky planets are coloured; others stay greyed out.",
                "Dot size also encodes radius.",
                "The rocky size window here is roughly 0.5 to 1.6 times Earth's radius.",
            ],
            diagram_hint: "Size line: Mars → Earth → Super-Earth → Neptune, rocky range highlighted.",
            legend: &[
                LegendSection {
                    title: "Dot",
                    items: &[
                        LegendItem { swatch: LegendSwatch::Color(ROCKY), label: "Rocky-size planet" },
                        LegendItem { swatch: LegendSwatch::Color(GREY), label: "Other planet" },
                    ],
                },
                LegendSection {
                    title: "Area",
                    items: &[LegendItem {
                        swatch: LegendSwatch::Area(ROCKY),
                        label: "Rocky size zone (0.5–1.6 R⊕)",
                    }],
                },
            ],
        },
    }
}

fn gravity_scene() -> SceneDescriptor {
    SceneDescriptor {
        id: "S2_2_GRAVITY",
        title: "How heavy would you feel?",
        dataset: DatasetKind::Planets,
        filter: SceneFilter::Planets(|p| {
            p.has_data
                && p.radius_earth.is_some()
                && p.mass_earth.is_some()
                && p.relative_gravity.is_some()
        }),
        view: ViewSpec::Scatter(ScatterSpec {
            x: PlanetField::RadiusEarth,
            y: PlanetField::MassEarth,
            x_label: "Planet Radius (R⊕)",
            y_label: "Planet Mass (M⊕)",
            x_scale: ScaleConfig::default(),
            y_scale: ScaleConfig::default(),
            encodings: ScatterEncodings {
                color: |p| {
                    if p.is_rocky_size && comfortable_gravity(p) {
                        GRAVITY
                    } else {
                        GREY
                    }
                },
                opacity: |p| {
                    if p.is_rocky_size && comfortable_gravity(p) {
                        0.9
                    } else {
                        0.2
                    }
                },
                size: |p| p.radius_earth.unwrap_or(1.0),
                rocky_window: None,
                hz_bands: None,
                gravity_band: None,
                gravity_zone: Some(GravityZone {
                    g_min: COMFORT_GRAVITY.min,
                    g_max: COMFORT_GRAVITY.max,
                }),
            },
        }),
        sidebar: SidebarContent {
            heading: "Step 4 · Estimating surface gravity",
            chat: &[
                ChatMessage { from: Speaker::User, text: "Earth-size ≠ Earth-gravity, right?" },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "Right. For the same radius, more mass means stronger \
                           gravity. We use mass and radius to estimate how heavy \
                           you would feel.",
                },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "If you are curious: in Earth units we approximate \
                           surface gravity as g_rel ≈ mass_rel / radius_rel².",
                },
            ],
            notes: &[
                "Coloured points are rocky planets whose estimated surface \
                 gravity is between about 0.5 and 1.5 times Earth's gravity.",
                "The diagonal band in the background shows where mass and radius \
                 combine to give that comfortable gravity.",
                "Formula hint: g_rel ≈ mass_rel / radius_rel² when mass and \
                 radius are measured relative to Earth.",
            ],
            diagram_hint: "Three circles with sparse, medium, dense hatch labelled low / ok / high g.",
            legend: &[
                LegendSection {
                    title: "Dot",
                    items: &[
                        LegendItem {
                            swatch: LegendSwatch::Color(GRAVITY),
                            label: "Rocky + Comfortable gravity",
                        },
                        LegendItem { swatch: LegendSwatch::Color(GREY), label: "Other planet" },
                    ],
                },
                LegendSection {
                    title: "Area",
                    items: &[LegendItem {
                        swatch: LegendSwatch::Area(GRAVITY),
                        label: "Comfortable gravity zone (0.5–1.5 g)",
                    }],
                },
            ],
        },
    }
}

fn insolation_gravity_scene() -> SceneDescriptor {
    SceneDescriptor {
        id: "S2_3_G_GRAVITY_X_INSOL",
        title: "Goldilocks light × comfortable gravity",
        dataset: DatasetKind::Planets,
        filter: SceneFilter::Planets(|p| {
            p.has_data && p.relative_gravity.is_some() && p.insolation_merged.is_some()
        }),
        view: ViewSpec::Scatter(ScatterSpec {
            x: PlanetField::InsolationMerged,
            y: PlanetField::RelativeGravity,
            x_label: "Stellar Flux (S⊕, Earth = 1.0)",
            y_label: "Surface Gravity (g⊕)",
            x_scale: ScaleConfig::forced_log(),
            y_scale: ScaleConfig::default(),
            encodings: ScatterEncodings {
                color: |p| {
                    if p.is_rocky_size && comfortable_gravity(p) && habitable_light(p) {
                        HABITABLE
                    } else {
                        GREY
                    }
                },
                opacity: |p| {
                    if p.is_rocky_size && comfortable_gravity(p) && habitable_light(p) {
                        0.9
                    } else {
                        0.2
                    }
                },
                size: |p| p.radius_earth.unwrap_or(1.0),
                rocky_window: None,
                hz_bands: Some(HzBands {
                    optimistic: HZ_OPTIMISTIC,
                    conservative: HZ_CONSERVATIVE,
                }),
                gravity_band: Some(COMFORT_GRAVITY),
                gravity_zone: None,
            },
        }),
        sidebar: SidebarContent {
            heading: "Step 5 · Combining light and gravity",
            chat: &[
                ChatMessage { from: Speaker::User, text: "Where do Earth-like conditions appear?" },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "Left is frozen, right is scorched; up and down is \
                           gravity. Green dots in the central band are rocky \
                           planets with Earth-like light and human-friendly gravity.",
                },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "If you are curious: insolation compares how much star \
                           energy hits the planet to Earth. A simple estimate is \
                           S_rel ≈ (L_star / L_sun) / (distance / 1 AU)².",
                },
            ],
            notes: &[
                "Green dots are planets that are rocky, in the habitable light \
                 zone and in the comfortable gravity band.",
                "Other planets remain in the background as grey context.",
            ],
            diagram_hint: "Blue–green–orange x-axis, horizontal gravity ok band, \
                           green rectangle in the middle.",
            legend: &[
                LegendSection {
                    title: "Dot",
                    items: &[
                        LegendItem {
                            swatch: LegendSwatch::Color(HABITABLE),
                            label: "Rocky + Habitable light + Comfortable gravity",
                        },
                        LegendItem { swatch: LegendSwatch::Color(GREY), label: "Other planet" },
                    ],
                },
                LegendSection {
                    title: "Area",
                    items: &[
                        LegendItem {
                            swatch: LegendSwatch::Area(HABITABLE),
                            label: "Habitable light zone (0.32–1.78 S⊕)",
                        },
                        LegendItem {
                            swatch: LegendSwatch::Area(GRAVITY_BAND),
                            label: "Comfortable gravity zone (0.5–1.5 g)",
                        },
                    ],
                },
            ],
        },
    }
}

fn galaxy_candidates_scene() -> SceneDescriptor {
    SceneDescriptor {
        id: "S3_GALAXY_CANDIDATES",
        title: "Where do our candidate systems live?",
        dataset: DatasetKind::Systems,
        filter: SceneFilter::Systems(|s| s.has_data),
        view: ViewSpec::Galaxy(GalaxySpec {
            encodings: GalaxyEncodings {
                base_color: FAINT_DOT,
                base_opacity: |s| if s.has_candidate { 0.05 } else { 0.3 },
                base_size: |s| {
                    let pnum = s.planet_count.unwrap_or(1).max(1) as f32;
                    2.0 + pnum.sqrt() * 0.8
                },
                color: Some(|s| {
                    if s.has_candidate {
                        spectral_class_color(s)
                    } else {
                        FAINT_DOT
                    }
                }),
                opacity: Some(|s| if s.has_candidate { 0.95 } else { 0.05 }),
                size: Some(|s| {
                    if s.has_candidate {
                        let count = s.candidate_count_optimistic.max(1) as f32;
                        4.0 + count.sqrt() * 2.0
                    } else {
                        2.0
                    }
                }),
            },
            hoverable: |s| s.has_candidate,
            orbits: true,
        }),
        sidebar: SidebarContent {
            heading: "Step 6 · Our short list of systems",
            chat: &[
                ChatMessage {
                    from: Speaker::User,
                    text: "After all those filters, what's left?",
                },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "Each coloured star hosts at least one promising planet. \
                           The colour now shows star type: red M-dwarfs, orange \
                           K-stars, yellow G-stars like the Sun, pale blue F-stars.",
                },
            ],
            notes: &[
                "Only systems with at least one candidate planet are highlighted; \
                 other systems fade into the background.",
                "Larger coloured stars represent systems with more candidate planets.",
                "These are the systems that will each become a card in the final \
                 small-multiples view.",
                "Colour encodes star type, from cool red M-dwarfs to hotter pale \
                 blue F-stars.",
            ],
            diagram_hint: "One coloured star with several candidate planets drawn \
                           around it, plus a legend of star colours (M/K/G/F).",
            legend: &[
                LegendSection {
                    title: "Star",
                    items: &[
                        LegendItem { swatch: LegendSwatch::Color(STAR_M), label: "M – cool red dwarf" },
                        LegendItem { swatch: LegendSwatch::Color(STAR_K), label: "K – orange star" },
                        LegendItem { swatch: LegendSwatch::Color(STAR_G), label: "G – Sun-like (yellow)" },
                        LegendItem { swatch: LegendSwatch::Color(STAR_F), label: "F – hotter (pale blue)" },
                    ],
                },
                LegendSection {
                    title: "Planet",
                    items: &[
                        LegendItem {
                            swatch: LegendSwatch::Color(HABITABLE),
                            label: "● Conservative candidate",
                        },
                        LegendItem {
                            swatch: LegendSwatch::Color(ROCKY),
                            label: "● Optimistic candidate",
                        },
                    ],
                },
            ],
        },
    }
}

fn transition_scene() -> SceneDescriptor {
    SceneDescriptor {
        id: "S4_TRANSITION_TO_SMALL_MULTIPLES",
        title: "From stars to detailed portraits",
        dataset: DatasetKind::Systems,
        filter: SceneFilter::Systems(|s| s.has_candidate),
        view: ViewSpec::Transition,
        sidebar: SidebarContent {
            heading: "Meet each candidate system",
            chat: &[
                ChatMessage {
                    from: Speaker::User,
                    text: "Can we see more details on these systems?",
                },
                ChatMessage {
                    from: Speaker::Guide,
                    text: "Yes. Each coloured star now turns into a card. In each \
                           card, the central star slowly morphs into our Sun and \
                           back, the orbits compare Earth's year to the candidate \
                           planet's year, and pulsing rings inside the planets \
                           show how strong gravity feels there compared to Earth.",
                },
            ],
            notes: &[
                "Inside each card: the star morphs between the system's star and \
                 our Sun, so you can compare colour and size.",
                "Two orbits are shown: one for Earth and one for the conservative \
                 candidate planet, with orbital speed based on their periods.",
                "Pulsing rings inside Earth and the candidate planet encode \
                 surface gravity relative to Earth.",
            ],
            diagram_hint: "Galaxy dots fading into a grid of cards. One card is \
                           enlarged, showing a star ↔ Sun morph, two orbits and \
                           pulsing rings for gravity.",
            legend: &[],
        },
    }
}

/// Build the full ordered registry.
pub fn build_scenes() -> Vec<SceneDescriptor> {
    vec![
        galaxy_context_scene(),
        planets_raw_scene(),
        rocky_size_scene(),
        gravity_scene(),
        insolation_gravity_scene(),
        galaxy_candidates_scene(),
        transition_scene(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_seven_scenes_in_story_order() {
        let scenes = build_scenes();
        assert_eq!(scenes.len(), 7);
        assert_eq!(scenes[0].id, "S1_GALAXY_CONTEXT");
        assert_eq!(scenes[4].id, "S2_3_G_GRAVITY_X_INSOL");
        assert_eq!(scenes[6].id, "S4_TRANSITION_TO_SMALL_MULTIPLES");
    }

    #[test]
    fn galaxy_projection_is_polar_log_distance() {
        let sys = SystemRecord {
            galactic_longitude_deg: Some(0.0),
            distance_pc: Some(9.0),
            ..Default::default()
        };
        let [x, y] = GalaxySpec::project(&sys);
        assert!((x - 1.0).abs() < 1e-12); // log10(9 + 1) = 1
        assert!(y.abs() < 1e-12);

        let sys = SystemRecord {
            galactic_longitude_deg: Some(90.0),
            distance_pc: Some(99.0),
            ..Default::default()
        };
        let [x, y] = GalaxySpec::project(&sys);
        assert!(x.abs() < 1e-9);
        assert!((y - 2.0).abs() < 1e-9);
    }

    #[test]
    fn missing_fields_never_poison_encodings() {
        let blank = SystemRecord::default();
        let scenes = build_scenes();
        for scene in &scenes {
            if let ViewSpec::Galaxy(spec) = &scene.view {
                let [x, y] = GalaxySpec::project(&blank);
                assert!(x.is_finite() && y.is_finite());
                assert!(spec.opacity_of(&blank).is_finite());
                assert!(spec.size_of(&blank).is_finite());
            }
        }
    }

    #[test]
    fn candidate_scene_gates_hover_and_highlight() {
        let scenes = build_scenes();
        let spec = match &scenes[5].view {
            ViewSpec::Galaxy(spec) => spec,
            _ => panic!("scene 5 should be the candidates galaxy"),
        };
        let plain = SystemRecord {
            has_data: true,
            ..Default::default()
        };
        let host = SystemRecord {
            has_data: true,
            has_candidate: true,
            candidate_count_optimistic: 4,
            stellar_temp_k: Some(5800.0),
            ..Default::default()
        };
        assert!(!(spec.hoverable)(&plain));
        assert!((spec.hoverable)(&host));
        assert!(spec.opacity_of(&plain) < 0.1);
        assert!(spec.opacity_of(&host) > 0.9);
        assert_eq!(spec.color_of(&host), STAR_G);
        assert!(spec.size_of(&host) > spec.size_of(&plain));
    }
}
