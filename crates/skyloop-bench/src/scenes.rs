use glam::DVec3;
use skyloop_core::SlotLayout;

/// Cruise altitude of every scripted flight.
const ALTITUDE: f64 = 80.0;
const CIRCLE_RADIUS: f64 = 2_000.0;
/// Zigzag sideways amplitude and the forward distance of one full swing.
const ZIGZAG_AMPLITUDE: f64 = 600.0;
const ZIGZAG_WAVELENGTH: f64 = 2_400.0;

/// Shape of a scripted flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlightPath {
    /// Along +x.
    Straight,
    /// Along (+x, -z), crossing cells on both axes.
    Diagonal,
    /// Constant-radius loop back past the start.
    Circle,
    /// Forward along +x while swinging back and forth on z.
    Zigzag,
}

impl FlightPath {
    pub fn name(self) -> &'static str {
        match self {
            FlightPath::Straight => "straight",
            FlightPath::Diagonal => "diagonal",
            FlightPath::Circle => "circle",
            FlightPath::Zigzag => "zigzag",
        }
    }

    /// Conceptual camera position after flying `distance` world units.
    pub fn position_at(self, distance: f64) -> DVec3 {
        match self {
            FlightPath::Straight => DVec3::new(distance, ALTITUDE, 0.0),
            FlightPath::Diagonal => {
                let d = distance * std::f64::consts::FRAC_1_SQRT_2;
                DVec3::new(d, ALTITUDE, -d)
            }
            FlightPath::Circle => {
                let angle = distance / CIRCLE_RADIUS;
                DVec3::new(
                    CIRCLE_RADIUS * angle.cos() - CIRCLE_RADIUS,
                    ALTITUDE,
                    CIRCLE_RADIUS * angle.sin(),
                )
            }
            FlightPath::Zigzag => {
                let phase = (distance / ZIGZAG_WAVELENGTH + 0.25).fract();
                // Triangle wave in [-1, 1], zero at the start
                let swing = 1.0 - 4.0 * (phase - 0.5).abs();
                DVec3::new(distance, ALTITUDE, ZIGZAG_AMPLITUDE * swing)
            }
        }
    }
}

/// Configuration for a single benchmark scene.
#[derive(Debug, Clone)]
pub struct SceneConfig {
    pub name: String,
    pub path: FlightPath,
    pub layout: SlotLayout,
    /// World units flown per step.
    pub speed: f64,
}

/// Return the standard suite: every path under both slot layouts.
pub fn standard_scenes() -> Vec<SceneConfig> {
    let paths = [
        (FlightPath::Straight, 12.0),
        (FlightPath::Diagonal, 12.0),
        (FlightPath::Circle, 10.0),
        (FlightPath::Zigzag, 8.0),
    ];
    let layouts = [
        (SlotLayout::Fixed, "fixed"),
        (SlotLayout::Toroidal, "toroidal"),
    ];

    let mut scenes = Vec::with_capacity(paths.len() * layouts.len());
    for (path, speed) in paths {
        for (layout, layout_name) in layouts {
            scenes.push(SceneConfig {
                name: format!("{}/{}", path.name(), layout_name),
                path,
                layout,
                speed,
            });
        }
    }
    scenes
}
