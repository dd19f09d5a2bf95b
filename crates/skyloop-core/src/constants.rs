//! Single source of truth for shared defaults.
//! The configuration layer falls back to these when a RON field is absent
//! or has to be corrected.

/// World units along one tile edge.
pub const DEFAULT_TILE_SIZE: f64 = 100.0;

/// Tiles per side of the streamed square. Must be odd so the viewpoint
/// tile sits in the middle.
pub const DEFAULT_GRID_DIMENSION: u32 = 5;

/// Largest accepted grid dimension. Odd, so clamping keeps the grid centered.
pub const MAX_GRID_DIMENSION: u32 = 255;

/// Render-space distance on x/z beyond which the world origin is re-based.
/// 1.5 tiles gives enough hysteresis that a shift never triggers a reverse shift.
pub const DEFAULT_SHIFT_THRESHOLD: f64 = 150.0;

/// Threshold-to-tile ratio used when a configured threshold is too small.
pub const SHIFT_THRESHOLD_TILE_RATIO: f64 = 1.5;

/// Quads per tile edge in generated geometry.
pub const DEFAULT_TILE_SEGMENTS: u32 = 32;

/// Upper bound on quads per tile edge (keeps u32 indices comfortably in range).
pub const MAX_TILE_SEGMENTS: u32 = 512;

/// Heightfield array dimension (and period, in samples).
pub const DEFAULT_HEIGHTFIELD_SIZE: u32 = 256;

/// World units covered by the heightfield before it repeats.
pub const DEFAULT_HEIGHTFIELD_SCALE: f64 = 1000.0;

/// Peak-to-peak height budget of generated terrain, in world units.
pub const DEFAULT_HEIGHT_AMPLITUDE: f32 = 60.0;

/// Diamond-square roughness exponent. Amplitude is multiplied by
/// `2^-roughness` at every subdivision level.
pub const DEFAULT_ROUGHNESS: f32 = 1.0;

/// Value written into the (shared) initial corner before displacement.
pub const DEFAULT_INITIAL_CORNER: f32 = 0.0;

/// Octave count for periodic fBm synthesis.
pub const DEFAULT_OCTAVES: u32 = 5;

/// Amplitude ratio between successive fBm octaves.
pub const DEFAULT_PERSISTENCE: f32 = 0.5;

/// Lattice cells per period for the lowest fBm octave.
pub const DEFAULT_BASE_CELLS: u32 = 4;

/// Default generation seed.
pub const DEFAULT_SEED: u64 = 42;

/// Finite-difference half-width used for surface normals, in world units.
pub const DEFAULT_NORMAL_EPSILON: f64 = 0.5;

/// Cruise speed of the flight camera (world units per second).
pub const DEFAULT_FLIGHT_SPEED: f64 = 60.0;

/// Speed multiplier while boosting.
pub const DEFAULT_FLIGHT_BOOST: f64 = 4.0;

/// Yaw/pitch change per pixel of mouse movement (radians).
pub const DEFAULT_TURN_RATE: f32 = 0.003;

/// Starting height above the terrain directly below the camera.
pub const DEFAULT_START_ALTITUDE: f64 = 80.0;

/// Largest accepted heightfield dimension.
pub const MAX_HEIGHTFIELD_SIZE: u32 = 4096;
