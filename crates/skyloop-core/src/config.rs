use crate::constants::*;
use crate::error::ConfigError;
use crate::types::{HeightfieldAlgorithm, SlotLayout};
use serde::{Deserialize, Serialize};

/// Parameters of the procedural heightfield. Also the memoization key:
/// two configs that compare equal always produce the same array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeightfieldConfig {
    /// Array dimension and period in samples.
    pub size: u32,
    /// World units spanned before the field repeats.
    pub scale: f64,
    pub algorithm: HeightfieldAlgorithm,
    pub seed: u64,
    /// Peak-to-peak height budget in world units.
    pub amplitude: f32,
    /// Diamond-square only: amplitude falls by `2^-roughness` per level.
    pub roughness: f32,
    /// Diamond-square only: value of the shared starting corner.
    pub initial_corner: f32,
    /// fBm only: number of summed octaves.
    pub octaves: u32,
    /// fBm only: each octave's amplitude relative to the one before.
    /// Frequency always doubles so every octave keeps an integer period.
    pub persistence: f32,
    /// fBm only: lattice cells per period in the lowest octave.
    pub base_cells: u32,
}

impl Default for HeightfieldConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_HEIGHTFIELD_SIZE,
            scale: DEFAULT_HEIGHTFIELD_SCALE,
            algorithm: HeightfieldAlgorithm::default(),
            seed: DEFAULT_SEED,
            amplitude: DEFAULT_HEIGHT_AMPLITUDE,
            roughness: DEFAULT_ROUGHNESS,
            initial_corner: DEFAULT_INITIAL_CORNER,
            octaves: DEFAULT_OCTAVES,
            persistence: DEFAULT_PERSISTENCE,
            base_cells: DEFAULT_BASE_CELLS,
        }
    }
}

/// Flight camera tuning consumed by the browser front end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightTuning {
    pub speed: f64,
    pub boost: f64,
    pub turn_rate: f32,
    pub start_altitude: f64,
}

impl Default for FlightTuning {
    fn default() -> Self {
        Self {
            speed: DEFAULT_FLIGHT_SPEED,
            boost: DEFAULT_FLIGHT_BOOST,
            turn_rate: DEFAULT_TURN_RATE,
            start_altitude: DEFAULT_START_ALTITUDE,
        }
    }
}

/// Top-level configuration for the streaming core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlightConfig {
    pub tile_size: f64,
    /// Tiles per side of the streamed square (odd).
    pub grid_dimension: u32,
    pub shift_threshold: f64,
    /// Quads per tile edge.
    pub tile_segments: u32,
    pub normal_epsilon: f64,
    pub slot_layout: SlotLayout,
    pub heightfield: HeightfieldConfig,
    pub flight: FlightTuning,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            tile_size: DEFAULT_TILE_SIZE,
            grid_dimension: DEFAULT_GRID_DIMENSION,
            shift_threshold: DEFAULT_SHIFT_THRESHOLD,
            tile_segments: DEFAULT_TILE_SEGMENTS,
            normal_epsilon: DEFAULT_NORMAL_EPSILON,
            slot_layout: SlotLayout::default(),
            heightfield: HeightfieldConfig::default(),
            flight: FlightTuning::default(),
        }
    }
}

impl FlightConfig {
    /// Return a copy with every out-of-range streaming value corrected.
    /// Each correction is logged; none is fatal. Heightfield parameters are
    /// checked by the generator, which knows what each algorithm accepts.
    pub fn validated(&self) -> Self {
        let mut cfg = self.clone();

        cfg.tile_size = corrected_tile_size(cfg.tile_size);
        cfg.grid_dimension = corrected_grid_dimension(cfg.grid_dimension);

        let min_threshold = cfg.tile_size / 2.0;
        if !(cfg.shift_threshold.is_finite() && cfg.shift_threshold > min_threshold) {
            let corrected = cfg.tile_size * SHIFT_THRESHOLD_TILE_RATIO;
            log::warn!(
                "shift_threshold {} must exceed half a tile ({}), using {}",
                cfg.shift_threshold,
                min_threshold,
                corrected
            );
            cfg.shift_threshold = corrected;
        }

        if cfg.tile_segments == 0 || cfg.tile_segments > MAX_TILE_SEGMENTS {
            let corrected = cfg.tile_segments.clamp(1, MAX_TILE_SEGMENTS);
            log::warn!(
                "tile_segments {} out of range, using {}",
                cfg.tile_segments,
                corrected
            );
            cfg.tile_segments = corrected;
        }

        if !(cfg.normal_epsilon.is_finite() && cfg.normal_epsilon > 0.0) {
            log::warn!(
                "normal_epsilon {} is not a positive number, using {}",
                cfg.normal_epsilon,
                DEFAULT_NORMAL_EPSILON
            );
            cfg.normal_epsilon = DEFAULT_NORMAL_EPSILON;
        }

        cfg
    }
}

/// `tile_size` if it is a positive finite number, otherwise the default.
pub fn corrected_tile_size(tile_size: f64) -> f64 {
    if tile_size.is_finite() && tile_size > 0.0 {
        return tile_size;
    }
    log::warn!("tile_size {tile_size} is not a positive number, using {DEFAULT_TILE_SIZE}");
    DEFAULT_TILE_SIZE
}

/// Nearest usable grid dimension: odd and within `1..=MAX_GRID_DIMENSION`.
pub fn corrected_grid_dimension(dimension: u32) -> u32 {
    let corrected = match dimension {
        0 => DEFAULT_GRID_DIMENSION,
        d if d > MAX_GRID_DIMENSION => MAX_GRID_DIMENSION,
        d if d % 2 == 0 => d + 1,
        d => d,
    };
    if corrected != dimension {
        log::warn!("grid_dimension {dimension} is invalid, using {corrected}");
    }
    corrected
}

/// Parse a flight configuration from a RON string. Missing fields take
/// their defaults; the result is not yet validated.
pub fn load_config_from_str(ron_str: &str) -> Result<FlightConfig, ConfigError> {
    let options = ron::Options::default();
    options
        .from_str(ron_str)
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}
