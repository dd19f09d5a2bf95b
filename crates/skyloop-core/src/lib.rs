pub mod config;
pub mod constants;
pub mod error;
pub mod math;
pub mod types;

pub use config::{
    corrected_grid_dimension, corrected_tile_size, load_config_from_str, FlightConfig,
    FlightTuning, HeightfieldConfig,
};
pub use error::ConfigError;
pub use types::{ConceptualPos, GridCoord, HeightfieldAlgorithm, RenderPos, SlotLayout};
