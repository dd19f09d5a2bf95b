pub mod api;
pub mod error;
pub mod generator;
pub mod heightfield;
pub mod placement;
pub mod sampler;

mod diamond_square;
mod hash;
mod noise;

pub use api::TerrainApi;
pub use error::TerrainError;
pub use generator::{generate_heightfield, validate_params, HeightfieldCache};
pub use heightfield::Heightfield;
pub use placement::{fence_posts, place_on_surface, scatter_points, SurfacePlacement};
pub use sampler::{SurfaceSample, TerrainSampler};
