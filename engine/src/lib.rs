pub mod animation;
pub mod api;
pub mod color;
pub mod filter;
pub mod fractal;
pub mod pages;
pub mod perlin;
pub mod permutation;
pub mod preview;
pub mod raster;
pub mod snapshot;

pub use api::{NoiseError, NoiseSource, ParamRange, Seed};
pub use color::Rgb;
pub use fractal::{fractal_sample, Fractal, FractalSettings};
pub use perlin::{NoiseField, PerlinGenerator};
pub use permutation::PermutationTable;
pub use raster::Raster;
pub use snapshot::GallerySnapshot;
