pub mod clock;
pub mod color;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
#[cfg(feature = "gpu")]
pub mod gpu;
pub mod grid;
pub mod line;
pub mod mesh;
pub mod scene;
pub mod sine;
pub mod spline;
pub mod state;

#[cfg(feature = "gpu")]
pub static SCENE_WGSL: &str = include_str!("../shaders/scene.wgsl");

pub use clock::*;
pub use config::*;
pub use constants::*;
pub use engine::*;
pub use error::*;
pub use grid::*;
pub use line::*;
pub use scene::*;
pub use sine::*;
pub use state::*;
