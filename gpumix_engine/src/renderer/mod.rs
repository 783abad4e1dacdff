/// Renderer module - backend-agnostic rendering types

pub mod config;
pub mod texture;
pub mod vertex;

pub use config::*;
pub use texture::*;
pub use vertex::*;
