/*! Defines texture buffer types */

pub mod coordinates;
pub mod dirty_tracking;
pub mod error;
pub mod palette;
pub mod sampler;
pub mod texture_buffer;
pub mod texture_config;

pub use error::TextureError;
pub use texture_buffer::TextureBuffer;
