/*! The drawing component of texture_buffers */

pub use engine::{Engine, FrameReport, LayerId};

pub mod capabilities;
pub(crate) mod device;
pub(crate) mod engine;
pub mod quad;

pub use capabilities::Capabilities;
pub use device::BoundDevice;
