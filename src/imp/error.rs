// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::imp::TextureHandle;

/// A failed call into a GPU context.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GpuError {
    #[error("out of GPU memory")]
    OutOfMemory,
    #[error("invalid texture dimensions {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("texture handle {0:?} is not valid in this context")]
    InvalidHandle(TextureHandle),
    #[error("no texture is bound")]
    NoTextureBound,
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),
    #[error("{0} is not supported by this context")]
    Unsupported(&'static str),
    #[error("the GPU context was lost")]
    ContextLost,
    #[error("{0}")]
    Backend(String),
}

impl GpuError {
    /// Whether the failure means the texture's handle no longer exists.
    pub fn is_context_loss(&self) -> bool {
        matches!(self, GpuError::ContextLost | GpuError::InvalidHandle(_))
    }
}
