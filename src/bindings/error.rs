// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
use crate::bindings::coordinates::Rect;
use crate::imp::GpuError;

/// Errors reported by texture buffer operations.
///
/// Every error is local to one buffer.  A failed buffer keeps its CPU-side state
/// and can be retried on a later frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum TextureError {
    #[error("Can't allocate texture storage: {0}")]
    Allocation(GpuError),
    #[error("Can't upload texels: {0}")]
    Upload(GpuError),
    #[error("Can't draw texture: {0}")]
    Rendering(GpuError),
    #[error("Update {rect:?} is outside the logical area {width}x{height}")]
    OutOfBounds { rect: Rect, width: u16, height: u16 },
    #[error("The GPU context was lost; reinit is required")]
    ContextLost,
    #[error("Requested size {width}x{height} exceeds the maximum texture size {max}")]
    TooLarge { width: u32, height: u32, max: u32 },
    #[error("Source pitch {pitch} is smaller than a row of {row_bytes} bytes")]
    InvalidPitch { pitch: usize, row_bytes: usize },
    #[error("Source holds {actual} bytes but {required} are required")]
    SourceTooSmall { required: usize, actual: usize },
    #[error("Palette entries {start}..{end} are outside a palette of {entries}")]
    PaletteRange { start: usize, end: usize, entries: u16 },
    #[error("Texture format has no suitable palette")]
    NoPalette,
    #[error("Texture has not been allocated")]
    NotAllocated,
}

impl TextureError {
    pub(crate) fn allocation(err: GpuError) -> Self {
        if err.is_context_loss() {
            TextureError::ContextLost
        } else {
            TextureError::Allocation(err)
        }
    }

    pub(crate) fn upload(err: GpuError) -> Self {
        if err.is_context_loss() {
            TextureError::ContextLost
        } else {
            TextureError::Upload(err)
        }
    }

    pub(crate) fn rendering(err: GpuError) -> Self {
        if err.is_context_loss() {
            TextureError::ContextLost
        } else {
            TextureError::Rendering(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imp::TextureHandle;

    #[test]
    fn stale_handles_mean_context_loss() {
        let handle = TextureHandle::new(7).unwrap();
        assert_eq!(
            TextureError::upload(GpuError::InvalidHandle(handle)),
            TextureError::ContextLost
        );
        assert_eq!(TextureError::rendering(GpuError::ContextLost), TextureError::ContextLost);
        assert_eq!(
            TextureError::allocation(GpuError::OutOfMemory),
            TextureError::Allocation(GpuError::OutOfMemory)
        );
    }
}
