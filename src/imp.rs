// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
The boundary to a graphics API.

[GpuContext] is a thin, GL-shaped binding.  Like GL it has one piece of ambient
state, the currently bound texture, which every texture-scoped call operates on.
Callers must bind their own texture before each sequence of calls and never assume
a previous bind is still in effect.

Backends:
- [SoftwareContext] keeps texels in memory and journals every call.  Always available.
- `WgpuContext` emulates the same contract on wgpu.  Requires the `backend_wgpu` feature.
*/

use std::num::NonZeroU32;

use crate::bindings::coordinates::DestRect;
use crate::bindings::sampler::{SamplerType, WrapMode};
use crate::images::quad::QuadVertex;
use crate::pixel_formats::{PaletteLayout, UploadFormat};

mod error;
mod software;

pub use error::GpuError;
pub use software::{Command, SoftwareContext, SoftwareTexture};

#[cfg(feature = "backend_wgpu")]
mod wgpu;
#[cfg(feature = "backend_wgpu")]
pub use wgpu::WgpuContext;

/// An opaque, never-zero texture name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(NonZeroU32);

impl TextureHandle {
    pub fn new(raw: u32) -> Option<Self> {
        NonZeroU32::new(raw).map(TextureHandle)
    }

    pub fn get(self) -> u32 {
        self.0.get()
    }
}

/// Source rectangle for direct texture drawing, in texels.
///
/// A negative height flips vertically, which is how GL crop rects address
/// textures whose first row is the top of the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/**
A GPU context, reduced to what texture buffers need.

All calls may fail.  Calls taking no texture argument operate on the bound texture.
*/
pub trait GpuContext {
    /// Space-separated extension names, queried once at startup.
    fn extensions(&self) -> &str;

    fn max_texture_size(&self) -> u32;

    fn create_texture(&mut self) -> Result<TextureHandle, GpuError>;

    /// Releases a texture.  Unknown handles are ignored.
    fn delete_texture(&mut self, texture: TextureHandle);

    fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), GpuError>;

    fn set_texture_parameters(&mut self, sampler: SamplerType, wrap: WrapMode) -> Result<(), GpuError>;

    /// (Re)specifies the whole texture.  `None` allocates storage without contents.
    fn upload_texture(
        &mut self,
        width: u32,
        height: u32,
        format: UploadFormat,
        data: Option<&[u8]>,
    ) -> Result<(), GpuError>;

    /// Replaces a sub-rectangle.  `data` is tightly packed; there is no stride parameter.
    fn upload_subregion(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: UploadFormat,
        data: &[u8],
    ) -> Result<(), GpuError>;

    /// Specifies the whole texture from a palette block followed by 8-bit indices.
    fn upload_compressed(
        &mut self,
        width: u32,
        height: u32,
        palette: PaletteLayout,
        data: &[u8],
    ) -> Result<(), GpuError>;

    /// Draws the bound texture as a 4-vertex triangle strip.
    fn draw_triangle_strip(&mut self, vertices: &[QuadVertex; 4]) -> Result<(), GpuError>;

    /// Draws a cropped region of the bound texture straight to the screen.
    fn draw_texture_direct(&mut self, _crop: CropRect, _dest: DestRect) -> Result<(), GpuError> {
        Err(GpuError::Unsupported("direct texture drawing"))
    }
}
