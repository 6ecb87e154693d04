// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
A headless [GpuContext] that keeps every texture's texels in memory.

It validates calls the way a strict driver would, journals every successful call,
and can inject failures or simulate a context loss.  Tests compare uploaded texels
byte for byte through [SoftwareContext::texture].
*/

use std::collections::HashMap;

use crate::bindings::coordinates::DestRect;
use crate::bindings::sampler::{SamplerType, WrapMode};
use crate::images::quad::QuadVertex;
use crate::imp::{CropRect, GpuContext, GpuError, TextureHandle};
use crate::pixel_formats::{PaletteLayout, UploadFormat};

pub const DEFAULT_MAX_TEXTURE_SIZE: u32 = 4096;

/// A successful call, as recorded in the journal.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    CreateTexture(TextureHandle),
    DeleteTexture(TextureHandle),
    BindTexture(TextureHandle),
    SetTextureParameters {
        texture: TextureHandle,
        sampler: SamplerType,
        wrap: WrapMode,
    },
    UploadTexture {
        texture: TextureHandle,
        width: u32,
        height: u32,
        with_data: bool,
    },
    UploadSubregion {
        texture: TextureHandle,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    UploadCompressed {
        texture: TextureHandle,
        width: u32,
        height: u32,
    },
    DrawTriangleStrip {
        texture: TextureHandle,
        vertices: [QuadVertex; 4],
    },
    DrawTextureDirect {
        texture: TextureHandle,
        crop: CropRect,
        dest: DestRect,
    },
}

impl Command {
    pub fn is_upload(&self) -> bool {
        matches!(
            self,
            Command::UploadTexture { with_data: true, .. }
                | Command::UploadSubregion { .. }
                | Command::UploadCompressed { .. }
        )
    }

    pub fn is_draw(&self) -> bool {
        matches!(
            self,
            Command::DrawTriangleStrip { .. } | Command::DrawTextureDirect { .. }
        )
    }
}

/// Texel storage of one texture.
#[derive(Debug, Clone)]
pub struct SoftwareTexture {
    pub width: u32,
    pub height: u32,
    /// `None` until storage has been specified.
    pub format: Option<UploadFormat>,
    pub texels: Vec<u8>,
    pub sampler: SamplerType,
    pub wrap: WrapMode,
}

impl SoftwareTexture {
    fn empty() -> Self {
        SoftwareTexture {
            width: 0,
            height: 0,
            format: None,
            texels: Vec::new(),
            sampler: SamplerType::default(),
            wrap: WrapMode::default(),
        }
    }

    pub fn bytes_per_texel(&self) -> usize {
        self.format.map_or(0, |f| f.bytes_per_texel() as usize)
    }

    pub fn pitch(&self) -> usize {
        self.width as usize * self.bytes_per_texel()
    }

    /// Copies out a tightly packed region.
    pub fn region(&self, x: u32, y: u32, width: u32, height: u32) -> Vec<u8> {
        let bpt = self.bytes_per_texel();
        let row = width as usize * bpt;
        let mut out = Vec::with_capacity(row * height as usize);
        for r in y..y + height {
            let start = r as usize * self.pitch() + x as usize * bpt;
            out.extend_from_slice(&self.texels[start..start + row]);
        }
        out
    }
}

#[derive(Debug)]
pub struct SoftwareContext {
    extensions: String,
    max_texture_size: u32,
    textures: HashMap<TextureHandle, SoftwareTexture>,
    next_name: u32,
    bound: Option<TextureHandle>,
    journal: Vec<Command>,
    pending_failure: Option<GpuError>,
}

impl SoftwareContext {
    pub fn new(extensions: &str) -> Self {
        SoftwareContext {
            extensions: extensions.to_string(),
            max_texture_size: DEFAULT_MAX_TEXTURE_SIZE,
            textures: HashMap::new(),
            next_name: 1,
            bound: None,
            journal: Vec::new(),
            pending_failure: None,
        }
    }

    pub fn with_max_texture_size(mut self, max_texture_size: u32) -> Self {
        self.max_texture_size = max_texture_size;
        self
    }

    /// Makes the next fallible call fail with `error`.
    pub fn fail_next(&mut self, error: GpuError) {
        self.pending_failure = Some(error);
    }

    /// Drops every texture, as a driver does when the context goes away.
    pub fn lose_context(&mut self) {
        self.textures.clear();
        self.bound = None;
    }

    pub fn journal(&self) -> &[Command] {
        &self.journal
    }

    pub fn clear_journal(&mut self) {
        self.journal.clear();
    }

    pub fn texture(&self, texture: TextureHandle) -> Option<&SoftwareTexture> {
        self.textures.get(&texture)
    }

    pub fn live_texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn bound_texture(&self) -> Option<TextureHandle> {
        self.bound
    }

    fn check_failure(&mut self) -> Result<(), GpuError> {
        match self.pending_failure.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn bound_mut(&mut self) -> Result<(TextureHandle, &mut SoftwareTexture), GpuError> {
        let handle = self.bound.ok_or(GpuError::NoTextureBound)?;
        let texture = self
            .textures
            .get_mut(&handle)
            .ok_or(GpuError::InvalidHandle(handle))?;
        Ok((handle, texture))
    }

    fn check_dimensions(&self, width: u32, height: u32) -> Result<(), GpuError> {
        if width == 0 || height == 0 || width > self.max_texture_size || height > self.max_texture_size {
            return Err(GpuError::InvalidDimensions { width, height });
        }
        Ok(())
    }
}

impl GpuContext for SoftwareContext {
    fn extensions(&self) -> &str {
        &self.extensions
    }

    fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }

    fn create_texture(&mut self) -> Result<TextureHandle, GpuError> {
        self.check_failure()?;
        let handle = TextureHandle::new(self.next_name).ok_or(GpuError::OutOfMemory)?;
        self.next_name = self.next_name.checked_add(1).ok_or(GpuError::OutOfMemory)?;
        self.textures.insert(handle, SoftwareTexture::empty());
        self.journal.push(Command::CreateTexture(handle));
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if self.textures.remove(&texture).is_some() {
            if self.bound == Some(texture) {
                self.bound = None;
            }
            self.journal.push(Command::DeleteTexture(texture));
        }
    }

    fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), GpuError> {
        self.check_failure()?;
        if !self.textures.contains_key(&texture) {
            return Err(GpuError::InvalidHandle(texture));
        }
        self.bound = Some(texture);
        self.journal.push(Command::BindTexture(texture));
        Ok(())
    }

    fn set_texture_parameters(&mut self, sampler: SamplerType, wrap: WrapMode) -> Result<(), GpuError> {
        self.check_failure()?;
        let (handle, texture) = self.bound_mut()?;
        texture.sampler = sampler;
        texture.wrap = wrap;
        self.journal.push(Command::SetTextureParameters {
            texture: handle,
            sampler,
            wrap,
        });
        Ok(())
    }

    fn upload_texture(
        &mut self,
        width: u32,
        height: u32,
        format: UploadFormat,
        data: Option<&[u8]>,
    ) -> Result<(), GpuError> {
        self.check_failure()?;
        self.check_dimensions(width, height)?;
        let (handle, texture) = self.bound_mut()?;
        let len = width as usize * height as usize * format.bytes_per_texel() as usize;
        let texels = match data {
            Some(data) if data.len() != len => return Err(GpuError::InvalidValue("data length")),
            Some(data) => data.to_vec(),
            None => vec![0; len],
        };
        texture.width = width;
        texture.height = height;
        texture.format = Some(format);
        texture.texels = texels;
        self.journal.push(Command::UploadTexture {
            texture: handle,
            width,
            height,
            with_data: data.is_some(),
        });
        Ok(())
    }

    fn upload_subregion(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        format: UploadFormat,
        data: &[u8],
    ) -> Result<(), GpuError> {
        self.check_failure()?;
        let (handle, texture) = self.bound_mut()?;
        if texture.format != Some(format) {
            return Err(GpuError::InvalidValue("format does not match texture storage"));
        }
        if x as u64 + width as u64 > texture.width as u64 || y as u64 + height as u64 > texture.height as u64 {
            return Err(GpuError::InvalidValue("subregion outside texture"));
        }
        let bpt = texture.bytes_per_texel();
        let row = width as usize * bpt;
        if data.len() != row * height as usize {
            return Err(GpuError::InvalidValue("data length"));
        }
        let pitch = texture.pitch();
        for (r, src) in data.chunks_exact(row.max(1)).enumerate().take(height as usize) {
            let start = (y as usize + r) * pitch + x as usize * bpt;
            texture.texels[start..start + row].copy_from_slice(src);
        }
        self.journal.push(Command::UploadSubregion {
            texture: handle,
            x,
            y,
            width,
            height,
        });
        Ok(())
    }

    fn upload_compressed(
        &mut self,
        width: u32,
        height: u32,
        palette: PaletteLayout,
        data: &[u8],
    ) -> Result<(), GpuError> {
        self.check_failure()?;
        if !self.extensions.contains("GL_OES_compressed_paletted_texture") {
            return Err(GpuError::Unsupported("compressed paletted textures"));
        }
        self.check_dimensions(width, height)?;
        let (handle, texture) = self.bound_mut()?;
        let palette_len = palette.byte_len();
        if data.len() != palette_len + width as usize * height as usize {
            return Err(GpuError::InvalidValue("data length"));
        }
        let (colors, indices) = data.split_at(palette_len);
        let entry = palette.bytes_per_entry();
        let mut texels = Vec::with_capacity(indices.len() * entry);
        for index in indices {
            let start = *index as usize * entry;
            match colors.get(start..start + entry) {
                Some(color) => texels.extend_from_slice(color),
                None => return Err(GpuError::InvalidValue("palette index out of range")),
            }
        }
        texture.width = width;
        texture.height = height;
        texture.format = Some(palette.entry_format);
        texture.texels = texels;
        self.journal.push(Command::UploadCompressed {
            texture: handle,
            width,
            height,
        });
        Ok(())
    }

    fn draw_triangle_strip(&mut self, vertices: &[QuadVertex; 4]) -> Result<(), GpuError> {
        self.check_failure()?;
        let (handle, _) = self.bound_mut()?;
        self.journal.push(Command::DrawTriangleStrip {
            texture: handle,
            vertices: *vertices,
        });
        Ok(())
    }

    fn draw_texture_direct(&mut self, crop: CropRect, dest: DestRect) -> Result<(), GpuError> {
        self.check_failure()?;
        if !self.extensions.contains("GL_OES_draw_texture") {
            return Err(GpuError::Unsupported("direct texture drawing"));
        }
        let (handle, _) = self.bound_mut()?;
        self.journal.push(Command::DrawTextureDirect {
            texture: handle,
            crop,
            dest,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calls_require_a_bound_texture() {
        let mut ctx = SoftwareContext::new("");
        assert_eq!(
            ctx.upload_texture(4, 4, UploadFormat::RGBA8, None),
            Err(GpuError::NoTextureBound)
        );
        let t = ctx.create_texture().unwrap();
        ctx.bind_texture(t).unwrap();
        ctx.upload_texture(4, 4, UploadFormat::RGBA8, None).unwrap();
        assert_eq!(ctx.texture(t).unwrap().texels.len(), 64);
    }

    #[test]
    fn subregion_writes_rows() {
        let mut ctx = SoftwareContext::new("");
        let t = ctx.create_texture().unwrap();
        ctx.bind_texture(t).unwrap();
        ctx.upload_texture(4, 4, UploadFormat::RGB8, None).unwrap();
        let data: Vec<u8> = (0..12).collect();
        ctx.upload_subregion(1, 2, 2, 2, UploadFormat::RGB8, &data).unwrap();
        assert_eq!(ctx.texture(t).unwrap().region(1, 2, 2, 2), data);
        assert_eq!(ctx.texture(t).unwrap().region(0, 0, 4, 1), vec![0; 12]);
        assert_eq!(
            ctx.upload_subregion(3, 3, 2, 1, UploadFormat::RGB8, &data[..6]),
            Err(GpuError::InvalidValue("subregion outside texture"))
        );
    }

    #[test]
    fn compressed_upload_expands_palette() {
        let mut ctx = SoftwareContext::new("GL_OES_compressed_paletted_texture");
        let t = ctx.create_texture().unwrap();
        ctx.bind_texture(t).unwrap();
        let mut data = vec![0u8; PaletteLayout::RGB888_256.byte_len()];
        data[3..6].copy_from_slice(&[9, 8, 7]);
        data.extend_from_slice(&[1, 0]);
        ctx.upload_compressed(2, 1, PaletteLayout::RGB888_256, &data).unwrap();
        assert_eq!(ctx.texture(t).unwrap().texels, vec![9, 8, 7, 0, 0, 0]);
    }

    #[test]
    fn context_loss_invalidates_handles() {
        let mut ctx = SoftwareContext::new("");
        let t = ctx.create_texture().unwrap();
        ctx.lose_context();
        assert_eq!(ctx.bind_texture(t), Err(GpuError::InvalidHandle(t)));
        let fresh = ctx.create_texture().unwrap();
        assert_ne!(fresh, t);
    }

    #[test]
    fn injected_failure_is_consumed() {
        let mut ctx = SoftwareContext::new("");
        ctx.fail_next(GpuError::OutOfMemory);
        assert_eq!(ctx.create_texture(), Err(GpuError::OutOfMemory));
        assert!(ctx.create_texture().is_ok());
        assert!(ctx.journal().iter().all(|c| matches!(c, Command::CreateTexture(_))));
        assert_eq!(ctx.journal().len(), 1);
    }
}
