// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Cross-platform texture buffer.

A [TextureBuffer] pairs a GPU texture with the caller's pixel source.  The texture
is padded to hardware-legal dimensions, while the caller only ever sees the logical
size it asked for.

# Upload strategies

* Direct-color formats with [CPUStrategy::Immediate](crate::bindings::texture_config::CPUStrategy::Immediate) upload on every
  [TextureBuffer::update_buffer].  A source whose pitch is wider than its rows is
  uploaded one row at a time, since the context has no stride parameter.
* Direct-color formats with [CPUStrategy::Mirrored](crate::bindings::texture_config::CPUStrategy::Mirrored) copy into a CPU mirror and
  upload at draw time: nothing, the dirty bounding box, or the whole logical area,
  as the [DirtyRegionTracker] decides.
* Palette-indexed formats are always mirrored.  The mirror starts with the palette
  block, so palette and indices go up together in one compressed upload.  Any
  change makes the whole texture dirty.

# Context loss

The owner detects context loss (operations return [TextureError::ContextLost]) and
calls [TextureBuffer::reinit].  Mirrored buffers re-upload on the next draw;
immediate buffers must be resupplied by the owner.
*/

use std::rc::Rc;

use crate::bindings::coordinates::{DestRect, Rect};
use crate::bindings::dirty_tracking::{DirtyRegionTracker, DirtyState, UploadPlan};
use crate::bindings::error::TextureError;
use crate::bindings::palette;
use crate::bindings::sampler::{SamplerType, WrapMode};
use crate::bindings::texture_config::TextureConfig;
use crate::bittricks::padded_dimension;
use crate::images::capabilities::Capabilities;
use crate::images::device::BoundDevice;
use crate::images::quad::{TexExtent, logical_crop, textured_quad};
use crate::imp::{GpuContext, GpuError, TextureHandle};
use crate::pixel_formats::{PaletteLayout, PixelFormatDescriptor, UploadFormat};

#[derive(Debug)]
pub struct TextureBuffer<C: GpuContext> {
    device: Rc<BoundDevice<C>>,
    debug_name: String,
    format: PixelFormatDescriptor,
    sampler: SamplerType,
    wrap: WrapMode,
    mirrored: bool,
    logical_width: u16,
    logical_height: u16,
    padded_width: u32,
    padded_height: u32,
    handle: Option<TextureHandle>,
    /// Palette block (if any) followed by padded pixel rows.
    mirror: Vec<u8>,
    key_color: Option<u8>,
    tracker: DirtyRegionTracker,
}

impl<C: GpuContext> TextureBuffer<C> {
    /**
    Creates an unallocated buffer.  No GPU call happens until [Self::allocate].

    The palette block of a palette-indexed format exists from here on, so the
    palette may be set before the first allocation.
    */
    pub fn new(device: &Rc<BoundDevice<C>>, config: TextureConfig<'_>) -> Self {
        TextureBuffer {
            device: Rc::clone(device),
            debug_name: config.debug_name.to_string(),
            format: config.format,
            sampler: config.sampler,
            wrap: config.wrap,
            mirrored: config.is_mirrored(),
            logical_width: 0,
            logical_height: 0,
            padded_width: 0,
            padded_height: 0,
            handle: None,
            mirror: config.format.palette.map(palette::empty_block).unwrap_or_default(),
            key_color: None,
            tracker: DirtyRegionTracker::new(true),
        }
    }

    /**
    Sets the logical size, growing the GPU texture if it is too small.

    Shrinking, or growing within the current padded size, keeps the texture.
    Growing past it deletes the texture and creates a new one with no contents.
    Either way the whole buffer becomes dirty.
    */
    pub fn allocate(&mut self, width: u16, height: u16) -> Result<(), TextureError> {
        let caps = *self.device.capabilities();
        let max = caps.max_texture_size;
        if width as u32 > max || height as u32 > max {
            return Err(self.fail(
                "allocate",
                TextureError::TooLarge {
                    width: width as u32,
                    height: height as u32,
                    max,
                },
            ));
        }
        self.tracker.mark_fully_dirty();

        if self.handle.is_some()
            && width as u32 <= self.padded_width
            && height as u32 <= self.padded_height
        {
            self.logical_width = width;
            self.logical_height = height;
            logwise::debuginternal_sync!(
                "Reusing texture {name} at {pw}x{ph} for {w}x{h}",
                name = logwise::privacy::LogIt(&self.debug_name),
                pw = self.padded_width,
                ph = self.padded_height,
                w = width,
                h = height
            );
            return Ok(());
        }

        let padded_width = padded_dimension(width, caps.npot_supported);
        let padded_height = padded_dimension(height, caps.npot_supported);
        if padded_width > max || padded_height > max {
            return Err(self.fail(
                "allocate",
                TextureError::TooLarge {
                    width: padded_width,
                    height: padded_height,
                    max,
                },
            ));
        }

        let device = Rc::clone(&self.device);
        let mut ctx = device.context_mut();
        if let Some(old) = self.handle.take() {
            ctx.delete_texture(old);
        }
        self.logical_width = 0;
        self.logical_height = 0;
        self.padded_width = 0;
        self.padded_height = 0;
        self.mirror.truncate(self.format.palette_len());

        let handle = ctx
            .create_texture()
            .map_err(|e| self.fail("allocate", TextureError::allocation(e)))?;
        if let Err(e) = Self::specify_storage(
            &mut *ctx,
            handle,
            padded_width,
            padded_height,
            self.format.upload,
            self.sampler,
            self.wrap,
        ) {
            ctx.delete_texture(handle);
            return Err(self.fail("allocate", TextureError::allocation(e)));
        }

        self.handle = Some(handle);
        self.logical_width = width;
        self.logical_height = height;
        self.padded_width = padded_width;
        self.padded_height = padded_height;
        if self.mirrored {
            self.mirror
                .resize(self.format.mirror_len(padded_width, padded_height), 0);
        }
        logwise::info_sync!(
            "Allocated texture {name} {w}x{h} padded to {pw}x{ph}",
            name = logwise::privacy::LogIt(&self.debug_name),
            w = width,
            h = height,
            pw = padded_width,
            ph = padded_height
        );
        Ok(())
    }

    /**
    Writes the `width` x `height` rectangle at (`x`, `y`) from `src`, whose rows are
    `pitch` bytes apart.

    The rectangle must lie within the logical area; otherwise nothing is written
    and [TextureError::OutOfBounds] is returned.  An empty rectangle is a no-op.
    */
    pub fn update_buffer(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        src: &[u8],
        pitch: usize,
    ) -> Result<(), TextureError> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        if self.padded_width == 0 {
            return Err(self.fail("update_buffer", TextureError::NotAllocated));
        }
        let rect = Rect::new(x, y, width, height);
        if !rect.fits_within(self.logical_width, self.logical_height) {
            return Err(self.fail(
                "update_buffer",
                TextureError::OutOfBounds {
                    rect,
                    width: self.logical_width,
                    height: self.logical_height,
                },
            ));
        }
        let row_bytes = self.format.row_bytes(width as u32);
        if pitch < row_bytes {
            return Err(self.fail(
                "update_buffer",
                TextureError::InvalidPitch { pitch, row_bytes },
            ));
        }
        let required = pitch
            .checked_mul(height as usize - 1)
            .and_then(|n| n.checked_add(row_bytes))
            .unwrap_or(usize::MAX);
        if src.len() < required {
            return Err(self.fail(
                "update_buffer",
                TextureError::SourceTooSmall {
                    required,
                    actual: src.len(),
                },
            ));
        }

        if self.mirrored {
            for row in 0..height as usize {
                let dst = self.pixel_offset(x as usize, y as usize + row);
                let start = row * pitch;
                self.mirror[dst..dst + row_bytes].copy_from_slice(&src[start..start + row_bytes]);
            }
            self.mark_updated(rect);
            return Ok(());
        }

        let Some(handle) = self.handle else {
            return Err(self.fail("update_buffer", TextureError::NotAllocated));
        };
        let device = Rc::clone(&self.device);
        let mut ctx = device.context_mut();
        Self::upload_rows(&mut *ctx, handle, rect, self.format.upload, src, pitch, row_bytes)
            .map_err(|e| self.fail("update_buffer", TextureError::upload(e)))?;
        self.tracker.mark_dirty(rect);
        Ok(())
    }

    /// Sets every byte of the logical area to `value`.
    pub fn fill_buffer(&mut self, value: u8) -> Result<(), TextureError> {
        if self.padded_width == 0 {
            return Err(self.fail("fill_buffer", TextureError::NotAllocated));
        }
        let (width, height) = (self.logical_width, self.logical_height);
        if width == 0 || height == 0 {
            return Ok(());
        }
        let row_bytes = self.format.row_bytes(width as u32);
        if self.mirrored {
            for row in 0..height as usize {
                let start = self.pixel_offset(0, row);
                self.mirror[start..start + row_bytes].fill(value);
            }
            self.mark_updated(Rect::full(width, height));
            Ok(())
        } else {
            let data = vec![value; row_bytes * height as usize];
            self.update_buffer(0, 0, width, height, &data, row_bytes)
        }
    }

    /**
    Draws the logical area into `dest`, uploading pending mirror contents first.

    The dirty state is cleared once pending contents are on the GPU.  If the upload
    fails the buffer stays dirty, so a later draw retries it.
    */
    pub fn draw(&mut self, dest: DestRect) -> Result<(), TextureError> {
        let Some(handle) = self.handle else {
            return Err(self.fail("draw", TextureError::NotAllocated));
        };
        let device = Rc::clone(&self.device);
        let caps = *device.capabilities();
        let mut ctx = device.context_mut();
        ctx.bind_texture(handle)
            .map_err(|e| self.fail("draw", TextureError::rendering(e)))?;
        if self.mirrored {
            self.flush(&mut *ctx, &caps)
                .map_err(|e| self.fail("draw", TextureError::upload(e)))?;
        }
        self.tracker.clear();

        let result = if caps.draw_texture_supported {
            ctx.draw_texture_direct(logical_crop(self.logical_width, self.logical_height), dest)
        } else {
            let extent = TexExtent::new(
                self.logical_width as u32,
                self.logical_height as u32,
                self.padded_width,
                self.padded_height,
            );
            ctx.draw_triangle_strip(&textured_quad(dest, extent))
        };
        result.map_err(|e| self.fail("draw", TextureError::rendering(e)))
    }

    /// Draws at the origin, unscaled.
    pub fn draw_full(&mut self) -> Result<(), TextureError> {
        let dest = DestRect::new(
            0.0,
            0.0,
            self.logical_width as f32,
            self.logical_height as f32,
        );
        self.draw(dest)
    }

    /// Deletes the GPU texture.  Safe to call on a buffer that was never allocated.
    ///
    /// The palette block survives; pixel contents do not.
    pub fn release(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.device.context_mut().delete_texture(handle);
            logwise::info_sync!(
                "Released texture {name}",
                name = logwise::privacy::LogIt(&self.debug_name)
            );
        }
        self.logical_width = 0;
        self.logical_height = 0;
        self.padded_width = 0;
        self.padded_height = 0;
        self.mirror.truncate(self.format.palette_len());
        self.tracker.mark_fully_dirty();
    }

    /**
    Recreates the GPU texture after a context loss.

    The stale handle is forgotten, not deleted: it belongs to the lost context.
    The sizes and mirror are kept and the whole buffer is marked dirty.
    */
    pub fn reinit(&mut self) -> Result<(), TextureError> {
        self.tracker.mark_fully_dirty();
        if self.padded_width == 0 {
            return Ok(());
        }
        let stale = self.handle.take();
        logwise::warn_sync!(
            "Reinitializing texture {name} (stale handle {stale})",
            name = logwise::privacy::LogIt(&self.debug_name),
            stale = logwise::privacy::LogIt(&stale)
        );
        let device = Rc::clone(&self.device);
        let mut ctx = device.context_mut();
        let handle = ctx
            .create_texture()
            .map_err(|e| self.fail("reinit", TextureError::allocation(e)))?;
        if let Err(e) = Self::specify_storage(
            &mut *ctx,
            handle,
            self.padded_width,
            self.padded_height,
            self.format.upload,
            self.sampler,
            self.wrap,
        ) {
            ctx.delete_texture(handle);
            return Err(self.fail("reinit", TextureError::allocation(e)));
        }
        self.handle = Some(handle);
        Ok(())
    }

    /// Changes filtering, applying it to the texture right away if there is one.
    pub fn set_sampler(&mut self, sampler: SamplerType) -> Result<(), TextureError> {
        self.sampler = sampler;
        let Some(handle) = self.handle else {
            return Ok(());
        };
        let device = Rc::clone(&self.device);
        let mut ctx = device.context_mut();
        Self::apply_parameters(&mut *ctx, handle, sampler, self.wrap)
            .map_err(|e| self.fail("set_sampler", TextureError::rendering(e)))
    }

    /// Writes RGB triplets into the palette starting at entry `start`.
    pub fn set_palette(&mut self, start: usize, colors: &[u8]) -> Result<(), TextureError> {
        let layout = self.palette_layout()?;
        let key_color = self.key_color;
        palette::write_rgb(layout, &mut self.mirror[..layout.byte_len()], start, colors, key_color)
            .map_err(|e| self.fail("set_palette", e))?;
        self.tracker.mark_fully_dirty();
        Ok(())
    }

    /// Reads `count` palette entries starting at `start` as RGB triplets.
    pub fn grab_palette(&self, start: usize, count: usize) -> Result<Vec<u8>, TextureError> {
        let layout = self.palette_layout()?;
        palette::read_rgb(layout, &self.mirror[..layout.byte_len()], start, count)
    }

    /// Makes palette entry `index` transparent.  Requires a palette with alpha.
    pub fn set_key_color(&mut self, index: u8) -> Result<(), TextureError> {
        let layout = self.palette_layout()?;
        let previous = self.key_color;
        palette::apply_key_color(layout, &mut self.mirror[..layout.byte_len()], previous, index)
            .map_err(|e| self.fail("set_key_color", e))?;
        self.key_color = Some(index);
        self.tracker.mark_fully_dirty();
        Ok(())
    }

    /// Raw write access to the palette block.  Marks the buffer fully dirty.
    pub fn palette_mut(&mut self) -> Result<&mut [u8], TextureError> {
        let layout = self.palette_layout()?;
        self.tracker.mark_fully_dirty();
        Ok(&mut self.mirror[..layout.byte_len()])
    }

    pub fn palette(&self) -> Option<&[u8]> {
        self.format
            .palette
            .map(|layout| &self.mirror[..layout.byte_len()])
    }

    /// Mirrored pixel rows, [Self::pitch] bytes apart, or `None` for immediate buffers.
    pub fn pixels(&self) -> Option<&[u8]> {
        if self.mirrored {
            Some(&self.mirror[self.format.palette_len()..])
        } else {
            None
        }
    }

    /// Distance between mirrored rows.
    pub fn pitch(&self) -> usize {
        self.format.row_bytes(self.padded_width)
    }

    pub fn logical_width(&self) -> u16 {
        self.logical_width
    }

    pub fn logical_height(&self) -> u16 {
        self.logical_height
    }

    pub fn padded_width(&self) -> u32 {
        self.padded_width
    }

    pub fn padded_height(&self) -> u32 {
        self.padded_height
    }

    pub fn handle(&self) -> Option<TextureHandle> {
        self.handle
    }

    pub fn format(&self) -> &PixelFormatDescriptor {
        &self.format
    }

    pub fn sampler(&self) -> SamplerType {
        self.sampler
    }

    pub fn debug_name(&self) -> &str {
        &self.debug_name
    }

    pub fn is_dirty(&self) -> bool {
        self.tracker.is_dirty()
    }

    pub fn is_fully_dirty(&self) -> bool {
        self.tracker.is_fully_dirty()
    }

    pub fn dirty_rect(&self) -> Option<Rect> {
        self.tracker.dirty_rect()
    }

    pub fn dirty_state(&self) -> DirtyState {
        self.tracker.state()
    }

    /// Marks the whole buffer for upload on the next draw.
    pub fn mark_fully_dirty(&mut self) {
        self.tracker.mark_fully_dirty();
    }

    fn palette_layout(&self) -> Result<PaletteLayout, TextureError> {
        self.format.palette.ok_or(TextureError::NoPalette)
    }

    fn pixel_offset(&self, x: usize, y: usize) -> usize {
        self.format.palette_len() + y * self.pitch() + x * self.format.bytes_per_pixel as usize
    }

    fn mark_updated(&mut self, rect: Rect) {
        if self.format.is_paletted() {
            self.tracker.mark_fully_dirty();
        } else {
            self.tracker.mark_dirty(rect);
        }
    }

    fn fail(&self, operation: &'static str, err: TextureError) -> TextureError {
        logwise::error_sync!(
            "{operation} failed for texture {name}: {err}",
            operation = logwise::privacy::LogIt(&operation),
            name = logwise::privacy::LogIt(&self.debug_name),
            err = logwise::privacy::LogIt(&err)
        );
        err
    }

    /// Uploads pending mirror contents to the bound texture.
    fn flush(&self, ctx: &mut C, caps: &Capabilities) -> Result<(), GpuError> {
        if let Some(layout) = self.format.palette {
            if !self.tracker.is_dirty() {
                return Ok(());
            }
            if caps.compressed_paletted_supported {
                return ctx.upload_compressed(self.padded_width, self.padded_height, layout, &self.mirror);
            }
            let (block, indices) = self.mirror.split_at(layout.byte_len());
            let texels = palette::expand(layout, block, indices);
            return ctx.upload_texture(
                self.padded_width,
                self.padded_height,
                layout.entry_format,
                Some(&texels),
            );
        }

        let plan = self.tracker.plan(self.logical_width, self.logical_height);
        logwise::debuginternal_sync!(
            "Upload plan for {name}: {plan}",
            name = logwise::privacy::LogIt(&self.debug_name),
            plan = logwise::privacy::LogIt(&plan)
        );
        let rect = match plan {
            UploadPlan::Nothing => return Ok(()),
            UploadPlan::Partial(rect) => rect,
            UploadPlan::Full => Rect::full(self.logical_width, self.logical_height),
        };
        if rect.is_empty() {
            return Ok(());
        }
        let row_bytes = self.format.row_bytes(rect.width as u32);
        let mut packed = Vec::with_capacity(row_bytes * rect.height as usize);
        for row in 0..rect.height as usize {
            let start = self.pixel_offset(rect.x as usize, rect.y as usize + row);
            packed.extend_from_slice(&self.mirror[start..start + row_bytes]);
        }
        ctx.upload_subregion(
            rect.x as u32,
            rect.y as u32,
            rect.width as u32,
            rect.height as u32,
            self.format.upload,
            &packed,
        )
    }

    fn apply_parameters(
        ctx: &mut C,
        handle: TextureHandle,
        sampler: SamplerType,
        wrap: WrapMode,
    ) -> Result<(), GpuError> {
        ctx.bind_texture(handle)?;
        ctx.set_texture_parameters(sampler, wrap)
    }

    fn specify_storage(
        ctx: &mut C,
        handle: TextureHandle,
        width: u32,
        height: u32,
        format: UploadFormat,
        sampler: SamplerType,
        wrap: WrapMode,
    ) -> Result<(), GpuError> {
        Self::apply_parameters(ctx, handle, sampler, wrap)?;
        ctx.upload_texture(width, height, format, None)
    }

    fn upload_rows(
        ctx: &mut C,
        handle: TextureHandle,
        rect: Rect,
        format: UploadFormat,
        src: &[u8],
        pitch: usize,
        row_bytes: usize,
    ) -> Result<(), GpuError> {
        ctx.bind_texture(handle)?;
        let (x, y) = (rect.x as u32, rect.y as u32);
        let (width, height) = (rect.width as u32, rect.height as u32);
        if pitch == row_bytes {
            return ctx.upload_subregion(x, y, width, height, format, &src[..row_bytes * height as usize]);
        }
        let _interval = logwise::perfwarn_begin!("TextureBuffer row-by-row upload");
        for row in 0..height {
            let start = row as usize * pitch;
            ctx.upload_subregion(x, y + row, width, 1, format, &src[start..start + row_bytes])?;
        }
        Ok(())
    }
}

impl<C: GpuContext> Drop for TextureBuffer<C> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            match self.device.try_context_mut() {
                Some(mut ctx) => ctx.delete_texture(handle),
                None => logwise::warn_sync!(
                    "Context busy while dropping texture {name}; leaking its handle",
                    name = logwise::privacy::LogIt(&self.debug_name)
                ),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bindings::texture_config::CPUStrategy;
    use crate::imp::{Command, SoftwareContext};

    fn pot_device() -> Rc<BoundDevice<SoftwareContext>> {
        BoundDevice::bind(SoftwareContext::new(""))
    }

    #[test]
    fn unallocated_buffer_refuses_work() {
        let device = pot_device();
        let mut buffer = TextureBuffer::new(&device, TextureConfig::new("t", PixelFormatDescriptor::RGB565));
        assert_eq!(buffer.draw_full(), Err(TextureError::NotAllocated));
        assert_eq!(
            buffer.update_buffer(0, 0, 1, 1, &[0, 0], 2),
            Err(TextureError::NotAllocated)
        );
        buffer.release();
        assert!(device.context().journal().is_empty());
    }

    #[test]
    fn pitch_and_length_are_validated() {
        let device = pot_device();
        let mut buffer = TextureBuffer::new(&device, TextureConfig::new("t", PixelFormatDescriptor::RGB565));
        buffer.allocate(8, 8).unwrap();
        assert_eq!(
            buffer.update_buffer(0, 0, 4, 2, &[0; 16], 6),
            Err(TextureError::InvalidPitch {
                pitch: 6,
                row_bytes: 8
            })
        );
        assert_eq!(
            buffer.update_buffer(0, 0, 4, 2, &[0; 16], 10),
            Err(TextureError::SourceTooSmall {
                required: 18,
                actual: 16
            })
        );
    }

    #[test]
    fn huge_pitch_is_rejected() {
        let device = pot_device();
        let mut buffer = TextureBuffer::new(&device, TextureConfig::new("t", PixelFormatDescriptor::RGB565));
        buffer.allocate(8, 8).unwrap();
        assert_eq!(
            buffer.update_buffer(0, 0, 1, 2, &[0; 4], usize::MAX),
            Err(TextureError::SourceTooSmall {
                required: usize::MAX,
                actual: 4
            })
        );
        assert_eq!(
            buffer.update_buffer(0, 0, 1, 3, &[0; 4], usize::MAX / 2 + 1),
            Err(TextureError::SourceTooSmall {
                required: usize::MAX,
                actual: 4
            })
        );
    }

    #[test]
    fn mirrored_partial_upload() {
        let device = pot_device();
        let config = TextureConfig::new("t", PixelFormatDescriptor::RGBA8888)
            .with_cpu_strategy(CPUStrategy::Mirrored);
        let mut buffer = TextureBuffer::new(&device, config);
        buffer.allocate(16, 16).unwrap();
        buffer.draw_full().unwrap();
        assert_eq!(buffer.dirty_state(), DirtyState::Clean);
        device.context_mut().clear_journal();

        buffer.update_buffer(2, 3, 2, 1, &[7; 8], 8).unwrap();
        assert_eq!(buffer.dirty_rect(), Some(Rect::new(2, 3, 2, 1)));
        buffer.draw_full().unwrap();
        let handle = buffer.handle().unwrap();
        let uploads: Vec<_> = device
            .context()
            .journal()
            .iter()
            .filter(|c| c.is_upload())
            .cloned()
            .collect();
        assert_eq!(
            uploads,
            vec![Command::UploadSubregion {
                texture: handle,
                x: 2,
                y: 3,
                width: 2,
                height: 1
            }]
        );
        assert_eq!(
            device.context().texture(handle).unwrap().region(2, 3, 2, 1),
            vec![7; 8]
        );
    }

    #[test]
    fn clean_mirrored_draw_uploads_nothing() {
        let device = pot_device();
        let config = TextureConfig::new("t", PixelFormatDescriptor::RGB888)
            .with_cpu_strategy(CPUStrategy::Mirrored);
        let mut buffer = TextureBuffer::new(&device, config);
        buffer.allocate(4, 4).unwrap();
        buffer.draw_full().unwrap();
        device.context_mut().clear_journal();
        buffer.draw_full().unwrap();
        assert!(!device.context().journal().iter().any(Command::is_upload));
        assert_eq!(device.context().journal().iter().filter(|c| c.is_draw()).count(), 1);
    }

    #[test]
    fn sampler_change_reaches_the_texture() {
        let device = pot_device();
        let mut buffer = TextureBuffer::new(&device, TextureConfig::new("t", PixelFormatDescriptor::RGB565));
        buffer.set_sampler(SamplerType::Linear).unwrap();
        buffer.allocate(4, 4).unwrap();
        let handle = buffer.handle().unwrap();
        assert_eq!(device.context().texture(handle).unwrap().sampler, SamplerType::Linear);
        buffer.set_sampler(SamplerType::Nearest).unwrap();
        assert_eq!(device.context().texture(handle).unwrap().sampler, SamplerType::Nearest);
    }

    #[test]
    fn drop_deletes_the_texture() {
        let device = pot_device();
        {
            let mut buffer =
                TextureBuffer::new(&device, TextureConfig::new("t", PixelFormatDescriptor::RGB565));
            buffer.allocate(4, 4).unwrap();
            assert_eq!(device.context().live_texture_count(), 1);
        }
        assert_eq!(device.context().live_texture_count(), 0);
    }
}
