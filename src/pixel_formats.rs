// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Pixel format descriptors for texture buffers.
//!
//! A texture buffer is constructed once with a [`PixelFormatDescriptor`] that
//! matches whatever the pixel source will always supply. The descriptor encodes:
//!
//! - Bytes per source pixel
//! - The format/type pair the GPU accepts for uploads ([`UploadFormat`])
//! - An optional [`PaletteLayout`] for palette-indexed formats
//!
//! Formats differ only in constants, never in behavior, so they are plain
//! values and a single texture type reads them at runtime.
//!
//! # Available Formats
//!
//! ## Direct color
//! - [`PixelFormatDescriptor::RGBA8888`] - 4 bytes, `RGBA`/`UNSIGNED_BYTE`
//! - [`PixelFormatDescriptor::BGRA8888`] - 4 bytes, `BGRA`/`UNSIGNED_BYTE`
//! - [`PixelFormatDescriptor::RGB888`] - 3 bytes, `RGB`/`UNSIGNED_BYTE`
//! - [`PixelFormatDescriptor::RGB565`] - 2 bytes, `RGB`/`UNSIGNED_SHORT_5_6_5`
//! - [`PixelFormatDescriptor::RGBA4444`] - 2 bytes, `RGBA`/`UNSIGNED_SHORT_4_4_4_4`
//! - [`PixelFormatDescriptor::RGBA5551`] - 2 bytes, `RGBA`/`UNSIGNED_SHORT_5_5_5_1`
//!
//! ## Palette-indexed
//! - [`PixelFormatDescriptor::CLUT8_RGB888`] - 1 byte index, 256 x RGB palette
//! - [`PixelFormatDescriptor::CLUT8_RGBA8888`] - 1 byte index, 256 x RGBA palette
//!
//! # Examples
//!
//! ```
//! use texture_buffers::pixel_formats::PixelFormatDescriptor;
//!
//! let format = PixelFormatDescriptor::RGB565;
//! assert_eq!(format.row_bytes(320), 640);
//! assert!(!format.is_paletted());
//!
//! let clut = PixelFormatDescriptor::CLUT8_RGBA8888;
//! // palette block is stored in front of the pixels
//! assert_eq!(clut.mirror_len(4, 4), 256 * 4 + 16);
//! ```

use crate::images::capabilities::Capabilities;

/// Channel layout half of an upload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlFormat {
    Rgb,
    Rgba,
    Bgra,
    Alpha,
    Luminance,
}

/// Component type half of an upload format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlType {
    UnsignedByte,
    UnsignedShort565,
    UnsignedShort4444,
    UnsignedShort5551,
}

/// The format/type pair handed to the GPU on upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UploadFormat {
    pub format: GlFormat,
    pub ty: GlType,
}

impl UploadFormat {
    pub const RGBA8: UploadFormat = UploadFormat {
        format: GlFormat::Rgba,
        ty: GlType::UnsignedByte,
    };
    pub const RGB8: UploadFormat = UploadFormat {
        format: GlFormat::Rgb,
        ty: GlType::UnsignedByte,
    };

    /// Size of one texel as the GPU reads it.
    pub const fn bytes_per_texel(&self) -> u8 {
        match self.ty {
            GlType::UnsignedByte => match self.format {
                GlFormat::Rgb => 3,
                GlFormat::Rgba | GlFormat::Bgra => 4,
                GlFormat::Alpha | GlFormat::Luminance => 1,
            },
            GlType::UnsignedShort565 | GlType::UnsignedShort4444 | GlType::UnsignedShort5551 => 2,
        }
    }

    /**
    Converts tightly packed texels of this format into RGBA8.

    Backends without a native equivalent (3-byte or packed 16-bit formats) go
    through this. Returns `None` for format/type pairs the GPU would reject.
    */
    pub fn expand_to_rgba8(&self, data: &[u8]) -> Option<Vec<u8>> {
        let bpt = self.bytes_per_texel() as usize;
        let mut out = Vec::with_capacity(data.len() / bpt * 4);
        match (self.format, self.ty) {
            (GlFormat::Rgba, GlType::UnsignedByte) => out.extend_from_slice(data),
            (GlFormat::Bgra, GlType::UnsignedByte) => {
                for px in data.chunks_exact(4) {
                    out.extend_from_slice(&[px[2], px[1], px[0], px[3]]);
                }
            }
            (GlFormat::Rgb, GlType::UnsignedByte) => {
                for px in data.chunks_exact(3) {
                    out.extend_from_slice(&[px[0], px[1], px[2], 0xFF]);
                }
            }
            (GlFormat::Alpha, GlType::UnsignedByte) => {
                for a in data {
                    out.extend_from_slice(&[0, 0, 0, *a]);
                }
            }
            (GlFormat::Luminance, GlType::UnsignedByte) => {
                for l in data {
                    out.extend_from_slice(&[*l, *l, *l, 0xFF]);
                }
            }
            (GlFormat::Rgb, GlType::UnsignedShort565) => {
                for px in data.chunks_exact(2) {
                    let v = u16::from_ne_bytes([px[0], px[1]]);
                    out.extend_from_slice(&[
                        scale_5((v >> 11) & 0x1F),
                        scale_6((v >> 5) & 0x3F),
                        scale_5(v & 0x1F),
                        0xFF,
                    ]);
                }
            }
            (GlFormat::Rgba, GlType::UnsignedShort4444) => {
                for px in data.chunks_exact(2) {
                    let v = u16::from_ne_bytes([px[0], px[1]]);
                    out.extend_from_slice(&[
                        ((v >> 12) & 0xF) as u8 * 17,
                        ((v >> 8) & 0xF) as u8 * 17,
                        ((v >> 4) & 0xF) as u8 * 17,
                        (v & 0xF) as u8 * 17,
                    ]);
                }
            }
            (GlFormat::Rgba, GlType::UnsignedShort5551) => {
                for px in data.chunks_exact(2) {
                    let v = u16::from_ne_bytes([px[0], px[1]]);
                    out.extend_from_slice(&[
                        scale_5((v >> 11) & 0x1F),
                        scale_5((v >> 6) & 0x1F),
                        scale_5((v >> 1) & 0x1F),
                        if v & 1 == 1 { 0xFF } else { 0 },
                    ]);
                }
            }
            _ => return None,
        }
        Some(out)
    }
}

#[inline]
fn scale_5(v: u16) -> u8 {
    ((v << 3) | (v >> 2)) as u8
}

#[inline]
fn scale_6(v: u16) -> u8 {
    ((v << 2) | (v >> 4)) as u8
}

/// Shape of the palette block that prefixes palette-indexed pixel data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteLayout {
    /// Number of palette entries (256 for 8-bit indices).
    pub entries: u16,
    /// Format of one palette entry.
    pub entry_format: UploadFormat,
}

impl PaletteLayout {
    pub const RGB888_256: PaletteLayout = PaletteLayout {
        entries: 256,
        entry_format: UploadFormat::RGB8,
    };
    pub const RGBA8888_256: PaletteLayout = PaletteLayout {
        entries: 256,
        entry_format: UploadFormat::RGBA8,
    };

    pub const fn bytes_per_entry(&self) -> usize {
        self.entry_format.bytes_per_texel() as usize
    }

    /// Size in bytes of the whole palette block.
    pub const fn byte_len(&self) -> usize {
        self.entries as usize * self.bytes_per_entry()
    }

    pub const fn has_alpha(&self) -> bool {
        self.bytes_per_entry() == 4
    }
}

/**
Everything a texture buffer needs to know about its source pixels.

Construct one of the associated constants or use [`PixelFormatDescriptor::from_channels`].
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PixelFormatDescriptor {
    pub bytes_per_pixel: u8,
    /// For paletted formats this is the format of the expanded texels.
    pub upload: UploadFormat,
    pub palette: Option<PaletteLayout>,
}

impl PixelFormatDescriptor {
    pub const RGBA8888: PixelFormatDescriptor = PixelFormatDescriptor::direct(UploadFormat::RGBA8);
    pub const BGRA8888: PixelFormatDescriptor = PixelFormatDescriptor::direct(UploadFormat {
        format: GlFormat::Bgra,
        ty: GlType::UnsignedByte,
    });
    pub const RGB888: PixelFormatDescriptor = PixelFormatDescriptor::direct(UploadFormat::RGB8);
    pub const RGB565: PixelFormatDescriptor = PixelFormatDescriptor::direct(UploadFormat {
        format: GlFormat::Rgb,
        ty: GlType::UnsignedShort565,
    });
    pub const RGBA4444: PixelFormatDescriptor = PixelFormatDescriptor::direct(UploadFormat {
        format: GlFormat::Rgba,
        ty: GlType::UnsignedShort4444,
    });
    pub const RGBA5551: PixelFormatDescriptor = PixelFormatDescriptor::direct(UploadFormat {
        format: GlFormat::Rgba,
        ty: GlType::UnsignedShort5551,
    });
    pub const CLUT8_RGB888: PixelFormatDescriptor =
        PixelFormatDescriptor::paletted(PaletteLayout::RGB888_256);
    pub const CLUT8_RGBA8888: PixelFormatDescriptor =
        PixelFormatDescriptor::paletted(PaletteLayout::RGBA8888_256);

    const fn direct(upload: UploadFormat) -> Self {
        PixelFormatDescriptor {
            bytes_per_pixel: upload.bytes_per_texel(),
            upload,
            palette: None,
        }
    }

    const fn paletted(palette: PaletteLayout) -> Self {
        PixelFormatDescriptor {
            bytes_per_pixel: 1,
            upload: palette.entry_format,
            palette: Some(palette),
        }
    }

    pub const fn is_paletted(&self) -> bool {
        self.palette.is_some()
    }

    /// Tightly packed length of one row of `width` pixels.
    #[inline]
    pub const fn row_bytes(&self, width: u32) -> usize {
        width as usize * self.bytes_per_pixel as usize
    }

    /// Bytes of palette stored ahead of the pixel payload.
    #[inline]
    pub const fn palette_len(&self) -> usize {
        match self.palette {
            Some(p) => p.byte_len(),
            None => 0,
        }
    }

    /// Size of a CPU mirror for a `width` x `height` padded texture, palette included.
    #[inline]
    pub const fn mirror_len(&self, width: u32, height: u32) -> usize {
        self.palette_len() + self.row_bytes(width) * height as usize
    }

    /**
    Picks the descriptor for a source channel layout, or `None` if the context
    cannot accept it directly.
    */
    pub fn from_channels(layout: ChannelLayout, capabilities: &Capabilities) -> Option<Self> {
        let ChannelLayout {
            bytes_per_pixel,
            bits,
            order,
        } = layout;
        match (bytes_per_pixel, bits, order) {
            (1, _, _) => Some(Self::CLUT8_RGB888),
            (4, [8, 8, 8, 8], ChannelOrder::Rgba) => Some(Self::RGBA8888),
            (3, [8, 8, 8, 0], ChannelOrder::Rgba) => Some(Self::RGB888),
            (4, [8, 8, 8, 8], ChannelOrder::Bgra) if capabilities.bgra_supported => {
                Some(Self::BGRA8888)
            }
            _ if !capabilities.packed_pixels_supported => None,
            (2, [5, 6, 5, 0], ChannelOrder::Rgba) => Some(Self::RGB565),
            (2, [5, 5, 5, 1], ChannelOrder::Rgba) => Some(Self::RGBA5551),
            (2, [4, 4, 4, 4], ChannelOrder::Rgba) => Some(Self::RGBA4444),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelOrder {
    Rgba,
    Bgra,
}

/// Source pixel layout as a frame buffer describes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelLayout {
    pub bytes_per_pixel: u8,
    /// Bits of r, g, b, a.
    pub bits: [u8; 4],
    pub order: ChannelOrder,
}
