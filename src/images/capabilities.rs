// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
Capability discovery for a GPU context.

The context is queried exactly once, when a [crate::images::BoundDevice] is bound.
The resulting [Capabilities] value is then read (never written) by every texture
created on that device.
*/

use crate::imp::GpuContext;

/// Fallback maximum texture size when the context reports none.
///
/// This is the minimum every GLES 2 implementation must support.
pub const MIN_MAX_TEXTURE_SIZE: u32 = 2048;

/**
Feature flags and limits of a GPU context.

# Examples

```
use texture_buffers::images::capabilities::Capabilities;

let caps = Capabilities::from_extensions("GL_OES_texture_npot GL_OES_draw_texture", 4096);
assert!(caps.npot_supported);
assert!(caps.draw_texture_supported);
assert!(!caps.compressed_paletted_supported);
```
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    /// Textures may have non-power-of-two dimensions.
    pub npot_supported: bool,
    /// The context can draw a cropped texture directly to the screen, without a quad.
    pub draw_texture_supported: bool,
    pub bgra_supported: bool,
    pub packed_pixels_supported: bool,
    /// Palette + indices can be uploaded together as a compressed texture.
    pub compressed_paletted_supported: bool,
    pub max_texture_size: u32,
}

impl Default for Capabilities {
    /// The most conservative context: power-of-two only, nothing optional.
    fn default() -> Self {
        Capabilities {
            npot_supported: false,
            draw_texture_supported: false,
            bgra_supported: false,
            packed_pixels_supported: false,
            compressed_paletted_supported: false,
            max_texture_size: MIN_MAX_TEXTURE_SIZE,
        }
    }
}

impl Capabilities {
    /// Parses a space-separated extension string.
    pub fn from_extensions(extensions: &str, max_texture_size: u32) -> Self {
        let mut caps = Capabilities {
            max_texture_size: if max_texture_size == 0 {
                MIN_MAX_TEXTURE_SIZE
            } else {
                max_texture_size
            },
            ..Capabilities::default()
        };
        for token in extensions.split_ascii_whitespace() {
            match token {
                "GL_ARB_texture_non_power_of_two"
                | "GL_OES_texture_npot"
                | "GL_APPLE_texture_2D_limited_npot" => caps.npot_supported = true,
                "GL_OES_draw_texture" => caps.draw_texture_supported = true,
                "GL_EXT_bgra"
                | "GL_EXT_texture_format_BGRA8888"
                | "GL_APPLE_texture_format_BGRA8888" => caps.bgra_supported = true,
                "GL_EXT_packed_pixels" => caps.packed_pixels_supported = true,
                "GL_OES_compressed_paletted_texture" => {
                    caps.compressed_paletted_supported = true
                }
                _ => {}
            }
        }
        caps
    }

    /// Queries the context.
    pub fn detect<C: GpuContext + ?Sized>(context: &C) -> Self {
        let caps = Self::from_extensions(context.extensions(), context.max_texture_size());
        logwise::info_sync!(
            "Detected GPU capabilities {caps}",
            caps = logwise::privacy::LogIt(&caps)
        );
        caps
    }
}
