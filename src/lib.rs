/*! texture_buffers manages GPU textures that mirror a software-rendered frame buffer.

A game renders its frames on the CPU at whatever resolution it likes.  Getting
those pixels on screen efficiently needs a few things that every GL backend ends
up writing for itself:

| Concern              | What this crate does                                                               |
|----------------------|------------------------------------------------------------------------------------|
| Texture dimensions   | Pads to the next power of two unless the context supports NPOT textures            |
| Partial updates      | Accepts any source pitch; falls back to row-by-row uploads when the pitch is wide   |
| Redundant uploads    | Tracks one dirty bounding box per texture and uploads only that, or nothing        |
| Palette-indexed data | Keeps palette and indices together and uploads them as one compressed texture      |
| Drawing              | Emits a textured quad whose coordinates stop at the logical/padded ratio           |
| Context loss         | Recreates textures on request and re-uploads mirrored contents on the next draw    |

# Quick start

```
use texture_buffers::bindings::TextureBuffer;
use texture_buffers::bindings::texture_config::TextureConfig;
use texture_buffers::images::BoundDevice;
use texture_buffers::imp::SoftwareContext;
use texture_buffers::pixel_formats::PixelFormatDescriptor;

let device = BoundDevice::bind(SoftwareContext::new(""));
let mut screen = TextureBuffer::new(&device, TextureConfig::new("screen", PixelFormatDescriptor::RGB565));
screen.allocate(320, 200).unwrap();
assert_eq!((screen.padded_width(), screen.padded_height()), (512, 256));

let row = vec![0u8; 320 * 2];
screen.update_buffer(0, 0, 320, 1, &row, row.len()).unwrap();
screen.draw_full().unwrap();
```

# Layout

* [bindings] holds the texture buffer and the types it is configured and addressed with.
* [images] holds the device, capability discovery, quad geometry and a layered [images::Engine].
* [imp] is the boundary to a graphics API, with a software backend and an optional
  wgpu backend (feature `backend_wgpu`).
* [pixel_formats] describes source pixels and how they are uploaded.

# Logging

Logging goes through [logwise](https://docs.rs/logwise).  Enable the
`logwise_internal` feature for per-call debug output.
*/

logwise::declare_logging_domain!();

pub mod bindings;
mod bittricks;
pub mod images;
pub mod imp;
pub mod pixel_formats;

pub use bittricks::{FIXED_ONE, MAX_FIXED_DIMENSION, next_higher_2, padded_dimension};
