// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
//! Construction-time configuration for texture buffers.
//!
//! # Examples
//!
//! ```
//! use texture_buffers::bindings::texture_config::{CPUStrategy, TextureConfig};
//! use texture_buffers::bindings::sampler::SamplerType;
//! use texture_buffers::pixel_formats::PixelFormatDescriptor;
//!
//! let config = TextureConfig::new("game_screen", PixelFormatDescriptor::RGB565)
//!     .with_sampler(SamplerType::Linear)
//!     .with_cpu_strategy(CPUStrategy::Mirrored);
//! assert_eq!(config.debug_name, "game_screen");
//! ```

use crate::bindings::sampler::{SamplerType, WrapMode};
use crate::pixel_formats::PixelFormatDescriptor;

/// Describes where pixel updates live between `update_buffer` and the GPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CPUStrategy {
    /// Every update is uploaded immediately.  No CPU copy is kept.
    ///
    /// Content does not survive a context loss; the owner must resupply it.
    #[default]
    Immediate,
    /// Updates are written to a CPU mirror and uploaded at draw time.
    ///
    /// Palette-indexed formats always behave this way.
    Mirrored,
}

#[derive(Debug, Clone, Copy)]
pub struct TextureConfig<'a> {
    /// Name used in log output.
    pub debug_name: &'a str,
    pub format: PixelFormatDescriptor,
    pub sampler: SamplerType,
    pub wrap: WrapMode,
    pub cpu_strategy: CPUStrategy,
}

impl<'a> TextureConfig<'a> {
    pub fn new(debug_name: &'a str, format: PixelFormatDescriptor) -> Self {
        TextureConfig {
            debug_name,
            format,
            sampler: SamplerType::default(),
            wrap: WrapMode::default(),
            cpu_strategy: CPUStrategy::default(),
        }
    }

    pub fn with_sampler(mut self, sampler: SamplerType) -> Self {
        self.sampler = sampler;
        self
    }

    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }

    pub fn with_cpu_strategy(mut self, cpu_strategy: CPUStrategy) -> Self {
        self.cpu_strategy = cpu_strategy;
        self
    }

    /// Whether textures built from this config keep a CPU mirror.
    pub fn is_mirrored(&self) -> bool {
        self.format.is_paletted() || self.cpu_strategy == CPUStrategy::Mirrored
    }
}
