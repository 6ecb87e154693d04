// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
A minimal screen engine: an ordered stack of texture layers drawn each frame.

Typical layers are the game screen, an overlay and a cursor.  A frame where no
visible layer is dirty and no redraw was requested is skipped entirely.
*/
use std::rc::Rc;

use crate::bindings::coordinates::DestRect;
use crate::bindings::error::TextureError;
use crate::bindings::sampler::SamplerType;
use crate::bindings::texture_buffer::TextureBuffer;
use crate::bindings::texture_config::TextureConfig;
use crate::images::device::BoundDevice;
use crate::imp::GpuContext;

/// Index of a layer, in draw order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(usize);

#[derive(Debug)]
struct Layer<C: GpuContext> {
    texture: TextureBuffer<C>,
    visible: bool,
    /// `None` draws the logical area unscaled at the origin.
    destination: Option<DestRect>,
}

/// What happened during [Engine::render_frame].
#[derive(Debug, Default, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    /// Nothing was dirty, so nothing was drawn.
    pub skipped: bool,
    pub drawn: Vec<LayerId>,
    /// Failures stay local to their layer; the other layers are still drawn.
    pub errors: Vec<(LayerId, TextureError)>,
}

#[derive(Debug)]
pub struct Engine<C: GpuContext> {
    device: Rc<BoundDevice<C>>,
    layers: Vec<Layer<C>>,
    force_redraw: bool,
    sampler: SamplerType,
    frame: u64,
}

impl<C: GpuContext> Engine<C> {
    pub fn new(device: &Rc<BoundDevice<C>>) -> Self {
        Engine {
            device: Rc::clone(device),
            layers: Vec::new(),
            force_redraw: true,
            sampler: SamplerType::default(),
            frame: 0,
        }
    }

    pub fn bound_device(&self) -> &Rc<BoundDevice<C>> {
        &self.device
    }

    /// Adds a layer on top of the existing ones.  The engine's filtering overrides the config's.
    pub fn add_layer(&mut self, config: TextureConfig<'_>) -> LayerId {
        let config = config.with_sampler(self.sampler);
        let id = LayerId(self.layers.len());
        self.layers.push(Layer {
            texture: TextureBuffer::new(&self.device, config),
            visible: true,
            destination: None,
        });
        self.force_redraw = true;
        id
    }

    /// # Panics
    /// If `id` came from a different engine.
    pub fn layer(&self, id: LayerId) -> &TextureBuffer<C> {
        &self.layers[id.0].texture
    }

    /// # Panics
    /// If `id` came from a different engine.
    pub fn layer_mut(&mut self, id: LayerId) -> &mut TextureBuffer<C> {
        &mut self.layers[id.0].texture
    }

    pub fn set_visible(&mut self, id: LayerId, visible: bool) {
        let layer = &mut self.layers[id.0];
        if layer.visible != visible {
            layer.visible = visible;
            self.force_redraw = true;
        }
    }

    pub fn set_destination(&mut self, id: LayerId, destination: Option<DestRect>) {
        self.layers[id.0].destination = destination;
        self.force_redraw = true;
    }

    /// Draws the next frame even if nothing is dirty.
    pub fn force_redraw(&mut self) {
        self.force_redraw = true;
    }

    pub fn needs_redraw(&self) -> bool {
        self.force_redraw
            || self
                .layers
                .iter()
                .any(|layer| layer.visible && layer.texture.is_dirty())
    }

    pub fn sampler(&self) -> SamplerType {
        self.sampler
    }

    /**
    Changes filtering on every layer.

    Every layer is attempted; the first failure is returned.
    */
    pub fn set_sampler(&mut self, sampler: SamplerType) -> Result<(), TextureError> {
        self.sampler = sampler;
        self.force_redraw = true;
        let mut first_error = None;
        for layer in &mut self.layers {
            if let Err(e) = layer.texture.set_sampler(sampler) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /**
    Recreates every layer's texture after a context loss.

    Every layer is attempted; the first failure is returned.
    */
    pub fn reinit_all(&mut self) -> Result<(), TextureError> {
        logwise::warn_sync!(
            "Reinitializing {count} layers after context loss",
            count = self.layers.len()
        );
        self.force_redraw = true;
        let mut first_error = None;
        for layer in &mut self.layers {
            if let Err(e) = layer.texture.reinit() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /**
    Draws every visible, allocated layer in order, unless nothing changed.

    A frame with errors is redrawn next time.
    */
    pub fn render_frame(&mut self) -> FrameReport {
        self.frame += 1;
        let mut report = FrameReport {
            frame: self.frame,
            ..FrameReport::default()
        };
        if !self.needs_redraw() {
            logwise::trace_sync!("Skipping frame {frame}; nothing is dirty", frame = self.frame);
            report.skipped = true;
            return report;
        }
        let _interval = logwise::perfwarn_begin!("Engine::render_frame");
        for (index, layer) in self.layers.iter_mut().enumerate() {
            if !layer.visible || layer.texture.handle().is_none() {
                continue;
            }
            let id = LayerId(index);
            let result = match layer.destination {
                Some(dest) => layer.texture.draw(dest),
                None => layer.texture.draw_full(),
            };
            match result {
                Ok(()) => report.drawn.push(id),
                Err(e) => report.errors.push((id, e)),
            }
        }
        self.force_redraw = !report.errors.is_empty();
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imp::{GpuError, SoftwareContext};
    use crate::pixel_formats::PixelFormatDescriptor;

    #[test]
    fn first_frame_draws_then_skips() {
        let device = BoundDevice::bind(SoftwareContext::new("GL_OES_texture_npot"));
        let mut engine = Engine::new(&device);
        let screen = engine.add_layer(TextureConfig::new("screen", PixelFormatDescriptor::RGB565));
        engine.layer_mut(screen).allocate(8, 8).unwrap();

        let report = engine.render_frame();
        assert!(!report.skipped);
        assert_eq!(report.drawn, vec![screen]);

        let report = engine.render_frame();
        assert!(report.skipped);
        assert_eq!(report.frame, 2);
    }

    #[test]
    fn failed_layer_does_not_stop_others() {
        let device = BoundDevice::bind(SoftwareContext::new(""));
        let mut engine = Engine::new(&device);
        let a = engine.add_layer(TextureConfig::new("a", PixelFormatDescriptor::RGB565));
        let b = engine.add_layer(TextureConfig::new("b", PixelFormatDescriptor::RGB565));
        engine.layer_mut(a).allocate(4, 4).unwrap();
        engine.layer_mut(b).allocate(4, 4).unwrap();

        device.context_mut().fail_next(GpuError::OutOfMemory);
        let report = engine.render_frame();
        assert_eq!(report.drawn, vec![b]);
        assert_eq!(
            report.errors,
            vec![(a, TextureError::Rendering(GpuError::OutOfMemory))]
        );
        //retried
        assert!(engine.needs_redraw());
        let report = engine.render_frame();
        assert_eq!(report.drawn, vec![a, b]);
    }

    #[test]
    fn hidden_layers_are_skipped() {
        let device = BoundDevice::bind(SoftwareContext::new(""));
        let mut engine = Engine::new(&device);
        let cursor = engine.add_layer(TextureConfig::new("cursor", PixelFormatDescriptor::RGBA8888));
        engine.layer_mut(cursor).allocate(4, 4).unwrap();
        engine.set_visible(cursor, false);
        let report = engine.render_frame();
        assert!(!report.skipped);
        assert!(report.drawn.is_empty());
    }
}
