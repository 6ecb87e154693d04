use texture_buffers::bindings::TextureError;
use texture_buffers::bindings::coordinates::DestRect;
use texture_buffers::bindings::sampler::SamplerType;
use texture_buffers::bindings::texture_config::{CPUStrategy, TextureConfig};
use texture_buffers::images::{BoundDevice, Engine};
use texture_buffers::imp::{Command, SoftwareContext};
use texture_buffers::pixel_formats::PixelFormatDescriptor;

fn draws(device: &BoundDevice<SoftwareContext>) -> usize {
    device.context().journal().iter().filter(|c| c.is_draw()).count()
}

#[test]
fn screen_overlay_and_cursor() {
    let device = BoundDevice::bind(SoftwareContext::new(
        "GL_OES_texture_npot GL_OES_compressed_paletted_texture",
    ));
    let mut engine = Engine::new(&device);
    let screen = engine.add_layer(TextureConfig::new("game", PixelFormatDescriptor::CLUT8_RGB888));
    let overlay = engine.add_layer(
        TextureConfig::new("overlay", PixelFormatDescriptor::RGBA4444)
            .with_cpu_strategy(CPUStrategy::Mirrored),
    );
    let cursor = engine.add_layer(TextureConfig::new("cursor", PixelFormatDescriptor::CLUT8_RGBA8888));

    engine.layer_mut(screen).allocate(320, 200).unwrap();
    engine.layer_mut(overlay).allocate(640, 400).unwrap();
    engine.layer_mut(cursor).allocate(16, 16).unwrap();
    engine.layer_mut(cursor).set_key_color(0).unwrap();
    engine.set_destination(screen, Some(DestRect::new(0.0, 0.0, 640.0, 400.0)));
    engine.set_destination(cursor, Some(DestRect::new(100.0, 100.0, 16.0, 16.0)));

    let report = engine.render_frame();
    assert_eq!(report.drawn, vec![screen, overlay, cursor]);
    assert!(report.errors.is_empty());
    assert_eq!(draws(&device), 3);

    assert!(engine.render_frame().skipped);
    assert_eq!(draws(&device), 3);

    //moving the cursor redraws every visible layer, but only the cursor uploads
    device.context_mut().clear_journal();
    engine.layer_mut(cursor).update_buffer(0, 0, 1, 1, &[3], 1).unwrap();
    let report = engine.render_frame();
    assert_eq!(report.drawn.len(), 3);
    let cursor_handle = engine.layer(cursor).handle().unwrap();
    let uploads: Vec<Command> = device
        .context()
        .journal()
        .iter()
        .filter(|c| c.is_upload())
        .cloned()
        .collect();
    assert_eq!(
        uploads,
        vec![Command::UploadCompressed {
            texture: cursor_handle,
            width: 16,
            height: 16
        }]
    );
}

#[test]
fn context_loss_then_reinit() {
    let device = BoundDevice::bind(SoftwareContext::new(""));
    let mut engine = Engine::new(&device);
    let screen = engine.add_layer(
        TextureConfig::new("game", PixelFormatDescriptor::RGB888).with_cpu_strategy(CPUStrategy::Mirrored),
    );
    let cursor = engine.add_layer(TextureConfig::new("cursor", PixelFormatDescriptor::CLUT8_RGB888));
    engine.layer_mut(screen).allocate(8, 8).unwrap();
    engine.layer_mut(cursor).allocate(4, 4).unwrap();
    engine.render_frame();

    device.context_mut().lose_context();
    engine.force_redraw();
    let report = engine.render_frame();
    assert!(report.drawn.is_empty());
    assert_eq!(
        report.errors,
        vec![
            (screen, TextureError::ContextLost),
            (cursor, TextureError::ContextLost)
        ]
    );

    engine.reinit_all().unwrap();
    assert!(engine.layer(screen).is_fully_dirty());
    device.context_mut().clear_journal();
    let report = engine.render_frame();
    assert_eq!(report.drawn, vec![screen, cursor]);
    let uploads = device.context().journal().iter().filter(|c| c.is_upload()).count();
    assert_eq!(uploads, 2);
}

#[test]
fn filtering_reaches_every_layer() {
    let device = BoundDevice::bind(SoftwareContext::new(""));
    let mut engine = Engine::new(&device);
    let a = engine.add_layer(TextureConfig::new("a", PixelFormatDescriptor::RGB565));
    engine.layer_mut(a).allocate(4, 4).unwrap();
    engine.set_sampler(SamplerType::Linear).unwrap();
    let b = engine.add_layer(TextureConfig::new("b", PixelFormatDescriptor::RGB565));
    engine.layer_mut(b).allocate(4, 4).unwrap();

    let ctx = device.context();
    for id in [a, b] {
        let handle = engine.layer(id).handle().unwrap();
        assert_eq!(ctx.texture(handle).unwrap().sampler, SamplerType::Linear);
    }
}

#[test]
fn unallocated_layers_are_skipped() {
    let device = BoundDevice::bind(SoftwareContext::new(""));
    let mut engine = Engine::new(&device);
    let _overlay = engine.add_layer(TextureConfig::new("overlay", PixelFormatDescriptor::RGBA8888));
    let report = engine.render_frame();
    assert!(!report.skipped);
    assert!(report.drawn.is_empty());
    assert!(report.errors.is_empty());
}
