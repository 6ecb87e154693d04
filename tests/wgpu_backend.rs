#![cfg(feature = "backend_wgpu")]

use texture_buffers::bindings::TextureBuffer;
use texture_buffers::bindings::texture_config::{CPUStrategy, TextureConfig};
use texture_buffers::images::BoundDevice;
use texture_buffers::imp::WgpuContext;
use texture_buffers::pixel_formats::PixelFormatDescriptor;

fn context() -> Option<WgpuContext> {
    match WgpuContext::headless(wgpu::TextureFormat::Rgba8Unorm) {
        Ok(context) => Some(context),
        Err(e) => {
            println!("=== Skipping wgpu test: {e} ===");
            None
        }
    }
}

#[test]
fn rgb565_uploads_expand_to_rgba() {
    let Some(context) = context() else {
        return;
    };
    let device = BoundDevice::bind(context);
    assert!(device.capabilities().npot_supported);
    let mut screen = TextureBuffer::new(&device, TextureConfig::new("screen", PixelFormatDescriptor::RGB565));
    screen.allocate(3, 2).unwrap();
    assert_eq!((screen.padded_width(), screen.padded_height()), (3, 2));

    let red = 0xF800u16.to_ne_bytes();
    let blue = 0x001Fu16.to_ne_bytes();
    let mut row = Vec::new();
    for px in [red, blue, red] {
        row.extend_from_slice(&px);
    }
    //wide pitch takes the row-by-row path
    let mut src = row.clone();
    src.extend_from_slice(&[0, 0]);
    src.extend_from_slice(&row);
    screen.update_buffer(0, 0, 3, 2, &src, row.len() + 2).unwrap();

    let texels = device
        .context()
        .read_texture(screen.handle().unwrap())
        .unwrap();
    let expected_row = [255, 0, 0, 255, 0, 0, 255, 255, 255, 0, 0, 255];
    assert_eq!(&texels[..12], &expected_row);
    assert_eq!(&texels[12..], &expected_row);
}

#[test]
fn palette_draws_into_a_target() {
    let Some(context) = context() else {
        return;
    };
    let target = context.device().create_texture(&wgpu::TextureDescriptor {
        label: Some("target"),
        size: wgpu::Extent3d {
            width: 8,
            height: 8,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: wgpu::TextureFormat::Rgba8Unorm,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    let view = target.create_view(&wgpu::TextureViewDescriptor::default());
    let device = BoundDevice::bind(context);
    device.context_mut().set_render_target(view, 8, 8);

    let config = TextureConfig::new("screen", PixelFormatDescriptor::CLUT8_RGB888);
    let mut screen = TextureBuffer::new(&device, config);
    screen.allocate(4, 4).unwrap();
    screen.set_palette(1, &[0, 255, 0]).unwrap();
    screen.fill_buffer(1).unwrap();
    screen.draw_full().unwrap();
    assert!(!screen.is_dirty());

    let texels = device
        .context()
        .read_texture(screen.handle().unwrap())
        .unwrap();
    assert_eq!(&texels[..4], &[0, 255, 0, 255]);

    let config = TextureConfig::new("overlay", PixelFormatDescriptor::RGBA8888)
        .with_cpu_strategy(CPUStrategy::Mirrored);
    let mut overlay = TextureBuffer::new(&device, config);
    overlay.allocate(8, 8).unwrap();
    overlay.fill_buffer(0x80).unwrap();
    overlay.draw_full().unwrap();
}
