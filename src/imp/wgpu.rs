// SPDX-License-Identifier: Parity-7.0.0 OR PolyForm-Noncommercial-1.0.0
/*!
wgpu implementation of [GpuContext].

wgpu has no bound-texture state, no 3-byte or packed 16-bit formats and no
paletted textures, so this backend emulates GL:

* Texture names are allocated here and map to wgpu textures created on first upload.
* Every upload is expanded to RGBA8 on the CPU.
* Each call runs inside validation and out-of-memory error scopes, so wgpu errors come
  back as [GpuError] values instead of the uncaptured-error panic.
* Draws go to a render target set with [WgpuContext::set_render_target].  Positions are
  converted from target pixels to clip space here.
*/

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use wgpu::util::DeviceExt;

use crate::bindings::sampler::{SamplerType, WrapMode};
use crate::images::quad::QuadVertex;
use crate::imp::{GpuContext, GpuError, TextureHandle};
use crate::pixel_formats::{PaletteLayout, UploadFormat};

/// What the emulation can accept, in GL extension terms.
const EXTENSIONS: &str = "GL_ARB_texture_non_power_of_two GL_EXT_bgra GL_EXT_packed_pixels";

const SHADER: &str = r#"
struct VertexOut {
    @builtin(position) position: vec4<f32>,
    @location(0) tex_coord: vec2<f32>,
};

@vertex
fn vs_main(@location(0) position: vec2<f32>, @location(1) tex_coord: vec2<f32>) -> VertexOut {
    var out: VertexOut;
    out.position = vec4<f32>(position, 0.0, 1.0);
    out.tex_coord = tex_coord;
    return out;
}

@group(0) @binding(0) var quad_texture: texture_2d<f32>;
@group(0) @binding(1) var quad_sampler: sampler;

@fragment
fn fs_main(in: VertexOut) -> @location(0) vec4<f32> {
    return textureSample(quad_texture, quad_sampler, in.tex_coord);
}
"#;

#[derive(Debug)]
struct TextureRecord {
    texture: Option<wgpu::Texture>,
    width: u32,
    height: u32,
    format: Option<UploadFormat>,
    sampler: SamplerType,
    wrap: WrapMode,
}

#[derive(Debug)]
struct RenderTarget {
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

#[derive(Debug)]
pub struct WgpuContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    lost: Arc<AtomicBool>,
    max_texture_size: u32,
    textures: HashMap<TextureHandle, TextureRecord>,
    next_name: u32,
    bound: Option<TextureHandle>,
    samplers: HashMap<(SamplerType, WrapMode), wgpu::Sampler>,
    bind_group_layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
    target: Option<RenderTarget>,
}

impl WgpuContext {
    /// Wraps an existing device.  Draws will target textures of `target_format`.
    pub fn new(device: wgpu::Device, queue: wgpu::Queue, target_format: wgpu::TextureFormat) -> Self {
        let lost = Arc::new(AtomicBool::new(false));
        let move_lost = lost.clone();
        device.set_device_lost_callback(move |reason, message| {
            logwise::error_sync!(
                "wgpu device lost ({reason}): {message}",
                reason = logwise::privacy::LogIt(&reason),
                message = logwise::privacy::LogIt(&message)
            );
            move_lost.store(true, Ordering::Relaxed);
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture_buffers quad"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });
        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("texture_buffers quad"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("texture_buffers quad"),
            source: wgpu::ShaderSource::Wgsl(std::borrow::Cow::Borrowed(SHADER)),
        });
        let vertex_attributes = wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2];
        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("texture_buffers quad"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: None,
                compilation_options: Default::default(),
                buffers: &[wgpu::VertexBufferLayout {
                    array_stride: std::mem::size_of::<QuadVertex>() as wgpu::BufferAddress,
                    step_mode: wgpu::VertexStepMode::Vertex,
                    attributes: &vertex_attributes,
                }],
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: None,
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),
            multiview: None,
            cache: None,
        });

        let max_texture_size = device.limits().max_texture_dimension_2d;
        WgpuContext {
            device,
            queue,
            lost,
            max_texture_size,
            textures: HashMap::new(),
            next_name: 1,
            bound: None,
            samplers: HashMap::new(),
            bind_group_layout,
            pipeline,
            target: None,
        }
    }

    /// Picks any adapter and creates a device with no surface.
    pub fn headless(target_format: wgpu::TextureFormat) -> Result<Self, GpuError> {
        let descriptor = wgpu::InstanceDescriptor::from_env_or_default();
        let instance = wgpu::Instance::new(&descriptor);
        let options = wgpu::RequestAdapterOptions {
            power_preference: Default::default(),
            force_fallback_adapter: false,
            compatible_surface: None,
        };
        let adapter = test_executors::sleep_on(instance.request_adapter(&options))
            .map_err(|e| GpuError::Backend(e.to_string()))?;
        let mut limits = wgpu::Limits::downlevel_webgl2_defaults();
        limits.max_texture_dimension_1d = 4096;
        limits.max_texture_dimension_2d = 4096;
        let descriptor = wgpu::DeviceDescriptor {
            label: Some("texture_buffers"),
            required_features: Default::default(),
            required_limits: limits,
            memory_hints: Default::default(),
            trace: wgpu::Trace::Off,
        };
        let (device, queue) = test_executors::sleep_on(adapter.request_device(&descriptor))
            .map_err(|e| GpuError::Backend(e.to_string()))?;
        logwise::info_sync!(
            "Created headless wgpu device on {adapter}",
            adapter = logwise::privacy::LogIt(&adapter.get_info())
        );
        Ok(Self::new(device, queue, target_format))
    }

    /// Sets where subsequent draws go.  `width` x `height` is the view's size in pixels.
    pub fn set_render_target(&mut self, view: wgpu::TextureView, width: u32, height: u32) {
        self.target = Some(RenderTarget { view, width, height });
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    /// Reads a texture back as tightly packed RGBA8.
    pub fn read_texture(&self, texture: TextureHandle) -> Result<Vec<u8>, GpuError> {
        let record = self.textures.get(&texture).ok_or(GpuError::InvalidHandle(texture))?;
        let gpu_texture = record
            .texture
            .as_ref()
            .ok_or(GpuError::InvalidValue("texture has no storage"))?;
        let row = record.width * 4;
        let aligned_row = row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT) * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let buffer = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("texture_buffers readback"),
            size: aligned_row as u64 * record.height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("texture_buffers readback"),
            });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: gpu_texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &buffer,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(aligned_row),
                    rows_per_image: Some(record.height),
                },
            },
            wgpu::Extent3d {
                width: record.width,
                height: record.height,
                depth_or_array_layers: 1,
            },
        );
        self.queue.submit([encoder.finish()]);

        let (sender, receiver) = std::sync::mpsc::channel();
        buffer.slice(..).map_async(wgpu::MapMode::Read, move |result| {
            let _ = sender.send(result);
        });
        self.device
            .poll(wgpu::PollType::Wait)
            .map_err(|e| GpuError::Backend(e.to_string()))?;
        receiver
            .recv()
            .map_err(|e| GpuError::Backend(e.to_string()))?
            .map_err(|e| GpuError::Backend(e.to_string()))?;

        let mapped = buffer.slice(..).get_mapped_range();
        let mut out = Vec::with_capacity((row * record.height) as usize);
        for y in 0..record.height as usize {
            let start = y * aligned_row as usize;
            out.extend_from_slice(&mapped[start..start + row as usize]);
        }
        drop(mapped);
        buffer.unmap();
        Ok(out)
    }

    fn check_lost(&self) -> Result<(), GpuError> {
        if self.lost.load(Ordering::Relaxed) {
            Err(GpuError::ContextLost)
        } else {
            Ok(())
        }
    }

    /// Runs `f` inside error scopes and reports what wgpu captured.
    fn scoped<R>(&self, f: impl FnOnce(&wgpu::Device, &wgpu::Queue) -> R) -> Result<R, GpuError> {
        self.device.push_error_scope(wgpu::ErrorFilter::OutOfMemory);
        self.device.push_error_scope(wgpu::ErrorFilter::Validation);
        let result = f(&self.device, &self.queue);
        let validation = test_executors::sleep_on(self.device.pop_error_scope());
        let out_of_memory = test_executors::sleep_on(self.device.pop_error_scope());
        if out_of_memory.is_some() {
            return Err(GpuError::OutOfMemory);
        }
        if let Some(error) = validation {
            logwise::error_sync!(
                "wgpu validation error: {error}",
                error = logwise::privacy::LogIt(&error)
            );
            return Err(GpuError::Backend(error.to_string()));
        }
        Ok(result)
    }

    fn bound_record(&self) -> Result<(TextureHandle, &TextureRecord), GpuError> {
        let handle = self.bound.ok_or(GpuError::NoTextureBound)?;
        let record = self.textures.get(&handle).ok_or(GpuError::InvalidHandle(handle))?;
        Ok((handle, record))
    }

    fn sampler_for(&mut self, sampler: SamplerType, wrap: WrapMode) -> wgpu::Sampler {
        let device = &self.device;
        self.samplers
            .entry((sampler, wrap))
            .or_insert_with(|| {
                let filter = match sampler {
                    SamplerType::Nearest => wgpu::FilterMode::Nearest,
                    SamplerType::Linear => wgpu::FilterMode::Linear,
                };
                let address_mode = match wrap {
                    WrapMode::ClampToEdge => wgpu::AddressMode::ClampToEdge,
                    WrapMode::Repeat => wgpu::AddressMode::Repeat,
                };
                device.create_sampler(&wgpu::SamplerDescriptor {
                    label: Some("texture_buffers sampler"),
                    address_mode_u: address_mode,
                    address_mode_v: address_mode,
                    address_mode_w: address_mode,
                    mag_filter: filter,
                    min_filter: filter,
                    mipmap_filter: wgpu::FilterMode::Nearest,
                    lod_min_clamp: 0.0,
                    lod_max_clamp: 0.0,
                    compare: None,
                    anisotropy_clamp: 1,
                    border_color: None,
                })
            })
            .clone()
    }

    fn write_region(
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        rgba: &[u8],
    ) {
        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture,
                mip_level: 0,
                origin: wgpu::Origin3d { x, y, z: 0 },
                aspect: wgpu::TextureAspect::All,
            },
            rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: Some(height),
            },
            wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
        );
    }

    /// Submits one draw of `vertices` (already in clip space) with the bound texture.
    fn draw_vertices(&mut self, vertices: &[QuadVertex; 4]) -> Result<(), GpuError> {
        let (handle, record) = self.bound_record()?;
        let gpu_texture = record
            .texture
            .as_ref()
            .ok_or(GpuError::InvalidValue("texture has no storage"))?
            .clone();
        let (sampler, wrap) = (record.sampler, record.wrap);
        let sampler = self.sampler_for(sampler, wrap);
        let target = self
            .target
            .as_ref()
            .ok_or(GpuError::InvalidValue("no render target"))?;

        let mut bytes = Vec::with_capacity(std::mem::size_of::<[QuadVertex; 4]>());
        for vertex in vertices {
            for value in vertex.position.iter().chain(vertex.tex_coord.iter()) {
                bytes.extend_from_slice(&value.to_ne_bytes());
            }
        }
        let view = gpu_texture.create_view(&wgpu::TextureViewDescriptor::default());
        self.scoped(|device, queue| {
            let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("texture_buffers quad"),
                contents: &bytes,
                usage: wgpu::BufferUsages::VERTEX,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("texture_buffers quad"),
                layout: &self.bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sampler),
                    },
                ],
            });
            let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("texture_buffers quad"),
            });
            {
                let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("texture_buffers quad"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &target.view,
                        depth_slice: None,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
                pass.set_pipeline(&self.pipeline);
                pass.set_bind_group(0, &bind_group, &[]);
                pass.set_vertex_buffer(0, vertex_buffer.slice(..));
                pass.draw(0..4, 0..1);
            }
            queue.submit([encoder.finish()]);
        })?;
        logwise::trace_sync!("Drew texture {handle}", handle = handle.get());
        Ok(())
    }
}

impl GpuContext for WgpuContext {
    fn extensions(&self) -> &str {
        EXTENSIONS
    }

    fn max_texture_size(&self) -> u32 {
        self.max_texture_size
    }

    fn create_texture(&mut self) -> Result<TextureHandle, GpuError> {
        self.check_lost()?;
        let handle = TextureHandle::new(self.next_name).ok_or(GpuError::OutOfMemory)?;
        self.next_name = self.next_name.checked_add(1).ok_or(GpuError::OutOfMemory)?;
        self.textures.insert(
            handle,
            TextureRecord {
                texture: None,
                width: 0,
                height: 0,
                format: None,
                sampler: SamplerType::default(),
                wrap: WrapMode::default(),
            },
        );
        Ok(handle)
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        if let Some(record) = self.textures.remove(&texture) {
            if let Some(gpu_texture) = record.texture {
                gpu_texture.destroy();
            }
            if self.bound == Some(texture) {
                self.bound = None;
            }
        }
    }

    fn bind_texture(&mut self, texture: TextureHandle) -> Result<(), GpuError> {
        self.check_lost()?;
        if !self.textures.contains_key(&texture) {
            return Err(GpuError::InvalidHandle(texture));
        }
        self.bound = Some(texture);
        Ok(())
    }

    fn set_texture_parameters(&mut self, sampler: SamplerType, wrap: WrapMode) -> Result<(), GpuError> {
        self.check_lost()?;
        let handle = self.bound.ok_or(GpuError::NoTextureBound)?;
        let record = self
            .textures
            .get_mut(&handle)
            .ok_or(GpuError::InvalidHandle(handle))?;
        record.sampler = sampler;
        record.wrap = wrap;
        Ok(())
    }

    fn upload_texture(
        &mut self,
        width: u32,
        height: u32,
        format: UploadFormat,
        data: Option<&[u8]>,
    ) -> Result<(), GpuError> {
        self.check_lost()?;
        if width == 0 || height == 0 || width > self.max_texture_size || height > self.max_texture_size {
            return Err(GpuError::InvalidDimensions { width, height });
        }
        let (handle, _) = self.bound_record()?;
        let rgba = match data {
            Some(data) => {
                if data.len() != width as usize * height as usize * format.bytes_per_texel() as usize {
                    return Err(GpuError::InvalidValue("data length"));
                }
                Some(
                    format
                        .expand_to_rgba8(data)
                        .ok_or(GpuError::Unsupported("upload format"))?,
                )
            }
            None => None,
        };
        let gpu_texture = self.scoped(|device, queue| {
            let gpu_texture = device.create_texture(&wgpu::TextureDescriptor {
                label: Some("texture_buffers texture"),
                size: wgpu::Extent3d {
                    width,
                    height,
                    depth_or_array_layers: 1,
                },
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING
                    | wgpu::TextureUsages::COPY_DST
                    | wgpu::TextureUsages::COPY_SRC,
                view_formats: &[],
            });
            if let Some(rgba) = &rgba {
                Self::write_region(queue, &gpu_texture, 0, 0, width, height, rgba);
            }
            gpu_texture
        })?;
        if let Some(record) = self.textures.get_mut(&handle) {
            if let Some(old) = record.texture.replace(gpu_texture) {
                old.destroy();
            }
            record.width = width;
            record.height = height;
            record.format = Some(format);
        }
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
        self.check_lost()?;
        let (_, record) = self.bound_record()?;
        if record.format != Some(format) {
            return Err(GpuError::InvalidValue("format does not match texture storage"));
        }
        if x as u64 + width as u64 > record.width as u64 || y as u64 + height as u64 > record.height as u64 {
            return Err(GpuError::InvalidValue("subregion outside texture"));
        }
        if data.len() != width as usize * height as usize * format.bytes_per_texel() as usize {
            return Err(GpuError::InvalidValue("data length"));
        }
        let gpu_texture = record
            .texture
            .as_ref()
            .ok_or(GpuError::InvalidValue("texture has no storage"))?;
        let rgba = format
            .expand_to_rgba8(data)
            .ok_or(GpuError::Unsupported("upload format"))?;
        self.scoped(|_, queue| Self::write_region(queue, gpu_texture, x, y, width, height, &rgba))
    }

    fn upload_compressed(
        &mut self,
        _width: u32,
        _height: u32,
        _palette: PaletteLayout,
        _data: &[u8],
    ) -> Result<(), GpuError> {
        Err(GpuError::Unsupported("compressed paletted textures"))
    }

    fn draw_triangle_strip(&mut self, vertices: &[QuadVertex; 4]) -> Result<(), GpuError> {
        self.check_lost()?;
        let target = self
            .target
            .as_ref()
            .ok_or(GpuError::InvalidValue("no render target"))?;
        let (width, height) = (target.width.max(1) as f32, target.height.max(1) as f32);
        let clip = vertices.map(|vertex| QuadVertex {
            position: [
                vertex.position[0] / width * 2.0 - 1.0,
                1.0 - vertex.position[1] / height * 2.0,
            ],
            tex_coord: vertex.tex_coord,
        });
        self.draw_vertices(&clip)
    }
}
