//! wgpu backend implementation.
//!
//! One render pipeline per plane kind (integer / float), both built from
//! the same WGSL source. Bindings: planes 0..=2, LUT texture 3, LUT
//! sampler 4, uniforms 5.

use std::sync::Arc;

use lutview_core::{PLANE_COUNT, PlaneSize};
use lutview_lut::ColorCube;
use tracing::{debug, trace};
use wgpu::util::DeviceExt;

use super::RenderBackend;
use crate::format::{FrameUpload, PlaneFormat, ShaderParams};
use crate::shaders;
use crate::{GpuContext, GpuError, GpuResult};

const LUT_BINDING: u32 = 3;
const LUT_SAMPLER_BINDING: u32 = 4;
const PARAMS_BINDING: u32 = 5;

// =============================================================================
// Textures
// =============================================================================

struct PlaneTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    size: PlaneSize,
    format: PlaneFormat,
}

impl PlaneTexture {
    fn new(device: &wgpu::Device, index: usize, size: PlaneSize, format: PlaneFormat) -> Self {
        let label = format!("plane{index}");
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(&label),
            size: extent_2d(size),
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: format.texture_format(),
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        Self {
            texture,
            view,
            size,
            format,
        }
    }
}

struct LutTexture {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    resolution: u32,
}

impl LutTexture {
    fn new(device: &wgpu::Device, resolution: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("lut3d"),
            size: wgpu::Extent3d {
                width: resolution,
                height: resolution,
                depth_or_array_layers: resolution,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D3,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        Self {
            texture,
            view,
            resolution,
        }
    }
}

// =============================================================================
// Resource set
// =============================================================================

struct Pipeline {
    layout: wgpu::BindGroupLayout,
    pipeline: wgpu::RenderPipeline,
}

struct Resources {
    integer: Pipeline,
    float: Pipeline,
    planes: [PlaneTexture; PLANE_COUNT],
    lut: LutTexture,
    lut_sampler: wgpu::Sampler,
    params: wgpu::Buffer,
    /// Rebuilt lazily after any texture reallocation.
    bind_group: Option<wgpu::BindGroup>,
}

impl Resources {
    fn float_planes(&self) -> bool {
        self.planes[0].format.is_float()
    }

    fn active(&self) -> &Pipeline {
        if self.float_planes() {
            &self.float
        } else {
            &self.integer
        }
    }
}

// =============================================================================
// WgpuBackend
// =============================================================================

/// wgpu implementation of [`RenderBackend`].
///
/// Draws into any texture view of the color format given at construction.
/// LUT output is already display-encoded, so the target should be a
/// non-sRGB format.
pub struct WgpuBackend {
    ctx: Arc<GpuContext>,
    target_format: wgpu::TextureFormat,
    resources: Option<Resources>,
}

impl WgpuBackend {
    pub fn new(ctx: Arc<GpuContext>, target_format: wgpu::TextureFormat) -> Self {
        Self {
            ctx,
            target_format,
            resources: None,
        }
    }

    pub fn context(&self) -> &Arc<GpuContext> {
        &self.ctx
    }

    fn create_pipeline(&self, float_planes: bool) -> Pipeline {
        let device = &self.ctx.device;
        let (label, sample_type) = if float_planes {
            ("preview_float", wgpu::TextureSampleType::Float { filterable: false })
        } else {
            ("preview_integer", wgpu::TextureSampleType::Uint)
        };

        let plane_entry = |binding: u32| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::FRAGMENT,
            ty: wgpu::BindingType::Texture {
                sample_type,
                view_dimension: wgpu::TextureViewDimension::D2,
                multisampled: false,
            },
            count: None,
        };

        let layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(label),
            entries: &[
                plane_entry(0),
                plane_entry(1),
                plane_entry(2),
                wgpu::BindGroupLayoutEntry {
                    binding: LUT_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D3,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: LUT_SAMPLER_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: PARAMS_BINDING,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
            ],
        });

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shaders::preview_source(float_planes).into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &[&layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: self.target_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            multiview: None,
            cache: None,
        });

        Pipeline { layout, pipeline }
    }

    fn resources_mut(&mut self) -> GpuResult<&mut Resources> {
        self.resources.as_mut().ok_or(GpuError::ResourcesMissing)
    }

    fn check_2d(&self, size: PlaneSize) -> GpuResult<()> {
        let limit = self.ctx.limits().max_texture_dimension_2d;
        if size.width > limit || size.height > limit {
            return Err(GpuError::TextureTooLarge {
                width: size.width,
                height: size.height,
                depth: 1,
                limit,
            });
        }
        Ok(())
    }
}

impl RenderBackend for WgpuBackend {
    type Target = wgpu::TextureView;

    fn name(&self) -> &'static str {
        "wgpu"
    }

    fn create_resources(&mut self) -> GpuResult<()> {
        if self.resources.is_some() {
            return Ok(());
        }
        let device = &self.ctx.device;

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let integer = self.create_pipeline(false);
        let float = self.create_pipeline(true);
        if let Some(err) = pollster::block_on(device.pop_error_scope()) {
            return Err(GpuError::ShaderCompilation(err.to_string()));
        }

        // 1x1 placeholders until the first frame; the LUT slot is seeded
        // by the surface.
        let placeholder = PlaneSize::new(1, 1);
        let planes = [0, 1, 2].map(|i| PlaneTexture::new(device, i, placeholder, PlaneFormat::U8));
        let lut = LutTexture::new(device, 2);

        let lut_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("lut_sampler"),
            address_mode_u: wgpu::AddressMode::ClampToEdge,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let params = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("params_uniform"),
            contents: bytemuck::bytes_of(&ShaderParams::default()),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        debug!(device = self.ctx.device_name(), format = ?self.target_format, "created GPU resources");
        self.resources = Some(Resources {
            integer,
            float,
            planes,
            lut,
            lut_sampler,
            params,
            bind_group: None,
        });
        Ok(())
    }

    fn upload_planes(&mut self, frame: &FrameUpload<'_>) -> GpuResult<()> {
        for plane in &frame.planes {
            self.check_2d(plane.size)?;
        }
        let ctx = Arc::clone(&self.ctx);
        let res = self.resources_mut()?;

        for (i, plane) in frame.planes.iter().enumerate() {
            let slot = &mut res.planes[i];
            if slot.size != plane.size || slot.format != plane.format {
                trace!(plane = i, size = ?plane.size, format = ?plane.format, "reallocating plane texture");
                *slot = PlaneTexture::new(&ctx.device, i, plane.size, plane.format);
                res.bind_group = None;
            }

            ctx.queue.write_texture(
                wgpu::TexelCopyTextureInfo {
                    texture: &slot.texture,
                    mip_level: 0,
                    origin: wgpu::Origin3d::ZERO,
                    aspect: wgpu::TextureAspect::All,
                },
                plane.data,
                wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(plane.bytes_per_row()),
                    rows_per_image: Some(plane.size.height),
                },
                extent_2d(plane.size),
            );
        }

        ctx.queue
            .write_buffer(&res.params, 0, bytemuck::bytes_of(&frame.params));
        Ok(())
    }

    fn upload_lut(&mut self, cube: &ColorCube) -> GpuResult<()> {
        let limit = self.ctx.limits().max_texture_dimension_3d;
        let n = u32::try_from(cube.resolution()).unwrap_or(u32::MAX);
        if n > limit {
            return Err(GpuError::TextureTooLarge {
                width: n,
                height: n,
                depth: n,
                limit,
            });
        }

        let ctx = Arc::clone(&self.ctx);
        let res = self.resources_mut()?;
        if res.lut.resolution != n {
            res.lut = LutTexture::new(&ctx.device, n);
            res.bind_group = None;
        }

        // No 3-channel 8-bit texture format; pad to RGBA.
        let rgba: Vec<u8> = cube
            .as_bytes()
            .chunks_exact(3)
            .flat_map(|rgb| [rgb[0], rgb[1], rgb[2], 255])
            .collect();

        ctx.queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &res.lut.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &rgba,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(n * 4),
                rows_per_image: Some(n),
            },
            wgpu::Extent3d {
                width: n,
                height: n,
                depth_or_array_layers: n,
            },
        );
        Ok(())
    }

    fn draw(&mut self, target: &wgpu::TextureView) -> GpuResult<()> {
        let ctx = Arc::clone(&self.ctx);
        let res = self.resources_mut()?;

        if res.bind_group.is_none() {
            let active = res.active();
            let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("preview_bind_group"),
                layout: &active.layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&res.planes[0].view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(&res.planes[1].view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(&res.planes[2].view),
                    },
                    wgpu::BindGroupEntry {
                        binding: LUT_BINDING,
                        resource: wgpu::BindingResource::TextureView(&res.lut.view),
                    },
                    wgpu::BindGroupEntry {
                        binding: LUT_SAMPLER_BINDING,
                        resource: wgpu::BindingResource::Sampler(&res.lut_sampler),
                    },
                    wgpu::BindGroupEntry {
                        binding: PARAMS_BINDING,
                        resource: res.params.as_entire_binding(),
                    },
                ],
            });
            res.bind_group = Some(bind_group);
        }
        let bind_group = res.bind_group.as_ref().ok_or(GpuError::ResourcesMissing)?;

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("preview_encoder"),
            });
        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("preview_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            pass.set_pipeline(&res.active().pipeline);
            pass.set_bind_group(0, bind_group, &[]);
            pass.draw(0..4, 0..1);
        }
        ctx.queue.submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn release(&mut self) {
        if self.resources.take().is_some() {
            debug!("released GPU resources");
        }
    }
}

// =============================================================================
// Offscreen target
// =============================================================================

/// Headless render target with CPU readback.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    /// Color format of offscreen targets.
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub fn new(ctx: &GpuContext, width: u32, height: u32) -> Self {
        let texture = ctx.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("offscreen_target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&Default::default());
        Self {
            texture,
            view,
            width,
            height,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Copies the target back as tightly packed RGBA8 rows.
    pub fn read_rgba(&self, ctx: &GpuContext) -> GpuResult<Vec<u8>> {
        let row = self.width * 4;
        // Buffer copies need 256-byte aligned rows.
        let padded_row = row.div_ceil(wgpu::COPY_BYTES_PER_ROW_ALIGNMENT)
            * wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
        let size = padded_row as u64 * self.height as u64;

        let staging = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("readback_buffer"),
            size,
            usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
            mapped_at_creation: false,
        });

        let mut encoder = ctx.device.create_command_encoder(&Default::default());
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded_row),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        ctx.submit_and_wait(encoder);

        let slice = staging.slice(..);
        let (tx, rx) = std::sync::mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });
        ctx.device.poll(wgpu::Maintain::Wait);

        rx.recv()
            .map_err(|_| GpuError::Readback("map channel closed".into()))?
            .map_err(|e| GpuError::Readback(format!("map failed: {e}")))?;

        let mapped = slice.get_mapped_range();
        let mut pixels = Vec::with_capacity((row * self.height) as usize);
        for chunk in mapped.chunks(padded_row as usize) {
            pixels.extend_from_slice(&chunk[..row as usize]);
        }
        drop(mapped);
        staging.unmap();

        Ok(pixels)
    }
}

fn extent_2d(size: PlaneSize) -> wgpu::Extent3d {
    wgpu::Extent3d {
        width: size.width,
        height: size.height,
        depth_or_array_layers: 1,
    }
}
