use std::ops::Range;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::camera::OrthoCamera;
use crate::scene::Scene;
use crate::settings::SketchSettings;
use crate::shaders;
use crate::traits::SceneRenderer;
use crate::types::{FrameUniform, InstanceRaw, Vertex};

pub const MSAA_SAMPLES: u32 = 4;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Draws cube scenes to a window surface with wgpu.
///
/// All GPU state lives in one `Option` so disposal is a `take()`: the first
/// `dispose` frees everything, later calls find nothing to free.
pub struct WgpuRenderer {
    gpu: Option<GpuState>,
}

struct GpuState {
    device: wgpu::Device,
    queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    config: wgpu::SurfaceConfiguration,
    max_dimension: u32,
    sample_count: u32,
    flat_pipeline: wgpu::RenderPipeline,
    displaced_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_data: Vec<InstanceRaw>,
    depth_view: wgpu::TextureView,
    msaa_view: Option<wgpu::TextureView>,
}

impl WgpuRenderer {
    pub async fn new(window: Arc<Window>, settings: &SketchSettings, scene: &Scene) -> Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::PRIMARY,
            ..Default::default()
        });

        let surface = instance
            .create_surface(window.clone())
            .context("failed to create window surface")?;
        let adapter = Self::request_adapter(&instance, &surface).await?;
        let (device, queue) = Self::request_device(&adapter).await?;

        let config = Self::create_surface_config(&surface, &adapter, size.width, size.height)?;
        surface.configure(&device, &config);

        let sample_count = Self::choose_sample_count(&adapter, config.format, settings);
        log::info!(
            "Renderer: {} ({:?}), {:?}, {}x{}, {}x MSAA",
            adapter.get_info().name,
            adapter.get_info().backend,
            config.format,
            config.width,
            config.height,
            sample_count
        );

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Cubes Shader"),
            source: wgpu::ShaderSource::Wgsl(shaders::cubes_source().into()),
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniform Buffer"),
            size: std::mem::size_of::<FrameUniform>() as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("frame_bind_group_layout"),
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("frame_bind_group"),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Cubes Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let flat_pipeline = Self::create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            (shaders::VS_FLAT, shaders::FS_FLAT),
            config.format,
            sample_count,
        );
        let displaced_pipeline = Self::create_pipeline(
            &device,
            &pipeline_layout,
            &shader,
            (shaders::VS_DISPLACED, shaders::FS_DISPLACED),
            config.format,
            sample_count,
        );

        let geometry = scene.geometry();
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Vertex Buffer"),
            contents: bytemuck::cast_slice(&geometry.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Cube Index Buffer"),
            contents: bytemuck::cast_slice(&geometry.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = scene.len().max(1);
        let instance_buffer = Self::create_instance_buffer(&device, instance_capacity);

        let (depth_view, msaa_view) = Self::create_targets(&device, &config, sample_count);

        Ok(Self {
            gpu: Some(GpuState {
                max_dimension: device.limits().max_texture_dimension_2d,
                device,
                queue,
                surface,
                config,
                sample_count,
                flat_pipeline,
                displaced_pipeline,
                frame_buffer,
                frame_bind_group,
                vertex_buffer,
                index_buffer,
                index_count: geometry.index_count(),
                instance_buffer,
                instance_capacity,
                instance_data: Vec::with_capacity(instance_capacity),
                depth_view,
                msaa_view,
            }),
        })
    }

    async fn request_adapter(
        instance: &wgpu::Instance,
        surface: &wgpu::Surface<'_>,
    ) -> Result<wgpu::Adapter> {
        instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: Some(surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| anyhow!("failed to find an appropriate adapter: {e}"))
    }

    async fn request_device(adapter: &wgpu::Adapter) -> Result<(wgpu::Device, wgpu::Queue)> {
        adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Cubes Device"),
                required_features: wgpu::Features::empty(),
                required_limits: wgpu::Limits::default(),
                memory_hints: Default::default(),
                experimental_features: Default::default(),
                trace: Default::default(),
            })
            .await
            .map_err(|e| anyhow!("failed to create device: {e}"))
    }

    fn create_surface_config(
        surface: &wgpu::Surface,
        adapter: &wgpu::Adapter,
        width: u32,
        height: u32,
    ) -> Result<wgpu::SurfaceConfiguration> {
        let surface_caps = surface.get_capabilities(adapter);
        let surface_format = surface_caps
            .formats
            .iter()
            .copied()
            .find(|f| f.is_srgb())
            .or_else(|| surface_caps.formats.first().copied())
            .context("surface reports no supported formats")?;
        let alpha_mode = surface_caps
            .alpha_modes
            .first()
            .copied()
            .unwrap_or(wgpu::CompositeAlphaMode::Auto);

        Ok(wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format: surface_format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        })
    }

    fn choose_sample_count(
        adapter: &wgpu::Adapter,
        format: wgpu::TextureFormat,
        settings: &SketchSettings,
    ) -> u32 {
        if !settings.attributes.antialias {
            return 1;
        }
        let supported = |f: wgpu::TextureFormat| {
            adapter
                .get_texture_format_features(f)
                .flags
                .sample_count_supported(MSAA_SAMPLES)
        };
        if supported(format) && supported(DEPTH_FORMAT) {
            MSAA_SAMPLES
        } else {
            log::warn!("{}x MSAA unsupported for {:?}, rendering without antialiasing", MSAA_SAMPLES, format);
            1
        }
    }

    fn create_pipeline(
        device: &wgpu::Device,
        layout: &wgpu::PipelineLayout,
        shader: &wgpu::ShaderModule,
        (vertex_entry, fragment_entry): (&str, &str),
        format: wgpu::TextureFormat,
        sample_count: u32,
    ) -> wgpu::RenderPipeline {
        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(vertex_entry),
            layout: Some(layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some(vertex_entry),
                buffers: &[Vertex::layout(), InstanceRaw::layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some(fragment_entry),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                // Mirrored (negative scale) cubes flip winding
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        })
    }

    fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
        device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Instance Buffer"),
            size: (capacity * std::mem::size_of::<InstanceRaw>()) as wgpu::BufferAddress,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        })
    }

    fn create_targets(
        device: &wgpu::Device,
        config: &wgpu::SurfaceConfiguration,
        sample_count: u32,
    ) -> (wgpu::TextureView, Option<wgpu::TextureView>) {
        let size = wgpu::Extent3d {
            width: config.width,
            height: config.height,
            depth_or_array_layers: 1,
        };

        let depth = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size,
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        let msaa = (sample_count > 1).then(|| {
            device
                .create_texture(&wgpu::TextureDescriptor {
                    label: Some("MSAA Color Texture"),
                    size,
                    mip_level_count: 1,
                    sample_count,
                    dimension: wgpu::TextureDimension::D2,
                    format: config.format,
                    usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
                    view_formats: &[],
                })
                .create_view(&wgpu::TextureViewDescriptor::default())
        });

        (depth.create_view(&wgpu::TextureViewDescriptor::default()), msaa)
    }
}

/// Physical backing size for a viewport, clamped to what the device allows
pub fn backing_size(pixel_ratio: f32, width: u32, height: u32, max_dimension: u32) -> (u32, u32) {
    let ratio = if pixel_ratio.is_finite() && pixel_ratio > 0.0 { pixel_ratio } else { 1.0 };
    let scale = |v: u32| ((v as f32 * ratio).round() as u32).clamp(1, max_dimension.max(1));
    (scale(width), scale(height))
}

impl GpuState {
    /// Fill the instance scratch buffer, flat instances first; returns the
    /// instance ranges for the flat and displaced pipelines
    fn collect_instances(&mut self, scene: &Scene) -> (Range<u32>, Range<u32>) {
        self.instance_data.clear();

        let flat = scene.instances().iter().filter(|i| !i.material().is_displaced());
        let displaced = scene.instances().iter().filter(|i| i.material().is_displaced());

        for instance in flat.chain(displaced) {
            let material = instance.material();
            self.instance_data.push(InstanceRaw::new(
                scene.model_matrix(instance),
                material.color().to_array(),
                material.time().unwrap_or(0.0),
            ));
        }

        let flat_count = scene
            .instances()
            .iter()
            .filter(|i| !i.material().is_displaced())
            .count() as u32;
        let total = self.instance_data.len() as u32;
        (0..flat_count, flat_count..total)
    }

    fn reconfigure(&mut self) {
        self.surface.configure(&self.device, &self.config);
        let (depth_view, msaa_view) =
            WgpuRenderer::create_targets(&self.device, &self.config, self.sample_count);
        self.depth_view = depth_view;
        self.msaa_view = msaa_view;
    }
}

impl SceneRenderer for WgpuRenderer {
    fn resize(&mut self, pixel_ratio: f32, width: u32, height: u32) {
        let Some(gpu) = self.gpu.as_mut() else {
            return;
        };

        let (physical_width, physical_height) =
            backing_size(pixel_ratio, width, height, gpu.max_dimension);
        if physical_width == gpu.config.width && physical_height == gpu.config.height {
            return;
        }

        gpu.config.width = physical_width;
        gpu.config.height = physical_height;
        gpu.reconfigure();
        log::debug!("Surface resized to {}x{}", physical_width, physical_height);
    }

    fn draw(&mut self, scene: &Scene, camera: &OrthoCamera) -> Result<()> {
        let Some(gpu) = self.gpu.as_mut() else {
            bail!("draw called on a disposed renderer");
        };

        let (flat_range, displaced_range) = gpu.collect_instances(scene);
        if gpu.instance_data.len() > gpu.instance_capacity {
            gpu.instance_capacity = gpu.instance_data.len();
            gpu.instance_buffer = WgpuRenderer::create_instance_buffer(&gpu.device, gpu.instance_capacity);
        }
        gpu.queue
            .write_buffer(&gpu.instance_buffer, 0, bytemuck::cast_slice(&gpu.instance_data));
        gpu.queue.write_buffer(
            &gpu.frame_buffer,
            0,
            bytemuck::cast_slice(&[camera.to_uniform(scene)]),
        );

        let output = match gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("Surface lost or outdated, reconfiguring");
                gpu.reconfigure();
                return Ok(());
            }
            Err(wgpu::SurfaceError::OutOfMemory) => bail!("GPU out of memory"),
            Err(e) => {
                log::warn!("Skipping frame: {}", e);
                return Ok(());
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let (target, resolve_target, store) = match &gpu.msaa_view {
            Some(msaa) => (msaa, Some(&view), wgpu::StoreOp::Discard),
            None => (&view, None, wgpu::StoreOp::Store),
        };

        let mut encoder = gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Cubes Encoder"),
            });

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Cubes Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(scene.background().to_wgpu()),
                        store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &gpu.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });

            render_pass.set_bind_group(0, &gpu.frame_bind_group, &[]);
            render_pass.set_vertex_buffer(0, gpu.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, gpu.instance_buffer.slice(..));
            render_pass.set_index_buffer(gpu.index_buffer.slice(..), wgpu::IndexFormat::Uint16);

            for (pipeline, range) in [
                (&gpu.flat_pipeline, flat_range),
                (&gpu.displaced_pipeline, displaced_range),
            ] {
                if range.is_empty() {
                    continue;
                }
                render_pass.set_pipeline(pipeline);
                render_pass.draw_indexed(0..gpu.index_count, 0, range);
            }
        }

        gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    fn dispose(&mut self) {
        if let Some(gpu) = self.gpu.take() {
            gpu.device.destroy();
            log::debug!("Renderer disposed");
        }
    }

    fn is_disposed(&self) -> bool {
        self.gpu.is_none()
    }
}

impl Drop for WgpuRenderer {
    fn drop(&mut self) {
        self.dispose();
    }
}
