//! wgpu implementation of [`SceneBackend`], shared by the web and native hosts.
//!
//! Spheres are drawn instanced from one UV sphere mesh, rebuilt from the
//! cells on every paint; opaque ones first, translucent ones last without
//! depth writes. Each line owns a vertex buffer holding its ribbon, which
//! is destroyed and recreated whenever its geometry is replaced.

use fnv::FnvHashMap;
use glam::Vec3;
use wgpu::util::DeviceExt;

use crate::constants::{AMBIENT_LIGHT, SPHERE_EDGES};
use crate::error::CubeError;
use crate::mesh::{ribbon_into, uv_sphere};
use crate::scene::{FrameView, LineDesc, LineGeometry, PrimitiveId, SceneBackend, SphereDesc};

const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct Globals {
    view_proj: [[f32; 4]; 4],
    light_dir: [f32; 4],
    ambient: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct SphereInstance {
    center: [f32; 3],
    radius: f32,
    color: [f32; 4],
}

#[repr(C)]
#[derive(Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
struct LineVertex {
    pos: [f32; 3],
    color: [f32; 4],
}

struct LineSlot {
    color: Vec3,
    buffer: Option<wgpu::Buffer>,
    vertex_count: u32,
}

enum Primitive {
    Sphere,
    Line(LineSlot),
}

pub struct GpuScene<'w> {
    surface: wgpu::Surface<'w>,
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,

    globals_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    sphere_opaque: wgpu::RenderPipeline,
    sphere_translucent: wgpu::RenderPipeline,
    line_pipeline: wgpu::RenderPipeline,

    sphere_vb: wgpu::Buffer,
    sphere_ib: wgpu::Buffer,
    sphere_index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,

    primitives: FnvHashMap<PrimitiveId, Primitive>,
    next_id: u32,
    // scratch reused every paint / geometry swap
    instances: Vec<SphereInstance>,
    ribbon: Vec<Vec3>,
    alpha_modes: Vec<wgpu::CompositeAlphaMode>,
    transparent: bool,
}

impl<'w> GpuScene<'w> {
    /// Set up device, pipelines and sphere mesh for `surface`.
    ///
    /// Fails with [`CubeError::RenderingUnsupported`] when no adapter can
    /// drive the surface.
    pub async fn new(
        instance: &wgpu::Instance,
        surface: wgpu::Surface<'w>,
        width: u32,
        height: u32,
        background: Option<u32>,
    ) -> Result<Self, CubeError> {
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .ok_or(CubeError::RenderingUnsupported)?;
        let (device, queue) = adapter
            .request_device(
                &wgpu::DeviceDescriptor {
                    required_features: wgpu::Features::empty(),
                    required_limits: wgpu::Limits::default(),
                    memory_hints: wgpu::MemoryHints::Performance,
                    label: None,
                },
                None,
            )
            .await
            .map_err(|e| CubeError::Gpu(format!("request_device error: {e}")))?;

        let caps = surface.get_capabilities(&adapter);
        // colors are already display-space, so skip the sRGB encode
        let format = caps
            .formats
            .iter()
            .copied()
            .find(|f| !f.is_srgb())
            .or_else(|| caps.formats.first().copied())
            .ok_or(CubeError::RenderingUnsupported)?;
        let transparent = background.is_none();
        let alpha_mode = pick_alpha_mode(&caps.alpha_modes, transparent);
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: width.max(1),
            height: height.max(1),
            present_mode: wgpu::PresentMode::Fifo,
            alpha_mode,
            view_formats: vec![],
            desired_maximum_frame_latency: 2,
        };
        surface.configure(&device, &config);
        let depth_view = create_depth_view(&device, config.width, config.height);

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("scene_shader"),
            source: wgpu::ShaderSource::Wgsl(crate::SCENE_WGSL.into()),
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("globals"),
            size: std::mem::size_of::<Globals>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("globals_bgl"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("globals_bg"),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("scene_pl"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let sphere_opaque = make_sphere_pipeline(&device, &layout, &shader, format, true, None);
        let sphere_translucent = make_sphere_pipeline(
            &device,
            &layout,
            &shader,
            format,
            false,
            Some(wgpu::BlendState::ALPHA_BLENDING),
        );
        let line_pipeline = make_line_pipeline(&device, &layout, &shader, format);

        let (unit_sphere, indices) = uv_sphere(SPHERE_EDGES);
        let unit_sphere: Vec<[f32; 3]> = unit_sphere.iter().map(|v| v.to_array()).collect();
        let sphere_vb = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_vb"),
            contents: bytemuck::cast_slice(&unit_sphere),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let sphere_ib = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("sphere_ib"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        let instance_capacity = 64;
        let instance_buffer = create_instance_buffer(&device, instance_capacity);

        log::info!(
            "[gpu] adapter={} format={:?} alpha={:?}",
            adapter.get_info().name,
            format,
            alpha_mode
        );

        Ok(Self {
            surface,
            device,
            queue,
            config,
            depth_view,
            globals_buffer,
            bind_group,
            sphere_opaque,
            sphere_translucent,
            line_pipeline,
            sphere_vb,
            sphere_ib,
            sphere_index_count: indices.len() as u32,
            instance_buffer,
            instance_capacity,
            primitives: FnvHashMap::default(),
            next_id: 0,
            instances: Vec::new(),
            alpha_modes: caps.alpha_modes,
            transparent,
            ribbon: Vec::new(),
        })
    }

    fn allocate_id(&mut self) -> PrimitiveId {
        let id = PrimitiveId(self.next_id);
        self.next_id += 1;
        id
    }

    fn upload_ribbon(&mut self, color: Vec3, geometry: &LineGeometry<'_>) -> (wgpu::Buffer, u32) {
        ribbon_into(geometry.points, geometry.half_width, geometry.eye, &mut self.ribbon);
        let color = color.extend(1.0).to_array();
        let vertices: Vec<LineVertex> = self
            .ribbon
            .iter()
            .map(|p| LineVertex {
                pos: p.to_array(),
                color,
            })
            .collect();
        let buffer = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("line_vb"),
                contents: bytemuck::cast_slice(&vertices),
                usage: wgpu::BufferUsages::VERTEX,
            });
        (buffer, vertices.len() as u32)
    }

    /// Build instance data for every live sphere, opaque ones first.
    /// Returns how many are opaque.
    fn collect_instances(&mut self, view: &FrameView<'_>) -> usize {
        self.instances.clear();
        let live = |id: &PrimitiveId| matches!(self.primitives.get(id), Some(Primitive::Sphere));
        let pack = |cell: &crate::grid::GridCell| SphereInstance {
            center: cell.position.to_array(),
            radius: view.sphere_radius * cell.scale,
            color: cell.color.extend(cell.opacity).to_array(),
        };
        self.instances.extend(
            view.cells
                .iter()
                .filter(|c| !c.transparent && live(&c.primitive))
                .map(pack),
        );
        let opaque = self.instances.len();
        self.instances.extend(
            view.cells
                .iter()
                .filter(|c| c.transparent && live(&c.primitive))
                .map(pack),
        );
        opaque
    }
}

impl SceneBackend for GpuScene<'_> {
    fn add_sphere(&mut self, _desc: &SphereDesc) -> PrimitiveId {
        // position, radius and color are read from the cells on every paint
        let id = self.allocate_id();
        self.primitives.insert(id, Primitive::Sphere);
        id
    }

    fn add_line(&mut self, desc: &LineDesc<'_>) -> PrimitiveId {
        let id = self.allocate_id();
        let (buffer, vertex_count) = self.upload_ribbon(desc.color, &desc.geometry);
        self.primitives.insert(
            id,
            Primitive::Line(LineSlot {
                color: desc.color,
                buffer: Some(buffer),
                vertex_count,
            }),
        );
        id
    }

    fn release_line_geometry(&mut self, id: PrimitiveId) {
        if let Some(Primitive::Line(slot)) = self.primitives.get_mut(&id) {
            if let Some(buffer) = slot.buffer.take() {
                buffer.destroy();
            }
            slot.vertex_count = 0;
        }
    }

    fn set_line_geometry(&mut self, id: PrimitiveId, geometry: &LineGeometry<'_>) {
        let color = match self.primitives.get(&id) {
            Some(Primitive::Line(slot)) => slot.color,
            _ => return,
        };
        let (buffer, vertex_count) = self.upload_ribbon(color, geometry);
        if let Some(Primitive::Line(slot)) = self.primitives.get_mut(&id) {
            slot.buffer = Some(buffer);
            slot.vertex_count = vertex_count;
        }
    }

    fn remove(&mut self, id: PrimitiveId) {
        if let Some(Primitive::Line(slot)) = self.primitives.remove(&id) {
            if let Some(buffer) = slot.buffer {
                buffer.destroy();
            }
        }
    }

    fn clear(&mut self) {
        self.instances.clear();
    }

    fn render(&mut self, view: &FrameView<'_>) -> Result<(), CubeError> {
        let frame = match self.surface.get_current_texture() {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.surface.configure(&self.device, &self.config);
                return Ok(());
            }
            Err(e) => return Err(CubeError::Gpu(e.to_string())),
        };
        let target = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let clear = clear_color(view.background);
        let transparent = view.background.is_none();
        if transparent != self.transparent {
            self.transparent = transparent;
            self.config.alpha_mode = pick_alpha_mode(&self.alpha_modes, transparent);
            self.surface.configure(&self.device, &self.config);
            log::info!("[gpu] alpha={:?}", self.config.alpha_mode);
        }

        let camera = view.camera;
        let globals = Globals {
            view_proj: camera.view_projection().to_cols_array_2d(),
            light_dir: (camera.target - camera.eye)
                .normalize_or_zero()
                .extend(0.0)
                .to_array(),
            ambient: [AMBIENT_LIGHT, 0.0, 0.0, 0.0],
        };
        self.queue
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let opaque = self.collect_instances(view) as u32;
        let total = self.instances.len();
        if total > self.instance_capacity {
            self.instance_capacity = total.next_power_of_two();
            self.instance_buffer.destroy();
            self.instance_buffer = create_instance_buffer(&self.device, self.instance_capacity);
        }
        self.queue
            .write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&self.instances));

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("encoder"),
            });
        {
            let mut rpass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("scene_pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(clear),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });
            rpass.set_bind_group(0, &self.bind_group, &[]);

            rpass.set_pipeline(&self.sphere_opaque);
            rpass.set_vertex_buffer(0, self.sphere_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            rpass.set_index_buffer(self.sphere_ib.slice(..), wgpu::IndexFormat::Uint32);
            rpass.draw_indexed(0..self.sphere_index_count, 0, 0..opaque);

            rpass.set_pipeline(&self.line_pipeline);
            for primitive in self.primitives.values() {
                if let Primitive::Line(LineSlot {
                    buffer: Some(buffer),
                    vertex_count,
                    ..
                }) = primitive
                {
                    if *vertex_count > 0 {
                        rpass.set_vertex_buffer(0, buffer.slice(..));
                        rpass.draw(0..*vertex_count, 0..1);
                    }
                }
            }

            rpass.set_pipeline(&self.sphere_translucent);
            rpass.set_vertex_buffer(0, self.sphere_vb.slice(..));
            rpass.set_vertex_buffer(1, self.instance_buffer.slice(..));
            rpass.draw_indexed(0..self.sphere_index_count, 0, opaque..total as u32);
        }
        self.queue.submit(Some(encoder.finish()));
        frame.present();
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        if width != self.config.width || height != self.config.height {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
            self.depth_view = create_depth_view(&self.device, width, height);
        }
    }
}

/// Compositing mode for the surface: premultiplied when the scene paints on
/// a transparent background and the surface allows it, otherwise the
/// surface's preferred (opaque) mode.
pub fn pick_alpha_mode(
    supported: &[wgpu::CompositeAlphaMode],
    transparent: bool,
) -> wgpu::CompositeAlphaMode {
    let premultiplied = wgpu::CompositeAlphaMode::PreMultiplied;
    if transparent && supported.contains(&premultiplied) {
        return premultiplied;
    }
    supported
        .iter()
        .copied()
        .find(|m| *m != premultiplied)
        .unwrap_or(wgpu::CompositeAlphaMode::Auto)
}

fn clear_color(background: Option<Vec3>) -> wgpu::Color {
    match background {
        Some(rgb) => wgpu::Color {
            r: rgb.x as f64,
            g: rgb.y as f64,
            b: rgb.z as f64,
            a: 1.0,
        },
        None => wgpu::Color::TRANSPARENT,
    }
}

fn create_depth_view(device: &wgpu::Device, width: u32, height: u32) -> wgpu::TextureView {
    let tex = device.create_texture(&wgpu::TextureDescriptor {
        label: Some("depth"),
        size: wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        },
        mip_level_count: 1,
        sample_count: 1,
        dimension: wgpu::TextureDimension::D2,
        format: DEPTH_FORMAT,
        usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
        view_formats: &[],
    });
    tex.create_view(&wgpu::TextureViewDescriptor::default())
}

fn create_instance_buffer(device: &wgpu::Device, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("sphere_instances"),
        size: (std::mem::size_of::<SphereInstance>() * capacity) as u64,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

const SPHERE_VERTEX_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const SPHERE_INSTANCE_ATTRS: [wgpu::VertexAttribute; 3] =
    wgpu::vertex_attr_array![1 => Float32x3, 2 => Float32, 3 => Float32x4];
const LINE_ATTRS: [wgpu::VertexAttribute; 2] =
    wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x4];

fn make_sphere_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    depth_write: bool,
    blend: Option<wgpu::BlendState>,
) -> wgpu::RenderPipeline {
    let buffers = [
        // slot 0: unit sphere positions
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &SPHERE_VERTEX_ATTRS,
        },
        // slot 1: per-cell instance data
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SphereInstance>() as u64,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &SPHERE_INSTANCE_ATTRS,
        },
    ];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(if depth_write {
            "sphere_opaque"
        } else {
            "sphere_translucent"
        }),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_sphere"),
            buffers: &buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(depth_state(depth_write)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_sphere"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend,
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

fn make_line_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
) -> wgpu::RenderPipeline {
    let buffers = [wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<LineVertex>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &LINE_ATTRS,
    }];
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some("line_pipeline"),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_line"),
            buffers: &buffers,
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState::default(),
        depth_stencil: Some(depth_state(true)),
        multisample: wgpu::MultisampleState::default(),
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_line"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        cache: None,
        multiview: None,
    })
}

fn depth_state(write: bool) -> wgpu::DepthStencilState {
    wgpu::DepthStencilState {
        format: DEPTH_FORMAT,
        depth_write_enabled: write,
        depth_compare: wgpu::CompareFunction::Less,
        stencil: wgpu::StencilState::default(),
        bias: wgpu::DepthBiasState::default(),
    }
}
