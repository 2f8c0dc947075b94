//! Frame recording: pipelines, per-object uniforms, and the fixed pass
//! sequence.
//!
//! One render pass per frame, always in the same order: clear, opaque
//! meshes, distance-sorted diamonds, the water quad, then the skybox at
//! maximum depth. Each stage is its own immutable pipeline, so a stage
//! can never leak blend, cull, or depth state into the next.

use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::{Camera, CameraUniform};
use crate::gpu::context::RenderContext;
use crate::gpu::mesh::{self, GpuMesh, Vertex};
use crate::gpu::texture::{self, SceneTexture};
use crate::lighting::Lighting;
use crate::scene::{self, layout, MeshSlot, SceneObject};

/// Alpha policy applied per object by the fragment shader.
///
/// Uploaded as a `u32` in the object uniform; the discriminants must
/// match the shader's `MODE_*` constants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum PassMode {
    /// Texture alpha passes through unchanged.
    Opaque = 0,
    /// Fixed 0.4 alpha for the blended diamond instances.
    CutoutTransparent = 1,
    /// Fixed 0.6 alpha for the water quad.
    WaterSurface = 2,
}

/// Per-object uniform: model matrix plus the draw mode.
#[repr(C)]
#[derive(Debug, Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
struct ObjectUniform {
    model: [[f32; 4]; 4],
    mode: u32,
    _pad: [u32; 3],
}

/// Dynamic-offset stride for object uniform slots. Matches the default
/// `min_uniform_buffer_offset_alignment`.
const OBJECT_STRIDE: u64 = 256;

/// One slot per opaque object, per diamond, plus the water quad.
const OBJECT_SLOTS: usize = 5 + layout::DIAMOND_COUNT + 1;
const WATER_SLOT: usize = OBJECT_SLOTS - 1;

/// Everything the renderer needs to record one frame.
pub struct FrameParams<'a> {
    /// Current camera state.
    pub camera: &'a Camera,
    /// The light rig, already uploaded for this frame.
    pub lighting: &'a Lighting,
    /// Loaded mesh primitives, indexed by [`MeshSlot::index`].
    pub meshes: &'a [Vec<GpuMesh>],
    /// The opaque tableau in draw order.
    pub opaque: &'a [SceneObject],
    /// Diamond instance positions (sorted internally every frame).
    pub diamonds: &'a [Vec3],
    /// Seconds since startup, drives the spin animations.
    pub elapsed: f32,
    /// Background clear color.
    pub clear_color: [f32; 3],
}

/// Owns the pipelines, uniform buffers, and static geometry, and records
/// the scene into a render pass.
pub struct FrameRenderer {
    scene_pipeline: wgpu::RenderPipeline,
    water_pipeline: wgpu::RenderPipeline,
    sky_pipeline: wgpu::RenderPipeline,

    camera_uniform: CameraUniform,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,

    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,

    material_layout: wgpu::BindGroupLayout,

    water_mesh: GpuMesh,
    sky_vertex_buffer: wgpu::Buffer,
    sky_bind_group: wgpu::BindGroup,
    // Kept alive for the duration of the sky bind group.
    _sky_texture: SceneTexture,

    depth_view: wgpu::TextureView,
}

impl FrameRenderer {
    /// Build pipelines, uniform buffers, and the static water and sky
    /// geometry.
    #[must_use]
    pub fn new(context: &RenderContext, lighting: &Lighting) -> Self {
        let device = &context.device;

        let camera_uniform = CameraUniform::new();
        let camera_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            });
        let camera_layout = device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
            },
        );
        let camera_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &camera_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: camera_buffer.as_entire_binding(),
                }],
            });

        let object_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Buffer"),
            size: OBJECT_STRIDE * OBJECT_SLOTS as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let object_layout = device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Object Layout"),
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX
                        | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: wgpu::BufferSize::new(
                            size_of::<ObjectUniform>() as u64,
                        ),
                    },
                    count: None,
                }],
            },
        );
        let object_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Object Bind Group"),
                layout: &object_layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(
                        wgpu::BufferBinding {
                            buffer: &object_buffer,
                            offset: 0,
                            size: wgpu::BufferSize::new(
                                size_of::<ObjectUniform>() as u64,
                            ),
                        },
                    ),
                }],
            });

        let material_layout = mesh::material_bind_group_layout(device);

        let scene_shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Scene Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../shaders/scene.wgsl").into(),
                ),
            });
        let sky_shader =
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some("Skybox Shader"),
                source: wgpu::ShaderSource::Wgsl(
                    include_str!("../shaders/skybox.wgsl").into(),
                ),
            });

        let scene_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Scene Pipeline Layout"),
                bind_group_layouts: &[
                    &camera_layout,
                    lighting.layout(),
                    &material_layout,
                    &object_layout,
                ],
                push_constant_ranges: &[],
            });

        let format = context.format();
        let scene_pipeline = build_scene_pipeline(
            device,
            &scene_layout,
            &scene_shader,
            format,
            "Scene Pipeline",
            // Meshes are not two-manifold (the island has open edges), so
            // backface culling punches visible holes.
            None,
            wgpu::FrontFace::Ccw,
            wgpu::CompareFunction::Less,
        );
        let water_pipeline = build_scene_pipeline(
            device,
            &scene_layout,
            &scene_shader,
            format,
            "Water Pipeline",
            Some(wgpu::Face::Back),
            // The quad's winding reads clockwise from the visible side.
            wgpu::FrontFace::Cw,
            wgpu::CompareFunction::Less,
        );

        let sky_texture = crate::assets::load_skybox(context);
        let sky_layout = device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Skybox Layout"),
                entries: &[
                    wgpu::BindGroupLayoutEntry {
                        binding: 0,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Texture {
                            sample_type: wgpu::TextureSampleType::Float {
                                filterable: true,
                            },
                            view_dimension: wgpu::TextureViewDimension::Cube,
                            multisampled: false,
                        },
                        count: None,
                    },
                    wgpu::BindGroupLayoutEntry {
                        binding: 1,
                        visibility: wgpu::ShaderStages::FRAGMENT,
                        ty: wgpu::BindingType::Sampler(
                            wgpu::SamplerBindingType::Filtering,
                        ),
                        count: None,
                    },
                ],
            },
        );
        let sky_sampler = texture::linear_sampler(device, "Skybox Sampler");
        let sky_bind_group =
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Skybox Bind Group"),
                layout: &sky_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            &sky_texture.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&sky_sampler),
                    },
                ],
            });

        let sky_pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("Skybox Pipeline Layout"),
                bind_group_layouts: &[&camera_layout, &sky_layout],
                push_constant_ranges: &[],
            });
        let sky_pipeline =
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some("Skybox Pipeline"),
                layout: Some(&sky_pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &sky_shader,
                    entry_point: Some("vs_main"),
                    buffers: &[wgpu::VertexBufferLayout {
                        array_stride: 12,
                        step_mode: wgpu::VertexStepMode::Vertex,
                        attributes: &wgpu::vertex_attr_array![0 => Float32x3],
                    }],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &sky_shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format,
                        blend: Some(wgpu::BlendState::REPLACE),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    cull_mode: None,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: texture::DEPTH_FORMAT,
                    // z = w puts the sky exactly at the far plane, so the
                    // test must pass on equality. Writes stay off.
                    depth_write_enabled: false,
                    depth_compare: wgpu::CompareFunction::LessEqual,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            });

        let sky_vertex_buffer =
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Skybox Vertices"),
                contents: bytemuck::cast_slice(&SKY_VERTICES),
                usage: wgpu::BufferUsages::VERTEX,
            });

        let (water_diffuse, water_specular) =
            crate::assets::load_water_textures(context);
        let water_mesh = GpuMesh::new(
            device,
            "Water",
            &WATER_VERTICES,
            &WATER_INDICES,
            &material_layout,
            &water_diffuse,
            &water_specular,
        );

        let depth_view = texture::create_depth_view(
            device,
            context.config.width,
            context.config.height,
        );

        Self {
            scene_pipeline,
            water_pipeline,
            sky_pipeline,
            camera_uniform,
            camera_buffer,
            camera_bind_group,
            object_buffer,
            object_bind_group,
            material_layout,
            water_mesh,
            sky_vertex_buffer,
            sky_bind_group,
            _sky_texture: sky_texture,
            depth_view,
        }
    }

    /// Layout for material bind groups; needed when uploading meshes.
    #[must_use]
    pub fn material_layout(&self) -> &wgpu::BindGroupLayout {
        &self.material_layout
    }

    /// Recreate the depth attachment after a surface resize.
    pub fn resize(&mut self, context: &RenderContext) {
        self.depth_view = texture::create_depth_view(
            &context.device,
            context.config.width,
            context.config.height,
        );
    }

    /// Upload the camera uniform for this frame.
    pub fn update_camera(
        &mut self,
        queue: &wgpu::Queue,
        camera: &Camera,
        aspect: f32,
    ) {
        self.camera_uniform.update(camera, aspect);
        queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[self.camera_uniform]),
        );
    }

    /// Record the whole scene into one render pass on `target`.
    ///
    /// `paint_overlay` is invoked at the very end of the pass, after the
    /// skybox, so overlay pixels always land on top.
    pub fn record(
        &mut self,
        context: &RenderContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        params: &FrameParams<'_>,
        paint_overlay: impl FnOnce(&mut wgpu::RenderPass<'static>),
    ) {
        // Diamonds re-sort every frame; a stale order blends near
        // instances before far ones.
        let mut diamonds = params.diamonds.to_vec();
        scene::sort_back_to_front(&mut diamonds, params.camera.position);

        self.upload_object_uniforms(
            &context.queue,
            params.opaque,
            &diamonds,
            params.elapsed,
        );

        let [r, g, b] = params.clear_color;
        let mut pass = encoder
            .begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Frame Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: target,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: f64::from(r),
                            g: f64::from(g),
                            b: f64::from(b),
                            a: 1.0,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(
                    wgpu::RenderPassDepthStencilAttachment {
                        view: &self.depth_view,
                        depth_ops: Some(wgpu::Operations {
                            load: wgpu::LoadOp::Clear(1.0),
                            store: wgpu::StoreOp::Store,
                        }),
                        stencil_ops: None,
                    },
                ),
                timestamp_writes: None,
                occlusion_query_set: None,
            })
            .forget_lifetime();

        pass.set_pipeline(&self.scene_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(1, params.lighting.bind_group(), &[]);

        // Opaque tableau in its fixed order.
        for (slot_index, object) in params.opaque.iter().enumerate() {
            self.draw_object(
                &mut pass,
                &params.meshes[object.slot.index()],
                slot_index,
            );
        }

        // Diamonds, farthest first.
        let diamond_meshes = &params.meshes[MeshSlot::Diamond.index()];
        for i in 0..diamonds.len() {
            self.draw_object(&mut pass, diamond_meshes, 5 + i);
        }

        // Water is the last blended draw before the sky.
        pass.set_pipeline(&self.water_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(1, params.lighting.bind_group(), &[]);
        self.draw_mesh(&mut pass, &self.water_mesh, WATER_SLOT);

        pass.set_pipeline(&self.sky_pipeline);
        pass.set_bind_group(0, &self.camera_bind_group, &[]);
        pass.set_bind_group(1, &self.sky_bind_group, &[]);
        pass.set_vertex_buffer(0, self.sky_vertex_buffer.slice(..));
        pass.draw(0..SKY_VERTICES.len() as u32, 0..1);

        paint_overlay(&mut pass);
    }

    /// Build and upload every object uniform slot in one buffer write.
    fn upload_object_uniforms(
        &self,
        queue: &wgpu::Queue,
        opaque: &[SceneObject],
        diamonds: &[Vec3],
        elapsed: f32,
    ) {
        let mut bytes = vec![0_u8; OBJECT_STRIDE as usize * OBJECT_SLOTS];
        let mut write = |index: usize, model: Mat4, mode: PassMode| {
            let uniform = ObjectUniform {
                model: model.to_cols_array_2d(),
                mode: mode as u32,
                _pad: [0; 3],
            };
            let start = index * OBJECT_STRIDE as usize;
            let end = start + size_of::<ObjectUniform>();
            bytes[start..end]
                .copy_from_slice(bytemuck::bytes_of(&uniform));
        };

        for (i, object) in opaque.iter().enumerate() {
            write(
                i,
                scene::model_matrix(
                    &object.placement,
                    object.spin.as_ref(),
                    elapsed,
                ),
                PassMode::Opaque,
            );
        }
        for (i, position) in diamonds.iter().enumerate() {
            let placement =
                scene::Placement::new(*position, layout::DIAMOND_SCALE);
            write(
                5 + i,
                scene::model_matrix(
                    &placement,
                    Some(&layout::DIAMOND_SPIN),
                    elapsed,
                ),
                PassMode::CutoutTransparent,
            );
        }
        write(
            WATER_SLOT,
            scene::model_matrix(&layout::water_placement(), None, elapsed),
            PassMode::WaterSurface,
        );

        queue.write_buffer(&self.object_buffer, 0, &bytes);
    }

    fn draw_object(
        &self,
        pass: &mut wgpu::RenderPass<'static>,
        primitives: &[GpuMesh],
        slot_index: usize,
    ) {
        for primitive in primitives {
            self.draw_mesh(pass, primitive, slot_index);
        }
    }

    fn draw_mesh(
        &self,
        pass: &mut wgpu::RenderPass<'static>,
        mesh: &GpuMesh,
        slot_index: usize,
    ) {
        let offset = (slot_index as u64 * OBJECT_STRIDE) as u32;
        pass.set_bind_group(2, &mesh.material, &[]);
        pass.set_bind_group(3, &self.object_bind_group, &[offset]);
        pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
        pass.set_index_buffer(
            mesh.index_buffer.slice(..),
            wgpu::IndexFormat::Uint32,
        );
        pass.draw_indexed(0..mesh.index_count, 0, 0..1);
    }
}

/// Shared builder for the scene and water pipelines; they differ only in
/// culling and winding.
#[allow(clippy::too_many_arguments)]
fn build_scene_pipeline(
    device: &wgpu::Device,
    layout: &wgpu::PipelineLayout,
    shader: &wgpu::ShaderModule,
    format: wgpu::TextureFormat,
    label: &str,
    cull_mode: Option<wgpu::Face>,
    front_face: wgpu::FrontFace,
    depth_compare: wgpu::CompareFunction,
) -> wgpu::RenderPipeline {
    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[Vertex::layout()],
            compilation_options: Default::default(),
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: Default::default(),
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            front_face,
            cull_mode,
            ..Default::default()
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: texture::DEPTH_FORMAT,
            depth_write_enabled: true,
            depth_compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview: None,
        cache: None,
    })
}

/// The water quad in object space, facing +Z before placement.
const WATER_VERTICES: [Vertex; 4] = [
    Vertex {
        position: [0.4, 0.5, 0.0],
        normal: [0.0, 0.0, 1.0],
        uv: [1.0, 1.0],
    },
    Vertex {
        position: [0.4, -0.5, 0.0],
        normal: [0.0, 0.0, 1.0],
        uv: [1.0, 0.0],
    },
    Vertex {
        position: [-0.4, -0.5, 0.0],
        normal: [0.0, 0.0, 1.0],
        uv: [0.0, 0.0],
    },
    Vertex {
        position: [-0.4, 0.5, 0.0],
        normal: [0.0, 0.0, 1.0],
        uv: [0.0, 1.0],
    },
];
const WATER_INDICES: [u32; 6] = [0, 3, 1, 1, 3, 2];

/// Unit cube as 36 non-indexed vertices for the sky pass.
const SKY_VERTICES: [[f32; 3]; 36] = [
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [1.0, -1.0, 1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_uniform_fits_its_stride() {
        assert!(
            size_of::<ObjectUniform>() as u64 <= OBJECT_STRIDE
        );
        // mat4 (64) + mode + padding to a 16-byte boundary.
        assert_eq!(size_of::<ObjectUniform>(), 80);
    }

    #[test]
    fn slot_table_covers_the_whole_tableau() {
        assert_eq!(OBJECT_SLOTS, 16);
        assert_eq!(WATER_SLOT, 15);
        assert_eq!(layout::opaque_objects().len(), 5);
    }

    #[test]
    fn water_quad_indices_reference_its_four_vertices() {
        assert!(WATER_INDICES
            .iter()
            .all(|&i| (i as usize) < WATER_VERTICES.len()));
        assert_eq!(WATER_INDICES.len(), 6);
    }

    #[test]
    fn sky_cube_has_twelve_triangles() {
        assert_eq!(SKY_VERTICES.len(), 36);
        for v in &SKY_VERTICES {
            for c in v {
                assert!(c.abs() == 1.0);
            }
        }
    }

    #[test]
    fn pass_modes_match_shader_constants() {
        assert_eq!(PassMode::Opaque as u32, 0);
        assert_eq!(PassMode::CutoutTransparent as u32, 1);
        assert_eq!(PassMode::WaterSurface as u32, 2);
    }
}
