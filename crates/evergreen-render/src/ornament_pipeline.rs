//! Instanced mesh pipeline for ornament groups
//!
//! Each group owns one instance buffer sized for its count. Transforms are
//! composed on the host and uploaded with one `write_buffer` per group per
//! frame, followed by one instanced draw against the shared mesh.

use crate::primitives::{mesh_for, Mesh, MeshVertex};
use bytemuck::{Pod, Zeroable};
use evergreen_formation::{GeometryKind, OrnamentInstanceGpu};
use glam::{Mat4, Vec3};
use wgpu::util::DeviceExt;

/// Camera and scene transform, matching WGSL `OrnamentUniforms`. 144 bytes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct OrnamentUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub eye: [f32; 4],
}

impl OrnamentUniforms {
    pub fn new(view_proj: Mat4, model: Mat4, eye: Vec3) -> Self {
        Self {
            view_proj: view_proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            eye: eye.extend(1.0).to_array(),
        }
    }
}

/// Vertex buffer layout for [`OrnamentInstanceGpu`]: four matrix columns and a color
pub fn instance_buffer_layout() -> wgpu::VertexBufferLayout<'static> {
    const ATTRIBS: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        2 => Float32x4,
        3 => Float32x4,
        4 => Float32x4,
        5 => Float32x4,
        6 => Float32x4,
    ];
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<OrnamentInstanceGpu>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &ATTRIBS,
    }
}

/// A mesh uploaded to the GPU
pub struct GpuMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl GpuMesh {
    pub fn from_mesh(device: &wgpu::Device, mesh: &Mesh, label: &str) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });
        Self {
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
        }
    }
}

/// Instance buffer for one ornament group
pub struct OrnamentDrawCall {
    pub geometry: GeometryKind,
    pub instance_buffer: wgpu::Buffer,
    pub instance_count: u32,
}

impl OrnamentDrawCall {
    /// Upload this frame's batch; the batch length must match the group's count
    pub fn write(&self, queue: &wgpu::Queue, batch: &[OrnamentInstanceGpu]) {
        if batch.is_empty() {
            return;
        }
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(batch));
    }
}

pub struct OrnamentPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_bind_group_layout: wgpu::BindGroupLayout,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
    meshes: Vec<(GeometryKind, GpuMesh)>,
}

impl OrnamentPipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Ornament Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("ornament_shader.wgsl").into()),
        });

        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
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
                label: Some("Ornament Uniform Bind Group Layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Ornament Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout],
            push_constant_ranges: &[],
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Ornament Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_ornament"),
                buffers: &[MeshVertex::desc(), instance_buffer_layout()],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_ornament"),
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
                cull_mode: Some(wgpu::Face::Back),
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: crate::context::DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Ornament Uniform Buffer"),
            contents: bytemuck::cast_slice(&[OrnamentUniforms::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Ornament Uniform Bind Group"),
        });

        let meshes = [GeometryKind::Box, GeometryKind::Sphere]
            .into_iter()
            .filter_map(|kind| {
                let mesh = mesh_for(kind)?;
                let label = format!("Ornament {}", kind.key());
                Some((kind, GpuMesh::from_mesh(device, &mesh, &label)))
            })
            .collect();

        Self {
            pipeline,
            uniform_bind_group_layout,
            uniform_buffer,
            uniform_bind_group,
            meshes,
        }
    }

    /// Shared mesh for a geometry kind; None for point sprites
    pub fn mesh(&self, geometry: GeometryKind) -> Option<&GpuMesh> {
        self.meshes
            .iter()
            .find(|(kind, _)| *kind == geometry)
            .map(|(_, mesh)| mesh)
    }

    /// Allocate the instance buffer for a group. Returns None when there is nothing to draw.
    pub fn create_draw_call(
        &self,
        device: &wgpu::Device,
        geometry: GeometryKind,
        instance_count: usize,
    ) -> Option<OrnamentDrawCall> {
        if instance_count == 0 || !geometry.is_mesh() {
            return None;
        }
        let size = (instance_count * std::mem::size_of::<OrnamentInstanceGpu>()) as wgpu::BufferAddress;
        let instance_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("Ornament {} Instance Buffer", geometry.key())),
            size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        Some(OrnamentDrawCall {
            geometry,
            instance_buffer,
            instance_count: instance_count as u32,
        })
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &OrnamentUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    pub fn draw<'a, I>(&self, render_pass: &mut wgpu::RenderPass<'_>, draws: I)
    where
        I: IntoIterator<Item = &'a OrnamentDrawCall>,
    {
        let mut draws = draws.into_iter().peekable();
        if draws.peek().is_none() {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        for draw in draws {
            let Some(mesh) = self.mesh(draw.geometry) else {
                continue;
            };
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));
            render_pass.set_vertex_buffer(1, draw.instance_buffer.slice(..));
            render_pass.set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
            render_pass.draw_indexed(0..mesh.index_count, 0, 0..draw.instance_count);
        }
    }
}
