//! GPU point-sprite pipeline for the foliage layer
//!
//! Attributes live in a storage buffer written once at upload. Each frame
//! writes a single uniform (camera, time, progress) and issues one instanced
//! draw of camera-facing quads. Blending is additive with depth writes off.

use bytemuck::{Pod, Zeroable};
use evergreen_formation::{modulation_prelude, FoliageAttributes, FoliageFrame, ModulationProfile};
use glam::Mat4;
use wgpu::util::DeviceExt;

/// Per-frame uniforms for the foliage layer, matching WGSL `FoliageUniforms`.
/// 224 bytes: three matrices, a viewport vec4 and the frame block.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct FoliageUniforms {
    pub view: [[f32; 4]; 4],
    pub proj: [[f32; 4]; 4],
    pub model: [[f32; 4]; 4],
    pub viewport: [f32; 4], // xy = target size in pixels
    pub frame: FoliageFrame,
}

impl FoliageUniforms {
    pub fn new(view: Mat4, proj: Mat4, model: Mat4, viewport: [f32; 2], frame: FoliageFrame) -> Self {
        Self {
            view: view.to_cols_array_2d(),
            proj: proj.to_cols_array_2d(),
            model: model.to_cols_array_2d(),
            viewport: [viewport[0].max(1.0), viewport[1].max(1.0), 0.0, 0.0],
            frame,
        }
    }
}

/// Full WGSL source for a profile: modulation prelude followed by the sprite shader
pub fn foliage_shader_source(profile: &ModulationProfile) -> String {
    let mut source = modulation_prelude(profile);
    source.push('\n');
    source.push_str(include_str!("foliage_shader.wgsl"));
    source
}

/// Storage buffer and bind group for one uploaded foliage set
pub struct FoliageDrawCall {
    pub attribute_buffer: wgpu::Buffer,
    pub attribute_bind_group: wgpu::BindGroup,
    pub instance_count: u32,
}

pub struct FoliagePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub uniform_bind_group_layout: wgpu::BindGroupLayout,
    pub attribute_bind_group_layout: wgpu::BindGroupLayout,
    pub quad_index_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    pub uniform_bind_group: wgpu::BindGroup,
}

impl FoliagePipeline {
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, profile: &ModulationProfile) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Foliage Shader"),
            source: wgpu::ShaderSource::Wgsl(foliage_shader_source(profile).into()),
        });

        // Group 0: FoliageUniforms
        let uniform_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Foliage Uniform Bind Group Layout"),
            });

        // Group 1: static attributes (read-only storage)
        let attribute_bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                entries: &[wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                }],
                label: Some("Foliage Attribute Bind Group Layout"),
            });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Foliage Pipeline Layout"),
            bind_group_layouts: &[&uniform_bind_group_layout, &attribute_bind_group_layout],
            push_constant_ranges: &[],
        });

        let additive_blend = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("Foliage Additive Pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_foliage"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_foliage"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: Some(additive_blend),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            // Depth tested against ornaments, never written
            depth_stencil: Some(wgpu::DepthStencilState {
                format: crate::context::DEPTH_FORMAT,
                depth_write_enabled: false,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        let quad_indices: [u32; 6] = [0, 1, 2, 2, 1, 3];
        let quad_index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Foliage Quad Index Buffer"),
            contents: bytemuck::cast_slice(&quad_indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let uniform_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Foliage Uniform Buffer"),
            contents: bytemuck::cast_slice(&[FoliageUniforms::zeroed()]),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let uniform_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &uniform_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
            label: Some("Foliage Uniform Bind Group"),
        });

        Self {
            pipeline,
            uniform_bind_group_layout,
            attribute_bind_group_layout,
            quad_index_buffer,
            uniform_buffer,
            uniform_bind_group,
        }
    }

    /// Upload static attributes once. Returns None for an empty set.
    pub fn upload(&self, device: &wgpu::Device, attributes: &[FoliageAttributes]) -> Option<FoliageDrawCall> {
        if attributes.is_empty() {
            return None;
        }

        let attribute_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Foliage Attribute Buffer"),
            contents: bytemuck::cast_slice(attributes),
            usage: wgpu::BufferUsages::STORAGE,
        });

        let attribute_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &self.attribute_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: attribute_buffer.as_entire_binding(),
            }],
            label: Some("Foliage Attribute Bind Group"),
        });

        Some(FoliageDrawCall {
            attribute_buffer,
            attribute_bind_group,
            instance_count: attributes.len() as u32,
        })
    }

    pub fn write_uniforms(&self, queue: &wgpu::Queue, uniforms: &FoliageUniforms) {
        queue.write_buffer(&self.uniform_buffer, 0, bytemuck::cast_slice(&[*uniforms]));
    }

    pub fn draw(&self, render_pass: &mut wgpu::RenderPass<'_>, draw: &FoliageDrawCall) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_index_buffer(self.quad_index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        render_pass.set_bind_group(0, &self.uniform_bind_group, &[]);
        render_pass.set_bind_group(1, &draw.attribute_bind_group, &[]);
        render_pass.draw_indexed(0..6, 0, 0..draw.instance_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_layout_matches_wgsl() {
        assert_eq!(std::mem::size_of::<FoliageUniforms>(), 224);
        assert_eq!(std::mem::offset_of!(FoliageUniforms, viewport), 192);
        assert_eq!(std::mem::offset_of!(FoliageUniforms, frame), 208);
    }

    #[test]
    fn uniforms_carry_frame_and_guard_viewport() {
        let frame = FoliageFrame {
            time: 3.0,
            progress: 0.5,
            base_size: 0.15,
            _pad: 0.0,
        };
        let uniforms = FoliageUniforms::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY, [0.0, 720.0], frame);
        assert_eq!(uniforms.viewport, [1.0, 720.0, 0.0, 0.0]);
        assert_eq!(uniforms.frame, frame);
        assert_eq!(uniforms.model[3], [0.0, 0.0, 0.0, 1.0]);
    }
}
