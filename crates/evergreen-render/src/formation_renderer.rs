//! Renders a [`FormationSystem`]: opaque ornaments first, then additive foliage

use crate::camera::OrbitCamera;
use crate::foliage_pipeline::{FoliageDrawCall, FoliagePipeline, FoliageUniforms};
use crate::ornament_pipeline::{OrnamentDrawCall, OrnamentPipeline, OrnamentUniforms};
use evergreen_formation::{FormationSystem, ModulationProfile};

/// Near-black green background (#000502), linear; both channels sit on the sRGB linear toe
pub const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 5.0 / 255.0 / 12.92,
    b: 2.0 / 255.0 / 12.92,
    a: 1.0,
};

pub struct FormationRenderer {
    foliage_pipeline: FoliagePipeline,
    foliage_draw: Option<FoliageDrawCall>,
    ornament_pipeline: OrnamentPipeline,
    /// Parallel to `FormationSystem::ornaments()`; None for empty groups
    ornament_draws: Vec<Option<OrnamentDrawCall>>,
}

impl FormationRenderer {
    /// Build pipelines and upload the static foliage attributes
    pub fn new(device: &wgpu::Device, format: wgpu::TextureFormat, system: &FormationSystem) -> Self {
        let profile = system
            .foliage()
            .map(|foliage| *foliage.profile())
            .unwrap_or(ModulationProfile::FOLIAGE);
        let foliage_pipeline = FoliagePipeline::new(device, format, &profile);
        let foliage_draw = system
            .foliage()
            .and_then(|foliage| foliage_pipeline.upload(device, foliage.attributes()));

        let ornament_pipeline = OrnamentPipeline::new(device, format);
        let ornament_draws: Vec<Option<OrnamentDrawCall>> = system
            .ornaments()
            .map(|group| ornament_pipeline.create_draw_call(device, group.geometry(), group.count()))
            .collect();

        log::info!(
            "[render] foliage {} point(s), {} ornament batch(es)",
            foliage_draw.as_ref().map_or(0, |d| d.instance_count),
            ornament_draws.iter().flatten().count()
        );

        Self {
            foliage_pipeline,
            foliage_draw,
            ornament_pipeline,
            ornament_draws,
        }
    }

    /// Write this frame's uniforms and instance batches
    pub fn prepare(&self, queue: &wgpu::Queue, system: &FormationSystem, camera: &OrbitCamera, viewport: [f32; 2]) {
        let model = system.model_matrix();

        if let Some(foliage) = system.foliage() {
            let uniforms = FoliageUniforms::new(
                camera.view_matrix(),
                camera.projection_matrix(),
                model,
                viewport,
                foliage.frame_uniform(),
            );
            self.foliage_pipeline.write_uniforms(queue, &uniforms);
        }

        self.ornament_pipeline.write_uniforms(
            queue,
            &OrnamentUniforms::new(camera.view_projection_matrix(), model, camera.position()),
        );
        for (draw, group) in self.ornament_draws.iter().zip(system.ornaments()) {
            if let Some(draw) = draw {
                draw.write(queue, group.batch());
            }
        }
    }

    /// Record one pass that clears color and depth, then draws every group
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, color_view: &wgpu::TextureView, depth_view: &wgpu::TextureView) {
        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Formation Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        // Ornaments write depth so foliage behind them is hidden
        self.ornament_pipeline
            .draw(&mut render_pass, self.ornament_draws.iter().flatten());

        if let Some(draw) = &self.foliage_draw {
            self.foliage_pipeline.draw(&mut render_pass, draw);
        }
    }

    pub fn foliage_instance_count(&self) -> u32 {
        self.foliage_draw.as_ref().map_or(0, |d| d.instance_count)
    }

    pub fn ornament_batch_count(&self) -> usize {
        self.ornament_draws.iter().flatten().count()
    }
}
