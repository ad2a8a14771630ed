//! Evergreen Render - wgpu renderer for formation scenes
//!
//! Foliage is drawn as depth-attenuated point sprites whose motion is
//! evaluated entirely on the GPU from a static attribute buffer. Ornaments
//! are instanced meshes whose transforms are composed on the host each
//! frame. Both render to a window surface or an offscreen texture.

mod camera;
mod context;
pub mod foliage_pipeline;
mod formation_renderer;
mod headless;
#[cfg(test)]
mod modulation_conformance;
pub mod ornament_pipeline;
mod primitives;

pub use camera::OrbitCamera;
pub use context::{RenderContext, RenderError};
pub use foliage_pipeline::{foliage_shader_source, FoliageDrawCall, FoliagePipeline, FoliageUniforms};
pub use formation_renderer::{FormationRenderer, CLEAR_COLOR};
pub use headless::HeadlessContext;
pub use ornament_pipeline::{OrnamentDrawCall, OrnamentPipeline, OrnamentUniforms};
pub use primitives::{create_box_mesh, create_sphere_mesh, mesh_for, Mesh, MeshVertex};
