//! Runs the generated WGSL `modulate` in a compute pass and compares it
//! against the host evaluation in `evergreen_formation::modulation`.

use crate::headless::HeadlessContext;
use evergreen_core::{Color, Vec3};
use evergreen_formation::{modulate, modulation_prelude, ModulationInput, ModulationProfile};
use wgpu::util::DeviceExt;

/// GPU `sin`/`cos` are not bit-exact with the host; formula drift shows up
/// at the scale of the amplitudes (0.02 and up).
const TOLERANCE: f32 = 1e-3;

const ENTRY: &str = r#"
@group(0) @binding(0) var<storage, read> inputs: array<vec4<f32>>;
@group(0) @binding(1) var<storage, read_write> outputs: array<vec4<f32>>;

@compute @workgroup_size(1)
fn cs_modulate(@builtin(global_invocation_id) id: vec3<u32>) {
    let i = id.x;
    let a = inputs[i * 3u];
    let b = inputs[i * 3u + 1u];
    let c = inputs[i * 3u + 2u];
    let m = modulate(a.xyz, b.xyz, a.w, b.w, c.x);
    outputs[i * 2u] = vec4<f32>(m.position, m.sparkle);
    outputs[i * 2u + 1u] = vec4<f32>(m.color, m.alpha);
}
"#;

fn cases() -> Vec<ModulationInput> {
    let scatter = Vec3::new(8.0, -5.0, 3.0);
    let formation = Vec3::new(1.2, 2.5, -0.7);
    let mut cases = Vec::new();
    for &(progress, elapsed, seed) in &[
        (0.0, 0.0, 0.0),
        (0.0, 1.7, 0.42),
        (0.25, 3.1, 0.013),
        (0.5, 0.6, 0.77),
        (0.8, 7.25, 0.91),
        (1.0, 4.0, 0.3),
        (1.0, 9.5, 0.999),
    ] {
        cases.push(ModulationInput {
            scatter,
            formation,
            progress,
            elapsed,
            seed,
        });
    }
    cases
}

fn pack(inputs: &[ModulationInput]) -> Vec<[f32; 4]> {
    inputs
        .iter()
        .flat_map(|i| {
            [
                [i.scatter.x, i.scatter.y, i.scatter.z, i.progress],
                [i.formation.x, i.formation.y, i.formation.z, i.elapsed],
                [i.seed, 0.0, 0.0, 0.0],
            ]
        })
        .collect()
}

/// Evaluate every case on the GPU; `(position, sparkle)` and `(color, alpha)` per case
fn run_on_gpu(ctx: &HeadlessContext, profile: &ModulationProfile, inputs: &[ModulationInput]) -> Vec<[f32; 4]> {
    let device = &ctx.device;
    let source = format!("{}\n{}", modulation_prelude(profile), ENTRY);
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("Modulation Conformance Shader"),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    let input_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some("Modulation Inputs"),
        contents: bytemuck::cast_slice(&pack(inputs)),
        usage: wgpu::BufferUsages::STORAGE,
    });
    let output_size = (inputs.len() * 2 * std::mem::size_of::<[f32; 4]>()) as u64;
    let output_buffer = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Modulation Outputs"),
        size: output_size,
        usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
        mapped_at_creation: false,
    });
    let readback = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Modulation Readback"),
        size: output_size,
        usage: wgpu::BufferUsages::COPY_DST | wgpu::BufferUsages::MAP_READ,
        mapped_at_creation: false,
    });

    let pipeline = device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some("Modulation Conformance Pipeline"),
        layout: None,
        module: &module,
        entry_point: Some("cs_modulate"),
        compilation_options: Default::default(),
        cache: None,
    });
    let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("Modulation Conformance Bind Group"),
        layout: &pipeline.get_bind_group_layout(0),
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: input_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: output_buffer.as_entire_binding(),
            },
        ],
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Modulation Conformance Encoder"),
    });
    {
        let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Modulation Conformance Pass"),
            timestamp_writes: None,
        });
        pass.set_pipeline(&pipeline);
        pass.set_bind_group(0, &bind_group, &[]);
        pass.dispatch_workgroups(inputs.len() as u32, 1, 1);
    }
    encoder.copy_buffer_to_buffer(&output_buffer, 0, &readback, 0, output_size);
    ctx.queue.submit(std::iter::once(encoder.finish()));

    let slice = readback.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device.poll(wgpu::Maintain::Wait);
    rx.recv().unwrap().unwrap();

    let data = slice.get_mapped_range();
    let values = bytemuck::cast_slice::<u8, [f32; 4]>(&data).to_vec();
    drop(data);
    readback.unmap();
    values
}

fn assert_close(what: &str, gpu: f32, host: f32, input: &ModulationInput) {
    assert!(
        (gpu - host).abs() <= TOLERANCE,
        "{what}: gpu {gpu} vs host {host} for {input:?}"
    );
}

fn check_profile(ctx: &HeadlessContext, profile: &ModulationProfile) {
    let inputs = cases();
    let gpu = run_on_gpu(ctx, profile, &inputs);
    assert_eq!(gpu.len(), inputs.len() * 2);

    for (input, out) in inputs.iter().zip(gpu.chunks(2)) {
        let host = modulate(profile, input);
        let [px, py, pz, sparkle] = out[0];
        let [r, g, b, alpha] = out[1];
        assert_close("position.x", px, host.position.x, input);
        assert_close("position.y", py, host.position.y, input);
        assert_close("position.z", pz, host.position.z, input);
        assert_close("sparkle", sparkle, host.sparkle, input);
        assert_close("color.r", r, host.color.r, input);
        assert_close("color.g", g, host.color.g, input);
        assert_close("color.b", b, host.color.b, input);
        assert_close("alpha", alpha, host.alpha, input);
    }
}

#[test]
fn gpu_modulation_matches_host() {
    let ctx = match pollster::block_on(HeadlessContext::new(1, 1)) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("skipping GPU modulation check: {e}");
            return;
        }
    };
    check_profile(&ctx, &ModulationProfile::FOLIAGE);
    check_profile(&ctx, &ModulationProfile::ornament(Color::from_hex(0xFFD700)));
}
