//! 阴影剔除性能基准测试
//!
//! 测试优先级缓冲吞吐、视锥体角点计算与完整剔除流程的性能

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{Quat, Vec3};
use per_object_shadow::{
    frustum_eight_corners, Aabb, CameraState, CasterRegistry, FrameContext, PriorityBuffer,
    SceneLight, ShadowCaster, ShadowCasterManager, ShadowCommandSink, ShadowConfig,
    ShadowRendererList, ShadowUsage,
};
use std::sync::Arc;

fn bench_priority_buffer_append(c: &mut Criterion) {
    let mut group = c.benchmark_group("priority_buffer_append");

    // 伪随机优先级序列（固定乘数散列，保证可重复）
    let priorities: Vec<f32> = (0..10_000u32)
        .map(|i| (i.wrapping_mul(2654435761) % 1000) as f32)
        .collect();

    for capacity in [8usize, 32, 128].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(capacity),
            capacity,
            |b, &capacity| {
                let mut buffer = PriorityBuffer::new();
                b.iter(|| {
                    buffer.reset(capacity);
                    for (i, &priority) in priorities.iter().enumerate() {
                        buffer.try_append(priority, i);
                    }
                    black_box(buffer.len())
                });
            },
        );
    }

    group.finish();
}

fn bench_frustum_corners(c: &mut Criterion) {
    let camera = CameraState::default();
    c.bench_function("frustum_eight_corners", |b| {
        b.iter(|| black_box(frustum_eight_corners(black_box(&camera))))
    });
}

struct BenchCaster {
    bounds: Aabb,
}

impl ShadowRendererList for BenchCaster {
    fn try_get_world_bounds(&self, _usage: ShadowUsage, indices: &mut Vec<u32>) -> Option<Aabb> {
        indices.push(0);
        Some(self.bounds)
    }

    fn draw(&self, _sink: &mut dyn ShadowCommandSink, _renderer_index: u32) {}
}

impl ShadowCaster for BenchCaster {
    fn can_cast_shadow(&self, _usage: ShadowUsage) -> bool {
        true
    }

    fn renderer_list(&self) -> &dyn ShadowRendererList {
        self
    }
}

fn bench_full_cull_pass(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_cull_pass");

    let frame = FrameContext {
        camera: CameraState::default(),
        lights: vec![SceneLight::directional(Quat::from_rotation_x(
            -std::f32::consts::FRAC_PI_2,
        ))],
        main_light_index: Some(0),
    };

    for caster_count in [16usize, 128, 1024].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(caster_count),
            caster_count,
            |b, &count| {
                let mut registry = CasterRegistry::new();
                for i in 0..count {
                    let center = Vec3::new(
                        (i % 32) as f32 * 4.0 - 64.0,
                        0.0,
                        -((i / 32) as f32 * 4.0) - 1.0,
                    );
                    let caster: Arc<dyn ShadowCaster> = Arc::new(BenchCaster {
                        bounds: Aabb::from_center_half_extents(center, Vec3::splat(0.5)),
                    });
                    registry.register(&caster);
                }

                let mut manager = ShadowCasterManager::new(ShadowConfig::scene());
                b.iter(|| {
                    manager.cull(&registry, &frame, 16);
                    black_box(manager.visible_count())
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_priority_buffer_append,
    bench_frustum_corners,
    bench_full_cull_pass
);
criterion_main!(benches);
