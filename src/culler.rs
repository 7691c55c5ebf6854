//! 几何剔除器
//!
//! 外部协作者接口：给定世界空间包围盒和剔除上下文，判定该投射者本帧
//! 是否需要渲染阴影，并计算优先级与光源视图/投影矩阵。
//!
//! 接口是纯函数契约：无副作用，相同输入返回相同输出，可以按任意顺序
//! 对每个投射者独立调用（便于单独测试和安全并行化）。

use crate::bounds::Aabb;
use crate::culling::CullingContext;
use glam::{Mat4, Vec3, Vec4};

/// 单个投射者的剔除输出
#[derive(Debug, Clone, Copy)]
pub struct CasterCullOutput {
    /// 优先级（数值越大越优先；具体度量由剔除器实现决定，核心只做比较）
    pub priority: f32,
    /// 解析后的光照方向（从表面指向光源，w = 0）
    pub light_direction: Vec4,
    /// 光源视图矩阵
    pub view_matrix: Mat4,
    /// 光源投影矩阵
    pub projection_matrix: Mat4,
}

/// 几何剔除器接口
///
/// 返回 `None` 表示该投射者本帧不可见，静默丢弃，不贡献任何输出。
pub trait GeometricCuller {
    fn cull(&self, bounds: &Aabb, context: &CullingContext) -> Option<CasterCullOutput>;
}

/// 基于方向光的默认几何剔除器
///
/// 可见性：把投射者包围盒角点与相机视锥体角点都变换到光源空间，
/// 在垂直于光照方向的平面上做范围重叠测试；投射者完全位于视锥体
/// 沿光线传播方向的下游时（阴影落不到视锥体内）同样剔除。
///
/// 优先级：到相机距离的负值（越近优先级越高）。
#[derive(Debug, Clone, Copy, Default)]
pub struct DirectionalShadowCuller;

/// 近平面外扩距离，保证包围盒不会贴着光源近平面被裁掉
const NEAR_PLANE_MARGIN: f32 = 1.0;

impl GeometricCuller for DirectionalShadowCuller {
    fn cull(&self, bounds: &Aabb, context: &CullingContext) -> Option<CasterCullOutput> {
        if !bounds.is_valid() {
            return None;
        }

        // 只旋转不平移的光源空间：-Z 为光线传播方向
        let to_light_space = Mat4::from_quat(context.light_rotation.inverse());

        let (caster_min, caster_max) =
            light_space_extents(&to_light_space, &bounds.corners());
        let (frustum_min, frustum_max) =
            light_space_extents(&to_light_space, &context.frustum_corners);

        // 垂直于光线方向的平面上不重叠 => 阴影不可能落入视锥体
        if caster_max.x < frustum_min.x
            || caster_min.x > frustum_max.x
            || caster_max.y < frustum_min.y
            || caster_min.y > frustum_max.y
        {
            return None;
        }

        // 投射者整体在视锥体下游（阴影沿 -Z 延伸，落不回视锥体）
        if caster_max.z < frustum_min.z {
            return None;
        }

        let center = bounds.center();
        let radius = bounds.half_extents().length();
        let light_forward = context.light_forward();
        let light_up = context.light_rotation * Vec3::Y;

        // 从包围盒中心沿光线反方向后退，保证整个包围盒在近平面之内
        let eye = center - light_forward * (radius + NEAR_PLANE_MARGIN);
        let view_matrix = Mat4::look_to_rh(eye, light_forward, light_up);

        // 把包围盒紧密包进正交投影
        let mut view_min = Vec3::splat(f32::MAX);
        let mut view_max = Vec3::splat(f32::MIN);
        for corner in bounds.corners() {
            let p = view_matrix.transform_point3(corner);
            view_min = view_min.min(p);
            view_max = view_max.max(p);
        }
        // 右手视图空间中前方为 -z
        let near = -view_max.z;
        let far = -view_min.z;
        let projection_matrix = Mat4::orthographic_rh(
            view_min.x,
            view_max.x,
            view_min.y,
            view_max.y,
            near,
            far,
        );

        let priority = -context.camera_position.distance(center);

        Some(CasterCullOutput {
            priority,
            light_direction: (-light_forward).extend(0.0),
            view_matrix,
            projection_matrix,
        })
    }
}

/// 计算一组世界空间点在光源空间下的包围范围
fn light_space_extents(to_light_space: &Mat4, points: &[Vec3]) -> (Vec3, Vec3) {
    let mut min = Vec3::splat(f32::MAX);
    let mut max = Vec3::splat(f32::MIN);
    for point in points {
        let p = to_light_space.transform_point3(*point);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::caster::ShadowUsage;
    use crate::culling::CullingContext;
    use crate::frame::{CameraState, FrameContext, SceneLight};
    use glam::Quat;

    /// 朝下的方向光 + 默认相机（原点看向 -Z）
    fn scene_context() -> CullingContext {
        let frame = FrameContext {
            camera: CameraState::default(),
            lights: vec![SceneLight::directional(Quat::from_rotation_x(
                -std::f32::consts::FRAC_PI_2,
            ))],
            main_light_index: Some(0),
        };
        let light = frame.main_directional_light().unwrap();
        CullingContext::build(&frame, light, ShadowUsage::Scene, 0.2)
    }

    #[test]
    fn test_caster_inside_frustum_is_visible() {
        let context = scene_context();
        let bounds = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, -10.0), Vec3::splat(0.5));
        let output = DirectionalShadowCuller.cull(&bounds, &context);
        assert!(output.is_some());
    }

    #[test]
    fn test_caster_far_to_the_side_is_culled() {
        let context = scene_context();
        let bounds =
            Aabb::from_center_half_extents(Vec3::new(10000.0, 0.0, -10.0), Vec3::splat(0.5));
        assert!(DirectionalShadowCuller.cull(&bounds, &context).is_none());
    }

    #[test]
    fn test_caster_above_frustum_still_casts_into_it() {
        // 光线朝下：视锥体上方的投射者的阴影会落进视锥体，不能剔除
        let context = scene_context();
        let bounds =
            Aabb::from_center_half_extents(Vec3::new(0.0, 50.0, -20.0), Vec3::splat(0.5));
        assert!(DirectionalShadowCuller.cull(&bounds, &context).is_some());
    }

    #[test]
    fn test_caster_downstream_of_light_is_culled() {
        // 光线朝下：视锥体下方很远的投射者的阴影继续向下延伸，落不回视锥体
        let context = scene_context();
        let bounds =
            Aabb::from_center_half_extents(Vec3::new(0.0, -200.0, -20.0), Vec3::splat(0.5));
        assert!(DirectionalShadowCuller.cull(&bounds, &context).is_none());
    }

    #[test]
    fn test_invalid_bounds_are_culled() {
        let context = scene_context();
        let bounds = Aabb::new(Vec3::ONE, Vec3::ZERO);
        assert!(DirectionalShadowCuller.cull(&bounds, &context).is_none());
    }

    #[test]
    fn test_priority_prefers_closer_casters() {
        let context = scene_context();
        let near = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, -5.0), Vec3::splat(0.5));
        let far = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, -50.0), Vec3::splat(0.5));

        let near_output = DirectionalShadowCuller.cull(&near, &context).unwrap();
        let far_output = DirectionalShadowCuller.cull(&far, &context).unwrap();
        assert!(near_output.priority > far_output.priority);
    }

    #[test]
    fn test_matrices_project_caster_into_clip_volume() {
        let context = scene_context();
        let bounds = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, -10.0), Vec3::splat(1.0));
        let output = DirectionalShadowCuller.cull(&bounds, &context).unwrap();

        let view_proj = output.projection_matrix * output.view_matrix;
        for corner in bounds.corners() {
            let clip = view_proj.project_point3(corner);
            assert!(clip.x.abs() <= 1.0 + 1e-3, "clip.x = {}", clip.x);
            assert!(clip.y.abs() <= 1.0 + 1e-3, "clip.y = {}", clip.y);
            assert!((-1e-3..=1.0 + 1e-3).contains(&clip.z), "clip.z = {}", clip.z);
        }
    }

    #[test]
    fn test_light_direction_points_toward_light() {
        let context = scene_context();
        let bounds = Aabb::from_center_half_extents(Vec3::new(0.0, 0.0, -10.0), Vec3::splat(0.5));
        let output = DirectionalShadowCuller.cull(&bounds, &context).unwrap();
        // 光线朝下 => 光照方向朝上
        assert!(output.light_direction.y > 0.9);
        assert_eq!(output.light_direction.w, 0.0);
    }

    #[test]
    fn test_pure_function_same_input_same_output() {
        let context = scene_context();
        let bounds = Aabb::from_center_half_extents(Vec3::new(1.0, 2.0, -15.0), Vec3::splat(0.7));
        let a = DirectionalShadowCuller.cull(&bounds, &context).unwrap();
        let b = DirectionalShadowCuller.cull(&bounds, &context).unwrap();
        assert_eq!(a.priority, b.priority);
        assert_eq!(a.view_matrix, b.view_matrix);
        assert_eq!(a.projection_matrix, b.projection_matrix);
    }
}
