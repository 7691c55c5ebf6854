//! 每帧剔除上下文
//!
//! 每次剔除开始时构建一次、全程只读的快照：相机位姿、世界空间视锥体8角点、
//! 按用途解析后的光源旋转。视锥体角点使用固定大小数组，不做动态分配。

use crate::caster::ShadowUsage;
use crate::frame::{CameraState, FrameContext, SceneLight};
use glam::{Mat3, Quat, Vec3};

/// 视锥体角点数量（近/远平面各4个）
pub const FRUSTUM_CORNER_COUNT: usize = 8;

/// 每帧剔除上下文
#[derive(Debug, Clone, Copy)]
pub struct CullingContext {
    /// 相机世界位置
    pub camera_position: Vec3,
    /// 相机前向
    pub camera_forward: Vec3,
    /// 世界空间视锥体8角点（前4个在近平面，后4个在远平面）
    pub frustum_corners: [Vec3; FRUSTUM_CORNER_COUNT],
    /// 解析后的光源旋转
    pub light_rotation: Quat,
    /// 阴影用途
    pub usage: ShadowUsage,
}

impl CullingContext {
    /// 从帧输入与主方向光构建剔除上下文
    ///
    /// `light_weight` 只在自阴影用途下生效，见 [`resolve_light_rotation`]。
    pub fn build(
        frame: &FrameContext,
        main_light: &SceneLight,
        usage: ShadowUsage,
        light_weight: f32,
    ) -> Self {
        let camera = &frame.camera;
        Self {
            camera_position: camera.position,
            camera_forward: camera.forward(),
            frustum_corners: frustum_eight_corners(camera),
            light_rotation: resolve_light_rotation(camera, main_light, usage, light_weight),
            usage,
        }
    }

    /// 光线传播方向
    pub fn light_forward(&self) -> Vec3 {
        self.light_rotation * Vec3::NEG_Z
    }
}

/// 计算世界空间视锥体8角点
///
/// 把 NDC 立方体角点经逆视图投影矩阵变换回世界空间（深度范围 0..1）。
pub fn frustum_eight_corners(camera: &CameraState) -> [Vec3; FRUSTUM_CORNER_COUNT] {
    let inv_view_proj = (camera.projection_matrix() * camera.view_matrix()).inverse();

    let ndc_corners = [
        Vec3::new(-1.0, -1.0, 0.0),
        Vec3::new(1.0, -1.0, 0.0),
        Vec3::new(1.0, 1.0, 0.0),
        Vec3::new(-1.0, 1.0, 0.0),
        Vec3::new(-1.0, -1.0, 1.0),
        Vec3::new(1.0, -1.0, 1.0),
        Vec3::new(1.0, 1.0, 1.0),
        Vec3::new(-1.0, 1.0, 1.0),
    ];

    let mut corners = [Vec3::ZERO; FRUSTUM_CORNER_COUNT];
    for (corner, ndc) in corners.iter_mut().zip(ndc_corners) {
        *corner = inv_view_proj.project_point3(ndc);
    }
    corners
}

/// 按用途解析光源旋转
///
/// - [`ShadowUsage::Scene`]: 直接使用方向光自身的旋转
/// - [`ShadowUsage::SelfShadow`]: 视线方向与光照方向做线性插值
///   （四元数插值在部分情况会跳变），以视线方向为主减少背面 artifact，
///   再相对相机上向量重新正交化
pub fn resolve_light_rotation(
    camera: &CameraState,
    light: &SceneLight,
    usage: ShadowUsage,
    light_weight: f32,
) -> Quat {
    match usage {
        ShadowUsage::Scene => light.rotation,
        ShadowUsage::SelfShadow => {
            let view_forward = camera.forward();
            let light_forward = light.forward();
            let forward = view_forward.lerp(light_forward, light_weight).normalize();
            look_rotation(forward, camera.up())
        }
    }
}

/// 构建朝向 `forward`、以 `up` 为参考上向量的旋转（-Z 前向约定）
fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let z_axis = -forward.normalize();
    let mut x_axis = up.cross(z_axis);
    if x_axis.length_squared() < 1e-8 {
        // forward 与 up 平行时退化，任选一条正交轴
        x_axis = z_axis.any_orthonormal_vector();
    }
    let x_axis = x_axis.normalize();
    let y_axis = z_axis.cross(x_axis);
    Quat::from_mat3(&Mat3::from_cols(x_axis, y_axis, z_axis))
}
