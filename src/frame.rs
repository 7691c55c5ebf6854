//! 每帧渲染输入快照
//!
//! 宿主渲染器每帧提供的相机与光源数据。本模块只描述剔除所需的最小契约：
//! 相机位姿与投影参数、可见光源列表、主光源选择（可能不存在）。

use crate::impl_default;
use glam::{Mat4, Quat, Vec3};

/// 相机状态
#[derive(Debug, Clone, Copy)]
pub struct CameraState {
    /// 世界空间位置
    pub position: Vec3,
    /// 世界空间旋转
    pub rotation: Quat,
    /// 垂直视场角（弧度）
    pub fov_y: f32,
    /// 宽高比
    pub aspect: f32,
    /// 近平面
    pub near: f32,
    /// 远平面
    pub far: f32,
}

impl_default!(CameraState {
    position: Vec3::ZERO,
    rotation: Quat::IDENTITY,
    fov_y: std::f32::consts::FRAC_PI_4,
    aspect: 16.0 / 9.0,
    near: 0.1,
    far: 100.0,
});

impl CameraState {
    /// 前向向量（右手坐标系，-Z 为前方）
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// 上向量
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// 视图矩阵
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// 投影矩阵
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far)
    }
}

/// 光源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// 方向光
    Directional,
    /// 点光源
    Point,
    /// 聚光灯
    Spot,
}

/// 可见光源
#[derive(Debug, Clone, Copy)]
pub struct SceneLight {
    /// 光源类型
    pub light_type: LightType,
    /// 世界空间旋转（方向光的朝向）
    pub rotation: Quat,
    /// 是否启用
    pub enabled: bool,
}

impl SceneLight {
    /// 创建方向光
    pub fn directional(rotation: Quat) -> Self {
        Self {
            light_type: LightType::Directional,
            rotation,
            enabled: true,
        }
    }

    /// 光源前向（即光线传播方向）
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }
}

/// 每帧渲染输入
#[derive(Debug, Clone)]
pub struct FrameContext {
    /// 相机状态
    pub camera: CameraState,
    /// 本帧可见光源
    pub lights: Vec<SceneLight>,
    /// 主光源在 `lights` 中的下标；没有主光源时为 `None`
    pub main_light_index: Option<usize>,
}

impl FrameContext {
    /// 获取启用的主方向光
    ///
    /// 主光源不存在、下标无效、未启用或不是方向光时都返回 `None`——
    /// 这些都是正常状态，意味着本帧没有阴影可投射。
    pub fn main_directional_light(&self) -> Option<&SceneLight> {
        let index = self.main_light_index?;
        let light = self.lights.get(index)?;
        (light.enabled && light.light_type == LightType::Directional).then_some(light)
    }
}
