//! # Per-Object Shadow
//!
//! 每帧在硬性预算上限内选择需要投射阴影的场景对象，并计算渲染所需的
//! 阴影投影数据（每槽位视图/投影矩阵 + 展平的渲染器索引区间）。
//!
//! ## 核心组件
//!
//! - **CasterRegistry**: 阴影投射者注册表，注册时分配稳定唯一 id
//! - **CullingContext**: 每帧一次性构建的剔除快照（相机位姿、视锥体8角点、光源旋转）
//! - **GeometricCuller**: 几何剔除接口（可见性 + 优先级 + 光源矩阵）
//! - **PriorityBuffer**: 固定容量 top-K 优先级选择缓冲
//! - **ShadowCasterManager**: 每帧剔除编排与选集暴露
//!
//! ## 数据流
//!
//! 注册表 → 包围盒/索引区间查询 → 几何剔除 → 优先级缓冲 → 选集 → 外部绘制
//!
//! ### 示例
//!
//! ```ignore
//! use per_object_shadow::{CasterRegistry, ShadowCasterManager, ShadowConfig};
//!
//! let mut registry = CasterRegistry::new();
//! let id = registry.register(&caster);
//!
//! let mut manager = ShadowCasterManager::new(ShadowConfig::scene());
//! manager.cull(&registry, &frame, 16);
//! for i in 0..manager.visible_count() {
//!     let (view, proj) = manager.matrices(i);
//!     manager.draw(&mut sink, i);
//! }
//! ```
//!
//! ## 错误模型
//!
//! 没有光源、没有投射者、单个投射者不可见或超出预算都是正常的空结果，
//! 不是错误；读取越界下标是调用方 bug，直接 panic；单个投射者的包围盒
//! 查询失败只会跳过它自己，绝不会中断整个剔除过程。

/// 核心宏定义
pub mod macros;

/// 包围盒工具
pub mod bounds;
/// 投射者接口定义
pub mod caster;
/// 阴影系统配置
pub mod config;
/// 几何剔除器
pub mod culler;
/// 每帧剔除上下文
pub mod culling;
/// 错误类型
pub mod error;
/// 每帧渲染输入快照
pub mod frame;
/// 剔除编排与选集暴露
pub mod manager;
/// 投射者注册表
pub mod registry;
/// 有界优先级选择缓冲
pub mod selector;

// Re-export core components for convenience
pub use bounds::Aabb;
pub use caster::{CasterId, ShadowCaster, ShadowCommandSink, ShadowRendererList, ShadowUsage};
pub use config::ShadowConfig;
pub use culler::{CasterCullOutput, DirectionalShadowCuller, GeometricCuller};
pub use culling::{frustum_eight_corners, CullingContext, FRUSTUM_CORNER_COUNT};
pub use error::{ShadowError, ShadowResult};
pub use frame::{CameraState, FrameContext, LightType, SceneLight};
pub use manager::{ShadowCasterCullingResult, ShadowCasterManager, ShadowSlotUniforms};
pub use registry::CasterRegistry;
pub use selector::{AppendOutcome, PriorityBuffer};
