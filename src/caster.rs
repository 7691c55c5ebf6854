//! 阴影投射者接口定义
//!
//! 任何场景对象只要实现 [`ShadowCaster`] 能力集（投射条件判断 + 渲染器列表），
//! 就可以注册到 [`CasterRegistry`](crate::registry::CasterRegistry) 参与每帧剔除。
//! 本模块只定义接口；具体的网格/材质提交由宿主渲染器实现。

use crate::bounds::Aabb;
use serde::{Deserialize, Serialize};

/// 阴影用途
///
/// 决定光照方向的解析规则以及阴影的用途。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ShadowUsage {
    /// 投射到场景：光照方向直接取主方向光自身的方向
    #[default]
    Scene,
    /// 自阴影：光照方向向视线方向偏移，减少背面 artifact
    SelfShadow,
}

/// 投射者唯一标识
///
/// 注册时分配，在注册表生命周期内稳定且永不复用；0 表示尚未注册。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct CasterId(pub u32);

impl CasterId {
    /// 未注册状态
    pub const UNREGISTERED: CasterId = CasterId(0);

    /// 是否已注册
    pub fn is_registered(&self) -> bool {
        self.0 > 0
    }
}

/// 阴影绘制命令接收器
///
/// 宿主命令缓冲的抽象。管理器重放选中投射者的渲染器索引区间时，
/// 通过渲染器列表把每个索引写入该接收器。
pub trait ShadowCommandSink {
    /// 提交一个渲染器的阴影绘制
    fn draw_renderer(&mut self, renderer_index: u32);
}

/// 渲染器列表能力
///
/// 投射者对外暴露的"我拥有哪些渲染器"的查询与按索引绘制能力。
pub trait ShadowRendererList {
    /// 查询世界空间包围盒
    ///
    /// 成功时把自己拥有的渲染器索引追加到 `indices`（调用方提供的展平列表），
    /// 并返回包围盒；当前没有任何可见/启用的渲染器时返回 `None` 且不追加任何索引。
    fn try_get_world_bounds(&self, usage: ShadowUsage, indices: &mut Vec<u32>) -> Option<Aabb>;

    /// 按索引绘制单个渲染器
    fn draw(&self, sink: &mut dyn ShadowCommandSink, renderer_index: u32);
}

/// 阴影投射者
///
/// 生命周期由场景逻辑管理；注册表只持有共享引用，不拥有投射者。
pub trait ShadowCaster {
    /// 当前用途下是否投射阴影
    fn can_cast_shadow(&self, usage: ShadowUsage) -> bool;

    /// 渲染器列表能力
    fn renderer_list(&self) -> &dyn ShadowRendererList;
}
