//! 阴影投射者管理器
//!
//! 每帧编排一次剔除：遍历注册表，逐个查询包围盒并记录渲染器索引区间，
//! 调用几何剔除器，把结果送入有界优先级缓冲；最终选集通过下标访问器
//! 暴露给绘制阶段。
//!
//! 控制流单向：注册表 → 包围盒/索引区间查询 → 几何剔除 → 优先级缓冲 →
//! 选集 → 外部绘制，一帧之内没有组件回调早先的组件。

use crate::caster::{CasterId, ShadowCaster, ShadowCommandSink};
use crate::config::ShadowConfig;
use crate::culler::{DirectionalShadowCuller, GeometricCuller};
use crate::culling::CullingContext;
use crate::frame::FrameContext;
use crate::registry::CasterRegistry;
use crate::selector::PriorityBuffer;
use glam::{Mat4, Vec4};
use std::sync::Arc;

/// 单个投射者的剔除结果
///
/// 只在一帧内有效，下一次剔除会全部重建。
pub struct ShadowCasterCullingResult {
    /// 投射者句柄
    pub caster: Arc<dyn ShadowCaster>,
    /// 注册时分配的 id
    pub caster_id: CasterId,
    /// 在展平渲染器索引列表中的区间起点（含）
    pub renderer_index_start: usize,
    /// 区间终点（不含）
    pub renderer_index_end: usize,
    /// 解析后的光照方向
    pub light_direction: Vec4,
    /// 光源视图矩阵
    pub view_matrix: Mat4,
    /// 光源投影矩阵
    pub projection_matrix: Mat4,
}

/// 每槽位的 GPU Uniform 数据（传递到着色器）
#[repr(C)]
#[derive(Clone, Copy, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ShadowSlotUniforms {
    /// 光源视图投影矩阵
    pub view_proj: [f32; 16],
    /// 光照方向
    pub light_direction: [f32; 4],
}

/// 阴影投射者管理器
///
/// 单渲染线程模型：一次 [`cull`](Self::cull) 在调用线程上同步完成，
/// 之后才能读取结果。剔除进行期间修改同一注册表是调用方契约违规
/// （场景图变更应安排在帧的其它阶段）。
pub struct ShadowCasterManager {
    config: ShadowConfig,
    culler: Box<dyn GeometricCuller>,
    /// 本帧展平的渲染器索引列表，按投射者处理顺序追加
    renderer_index_list: Vec<u32>,
    cull_results: PriorityBuffer<f32, ShadowCasterCullingResult>,
}

impl ShadowCasterManager {
    /// 使用默认几何剔除器创建管理器
    pub fn new(config: ShadowConfig) -> Self {
        Self::with_culler(config, Box::new(DirectionalShadowCuller))
    }

    /// 使用自定义几何剔除器创建管理器
    pub fn with_culler(config: ShadowConfig, culler: Box<dyn GeometricCuller>) -> Self {
        Self {
            config,
            culler,
            renderer_index_list: Vec::new(),
            cull_results: PriorityBuffer::new(),
        }
    }

    /// 当前配置
    pub fn config(&self) -> &ShadowConfig {
        &self.config
    }

    /// 执行一次剔除
    ///
    /// 注册表为空或者没有启用的主方向光时直接返回空选集——这是正常
    /// 状态（本帧没有阴影），不做任何包围盒/几何剔除查询，也不是错误。
    pub fn cull(&mut self, registry: &CasterRegistry, frame: &FrameContext, max_count: usize) {
        self.renderer_index_list.clear();
        self.cull_results.reset(max_count);

        if registry.is_empty() {
            return;
        }
        let Some(main_light) = frame.main_directional_light() else {
            tracing::trace!(target: "shadow", "no usable directional light, empty selection");
            return;
        };

        let context = CullingContext::build(
            frame,
            main_light,
            self.config.usage,
            self.config.self_shadow_light_weight,
        );

        for (id, caster) in registry.iter() {
            self.cull_and_append(id, caster, &context);
        }

        tracing::debug!(
            target: "shadow",
            "shadow cull: {} visible / {} registered (budget {})",
            self.cull_results.len(),
            registry.len(),
            max_count
        );
    }

    /// 使用配置中的预算执行一次剔除
    pub fn cull_with_config_budget(&mut self, registry: &CasterRegistry, frame: &FrameContext) {
        let max_count = self.config.max_caster_count;
        self.cull(registry, frame, max_count);
    }

    fn cull_and_append(
        &mut self,
        id: CasterId,
        caster: &Arc<dyn ShadowCaster>,
        context: &CullingContext,
    ) {
        if !caster.can_cast_shadow(context.usage) {
            return;
        }

        let start = self.renderer_index_list.len();
        let Some(bounds) = caster
            .renderer_list()
            .try_get_world_bounds(context.usage, &mut self.renderer_index_list)
        else {
            // 协作者没有可用包围盒：该投射者本帧不贡献任何内容
            return;
        };
        let end = self.renderer_index_list.len();

        let Some(output) = self.culler.cull(&bounds, context) else {
            return;
        };

        // 超预算被拒绝时，已追加的索引作为死区间留在列表里，无害
        self.cull_results.try_append(
            output.priority,
            ShadowCasterCullingResult {
                caster: Arc::clone(caster),
                caster_id: id,
                renderer_index_start: start,
                renderer_index_end: end,
                light_direction: output.light_direction,
                view_matrix: output.view_matrix,
                projection_matrix: output.projection_matrix,
            },
        );
    }

    /// 本帧选中的投射者数量（0 <= visible_count <= max_count）
    pub fn visible_count(&self) -> usize {
        self.cull_results.len()
    }

    /// 选中投射者的 id
    ///
    /// 下标必须在 `0..visible_count()` 内，越界是调用方错误，直接 panic。
    pub fn id(&self, index: usize) -> CasterId {
        self.cull_results[index].caster_id
    }

    /// 选中投射者的光照方向
    pub fn light_direction(&self, index: usize) -> Vec4 {
        self.cull_results[index].light_direction
    }

    /// 选中投射者的视图/投影矩阵
    pub fn matrices(&self, index: usize) -> (Mat4, Mat4) {
        let result = &self.cull_results[index];
        (result.view_matrix, result.projection_matrix)
    }

    /// 选中投射者的完整剔除结果
    pub fn result(&self, index: usize) -> &ShadowCasterCullingResult {
        &self.cull_results[index]
    }

    /// 重放选中投射者记录的渲染器索引区间
    pub fn draw(&self, sink: &mut dyn ShadowCommandSink, index: usize) {
        let result = &self.cull_results[index];
        for i in result.renderer_index_start..result.renderer_index_end {
            result
                .caster
                .renderer_list()
                .draw(sink, self.renderer_index_list[i]);
        }
    }

    /// 本帧展平的渲染器索引列表
    pub fn renderer_index_list(&self) -> &[u32] {
        &self.renderer_index_list
    }

    /// 打包每槽位 GPU 数据，返回写入的槽位数量
    pub fn write_slot_uniforms(&self, out: &mut [ShadowSlotUniforms]) -> usize {
        let count = self.visible_count().min(out.len());
        for (index, slot) in out.iter_mut().enumerate().take(count) {
            let result = &self.cull_results[index];
            *slot = ShadowSlotUniforms {
                view_proj: (result.projection_matrix * result.view_matrix).to_cols_array(),
                light_direction: result.light_direction.to_array(),
            };
        }
        count
    }
}
