//! 阴影系统配置
//!
//! 控制阴影用途、投射者预算与自阴影方向混合权重。
//! 支持 serde 序列化，便于写入图形设置文件。

use crate::caster::ShadowUsage;
use crate::error::{ShadowError, ShadowResult};
use crate::impl_default;
use serde::{Deserialize, Serialize};

/// 阴影投射配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShadowConfig {
    /// 阴影用途
    pub usage: ShadowUsage,

    /// 每帧投射者预算上限（超出预算的低优先级投射者被丢弃）
    pub max_caster_count: usize,

    /// 自阴影时主光源方向的插值权重
    ///
    /// 0.0 = 完全跟随视线方向，1.0 = 完全跟随光源方向。
    /// 以视线方向为主（默认 0.2）可以减少背面 artifact。
    pub self_shadow_light_weight: f32,
}

impl_default!(ShadowConfig {
    usage: ShadowUsage::Scene,
    max_caster_count: 16,
    self_shadow_light_weight: 0.2,
});

impl ShadowConfig {
    /// 场景阴影配置
    pub fn scene() -> Self {
        Self::default()
    }

    /// 自阴影配置
    pub fn self_shadow() -> Self {
        Self {
            usage: ShadowUsage::SelfShadow,
            ..Default::default()
        }
    }

    /// 创建低预算配置（适合移动端）
    pub fn low_quality() -> Self {
        Self {
            max_caster_count: 4,
            ..Default::default()
        }
    }

    /// 创建高预算配置（适合高端PC）
    pub fn high_quality() -> Self {
        Self {
            max_caster_count: 32,
            ..Default::default()
        }
    }

    /// 校验配置合法性
    pub fn validate(&self) -> ShadowResult<()> {
        if !(0.0..=1.0).contains(&self.self_shadow_light_weight) {
            return Err(ShadowError::InvalidBlendWeight(self.self_shadow_light_weight));
        }
        Ok(())
    }
}
