//! 阴影系统错误类型
//!
//! 只有配置校验会产生可恢复错误。按设计约定：
//! - 正常的空结果（无光源、无投射者、超出预算）不是错误，表现为空选集
//! - 调用方契约违规（读取越界下标）是致命错误，直接 panic
//! - 协作者失败（包围盒查询失败）以 `Option` 表示，跳过该投射者

use thiserror::Error;

/// 阴影系统错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShadowError {
    #[error("Invalid self-shadow blend weight: {0} (expected 0.0..=1.0)")]
    InvalidBlendWeight(f32),

    #[error("Invalid shadow config: {0}")]
    InvalidConfig(String),
}

/// 阴影系统Result类型
pub type ShadowResult<T> = Result<T, ShadowError>;
